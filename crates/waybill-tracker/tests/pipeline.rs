//! End-to-end tests of the checkpoint pipeline and the shipment tracker with
//! a deterministic in-memory geocoder.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use waybill_core::{Coordinates, RawEvent, RouteCoordinates, ShipmentRecord};
use waybill_geocode::{CachedGeocoder, GeocodeLookup};
use waybill_tracker::{
    AnimationConfig, AnimationState, CheckpointPipeline, CheckpointResolver, LoadOutcome,
    ShipmentTracker,
};

const HYDERABAD: Coordinates = Coordinates::new(17.385, 78.4867);
const EL_PASO: Coordinates = Coordinates::new(31.7619, -106.485);

#[derive(Default)]
struct RecordingGeocoder {
    answers: HashMap<String, Coordinates>,
    queries: Mutex<Vec<String>>,
    /// Lookups of this query wait until `release` is notified.
    slow_query: Option<String>,
    entered: Notify,
    release: Notify,
}

impl RecordingGeocoder {
    fn new(answers: &[(&str, Coordinates)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(q, c)| ((*q).to_owned(), *c))
                .collect(),
            ..Self::default()
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl GeocodeLookup for RecordingGeocoder {
    async fn lookup(&self, query: &str) -> Option<Coordinates> {
        self.queries.lock().unwrap().push(query.to_owned());
        if self.slow_query.as_deref() == Some(query) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.answers.get(query).copied()
    }
}

fn event(status: &str, location: &str, date: &str, completed: bool) -> RawEvent {
    RawEvent {
        status: status.to_owned(),
        location: location.to_owned(),
        date: date.to_owned(),
        completed,
    }
}

fn record(awb: &str, timeline: Vec<RawEvent>) -> ShipmentRecord {
    ShipmentRecord {
        awb: awb.to_owned(),
        status: "In Transit".to_owned(),
        timeline,
        coordinates: Some(RouteCoordinates {
            origin: Some(HYDERABAD.into()),
            destination: Some(EL_PASO.into()),
        }),
        ..ShipmentRecord::default()
    }
}

/// Newest-first feed, as carriers usually return it.
fn fedex_timeline() -> Vec<RawEvent> {
    vec![
        event("Out for delivery", "EL PASO, TX [US]", "14/11/2025 8:10 AM", false),
        event("Departed hub", "MEMPHIS, TN", "12/11/2025 11:40 PM", true),
        event("In transit", "LEIPZIG [DE]", "11/11/2025 3:15 PM", true),
        event("Picked up", "HYDERABAD TELANGANA [IN]", "10/11/2025 6:21 PM", true),
    ]
}

fn geocoder() -> RecordingGeocoder {
    RecordingGeocoder::new(&[
        ("LEIPZIG, Germany", Coordinates::new(51.3397, 12.3731)),
        ("MEMPHIS, TN", Coordinates::new(35.1495, -90.049)),
    ])
}

#[tokio::test]
async fn pipeline_orders_pins_and_geocodes() {
    let geocoder = geocoder();
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&geocoder));

    let checkpoints = pipeline.run(&record("6002770480", fedex_timeline())).await;

    let statuses: Vec<&str> = checkpoints.iter().map(|c| c.status.as_str()).collect();
    assert_eq!(
        statuses,
        vec!["Picked up", "In transit", "Departed hub", "Out for delivery"]
    );
    assert_eq!(checkpoints.first().unwrap().coordinates, HYDERABAD);
    assert_eq!(checkpoints.last().unwrap().coordinates, EL_PASO);
    assert!(checkpoints[0].is_first && checkpoints[3].is_last);
    assert_eq!(
        geocoder.queries(),
        vec!["LEIPZIG, Germany".to_owned(), "MEMPHIS, TN".to_owned()]
    );
}

#[tokio::test]
async fn undated_feed_is_reversed() {
    let geocoder = geocoder();
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&geocoder));
    let timeline = fedex_timeline()
        .into_iter()
        .map(|mut e| {
            e.date = String::new();
            e
        })
        .collect();

    let checkpoints = pipeline.run(&record("X", timeline)).await;
    assert_eq!(checkpoints[0].status, "Picked up");
    assert_eq!(checkpoints[3].status, "Out for delivery");
}

#[tokio::test]
async fn pipeline_is_idempotent() {
    let geocoder = geocoder();
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&geocoder));
    let shipment = record("6002770480", fedex_timeline());

    let first = pipeline.run(&shipment).await;
    let second = pipeline.run(&shipment).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn cache_does_not_change_output() {
    let plain = geocoder();
    let cached = CachedGeocoder::new(geocoder());
    let shipment = record("6002770480", fedex_timeline());

    let without = CheckpointPipeline::new(CheckpointResolver::new(&plain))
        .run(&shipment)
        .await;
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&cached));
    let with = pipeline.run(&shipment).await;
    let again = pipeline.run(&shipment).await;

    assert_eq!(without, with);
    assert_eq!(with, again);
    assert_eq!(cached.len().await, 2);
}

#[tokio::test]
async fn unresolvable_middle_events_are_dropped() {
    let geocoder = RecordingGeocoder::default();
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&geocoder));
    let timeline = fedex_timeline();

    let checkpoints = pipeline.run(&record("X", timeline.clone())).await;
    assert!(checkpoints.len() < timeline.len());
    assert_eq!(checkpoints.len(), 2);
    assert!(checkpoints.iter().all(|c| c.coordinates.is_valid()));
}

#[tokio::test]
async fn invalid_origin_produces_no_checkpoints() {
    let geocoder = geocoder();
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&geocoder));
    let mut shipment = record("X", fedex_timeline());
    shipment.coordinates = Some(RouteCoordinates {
        origin: Some(Coordinates::new(91.0, 0.0).into()),
        destination: Some(EL_PASO.into()),
    });

    assert!(pipeline.run(&shipment).await.is_empty());
    assert!(geocoder.queries().is_empty());
}

#[tokio::test]
async fn missing_coordinates_produce_no_checkpoints() {
    let geocoder = geocoder();
    let pipeline = CheckpointPipeline::new(CheckpointResolver::new(&geocoder));
    let mut shipment = record("X", fedex_timeline());
    shipment.coordinates = None;

    assert!(pipeline.run(&shipment).await.is_empty());
}

fn tracker(geocoder: Arc<RecordingGeocoder>) -> ShipmentTracker<Arc<RecordingGeocoder>> {
    ShipmentTracker::new(
        CheckpointPipeline::new(CheckpointResolver::new(geocoder)),
        AnimationConfig::new(Duration::from_millis(400), 4).unwrap(),
    )
}

#[tokio::test]
async fn tracker_installs_checkpoints_and_animates() {
    let tracker = tracker(Arc::new(geocoder()));

    let outcome = tracker.load(&record("6002770480", fedex_timeline())).await;
    let LoadOutcome::Ready { checkpoints } = outcome else {
        panic!("expected checkpoints, got {outcome:?}");
    };
    assert_eq!(checkpoints.len(), 4);
    assert_eq!(tracker.checkpoints(), checkpoints);
    assert_eq!(tracker.awb().as_deref(), Some("6002770480"));

    let frames = tracker.frames().expect("animation should be running");
    let frame = frames.borrow().clone();
    assert_eq!(frame.state, AnimationState::Animating { current_index: 2 });
    assert_eq!(frame.position, Some(checkpoints[2].coordinates));
}

#[tokio::test]
async fn tracker_reports_no_data() {
    let tracker = tracker(Arc::new(geocoder()));
    let mut shipment = record("X", fedex_timeline());
    shipment.coordinates = None;

    assert_eq!(tracker.load(&shipment).await, LoadOutcome::NoData);
    assert!(tracker.frames().is_none());
    assert!(!tracker.select(0));
}

#[tokio::test]
async fn stale_lookup_is_discarded() {
    let geocoder = Arc::new(RecordingGeocoder {
        slow_query: Some("LEIPZIG, Germany".to_owned()),
        ..geocoder()
    });
    let tracker = tracker(Arc::clone(&geocoder));

    let older = record("OLD", fedex_timeline());
    let newer = record(
        "NEW",
        vec![
            event("Delivered", "EL PASO", "02/12/2025 9:00 AM", true),
            event("Picked up", "HYDERABAD", "01/12/2025 9:00 AM", true),
        ],
    );

    let first = tracker.load(&older);
    let second = async {
        geocoder.entered.notified().await;
        let outcome = tracker.load(&newer).await;
        geocoder.release.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, LoadOutcome::Superseded);
    assert!(matches!(second, LoadOutcome::Ready { .. }));
    assert_eq!(tracker.awb().as_deref(), Some("NEW"));
    assert_eq!(tracker.checkpoints().len(), 2);
    // The superseded run stopped before geocoding MEMPHIS.
    assert_eq!(geocoder.queries(), vec!["LEIPZIG, Germany".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn superseded_load_returns_without_waiting_for_its_geocoder() {
    // LEIPZIG is never released; only cancellation can finish the older load.
    let geocoder = Arc::new(RecordingGeocoder {
        slow_query: Some("LEIPZIG, Germany".to_owned()),
        ..geocoder()
    });
    let tracker = tracker(Arc::clone(&geocoder));

    let older = record("OLD", fedex_timeline());
    let newer = record(
        "NEW",
        vec![
            event("Delivered", "EL PASO", "02/12/2025 9:00 AM", true),
            event("Picked up", "HYDERABAD", "01/12/2025 9:00 AM", true),
        ],
    );

    let first = tracker.load(&older);
    let second = async {
        geocoder.entered.notified().await;
        tracker.load(&newer).await
    };
    let (first, second) = tokio::time::timeout(Duration::from_millis(500), async {
        tokio::join!(first, second)
    })
    .await
    .expect("superseded load should not wait on its in-flight lookup");

    assert_eq!(first, LoadOutcome::Superseded);
    assert!(matches!(second, LoadOutcome::Ready { .. }));
    assert_eq!(tracker.awb().as_deref(), Some("NEW"));
}

#[tokio::test(start_paused = true)]
async fn reload_cancels_previous_animation() {
    let tracker = tracker(Arc::new(geocoder()));

    tracker.load(&record("A", fedex_timeline())).await;
    let mut old_frames = tracker.frames().unwrap();

    tracker.load(&record("B", fedex_timeline())).await;
    assert!(old_frames.changed().await.is_err());

    let mut new_frames = tracker.frames().unwrap();
    new_frames.changed().await.unwrap();
    assert!((new_frames.borrow().progress - 0.25).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn tracker_selection_freezes_marker() {
    let tracker = tracker(Arc::new(geocoder()));
    let LoadOutcome::Ready { checkpoints } =
        tracker.load(&record("A", fedex_timeline())).await
    else {
        panic!("expected checkpoints");
    };
    let mut frames = tracker.frames().unwrap();

    assert!(tracker.select(checkpoints[1].id));
    frames.changed().await.unwrap();
    let frame = frames.borrow_and_update().clone();
    assert_eq!(frame.position, Some(checkpoints[1].coordinates));
    assert_eq!(frame.viewport.map(|v| v.zoom), Some(6));

    tracker.deselect();
    frames.changed().await.unwrap();
    assert!(matches!(
        frames.borrow().state,
        AnimationState::Animating { current_index: 2 }
    ));
}
