//! `track`, `resolve` and `animate` command handlers.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use waybill_carrier::{Provider, TrackingClient};
use waybill_core::{AppConfig, Checkpoint, ShipmentRecord};
use waybill_tracker::{
    completed_route_line, current_index, curved_route, marker_status, route_center, route_line,
    AnimationConfig, CheckpointPipeline, LoadOutcome, MarkerStatus, ShipmentTracker,
    DEFAULT_CURVE_POINTS,
};

use crate::geocoder::build_resolver;

/// Everything a map view needs for one shipment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteView<'a> {
    awb: &'a str,
    status: &'a str,
    checkpoints: &'a [Checkpoint],
    current_index: Option<usize>,
    markers: Vec<MarkerStatus>,
    route_line: Vec<[f64; 2]>,
    completed_route_line: Vec<[f64; 2]>,
    overview_route: Vec<[f64; 2]>,
    center: Option<[f64; 2]>,
}

impl<'a> RouteView<'a> {
    fn new(record: &'a ShipmentRecord, checkpoints: &'a [Checkpoint]) -> Self {
        let current = (!checkpoints.is_empty()).then(|| current_index(checkpoints));
        let endpoints = record.endpoints();
        Self {
            awb: &record.awb,
            status: &record.status,
            checkpoints,
            current_index: current,
            markers: (0..checkpoints.len())
                .map(|i| marker_status(checkpoints, i, current.unwrap_or_default()))
                .collect(),
            route_line: route_line(checkpoints),
            completed_route_line: current
                .map(|c| completed_route_line(checkpoints, c))
                .unwrap_or_default(),
            overview_route: endpoints
                .map(|e| curved_route(e.origin, e.destination, DEFAULT_CURVE_POINTS))
                .unwrap_or_default(),
            center: endpoints.map(|e| route_center(e.origin, e.destination).as_pair()),
        }
    }
}

pub(crate) fn read_record(path: &Path) -> anyhow::Result<ShipmentRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shipment record {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid shipment record", path.display()))
}

async fn resolve_and_print(config: &AppConfig, record: &ShipmentRecord) -> anyhow::Result<()> {
    let pipeline = CheckpointPipeline::new(build_resolver(config)?);
    let checkpoints = pipeline.run(record).await;
    if checkpoints.is_empty() {
        tracing::warn!(awb = %record.awb, "no tracking data available");
    }

    let view = RouteView::new(record, &checkpoints);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// Fetch a shipment from the tracking endpoint and print its resolved route.
///
/// # Errors
///
/// Returns an error if the tracking request fails. Geocoding failures only
/// drop individual checkpoints.
pub(crate) async fn run_track(
    config: &AppConfig,
    awb: &str,
    provider: Provider,
) -> anyhow::Result<()> {
    let client = TrackingClient::new(&config.tracking_api_url, config.tracking_timeout_secs)
        .context("failed to build tracking client")?;
    let record = client.track(awb, provider).await?;
    resolve_and_print(config, &record).await
}

pub(crate) async fn run_resolve(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let record = read_record(file)?;
    resolve_and_print(config, &record).await
}

/// Load a shipment into a tracker and print `frames` animation frames, one
/// JSON object per line, as the animation task publishes them.
pub(crate) async fn run_animate(
    config: &AppConfig,
    file: &Path,
    frames: usize,
    select: Option<usize>,
) -> anyhow::Result<()> {
    let record = read_record(file)?;
    let tracker = ShipmentTracker::new(
        CheckpointPipeline::new(build_resolver(config)?),
        AnimationConfig::from_app_config(config)?,
    );

    match tracker.load(&record).await {
        LoadOutcome::Ready { checkpoints } => {
            tracing::info!(awb = %record.awb, checkpoints = checkpoints.len(), "animating");
        }
        LoadOutcome::NoData => anyhow::bail!("no tracking data available for {}", record.awb),
        LoadOutcome::Superseded => anyhow::bail!("lookup for {} was superseded", record.awb),
    }

    let mut feed = tracker
        .frames()
        .context("animation stopped before producing frames")?;

    if let Some(id) = select {
        anyhow::ensure!(
            tracker.checkpoints().iter().any(|cp| cp.id == id),
            "no checkpoint with id {id}"
        );
        tracker.select(id);
        // A frozen marker publishes exactly one frame.
        feed.changed()
            .await
            .context("animation stopped before applying the selection")?;
        println!("{}", serde_json::to_string(&*feed.borrow_and_update())?);
        tracker.clear();
        return Ok(());
    }

    println!("{}", serde_json::to_string(&*feed.borrow_and_update())?);
    // A single checkpoint has no leg to animate along.
    let remaining = if tracker.checkpoints().len() > 1 {
        frames.saturating_sub(1)
    } else {
        0
    };
    for _ in 0..remaining {
        feed.changed()
            .await
            .context("animation stopped before producing frames")?;
        println!("{}", serde_json::to_string(&*feed.borrow_and_update())?);
    }

    tracker.clear();
    Ok(())
}
