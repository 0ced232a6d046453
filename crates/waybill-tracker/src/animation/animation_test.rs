use super::*;

fn cp(id: usize, lat: f64, lng: f64, completed: bool) -> Checkpoint {
    Checkpoint {
        id,
        status: format!("event {id}"),
        location: String::new(),
        date: String::new(),
        completed,
        coordinates: Coordinates::new(lat, lng),
        is_first: id == 0,
        is_last: false,
    }
}

fn route(completed: &[bool]) -> Vec<Checkpoint> {
    completed
        .iter()
        .enumerate()
        .map(|(i, done)| cp(i, 10.0 + i as f64, 20.0 + i as f64, *done))
        .collect()
}

fn fast_config() -> AnimationConfig {
    AnimationConfig::new(Duration::from_millis(1000), 4).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// -----------------------------------------------------------------------
// current_index
// -----------------------------------------------------------------------

#[test]
fn all_completed_animates_final_leg() {
    assert_eq!(current_index(&route(&[true; 7])), 5);
}

#[test]
fn partially_completed_sits_on_last_completed() {
    let flags = [true, true, true, false, false, false, false];
    assert_eq!(current_index(&route(&flags)), 2);
}

#[test]
fn nothing_completed_starts_at_origin() {
    assert_eq!(current_index(&route(&[false; 4])), 0);
}

#[test]
fn tiny_lists_never_underflow() {
    assert_eq!(current_index(&[]), 0);
    assert_eq!(current_index(&route(&[true])), 0);
}

#[test]
fn completion_flags_win_over_order() {
    // A later completed event after a pending one does not move the leg.
    assert_eq!(current_index(&route(&[true, false, true, true])), 0);
}

// -----------------------------------------------------------------------
// bearing / interpolate
// -----------------------------------------------------------------------

#[test]
fn bearing_to_self_is_zero() {
    let a = Coordinates::new(17.385, 78.4867);
    assert!(approx(bearing(a, a), 0.0));
}

#[test]
fn bearing_cardinal_directions() {
    let origin = Coordinates::new(0.0, 0.0);
    assert!(approx(bearing(origin, Coordinates::new(10.0, 0.0)), 0.0));
    assert!(approx(bearing(origin, Coordinates::new(0.0, 10.0)), 90.0));
    assert!(approx(bearing(origin, Coordinates::new(-10.0, 0.0)), 180.0));
    assert!(approx(bearing(origin, Coordinates::new(0.0, -10.0)), 270.0));
}

#[test]
fn bearing_north_at_high_latitude() {
    let b = bearing(Coordinates::new(40.0, -3.0), Coordinates::new(50.0, -3.0));
    assert!(b.abs() < 1e-6 || (360.0 - b).abs() < 1e-6, "{b}");
}

#[test]
fn bearing_with_non_finite_input_is_zero() {
    let a = Coordinates::new(f64::NAN, 0.0);
    assert!(approx(bearing(a, Coordinates::new(1.0, 1.0)), 0.0));
    assert!(approx(
        bearing(Coordinates::new(1.0, 1.0), Coordinates::new(0.0, f64::INFINITY)),
        0.0
    ));
}

#[test]
fn interpolate_endpoints_and_midpoint() {
    let a = Coordinates::new(0.0, 0.0);
    let b = Coordinates::new(10.0, -20.0);
    assert_eq!(interpolate(a, b, 0.0), a);
    assert_eq!(interpolate(a, b, 1.0), b);
    assert_eq!(interpolate(a, b, 0.5), Coordinates::new(5.0, -10.0));
}

// -----------------------------------------------------------------------
// AnimationConfig
// -----------------------------------------------------------------------

#[test]
fn config_rejects_zero_values() {
    assert!(matches!(
        AnimationConfig::new(Duration::ZERO, 10),
        Err(TrackerError::InvalidAnimationConfig(_))
    ));
    assert!(matches!(
        AnimationConfig::new(Duration::from_secs(1), 0),
        Err(TrackerError::InvalidAnimationConfig(_))
    ));
}

#[test]
fn default_config_ticks_every_33ms() {
    let config = AnimationConfig::default();
    assert_eq!(config.steps(), 120);
    assert_eq!(config.tick_interval(), Duration::from_millis(4000) / 120);
}

// -----------------------------------------------------------------------
// RouteAnimator
// -----------------------------------------------------------------------

#[test]
fn empty_list_is_idle() {
    let mut animator = RouteAnimator::new(Vec::new(), fast_config());
    assert_eq!(animator.state(), AnimationState::Idle);
    let frame = animator.tick();
    assert_eq!(frame.position, None);
    assert_eq!(frame.viewport, None);
    assert_eq!(frame.current_index, None);
    assert!(!animator.select(0));
}

#[test]
fn first_frame_sits_on_current_checkpoint() {
    let checkpoints = route(&[true, true, false]);
    let animator = RouteAnimator::new(checkpoints.clone(), fast_config());

    let frame = animator.frame();
    assert_eq!(
        frame.state,
        AnimationState::Animating { current_index: 1 }
    );
    assert_eq!(frame.position, Some(checkpoints[1].coordinates));
    assert!(approx(frame.progress, 0.0));
    assert_eq!(
        frame.viewport,
        Some(Viewport {
            center: checkpoints[1].coordinates.as_pair(),
            zoom: ANIMATING_ZOOM
        })
    );
    assert!(approx(
        frame.bearing,
        bearing(checkpoints[1].coordinates, checkpoints[2].coordinates)
    ));
}

#[test]
fn ticks_interpolate_and_loop_forever() {
    let checkpoints = route(&[true, false]);
    let mut animator = RouteAnimator::new(checkpoints.clone(), fast_config());
    let (a, b) = (checkpoints[0].coordinates, checkpoints[1].coordinates);

    let frame = animator.tick();
    assert!(approx(frame.progress, 0.25));
    assert_eq!(frame.position, Some(interpolate(a, b, 0.25)));

    animator.tick();
    animator.tick();
    let frame = animator.tick();
    assert!(approx(frame.progress, 0.0));
    assert_eq!(frame.position, Some(a));

    let frame = animator.tick();
    assert!(approx(frame.progress, 0.25));
}

#[test]
fn single_checkpoint_rests_with_zero_bearing() {
    let checkpoints = route(&[true]);
    let mut animator = RouteAnimator::new(checkpoints.clone(), fast_config());
    assert!(!animator.is_moving());

    let frame = animator.tick();
    assert_eq!(frame.position, Some(checkpoints[0].coordinates));
    assert!(approx(frame.bearing, 0.0));
    assert!(approx(frame.progress, 0.0));
}

#[test]
fn select_freezes_on_checkpoint_and_zooms_in() {
    let checkpoints = route(&[true, true, false, false]);
    let mut animator = RouteAnimator::new(checkpoints.clone(), fast_config());
    animator.tick();

    assert!(animator.select(3));
    let frozen = animator.tick();
    assert_eq!(frozen.state, AnimationState::Selected { checkpoint_id: 3 });
    assert_eq!(frozen.position, Some(checkpoints[3].coordinates));
    assert_eq!(frozen.selected_index, Some(3));
    assert_eq!(frozen.viewport.map(|v| v.zoom), Some(SELECTED_ZOOM));
    assert!(approx(frozen.progress, 0.25));
    assert_eq!(animator.tick(), frozen);
}

#[test]
fn select_uses_ids_not_positions() {
    let mut checkpoints = route(&[true, true, false]);
    checkpoints[1].id = 6;
    checkpoints[2].id = 7;
    let mut animator = RouteAnimator::new(checkpoints.clone(), fast_config());

    assert!(!animator.select(2));
    assert!(animator.select(6));
    let frame = animator.frame();
    assert_eq!(frame.selected_index, Some(1));
    assert_eq!(frame.position, Some(checkpoints[1].coordinates));
}

#[test]
fn deselect_restarts_current_leg() {
    let checkpoints = route(&[true, false, false]);
    let mut animator = RouteAnimator::new(checkpoints.clone(), fast_config());
    animator.tick();
    animator.select(2);
    animator.deselect();

    let frame = animator.frame();
    assert_eq!(frame.state, AnimationState::Animating { current_index: 0 });
    assert_eq!(frame.selected_index, None);
    assert!(approx(frame.progress, 0.0));
    assert_eq!(frame.position, Some(checkpoints[0].coordinates));
}

#[test]
fn deselect_while_animating_does_nothing() {
    let mut animator = RouteAnimator::new(route(&[true, false]), fast_config());
    animator.tick();
    animator.deselect();
    assert!(approx(animator.progress(), 0.25));
}

#[test]
fn frame_serializes_for_renderers() {
    let animator = RouteAnimator::new(route(&[true, false]), fast_config());
    let value = serde_json::to_value(animator.frame()).unwrap();
    assert_eq!(value["state"]["kind"], "animating");
    assert_eq!(value["state"]["currentIndex"], 0);
    assert_eq!(value["currentIndex"], 0);
    assert_eq!(value["viewport"]["zoom"], 5);
}

#[test]
fn selected_state_uses_camel_case_keys() {
    let mut animator = RouteAnimator::new(route(&[true, false]), fast_config());
    assert!(animator.select(1));
    let value = serde_json::to_value(animator.frame()).unwrap();
    assert_eq!(value["state"]["kind"], "selected");
    assert_eq!(value["state"]["checkpointId"], 1);
    assert!(value["state"].get("checkpoint_id").is_none());
    assert_eq!(value["selectedIndex"], 1);
}
