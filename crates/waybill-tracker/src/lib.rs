pub mod animation;
pub mod dates;
pub mod error;
pub mod guard;
pub mod locations;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod resolve;
pub mod route;
pub mod session;

pub use animation::driver::{spawn_animation, AnimationHandle};
pub use animation::{
    bearing, current_index, interpolate, AnimationConfig, AnimationState, Frame, RouteAnimator,
    Viewport,
};
pub use dates::{event_timestamp, parse_event_date};
pub use error::TrackerError;
pub use guard::{Generation, StaleGuard};
pub use locations::{CityOverride, CountryCode, LocationTables};
pub use normalize::{
    classify_location, normalize_location, normalize_location_with, MatchRule, NormalizedLocation,
};
pub use pipeline::CheckpointPipeline;
pub use reconcile::{reconcile, reconcile_with_policy, OrderPolicy, Reconciled};
pub use resolve::{CheckpointResolver, EventRole, SamplingPolicy};
pub use route::{
    completed_route_line, curved_route, marker_status, route_center, route_line, MarkerStatus,
    DEFAULT_CURVE_POINTS,
};
pub use session::{LoadOutcome, ShipmentTracker};
