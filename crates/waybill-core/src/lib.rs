pub mod app_config;
pub mod config;
pub mod error;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use types::{
    Checkpoint, Coordinates, LooseNumber, RawEvent, RouteCoordinates, RouteEndpoints,
    ShipmentRecord, WirePoint,
};
