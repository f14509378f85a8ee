pub mod compare;
pub mod dynamics;
pub mod errors;
pub mod guidance;
pub mod io;
pub mod orbital;
pub mod physics;
pub mod sim;
pub mod telemetry;
pub mod vehicle;

pub use errors::{ConfigError, DatasetError, GuidanceError, LinkError, RecorderError, SimError};
pub use vehicle::MissionConfig;
