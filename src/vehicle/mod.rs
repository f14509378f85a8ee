pub mod mission;
pub mod params;

pub use mission::{presets, MissionConfig};
pub use params::{PitchProgram, VehicleParams};
