pub mod controller;
pub mod gravity_turn;
pub mod latch;
pub mod link;
pub mod params;
pub mod runner;
pub mod scripted;
pub mod sequence;

pub use controller::{AscentController, GuidanceEvent, TickOutcome};
pub use latch::Latch;
pub use link::{EngineInfo, SurfaceVelocity, VehicleLink};
pub use params::GuidanceParams;
pub use runner::{run_ascent, Clock, MissionReport, NullClock, RealClock};
pub use scripted::{ScriptFrame, ScriptedVehicle, VehicleCommand};
