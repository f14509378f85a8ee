pub mod event;
pub mod integrator;
pub mod runner;

pub use event::{detect_events, EventKind, SimEvent};
pub use integrator::{DormandPrince, IntegratorOptions, OdeSystem};
pub use runner::{simulate, simulate_on, time_grid};
