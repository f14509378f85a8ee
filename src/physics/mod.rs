pub mod aerodynamics;
pub mod atmosphere;
pub mod gravity;
pub mod thrust;

pub use aerodynamics::drag_magnitude;
pub use atmosphere::{air_density, Atmosphere};
pub use gravity::{gravitational_acceleration, Body};
pub use thrust::thrust_magnitude;
