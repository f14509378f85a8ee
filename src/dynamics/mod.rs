pub mod point_mass;
pub mod state;

pub use point_mass::{derivatives, AscentDynamics, ForceBreakdown};
pub use state::{Deriv, SimConfig, State, StateVector};
