use crate::vehicle::VehicleParams;

/// Quadratic drag magnitude (N) for the vehicle at `speed` (m/s) in air of
/// `density` (kg/m^3).
///
/// Only the magnitude is modeled. The point-mass dynamics apply it along the
/// thrust axis, not against the velocity vector.
pub fn drag_magnitude(vehicle: &VehicleParams, density: f64, speed: f64) -> f64 {
    0.5 * vehicle.drag_coefficient * vehicle.reference_area * density * speed * speed
}
