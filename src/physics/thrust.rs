use crate::vehicle::VehicleParams;

/// Commanded thrust (N) at `elapsed` seconds after ignition.
///
/// Linear ramp from `initial_thrust` to `final_thrust` over the burn, then a hard
/// cut to zero. The drop at burnout is a real step and must stay one; the
/// integrator places a step boundary there.
pub fn thrust_magnitude(vehicle: &VehicleParams, elapsed: f64) -> f64 {
    if !(0.0..=vehicle.burn_time).contains(&elapsed) {
        return 0.0;
    }
    let ramp = (vehicle.final_thrust - vehicle.initial_thrust) / vehicle.burn_time;
    vehicle.initial_thrust + ramp * elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_of_the_ramp() {
        let v = VehicleParams::default();
        assert_eq!(thrust_magnitude(&v, 0.0), v.initial_thrust);
        assert!((thrust_magnitude(&v, v.burn_time) - v.final_thrust).abs() < 1e-6);
    }

    #[test]
    fn ramp_is_linear() {
        let v = VehicleParams::default();
        let slope = (v.final_thrust - v.initial_thrust) / v.burn_time;
        for i in 0..=27 {
            let t = i as f64 * 5.0;
            let expected = v.initial_thrust + slope * t;
            assert!((thrust_magnitude(&v, t) - expected).abs() < 1e-6, "t={}", t);
        }
        // Equal steps give equal increments.
        let d1 = thrust_magnitude(&v, 20.0) - thrust_magnitude(&v, 10.0);
        let d2 = thrust_magnitude(&v, 110.0) - thrust_magnitude(&v, 100.0);
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn zero_after_burnout() {
        let v = VehicleParams::default();
        assert_eq!(thrust_magnitude(&v, v.burn_time + 1e-9), 0.0);
        assert_eq!(thrust_magnitude(&v, v.burn_time + 50.0), 0.0);
        assert_eq!(thrust_magnitude(&v, -1.0), 0.0);
    }
}
