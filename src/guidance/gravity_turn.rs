use log::debug;

use super::params::GuidanceParams;

/// Autopilot attitude target, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCommand {
    pub pitch: f64,
    pub heading: f64,
}

/// Altitude-scheduled gravity turn: the turn angle grows linearly from 0 at
/// `turn_start_altitude` to 90 at `turn_end_altitude`. A new command is only
/// issued once the angle has moved by more than the hysteresis band.
#[derive(Debug, Clone)]
pub struct GravityTurn {
    start: f64,
    end: f64,
    hysteresis: f64,
    heading: f64,
    angle: f64,
}

impl GravityTurn {
    pub fn new(params: &GuidanceParams) -> Self {
        Self {
            start: params.turn_start_altitude,
            end: params.turn_end_altitude,
            hysteresis: params.turn_hysteresis_deg,
            heading: params.launch_heading_deg,
            angle: 0.0,
        }
    }

    /// Last commanded turn angle (deg from vertical).
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn update(&mut self, altitude: f64) -> Option<PitchCommand> {
        if !(self.start < altitude && altitude < self.end) {
            return None;
        }
        let frac = (altitude - self.start) / (self.end - self.start);
        let angle = frac * 90.0;
        if (angle - self.angle).abs() <= self.hysteresis {
            return None;
        }
        self.angle = angle;
        let cmd = PitchCommand { pitch: 90.0 - angle, heading: self.heading };
        debug!("gravity turn: alt={:.0} m pitch={:.2} deg", altitude, cmd.pitch);
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn turn() -> GravityTurn {
        GravityTurn::new(&GuidanceParams::default())
    }

    #[test]
    fn no_command_outside_window() {
        let mut t = turn();
        assert!(t.update(250.0).is_none());
        assert!(t.update(100.0).is_none());
        assert!(t.update(45_000.0).is_none());
        assert!(t.update(60_000.0).is_none());
    }

    #[test]
    fn halfway_is_forty_five_degrees() {
        let mut t = turn();
        let cmd = t.update(250.0 + (45_000.0 - 250.0) / 2.0).unwrap();
        assert_relative_eq!(cmd.pitch, 45.0, epsilon = 1e-9);
        assert_eq!(cmd.heading, 90.0);
    }

    #[test]
    fn sub_threshold_change_sends_nothing() {
        let mut t = turn();
        // 0.5 deg of turn is 248.6 m of altitude.
        let per_degree = (45_000.0 - 250.0) / 90.0;
        assert!(t.update(250.0 + 0.4 * per_degree).is_none());
        assert!(t.update(250.0 + 0.49 * per_degree).is_none());
        let first = t.update(250.0 + 0.6 * per_degree).unwrap();
        assert_relative_eq!(first.pitch, 89.4, epsilon = 1e-9);
        assert!(t.update(250.0 + 1.0 * per_degree).is_none());
        assert!(t.update(250.0 + 1.2 * per_degree).is_some());
    }

    #[test]
    fn descending_altitude_turns_back() {
        let mut t = turn();
        t.update(20_000.0).unwrap();
        let cmd = t.update(10_000.0).unwrap();
        assert!(cmd.pitch > 70.0);
    }
}
