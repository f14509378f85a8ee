use serde::{Deserialize, Serialize};

/// Fixed thresholds and timings of the staged ascent. Altitudes in metres
/// above mean sea level, times in seconds, angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceParams {
    pub turn_start_altitude: f64,
    pub turn_end_altitude: f64,
    /// Minimum change of the turn angle before a new pitch command is sent.
    pub turn_hysteresis_deg: f64,
    pub launch_heading_deg: f64,

    pub booster_resource: String,
    pub booster_resource_threshold: f64,

    pub las_altitude: f64,
    pub las_window: f64,
    pub las_pause: f64,
    /// When false, the LAS window is re-checked every tick with no guard and can
    /// jettison more than once if altitude re-enters the window.
    pub latch_las_window: bool,

    pub core_altitude: f64,
    pub core_window: f64,
    pub core_cutoff_pause: f64,
    pub second_stage_engine: String,
    pub second_stage_pulse: f64,
    pub coast_pause: f64,

    pub apoapsis_lead_time: f64,
    pub min_periapsis: f64,

    pub countdown_seconds: u32,
    pub tick_interval: f64,
}

impl Default for GuidanceParams {
    fn default() -> Self {
        Self {
            turn_start_altitude: 250.0,
            turn_end_altitude: 45_000.0,
            turn_hysteresis_deg: 0.5,
            launch_heading_deg: 90.0,

            booster_resource: "SolidFuel".into(),
            booster_resource_threshold: 400.0,

            las_altitude: 80_660.0,
            las_window: 1_000.0,
            las_pause: 1.0,
            latch_las_window: true,

            core_altitude: 82_000.0,
            core_window: 3_000.0,
            core_cutoff_pause: 1.0,
            second_stage_engine: "Inon-R-10B2 \"Eisorau\" Cryogenic Engine".into(),
            second_stage_pulse: 2.0,
            coast_pause: 210.0,

            apoapsis_lead_time: 15.0,
            min_periapsis: 135_000.0,

            countdown_seconds: 3,
            tick_interval: 0.1,
        }
    }
}

impl GuidanceParams {
    pub fn in_las_window(&self, altitude: f64) -> bool {
        altitude >= self.las_altitude && altitude < self.las_altitude + self.las_window
    }

    pub fn in_core_window(&self, altitude: f64) -> bool {
        altitude >= self.core_altitude && altitude < self.core_altitude + self.core_window
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.turn_end_altitude <= self.turn_start_altitude {
            return Err(format!(
                "turn window inverted: start {} >= end {}",
                self.turn_start_altitude, self.turn_end_altitude
            ));
        }
        let non_negative = [
            ("turn_hysteresis_deg", self.turn_hysteresis_deg),
            ("booster_resource_threshold", self.booster_resource_threshold),
            ("las_window", self.las_window),
            ("las_pause", self.las_pause),
            ("core_window", self.core_window),
            ("core_cutoff_pause", self.core_cutoff_pause),
            ("second_stage_pulse", self.second_stage_pulse),
            ("coast_pause", self.coast_pause),
            ("apoapsis_lead_time", self.apoapsis_lead_time),
            ("tick_interval", self.tick_interval),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }
        Ok(())
    }
}
