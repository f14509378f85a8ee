use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::dynamics::state::State;
use crate::orbital::OrbitSummary;
use crate::physics::air_density;
use crate::vehicle::MissionConfig;

/// Summary statistics computed from a simulated ascent.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub max_altitude_m: f64,
    pub max_altitude_time: f64,
    pub max_speed: f64,
    /// Peak dynamic pressure (Pa) and when it occurs.
    pub max_q: f64,
    pub max_q_time: f64,
    pub burnout_time: f64,
    pub burnout_altitude_m: f64,
    pub burnout_downrange_m: f64,
    pub burnout_speed: f64,
    pub final_mass: f64,
    /// Coasting orbit from the burnout state.
    pub orbit: OrbitSummary,
}

impl FlightSummary {
    /// `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &[State], config: &MissionConfig) -> Option<Self> {
        let last = trajectory.last()?;
        let burnout = trajectory
            .iter()
            .rev()
            .find(|s| s.time <= config.vehicle.burn_time)
            .unwrap_or(last);

        let peak = trajectory
            .iter()
            .max_by(|a, b| a.altitude().total_cmp(&b.altitude()))?;

        let max_speed = trajectory
            .iter()
            .map(|s| s.speed())
            .fold(0.0_f64, f64::max);

        let (max_q, max_q_time) = trajectory
            .iter()
            .map(|s| (0.5 * air_density(&config.atmosphere, s.altitude()) * s.speed().powi(2), s.time))
            .fold((0.0_f64, 0.0_f64), |best, q| if q.0 > best.0 { q } else { best });

        Some(FlightSummary {
            max_altitude_m: peak.altitude(),
            max_altitude_time: peak.time,
            max_speed,
            max_q,
            max_q_time,
            burnout_time: burnout.time,
            burnout_altitude_m: burnout.altitude(),
            burnout_downrange_m: burnout.downrange(),
            burnout_speed: burnout.speed(),
            final_mass: last.mass,
            orbit: OrbitSummary::from_state(burnout, &config.body),
        })
    }
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    mission: &'a str,
    performance: &'a FlightSummary,
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    config: &MissionConfig,
    summary: &FlightSummary,
) -> io::Result<()> {
    let doc = SummaryDocument { mission: &config.name, performance: summary };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    config: &MissionConfig,
    summary: &FlightSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, config, summary)
}
