use std::io::{self, Read, Write};
use std::path::Path;

use serde::Deserialize;

use crate::compare::RecordedFlight;
use crate::dynamics::state::State;
use crate::errors::DatasetError;

/// Write a simulated trajectory as CSV.
///
/// Columns: time, x, y, vx, vy, mass, speed, altitude
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[State]) -> io::Result<()> {
    writeln!(writer, "time,x,y,vx,vy,mass,speed,altitude")?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            s.time,
            s.pos.x, s.pos.y,
            s.vel.x, s.vel.y,
            s.mass,
            s.speed(),
            s.altitude(),
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[State]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}

// ---------------------------------------------------------------------------
// Recorded flight input
// ---------------------------------------------------------------------------

/// The columns of a telemetry file the comparator needs. Other columns are
/// ignored.
#[derive(Debug, Deserialize)]
struct RecordedRow {
    #[serde(rename = "Time")]
    time: f64,
    #[serde(rename = "Altitude")]
    altitude: f64,
    #[serde(rename = "Total Velocity")]
    velocity: f64,
    #[serde(rename = "Displacement")]
    displacement: f64,
}

/// Read a recorded flight from telemetry CSV (the recorder's own format).
pub fn read_recorded_flight<R: Read>(reader: R) -> Result<RecordedFlight, DatasetError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize().collect::<Result<Vec<RecordedRow>, _>>()?;
    RecordedFlight::new(
        rows.iter().map(|r| r.time).collect(),
        rows.iter().map(|r| r.altitude).collect(),
        rows.iter().map(|r| r.velocity).collect(),
        rows.iter().map(|r| r.displacement).collect(),
    )
}

pub fn read_recorded_flight_file(path: impl AsRef<Path>) -> Result<RecordedFlight, DatasetError> {
    read_recorded_flight(std::fs::File::open(path)?)
}
