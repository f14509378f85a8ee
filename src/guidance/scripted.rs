use std::io::Read;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::errors::{DatasetError, LinkError};

use super::link::{EngineInfo, SurfaceVelocity, VehicleLink};

/// Readings the vehicle reports during one tick of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptFrame {
    pub time: f64,
    pub altitude: f64,
    pub apoapsis: f64,
    pub periapsis: f64,
    pub time_to_apoapsis: f64,
    pub solid_fuel: f64,
    pub vertical_speed: f64,
    pub horizontal_speed: f64,
    pub speed: f64,
    pub drag_x: f64,
    pub drag_y: f64,
    pub drag_z: f64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
    pub air_temperature: Option<f64>,
    pub thrust: f64,
}

impl Default for ScriptFrame {
    fn default() -> Self {
        Self {
            time: 0.0,
            altitude: 93.0,
            apoapsis: 0.0,
            periapsis: -600_000.0,
            time_to_apoapsis: 60.0,
            solid_fuel: 10_000.0,
            vertical_speed: 0.0,
            horizontal_speed: 0.0,
            speed: 0.0,
            drag_x: 0.0,
            drag_y: 0.0,
            drag_z: 0.0,
            pos_x: 600_093.0,
            pos_y: 0.0,
            pos_z: 0.0,
            air_temperature: None,
            thrust: 0.0,
        }
    }
}

/// Commands received by a scripted vehicle, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleCommand {
    Throttle(f64),
    EngageAutopilot,
    PitchHeading(f64, f64),
    Roll(f64),
    NextStage,
    EngineActive(String),
}

/// A vehicle that replays a fixed script of readings and logs every command.
///
/// Each `mission_time` read moves to the next frame; all other readings come
/// from the current frame. Reading past the last frame reports a disconnect.
#[derive(Debug, Clone)]
pub struct ScriptedVehicle {
    frames: Vec<ScriptFrame>,
    cursor: Option<usize>,
    pub engines: Vec<EngineInfo>,
    pub commands: Vec<VehicleCommand>,
}

impl ScriptedVehicle {
    pub fn new(frames: Vec<ScriptFrame>) -> Self {
        Self { frames, cursor: None, engines: default_engines(), commands: Vec::new() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let frames = rdr.deserialize().collect::<Result<Vec<ScriptFrame>, _>>()?;
        Ok(Self::new(frames))
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn frames(&self) -> &[ScriptFrame] {
        &self.frames
    }

    pub fn stage_count(&self) -> usize {
        self.commands.iter().filter(|c| **c == VehicleCommand::NextStage).count()
    }

    pub fn pitch_commands(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match *c {
                VehicleCommand::PitchHeading(p, h) => Some((p, h)),
                _ => None,
            })
            .collect()
    }

    pub fn last_throttle(&self) -> Option<f64> {
        self.commands.iter().rev().find_map(|c| match *c {
            VehicleCommand::Throttle(t) => Some(t),
            _ => None,
        })
    }

    fn frame(&self) -> Result<&ScriptFrame, LinkError> {
        self.frames
            .get(self.cursor.unwrap_or(0))
            .ok_or_else(|| LinkError::Disconnected("replay script is empty".into()))
    }
}

fn default_engines() -> Vec<EngineInfo> {
    let engine = |title: &str, max_vacuum_thrust: f64| EngineInfo { title: title.into(), max_vacuum_thrust };
    vec![
        engine("Core Stage Engine", 2_320_000.0),
        engine("Core Stage Engine", 2_320_000.0),
        engine("Core Stage Engine", 2_320_000.0),
        engine("Core Stage Engine", 2_320_000.0),
        engine("Solid Rocket Booster", 1_680_000.0),
        engine("Solid Rocket Booster", 1_680_000.0),
        engine("Inon-R-10B2 \"Eisorau\" Cryogenic Engine", 110_000.0),
    ]
}

impl VehicleLink for ScriptedVehicle {
    fn mission_time(&mut self) -> Result<f64, LinkError> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.frames.len() {
            return Err(LinkError::Disconnected(format!(
                "replay script exhausted after {} frames",
                self.frames.len()
            )));
        }
        self.cursor = Some(next);
        Ok(self.frames[next].time)
    }

    fn mean_altitude(&mut self) -> Result<f64, LinkError> {
        Ok(self.frame()?.altitude)
    }

    fn apoapsis(&mut self) -> Result<f64, LinkError> {
        Ok(self.frame()?.apoapsis)
    }

    fn periapsis(&mut self) -> Result<f64, LinkError> {
        Ok(self.frame()?.periapsis)
    }

    fn time_to_apoapsis(&mut self) -> Result<f64, LinkError> {
        Ok(self.frame()?.time_to_apoapsis)
    }

    fn resource_amount(&mut self, name: &str) -> Result<f64, LinkError> {
        match name {
            "SolidFuel" => Ok(self.frame()?.solid_fuel),
            _ => Err(LinkError::Unavailable("resource")),
        }
    }

    fn surface_velocity(&mut self) -> Result<SurfaceVelocity, LinkError> {
        let f = self.frame()?;
        Ok(SurfaceVelocity { vertical: f.vertical_speed, horizontal: f.horizontal_speed, speed: f.speed })
    }

    fn drag(&mut self) -> Result<Vector3<f64>, LinkError> {
        let f = self.frame()?;
        Ok(Vector3::new(f.drag_x, f.drag_y, f.drag_z))
    }

    fn position(&mut self) -> Result<Vector3<f64>, LinkError> {
        let f = self.frame()?;
        Ok(Vector3::new(f.pos_x, f.pos_y, f.pos_z))
    }

    fn air_temperature(&mut self) -> Result<f64, LinkError> {
        self.frame()?.air_temperature.ok_or(LinkError::Unavailable("static air temperature"))
    }

    fn thrust(&mut self) -> Result<f64, LinkError> {
        Ok(self.frame()?.thrust)
    }

    fn engines(&mut self) -> Result<Vec<EngineInfo>, LinkError> {
        Ok(self.engines.clone())
    }

    fn set_throttle(&mut self, throttle: f64) -> Result<(), LinkError> {
        self.commands.push(VehicleCommand::Throttle(throttle));
        Ok(())
    }

    fn engage_autopilot(&mut self) -> Result<(), LinkError> {
        self.commands.push(VehicleCommand::EngageAutopilot);
        Ok(())
    }

    fn set_pitch_heading(&mut self, pitch_deg: f64, heading_deg: f64) -> Result<(), LinkError> {
        self.commands.push(VehicleCommand::PitchHeading(pitch_deg, heading_deg));
        Ok(())
    }

    fn set_roll(&mut self, roll_deg: f64) -> Result<(), LinkError> {
        self.commands.push(VehicleCommand::Roll(roll_deg));
        Ok(())
    }

    fn activate_next_stage(&mut self) -> Result<(), LinkError> {
        self.commands.push(VehicleCommand::NextStage);
        Ok(())
    }

    fn set_engine_active(&mut self, title: &str) -> Result<(), LinkError> {
        if !self.engines.iter().any(|e| e.title == title) {
            return Err(LinkError::Unavailable("engine"));
        }
        self.commands.push(VehicleCommand::EngineActive(title.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_advance_on_time_reads() {
        let frames = vec![
            ScriptFrame { time: 0.0, altitude: 93.0, ..ScriptFrame::default() },
            ScriptFrame { time: 0.1, altitude: 110.0, ..ScriptFrame::default() },
        ];
        let mut v = ScriptedVehicle::new(frames);
        assert_eq!(v.mean_altitude().unwrap(), 93.0);
        assert_eq!(v.mission_time().unwrap(), 0.0);
        assert_eq!(v.mission_time().unwrap(), 0.1);
        assert_eq!(v.mean_altitude().unwrap(), 110.0);
        assert!(matches!(v.mission_time(), Err(LinkError::Disconnected(_))));
    }

    #[test]
    fn script_loads_from_csv_with_missing_columns() {
        let text = "time,altitude,periapsis,air_temperature\n0.0,93,-500000,288.1\n0.1,95,-499000,\n";
        let mut v = ScriptedVehicle::from_reader(text.as_bytes()).unwrap();
        assert_eq!(v.frames().len(), 2);
        v.mission_time().unwrap();
        assert_eq!(v.air_temperature().unwrap(), 288.1);
        assert_eq!(v.time_to_apoapsis().unwrap(), ScriptFrame::default().time_to_apoapsis);
        v.mission_time().unwrap();
        assert!(matches!(v.air_temperature(), Err(LinkError::Unavailable(_))));
        assert_eq!(v.periapsis().unwrap(), -499_000.0);
    }

    #[test]
    fn unknown_engine_cannot_be_activated() {
        let mut v = ScriptedVehicle::new(vec![ScriptFrame::default()]);
        assert!(v.set_engine_active("Warp Drive").is_err());
        assert!(v.commands.is_empty());
    }
}
