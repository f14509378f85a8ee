use std::time::Duration;

use log::info;
use serde::Serialize;

use crate::errors::GuidanceError;
use crate::telemetry::TelemetrySink;

use super::controller::{AscentController, GuidanceEvent, TickOutcome};
use super::link::VehicleLink;
use super::params::GuidanceParams;

// ---------------------------------------------------------------------------
// Loop clock
// ---------------------------------------------------------------------------

/// Paces the control loop in wall-clock time.
pub trait Clock {
    fn sleep(&mut self, seconds: f64);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealClock;

impl Clock for RealClock {
    fn sleep(&mut self, seconds: f64) {
        if seconds > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(seconds));
        }
    }
}

/// Returns immediately, keeping a tally of the time it was asked to sleep.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClock {
    pub slept: f64,
}

impl Clock for NullClock {
    fn sleep(&mut self, seconds: f64) {
        self.slept += seconds;
    }
}

// ---------------------------------------------------------------------------
// Ascent loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MissionReport {
    pub ticks: usize,
    /// Mission time at the final tick, s after launch.
    pub elapsed: f64,
    pub events: Vec<(f64, GuidanceEvent)>,
}

impl MissionReport {
    pub fn count(&self, pred: impl Fn(&GuidanceEvent) -> bool) -> usize {
        self.events.iter().filter(|(_, e)| pred(e)).count()
    }
}

/// Launch and fly until the target periapsis is reached. Any link disconnect
/// or recorder failure ends the run with an error.
pub fn run_ascent(
    params: &GuidanceParams,
    link: &mut dyn VehicleLink,
    clock: &mut dyn Clock,
    sink: &mut dyn TelemetrySink,
) -> Result<MissionReport, GuidanceError> {
    let mut ctl = AscentController::new(params.clone());
    ctl.launch(link, clock)?;
    loop {
        if ctl.tick(link, sink)? == TickOutcome::OrbitReached {
            break;
        }
        clock.sleep(params.tick_interval);
    }
    info!("ascent complete after {} ticks ({:.1} s)", ctl.ticks(), ctl.elapsed());
    Ok(MissionReport { ticks: ctl.ticks(), elapsed: ctl.elapsed(), events: ctl.into_events() })
}
