use log::{debug, info, warn};
use nalgebra::Vector3;
use serde::Serialize;

use crate::errors::{GuidanceError, LinkError};
use crate::telemetry::{TelemetrySample, TelemetrySink};

use super::gravity_turn::GravityTurn;
use super::latch::Latch;
use super::link::VehicleLink;
use super::params::GuidanceParams;
use super::runner::Clock;
use super::sequence::{Poll, StagingAction, StagingSequence};

// ---------------------------------------------------------------------------
// Events and outcomes
// ---------------------------------------------------------------------------

/// Irreversible things the controller did, in the order it did them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GuidanceEvent {
    Liftoff { thrust: f64, vacuum_thrust: f64 },
    BoosterJettison,
    LasJettison,
    CoreSeparation,
    EngineActivated(String),
    /// Recovered: the ascent continues without the engine.
    EngineNotFound(String),
    OrbitReached { apoapsis: f64, periapsis: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Continue,
    OrbitReached,
}

// ---------------------------------------------------------------------------
// Ascent controller
// ---------------------------------------------------------------------------

/// Staged ascent state machine. Four latches gate the one-shot transitions;
/// the gravity turn and the apoapsis throttle-up run every tick.
pub struct AscentController {
    params: GuidanceParams,
    turn: GravityTurn,
    boosters: Latch,
    las: Latch,
    core_stage: Latch,
    orbit: Latch,
    active: Option<StagingSequence>,
    throttle: f64,
    start_time: f64,
    elapsed: f64,
    initial_position: Vector3<f64>,
    vacuum_thrust: f64,
    events: Vec<(f64, GuidanceEvent)>,
    ticks: usize,
}

impl AscentController {
    pub fn new(params: GuidanceParams) -> Self {
        Self {
            turn: GravityTurn::new(&params),
            params,
            boosters: Latch::Pending,
            las: Latch::Pending,
            core_stage: Latch::Pending,
            orbit: Latch::Pending,
            active: None,
            throttle: 0.0,
            start_time: 0.0,
            elapsed: 0.0,
            initial_position: Vector3::zeros(),
            vacuum_thrust: 0.0,
            events: Vec::new(),
            ticks: 0,
        }
    }

    pub fn params(&self) -> &GuidanceParams { &self.params }
    pub fn throttle(&self) -> f64 { self.throttle }
    pub fn turn_angle(&self) -> f64 { self.turn.angle() }
    pub fn elapsed(&self) -> f64 { self.elapsed }
    pub fn ticks(&self) -> usize { self.ticks }
    pub fn events(&self) -> &[(f64, GuidanceEvent)] { &self.events }
    pub fn boosters(&self) -> Latch { self.boosters }
    pub fn las(&self) -> Latch { self.las }
    pub fn core_stage(&self) -> Latch { self.core_stage }
    pub fn orbit(&self) -> Latch { self.orbit }

    /// Staging sequence currently running, if any.
    pub fn active_sequence(&self) -> Option<&'static str> {
        self.active.as_ref().map(|s| s.name)
    }

    pub fn into_events(self) -> Vec<(f64, GuidanceEvent)> {
        self.events
    }

    /// Pad setup, countdown and first-stage ignition.
    pub fn launch(&mut self, link: &mut dyn VehicleLink, clock: &mut dyn Clock) -> Result<(), GuidanceError> {
        self.set_throttle(link, 1.0)?;
        link.engage_autopilot()?;
        link.set_pitch_heading(90.0, self.params.launch_heading_deg)?;
        link.set_roll(0.0)?;

        self.start_time = link.mission_time()?;
        self.initial_position = link.position()?;

        for n in (1..=self.params.countdown_seconds).rev() {
            info!("{}...", n);
            clock.sleep(1.0);
        }
        info!("Liftoff!");
        link.activate_next_stage()?;

        let thrust = link.thrust()?;
        self.vacuum_thrust = link.engines()?.iter().map(|e| e.max_vacuum_thrust).sum();
        info!(
            "initial thrust {:.0} N, vacuum thrust {:.0} N",
            thrust, self.vacuum_thrust
        );
        self.events.push((0.0, GuidanceEvent::Liftoff { thrust, vacuum_thrust: self.vacuum_thrust }));
        Ok(())
    }

    /// One control tick: transitions, then a telemetry sample, then the
    /// termination check. While a staging hold is pending only the sample is
    /// taken.
    pub fn tick(
        &mut self,
        link: &mut dyn VehicleLink,
        sink: &mut dyn TelemetrySink,
    ) -> Result<TickOutcome, GuidanceError> {
        self.ticks += 1;
        self.elapsed = link.mission_time()? - self.start_time;
        let now = self.elapsed;
        let altitude = link.mean_altitude()?;

        let holding = self.run_sequence(now, link)?;
        if !holding {
            self.transitions(now, altitude, link)?;
        }

        let sample = self.sample(now, altitude, link)?;
        sink.append(&sample)?;

        // A sequence started this tick may have entered its first hold.
        if holding || self.active.is_some() {
            return Ok(TickOutcome::Continue);
        }
        self.check_orbit(now, link)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn transitions(&mut self, now: f64, altitude: f64, link: &mut dyn VehicleLink) -> Result<(), GuidanceError> {
        if let Some(cmd) = self.turn.update(altitude) {
            link.set_pitch_heading(cmd.pitch, cmd.heading)?;
        }

        if !self.boosters.is_fired()
            && link.resource_amount(&self.params.booster_resource)? < self.params.booster_resource_threshold
        {
            self.boosters.fire(now);
            link.activate_next_stage()?;
            info!("booster jettison at t={:.1} s", now);
            self.events.push((now, GuidanceEvent::BoosterJettison));
        }

        if self.params.in_las_window(altitude) {
            let fresh = self.las.fire(now);
            if fresh || !self.params.latch_las_window {
                info!("LAS jettison at t={:.1} s, alt={:.0} m", now, altitude);
                self.events.push((now, GuidanceEvent::LasJettison));
                self.start_sequence(StagingSequence::las_jettison(&self.params), now, link)?;
                if self.active.is_some() {
                    return Ok(());
                }
            }
        }

        if self.params.in_core_window(altitude) && self.core_stage.fire(now) {
            info!("core stage separation at t={:.1} s, alt={:.0} m", now, altitude);
            self.events.push((now, GuidanceEvent::CoreSeparation));
            self.start_sequence(StagingSequence::core_separation(&self.params), now, link)?;
            if self.active.is_some() {
                return Ok(());
            }
        }

        if link.time_to_apoapsis()? < self.params.apoapsis_lead_time {
            debug!("t={:.1} s: approaching apoapsis, throttle up", now);
            self.set_throttle(link, 1.0)?;
        }
        Ok(())
    }

    fn check_orbit(&mut self, now: f64, link: &mut dyn VehicleLink) -> Result<TickOutcome, GuidanceError> {
        if self.orbit.is_fired() {
            return Ok(TickOutcome::OrbitReached);
        }
        let periapsis = link.periapsis()?;
        if periapsis > self.params.min_periapsis && self.orbit.fire(now) {
            self.set_throttle(link, 0.0)?;
            let apoapsis = link.apoapsis()?;
            info!(
                "orbit reached at t={:.1} s: apoapsis {:.0} m, periapsis {:.0} m",
                now, apoapsis, periapsis
            );
            self.events.push((now, GuidanceEvent::OrbitReached { apoapsis, periapsis }));
            return Ok(TickOutcome::OrbitReached);
        }
        Ok(TickOutcome::Continue)
    }

    // -----------------------------------------------------------------------
    // Staging sequences
    // -----------------------------------------------------------------------

    fn start_sequence(&mut self, seq: StagingSequence, now: f64, link: &mut dyn VehicleLink) -> Result<(), GuidanceError> {
        self.active = Some(seq);
        self.run_sequence(now, link).map(|_| ())
    }

    /// Drive the active sequence as far as it can go at `now`. Returns true
    /// while it is holding.
    fn run_sequence(&mut self, now: f64, link: &mut dyn VehicleLink) -> Result<bool, GuidanceError> {
        let Some(mut seq) = self.active.take() else {
            return Ok(false);
        };
        loop {
            match seq.poll(now) {
                Poll::Act(action) => self.execute(action, now, link)?,
                Poll::Wait => {
                    self.active = Some(seq);
                    return Ok(true);
                }
                Poll::Done => {
                    debug!("{} complete at t={:.1} s", seq.name, now);
                    return Ok(false);
                }
            }
        }
    }

    fn execute(&mut self, action: StagingAction, now: f64, link: &mut dyn VehicleLink) -> Result<(), GuidanceError> {
        match action {
            StagingAction::Throttle(level) => self.set_throttle(link, level)?,
            StagingAction::NextStage => link.activate_next_stage()?,
            StagingAction::ActivateEngine(name) => match self.activate_engine(&name, link) {
                Ok(title) => {
                    info!("{} activated", title);
                    self.events.push((now, GuidanceEvent::EngineActivated(title)));
                }
                Err(GuidanceError::EngineNotFound(name)) => {
                    warn!("engine '{}' not found, continuing without it", name);
                    self.events.push((now, GuidanceEvent::EngineNotFound(name)));
                }
                Err(e) => return Err(e),
            },
            StagingAction::Hold(_) => {}
        }
        Ok(())
    }

    fn activate_engine(&mut self, name: &str, link: &mut dyn VehicleLink) -> Result<String, GuidanceError> {
        let engine = link
            .engines()?
            .into_iter()
            .find(|e| e.title.contains(name))
            .ok_or_else(|| GuidanceError::EngineNotFound(name.to_string()))?;
        link.set_engine_active(&engine.title)?;
        Ok(engine.title)
    }

    fn set_throttle(&mut self, link: &mut dyn VehicleLink, level: f64) -> Result<(), GuidanceError> {
        link.set_throttle(level)?;
        self.throttle = level;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Telemetry
    // -----------------------------------------------------------------------

    fn sample(&self, now: f64, altitude: f64, link: &mut dyn VehicleLink) -> Result<TelemetrySample, GuidanceError> {
        let velocity = link.surface_velocity()?;
        let drag = link.drag()?.norm();
        let displacement = self.displacement(&link.position()?);
        let engine_thrust = link.thrust()?;
        let air_temperature = match link.air_temperature() {
            Ok(k) => Some(k),
            Err(LinkError::Unavailable(what)) => {
                debug!("{} unavailable at t={:.1} s", what, now);
                None
            }
            Err(e) => return Err(e.into()),
        };
        Ok(TelemetrySample {
            time: now,
            altitude,
            vertical_velocity: velocity.vertical,
            horizontal_velocity: velocity.horizontal,
            total_speed: velocity.speed,
            drag,
            displacement,
            engine_thrust,
            vacuum_thrust: self.vacuum_thrust,
            air_temperature,
        })
    }

    /// Distance from the launch site to the current position scaled back onto
    /// the launch radius.
    fn displacement(&self, position: &Vector3<f64>) -> f64 {
        let r = position.norm();
        if r == 0.0 {
            return 0.0;
        }
        (position / r * self.initial_position.norm() - self.initial_position).norm()
    }
}
