use crate::dynamics::state::State;
use crate::vehicle::MissionConfig;

// ---------------------------------------------------------------------------
// Simulated flight events
// ---------------------------------------------------------------------------

/// Kinds of simulated flight events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Burnout,
    Apogee,
    /// Ascending crossing of one of the guidance altitude thresholds.
    Altitude { label: &'static str, altitude: f64 },
}

/// A discrete event found on a simulated trajectory.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind>;
}

/// Fires once when the time grid passes the end of the burn.
pub struct BurnoutDetector {
    burn_time: f64,
    fired: bool,
}

impl BurnoutDetector {
    pub fn new(burn_time: f64) -> Self {
        Self { burn_time, fired: false }
    }
}

impl EventDetector for BurnoutDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if self.fired || !(prev.time < self.burn_time && current.time >= self.burn_time) {
            return None;
        }
        self.fired = true;
        Some(EventKind::Burnout)
    }
}

/// Detects apogee (vertical velocity going from positive to non-positive).
pub struct ApogeeDetector {
    fired: bool,
}

impl ApogeeDetector {
    pub fn new() -> Self {
        Self { fired: false }
    }
}

impl Default for ApogeeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if !self.fired && prev.vel.y > 0.0 && current.vel.y <= 0.0 {
            self.fired = true;
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// One-shot ascending altitude crossing.
pub struct AltitudeDetector {
    pub label: &'static str,
    pub altitude: f64,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(label: &'static str, altitude: f64) -> Self {
        Self { label, altitude, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.pos.y < self.altitude && current.pos.y >= self.altitude {
            self.fired = true;
            Some(EventKind::Altitude { label: self.label, altitude: self.altitude })
        } else {
            None
        }
    }
}

/// Detectors for burnout, apogee and every guidance altitude threshold.
pub fn default_detectors(config: &MissionConfig) -> Vec<Box<dyn EventDetector>> {
    let g = &config.guidance;
    vec![
        Box::new(BurnoutDetector::new(config.vehicle.burn_time)),
        Box::new(ApogeeDetector::new()),
        Box::new(AltitudeDetector::new("gravity turn start", g.turn_start_altitude)),
        Box::new(AltitudeDetector::new("gravity turn end", g.turn_end_altitude)),
        Box::new(AltitudeDetector::new("LAS jettison", g.las_altitude)),
        Box::new(AltitudeDetector::new("core separation", g.core_altitude)),
    ]
}

/// Run `detectors` over consecutive trajectory samples, in time order.
pub fn scan(trajectory: &[State], detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for w in trajectory.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&w[0], &w[1]) {
                events.push(SimEvent { time: w[1].time, kind, state: w[1] });
            }
        }
    }
    events
}

/// Event timeline of a simulated ascent, comparable with the controller's.
pub fn detect_events(trajectory: &[State], config: &MissionConfig) -> Vec<SimEvent> {
    scan(trajectory, &mut default_detectors(config))
}
