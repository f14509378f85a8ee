use std::collections::VecDeque;

use super::params::GuidanceParams;

/// One step of a staging sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum StagingAction {
    Throttle(f64),
    NextStage,
    /// Activate the first engine whose title contains this name.
    ActivateEngine(String),
    /// Wait this many seconds of mission time before the next action.
    Hold(f64),
}

/// What the controller should do with a sequence on this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    Act(StagingAction),
    Wait,
    Done,
}

/// An ordered list of staging actions with holds measured on the mission
/// clock. Holds never block the control loop; the sequence reports `Wait`
/// until the hold has elapsed.
#[derive(Debug, Clone)]
pub struct StagingSequence {
    pub name: &'static str,
    actions: VecDeque<StagingAction>,
    hold_until: Option<f64>,
}

impl StagingSequence {
    pub fn new(name: &'static str, actions: impl IntoIterator<Item = StagingAction>) -> Self {
        Self { name, actions: actions.into_iter().collect(), hold_until: None }
    }

    /// Jettison the launch abort system: two stagings, each followed by a pause.
    pub fn las_jettison(params: &GuidanceParams) -> Self {
        use StagingAction::*;
        Self::new(
            "LAS jettison",
            [NextStage, Hold(params.las_pause), NextStage, Hold(params.las_pause)],
        )
    }

    /// Drop the core stage, light the second-stage engine for a short pulse,
    /// then coast.
    pub fn core_separation(params: &GuidanceParams) -> Self {
        use StagingAction::*;
        Self::new(
            "core separation",
            [
                Throttle(0.0),
                Hold(params.core_cutoff_pause),
                NextStage,
                ActivateEngine(params.second_stage_engine.clone()),
                Throttle(1.0),
                Hold(params.second_stage_pulse),
                Throttle(0.0),
                Hold(params.coast_pause),
            ],
        )
    }

    /// Next thing to do at mission time `now`. A `Hold` is consumed here and
    /// turned into `Wait`.
    pub fn poll(&mut self, now: f64) -> Poll {
        if let Some(until) = self.hold_until {
            if now < until {
                return Poll::Wait;
            }
            self.hold_until = None;
        }
        match self.actions.pop_front() {
            None => Poll::Done,
            Some(StagingAction::Hold(secs)) => {
                self.hold_until = Some(now + secs);
                Poll::Wait
            }
            Some(action) => Poll::Act(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_are_measured_on_mission_time() {
        let mut seq = StagingSequence::las_jettison(&GuidanceParams::default());
        assert_eq!(seq.poll(10.0), Poll::Act(StagingAction::NextStage));
        assert_eq!(seq.poll(10.0), Poll::Wait);
        assert_eq!(seq.poll(10.5), Poll::Wait);
        assert_eq!(seq.poll(10.9), Poll::Wait);
        assert_eq!(seq.poll(11.0), Poll::Act(StagingAction::NextStage));
        assert_eq!(seq.poll(11.0), Poll::Wait);
        assert_eq!(seq.poll(12.0), Poll::Done);
    }

    #[test]
    fn core_separation_order() {
        let params = GuidanceParams::default();
        let mut seq = StagingSequence::core_separation(&params);
        let mut acts = Vec::new();
        let mut now = 0.0;
        loop {
            match seq.poll(now) {
                Poll::Act(a) => acts.push(a),
                Poll::Wait => now += 0.5,
                Poll::Done => break,
            }
        }
        assert_eq!(
            acts,
            vec![
                StagingAction::Throttle(0.0),
                StagingAction::NextStage,
                StagingAction::ActivateEngine(params.second_stage_engine.clone()),
                StagingAction::Throttle(1.0),
                StagingAction::Throttle(0.0),
            ]
        );
        // 1 s + 2 s + 210 s of holds.
        assert!(now >= 213.0);
    }
}
