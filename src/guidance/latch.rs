/// One-shot flag gating an irreversible action. Only ever moves
/// `Pending -> Fired`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Latch {
    #[default]
    Pending,
    Fired { at: f64 },
}

impl Latch {
    /// Fire at mission time `at`. Returns `true` only for the call that fired it.
    pub fn fire(&mut self, at: f64) -> bool {
        match self {
            Latch::Pending => {
                *self = Latch::Fired { at };
                true
            }
            Latch::Fired { .. } => false,
        }
    }

    pub fn is_fired(&self) -> bool {
        matches!(self, Latch::Fired { .. })
    }

    pub fn fired_at(&self) -> Option<f64> {
        match *self {
            Latch::Fired { at } => Some(at),
            Latch::Pending => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_once() {
        let mut latch = Latch::default();
        assert!(!latch.is_fired());
        assert!(latch.fire(12.5));
        assert!(!latch.fire(13.0));
        assert_eq!(latch.fired_at(), Some(12.5));
    }
}
