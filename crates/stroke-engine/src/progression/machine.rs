use crate::scoring::ScoreResult;

/// Where the learner is within the current character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a passing trace of stroke `i`.
    AwaitingStroke(usize),
    /// Every stroke passed. Terminal.
    CharacterComplete,
}

/// What a verdict did to the progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stroke `completed` passed and stroke `next` is now active.
    Advanced { completed: usize, next: usize },
    /// The last stroke passed; the character is done.
    Completed { completed: usize },
    /// The stroke failed and stays active.
    Retry { stroke: usize },
    /// The character was already complete.
    Ignored,
}

/// Per-character stroke sequencing.
///
/// Only the verdict of the latest attempt matters: there is no retry limit,
/// no score carried between attempts and no way back to an earlier stroke.
/// Selecting another character means constructing a new `Progression`.
#[derive(Debug, Clone)]
pub struct Progression {
    character_id: u32,
    stroke_count: usize,
    current: usize,
    /// Attempts per stroke, for telemetry only.
    attempts: Vec<u32>,
}

impl Progression {
    pub fn new(character_id: u32, stroke_count: usize) -> Self {
        Self {
            character_id,
            stroke_count,
            current: 0,
            attempts: vec![0; stroke_count],
        }
    }

    pub fn character_id(&self) -> u32 {
        self.character_id
    }

    pub fn stroke_count(&self) -> usize {
        self.stroke_count
    }

    /// Index of the active stroke; equals `stroke_count()` once complete.
    pub fn current_stroke(&self) -> usize {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.stroke_count
    }

    pub fn phase(&self) -> Phase {
        if self.is_complete() {
            Phase::CharacterComplete
        } else {
            Phase::AwaitingStroke(self.current)
        }
    }

    /// Number of strokes already passed.
    pub fn completed_strokes(&self) -> usize {
        self.current
    }

    /// Attempts recorded for `stroke` (0 for out-of-range indices).
    pub fn attempts(&self, stroke: usize) -> u32 {
        self.attempts.get(stroke).copied().unwrap_or(0)
    }

    /// Apply the verdict for the active stroke.
    pub fn apply(&mut self, result: &ScoreResult) -> Transition {
        let stroke = match self.phase() {
            Phase::AwaitingStroke(i) => i,
            Phase::CharacterComplete => return Transition::Ignored,
        };
        self.attempts[stroke] += 1;

        if !result.passed {
            log::debug!(
                "character {} stroke {} failed (attempt {})",
                self.character_id,
                stroke,
                self.attempts[stroke]
            );
            return Transition::Retry { stroke };
        }

        self.current = stroke + 1;
        if self.current < self.stroke_count {
            log::info!("character {} stroke {} passed", self.character_id, stroke);
            Transition::Advanced { completed: stroke, next: self.current }
        } else {
            log::info!("character {} complete", self.character_id);
            Transition::Completed { completed: stroke }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass() -> ScoreResult {
        ScoreResult { passed_fraction: 1.0, passed: true, reached: vec![true; 3] }
    }

    fn fail() -> ScoreResult {
        ScoreResult::failed(3)
    }

    #[test]
    fn starts_at_first_stroke() {
        let p = Progression::new(2, 2);
        assert_eq!(p.phase(), Phase::AwaitingStroke(0));
        assert_eq!(p.current_stroke(), 0);
        assert!(!p.is_complete());
    }

    #[test]
    fn two_strokes_advance_then_complete() {
        let mut p = Progression::new(2, 2);
        assert_eq!(p.apply(&pass()), Transition::Advanced { completed: 0, next: 1 });
        assert_eq!(p.phase(), Phase::AwaitingStroke(1));
        assert_eq!(p.apply(&pass()), Transition::Completed { completed: 1 });
        assert_eq!(p.phase(), Phase::CharacterComplete);
        assert_eq!(p.current_stroke(), 2);
    }

    #[test]
    fn failure_keeps_stroke_and_counts_attempts() {
        let mut p = Progression::new(1, 1);
        for _ in 0..5 {
            assert_eq!(p.apply(&fail()), Transition::Retry { stroke: 0 });
        }
        assert_eq!(p.attempts(0), 5);
        assert_eq!(p.phase(), Phase::AwaitingStroke(0));
        assert_eq!(p.apply(&pass()), Transition::Completed { completed: 0 });
        assert_eq!(p.attempts(0), 6);
    }

    #[test]
    fn complete_is_terminal() {
        let mut p = Progression::new(1, 1);
        p.apply(&pass());
        assert_eq!(p.apply(&pass()), Transition::Ignored);
        assert_eq!(p.apply(&fail()), Transition::Ignored);
        assert_eq!(p.current_stroke(), 1);
    }

    #[test]
    fn zero_strokes_is_already_complete() {
        let mut p = Progression::new(9, 0);
        assert!(p.is_complete());
        assert_eq!(p.apply(&pass()), Transition::Ignored);
        assert_eq!(p.attempts(0), 0);
    }

    #[test]
    fn index_never_decreases() {
        let mut p = Progression::new(3, 3);
        let verdicts = [false, true, false, false, true, false, true, true, false];
        let mut last = p.current_stroke();
        for passed in verdicts {
            let r = if passed { pass() } else { fail() };
            p.apply(&r);
            assert!(p.current_stroke() >= last);
            assert!(p.current_stroke() <= p.stroke_count());
            assert_eq!(p.is_complete(), p.current_stroke() == p.stroke_count());
            last = p.current_stroke();
        }
        assert!(p.is_complete());
    }
}
