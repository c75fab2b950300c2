use crate::error::WorkflowError;
use crate::form::FormInput;
use crate::report::AnnotationReport;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Position in the fixed stage sequence, `0..=5`.
///
/// 0 is idle (form entry), 1 through 4 are the processing stages and 5 means
/// the report is available. Within one run the counter only moves forward one
/// step at a time; [`StageCounter::reset`] is the only way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageCounter(u8);

impl StageCounter {
    pub const IDLE: StageCounter = StageCounter(0);
    pub const FIRST_STAGE: u8 = 1;
    pub const LAST_STAGE: u8 = 4;
    pub const COMPLETE: StageCounter = StageCounter(5);

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self.0 == 0
    }

    pub fn is_complete(self) -> bool {
        self == Self::COMPLETE
    }

    /// Moves to `next`, which must be exactly one past the current value.
    pub fn advance_to(&mut self, next: u8) -> Result<(), WorkflowError> {
        if next != self.0 + 1 || next > Self::COMPLETE.0 {
            return Err(WorkflowError::InvalidTransition {
                from: self.0,
                to: next,
            });
        }
        self.0 = next;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl fmt::Display for StageCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything an observer of the workflow can see at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    /// Bumped by every start and every reset; a run may only publish while
    /// the snapshot still carries its id.
    pub run_id: u64,
    pub step: StageCounter,
    pub is_processing: bool,
    pub input: Option<FormInput>,
    pub report: Option<AnnotationReport>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl WorkflowSnapshot {
    pub(crate) fn begin(&mut self, run_id: u64, input: FormInput) {
        self.run_id = run_id;
        self.step = StageCounter(StageCounter::FIRST_STAGE);
        self.is_processing = true;
        self.input = Some(input);
        self.report = None;
        self.started_at = Some(Utc::now());
        self.finished_at = None;
    }

    pub(crate) fn finish(&mut self, report: AnnotationReport) -> Result<(), WorkflowError> {
        self.step.advance_to(StageCounter::COMPLETE.value())?;
        self.report = Some(report);
        self.is_processing = false;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Back to the idle form. The submitted input is dropped along with the
    /// report so the next run starts clean.
    pub(crate) fn clear(&mut self) {
        self.run_id += 1;
        self.step.reset();
        self.is_processing = false;
        self.input = None;
        self.report = None;
        self.started_at = None;
        self.finished_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counter_moves_one_step_at_a_time() {
        let mut counter = StageCounter::default();
        for next in 1..=5 {
            counter.advance_to(next).expect("sequential step");
            assert_eq!(counter.value(), next);
        }
        assert!(counter.is_complete());
    }

    #[test]
    fn counter_rejects_skips_repeats_and_overflow() {
        let mut counter = StageCounter::default();
        assert!(matches!(
            counter.advance_to(2),
            Err(WorkflowError::InvalidTransition { from: 0, to: 2 })
        ));
        counter.advance_to(1).expect("first stage");
        assert!(counter.advance_to(1).is_err());

        let mut done = StageCounter::COMPLETE;
        assert!(done.advance_to(6).is_err());
        done.reset();
        assert!(done.is_idle());
    }

    #[test]
    fn clearing_a_snapshot_invalidates_the_run() {
        let mut snapshot = WorkflowSnapshot::default();
        snapshot.begin(1, FormInput::new("liver", "Alb", "Human"));
        assert_eq!(snapshot.step.value(), 1);
        assert!(snapshot.is_processing);

        snapshot.clear();
        assert_eq!(snapshot.run_id, 2);
        assert_eq!(snapshot.step, StageCounter::IDLE);
        assert!(!snapshot.is_processing);
        assert_eq!(snapshot.input, None);
        assert_eq!(snapshot.report, None);
    }
}
