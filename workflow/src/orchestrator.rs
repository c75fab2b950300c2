use crate::config::StageTimings;
use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::error::WorkflowError;
use crate::form::FormInput;
use crate::report::AnnotationReport;
use crate::report::ReportScenario;
use crate::report::derive_report;
use crate::state::StageCounter;
use crate::state::WorkflowSnapshot;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(Box<AnnotationReport>),
    /// The run was reset (or superseded) before it reached the last stage.
    Reset,
}

/// Drives the stage counter through the processing stages and publishes
/// every change as a [`WorkflowSnapshot`].
///
/// One run at a time. [`WorkflowOrchestrator::reset`] cancels the pending
/// stage delay of the active run, and the run id carried by the snapshot
/// keeps a cancelled run from publishing anything afterwards.
#[derive(Debug)]
pub struct WorkflowOrchestrator {
    snapshot: watch::Sender<WorkflowSnapshot>,
    active: Mutex<Option<ActiveRun>>,
    timings: StageTimings,
    scenario: ReportScenario,
}

#[derive(Debug)]
struct ActiveRun {
    run_id: u64,
    cancel: CancellationToken,
}

impl WorkflowOrchestrator {
    pub fn new(timings: StageTimings, scenario: ReportScenario) -> Self {
        let (snapshot, _) = watch::channel(WorkflowSnapshot::default());
        Self {
            snapshot,
            active: Mutex::new(None),
            timings,
            scenario,
        }
    }

    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self::new(config.timings, config.scenario)
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn scenario(&self) -> ReportScenario {
        self.scenario
    }

    /// Runs the whole stage sequence for `input` and returns the report, or
    /// [`RunOutcome::Reset`] if [`WorkflowOrchestrator::reset`] was called
    /// first.
    ///
    /// The counter has to be idle: after a completed run, call `reset` before
    /// starting the next one.
    pub async fn run(&self, input: FormInput) -> Result<RunOutcome> {
        input.validate()?;
        let (run_id, cancel) = self.begin(input.clone())?;
        let _guard = RunGuard {
            orchestrator: self,
            run_id,
        };
        info!(
            run_id,
            tissue_type = %input.tissue_type,
            species = %input.species,
            "workflow run started"
        );

        for stage in StageCounter::FIRST_STAGE..=StageCounter::LAST_STAGE {
            if stage > StageCounter::FIRST_STAGE
                && !self.publish(run_id, move |snapshot| snapshot.step.advance_to(stage))?
            {
                return Ok(RunOutcome::Reset);
            }
            let delay = self.timings.delay(stage);
            debug!(run_id, stage, ?delay, "stage started");
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(run_id, stage, "workflow run reset");
                    return Ok(RunOutcome::Reset);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let report = derive_report(&input, self.scenario);
        let finished = report.clone();
        if !self.publish(run_id, move |snapshot| snapshot.finish(finished))? {
            return Ok(RunOutcome::Reset);
        }
        info!(run_id, cell_type = %report.cell_type, score = report.score, "workflow run completed");
        Ok(RunOutcome::Completed(Box::new(report)))
    }

    /// Returns to the idle form: counter 0, no report, not processing. Any
    /// in-flight run is cancelled and can no longer change the snapshot.
    pub fn reset(&self) {
        let mut active = self.lock_active();
        if let Some(run) = active.take() {
            run.cancel.cancel();
            debug!(run_id = run.run_id, "cancelled active run");
        }
        self.snapshot.send_modify(WorkflowSnapshot::clear);
    }

    fn begin(&self, input: FormInput) -> Result<(u64, CancellationToken)> {
        let mut active = self.lock_active();
        if let Some(run) = active.as_ref() {
            return Err(WorkflowError::AlreadyRunning { run_id: run.run_id });
        }
        let step = self.snapshot.borrow().step;
        if !step.is_idle() {
            return Err(WorkflowError::NotIdle { step: step.value() });
        }

        let mut run_id = 0;
        self.snapshot.send_modify(|snapshot| {
            run_id = snapshot.run_id + 1;
            snapshot.begin(run_id, input);
        });

        let cancel = CancellationToken::new();
        *active = Some(ActiveRun {
            run_id,
            cancel: cancel.clone(),
        });
        Ok((run_id, cancel))
    }

    /// Applies `update` only while the snapshot still belongs to `run_id`.
    /// Returns `false` when the run has been superseded.
    fn publish<F>(&self, run_id: u64, update: F) -> Result<bool>
    where
        F: FnOnce(&mut WorkflowSnapshot) -> Result<()>,
    {
        let mut outcome = Ok(false);
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.run_id != run_id {
                return false;
            }
            outcome = update(snapshot).map(|()| true);
            outcome.is_ok()
        });
        outcome
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the active-run slot when `run` returns or its future is dropped.
/// A run abandoned mid-sequence leaves the snapshot idle rather than stuck
/// in processing.
struct RunGuard<'a> {
    orchestrator: &'a WorkflowOrchestrator,
    run_id: u64,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.orchestrator.lock_active();
        if active.as_ref().is_some_and(|run| run.run_id == self.run_id) {
            *active = None;
        }
        let run_id = self.run_id;
        self.orchestrator.snapshot.send_if_modified(|snapshot| {
            if snapshot.run_id != run_id || !snapshot.is_processing {
                return false;
            }
            snapshot.clear();
            true
        });
    }
}
