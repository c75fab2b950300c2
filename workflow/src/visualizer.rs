//! Cosmetic views of the stage counter: step indicators, the progress bar,
//! agent badges and captions. Nothing here feeds back into the workflow.

use crate::report::ReportScenario;
use crate::state::StageCounter;
use crate::state::WorkflowSnapshot;
use std::time::Duration;

pub const PROGRESS_TICK: Duration = Duration::from_millis(30);
pub const CAPTION_LINGER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowStep {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
}

pub const WORKFLOW_STEPS: [WorkflowStep; 6] = [
    WorkflowStep {
        id: 0,
        name: "Input Data",
        description: "User provides tissue type, marker gene, and species",
    },
    WorkflowStep {
        id: 1,
        name: "Annotation Robot",
        description: "Generating step-by-step annotation based on markers",
    },
    WorkflowStep {
        id: 2,
        name: "Validation Robot",
        description: "Checking annotation accuracy against reference databases",
    },
    WorkflowStep {
        id: 3,
        name: "Scoring Robot",
        description: "Evaluating annotation quality and confidence",
    },
    WorkflowStep {
        id: 4,
        name: "Report Robot",
        description: "Compiling comprehensive analysis report",
    },
    WorkflowStep {
        id: 5,
        name: "Completed",
        description: "Analysis workflow completed",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    /// Current step while work is in flight (spinner).
    Active,
    /// Current step while idle.
    Reached,
    Complete,
}

impl StepState {
    pub fn of(step: &WorkflowStep, current: StageCounter, is_processing: bool) -> Self {
        let current = current.value();
        if current > step.id {
            StepState::Complete
        } else if current == step.id && is_processing {
            StepState::Active
        } else if current == step.id {
            StepState::Reached
        } else {
            StepState::Pending
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            StepState::Pending => "○",
            StepState::Active => "◌",
            StepState::Reached => "●",
            StepState::Complete => "✔",
        }
    }
}

/// Width of the connector line under the step row, in percent.
pub fn connector_fill(current: StageCounter) -> u8 {
    current.value().min(StageCounter::LAST_STAGE) * 25
}

/// Progress bar for the whole run: one percent per [`PROGRESS_TICK`] while
/// processing, carried across stage changes and pinned to 0 while idle.
#[derive(Debug, Clone, Default)]
pub struct ProgressTicker {
    step: StageCounter,
    percent: u8,
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the snapshot; returns `true` when the stage changed.
    pub fn observe(&mut self, snapshot: &WorkflowSnapshot) -> bool {
        if !snapshot.is_processing {
            self.percent = 0;
        }
        if snapshot.step != self.step {
            self.step = snapshot.step;
            return true;
        }
        false
    }

    pub fn tick(&mut self, is_processing: bool) -> u8 {
        if is_processing && !self.step.is_idle() {
            self.percent = (self.percent + 1).min(100);
        }
        self.percent
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }
}

/// The panel under the step row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPanel {
    Hidden,
    Stage {
        name: &'static str,
        /// `Some` while processing.
        progress: Option<u8>,
        analysis_complete: bool,
    },
    WorkflowComplete,
}

pub fn detail_panel(snapshot: &WorkflowSnapshot, progress: u8) -> DetailPanel {
    let step = snapshot.step.value();
    match step {
        1..=4 => DetailPanel::Stage {
            name: WORKFLOW_STEPS[usize::from(step)].name,
            progress: snapshot.is_processing.then_some(progress),
            analysis_complete: !snapshot.is_processing && step == StageCounter::LAST_STAGE,
        },
        5 => DetailPanel::WorkflowComplete,
        _ => DetailPanel::Hidden,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id: u8,
    pub name: &'static str,
}

pub const AGENTS: [Agent; 4] = [
    Agent {
        id: 1,
        name: "Annotator Agent",
    },
    Agent {
        id: 2,
        name: "Validator Agent",
    },
    Agent {
        id: 3,
        name: "Scoring Agent",
    },
    Agent {
        id: 4,
        name: "Reporting Agent",
    },
];

/// Agents on screen for a stage: the one handing off and the one taking
/// over, or only the reporter once the workflow is complete.
pub fn active_agents(current: StageCounter) -> Vec<Agent> {
    let ids: &[u8] = match current.value() {
        1 => &[1],
        2 => &[1, 2],
        3 => &[2, 3],
        4 => &[3, 4],
        5 => &[4],
        _ => &[],
    };
    AGENTS
        .iter()
        .filter(|agent| ids.contains(&agent.id))
        .copied()
        .collect()
}

/// Chat-style captions for the current stage. Shown while a stage is
/// processing and, for [`CAPTION_LINGER`], after completion.
pub fn captions(
    current: StageCounter,
    is_processing: bool,
    scenario: ReportScenario,
) -> Option<&'static [&'static str]> {
    let step = current.value();
    if !(is_processing && (1..=4).contains(&step)) && step != 5 {
        return None;
    }
    let lines: &'static [&'static str] = match (scenario, step) {
        (ReportScenario::EsophagusIcc, 1) => &[
            "Analyzing highly expressed genes...",
            "Identifying key markers: ANO1, KIT, ETV1...",
        ],
        (ReportScenario::EsophagusIcc, 2) => &[
            "Cross-referencing with scRNA-seq databases...",
            "Validation: PASSED. ICC signature confirmed.",
        ],
        (ReportScenario::EsophagusIcc, 3) => &[
            "Evaluating annotation quality: Score 95/100.",
            "Highlighting strengths: Accurate ICC identification, comprehensive marker analysis.",
        ],
        (ReportScenario::EsophagusIcc, 4) => &[
            "Finalizing cell type: Interstitial Cells of Cajal (ICCs).",
            "Probable subtype: ICC-MY (Myenteric Plexus).",
            "Generating detailed analysis summary...",
        ],
        (ReportScenario::MarkerProfile, 1) => &[
            "Analyzing highly expressed genes...",
            "Matching marker genes against lineage signatures...",
        ],
        (ReportScenario::MarkerProfile, 2) => &[
            "Cross-referencing with scRNA-seq databases...",
            "Checking marker consistency with the tissue of origin...",
        ],
        (ReportScenario::MarkerProfile, 3) => &[
            "Evaluating annotation quality and confidence...",
            "Weighing strengths and weaknesses of the call...",
        ],
        (ReportScenario::MarkerProfile, 4) => &[
            "Finalizing cell type and probable sub-types...",
            "Generating detailed analysis summary...",
        ],
        _ => &[
            "Full CASSIA Analysis Report generated.",
            "Ready for review.",
        ],
    };
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counter(step: u8) -> StageCounter {
        let mut counter = StageCounter::default();
        for next in 1..=step {
            counter.advance_to(next).expect("advance");
        }
        counter
    }

    fn snapshot(step: u8, is_processing: bool) -> WorkflowSnapshot {
        WorkflowSnapshot {
            step: counter(step),
            is_processing,
            ..Default::default()
        }
    }

    #[test]
    fn step_states_follow_the_counter() {
        let states: Vec<StepState> = WORKFLOW_STEPS
            .iter()
            .map(|step| StepState::of(step, counter(2), true))
            .collect();
        assert_eq!(
            states,
            vec![
                StepState::Complete,
                StepState::Complete,
                StepState::Active,
                StepState::Pending,
                StepState::Pending,
                StepState::Pending,
            ]
        );
        assert_eq!(
            StepState::of(&WORKFLOW_STEPS[5], counter(5), false),
            StepState::Reached
        );
    }

    #[test]
    fn connector_caps_at_the_last_stage() {
        assert_eq!(connector_fill(counter(0)), 0);
        assert_eq!(connector_fill(counter(3)), 75);
        assert_eq!(connector_fill(counter(5)), 100);
    }

    #[test]
    fn progress_carries_across_stages_and_caps() {
        let mut ticker = ProgressTicker::new();
        assert!(ticker.observe(&snapshot(1, true)));
        for _ in 0..40 {
            ticker.tick(true);
        }
        assert_eq!(ticker.percent(), 40);

        assert!(ticker.observe(&snapshot(2, true)));
        assert_eq!(ticker.tick(true), 41);
        for _ in 0..150 {
            ticker.tick(true);
        }
        assert!(ticker.observe(&snapshot(3, true)));
        assert_eq!(ticker.percent(), 100);
        assert!(!ticker.observe(&snapshot(3, true)));
        assert_eq!(ticker.tick(true), 100);

        ticker.observe(&snapshot(5, false));
        assert_eq!(ticker.percent(), 0);
        assert_eq!(ticker.tick(false), 0);
    }

    #[test]
    fn detail_panel_tracks_processing() {
        assert_eq!(detail_panel(&snapshot(0, false), 0), DetailPanel::Hidden);
        assert_eq!(
            detail_panel(&snapshot(3, true), 42),
            DetailPanel::Stage {
                name: "Scoring Robot",
                progress: Some(42),
                analysis_complete: false,
            }
        );
        assert_eq!(
            detail_panel(&snapshot(4, false), 42),
            DetailPanel::Stage {
                name: "Report Robot",
                progress: None,
                analysis_complete: true,
            }
        );
        assert_eq!(
            detail_panel(&snapshot(5, false), 0),
            DetailPanel::WorkflowComplete
        );
    }

    #[test]
    fn agents_hand_off_between_stages() {
        let names = |step| {
            active_agents(counter(step))
                .iter()
                .map(|agent| agent.name)
                .collect::<Vec<_>>()
        };
        assert!(names(0).is_empty());
        assert_eq!(names(1), vec!["Annotator Agent"]);
        assert_eq!(names(3), vec!["Validator Agent", "Scoring Agent"]);
        assert_eq!(names(5), vec!["Reporting Agent"]);
    }

    #[test]
    fn captions_only_while_processing_or_complete() {
        let icc = ReportScenario::EsophagusIcc;
        assert_eq!(captions(counter(0), false, icc), None);
        assert_eq!(captions(counter(2), false, icc), None);
        assert_eq!(
            captions(counter(2), true, icc).map(|lines| lines[1]),
            Some("Validation: PASSED. ICC signature confirmed.")
        );
        assert_eq!(
            captions(counter(5), false, ReportScenario::MarkerProfile),
            Some(&["Full CASSIA Analysis Report generated.", "Ready for review."][..])
        );
    }
}
