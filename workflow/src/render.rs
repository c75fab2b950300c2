//! Plain-text rendering of the workflow: the input echo, the stage panel and
//! the four report tabs. Output is a list of [`StyledLine`]s; colouring is
//! left to the front end.

use crate::form::FormInput;
use crate::markers::describe_marker_or_fallback;
use crate::report::AnnotationReport;
use crate::report::NamedNote;
use crate::report::ReportScenario;
use crate::state::WorkflowSnapshot;
use crate::visualizer::DetailPanel;
use crate::visualizer::StepState;
use crate::visualizer::WORKFLOW_STEPS;
use crate::visualizer::active_agents;
use crate::visualizer::captions;
use crate::visualizer::connector_fill;
use crate::visualizer::detail_panel;
use strum::IntoEnumIterator;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;
use textwrap::Options;

pub const REPORT_TITLE: &str = "CASSIA Analysis Report";
pub const REPORT_SUBTITLE: &str = "Comprehensive Cell Type Analysis and Annotation";

/// Report tabs in display order. [`ReportTab::Summary`] is shown first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ReportTab {
    Annotation,
    Validation,
    Quality,
    #[default]
    Summary,
}

impl ReportTab {
    pub fn label(self) -> &'static str {
        match self {
            ReportTab::Annotation => "Annotation",
            ReportTab::Validation => "Validation",
            ReportTab::Quality => "Quality",
            ReportTab::Summary => "Summary",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ReportTab::Annotation => "Detailed Cell Type Annotation",
            ReportTab::Validation => "Validation Check",
            ReportTab::Quality => "Quality Assessment",
            ReportTab::Summary => "Cell Type Identification Summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    Heading,
    Accent,
    Muted,
    Success,
    Warning,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub tone: Tone,
    pub text: String,
}

impl StyledLine {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(Tone::Plain, "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    High,
    Moderate,
    Low,
}

impl ScoreTier {
    pub fn of(score: u8) -> Self {
        match score {
            95.. => ScoreTier::Excellent,
            90..=94 => ScoreTier::High,
            75..=89 => ScoreTier::Moderate,
            _ => ScoreTier::Low,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ScoreTier::Excellent | ScoreTier::High => Tone::Success,
            ScoreTier::Moderate => Tone::Warning,
            ScoreTier::Low => Tone::Failure,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "excellent",
            ScoreTier::High => "high",
            ScoreTier::Moderate => "moderate",
            ScoreTier::Low => "low",
        }
    }
}

pub fn status_tone(status: &str) -> Tone {
    let status = status.to_ascii_uppercase();
    if status.contains("PASSED") {
        Tone::Success
    } else if status.contains("FAILED") {
        Tone::Failure
    } else {
        Tone::Plain
    }
}

#[derive(Debug, Clone)]
pub struct ReportRenderer {
    width: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ReportRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn header(&self) -> Vec<StyledLine> {
        vec![
            StyledLine::new(Tone::Title, REPORT_TITLE),
            StyledLine::new(Tone::Muted, REPORT_SUBTITLE),
        ]
    }

    /// The tab strip, with the selected tab bracketed.
    pub fn tab_strip(&self, selected: ReportTab) -> StyledLine {
        let labels: Vec<String> = ReportTab::iter()
            .map(|tab| {
                if tab == selected {
                    format!("[{}]", tab.label())
                } else {
                    format!(" {} ", tab.label())
                }
            })
            .collect();
        StyledLine::new(Tone::Accent, labels.join(" "))
    }

    pub fn render_tab(&self, report: &AnnotationReport, tab: ReportTab) -> Vec<StyledLine> {
        let mut out = vec![StyledLine::new(Tone::Heading, tab.title())];
        match tab {
            ReportTab::Summary => self.summary(report, &mut out),
            ReportTab::Annotation => self.annotation(report, &mut out),
            ReportTab::Validation => self.validation(report, &mut out),
            ReportTab::Quality => self.quality(report, &mut out),
        }
        out
    }

    /// Every tab, summary first, separated by blank lines.
    pub fn render_all(&self, report: &AnnotationReport) -> Vec<StyledLine> {
        let mut out = self.header();
        for tab in [
            ReportTab::Summary,
            ReportTab::Annotation,
            ReportTab::Validation,
            ReportTab::Quality,
        ] {
            out.push(StyledLine::blank());
            out.extend(self.render_tab(report, tab));
        }
        out
    }

    fn summary(&self, report: &AnnotationReport, out: &mut Vec<StyledLine>) {
        out.push(StyledLine::new(
            Tone::Accent,
            format!("Main Cell Type: {}", report.cell_type),
        ));
        out.push(StyledLine::new(
            Tone::Plain,
            format!("Probable Sub Cell Types: {}", badges(&report.sub_types)),
        ));
        out.push(StyledLine::new(
            Tone::Plain,
            format!("Number of Key Markers Analyzed: {}", report.marker_count),
        ));
        out.push(score_line("Overall Quality Score", report.score));
        if !report.key_markers.is_empty() {
            out.push(StyledLine::new(Tone::Heading, "Key Markers"));
            for marker in &report.key_markers {
                self.wrap_into(
                    out,
                    Tone::Plain,
                    &format!("{marker}: {}", describe_marker_or_fallback(marker)),
                    "  - ",
                    "    ",
                );
            }
        }
    }

    fn annotation(&self, report: &AnnotationReport, out: &mut Vec<StyledLine>) {
        self.notes_section(
            out,
            "Key Functional Markers and Their Roles",
            &report.functional_markers_intro,
            &report.functional_markers,
            false,
        );
        self.notes_section(
            out,
            "Key Cell Type Markers",
            &report.cell_type_markers_intro,
            &report.cell_type_markers,
            false,
        );
        self.text_section(out, "Database Cross-Reference", &report.database_cross_reference);
        self.text_section(
            out,
            "Most Probable General Cell Type",
            &report.probable_general_cell_type,
        );
        self.notes_section(
            out,
            "Top 3 Most Probable Sub Cell Types",
            &report.probable_sub_cell_types_intro,
            &report.probable_sub_cell_types,
            true,
        );
        out.push(StyledLine::new(Tone::Heading, "Concise Summary of Analysis"));
        self.wrap_into(
            out,
            Tone::Success,
            &report.annotation_concise_summary,
            "  ",
            "  ",
        );
    }

    fn validation(&self, report: &AnnotationReport, out: &mut Vec<StyledLine>) {
        out.push(StyledLine::new(
            status_tone(&report.validation_status),
            format!("✔ {}", report.validation_status),
        ));
        out.push(StyledLine::new(Tone::Heading, "Feedback and Justification"));
        self.wrap_into(out, Tone::Plain, &report.feedback_summary, "  ", "  ");
        out.push(StyledLine::new(Tone::Heading, "Marker Consistency:"));
        self.bullets(out, &report.marker_consistency);
    }

    fn quality(&self, report: &AnnotationReport, out: &mut Vec<StyledLine>) {
        out.push(score_line("Score", report.score));
        out.push(StyledLine::new(Tone::Heading, "Strengths:"));
        self.bullets(out, &report.quality_strengths);
        out.push(StyledLine::new(
            Tone::Heading,
            "Areas for Improvement (Weaknesses):",
        ));
        self.bullets(out, &report.quality_weaknesses);
        self.text_section(out, "Overall Assessment", &report.quality_overall_assessment);
    }

    fn notes_section(
        &self,
        out: &mut Vec<StyledLine>,
        heading: &str,
        intro: &str,
        notes: &[NamedNote],
        numbered: bool,
    ) {
        out.push(StyledLine::new(Tone::Heading, heading));
        if !intro.is_empty() {
            self.wrap_into(out, Tone::Muted, intro, "  ", "  ");
        }
        for (idx, note) in notes.iter().enumerate() {
            let name = if numbered {
                format!("{}. {}", idx + 1, note.name)
            } else {
                note.name.clone()
            };
            out.push(StyledLine::new(Tone::Accent, format!("  {name}")));
            self.wrap_into(out, Tone::Plain, &note.description, "    – ", "      ");
        }
    }

    fn text_section(&self, out: &mut Vec<StyledLine>, heading: &str, text: &str) {
        out.push(StyledLine::new(Tone::Heading, heading));
        self.wrap_into(out, Tone::Plain, text, "  ", "  ");
    }

    fn bullets(&self, out: &mut Vec<StyledLine>, items: &[String]) {
        for item in items {
            self.wrap_into(out, Tone::Plain, item, "  • ", "    ");
        }
    }

    fn wrap_into(
        &self,
        out: &mut Vec<StyledLine>,
        tone: Tone,
        text: &str,
        initial_indent: &str,
        subsequent_indent: &str,
    ) {
        let options = Options::new(self.width)
            .initial_indent(initial_indent)
            .subsequent_indent(subsequent_indent);
        for line in textwrap::wrap(text, options) {
            out.push(StyledLine::new(tone, line.trim_end()));
        }
    }
}

fn badges(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("[{item}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn score_line(label: &str, score: u8) -> StyledLine {
    let tier = ScoreTier::of(score);
    StyledLine::new(tier.tone(), format!("{label}: {score} ({})", tier.label()))
}

/// "Input Parameters" echo shown once a run has started.
pub fn render_input(input: &FormInput) -> Vec<StyledLine> {
    vec![
        StyledLine::new(Tone::Heading, "Input Parameters"),
        StyledLine::new(Tone::Plain, format!("Tissue Type: {}", input.tissue_type)),
        StyledLine::new(Tone::Plain, format!("Marker Gene: {}", input.marker_gene)),
        StyledLine::new(
            Tone::Muted,
            format!("Marker Symbols: {}", input.marker_symbols().len()),
        ),
        StyledLine::new(Tone::Plain, format!("Species: {}", input.species)),
    ]
}

/// Step row, connector, detail panel, agents and captions for one snapshot.
pub fn render_stage_panel(
    snapshot: &WorkflowSnapshot,
    progress: u8,
    scenario: ReportScenario,
) -> Vec<StyledLine> {
    let mut out = Vec::new();
    let row = WORKFLOW_STEPS
        .iter()
        .map(|step| {
            let state = StepState::of(step, snapshot.step, snapshot.is_processing);
            format!("{} {}", state.glyph(), step.name)
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push(StyledLine::new(Tone::Accent, row));
    out.push(StyledLine::new(
        Tone::Muted,
        format!("{}%", connector_fill(snapshot.step)),
    ));

    match detail_panel(snapshot, progress) {
        DetailPanel::Hidden => {}
        DetailPanel::Stage {
            name,
            progress,
            analysis_complete,
        } => {
            let mut line = name.to_string();
            if let Some(percent) = progress {
                line.push_str(&format!(" {} {percent}%", progress_bar(percent, 20)));
            }
            out.push(StyledLine::new(Tone::Heading, line));
            if analysis_complete {
                out.push(StyledLine::new(
                    Tone::Success,
                    "Analysis complete! View results below.",
                ));
            }
        }
        DetailPanel::WorkflowComplete => {
            out.push(StyledLine::new(Tone::Success, "Workflow Complete!"));
            out.push(StyledLine::new(
                Tone::Success,
                "All analysis steps have been completed successfully. View the detailed results below.",
            ));
        }
    }

    let agents = active_agents(snapshot.step);
    if !agents.is_empty() {
        let names = agents
            .iter()
            .map(|agent| format!("<{}>", agent.name))
            .collect::<Vec<_>>()
            .join(" → ");
        out.push(StyledLine::new(Tone::Accent, names));
    }
    if let Some(lines) = captions(snapshot.step, snapshot.is_processing, scenario) {
        for line in lines {
            out.push(StyledLine::new(Tone::Muted, format!("  » {line}")));
        }
    }
    out
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportScenario;
    use crate::report::derive_report;
    use crate::state::StageCounter;
    use pretty_assertions::assert_eq;

    fn texts(lines: &[StyledLine]) -> Vec<&str> {
        lines.iter().map(|line| line.text.as_str()).collect()
    }

    fn b_cell_report() -> AnnotationReport {
        derive_report(
            &FormInput::new("Spleen", "Cd19, Pax5", "Mouse"),
            ReportScenario::MarkerProfile,
        )
    }

    #[test]
    fn summary_tab_shows_badges_and_marker_descriptions() {
        let report = b_cell_report();
        let lines = ReportRenderer::default().render_tab(&report, ReportTab::Summary);
        let texts = texts(&lines);
        assert_eq!(texts[0], "Cell Type Identification Summary");
        assert_eq!(texts[1], "Main Cell Type: Follicular B cells (FoB)");
        assert_eq!(
            texts[2],
            "Probable Sub Cell Types: [Germinal center B cells] [Marginal zone-like B cells]"
        );
        assert_eq!(texts[3], "Number of Key Markers Analyzed: 50");
        assert!(texts.contains(&"  - Ms4a1: CD20, pan-B cell surface marker"));
    }

    #[test]
    fn placeholder_markers_use_the_fallback_description() {
        let report = derive_report(
            &FormInput::new("liver", "Alb", "Human"),
            ReportScenario::MarkerProfile,
        );
        let lines = ReportRenderer::default().render_tab(&report, ReportTab::Summary);
        assert!(texts(&lines).contains(
            &"  - Marker1: Marker associated with the identified cell population"
        ));
    }

    #[test]
    fn narrative_is_wrapped_to_width() {
        let report = derive_report(
            &FormInput::new("esophagus", "Ano1", "Human"),
            ReportScenario::EsophagusIcc,
        );
        let renderer = ReportRenderer::new(40);
        for tab in [ReportTab::Annotation, ReportTab::Quality] {
            let lines = renderer.render_tab(&report, tab);
            assert!(
                lines
                    .iter()
                    .all(|line| textwrap::core::display_width(&line.text) <= 40),
                "{tab}"
            );
        }
    }

    #[test]
    fn validation_status_and_score_are_toned() {
        assert_eq!(status_tone("VALIDATION PASSED"), Tone::Success);
        assert_eq!(status_tone("validation failed"), Tone::Failure);
        assert_eq!(status_tone("PENDING"), Tone::Plain);
        assert_eq!(ScoreTier::of(99), ScoreTier::Excellent);
        assert_eq!(ScoreTier::of(90), ScoreTier::High);
        assert_eq!(ScoreTier::of(80), ScoreTier::Moderate);
        assert_eq!(ScoreTier::of(10).tone(), Tone::Failure);

        let report = b_cell_report();
        let lines = ReportRenderer::default().render_tab(&report, ReportTab::Validation);
        assert_eq!(lines[1].tone, Tone::Success);
        assert_eq!(lines[1].text, "✔ VALIDATION PASSED");
    }

    #[test]
    fn tab_strip_brackets_the_selection() {
        let strip = ReportRenderer::default().tab_strip(ReportTab::Summary);
        assert_eq!(strip.text, " Annotation   Validation   Quality  [Summary]");
        assert_eq!("quality".parse::<ReportTab>().expect("parse"), ReportTab::Quality);
    }

    #[test]
    fn render_all_covers_every_tab() {
        let lines = ReportRenderer::default().render_all(&b_cell_report());
        let texts = texts(&lines);
        for heading in [
            REPORT_TITLE,
            "Cell Type Identification Summary",
            "Detailed Cell Type Annotation",
            "Validation Check",
            "Quality Assessment",
            "1. Follicular B cells (FoB)",
        ] {
            assert!(
                texts.iter().any(|text| text.trim() == heading),
                "missing {heading}"
            );
        }
    }

    #[test]
    fn stage_panel_for_a_processing_stage() {
        let mut step = StageCounter::default();
        step.advance_to(1).expect("advance");
        let snapshot = WorkflowSnapshot {
            step,
            is_processing: true,
            ..Default::default()
        };
        let lines = render_stage_panel(&snapshot, 50, ReportScenario::EsophagusIcc);
        let texts = texts(&lines);
        assert_eq!(
            texts[0],
            "✔ Input Data  ◌ Annotation Robot  ○ Validation Robot  ○ Scoring Robot  ○ Report Robot  ○ Completed"
        );
        assert_eq!(texts[1], "25%");
        assert_eq!(texts[2], "Annotation Robot [##########----------] 50%");
        assert_eq!(texts[3], "<Annotator Agent>");
        assert_eq!(texts[4], "  » Analyzing highly expressed genes...");
    }

    #[test]
    fn input_echo_lists_all_fields() {
        let lines = render_input(&FormInput::new("Spleen", "Cd19, Pax5", "Mouse"));
        assert_eq!(
            texts(&lines),
            vec![
                "Input Parameters",
                "Tissue Type: Spleen",
                "Marker Gene: Cd19, Pax5",
                "Marker Symbols: 2",
                "Species: Mouse",
            ]
        );
    }
}
