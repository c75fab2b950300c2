use crate::style::Painter;
use anyhow::Context;
use anyhow::Result;
use cassia_workflow::AnnotationReport;
use cassia_workflow::CAPTION_LINGER;
use cassia_workflow::ConfigOverrides;
use cassia_workflow::FieldMode;
use cassia_workflow::FormCollector;
use cassia_workflow::FormInput;
use cassia_workflow::PROGRESS_TICK;
use cassia_workflow::ProgressTicker;
use cassia_workflow::ReportRenderer;
use cassia_workflow::ReportScenario;
use cassia_workflow::ReportTab;
use cassia_workflow::RunOutcome;
use cassia_workflow::WorkflowConfig;
use cassia_workflow::WorkflowOrchestrator;
use cassia_workflow::find_cassia_home;
use cassia_workflow::load_request;
use cassia_workflow::render_input;
use cassia_workflow::render_stage_panel;
use clap::Args;
use std::io::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use supports_color::Stream;
use tracing::debug;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Tissue type. Must be one of the presets unless --custom-tissue is set.
    #[arg(long, value_name = "TISSUE")]
    pub tissue: Option<String>,

    /// Accept any tissue type instead of the preset list.
    #[arg(long)]
    pub custom_tissue: bool,

    /// Comma-separated marker genes, e.g. "Cd19, Ms4a1, Pax5".
    #[arg(long, value_name = "GENES")]
    pub markers: Option<String>,

    /// Species. Must be one of the presets unless --custom-species is set.
    #[arg(long, value_name = "SPECIES")]
    pub species: Option<String>,

    /// Accept any species instead of the preset list.
    #[arg(long)]
    pub custom_species: bool,

    /// Read the analysis request from a YAML or TOML file.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["tissue", "markers", "species", "custom_tissue", "custom_species"]
    )]
    pub input: Option<PathBuf>,

    /// Report generator (profile or esophagus-icc). Overrides the config.
    #[arg(long, value_name = "SCENARIO")]
    pub scenario: Option<ReportScenario>,

    /// Report tab to print: summary, annotation, validation, quality or all.
    #[arg(long, value_name = "TAB", default_value = "all")]
    pub tab: TabSelection,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Do not animate the stages on stderr.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSelection {
    All,
    One(ReportTab),
}

impl FromStr for TabSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TabSelection::All);
        }
        ReportTab::from_str(&s.to_ascii_lowercase())
            .map(TabSelection::One)
            .map_err(|_| {
                format!("unknown tab {s:?} (expected summary, annotation, validation, quality or all)")
            })
    }
}

/// How a `run` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Reset,
}

pub async fn execute(args: RunArgs, overrides: ConfigOverrides) -> Result<RunStatus> {
    let cassia_home = find_cassia_home()?;
    let mut config = WorkflowConfig::load(&cassia_home, &overrides)?;
    if let Some(scenario) = args.scenario {
        config.scenario = scenario;
    }
    let input = collect_input(&args)?;
    debug!(?config, "loaded workflow configuration");

    let orchestrator = WorkflowOrchestrator::from_config(&config);
    let stderr_painter = Painter::detect(config.color, Stream::Stderr);
    let outcome = if args.quiet {
        run_quietly(&orchestrator, input, tokio::signal::ctrl_c()).await?
    } else {
        let interrupt = tokio::signal::ctrl_c();
        run_animated(&orchestrator, input, stderr_painter, interrupt).await?
    };

    match outcome {
        RunOutcome::Completed(report) => {
            print_report(&report, &args, &config)?;
            Ok(RunStatus::Completed)
        }
        RunOutcome::Reset => {
            eprintln!("Workflow reset before completion.");
            Ok(RunStatus::Reset)
        }
    }
}

fn collect_input(args: &RunArgs) -> Result<FormInput> {
    if let Some(path) = &args.input {
        return load_request(path);
    }
    let mut form = FormCollector::new();
    if args.custom_tissue {
        form.set_tissue_mode(FieldMode::Custom);
    }
    if args.custom_species {
        form.set_species_mode(FieldMode::Custom);
    }
    if let Some(tissue) = &args.tissue {
        form.set_tissue_type(tissue.as_str());
    }
    if let Some(markers) = &args.markers {
        form.set_marker_gene(markers.as_str());
    }
    if let Some(species) = &args.species {
        form.set_species(species.as_str());
    }
    form.submit().context("invalid analysis request")
}

/// `interrupt` (Ctrl-C in the binary) resets the run instead of killing the
/// process. It is polled as one future for the whole run so an interrupt
/// arriving between loop passes is not lost.
async fn run_quietly(
    orchestrator: &WorkflowOrchestrator,
    input: FormInput,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<RunOutcome> {
    let run = orchestrator.run(input);
    tokio::pin!(run, interrupt);
    let mut interrupted = false;
    loop {
        tokio::select! {
            outcome = &mut run => return outcome.map_err(Into::into),
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                orchestrator.reset();
            }
        }
    }
}

async fn run_animated(
    orchestrator: &WorkflowOrchestrator,
    input: FormInput,
    painter: Painter,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<RunOutcome> {
    let scenario = orchestrator.scenario();
    let live = std::io::stderr().is_terminal();
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", painter.paint_all(&render_input(&input)))?;

    let mut rx = orchestrator.subscribe();
    let mut ticker = ProgressTicker::new();
    let mut interval = tokio::time::interval(PROGRESS_TICK);
    let run = orchestrator.run(input);
    tokio::pin!(run, interrupt);
    let mut interrupted = false;

    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome?,
            changed = rx.changed() => {
                if changed.is_err() {
                    continue;
                }
                let snapshot = rx.borrow_and_update().clone();
                if ticker.observe(&snapshot) {
                    if live {
                        writeln!(stderr)?;
                    }
                    let panel = render_stage_panel(&snapshot, ticker.percent(), scenario);
                    write!(stderr, "\n{}", painter.paint_all(&panel))?;
                }
            }
            _ = interval.tick() => {
                let processing = orchestrator.snapshot().is_processing;
                let percent = ticker.tick(processing);
                if live && processing {
                    write!(stderr, "\r  {percent:>3}%")?;
                    stderr.flush()?;
                }
            }
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                orchestrator.reset();
            }
        }
    };

    let snapshot = orchestrator.snapshot();
    if ticker.observe(&snapshot) {
        if live {
            writeln!(stderr)?;
        }
        let panel = render_stage_panel(&snapshot, ticker.percent(), scenario);
        write!(stderr, "\n{}", painter.paint_all(&panel))?;
    }
    // Completion caption stays up before the report scrolls it away.
    if live && matches!(outcome, RunOutcome::Completed(_)) {
        tokio::time::sleep(CAPTION_LINGER).await;
    }
    Ok(outcome)
}

fn print_report(report: &AnnotationReport, args: &RunArgs, config: &WorkflowConfig) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(report).context("serialize report")?;
        println!("{json}");
        return Ok(());
    }
    let painter = Painter::detect(config.color, Stream::Stdout);
    let renderer = ReportRenderer::new(config.wrap_width);
    let lines = match args.tab {
        TabSelection::All => renderer.render_all(report),
        TabSelection::One(tab) => {
            let mut lines = renderer.header();
            lines.push(renderer.tab_strip(tab));
            lines.extend(renderer.render_tab(report, tab));
            lines
        }
    };
    print!("{}", painter.paint_all(&lines));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cassia_workflow::StageTimings;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn spleen() -> FormInput {
        FormInput::new("Spleen", "Cd19, Pax5", "Mouse")
    }

    fn interrupt_after(delay: Duration) -> impl Future<Output = std::io::Result<()>> {
        async move {
            tokio::time::sleep(delay).await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_resets_a_quiet_run() {
        let orchestrator =
            WorkflowOrchestrator::new(StageTimings::default(), ReportScenario::default());
        let interrupt = interrupt_after(Duration::from_secs(5));
        let outcome = run_quietly(&orchestrator, spleen(), interrupt)
            .await
            .expect("quiet run");
        assert_eq!(outcome, RunOutcome::Reset);
        assert!(orchestrator.snapshot().step.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_survives_progress_ticks() {
        // Seconds of 30 ms ticks pass before the interrupt fires; it still
        // has to land on the same run.
        let orchestrator =
            WorkflowOrchestrator::new(StageTimings::default(), ReportScenario::default());
        let started = tokio::time::Instant::now();
        let outcome = run_animated(
            &orchestrator,
            spleen(),
            Painter::detect(Some(false), Stream::Stderr),
            interrupt_after(Duration::from_secs(5)),
        )
        .await
        .expect("animated run");
        assert_eq!(outcome, RunOutcome::Reset);
        assert!(started.elapsed() < Duration::from_secs(6));
        let snapshot = orchestrator.snapshot();
        assert!(snapshot.step.is_idle());
        assert_eq!(snapshot.report, None);
    }

    #[tokio::test(start_paused = true)]
    async fn uninterrupted_run_completes() {
        let orchestrator =
            WorkflowOrchestrator::new(StageTimings::instant(), ReportScenario::default());
        let never = std::future::pending::<std::io::Result<()>>();
        let outcome = run_quietly(&orchestrator, spleen(), never)
            .await
            .expect("quiet run");
        assert!(matches!(outcome, RunOutcome::Completed(_)));
    }

    #[test]
    fn tab_selection_parses_all_and_single_tabs() {
        assert_eq!("all".parse::<TabSelection>(), Ok(TabSelection::All));
        assert_eq!(
            "Quality".parse::<TabSelection>(),
            Ok(TabSelection::One(ReportTab::Quality))
        );
        assert!("charts".parse::<TabSelection>().is_err());
    }
}
