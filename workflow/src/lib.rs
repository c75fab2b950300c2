mod config;
mod error;
mod form;
mod markers;
mod orchestrator;
mod render;
mod report;
mod request;
mod state;
mod visualizer;

pub use config::ConfigOverrides;
pub use config::StageTimings;
pub use config::WorkflowConfig;
pub use config::find_cassia_home;
pub use error::FormError;
pub use error::Result;
pub use error::WorkflowError;
pub use form::DEFAULT_MARKERS;
pub use form::DEFAULT_SPECIES;
pub use form::DEFAULT_TISSUE;
pub use form::FieldMode;
pub use form::FormCollector;
pub use form::FormInput;
pub use form::Preset;
pub use form::SPECIES_PRESETS;
pub use form::TISSUE_PRESETS;
pub use form::find_preset;
pub use markers::FALLBACK_DESCRIPTION;
pub use markers::describe_marker;
pub use markers::describe_marker_or_fallback;
pub use orchestrator::RunOutcome;
pub use orchestrator::WorkflowOrchestrator;
pub use render::ReportRenderer;
pub use render::ReportTab;
pub use render::ScoreTier;
pub use render::StyledLine;
pub use render::Tone;
pub use render::render_input;
pub use render::render_stage_panel;
pub use report::AnnotationReport;
pub use report::NamedNote;
pub use report::ReportScenario;
pub use report::derive_report;
pub use report::derive_report_with_rng;
pub use report::is_b_cell_profile;
pub use report::tissue_cell_type;
pub use request::load_request;
pub use state::StageCounter;
pub use state::WorkflowSnapshot;
pub use visualizer::CAPTION_LINGER;
pub use visualizer::PROGRESS_TICK;
pub use visualizer::ProgressTicker;
