use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Problems with the values gathered by [`crate::FormCollector`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{value:?} is not one of the {field} presets")]
    UnknownPreset { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid analysis request: {0}")]
    InvalidForm(#[from] FormError),

    /// A second run was started before the current one completed or was reset.
    #[error("a workflow run is already in progress (run {run_id})")]
    AlreadyRunning { run_id: u64 },

    /// A finished run has to be reset before the next one starts.
    #[error("workflow is at step {step}; reset it before starting a new run")]
    NotIdle { step: u8 },

    #[error("stage counter cannot move from {from} to {to}")]
    InvalidTransition { from: u8, to: u8 },
}
