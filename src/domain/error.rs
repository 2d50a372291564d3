use thiserror::Error;

/// Preconditions of the evaluation sequence.
///
/// Everything else (bad checkpoint files, runtime failures) is
/// reported through `anyhow` with context attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvaluateError {
    #[error("no model set: call set_model() first")]
    ModelNotSet,

    #[error("no loss function set: call set_loss() first")]
    LossNotSet,
}
