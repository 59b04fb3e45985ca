use thiserror::Error;

/// Failure modes of the engine.
///
/// None of these are retried internally; every fallible operation returns
/// them to the caller. Divergent loss is not an error; it is visible in
/// the loss values a training run reports.
#[derive(Debug, Error)]
pub enum NetError {
    /// A vector length does not match what a layer or network expects.
    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An operation was called out of order (e.g. a weight update with no
    /// completed backward pass).
    #[error("uninitialized state: {0}")]
    UninitializedState(&'static str),

    /// Training or validation was invoked with zero exemplars.
    #[error("dataset contains no exemplars")]
    EmptyDataset,

    /// A persisted network failed structural validation; the file is
    /// rejected and nothing partial is loaded.
    #[error("corrupt persisted network: {0}")]
    CorruptModel(String),

    /// A hyperparameter, loop setting, or layer stack is out of its
    /// valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;
