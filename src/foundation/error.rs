/// Convenience result type used across paceframe.
pub type PaceframeResult<T> = Result<T, PaceframeError>;

/// Top-level error taxonomy.
///
/// Local, recoverable conditions (a record missing a field, an empty GPS
/// trail) are absorbed where they occur and never become errors. Anything
/// that would leave a job with an inconsistent result is escalated through
/// one of these variants.
#[derive(thiserror::Error, Debug)]
pub enum PaceframeError {
    /// Bad input surfaced before any pipeline work: missing files or fonts,
    /// malformed offsets, an empty record sequence, unusable probe output.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid arguments or job state (e.g. re-running a finished job).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing an overlay frame.
    #[error("render error: {0}")]
    Render(String),

    /// Fatal frame-pipeline failures; these abort the whole job.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaceframeError {
    /// Build a [`PaceframeError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`PaceframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PaceframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PaceframeError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }
}
