/// Result alias used throughout answerviz.
pub type AnswerVizResult<T> = Result<T, AnswerVizError>;

/// Failure categories surfaced by the public API.
#[derive(thiserror::Error, Debug)]
pub enum AnswerVizError {
    /// A visualization or option value breaks an invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Sampling a visualization at some time failed.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Rasterizing frames or setting up render workers failed.
    #[error("render error: {0}")]
    Render(String),

    /// The model backend failed, timed out or exited non-zero.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, typically IO from a caller-supplied sink.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnswerVizError {
    /// Build an [`AnswerVizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AnswerVizError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build an [`AnswerVizError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`AnswerVizError::Upstream`] value.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Build an [`AnswerVizError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for AnswerVizError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
