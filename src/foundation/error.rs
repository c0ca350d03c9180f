/// Convenience result type used across ledgerpie.
pub type ChartResult<T> = Result<T, ChartError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    /// Invalid caller-provided data (progress, step size, style, input documents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while handing a frame to the displaying surface.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChartError {
    /// Build a [`ChartError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChartError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ChartError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`ChartError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
