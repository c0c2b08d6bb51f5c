/// Convenience result type used across the crate.
pub type BplResult<T> = Result<T, BplError>;

/// Top-level error taxonomy used by model and renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum BplError {
    /// Caller contract violation: bad shapes, bad indices, bad argument combinations.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stochastic sampler could not produce an in-range draw.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Invalid rendering configuration.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing parameter files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BplError {
    /// Build a [`BplError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BplError::Sampling`] value.
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Build a [`BplError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BplError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
