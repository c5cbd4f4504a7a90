/// Crate-wide result alias.
pub type StrataResult<T> = Result<T, StrataError>;

/// Error taxonomy for bootstrap and rendering.
///
/// Only bootstrap paths (asset load, layer construction, script compilation) are expected to
/// produce errors. Ticking a started session never fails.
#[derive(thiserror::Error, Debug)]
pub enum StrataError {
    /// Invalid configuration or argument.
    #[error("validation error: {0}")]
    Validation(String),

    /// Asset could not be loaded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Shading layer or material could not be constructed.
    #[error("material error: {0}")]
    Material(String),

    /// Choreography script could not be compiled.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Frame buffers were used inconsistently.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Build a [`StrataError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StrataError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`StrataError::Material`].
    pub fn material(msg: impl Into<String>) -> Self {
        Self::Material(msg.into())
    }

    /// Build a [`StrataError::Timeline`].
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`StrataError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StrataError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
