/// Convenience result type used across storypress.
pub type PressResult<T> = Result<T, PressError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PressError {
    /// Caller-provided input that cannot be processed (empty montage list, bad config values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced image could not be opened or decoded.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Drawing or encoding failed for a single montage or page.
    #[error("rendering failure: {0}")]
    Rendering(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PressError {
    /// Build a [`PressError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`PressError::ResourceUnavailable`] value.
    pub fn resource_unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    /// Build a [`PressError::Rendering`] value.
    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering(msg.into())
    }

    /// Build a [`PressError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True when the error only concerns a missing or undecodable resource.
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(self, Self::ResourceUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
