/// Convenience result type used across storyfront.
pub type StoryResult<T> = Result<T, StoryError>;

/// Top-level error taxonomy used by the page, cart, and frame engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StoryError {
    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A product key that is not part of the catalog (or has no frame set).
    #[error("unknown product key '{0}'")]
    UnknownProduct(String),

    /// A displayed price that does not match the configured currency format.
    #[error("price error: {0}")]
    Price(String),

    /// Frame loading or decoding failed.
    #[error("asset error: {0}")]
    Asset(String),

    /// Drawing onto a surface failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryError {
    /// Build a [`StoryError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryError::UnknownProduct`] value.
    pub fn unknown_product(key: impl Into<String>) -> Self {
        Self::UnknownProduct(key.into())
    }

    /// Build a [`StoryError::Price`] value.
    pub fn price(msg: impl Into<String>) -> Self {
        Self::Price(msg.into())
    }

    /// Build a [`StoryError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`StoryError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StoryError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
