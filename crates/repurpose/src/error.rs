//! Pipeline error types.

use prompt_guard::{FieldError, SecurityError};
use thiserror::Error;
use thread_splitter::SplitError;

use crate::platform::Platform;

/// Errors raised while turning an idea into accepted drafts.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// User input failed validation; show the message next to the field.
    #[error("Invalid {field}: {0}", field = .0.field())]
    Rejected(#[from] FieldError),

    /// The model returned a draft that leaks its prompt.
    #[error("Unsafe {platform} draft: {source}")]
    UnsafeOutput {
        platform: Platform,
        #[source]
        source: SecurityError,
    },

    /// The X draft could not be turned into a thread.
    #[error("X thread error: {0}")]
    Split(#[from] SplitError),

    /// The model's reply was not a usable draft set.
    #[error("Malformed model response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The model call itself failed.
    #[error("Draft generation failed: {0}")]
    Generator(String),

    /// The prompt template failed to register or render.
    #[error("Prompt template error: {0}")]
    Template(String),
}

/// Result type for pipeline operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

impl GenerationError {
    /// Whether regenerating the drafts may succeed.
    ///
    /// Split failures count: the X draft came from the model, and a fresh
    /// draft may fit.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UnsafeOutput { .. }
                | Self::Split(_)
                | Self::MalformedResponse(_)
                | Self::Generator(_)
        )
    }

    /// Whether the error is the user's to fix.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
