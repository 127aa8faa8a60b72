//! Error types for prompt screening.

use thiserror::Error;

use crate::schema::FieldKind;

/// Model output that must not be shown to a user.
///
/// The model misbehaved; callers should treat this as a transient server
/// fault and regenerate rather than surface the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("AI output failed security validation ({signature})")]
    OutputLeak { signature: &'static str },
}

/// A user-supplied field rejected by a [`PromptSafeString`](crate::PromptSafeString).
///
/// The display text is the user-facing message supplied by the caller or the
/// field's default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{message}")]
    TooShort {
        field: FieldKind,
        min: usize,
        actual: usize,
        message: String,
    },

    #[error("{message}")]
    TooLong {
        field: FieldKind,
        max: usize,
        actual: usize,
        message: String,
    },

    #[error("{message}")]
    Injection { field: FieldKind, message: String },
}

impl FieldError {
    /// The field the rejection belongs to.
    #[must_use]
    pub fn field(&self) -> FieldKind {
        match self {
            Self::TooShort { field, .. } | Self::TooLong { field, .. } | Self::Injection { field, .. } => {
                *field
            }
        }
    }
}
