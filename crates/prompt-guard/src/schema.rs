//! Validation rule for user text that will be embedded in a prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detect::matched_signatures;
use crate::error::FieldError;
use crate::sanitize::sanitize_user_input;

/// The two kinds of user text the generation prompt accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// The core idea to repurpose.
    Content,
    /// Optional voice/tone description.
    Persona,
}

impl FieldKind {
    /// Field name as used in forms and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Persona => "persona",
        }
    }

    /// Message shown when the injection check rejects this field.
    #[must_use]
    pub fn default_rejection_message(self) -> &'static str {
        match self {
            Self::Content => {
                "Your content contains patterns that look like instructions to the AI. Please rephrase it."
            }
            Self::Persona => {
                "Your persona description contains patterns that look like instructions to the AI. Please rephrase it."
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A length limit with the message shown when it is violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthBound {
    pub limit: usize,
    pub message: String,
}

/// Optional minimum and maximum length, in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: Option<LengthBound>,
    pub max: Option<LengthBound>,
}

impl LengthBounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn min(mut self, limit: usize, message: impl Into<String>) -> Self {
        self.min = Some(LengthBound {
            limit,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn max(mut self, limit: usize, message: impl Into<String>) -> Self {
        self.max = Some(LengthBound {
            limit,
            message: message.into(),
        });
        self
    }
}

/// Length bounds plus the injection check, as one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSafeString {
    kind: FieldKind,
    bounds: LengthBounds,
    injection_message: String,
}

/// Build the validation rule for a field.
#[must_use]
pub fn prompt_safe_string_schema(kind: FieldKind, bounds: LengthBounds) -> PromptSafeString {
    PromptSafeString {
        kind,
        bounds,
        injection_message: kind.default_rejection_message().to_string(),
    }
}

impl PromptSafeString {
    /// Replace the default injection rejection message.
    #[must_use]
    pub fn with_injection_message(mut self, message: impl Into<String>) -> Self {
        self.injection_message = message.into();
        self
    }

    /// Sanitize `value`, then check length and injection signatures.
    ///
    /// Returns the sanitized text, which is what should reach the prompt.
    pub fn validate(&self, value: &str) -> Result<String, FieldError> {
        let sanitized = sanitize_user_input(value);
        let actual = sanitized.chars().count();

        if let Some(min) = &self.bounds.min {
            if actual < min.limit {
                return Err(FieldError::TooShort {
                    field: self.kind,
                    min: min.limit,
                    actual,
                    message: min.message.clone(),
                });
            }
        }
        if let Some(max) = &self.bounds.max {
            if actual > max.limit {
                return Err(FieldError::TooLong {
                    field: self.kind,
                    max: max.limit,
                    actual,
                    message: max.message.clone(),
                });
            }
        }

        let signatures = matched_signatures(&sanitized);
        if !signatures.is_empty() {
            tracing::warn!(
                field = self.kind.as_str(),
                signatures = ?signatures,
                "Rejected input with injection signatures"
            );
            return Err(FieldError::Injection {
                field: self.kind,
                message: self.injection_message.clone(),
            });
        }

        Ok(sanitized)
    }

    /// Like [`validate`](Self::validate), but absent or blank input is accepted as `None`.
    pub fn validate_optional(&self, value: Option<&str>) -> Result<Option<String>, FieldError> {
        match value {
            Some(v) if !sanitize_user_input(v).is_empty() => self.validate(v).map(Some),
            _ => Ok(None),
        }
    }
}
