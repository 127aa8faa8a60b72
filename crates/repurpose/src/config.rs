//! Pipeline configuration.

use prompt_guard::{prompt_safe_string_schema, FieldKind, LengthBounds, PromptSafeString};
use serde::{Deserialize, Serialize};
use thread_splitter::SplitterConfig;

/// Default minimum length of submitted content, in characters.
pub const DEFAULT_CONTENT_MIN_LENGTH: usize = 10;

/// Default maximum length of submitted content, in characters.
pub const DEFAULT_CONTENT_MAX_LENGTH: usize = 5000;

/// Default maximum length of a persona description, in characters.
pub const DEFAULT_PERSONA_MAX_LENGTH: usize = 500;

/// Length limits for the user-supplied fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldRules {
    pub content_min_length: usize,
    pub content_max_length: usize,
    pub persona_max_length: usize,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            content_min_length: DEFAULT_CONTENT_MIN_LENGTH,
            content_max_length: DEFAULT_CONTENT_MAX_LENGTH,
            persona_max_length: DEFAULT_PERSONA_MAX_LENGTH,
        }
    }
}

impl FieldRules {
    /// Load limits from the environment.
    ///
    /// # Optional Environment Variables
    /// - `CONTENT_MIN_LENGTH` (default: 10)
    /// - `CONTENT_MAX_LENGTH` (default: 5000)
    /// - `PERSONA_MAX_LENGTH` (default: 500)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            content_min_length: env_usize("CONTENT_MIN_LENGTH", DEFAULT_CONTENT_MIN_LENGTH),
            content_max_length: env_usize("CONTENT_MAX_LENGTH", DEFAULT_CONTENT_MAX_LENGTH),
            persona_max_length: env_usize("PERSONA_MAX_LENGTH", DEFAULT_PERSONA_MAX_LENGTH),
        }
    }

    /// Validation rule for the core idea.
    #[must_use]
    pub fn content_schema(&self) -> PromptSafeString {
        prompt_safe_string_schema(
            FieldKind::Content,
            LengthBounds::new()
                .min(
                    self.content_min_length,
                    format!(
                        "Content must be at least {} characters",
                        self.content_min_length
                    ),
                )
                .max(
                    self.content_max_length,
                    format!(
                        "Content must be at most {} characters",
                        self.content_max_length
                    ),
                ),
        )
    }

    /// Validation rule for the optional persona.
    #[must_use]
    pub fn persona_schema(&self) -> PromptSafeString {
        prompt_safe_string_schema(
            FieldKind::Persona,
            LengthBounds::new().max(
                self.persona_max_length,
                format!(
                    "Persona must be at most {} characters",
                    self.persona_max_length
                ),
            ),
        )
    }
}

/// Everything the pipeline needs besides the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub fields: FieldRules,
    pub splitter: SplitterConfig,
}

impl PipelineConfig {
    /// Load both field and splitter limits from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            fields: FieldRules::from_env(),
            splitter: SplitterConfig::from_env(),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
