//! Prompt screening for the generation pipeline.
//!
//! Two directions are covered:
//!
//! - **Into the model**: [`sanitize_user_input`] normalizes user text and
//!   [`detect_injection_attempt`] flags text that tries to steer the model,
//!   including hex/base64-smuggled payloads. [`prompt_safe_string_schema`]
//!   combines both with length limits into a per-field rule.
//! - **Out of the model**: [`validate_ai_output`] rejects drafts that leak
//!   the system prompt. Output is never rewritten.
//!
//! These are heuristics layered on top of the model's own instruction
//! hierarchy. Misses are tolerated; false alarms on ordinary writing are not.

pub mod detect;
pub mod error;
pub mod output;
pub mod sanitize;
pub mod schema;
pub mod signatures;

pub use detect::{detect_injection_attempt, matched_signatures};
pub use error::{FieldError, SecurityError};
pub use output::{validate_ai_output, SYSTEM_PERSONA};
pub use sanitize::sanitize_user_input;
pub use schema::{prompt_safe_string_schema, FieldKind, LengthBound, LengthBounds, PromptSafeString};
