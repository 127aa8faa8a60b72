//! Content repurposing pipeline.
//!
//! Composes the two core crates in request order:
//!
//! 1. [`prompt_guard`] validates and sanitizes the submitted idea
//! 2. [`PromptRenderer`] wraps it into the generation prompt
//! 3. a caller-supplied [`DraftGenerator`] asks the model for drafts
//! 4. [`prompt_guard::validate_ai_output`] screens every draft
//! 5. [`thread_splitter`] turns the X draft into a thread
//!
//! # Configuration
//!
//! [`PipelineConfig::from_env`] reads:
//!
//! - `CONTENT_MIN_LENGTH`, `CONTENT_MAX_LENGTH`, `PERSONA_MAX_LENGTH`
//! - `THREAD_MAX_TWEET_LENGTH`, `THREAD_MAX_THREAD_LENGTH`

pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod prompts;

pub use config::{FieldRules, PipelineConfig};
pub use error::{GenerationError, GenerationResult};
pub use pipeline::{
    process_drafts, validate_submission, DraftGenerator, IdeaSubmission, Pipeline,
    ProcessedDrafts, SafeIdea,
};
pub use platform::{DraftSet, Platform};
pub use prompts::PromptRenderer;
