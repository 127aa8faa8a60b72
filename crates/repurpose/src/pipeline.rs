//! Idea → prompt → drafts → accepted drafts.
//!
//! The pipeline never talks to a model itself. Callers supply a
//! [`DraftGenerator`]; everything else here is synchronous and pure.

use std::collections::BTreeMap;

use async_trait::async_trait;
use prompt_guard::validate_ai_output;
use serde::{Deserialize, Serialize};
use thread_splitter::{split_x_thread, SplitterConfig};
use tracing::{debug, info, warn};

use crate::config::{FieldRules, PipelineConfig};
use crate::error::{GenerationError, GenerationResult};
use crate::platform::{DraftSet, Platform};
use crate::prompts::PromptRenderer;

/// An idea as submitted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaSubmission {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

impl IdeaSubmission {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            persona: None,
        }
    }

    #[must_use]
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }
}

/// A submission that passed validation. Fields are sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeIdea {
    pub content: String,
    pub persona: Option<String>,
}

/// Drafts accepted for display and storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDrafts {
    /// Every accepted draft, unchanged.
    pub drafts: BTreeMap<Platform, String>,
    /// The X draft split into tweets, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_thread: Option<Vec<String>>,
}

/// Source of model-written drafts.
///
/// Implemented outside this crate by whatever calls the AI service.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Send `prompt` to the model and return its raw reply.
    async fn complete(&self, prompt: &str) -> GenerationResult<String>;
}

/// Validate and sanitize both user fields.
pub fn validate_submission(
    submission: &IdeaSubmission,
    rules: &FieldRules,
) -> GenerationResult<SafeIdea> {
    let content = rules.content_schema().validate(&submission.content)?;
    let persona = rules
        .persona_schema()
        .validate_optional(submission.persona.as_deref())?;
    Ok(SafeIdea { content, persona })
}

/// Screen every draft and split the X draft into a thread.
///
/// Any leaking draft fails the whole set; nothing is partially accepted.
pub fn process_drafts(
    drafts: DraftSet,
    splitter: &SplitterConfig,
) -> GenerationResult<ProcessedDrafts> {
    for (platform, text) in &drafts.drafts {
        validate_ai_output(text).map_err(|source| {
            warn!(%platform, "Rejected model draft");
            GenerationError::UnsafeOutput {
                platform: *platform,
                source,
            }
        })?;
    }

    let x_thread = match drafts.get(Platform::X) {
        Some(text) => Some(split_x_thread(text, splitter)?),
        None => None,
    };
    if let Some(thread) = &x_thread {
        debug!(tweets = thread.len(), "Split X draft");
    }

    Ok(ProcessedDrafts {
        drafts: drafts.drafts,
        x_thread,
    })
}

/// Validate → render → generate → process.
pub struct Pipeline<G> {
    generator: G,
    renderer: PromptRenderer,
    config: PipelineConfig,
}

impl<G: DraftGenerator> Pipeline<G> {
    pub fn new(generator: G, config: PipelineConfig) -> GenerationResult<Self> {
        Ok(Self {
            generator,
            renderer: PromptRenderer::new()?,
            config,
        })
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: PromptRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run one submission end to end. No retries happen here; use
    /// [`GenerationError::is_retryable`] to decide whether to call again.
    pub async fn run(&self, submission: &IdeaSubmission) -> GenerationResult<ProcessedDrafts> {
        let idea = validate_submission(submission, &self.config.fields)?;
        let prompt = self.renderer.render(&idea)?;

        debug!(prompt_len = prompt.len(), "Requesting drafts");
        let reply = self.generator.complete(&prompt).await?;
        let drafts = DraftSet::from_model_response(&reply)?;

        let processed = process_drafts(drafts, &self.config.splitter)?;
        info!(
            platforms = processed.drafts.len(),
            tweets = processed.x_thread.as_ref().map_or(0, Vec::len),
            "Drafts accepted"
        );
        Ok(processed)
    }
}
