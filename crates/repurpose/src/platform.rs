//! Target platforms and draft collections.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A platform a draft is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    X,
    LinkedIn,
    TikTok,
    Blog,
}

impl Platform {
    /// Every platform, in prompt order.
    pub const ALL: [Platform; 4] = [Self::X, Self::LinkedIn, Self::TikTok, Self::Blog];

    /// Wire key used in prompts and JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::LinkedIn => "linkedin",
            Self::TikTok => "tiktok",
            Self::Blog => "blog",
        }
    }

    /// Writing guidance given to the model for this platform.
    #[must_use]
    pub fn guidance(self) -> &'static str {
        match self {
            Self::X => "a thread of short, punchy tweets, one numbered line per tweet (\"1/\", \"2/\", ...)",
            Self::LinkedIn => "a professional post with a strong first line and short paragraphs",
            Self::TikTok => "a spoken script with a hook in the first three seconds",
            Self::Blog => "an engaging introduction of two or three paragraphs",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown platform: {s}"))
    }
}

/// Raw drafts returned by the model, keyed by platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftSet {
    pub drafts: BTreeMap<Platform, String>,
}

impl DraftSet {
    /// Parse the model's reply: a JSON object keyed by platform, optionally
    /// inside a ```json fence or surrounded by chatter.
    pub fn from_model_response(response: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(extract_json_object(response))
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&str> {
        self.drafts.get(&platform).map(String::as_str)
    }

    pub fn insert(&mut self, platform: Platform, draft: impl Into<String>) {
        self.drafts.insert(platform, draft.into());
    }
}

fn extract_json_object(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
