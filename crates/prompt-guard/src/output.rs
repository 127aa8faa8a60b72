//! Screening of model output before it is shown to a user.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SecurityError;
use crate::signatures::has_wrapper_tag;

/// Opening line of the generation system prompt.
pub const SYSTEM_PERSONA: &str = "You are an expert content repurposing strategist";

struct LeakSignature {
    name: &'static str,
    pattern: Regex,
}

static LEAK_SIGNATURES: LazyLock<Vec<LeakSignature>> = LazyLock::new(|| {
    let leak = |name: &'static str, pattern: &str| LeakSignature {
        name,
        pattern: Regex::new(pattern).expect("valid leak regex"),
    };
    vec![
        leak(
            "persona_restatement",
            r"(?i)\byou\s+are\s+an?\s+expert\s+content\s+(?:repurposing\s+)?strategist\b",
        ),
        leak("system_prompt", r"(?i)\bsystem\s+prompt\b"),
        leak("developer_message", r"(?i)\bdeveloper\s+(?:message|prompt)\b"),
        leak("hidden_instruction", r"(?i)\bhidden\s+instructions?\b"),
        leak(
            "instruction_disclosure",
            r"(?i)\bmy\s+(?:system\s+|original\s+|initial\s+)?instructions\s+(?:are|say|were)\b",
        ),
    ]
});

/// Names of the leak signatures present in `text`.
#[must_use]
pub fn matched_leak_signatures(text: &str) -> Vec<&'static str> {
    let mut matched: Vec<&'static str> = LEAK_SIGNATURES
        .iter()
        .filter(|sig| sig.pattern.is_match(text))
        .map(|sig| sig.name)
        .collect();
    if has_wrapper_tag(text) {
        matched.push("wrapper_tag");
    }
    matched
}

/// Reject model output that leaks the prompt it was given.
///
/// Output is never redacted: it is either accepted as-is or rejected.
pub fn validate_ai_output(text: &str) -> Result<(), SecurityError> {
    match matched_leak_signatures(text).first() {
        None => Ok(()),
        Some(&signature) => {
            tracing::warn!(signature, "AI output failed leak screening");
            Err(SecurityError::OutputLeak { signature })
        }
    }
}
