//! Contract with the external text generation service.
//!
//! The service is an opaque text-in/text-out capability. Transport and
//! authentication belong to the implementor; this module only builds the
//! instruction, bounds the call with a timeout, and classifies failures.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::knowledge::{AudienceSegment, RoleProfile};

use super::limits::{MAX_DESCRIPTIONS, MAX_DESCRIPTION_CHARS, MAX_HEADLINES, MAX_HEADLINE_CHARS};

pub const HEADLINES_MARKER: &str = "HEADLINES";
pub const DESCRIPTIONS_MARKER: &str = "DESCRIPTIONS";

/// Everything sent to the generation service for one ad variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub role: String,
    pub product_category: String,
    pub pain_points: Vec<String>,
    pub value_props: Vec<String>,
    pub goals: String,
    /// In-market flag plus the seniority/department classification of the role.
    pub audience: AudienceSegment,
    pub max_output_tokens: u32,
    /// Rendered natural-language instruction.
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(
        profile: &RoleProfile,
        audience: AudienceSegment,
        product_category: &str,
        goals: &str,
        max_output_tokens: u32,
    ) -> Self {
        let mut request = Self {
            role: profile.role.clone(),
            product_category: product_category.trim().to_string(),
            pain_points: profile.pain_points.clone(),
            value_props: profile.value_props.clone(),
            goals: goals.trim().to_string(),
            audience,
            max_output_tokens,
            prompt: String::new(),
        };
        request.prompt = render_prompt(&request);
        request
    }

    pub fn in_market(&self) -> bool {
        self.audience.in_market
    }
}

/// Opaque text generation capability.
pub trait GenerationService: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationFailure>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation transport failed: {0}")]
    Transport(String),

    #[error("generation response unusable: {0}")]
    Malformed(String),
}

/// Runs one generation call on a worker thread and waits at most `timeout`.
///
/// There is no retry. The service call cannot be interrupted: after a timeout
/// the worker keeps running until the service returns, and its late reply is
/// logged and discarded. A service that never returns holds its thread for
/// the life of the process, so implementors should bound their own I/O.
pub fn generate_with_timeout(
    service: &Arc<dyn GenerationService>,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<String, GenerationFailure> {
    let (tx, rx) = mpsc::channel();
    let service = Arc::clone(service);
    let request = request.clone();
    thread::Builder::new()
        .name("ad-generation".into())
        .spawn(move || {
            let reply = service.generate(&request);
            if tx.send(reply).is_err() {
                warn!(role = %request.role, "Generation reply arrived after the timeout; discarded");
            }
        })
        .map_err(|err| GenerationFailure::Transport(err.to_string()))?;
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(GenerationFailure::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(GenerationFailure::Transport(
            "generation worker exited without a reply".into(),
        )),
    }
}

fn render_prompt(request: &GenerationRequest) -> String {
    let framing = if request.in_market() {
        format!(
            "bottom-of-funnel buyers who are actively evaluating {} software; be direct and conversion-focused",
            request.product_category
        )
    } else {
        format!(
            "a broad awareness audience that has not started looking for {} software; lead with the problem and build recognition",
            request.product_category
        )
    };
    let seniority = request.audience.seniority.as_deref().unwrap_or("(any)");
    let department = request.audience.department.as_deref().unwrap_or("(any)");
    let goals = if request.goals.is_empty() {
        "(none given)"
    } else {
        request.goals.as_str()
    };
    format!(
        r#"=== SEARCH AD COPY ===

Target role: {role}
Audience: {framing}.
Seniority: {seniority}
Department: {department}

Pain points:
{pains}

Value propositions:
{values}

Campaign goals: {goals}

Write up to {max_headlines} headlines of at most {headline_chars} characters and up to {max_descriptions} descriptions of at most {description_chars} characters.
Answer in exactly this layout, one item per line:
{headlines_marker}:
- <headline>
{descriptions_marker}:
- <description>"#,
        role = request.role,
        pains = bullet_list(&request.pain_points),
        values = bullet_list(&request.value_props),
        max_headlines = MAX_HEADLINES,
        headline_chars = MAX_HEADLINE_CHARS,
        max_descriptions = MAX_DESCRIPTIONS,
        description_chars = MAX_DESCRIPTION_CHARS,
        headlines_marker = HEADLINES_MARKER,
        descriptions_marker = DESCRIPTIONS_MARKER,
    )
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)".into();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
