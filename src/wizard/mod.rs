//! Guided questionnaire state machine.
//!
//! Transitions are pure: each takes the current [`WizardSession`] and returns
//! the next one, so independent sessions coexist and a rejected answer leaves
//! the caller's session untouched.

pub mod error;
pub mod outcome;
pub mod session;
pub mod stages;

use serde::Serialize;
use tracing::debug;

pub use error::{StageGraphError, WizardError};
pub use outcome::{BuildBrief, BuildMode};
pub use session::WizardSession;
pub use stages::{Stage, StageGraph, StageOptions};

use crate::knowledge::KnowledgeBase;

/// What the user should be shown for the active stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagePrompt {
    pub stage_id: String,
    pub message: String,
    /// Allowed answers; `None` for free text.
    pub options: Option<Vec<String>>,
    pub is_final: bool,
    /// Answer recorded on an earlier visit, offered as the default.
    pub prefill: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WizardEngine {
    graph: StageGraph,
}

impl WizardEngine {
    pub fn new(graph: StageGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &StageGraph {
        &self.graph
    }

    pub fn start(&self) -> WizardSession {
        WizardSession::new(&self.graph.initial().id)
    }

    /// Allowed answers for `stage`, resolved against `knowledge` at call time.
    pub fn options(&self, stage: &Stage, knowledge: &KnowledgeBase) -> Option<Vec<String>> {
        if stage.is_final {
            return None;
        }
        match &stage.options {
            StageOptions::FreeText => None,
            StageOptions::Fixed { choices } => Some(choices.clone()),
            StageOptions::KnowledgeRoles => Some(knowledge.role_options()),
        }
    }

    pub fn present(
        &self,
        session: &WizardSession,
        knowledge: &KnowledgeBase,
    ) -> Result<StagePrompt, WizardError> {
        let stage = self.current_stage(session)?;
        let message = if stage.is_final {
            self.render_summary(&stage.message, session)
        } else {
            stage.message.clone()
        };
        Ok(StagePrompt {
            stage_id: stage.id.clone(),
            message,
            options: self.options(stage, knowledge),
            is_final: stage.is_final,
            prefill: session.response(&stage.id).map(str::to_string),
        })
    }

    /// Records `response` for the active stage and moves to the next one.
    pub fn advance(
        &self,
        session: &WizardSession,
        response: &str,
        knowledge: &KnowledgeBase,
    ) -> Result<WizardSession, WizardError> {
        let stage = self.current_stage(session)?;
        let next = match (&stage.next, stage.is_final) {
            (Some(next), false) => next,
            _ => {
                return Err(WizardError::AlreadyComplete {
                    stage: stage.id.clone(),
                })
            }
        };
        let accepted = match self.options(stage, knowledge) {
            Some(allowed) => match_option(response, &allowed).ok_or_else(|| {
                WizardError::InvalidResponse {
                    stage: stage.id.clone(),
                    response: response.to_string(),
                    allowed: allowed.clone(),
                }
            })?,
            None => {
                let text = response.trim();
                if text.is_empty() {
                    return Err(WizardError::InvalidResponseFormat {
                        stage: stage.id.clone(),
                        reason: "an answer is required".into(),
                    });
                }
                text.to_string()
            }
        };
        debug!(
            session = %session.session_id(),
            from = %stage.id,
            to = %next,
            "Wizard advanced"
        );
        Ok(session.clone().record(&stage.id, accepted, next))
    }

    /// Steps back one stage, keeping every recorded answer.
    pub fn retreat(&self, session: &WizardSession) -> Result<WizardSession, WizardError> {
        let stage = self.current_stage(session)?;
        let previous = self
            .graph
            .previous(&stage.id)
            .ok_or(WizardError::NoPreviousStage)?;
        debug!(
            session = %session.session_id(),
            from = %stage.id,
            to = %previous.id,
            "Wizard retreated"
        );
        Ok(session.clone().move_to(&previous.id))
    }

    /// Returns to the initial stage with no answers.
    pub fn reset(&self, session: &WizardSession) -> WizardSession {
        debug!(session = %session.session_id(), "Wizard reset");
        session.clone().cleared(&self.graph.initial().id)
    }

    pub fn is_complete(&self, session: &WizardSession) -> bool {
        session.current() == self.graph.final_stage().id
    }

    fn current_stage(&self, session: &WizardSession) -> Result<&Stage, WizardError> {
        self.graph
            .stage(session.current())
            .ok_or_else(|| WizardError::UnknownStage(session.current().to_string()))
    }

    fn render_summary(&self, template: &str, session: &WizardSession) -> String {
        let mut rendered = template.to_string();
        for stage in self.graph.stages() {
            let placeholder = format!("{{{}}}", stage.id);
            if rendered.contains(&placeholder) {
                let value = session.response(&stage.id).unwrap_or("(not answered)");
                rendered = rendered.replace(&placeholder, value);
            }
        }
        rendered
    }
}

/// Canonical spelling of `response` among `allowed`, ignoring case and padding.
fn match_option(response: &str, allowed: &[String]) -> Option<String> {
    let response = response.trim();
    allowed
        .iter()
        .find(|option| option.as_str() == response)
        .or_else(|| {
            allowed
                .iter()
                .find(|option| option.eq_ignore_ascii_case(response))
        })
        .cloned()
}
