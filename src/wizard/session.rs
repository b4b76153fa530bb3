use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The mutable record of one conversation: where it is and what was answered.
///
/// Only [`super::WizardEngine`] transitions produce new states, so the final
/// stage can only be reached by answering the stage before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSession {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    current: String,
    responses: BTreeMap<String, String>,
}

impl WizardSession {
    pub(crate) fn new(initial: &str) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            current: initial.to_string(),
            responses: BTreeMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn response(&self, stage: &str) -> Option<&str> {
        self.responses.get(stage).map(String::as_str)
    }

    pub fn responses(&self) -> &BTreeMap<String, String> {
        &self.responses
    }

    pub(crate) fn record(mut self, stage: &str, response: String, next: &str) -> Self {
        self.responses.insert(stage.to_string(), response);
        self.current = next.to_string();
        self
    }

    pub(crate) fn move_to(mut self, stage: &str) -> Self {
        self.current = stage.to_string();
        self
    }

    pub(crate) fn cleared(mut self, initial: &str) -> Self {
        self.current = initial.to_string();
        self.responses.clear();
        self
    }
}
