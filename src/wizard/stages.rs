//! Stage table for the guided questionnaire.
//!
//! A table is validated into a [`StageGraph`] once at startup: a simple path
//! from `welcome` to the single final stage. "Back" is therefore always the
//! previous stage in path order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::error::StageGraphError;

pub const WELCOME: &str = "welcome";
pub const TARGET_ROLE: &str = "target_role";
pub const AUDIENCE: &str = "audience";
pub const CAMPAIGN_GOALS: &str = "campaign_goals";
pub const AD_GROUP_COUNT: &str = "ad_group_count";
pub const SUMMARY: &str = "summary";

pub const FULL_CAMPAIGN: &str = "Full Campaign";
pub const ADS_ONLY: &str = "Ads Only";
pub const IN_MARKET: &str = "In-Market";
pub const BROAD_AWARENESS: &str = "Broad Awareness";

/// Where a stage's allowed answers come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageOptions {
    #[default]
    FreeText,
    Fixed {
        choices: Vec<String>,
    },
    /// Role labels of whatever knowledge base is current when the stage is shown.
    KnowledgeRoles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    /// Prompt text; the final stage may reference answers as `{stage_id}`.
    pub message: String,
    #[serde(default)]
    pub options: StageOptions,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub is_final: bool,
}

impl Stage {
    fn new(id: &str, message: &str, options: StageOptions, next: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            message: message.to_string(),
            options,
            next: next.map(str::to_string),
            is_final: next.is_none(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StageTable {
    #[serde(default)]
    stage: Vec<Stage>,
}

/// Validated stage path, stored in path order.
#[derive(Debug, Clone)]
pub struct StageGraph {
    stages: Vec<Stage>,
    positions: HashMap<String, usize>,
}

impl StageGraph {
    pub fn new(stages: Vec<Stage>) -> Result<Self, StageGraphError> {
        let mut by_id: HashMap<String, Stage> = HashMap::new();
        for stage in stages {
            if by_id.contains_key(&stage.id) {
                return Err(StageGraphError::DuplicateStage(stage.id));
            }
            by_id.insert(stage.id.clone(), stage);
        }
        let finals: Vec<&Stage> = by_id.values().filter(|s| s.is_final).collect();
        if finals.len() != 1 {
            return Err(StageGraphError::FinalStageCount(finals.len()));
        }
        if !by_id.contains_key(WELCOME) {
            return Err(StageGraphError::MissingInitial(WELCOME.to_string()));
        }

        let total = by_id.len();
        let mut ordered = Vec::with_capacity(total);
        let mut positions = HashMap::new();
        let mut cursor = Some(WELCOME.to_string());
        while let Some(id) = cursor {
            if positions.contains_key(&id) {
                return Err(StageGraphError::Cycle(id));
            }
            let stage = by_id
                .remove(&id)
                .ok_or_else(|| StageGraphError::Cycle(id.clone()))?;
            cursor = match (&stage.next, stage.is_final) {
                (Some(_), true) => return Err(StageGraphError::FinalWithNext(stage.id)),
                (None, false) => return Err(StageGraphError::DanglingStage(stage.id)),
                (None, true) => None,
                (Some(next), false) => {
                    if !by_id.contains_key(next) && !positions.contains_key(next) && *next != id {
                        return Err(StageGraphError::UnknownNext {
                            stage: stage.id.clone(),
                            next: next.clone(),
                        });
                    }
                    Some(next.clone())
                }
            };
            positions.insert(id, ordered.len());
            ordered.push(stage);
        }

        if !by_id.is_empty() {
            let mut orphans: Vec<String> = by_id.into_keys().collect();
            orphans.sort();
            return Err(StageGraphError::Unreachable(orphans));
        }
        Ok(Self {
            stages: ordered,
            positions,
        })
    }

    pub fn from_toml_str(data: &str) -> Result<Self, StageGraphError> {
        let table: StageTable =
            toml::from_str(data).map_err(|err| StageGraphError::Parse(err.to_string()))?;
        Self::new(table.stage)
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stage table {:?}", path))?;
        Self::from_toml_str(&data).with_context(|| format!("Invalid stage table {:?}", path))
    }

    pub fn initial(&self) -> &Stage {
        &self.stages[0]
    }

    pub fn final_stage(&self) -> &Stage {
        &self.stages[self.stages.len() - 1]
    }

    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.positions.get(id).map(|&index| &self.stages[index])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Stage immediately before `id` in path order.
    pub fn previous(&self, id: &str) -> Option<&Stage> {
        let index = self.position(id)?;
        index.checked_sub(1).map(|prev| &self.stages[prev])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for StageGraph {
    fn default() -> Self {
        let stages = default_stages();
        let positions = stages
            .iter()
            .enumerate()
            .map(|(index, stage)| (stage.id.clone(), index))
            .collect();
        Self { stages, positions }
    }
}

/// The built-in questionnaire, in path order.
pub fn default_stages() -> Vec<Stage> {
    let group_counts = (1..=10).map(|n| n.to_string()).collect();
    vec![
        Stage::new(
            WELCOME,
            "Welcome to the PPC Campaign Builder. What would you like to create?",
            StageOptions::Fixed {
                choices: vec![FULL_CAMPAIGN.into(), ADS_ONLY.into()],
            },
            Some(TARGET_ROLE),
        ),
        Stage::new(
            TARGET_ROLE,
            "Which role are you targeting? Pick General to speak to every role at once.",
            StageOptions::KnowledgeRoles,
            Some(AUDIENCE),
        ),
        Stage::new(
            AUDIENCE,
            "Is this audience actively researching a solution, or should we build broad awareness?",
            StageOptions::Fixed {
                choices: vec![IN_MARKET.into(), BROAD_AWARENESS.into()],
            },
            Some(CAMPAIGN_GOALS),
        ),
        Stage::new(
            CAMPAIGN_GOALS,
            "What should this campaign achieve? Describe your goals in a sentence or two.",
            StageOptions::FreeText,
            Some(AD_GROUP_COUNT),
        ),
        Stage::new(
            AD_GROUP_COUNT,
            "How many ad groups should the campaign have?",
            StageOptions::Fixed {
                choices: group_counts,
            },
            Some(SUMMARY),
        ),
        Stage::new(
            SUMMARY,
            "Here is your build:\n\
             - Output: {welcome}\n\
             - Target role: {target_role}\n\
             - Audience: {audience}\n\
             - Goals: {campaign_goals}\n\
             - Ad groups: {ad_group_count}\n\
             Generate when ready, or go back to change an answer.",
            StageOptions::FreeText,
            None,
        ),
    ]
}
