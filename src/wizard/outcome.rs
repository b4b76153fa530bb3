//! Typed view over a finished questionnaire.

use serde::Serialize;

use super::error::WizardError;
use super::session::WizardSession;
use super::stages::{
    StageGraph, AD_GROUP_COUNT, AUDIENCE, BROAD_AWARENESS, CAMPAIGN_GOALS, FULL_CAMPAIGN,
    IN_MARKET, TARGET_ROLE, WELCOME,
};
use crate::knowledge::RoleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    FullCampaign,
    AdsOnly,
}

/// Everything synthesis needs from the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildBrief {
    pub mode: BuildMode,
    pub role: RoleId,
    pub in_market: bool,
    pub goals: String,
    pub group_count: usize,
}

impl BuildBrief {
    /// Reads the answers of a session sitting on the final stage.
    pub fn from_session(session: &WizardSession, graph: &StageGraph) -> Result<Self, WizardError> {
        if session.current() != graph.final_stage().id {
            return Err(WizardError::NotComplete {
                stage: session.current().to_string(),
            });
        }
        let answer = |stage: &str| {
            session
                .response(stage)
                .ok_or_else(|| WizardError::MissingResponse {
                    stage: stage.to_string(),
                })
        };

        let mode = if answer(WELCOME)?.eq_ignore_ascii_case(FULL_CAMPAIGN) {
            BuildMode::FullCampaign
        } else {
            BuildMode::AdsOnly
        };
        let in_market = match session.response(AUDIENCE) {
            Some(value) if value.eq_ignore_ascii_case(BROAD_AWARENESS) => false,
            Some(value) => value.eq_ignore_ascii_case(IN_MARKET),
            None => true,
        };
        let group_count = match session.response(AD_GROUP_COUNT) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| WizardError::InvalidResponseFormat {
                    stage: AD_GROUP_COUNT.to_string(),
                    reason: format!("'{value}' is not a number"),
                })?,
            None => 1,
        };

        Ok(Self {
            mode,
            role: RoleId::parse(answer(TARGET_ROLE)?),
            in_market,
            goals: session.response(CAMPAIGN_GOALS).unwrap_or_default().to_string(),
            group_count,
        })
    }
}
