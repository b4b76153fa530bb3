//! Ad and campaign content synthesis.
//!
//! Knowledge entries are mapped to bounded ad artifacts either by templating
//! or through the generation service. Generation problems never escape this
//! module: any failure falls back to the templated copy.

pub mod generation;
pub mod limits;
pub mod parser;
pub mod templates;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub use generation::{GenerationFailure, GenerationRequest, GenerationService};
pub use parser::{parse_ad_copy, ParsedAdCopy};

use crate::config::{AppConfig, GenerationSettings};
use crate::knowledge::{AudienceSegment, KnowledgeBase, RoleId, RoleProfile};
use limits::{
    clamp_group_count, enforce, MAX_DESCRIPTIONS, MAX_DESCRIPTION_CHARS, MAX_HEADLINES,
    MAX_HEADLINE_CHARS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("No knowledge available for role '{0}'")]
    UnknownRole(String),
}

/// One set of headlines and descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdVariant {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

impl AdVariant {
    pub fn is_within_limits(&self) -> bool {
        self.headlines.len() <= MAX_HEADLINES
            && self.descriptions.len() <= MAX_DESCRIPTIONS
            && self
                .headlines
                .iter()
                .all(|h| h.chars().count() <= MAX_HEADLINE_CHARS)
            && self
                .descriptions
                .iter()
                .all(|d| d.chars().count() <= MAX_DESCRIPTION_CHARS)
    }

    fn repaired(self) -> Self {
        Self {
            headlines: enforce(self.headlines, MAX_HEADLINES, MAX_HEADLINE_CHARS),
            descriptions: enforce(self.descriptions, MAX_DESCRIPTIONS, MAX_DESCRIPTION_CHARS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdOrigin {
    Template,
    Generated,
}

/// A synthesized variant and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdDraft {
    pub variant: AdVariant,
    pub origin: AdOrigin,
    /// Why the generation path was abandoned, when it was attempted.
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroup {
    pub name: String,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
}

impl AdGroup {
    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// Adds a keyword; returns `false` when it is blank or already present.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        !keyword.is_empty() && self.keywords.insert(keyword.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStructure {
    pub role: String,
    pub in_market: bool,
    pub goals: String,
    pub ad_groups: Vec<AdGroup>,
}

impl CampaignStructure {
    pub fn group_mut(&mut self, index: usize) -> Option<&mut AdGroup> {
        self.ad_groups.get_mut(index)
    }
}

pub struct ContentSynthesizer {
    settings: GenerationSettings,
    fallback_to_general: bool,
    service: Option<Arc<dyn GenerationService>>,
}

impl ContentSynthesizer {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            fallback_to_general: false,
            service: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.generation.clone())
            .with_general_fallback(config.knowledge.fallback_to_general)
    }

    /// Attaches a generation service; it is consulted only when generation is enabled.
    pub fn with_service(mut self, service: Arc<dyn GenerationService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_general_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_general = enabled;
        self
    }

    pub fn uses_generation(&self) -> bool {
        self.settings.enabled && self.service.is_some()
    }

    pub fn resolve_profile<'k>(
        &self,
        knowledge: &'k KnowledgeBase,
        role: &RoleId,
    ) -> Result<&'k RoleProfile, SynthesisError> {
        if let Some(profile) = knowledge.profile(role) {
            return Ok(profile);
        }
        if self.fallback_to_general {
            warn!(role = %role, "Unknown role, using the general aggregate");
            return Ok(knowledge.general());
        }
        Err(SynthesisError::UnknownRole(role.label().to_string()))
    }

    /// Templated copy before size repair.
    pub fn draft_ads(
        &self,
        knowledge: &KnowledgeBase,
        role: &RoleId,
    ) -> Result<AdVariant, SynthesisError> {
        let profile = self.resolve_profile(knowledge, role)?;
        Ok(template_variant(profile))
    }

    pub fn synthesize_ads(
        &self,
        knowledge: &KnowledgeBase,
        role: &RoleId,
        in_market: bool,
        goals: &str,
    ) -> Result<AdVariant, SynthesisError> {
        Ok(self
            .synthesize_ads_detailed(knowledge, role, in_market, goals)?
            .variant)
    }

    pub fn synthesize_ads_detailed(
        &self,
        knowledge: &KnowledgeBase,
        role: &RoleId,
        in_market: bool,
        goals: &str,
    ) -> Result<AdDraft, SynthesisError> {
        let profile = self.resolve_profile(knowledge, role)?;
        let mut fallback_reason = None;
        if let Some(service) = self.service.as_ref().filter(|_| self.settings.enabled) {
            let audience = AudienceSegment::from_profile(role.clone(), profile, in_market);
            match self.generate(service, profile, audience, knowledge.product_category(), goals) {
                Ok(variant) => {
                    info!(role = %role, headlines = variant.headlines.len(), "Generated ad copy");
                    return Ok(AdDraft {
                        variant,
                        origin: AdOrigin::Generated,
                        fallback_reason: None,
                    });
                }
                Err(failure) => {
                    warn!(role = %role, reason = %failure, "Generation failed, using templated copy");
                    fallback_reason = Some(failure.to_string());
                }
            }
        }
        let variant = template_variant(profile).repaired();
        info!(role = %role, headlines = variant.headlines.len(), "Templated ad copy");
        Ok(AdDraft {
            variant,
            origin: AdOrigin::Template,
            fallback_reason,
        })
    }

    /// Placeholder ad groups for `role`; names and keywords are filled in by the caller.
    pub fn synthesize_campaign(
        &self,
        knowledge: &KnowledgeBase,
        role: &RoleId,
        in_market: bool,
        goals: &str,
        group_count: usize,
    ) -> Result<CampaignStructure, SynthesisError> {
        let profile = self.resolve_profile(knowledge, role)?;
        let count = clamp_group_count(group_count);
        if count != group_count {
            warn!(requested = group_count, clamped = count, "Ad group count clamped");
        }
        Ok(CampaignStructure {
            role: profile.role.clone(),
            in_market,
            goals: goals.trim().to_string(),
            ad_groups: vec![AdGroup::default(); count],
        })
    }

    fn generate(
        &self,
        service: &Arc<dyn GenerationService>,
        profile: &RoleProfile,
        audience: AudienceSegment,
        product_category: &str,
        goals: &str,
    ) -> Result<AdVariant, GenerationFailure> {
        let request = GenerationRequest::new(
            profile,
            audience,
            product_category,
            goals,
            self.settings.max_output_tokens,
        );
        let response = generation::generate_with_timeout(service, &request, self.settings.timeout())?;
        let parsed = parse_ad_copy(&response)?;
        let variant = AdVariant {
            headlines: parsed.headlines,
            descriptions: parsed.descriptions,
        }
        .repaired();
        if variant.headlines.is_empty() || variant.descriptions.is_empty() {
            return Err(GenerationFailure::Malformed(
                "no usable lines after size repair".into(),
            ));
        }
        Ok(variant)
    }
}

fn template_variant(profile: &RoleProfile) -> AdVariant {
    AdVariant {
        headlines: templates::headlines(profile),
        descriptions: templates::descriptions(profile),
    }
}
