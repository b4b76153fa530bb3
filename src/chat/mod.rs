use crate::config::AppConfig;
use crate::export::{ads_companion_path, export_ads, export_campaign};
use crate::knowledge::{load_sources_from_dir, KnowledgeBase, KnowledgeStore, TabularSource};
use crate::synthesis::{AdDraft, AdGroup, CampaignStructure, ContentSynthesizer};
use crate::wizard::{BuildBrief, BuildMode, StageGraph, StagePrompt, WizardEngine, WizardSession};
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a finished conversation produces.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildArtifact {
    Ads {
        ads: AdDraft,
    },
    Campaign {
        ads: AdDraft,
        structure: CampaignStructure,
    },
}

impl BuildArtifact {
    pub fn ads(&self) -> &AdDraft {
        match self {
            BuildArtifact::Ads { ads } | BuildArtifact::Campaign { ads, .. } => ads,
        }
    }
}

/// Lightweight facade that drives one builder conversation.
pub struct CampaignChat {
    store: Arc<KnowledgeStore>,
    engine: WizardEngine,
    synthesizer: ContentSynthesizer,
    session: WizardSession,
    artifact: Option<BuildArtifact>,
}

impl CampaignChat {
    pub fn new(
        store: Arc<KnowledgeStore>,
        engine: WizardEngine,
        synthesizer: ContentSynthesizer,
    ) -> Self {
        let session = engine.start();
        Self {
            store,
            engine,
            synthesizer,
            session,
            artifact: None,
        }
    }

    /// Builds a chat from configuration, loading knowledge from `sources_dir`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let graph = match &config.wizard.stages_file {
            Some(path) => StageGraph::load_from_path(path)?,
            None => StageGraph::default(),
        };
        let store = Arc::new(KnowledgeStore::new(
            config.knowledge.product_category.clone(),
        ));
        let sources_dir = config
            .knowledge
            .sources_dir
            .as_deref()
            .context("No knowledge sources directory configured (knowledge.sources_dir)")?;
        let chat = Self::new(
            store,
            WizardEngine::new(graph),
            ContentSynthesizer::from_config(config),
        );
        chat.reload_from_dir(sources_dir, config)?;
        Ok(chat)
    }

    /// Re-reads the knowledge directory; the active session keeps its answers.
    pub fn reload_from_dir(&self, dir: &Path, config: &AppConfig) -> Result<Arc<KnowledgeBase>> {
        let loaded = load_sources_from_dir(dir, &config.knowledge)?;
        for missing in &loaded.missing {
            warn!(error = %missing, "Per-role source unavailable; the role keeps its aggregate row only");
        }
        self.reload(&loaded.sources)
    }

    pub fn reload(&self, sources: &[TabularSource]) -> Result<Arc<KnowledgeBase>> {
        let knowledge = self
            .store
            .load(sources)
            .context("Failed to load knowledge sources")?;
        Ok(knowledge)
    }

    fn knowledge(&self) -> Result<Arc<KnowledgeBase>> {
        self.store
            .snapshot()
            .context("No knowledge base loaded. Load sources before starting the builder.")
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn engine(&self) -> &WizardEngine {
        &self.engine
    }

    pub fn prompt(&self) -> Result<StagePrompt> {
        let knowledge = self.knowledge()?;
        Ok(self.engine.present(&self.session, &knowledge)?)
    }

    pub fn respond(&mut self, text: &str) -> Result<StagePrompt> {
        let knowledge = self.knowledge()?;
        self.session = self.engine.advance(&self.session, text, &knowledge)?;
        Ok(self.engine.present(&self.session, &knowledge)?)
    }

    pub fn back(&mut self) -> Result<StagePrompt> {
        self.session = self.engine.retreat(&self.session)?;
        self.artifact = None;
        self.prompt()
    }

    pub fn restart(&mut self) -> Result<StagePrompt> {
        self.session = self.engine.reset(&self.session);
        self.artifact = None;
        self.prompt()
    }

    /// The most recent build, including any ad group edits made since.
    pub fn artifact(&self) -> Option<&BuildArtifact> {
        self.artifact.as_ref()
    }

    /// Names the ad group at `index` (0-based) and adds `keywords` to it.
    ///
    /// A blank `name` keeps the current one. Only campaign builds have groups.
    pub fn edit_group(&mut self, index: usize, name: &str, keywords: &[&str]) -> Result<AdGroup> {
        let structure = match self.artifact.as_mut() {
            Some(BuildArtifact::Campaign { structure, .. }) => structure,
            Some(BuildArtifact::Ads { .. }) => bail!("Ads-only builds have no ad groups"),
            None => bail!("Nothing generated yet. Finish the questionnaire and generate first."),
        };
        let count = structure.ad_groups.len();
        let group = structure
            .group_mut(index)
            .ok_or_else(|| anyhow!("Ad group {} does not exist (the campaign has {count})", index + 1))?;
        if !name.trim().is_empty() {
            group.rename(name);
        }
        for keyword in keywords {
            group.add_keyword(keyword);
        }
        debug!(
            session = %self.session.session_id(),
            group = index,
            keywords = group.keywords.len(),
            "Ad group edited"
        );
        Ok(group.clone())
    }

    /// Writes the current build as CSV. Campaigns also write their ads to
    /// [`ads_companion_path`]; returns every file written.
    pub fn export(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let artifact = self
            .artifact
            .as_ref()
            .context("Nothing generated yet; there is nothing to export")?;
        match artifact {
            BuildArtifact::Ads { ads } => {
                export_ads(&ads.variant, path)?;
                Ok(vec![path.to_path_buf()])
            }
            BuildArtifact::Campaign { ads, structure } => {
                export_campaign(structure, path)?;
                let ads_path = ads_companion_path(path);
                export_ads(&ads.variant, &ads_path)?;
                Ok(vec![path.to_path_buf(), ads_path])
            }
        }
    }

    /// Synthesizes the artifact described by a finished questionnaire and keeps it for editing.
    pub fn generate(&mut self) -> Result<BuildArtifact> {
        let knowledge = self.knowledge()?;
        let brief = BuildBrief::from_session(&self.session, self.engine.graph())?;
        let ads = self.synthesizer.synthesize_ads_detailed(
            &knowledge,
            &brief.role,
            brief.in_market,
            &brief.goals,
        )?;
        info!(
            session = %self.session.session_id(),
            role = %brief.role,
            mode = ?brief.mode,
            origin = ?ads.origin,
            "Build generated"
        );
        let artifact = match brief.mode {
            BuildMode::AdsOnly => BuildArtifact::Ads { ads },
            BuildMode::FullCampaign => {
                let structure = self.synthesizer.synthesize_campaign(
                    &knowledge,
                    &brief.role,
                    brief.in_market,
                    &brief.goals,
                    brief.group_count,
                )?;
                BuildArtifact::Campaign { ads, structure }
            }
        };
        self.artifact = Some(artifact.clone());
        Ok(artifact)
    }
}
