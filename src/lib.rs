pub mod chat;
pub mod config;
pub mod export;
pub mod knowledge;
pub mod synthesis;
pub mod wizard;

// Re-export commonly used types for convenience.
pub use chat::{BuildArtifact, CampaignChat};
pub use config::AppConfig;
pub use knowledge::{KnowledgeBase, KnowledgeStore, RoleId, RoleProfile, SourceError, TabularSource};
pub use synthesis::{AdVariant, CampaignStructure, ContentSynthesizer, SynthesisError};
pub use wizard::{WizardEngine, WizardError, WizardSession};
