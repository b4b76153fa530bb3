use ppcbuilder::config::AppConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        env::set_var("PPCBUILDER_HOME", workspace.path());
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn sources_dir(&self) -> PathBuf {
        let dir = self.workspace.path().join("tables");
        fs::create_dir_all(&dir).expect("failed to create tables directory");
        dir
    }

    pub fn write_table(&self, file_name: &str, contents: &str) -> PathBuf {
        let path = self.sources_dir().join(file_name);
        fs::write(&path, contents).expect("failed to write table");
        path
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.knowledge.sources_dir = Some(self.sources_dir());
        config
    }
}

mod campaign_build;
mod knowledge_sources;
mod wizard_flow;
pub mod support;
