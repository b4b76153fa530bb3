//! Tabular knowledge sources and their fingerprints.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::error::SourceError;
use crate::config::KnowledgeSettings;

/// One wide-format table: a header row plus one row per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularSource {
    pub name: String,
    /// Role the table is dedicated to; `None` for multi-role tables keyed by `Job_Title`.
    pub role: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularSource {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            role: None,
            headers,
            rows,
        }
    }

    /// Marks the table as describing a single role.
    pub fn for_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Parses CSV text with a header row. Ragged rows are padded with blanks.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, SourceError> {
        let name = name.into();
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| SourceError::Csv {
                name: name.clone(),
                source,
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| SourceError::Csv {
                name: name.clone(),
                source,
            })?;
            let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
            row.resize(headers.len().max(row.len()), String::new());
            rows.push(row);
        }
        Ok(Self::new(name, headers, rows))
    }

    pub fn from_csv_str(name: impl Into<String>, data: &str) -> Result<Self, SourceError> {
        Self::from_csv_reader(name, data.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| SourceError::Io {
            name: name.clone(),
            source,
        })?;
        Self::from_csv_reader(name, file)
    }

    fn feed(&self, hasher: &mut Sha256) {
        feed_field(hasher, &self.name);
        feed_field(hasher, self.role.as_deref().unwrap_or(""));
        hasher.update((self.headers.len() as u64).to_le_bytes());
        for header in &self.headers {
            feed_field(hasher, header);
        }
        hasher.update((self.rows.len() as u64).to_le_bytes());
        for row in &self.rows {
            hasher.update((row.len() as u64).to_le_bytes());
            for cell in row {
                feed_field(hasher, cell);
            }
        }
    }
}

fn feed_field(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Combined identity of a set of sources. Equal content yields equal fingerprints.
pub fn fingerprint(sources: &[TabularSource]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((sources.len() as u64).to_le_bytes());
    for source in sources {
        source.feed(&mut hasher);
    }
    format!("{:x}", hasher.finalize())
}

/// Maps a role label to its dedicated table name, e.g. `VP Customer Support` -> `vp_customer_support`.
pub fn role_source_name(role: &str, separator: &str) -> String {
    role.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn role_source_path(dir: &Path, role: &str, separator: &str) -> PathBuf {
    dir.join(format!("{}.csv", role_source_name(role, separator)))
}

/// Loads the dedicated table for `role`.
///
/// A missing table is reported as [`SourceError::RoleSourceMissing`]; whether
/// that means "use the general aggregate" is the caller's call.
pub fn load_role_source(dir: &Path, role: &str, separator: &str) -> Result<TabularSource, SourceError> {
    let path = role_source_path(dir, role, separator);
    if !path.is_file() {
        return Err(SourceError::RoleSourceMissing {
            role: role.to_string(),
            path,
        });
    }
    Ok(TabularSource::from_path(&path)?.for_role(role))
}

/// Sources found in a knowledge directory plus the per-role tables that were absent.
#[derive(Debug, Default)]
pub struct DirectorySources {
    pub sources: Vec<TabularSource>,
    pub missing: Vec<SourceError>,
}

impl DirectorySources {
    pub fn missing_roles(&self) -> Vec<&str> {
        self.missing.iter().filter_map(|e| e.missing_role()).collect()
    }
}

/// Reads the aggregate table from `dir`, then every per-role table it names.
pub fn load_sources_from_dir(dir: &Path, settings: &KnowledgeSettings) -> Result<DirectorySources> {
    let aggregate_path = dir.join(&settings.aggregate_source);
    let aggregate = TabularSource::from_path(&aggregate_path)
        .with_context(|| format!("Failed to load aggregate source {:?}", aggregate_path))?;

    let roles = super::role_labels(&aggregate, &settings.product_category);
    let mut loaded = DirectorySources {
        sources: vec![aggregate],
        missing: Vec::new(),
    };
    for role in roles {
        match load_role_source(dir, &role, &settings.role_source_separator) {
            Ok(source) => {
                debug!(role = %role, source = %source.name, "Loaded per-role source");
                loaded.sources.push(source);
            }
            Err(err @ SourceError::RoleSourceMissing { .. }) => loaded.missing.push(err),
            Err(err) => {
                warn!(role = %role, error = %err, "Per-role source unreadable");
                loaded.missing.push(err);
            }
        }
    }
    Ok(loaded)
}
