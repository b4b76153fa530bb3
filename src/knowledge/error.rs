use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or normalizing tabular knowledge sources.
///
/// None of these crash a session: callers either surface a warning or fall
/// back to the general aggregate.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading source '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in source '{name}': {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },

    #[error("No source found for role '{role}' at {}", .path.display())]
    RoleSourceMissing { role: String, path: PathBuf },

    #[error("Source '{0}' has no Job_Title column and declares no role")]
    MissingRoleColumn(String),

    #[error("No sources supplied")]
    Empty,
}

impl SourceError {
    /// Role whose dedicated source could not be located, if that is the failure.
    pub fn missing_role(&self) -> Option<&str> {
        match self {
            SourceError::RoleSourceMissing { role, .. } => Some(role),
            _ => None,
        }
    }
}
