//! Fingerprint-keyed knowledge base cache.
//!
//! The store hands out `Arc` snapshots. A reload swaps the whole snapshot
//! under a write lock, so readers see either the old or the new base.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::error::SourceError;
use super::source::{fingerprint, TabularSource};
use super::KnowledgeBase;

#[derive(Debug)]
pub struct KnowledgeStore {
    product_category: String,
    current: RwLock<Option<Arc<KnowledgeBase>>>,
}

impl KnowledgeStore {
    pub fn new(product_category: impl Into<String>) -> Self {
        Self {
            product_category: product_category.into(),
            current: RwLock::new(None),
        }
    }

    /// Returns the cached snapshot when `sources` match its fingerprint, otherwise
    /// normalizes them and replaces the snapshot.
    pub fn load(&self, sources: &[TabularSource]) -> Result<Arc<KnowledgeBase>, SourceError> {
        let key = fingerprint(sources);
        if let Some(current) = self.snapshot() {
            if current.fingerprint() == key {
                debug!(fingerprint = %key, "Knowledge base cache hit");
                return Ok(current);
            }
        }
        let fresh = Arc::new(KnowledgeBase::load(sources, &self.product_category)?);
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    /// Current snapshot, if anything has been loaded since the last invalidation.
    pub fn snapshot(&self) -> Option<Arc<KnowledgeBase>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the cached snapshot so the next `load` recomputes.
    pub fn invalidate(&self) {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            info!("Knowledge base cache invalidated");
        }
    }
}
