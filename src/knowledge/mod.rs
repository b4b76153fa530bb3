//! Knowledge base normalization and aggregation.
//!
//! Heterogeneous wide tables go in, a typed per-role model comes out together
//! with the derived `General` aggregate. Loading is a pure function of the
//! source content; [`store::KnowledgeStore`] memoizes it by fingerprint.

pub mod columns;
pub mod error;
pub mod model;
pub mod source;
pub mod store;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

pub use columns::ColumnFamily;
pub use error::SourceError;
pub use model::{AudienceSegment, RoleId, RoleProfile, GENERAL_ROLE_LABEL};
pub use source::{
    fingerprint, load_role_source, load_sources_from_dir, role_source_name, DirectorySources,
    TabularSource,
};
pub use store::KnowledgeStore;

use columns::{text_cell, ColumnLayout};

/// Immutable snapshot of every role profile plus the general aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    fingerprint: String,
    product_category: String,
    profiles: BTreeMap<String, RoleProfile>,
    general: RoleProfile,
}

impl KnowledgeBase {
    /// Normalizes `sources` into role profiles.
    ///
    /// Rows whose `Category_Name` differs from `product_category` are discarded.
    pub fn load(sources: &[TabularSource], product_category: &str) -> Result<Self, SourceError> {
        if sources.is_empty() {
            return Err(SourceError::Empty);
        }
        let mut profiles: BTreeMap<String, RoleProfile> = BTreeMap::new();
        for source in sources {
            normalize_source(source, product_category, &mut profiles)?;
        }
        let general = aggregate(profiles.values());
        let kb = Self {
            fingerprint: fingerprint(sources),
            product_category: product_category.to_string(),
            profiles,
            general,
        };
        info!(
            roles = kb.profiles.len(),
            sources = sources.len(),
            fingerprint = %kb.fingerprint,
            "Knowledge base loaded"
        );
        Ok(kb)
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn product_category(&self) -> &str {
        &self.product_category
    }

    /// Concrete role labels in sorted order.
    pub fn roles(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Role options as presented to the user: every concrete role, then `General`.
    pub fn role_options(&self) -> Vec<String> {
        self.profiles
            .keys()
            .cloned()
            .chain(std::iter::once(GENERAL_ROLE_LABEL.to_string()))
            .collect()
    }

    pub fn general(&self) -> &RoleProfile {
        &self.general
    }

    /// Looks up a profile; concrete labels match exactly first, then ignoring case.
    pub fn profile(&self, role: &RoleId) -> Option<&RoleProfile> {
        match role {
            RoleId::General => Some(&self.general),
            RoleId::Named(label) => self.profiles.get(label).or_else(|| {
                self.profiles
                    .values()
                    .find(|profile| profile.role.eq_ignore_ascii_case(label))
            }),
        }
    }

    pub fn audience(&self, role: &RoleId, in_market: bool) -> Option<AudienceSegment> {
        let profile = self.profile(role)?;
        Some(AudienceSegment::from_profile(role.clone(), profile, in_market))
    }
}

fn normalize_source(
    source: &TabularSource,
    product_category: &str,
    profiles: &mut BTreeMap<String, RoleProfile>,
) -> Result<(), SourceError> {
    let layout = ColumnLayout::from_headers(&source.headers);
    if layout.job_title.is_none() && source.role.is_none() {
        return Err(SourceError::MissingRoleColumn(source.name.clone()));
    }
    if !layout.has_family_columns() {
        warn!(source = %source.name, "Source carries no recognized column families");
    }

    let mut filtered = 0usize;
    for (row_index, row) in source.rows.iter().enumerate() {
        if let Some(index) = layout.category {
            let category = row.get(index).map(|c| c.trim()).unwrap_or("");
            if !category.eq_ignore_ascii_case(product_category.trim()) {
                filtered += 1;
                continue;
            }
        }
        let label = layout
            .job_title
            .and_then(|index| row.get(index))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .or(source.role.as_deref())
            .map(str::to_string);
        let Some(label) = label else {
            warn!(source = %source.name, row = row_index, "Skipping row without a role label");
            continue;
        };
        if RoleId::parse(&label) == RoleId::General {
            warn!(source = %source.name, row = row_index, "Skipping row using the reserved General label");
            continue;
        }

        let profile = profiles
            .entry(label.clone())
            .or_insert_with(|| RoleProfile::new(label));
        for family in ColumnFamily::ALL {
            for index in layout.columns(family) {
                if let Some(value) = row.get(index).and_then(|cell| text_cell(cell)) {
                    profile.push_unique(family, value);
                }
            }
        }
    }
    if filtered > 0 {
        debug!(
            source = %source.name,
            filtered,
            category = product_category,
            "Discarded rows outside the product category"
        );
    }
    Ok(())
}

/// Set-union of every family across `profiles`, sorted so the result is order-independent.
fn aggregate<'a>(profiles: impl Iterator<Item = &'a RoleProfile>) -> RoleProfile {
    let mut sets: BTreeMap<ColumnFamily, BTreeSet<&'a str>> = BTreeMap::new();
    for profile in profiles {
        for family in ColumnFamily::ALL {
            sets.entry(family)
                .or_default()
                .extend(profile.field(family).iter().map(String::as_str));
        }
    }
    let mut general = RoleProfile::new(GENERAL_ROLE_LABEL);
    for (family, values) in sets {
        *general.field_mut(family) = values.into_iter().map(str::to_string).collect();
    }
    general
}

/// Distinct role labels named by a multi-role table, after category filtering.
pub(crate) fn role_labels(source: &TabularSource, product_category: &str) -> Vec<String> {
    let layout = ColumnLayout::from_headers(&source.headers);
    let Some(title_index) = layout.job_title else {
        return Vec::new();
    };
    let mut labels: Vec<String> = Vec::new();
    for row in &source.rows {
        if let Some(index) = layout.category {
            let category = row.get(index).map(|c| c.trim()).unwrap_or("");
            if !category.eq_ignore_ascii_case(product_category.trim()) {
                continue;
            }
        }
        if let Some(label) = row.get(title_index).map(|c| c.trim()) {
            if !label.is_empty()
                && RoleId::parse(label) != RoleId::General
                && !labels.iter().any(|l| l == label)
            {
                labels.push(label.to_string());
            }
        }
    }
    labels
}
