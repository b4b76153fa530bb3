//! Wide, suffix-numbered column families.
//!
//! Source tables spread one list over many columns (`Pain_Point_1`,
//! `Pain_Point_2`, ...). Headers are parsed once here so nothing downstream
//! ever matches on raw column names.

use serde::{Deserialize, Serialize};

pub const JOB_TITLE_COLUMN: &str = "job_title";
pub const CATEGORY_COLUMN: &str = "category_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFamily {
    PainPoint,
    ValueProp,
    BusinessOutcome,
    Feature,
    Benefit,
    SeniorityLevel,
    Department,
}

impl ColumnFamily {
    pub const ALL: [ColumnFamily; 7] = [
        ColumnFamily::PainPoint,
        ColumnFamily::ValueProp,
        ColumnFamily::BusinessOutcome,
        ColumnFamily::Feature,
        ColumnFamily::Benefit,
        ColumnFamily::SeniorityLevel,
        ColumnFamily::Department,
    ];

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "pain_point" | "pain_points" => Some(ColumnFamily::PainPoint),
            "value_prop" | "value_props" => Some(ColumnFamily::ValueProp),
            "business_outcomes" | "business_outcome" => Some(ColumnFamily::BusinessOutcome),
            "feature" | "features" => Some(ColumnFamily::Feature),
            "benefit" | "benefits" => Some(ColumnFamily::Benefit),
            "seniority_level" => Some(ColumnFamily::SeniorityLevel),
            "department" => Some(ColumnFamily::Department),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnFamily::PainPoint => "pain_point",
            ColumnFamily::ValueProp => "value_prop",
            ColumnFamily::BusinessOutcome => "business_outcomes",
            ColumnFamily::Feature => "feature",
            ColumnFamily::Benefit => "benefit",
            ColumnFamily::SeniorityLevel => "seniority_level",
            ColumnFamily::Department => "department",
        }
    }
}

/// What a single header means once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Family { family: ColumnFamily, slot: u32 },
    JobTitle,
    Category,
    Other,
}

/// Lower-cases a header and folds spaces into underscores.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

pub fn classify_header(header: &str) -> ColumnKind {
    let normalized = normalize_header(header);
    match normalized.as_str() {
        JOB_TITLE_COLUMN => return ColumnKind::JobTitle,
        CATEGORY_COLUMN => return ColumnKind::Category,
        _ => {}
    }
    let Some((prefix, suffix)) = normalized.rsplit_once('_') else {
        return ColumnKind::Other;
    };
    let Ok(slot) = suffix.parse::<u32>() else {
        return ColumnKind::Other;
    };
    match ColumnFamily::from_prefix(prefix) {
        Some(family) => ColumnKind::Family { family, slot },
        None => ColumnKind::Other,
    }
}

/// Per-family column indices, ordered by slot number.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    pub job_title: Option<usize>,
    pub category: Option<usize>,
    families: Vec<(ColumnFamily, u32, usize)>,
}

impl ColumnLayout {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut layout = ColumnLayout::default();
        for (index, header) in headers.iter().enumerate() {
            match classify_header(header.as_ref()) {
                ColumnKind::Family { family, slot } => layout.families.push((family, slot, index)),
                ColumnKind::JobTitle => {
                    layout.job_title.get_or_insert(index);
                }
                ColumnKind::Category => {
                    layout.category.get_or_insert(index);
                }
                ColumnKind::Other => {}
            }
        }
        layout
            .families
            .sort_by_key(|(family, slot, index)| (*family, *slot, *index));
        layout
    }

    /// Column indices for `family`, in ascending slot order.
    pub fn columns(&self, family: ColumnFamily) -> impl Iterator<Item = usize> + '_ {
        self.families
            .iter()
            .filter(move |(f, _, _)| *f == family)
            .map(|(_, _, index)| *index)
    }

    pub fn has_family_columns(&self) -> bool {
        !self.families.is_empty()
    }
}

/// Returns the cleaned cell text, or `None` for blanks and non-text values.
pub fn text_cell(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    let lower = value.to_ascii_lowercase();
    if matches!(lower.as_str(), "nan" | "null" | "none" | "n/a" | "#n/a") {
        return None;
    }
    if value.parse::<f64>().is_ok() {
        return None;
    }
    Some(value.to_string())
}
