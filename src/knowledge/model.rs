//! Typed knowledge records produced by normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::columns::ColumnFamily;

pub const GENERAL_ROLE_LABEL: &str = "General";

/// Either the synthetic aggregate role or a concrete role label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    General,
    Named(String),
}

impl RoleId {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case(GENERAL_ROLE_LABEL) {
            RoleId::General
        } else {
            RoleId::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RoleId::General => GENERAL_ROLE_LABEL,
            RoleId::Named(label) => label,
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized knowledge record for one targetable role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub value_props: Vec<String>,
    #[serde(default)]
    pub business_outcomes: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub seniority_levels: Vec<String>,
    #[serde(default)]
    pub departments: Vec<String>,
}

impl RoleProfile {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Self::default()
        }
    }

    pub fn field(&self, family: ColumnFamily) -> &[String] {
        match family {
            ColumnFamily::PainPoint => &self.pain_points,
            ColumnFamily::ValueProp => &self.value_props,
            ColumnFamily::BusinessOutcome => &self.business_outcomes,
            ColumnFamily::Feature => &self.features,
            ColumnFamily::Benefit => &self.benefits,
            ColumnFamily::SeniorityLevel => &self.seniority_levels,
            ColumnFamily::Department => &self.departments,
        }
    }

    pub fn field_mut(&mut self, family: ColumnFamily) -> &mut Vec<String> {
        match family {
            ColumnFamily::PainPoint => &mut self.pain_points,
            ColumnFamily::ValueProp => &mut self.value_props,
            ColumnFamily::BusinessOutcome => &mut self.business_outcomes,
            ColumnFamily::Feature => &mut self.features,
            ColumnFamily::Benefit => &mut self.benefits,
            ColumnFamily::SeniorityLevel => &mut self.seniority_levels,
            ColumnFamily::Department => &mut self.departments,
        }
    }

    /// Appends `value` unless it is already present, keeping first-seen order.
    pub(crate) fn push_unique(&mut self, family: ColumnFamily, value: String) {
        let field = self.field_mut(family);
        if !field.contains(&value) {
            field.push(value);
        }
    }

    /// Pain point / value prop pairs; the shorter sequence bounds the result.
    pub fn headline_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pain_points
            .iter()
            .zip(self.value_props.iter())
            .map(|(pain, value)| (pain.as_str(), value.as_str()))
    }

    /// Feature / benefit pairs; the shorter sequence bounds the result.
    pub fn description_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features
            .iter()
            .zip(self.benefits.iter())
            .map(|(feature, benefit)| (feature.as_str(), benefit.as_str()))
    }
}

/// A role paired with its targeting mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceSegment {
    pub role: RoleId,
    /// `true` for audiences actively researching a solution, `false` for awareness targeting.
    pub in_market: bool,
    pub seniority: Option<String>,
    pub department: Option<String>,
}

impl AudienceSegment {
    /// Classifies `role` by the first seniority level and department `profile` carries.
    pub fn from_profile(role: RoleId, profile: &RoleProfile, in_market: bool) -> Self {
        Self {
            role,
            in_market,
            seniority: profile.seniority_levels.first().cloned(),
            department: profile.departments.first().cloned(),
        }
    }
}
