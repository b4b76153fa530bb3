use crate::knowledge::RoleProfile;

use super::limits::{MAX_DESCRIPTIONS, MAX_HEADLINES};

pub fn headline(pain: &str, value: &str) -> String {
    format!("Solve {pain} with {value}")
}

pub fn description(feature: &str, benefit: &str) -> String {
    format!("{feature} delivers {benefit}")
}

/// Positionally paired headlines, capped at the headline count limit.
pub fn headlines(profile: &RoleProfile) -> Vec<String> {
    profile
        .headline_pairs()
        .take(MAX_HEADLINES)
        .map(|(pain, value)| headline(pain, value))
        .collect()
}

/// Positionally paired descriptions, capped at the description count limit.
pub fn descriptions(profile: &RoleProfile) -> Vec<String> {
    profile
        .description_pairs()
        .take(MAX_DESCRIPTIONS)
        .map(|(feature, benefit)| description(feature, benefit))
        .collect()
}
