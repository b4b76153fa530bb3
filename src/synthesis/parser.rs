//! Best-effort parsing of generated ad copy.
//!
//! Generated text is never trusted to be well formed: the parser either finds
//! both sections with at least one usable line each, or fails as a whole.

use super::generation::{GenerationFailure, DESCRIPTIONS_MARKER, HEADLINES_MARKER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAdCopy {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Headlines,
    Descriptions,
}

pub fn parse_ad_copy(response: &str) -> Result<ParsedAdCopy, GenerationFailure> {
    let mut section = Section::Preamble;
    let mut saw_headlines = false;
    let mut saw_descriptions = false;
    let mut headlines = Vec::new();
    let mut descriptions = Vec::new();

    for line in response.lines() {
        if let Some((marker, inline)) = section_marker(line) {
            section = marker;
            match marker {
                Section::Headlines => saw_headlines = true,
                Section::Descriptions => saw_descriptions = true,
                Section::Preamble => {}
            }
            if let Some(item) = inline.and_then(clean_item) {
                push_item(section, item, &mut headlines, &mut descriptions);
            }
            continue;
        }
        if let Some(item) = clean_item(line) {
            push_item(section, item, &mut headlines, &mut descriptions);
        }
    }

    if !saw_headlines {
        return Err(GenerationFailure::Malformed("no headlines section".into()));
    }
    if !saw_descriptions {
        return Err(GenerationFailure::Malformed("no descriptions section".into()));
    }
    if headlines.is_empty() {
        return Err(GenerationFailure::Malformed("headlines section is empty".into()));
    }
    if descriptions.is_empty() {
        return Err(GenerationFailure::Malformed(
            "descriptions section is empty".into(),
        ));
    }
    Ok(ParsedAdCopy {
        headlines,
        descriptions,
    })
}

fn push_item(
    section: Section,
    item: String,
    headlines: &mut Vec<String>,
    descriptions: &mut Vec<String>,
) {
    match section {
        Section::Headlines => headlines.push(item),
        Section::Descriptions => descriptions.push(item),
        Section::Preamble => {}
    }
}

/// Recognizes `HEADLINES:`, `## Headlines`, `**Descriptions:**` and similar,
/// returning any text that follows the marker on the same line.
fn section_marker(line: &str) -> Option<(Section, Option<&str>)> {
    let stripped = line.trim().trim_start_matches(['#', '*', ' ']);
    let word_end = stripped
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(stripped.len());
    let word = &stripped[..word_end];
    let section = if word.eq_ignore_ascii_case(HEADLINES_MARKER) {
        Section::Headlines
    } else if word.eq_ignore_ascii_case(DESCRIPTIONS_MARKER) {
        Section::Descriptions
    } else {
        return None;
    };
    let after = &stripped[word_end..];
    let heading = line.trim_start().starts_with('#');
    if !(heading || after.trim().is_empty() || after.starts_with([':', '*'])) {
        return None;
    }
    let rest = after.trim_start_matches(['*', ':', ' ']).trim();
    Some((section, (!rest.is_empty()).then_some(rest)))
}

const BULLETS: [&str; 3] = ["-", "*", "•"];
const QUOTE_PAIRS: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('“', '”')];

/// Strips one list marker and a quote pair wrapping the whole item; `None` when nothing is left.
///
/// A marker only counts when whitespace follows it, so `-40%` keeps its sign.
fn clean_item(line: &str) -> Option<String> {
    let mut item = line.trim();
    if BULLETS.contains(&item) {
        return None;
    }
    if let Some(rest) = strip_list_marker(item) {
        item = rest;
    }
    let item = unquote(item.trim());
    (!item.is_empty()).then(|| item.to_string())
}

fn strip_list_marker(item: &str) -> Option<&str> {
    let rest = BULLETS
        .iter()
        .find_map(|bullet| item.strip_prefix(*bullet))
        .or_else(|| {
            let digits = item.len() - item.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            (digits > 0)
                .then(|| item[digits..].strip_prefix(['.', ')']))
                .flatten()
        })?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then(|| rest.trim_start())
}

fn unquote(item: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if item.chars().count() >= 2 && item.starts_with(open) && item.ends_with(close) {
            return item[open.len_utf8()..item.len() - close.len_utf8()].trim();
        }
    }
    item
}
