//! Size limits for ad artifacts and the repair applied to overlong text.

pub const MAX_HEADLINES: usize = 15;
pub const MAX_HEADLINE_CHARS: usize = 30;
pub const MAX_DESCRIPTIONS: usize = 4;
pub const MAX_DESCRIPTION_CHARS: usize = 90;
pub const MIN_AD_GROUPS: usize = 1;
pub const MAX_AD_GROUPS: usize = 10;

const TRAILING_JUNK: &[char] = &[',', ';', ':', '-', '–', '/', '&', '('];

/// Shortens `text` to at most `limit` characters, cutting at the last
/// whitespace boundary before the limit when one exists.
pub fn truncate_to_limit(text: &str, limit: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(limit)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len());
    let head = &text[..cut];
    let next_is_boundary = text[cut..].starts_with(char::is_whitespace);
    let trimmed = if next_is_boundary {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(space) if space > 0 => &head[..space],
            _ => head,
        }
    };
    trimmed
        .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_JUNK.contains(&c))
        .to_string()
}

/// Applies the per-item limit and the count cap; drops items left blank and repeats.
pub fn enforce(items: Vec<String>, max_items: usize, max_chars: usize) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(max_items.min(items.len()));
    for item in items {
        if kept.len() == max_items {
            break;
        }
        let repaired = truncate_to_limit(&item, max_chars);
        if repaired.is_empty() || kept.contains(&repaired) {
            continue;
        }
        kept.push(repaired);
    }
    kept
}

pub fn clamp_group_count(requested: usize) -> usize {
    requested.clamp(MIN_AD_GROUPS, MAX_AD_GROUPS)
}
