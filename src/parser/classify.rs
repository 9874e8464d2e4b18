//! Line classifier
//!
//! Decides which sanitized lines are ingredient candidates and which are noise
//! (directions, section headers, URLs, serving counts, organization names).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Why a line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Empty,
    Title,
    SectionHeader,
    Url,
    Directions,
    Servings,
    OrganizationName,
    SingleWord,
    AfterSourceHeader,
}

/// Classification of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "class", content = "reason")]
pub enum LineClass {
    Keep,
    Skip(SkipReason),
}

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:directions|instructions|method|steps|preparation|prep|notes?|tips|nutrition(?:\s+(?:facts|information|info))?|servings?|serves|yield|makes|ingredients|equipment|for\s+the\s+[^:]*)\s*:?$",
    )
    .unwrap()
});

static SOURCE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:source|adapted\s+from|recipe\s+(?:from|by|courtesy\s+of)|credit|courtesy\s+of)\b").unwrap()
});

static SOURCE_LABEL_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:source|adapted\s+from|recipe\s+(?:from|by|courtesy\s+of)|credit|courtesy\s+of)\s*:?\s*$").unwrap()
});

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(?:https?://|www\.)\S+$").unwrap());

static SERVINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:serves|servings?|yield|yields|makes)\s*:?\s*(\d+(?:\.\d+)?)(?:\s*(?:servings?|portions?|people|persons))?|(\d+(?:\.\d+)?)\s+(?:servings?|portions?))\.?$",
    )
    .unwrap()
});

/// Sentences of at least this many words are directions
const DIRECTIONS_MIN_WORDS: usize = 9;

/// Explicit serving count from a "Serves 4" / "4 servings" line
pub fn servings_count(line: &str) -> Option<f64> {
    let caps = SERVINGS.captures(line.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| *n > 0.0)
}

pub fn is_section_header(line: &str) -> bool {
    SECTION_HEADER.is_match(line.trim()) || SOURCE_HEADER.is_match(line.trim())
}

/// Label-only source header whose value is on the following line
pub fn is_source_label(line: &str) -> bool {
    SOURCE_LABEL_ONLY.is_match(line.trim())
}

pub fn is_url(line: &str) -> bool {
    URL.is_match(line.trim())
}

fn looks_like_directions(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.split_whitespace().count() >= DIRECTIONS_MIN_WORDS
        && (trimmed.ends_with('.') || trimmed.ends_with('!'))
}

fn looks_like_organization(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
        .count();
    words.len() >= 3 && capitalized >= 3 && !line.chars().any(|c| c.is_ascii_digit())
}

fn is_single_word_without_digit(line: &str) -> bool {
    line.split_whitespace().count() == 1 && !line.chars().any(|c| c.is_ascii_digit())
}

/// True when a line may serve as the dish title.
///
/// Only emptiness, headers, URLs and servings lines disqualify a title; the
/// remaining noise rules do not apply to it.
pub fn is_title_candidate(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !is_section_header(line) && !is_url(line) && servings_count(line).is_none()
}

/// Classify one line against the title and the previous non-empty line
pub fn classify_line(line: &str, title: &str, previous_line: Option<&str>) -> LineClass {
    let line = line.trim();

    if line.is_empty() {
        return LineClass::Skip(SkipReason::Empty);
    }
    if !title.is_empty() && line.eq_ignore_ascii_case(title.trim()) {
        return LineClass::Skip(SkipReason::Title);
    }
    if is_section_header(line) {
        return LineClass::Skip(SkipReason::SectionHeader);
    }
    if is_url(line) {
        return LineClass::Skip(SkipReason::Url);
    }
    if looks_like_directions(line) {
        return LineClass::Skip(SkipReason::Directions);
    }
    if servings_count(line).is_some() {
        return LineClass::Skip(SkipReason::Servings);
    }
    if looks_like_organization(line) {
        return LineClass::Skip(SkipReason::OrganizationName);
    }
    if is_single_word_without_digit(line) {
        return LineClass::Skip(SkipReason::SingleWord);
    }
    if previous_line.is_some_and(is_source_label) {
        return LineClass::Skip(SkipReason::AfterSourceHeader);
    }
    LineClass::Keep
}

/// Boolean view of [`classify_line`]
pub fn should_skip(line: &str, title: &str, previous_line: Option<&str>) -> bool {
    matches!(classify_line(line, title, previous_line), LineClass::Skip(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skip_reason(line: &str) -> Option<SkipReason> {
        match classify_line(line, "Pico de Gallo", None) {
            LineClass::Keep => None,
            LineClass::Skip(reason) => Some(reason),
        }
    }

    #[test]
    fn test_keeps_ingredient_lines() {
        assert_eq!(skip_reason("2 cups flour"), None);
        assert_eq!(skip_reason("1 chicken breast (boneless, skinless)"), None);
        assert_eq!(skip_reason("salt and pepper"), None);
    }

    #[test]
    fn test_skips_noise() {
        assert_eq!(skip_reason(""), Some(SkipReason::Empty));
        assert_eq!(skip_reason("pico de gallo"), Some(SkipReason::Title));
        assert_eq!(skip_reason("Directions:"), Some(SkipReason::SectionHeader));
        assert_eq!(skip_reason("Nutrition Facts"), Some(SkipReason::SectionHeader));
        assert_eq!(skip_reason("For the dough:"), Some(SkipReason::SectionHeader));
        assert_eq!(skip_reason("Source: Grandma"), Some(SkipReason::SectionHeader));
        assert_eq!(skip_reason("https://example.com/recipe"), Some(SkipReason::Url));
        assert_eq!(
            skip_reason("Preheat the oven and butter a large baking dish well."),
            Some(SkipReason::Directions)
        );
        assert_eq!(skip_reason("4 servings"), Some(SkipReason::Servings));
        assert_eq!(skip_reason("Serves 6"), Some(SkipReason::Servings));
        assert_eq!(skip_reason("American Heart Association"), Some(SkipReason::OrganizationName));
        assert_eq!(skip_reason("Salt"), Some(SkipReason::SingleWord));
    }

    #[test]
    fn test_directions_word_boundary() {
        // eight words ending in a period stay
        assert_eq!(skip_reason("Add 2 cups of flour to the bowl."), None);
        assert_eq!(
            skip_reason("Add 2 cups of flour to the large bowl."),
            Some(SkipReason::Directions)
        );
        assert_eq!(
            skip_reason("Add 2 cups of flour to the large bowl!"),
            Some(SkipReason::Directions)
        );
    }

    #[test]
    fn test_line_after_source_label_is_skipped() {
        assert_eq!(
            classify_line("The Family Cookbook 2019", "Soup", Some("Source:")),
            LineClass::Skip(SkipReason::AfterSourceHeader)
        );
        assert_eq!(classify_line("2 cups stock", "Soup", Some("1 onion")), LineClass::Keep);
    }

    #[test]
    fn test_servings_count() {
        assert_eq!(servings_count("Serves 4"), Some(4.0));
        assert_eq!(servings_count("Servings: 8"), Some(8.0));
        assert_eq!(servings_count("Yield: 6 servings"), Some(6.0));
        assert_eq!(servings_count("12 portions"), Some(12.0));
        assert_eq!(servings_count("2 eggs"), None);
        assert_eq!(servings_count("Servings:"), None);
    }

    #[test]
    fn test_title_candidates() {
        assert!(is_title_candidate("Grandma's Famous Apple Pie"));
        assert!(is_title_candidate("Guacamole"));
        assert!(!is_title_candidate("Ingredients:"));
        assert!(!is_title_candidate("www.example.com"));
        assert!(!is_title_candidate("Serves 4"));
    }
}
