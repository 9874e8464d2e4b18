//! Ingredient line parser
//!
//! Grammar: `quantity? unit? name (parenthetical)*`.
//!
//! Parenthetical groups are folded into the name one at a time, innermost
//! first, for at most [`MAX_PAREN_MERGE_ITERATIONS`] rounds.

use tracing::debug;

use crate::models::{ParseIssue, ParsedIngredientLine};
use crate::nutrition::units::{lookup_unit, UnitDef, ALIASES_LONGEST_FIRST};
use crate::parser::quantity::{parse_quantity, split_leading_quantity, DEFAULT_QUANTITY};
use crate::parser::specification::resolve_specification;
use crate::parser::vocabulary::{is_body_part, is_descriptor_word, normalize_word, starts_with_informational_prefix};

/// Hard cap on parenthetical merge rounds per line
pub const MAX_PAREN_MERGE_ITERATIONS: usize = 8;

/// Unit used when the line names none
pub const DEFAULT_UNIT: &str = "item";

/// True when every `(` is closed and no `)` appears before its `(`
pub fn parens_balanced(text: &str) -> bool {
    let mut depth: i32 = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matched unit alias at the start of `text` and the bytes it consumed
fn match_unit(text: &str) -> Option<(&'static UnitDef, usize)> {
    for alias in ALIASES_LONGEST_FIRST.iter() {
        let Some(head) = text.get(..alias.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(alias) {
            continue;
        }
        let Some(def) = lookup_unit(alias) else {
            continue;
        };

        let mut consumed = alias.len();
        let mut after = &text[consumed..];
        if !def.ingredient_noun && after.starts_with('.') {
            consumed += 1;
            after = &after[1..];
        }

        let accepted = if def.ingredient_noun {
            // "2 tomatoes" or "2 tomatoes, diced", but not "2 tomato paste"
            let rest = after.trim_start();
            rest.is_empty() || rest.starts_with(',') || rest.starts_with('(')
        } else {
            after.is_empty() || after.starts_with(|c: char| c.is_whitespace() || c == ',' || c == '(')
        };

        if accepted {
            return Some((def, consumed));
        }
    }
    None
}

/// Parenthetical holding only an amount: "240ml", "14 oz", "14.5 oz can"
pub fn is_measurement_only(inner: &str) -> bool {
    let (quantity, rest) = split_leading_quantity(inner);
    if quantity.is_none() {
        return false;
    }
    rest.split_whitespace().all(|word| {
        let word = normalize_word(word);
        lookup_unit(&word).is_some_and(|def| !def.ingredient_noun) || word == "each"
    })
}

/// Informational or amount-only parenthetical that is dropped instead of merged
fn is_strippable(inner: &str) -> bool {
    let inner = inner.trim();
    inner.is_empty() || starts_with_informational_prefix(inner) || is_measurement_only(inner)
}

/// Byte range of the first innermost `( … )` group
fn innermost_group(text: &str) -> Option<(usize, usize)> {
    let close = text.find(')')?;
    let open = text[..close].rfind('(')?;
    Some((open, close))
}

/// Fold one descriptive parenthetical into the text before it.
///
/// Descriptor words go in front of the core name, body parts right after it,
/// anything else after that.
fn merge_descriptors(core: &str, inner: &str) -> String {
    let mut descriptors = Vec::new();
    let mut body_parts = Vec::new();
    let mut others = Vec::new();

    for word in inner.split(|c: char| c == ',' || c.is_whitespace()) {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        if is_descriptor_word(word) {
            descriptors.push(word);
        } else if is_body_part(word) {
            body_parts.push(word);
        } else {
            others.push(word);
        }
    }

    let core = core.trim().trim_end_matches(',').trim();
    let mut parts: Vec<&str> = descriptors;
    if !core.is_empty() {
        parts.push(core);
    }
    parts.extend(body_parts);
    parts.extend(others);
    parts.join(" ")
}

/// Merge every parenthetical group of a name into plain text
pub fn merge_parentheticals(name: &str) -> String {
    let mut text = name.to_string();

    for _ in 0..MAX_PAREN_MERGE_ITERATIONS {
        let Some((open, close)) = innermost_group(&text) else {
            break;
        };
        let before = &text[..open];
        let inner = &text[open + 1..close];
        let after = &text[close + 1..];

        let merged = if is_strippable(inner) {
            format!("{} {}", before.trim_end(), after.trim_start())
        } else {
            format!("{} {}", merge_descriptors(before, inner), after.trim_start())
        };
        text = merged;
    }

    // Anything left after the cap is flattened
    let flattened = text.replace(['(', ')'], " ");
    collapse_whitespace(&flattened)
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

/// Drop a leading `( … )` amount such as the "(14 oz)" in "2 (14 oz) cans"
fn strip_leading_measurement(text: &str) -> &str {
    if !text.starts_with('(') {
        return text;
    }
    match text.find(')') {
        Some(close) if is_measurement_only(&text[1..close]) => text[close + 1..].trim_start(),
        _ => text,
    }
}

/// Parse one ingredient line.
///
/// Never fails on quantity problems; only unbalanced parentheses and lines
/// without a name are reported, as a [`ParseIssue`].
pub fn parse_ingredient_line(line: &str) -> Result<ParsedIngredientLine, ParseIssue> {
    let original = line.trim();

    if !parens_balanced(original) {
        return Err(ParseIssue::UnbalancedParentheses { line: original.to_string() });
    }

    let (quantity_text, rest) = split_leading_quantity(original);
    let quantity = quantity_text.as_deref().map_or(DEFAULT_QUANTITY, parse_quantity);
    let rest = strip_leading_measurement(rest);

    let (unit, rest) = match match_unit(rest) {
        // An ingredient noun is both the unit and the name
        Some((def, _)) if def.ingredient_noun => (def.canonical, rest),
        Some((def, consumed)) => (def.canonical, rest[consumed..].trim_start()),
        None => (DEFAULT_UNIT, rest),
    };

    let rest = rest.trim_start_matches(',').trim_start();
    let rest = match rest.get(..3) {
        Some(head) if head.eq_ignore_ascii_case("of ") => &rest[3..],
        _ => rest,
    };

    let name = merge_parentheticals(rest);
    if name.is_empty() {
        return Err(ParseIssue::UnparseableLine {
            line: original.to_string(),
            reason: "no ingredient name".to_string(),
        });
    }

    debug!(quantity, unit, name = %name, "Parsed ingredient line");
    Ok(resolve_specification(ParsedIngredientLine::new(quantity, unit, &name, original)))
}
