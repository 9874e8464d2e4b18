//! Input sanitizer
//!
//! Turns pasted recipe text (HTML fragments, entities, Unicode fractions,
//! bullets, emoji) into plain lines the classifier and line parser can read.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ParseError;

/// Default maximum input size in bytes
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50_000;
/// Default maximum number of input lines
pub const DEFAULT_MAX_INPUT_LINES: usize = 500;

/// Size limits enforced before any processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_bytes: usize,
    pub max_lines: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_lines: DEFAULT_MAX_INPUT_LINES,
        }
    }
}

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(?:br\s*/?|/\s*(?:p|li|div|h[1-6]|tr))\s*>").unwrap()
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|([a-zA-Z][a-zA-Z0-9]*));").unwrap()
});
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}]+").unwrap());
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•◦▪‣●·▸►]\s*|[*\-–]\s+)").unwrap());

/// Named HTML entities we decode; anything else is left untouched
const ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", " "),
    ("frac12", "½"),
    ("frac14", "¼"),
    ("frac34", "¾"),
    ("ndash", "–"),
    ("mdash", "—"),
    ("deg", "°"),
    ("hellip", "…"),
    ("lsquo", "'"),
    ("rsquo", "'"),
    ("ldquo", "\""),
    ("rdquo", "\""),
    ("times", "×"),
];

/// Unicode vulgar fractions and their ASCII form
const FRACTIONS: &[(char, &str)] = &[
    ('½', "1/2"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅕', "1/5"),
    ('⅖', "2/5"),
    ('⅗', "3/5"),
    ('⅘', "4/5"),
    ('⅙', "1/6"),
    ('⅚', "5/6"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}')
}

fn is_emoji_or_dingbat(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0xFE00..=0xFE0F | 0xE0020..=0xE007F
    )
}

/// Reject input over the configured limits
pub fn check_limits(raw: &str, limits: &InputLimits) -> Result<(), ParseError> {
    let bytes = raw.len();
    let lines = raw.lines().count();
    if bytes > limits.max_bytes || lines > limits.max_lines {
        return Err(ParseError::InputTooLarge {
            bytes,
            lines,
            max_bytes: limits.max_bytes,
            max_lines: limits.max_lines,
        });
    }
    Ok(())
}

/// Decode numeric and named entities in one pass, so decoded text is never
/// decoded again. Unknown names and invalid code points are kept verbatim.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(hex), _, _) => u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from),
                (_, Some(dec), _) => dec.as_str().parse::<u32>().ok().and_then(char::from_u32).map(String::from),
                (_, _, Some(name)) => ENTITIES
                    .iter()
                    .find(|(entity, _)| entity.eq_ignore_ascii_case(name.as_str()))
                    .map(|(_, value)| value.to_string()),
                _ => None,
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Map fractions to ASCII and drop invisible or decorative code points
fn normalize_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some((_, ascii)) = FRACTIONS.iter().find(|(f, _)| *f == c) {
            if out.chars().last().is_some_and(|p| p.is_ascii_digit()) {
                out.push(' ');
            }
            out.push_str(ascii);
        } else if c == '\u{2044}' {
            out.push('/');
        } else if is_zero_width(c) || is_emoji_or_dingbat(c) {
            continue;
        } else {
            out.push(c);
        }
    }
    out
}

fn clean_line(line: &str) -> String {
    let collapsed = HORIZONTAL_SPACE.replace_all(line, " ");
    let trimmed = collapsed.trim();
    LEADING_BULLET.replace(trimmed, "").trim().to_string()
}

/// Sanitize raw recipe text.
///
/// Fails with [`ParseError::InputTooLarge`] before doing any work when the input
/// exceeds `limits`. Newlines are preserved; every line is trimmed.
pub fn sanitize(raw: &str, limits: &InputLimits) -> Result<String, ParseError> {
    check_limits(raw, limits)?;

    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = BLOCK_TAG.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = normalize_chars(&text);

    Ok(text.lines().map(clean_line).collect::<Vec<_>>().join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        sanitize(raw, &InputLimits::default()).unwrap()
    }

    #[test]
    fn test_strips_html_and_decodes_entities() {
        assert_eq!(
            clean("<p>Mac &amp; Cheese</p><ul><li>2 cups <b>macaroni</b></li></ul>"),
            "Mac & Cheese\n2 cups macaroni"
        );
        assert_eq!(clean("1&frac12; cups milk"), "1 1/2 cups milk");
        assert_eq!(clean("350&#176;F oven"), "350°F oven");
        assert_eq!(clean("&unknown; stays"), "&unknown; stays");
    }

    #[test]
    fn test_entities_decode_once() {
        assert_eq!(decode_entities("&#38;lt;"), "&lt;");
        assert_eq!(decode_entities("&#x26;amp; &amp;quot;"), "&amp; &quot;");
        assert_eq!(decode_entities("a &#xD800; b &#9999999; c"), "a &#xD800; b &#9999999; c");
        assert_eq!(decode_entities("&#x41;&#66;&AMP;"), "AB&");
    }

    #[test]
    fn test_unicode_fractions() {
        assert_eq!(clean("½ cup sugar"), "1/2 cup sugar");
        assert_eq!(clean("1½ cups flour"), "1 1/2 cups flour");
        assert_eq!(clean("2 ¾ cups water"), "2 3/4 cups water");
        assert_eq!(clean("1⁄3 cup oil"), "1/3 cup oil");
    }

    #[test]
    fn test_bullets_emoji_and_whitespace() {
        assert_eq!(clean("•  2 eggs 🥚"), "2 eggs");
        assert_eq!(clean("- 1 tsp\t\tsalt"), "1 tsp salt");
        assert_eq!(clean("1\u{200B} cup\u{00A0}\u{00A0}rice"), "1 cup rice");
        assert_eq!(clean("Title\r\n\r\n3 carrots"), "Title\n\n3 carrots");
    }

    #[test]
    fn test_negative_number_is_not_a_bullet() {
        assert_eq!(clean("-5 degrees"), "-5 degrees");
    }

    #[test]
    fn test_input_too_large() {
        let limits = InputLimits { max_bytes: 10, max_lines: 500 };
        let err = sanitize("this is more than ten bytes", &limits).unwrap_err();
        assert!(matches!(err, ParseError::InputTooLarge { bytes: 27, .. }));

        let limits = InputLimits { max_bytes: 50_000, max_lines: 2 };
        assert!(sanitize("a\nb\nc", &limits).is_err());
        assert!(sanitize("a\nb", &limits).is_ok());
    }
}
