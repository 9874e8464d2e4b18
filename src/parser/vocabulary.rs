//! Word lists used by the line parser and sub-recipe detector
//!
//! English only. Membership is deliberately closed; extend the lists rather
//! than adding fuzzy matching.

/// Colors that qualify an ingredient ("red onion")
pub const COLOR_WORDS: &[&str] = &[
    "red", "green", "yellow", "white", "black", "brown", "purple", "golden", "orange",
];

/// Preparation verbs and states, stripped from database search text
pub const PREPARATION_WORDS: &[&str] = &[
    "chopped", "diced", "minced", "sliced", "grated", "shredded", "peeled", "seeded",
    "cubed", "crushed", "ground", "fresh", "frozen", "thawed", "softened", "melted",
    "beaten", "cooked", "uncooked", "raw", "toasted", "roasted", "trimmed", "halved",
    "quartered", "julienned", "packed", "sifted", "rinsed", "drained", "pitted", "cored",
    "zested", "juiced", "finely", "coarsely", "roughly", "thinly", "canned", "unsalted",
    "salted", "cold", "warm", "hot", "room-temperature", "unbleached", "firmly", "lightly",
];

/// Cut and trim qualifiers kept in search text ("boneless skinless")
pub const CUT_QUALIFIERS: &[&str] = &[
    "boneless", "skinless", "bone-in", "skin-on", "lean", "extra-lean", "fat-free",
    "low-fat", "reduced-fat", "low-sodium", "unsweetened", "sweetened",
];

/// Size words; also the default specification vocabulary
pub const SIZE_WORDS: &[&str] = &["small", "medium", "large", "extra-large", "jumbo"];

/// Animal body parts and cuts placed after the core noun
pub const BODY_PART_WORDS: &[&str] = &[
    "breast", "breasts", "thigh", "thighs", "wing", "wings", "leg", "legs", "drumstick",
    "drumsticks", "fillet", "fillets", "filet", "filets", "loin", "tenderloin", "shoulder",
    "rib", "ribs", "chop", "chops", "belly", "shank", "neck", "flank", "brisket", "steak",
    "steaks", "cutlet", "cutlets", "tail", "tails",
];

/// Parenthetical contents starting with these are annotations, not ingredients
pub const INFORMATIONAL_PREFIXES: &[&str] = &[
    "about", "approx", "approximately", "around", "roughly", "optional", "to taste",
    "or", "plus", "divided", "see", "such as", "like", "e.g", "eg", "for garnish",
    "for serving", "if desired", "at room temperature", "preferably", "any", "from",
    "homemade", "store-bought", "we used", "i used", "note", "~",
];

/// Common food nouns used to judge whether a parenthetical item is an ingredient
pub const FOOD_NOUNS: &[&str] = &[
    "tomato", "tomatoes", "onion", "onions", "garlic", "cilantro", "parsley", "basil",
    "oregano", "thyme", "rosemary", "salt", "pepper", "sugar", "flour", "butter", "oil",
    "milk", "cream", "cheese", "chicken", "beef", "pork", "turkey", "fish", "salmon",
    "shrimp", "rice", "beans", "lime", "limes", "lemon", "lemons", "egg", "eggs", "water",
    "vinegar", "honey", "yeast", "cumin", "paprika", "cinnamon", "nutmeg", "ginger",
    "chili", "chilies", "jalapeno", "jalapenos", "avocado", "avocados", "corn", "carrot",
    "carrots", "celery", "potato", "potatoes", "spinach", "lettuce", "cabbage", "mushroom",
    "mushrooms", "broth", "stock", "wine", "mayonnaise", "mustard", "ketchup", "soy",
    "sauce", "yogurt", "oats", "cocoa", "chocolate", "vanilla", "almonds", "walnuts",
    "pecans", "peanuts", "apple", "apples", "banana", "bananas", "scallions", "shallot",
    "shallots", "zucchini", "cucumber", "bacon", "sausage", "ham", "tofu", "pasta",
    "noodles", "bread", "breadcrumbs", "cornstarch", "syrup", "juice", "zest",
];

/// Lowercase and strip surrounding punctuation
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '~')
        .to_lowercase()
}

fn contains(list: &[&str], word: &str) -> bool {
    let word = normalize_word(word);
    list.iter().any(|w| *w == word)
}

pub fn is_color_word(word: &str) -> bool {
    contains(COLOR_WORDS, word)
}

pub fn is_preparation_word(word: &str) -> bool {
    contains(PREPARATION_WORDS, word)
}

pub fn is_body_part(word: &str) -> bool {
    contains(BODY_PART_WORDS, word)
}

pub fn is_food_noun(word: &str) -> bool {
    contains(FOOD_NOUNS, word)
}

/// Color, preparation, cut or size word
pub fn is_descriptor_word(word: &str) -> bool {
    is_color_word(word)
        || is_preparation_word(word)
        || contains(CUT_QUALIFIERS, word)
        || contains(SIZE_WORDS, word)
}

/// True when the text begins with one of [`INFORMATIONAL_PREFIXES`] as whole words
pub fn starts_with_informational_prefix(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    INFORMATIONAL_PREFIXES.iter().any(|prefix| {
        lower.strip_prefix(prefix).is_some_and(|rest| {
            prefix.ends_with('~')
                || rest.is_empty()
                || rest.starts_with(|c: char| c.is_whitespace() || c == '.' || c == ',' || c == ':')
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_words() {
        assert!(is_descriptor_word("Boneless,"));
        assert!(is_descriptor_word("red"));
        assert!(is_descriptor_word("chopped"));
        assert!(is_descriptor_word("large"));
        assert!(!is_descriptor_word("chicken"));
    }

    #[test]
    fn test_body_parts_and_food_nouns() {
        assert!(is_body_part("breast"));
        assert!(is_body_part("Thighs"));
        assert!(is_food_noun("cilantro"));
        assert!(!is_food_noun("boneless"));
    }

    #[test]
    fn test_informational_prefix_requires_word_boundary() {
        assert!(starts_with_informational_prefix("about 2 cups"));
        assert!(starts_with_informational_prefix("Optional"));
        assert!(starts_with_informational_prefix("to taste"));
        assert!(starts_with_informational_prefix("~200g"));
        assert!(!starts_with_informational_prefix("orange zest"));
        assert!(!starts_with_informational_prefix("anything goes"));
    }
}
