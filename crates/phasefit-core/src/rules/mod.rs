//! Domain rule tables: banned ingredients, allowed vocabulary, and the
//! generic-language detector.
//!
//! The word lists are defined in `rules.toml` and embedded in the binary at
//! compile time. The detector patterns are compiled once into a
//! [`RegexSet`].

use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use serde::Deserialize;

use crate::profile::{Diet, Profile};

/// Container for deserializing the embedded TOML file.
#[derive(Debug, Deserialize)]
struct RuleLibrary {
    banned: BannedTables,
    allowed: AllowedTables,
}

#[derive(Debug, Deserialize)]
struct BannedTables {
    meats: Vec<String>,
    eggs: Vec<String>,
    dairy: Vec<String>,
    vegan_extra: Vec<String>,
    condition: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AllowedTables {
    base: Vec<String>,
    eggs: Vec<String>,
    dairy: Vec<String>,
    meats: Vec<String>,
}

/// The embedded rules TOML.
static RULES_TOML: &str = include_str!("rules.toml");

/// Parsed rule library.
///
/// # Panics
///
/// Panics on first use if the embedded TOML is malformed. The file is part
/// of the binary, so a successful test run proves it parses.
static RULES: LazyLock<RuleLibrary> =
    LazyLock::new(|| toml::from_str(RULES_TOML).expect("embedded rules.toml is invalid"));

/// Vague menu wording the model is told to avoid.
const GENERIC_PATTERNS: &[&str] = &[
    r"(?i)\bprotein\b",
    r"(?i)\bcarb(s)?\b",
    r"(?i)\bgrain(s)?\b",
    r"(?i)\bveg(etable|gies)?\b",
    r"(?i)\bbalanced\b",
    r"(?i)complex carb",
    r"(?i)your choice",
    r"(?i)snack box",
    r"(?i)\b(bowl|plate)\b",
];

static GENERIC: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(GENERIC_PATTERNS).expect("generic patterns are valid"));

/// Words that count as a protein source for the low-protein heuristic.
///
/// The literal word "protein" is accepted here even though
/// [`has_generic`] rejects it.
static PROTEIN_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(tofu|tempeh|lentil|chickpea|bean|egg|chicken|fish|paneer|yogurt|seitan|edamame|protein)\b",
    )
    .expect("protein pattern is valid")
});

// ---------------------------------------------------------------------------
// Banned and allowed tables
// ---------------------------------------------------------------------------

/// Ingredient tokens the given diet forbids.
///
/// vegan: meats, eggs, dairy and honey. vegetarian and eggs_ok: meats.
/// nonveg: nothing.
pub fn banned_tokens_for_diet(diet: Diet) -> Vec<String> {
    let banned = &RULES.banned;
    match diet {
        Diet::Vegan => banned
            .meats
            .iter()
            .chain(&banned.eggs)
            .chain(&banned.dairy)
            .chain(&banned.vegan_extra)
            .cloned()
            .collect(),
        Diet::Vegetarian | Diet::EggsOk => banned.meats.clone(),
        Diet::Nonveg => Vec::new(),
    }
}

/// High-glycemic and processed-food terms applied when the condition flag is
/// set.
pub fn forbidden_for_condition() -> Vec<String> {
    RULES.banned.condition.clone()
}

/// Vocabulary the prompt steers the model towards. Not enforced.
pub fn allowed_foods(profile: &Profile) -> Vec<String> {
    let allowed = &RULES.allowed;
    let mut foods = allowed.base.clone();

    if profile.diet == Diet::EggsOk {
        extend_unique(&mut foods, &allowed.eggs);
    }
    if matches!(profile.diet, Diet::Vegetarian | Diet::EggsOk) {
        extend_unique(&mut foods, &allowed.dairy);
    }
    if profile.diet == Diet::Nonveg {
        extend_unique(&mut foods, &allowed.meats);
    }
    foods
}

fn extend_unique(foods: &mut Vec<String>, extra: &[String]) {
    for item in extra {
        if !foods.contains(item) {
            foods.push(item.clone());
        }
    }
}

/// Every token that must not appear in generated meal text for `profile`.
///
/// Order: diet bans, condition bans (if flagged), dislikes, allergies. The
/// validator reports the first match in this order.
pub fn exclusions(profile: &Profile) -> Vec<String> {
    let mut tokens = banned_tokens_for_diet(profile.diet);
    if profile.has_condition {
        tokens.extend(forbidden_for_condition());
    }
    tokens.extend(profile.dislikes.iter().cloned());
    tokens.extend(profile.allergies.iter().cloned());
    tokens
        .into_iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Text checks
// ---------------------------------------------------------------------------

/// True if `text` contains vague menu wording.
pub fn has_generic(text: &str) -> bool {
    GENERIC.is_match(text)
}

/// True if `text` names at least one protein indicator.
pub fn mentions_protein(text: &str) -> bool {
    PROTEIN_INDICATOR.is_match(text)
}

/// First token from `tokens` that occurs in `text` (case-insensitive
/// substring match).
///
/// `tokens` are expected to be lowercase already.
pub fn find_forbidden<'a>(text: &str, tokens: &'a [String]) -> Option<&'a str> {
    let low = text.to_lowercase();
    tokens
        .iter()
        .map(String::as_str)
        .find(|t| !t.is_empty() && low.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Goal;

    #[test]
    fn embedded_rules_parse() {
        assert!(!RULES.banned.meats.is_empty());
        assert!(!RULES.allowed.base.is_empty());
    }

    #[test]
    fn vegan_bans_everything_animal() {
        let banned = banned_tokens_for_diet(Diet::Vegan);
        for token in ["chicken", "egg", "cheese", "honey", "ghee"] {
            assert!(banned.iter().any(|b| b == token), "missing {token}");
        }
    }

    #[test]
    fn vegetarian_and_eggs_ok_ban_meat_only() {
        for diet in [Diet::Vegetarian, Diet::EggsOk] {
            let banned = banned_tokens_for_diet(diet);
            assert!(banned.iter().any(|b| b == "salmon"));
            assert!(!banned.iter().any(|b| b == "egg"));
            assert!(!banned.iter().any(|b| b == "cheese"));
        }
    }

    #[test]
    fn nonveg_bans_nothing() {
        assert!(banned_tokens_for_diet(Diet::Nonveg).is_empty());
    }

    #[test]
    fn allowed_foods_extend_by_diet() {
        let vegan = allowed_foods(&Profile::new(Goal::Energy, Diet::Vegan));
        assert!(vegan.iter().any(|f| f == "tofu"));
        assert!(!vegan.iter().any(|f| f == "paneer"));
        assert!(!vegan.iter().any(|f| f == "egg"));

        let eggs_ok = allowed_foods(&Profile::new(Goal::Energy, Diet::EggsOk));
        assert!(eggs_ok.iter().any(|f| f == "egg"));
        assert!(eggs_ok.iter().any(|f| f == "paneer"));

        let vegetarian = allowed_foods(&Profile::new(Goal::Energy, Diet::Vegetarian));
        assert!(vegetarian.iter().any(|f| f == "yogurt"));
        assert!(!vegetarian.iter().any(|f| f == "egg"));

        let nonveg = allowed_foods(&Profile::new(Goal::Energy, Diet::Nonveg));
        assert!(nonveg.iter().any(|f| f == "salmon"));
        assert!(!nonveg.iter().any(|f| f == "cheese"));
    }

    #[test]
    fn exclusions_follow_profile() {
        let profile = Profile::new(Goal::Energy, Diet::Nonveg)
            .with_condition(true)
            .with_dislikes(["Okra"])
            .with_allergies(["peanut"]);
        let tokens = exclusions(&profile);
        assert_eq!(tokens.first().map(String::as_str), Some("white bread"));
        assert_eq!(&tokens[tokens.len() - 2..], &["okra", "peanut"]);

        let plain = exclusions(&Profile::new(Goal::Energy, Diet::Nonveg));
        assert!(plain.is_empty());
    }

    #[test]
    fn generic_detection() {
        assert!(!has_generic("grilled chicken breast with quinoa"));
        assert!(has_generic("balanced protein bowl"));
        assert!(has_generic("Your choice of fruit"));
        assert!(has_generic("Veggies with hummus"));
        assert!(has_generic("Complex carbohydrates"));
        assert!(has_generic("PLATE of rice"));
        assert!(!has_generic("Bowling-alley nachos"));
        assert!(!has_generic("Proteinaceous shake"));
    }

    #[test]
    fn protein_indicator_allows_literal_protein() {
        assert!(mentions_protein("Pea protein smoothie"));
        assert!(mentions_protein("Tofu scramble"));
        assert!(!mentions_protein("Apple slices with cinnamon"));
    }

    #[test]
    fn vegan_allowed_vocabulary_overlaps_dairy_bans() {
        // Plant milks and nut butters are suggested to vegans but still trip
        // the substring dairy bans.
        let profile = Profile::new(Goal::Energy, Diet::Vegan);
        let allowed = allowed_foods(&profile);
        let tokens = exclusions(&profile);
        for (food, token) in [
            ("soy milk", "milk"),
            ("oat milk", "milk"),
            ("peanut butter", "butter"),
            ("almond butter", "butter"),
        ] {
            assert!(allowed.iter().any(|f| f == food), "{food} not allowed");
            assert_eq!(find_forbidden(food, &tokens), Some(token));
        }
    }

    #[test]
    fn find_forbidden_reports_first_match() {
        let tokens = banned_tokens_for_diet(Diet::Vegan);
        assert_eq!(find_forbidden("Cheese omelette", &tokens), Some("omelet"));
        assert_eq!(find_forbidden("Oats with berries", &tokens), None);
    }
}
