//! Grocery list derivation from meal text.

use std::collections::HashSet;

use crate::plan::types::{GROCERY_LIMIT, Plan};
use crate::rules;

/// Build a shopping list from every meal in `plan`.
///
/// Meals are split on `,` and `+`; tokens of two characters or fewer and
/// tokens with generic wording are dropped. The first letter is upper-cased,
/// duplicates are removed keeping first-seen order, and the result is capped
/// at [`GROCERY_LIMIT`].
pub fn derive_grocery(plan: &Plan) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    let tokens = plan
        .days
        .iter()
        .flat_map(|day| day.meals.iter().map(|(_, text)| text))
        .flat_map(|text| text.split([',', '+']))
        .map(str::trim)
        .filter(|t| t.chars().count() > 2 && !rules::has_generic(t));

    for token in tokens {
        let item = capitalize(token);
        if seen.insert(item.clone()) {
            items.push(item);
            if items.len() == GROCERY_LIMIT {
                break;
            }
        }
    }
    items
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
