//! Style-biased category ranking for room suggestions.
//!
//! Scores a sample of catalog rows against the user's style keywords and
//! folds the totals into per-category and per-subcategory rankings. The
//! static room defaults always lead the final list — the ranking only
//! orders what the catalog adds after them.

use crate::store::CatalogItem;
use ahash::{AHashMap, AHashSet};

/// Room-default category lists, in fixed priority order.
const ROOM_DEFAULTS: &[(&str, &[&str])] = &[
    ("living", &["seating", "tables", "storage", "lighting", "decor"]),
    ("bedroom", &["beds", "storage", "lighting", "soft furnishing"]),
    ("kitchen", &["storage", "lighting", "decor"]),
    ("dining", &["tables", "seating", "lighting"]),
    ("bathroom", &["storage", "lighting"]),
    ("balcony", &["seating", "decor"]),
    ("foyer", &["storage", "decor", "lighting"]),
    ("study", &["tables", "seating", "storage", "lighting"]),
    ("utility", &["storage"]),
    ("garden", &["decor", "lighting"]),
];

/// Default categories for a canonical room type; empty for unknown rooms.
pub fn room_defaults(room: &str) -> &'static [&'static str] {
    ROOM_DEFAULTS
        .iter()
        .find(|(key, _)| *key == room)
        .map_or(&[], |(_, defaults)| *defaults)
}

/// Cache key for a suggestion query: lowercased room plus the sorted,
/// lowercased style bias, so keyword order doesn't fragment the cache.
pub(crate) fn suggestion_cache_key(room: &str, style_bias: &[String]) -> String {
    let mut bias: Vec<String> = style_bias
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    bias.sort();
    format!("{}|{}", room.trim().to_lowercase(), bias.join(","))
}

/// Score accumulator preserving first-seen order, so equal totals rank in
/// the order their keys were first encountered (stable sort on top).
#[derive(Default)]
struct ScoreBoard {
    entries: Vec<(String, u32)>,
    index: AHashMap<String, usize>,
}

impl ScoreBoard {
    fn add(&mut self, key: String, score: u32) {
        if let Some(&at) = self.index.get(&key) {
            self.entries[at].1 += score;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, score));
        }
    }

    fn ranked(mut self) -> Vec<String> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.into_iter().map(|(key, _)| key).collect()
    }
}

/// How many style keywords appear (as substrings) in the item's haystack.
fn style_score(haystack: &str, bias: &[String]) -> u32 {
    bias.iter().filter(|k| haystack.contains(k.as_str())).count() as u32
}

/// Rank category suggestions for a room from a catalog sample.
///
/// Output order: the room's default categories first, then store-derived
/// categories by descending style score, then subcategories by descending
/// score; duplicates removed, truncated to `cap`. Zero-score entries still
/// rank (after the positives) — the sample was chosen for coverage, and an
/// unmatched category is a weaker suggestion, not a rejected one.
pub(crate) fn rank_suggestions(
    items: &[CatalogItem],
    room: &str,
    style_bias: &[String],
    cap: usize,
) -> Vec<String> {
    let bias: Vec<String> = style_bias
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut categories = ScoreBoard::default();
    let mut subcategories = ScoreBoard::default();

    for item in items {
        let haystack = item.search_haystack();
        let score = style_score(&haystack, &bias);
        if !item.category.is_empty() {
            categories.add(item.category.trim().to_lowercase(), score);
        }
        if !item.subcategory.is_empty() {
            subcategories.add(item.subcategory.trim().to_lowercase(), score);
        }
    }

    let mut out: Vec<String> = Vec::new();
    let mut seen = AHashSet::new();
    let defaults = room_defaults(room)
        .iter()
        .map(|d| (*d).to_owned())
        .collect::<Vec<_>>();

    for entry in defaults
        .into_iter()
        .chain(categories.ranked())
        .chain(subcategories.ranked())
    {
        if seen.insert(entry.clone()) {
            out.push(entry);
        }
        if out.len() == cap {
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn item(category: &str, subcategory: &str, name: &str, description: &str) -> CatalogItem {
        CatalogItem {
            id: String::new(),
            item_name: name.to_owned(),
            description: description.to_owned(),
            details: String::new(),
            category: category.to_owned(),
            subcategory: subcategory.to_owned(),
            price_inr: None,
            suggestive_areas: Vec::new(),
            preferred_theme: String::new(),
            keywords: Vec::new(),
        }
    }

    #[test]
    fn defaults_lead_for_known_rooms() {
        let suggestions = rank_suggestions(&[], "living", &[], 12);
        check!(suggestions == vec!["seating", "tables", "storage", "lighting", "decor"]);
        check!(rank_suggestions(&[], "garage", &[], 12).is_empty());
    }

    #[test]
    fn scored_categories_follow_defaults() {
        let bias = vec!["scandinavian".to_owned()];
        let items = vec![
            item("appliances", "fans", "Ceiling fan", "plain"),
            item("flooring", "oak planks", "Fjord floor", "Scandinavian oak"),
        ];
        let suggestions = rank_suggestions(&items, "living", &bias, 12);
        let defaults_len = room_defaults("living").len();

        check!(&suggestions[..defaults_len] == room_defaults("living"));
        // "flooring" scored 1, "appliances" 0: score beats first-seen order.
        check!(suggestions[defaults_len] == "flooring");
        check!(suggestions[defaults_len + 1] == "appliances");
        // Subcategories rank after all categories.
        check!(suggestions[defaults_len + 2] == "oak planks");
        check!(suggestions[defaults_len + 3] == "fans");
    }

    #[test]
    fn equal_scores_keep_first_seen_order() {
        let items = vec![
            item("flooring", "", "A", ""),
            item("appliances", "", "B", ""),
            item("flooring", "", "C", ""),
        ];
        let suggestions = rank_suggestions(&items, "utility", &[], 12);
        check!(suggestions == vec!["storage", "flooring", "appliances"]);
    }

    #[test]
    fn duplicates_of_defaults_are_removed() {
        let items = vec![item("seating", "sofas", "Couch", "")];
        let suggestions = rank_suggestions(&items, "living", &[], 12);
        let seating_count = suggestions.iter().filter(|s| *s == "seating").count();
        check!(seating_count == 1);
        check!(suggestions.contains(&"sofas".to_owned()));
    }

    #[test]
    fn list_is_capped() {
        let items: Vec<CatalogItem> = (0..30)
            .map(|i| item(&format!("category-{i}"), &format!("sub-{i}"), "x", ""))
            .collect();
        let suggestions = rank_suggestions(&items, "living", &[], 12);
        check!(suggestions.len() == 12);
    }

    #[test]
    fn multi_keyword_scores_accumulate() {
        let bias = vec!["walnut".to_owned(), "brass".to_owned()];
        let items = vec![
            item("lighting", "", "Brass pendant", "walnut and brass"),
            item("decor", "", "Brass bowl", "brass only"),
        ];
        let suggestions = rank_suggestions(&items, "garage", &bias, 12);
        // lighting scored 2, decor 1.
        check!(suggestions == vec!["lighting", "decor"]);
    }

    #[test]
    fn cache_key_sorts_and_lowercases_bias() {
        let a = suggestion_cache_key("Living", &["Boho".to_owned(), "airy".to_owned()]);
        let b = suggestion_cache_key("living", &["airy".to_owned(), "boho".to_owned()]);
        check!(a == b);
        check!(a == "living|airy,boho");
    }
}
