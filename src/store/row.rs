//! Row coercion: typed records out of whatever the store returns.
//!
//! Rule and catalog tables are maintained by hand and imported from
//! spreadsheets, so rows routinely miss fields, carry numbers as strings,
//! or store lists as comma-separated text. The policy here is coercion,
//! never rejection: a missing or oddly-typed field becomes an empty string,
//! `None`, or an open range, and the row still participates in matching.

use super::Row;
use crate::range::{NumericRange, parse_range};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String field, coerced: missing/null → empty, numbers stringified,
/// surrounding whitespace trimmed.
pub(crate) fn text(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Optional string field: as [`text`], but empty collapses to `None`.
pub(crate) fn opt_text(row: &Row, key: &str) -> Option<String> {
    let value = text(row, key);
    if value.is_empty() { None } else { Some(value) }
}

/// Numeric field, accepting JSON numbers and numeric strings.
pub(crate) fn number(row: &Row, key: &str) -> Option<f64> {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Small-count field (quantities), floored to zero.
pub(crate) fn count(row: &Row, key: &str) -> Option<u32> {
    number(row, key).map(|v| {
        if v.is_sign_negative() { 0 } else { v as u32 }
    })
}

/// List field, accepting JSON arrays of strings or comma-separated text.
/// Entries are trimmed; empties dropped.
pub(crate) fn text_list(row: &Row, key: &str) -> Vec<String> {
    match row.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Range field stored as free text ("600-850").
pub(crate) fn range_text(row: &Row, key: &str) -> NumericRange {
    parse_range(&text(row, key))
}

/// A catalog furnishing item. Owned by the store; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub item_name: String,
    pub description: String,
    pub details: String,
    pub category: String,
    pub subcategory: String,
    pub price_inr: Option<f64>,
    pub suggestive_areas: Vec<String>,
    pub preferred_theme: String,
    pub keywords: Vec<String>,
}

impl CatalogItem {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: text(row, "id"),
            item_name: text(row, "item_name"),
            description: text(row, "item_description"),
            details: text(row, "item_details"),
            category: text(row, "category"),
            subcategory: text(row, "subcategory"),
            price_inr: number(row, "price_inr"),
            suggestive_areas: text_list(row, "suggestive_areas"),
            preferred_theme: text(row, "preferred_theme"),
            keywords: text_list(row, "keywords"),
        }
    }

    /// Lowercased concatenation of the text fields style keywords are
    /// matched against.
    pub fn search_haystack(&self) -> String {
        let mut haystack = String::with_capacity(
            self.item_name.len() + self.description.len() + self.details.len() + 32,
        );
        for part in [&self.item_name, &self.description, &self.details] {
            haystack.push_str(part);
            haystack.push(' ');
        }
        for keyword in &self.keywords {
            haystack.push_str(keyword);
            haystack.push(' ');
        }
        haystack.to_lowercase()
    }
}

/// Budget bands for one property configuration. Only the floors matter for
/// tier classification; the bands are kept contiguous so the economy ceiling
/// is the premium floor and so on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetBands {
    pub economy: NumericRange,
    pub premium: NumericRange,
    pub luxury: NumericRange,
}

impl BudgetBands {
    /// Bands from explicit tier floors (`size_and_pricing` shape).
    pub fn from_floors(premium_min: Option<f64>, luxury_min: Option<f64>) -> Self {
        Self {
            economy: NumericRange::from_bounds(None, premium_min),
            premium: NumericRange::from_bounds(premium_min, luxury_min),
            luxury: NumericRange::from_bounds(luxury_min, None),
        }
    }
}

/// A sizing/budget rule row: one per property-type/configuration pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRule {
    pub id: String,
    pub property_type: String,
    pub configuration: String,
    pub other_names: Vec<String>,
    pub carpet: NumericRange,
    pub built_up: NumericRange,
    pub budget: BudgetBands,
}

impl SizingRule {
    /// Parse a `rules` table row, where areas and budgets are range text.
    pub fn from_rules_row(row: &Row) -> Self {
        Self {
            id: text(row, "id"),
            property_type: text(row, "property_type"),
            configuration: text(row, "configuration"),
            other_names: text_list(row, "other_variant_names"),
            carpet: range_text(row, "carpet_area_range_sqft"),
            built_up: range_text(row, "built_up_area_range_sqft"),
            budget: BudgetBands {
                economy: range_text(row, "budget_range_economy_inr"),
                premium: range_text(row, "budget_range_premium_inr"),
                luxury: range_text(row, "budget_range_luxury_inr"),
            },
        }
    }

    /// Parse a `size_and_pricing` table row, where budgets are numeric tier
    /// floors rather than range text.
    pub fn from_size_pricing_row(row: &Row) -> Self {
        Self {
            id: text(row, "id"),
            property_type: text(row, "property_type"),
            configuration: text(row, "configuration"),
            other_names: text_list(row, "other_variant_names"),
            carpet: range_text(row, "carpet_area_range_sqft"),
            built_up: range_text(row, "built_up_area_range_sqft"),
            budget: BudgetBands::from_floors(
                number(row, "budget_premium_min_inr"),
                number(row, "budget_luxury_min_inr"),
            ),
        }
    }
}

/// A per-room item constraint row from `rules_for_apartment` /
/// `rules_for_villa`. Absent `room_subtype` / `item_subcategory` means the
/// row applies regardless of subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRuleRow {
    pub id: String,
    pub configuration: String,
    pub room_type: String,
    pub room_subtype: Option<String>,
    pub item_category: String,
    pub item_subcategory: Option<String>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
    pub recommended_quantity: Option<u32>,
    pub size_preference: Option<String>,
    pub price: NumericRange,
    pub priority: Option<i64>,
    pub notes: Option<String>,
}

impl PropertyRuleRow {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: text(row, "id"),
            configuration: text(row, "configuration"),
            room_type: text(row, "room_type"),
            room_subtype: opt_text(row, "room_subtype"),
            item_category: text(row, "item_category"),
            item_subcategory: opt_text(row, "item_subcategory"),
            min_quantity: count(row, "min_quantity"),
            max_quantity: count(row, "max_quantity"),
            recommended_quantity: count(row, "recommended_quantity"),
            size_preference: opt_text(row, "size_preference"),
            price: NumericRange::from_bounds(
                number(row, "price_range_min_inr"),
                number(row, "price_range_max_inr"),
            ),
            priority: number(row, "priority").map(|v| v as i64),
            notes: opt_text(row, "notes"),
        }
    }
}
