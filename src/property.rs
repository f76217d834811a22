//! Per-room property rule matching.
//!
//! Pure filtering over loaded [`PropertyRuleRow`] tables; the engine picks
//! the apartment or villa table and feeds rows through here. Subtype
//! comparison is an explicit three-way match so the wildcard precedence
//! (missing subtype on a row matches any queried subtype, never the other
//! way round) stays auditable in one place.

use crate::store::PropertyRuleRow;

/// Which rule table a property uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Apartment,
    Villa,
}

impl PropertyKind {
    /// "villa" (case-insensitive) selects the villa table; every other
    /// property type uses the apartment table.
    pub fn from_property_type(property_type: &str) -> Self {
        if property_type.trim().eq_ignore_ascii_case("villa") {
            PropertyKind::Villa
        } else {
            PropertyKind::Apartment
        }
    }
}

/// Outcome of comparing a rule row's subtype against a query subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtypeMatch {
    /// Both recorded and equal (case-insensitive).
    Exact,
    /// The row records no subtype: it applies regardless of the query.
    Wildcard,
    /// The row records a subtype the query doesn't carry or doesn't equal.
    Mismatch,
}

impl SubtypeMatch {
    pub fn classify(row_subtype: Option<&str>, query_subtype: Option<&str>) -> Self {
        match (row_subtype, query_subtype) {
            (None, _) => SubtypeMatch::Wildcard,
            (Some(row), Some(query)) if row.trim().eq_ignore_ascii_case(query.trim()) => {
                SubtypeMatch::Exact
            }
            (Some(_), _) => SubtypeMatch::Mismatch,
        }
    }

    /// Whether the row stays a candidate.
    pub fn accepts(self) -> bool {
        !matches!(self, SubtypeMatch::Mismatch)
    }
}

/// Item type → catalog category. Lookup is exact on the trimmed lowercase
/// type: this is a hard filter, and unrecognized types short-circuit the
/// whole constraint derivation before any rule fetch.
const ITEM_CATEGORIES: &[(&str, &str)] = &[
    ("sofa", "seating"),
    ("armchair", "seating"),
    ("recliner", "seating"),
    ("dining table", "tables"),
    ("coffee table", "tables"),
    ("study table", "tables"),
    ("tv unit", "storage"),
    ("wardrobe", "storage"),
    ("bookshelf", "storage"),
    ("shoe rack", "storage"),
    ("chest of drawers", "storage"),
    ("bed", "beds"),
    ("mattress", "beds"),
    ("curtains", "soft furnishing"),
    ("rug", "soft furnishing"),
    ("lamp", "lighting"),
    ("chandelier", "lighting"),
    ("wall art", "decor"),
    ("mirror", "decor"),
    ("planter", "decor"),
];

/// Resolve an item type to its catalog category, or `None` for types the
/// dictionary doesn't know.
pub fn item_category(item_type: &str) -> Option<&'static str> {
    let needle = item_type.trim().to_lowercase();
    ITEM_CATEGORIES
        .iter()
        .find(|(item, _)| *item == needle)
        .map(|(_, category)| *category)
}

/// Filter a rule table down to one room of one configuration.
///
/// Configuration is a substring match of `"{bhk} bhk"` against the row;
/// room type is an exact case-insensitive match; room subtype follows the
/// permissive [`SubtypeMatch`] rule, so generic rows are always candidates.
/// Source order is preserved.
pub(crate) fn filter_room_rules<'a>(
    rows: &'a [PropertyRuleRow],
    bhk: &str,
    room_type: &str,
    room_subtype: Option<&str>,
) -> Vec<&'a PropertyRuleRow> {
    let needle = format!("{} bhk", bhk.trim().to_lowercase());
    rows.iter()
        .filter(|row| row.configuration.to_lowercase().contains(&needle))
        .filter(|row| row.room_type.trim().eq_ignore_ascii_case(room_type.trim()))
        .filter(|row| SubtypeMatch::classify(row.room_subtype.as_deref(), room_subtype).accepts())
        .collect()
}

/// Narrow room rules to one item: exact category match, permissive
/// subcategory match, first row wins.
pub(crate) fn find_item_rule<'a>(
    room_rules: &[&'a PropertyRuleRow],
    item_category: &str,
    item_subcategory: Option<&str>,
) -> Option<&'a PropertyRuleRow> {
    room_rules
        .iter()
        .find(|row| {
            row.item_category
                .trim()
                .eq_ignore_ascii_case(item_category.trim())
                && SubtypeMatch::classify(row.item_subcategory.as_deref(), item_subcategory)
                    .accepts()
        })
        .copied()
}
