//! Sizing-rule resolution and budget tier classification.
//!
//! Pure matching logic over loaded [`SizingRule`] rows; fetching and
//! caching live in the engine. Configuration matching is deliberately
//! substring-based — rule rows carry free-text configurations ("2 BHK
//! Compact", "2 BHK") and imports are not normalized — and the first match
//! by source order wins when several rows qualify.

use crate::store::SizingRule;
use serde::{Deserialize, Serialize};

/// Budget classification bucket, ordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Economy,
    Premium,
    Luxury,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Economy => "economy",
            Tier::Premium => "premium",
            Tier::Luxury => "luxury",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case-insensitive substring match of `needle` against a rule's
/// configuration or any of its other recorded names.
pub(crate) fn configuration_matches(rule: &SizingRule, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    rule.configuration.to_lowercase().contains(&needle)
        || rule
            .other_names
            .iter()
            .any(|name| name.to_lowercase().contains(&needle))
}

/// True when the rule records an area range containing `area`. Carpet area
/// is authoritative; built-up area is consulted only when no carpet range
/// is recorded. A rule with neither range never area-matches.
fn area_matches(rule: &SizingRule, area: f64) -> bool {
    if !rule.carpet.is_open() {
        rule.carpet.contains(area)
    } else if !rule.built_up.is_open() {
        rule.built_up.contains(area)
    } else {
        false
    }
}

/// Resolve the best-matching sizing rule for a property type +
/// configuration, optionally refined by area.
///
/// Filters by case-insensitive exact property-type match and substring
/// configuration match (configuration or other names). When `area` is
/// supplied, the first candidate whose recorded range contains it is
/// preferred; if none contains it, the first configuration match still wins
/// rather than failing.
pub fn resolve_sizing_rule<'a>(
    rules: &'a [SizingRule],
    property_type: &str,
    configuration: &str,
    area: Option<f64>,
) -> Option<&'a SizingRule> {
    let property_type = property_type.trim().to_lowercase();
    let matched: Vec<&SizingRule> = rules
        .iter()
        .filter(|rule| {
            rule.property_type.trim().to_lowercase() == property_type
                && configuration_matches(rule, configuration)
        })
        .collect();

    if let Some(area) = area
        && let Some(rule) = matched.iter().find(|rule| area_matches(rule, area))
    {
        return Some(rule);
    }

    matched.first().copied()
}

/// Resolve the size/pricing rule for a property type + BHK count.
///
/// `bhk` is the bare count ("2", "2.5"); the match is a case-insensitive
/// substring test of `"{bhk} bhk"` against the row configuration, first
/// match by source order.
pub fn size_pricing_for<'a>(
    rules: &'a [SizingRule],
    property_type: &str,
    bhk: &str,
) -> Option<&'a SizingRule> {
    let property_type = property_type.trim().to_lowercase();
    let needle = format!("{} bhk", bhk.trim().to_lowercase());
    rules.iter().find(|rule| {
        rule.property_type.trim().to_lowercase() == property_type
            && rule.configuration.to_lowercase().contains(&needle)
    })
}

/// Classify a total budget against a rule's tier bands.
///
/// Missing rule or missing budget defaults to economy. Thresholds are
/// checked high-to-low: a budget clearing the luxury floor is luxury,
/// regardless of also clearing the premium floor.
pub fn budget_tier(rule: Option<&SizingRule>, total_budget: Option<f64>) -> Tier {
    let (Some(rule), Some(budget)) = (rule, total_budget) else {
        return Tier::Economy;
    };

    if rule.budget.luxury.clears_min(budget) {
        Tier::Luxury
    } else if rule.budget.premium.clears_min(budget) {
        Tier::Premium
    } else {
        Tier::Economy
    }
}
