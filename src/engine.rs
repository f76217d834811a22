//! The rule-resolution engine.
//!
//! One `RuleEngine` instance owns the store handle, the clock, and every
//! dataset cache; all public resolvers are methods on it. Store failures
//! never escape: each resolver degrades to an empty/default result and a
//! warning, so callers cannot distinguish "no rule applies" from "the
//! store is down" — that is the contract, and callers fall back to their
//! own defaults either way.

use crate::cache::{Clock, SystemClock, TtlCell, TtlMap};
use crate::catalog;
use crate::error::StoreError;
use crate::property::{self, PropertyKind};
use crate::room;
use crate::rules::{self, Tier};
use crate::store::{CatalogItem, PropertyRuleRow, SelectQuery, SizingRule, Store, tables};
use ahash::AHashSet;
use futures::future::join3;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Columns read from the property rule tables.
const PROPERTY_RULE_COLUMNS: [&str; 14] = [
    "id",
    "configuration",
    "room_type",
    "room_subtype",
    "item_category",
    "item_subcategory",
    "min_quantity",
    "max_quantity",
    "recommended_quantity",
    "size_preference",
    "price_range_min_inr",
    "price_range_max_inr",
    "priority",
    "notes",
];

/// Columns read from the catalog table.
const CATALOG_COLUMNS: [&str; 10] = [
    "id",
    "category",
    "subcategory",
    "item_name",
    "item_description",
    "item_details",
    "keywords",
    "price_inr",
    "suggestive_areas",
    "preferred_theme",
];

/// Engine tuning. The defaults mirror production behavior; tests inject
/// short TTLs and a manual clock instead of sleeping.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// TTL for sizing and property rule tables.
    pub rules_ttl: Duration,
    /// TTL for catalog-driven datasets (categories, suggestions).
    pub catalog_ttl: Duration,
    /// Catalog rows sampled per suggestion refresh, cheapest first.
    pub catalog_sample_limit: usize,
    /// Maximum entries in a suggestion list.
    pub suggestion_cap: usize,
    /// Distinct suggestion queries kept warm at once.
    pub suggestion_cache_capacity: NonZeroUsize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_ttl: Duration::from_secs(10 * 60),
            catalog_ttl: Duration::from_secs(5 * 60),
            catalog_sample_limit: 200,
            suggestion_cap: 12,
            suggestion_cache_capacity: NonZeroUsize::new(64).unwrap(),
        }
    }
}

/// A room within a property configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRuleQuery {
    pub property_type: String,
    /// Bare BHK count ("2", "2.5").
    pub bhk: String,
    /// Canonical room type ("bedroom"); see [`crate::room::classify`].
    pub room_type: String,
    pub room_subtype: Option<String>,
}

/// A specific item within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRuleQuery {
    pub room: RoomRuleQuery,
    pub item_category: String,
    pub item_subcategory: Option<String>,
}

/// Free-text constraint derivation input: the room arrives as a label, the
/// item as a dictionary type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintQuery {
    pub property_type: String,
    pub bhk: String,
    pub room_name: String,
    pub item_type: String,
    pub item_subtype: Option<String>,
}

/// The rule-resolution and ranking service.
pub struct RuleEngine<S> {
    store: S,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    sizing_rules: TtlCell<Vec<SizingRule>>,
    size_pricing: TtlCell<Vec<SizingRule>>,
    apartment_rules: TtlCell<Vec<PropertyRuleRow>>,
    villa_rules: TtlCell<Vec<PropertyRuleRow>>,
    categories: TtlCell<Vec<String>>,
    subcategories: TtlCell<Vec<String>>,
    suggestions: TtlMap<Vec<String>>,
}

impl<S> std::fmt::Debug for RuleEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: Store> RuleEngine<S> {
    /// Engine with the system clock and default tuning.
    pub fn new(store: S) -> Self {
        Self::with_parts(store, Arc::new(SystemClock), EngineConfig::default())
    }

    /// Engine with custom tuning.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self::with_parts(store, Arc::new(SystemClock), config)
    }

    /// Fully injected constructor; tests pass a manual clock here.
    pub fn with_parts(store: S, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            store,
            sizing_rules: TtlCell::new("sizing rules", config.rules_ttl),
            size_pricing: TtlCell::new("size and pricing", config.rules_ttl),
            apartment_rules: TtlCell::new("apartment rules", config.rules_ttl),
            villa_rules: TtlCell::new("villa rules", config.rules_ttl),
            categories: TtlCell::new("categories", config.catalog_ttl),
            subcategories: TtlCell::new("subcategories", config.catalog_ttl),
            suggestions: TtlMap::new(
                "suggestions",
                config.catalog_ttl,
                config.suggestion_cache_capacity,
            ),
            clock,
            config,
        }
    }

    // -------------------------------------------------------------------
    // Cached dataset loaders
    // -------------------------------------------------------------------

    /// The loaded `rules` table (cached).
    pub async fn sizing_rules(&self) -> Vec<SizingRule> {
        self.sizing_rules
            .get_or_refresh(self.clock.as_ref(), || self.fetch_sizing_rules())
            .await
    }

    /// The loaded `size_and_pricing` table (cached).
    pub async fn size_pricing(&self) -> Vec<SizingRule> {
        self.size_pricing
            .get_or_refresh(self.clock.as_ref(), || self.fetch_size_pricing())
            .await
    }

    /// Distinct catalog categories, first-seen order (cached).
    pub async fn categories(&self) -> Vec<String> {
        self.categories
            .get_or_refresh(self.clock.as_ref(), || self.fetch_distinct("category"))
            .await
    }

    /// Distinct catalog subcategories, first-seen order (cached).
    pub async fn subcategories(&self) -> Vec<String> {
        self.subcategories
            .get_or_refresh(self.clock.as_ref(), || self.fetch_distinct("subcategory"))
            .await
    }

    async fn property_rules(&self, kind: PropertyKind) -> Vec<PropertyRuleRow> {
        let cell = match kind {
            PropertyKind::Apartment => &self.apartment_rules,
            PropertyKind::Villa => &self.villa_rules,
        };
        cell.get_or_refresh(self.clock.as_ref(), || self.fetch_property_rules(kind))
            .await
    }

    /// Pre-load the three rule tables with one concurrent join.
    pub async fn warm(&self) {
        let (_, _, _) = join3(
            self.size_pricing(),
            self.property_rules(PropertyKind::Apartment),
            self.property_rules(PropertyKind::Villa),
        )
        .await;
    }

    /// Drop every cached dataset; the next call per dataset refetches.
    pub async fn invalidate(&self) {
        self.sizing_rules.invalidate().await;
        self.size_pricing.invalidate().await;
        self.apartment_rules.invalidate().await;
        self.villa_rules.invalidate().await;
        self.categories.invalidate().await;
        self.subcategories.invalidate().await;
        self.suggestions.invalidate().await;
    }

    // -------------------------------------------------------------------
    // Resolvers
    // -------------------------------------------------------------------

    /// Best-matching sizing rule for a property type + configuration,
    /// optionally refined by area. See [`rules::resolve_sizing_rule`].
    pub async fn resolve_sizing_rule(
        &self,
        property_type: &str,
        configuration: &str,
        area: Option<f64>,
    ) -> Option<SizingRule> {
        let loaded = self.sizing_rules().await;
        rules::resolve_sizing_rule(&loaded, property_type, configuration, area).cloned()
    }

    /// Size/pricing rule for a property type + BHK count.
    pub async fn size_pricing_for(&self, property_type: &str, bhk: &str) -> Option<SizingRule> {
        let loaded = self.size_pricing().await;
        rules::size_pricing_for(&loaded, property_type, bhk).cloned()
    }

    /// Classify a total budget into a tier for the given property/BHK.
    /// Missing rule or missing budget defaults to [`Tier::Economy`].
    pub async fn budget_tier(
        &self,
        property_type: &str,
        bhk: &str,
        total_budget: Option<f64>,
    ) -> Tier {
        let rule = self.size_pricing_for(property_type, bhk).await;
        rules::budget_tier(rule.as_ref(), total_budget)
    }

    /// All rule rows applying to one room of one configuration, source
    /// order preserved. Generic (wildcard-subtype) rows are included for
    /// subtyped queries.
    pub async fn rules_for_room(&self, query: &RoomRuleQuery) -> Vec<PropertyRuleRow> {
        let kind = PropertyKind::from_property_type(&query.property_type);
        let rows = self.property_rules(kind).await;
        property::filter_room_rules(
            &rows,
            &query.bhk,
            &query.room_type,
            query.room_subtype.as_deref(),
        )
        .into_iter()
        .cloned()
        .collect()
    }

    /// The first rule row constraining one item in one room, or `None`
    /// when no row applies.
    pub async fn rule_for_item(&self, query: &ItemRuleQuery) -> Option<PropertyRuleRow> {
        let kind = PropertyKind::from_property_type(&query.room.property_type);
        let rows = self.property_rules(kind).await;
        let room_rules = property::filter_room_rules(
            &rows,
            &query.room.bhk,
            &query.room.room_type,
            query.room.room_subtype.as_deref(),
        );
        property::find_item_rule(
            &room_rules,
            &query.item_category,
            query.item_subcategory.as_deref(),
        )
        .cloned()
    }

    /// Derive item constraints from free-text inputs: classify the room
    /// label, map the item type through the category dictionary, then look
    /// up the rule. An unmapped item type returns `None` before any fetch;
    /// `None` overall means "no constraint data — use defaults".
    pub async fn derive_item_constraints(
        &self,
        query: &ConstraintQuery,
    ) -> Option<PropertyRuleRow> {
        let class = room::classify(&query.room_name)?;
        let category = property::item_category(&query.item_type)?;

        let item_query = ItemRuleQuery {
            room: RoomRuleQuery {
                property_type: query.property_type.clone(),
                bhk: query.bhk.clone(),
                room_type: class.kind.as_str().to_owned(),
                room_subtype: class.subtype,
            },
            item_category: category.to_owned(),
            item_subcategory: query.item_subtype.clone(),
        };
        self.rule_for_item(&item_query).await
    }

    /// Ranked category suggestions for a room under a style bias, capped
    /// per config. Cached per (room, sorted bias) key.
    pub async fn room_scoped_suggestions(
        &self,
        room: &str,
        style_bias: &[String],
    ) -> Vec<String> {
        let key = catalog::suggestion_cache_key(room, style_bias);
        let room_key = room::classify(room)
            .map(|class| class.kind.as_str().to_owned())
            .unwrap_or_default();

        self.suggestions
            .get_or_refresh(self.clock.as_ref(), &key, || async {
                let items = self.fetch_catalog_sample().await?;
                Ok::<_, StoreError>(catalog::rank_suggestions(
                    &items,
                    &room_key,
                    style_bias,
                    self.config.suggestion_cap,
                ))
            })
            .await
    }

    // -------------------------------------------------------------------
    // Store fetches
    // -------------------------------------------------------------------

    async fn fetch_sizing_rules(&self) -> Result<Vec<SizingRule>, StoreError> {
        let rows = self
            .store
            .select(
                SelectQuery::from_table(tables::RULES)
                    .columns([
                        "id",
                        "property_type",
                        "configuration",
                        "other_variant_names",
                        "carpet_area_range_sqft",
                        "built_up_area_range_sqft",
                        "budget_range_economy_inr",
                        "budget_range_premium_inr",
                        "budget_range_luxury_inr",
                    ])
                    .eq("active", true),
            )
            .await?;
        Ok(rows.iter().map(SizingRule::from_rules_row).collect())
    }

    async fn fetch_size_pricing(&self) -> Result<Vec<SizingRule>, StoreError> {
        let rows = self
            .store
            .select(
                SelectQuery::from_table(tables::SIZE_AND_PRICING)
                    .columns([
                        "id",
                        "property_type",
                        "configuration",
                        "other_variant_names",
                        "carpet_area_range_sqft",
                        "built_up_area_range_sqft",
                        "budget_premium_min_inr",
                        "budget_luxury_min_inr",
                    ])
                    .eq("active", true),
            )
            .await?;
        Ok(rows.iter().map(SizingRule::from_size_pricing_row).collect())
    }

    async fn fetch_property_rules(
        &self,
        kind: PropertyKind,
    ) -> Result<Vec<PropertyRuleRow>, StoreError> {
        let table = match kind {
            PropertyKind::Apartment => tables::RULES_FOR_APARTMENT,
            PropertyKind::Villa => tables::RULES_FOR_VILLA,
        };
        let rows = self
            .store
            .select(
                SelectQuery::from_table(table)
                    .columns(PROPERTY_RULE_COLUMNS)
                    .eq("active", true),
            )
            .await?;
        Ok(rows.iter().map(PropertyRuleRow::from_row).collect())
    }

    async fn fetch_catalog_sample(&self) -> Result<Vec<CatalogItem>, StoreError> {
        let rows = self
            .store
            .select(
                SelectQuery::from_table(tables::INTERIOR_ITEMS)
                    .columns(CATALOG_COLUMNS)
                    .order("price_inr", true)
                    .limit(self.config.catalog_sample_limit),
            )
            .await?;
        Ok(rows.iter().map(CatalogItem::from_row).collect())
    }

    /// Distinct non-empty values of one catalog column, first-seen order,
    /// case-insensitive dedup keeping the first spelling.
    async fn fetch_distinct(&self, column: &'static str) -> Result<Vec<String>, StoreError> {
        let rows = self
            .store
            .select(SelectQuery::from_table(tables::INTERIOR_ITEMS).columns([column]))
            .await?;

        let mut seen = AHashSet::new();
        let mut values = Vec::new();
        for row in &rows {
            let value = crate::store::row::text(row, column);
            if value.is_empty() {
                continue;
            }
            if seen.insert(value.to_lowercase()) {
                values.push(value);
            }
        }
        Ok(values)
    }
}
