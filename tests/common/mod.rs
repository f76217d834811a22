//! Shared fixtures: an in-memory store, a manual clock, and seeded tables.

use interior_rules::cache::Clock;
use interior_rules::error::StoreError;
use interior_rules::store::{Row, SelectQuery, Store, tables};
use interior_rules::{EngineConfig, RuleEngine};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// In-memory [`Store`] with per-table rows, a select counter, and a
/// failure toggle for degraded-path tests. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    selects: AtomicUsize,
    failing: AtomicBool,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with JSON object rows.
    pub fn insert(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.inner.tables.lock().unwrap();
        let entry = tables.entry(table.to_owned()).or_default();
        for row in rows {
            match row {
                Value::Object(map) => entry.push(map),
                other => panic!("seed rows must be objects, got {other:?}"),
            }
        }
    }

    /// Make every subsequent select fail (or recover).
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of selects served (failed attempts included).
    pub fn select_count(&self) -> usize {
        self.inner.selects.load(Ordering::SeqCst)
    }
}

impl Store for MemoryStore {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Row>, StoreError> {
        self.inner.selects.fetch_add(1, Ordering::SeqCst);

        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow::anyhow!(
                "injected store failure"
            )));
        }

        let tables = self.inner.tables.lock().unwrap();
        let mut rows: Vec<Row> = tables.get(&query.table).cloned().unwrap_or_default();

        for filter in &query.filters {
            rows.retain(|row| row.get(&filter.column) == Some(&filter.value));
        }

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.column).and_then(Value::as_f64);
                let b = b.get(&order.column).and_then(Value::as_f64);
                let ordering = match (a, b) {
                    (Some(a), Some(b)) => a.total_cmp(&b),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                if order.ascending { ordering } else { ordering.reverse() }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        if !query.columns.is_empty() {
            rows = rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .filter(|(key, _)| query.columns.iter().any(|c| c == key))
                        .collect()
                })
                .collect();
        }

        Ok(rows)
    }
}

/// Manual clock: a fixed origin plus an offset advanced by tests.
#[derive(Clone)]
pub struct ManualClock {
    inner: Arc<ClockInner>,
}

struct ClockInner {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ClockInner {
                origin: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.inner.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.origin + *self.inner.offset.lock().unwrap()
    }
}

/// A store seeded with the full fixture dataset.
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    // Inactive row first: only the active filter keeps it out of results.
    store.insert(
        tables::SIZE_AND_PRICING,
        vec![
            json!({
                "id": "sp0", "property_type": "apartment", "configuration": "2 BHK",
                "budget_premium_min_inr": 1, "budget_luxury_min_inr": 2, "active": false,
            }),
            json!({
                "id": "sp1", "property_type": "apartment", "configuration": "2 BHK",
                "carpet_area_range_sqft": "600-850",
                "budget_premium_min_inr": 1_200_000, "budget_luxury_min_inr": 3_000_000,
                "active": true,
            }),
            json!({
                "id": "sp2", "property_type": "apartment", "configuration": "3 BHK",
                "carpet_area_range_sqft": "850-1200",
                "budget_premium_min_inr": 1_800_000, "budget_luxury_min_inr": 4_500_000,
                "active": true,
            }),
            json!({
                "id": "sp3", "property_type": "villa", "configuration": "4 BHK",
                "carpet_area_range_sqft": "1800-2600",
                "budget_premium_min_inr": 5_000_000, "budget_luxury_min_inr": 12_000_000,
                "active": true,
            }),
        ],
    );

    store.insert(
        tables::RULES,
        vec![
            json!({
                "id": "r1", "property_type": "apartment", "configuration": "2 BHK",
                "other_variant_names": "2BHK, Two BHK",
                "carpet_area_range_sqft": "600-850",
                "built_up_area_range_sqft": "750-1,000",
                "budget_range_economy_inr": "400,000-1,200,000",
                "budget_range_premium_inr": "1,200,000-3,000,000",
                "budget_range_luxury_inr": "3,000,000-9,000,000",
                "active": true,
            }),
            json!({
                "id": "r2", "property_type": "apartment", "configuration": "2 BHK Premium Tower",
                "carpet_area_range_sqft": "850-1100",
                "active": true,
            }),
            json!({
                "id": "r3", "property_type": "villa", "configuration": "4 BHK",
                "carpet_area_range_sqft": "1800-2600",
                "active": true,
            }),
        ],
    );

    store.insert(
        tables::RULES_FOR_APARTMENT,
        vec![
            json!({
                "id": "a1", "configuration": "2 BHK", "room_type": "bedroom",
                "room_subtype": "master", "item_category": "beds", "item_subcategory": "king",
                "min_quantity": 1, "max_quantity": 1, "recommended_quantity": 1,
                "size_preference": "king",
                "price_range_min_inr": 45_000, "price_range_max_inr": 120_000,
                "priority": 10, "active": true,
            }),
            json!({
                "id": "a2", "configuration": "2 BHK", "room_type": "bedroom",
                "item_category": "beds",
                "min_quantity": 1, "max_quantity": 1, "recommended_quantity": 1,
                "price_range_min_inr": 25_000, "price_range_max_inr": 80_000,
                "priority": 20, "active": true,
            }),
            json!({
                "id": "a3", "configuration": "2 BHK", "room_type": "bedroom",
                "item_category": "storage", "item_subcategory": "wardrobe",
                "min_quantity": 1, "max_quantity": 2, "recommended_quantity": 1,
                "priority": 30, "notes": "sliding doors preferred", "active": true,
            }),
            json!({
                "id": "a4", "configuration": "2 BHK", "room_type": "living",
                "item_category": "seating",
                "min_quantity": 1, "max_quantity": 2, "recommended_quantity": 1,
                "priority": 10, "active": true,
            }),
            json!({
                "id": "a5", "configuration": "3 BHK", "room_type": "living",
                "item_category": "seating",
                "min_quantity": 2, "max_quantity": 3, "recommended_quantity": 2,
                "priority": 10, "active": true,
            }),
            json!({
                "id": "a6", "configuration": "2 BHK", "room_type": "living",
                "item_category": "lighting", "active": false,
            }),
        ],
    );

    store.insert(
        tables::RULES_FOR_VILLA,
        vec![json!({
            "id": "v1", "configuration": "4 BHK", "room_type": "living",
            "item_category": "seating",
            "min_quantity": 2, "max_quantity": 4, "recommended_quantity": 3,
            "priority": 10, "active": true,
        })],
    );

    store.insert(
        tables::INTERIOR_ITEMS,
        vec![
            json!({
                "id": "i1", "item_name": "Jute Rug", "category": "soft furnishing",
                "subcategory": "rugs", "item_description": "Hand-woven boho jute weave",
                "keywords": ["boho", "natural"], "price_inr": 6_000,
            }),
            json!({
                "id": "i2", "item_name": "Brass Floor Lamp", "category": "lighting",
                "subcategory": "floor lamps", "item_description": "Industrial brass stem",
                "keywords": ["industrial"], "price_inr": 8_000,
            }),
            json!({
                "id": "i3", "item_name": "Rattan Accent Chair", "category": "seating",
                "subcategory": "accent chairs", "item_description": "Boho rattan weave",
                "keywords": ["boho"], "price_inr": 12_000,
            }),
            json!({
                "id": "i4", "item_name": "Pine Bookshelf", "category": "storage",
                "subcategory": "bookshelves", "item_description": "Scandinavian pine shelving",
                "keywords": ["minimal"], "price_inr": 18_000,
            }),
            json!({
                "id": "i5", "item_name": "Teak TV Unit", "category": "storage",
                "subcategory": "tv units", "item_description": "Mid-century teak console",
                "keywords": ["mid-century"], "price_inr": 30_000,
            }),
            json!({
                "id": "i6", "item_name": "Fjord Sofa", "category": "seating",
                "subcategory": "sofas", "item_description": "Three-seater, Scandinavian oak frame",
                "keywords": ["minimal", "nordic"], "price_inr": 55_000,
            }),
            json!({
                "id": "i7", "item_name": "Marble Dining Table", "category": "tables",
                "subcategory": "dining tables", "item_description": "Modern marble top",
                "keywords": ["modern"], "price_inr": 70_000,
            }),
            json!({
                "id": "i8", "item_name": "Velvet Sofa", "category": "seating",
                "subcategory": "sofas", "item_description": "Plush velvet three-seater",
                "keywords": ["luxury"], "price_inr": 95_000,
            }),
        ],
    );

    store
}

/// Engine over a store with an injected manual clock and default tuning.
#[allow(dead_code)] // Used in engine_test.rs
pub fn engine_with_clock(store: MemoryStore, clock: &ManualClock) -> RuleEngine<MemoryStore> {
    interior_rules::tracing::init();
    RuleEngine::with_parts(store, Arc::new(clock.clone()), EngineConfig::default())
}

/// Engine over the seeded fixture store.
pub fn seeded_engine() -> (RuleEngine<MemoryStore>, MemoryStore, ManualClock) {
    interior_rules::tracing::init();
    let store = seeded_store();
    let clock = ManualClock::new();
    let engine = engine_with_clock(store.clone(), &clock);
    (engine, store, clock)
}
