//! External data-store boundary.
//!
//! The engine's only collaborator is a remote, queryable data store. This
//! module owns that seam: the [`Store`] trait a client adapter implements,
//! the [`SelectQuery`] the engine builds against it, and (in [`row`]) the
//! coercion layer that turns whatever the store returns into typed records.
//!
//! The core is strictly read-only against the store and depends on its
//! schema without owning it; the table and column names below are that
//! contract, spelled out.

pub mod row;

use crate::error::StoreError;
use serde_json::{Map, Value};

pub use row::{BudgetBands, CatalogItem, PropertyRuleRow, SizingRule};

/// A raw store row: one JSON object.
pub type Row = Map<String, Value>;

/// Tables this core reads.
pub mod tables {
    pub const INTERIOR_ITEMS: &str = "interior_items";
    pub const RULES: &str = "rules";
    pub const SIZE_AND_PRICING: &str = "size_and_pricing";
    pub const RULES_FOR_APARTMENT: &str = "rules_for_apartment";
    pub const RULES_FOR_VILLA: &str = "rules_for_villa";
}

/// An equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct EqFilter {
    pub column: String,
    pub value: Value,
}

/// Result ordering on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A read-only table query.
///
/// Built with consuming builder methods, mirroring the query surface the
/// remote store's own client exposes:
///
/// ```
/// use interior_rules::store::{SelectQuery, tables};
///
/// let query = SelectQuery::from_table(tables::INTERIOR_ITEMS)
///     .columns(["category", "subcategory", "price_inr"])
///     .eq("active", true)
///     .order("price_inr", true)
///     .limit(200);
/// assert_eq!(query.limit, Some(200));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    /// Columns to project; empty means all. The engine always names the
    /// columns it consumes so schema drift surfaces at the adapter.
    pub columns: Vec<String>,
    pub filters: Vec<EqFilter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(EqFilter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The data-store client seam.
///
/// Adapters wrap whatever transport the deployment uses; the engine only
/// ever issues reads through this trait and treats every failure as a
/// degradable [`StoreError`].
pub trait Store: Send + Sync {
    fn select(
        &self,
        query: SelectQuery,
    ) -> impl Future<Output = Result<Vec<Row>, StoreError>> + Send;
}
