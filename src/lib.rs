pub mod cache;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod property;
pub mod range;
pub mod room;
pub mod rules;
pub mod store;
pub mod synonyms;
pub mod tracing;

pub use engine::{ConstraintQuery, EngineConfig, ItemRuleQuery, RoomRuleQuery, RuleEngine};
pub use error::StoreError;
pub use range::{NumericRange, parse_range};
pub use room::{RoomClass, RoomKind, classify};
pub use rules::Tier;
pub use store::{CatalogItem, PropertyRuleRow, SizingRule, Store};
pub use synonyms::{ExpandedQuery, expand_keywords, expand_query, synonyms};
