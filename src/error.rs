//! Error handling types and utilities.

use thiserror::Error;

/// A specialized Result type for interior-rules operations.
///
/// This is an alias for `anyhow::Result`. The public engine surface never
/// returns it — resolvers degrade to empty/default results by design — but
/// store adapters and internal plumbing use it with `.context()` where a
/// cause chain is worth keeping.
pub type Result<T> = anyhow::Result<T>;

/// Error returned by the external data store boundary.
///
/// This is the entire failure taxonomy of the core: everything past the
/// store boundary is coerced (missing fields) or degraded (empty results)
/// instead of propagated.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store call itself failed: network error, timeout in the store's
    /// own client, authentication failure. The cause is whatever the
    /// adapter wrapped.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    /// The store answered with something that is not a row set. Individual
    /// rows missing fields do NOT produce this — those are coerced field by
    /// field in `store::row`.
    #[error("malformed response from store: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Wrap an arbitrary adapter failure as an unavailability error.
    pub fn unavailable<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unavailable(anyhow::Error::new(cause))
    }
}
