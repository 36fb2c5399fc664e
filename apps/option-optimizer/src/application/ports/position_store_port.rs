//! Position Store Port (Driven Port)
//!
//! Interface for persisting the operations of a chosen strategy.

use async_trait::async_trait;

use crate::options::Operation;

/// Position store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionStoreError {
    /// Storage backend failure.
    #[error("Position store error: {message}")]
    StorageError {
        /// Error details.
        message: String,
    },

    /// Position not found.
    #[error("Position not found: {position}")]
    NotFound {
        /// The unknown position name.
        position: String,
    },
}

/// Port for recording positions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionStorePort: Send + Sync {
    /// Append `operations` to the named position.
    async fn record_operations(
        &self,
        position: &str,
        operations: &[Operation],
    ) -> Result<(), PositionStoreError>;

    /// Operations recorded under the named position, in insertion order.
    async fn operations(&self, position: &str) -> Result<Vec<Operation>, PositionStoreError>;
}
