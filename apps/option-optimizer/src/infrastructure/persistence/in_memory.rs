//! In-memory position store for testing.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{PositionStoreError, PositionStorePort};
use crate::options::Operation;

/// In-memory implementation of `PositionStorePort`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryPositionStore {
    positions: RwLock<HashMap<String, Vec<Operation>>>,
}

impl InMemoryPositionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of positions in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all positions from the store.
    pub fn clear(&self) {
        self.positions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl PositionStorePort for InMemoryPositionStore {
    async fn record_operations(
        &self,
        position: &str,
        operations: &[Operation],
    ) -> Result<(), PositionStoreError> {
        let mut positions = self.positions.write().unwrap_or_else(PoisonError::into_inner);
        positions
            .entry(position.to_string())
            .or_default()
            .extend_from_slice(operations);
        Ok(())
    }

    async fn operations(&self, position: &str) -> Result<Vec<Operation>, PositionStoreError> {
        let positions = self.positions.read().unwrap_or_else(PoisonError::into_inner);
        positions
            .get(position)
            .cloned()
            .ok_or_else(|| PositionStoreError::NotFound {
                position: position.to_string(),
            })
    }
}
