// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::flow::state::Values;
use crate::kit::error::Result;
use crate::kit::store::ValueStore;

#[derive(Clone, Default)]
pub struct MemoryValueStore {
    entries: Arc<RwLock<HashMap<String, Values>>>,
}

impl MemoryValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ValueStore for MemoryValueStore {
    async fn get(&self, key: &str) -> Result<Option<Values>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, values: &Values) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), values.clone());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
