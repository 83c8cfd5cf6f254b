// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::flow::state::Values;
use crate::kit::error::Result;
use crate::kit::store::ValueStore;

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileValueStore {
    dir: PathBuf,
}

impl FileValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl ValueStore for FileValueStore {
    async fn get(&self, key: &str) -> Result<Option<Values>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, values: &Values) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string(values)?;
        fs::write(self.path_for(key), content).await?;
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
