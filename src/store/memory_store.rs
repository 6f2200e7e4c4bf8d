/*
 * Copyright 2019-2020 Wren Powell
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;

use super::data_store::DataStore;
use super::open_store::OpenStore;

type Blobs = HashMap<String, Vec<u8>>;

/// The configuration for opening a [`MemoryStore`].
///
/// Every container opened through the same `MemoryConfig` (or a clone of it) shares its data, so
/// a config can be used to open a container, drop it, and open it again with its contents intact.
///
/// [`MemoryStore`]: crate::store::MemoryStore
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    containers: Arc<Mutex<HashMap<String, Arc<Mutex<Blobs>>>>>,
}

impl MemoryConfig {
    /// Create a new `MemoryConfig` with no containers.
    pub fn new() -> Self {
        Self::default()
    }
}

impl OpenStore for MemoryConfig {
    type Store = MemoryStore;

    fn open(&self, container: &str) -> crate::Result<Self::Store> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|_| crate::Error::Store(anyhow!("The memory store lock is poisoned.")))?;
        let blobs = containers
            .entry(container.to_owned())
            .or_insert_with(Default::default);
        Ok(MemoryStore {
            blobs: Arc::clone(blobs),
        })
    }
}

/// A `DataStore` which stores data in memory.
///
/// Unlike other `DataStore` implementations, data in a `MemoryStore` is not stored persistently
/// and is only accessible to the current process. This data store is useful for testing.
///
/// You can use [`MemoryConfig`] to open a data store of this type.
///
/// [`MemoryConfig`]: crate::store::MemoryConfig
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<Blobs>>,
}

impl MemoryStore {
    /// Create a new empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> anyhow::Result<MutexGuard<'_, Blobs>> {
        self.blobs
            .lock()
            .map_err(|_| anyhow!("The memory store lock is poisoned."))
    }
}

impl DataStore for MemoryStore {
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        self.blobs()?.insert(key.to_owned(), data.to_owned());
        Ok(())
    }

    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blobs()?.get(key).cloned())
    }

    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        Ok(self.blobs()?.contains_key(key))
    }

    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()> {
        self.blobs()?.remove(key);
        Ok(())
    }

    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .blobs()?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
