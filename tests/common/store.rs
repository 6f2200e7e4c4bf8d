/*
 * Copyright 2019-2021 Wren Powell
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

use std::ops::{Deref, DerefMut};
use std::path::Path;

use rstest::*;
use tempfile::TempDir;

#[cfg(feature = "store-directory")]
use wiki_store::store::{DirectoryConfig, DirectoryStore};
use wiki_store::store::{DataStore, MemoryConfig, MemoryStore, OpenStore};
#[cfg(feature = "store-redis")]
use wiki_store::store::{RedisConfig, RedisStore};
#[cfg(feature = "store-s3")]
use wiki_store::store::{S3Config, S3Credentials, S3Region, S3Store};
#[cfg(feature = "store-sqlite")]
use wiki_store::store::{SqliteConfig, SqliteStore};

/// The container opened by the store fixtures.
pub const TEST_CONTAINER: &str = "test-container";

/// Remove all blobs in the given `store`.
pub fn truncate_store(store: &mut impl DataStore) -> anyhow::Result<()> {
    for key in store.list_blobs("")? {
        store.remove_blob(&key)?;
    }
    Ok(())
}

/// A value which is tied to the lifetime of a temporary directory.
pub struct WithTempDir<T> {
    directory: TempDir,
    value: T,
}

impl<T> WithTempDir<T> {
    pub fn new(directory: TempDir, value: T) -> Self {
        WithTempDir { directory, value }
    }

    /// The path of the temporary directory.
    pub fn path(&self) -> &Path {
        self.directory.path()
    }
}

impl<T> Deref for WithTempDir<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for WithTempDir<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

#[fixture]
pub fn memory_store() -> MemoryStore {
    MemoryConfig::new().open(TEST_CONTAINER).unwrap()
}

#[cfg(feature = "store-directory")]
#[fixture]
pub fn directory_store() -> WithTempDir<DirectoryStore> {
    let directory = tempfile::tempdir().unwrap();
    let config = DirectoryConfig {
        path: directory.as_ref().join("store"),
    };
    let mut store = config.open(TEST_CONTAINER).unwrap();
    truncate_store(&mut store).unwrap();
    WithTempDir::new(directory, store)
}

#[cfg(feature = "store-sqlite")]
#[fixture]
pub fn sqlite_store() -> WithTempDir<SqliteStore> {
    let directory = tempfile::tempdir().unwrap();
    let config = SqliteConfig {
        path: directory.as_ref().join("store.db"),
    };
    let mut store = config.open(TEST_CONTAINER).unwrap();
    truncate_store(&mut store).unwrap();
    WithTempDir::new(directory, store)
}

#[cfg(feature = "store-redis")]
#[fixture]
pub fn redis_store() -> RedisStore {
    let url = dotenv::var("REDIS_URL").unwrap();
    let config = RedisConfig::from_url(&url).unwrap();
    let mut store = config.open(TEST_CONTAINER).unwrap();
    truncate_store(&mut store).unwrap();
    store
}

#[cfg(feature = "store-s3")]
#[fixture]
pub fn s3_store() -> S3Store {
    let config = S3Config {
        region: S3Region::from_name(&dotenv::var("S3_REGION").unwrap()).unwrap(),
        credentials: S3Credentials::Basic {
            access_key: dotenv::var("S3_ACCESS_KEY").unwrap(),
            secret_key: dotenv::var("S3_SECRET_KEY").unwrap(),
        },
        path_style: false,
    };
    let mut store = config.open(&dotenv::var("S3_BUCKET").unwrap()).unwrap();
    truncate_store(&mut store).unwrap();
    store
}
