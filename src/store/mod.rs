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

//! Low-level backends for blob storage.
//!
//! This module provides low-level storage backends called data stores. A data store is a single
//! container of named blobs, like a bucket in an object storage service. It provides only
//! whole-blob reads and writes, existence checks, removal, and prefix listing. Everything else,
//! including history and credentials, is built on top of it in [`crate::wiki`].
//!
//! All data stores implement the [`DataStore`] trait.
//!
//! For each data store, there is a corresponding type which provides the necessary configuration to
//! open the containers of that backend. These config types implement [`OpenStore`] and are
//! typically passed to [`Backend::open`].
//!
//! [`DataStore`]: crate::store::DataStore
//! [`OpenStore`]: crate::store::OpenStore
//! [`Backend::open`]: crate::wiki::Backend::open

pub use self::data_store::DataStore;
#[cfg(feature = "store-directory")]
pub use self::directory_store::{DirectoryConfig, DirectoryStore};
pub use self::memory_store::{MemoryConfig, MemoryStore};
pub use self::open_store::OpenStore;
#[cfg(feature = "store-redis")]
pub use self::redis_store::{RedisAddr, RedisConfig, RedisStore};
#[cfg(feature = "store-s3")]
pub use self::s3_store::{S3Config, S3Credentials, S3Region, S3Store};
#[cfg(feature = "store-sqlite")]
pub use self::sqlite_store::{SqliteConfig, SqliteStore};

mod data_store;
mod directory_store;
mod memory_store;
mod open_store;
mod redis_store;
mod s3_store;
mod sqlite_store;
