/*
 * Copyright 2019-2020 Garrett Powell
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

//! `wiki-store` is the storage backend of a wiki: credentials, pages, images, and page history.
//!
//! This crate stores everything in blob containers, like buckets in an object storage service.
//! It builds the following on top of them:
//! - A credential store where users sign up and sign in, plus a separate store for admins.
//! - A content store which maps page and image names to their bytes.
//! - A versioning engine which keeps every replaced version of a page as an immutable history
//! entry, and which can list, read, and restore those versions.
//!
//! A container is represented by a `DataStore`, which is a small trait that can be implemented to
//! create new storage backends. The following data stores are provided out of the box:
//! - `DirectoryStore` stores data in a directory in the local file system.
//! - `SqliteStore` stores data in a SQLite database.
//! - `RedisStore` stores data on a Redis server.
//! - `S3Store` stores data in Amazon S3 or a compatible service.
//! - `MemoryStore` stores data in memory.
//!
//! The function `init` initializes the password hashing library. It is called automatically when
//! needed, but can be called up front.
//!
//! # Examples
//! ```
//! use wiki_store::store::MemoryConfig;
//! use wiki_store::wiki::{Backend, PasswordScheme, WikiConfig};
//! use wiki_store::init;
//!
//! fn main() -> wiki_store::Result<()> {
//!     init();
//!
//!     // Open the default containers in memory.
//!     let config = WikiConfig::default().password_scheme(PasswordScheme::LegacySha256);
//!     let mut backend = Backend::open(&config, &MemoryConfig::new())?;
//!
//!     let principal = backend.sign_up("alice", "hunter2")?;
//!     assert_eq!(principal.id(), "alice");
//!
//!     // Saving a page twice keeps the first version in its history.
//!     backend.save_page("Home", b"Welcome", "alice")?;
//!     backend.save_page("Home", b"Welcome to the wiki", "alice")?;
//!
//!     assert_eq!(backend.get_page("Home")?, b"Welcome to the wiki");
//!     assert_eq!(backend.list_history("Home")?.len(), 1);
//!
//!     // Restore the first version.
//!     assert!(backend.revert_to_previous("Home", "alice")?);
//!     assert_eq!(backend.get_page("Home")?, b"Welcome");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//! Some functionality is gated behind cargo features:
//!
//! Type | Cargo Feature
//! --- | ---
//! `DirectoryStore` | `store-directory`
//! `SqliteStore` | `store-sqlite`
//! `RedisStore` | `store-redis`
//! `S3Store` | `store-s3`
//!
//! To use one of these types, you must enable the corresponding feature in your `Cargo.toml`.

pub use env::init;
pub use error::{Error, Result};

mod env;
mod error;
pub mod store;
pub mod wiki;
