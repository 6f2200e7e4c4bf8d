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

use std::io;
use std::result;

use thiserror::Error as DeriveError;

/// The error type for operations with a wiki backend.
///
/// The variants which carry a `String` display exactly that message, which is meant to be shown
/// to the user as-is.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// A page, history entry, user, or admin was not found.
    #[error("{0}")]
    NotFound(String),

    /// A user, admin, or page with the given name already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// The provided password does not match the stored credentials.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The given name cannot be used as the name of a page.
    #[error("The name {0:?} cannot be used as a page name.")]
    InvalidName(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A record in the data store could not be decoded.
    #[error("A stored record is corrupt.")]
    Corrupt,

    /// The data store is an unsupported format.
    #[error("The data store is an unsupported format.")]
    UnsupportedStore,

    /// An error occurred with the data store.
    #[error("{0}")]
    Store(#[from] anyhow::Error),

    /// An I/O error occurred.
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// The result type for operations with a wiki backend.
pub type Result<T> = result::Result<T, Error>;
