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

#![cfg(feature = "store-redis")]

use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;

use redis::{
    Client, Commands, Connection, ConnectionAddr, ConnectionInfo, IntoConnectionInfo,
    RedisConnectionInfo,
};
use tracing::debug;

use super::data_store::DataStore;
use super::open_store::OpenStore;

/// A UUID which acts as the version ID of the store format.
const CURRENT_VERSION: &str = "8a41d0f2-6d1b-11ee-b3e7-5f02c9a4e1b8";

const STORE_VERSION_KEY: &str = "version";

/// Escape the characters which have a special meaning in a Redis glob pattern.
fn escape_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '*' | '?' | '[' | ']' | '^' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

/// The address for a Redis connection.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-redis")))]
pub enum RedisAddr {
    /// A hostname and port.
    Tcp(String, u16),

    /// The path of a Unix socket.
    Unix(PathBuf),
}

/// The configuration for opening a [`RedisStore`].
///
/// Each container is a namespace of keys on the same server, so the blob `key` in the container
/// `container` is stored under the Redis key `container:key`.
///
/// [`RedisStore`]: crate::store::RedisStore
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-redis")))]
pub struct RedisConfig {
    /// The address to connect to.
    pub addr: RedisAddr,

    /// The database number to use. This is usually `0`.
    pub db: i64,

    /// The optional username to use for the connection.
    pub username: Option<String>,

    /// The optional password to use for the connection.
    pub password: Option<String>,
}

impl RedisConfig {
    /// Construct a `RedisConfig` from a `url`.
    ///
    /// This returns `None` if the URL is invalid.
    ///
    /// For a TCP connection, the URL format is:
    /// `redis://[<username>][:<passwd>@]<hostname>[:port][/<db>]`.
    ///
    /// For a Unix socket connection, the URL format is:
    /// `redis+unix:///<path>[?db=<db>[&pass=<password>][&user=<username>]]`.
    pub fn from_url(url: &str) -> Option<Self> {
        let connection_info = url.into_connection_info().ok()?;
        Some(RedisConfig {
            addr: match connection_info.addr {
                ConnectionAddr::Tcp(host, port) => RedisAddr::Tcp(host, port),
                ConnectionAddr::TcpTls { host, port, .. } => RedisAddr::Tcp(host, port),
                ConnectionAddr::Unix(path) => RedisAddr::Unix(path),
            },
            db: connection_info.redis.db,
            username: connection_info.redis.username,
            password: connection_info.redis.password,
        })
    }
}

impl OpenStore for RedisConfig {
    type Store = RedisStore;

    fn open(&self, container: &str) -> crate::Result<Self::Store> {
        let info = ConnectionInfo {
            addr: match self.addr.clone() {
                RedisAddr::Tcp(host, port) => ConnectionAddr::Tcp(host, port),
                RedisAddr::Unix(path) => ConnectionAddr::Unix(path),
            },
            redis: RedisConnectionInfo {
                db: self.db,
                username: self.username.clone(),
                password: self.password.clone(),
            },
        };
        RedisStore::from_connection_info(info, container)
    }
}

/// A `DataStore` which stores data on a Redis server.
///
/// You can use [`RedisConfig`] to open a data store of this type.
///
/// [`RedisConfig`]: crate::store::RedisConfig
#[cfg_attr(docsrs, doc(cfg(feature = "store-redis")))]
pub struct RedisStore {
    connection: Connection,
    key_prefix: String,
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    fn from_connection_info(info: ConnectionInfo, container: &str) -> crate::Result<Self> {
        let mut connection = Client::open(info)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?
            .get_connection()
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        let version_response: Option<String> = connection
            .get(STORE_VERSION_KEY)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        match version_response {
            Some(version) => {
                if version != CURRENT_VERSION {
                    return Err(crate::Error::UnsupportedStore);
                }
            }
            None => connection
                .set(STORE_VERSION_KEY, CURRENT_VERSION)
                .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?,
        }

        debug!(container, "Opened Redis store.");

        Ok(RedisStore {
            connection,
            key_prefix: format!("{}:", container),
        })
    }

    fn redis_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

impl DataStore for RedisStore {
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        let redis_key = self.redis_key(key);
        let _: () = self.connection.set(redis_key, data)?;
        Ok(())
    }

    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let redis_key = self.redis_key(key);
        Ok(self.connection.get(redis_key)?)
    }

    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        let redis_key = self.redis_key(key);
        Ok(self.connection.exists(redis_key)?)
    }

    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()> {
        let redis_key = self.redis_key(key);
        let _: () = self.connection.del(redis_key)?;
        Ok(())
    }

    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let search_key = format!(
            "{}{}*",
            escape_pattern(&self.key_prefix),
            escape_pattern(prefix)
        );

        let keys = self
            .connection
            .keys::<_, Vec<String>>(search_key)?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.key_prefix).map(str::to_owned))
            .collect();

        Ok(keys)
    }
}
