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

#![cfg(feature = "store-sqlite")]

use std::path::PathBuf;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::data_store::DataStore;
use super::open_store::OpenStore;

/// A UUID which acts as the version ID of the store format.
const CURRENT_VERSION: &str = "5d7e91c4-6d1b-11ee-8c0f-13a9b2e7f6d4";

/// The configuration for opening a [`SqliteStore`].
///
/// All containers are stored in the same database file.
///
/// [`SqliteStore`]: crate::store::SqliteStore
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub struct SqliteConfig {
    /// The path of the SQLite database.
    pub path: PathBuf,
}

impl OpenStore for SqliteConfig {
    type Store = SqliteStore;

    fn open(&self, container: &str) -> crate::Result<Self::Store> {
        let connection = Connection::open(&self.path)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        connection
            .execute_batch(
                r#"
                    CREATE TABLE IF NOT EXISTS Blobs (
                        container TEXT NOT NULL,
                        key TEXT NOT NULL,
                        data BLOB NOT NULL,
                        PRIMARY KEY (container, key)
                    );

                    CREATE TABLE IF NOT EXISTS Metadata (
                        key TEXT PRIMARY KEY,
                        value BLOB NOT NULL
                    );
                "#,
            )
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        let version: Option<String> = connection
            .query_row(
                r#"
                    SELECT value FROM Metadata
                    WHERE key = 'version';
                "#,
                params![],
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        match version {
            Some(version) => {
                if version != CURRENT_VERSION {
                    return Err(crate::Error::UnsupportedStore);
                }
            }
            None => {
                connection
                    .execute(
                        r#"
                            INSERT INTO Metadata (key, value)
                            VALUES ('version', ?1);
                        "#,
                        params![CURRENT_VERSION],
                    )
                    .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;
            }
        }

        debug!(path = %self.path.display(), container, "Opened SQLite store.");

        Ok(SqliteStore {
            connection,
            container: container.to_owned(),
        })
    }
}

/// A `DataStore` which stores data in a SQLite database.
///
/// You can use [`SqliteConfig`] to open a data store of this type.
///
/// [`SqliteConfig`]: crate::store::SqliteConfig
#[derive(Debug)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub struct SqliteStore {
    /// The connection to the SQLite database.
    connection: Connection,

    /// The name of the container this store reads and writes.
    container: String,
}

impl DataStore for SqliteStore {
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        self.connection.execute(
            r#"
                REPLACE INTO Blobs (container, key, data)
                VALUES (?1, ?2, ?3);
            "#,
            params![self.container, key, data],
        )?;

        Ok(())
    }

    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self
            .connection
            .query_row(
                r#"
                    SELECT data FROM Blobs
                    WHERE container = ?1 AND key = ?2;
                "#,
                params![self.container, key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        let count: i64 = self.connection.query_row(
            r#"
                SELECT COUNT(*) FROM Blobs
                WHERE container = ?1 AND key = ?2;
            "#,
            params![self.container, key],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()> {
        self.connection.execute(
            r#"
                DELETE FROM Blobs
                WHERE container = ?1 AND key = ?2;
            "#,
            params![self.container, key],
        )?;

        Ok(())
    }

    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut statement = self.connection.prepare(
            r#"
                SELECT key FROM Blobs
                WHERE container = ?1 AND substr(key, 1, length(?2)) = ?2;
            "#,
        )?;

        let result = statement
            .query_map(params![self.container, prefix], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(result)
    }
}
