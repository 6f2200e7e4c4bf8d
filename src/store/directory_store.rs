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

#![cfg(feature = "store-directory")]

use std::fs::{create_dir_all, read_dir, remove_file, rename, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};
use tracing::debug;
use uuid::Uuid;
use walkdir::WalkDir;

use super::data_store::DataStore;
use super::open_store::OpenStore;

/// A UUID which acts as the version ID of the directory store format.
const CURRENT_VERSION: &str = "3f0c2a8e-6d1b-11ee-9a51-2b7f4e8c1d90";

// The names of top-level files in the data store.
const STORE_DIRECTORY: &str = "store";
const STAGING_DIRECTORY: &str = "stage";
const VERSION_FILE: &str = "version";

/// The extension given to every blob file.
///
/// This keeps the blob `a` and the directory holding the blob `a/b` from colliding.
const BLOB_EXTENSION: &str = ".blob";

/// Return whether `segment` can be used as a single path component.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains('\\')
        && !segment.contains('\0')
}

/// Return the path of the blob with the given `key` relative to the container directory.
fn blob_path(key: &str) -> anyhow::Result<PathBuf> {
    let mut path = PathBuf::new();
    let mut segments = key.split('/').peekable();

    while let Some(segment) = segments.next() {
        if !is_valid_segment(segment) {
            bail!("The key {:?} cannot be stored in a directory store.", key);
        }
        if segments.peek().is_some() {
            path.push(segment);
        } else {
            path.push(format!("{}{}", segment, BLOB_EXTENSION));
        }
    }

    Ok(path)
}

/// Return the key of the blob stored at `path` relative to the container directory.
fn blob_key(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        segments.push(component.as_os_str().to_str()?);
    }
    let file_name = segments.pop()?.strip_suffix(BLOB_EXTENSION)?;
    segments.push(file_name);
    Some(segments.join("/"))
}

/// The configuration for opening a [`DirectoryStore`].
///
/// Each container is stored in its own sub-directory of `path`.
///
/// [`DirectoryStore`]: crate::store::DirectoryStore
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-directory")))]
pub struct DirectoryConfig {
    /// The path of the directory store.
    pub path: PathBuf,
}

impl DirectoryConfig {
    /// Remove any staging files left behind by interrupted writes.
    ///
    /// This must only be called when no other process is writing to the store.
    pub fn clean_staging(&self) -> crate::Result<()> {
        let staging_path = self.path.join(STAGING_DIRECTORY);
        if !staging_path.exists() {
            return Ok(());
        }
        for entry in read_dir(staging_path)? {
            remove_file(entry?.path())?;
        }
        Ok(())
    }
}

impl OpenStore for DirectoryConfig {
    type Store = DirectoryStore;

    fn open(&self, container: &str) -> crate::Result<Self::Store> {
        if !is_valid_segment(container) || container.contains('/') {
            return Err(crate::Error::Store(anyhow!(
                "The container name {:?} is not a valid directory name.",
                container
            )));
        }

        let store_path = self.path.join(STORE_DIRECTORY).join(container);
        let staging_path = self.path.join(STAGING_DIRECTORY);

        create_dir_all(&store_path)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;
        create_dir_all(&staging_path)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        let version_path = self.path.join(VERSION_FILE);

        if version_path.exists() {
            // Read the version ID file.
            let mut version_file = File::open(&version_path)
                .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;
            let mut version_id = String::new();
            version_file.read_to_string(&mut version_id)?;

            // Verify the version ID.
            if version_id != CURRENT_VERSION {
                return Err(crate::Error::UnsupportedStore);
            }
        } else {
            // Write the version ID file.
            let mut version_file = File::create(&version_path)
                .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;
            version_file.write_all(CURRENT_VERSION.as_bytes())?;
        }

        debug!(path = %store_path.display(), container, "Opened directory store.");

        Ok(DirectoryStore {
            path: store_path,
            staging_path,
        })
    }
}

/// A `DataStore` which stores data in a directory in the local file system.
///
/// A key is split on `/` and each segment but the last becomes a directory. Keys with empty
/// segments or with `.` or `..` segments cannot be stored.
///
/// You can use [`DirectoryConfig`] to open a data store of this type.
///
/// [`DirectoryConfig`]: crate::store::DirectoryConfig
#[derive(Debug)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-directory")))]
pub struct DirectoryStore {
    /// The path of the container's root directory.
    path: PathBuf,

    /// The path of the directory where blobs are staged before being moved into place.
    staging_path: PathBuf,
}

impl DirectoryStore {
    /// Return a new staging path.
    fn staging_path(&self) -> PathBuf {
        let uuid_str = Uuid::new_v4().as_hyphenated().to_string();
        self.staging_path.join(&uuid_str)
    }
}

impl DataStore for DirectoryStore {
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        let staging_path = self.staging_path();
        let blob_path = self.path.join(blob_path(key)?);

        // If this is the first blob in its sub-directory, the directory needs to be created.
        if let Some(parent) = blob_path.parent() {
            create_dir_all(parent)?;
        }

        // Write to a staging file and then atomically move it to its final destination.
        let mut staging_file = File::create(&staging_path)?;
        staging_file.write_all(data)?;
        staging_file.sync_all()?;
        drop(staging_file);

        if let Err(error) = rename(&staging_path, &blob_path) {
            remove_file(&staging_path).ok();
            return Err(error.into());
        }

        Ok(())
    }

    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let blob_path = self.path.join(blob_path(key)?);

        let mut file = match File::open(&blob_path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        let mut buffer = Vec::with_capacity(file.metadata()?.len() as usize);
        file.read_to_end(&mut buffer)?;

        Ok(Some(buffer))
    }

    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        Ok(self.path.join(blob_path(key)?).is_file())
    }

    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()> {
        let blob_path = self.path.join(blob_path(key)?);

        match remove_file(&blob_path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }

    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in WalkDir::new(&self.path).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative_path = entry.path().strip_prefix(&self.path)?;
            let key = blob_key(relative_path)
                .ok_or_else(|| anyhow!("Blob file name is invalid: {}", relative_path.display()))?;
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }

        Ok(keys)
    }
}
