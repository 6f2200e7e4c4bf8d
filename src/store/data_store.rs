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

use std::fmt;

use static_assertions::assert_obj_safe;

/// A persistent container of named blobs.
///
/// A `DataStore` stores opaque blobs of data uniquely identified by string keys. It is the
/// equivalent of a single bucket in an object storage service. Keys are flat; a `/` in a key has
/// no meaning to the store other than being part of the name, although some implementations use
/// it to lay out data.
///
/// Data stores do not provide locking, transactions, or compare-and-swap. Two writers racing on
/// the same key will simply overwrite each other.
pub trait DataStore: fmt::Debug + Send {
    /// Write the given `data` as the blob with the given `key`.
    ///
    /// If this method returns `Ok`, the blob is stored persistently until it is removed with
    /// `remove_blob`. If this method returns `Err`, the blob is not stored persistently and it is
    /// up to the implementation to ensure that any data which may have been written is cleaned up.
    ///
    /// If a blob with the given `key` already exists, it is overwritten.
    ///
    /// This is an atomic operation.
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()>;

    /// Return the bytes of the blob with the given `key`.
    ///
    /// If there is no blob with the given `key`, this returns `Ok(None)`.
    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Return whether a blob with the given `key` exists.
    ///
    /// The default implementation reads the whole blob. Implementations should override it when
    /// the backend offers a cheaper existence check.
    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        Ok(self.read_blob(key)?.is_some())
    }

    /// Remove the blob with the given `key` from the store.
    ///
    /// If there is no blob with the given `key`, this method does nothing and returns `Ok`.
    ///
    /// This is an atomic operation.
    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()>;

    /// Return the keys of all blobs whose key starts with `prefix`.
    ///
    /// An empty `prefix` lists every blob in the store. The order of the returned keys is
    /// unspecified.
    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>>;
}

assert_obj_safe!(DataStore);

impl DataStore for Box<dyn DataStore> {
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        self.as_mut().write_blob(key, data)
    }

    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.as_mut().read_blob(key)
    }

    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        self.as_mut().contains_blob(key)
    }

    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()> {
        self.as_mut().remove_blob(key)
    }

    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>> {
        self.as_mut().list_blobs(prefix)
    }
}
