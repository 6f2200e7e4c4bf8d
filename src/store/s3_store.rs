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

#![cfg(feature = "store-s3")]

use anyhow::bail;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use tracing::debug;

use super::data_store::DataStore;
use super::open_store::OpenStore;

/// A UUID which acts as the version ID of the store format.
const CURRENT_VERSION: &str = "b62f5c1a-6d1b-11ee-a0d4-c7e3f81b2a65";

/// The key of the object which stores the store format version.
///
/// This object is hidden from listings and cannot be written through the `DataStore` API.
const VERSION_KEY: &str = ".wiki-store/version";

/// The HTTP status code for an object which does not exist.
const NOT_FOUND_CODE: u16 = 404;

/// Interpret the status code of a request for the object `key`.
///
/// This returns `false` if the object does not exist and an error for any non-success status.
fn object_exists(key: &str, status: u16) -> anyhow::Result<bool> {
    match status {
        NOT_FOUND_CODE => Ok(false),
        200..=299 => Ok(true),
        _ => bail!("Request for the object {:?} failed with status {}.", key, status),
    }
}

/// Return an error if `status` is not a success status.
fn check_status(key: &str, status: u16) -> anyhow::Result<()> {
    if !(200..=299).contains(&status) {
        bail!("Request for the object {:?} failed with status {}.", key, status);
    }
    Ok(())
}

/// A region to connect to when using an [`S3Store`].
///
/// [`S3Store`]: crate::store::S3Store
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-s3")))]
pub enum S3Region {
    /// A named AWS region like `us-east-1`.
    Named(String),

    /// A custom region and endpoint for an S3-compatible service.
    Custom {
        /// The name of the region.
        region: String,

        /// The URL of the service endpoint.
        endpoint: String,
    },
}

impl S3Region {
    /// Return the region with the given `name`.
    ///
    /// This returns `None` if the name is not a region the S3 client recognizes.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.parse::<Region>().ok()? {
            Region::Custom { .. } => None,
            _ => Some(S3Region::Named(name.to_owned())),
        }
    }

    fn to_region(&self) -> anyhow::Result<Region> {
        Ok(match self {
            S3Region::Named(name) => name.parse::<Region>()?,
            S3Region::Custom { region, endpoint } => Region::Custom {
                region: region.clone(),
                endpoint: endpoint.clone(),
            },
        })
    }
}

/// The credentials to use to authenticate with an S3-compatible service.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-s3")))]
pub enum S3Credentials {
    /// An access key and a secret key.
    Basic {
        /// The access key.
        access_key: String,

        /// The secret key.
        secret_key: String,
    },

    /// Credentials from the environment or the shared credentials profile.
    Default,

    /// No credentials, for public buckets.
    Anonymous,
}

impl S3Credentials {
    fn to_credentials(&self) -> anyhow::Result<Credentials> {
        Ok(match self {
            S3Credentials::Basic {
                access_key,
                secret_key,
            } => Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            )?,
            S3Credentials::Default => Credentials::default()?,
            S3Credentials::Anonymous => Credentials::anonymous()?,
        })
    }
}

/// The configuration for opening an [`S3Store`].
///
/// Each container is a separate bucket, so opening the container `bucket-contents` accesses the
/// bucket of that name. The buckets must already exist.
///
/// [`S3Store`]: crate::store::S3Store
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-s3")))]
pub struct S3Config {
    /// The region the buckets are in.
    pub region: S3Region,

    /// The credentials to authenticate with.
    pub credentials: S3Credentials,

    /// Whether to address buckets with path-style URLs, which most self-hosted services need.
    pub path_style: bool,
}

impl OpenStore for S3Config {
    type Store = S3Store;

    fn open(&self, container: &str) -> crate::Result<Self::Store> {
        let region = self.region.to_region()?;
        let credentials = self.credentials.to_credentials()?;
        let mut bucket = Bucket::new(container, region, credentials)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;
        if self.path_style {
            bucket.set_path_style();
        }

        let response = bucket
            .get_object(VERSION_KEY)
            .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;

        if !object_exists(VERSION_KEY, response.status_code())? {
            let response = bucket
                .put_object(VERSION_KEY, CURRENT_VERSION.as_bytes())
                .map_err(|error| crate::Error::Store(anyhow::Error::from(error)))?;
            check_status(VERSION_KEY, response.status_code())?;
        } else if &response.bytes()[..] != CURRENT_VERSION.as_bytes() {
            return Err(crate::Error::UnsupportedStore);
        }

        debug!(bucket = container, "Opened S3 store.");

        Ok(S3Store { bucket })
    }
}

/// A `DataStore` which stores data in an Amazon S3 bucket.
///
/// You can use [`S3Config`] to open a data store of this type.
///
/// [`S3Config`]: crate::store::S3Config
#[derive(Debug)]
#[cfg_attr(docsrs, doc(cfg(feature = "store-s3")))]
pub struct S3Store {
    bucket: Bucket,
}

impl DataStore for S3Store {
    fn write_blob(&mut self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        if key == VERSION_KEY {
            bail!("The key {:?} is reserved.", key);
        }
        let response = self.bucket.put_object(key, data)?;
        check_status(key, response.status_code())
    }

    fn read_blob(&mut self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let response = self.bucket.get_object(key)?;
        if object_exists(key, response.status_code())? {
            Ok(Some(response.bytes().to_vec()))
        } else {
            Ok(None)
        }
    }

    fn contains_blob(&mut self, key: &str) -> anyhow::Result<bool> {
        let (_, code) = self.bucket.head_object(key)?;
        object_exists(key, code)
    }

    fn remove_blob(&mut self, key: &str) -> anyhow::Result<()> {
        let response = self.bucket.delete_object(key)?;
        // Removing a missing object is not an error.
        object_exists(key, response.status_code())?;
        Ok(())
    }

    fn list_blobs(&mut self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let keys = self
            .bucket
            .list(prefix.to_owned(), None)?
            .into_iter()
            .flat_map(|list| list.contents)
            .map(|object| object.key)
            .filter(|key| key != VERSION_KEY)
            .collect::<Vec<_>>();
        Ok(keys)
    }
}
