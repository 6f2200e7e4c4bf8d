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

use tracing::{debug, info, warn};

use crate::store::{DataStore, OpenStore};

use super::clock::{Clock, SystemClock};
use super::config::WikiConfig;
use super::content::{is_page, validate_name, HISTORY_PREFIX};
use super::credential::{decode_user_record, verify_password, AdminRecord, PasswordScheme};
use super::history::{history_key, history_prefix, HistoryEntry, PreviousVersion};
use super::principal::{Admin, Principal, User};

/// The storage backend of a wiki.
///
/// A `Backend` owns three data stores: one for user credentials, one for admin credentials, and
/// one for content. The content store holds the current version of each page under the page's
/// name, uploaded images under their own names, and previous versions of pages under the
/// `history/` prefix.
///
/// Every method blocks on the underlying data stores. Methods take `&mut self`, so calls on one
/// `Backend` are serialized. Nothing coordinates separate `Backend` values which share the same
/// storage, so two of them saving the same page at once can lose one of the updates.
#[derive(Debug)]
pub struct Backend<S: DataStore> {
    users: S,
    admins: S,
    content: S,
    password_scheme: PasswordScheme,
    clock: Box<dyn Clock>,
}

impl<S: DataStore> Backend<S> {
    /// Create a `Backend` from data stores which are already open.
    ///
    /// Only the password scheme of `config` is used; the container names are ignored.
    pub fn new(users: S, admins: S, content: S, config: &WikiConfig) -> Self {
        Backend {
            users,
            admins,
            content,
            password_scheme: config.password_scheme,
            clock: Box::new(SystemClock),
        }
    }

    /// Open the containers named in `config` using `stores`.
    ///
    /// # Errors
    /// - `Error::UnsupportedStore`: One of the containers is in an unsupported format.
    /// - `Error::Store`: An error occurred with the data store.
    /// - `Error::Io`: An I/O error occurred.
    pub fn open<O>(config: &WikiConfig, stores: &O) -> crate::Result<Self>
    where
        O: OpenStore<Store = S>,
    {
        let users = stores.open(&config.users_container)?;
        let admins = stores.open(&config.admins_container)?;
        let content = stores.open(&config.content_container)?;

        info!(
            users = %config.users_container,
            admins = %config.admins_container,
            content = %config.content_container,
            "Opened wiki containers."
        );

        Ok(Self::new(users, admins, content, config))
    }

    /// Use `clock` instead of the system clock to timestamp history entries.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Register a new user with the given `username` and `password`.
    ///
    /// # Errors
    /// - `Error::AlreadyExists`: A user with this username already exists.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn sign_up(&mut self, username: &str, password: &str) -> crate::Result<Principal> {
        if self.users.contains_blob(username)? {
            return Err(crate::Error::AlreadyExists(format!(
                "Username {} already exists!",
                username
            )));
        }

        let hash = self.password_scheme.hash(username, password)?;
        self.users.write_blob(username, hash.as_bytes())?;

        info!(username, scheme = %self.password_scheme, "Signed up user.");

        Ok(User::new(username).into())
    }

    /// Authenticate the user with the given `username` and `password`.
    ///
    /// # Errors
    /// - `Error::NotFound`: There is no user with this username.
    /// - `Error::InvalidCredentials`: The password is wrong.
    /// - `Error::Corrupt`: The stored credentials are in an unknown format.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn sign_in(&mut self, username: &str, password: &str) -> crate::Result<Principal> {
        let stored = match self.users.read_blob(username)? {
            Some(data) => decode_user_record(data)?,
            None => {
                return Err(crate::Error::NotFound(format!(
                    "Username {} does not exist!",
                    username
                )))
            }
        };

        if !verify_password(&stored, username, password)? {
            warn!(username, "Failed sign-in for user.");
            return Err(crate::Error::InvalidCredentials(format!(
                "Invalid password for username {}!",
                username
            )));
        }

        debug!(username, "Signed in user.");

        Ok(User::new(username).into())
    }

    /// Register a new admin with the given `username`, `password`, and `role`.
    ///
    /// Admins are stored separately from users, so this does not conflict with a user of the
    /// same name.
    ///
    /// # Errors
    /// - `Error::AlreadyExists`: An admin with this username already exists.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn register_admin(
        &mut self,
        username: &str,
        password: &str,
        role: &str,
    ) -> crate::Result<Principal> {
        if self.admins.contains_blob(username)? {
            return Err(crate::Error::AlreadyExists(format!(
                "Admin {} already exists!",
                username
            )));
        }

        let record = AdminRecord {
            password_hash: self.password_scheme.hash(username, password)?,
            role: role.to_owned(),
        };
        self.admins.write_blob(username, &record.encode()?)?;

        info!(username, role, "Registered admin.");

        Ok(Admin::new(username, role).into())
    }

    /// Authenticate the admin with the given `username` and `password`.
    ///
    /// # Errors
    /// - `Error::NotFound`: There is no admin with this username.
    /// - `Error::InvalidCredentials`: The password is wrong.
    /// - `Error::Corrupt`: The stored admin record could not be decoded.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn sign_in_admin(&mut self, username: &str, password: &str) -> crate::Result<Principal> {
        let record = match self.admins.read_blob(username)? {
            Some(data) => AdminRecord::decode(&data)?,
            None => {
                return Err(crate::Error::NotFound(format!(
                    "Admin {} does not exist!",
                    username
                )))
            }
        };

        if !verify_password(&record.password_hash, username, password)? {
            warn!(username, "Failed sign-in for admin.");
            return Err(crate::Error::InvalidCredentials(format!(
                "Invalid password for admin {}!",
                username
            )));
        }

        debug!(username, role = %record.role, "Signed in admin.");

        Ok(Admin::new(username, record.role).into())
    }

    /// Return the current content of the page named `name`.
    ///
    /// # Errors
    /// - `Error::NotFound`: There is no page with this name.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn get_page(&mut self, name: &str) -> crate::Result<Vec<u8>> {
        self.content.read_blob(name)?.ok_or_else(|| {
            crate::Error::NotFound(format!("No page exists with the given name: {}", name))
        })
    }

    /// Return the names of all pages.
    ///
    /// History entries, author images, and `.png`, `.jpg`, and `.jpeg` images are not pages. The
    /// names are in the order the data store lists them.
    ///
    /// # Errors
    /// - `Error::Store`: An error occurred with the data store.
    pub fn list_page_names(&mut self) -> crate::Result<Vec<String>> {
        let mut names = self.content.list_blobs("")?;
        names.retain(|name| is_page(name));
        Ok(names)
    }

    /// Store `data` under `name` in the content container.
    ///
    /// Unlike [`save_page`], this never overwrites existing content and keeps no history.
    ///
    /// # Errors
    /// - `Error::InvalidName`: The name is empty or is inside the history namespace.
    /// - `Error::AlreadyExists`: There is already a blob with this name.
    /// - `Error::Store`: An error occurred with the data store.
    ///
    /// [`save_page`]: crate::wiki::Backend::save_page
    pub fn upload(&mut self, name: &str, data: &[u8]) -> crate::Result<()> {
        validate_name(name)?;

        if self.content.contains_blob(name)? {
            return Err(crate::Error::AlreadyExists(format!(
                "{} already exists in the content bucket!",
                name
            )));
        }

        self.content.write_blob(name, data)?;

        debug!(name, size = data.len(), "Uploaded content.");

        Ok(())
    }

    /// Return the image named `name`, or an empty vector if there is no such image.
    ///
    /// # Errors
    /// - `Error::Store`: An error occurred with the data store.
    pub fn get_image(&mut self, name: &str) -> crate::Result<Vec<u8>> {
        Ok(self.content.read_blob(name)?.unwrap_or_default())
    }

    /// Replace the content of the page named `name` with `content`, saved by `author`.
    ///
    /// If the page already exists, its old content is first written to a new history entry
    /// timestamped with the current time. Saving a page for the first time creates no history
    /// entry. Two saves of the same page by the same author within the same second write the same
    /// history entry, so only the later one is kept.
    ///
    /// # Errors
    /// - `Error::InvalidName`: The name is empty or is inside the history namespace.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn save_page(&mut self, name: &str, content: &[u8], author: &str) -> crate::Result<()> {
        validate_name(name)?;

        match self.content.read_blob(name)? {
            Some(previous) => {
                let key = history_key(name, self.clock.now(), author);
                self.content.write_blob(&key, &previous)?;
                debug!(name, author, key = %key, "Wrote history entry.");
            }
            None => {
                info!(name, author, "Created page.");
            }
        }

        self.content.write_blob(name, content)?;

        Ok(())
    }

    /// Return the history of the page named `page_name`, newest first.
    ///
    /// Keys under the page's history prefix which are not well-formed history keys are skipped.
    ///
    /// # Errors
    /// - `Error::Store`: An error occurred with the data store.
    pub fn list_history(&mut self, page_name: &str) -> crate::Result<Vec<HistoryEntry>> {
        let mut keys = self.content.list_blobs(&history_prefix(page_name))?;
        keys.sort_unstable_by(|left, right| right.cmp(left));

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            match HistoryEntry::parse(page_name, &key) {
                Some(entry) => entries.push(entry),
                None => debug!(page = page_name, key = %key, "Skipped malformed history key."),
            }
        }

        Ok(entries)
    }

    /// Return the most recent previous version of the page named `page_name`.
    ///
    /// This returns `None` if the page has no history.
    ///
    /// # Errors
    /// - `Error::Store`: An error occurred with the data store.
    pub fn get_latest_previous_version(
        &mut self,
        page_name: &str,
    ) -> crate::Result<Option<PreviousVersion>> {
        let entry = match self.list_history(page_name)?.into_iter().next() {
            Some(entry) => entry,
            None => return Ok(None),
        };

        // The entry can disappear between listing and reading.
        match self.content.read_blob(entry.key())? {
            Some(content) => Ok(Some(PreviousVersion::new(entry, content))),
            None => Ok(None),
        }
    }

    /// Return the content stored in the history entry with the given `key`.
    ///
    /// # Errors
    /// - `Error::InvalidName`: The key is not in the history namespace.
    /// - `Error::NotFound`: There is no history entry with this key.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn get_history_version(&mut self, key: &str) -> crate::Result<Vec<u8>> {
        if !key.starts_with(HISTORY_PREFIX) {
            return Err(crate::Error::InvalidName(key.to_owned()));
        }

        self.content.read_blob(key)?.ok_or_else(|| {
            crate::Error::NotFound(format!(
                "No history entry exists with the given key: {}",
                key
            ))
        })
    }

    /// Restore the most recent previous version of the page named `page_name`.
    ///
    /// The restore is itself a save by `author`, so the content being replaced is pushed into
    /// the history. This returns `false` without changing anything if the page has no history.
    ///
    /// # Errors
    /// - `Error::InvalidName`: The name is empty or is inside the history namespace.
    /// - `Error::Store`: An error occurred with the data store.
    pub fn revert_to_previous(&mut self, page_name: &str, author: &str) -> crate::Result<bool> {
        let previous = match self.get_latest_previous_version(page_name)? {
            Some(previous) => previous,
            None => return Ok(false),
        };

        info!(
            page = page_name,
            author,
            restored = %previous.entry().key(),
            "Reverting page."
        );

        self.save_page(page_name, previous.content(), author)?;

        Ok(true)
    }

    /// Consume this backend and return its users, admins, and content stores.
    pub fn into_stores(self) -> (S, S, S) {
        (self.users, self.admins, self.content)
    }
}
