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

use serde::{Deserialize, Serialize};

use super::credential::PasswordScheme;

// The environment variables read by `WikiConfig::from_env`.
const USERS_CONTAINER_VAR: &str = "WIKI_USERS_CONTAINER";
const ADMINS_CONTAINER_VAR: &str = "WIKI_ADMINS_CONTAINER";
const CONTENT_CONTAINER_VAR: &str = "WIKI_CONTENT_CONTAINER";
const PASSWORD_SCHEME_VAR: &str = "WIKI_PASSWORD_SCHEME";

/// The configuration for a [`Backend`].
///
/// This type implements `Default` to provide the container names the wiki has always used. It
/// can also be deserialized, and missing fields take their default values.
///
/// [`Backend`]: crate::wiki::Backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct WikiConfig {
    /// The name of the container which stores user credentials.
    ///
    /// The default value is `bucket-users-password`.
    pub users_container: String,

    /// The name of the container which stores admin credentials.
    ///
    /// The default value is `bucket-admins-password`.
    pub admins_container: String,

    /// The name of the container which stores pages, images, and page history.
    ///
    /// The default value is `bucket-contents`.
    pub content_container: String,

    /// The scheme used to hash passwords of new users and admins.
    ///
    /// The default value is `PasswordScheme::Argon2id`. Existing records are verified according
    /// to their own format regardless of this value.
    pub password_scheme: PasswordScheme,
}

impl Default for WikiConfig {
    fn default() -> Self {
        WikiConfig {
            users_container: String::from("bucket-users-password"),
            admins_container: String::from("bucket-admins-password"),
            content_container: String::from("bucket-contents"),
            password_scheme: PasswordScheme::default(),
        }
    }
}

impl WikiConfig {
    /// Read a `WikiConfig` from the environment.
    ///
    /// Variables are also loaded from a `.env` file if one exists. Unset variables keep their
    /// default values.
    ///
    /// Variable | Field
    /// --- | ---
    /// `WIKI_USERS_CONTAINER` | `users_container`
    /// `WIKI_ADMINS_CONTAINER` | `admins_container`
    /// `WIKI_CONTENT_CONTAINER` | `content_container`
    /// `WIKI_PASSWORD_SCHEME` | `password_scheme` (`argon2id` or `legacy-sha256`)
    ///
    /// # Errors
    /// - `Error::InvalidConfig`: A variable has an invalid value.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = WikiConfig::default();

        if let Ok(value) = dotenv::var(USERS_CONTAINER_VAR) {
            config.users_container = value;
        }
        if let Ok(value) = dotenv::var(ADMINS_CONTAINER_VAR) {
            config.admins_container = value;
        }
        if let Ok(value) = dotenv::var(CONTENT_CONTAINER_VAR) {
            config.content_container = value;
        }
        if let Ok(value) = dotenv::var(PASSWORD_SCHEME_VAR) {
            config.password_scheme = value.parse()?;
        }

        Ok(config)
    }

    /// Use `scheme` to hash passwords of new users and admins.
    pub fn password_scheme(mut self, scheme: PasswordScheme) -> Self {
        self.password_scheme = scheme;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial(env)]
    fn from_env_overrides_defaults() {
        env::set_var(CONTENT_CONTAINER_VAR, "wiki-pages");
        env::set_var(PASSWORD_SCHEME_VAR, "legacy-sha256");

        let config = WikiConfig::from_env().unwrap();

        env::remove_var(CONTENT_CONTAINER_VAR);
        env::remove_var(PASSWORD_SCHEME_VAR);

        assert_eq!(config.content_container, "wiki-pages");
        assert_eq!(config.users_container, "bucket-users-password");
        assert_eq!(config.password_scheme, PasswordScheme::LegacySha256);
    }

    #[test]
    #[serial(env)]
    fn from_env_rejects_unknown_scheme() {
        env::set_var(PASSWORD_SCHEME_VAR, "rot13");

        let result = WikiConfig::from_env();

        env::remove_var(PASSWORD_SCHEME_VAR);

        assert!(matches!(result, Err(crate::Error::InvalidConfig(_))));
    }
}
