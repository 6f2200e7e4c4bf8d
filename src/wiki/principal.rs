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

/// A regular user of the wiki.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    username: String,
}

impl User {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
        }
    }

    /// The name the user signed up with.
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// An administrator of the wiki.
///
/// Admin credentials are stored separately from user credentials, so an admin and a user can
/// share a username without being the same principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Admin {
    username: String,
    role: String,
}

impl Admin {
    pub(crate) fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Admin {
            username: username.into(),
            role: role.into(),
        }
    }

    /// The name the admin was registered with.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The role describing which access this admin was granted.
    pub fn role(&self) -> &str {
        &self.role
    }
}

/// An authenticated identity.
///
/// This is returned by every sign-up and sign-in method of [`Backend`]. A session layer only
/// needs [`id`] to remember who is signed in and [`is_admin`] to guard admin-only actions.
///
/// [`Backend`]: crate::wiki::Backend
/// [`id`]: crate::wiki::Principal::id
/// [`is_admin`]: crate::wiki::Principal::is_admin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Principal {
    /// A regular user.
    User(User),

    /// An administrator.
    Admin(Admin),
}

impl Principal {
    /// The string which uniquely identifies this principal among principals of the same kind.
    pub fn id(&self) -> &str {
        match self {
            Principal::User(user) => user.username(),
            Principal::Admin(admin) => admin.username(),
        }
    }

    /// Whether this principal is an administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin(_))
    }

    /// The admin role of this principal, or `None` for a regular user.
    pub fn role(&self) -> Option<&str> {
        match self {
            Principal::User(_) => None,
            Principal::Admin(admin) => Some(admin.role()),
        }
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Principal::User(user)
    }
}

impl From<Admin> for Principal {
    fn from(admin: Admin) -> Self {
        Principal::Admin(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_principal_is_not_admin() {
        let principal = Principal::from(User::new("alice"));
        assert_eq!(principal.id(), "alice");
        assert!(!principal.is_admin());
        assert_eq!(principal.role(), None);
    }

    #[test]
    fn admin_principal_carries_role() {
        let principal = Principal::from(Admin::new("root", "moderator"));
        assert_eq!(principal.id(), "root");
        assert!(principal.is_admin());
        assert_eq!(principal.role(), Some("moderator"));
    }
}
