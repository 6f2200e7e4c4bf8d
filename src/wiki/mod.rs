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

//! The wiki built on top of data stores.
//!
//! A [`Backend`] provides three services over three containers:
//! - Credentials: users sign up and sign in, and admins are registered and sign in separately.
//! Each returns a [`Principal`].
//! - Content: pages and images are stored by name and listed.
//! - Versioning: saving a page moves its old content into a [`HistoryEntry`] named by the page,
//! the time of the save, and its author. Previous versions can be listed, read, and restored.
//!
//! The containers used and the way new passwords are hashed are set by [`WikiConfig`].

pub use self::backend::Backend;
pub use self::clock::{Clock, SystemClock};
pub use self::config::WikiConfig;
pub use self::content::{is_image, is_page, AUTHOR_IMAGES_PREFIX, HISTORY_PREFIX};
pub use self::credential::{verify_password, PasswordScheme};
pub use self::history::{HistoryEntry, PreviousVersion};
pub use self::principal::{Admin, Principal, User};

mod backend;
mod clock;
mod config;
mod content;
mod credential;
mod history;
mod principal;
