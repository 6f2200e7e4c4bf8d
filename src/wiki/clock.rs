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

use chrono::{DateTime, Utc};

/// A source of the current time.
///
/// [`Backend`] asks its clock for the time whenever it writes a history entry. Only second
/// resolution is used.
///
/// [`Backend`]: crate::wiki::Backend
pub trait Clock: fmt::Debug + Send {
    /// Return the current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// A `Clock` which reads the system time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
