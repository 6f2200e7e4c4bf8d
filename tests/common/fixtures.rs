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

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::*;

use wiki_store::store::{MemoryConfig, MemoryStore};
use wiki_store::wiki::{Backend, Clock, PasswordScheme, WikiConfig};

/// A `Clock` which the test controls.
///
/// Every call to `now` returns the current time and then advances it by `step`. Clones share the
/// same time, so a test can keep a handle to a clock it gave to a `Backend`.
#[derive(Debug, Clone)]
pub struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    step: Duration,
}

impl TestClock {
    /// A clock which advances one second every time it is read.
    pub fn stepping(start: DateTime<Utc>) -> Self {
        TestClock {
            now: Arc::new(Mutex::new(start)),
            step: Duration::seconds(1),
        }
    }

    /// A clock which always returns the same time until it is advanced manually.
    pub fn fixed(start: DateTime<Utc>) -> Self {
        TestClock {
            now: Arc::new(Mutex::new(start)),
            step: Duration::zero(),
        }
    }

    /// Move the time forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + duration;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        let mut now = self.now.lock().unwrap();
        let current = *now;
        *now = current + self.step;
        current
    }
}

/// The time test clocks start at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 14, 15, 9, 26).unwrap()
}

/// The wiki config used for testing.
///
/// Argon2id is too slow to use in every test, so this hashes with the legacy scheme.
pub fn test_config() -> WikiConfig {
    WikiConfig::default().password_scheme(PasswordScheme::LegacySha256)
}

/// Open a `Backend` over a fresh set of in-memory containers which reads time from `clock`.
pub fn open_backend(config: &WikiConfig, clock: TestClock) -> Backend<MemoryStore> {
    Backend::open(config, &MemoryConfig::new())
        .unwrap()
        .with_clock(clock)
}

#[fixture]
pub fn backend() -> Backend<MemoryStore> {
    open_backend(&test_config(), TestClock::stepping(start_time()))
}
