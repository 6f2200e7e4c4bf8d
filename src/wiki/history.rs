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

use std::str;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::content::HISTORY_PREFIX;

/// The format of the timestamp embedded in a history key.
///
/// This is fixed width and zero padded, so sorting keys sorts them chronologically.
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The number of characters in a formatted key timestamp.
const KEY_TIMESTAMP_LEN: usize = 14;

/// The format used to show a timestamp to a reader.
const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The suffix of every history key.
const HISTORY_SUFFIX: &str = ".txt";

/// Return the prefix shared by the keys of every history entry of `page_name`.
pub(crate) fn history_prefix(page_name: &str) -> String {
    format!("{}{}-", HISTORY_PREFIX, page_name)
}

/// Return the key of the history entry of `page_name` saved by `author` at `timestamp`.
pub(crate) fn history_key(page_name: &str, timestamp: DateTime<Utc>, author: &str) -> String {
    format!(
        "{}{}-{}{}",
        history_prefix(page_name),
        timestamp.format(KEY_TIMESTAMP_FORMAT),
        author,
        HISTORY_SUFFIX
    )
}

/// Parse a key timestamp, rejecting anything which isn't exactly `YYYYMMDDHHMMSS`.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.len() != KEY_TIMESTAMP_LEN || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(value, KEY_TIMESTAMP_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// An entry in the history of a page.
///
/// Each entry holds the content a page had before one of its saves. Entries are named by the
/// time of that save and the author who made it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    key: String,
    timestamp: DateTime<Utc>,
    author: String,
}

impl HistoryEntry {
    /// Parse the history `key` of `page_name`.
    ///
    /// This returns `None` if the key is not a well-formed history key of that page.
    pub(crate) fn parse(page_name: &str, key: &str) -> Option<Self> {
        let rest = key
            .strip_prefix(&history_prefix(page_name))?
            .strip_suffix(HISTORY_SUFFIX)?;
        let (timestamp, author) = rest.split_once('-')?;
        if author.is_empty() {
            return None;
        }

        Some(HistoryEntry {
            key: key.to_owned(),
            timestamp: parse_timestamp(timestamp)?,
            author: author.to_owned(),
        })
    }

    /// The key of the blob holding this entry's content.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// When the save which produced this entry happened, to the second.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The timestamp formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
    }

    /// The author of the save which produced this entry.
    pub fn author(&self) -> &str {
        &self.author
    }
}

/// The most recent previous version of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousVersion {
    entry: HistoryEntry,
    content: Vec<u8>,
}

impl PreviousVersion {
    pub(crate) fn new(entry: HistoryEntry, content: Vec<u8>) -> Self {
        PreviousVersion { entry, content }
    }

    /// The history entry this version was read from.
    pub fn entry(&self) -> &HistoryEntry {
        &self.entry
    }

    /// The content of the page at this version.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content of the page at this version as text, or `None` if it isn't valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        str::from_utf8(&self.content).ok()
    }

    /// When this version was replaced.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.entry.timestamp()
    }

    /// The author who replaced this version.
    pub fn author(&self) -> &str {
        self.entry.author()
    }

    /// Consume this value and return its content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap()
    }

    #[test]
    fn key_embeds_page_timestamp_and_author() {
        assert_eq!(
            history_key("Home", timestamp(), "alice"),
            "history/Home-20230405060708-alice.txt"
        );
    }

    #[test]
    fn parse_recovers_timestamp_and_author() {
        let entry = HistoryEntry::parse("Home", "history/Home-20230405060708-alice.txt").unwrap();
        assert_eq!(entry.key(), "history/Home-20230405060708-alice.txt");
        assert_eq!(entry.timestamp(), timestamp());
        assert_eq!(entry.display_timestamp(), "2023-04-05 06:07:08");
        assert_eq!(entry.author(), "alice");
    }

    #[test]
    fn parse_keeps_dashes_in_page_and_author() {
        let key = history_key("how-to", timestamp(), "mary-jane");
        let entry = HistoryEntry::parse("how-to", &key).unwrap();
        assert_eq!(entry.author(), "mary-jane");
    }

    #[test]
    fn parse_rejects_entries_of_other_pages() {
        let key = history_key("foo-bar", timestamp(), "alice");
        assert_eq!(HistoryEntry::parse("foo", &key), None);
        assert_eq!(HistoryEntry::parse("fo", &key), None);
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert_eq!(HistoryEntry::parse("Home", "history/Home-1-alice.txt"), None);
        assert_eq!(
            HistoryEntry::parse("Home", "history/Home-20230405060708-alice"),
            None
        );
        assert_eq!(
            HistoryEntry::parse("Home", "history/Home-20230405060708-.txt"),
            None
        );
        assert_eq!(
            HistoryEntry::parse("Home", "history/Home-20231345060708-alice.txt"),
            None
        );
        assert_eq!(
            HistoryEntry::parse("Home", "history/Home-2023040506070x-alice.txt"),
            None
        );
    }

    #[test]
    fn keys_sort_chronologically() {
        let earlier = history_key("Home", timestamp(), "zed");
        let later = history_key(
            "Home",
            Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap(),
            "alice",
        );
        assert!(earlier < later);
    }
}
