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

/// The key prefix of history entries in the content container.
pub const HISTORY_PREFIX: &str = "history/";

/// The key prefix of author images in the content container.
pub const AUTHOR_IMAGES_PREFIX: &str = "authorImages/";

/// File extensions of blobs which are served as images rather than pages.
const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Return whether the blob `key` in the content container is an image.
///
/// The extension is matched case-insensitively.
pub fn is_image(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|extension| key.ends_with(extension))
}

/// Return whether the blob `key` in the content container is the current version of a page.
pub fn is_page(key: &str) -> bool {
    !key.starts_with(HISTORY_PREFIX) && !key.starts_with(AUTHOR_IMAGES_PREFIX) && !is_image(key)
}

/// The number of digits in the timestamp of a history key.
const TIMESTAMP_DIGITS: usize = 14;

/// Return whether `name` contains a `-` followed by a history timestamp.
///
/// The history keys of such a page would also parse as history keys of the page named by the
/// part before the `-`.
fn has_timestamp_segment(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.iter().enumerate().any(|(index, &byte)| {
        let tail = &bytes[index + 1..];
        byte == b'-'
            && tail.len() >= TIMESTAMP_DIGITS
            && tail[..TIMESTAMP_DIGITS].iter().all(u8::is_ascii_digit)
            && tail.get(TIMESTAMP_DIGITS).map_or(true, |&next| next == b'-')
    })
}

/// Check that `name` can be used to store a page or an image.
///
/// # Errors
/// - `Error::InvalidName`: The name is empty, is inside the history namespace, or contains a
/// `-` followed by fourteen digits and then `-` or the end of the name.
pub(crate) fn validate_name(name: &str) -> crate::Result<()> {
    if name.is_empty() || name.starts_with(HISTORY_PREFIX) || has_timestamp_segment(name) {
        return Err(crate::Error::InvalidName(name.to_owned()));
    }
    Ok(())
}
