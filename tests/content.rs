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

use maplit::hashset;

use wiki_store::store::MemoryStore;
use wiki_store::wiki::Backend;
use wiki_store::Error;

use common::*;

mod common;

#[rstest]
fn get_missing_page_fails(mut backend: Backend<MemoryStore>) {
    assert_that!(backend.get_page("Missing")).is_err_variant(Error::NotFound(String::new()));
    assert_that!(backend.get_page("Missing"))
        .is_err_with_message("No page exists with the given name: Missing");
}

#[rstest]
fn uploaded_content_is_returned_verbatim(mut backend: Backend<MemoryStore>) -> anyhow::Result<()> {
    let data = random_buffer();
    backend.upload("notes.txt", &data)?;

    assert_that!(backend.get_page("notes.txt")?).is_equal_to(data);

    Ok(())
}

#[rstest]
fn upload_never_overwrites(mut backend: Backend<MemoryStore>) -> anyhow::Result<()> {
    backend.upload("Home", b"Welcome")?;

    assert_that!(backend.upload("Home", b"Replaced"))
        .is_err_variant(Error::AlreadyExists(String::new()));
    assert_that!(backend.upload("Home", b"Replaced"))
        .is_err_with_message("Home already exists in the content bucket!");
    assert_that!(backend.get_page("Home")?).is_equal_to(b"Welcome".to_vec());

    Ok(())
}

#[rstest]
fn upload_rejects_unusable_names(mut backend: Backend<MemoryStore>) {
    assert_that!(backend.upload("", b"data")).is_err_variant(Error::InvalidName(String::new()));
    assert_that!(backend.upload("history/Home-20210314150926-alice.txt", b"data"))
        .is_err_variant(Error::InvalidName(String::new()));
}

#[rstest]
fn list_page_names_hides_images_and_history(
    mut backend: Backend<MemoryStore>,
) -> anyhow::Result<()> {
    backend.upload("a", b"page a")?;
    backend.upload("b.png", b"image")?;
    backend.upload("c.JPEG", b"image")?;
    backend.upload("d.jpg", b"image")?;
    backend.upload("authorImages/alice", b"image")?;
    backend.save_page("e", b"first", "alice")?;
    backend.save_page("e", b"second", "alice")?;

    let names = backend.list_page_names()?;

    assert_that!(names.iter().cloned().collect::<std::collections::HashSet<_>>())
        .is_equal_to(hashset! { String::from("a"), String::from("e") });

    Ok(())
}

#[rstest]
fn get_image_substitutes_empty_for_missing(
    mut backend: Backend<MemoryStore>,
) -> anyhow::Result<()> {
    assert_that!(backend.get_image("missing.png")?).is_equal_to(Vec::new());

    let image = random_buffer();
    backend.upload("authorImages/alice.png", &image)?;
    assert_that!(backend.get_image("authorImages/alice.png")?).is_equal_to(image);

    Ok(())
}

#[test]
fn containers_are_shared_between_backends() -> anyhow::Result<()> {
    let config = test_config();
    let stores = wiki_store::store::MemoryConfig::new();

    let mut first = Backend::open(&config, &stores)?;
    first.sign_up("alice", "hunter2")?;
    first.upload("Home", b"Welcome")?;
    drop(first);

    let mut second = Backend::open(&config, &stores)?;
    assert_that!(second.sign_in("alice", "hunter2")).is_ok();
    assert_that!(second.get_page("Home")?).is_equal_to(b"Welcome".to_vec());

    Ok(())
}

#[test]
fn custom_container_names_are_used() -> anyhow::Result<()> {
    let mut config = test_config();
    config.content_container = String::from("wiki-pages");
    let stores = wiki_store::store::MemoryConfig::new();

    let mut backend = Backend::open(&config, &stores)?;
    backend.upload("Home", b"Welcome")?;

    let mut default_backend = Backend::open(&test_config(), &stores)?;
    assert_that!(default_backend.list_page_names()?).is_empty();
    assert_that!(backend.list_page_names()?).is_equal_to(vec![String::from("Home")]);

    Ok(())
}

#[test]
fn backend_accepts_boxed_stores() -> anyhow::Result<()> {
    use wiki_store::store::{DataStore, OpenStore};

    let stores = wiki_store::store::MemoryConfig::new();
    let boxed = |name: &str| -> anyhow::Result<Box<dyn DataStore>> {
        Ok(Box::new(stores.open(name)?))
    };

    let mut backend = Backend::new(
        boxed("users")?,
        boxed("admins")?,
        boxed("content")?,
        &test_config(),
    );
    backend.save_page("Home", b"Welcome", "alice")?;

    let (_, _, mut content) = backend.into_stores();
    assert_that!(content.read_blob("Home")?).is_equal_to(Some(b"Welcome".to_vec()));

    Ok(())
}
