/*!
 * Tests for translation cache functionality
 */

use std::fs;

use yacat::translation::TranslationCache;

use crate::common;

#[test]
fn test_cache_load_withMissingFile_shouldBeEmptyAndKeepPath() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("cache.json");

    let cache = TranslationCache::load(Some(&path));

    assert!(cache.is_empty());
    assert_eq!(cache.path(), Some(path.as_path()));
}

#[test]
fn test_cache_load_withCorruptFile_shouldBeEmpty() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "cache.json", "{ not json").unwrap();

    let cache = TranslationCache::load(Some(&path));

    assert!(cache.is_empty());
}

#[test]
fn test_cache_load_withNonObjectRoot_shouldBeEmpty() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "cache.json", "[\"a\", \"b\"]").unwrap();

    assert!(TranslationCache::load(Some(&path)).is_empty());
}

#[test]
fn test_cache_load_withNonStringValues_shouldStringifyThem() {
    let dir = common::create_temp_dir().unwrap();
    let content = r#"{"Save": "Enregistrer", "answer": 42}"#;
    let path = common::create_test_file(dir.path(), "cache.json", content).unwrap();

    let cache = TranslationCache::load(Some(&path));

    assert_eq!(cache.get("Save"), Some("Enregistrer"));
    assert_eq!(cache.get("answer"), Some("42"));
}

#[test]
fn test_cache_save_thenLoad_shouldRestoreEntries() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("nested").join("cache.json");

    let mut cache = TranslationCache::load(Some(&path));
    cache.insert("Hello __PH_0__", "Bonjour __PH_0__");
    cache.insert("Été", "Summer");
    cache.save().unwrap();

    let reloaded = TranslationCache::load(Some(&path));
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("Hello __PH_0__"), Some("Bonjour __PH_0__"));
    assert_eq!(reloaded.get("Été"), Some("Summer"));
}

#[test]
fn test_cache_save_withoutPath_shouldBeNoOp() {
    let mut cache = TranslationCache::new();
    cache.insert("a", "b");
    assert!(cache.save().is_ok());
    assert!(cache.path().is_none());
}

#[test]
fn test_cache_save_whenWriteFails_shouldKeepPreviousFile() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("cache.json");

    let mut cache = TranslationCache::load(Some(&path));
    cache.insert("Save", "Enregistrer");
    cache.save().unwrap();
    let before = fs::read_to_string(&path).unwrap();

    // A parent that is a regular file makes the write fail before touching anything
    cache.insert("Quit", "Quitter");
    let blocked = path.join("cache.json");
    assert!(cache.save_to(&blocked).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_cache_save_whenRenameFails_shouldLeaveNoTemporaryFile() {
    let dir = common::create_temp_dir().unwrap();
    // The destination is a non-empty directory, so the final rename is refused
    let destination = dir.path().join("cache.json");
    fs::create_dir(&destination).unwrap();
    common::create_test_file(&destination, "keep.txt", "keep").unwrap();

    let mut cache = TranslationCache::new();
    cache.insert("Save", "Enregistrer");
    assert!(cache.save_to(&destination).is_err());

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1, "only the original directory should remain: {:?}", names);
    assert!(destination.join("keep.txt").exists());
}
