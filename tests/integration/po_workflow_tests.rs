/*!
 * End-to-end tests for gettext catalogs
 */

use yacat::catalog::{self, POFile};
use yacat::formats::{FormatHandler, HandlerSettings, PoHandler};
use yacat::providers::mock::MockProvider;
use yacat::translation::TranslationCache;

use crate::common::{self, find_entry, msgstr_of, read_po};

/// Comparable view of a catalog: every entry's identity, translations and flags
fn snapshot(po: &POFile) -> Vec<(Option<String>, String, Option<String>, Vec<String>, bool)> {
    po.entries
        .iter()
        .map(|e| {
            (
                e.msgctxt.clone(),
                e.msgid.clone(),
                e.msgstr.clone(),
                e.msgstr_plural.clone(),
                e.obsolete,
            )
        })
        .collect()
}

fn verbose_settings(checkpoint_every: usize) -> HandlerSettings {
    HandlerSettings {
        verbose: true,
        checkpoint_every,
        ..HandlerSettings::default()
    }
}

#[tokio::test]
async fn test_poWorkflow_withWorkingBackend_shouldTranslateEligibleEntries() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let provider = MockProvider::working();
    let mut handler = PoHandler::new(common::test_context(provider.clone()));

    let summary = handler.process_file(&input, &output, false, false).await.unwrap();

    assert_eq!(summary.total, 6);
    // The plural entry counts once even though both forms were translated
    assert_eq!(summary.translated, 4);
    assert_eq!(provider.request_count(), 6);

    let po = read_po(&output);
    assert_eq!(msgstr_of(&po, "Save"), "[fr] Save");
    assert_eq!(msgstr_of(&po, "Hello %(name)s!"), "[fr] Hello %(name)s!");
    assert_eq!(catalog::msgstr(find_entry(&po, Some("menu"), "Open")), "Ouvrir");

    let plural = find_entry(&po, None, "%d file");
    assert_eq!(catalog::plural_slot(plural, 0), "[fr] %d file");
    assert_eq!(catalog::plural_slot(plural, 1), "[fr] %d files");

    assert_eq!(
        msgstr_of(&po, "First line\nSecond line"),
        "[fr] First line\n[fr] Second line"
    );

    let old = find_entry(&po, None, "Old");
    assert!(old.obsolete);
    assert_eq!(catalog::msgstr(old), "Vieux");
}

#[tokio::test]
async fn test_poWorkflow_shouldKeepCommentsReferencesAndFlags() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let mut handler = PoHandler::new(common::test_context(MockProvider::working()));

    handler.process_file(&input, &output, false, false).await.unwrap();

    let po = read_po(&output);
    let save = find_entry(&po, None, "Save");
    assert_eq!(save.comment.as_deref(), Some("Shown on the toolbar"));
    assert_eq!(save.occurrences, vec![("app/views.py".to_string(), "12".to_string())]);

    let hello = find_entry(&po, None, "Hello %(name)s!");
    assert_eq!(hello.flags, vec!["python-format"]);
    assert_eq!(hello.occurrences.len(), 2);
}

#[tokio::test]
async fn test_poWorkflow_shouldRewriteHeadersForTargetLanguage() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let mut handler = PoHandler::new(common::test_context(MockProvider::working()));

    handler.process_file(&input, &output, false, false).await.unwrap();

    let po = read_po(&output);
    let header = po.header.as_deref().unwrap_or_default();
    assert!(header.contains("French translation of the demo app."), "{}", header);
    assert_eq!(catalog::metadata(&po, "Project-Id-Version"), Some("demo 1.0"));
    assert_eq!(catalog::metadata(&po, "Language"), Some("fr"));
    assert_eq!(
        catalog::metadata(&po, "Plural-Forms"),
        Some("nplurals=2; plural=(n > 1);")
    );
    assert_eq!(
        catalog::metadata(&po, "Content-Type"),
        Some("text/plain; charset=UTF-8")
    );
    assert_eq!(catalog::metadata(&po, "Content-Transfer-Encoding"), Some("8bit"));
}

#[tokio::test]
async fn test_poWorkflow_withResume_shouldBeStableOnSecondRun() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");

    let mut first = PoHandler::new(common::test_context(MockProvider::working()));
    first.process_file(&input, &output, false, false).await.unwrap();
    let after_first = read_po(&output);

    let provider = MockProvider::working();
    let mut second = PoHandler::new(common::test_context(provider.clone()));
    let summary = second.process_file(&input, &output, false, true).await.unwrap();

    assert_eq!(summary.total, 6);
    assert_eq!(summary.translated, 0);
    assert_eq!(provider.request_count(), 0);
    let after_second = read_po(&output);
    assert_eq!(snapshot(&after_second), snapshot(&after_first));
    assert_eq!(after_second.metadata, after_first.metadata);
}

#[tokio::test]
async fn test_poWorkflow_withoutSkipTranslated_shouldRetranslateExistingEntries() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let settings = HandlerSettings {
        skip_translated: false,
        ..HandlerSettings::default()
    };
    let mut handler = PoHandler::new(common::test_context_with(
        MockProvider::working(),
        settings,
        TranslationCache::new(),
    ));

    let summary = handler.process_file(&input, &output, false, false).await.unwrap();

    assert_eq!(summary.translated, 5);
    let po = read_po(&output);
    assert_eq!(catalog::msgstr(find_entry(&po, Some("menu"), "Open")), "[fr] Ouvrir");
}

#[tokio::test]
async fn test_poWorkflow_withFailingBackend_shouldKeepEntriesAndStillWrite() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let mut handler = PoHandler::new(common::test_context(MockProvider::failing()));

    let summary = handler.process_file(&input, &output, false, false).await.unwrap();

    assert_eq!(summary.total, 6);
    assert_eq!(summary.translated, 0);
    assert!(handler.context().cache().is_empty());

    let po = read_po(&output);
    assert_eq!(msgstr_of(&po, "Save"), "");
    let plural = find_entry(&po, None, "%d file");
    assert!(plural.msgstr_plural.iter().all(|v| v.is_empty()));
}

#[tokio::test]
async fn test_poWorkflow_afterPartialFailure_shouldKeepTranslatedLinesAndRetryTheRest() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let cache_path = dir.path().join("cache.json");

    // Every second request fails: Save, the singular form and the first line get through
    let flaky = MockProvider::intermittent(2);
    let mut first = PoHandler::new(common::test_context_with(
        flaky,
        HandlerSettings::default(),
        TranslationCache::load(Some(&cache_path)),
    ));
    let summary = first.process_file(&input, &output, false, false).await.unwrap();
    assert_eq!(summary.translated, 2);
    assert_eq!(TranslationCache::load(Some(&cache_path)).len(), 3);

    let po = read_po(&output);
    assert_eq!(msgstr_of(&po, "Hello %(name)s!"), "");
    assert_eq!(
        msgstr_of(&po, "First line\nSecond line"),
        "[fr] First line\nSecond line"
    );
    let plural = find_entry(&po, None, "%d file");
    assert!(plural.msgstr_plural.iter().all(|v| v.is_empty()));

    let provider = MockProvider::working();
    let mut second = PoHandler::new(common::test_context_with(
        provider.clone(),
        HandlerSettings::default(),
        TranslationCache::load(Some(&cache_path)),
    ));
    let summary = second.process_file(&input, &output, false, true).await.unwrap();

    // Hello and the plural form of the plural entry; the singular form is cached
    assert_eq!(summary.translated, 2);
    assert_eq!(provider.request_count(), 2);
    let po = read_po(&output);
    assert_eq!(msgstr_of(&po, "Hello %(name)s!"), "[fr] Hello %(name)s!");
    assert_eq!(catalog::plural_slot(find_entry(&po, None, "%d file"), 1), "[fr] %d files");
}

#[tokio::test]
async fn test_poWorkflow_withDryRun_shouldFlushCacheAtCheckpointsButNotWriteOutput() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let output = dir.path().join("fr.po");
    let cache_path = dir.path().join("cache.json");
    let mut handler = PoHandler::new(common::test_context_with(
        MockProvider::working(),
        verbose_settings(2),
        TranslationCache::load(Some(&cache_path)),
    ));

    let summary = handler.process_file(&input, &output, true, false).await.unwrap();

    assert_eq!(summary.translated, 4);
    assert!(!output.exists());
    let cache = TranslationCache::load(Some(&cache_path));
    assert_eq!(cache.len(), 6);
    assert_eq!(cache.get("Hello __PH_0__!"), Some("[fr] Hello __PH_0__!"));
}

#[tokio::test]
async fn test_poWorkflow_withCheckpointsDisabled_shouldNotWriteCacheOnDryRun() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let cache_path = dir.path().join("cache.json");
    let mut handler = PoHandler::new(common::test_context_with(
        MockProvider::working(),
        verbose_settings(0),
        TranslationCache::load(Some(&cache_path)),
    ));

    handler.process_file(&input, &dir.path().join("fr.po"), true, false).await.unwrap();

    assert!(!cache_path.exists());
    assert_eq!(handler.context().cache().len(), 6);
}

#[tokio::test]
async fn test_poWorkflow_withNewEntriesInSource_shouldMergeIntoPreviousOutput() {
    let dir = common::create_temp_dir().unwrap();
    let output = common::create_test_file(
        dir.path(),
        "fr.po",
        "msgid \"\"\nmsgstr \"\"\n\"Language: fr\\n\"\n\nmsgid \"Save\"\nmsgstr \"Enregistrer\"\n",
    )
    .unwrap();
    let input = common::create_sample_po(dir.path(), "en.po").unwrap();
    let provider = MockProvider::working();
    let mut handler = PoHandler::new(common::test_context(provider.clone()));

    let summary = handler.process_file(&input, &output, false, true).await.unwrap();

    assert_eq!(summary.translated, 3);
    let po = read_po(&output);
    assert_eq!(po.entries[0].msgid, "Save");
    assert_eq!(catalog::msgstr(&po.entries[0]), "Enregistrer");
    assert_eq!(po.entries.len(), 6);
    assert_eq!(
        catalog::metadata(&po, "Plural-Forms"),
        Some("nplurals=2; plural=(n > 1);")
    );
}
