/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;
use yacat::app_config::{Config, TranslationProvider};
use yacat::app_controller::{Controller, TranslationJob};
use yacat::errors::{AppError, HandlerError};
use yacat::formats::CatalogFormat;
use yacat::providers::mock::MockProvider;
use crate::common;

fn config_with_cache(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.handler.cache_file = Some(dir.join("cache").join("fr.json"));
    config
}

/// Test the controller with custom configuration
#[test]
fn test_controller_with_custom_config_shouldInitializeWithoutErrors() -> Result<()> {
    let mut config = Config::default();
    config.source_language = "es".to_string();
    config.target_language = "de".to_string();

    let controller = Controller::with_config(config)?;

    assert_eq!(controller.config().source_language, "es");
    assert_eq!(controller.config().target_language, "de");
    Ok(())
}

/// Test that both configured backends can be built
#[test]
fn test_build_provider_withEachBackend_shouldUseItsName() -> Result<()> {
    let mut config = Config::default();
    assert_eq!(Controller::with_config(config.clone())?.build_provider()?.name(), "google");

    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(Controller::with_config(config)?.build_provider()?.name(), "ollama");
    Ok(())
}

/// Test a full run, then a second run served entirely from the cache
#[tokio::test]
async fn test_run_withPersistentCache_shouldNotCallBackendTwice() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_po(temp_dir.path(), "en.po")?;
    let controller = Controller::with_config(config_with_cache(temp_dir.path()))?;

    let first_provider = MockProvider::working();
    let first = controller
        .run_with_provider(
            TranslationJob::new(&input, temp_dir.path().join("first.po")),
            Arc::new(first_provider.clone()),
        )
        .await?;
    assert_eq!(first.translated, 4);
    assert_eq!(first_provider.request_count(), 6);

    let second_provider = MockProvider::working();
    let second = controller
        .run_with_provider(
            TranslationJob::new(&input, temp_dir.path().join("second.po")),
            Arc::new(second_provider.clone()),
        )
        .await?;
    assert_eq!(second.translated, 4);
    assert_eq!(second_provider.request_count(), 0);

    let translations = |name: &str| {
        common::read_po(&temp_dir.path().join(name))
            .entries
            .into_iter()
            .map(|e| (e.msgid, e.msgstr, e.msgstr_plural))
            .collect::<Vec<_>>()
    };
    assert_eq!(translations("first.po"), translations("second.po"));
    Ok(())
}

/// Test dry run functionality
#[tokio::test]
async fn test_run_withDryRun_shouldNotProduceOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_json(temp_dir.path(), "en.json")?;
    let output = temp_dir.path().join("fr.json");
    let controller = Controller::with_config(Config::default())?;

    let summary = controller
        .run_with_provider(
            TranslationJob::new(&input, &output).dry_run(true).verbose(true),
            Arc::new(MockProvider::working()),
        )
        .await?;

    assert_eq!(summary.translated, 3);
    assert!(!output.exists());
    Ok(())
}

/// Test that an explicit format wins over the file extension
#[tokio::test]
async fn test_run_withExplicitFormat_shouldIgnoreExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "catalog.txt", common::SAMPLE_PO)?;
    let output = temp_dir.path().join("catalog.fr.txt");
    let controller = Controller::with_config(Config::default())?;

    let summary = controller
        .run_with_provider(
            TranslationJob::new(&input, &output).with_format(CatalogFormat::Po),
            Arc::new(MockProvider::working()),
        )
        .await?;

    assert_eq!(summary.total, 6);
    assert!(output.exists());
    Ok(())
}

/// Test that an unknown extension is rejected before anything runs
#[tokio::test]
async fn test_run_withUnknownExtension_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "catalog.txt", "hello")?;
    let provider = MockProvider::working();
    let controller = Controller::with_config(Config::default())?;

    let result = controller
        .run_with_provider(
            TranslationJob::new(&input, temp_dir.path().join("out.txt")),
            Arc::new(provider.clone()),
        )
        .await;

    assert!(matches!(result, Err(AppError::File(_))));
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

/// Test that a missing input surfaces as a handler error
#[tokio::test]
async fn test_run_withMissingInput_shouldReturnInputNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let result = controller
        .run_with_provider(
            TranslationJob::new(temp_dir.path().join("missing.po"), temp_dir.path().join("fr.po")),
            Arc::new(MockProvider::working()),
        )
        .await;

    assert!(matches!(result, Err(AppError::Handler(HandlerError::InputNotFound(_)))));
    Ok(())
}
