use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TranslationProvider};
use crate::errors::AppError;
use crate::formats::{CatalogFormat, HandlerContext, TranslationSummary};
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::google::GoogleTranslate;
use crate::providers::ollama::Ollama;
use crate::translation::TranslationCache;

// @module: Application controller for catalog translation

/// One catalog to translate
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationJob {
    /// Catalog to read
    pub input: PathBuf,
    /// Catalog to write (and to resume from)
    pub output: PathBuf,
    /// Explicit format; detected from the input extension when absent
    pub format: Option<CatalogFormat>,
    /// Do everything except writing files
    pub dry_run: bool,
    /// Merge an existing output before translating
    pub resume: bool,
    /// Per-entry reporting instead of a progress bar
    pub verbose: bool,
}

impl TranslationJob {
    // @creates: Job with default flags
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            format: None,
            dry_run: false,
            resume: false,
            verbose: false,
        }
    }

    pub fn with_format(mut self, format: CatalogFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Main application controller for catalog translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the backend selected in the configuration
    pub fn build_provider(&self) -> Result<Arc<dyn Provider>, AppError> {
        let translation = &self.config.translation;
        let common = &translation.common;

        let provider: Arc<dyn Provider> = match translation.provider {
            TranslationProvider::Google => Arc::new(GoogleTranslate::new_with_config(
                &self.config.source_language,
                &self.config.target_language,
                translation.get_endpoint(),
                translation.get_timeout_secs(),
                common.retry_count,
                common.retry_backoff_ms,
                translation.get_rate_limit(),
            )),
            TranslationProvider::Ollama => Arc::new(Ollama::new_with_config(
                translation.get_endpoint(),
                translation.get_model(),
                &common.system_prompt,
                &self.config.source_language,
                &self.config.target_language,
                common.temperature,
                translation.get_timeout_secs(),
                common.retry_count,
                common.retry_backoff_ms,
                translation.get_rate_limit(),
            )),
        };

        Ok(provider)
    }

    /// Run a job with the configured backend
    pub async fn run(&self, job: TranslationJob) -> Result<TranslationSummary, AppError> {
        let provider = self.build_provider()?;
        if let Err(e) = provider.test_connection().await {
            warn!(
                "{} backend check failed: {}",
                self.config.translation.provider.display_name(),
                e
            );
        }
        self.run_with_provider(job, provider).await
    }

    /// Run a job with an explicit backend
    pub async fn run_with_provider(
        &self,
        job: TranslationJob,
        provider: Arc<dyn Provider>,
    ) -> Result<TranslationSummary, AppError> {
        let start_time = Instant::now();

        let format = job
            .format
            .or_else(|| CatalogFormat::from_path(&job.input))
            .ok_or_else(|| {
                AppError::File(format!(
                    "Cannot detect the catalog format of {:?} (expected .po, .pot or .json)",
                    job.input
                ))
            })?;

        info!(
            "yacat: {} catalog, {} -> {} via {}",
            format.display_name(),
            Self::language_label(&self.config.source_language),
            Self::language_label(&self.config.target_language),
            provider.name()
        );

        let cache = TranslationCache::load(self.config.handler.cache_file.as_deref());
        if !cache.is_empty() {
            info!("Loaded {} cached translations", cache.len());
        }

        let settings = self.config.handler_settings(job.verbose);
        let mut context = HandlerContext::new(settings, provider, cache);
        if !job.verbose {
            context = context.with_progress(Self::progress_bar());
        }

        let mut handler = format.create_handler(context);
        let summary = handler
            .process_file(&job.input, &job.output, job.dry_run, job.resume)
            .await?;

        let stats = handler.context().stats();
        if stats.fallbacks > 0 {
            warn!("{} line(s) kept their source text after backend errors", stats.fallbacks);
        }
        info!("Translation statistics: {}", stats.summary());
        debug!("Finished in {}", Self::format_duration(start_time.elapsed()));

        Ok(summary)
    }

    fn language_label(code: &str) -> String {
        match language_utils::get_language_name(code) {
            Ok(name) => format!("{} ({})", name, code),
            Err(_) => code.to_string(),
        }
    }

    fn progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                 {pos}/{len} entries ({percent}%) {msg} {eta}",
            )
            .or_else(|_| {
                ProgressStyle::default_bar().template(
                    "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}",
                )
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");
        progress_bar
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
