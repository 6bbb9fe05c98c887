/*!
 * Catalog format handlers.
 *
 * Every supported file format implements [`FormatHandler`]: load the input,
 * optionally merge an earlier output (resume), translate entry by entry and
 * save. The shared pieces (settings, backend, cache, run statistics and
 * progress reporting) live in [`HandlerContext`], which each handler owns.
 *
 * - `po`: gettext catalogs
 * - `transifex`: flat Transifex JSON key/value files
 */

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use indicatif::ProgressBar;
use log::{info, warn};

use crate::errors::HandlerError;
use crate::providers::Provider;
use crate::translation::{TextTranslation, TranslationCache, TranslationStats, translate_text};

pub use self::po::PoHandler;
pub use self::transifex::TransifexHandler;

pub mod po;
pub mod transifex;

/// Options shared by all handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    /// Source language code
    pub source_language: String,
    /// Target language code, written into PO headers
    pub target_language: String,
    /// Leave entries that already carry a translation alone
    pub skip_translated: bool,
    /// Per-entry reporting and checkpoints
    pub verbose: bool,
    /// Checkpoint interval in entries; 0 disables checkpoints
    pub checkpoint_every: usize,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            skip_translated: true,
            verbose: false,
            checkpoint_every: 50,
        }
    }
}

/// Handler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Created,
    Loaded,
    Translated,
    Saved,
}

/// Outcome of a handler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Entries visited
    pub total: usize,
    /// Entries whose translation changed
    pub translated: usize,
}

/// Settings, backend, cache and progress reporting for one handler
pub struct HandlerContext {
    settings: HandlerSettings,
    provider: Arc<dyn Provider>,
    cache: TranslationCache,
    stats: TranslationStats,
    progress: Option<ProgressBar>,
}

impl HandlerContext {
    /// Create a context around a backend and a (possibly empty) cache
    pub fn new(
        settings: HandlerSettings,
        provider: Arc<dyn Provider>,
        cache: TranslationCache,
    ) -> Self {
        Self {
            settings,
            provider,
            cache,
            stats: TranslationStats::default(),
            progress: None,
        }
    }

    /// Attach a progress bar advanced once per entry
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn stats(&self) -> &TranslationStats {
        &self.stats
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Translate one value through the shared cache and record its outcome
    pub async fn translate(&mut self, text: &str) -> TextTranslation {
        let result = translate_text(text, self.provider.as_ref(), Some(&mut self.cache)).await;
        self.stats.record(&result);
        result
    }

    pub(crate) fn start_progress(&self, total: usize) {
        if let Some(progress) = &self.progress {
            progress.set_length(total as u64);
            progress.set_position(0);
        }
    }

    pub(crate) fn advance(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }

    pub(crate) fn finish_progress(&self) {
        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }
    }

    /// Report progress and flush the cache every `checkpoint_every` entries in verbose mode.
    ///
    /// A failed flush is logged and the run goes on; the final save reports it again.
    pub(crate) fn checkpoint(&self, index: usize, summary: &TranslationSummary) {
        let every = self.settings.checkpoint_every;
        if !self.settings.verbose || every == 0 || index % every != 0 {
            return;
        }

        info!("[PROGRESS] {}/{} translated so far...", summary.translated, summary.total);
        if let Err(e) = self.cache.save() {
            warn!("Checkpoint could not save the translation cache: {}", e);
        }
    }

    /// Write the cache to its file, if it has one
    pub(crate) fn persist_cache(&self) -> std::io::Result<()> {
        self.cache.save()
    }
}

/// A catalog format that can be loaded, translated and saved
#[async_trait]
pub trait FormatHandler: Send {
    /// Read and validate the input file
    fn load(&mut self, input: &Path) -> Result<(), HandlerError>;

    /// Merge a previous output so a run can resume; missing files are ignored
    fn load_existing_output(&mut self, _output: &Path) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Translate the loaded content
    async fn translate(&mut self) -> Result<TranslationSummary, HandlerError>;

    /// Write the translated content, or only report the destination on a dry run
    fn save(&mut self, output: &Path, dry_run: bool) -> Result<(), HandlerError>;

    /// Current lifecycle state
    fn state(&self) -> HandlerState;

    /// Shared context, for statistics after a run
    fn context(&self) -> &HandlerContext;

    /// Load, optionally resume, translate and save
    async fn process_file(
        &mut self,
        input: &Path,
        output: &Path,
        dry_run: bool,
        resume: bool,
    ) -> Result<TranslationSummary, HandlerError> {
        self.load(input)?;
        if resume {
            self.load_existing_output(output)?;
        }
        let summary = self.translate().await?;
        self.save(output, dry_run)?;
        Ok(summary)
    }
}

/// Supported catalog formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// Gettext `.po` / `.pot`
    Po,
    /// Transifex key/value JSON
    Transifex,
}

impl CatalogFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        match extension.as_str() {
            "po" | "pot" => Some(Self::Po),
            "json" => Some(Self::Transifex),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Po => "gettext PO",
            Self::Transifex => "Transifex JSON",
        }
    }

    /// Build the handler for this format
    pub fn create_handler(self, context: HandlerContext) -> Box<dyn FormatHandler> {
        match self {
            Self::Po => Box::new(PoHandler::new(context)),
            Self::Transifex => Box::new(TransifexHandler::new(context)),
        }
    }
}

/// Single-line preview of `text`, cut to `max_chars` with a trailing `...`
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

pub(crate) fn lifecycle_error(operation: &'static str, required: &'static str) -> HandlerError {
    HandlerError::Lifecycle { operation, required }
}
