/*!
 * Gettext `.po` handler.
 *
 * The output catalog is built next to the input: entries are matched by
 * `(msgctxt, msgid)`, new ones are cloned from the input with all their
 * comments, references and flags, and only the `msgstr` slots are replaced.
 */

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::{
    FormatHandler, HandlerContext, HandlerState, TranslationSummary, lifecycle_error, snippet,
};
use crate::catalog::{self, EntryKey, POEntry, POFile};
use crate::errors::HandlerError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::FallbackReason;

/// What happened to one entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryOutcome {
    /// Not eligible: header-like, obsolete or already translated
    Skipped,
    /// Translated, but the text is the same as before
    Unchanged,
    /// Translated and changed
    Translated,
    /// Committed, but some lines kept their source text
    Partial { changed: bool, reason: FallbackReason },
    /// No line could be translated; the entry is left as it was
    Failed(FallbackReason),
}

impl EntryOutcome {
    fn committed(changed: bool, fallback: Option<&FallbackReason>) -> Self {
        match fallback {
            Some(reason) => Self::Partial {
                changed,
                reason: reason.clone(),
            },
            None if changed => Self::Translated,
            None => Self::Unchanged,
        }
    }

    fn is_change(&self) -> bool {
        matches!(self, Self::Translated | Self::Partial { changed: true, .. })
    }
}

/// Handler for gettext catalogs
pub struct PoHandler {
    context: HandlerContext,
    state: HandlerState,
    input: Option<POFile>,
    /// Header and metadata of the input, used when no earlier output is resumed
    template: Option<POFile>,
    output: Option<POFile>,
}

impl PoHandler {
    pub fn new(context: HandlerContext) -> Self {
        Self {
            context,
            state: HandlerState::Created,
            input: None,
            template: None,
            output: None,
        }
    }

    /// The catalog that `save` writes, once built
    pub fn output(&self) -> Option<&POFile> {
        self.output.as_ref()
    }

    /// Force the target language headers, keeping existing encoding headers
    fn update_headers(file: &mut POFile, target_language: &str) {
        catalog::set_metadata(file, "Language", target_language);
        if let Some(rule) = language_utils::plural_forms_for(target_language) {
            catalog::set_metadata(file, "Plural-Forms", rule);
        }
        catalog::set_default_metadata(file, "Content-Type", "text/plain; charset=utf-8");
        catalog::set_default_metadata(file, "Content-Transfer-Encoding", "8bit");
    }
}

/// Translate one entry in place
async fn translate_entry(context: &mut HandlerContext, entry: &mut POEntry) -> EntryOutcome {
    if entry.msgid.is_empty() || entry.obsolete {
        return EntryOutcome::Skipped;
    }
    if context.settings().skip_translated && catalog::has_translation(entry) {
        return EntryOutcome::Skipped;
    }

    let Some(msgid_plural) = entry.msgid_plural.clone() else {
        let previous = catalog::msgstr(entry).to_string();
        let source = if previous.trim().is_empty() {
            entry.msgid.clone()
        } else {
            previous.clone()
        };

        let result = context.translate(&source).await;
        if result.is_total_fallback() {
            if let Some(reason) = result.fallback_reason() {
                return EntryOutcome::Failed(reason.clone());
            }
        }

        let changed = previous.trim() != result.text.trim();
        let outcome = EntryOutcome::committed(changed, result.fallback_reason());
        entry.msgstr = Some(result.text);
        return outcome;
    };

    let existing = |index: usize| {
        let slot = catalog::plural_slot(entry, index).trim();
        (!slot.is_empty()).then(|| slot.to_string())
    };
    let singular_source = existing(0).unwrap_or_else(|| entry.msgid.clone());
    let plural_source = existing(1).unwrap_or(msgid_plural);

    let singular = context.translate(&singular_source).await;
    let plural = context.translate(&plural_source).await;
    for form in [&singular, &plural] {
        if form.is_total_fallback() {
            if let Some(reason) = form.fallback_reason() {
                return EntryOutcome::Failed(reason.clone());
            }
        }
    }

    let changed = [&singular.text, &plural.text]
        .iter()
        .enumerate()
        .any(|(index, text)| catalog::plural_slot(entry, index).trim() != text.trim());
    let outcome = EntryOutcome::committed(
        changed,
        singular.fallback_reason().or(plural.fallback_reason()),
    );
    catalog::set_plural_slot(entry, 0, singular.text);
    catalog::set_plural_slot(entry, 1, plural.text);
    outcome
}

/// `file:line` of the first reference, or `<no-ref>`
fn location(entry: &POEntry) -> String {
    match entry.occurrences.first() {
        Some((file, line)) if !file.is_empty() => format!("{}:{}", file, line),
        _ => "<no-ref>".to_string(),
    }
}

#[async_trait]
impl FormatHandler for PoHandler {
    fn load(&mut self, input: &Path) -> Result<(), HandlerError> {
        if !FileManager::file_exists(input) {
            return Err(HandlerError::InputNotFound(input.to_path_buf()));
        }

        let document = catalog::load(input)?;
        let mut template = catalog::load_header(input)?;
        Self::update_headers(&mut template, &self.context.settings().target_language);
        if self.context.settings().verbose {
            info!(
                "Loaded {} entries from {} (Language: {})",
                document.entries.len(),
                input.display(),
                catalog::metadata(&document, "Language").unwrap_or("unset")
            );
        }

        self.input = Some(document);
        self.template = Some(template);
        self.output = None;
        self.state = HandlerState::Loaded;
        Ok(())
    }

    fn load_existing_output(&mut self, output: &Path) -> Result<(), HandlerError> {
        if self.state != HandlerState::Loaded {
            return Err(lifecycle_error("load_existing_output", "load"));
        }
        if !FileManager::file_exists(output) {
            debug!("No previous output at {}, starting fresh", output.display());
            return Ok(());
        }

        if self.context.settings().verbose {
            info!("Resuming from existing output: {}", output.display());
        }
        let mut previous = catalog::load(output)?;
        Self::update_headers(&mut previous, &self.context.settings().target_language);
        self.output = Some(previous);
        Ok(())
    }

    async fn translate(&mut self) -> Result<TranslationSummary, HandlerError> {
        let Self {
            context,
            state,
            input,
            template,
            output,
        } = self;
        let input = match (*state, input.as_ref()) {
            (HandlerState::Loaded, Some(input)) => input,
            _ => return Err(lifecycle_error("translate", "load")),
        };
        if output.is_none() {
            *output = template.take();
        }
        let Some(output) = output.as_mut() else {
            return Err(lifecycle_error("translate", "load"));
        };

        let verbose = context.settings().verbose;
        let mut positions: HashMap<EntryKey, usize> = output
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (catalog::entry_key(entry), position))
            .collect();

        let count = input.entries.len();
        let mut summary = TranslationSummary::default();
        context.start_progress(count);

        for (position, source_entry) in input.entries.iter().enumerate() {
            let index = position + 1;
            summary.total += 1;

            let slot = *positions
                .entry(catalog::entry_key(source_entry))
                .or_insert_with(|| {
                    output.entries.push(source_entry.clone());
                    output.entries.len() - 1
                });

            let mut candidate = output.entries[slot].clone();
            let outcome = translate_entry(context, &mut candidate).await;
            match &outcome {
                EntryOutcome::Skipped => {}
                EntryOutcome::Failed(reason) => {
                    warn!(
                        "[WARN] Entry {}: translation error: {}. Keeping original text.",
                        index, reason
                    );
                }
                EntryOutcome::Unchanged
                | EntryOutcome::Translated
                | EntryOutcome::Partial { .. } => {
                    if let EntryOutcome::Partial { reason, .. } = &outcome {
                        warn!(
                            "[WARN] Entry {}: some lines kept their source text: {}",
                            index, reason
                        );
                    }
                    if outcome.is_change() {
                        summary.translated += 1;
                        if verbose {
                            info!(
                                "[OK] {}/{} translated @ {}: {}",
                                index,
                                count,
                                location(&candidate),
                                snippet(&candidate.msgid, 80)
                            );
                        }
                    }
                    output.entries[slot] = candidate;
                }
            }

            context.advance();
            context.checkpoint(index, &summary);
        }

        context.finish_progress();
        *state = HandlerState::Translated;
        Ok(summary)
    }

    fn save(&mut self, output: &Path, dry_run: bool) -> Result<(), HandlerError> {
        let document = match (self.state, self.output.as_ref()) {
            (HandlerState::Translated | HandlerState::Saved, Some(document)) => document,
            _ => return Err(lifecycle_error("save", "translate")),
        };

        if dry_run {
            info!("[DRY-RUN] Would write to {}", output.display());
        } else {
            catalog::save(document, output)?;
            info!("Wrote translated file to {}", output.display());
            self.context.persist_cache()?;
        }

        self.state = HandlerState::Saved;
        Ok(())
    }

    fn state(&self) -> HandlerState {
        self.state
    }

    fn context(&self) -> &HandlerContext {
        &self.context
    }
}
