/*!
 * Transifex JSON handler.
 *
 * Files are flat objects mapping keys to source strings:
 *
 * ```json
 * {
 *   "menu.save": "Save",
 *   "menu.quit": "Quit %(app)s"
 * }
 * ```
 *
 * Only string values are translated; keys never change.
 */

use std::path::Path;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::{
    FormatHandler, HandlerContext, HandlerState, TranslationSummary, lifecycle_error, snippet,
};
use crate::errors::HandlerError;
use crate::file_utils::FileManager;

/// Handler for Transifex key/value JSON files
pub struct TransifexHandler {
    context: HandlerContext,
    state: HandlerState,
    input: Option<Map<String, Value>>,
    output: Option<Map<String, Value>>,
}

impl TransifexHandler {
    pub fn new(context: HandlerContext) -> Self {
        Self {
            context,
            state: HandlerState::Created,
            input: None,
            output: None,
        }
    }

    /// The object that `save` writes, once built
    pub fn output(&self) -> Option<&Map<String, Value>> {
        self.output.as_ref()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_json(path: &Path) -> Result<Value, HandlerError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Translate one string value. Returns the value to write and whether it changed.
///
/// Blank values are copied through. Lines the backend could not translate keep
/// their source text; when no line was translated the whole source is kept.
async fn translate_value(
    context: &mut HandlerContext,
    index: usize,
    key: &str,
    source: &str,
) -> (String, bool) {
    if source.trim().is_empty() {
        return (source.to_string(), false);
    }

    let result = context.translate(source).await;
    if let Some(reason) = result.fallback_reason() {
        if result.is_total_fallback() {
            warn!(
                "[WARN] Entry {}: Key '{}' translation error: {}. Keeping original.",
                index, key, reason
            );
            return (source.to_string(), false);
        }
        warn!(
            "[WARN] Entry {}: Key '{}' has lines that kept their source text: {}",
            index, key, reason
        );
    }

    let changed = result.text.trim() != source.trim();
    (result.text, changed)
}

#[async_trait]
impl FormatHandler for TransifexHandler {
    fn load(&mut self, input: &Path) -> Result<(), HandlerError> {
        if !FileManager::file_exists(input) {
            return Err(HandlerError::InputNotFound(input.to_path_buf()));
        }

        let data = match read_json(input)? {
            Value::Object(map) => map,
            other => return Err(HandlerError::InvalidRoot(json_type_name(&other).to_string())),
        };
        if self.context.settings().verbose {
            info!("Loaded {} entries from {}", data.len(), input.display());
        }

        self.input = Some(data);
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
        self.output = Some(match read_json(output)? {
            Value::Object(map) => map,
            other => {
                warn!(
                    "Previous output {} holds a JSON {}, ignoring it",
                    output.display(),
                    json_type_name(&other)
                );
                Map::new()
            }
        });
        Ok(())
    }

    async fn translate(&mut self) -> Result<TranslationSummary, HandlerError> {
        let Self {
            context,
            state,
            input,
            output,
        } = self;
        let input = match (*state, input.as_ref()) {
            (HandlerState::Loaded, Some(input)) => input,
            _ => return Err(lifecycle_error("translate", "load")),
        };

        let skip_translated = context.settings().skip_translated;
        let verbose = context.settings().verbose;
        let output = output.get_or_insert_with(Map::new);

        let mut keys: Vec<&String> = input.keys().collect();
        keys.sort();

        let count = keys.len();
        let mut summary = TranslationSummary::default();
        context.start_progress(count);

        for (position, key) in keys.into_iter().enumerate() {
            let index = position + 1;
            summary.total += 1;

            match &input[key] {
                Value::String(source) => {
                    let already_translated = output
                        .get(key)
                        .and_then(Value::as_str)
                        .is_some_and(|existing| !existing.trim().is_empty());

                    if skip_translated && already_translated {
                        if verbose {
                            info!("[SKIP] Entry {}: Key '{}' already translated", index, key);
                        }
                    } else {
                        let (value, changed) = translate_value(context, index, key, source).await;
                        if changed {
                            summary.translated += 1;
                            if verbose {
                                info!(
                                    "[OK] {}/{} '{}': '{}' -> '{}'",
                                    index,
                                    count,
                                    key,
                                    snippet(source, 60),
                                    snippet(&value, 60)
                                );
                            }
                        }
                        output.insert(key.clone(), Value::String(value));
                    }
                }
                other => {
                    if verbose {
                        info!(
                            "[SKIP] Entry {}: Key '{}' has non-string value, skipping",
                            index, key
                        );
                    }
                    output.insert(key.clone(), other.clone());
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
        let data = match (self.state, self.output.as_ref()) {
            (HandlerState::Translated | HandlerState::Saved, Some(data)) => data,
            _ => return Err(lifecycle_error("save", "translate")),
        };

        if dry_run {
            info!("[DRY-RUN] Would write to {}", output.display());
        } else {
            let json = serde_json::to_string_pretty(data)?;
            FileManager::write_atomic(output, &json)?;
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
