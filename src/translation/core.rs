/*!
 * Core text translation.
 *
 * `translate_text` turns one catalog value into its translation while keeping
 * the layout intact: surrounding spaces and tabs are reattached verbatim,
 * explicit newlines split the value into lines that are translated one by
 * one, and placeholders are shielded from the backend.
 */

use log::{debug, warn};

use super::cache::{TranslationCache, cache_key};
use super::placeholders::{protect, restore};
use crate::providers::Provider;

/// Why a line kept its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The backend returned an error
    Backend(String),
    /// The backend answered without a usable result
    NoResult,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "{}", message),
            Self::NoResult => write!(f, "backend returned no translation"),
        }
    }
}

/// How a single line was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTranslation {
    /// Blank after protection, copied through without a backend call
    Passthrough,
    /// Served from the cache
    Cached,
    /// Translated by the backend
    Translated,
    /// Backend fault; the protected source text was used instead
    Fallback(FallbackReason),
}

/// Result of translating one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTranslation {
    /// Final text, whitespace and placeholders restored
    pub text: String,
    /// Outcome per line, in order
    pub lines: Vec<LineTranslation>,
}

impl TextTranslation {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lines: Vec::new(),
        }
    }

    /// Whether any line fell back to its source text
    pub fn has_fallback(&self) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line, LineTranslation::Fallback(_)))
    }

    /// Whether lines fell back and none was translated or cached
    pub fn is_total_fallback(&self) -> bool {
        self.has_fallback()
            && !self
                .lines
                .iter()
                .any(|line| matches!(line, LineTranslation::Translated | LineTranslation::Cached))
    }

    /// First fallback reason, if any
    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        self.lines.iter().find_map(|line| match line {
            LineTranslation::Fallback(reason) => Some(reason),
            _ => None,
        })
    }

    /// Number of lines that needed a backend call
    pub fn backend_calls(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| {
                matches!(
                    line,
                    LineTranslation::Translated | LineTranslation::Fallback(_)
                )
            })
            .count()
    }

    /// Number of lines served from the cache
    pub fn cache_hits(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, LineTranslation::Cached))
            .count()
    }
}

/// Running totals over a whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Lines sent to the backend
    pub backend_calls: usize,
    /// Lines served from the cache
    pub cache_hits: usize,
    /// Lines that fell back to source text
    pub fallbacks: usize,
}

impl TranslationStats {
    /// Fold one value's outcome into the totals
    pub fn record(&mut self, translation: &TextTranslation) {
        self.backend_calls += translation.backend_calls();
        self.cache_hits += translation.cache_hits();
        self.fallbacks += translation
            .lines
            .iter()
            .filter(|line| matches!(line, LineTranslation::Fallback(_)))
            .count();
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} backend call(s), {} cache hit(s), {} fallback(s)",
            self.backend_calls, self.cache_hits, self.fallbacks
        )
    }
}

fn is_horizontal_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Translate `text`, preserving newlines, surrounding whitespace and placeholders.
///
/// Backend faults never escape: the affected line keeps its source text and
/// is reported as [`LineTranslation::Fallback`].
pub async fn translate_text(
    text: &str,
    provider: &dyn Provider,
    mut cache: Option<&mut TranslationCache>,
) -> TextTranslation {
    if text.is_empty() {
        return TextTranslation::unchanged(text);
    }

    let core = text.trim_matches(is_horizontal_space);
    if core.is_empty() {
        return TextTranslation::unchanged(text);
    }
    let leading = text.len() - text.trim_start_matches(is_horizontal_space).len();
    let trailing = text.len() - text.trim_end_matches(is_horizontal_space).len();
    let prefix = &text[..leading];
    let suffix = &text[text.len() - trailing..];

    let mut parts = Vec::new();
    let mut lines = Vec::new();

    for part in core.split('\n') {
        let (protected, mapping) = protect(part);

        if protected.trim().is_empty() {
            parts.push(protected);
            lines.push(LineTranslation::Passthrough);
            continue;
        }

        let key = cache_key(&protected);
        let cached = cache
            .as_deref()
            .and_then(|c| c.get(&key))
            .map(str::to_string);

        let (translated, outcome) = match cached {
            Some(hit) => (hit, LineTranslation::Cached),
            None => match provider.translate(&protected).await {
                Ok(Some(result)) if !result.trim().is_empty() => {
                    if let Some(cache) = cache.as_deref_mut() {
                        cache.insert(key, result.clone());
                    }
                    (result, LineTranslation::Translated)
                }
                Ok(_) => {
                    debug!("No translation returned for '{}'", protected);
                    (protected.clone(), LineTranslation::Fallback(FallbackReason::NoResult))
                }
                Err(e) => {
                    warn!("Translation failed, keeping source text: {}", e);
                    (
                        protected.clone(),
                        LineTranslation::Fallback(FallbackReason::Backend(e.to_string())),
                    )
                }
            },
        };

        parts.push(restore(&translated, &mapping));
        lines.push(outcome);
    }

    TextTranslation {
        text: format!("{}{}{}", prefix, parts.join("\n"), suffix),
        lines,
    }
}
