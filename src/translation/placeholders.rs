/*!
 * Placeholder protection for translated text.
 *
 * Format specifiers, brace interpolations and markup tags are swapped for
 * stable `__PH_<n>__` tokens before a line is sent to a backend, then put
 * back once the translation returns.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Non-prose spans, in priority order:
/// named printf (`%(name)s`, `%(count)05.2f`), bare printf (`%s`, `%d`, `%i`, `%f`),
/// brace placeholders (`{name}`, `{percent:.2%}`) and tag-like markup (`<strong>`).
static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%\([^)]+\)[#0\- +]?[\d.]*[sdif]|%[sdif]|\{[^}]+\}|<[^>]+>").unwrap()
});

/// Ordered mapping from synthetic token to the literal it replaced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    /// Number of protected spans
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the line had nothing to protect
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original literal for a token
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, original)| original.as_str())
    }

    /// Iterate `(token, original)` pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, o)| (t.as_str(), o.as_str()))
    }

    fn push(&mut self, original: &str) -> String {
        let token = token_for(self.entries.len());
        self.entries.push((token.clone(), original.to_string()));
        token
    }
}

/// Token minted for the n-th placeholder of a line
pub fn token_for(index: usize) -> String {
    format!("__PH_{}__", index)
}

/// Replace every placeholder in `text` with a token.
pub fn protect(text: &str) -> (String, PlaceholderMap) {
    let mut mapping = PlaceholderMap::default();
    let protected = PLACEHOLDER_PATTERN
        .replace_all(text, |caps: &Captures| mapping.push(&caps[0]))
        .into_owned();
    (protected, mapping)
}

/// Put the original literals back in place of their tokens.
///
/// Tokens are pairwise distinct and never overlap, so the replacement order is irrelevant.
pub fn restore(text: &str, mapping: &PlaceholderMap) -> String {
    let mut restored = text.to_string();
    for (token, original) in mapping.iter() {
        restored = restored.replace(token, original);
    }
    restored
}
