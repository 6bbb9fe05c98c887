/*!
 * Placeholder-safe text translation.
 *
 * This module contains the pipeline shared by every catalog format.
 * It is split into several submodules:
 *
 * - `placeholders`: protection and restoration of non-prose tokens
 * - `cache`: persistent, content-addressed translation cache
 * - `core`: per-value translation (whitespace, newlines, cache, backend fallback)
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::core::{
    FallbackReason, LineTranslation, TextTranslation, TranslationStats, translate_text,
};
pub use self::placeholders::{PlaceholderMap, protect, restore};

// Submodules
pub mod cache;
pub mod core;
pub mod placeholders;
