//! Gettext `.po` catalogs.
//!
//! Parsing and serialization are done by `rspolib`, whose [`POFile`] keeps the
//! header comment, metadata, translator and extracted comments, references,
//! flags, previous fields and obsolete entries. This module only adds what the
//! handlers share on top of it:
//! - the `(msgctxt, msgid)` identity of an entry
//! - read and write access to the singular and plural `msgstr` slots
//! - header metadata setters
//! - atomic writes

use std::io;
use std::path::Path;

use rspolib::{FileOptions, pofile};

pub use rspolib::{POEntry, POFile};

use crate::errors::CatalogError;
use crate::file_utils::FileManager;

/// Identity of an entry inside a catalog: `(msgctxt, msgid)`
pub type EntryKey = (Option<String>, String);

/// Read and parse a catalog file
pub fn load(path: &Path) -> Result<POFile, CatalogError> {
    if !FileManager::file_exists(path) {
        return Err(CatalogError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    pofile(FileOptions::from(path)).map_err(|e| CatalogError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read only the header comment and metadata of a catalog
pub fn load_header(path: &Path) -> Result<POFile, CatalogError> {
    let mut file = load(path)?;
    file.entries.clear();
    Ok(file)
}

/// Write the catalog atomically to `path`
pub fn save(file: &POFile, path: &Path) -> Result<(), CatalogError> {
    FileManager::write_atomic(path, &file.to_string())?;
    Ok(())
}

pub fn entry_key(entry: &POEntry) -> EntryKey {
    (entry.msgctxt.clone(), entry.msgid.clone())
}

/// Singular translation, empty when absent
pub fn msgstr(entry: &POEntry) -> &str {
    entry.msgstr.as_deref().unwrap_or("")
}

/// Plural translation slot `index`, empty when absent
pub fn plural_slot(entry: &POEntry, index: usize) -> &str {
    entry
        .msgstr_plural
        .get(index)
        .map(String::as_str)
        .unwrap_or("")
}

/// Write plural slot `index`, padding lower slots with empty strings
pub fn set_plural_slot(entry: &mut POEntry, index: usize, value: String) {
    if entry.msgstr_plural.len() <= index {
        entry.msgstr_plural.resize(index + 1, String::new());
    }
    entry.msgstr_plural[index] = value;
}

/// Whether any translation slot holds non-blank text
pub fn has_translation(entry: &POEntry) -> bool {
    if entry.msgid_plural.is_some() {
        entry.msgstr_plural.iter().any(|v| !v.trim().is_empty())
    } else {
        !msgstr(entry).trim().is_empty()
    }
}

pub fn metadata<'a>(file: &'a POFile, key: &str) -> Option<&'a str> {
    file.metadata.get(key).map(String::as_str)
}

/// Set a header value, replacing any previous one
pub fn set_metadata(file: &mut POFile, key: &str, value: impl Into<String>) {
    file.metadata.insert(key.to_string(), value.into());
}

/// Set a header value only when the key is absent
pub fn set_default_metadata(file: &mut POFile, key: &str, value: impl Into<String>) {
    file.metadata
        .entry(key.to_string())
        .or_insert_with(|| value.into());
}
