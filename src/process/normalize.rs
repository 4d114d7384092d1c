// src/process/normalize.rs

use deunicode::deunicode;

/// Spaces become underscores, then everything is transliterated to ASCII.
pub fn normalize_column_name(name: &str) -> String {
    deunicode(&name.replace(' ', "_"))
}
