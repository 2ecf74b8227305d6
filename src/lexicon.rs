//! Localized manager strings.
//!
//! Entries may carry a single `%s` placeholder that callers fill with
//! [`interpolate`].

use std::collections::HashMap;

pub trait Lexicon: Send + Sync {
    /// Look up a string by key. Unknown keys come back verbatim so a missing
    /// translation is visible rather than blank.
    fn get(&self, key: &str) -> String;
}

/// Replace the first `%s` in `template` with `arg`.
pub fn interpolate(template: &str, arg: &str) -> String {
    template.replacen("%s", arg, 1)
}

/// In-memory lexicon table.
#[derive(Debug, Clone, Default)]
pub struct StaticLexicon {
    entries: HashMap<String, String>,
}

impl StaticLexicon {
    /// The built-in English strings used by the template editor.
    pub fn english() -> Self {
        let entries = [
            ("new_template", "New template"),
            (
                "error_no_privileges",
                "You don't have enough privileges for this action!",
            ),
            (
                "error_template_not_found",
                "No database record has been found for this template.",
            ),
            (
                "error_element_locked",
                "This template is currently being edited by %s. Please wait until the other user has finished and try again.",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { entries }
    }
}

impl Lexicon for StaticLexicon {
    fn get(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => {
                log::debug!("Missing lexicon entry '{key}'");
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_fills_first_placeholder_only() {
        assert_eq!(interpolate("locked by %s", "bob"), "locked by bob");
        assert_eq!(interpolate("%s and %s", "a"), "a and %s");
        assert_eq!(interpolate("no placeholder", "bob"), "no placeholder");
    }

    #[test]
    fn test_unknown_key_is_returned_verbatim() {
        let lex = StaticLexicon::english();
        assert_eq!(lex.get("new_template"), "New template");
        assert_eq!(lex.get("no_such_key"), "no_such_key");
    }
}
