//! `$name` substitution in element text fields.

use crate::variables::{MISSING_VAR, VariableStore};

/// Result of substituting a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub text: String,
    /// Names that did not resolve, in order of appearance.
    pub missing: Vec<String>,
}

/// Replace every `$` followed by one or more ASCII word characters
/// (`[A-Za-z0-9_]`) with the variable's value. Unresolved names become
/// [`MISSING_VAR`]. A `$` not followed by a word character is kept literally.
pub fn substitute(text: &str, store: &VariableStore) -> Substituted {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut missing = Vec::new();
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        let start = i + 1;
        let end = start
            + bytes[start..]
                .iter()
                .take_while(|b| is_word_byte(**b))
                .count();
        if end == start {
            i += 1;
            continue;
        }

        out.push_str(&text[last..i]);
        let name = &text[start..end];
        match store.lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                log::warn!("Missing variable: {name}");
                out.push_str(MISSING_VAR);
                missing.push(name.to_string());
            },
        }
        last = end;
        i = end;
    }
    out.push_str(&text[last..]);

    Substituted { text: out, missing }
}

/// Substituted text only.
pub fn substitute_text(text: &str, store: &VariableStore) -> String {
    if !text.contains('$') {
        return text.to_string();
    }
    substitute(text, store).text
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store() -> VariableStore {
        serde_json::from_str(
            r#"{
                "buttonColor": {"r": 10, "g": 20, "b": 30},
                "user": "Ada",
                "count": 3,
                "blank": ""
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builtin_color() {
        let s = substitute("$buttonColor", &store());
        assert_eq!(s.text, "10,20,30");
        assert!(s.missing.is_empty());
    }

    #[test]
    fn missing_key_marker() {
        let s = substitute("$missingkey", &store());
        assert_eq!(s.text, MISSING_VAR);
        assert_eq!(s.missing, vec!["missingkey".to_string()]);
    }

    #[test]
    fn mixed_text() {
        let s = substitute("Hello $user, you have $count new ($nothing)", &store());
        assert_eq!(s.text, "Hello Ada, you have 3 new (MISSING_VAR)");
        assert_eq!(s.missing, vec!["nothing".to_string()]);
    }

    #[test]
    fn token_stops_at_non_word_char() {
        assert_eq!(substitute_text("$user-name", &store()), "Ada-name");
        assert_eq!(substitute_text("$user.", &store()), "Ada.");
    }

    #[test]
    fn lone_dollar_is_literal() {
        assert_eq!(substitute_text("costs $ 5", &store()), "costs $ 5");
        assert_eq!(substitute_text("end$", &store()), "end$");
        assert_eq!(substitute_text("$$user", &store()), "$Ada");
    }

    #[test]
    fn empty_value_is_not_missing() {
        let s = substitute("[$blank]", &store());
        assert_eq!(s.text, "[]");
        assert!(s.missing.is_empty());
    }

    #[test]
    fn unicode_around_tokens() {
        assert_eq!(substitute_text("héllo $user ✓", &store()), "héllo Ada ✓");
    }

    proptest! {
        #[test]
        fn text_without_dollar_is_unchanged(text in "[^$]{0,64}") {
            let s = substitute(&text, &store());
            prop_assert_eq!(s.text, text);
            prop_assert!(s.missing.is_empty());
        }
    }
}
