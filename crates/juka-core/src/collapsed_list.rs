//! Collapsed lists: command output cached as a list variable.
//!
//! The command runs once, the first time its element is shown. Its stdout
//! must be a JSON array of `{title, header, description, image}` records.
//! The parsed list is stored under the element's list variable; the presence
//! of that variable is the only cache signal and it never expires.

use serde_json::Value;

use crate::error::Result;
use crate::launcher::ProcessLauncher;
use crate::variables::{VarValue, VariableStore};

/// One record of a collapsed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub header: String,
    pub description: String,
    pub image: String,
}

impl ListItem {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Build a record from one JSON array entry. Non-object entries become
    /// a record whose title is the entry's text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                let field = |name: &str| map.get(name).map(text_of).unwrap_or_default();
                Self {
                    title: field("title"),
                    header: field("header"),
                    description: field("description"),
                    image: field("image"),
                }
            },
            other => Self::titled(text_of(&other)),
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse command output into list records.
pub fn parse_list(output: &str) -> Result<Vec<ListItem>> {
    let entries: Vec<Value> = serde_json::from_str(output.trim())?;
    Ok(entries.into_iter().map(ListItem::from_json).collect())
}

/// Variable a collapsed list is cached under: the list variable, or the
/// command itself when no variable is named.
pub fn cache_key<'a>(command: &'a str, list_variable: &'a str) -> &'a str {
    if list_variable.is_empty() {
        command
    } else {
        list_variable
    }
}

/// Run `command` and cache its list unless the cache already holds it.
///
/// Failures are logged and cached as an empty list so the command is not
/// retried every frame.
pub fn ensure_fetched(
    store: &mut VariableStore,
    command: &str,
    list_variable: &str,
    launcher: &dyn ProcessLauncher,
) {
    let key = cache_key(command, list_variable);
    if key.is_empty() || store.has_custom(key) {
        return;
    }

    let items = match launcher.capture(command).and_then(|out| parse_list(&out)) {
        Ok(items) => {
            log::info!("Collapsed list '{key}': {} item(s)", items.len());
            items
        },
        Err(e) => {
            log::warn!("Collapsed list '{key}' failed: {e}");
            Vec::new()
        },
    };
    store.set_custom(key, VarValue::List(items));
}

/// Cached records under `key`, empty when absent or not a list.
pub fn cached_items<'a>(store: &'a VariableStore, key: &str) -> &'a [ListItem] {
    match store.custom(key) {
        Some(VarValue::List(items)) => items,
        _ => &[],
    }
}
