//! Document variables: built-in styling values plus user-defined fields.
//!
//! Every lookup is case-insensitive. Custom fields shadow built-ins with the
//! same name. A miss resolves to [`MISSING_VAR`], never to an empty string.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::backend::FontSpec;
use crate::collapsed_list::ListItem;

/// Visible marker substituted for unresolved variable references.
pub const MISSING_VAR: &str = "MISSING_VAR";

/// Font file used when a role has no `fonts` entry.
pub const DEFAULT_FONT_PATH: &str = "Roboto-Black.ttf";

/// Point size used when a role has no `fontSizes` entry.
pub const DEFAULT_FONT_SIZE: u16 = 24;

/// An RGB triple from the `buttonColor` / `labelColor` built-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Rgb {
    #[serde(default)]
    pub r: u8,
    #[serde(default)]
    pub g: u8,
    #[serde(default)]
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// A user-defined variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<ListItem>),
}

impl VarValue {
    /// Convert a raw JSON value from the document.
    ///
    /// `null` becomes empty text; objects are kept as their JSON text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Text(String::new()),
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(ListItem::from_json).collect()),
            Value::Object(map) => Self::Text(Value::Object(map).to_string()),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            },
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.title)?;
                }
                Ok(())
            },
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Named values referenced from element fields as `$name`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct VariableStore {
    pub button_color: Rgb,
    pub label_color: Rgb,
    pub background_image: String,
    /// Font role -> font file path.
    pub fonts: BTreeMap<String, String>,
    /// Font role -> point size.
    pub font_sizes: BTreeMap<String, u16>,
    custom: BTreeMap<String, VarValue>,
}

impl TryFrom<Map<String, Value>> for VariableStore {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut store = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "buttonColor" => store.button_color = builtin(&key, value)?,
                "labelColor" => store.label_color = builtin(&key, value)?,
                "backgroundImage" => store.background_image = builtin(&key, value)?,
                "fonts" => store.fonts = builtin(&key, value)?,
                "fontSizes" => store.font_sizes = builtin(&key, value)?,
                _ => {
                    log::debug!("Custom variable: {key} = {value}");
                    store.custom.insert(key, VarValue::from_json(value));
                },
            }
        }
        Ok(store)
    }
}

/// Decode one built-in entry; `null` leaves the default in place.
fn builtin<T>(key: &str, value: Value) -> Result<T, String>
where
    T: Default + serde::de::DeserializeOwned,
{
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| format!("variables.{key}: {e}"))
}

impl VariableStore {
    /// Look up a variable without logging. Custom fields are searched first,
    /// then the colour/background built-ins, then font paths and font sizes.
    pub fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.custom(name) {
            return Some(value.to_string());
        }
        match name.to_ascii_lowercase().as_str() {
            "buttoncolor" => return Some(self.button_color.to_string()),
            "labelcolor" => return Some(self.label_color.to_string()),
            "backgroundimage" => return Some(self.background_image.clone()),
            _ => {},
        }
        if let Some(path) = find_ci(&self.fonts, name) {
            return Some(path.clone());
        }
        find_ci(&self.font_sizes, name).map(|size| size.to_string())
    }

    /// Resolve a variable to display text, or [`MISSING_VAR`] on a miss.
    pub fn resolve(&self, name: &str) -> String {
        match self.lookup(name) {
            Some(value) => value,
            None => {
                log::warn!("Missing variable: {name}");
                MISSING_VAR.to_string()
            },
        }
    }

    /// The custom value stored under `name`, if any.
    pub fn custom(&self, name: &str) -> Option<&VarValue> {
        find_ci(&self.custom, name)
    }

    /// Text of the custom value under `name`, or empty when unset.
    pub fn custom_text(&self, name: &str) -> String {
        self.custom(name).map(ToString::to_string).unwrap_or_default()
    }

    /// Store a custom value. An existing key differing only in case is
    /// overwritten so that lookups stay unambiguous.
    pub fn set_custom(&mut self, name: &str, value: impl Into<VarValue>) {
        let key = self
            .custom
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        self.custom.insert(key, value.into());
    }

    /// Whether a custom value exists under `name`.
    pub fn has_custom(&self, name: &str) -> bool {
        self.custom(name).is_some()
    }

    /// Font file and size for a role. Each half falls back independently.
    pub fn font(&self, role: &str) -> FontSpec {
        let path = find_ci(&self.fonts, role)
            .cloned()
            .unwrap_or_else(|| DEFAULT_FONT_PATH.to_string());
        let size = find_ci(&self.font_sizes, role)
            .copied()
            .unwrap_or(DEFAULT_FONT_SIZE);
        FontSpec::new(path, size)
    }
}

fn find_ci<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}
