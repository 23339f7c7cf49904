//! Scene documents: the JSON file a kiosk is described by.
//!
//! The document is decoded once into typed scenes and elements. Field
//! aliases written by the scene editor are folded in here so the rest of the
//! interpreter only ever sees one shape.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{JukaError, Result};
use crate::substitute::substitute_text;
use crate::trigger::{TriggerKind, TriggerSpec};
use crate::variables::VariableStore;

/// A loaded kiosk document.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    pub title: String,
    pub author: String,
    pub description: String,
    pub variables: VariableStore,
    /// Never empty.
    pub scenes: Vec<Scene>,
}

/// A named screen of elements. Document order is focus order and paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub elements: Vec<Element>,
}

/// One positioned element of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub x: i32,
    pub y: i32,
    pub width: Dimension,
    pub height: Dimension,
    pub style: Style,
    pub kind: ElementKind,
}

/// Per-element styling fields. Colors are `#rrggbb` or `$var` holding `r,g,b`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub color: String,
    pub bg_color: String,
    /// Font role name, resolved through the variable store.
    pub font: String,
    /// Background opacity in `0.0..=1.0`.
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Label {
        text: String,
    },
    Button {
        text: String,
        trigger: TriggerSpec,
    },
    Input {
        /// Placeholder shown while the bound variable is empty.
        text: String,
        variable: String,
    },
    Image {
        path: String,
    },
    Video {
        path: String,
        /// Variable holding the path, used when `path` is empty.
        variable: String,
    },
    Menu,
    CollapsedList {
        command: String,
        list_variable: String,
    },
    Unknown(String),
}

impl Element {
    /// Buttons and inputs take focus; nothing else does.
    pub fn is_navigable(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Button { .. } | ElementKind::Input { .. }
        )
    }
}

/// A width or height field, decoded once at load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Fixed(i32),
    /// Contains `$` references, resolved against the store at use.
    Template(String),
}

impl Dimension {
    /// Pixel size, or `None` when the element should use its default size.
    ///
    /// Zero, negative and unparsable values are all treated as unset; the
    /// unparsable case is logged.
    pub fn resolve(&self, store: &VariableStore) -> Option<u32> {
        let n = match self {
            Self::Auto => return None,
            Self::Fixed(n) => *n,
            Self::Template(raw) => {
                let text = substitute_text(raw, store);
                match parse_number(&text) {
                    Some(n) => n,
                    None => {
                        log::warn!("Invalid dimension '{raw}' (resolved to '{text}')");
                        return None;
                    },
                }
            },
        };
        u32::try_from(n).ok().filter(|n| *n > 0)
    }

    fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Self::Auto
        } else if s.contains('$') {
            Self::Template(s.to_string())
        } else {
            match parse_number(s) {
                Some(n) => Self::Fixed(n),
                None => Self::Template(s.to_string()),
            }
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Self::Auto,
            Value::Number(n) => n
                .as_f64()
                .map(|f| Self::Fixed(f.round() as i32))
                .unwrap_or_default(),
            Value::String(s) => Self::from_text(&s),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected number, string or null for dimension, got {other}"
                )));
            },
        })
    }
}

/// Integers, or decimals rounded to the nearest integer.
fn parse_number(s: &str) -> Option<i32> {
    let s = s.trim();
    s.parse::<i32>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i32))
}

/// Integer coordinate that tolerates floats, numeric strings and null.
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i32, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map(|f| f.round() as i32).unwrap_or_default(),
        Value::String(s) => parse_number(&s).unwrap_or_default(),
        _ => 0,
    })
}

// -- Raw document shape ---------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocumentDef {
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    variables: Option<VariableStore>,
    scenes: Option<Vec<SceneDef>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SceneDef {
    name: Option<String>,
    elements: Option<Vec<ElementDef>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ElementDef {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    x: i32,
    #[serde(deserialize_with = "lenient_int")]
    y: i32,
    width: Dimension,
    height: Dimension,
    color: Option<String>,
    bg_color: Option<String>,
    font: Option<String>,
    opacity: Option<f32>,
    trigger: Option<String>,
    trigger_target: Option<String>,
    trigger_value: Option<String>,
    // Scene editor trigger aliases.
    scene_change: Option<String>,
    external_app_path: Option<String>,
    variable_change: Option<String>,
    variable_change_value: Option<String>,
    video_path: Option<String>,
    image_path: Option<String>,
    image: Option<String>,
    video: Option<String>,
    video_variable: Option<String>,
    variable: Option<String>,
    command: Option<String>,
    list_variable: Option<String>,
}

impl ElementDef {
    fn trigger_spec(&mut self) -> TriggerSpec {
        let name = take(&mut self.trigger);
        let kind = TriggerKind::parse(&name);
        let mut target = take(&mut self.trigger_target);
        let mut value = take(&mut self.trigger_value);

        if target.is_empty() {
            target = match kind {
                TriggerKind::ChangeScene => take(&mut self.scene_change),
                TriggerKind::ExternalApp => take(&mut self.external_app_path),
                TriggerKind::SetVariable => take(&mut self.variable_change),
                TriggerKind::PlayVideo => take(&mut self.video_path),
                TriggerKind::PlayImage => take(&mut self.image_path),
                _ => String::new(),
            };
        }
        if value.is_empty() && kind == TriggerKind::SetVariable {
            value = take(&mut self.variable_change_value);
        }
        if let TriggerKind::Unknown(name) = &kind {
            log::warn!("Unknown trigger '{name}' will do nothing");
        }

        TriggerSpec {
            kind,
            target,
            value,
        }
    }
}

fn take(field: &mut Option<String>) -> String {
    field.take().unwrap_or_default()
}

impl From<ElementDef> for Element {
    fn from(mut def: ElementDef) -> Self {
        let kind_name = take(&mut def.kind);
        let text = take(&mut def.text);
        let kind = match kind_name.to_ascii_lowercase().as_str() {
            "label" => ElementKind::Label { text },
            "button" => ElementKind::Button {
                text,
                trigger: def.trigger_spec(),
            },
            "input" => ElementKind::Input {
                text,
                variable: take(&mut def.variable),
            },
            "image" => ElementKind::Image {
                path: take(&mut def.image),
            },
            "video" => ElementKind::Video {
                path: take(&mut def.video),
                variable: take(&mut def.video_variable),
            },
            "menu" => ElementKind::Menu,
            "collapsedlist" => ElementKind::CollapsedList {
                command: take(&mut def.command),
                list_variable: take(&mut def.list_variable),
            },
            _ => {
                log::warn!("Unknown element type '{kind_name}' will not be shown");
                ElementKind::Unknown(kind_name)
            },
        };

        Self {
            x: def.x,
            y: def.y,
            width: def.width,
            height: def.height,
            style: Style {
                color: take(&mut def.color),
                bg_color: take(&mut def.bg_color),
                font: take(&mut def.font),
                opacity: def.opacity.map(|o| o.clamp(0.0, 1.0)),
            },
            kind,
        }
    }
}

impl SceneDocument {
    /// Parse and validate a document.
    pub fn from_json(json: &str) -> Result<Self> {
        let def: DocumentDef = serde_json::from_str(json)?;

        let scenes: Vec<Scene> = def
            .scenes
            .unwrap_or_default()
            .into_iter()
            .map(|s| Scene {
                name: s.name.unwrap_or_default(),
                elements: s
                    .elements
                    .unwrap_or_default()
                    .into_iter()
                    .map(Element::from)
                    .collect(),
            })
            .collect();

        if scenes.is_empty() {
            return Err(JukaError::Document("document has no scenes".into()));
        }

        let mut seen = HashSet::new();
        for scene in &scenes {
            if !seen.insert(scene.name.as_str()) {
                log::warn!(
                    "Duplicate scene name '{}': only the first is reachable by name",
                    scene.name
                );
            }
        }

        Ok(Self {
            title: def.title.unwrap_or_default(),
            author: def.author.unwrap_or_default(),
            description: def.description.unwrap_or_default(),
            variables: def.variables.unwrap_or_default(),
            scenes,
        })
    }

    /// Read and parse a document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let doc = Self::from_json(&json)?;
        log::info!(
            "Loaded '{}' from {}: {} scene(s)",
            doc.title,
            path.display(),
            doc.scenes.len()
        );
        Ok(doc)
    }

    /// Index of the first scene named `name`.
    pub fn scene_index(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.name == name)
    }
}
