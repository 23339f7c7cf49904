//! Element geometry shared by the renderer and pointer hit-testing.
//!
//! Whatever rectangle an element is painted into is exactly the rectangle
//! that receives its clicks.

use crate::backend::{FontSpec, Rect, TextMeasure};
use crate::collapsed_list::{cache_key, cached_items};
use crate::document::{Element, ElementKind, SceneDocument};
use crate::substitute::substitute_text;
use crate::variables::VariableStore;

// -- Layout constants ---------------------------------------------------------

/// Space added around a button's measured text when no size is given.
pub const BUTTON_PADDING: (u32, u32) = (20, 10);
/// Input box size when no size is given.
pub const INPUT_SIZE: (u32, u32) = (300, 40);
/// Collapsed list row size when no size is given.
pub const LIST_ROW_SIZE: (u32, u32) = (600, 40);
/// Menu bar height.
pub const MENU_HEIGHT: u32 = 50;
/// Font role used by the menu and the on-screen keyboard.
pub const MENU_FONT_ROLE: &str = "medium";

/// Left edge of the first menu entry, relative to the bar.
const MENU_FIRST_X: i32 = 50;
/// Gap between menu entries.
const MENU_GAP: i32 = 20;
/// Distance of the clock from the right edge of the bar.
const MENU_CLOCK_INSET: i32 = 80;
/// Text baseline offset inside the bar.
const MENU_TEXT_DY: i32 = 10;

/// Font an element draws its text with.
pub fn element_font(element: &Element, store: &VariableStore) -> FontSpec {
    store.font(&element.style.font)
}

/// Painted rectangle of an element, or `None` for kinds that are not laid
/// out here (images, videos, menus, unknown kinds).
pub fn element_bounds(
    element: &Element,
    store: &VariableStore,
    measure: &dyn TextMeasure,
) -> Option<Rect> {
    let sized = |default: (u32, u32)| {
        Rect::new(
            element.x,
            element.y,
            element.width.resolve(store).unwrap_or(default.0),
            element.height.resolve(store).unwrap_or(default.1),
        )
    };

    match &element.kind {
        ElementKind::Label { text } => {
            let text = substitute_text(text, store);
            Some(sized(measure.measure_text(&text, &element_font(element, store))))
        },
        ElementKind::Button { text, .. } => {
            let text = substitute_text(text, store);
            let (tw, th) = measure.measure_text(&text, &element_font(element, store));
            Some(sized((tw + BUTTON_PADDING.0, th + BUTTON_PADDING.1)))
        },
        ElementKind::Input { .. } => Some(sized(INPUT_SIZE)),
        ElementKind::CollapsedList {
            command,
            list_variable,
        } => {
            let row = sized(LIST_ROW_SIZE);
            let rows = cached_items(store, cache_key(command, list_variable))
                .len()
                .max(1) as u32;
            Some(Rect::new(row.x, row.y, row.w, row.h * rows))
        },
        ElementKind::Image { .. }
        | ElementKind::Video { .. }
        | ElementKind::Menu
        | ElementKind::Unknown(_) => None,
    }
}

/// One clickable scene entry of a menu bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub scene: usize,
    pub label: String,
    pub rect: Rect,
}

/// Geometry of a menu element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLayout {
    pub bar: Rect,
    pub entries: Vec<MenuEntry>,
    /// Top-left of the clock text.
    pub clock_pos: (i32, i32),
    pub font: FontSpec,
}

impl MenuLayout {
    /// Text origin of an entry.
    pub fn text_pos(&self, entry: &MenuEntry) -> (i32, i32) {
        (entry.rect.x, self.bar.y + MENU_TEXT_DY)
    }
}

/// Lay out a menu bar: one entry per scene, the current one shown as
/// `[name]`, and the clock at the right edge.
pub fn menu_layout(
    element: &Element,
    document: &SceneDocument,
    current: usize,
    measure: &dyn TextMeasure,
    viewport_w: u32,
) -> MenuLayout {
    let font = document.variables.font(MENU_FONT_ROLE);
    let bar = Rect::new(element.x, element.y, viewport_w, MENU_HEIGHT);

    let mut x = bar.x + MENU_FIRST_X;
    let entries = document
        .scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            let label = if i == current {
                format!("[{}]", scene.name)
            } else {
                scene.name.clone()
            };
            let (tw, _) = measure.measure_text(&label, &font);
            let rect = Rect::new(x, bar.y, tw, MENU_HEIGHT);
            x += tw as i32 + MENU_GAP;
            MenuEntry {
                scene: i,
                label,
                rect,
            }
        })
        .collect();

    MenuLayout {
        bar,
        entries,
        clock_pos: (
            bar.x + viewport_w as i32 - MENU_CLOCK_INSET,
            bar.y + MENU_TEXT_DY,
        ),
        font,
    }
}

/// Target of a pointer click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A navigable element of the current scene.
    Element(usize),
    /// A menu entry for the given scene.
    Scene(usize),
}

/// Find what a click at `(x, y)` lands on. Later elements paint over earlier
/// ones, so the search runs topmost first. A menu bar swallows clicks that
/// miss its entries.
pub fn hit_test(
    document: &SceneDocument,
    current: usize,
    measure: &dyn TextMeasure,
    viewport_w: u32,
    x: i32,
    y: i32,
) -> Option<Hit> {
    let scene = document.scenes.get(current)?;
    let store = &document.variables;

    for (i, element) in scene.elements.iter().enumerate().rev() {
        if element.kind == ElementKind::Menu {
            let menu = menu_layout(element, document, current, measure, viewport_w);
            if let Some(entry) = menu.entries.iter().find(|e| e.rect.contains(x, y)) {
                return Some(Hit::Scene(entry.scene));
            }
            if menu.bar.contains(x, y) {
                return None;
            }
        } else if element.is_navigable()
            && element_bounds(element, store, measure).is_some_and(|r| r.contains(x, y))
        {
            return Some(Hit::Element(i));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixedMeasure;
    use crate::variables::VarValue;
    use crate::collapsed_list::ListItem;

    fn doc() -> SceneDocument {
        SceneDocument::from_json(
            r#"{
                "variables": {"w": "150", "fontSizes": {"big": 30}},
                "scenes": [
                    {"name": "Home", "elements": [
                        {"type": "button", "text": "Play", "x": 100, "y": 100},
                        {"type": "button", "text": "Big", "x": 100, "y": 200, "font": "big",
                         "width": "$w", "height": 60},
                        {"type": "input", "x": 100, "y": 300},
                        {"type": "button", "text": "Over", "x": 110, "y": 310},
                        {"type": "label", "text": "Hi $w", "x": 5, "y": 5},
                        {"type": "menu", "x": 0, "y": 670}
                    ]},
                    {"name": "Games", "elements": [
                        {"type": "collapsedlist", "command": "ls", "listVariable": "games", "x": 0, "y": 0}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn button_auto_size_pads_text() {
        let d = doc();
        let r = element_bounds(&d.scenes[0].elements[0], &d.variables, &FixedMeasure).unwrap();
        // "Play" = 4 chars * 10, default font size 24.
        assert_eq!(r, Rect::new(100, 100, 60, 34));
    }

    #[test]
    fn button_explicit_size() {
        let d = doc();
        let r = element_bounds(&d.scenes[0].elements[1], &d.variables, &FixedMeasure).unwrap();
        assert_eq!(r, Rect::new(100, 200, 150, 60));
    }

    #[test]
    fn input_default_size() {
        let d = doc();
        let r = element_bounds(&d.scenes[0].elements[2], &d.variables, &FixedMeasure).unwrap();
        assert_eq!(r, Rect::new(100, 300, 300, 40));
    }

    #[test]
    fn label_measures_substituted_text() {
        let d = doc();
        let r = element_bounds(&d.scenes[0].elements[4], &d.variables, &FixedMeasure).unwrap();
        assert_eq!((r.w, r.h), (60, 24));
    }

    #[test]
    fn collapsed_list_grows_with_items() {
        let mut d = doc();
        let list = &d.scenes[1].elements[0];
        let r = element_bounds(list, &d.variables, &FixedMeasure).unwrap();
        assert_eq!(r, Rect::new(0, 0, 600, 40));
        d.variables.set_custom(
            "games",
            VarValue::List(vec![ListItem::titled("a"), ListItem::titled("b")]),
        );
        let list = &d.scenes[1].elements[0];
        let r = element_bounds(list, &d.variables, &FixedMeasure).unwrap();
        assert_eq!(r.h, 80);
    }

    #[test]
    fn menu_entries_mark_current() {
        let d = doc();
        let m = menu_layout(&d.scenes[0].elements[5], &d, 0, &FixedMeasure, 1280);
        assert_eq!(m.bar, Rect::new(0, 670, 1280, 50));
        assert_eq!(m.entries[0].label, "[Home]");
        assert_eq!(m.entries[0].rect, Rect::new(50, 670, 60, 50));
        assert_eq!(m.entries[1].label, "Games");
        assert_eq!(m.entries[1].rect.x, 130);
        assert_eq!(m.clock_pos, (1200, 680));
        assert_eq!(m.text_pos(&m.entries[1]), (130, 680));
    }

    #[test]
    fn hit_buttons_and_inputs() {
        let d = doc();
        let hit = |x, y| hit_test(&d, 0, &FixedMeasure, 1280, x, y);
        assert_eq!(hit(101, 101), Some(Hit::Element(0)));
        assert_eq!(hit(160, 101), None);
        assert_eq!(hit(240, 250), Some(Hit::Element(1)));
        assert_eq!(hit(350, 330), Some(Hit::Element(2)));
        // Labels are not clickable.
        assert_eq!(hit(6, 6), None);
    }

    #[test]
    fn topmost_element_wins() {
        let d = doc();
        // "Over" (110,310,60,34) overlaps the input (100,300,300,40).
        assert_eq!(
            hit_test(&d, 0, &FixedMeasure, 1280, 120, 320),
            Some(Hit::Element(3))
        );
    }

    #[test]
    fn hit_menu_entries() {
        let d = doc();
        assert_eq!(
            hit_test(&d, 0, &FixedMeasure, 1280, 135, 690),
            Some(Hit::Scene(1))
        );
        assert_eq!(
            hit_test(&d, 0, &FixedMeasure, 1280, 55, 690),
            Some(Hit::Scene(0))
        );
        assert_eq!(hit_test(&d, 0, &FixedMeasure, 1280, 900, 690), None);
    }
}
