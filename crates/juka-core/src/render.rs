//! Draws the active scene through a `RenderBackend`.

use std::collections::HashMap;

use crate::backend::{Color, FontSpec, Rect, RenderBackend, TextMeasure, TextureId};
use crate::collapsed_list::{cache_key, cached_items};
use crate::document::{Element, ElementKind};
use crate::error::Result;
use crate::layout::{self, MENU_FONT_ROLE};
use crate::osk::ROWS;
use crate::session::Session;
use crate::style::{resolve_color, with_opacity};
use crate::substitute::substitute_text;

// -- Palette ------------------------------------------------------------------

pub const BACKGROUND: Color = Color::rgb(32, 32, 32);
pub const FOCUS_BORDER: Color = Color::rgb(0, 120, 215);
pub const MENU_BAR: Color = Color::rgba(32, 32, 32, 200);
pub const OSK_OVERLAY: Color = Color::rgba(0, 0, 0, 200);
pub const OSK_KEY: Color = Color::WHITE;
pub const OSK_KEY_SELECTED: Color = Color::rgb(0, 255, 0);

/// Input text origin inside the box.
const INPUT_TEXT_DX: i32 = 10;
/// Focus border width around inputs.
const FOCUS_BORDER_WIDTH: u32 = 2;
/// Distance of the edit preview above the key grid.
const OSK_PREVIEW_DY: i32 = 60;

/// Per-frame values that do not live in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// `HH:MM` for menu clocks.
    pub clock_text: String,
    /// Blink phase of the edit cursor.
    pub cursor_visible: bool,
}

/// Paints a session each frame. Owns the image texture cache.
pub struct SceneRenderer {
    viewport: (u32, u32),
    /// Path -> texture, `None` for images that failed to load so they are
    /// not retried every frame.
    textures: HashMap<String, Option<TextureId>>,
}

impl SceneRenderer {
    pub fn new(viewport_w: u32, viewport_h: u32) -> Self {
        Self {
            viewport: (viewport_w, viewport_h),
            textures: HashMap::new(),
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Draw one frame. Does not present; the caller swaps buffers.
    ///
    /// An element that fails to draw is logged and skipped. Only a failed
    /// clear or keyboard overlay is returned.
    pub fn render(
        &mut self,
        backend: &mut dyn RenderBackend,
        measure: &dyn TextMeasure,
        session: &Session,
        frame: &FrameInfo,
    ) -> Result<()> {
        backend.clear(BACKGROUND)?;

        let store = &session.document.variables;
        if !store.background_image.is_empty() {
            let path = substitute_text(&store.background_image, store);
            if let Some(tex) = self.texture(backend, &path) {
                let (w, h) = self.viewport;
                backend.blit(tex, Rect::new(0, 0, w, h))?;
            }
        }

        let focused = session.focus.focused();
        let editing = session.keyboard.editing_element();
        for (i, element) in session.scene().elements.iter().enumerate() {
            let state = ElementState {
                focused: focused == Some(i),
                editing: editing == Some(i),
            };
            if let Err(e) = self.draw_element(backend, measure, session, element, state, frame) {
                log::warn!("Skipping element {i} in scene '{}': {e}", session.scene().name);
            }
        }

        if session.keyboard.is_editing() {
            self.draw_keyboard(backend, measure, session, frame)?;
        }
        Ok(())
    }

    /// Free every cached texture.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        for (_, tex) in self.textures.drain() {
            if let Some(tex) = tex {
                backend.destroy_texture(tex)?;
            }
        }
        Ok(())
    }

    fn texture(&mut self, backend: &mut dyn RenderBackend, path: &str) -> Option<TextureId> {
        if let Some(cached) = self.textures.get(path) {
            return *cached;
        }
        let tex = match backend.load_image(path) {
            Ok(tex) => Some(tex),
            Err(e) => {
                log::warn!("Failed to load image '{path}': {e}");
                None
            },
        };
        self.textures.insert(path.to_string(), tex);
        tex
    }

    fn draw_element(
        &mut self,
        backend: &mut dyn RenderBackend,
        measure: &dyn TextMeasure,
        session: &Session,
        element: &Element,
        state: ElementState,
        frame: &FrameInfo,
    ) -> Result<()> {
        let store = &session.document.variables;
        let font = layout::element_font(element, store);
        let fg = resolve_color(&element.style.color, store, Color::BLACK);
        let bg = with_opacity(
            resolve_color(&element.style.bg_color, store, Color::WHITE),
            element.style.opacity,
        );

        match &element.kind {
            ElementKind::Label { text } => {
                let text = substitute_text(text, store);
                if !element.style.bg_color.is_empty() {
                    if let Some(rect) = layout::element_bounds(element, store, measure) {
                        backend.fill_rect(rect, bg)?;
                    }
                }
                backend.draw_text(&text, element.x, element.y, &font, fg)?;
            },
            ElementKind::Button { text, .. } => {
                let Some(rect) = layout::element_bounds(element, store, measure) else {
                    return Ok(());
                };
                let (fg, bg) = if state.focused { (bg, fg) } else { (fg, bg) };
                backend.fill_rect(rect, bg)?;
                let text = substitute_text(text, store);
                let (tw, th) = measure.measure_text(&text, &font);
                let (tx, ty) = centered(rect, tw, th);
                backend.draw_text(&text, tx, ty, &font, fg)?;
            },
            ElementKind::Input { text, variable } => {
                let Some(rect) = layout::element_bounds(element, store, measure) else {
                    return Ok(());
                };
                if state.focused || state.editing {
                    let border = Rect::new(
                        rect.x - FOCUS_BORDER_WIDTH as i32,
                        rect.y - FOCUS_BORDER_WIDTH as i32,
                        rect.w + 2 * FOCUS_BORDER_WIDTH,
                        rect.h + 2 * FOCUS_BORDER_WIDTH,
                    );
                    backend.stroke_rect(border, FOCUS_BORDER_WIDTH, FOCUS_BORDER)?;
                }
                backend.fill_rect(rect, bg)?;

                let (shown, color) = if state.editing {
                    let mut shown = session.keyboard.buffer().unwrap_or_default().to_string();
                    if frame.cursor_visible {
                        shown.push('_');
                    }
                    (shown, fg)
                } else {
                    let value = if variable.is_empty() {
                        String::new()
                    } else {
                        store.custom_text(variable)
                    };
                    if value.is_empty() {
                        (substitute_text(text, store), fg.with_alpha(128))
                    } else {
                        (value, fg)
                    }
                };
                if !shown.is_empty() {
                    let (_, th) = measure.measure_text(&shown, &font);
                    let ty = rect.y + (rect.h as i32 - th as i32) / 2;
                    backend.draw_text(&shown, rect.x + INPUT_TEXT_DX, ty, &font, color)?;
                }
            },
            ElementKind::Image { path } => {
                let path = substitute_text(path, store);
                if path.is_empty() {
                    return Ok(());
                }
                let Some(tex) = self.texture(backend, &path) else {
                    return Ok(());
                };
                let (iw, ih) = backend.texture_size(tex)?;
                let w = element.width.resolve(store).unwrap_or(iw);
                let h = element.height.resolve(store).unwrap_or(ih);
                backend.blit(tex, Rect::new(element.x, element.y, w, h))?;
            },
            ElementKind::Menu => {
                let menu = layout::menu_layout(
                    element,
                    &session.document,
                    session.focus.scene_index(),
                    measure,
                    self.viewport.0,
                );
                backend.fill_rect(menu.bar, MENU_BAR)?;
                for entry in &menu.entries {
                    let (x, y) = menu.text_pos(entry);
                    backend.draw_text(&entry.label, x, y, &menu.font, Color::WHITE)?;
                }
                let (cx, cy) = menu.clock_pos;
                backend.draw_text(&frame.clock_text, cx, cy, &menu.font, Color::WHITE)?;
            },
            ElementKind::CollapsedList {
                command,
                list_variable,
            } => {
                let Some(rect) = layout::element_bounds(element, store, measure) else {
                    return Ok(());
                };
                let items = cached_items(store, cache_key(command, list_variable));
                let rows = items.len().max(1) as u32;
                let row_h = rect.h / rows;
                for (i, item) in items.iter().enumerate() {
                    let row = Rect::new(rect.x, rect.y + (i as u32 * row_h) as i32, rect.w, row_h);
                    backend.fill_rect(row, bg)?;
                    let (_, th) = measure.measure_text(&item.title, &font);
                    let ty = row.y + (row_h as i32 - th as i32) / 2;
                    backend.draw_text(&item.title, row.x + INPUT_TEXT_DX, ty, &font, fg)?;
                    if !item.header.is_empty() {
                        let (hw, _) = measure.measure_text(&item.header, &font);
                        let hx = row.x + row.w as i32 - hw as i32 - INPUT_TEXT_DX;
                        backend.draw_text(&item.header, hx, ty, &font, fg)?;
                    }
                }
                if items.is_empty() {
                    backend.fill_rect(rect, bg)?;
                }
            },
            // Played by the external player, not drawn.
            ElementKind::Video { .. } | ElementKind::Unknown(_) => {},
        }
        Ok(())
    }

    fn draw_keyboard(
        &self,
        backend: &mut dyn RenderBackend,
        measure: &dyn TextMeasure,
        session: &Session,
        frame: &FrameInfo,
    ) -> Result<()> {
        let (vw, vh) = self.viewport;
        backend.fill_rect(Rect::new(0, 0, vw, vh), OSK_OVERLAY)?;

        let osk = &session.keyboard;
        let font: FontSpec = session.document.variables.font(MENU_FONT_ROLE);

        let mut preview = osk.buffer().unwrap_or_default().to_string();
        if frame.cursor_visible {
            preview.push('_');
        }
        if !preview.is_empty() {
            let (pw, _) = measure.measure_text(&preview, &font);
            let px = (vw as i32 - pw as i32) / 2;
            backend.draw_text(&preview, px, osk.layout.top - OSK_PREVIEW_DY, &font, Color::WHITE)?;
        }

        let selected = osk.cursor();
        for (row, keys) in ROWS.iter().enumerate() {
            for (col, label) in keys.iter().enumerate() {
                let rect = osk.layout.key_rect(col, row);
                let fill = if (col, row) == selected {
                    OSK_KEY_SELECTED
                } else {
                    OSK_KEY
                };
                backend.fill_rect(rect, fill)?;
                let (tw, th) = measure.measure_text(label, &font);
                let (tx, ty) = centered(rect, tw, th);
                backend.draw_text(label, tx, ty, &font, Color::BLACK)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct ElementState {
    focused: bool,
    editing: bool,
}

/// Origin that centres a `w`x`h` box inside `rect`.
fn centered(rect: Rect, w: u32, h: u32) -> (i32, i32) {
    (
        rect.x + (rect.w as i32 - w as i32) / 2,
        rect.y + (rect.h as i32 - h as i32) / 2,
    )
}
