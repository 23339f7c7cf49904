//! TrueType font cache shared by drawing and text measurement.

use std::cell::RefCell;
use std::collections::HashMap;

use sdl2::pixels::Color as SdlColor;
use sdl2::surface::Surface;
use sdl2::ttf::{Font, Sdl2TtfContext};

use juka_core::backend::{Color, FontSpec, TextMeasure};
use juka_core::error::{JukaError, Result};

/// Opens each `(path, size)` once. Fonts that fail to open are remembered
/// as `None` and their text is skipped.
pub struct FontCache {
    fonts: RefCell<HashMap<FontSpec, Option<Font<'static, 'static>>>>,
    ttf: &'static Sdl2TtfContext,
}

impl FontCache {
    pub fn new() -> Result<Self> {
        let ttf = sdl2::ttf::init().map_err(|e| JukaError::Backend(e.to_string()))?;
        // Fonts borrow the context; it lives for the rest of the process.
        let ttf: &'static Sdl2TtfContext = Box::leak(Box::new(ttf));
        Ok(Self {
            fonts: RefCell::new(HashMap::new()),
            ttf,
        })
    }

    fn with_font<T>(&self, spec: &FontSpec, f: impl FnOnce(&Font<'static, 'static>) -> T) -> Option<T> {
        let mut fonts = self.fonts.borrow_mut();
        let font = fonts.entry(spec.clone()).or_insert_with(|| {
            match self.ttf.load_font(&spec.path, spec.size) {
                Ok(font) => {
                    log::debug!("Loaded font {} @ {}pt", spec.path, spec.size);
                    Some(font)
                },
                Err(e) => {
                    log::warn!("Failed to open font '{}': {e}", spec.path);
                    None
                },
            }
        });
        font.as_ref().map(f)
    }

    /// Rasterise `text`. `Ok(None)` when the font is unavailable or the
    /// text is empty.
    pub fn render(&self, text: &str, spec: &FontSpec, color: Color) -> Result<Option<Surface<'static>>> {
        if text.is_empty() {
            return Ok(None);
        }
        let color = SdlColor::RGBA(color.r, color.g, color.b, color.a);
        self.with_font(spec, |font| font.render(text).blended(color))
            .transpose()
            .map_err(|e| JukaError::Backend(e.to_string()))
    }
}

impl TextMeasure for FontCache {
    fn measure_text(&self, text: &str, font: &FontSpec) -> (u32, u32) {
        if text.is_empty() {
            return (0, u32::from(font.size));
        }
        self.with_font(font, |f| f.size_of(text))
            .and_then(|r| r.ok())
            .unwrap_or((0, 0))
    }
}
