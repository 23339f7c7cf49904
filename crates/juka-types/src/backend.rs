//! Backend trait definitions.
//!
//! Every platform implements these traits. The interpreter dispatches all
//! drawing, text measurement and input polling through trait boundaries -- it
//! never calls platform-specific APIs.

use crate::error::Result;
use crate::input::InputEvent;

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha value.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

/// Opaque handle to a loaded texture in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// An axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (i64::from(px), i64::from(py));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x && px < x + i64::from(self.w) && py >= y && py < y + i64::from(self.h)
    }
}

/// A font file and point size, as resolved from a font role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub path: String,
    pub size: u16,
}

impl FontSpec {
    pub fn new(path: impl Into<String>, size: u16) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Text measurement, shared by layout, hit-testing and drawing.
pub trait TextMeasure {
    /// Pixel extents `(width, height)` of `text` rendered with `font`.
    ///
    /// Implementations that cannot open the font return `(0, 0)`.
    fn measure_text(&self, text: &str, font: &FontSpec) -> (u32, u32);
}

/// Rendering backend trait.
///
/// Implementations: SDL2 (desktop and Pi) and the recording mock used in tests.
pub trait RenderBackend {
    /// Clear the entire screen with a solid color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Draw a filled rectangle. Colors with alpha below 255 are blended.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Draw a rectangle outline `width` pixels thick, inset from `rect`.
    fn stroke_rect(&mut self, rect: Rect, width: u32, color: Color) -> Result<()> {
        let sw = width.min(rect.w).min(rect.h);
        if sw == 0 {
            return Ok(());
        }
        let inner_h = rect.h.saturating_sub(sw * 2);
        // Top, bottom, left, right.
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, sw), color)?;
        self.fill_rect(
            Rect::new(rect.x, rect.y + (rect.h - sw) as i32, rect.w, sw),
            color,
        )?;
        self.fill_rect(Rect::new(rect.x, rect.y + sw as i32, sw, inner_h), color)?;
        self.fill_rect(
            Rect::new(rect.x + (rect.w - sw) as i32, rect.y + sw as i32, sw, inner_h),
            color,
        )
    }

    /// Draw a single line of text with its top-left corner at `(x, y)`.
    ///
    /// A font that cannot be opened is logged and the text skipped.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &FontSpec, color: Color)
    -> Result<()>;

    /// Load an image file into a texture.
    fn load_image(&mut self, path: &str) -> Result<TextureId>;

    /// Intrinsic pixel size of a loaded texture.
    fn texture_size(&self, tex: TextureId) -> Result<(u32, u32)>;

    /// Blit a texture scaled into `dst`.
    fn blit(&mut self, tex: TextureId, dst: Rect) -> Result<()>;

    /// Free a previously loaded texture.
    fn destroy_texture(&mut self, tex: TextureId) -> Result<()>;

    /// Present the finished frame.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Release all resources.
    fn shutdown(&mut self) -> Result<()>;
}

/// Input backend trait.
///
/// Maps platform-specific input to the platform-agnostic `InputEvent` enum.
pub trait InputBackend {
    /// Poll for pending input events, in arrival order.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn color_rgb_is_opaque() {
        let c = Color::rgb(10, 20, 30);
        assert_eq!(c.a, 255);
        assert_eq!(c.with_alpha(128), Color::rgba(10, 20, 30, 128));
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert!(r.contains(10, 20));
        assert!(r.contains(109, 69));
        assert!(!r.contains(110, 20));
        assert!(!r.contains(10, 70));
        assert!(!r.contains(9, 20));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::new(5, 5, 0, 0);
        assert!(!r.contains(5, 5));
    }

    /// Backend that records fill calls, to check the default `stroke_rect`.
    struct Fills(Vec<Rect>);

    impl RenderBackend for Fills {
        fn clear(&mut self, _: Color) -> Result<()> {
            Ok(())
        }
        fn fill_rect(&mut self, rect: Rect, _: Color) -> Result<()> {
            self.0.push(rect);
            Ok(())
        }
        fn draw_text(&mut self, _: &str, _: i32, _: i32, _: &FontSpec, _: Color) -> Result<()> {
            Ok(())
        }
        fn load_image(&mut self, _: &str) -> Result<TextureId> {
            Ok(TextureId(1))
        }
        fn texture_size(&self, _: TextureId) -> Result<(u32, u32)> {
            Ok((0, 0))
        }
        fn blit(&mut self, _: TextureId, _: Rect) -> Result<()> {
            Ok(())
        }
        fn destroy_texture(&mut self, _: TextureId) -> Result<()> {
            Ok(())
        }
        fn swap_buffers(&mut self) -> Result<()> {
            Ok(())
        }
        fn shutdown(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stroke_rect_draws_four_edges() {
        let mut b = Fills(Vec::new());
        b.stroke_rect(Rect::new(0, 0, 300, 40), 2, Color::WHITE)
            .unwrap();
        assert_eq!(
            b.0,
            vec![
                Rect::new(0, 0, 300, 2),
                Rect::new(0, 38, 300, 2),
                Rect::new(0, 2, 2, 36),
                Rect::new(298, 2, 2, 36),
            ]
        );
    }

    #[test]
    fn stroke_rect_zero_width_is_noop() {
        let mut b = Fills(Vec::new());
        b.stroke_rect(Rect::new(0, 0, 10, 10), 0, Color::WHITE)
            .unwrap();
        assert!(b.0.is_empty());
    }

    proptest! {
        #[test]
        fn rect_contains_its_origin_when_nonempty(
            x in -10_000i32..10_000,
            y in -10_000i32..10_000,
            w in 1u32..5_000,
            h in 1u32..5_000,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(r.contains(x, y));
            prop_assert!(!r.contains(x + w as i32, y));
            prop_assert!(!r.contains(x, y + h as i32));
        }
    }
}
