//! Shared test utilities for juka-core tests.
//!
//! Provides a [`MockBackend`] that records draw calls, a fixed-width
//! [`FixedMeasure`], and recording process launcher and image viewer.

use std::cell::RefCell;
use std::time::Duration;

use crate::backend::{Color, FontSpec, Rect, RenderBackend, TextMeasure, TextureId};
use crate::document::SceneDocument;
use crate::error::{JukaError, Result};
use crate::launcher::{ImageViewer, ProcessLauncher};
use crate::osk::OskLayout;
use crate::session::Session;

/// Build a session from an inline document.
pub fn session_from(json: &str) -> Session {
    let document = SceneDocument::from_json(json).expect("test document");
    Session::new(document, OskLayout::default())
}

/// Text is 10px per character and as tall as the font size.
pub struct FixedMeasure;

impl TextMeasure for FixedMeasure {
    fn measure_text(&self, text: &str, font: &FontSpec) -> (u32, u32) {
        (text.chars().count() as u32 * 10, u32::from(font.size))
    }
}

/// A recorded draw call from the mock backend.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum DrawCall {
    Clear {
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        width: u32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    },
    LoadImage {
        path: String,
    },
    Blit {
        tex: TextureId,
        rect: Rect,
    },
}

/// A mock backend that records all draw calls for test assertions.
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
    /// Intrinsic size reported for every loaded image.
    pub image_size: (u32, u32),
    /// Paths whose `load_image` fails.
    pub fail_images: Vec<String>,
    /// Texts whose `draw_text` fails.
    pub fail_texts: Vec<String>,
    pub destroyed: Vec<TextureId>,
    next_tex: u64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            image_size: (64, 64),
            fail_images: Vec::new(),
            fail_texts: Vec::new(),
            destroyed: Vec::new(),
            next_tex: 1,
        }
    }

    /// Text of every `DrawText` call, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    fn find_text(&self, needle: &str) -> Option<&DrawCall> {
        self.calls
            .iter()
            .find(|c| matches!(c, DrawCall::DrawText { text, .. } if text == needle))
    }

    /// Origin of the first `DrawText` with exactly this text.
    pub fn text_pos(&self, needle: &str) -> Option<(i32, i32)> {
        match self.find_text(needle)? {
            DrawCall::DrawText { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Color of the first `DrawText` with exactly this text.
    pub fn text_color(&self, needle: &str) -> Option<Color> {
        match self.find_text(needle)? {
            DrawCall::DrawText { color, .. } => Some(*color),
            _ => None,
        }
    }

    pub fn filled(&self, rect: Rect, color: Color) -> bool {
        self.calls
            .contains(&DrawCall::FillRect { rect, color })
    }

    pub fn stroked(&self, rect: Rect, color: Color) -> bool {
        self.calls.iter().any(|c| {
            matches!(c, DrawCall::StrokeRect { rect: r, color: k, .. } if *r == rect && *k == color)
        })
    }

    pub fn blitted(&self, rect: Rect) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, DrawCall::Blit { rect: r, .. } if *r == rect))
    }

    pub fn loads_of(&self, path: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::LoadImage { path: p } if p == path))
            .count()
    }
}

impl RenderBackend for MockBackend {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Clear { color });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { rect, color });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, width: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::StrokeRect { rect, width, color });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &FontSpec, color: Color) -> Result<()> {
        if self.fail_texts.iter().any(|t| t == text) {
            return Err(JukaError::Backend(format!("cannot render '{text}'")));
        }
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x,
            y,
            font_size: font.size,
            color,
        });
        Ok(())
    }

    fn load_image(&mut self, path: &str) -> Result<TextureId> {
        self.calls.push(DrawCall::LoadImage {
            path: path.to_string(),
        });
        if self.fail_images.iter().any(|p| p == path) {
            return Err(JukaError::Backend(format!("cannot load {path}")));
        }
        let tex = TextureId(self.next_tex);
        self.next_tex += 1;
        Ok(tex)
    }

    fn texture_size(&self, _tex: TextureId) -> Result<(u32, u32)> {
        Ok(self.image_size)
    }

    fn blit(&mut self, tex: TextureId, rect: Rect) -> Result<()> {
        self.calls.push(DrawCall::Blit { tex, rect });
        Ok(())
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.destroyed.push(tex);
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Records spawns and captures instead of running anything.
#[derive(Default)]
pub struct RecordingLauncher {
    spawned: RefCell<Vec<(String, Vec<String>)>>,
    captured: RefCell<Vec<String>>,
    output: String,
    fail: bool,
}

impl RecordingLauncher {
    /// `capture` returns `output` for every command.
    pub fn with_output(output: &str) -> Self {
        Self {
            output: output.to_string(),
            ..Self::default()
        }
    }

    /// Every call fails after being recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn spawned(&self) -> Vec<(String, Vec<String>)> {
        self.spawned.borrow().clone()
    }

    pub fn captured(&self) -> Vec<String> {
        self.captured.borrow().clone()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn spawn(&self, program: &str, args: &[String]) -> Result<()> {
        self.spawned
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        if self.fail {
            return Err(JukaError::Process(format!("{program}: not found")));
        }
        Ok(())
    }

    fn capture(&self, command: &str) -> Result<String> {
        self.captured.borrow_mut().push(command.to_string());
        if self.fail {
            return Err(JukaError::Process(format!("{command}: exit status 1")));
        }
        Ok(self.output.clone())
    }
}

/// Records shown images instead of blocking.
#[derive(Default)]
pub struct RecordingViewer {
    pub shown: Vec<(String, Duration)>,
    fail: bool,
}

impl RecordingViewer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl ImageViewer for RecordingViewer {
    fn show_image(&mut self, path: &str, duration: Duration) -> Result<()> {
        if self.fail {
            return Err(JukaError::Backend(format!("cannot load {path}")));
        }
        self.shown.push((path.to_string(), duration));
        Ok(())
    }
}
