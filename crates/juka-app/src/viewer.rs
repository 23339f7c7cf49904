use std::time::Duration;

use juka_core::backend::{Color, Rect, RenderBackend};
use juka_core::error::Result;
use juka_core::launcher::ImageViewer;

/// Shows an image over the whole window and blocks the loop while it is up.
pub struct KioskViewer<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
    viewport: (u32, u32),
    sleep: fn(Duration),
}

impl<'a, B: RenderBackend + ?Sized> KioskViewer<'a, B> {
    pub fn new(backend: &'a mut B, viewport: (u32, u32)) -> Self {
        Self {
            backend,
            viewport,
            sleep: std::thread::sleep,
        }
    }
}

impl<B: RenderBackend + ?Sized> ImageViewer for KioskViewer<'_, B> {
    fn show_image(&mut self, path: &str, duration: Duration) -> Result<()> {
        let tex = self.backend.load_image(path)?;
        let (w, h) = self.viewport;
        self.backend.clear(Color::BLACK)?;
        self.backend.blit(tex, Rect::new(0, 0, w, h))?;
        self.backend.swap_buffers()?;
        log::info!("Showing {path} for {}ms", duration.as_millis());
        (self.sleep)(duration);
        self.backend.destroy_texture(tex)
    }
}
