//! Juka kiosk player entry point.
//!
//! Loads a scene document and runs it full-window: arrows or the D-pad move
//! focus, Return or A activates, PageUp/PageDown or the shoulder buttons
//! switch scenes, and the window close button quits.

mod viewer;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use juka_backend_sdl::SdlBackend;
use juka_core::backend::{InputBackend, RenderBackend};
use juka_core::clock::{SystemClock, TimeService};
use juka_core::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH, DOCUMENT_ENV, PlayerConfig};
use juka_core::document::SceneDocument;
use juka_core::launcher::SystemLauncher;
use juka_core::osk::OskLayout;
use juka_core::render::{FrameInfo, SceneRenderer};
use juka_core::router::{Host, InputResult, InputRouter};
use juka_core::session::Session;
use juka_core::trigger::{TriggerDispatcher, VideoPlayer};

use viewer::KioskViewer;

/// Half-period of the edit cursor blink.
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = PlayerConfig::load_or_default(&config_path)?;

    // Resolve the document from CLI arg, JUKA_DOCUMENT env var, or config.
    let document_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(DOCUMENT_ENV).map(PathBuf::from))
        .unwrap_or_else(|| config.document.clone());
    let document = SceneDocument::load(&document_path)
        .with_context(|| format!("loading {}", document_path.display()))?;
    log::info!(
        "Loaded '{}' by {}: {} scene(s)",
        document.title,
        if document.author.is_empty() { "unknown" } else { document.author.as_str() },
        document.scenes.len()
    );

    let (width, height) = (config.screen_width, config.screen_height);
    let mut backend = SdlBackend::new(
        &config.window_title_for(&document.title),
        width,
        height,
        &config.controller_mappings,
    )?;
    let fonts = backend.fonts();

    let launcher = SystemLauncher;
    let clock = SystemClock::new(config.utc_offset_minutes);
    let video = VideoPlayer::new(config.video_player.clone());
    let router = InputRouter::new(
        TriggerDispatcher::new(video.clone(), config.image_duration()),
        width,
    );
    let mut renderer = SceneRenderer::new(width, height);
    let mut session = Session::new(document, OskLayout::for_viewport(width));
    let started = Instant::now();

    'running: loop {
        let events = backend.poll_events();
        for event in &events {
            let mut viewer = KioskViewer::new(&mut backend, (width, height));
            let mut host = Host {
                measure: &*fonts,
                launcher: &launcher,
                viewer: &mut viewer,
            };
            if router.handle(event, &mut session, &mut host) == InputResult::Quit {
                break 'running;
            }
        }

        session.prepare_frame(&launcher, &video);

        let frame = FrameInfo {
            clock_text: clock.now().clock_text(),
            cursor_visible: cursor_visible(started.elapsed()),
        };
        if let Err(e) = renderer.render(&mut backend, &*fonts, &session, &frame) {
            log::warn!("Frame render failed: {e}");
        }
        if let Err(e) = backend.swap_buffers() {
            log::warn!("Present failed: {e}");
        }
    }

    if let Err(e) = renderer.release(&mut backend) {
        log::warn!("Failed to release textures: {e}");
    }
    backend.shutdown()?;
    log::info!("Juka shut down cleanly");
    Ok(())
}

/// Cursor is shown during even blink intervals.
fn cursor_visible(elapsed: Duration) -> bool {
    (elapsed.as_millis() / BLINK_INTERVAL.as_millis()) % 2 == 0
}
