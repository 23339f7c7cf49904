//! Button triggers and their effects.

use std::time::Duration;

use crate::backend::Rect;
use crate::error::Result;
use crate::launcher::{ImageViewer, ProcessLauncher};
use crate::session::Session;
use crate::substitute::substitute_text;

/// What an activated button does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TriggerKind {
    #[default]
    None,
    SetVariable,
    ChangeScene,
    Exit,
    PlayVideo,
    PlayImage,
    ExternalApp,
    /// Unrecognised trigger name; activation does nothing.
    Unknown(String),
}

impl TriggerKind {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "" => Self::None,
            "set_variable" => Self::SetVariable,
            "change_scene" => Self::ChangeScene,
            "exit" => Self::Exit,
            "play_video" => Self::PlayVideo,
            "play_image" => Self::PlayImage,
            "external_app" => Self::ExternalApp,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A trigger descriptor as written on a button. `target` and `value` may
/// contain `$variables`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerSpec {
    pub kind: TriggerKind,
    pub target: String,
    pub value: String,
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    /// Stop the event loop.
    Exit,
}

/// Command line of the external video player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPlayer {
    pub program: String,
}

impl VideoPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `<path> -fs -autoexit`
    pub fn fullscreen_args(path: &str) -> Vec<String> {
        vec![path.to_string(), "-fs".into(), "-autoexit".into()]
    }

    /// Borderless window placed over `area`. Unknown sizes are left to the
    /// player.
    pub fn windowed_args(path: &str, x: i32, y: i32, size: (Option<u32>, Option<u32>)) -> Vec<String> {
        let mut args = vec![path.to_string(), "-noborder".into()];
        if let Some(w) = size.0 {
            args.extend(["-x".into(), w.to_string()]);
        }
        if let Some(h) = size.1 {
            args.extend(["-y".into(), h.to_string()]);
        }
        args.extend([
            "-left".into(),
            x.to_string(),
            "-top".into(),
            y.to_string(),
            "-autoexit".into(),
        ]);
        args
    }

    pub fn play_fullscreen(&self, launcher: &dyn ProcessLauncher, path: &str) -> Result<()> {
        launcher.spawn(&self.program, &Self::fullscreen_args(path))
    }

    pub fn play_in(&self, launcher: &dyn ProcessLauncher, path: &str, area: Rect) -> Result<()> {
        let size = (
            Some(area.w).filter(|w| *w > 0),
            Some(area.h).filter(|h| *h > 0),
        );
        launcher.spawn(&self.program, &Self::windowed_args(path, area.x, area.y, size))
    }
}

/// Maps a trigger descriptor to exactly one effect.
#[derive(Debug, Clone)]
pub struct TriggerDispatcher {
    pub video: VideoPlayer,
    pub image_duration: Duration,
}

impl TriggerDispatcher {
    pub fn new(video: VideoPlayer, image_duration: Duration) -> Self {
        Self {
            video,
            image_duration,
        }
    }

    /// Run one trigger. External failures are logged and never abort the loop.
    pub fn dispatch(
        &self,
        spec: &TriggerSpec,
        session: &mut Session,
        launcher: &dyn ProcessLauncher,
        viewer: &mut dyn ImageViewer,
    ) -> Dispatch {
        let store = &session.document.variables;
        let target = substitute_text(&spec.target, store);
        let value = substitute_text(&spec.value, store);

        match &spec.kind {
            TriggerKind::None => {},
            TriggerKind::Unknown(name) => log::debug!("Ignoring unknown trigger '{name}'"),
            TriggerKind::SetVariable => {
                if target.is_empty() {
                    log::debug!("set_variable without a target");
                } else {
                    log::info!("Set {target} = {value}");
                    session.document.variables.set_custom(&target, value);
                }
            },
            TriggerKind::ChangeScene => {
                if !session.change_scene_by_name(&target) {
                    log::warn!("No scene named '{target}'");
                }
            },
            TriggerKind::Exit => {
                log::info!("Exit requested");
                return Dispatch::Exit;
            },
            TriggerKind::PlayVideo => {
                if let Err(e) = self.video.play_fullscreen(launcher, &target) {
                    log::warn!("Video playback failed for '{target}': {e}");
                }
            },
            TriggerKind::PlayImage => {
                if let Err(e) = viewer.show_image(&target, self.image_duration) {
                    log::warn!("Failed to show image '{target}': {e}");
                }
            },
            TriggerKind::ExternalApp => {
                if target.is_empty() {
                    log::debug!("external_app without a target");
                } else if let Err(e) = launcher.spawn(&target, &[]) {
                    log::warn!("Failed to start external app: {e}");
                }
            },
        }
        Dispatch::Continue
    }
}
