//! The running kiosk: document, navigation state and keyboard in one value.

use crate::backend::Rect;
use crate::collapsed_list;
use crate::document::{ElementKind, Scene, SceneDocument};
use crate::focus::FocusController;
use crate::launcher::ProcessLauncher;
use crate::osk::{OnScreenKeyboard, OskLayout};
use crate::substitute::substitute_text;
use crate::trigger::VideoPlayer;
use crate::variables::MISSING_VAR;

/// All mutable interpreter state. Passed by reference to the router,
/// dispatcher and renderer.
#[derive(Debug, Clone)]
pub struct Session {
    pub document: SceneDocument,
    pub focus: FocusController,
    pub keyboard: OnScreenKeyboard,
}

impl Session {
    pub fn new(document: SceneDocument, keyboard: OskLayout) -> Self {
        let focus = FocusController::new(&document.scenes);
        Self {
            document,
            focus,
            keyboard: OnScreenKeyboard::new(keyboard),
        }
    }

    /// The active scene.
    pub fn scene(&self) -> &Scene {
        &self.document.scenes[self.focus.scene_index()]
    }

    pub fn enter_scene(&mut self, index: usize) {
        self.keyboard.finish();
        self.focus.enter_scene(index, &self.document.scenes);
    }

    pub fn change_scene(&mut self, direction: i32) {
        self.keyboard.finish();
        self.focus.change_scene(direction, &self.document.scenes);
    }

    /// Enter the first scene named `name`. Returns `false` when none matches.
    pub fn change_scene_by_name(&mut self, name: &str) -> bool {
        match self.document.scene_index(name) {
            Some(index) => {
                self.enter_scene(index);
                true
            },
            None => false,
        }
    }

    /// Per-frame work that runs after input and before drawing: fetch
    /// collapsed lists not yet cached, and start the scene's videos once per
    /// activation.
    pub fn prepare_frame(&mut self, launcher: &dyn ProcessLauncher, video: &VideoPlayer) {
        let index = self.focus.scene_index();
        let Some(scene) = self.document.scenes.get(index) else {
            return;
        };
        let store = &mut self.document.variables;

        for element in &scene.elements {
            if let ElementKind::CollapsedList {
                command,
                list_variable,
            } = &element.kind
            {
                collapsed_list::ensure_fetched(store, command, list_variable, launcher);
            }
        }

        if self.focus.video_played(index) {
            return;
        }
        for element in &scene.elements {
            let ElementKind::Video { path, variable } = &element.kind else {
                continue;
            };
            let path = if !path.is_empty() {
                substitute_text(path, store)
            } else if !variable.is_empty() {
                store.resolve(variable)
            } else {
                String::new()
            };
            if path.is_empty() || path == MISSING_VAR {
                log::warn!("Video element in '{}' has no path", scene.name);
                continue;
            }
            let area = Rect::new(
                element.x,
                element.y,
                element.width.resolve(store).unwrap_or(0),
                element.height.resolve(store).unwrap_or(0),
            );
            if let Err(e) = video.play_in(launcher, &path, area) {
                log::warn!("Failed to start video '{path}': {e}");
            }
        }
        self.focus.mark_video_played(index);
    }
}
