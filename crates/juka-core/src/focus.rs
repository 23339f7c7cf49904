//! Scene and focus navigation state.

use crate::document::Scene;

/// Current scene, focused element and per-scene video flags.
///
/// All methods take the document's scene list; the controller stores
/// indices only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusController {
    scene: usize,
    focus: Option<usize>,
    video_played: Vec<bool>,
}

/// Indices of the navigable elements of `scene`, in document order.
pub fn navigable_indices(scene: &Scene) -> Vec<usize> {
    scene
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_navigable())
        .map(|(i, _)| i)
        .collect()
}

impl FocusController {
    /// Start on the first scene.
    pub fn new(scenes: &[Scene]) -> Self {
        let mut fc = Self {
            scene: 0,
            focus: None,
            video_played: vec![false; scenes.len()],
        };
        fc.enter_scene(0, scenes);
        fc
    }

    pub fn scene_index(&self) -> usize {
        self.scene
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    /// Switch to scene `index`, focus its first navigable element and clear
    /// its video flag. Out-of-range indices are ignored.
    pub fn enter_scene(&mut self, index: usize, scenes: &[Scene]) {
        let Some(scene) = scenes.get(index) else {
            log::warn!("Scene index {index} out of range");
            return;
        };
        self.scene = index;
        self.focus = navigable_indices(scene).first().copied();
        if self.video_played.len() < scenes.len() {
            self.video_played.resize(scenes.len(), false);
        }
        self.video_played[index] = false;
        log::debug!("Entered scene '{}' (focus {:?})", scene.name, self.focus);
    }

    /// Step focus through the navigable elements with wrap-around.
    ///
    /// A focus outside the navigable set snaps to the first navigable element
    /// without applying the step.
    pub fn move_focus(&mut self, direction: i32, scenes: &[Scene]) {
        let Some(scene) = scenes.get(self.scene) else {
            return;
        };
        let nav = navigable_indices(scene);
        if nav.is_empty() {
            self.focus = None;
            return;
        }
        let pos = self
            .focus
            .and_then(|f| nav.iter().position(|&i| i == f));
        self.focus = Some(match pos {
            None => nav[0],
            Some(p) => {
                let len = nav.len() as i64;
                nav[(p as i64 + i64::from(direction)).rem_euclid(len) as usize]
            },
        });
    }

    /// Move to the previous or next scene with wrap-around.
    pub fn change_scene(&mut self, direction: i32, scenes: &[Scene]) {
        if scenes.is_empty() {
            return;
        }
        let len = scenes.len() as i64;
        let next = (self.scene as i64 + i64::from(direction)).rem_euclid(len) as usize;
        self.enter_scene(next, scenes);
    }

    /// Focus a specific element if it is navigable in the current scene.
    pub fn focus_element(&mut self, index: usize, scenes: &[Scene]) {
        let navigable = scenes
            .get(self.scene)
            .and_then(|s| s.elements.get(index))
            .is_some_and(|e| e.is_navigable());
        if navigable {
            self.focus = Some(index);
        }
    }

    pub fn video_played(&self, scene: usize) -> bool {
        self.video_played.get(scene).copied().unwrap_or(false)
    }

    pub fn mark_video_played(&mut self, scene: usize) {
        if let Some(flag) = self.video_played.get_mut(scene) {
            *flag = true;
        }
    }
}
