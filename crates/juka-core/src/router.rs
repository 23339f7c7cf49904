//! Routes input events to the keyboard, focus navigation and triggers.

use crate::backend::TextMeasure;
use crate::document::ElementKind;
use crate::input::{Button, InputEvent};
use crate::launcher::{ImageViewer, ProcessLauncher};
use crate::layout::{self, Hit};
use crate::session::Session;
use crate::trigger::{Dispatch, TriggerDispatcher};

/// Result of handling a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// Outside services an event may reach.
pub struct Host<'a> {
    pub measure: &'a dyn TextMeasure,
    pub launcher: &'a dyn ProcessLauncher,
    pub viewer: &'a mut dyn ImageViewer,
}

/// Routes each event to exactly one handler. While the on-screen keyboard
/// is open it receives everything except quit.
#[derive(Debug, Clone)]
pub struct InputRouter {
    pub dispatcher: TriggerDispatcher,
    pub viewport_w: u32,
}

impl InputRouter {
    pub fn new(dispatcher: TriggerDispatcher, viewport_w: u32) -> Self {
        Self {
            dispatcher,
            viewport_w,
        }
    }

    pub fn handle(&self, event: &InputEvent, session: &mut Session, host: &mut Host<'_>) -> InputResult {
        if *event == InputEvent::Quit {
            return InputResult::Quit;
        }
        if session.keyboard.is_editing() {
            handle_keyboard_input(event, session);
            return InputResult::Continue;
        }

        match event {
            InputEvent::ButtonPress(Button::Confirm) => self.activate_focused(session, host),
            InputEvent::ButtonPress(btn) => {
                if let Some(dir) = btn.direction() {
                    session.focus.move_focus(dir, &session.document.scenes);
                }
                InputResult::Continue
            },
            InputEvent::ShoulderPress(s) => {
                session.change_scene(s.direction());
                InputResult::Continue
            },
            InputEvent::PointerClick { x, y } => self.click(*x, *y, session, host),
            InputEvent::TextInput(c) => {
                if begin_editing_focused(session) {
                    session
                        .keyboard
                        .type_char(*c, &mut session.document.variables);
                }
                InputResult::Continue
            },
            InputEvent::Backspace => {
                if begin_editing_focused(session) {
                    session.keyboard.backspace(&mut session.document.variables);
                }
                InputResult::Continue
            },
            InputEvent::Quit => InputResult::Quit,
        }
    }

    fn click(&self, x: i32, y: i32, session: &mut Session, host: &mut Host<'_>) -> InputResult {
        let hit = layout::hit_test(
            &session.document,
            session.focus.scene_index(),
            host.measure,
            self.viewport_w,
            x,
            y,
        );
        match hit {
            Some(Hit::Scene(index)) => {
                session.enter_scene(index);
                InputResult::Continue
            },
            Some(Hit::Element(index)) => {
                session.focus.focus_element(index, &session.document.scenes);
                self.activate_focused(session, host)
            },
            None => InputResult::Continue,
        }
    }

    /// Activate the focused element: inputs open the keyboard, buttons run
    /// their trigger.
    fn activate_focused(&self, session: &mut Session, host: &mut Host<'_>) -> InputResult {
        let Some(index) = session.focus.focused() else {
            return InputResult::Continue;
        };
        let Some(element) = session.scene().elements.get(index) else {
            return InputResult::Continue;
        };

        match &element.kind {
            ElementKind::Input { .. } => {
                begin_editing_focused(session);
                InputResult::Continue
            },
            ElementKind::Button { trigger, .. } => {
                let trigger = trigger.clone();
                match self
                    .dispatcher
                    .dispatch(&trigger, session, host.launcher, host.viewer)
                {
                    Dispatch::Exit => InputResult::Quit,
                    Dispatch::Continue => InputResult::Continue,
                }
            },
            _ => InputResult::Continue,
        }
    }
}

/// Open the keyboard on the focused element if it is an input. An input
/// without a variable edits a scratch buffer. Returns whether editing is
/// now active.
fn begin_editing_focused(session: &mut Session) -> bool {
    let Some(index) = session.focus.focused() else {
        return false;
    };
    let variable = match session.scene().elements.get(index).map(|e| &e.kind) {
        Some(ElementKind::Input { variable, .. }) => variable.clone(),
        _ => return false,
    };
    session
        .keyboard
        .begin(index, &variable, &session.document.variables);
    true
}

fn handle_keyboard_input(event: &InputEvent, session: &mut Session) {
    let store = &mut session.document.variables;
    match event {
        InputEvent::ButtonPress(btn) => {
            session.keyboard.handle_input(btn, store);
        },
        InputEvent::TextInput(c) => session.keyboard.type_char(*c, store),
        InputEvent::Backspace => session.keyboard.backspace(store),
        InputEvent::PointerClick { x, y } => session.keyboard.click(*x, *y, store),
        InputEvent::ShoulderPress(_) | InputEvent::Quit => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Shoulder;
    use crate::test_utils::{FixedMeasure, RecordingLauncher, RecordingViewer, session_from};
    use crate::trigger::VideoPlayer;
    use std::time::Duration;

    const DOC: &str = r#"{
        "variables": {"name": "Ann"},
        "scenes": [
            {"name": "A", "elements": [
                {"type": "label", "text": "hi"},
                {"type": "button", "text": "Set", "x": 0, "y": 100,
                 "trigger": "set_variable", "triggerTarget": "mode", "triggerValue": "kids"},
                {"type": "button", "text": "Next", "x": 0, "y": 200,
                 "trigger": "change_scene", "triggerTarget": "C"},
                {"type": "button", "text": "Quit", "x": 0, "y": 300, "trigger": "exit"}
            ]},
            {"name": "B", "elements": [{"type": "label"}]},
            {"name": "C", "elements": [
                {"type": "label"},
                {"type": "input", "variable": "name", "x": 100, "y": 100},
                {"type": "menu", "x": 0, "y": 670}
            ]}
        ]
    }"#;

    struct Harness {
        router: InputRouter,
        launcher: RecordingLauncher,
        viewer: RecordingViewer,
    }

    impl Harness {
        fn new() -> Self {
            let dispatcher = TriggerDispatcher::new(
                VideoPlayer::new("ffplay"),
                Duration::from_millis(3000),
            );
            Self {
                router: InputRouter::new(dispatcher, 1280),
                launcher: RecordingLauncher::default(),
                viewer: RecordingViewer::default(),
            }
        }

        fn send(&mut self, session: &mut Session, event: InputEvent) -> InputResult {
            let mut host = Host {
                measure: &FixedMeasure,
                launcher: &self.launcher,
                viewer: &mut self.viewer,
            };
            self.router.handle(&event, session, &mut host)
        }

        fn press(&mut self, session: &mut Session, button: Button) -> InputResult {
            self.send(session, InputEvent::ButtonPress(button))
        }
    }

    #[test]
    fn quit_event_quits() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        assert_eq!(h.send(&mut s, InputEvent::Quit), InputResult::Quit);
    }

    #[test]
    fn directions_cycle_focus() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        assert_eq!(s.focus.focused(), Some(1));
        h.press(&mut s, Button::Down);
        assert_eq!(s.focus.focused(), Some(2));
        h.press(&mut s, Button::Right);
        assert_eq!(s.focus.focused(), Some(3));
        h.press(&mut s, Button::Down);
        assert_eq!(s.focus.focused(), Some(1));
        h.press(&mut s, Button::Up);
        assert_eq!(s.focus.focused(), Some(3));
    }

    #[test]
    fn confirm_runs_button_trigger() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        assert_eq!(h.press(&mut s, Button::Confirm), InputResult::Continue);
        assert_eq!(s.document.variables.resolve("mode"), "kids");
    }

    #[test]
    fn exit_button_quits() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        h.press(&mut s, Button::Up);
        assert_eq!(h.press(&mut s, Button::Confirm), InputResult::Quit);
    }

    #[test]
    fn shoulders_change_scene() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        h.send(&mut s, InputEvent::ShoulderPress(Shoulder::Left));
        assert_eq!(s.focus.scene_index(), 2);
        h.send(&mut s, InputEvent::ShoulderPress(Shoulder::Right));
        assert_eq!(s.focus.scene_index(), 0);
    }

    #[test]
    fn scenario_edit_input_with_keyboard() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        h.press(&mut s, Button::Down);
        h.press(&mut s, Button::Confirm);
        assert_eq!(s.focus.scene_index(), 2);
        assert_eq!(s.focus.focused(), Some(1));

        h.press(&mut s, Button::Confirm);
        assert!(s.keyboard.is_editing());
        assert_eq!(s.keyboard.buffer(), Some("Ann"));

        // Directions now move the key cursor, not focus.
        h.press(&mut s, Button::Right);
        assert_eq!(s.focus.focused(), Some(1));
        h.send(&mut s, InputEvent::Backspace);
        h.send(&mut s, InputEvent::TextInput('a'));
        assert_eq!(s.document.variables.resolve("name"), "Ana");

        h.press(&mut s, Button::Start);
        assert!(!s.keyboard.is_editing());
        assert_eq!(s.document.variables.resolve("name"), "Ana");
    }

    #[test]
    fn typing_on_focused_input_opens_keyboard() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        s.change_scene_by_name("C");
        h.send(&mut s, InputEvent::TextInput('!'));
        assert!(s.keyboard.is_editing());
        assert_eq!(s.document.variables.resolve("name"), "Ann!");
    }

    #[test]
    fn typing_without_input_focus_is_ignored() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        h.send(&mut s, InputEvent::TextInput('x'));
        h.send(&mut s, InputEvent::Backspace);
        assert!(!s.keyboard.is_editing());
    }

    #[test]
    fn quit_while_editing_still_quits() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        s.change_scene_by_name("C");
        h.press(&mut s, Button::Confirm);
        assert_eq!(h.send(&mut s, InputEvent::Quit), InputResult::Quit);
    }

    #[test]
    fn unbound_input_edits_scratch_buffer() {
        let mut s = session_from(
            r#"{"scenes": [{"name": "A", "elements": [{"type": "input"}]}]}"#,
        );
        let mut h = Harness::new();
        let before = s.document.variables.clone();
        h.press(&mut s, Button::Confirm);
        assert!(s.keyboard.is_editing());
        h.send(&mut s, InputEvent::TextInput('z'));
        assert_eq!(s.keyboard.buffer(), Some("z"));
        assert_eq!(s.document.variables, before);
    }

    #[test]
    fn click_activates_button() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        // "Next" = 40 + 20 wide, 24 + 10 tall at (0, 200).
        h.send(&mut s, InputEvent::PointerClick { x: 5, y: 210 });
        assert_eq!(s.focus.scene_index(), 2);
    }

    #[test]
    fn click_input_focuses_and_edits() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        s.change_scene_by_name("C");
        h.send(&mut s, InputEvent::PointerClick { x: 150, y: 120 });
        assert_eq!(s.keyboard.editing_element(), Some(1));
    }

    #[test]
    fn click_menu_entry_changes_scene() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        s.change_scene_by_name("C");
        // Entries: "A" at 50, "B" at 80, "[C]" at 110.
        h.send(&mut s, InputEvent::PointerClick { x: 85, y: 690 });
        assert_eq!(s.focus.scene_index(), 1);
    }

    #[test]
    fn click_on_nothing_is_ignored() {
        let mut s = session_from(DOC);
        let mut h = Harness::new();
        h.send(&mut s, InputEvent::PointerClick { x: 1000, y: 600 });
        assert_eq!(s.focus.scene_index(), 0);
        assert_eq!(s.focus.focused(), Some(1));
    }
}
