//! On-screen keyboard state and key geometry.

use crate::backend::Rect;
use crate::input::Button;
use crate::variables::VariableStore;

/// Key labels, row by row.
pub const ROWS: [&[&str]; 4] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M"],
    &["SPACE", "BACK", "ENTER"],
];

/// What a key does when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Back,
    Enter,
}

impl Key {
    fn from_label(label: &str) -> Self {
        match label {
            "SPACE" => Self::Space,
            "BACK" => Self::Back,
            "ENTER" => Self::Enter,
            other => Self::Char(other.chars().next().unwrap_or(' ')),
        }
    }
}

/// Key grid geometry in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OskLayout {
    pub key_w: u32,
    pub key_h: u32,
    pub padding: u32,
    /// Top of the first row.
    pub top: i32,
    /// Width the grid is centred in.
    pub viewport_w: u32,
}

impl Default for OskLayout {
    fn default() -> Self {
        Self {
            key_w: 60,
            key_h: 60,
            padding: 10,
            top: 200,
            viewport_w: 1280,
        }
    }
}

impl OskLayout {
    pub fn for_viewport(viewport_w: u32) -> Self {
        Self {
            viewport_w,
            ..Self::default()
        }
    }

    /// Horizontal indent of each row, in key widths: 0, 1/2, 1, 3.
    fn row_offset(&self, row: usize) -> i32 {
        let w = self.key_w as i32;
        match row {
            1 => w / 2,
            2 => w,
            3 => w * 3,
            _ => 0,
        }
    }

    /// Screen rectangle of key `(col, row)`.
    pub fn key_rect(&self, col: usize, row: usize) -> Rect {
        let grid_w = 10 * self.key_w + 9 * self.padding;
        let start_x = (self.viewport_w as i32 - grid_w as i32) / 2;
        let step_x = (self.key_w + self.padding) as i32;
        let step_y = (self.key_h + self.padding) as i32;
        Rect::new(
            start_x + self.row_offset(row) + col as i32 * step_x,
            self.top + row as i32 * step_y,
            self.key_w,
            self.key_h,
        )
    }

    /// Key under a screen point, as `(col, row)`.
    pub fn key_at(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        ROWS.iter().enumerate().find_map(|(row, keys)| {
            (0..keys.len())
                .find(|&col| self.key_rect(col, row).contains(x, y))
                .map(|col| (col, row))
        })
    }
}

/// Keyboard mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OskState {
    #[default]
    Inactive,
    /// Editing the input element at `element`, bound to `variable`.
    Editing {
        element: usize,
        variable: String,
        buffer: String,
    },
}

/// Modal on-screen keyboard. Every edit is written through to the bound
/// variable immediately, so leaving edit mode never needs to commit.
#[derive(Debug, Clone, Default)]
pub struct OnScreenKeyboard {
    pub layout: OskLayout,
    cursor: (usize, usize),
    state: OskState,
}

impl OnScreenKeyboard {
    pub fn new(layout: OskLayout) -> Self {
        Self {
            layout,
            cursor: (0, 0),
            state: OskState::Inactive,
        }
    }

    pub fn state(&self) -> &OskState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, OskState::Editing { .. })
    }

    /// Index of the input element being edited.
    pub fn editing_element(&self) -> Option<usize> {
        match &self.state {
            OskState::Editing { element, .. } => Some(*element),
            OskState::Inactive => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            OskState::Editing { buffer, .. } => Some(buffer),
            OskState::Inactive => None,
        }
    }

    /// Grid cursor as `(col, row)`.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn selected_key(&self) -> Key {
        let (col, row) = self.cursor;
        Key::from_label(ROWS[row][col])
    }

    /// Enter edit mode for an input element. The buffer starts from the
    /// variable's current value.
    pub fn begin(&mut self, element: usize, variable: &str, store: &VariableStore) {
        let buffer = if variable.is_empty() {
            String::new()
        } else {
            store.custom_text(variable)
        };
        log::debug!("Editing input {element} bound to '{variable}'");
        self.cursor = (0, 0);
        self.state = OskState::Editing {
            element,
            variable: variable.to_string(),
            buffer,
        };
    }

    /// Leave edit mode. The store already holds the buffer.
    pub fn finish(&mut self) {
        self.state = OskState::Inactive;
    }

    /// Handle a button while editing. Returns `true` if consumed.
    pub fn handle_input(&mut self, button: &Button, store: &mut VariableStore) -> bool {
        if !self.is_editing() {
            return false;
        }
        let (col, row) = self.cursor;

        match button {
            Button::Left => {
                self.cursor.0 = col.saturating_sub(1);
            },
            Button::Right => {
                self.cursor.0 = (col + 1).min(ROWS[row].len() - 1);
            },
            Button::Up => {
                self.move_row(row.saturating_sub(1));
            },
            Button::Down => {
                self.move_row((row + 1).min(ROWS.len() - 1));
            },
            Button::Confirm => {
                self.press(self.selected_key(), store);
            },
            Button::Start | Button::Cancel => {
                self.finish();
            },
            Button::Select => {},
        }
        true
    }

    /// Select the key under a pointer click. Clicks outside the grid are
    /// ignored.
    pub fn click(&mut self, x: i32, y: i32, store: &mut VariableStore) {
        if let Some(pos) = self.layout.key_at(x, y) {
            self.cursor = pos;
            self.press(self.selected_key(), store);
        }
    }

    /// Apply a key.
    pub fn press(&mut self, key: Key, store: &mut VariableStore) {
        match key {
            Key::Char(c) => self.type_char(c, store),
            Key::Space => self.type_char(' ', store),
            Key::Back => self.backspace(store),
            Key::Enter => self.finish(),
        }
    }

    /// Append a character from the grid or a physical keyboard.
    pub fn type_char(&mut self, c: char, store: &mut VariableStore) {
        self.edit(store, |buf| buf.push(c));
    }

    /// Remove the last character; no-op on an empty buffer.
    pub fn backspace(&mut self, store: &mut VariableStore) {
        self.edit(store, |buf| {
            buf.pop();
        });
    }

    fn edit(&mut self, store: &mut VariableStore, f: impl FnOnce(&mut String)) {
        if let OskState::Editing {
            variable, buffer, ..
        } = &mut self.state
        {
            f(buffer);
            if !variable.is_empty() {
                store.set_custom(variable.as_str(), buffer.clone());
            }
        }
    }

    /// Move to `row`, clamping the column to that row's length.
    fn move_row(&mut self, row: usize) {
        self.cursor = (self.cursor.0.min(ROWS[row].len() - 1), row);
    }
}
