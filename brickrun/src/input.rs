use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton},
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
};

use crate::camera::CameraInput;
use crate::math::Vec2;
use crate::physics::PlayerInput;

/// Kind of mouse activity in a [`MouseEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Moved,
    Pressed,
    Released,
}

/// One mouse event, in the order it arrived this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    /// Cursor position in virtual screen coordinates.
    pub position: Vec2,
    /// `None` for [`MouseEventKind::Moved`].
    pub button: Option<MouseButton>,
    pub kind: MouseEventKind,
}

/// Text-entry keystroke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedKey {
    Char(char),
    Backspace,
    Enter,
}

/// Tracks keyboard and mouse state across frames.
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,

    mouse_position: Vec2,
    mouse_down: [bool; 8],
    mouse_pressed: [bool; 8],
    mouse_released: [bool; 8],
    mouse_events: Vec<MouseEvent>,
    scroll_steps: i32,
    typed: Vec<TypedKey>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_down: [false; 8],
            mouse_pressed: [false; 8],
            mouse_released: [false; 8],
            mouse_events: Vec::new(),
            scroll_steps: 0,
            typed: Vec::new(),
        }
    }

    /// Clear per-frame data: edges, mouse events, scroll and typed keys.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.fill(false);
        self.mouse_released.fill(false);
        self.mouse_events.clear();
        self.scroll_steps = 0;
        self.typed.clear();
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press_key(keycode),
                ElementState::Released => self.release_key(keycode),
            }
        }

        if event.state != ElementState::Pressed {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Backspace) => self.typed.push(TypedKey::Backspace),
            Key::Named(NamedKey::Enter) => self.typed.push(TypedKey::Enter),
            Key::Named(NamedKey::Space) => self.typed.push(TypedKey::Char(' ')),
            _ => {
                if let Some(text) = &event.text {
                    self.type_text(text);
                }
            }
        }
    }

    /// Record a key going down. Repeats while held do not count as presses.
    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
        self.keys_released.insert(key);
    }

    /// Queue printable characters for text entry; control characters are dropped.
    pub fn type_text(&mut self, text: &str) {
        self.typed
            .extend(text.chars().filter(|c| !c.is_control()).map(TypedKey::Char));
    }

    pub fn type_key(&mut self, key: TypedKey) {
        self.typed.push(key);
    }

    /// Handle a mouse button input event.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(idx) = mouse_button_index(button) {
            match state {
                ElementState::Pressed => {
                    if !self.mouse_down[idx] {
                        self.mouse_pressed[idx] = true;
                    }
                    self.mouse_down[idx] = true;
                }
                ElementState::Released => {
                    self.mouse_down[idx] = false;
                    self.mouse_released[idx] = true;
                }
            }
        }
        let kind = match state {
            ElementState::Pressed => MouseEventKind::Pressed,
            ElementState::Released => MouseEventKind::Released,
        };
        self.mouse_events.push(MouseEvent {
            position: self.mouse_position,
            button: Some(button),
            kind,
        });
    }

    /// Handle cursor movement, already mapped to virtual screen coordinates.
    pub fn handle_cursor_moved(&mut self, position: Vec2) {
        self.mouse_position = position;
        self.mouse_events.push(MouseEvent {
            position,
            button: None,
            kind: MouseEventKind::Moved,
        });
    }

    /// Handle wheel scrolling. Positive steps scroll up (zoom in).
    pub fn handle_scroll(&mut self, steps: i32) {
        self.scroll_steps = self.scroll_steps.saturating_add(steps);
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_down[idx])
            .unwrap_or(false)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_pressed[idx])
            .unwrap_or(false)
    }

    /// Returns true if the mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_released[idx])
            .unwrap_or(false)
    }

    /// Current cursor position in virtual screen coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse events received this frame, oldest first.
    pub fn mouse_events(&self) -> &[MouseEvent] {
        &self.mouse_events
    }

    pub fn scroll_steps(&self) -> i32 {
        self.scroll_steps
    }

    /// Keys typed this frame, oldest first.
    pub fn typed_keys(&self) -> &[TypedKey] {
        &self.typed
    }
}

/// A gameplay action bound to one or more physical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ToggleCamera,
}

/// A physical button that can be bound to an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl Button {
    fn is_down(self, input: &InputState) -> bool {
        match self {
            Button::Key(k) => input.is_key_down(k),
            Button::Mouse(b) => input.is_mouse_down(b),
        }
    }

    fn is_pressed(self, input: &InputState) -> bool {
        match self {
            Button::Key(k) => input.is_key_pressed(k),
            Button::Mouse(b) => input.is_mouse_pressed(b),
        }
    }
}

/// Maps actions to physical inputs.
#[derive(Clone, Debug)]
pub struct InputMap {
    actions: HashMap<Action, Vec<Button>>,
}

impl Default for InputMap {
    /// A/D move, Space/W jump, arrow keys pan the free camera, C toggles it.
    fn default() -> Self {
        let mut map = Self::new();
        map.bind_key(Action::MoveLeft, KeyCode::KeyA);
        map.bind_key(Action::MoveRight, KeyCode::KeyD);
        map.bind_key(Action::Jump, KeyCode::Space);
        map.bind_key(Action::Jump, KeyCode::KeyW);
        map.bind_key(Action::PanLeft, KeyCode::ArrowLeft);
        map.bind_key(Action::PanRight, KeyCode::ArrowRight);
        map.bind_key(Action::PanUp, KeyCode::ArrowUp);
        map.bind_key(Action::PanDown, KeyCode::ArrowDown);
        map.bind_key(Action::ToggleCamera, KeyCode::KeyC);
        map
    }
}

impl InputMap {
    /// Create an empty input map.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    pub fn bind_key(&mut self, action: Action, key: KeyCode) {
        self.actions.entry(action).or_default().push(Button::Key(key));
    }

    pub fn bind_mouse_button(&mut self, action: Action, button: MouseButton) {
        self.actions
            .entry(action)
            .or_default()
            .push(Button::Mouse(button));
    }

    /// Check if an action is currently held down.
    pub fn action_down(&self, input: &InputState, action: Action) -> bool {
        self.actions
            .get(&action)
            .map(|buttons| buttons.iter().any(|&b| b.is_down(input)))
            .unwrap_or(false)
    }

    /// Check if an action was pressed this frame.
    pub fn action_pressed(&self, input: &InputState, action: Action) -> bool {
        self.actions
            .get(&action)
            .map(|buttons| buttons.iter().any(|&b| b.is_pressed(input)))
            .unwrap_or(false)
    }

    /// Axis in `[-1, 1]` from a pair of actions. Both held cancel out.
    pub fn axis(&self, input: &InputState, negative: Action, positive: Action) -> f64 {
        let mut value = 0.0;
        if self.action_down(input, negative) {
            value -= 1.0;
        }
        if self.action_down(input, positive) {
            value += 1.0;
        }
        value
    }

    /// Build the gameplay snapshot for this frame.
    pub fn frame_input(&self, input: &InputState) -> FrameInput {
        FrameInput {
            horizontal: self.axis(input, Action::MoveLeft, Action::MoveRight),
            jump_pressed: self.action_pressed(input, Action::Jump),
            pan: Vec2::new(
                self.axis(input, Action::PanLeft, Action::PanRight),
                self.axis(input, Action::PanUp, Action::PanDown),
            ),
            zoom_steps: input.scroll_steps(),
            toggle_camera: self.action_pressed(input, Action::ToggleCamera),
        }
    }
}

/// Everything the simulation reads from the player in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub horizontal: f64,
    pub jump_pressed: bool,
    pub pan: Vec2,
    pub zoom_steps: i32,
    pub toggle_camera: bool,
}

impl FrameInput {
    pub fn player(&self) -> PlayerInput {
        PlayerInput {
            horizontal: self.horizontal,
            jump_pressed: self.jump_pressed,
        }
    }

    pub fn camera(&self) -> CameraInput {
        CameraInput {
            pan: self.pan,
            zoom_steps: self.zoom_steps,
        }
    }
}

fn mouse_button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Back => Some(3),
        MouseButton::Forward => Some(4),
        MouseButton::Other(raw) => {
            let mapped = 5 + raw as usize;
            (mapped < 8).then_some(mapped)
        }
    }
}
