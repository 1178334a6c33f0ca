/// Platform-agnostic input handling system
use crate::model::BlockAction;

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    // Keyboard events, carrying DOM `code` names ("KeyW", "Space", ...)
    KeyDown(String),
    KeyUp(String),

    // Mouse events
    MouseMove { dx: f32, dy: f32 },
    MouseDown(MouseButton),

    // Window events
    FocusLost,
    VisibilityChanged { visible: bool },
    PointerLockChanged { locked: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl MouseButton {
    pub fn from_web_button(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Other,
        }
    }

    pub fn action(self) -> Option<BlockAction> {
        match self {
            MouseButton::Left => Some(BlockAction::Break),
            MouseButton::Right => Some(BlockAction::Place),
            _ => None,
        }
    }
}

/// Latched movement intent read by the integrator once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Edge-triggered; cleared at the end of every frame
    pub jump: bool,
}

/// Key mapping configuration
#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub escape: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |k: &[&str]| k.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            forward: keys(&["KeyW", "ArrowUp"]),
            backward: keys(&["KeyS", "ArrowDown"]),
            left: keys(&["KeyA", "ArrowLeft"]),
            right: keys(&["KeyD", "ArrowRight"]),
            jump: keys(&["Space"]),
            escape: "Escape".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn is_escape(&self, code: &str) -> bool {
        code == self.escape
    }

    /// Keys whose browser default (scrolling) should be suppressed
    pub fn is_bound(&self, code: &str) -> bool {
        [&self.forward, &self.backward, &self.left, &self.right, &self.jump]
            .iter()
            .any(|keys| keys.iter().any(|k| k == code))
    }
}

/// Unified input state fed by host events
pub struct InputState {
    pub intent: InputIntent,
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
    pub bindings: KeyBindings,
    jump_held: bool,
    pending_actions: Vec<BlockAction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::default())
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            intent: InputIntent::default(),
            look_delta: (0.0, 0.0),
            pointer_locked: false,
            bindings,
            jump_held: false,
            pending_actions: Vec::new(),
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(code) => self.set_key(code, true),
            InputEvent::KeyUp(code) => self.set_key(code, false),
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::MouseDown(button) => {
                if !self.pointer_locked {
                    return;
                }
                if let Some(action) = button.action() {
                    self.pending_actions.push(action);
                }
            }
            InputEvent::FocusLost | InputEvent::VisibilityChanged { .. } => {
                self.clear_keys();
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
            }
        }
    }

    fn set_key(&mut self, code: &str, down: bool) {
        let b = &self.bindings;
        let has = |keys: &[String]| keys.iter().any(|k| k == code);
        if has(&b.forward) {
            self.intent.forward = down;
        }
        if has(&b.backward) {
            self.intent.backward = down;
        }
        if has(&b.left) {
            self.intent.left = down;
        }
        if has(&b.right) {
            self.intent.right = down;
        }
        if has(&b.jump) {
            if down && !self.jump_held {
                self.intent.jump = true;
            }
            self.jump_held = down;
        }
    }

    pub fn clear_keys(&mut self) {
        self.intent = InputIntent::default();
        self.jump_held = false;
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn take_actions(&mut self) -> Vec<BlockAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Drop per-frame edges once the frame has read them
    pub fn end_frame(&mut self) {
        self.intent.jump = false;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }

    pub fn mouse_move_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseMove {
            dx: e.movement_x() as f32,
            dy: e.movement_y() as f32,
        }
    }

    pub fn mouse_down_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseDown(MouseButton::from_web_button(e.button()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;
    use winit::keyboard::KeyCode;

    /// winit key codes share their names with DOM `code` values
    pub fn key_code_name(code: KeyCode) -> String {
        format!("{code:?}")
    }

    pub fn mouse_button(button: winit::event::MouseButton) -> MouseButton {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(code: &str) -> InputEvent {
        InputEvent::KeyDown(code.to_string())
    }

    fn up(code: &str) -> InputEvent {
        InputEvent::KeyUp(code.to_string())
    }

    #[test]
    fn test_wasd_latch() {
        let mut input = InputState::new();
        input.process_event(&down("KeyW"));
        input.process_event(&down("KeyD"));
        assert!(input.intent.forward && input.intent.right);
        assert!(!input.intent.backward && !input.intent.left);

        input.process_event(&up("KeyW"));
        assert!(!input.intent.forward);
        assert!(input.intent.right);

        input.process_event(&down("ArrowDown"));
        assert!(input.intent.backward);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut input = InputState::new();
        input.process_event(&down("Space"));
        assert!(input.intent.jump);
        input.end_frame();
        assert!(!input.intent.jump);

        // auto-repeat keydown while held
        input.process_event(&down("Space"));
        assert!(!input.intent.jump);

        input.process_event(&up("Space"));
        input.process_event(&down("Space"));
        assert!(input.intent.jump);
    }

    #[test]
    fn test_focus_loss_clears_intent() {
        let mut input = InputState::new();
        input.process_event(&down("KeyA"));
        input.process_event(&down("Space"));
        input.process_event(&InputEvent::FocusLost);
        assert_eq!(input.intent, InputIntent::default());
    }

    #[test]
    fn test_clicks_and_look_need_lock() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::MouseDown(MouseButton::Left));
        input.process_event(&InputEvent::MouseMove { dx: 5.0, dy: 1.0 });
        assert!(input.take_actions().is_empty());
        assert_eq!(input.consume_look(), (0.0, 0.0));

        input.process_event(&InputEvent::PointerLockChanged { locked: true });
        input.process_event(&InputEvent::MouseDown(MouseButton::Left));
        input.process_event(&InputEvent::MouseDown(MouseButton::Middle));
        input.process_event(&InputEvent::MouseDown(MouseButton::Right));
        input.process_event(&InputEvent::MouseMove { dx: 5.0, dy: 1.0 });
        input.process_event(&InputEvent::MouseMove { dx: 2.0, dy: -3.0 });
        assert_eq!(input.take_actions(), vec![BlockAction::Break, BlockAction::Place]);
        assert_eq!(input.consume_look(), (7.0, -2.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn test_bound_keys() {
        let bindings = KeyBindings::default();
        assert!(bindings.is_bound("Space"));
        assert!(bindings.is_bound("KeyS"));
        assert!(!bindings.is_bound("KeyQ"));
        assert!(bindings.is_escape("Escape"));
    }
}
