use std::collections::HashSet;

use glam::Vec2;

/// Input event types the engine understands.
/// Generic: no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to world coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// A custom event from the UI layer (React buttons, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// DOM `keyCode` values the bridge forwards unchanged.
pub mod keys {
    pub const SPACE: u32 = 32;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const DIGIT_1: u32 = 49;
    pub const DIGIT_2: u32 = 50;
    pub const DIGIT_3: u32 = 51;
    pub const A: u32 = 65;
    pub const K: u32 = 75;
    pub const M: u32 = 77;
    pub const W: u32 = 87;
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A UI event carried through to the game untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomInput {
    pub kind: u32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

/// Held/edge view of input, folded from the queue once per tick.
///
/// Held keys and the pointer position persist across ticks; presses,
/// releases and custom events only live for the tick that saw them.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<u32>,
    pressed: HashSet<u32>,
    released: HashSet<u32>,
    pointer: Vec2,
    pointer_down: bool,
    pointer_pressed: Option<Vec2>,
    pointer_released: Option<Vec2>,
    customs: Vec<CustomInput>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last tick's edges and fold in this tick's events.
    pub fn begin_tick(&mut self, queue: &InputQueue) {
        self.pressed.clear();
        self.released.clear();
        self.pointer_pressed = None;
        self.pointer_released = None;
        self.customs.clear();
        for event in queue.iter() {
            self.apply(event);
        }
    }

    /// Fold a single event into the state.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = true;
                self.pointer_pressed = Some(self.pointer);
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = false;
                self.pointer_released = Some(self.pointer);
            }
            InputEvent::PointerMove { x, y } => {
                self.pointer = Vec2::new(x, y);
            }
            InputEvent::KeyDown { key_code } => {
                // Auto-repeat keydowns are not fresh presses.
                if self.held.insert(key_code) {
                    self.pressed.insert(key_code);
                }
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
                self.released.insert(key_code);
            }
            InputEvent::Custom { kind, a, b, c } => {
                self.customs.push(CustomInput { kind, a, b, c });
            }
        }
    }

    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    pub fn was_pressed(&self, key_code: u32) -> bool {
        self.pressed.contains(&key_code)
    }

    pub fn was_released(&self, key_code: u32) -> bool {
        self.released.contains(&key_code)
    }

    /// Last known pointer position in world coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Where the pointer went down this tick, if it did.
    pub fn pointer_pressed(&self) -> Option<Vec2> {
        self.pointer_pressed
    }

    /// Where the pointer came up this tick, if it did.
    pub fn pointer_released(&self) -> Option<Vec2> {
        self.pointer_released
    }

    pub fn customs(&self) -> &[CustomInput] {
        &self.customs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 32 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        let mut state = InputState::new();
        state.begin_tick(&q);
        assert_eq!(
            state.customs(),
            &[CustomInput { kind: 7, a: 1.5, b: 2.5, c: 3.5 }]
        );
    }

    #[test]
    fn key_edges_last_one_tick() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: keys::A });
        let mut state = InputState::new();
        state.begin_tick(&q);
        assert!(state.was_pressed(keys::A));
        assert!(state.is_held(keys::A));

        state.begin_tick(&InputQueue::new());
        assert!(!state.was_pressed(keys::A));
        assert!(state.is_held(keys::A));

        let mut q = InputQueue::new();
        q.push(InputEvent::KeyUp { key_code: keys::A });
        state.begin_tick(&q);
        assert!(state.was_released(keys::A));
        assert!(!state.is_held(keys::A));
    }

    #[test]
    fn repeated_keydown_is_one_press() {
        let mut state = InputState::new();
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: keys::W });
        state.begin_tick(&q);
        assert!(state.was_pressed(keys::W));

        // Browser auto-repeat
        state.begin_tick(&q);
        assert!(!state.was_pressed(keys::W));
    }

    #[test]
    fn pointer_edges_and_position() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 5.0, y: 6.0 });
        q.push(InputEvent::PointerDown { x: 7.0, y: 8.0 });
        let mut state = InputState::new();
        state.begin_tick(&q);
        assert_eq!(state.pointer_pressed(), Some(Vec2::new(7.0, 8.0)));
        assert!(state.pointer_down());

        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 20.0, y: 8.0 });
        q.push(InputEvent::PointerUp { x: 30.0, y: 8.0 });
        state.begin_tick(&q);
        assert_eq!(state.pointer_pressed(), None);
        assert_eq!(state.pointer_released(), Some(Vec2::new(30.0, 8.0)));
        assert_eq!(state.pointer(), Vec2::new(30.0, 8.0));
        assert!(!state.pointer_down());
    }
}
