// Pixcade
// copyright pixcade contributors 2024～2026

//! The unified input Event describing keyboard input, plus InputState,
//! the per-step view of it: a held-key set for continuous controls
//! (thrust, paddle movement) and drained key-down edges for one-shot
//! actions (shoot, rotate, hard drop). Backend events from the render
//! adapter are converted to these types before any game sees them.

use bitflags::bitflags;
use std::collections::HashMap;

/// How long a key counts as held after its last press or repeat, for
/// terminal backends that never deliver release events. Backends that do
/// deliver releases clear the key immediately.
const HOLD_WINDOW: f32 = 0.20;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Event {
    /// A single key event with additional pressed modifiers.
    Key(KeyEvent),
}

bitflags! {
    /// Represents key modifiers (shift, control, alt).
    #[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CONTROL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const NONE = 0b0000_0000;
    }
}

#[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyEventKind {
    Press,
    Repeat,
    Release,
}

/// Represents a key event.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct KeyEvent {
    /// The key itself.
    pub code: KeyCode,
    /// Additional key modifiers.
    pub modifiers: KeyModifiers,
    /// Kind of event.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    pub const fn new_with_kind(
        code: KeyCode,
        modifiers: KeyModifiers,
        kind: KeyEventKind,
    ) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }
}

/// Represents a key.
#[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyCode {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Tab,
    Delete,
    /// `KeyCode::F(1)` represents F1 key, etc.
    F(u8),
    /// `KeyCode::Char('c')` represents `c` character, etc.
    Char(char),
    Null,
    Esc,
}

/// The input-state buffer a step reads. Held keys are last-write-wins;
/// edge events are delivered at most once per physical key-down through
/// Context::input_events, which every step drains.
#[derive(Default)]
pub struct InputState {
    held: HashMap<KeyCode, f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// fold one backend event into the held set
    pub fn apply(&mut self, e: &Event) {
        let Event::Key(k) = e;
        match k.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(k.code, HOLD_WINDOW);
            }
            KeyEventKind::Release => {
                self.held.remove(&k.code);
            }
        }
    }

    /// age held keys; keys not refreshed within the hold window expire
    pub fn tick(&mut self, dt: f32) {
        self.held.retain(|_, ttl| {
            *ttl -= dt;
            *ttl > 0.0
        });
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains_key(&code)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn release(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ))
    }

    #[test]
    fn press_holds_and_release_clears() {
        let mut s = InputState::new();
        s.apply(&press(KeyCode::Up));
        assert!(s.is_held(KeyCode::Up));
        s.apply(&release(KeyCode::Up));
        assert!(!s.is_held(KeyCode::Up));
    }

    #[test]
    fn unrefreshed_keys_expire() {
        let mut s = InputState::new();
        s.apply(&press(KeyCode::Left));
        s.tick(0.1);
        assert!(s.is_held(KeyCode::Left));
        s.tick(0.15);
        assert!(!s.is_held(KeyCode::Left));
    }

    #[test]
    fn repeat_refreshes_the_window() {
        let mut s = InputState::new();
        s.apply(&press(KeyCode::Char(' ')));
        s.tick(0.15);
        s.apply(&Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        )));
        s.tick(0.15);
        assert!(s.is_held(KeyCode::Char(' ')));
    }
}
