//! Keyboard input understood by the navigation graph.

use serde::{Deserialize, Serialize};

/// Keys with a meaning for treemap and sunburst navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// `[`
    BracketLeft,
    /// `]`
    BracketRight,
    /// Space bar
    Space,
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
}

impl Key {
    /// Direction for arrow keys.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Screen direction of an arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the top of the screen
    Up,
    /// Toward the bottom of the screen
    Down,
    /// Toward the left edge
    Left,
    /// Toward the right edge
    Right,
}

/// Modifier keys held with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Control key (Cmd on Mac).
    pub ctrl: bool,
    /// Alt key (Option on Mac).
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
    /// Meta key (Windows key, Cmd on Mac).
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self::new(false, false, false, false);

    /// Ctrl only.
    pub const CTRL: Self = Self::new(true, false, false, false);

    /// Alt only.
    pub const ALT: Self = Self::new(false, true, false, false);

    /// Shift only.
    pub const SHIFT: Self = Self::new(false, false, true, false);

    /// Create custom modifiers.
    #[must_use]
    pub const fn new(ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        Self {
            ctrl,
            alt,
            shift,
            meta,
        }
    }

    /// Check if any modifier is pressed.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }

    /// Ctrl or Meta, whichever the platform uses for "command".
    #[must_use]
    pub const fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}
