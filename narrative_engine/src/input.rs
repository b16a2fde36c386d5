//! Input snapshots and rising-edge detection.
//!
//! The hardware layer polls the pad once per tick and hands the engine an
//! [`InputSnapshot`]. Both state machines consume [`ButtonEdges`], computed
//! once per tick from the current and previous snapshots, so "pressed this
//! tick" is derived in exactly one place and a held button never re-fires.

use serde::{Deserialize, Serialize};

/// One discrete control.
///
/// `A` doubles as the confirm button; `A`/`B`/`C` are the three choice
/// controls mapped to answer ordinals 0/1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    C,
    Start,
}

impl Button {
    /// The confirm control used to advance scene text.
    pub const CONFIRM: Button = Button::A;

    /// The three choice controls, in ordinal order.
    pub const CHOICES: [Button; 3] = [Button::A, Button::B, Button::C];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// The state of all controls at one poll, as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSnapshot(u16);

impl InputSnapshot {
    /// No buttons held.
    pub const NONE: InputSnapshot = InputSnapshot(0);

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Copy of this snapshot with one more button held.
    pub fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }

    pub fn pressed(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }
}

/// Rising-edge view of one poll against the previous one.
///
/// Computed once per tick by the controller and shared by the navigator
/// and the quiz engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdges {
    previous: InputSnapshot,
    current: InputSnapshot,
}

impl ButtonEdges {
    pub fn between(previous: InputSnapshot, current: InputSnapshot) -> Self {
        Self { previous, current }
    }

    /// True when the button is down now and was up at the previous poll.
    pub fn rising(self, button: Button) -> bool {
        self.current.pressed(button) && !self.previous.pressed(button)
    }

    /// The lowest-ordinal choice control newly pressed this tick, if any.
    ///
    /// At most one submission is accepted per tick; when several choice
    /// buttons rise together the first in ordinal order wins.
    pub fn first_rising_choice(self) -> Option<u8> {
        Button::CHOICES
            .into_iter()
            .position(|b| self.rising(b))
            .map(|i| i as u8)
    }
}
