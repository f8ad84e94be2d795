//! Chorded mouse gestures, Acme style.
//!
//! Holding the primary button and clicking a second one performs an edit
//! instead of the second button's usual action:
//!
//! | State       | Event         | Gesture                   | Next state  |
//! |-------------|---------------|---------------------------|-------------|
//! | Idle        | Primary down  | — (anchor a drag-select)  | PrimaryHeld |
//! | PrimaryHeld | Primary up    | —                         | Idle        |
//! | PrimaryHeld | Tertiary down | [`Gesture::Cut`]          | Idle        |
//! | PrimaryHeld | Secondary down| [`Gesture::Paste`] (chord)| Idle        |
//! | Idle        | Secondary down| [`Gesture::FindNext`]     | Idle        |
//! | Idle        | Tertiary down | [`Gesture::Paste`] (plain)| Idle        |
//!
//! The interpreter is pure: it turns raw button events into at most one
//! gesture per transition and never touches a buffer. The engine carries
//! the gestures out.

use bitflags::bitflags;

use crate::position::Position;

// ─── Buttons ────────────────────────────────────────────────────────────────

/// A pointer button. Conventionally left, right, middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Secondary,
    Tertiary,
}

impl Button {
    #[must_use]
    pub const fn flag(self) -> Buttons {
        match self {
            Self::Primary => Buttons::PRIMARY,
            Self::Secondary => Buttons::SECONDARY,
            Self::Tertiary => Buttons::TERTIARY,
        }
    }
}

bitflags! {
    /// The set of buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Buttons: u8 {
        const PRIMARY   = 0b0000_0001;
        const SECONDARY = 0b0000_0010;
        const TERTIARY  = 0b0000_0100;
    }
}

// ─── Events and gestures ────────────────────────────────────────────────────

/// A raw pointer button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Button, Position),
    Up(Button),
}

/// What a completed transition asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    None,
    /// Move the selection to the clipboard.
    Cut,
    /// Insert the clipboard at `at`. A chorded paste (`replace_selection`)
    /// first deletes the selection and pastes where it was.
    Paste { at: Position, replace_selection: bool },
    /// Search for the token under `at`.
    FindNext { at: Position },
}

/// Where the interpreter is between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChordState {
    #[default]
    Idle,
    PrimaryHeld { anchor: Position },
}

// ─── Interpreter ────────────────────────────────────────────────────────────

/// Turns button events into gestures using the table above.
#[derive(Debug, Clone, Default)]
pub struct ChordInterpreter {
    state: ChordState,
    held: Buttons,
}

impl ChordInterpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ChordState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn held(&self) -> Buttons {
        self.held
    }

    /// The drag-select anchor while the primary button is down.
    #[must_use]
    pub const fn anchor(&self) -> Option<Position> {
        match self.state {
            ChordState::PrimaryHeld { anchor } => Some(anchor),
            ChordState::Idle => None,
        }
    }

    /// Feed one event. Returns [`Gesture::None`] unless the event completes
    /// a gesture.
    ///
    /// A repeated down for a button already held is ignored. The held set
    /// is cleared whenever a gesture fires.
    pub fn handle(&mut self, event: PointerEvent) -> Gesture {
        match event {
            PointerEvent::Down(button, at) => {
                if self.held.contains(button.flag()) {
                    return Gesture::None;
                }
                self.held.insert(button.flag());

                let (next, gesture) = match (self.state, button) {
                    (ChordState::Idle, Button::Primary) => {
                        (ChordState::PrimaryHeld { anchor: at }, Gesture::None)
                    }
                    (ChordState::Idle, Button::Secondary) => {
                        (ChordState::Idle, Gesture::FindNext { at })
                    }
                    (ChordState::Idle, Button::Tertiary) => (
                        ChordState::Idle,
                        Gesture::Paste {
                            at,
                            replace_selection: false,
                        },
                    ),
                    (ChordState::PrimaryHeld { .. }, Button::Tertiary) => {
                        (ChordState::Idle, Gesture::Cut)
                    }
                    (ChordState::PrimaryHeld { .. }, Button::Secondary) => (
                        ChordState::Idle,
                        Gesture::Paste {
                            at,
                            replace_selection: true,
                        },
                    ),
                    // Held check above makes this a stray duplicate.
                    (state @ ChordState::PrimaryHeld { .. }, Button::Primary) => {
                        (state, Gesture::None)
                    }
                };

                self.state = next;
                if gesture != Gesture::None {
                    self.held = Buttons::empty();
                }
                gesture
            }
            PointerEvent::Up(button) => {
                self.held.remove(button.flag());
                if button == Button::Primary {
                    self.state = ChordState::Idle;
                }
                Gesture::None
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const P: Position = Position::new(2, 5);
    const Q: Position = Position::new(3, 1);

    fn down(b: Button, at: Position) -> PointerEvent {
        PointerEvent::Down(b, at)
    }

    // ── Transition table ────────────────────────────────────────────────

    #[test]
    fn primary_down_anchors_drag() {
        let mut ci = ChordInterpreter::new();
        assert_eq!(ci.handle(down(Button::Primary, P)), Gesture::None);
        assert_eq!(ci.state(), ChordState::PrimaryHeld { anchor: P });
        assert_eq!(ci.anchor(), Some(P));
        assert!(ci.held().contains(Buttons::PRIMARY));
    }

    #[test]
    fn primary_up_ends_drag() {
        let mut ci = ChordInterpreter::new();
        ci.handle(down(Button::Primary, P));
        assert_eq!(ci.handle(PointerEvent::Up(Button::Primary)), Gesture::None);
        assert_eq!(ci.state(), ChordState::Idle);
        assert_eq!(ci.anchor(), None);
        assert!(ci.held().is_empty());
    }

    #[test]
    fn primary_then_tertiary_cuts() {
        let mut ci = ChordInterpreter::new();
        ci.handle(down(Button::Primary, P));
        assert_eq!(ci.handle(down(Button::Tertiary, Q)), Gesture::Cut);
        assert_eq!(ci.state(), ChordState::Idle);
        assert!(ci.held().is_empty());
    }

    #[test]
    fn primary_then_secondary_pastes_over_selection() {
        let mut ci = ChordInterpreter::new();
        ci.handle(down(Button::Primary, P));
        assert_eq!(
            ci.handle(down(Button::Secondary, Q)),
            Gesture::Paste {
                at: Q,
                replace_selection: true
            }
        );
        assert_eq!(ci.state(), ChordState::Idle);
    }

    #[test]
    fn lone_secondary_finds_next() {
        let mut ci = ChordInterpreter::new();
        assert_eq!(ci.handle(down(Button::Secondary, Q)), Gesture::FindNext { at: Q });
        assert_eq!(ci.state(), ChordState::Idle);
    }

    #[test]
    fn lone_tertiary_plain_pastes() {
        let mut ci = ChordInterpreter::new();
        assert_eq!(
            ci.handle(down(Button::Tertiary, Q)),
            Gesture::Paste {
                at: Q,
                replace_selection: false
            }
        );
    }

    // ── Edge cases ──────────────────────────────────────────────────────

    #[test]
    fn releases_without_chord_do_nothing() {
        let mut ci = ChordInterpreter::new();
        for b in [Button::Primary, Button::Secondary, Button::Tertiary] {
            assert_eq!(ci.handle(PointerEvent::Up(b)), Gesture::None);
        }
        assert_eq!(ci.state(), ChordState::Idle);
    }

    #[test]
    fn duplicate_down_is_ignored() {
        let mut ci = ChordInterpreter::new();
        ci.handle(down(Button::Primary, P));
        assert_eq!(ci.handle(down(Button::Primary, Q)), Gesture::None);
        assert_eq!(ci.anchor(), Some(P), "anchor must not move");
    }

    #[test]
    fn one_gesture_per_chord() {
        let mut ci = ChordInterpreter::new();
        ci.handle(down(Button::Primary, P));
        assert_eq!(ci.handle(down(Button::Tertiary, P)), Gesture::Cut);
        // Releasing both buttons afterwards emits nothing more.
        assert_eq!(ci.handle(PointerEvent::Up(Button::Tertiary)), Gesture::None);
        assert_eq!(ci.handle(PointerEvent::Up(Button::Primary)), Gesture::None);
        assert_eq!(ci.state(), ChordState::Idle);
    }

    #[test]
    fn secondary_up_keeps_primary_held() {
        let mut ci = ChordInterpreter::new();
        ci.handle(down(Button::Primary, P));
        ci.handle(PointerEvent::Up(Button::Secondary));
        assert_eq!(ci.state(), ChordState::PrimaryHeld { anchor: P });
    }

    #[test]
    fn button_flags_are_distinct() {
        let all = Button::Primary.flag() | Button::Secondary.flag() | Button::Tertiary.flag();
        assert_eq!(all, Buttons::all());
    }
}
