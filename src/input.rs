//! Key-state input boundary.
//!
//! The core never polls a device; the embedding application (or a test)
//! writes key edges into [`ControlInput`] and advances them with
//! [`ControlInput::tick`] once per frame. The four-way state mirrors the
//! usual platformer input contract: a press is visible as `Pressed` for one
//! tick, then `Held` until the release tick reports `Released`.

use bevy::prelude::*;

/// Per-key state for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Not held.
    #[default]
    Idle,
    /// Went down this tick.
    Pressed,
    /// Held since a previous tick.
    Held,
    /// Went up this tick.
    Released,
}

/// Logical actions the simulation reads. The embedding application owns the
/// mapping from physical keys to actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Fly up (god mode only).
    Up,
    /// Fly down (god mode only).
    Down,
    /// Jump; doubles as the charge key while held.
    Jump,
    /// Toggle god mode.
    GodToggle,
}

/// Current key state for every [`Action`].
#[derive(Resource, Debug, Clone, Default)]
pub struct ControlInput {
    left: KeyState,
    right: KeyState,
    up: KeyState,
    down: KeyState,
    jump: KeyState,
    god_toggle: KeyState,
}

impl ControlInput {
    /// Returns the state of `action` this tick.
    #[must_use]
    pub fn state(&self, action: Action) -> KeyState {
        *self.slot_ref(action)
    }

    /// Registers a key-down edge for `action`.
    pub fn press(&mut self, action: Action) {
        *self.slot_mut(action) = KeyState::Pressed;
    }

    /// Registers a key-up edge for `action`.
    pub fn release(&mut self, action: Action) {
        *self.slot_mut(action) = KeyState::Released;
    }

    /// Advances edges: `Pressed` becomes `Held`, `Released` becomes `Idle`.
    /// Call once per frame before feeding new edges.
    pub fn tick(&mut self) {
        for action in [
            Action::Left,
            Action::Right,
            Action::Up,
            Action::Down,
            Action::Jump,
            Action::GodToggle,
        ] {
            let slot = self.slot_mut(action);
            *slot = match *slot {
                KeyState::Pressed | KeyState::Held => KeyState::Held,
                KeyState::Released | KeyState::Idle => KeyState::Idle,
            };
        }
    }

    fn slot_ref(&self, action: Action) -> &KeyState {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Up => &self.up,
            Action::Down => &self.down,
            Action::Jump => &self.jump,
            Action::GodToggle => &self.god_toggle,
        }
    }

    fn slot_mut(&mut self, action: Action) -> &mut KeyState {
        match action {
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Up => &mut self.up,
            Action::Down => &mut self.down,
            Action::Jump => &mut self.jump,
            Action::GodToggle => &mut self.god_toggle,
        }
    }
}
