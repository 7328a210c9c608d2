//! Fire-and-forget sound-effect boundary.
//!
//! The simulation only ever loads a handle at spawn time and plays it when a
//! jump executes; mixing and decoding belong to the embedding application,
//! which installs its own [`AudioFx`] implementation. The default
//! [`NullAudio`] backend just logs so headless runs and tests stay silent.

use bevy::prelude::*;
use log::debug;

/// Opaque handle to a loaded sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FxHandle(pub u32);

/// Sound-effect collaborator contract.
pub trait AudioFx {
    /// Loads (or looks up) the effect named `name` and returns its handle.
    fn load_fx(&mut self, name: &str) -> FxHandle;
    /// Plays a previously loaded effect. Fire-and-forget.
    fn play_fx(&self, fx: FxHandle);
}

/// Resource wrapping the installed audio backend.
#[derive(Resource)]
pub struct Sfx(pub Box<dyn AudioFx + Send + Sync>);

impl Default for Sfx {
    fn default() -> Self {
        Self(Box::new(NullAudio::default()))
    }
}

/// Logging-only audio backend used when no real mixer is installed.
#[derive(Debug, Default)]
pub struct NullAudio {
    next_handle: u32,
}

impl AudioFx for NullAudio {
    fn load_fx(&mut self, name: &str) -> FxHandle {
        let handle = FxHandle(self.next_handle);
        self.next_handle += 1;
        debug!("loaded fx {name:?} as {handle:?}");
        handle
    }

    fn play_fx(&self, fx: FxHandle) {
        debug!("play fx {fx:?}");
    }
}
