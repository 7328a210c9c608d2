//! ECS component types used by the simulation.
//!
//! Includes kinematic state, per-entity tunables, behaviour state enums,
//! colliders, and the pursuit bookkeeping carried by enemies. Entity kinds
//! are marker components; systems dispatch by querying on them instead of
//! through an inheritance chain.

use bevy::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DELTA_TIME;

/// World-space position in pixels. Y grows downward.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Position(pub Vec2);

/// Per-tick displacement produced by the integrator and consumed by the
/// collision clamp. Not a rate: the timestep is already folded in by the
/// blend (see [`crate::kinematics::blend_velocity`]).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec2);

/// Velocity the integrator smooths toward, in world units per second.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TargetSpeed(pub Vec2);

/// Movement tunables attached to every simulated entity.
#[derive(Component, Debug, Clone)]
pub struct MotionTunables {
    /// Horizontal movement speed in world units per second.
    pub movement_speed: f32,
    /// Upward jump impulse in world units per second.
    pub jump_speed: f32,
    /// Downward gravity in world units per second squared. Zero for fliers.
    pub gravity: f32,
    /// Exponential blend factor in `(0, 1]`. This is a smoothing weight,
    /// not a physical acceleration.
    pub acceleration: f32,
    /// Falling speed ceiling; ascending speed is never capped.
    pub fall_speed: f32,
    /// Per-axis speed below which velocity snaps to exactly zero.
    pub threshold: f32,
    /// Vertical offset between the entity position and its collider.
    pub collider_offset: f32,
}

/// True when the collider had zero clearance below it this tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Grounded(pub bool);

/// Horizontal facing, used by the external renderer to flip sprites.
#[derive(Component, Debug, Clone, Copy)]
pub struct FacingRight(pub bool);

impl Default for FacingRight {
    fn default() -> Self {
        Self(true)
    }
}

/// Which animation the state machine selected this tick. Rendering itself
/// is an external collaborator; the cue is the boundary.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationCue {
    /// Standing still.
    #[default]
    Idle,
    /// Running.
    Moving,
    /// Airborne (also shown while in god mode).
    Jumping,
    /// Held on the death frame; never advances.
    Dead,
    /// Crouched, accumulating a charged jump.
    Charge,
    /// Level-complete celebration.
    Win,
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge (Y grows downward).
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Bounds {
    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Collision rectangle bound 1:1 to an entity. Repositioned every tick to
/// track [`Position`] (with the vertical collider offset applied).
///
/// Deletion is deferred: external systems set [`Collider::to_delete`] and
/// the cleanup pass despawns the entity at the end of the tick, so in-flight
/// collision queries are never invalidated mid-tick.
#[derive(Component, Debug, Clone, Default)]
pub struct Collider {
    /// Current world-space rectangle.
    pub bounds: Bounds,
    /// Marks the owning entity for the deferred cleanup pass.
    pub to_delete: bool,
}

/// Marker for the player entity.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Marker for a walking enemy.
#[derive(Component, Debug, Default)]
pub struct GroundEnemy;

/// Marker for a flying enemy. Fliers carry zero gravity, translate the
/// pursuit jump intent into upward movement, and never become grounded.
#[derive(Component, Debug, Default)]
pub struct FlyingEnemy;

/// Behaviour state of the player. Extends the shared subset with the
/// player-only `Charge`, `Win`, and `God` states.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Standing; horizontal target speed forced to zero.
    #[default]
    Idle,
    /// Running left or right.
    Moving,
    /// Airborne, with air control.
    Jumping,
    /// Terminal within the core; only an external respawn leaves it.
    Dead,
    /// Holding a charged jump; cannot move horizontally.
    Charge,
    /// Level complete; horizontal target speed frozen.
    Win,
    /// Free-fly debug mode; ignores collision and gravity.
    God,
}

/// Behaviour state of an enemy: the shared subset only.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Standing; horizontal target speed forced to zero.
    #[default]
    Idle,
    /// Walking left or right.
    Moving,
    /// Airborne.
    Jumping,
    /// Terminal within the core.
    Dead,
}

/// Charged-jump bookkeeping, player only.
///
/// `value` accumulates passively while the jump key is held across
/// `Idle`/`Moving` (bounded by `charged_time`), then per-tick inside the
/// `Charge` state (bounded by `max_charge`). It is consumed, and reset to
/// zero, when the jump executes.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ChargeJump {
    /// Set while the jump key is held outside the `Charge` state.
    pub charging: bool,
    /// Accumulated boost magnitude.
    pub value: f32,
    /// Hold duration after which the entity enters `Charge`.
    pub charged_time: f32,
    /// Accumulation rate per second.
    pub increment: f32,
    /// Hard cap on `value` while in `Charge`.
    pub max_charge: f32,
    /// Horizontal boost applied during the airborne phase of a diagonal
    /// charged jump; cleared on landing or direction reversal.
    pub boost_x: f32,
}

/// Handle of the jump sound effect loaded at spawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct JumpFx(pub crate::audio::FxHandle);

/// Directional and jump intents feeding an enemy's state machine.
///
/// Left and right are stored independently; equal values mean neutral.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// Move left this tick.
    pub left: bool,
    /// Move right this tick.
    pub right: bool,
    /// Jump (fliers: ascend) this tick.
    pub jump: bool,
    /// Descend this tick; fliers only.
    pub down: bool,
}

impl MoveIntent {
    /// Resets every intent to neutral.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Chase gating state and pathfinder constraints, enemy only.
#[derive(Component, Debug, Clone)]
pub struct Chase {
    /// Whether the chase predicate held this tick.
    pub active: bool,
    /// Manhattan-distance threshold enabling pursuit.
    pub minimum_distance: f32,
    /// Jump-height constraint handed to the pathfinder.
    pub jump_height: i32,
}

/// Planned waypoint sequence and the cursor tracking progress along it.
///
/// The cursor indices are monotonically non-decreasing until the path is
/// cleared. `next` is `None` when no further waypoint exists.
#[derive(Component, Debug, Clone, Default)]
pub struct PursuitPath {
    /// Ordered world-space waypoints, centred on their tiles.
    pub waypoints: Vec<Vec2>,
    /// Index of the last waypoint passed.
    pub previous: usize,
    /// Index of the waypoint currently steered toward.
    pub current: usize,
    /// Index of the waypoint after the current one, if any.
    pub next: Option<usize>,
}

impl PursuitPath {
    /// Replaces the waypoint sequence and resets the cursor.
    pub fn replace(&mut self, waypoints: Vec<Vec2>) {
        self.current = if waypoints.len() > 1 { 1 } else { 0 };
        self.previous = 0;
        self.next = if waypoints.len() > 2 { Some(2) } else { None };
        self.waypoints = waypoints;
    }

    /// Advances the cursor past a reached waypoint, clearing the path once
    /// the cursor runs off the end.
    pub fn advance(&mut self) {
        self.previous = self.current;
        self.current += 1;
        self.next = if self.current + 1 < self.waypoints.len() {
            Some(self.current + 1)
        } else {
            None
        };
        if self.current >= self.waypoints.len() {
            self.clear();
        }
    }

    /// Drops the waypoint sequence and resets the cursor.
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.previous = 0;
        self.current = 0;
        self.next = None;
    }
}

/// Fixed simulation timestep, in seconds per tick.
#[derive(Resource, Debug, Clone, Copy)]
pub struct TickClock {
    /// Seconds advanced per tick.
    pub dt: f32,
}

impl Default for TickClock {
    fn default() -> Self {
        Self { dt: DELTA_TIME }
    }
}

/// Raised by the death check when the player falls out of the world; the
/// external scene swapper reads and clears it.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ReloadRequest(pub bool);
