//! Simulation constants shared across systems.
//!
//! Per-entity tunables live in [`crate::spawn::EntityConfig`]; the values
//! here are fixed properties of the simulation itself.

/// Fixed simulation timestep in seconds. The core is frame-synchronous;
/// every tick advances the world by exactly this much unless the caller
/// overrides [`crate::components::TickClock`].
pub const DELTA_TIME: f32 = 1.0 / 60.0;

/// Horizontal slack passed to the pathfinder on every replan.
pub const PATH_SLACK_X: i32 = 5;
/// Vertical slack passed to the pathfinder on every replan.
pub const PATH_SLACK_Y: i32 = 5;

/// Manhattan-distance threshold below which an enemy starts chasing.
pub const MINIMUM_DISTANCE: f32 = 700.0;

/// Default horizontal movement speed in world units per second.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 150.0;
/// Default upward jump impulse in world units per second.
pub const DEFAULT_JUMP_SPEED: f32 = 300.0;
/// Default downward gravity in world units per second squared.
pub const DEFAULT_GRAVITY: f32 = 600.0;
/// Default velocity blend factor; must stay within `(0, 1]`.
pub const DEFAULT_ACCELERATION: f32 = 0.4;
/// Default falling speed ceiling in world units per second.
pub const DEFAULT_FALL_SPEED: f32 = 400.0;
/// Default per-axis speed below which velocity snaps to exactly zero.
pub const DEFAULT_THRESHOLD: f32 = 0.02;
