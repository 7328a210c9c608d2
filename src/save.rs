//! Lifecycle/persistence adapter.
//!
//! Captures an entity's kinematic state, behaviour state, and flags into a
//! structured record and restores them losslessly. The records are plain
//! serde trees; missing fields default to zero/false so partially written
//! saves restore without error. Restoring repositions the collider and, for
//! enemies, drops any planned path: paths are never persisted, the next
//! chase tick replans.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{
    Chase, Collider, EnemyState, FacingRight, Grounded, MotionTunables, MoveIntent, PlayerState,
    Position, PursuitPath, TargetSpeed, Velocity,
};

/// Failure at the serialisation boundary; the core itself never errors.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The record could not be encoded or decoded.
    #[error("malformed save record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A 2D float pair, stored by component for save-file readability.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2Record {
    /// X component.
    #[serde(default)]
    pub x: f32,
    /// Y component.
    #[serde(default)]
    pub y: f32,
}

impl From<glam::Vec2> for Vec2Record {
    fn from(v: glam::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2Record> for glam::Vec2 {
    fn from(r: Vec2Record) -> Self {
        Self::new(r.x, r.y)
    }
}

/// Persisted player state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    /// World-space position.
    pub position: Vec2Record,
    /// Per-tick displacement at save time.
    pub velocity: Vec2Record,
    /// Target speed at save time.
    pub target_speed: Vec2Record,
    /// Behaviour state; a dead player is saved as idle so a load respawns.
    pub state: PlayerState,
    /// Grounded flag.
    pub is_grounded: bool,
    /// Horizontal facing.
    pub flip_x: bool,
}

/// Persisted movement intents of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementControlsRecord {
    /// Move-right intent.
    pub moving_right: bool,
    /// Move-left intent.
    pub moving_left: bool,
    /// Jump intent.
    pub jump: bool,
}

/// Persisted enemy state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRecord {
    /// World-space position.
    pub position: Vec2Record,
    /// Per-tick displacement at save time.
    pub velocity: Vec2Record,
    /// Target speed at save time.
    pub target_speed: Vec2Record,
    /// Behaviour state.
    pub state: EnemyState,
    /// Grounded flag.
    pub is_grounded: bool,
    /// Horizontal facing.
    pub flip_x: bool,
    /// Whether the enemy was chasing.
    pub chase: bool,
    /// Movement intents at save time.
    pub movement_controls: MovementControlsRecord,
}

/// Captures a player into a record. Dead players are recorded as idle.
#[must_use]
pub fn capture_player(
    position: &Position,
    velocity: &Velocity,
    target: &TargetSpeed,
    state: PlayerState,
    grounded: &Grounded,
    facing: &FacingRight,
) -> PlayerRecord {
    PlayerRecord {
        position: position.0.into(),
        velocity: velocity.0.into(),
        target_speed: target.0.into(),
        state: if state == PlayerState::Dead {
            PlayerState::Idle
        } else {
            state
        },
        is_grounded: grounded.0,
        flip_x: facing.0,
    }
}

/// Restores a player from a record, repositioning its collider.
#[expect(
    clippy::too_many_arguments,
    reason = "The adapter touches every persisted component by design."
)]
pub fn restore_player(
    record: &PlayerRecord,
    position: &mut Position,
    velocity: &mut Velocity,
    target: &mut TargetSpeed,
    state: &mut PlayerState,
    grounded: &mut Grounded,
    facing: &mut FacingRight,
    collider: &mut Collider,
    tunables: &MotionTunables,
) {
    position.0 = record.position.into();
    velocity.0 = record.velocity.into();
    target.0 = record.target_speed.into();
    *state = record.state;
    grounded.0 = record.is_grounded;
    facing.0 = record.flip_x;
    collider.bounds.x = position.0.x;
    collider.bounds.y = position.0.y + tunables.collider_offset;
}

/// Captures an enemy into a record.
#[must_use]
pub fn capture_enemy(
    position: &Position,
    velocity: &Velocity,
    target: &TargetSpeed,
    state: EnemyState,
    grounded: &Grounded,
    facing: &FacingRight,
    chase: &Chase,
    intent: &MoveIntent,
) -> EnemyRecord {
    EnemyRecord {
        position: position.0.into(),
        velocity: velocity.0.into(),
        target_speed: target.0.into(),
        state,
        is_grounded: grounded.0,
        flip_x: facing.0,
        chase: chase.active,
        movement_controls: MovementControlsRecord {
            moving_right: intent.right,
            moving_left: intent.left,
            jump: intent.jump,
        },
    }
}

/// Restores an enemy from a record. Any planned path is dropped; the next
/// chasing tick replans from the restored position.
#[expect(
    clippy::too_many_arguments,
    reason = "The adapter touches every persisted component by design."
)]
pub fn restore_enemy(
    record: &EnemyRecord,
    position: &mut Position,
    velocity: &mut Velocity,
    target: &mut TargetSpeed,
    state: &mut EnemyState,
    grounded: &mut Grounded,
    facing: &mut FacingRight,
    chase: &mut Chase,
    intent: &mut MoveIntent,
    path: &mut PursuitPath,
    collider: &mut Collider,
    tunables: &MotionTunables,
) {
    position.0 = record.position.into();
    velocity.0 = record.velocity.into();
    target.0 = record.target_speed.into();
    *state = record.state;
    grounded.0 = record.is_grounded;
    facing.0 = record.flip_x;
    chase.active = record.chase;
    intent.right = record.movement_controls.moving_right;
    intent.left = record.movement_controls.moving_left;
    intent.jump = record.movement_controls.jump;
    intent.down = false;
    path.clear();
    collider.bounds.x = position.0.x;
    collider.bounds.y = position.0.y + tunables.collider_offset;
}

/// Encodes a record as a JSON tree.
pub fn to_json<T: Serialize>(record: &T) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Decodes a record from a JSON tree. Missing fields take their defaults.
pub fn from_json<T: for<'de> Deserialize<'de>>(data: &str) -> Result<T, SaveError> {
    Ok(serde_json::from_str(data)?)
}
