//! Entity lifecycle: configuration, spawn bundles, the death check, and the
//! deferred collider cleanup.

use bevy::prelude::*;
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::audio::Sfx;
use crate::components::{
    AnimationCue, Bounds, ChargeJump, Chase, Collider, EnemyState, FacingRight, FlyingEnemy,
    GroundEnemy, Grounded, JumpFx, MotionTunables, MoveIntent, Player, PlayerState, Position,
    PursuitPath, ReloadRequest, TargetSpeed, Velocity,
};
use crate::constants::{
    DEFAULT_ACCELERATION, DEFAULT_FALL_SPEED, DEFAULT_GRAVITY, DEFAULT_JUMP_SPEED,
    DEFAULT_MOVEMENT_SPEED, DEFAULT_THRESHOLD, MINIMUM_DISTANCE,
};
use crate::grid::TileGrid;

/// Per-entity configuration, loaded by the embedding application (for
/// example from level data) or built from the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Horizontal movement speed in world units per second.
    pub movement_speed: f32,
    /// Upward jump impulse in world units per second.
    pub jump_speed: f32,
    /// Downward gravity; zero for fliers.
    pub gravity: f32,
    /// Velocity blend factor in `(0, 1]`.
    pub acceleration: f32,
    /// Falling speed ceiling.
    pub fall_speed: f32,
    /// Velocity noise threshold.
    pub threshold: f32,
    /// Vertical collider offset.
    pub collider_offset: f32,
    /// Collider width in world units.
    pub collider_width: f32,
    /// Collider height in world units.
    pub collider_height: f32,
    /// Hold duration entering the charge state (player).
    pub charged_time: f32,
    /// Charge accumulation rate per second (player).
    pub charge_increment: f32,
    /// Charge cap inside the charge state (player).
    pub max_charge: f32,
    /// Chase gating distance (enemy).
    pub minimum_distance: f32,
    /// Jump-height constraint for the pathfinder (enemy).
    pub jump_height: i32,
    /// Name of the jump sound effect (player).
    pub jump_fx: String,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            gravity: DEFAULT_GRAVITY,
            acceleration: DEFAULT_ACCELERATION,
            fall_speed: DEFAULT_FALL_SPEED,
            threshold: DEFAULT_THRESHOLD,
            collider_offset: 0.0,
            collider_width: 14.0,
            collider_height: 30.0,
            charged_time: 1.0,
            charge_increment: 150.0,
            max_charge: 250.0,
            minimum_distance: MINIMUM_DISTANCE,
            jump_height: 3,
            jump_fx: String::from("jump.wav"),
        }
    }
}

impl EntityConfig {
    fn tunables(&self) -> MotionTunables {
        MotionTunables {
            movement_speed: self.movement_speed,
            jump_speed: self.jump_speed,
            gravity: self.gravity,
            acceleration: self.acceleration,
            fall_speed: self.fall_speed,
            threshold: self.threshold,
            collider_offset: self.collider_offset,
        }
    }

    fn collider_at(&self, position: Vec2) -> Collider {
        Collider {
            bounds: Bounds {
                x: position.x,
                y: position.y + self.collider_offset,
                w: self.collider_width,
                h: self.collider_height,
            },
            to_delete: false,
        }
    }
}

/// Kinematic components shared by every simulated entity.
#[derive(Bundle, Default)]
struct MovementBundle {
    position: Position,
    velocity: Velocity,
    target_speed: TargetSpeed,
    grounded: Grounded,
    facing: FacingRight,
    cue: AnimationCue,
    collider: Collider,
}

impl MovementBundle {
    fn at(config: &EntityConfig, position: Vec2) -> (Self, MotionTunables) {
        (
            Self {
                position: Position(position),
                grounded: Grounded(true),
                collider: config.collider_at(position),
                ..Self::default()
            },
            config.tunables(),
        )
    }
}

/// Spawns the player at `position`, loading its jump effect through the
/// installed audio backend.
pub fn spawn_player(world: &mut World, config: &EntityConfig, position: Vec2) -> Entity {
    let fx = world
        .get_resource_mut::<Sfx>()
        .map(|mut sfx| sfx.0.load_fx(config.jump_fx.as_str()))
        .unwrap_or_default();
    let charge = ChargeJump {
        charged_time: config.charged_time,
        increment: config.charge_increment,
        max_charge: config.max_charge,
        ..ChargeJump::default()
    };
    info!("spawning player at {position:?}");
    world
        .spawn((
            MovementBundle::at(config, position),
            Player,
            PlayerState::default(),
            charge,
            JumpFx(fx),
        ))
        .id()
}

fn enemy_components(config: &EntityConfig) -> (EnemyState, MoveIntent, Chase, PursuitPath) {
    (
        EnemyState::default(),
        MoveIntent::default(),
        Chase {
            active: false,
            minimum_distance: config.minimum_distance,
            jump_height: config.jump_height,
        },
        PursuitPath::default(),
    )
}

/// Spawns a walking enemy at `position`.
pub fn spawn_ground_enemy(world: &mut World, config: &EntityConfig, position: Vec2) -> Entity {
    info!("spawning ground enemy at {position:?}");
    world
        .spawn((
            MovementBundle::at(config, position),
            GroundEnemy,
            enemy_components(config),
        ))
        .id()
}

/// Spawns a flier at `position`. The gravity tunable is forced to zero;
/// fliers do not fall.
pub fn spawn_flier(world: &mut World, config: &EntityConfig, position: Vec2) -> Entity {
    let mut config = config.clone();
    config.gravity = 0.0;
    info!("spawning flier at {position:?}");
    world
        .spawn((
            MovementBundle::at(&config, position),
            FlyingEnemy,
            enemy_components(&config),
        ))
        .id()
}

/// Resets a player for respawn at `position`: idle state, zeroed motion,
/// default facing, collider repositioned. The external scene swapper calls
/// this after consuming a [`ReloadRequest`]; it is the only way out of the
/// dead state besides a save restore.
pub fn reset_player(world: &mut World, entity: Entity, position: Vec2) {
    let Some(tunables) = world.get::<MotionTunables>(entity).cloned() else {
        return;
    };
    info!("resetting player to {position:?}");
    if let Some(mut current) = world.get_mut::<Position>(entity) {
        current.0 = position;
    }
    if let Some(mut velocity) = world.get_mut::<Velocity>(entity) {
        velocity.0 = Vec2::ZERO;
    }
    if let Some(mut target) = world.get_mut::<TargetSpeed>(entity) {
        target.0 = Vec2::ZERO;
    }
    if let Some(mut state) = world.get_mut::<PlayerState>(entity) {
        *state = PlayerState::Idle;
    }
    if let Some(mut facing) = world.get_mut::<FacingRight>(entity) {
        facing.0 = true;
    }
    if let Some(mut collider) = world.get_mut::<Collider>(entity) {
        collider.bounds.x = position.x;
        collider.bounds.y = position.y + tunables.collider_offset;
    }
}

/// Kills entities that fell below the world. Death zeroes the horizontal
/// motion and, for the player, requests a level reload; everything else is
/// frozen in place until an external respawn.
pub fn check_death_system(
    grid: Option<Res<TileGrid>>,
    mut reload: ResMut<ReloadRequest>,
    mut players: Query<
        (&Position, &mut PlayerState, &mut Velocity, &mut TargetSpeed),
        With<Player>,
    >,
    mut enemies: Query<
        (&Position, &mut EnemyState, &mut Velocity, &mut TargetSpeed),
        Without<Player>,
    >,
) {
    let Some(grid) = grid else {
        return;
    };
    let death_line = grid.pixel_height();

    for (position, mut state, mut velocity, mut target) in &mut players {
        if position.0.y > death_line
            && *state != PlayerState::Dead
            && *state != PlayerState::God
        {
            info!("player fell out of the world at {:?}", position.0);
            *state = PlayerState::Dead;
            velocity.0.x = 0.0;
            target.0.x = 0.0;
            reload.0 = true;
        }
    }

    for (position, mut state, mut velocity, mut target) in &mut enemies {
        if position.0.y > death_line && *state != EnemyState::Dead {
            *state = EnemyState::Dead;
            velocity.0.x = 0.0;
            target.0.x = 0.0;
        }
    }
}

/// Despawns entities whose collider was marked for deletion. Runs at the
/// end of the tick so queries issued earlier in the same tick stay valid.
pub fn despawn_marked_system(mut commands: Commands, colliders: Query<(Entity, &Collider)>) {
    for (entity, collider) in &colliders {
        if collider.to_delete {
            commands.entity(entity).despawn();
        }
    }
}
