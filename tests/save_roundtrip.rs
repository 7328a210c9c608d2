//! Persistence adapter: lossless capture/restore, the dead-as-idle rule,
//! and tolerance of partial records.

use glam::Vec2;
use rstest::rstest;

use gully::components::{
    Bounds, Chase, Collider, EnemyState, FacingRight, Grounded, MotionTunables, MoveIntent,
    PlayerState, Position, PursuitPath, TargetSpeed, Velocity,
};
use gully::save::{
    capture_enemy, capture_player, from_json, restore_enemy, restore_player, to_json,
    EnemyRecord, PlayerRecord,
};

fn tunables() -> MotionTunables {
    MotionTunables {
        movement_speed: 150.0,
        jump_speed: 300.0,
        gravity: 600.0,
        acceleration: 0.4,
        fall_speed: 400.0,
        threshold: 0.02,
        collider_offset: 4.0,
    }
}

fn collider_at(position: Vec2) -> Collider {
    Collider {
        bounds: Bounds {
            x: position.x,
            y: position.y + 4.0,
            w: 14.0,
            h: 30.0,
        },
        to_delete: false,
    }
}

/// Capture then restore through JSON reproduces every persisted field
/// bit-for-bit and repositions the collider at the restored position.
#[rstest]
fn player_roundtrip_is_lossless() -> Result<(), gully::SaveError> {
    let record = capture_player(
        &Position(Vec2::new(123.25, -7.5)),
        &Velocity(Vec2::new(2.125, -0.5)),
        &TargetSpeed(Vec2::new(150.0, -300.0)),
        PlayerState::Jumping,
        &Grounded(false),
        &FacingRight(false),
    );
    let decoded: PlayerRecord = from_json(&to_json(&record)?)?;
    assert_eq!(decoded, record);

    let mut position = Position(Vec2::ZERO);
    let mut velocity = Velocity(Vec2::ZERO);
    let mut target = TargetSpeed(Vec2::ZERO);
    let mut state = PlayerState::Idle;
    let mut grounded = Grounded(true);
    let mut facing = FacingRight(true);
    let mut collider = collider_at(Vec2::ZERO);
    restore_player(
        &decoded,
        &mut position,
        &mut velocity,
        &mut target,
        &mut state,
        &mut grounded,
        &mut facing,
        &mut collider,
        &tunables(),
    );

    assert_eq!(position.0, Vec2::new(123.25, -7.5));
    assert_eq!(velocity.0, Vec2::new(2.125, -0.5));
    assert_eq!(target.0, Vec2::new(150.0, -300.0));
    assert_eq!(state, PlayerState::Jumping);
    assert!(!grounded.0);
    assert!(!facing.0);
    assert_eq!(collider.bounds.x, 123.25);
    assert_eq!(collider.bounds.y, -7.5 + 4.0);
    Ok(())
}

/// A dead player is captured as idle so the load respawns instead of
/// restoring a corpse.
#[rstest]
fn dead_player_is_captured_as_idle() {
    let record = capture_player(
        &Position(Vec2::ZERO),
        &Velocity(Vec2::ZERO),
        &TargetSpeed(Vec2::ZERO),
        PlayerState::Dead,
        &Grounded(true),
        &FacingRight(true),
    );
    assert_eq!(record.state, PlayerState::Idle);
}

/// Missing fields decode to their defaults rather than failing; an empty
/// object is a valid (if useless) record.
#[rstest]
fn partial_records_fill_in_defaults() -> Result<(), gully::SaveError> {
    let player: PlayerRecord = from_json("{}")?;
    assert_eq!(player, PlayerRecord::default());

    let enemy: EnemyRecord =
        from_json(r#"{"position":{"x":10.0},"state":"Moving","chase":true}"#)?;
    assert_eq!(enemy.position.x, 10.0);
    assert_eq!(enemy.position.y, 0.0);
    assert_eq!(enemy.state, EnemyState::Moving);
    assert!(enemy.chase);
    assert!(!enemy.movement_controls.jump);
    Ok(())
}

/// Enemy restore drops any planned path and the transient descend intent;
/// the next chasing tick replans from the restored position.
#[rstest]
fn enemy_restore_drops_path_and_descend_intent() -> Result<(), gully::SaveError> {
    let record = capture_enemy(
        &Position(Vec2::new(64.0, 88.0)),
        &Velocity(Vec2::new(-1.0, 0.0)),
        &TargetSpeed(Vec2::new(-150.0, 0.0)),
        EnemyState::Moving,
        &Grounded(true),
        &FacingRight(false),
        &Chase {
            active: true,
            minimum_distance: 700.0,
            jump_height: 3,
        },
        &MoveIntent {
            left: true,
            right: false,
            jump: false,
            down: true,
        },
    );
    let decoded: EnemyRecord = from_json(&to_json(&record)?)?;

    let mut position = Position(Vec2::ZERO);
    let mut velocity = Velocity(Vec2::ZERO);
    let mut target = TargetSpeed(Vec2::ZERO);
    let mut state = EnemyState::Idle;
    let mut grounded = Grounded(false);
    let mut facing = FacingRight(true);
    let mut chase = Chase {
        active: false,
        minimum_distance: 700.0,
        jump_height: 3,
    };
    let mut intent = MoveIntent::default();
    let mut path = PursuitPath::default();
    path.replace(vec![Vec2::ZERO, Vec2::ONE]);
    let mut collider = collider_at(Vec2::ZERO);
    restore_enemy(
        &decoded,
        &mut position,
        &mut velocity,
        &mut target,
        &mut state,
        &mut grounded,
        &mut facing,
        &mut chase,
        &mut intent,
        &mut path,
        &mut collider,
        &tunables(),
    );

    assert_eq!(position.0, Vec2::new(64.0, 88.0));
    assert_eq!(state, EnemyState::Moving);
    assert!(chase.active);
    assert!(intent.left);
    // The descend intent is transient and never persisted.
    assert!(!intent.down);
    assert!(path.waypoints.is_empty());
    assert_eq!(collider.bounds.x, 64.0);
    Ok(())
}
