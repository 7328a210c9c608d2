//! Player state machine behaviour, driven through the control system in
//! isolation so each tick's transitions are observable without the
//! integrator reshaping targets.

use bevy::prelude::*;
use glam::Vec2;
use rstest::rstest;

use gully::control::player_control_system;
use gully::kinematics::{god_toggle_system, integrate_player_system};
use gully::spawn::{reset_player, spawn_player, EntityConfig};
use gully::{
    Action, AnimationCue, ChargeJump, Collider, ControlInput, FacingRight, Grounded, PlayerState,
    Position, Sfx, TargetSpeed, TickClock, Velocity,
};

fn control_app() -> (App, Entity) {
    let mut app = App::new();
    app.init_resource::<ControlInput>()
        .init_resource::<Sfx>()
        .add_systems(Update, (god_toggle_system, player_control_system).chain());
    let player = spawn_player(app.world_mut(), &EntityConfig::default(), Vec2::ZERO);
    (app, player)
}

fn input(app: &mut App) -> Mut<'_, ControlInput> {
    app.world_mut().resource_mut::<ControlInput>()
}

fn tick(app: &mut App) {
    input(app).tick();
    app.update();
}

/// The jump fires on the release edge, never on the press, and the impulse
/// is exactly the configured jump speed.
#[rstest]
fn jump_fires_on_release_with_exact_impulse() {
    let (mut app, player) = control_app();

    input(&mut app).press(Action::Jump);
    app.update();
    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Idle)
    );

    // Pressed -> Held: still no jump, the charge timer starts instead.
    tick(&mut app);
    let charge = app.world().get::<ChargeJump>(player).copied();
    assert_eq!(charge.map(|c| c.charging), Some(true));
    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Idle)
    );

    input(&mut app).tick();
    input(&mut app).release(Action::Jump);
    app.update();

    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Jumping)
    );
    assert_eq!(
        app.world().get::<TargetSpeed>(player).map(|t| t.0.y),
        Some(-300.0)
    );
    assert_eq!(app.world().get::<Grounded>(player).map(|g| g.0), Some(false));
    let charge = app.world().get::<ChargeJump>(player).copied();
    assert_eq!(charge.map(|c| (c.charging, c.value)), Some((false, 0.0)));
}

/// Holding jump past the charge threshold enters the charge state.
#[rstest]
fn held_jump_past_threshold_enters_charge() {
    let (mut app, player) = control_app();
    if let Some(mut charge) = app.world_mut().get_mut::<ChargeJump>(player) {
        charge.value = 1.0; // At the charged_time threshold.
    }
    input(&mut app).press(Action::Jump);
    input(&mut app).tick(); // Promote to Held.
    app.update();

    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Charge)
    );
    assert_eq!(
        app.world().get::<ChargeJump>(player).map(|c| c.charging),
        Some(false)
    );
    assert_eq!(
        app.world().get::<AnimationCue>(player).copied(),
        Some(AnimationCue::Charge)
    );
}

/// Releasing a charged jump with a direction held splits the boost: the
/// full value horizontally and half of it vertically.
#[rstest]
#[case::rightward(Action::Right, true)]
#[case::leftward(Action::Left, false)]
fn diagonal_charged_release_splits_the_boost(
    #[case] direction: Action,
    #[case] facing_right: bool,
) {
    let (mut app, player) = control_app();
    if let Some(mut state) = app.world_mut().get_mut::<PlayerState>(player) {
        *state = PlayerState::Charge;
    }
    if let Some(mut charge) = app.world_mut().get_mut::<ChargeJump>(player) {
        charge.value = 200.0;
    }

    input(&mut app).press(direction);
    input(&mut app).tick(); // Direction is Held on the release tick.
    input(&mut app).release(Action::Jump);
    app.update();

    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Jumping)
    );
    // Vertical boost is half the charge on a diagonal release.
    assert_eq!(
        app.world().get::<TargetSpeed>(player).map(|t| t.0.y),
        Some(-400.0)
    );
    let charge = app.world().get::<ChargeJump>(player).copied();
    assert_eq!(charge.map(|c| c.boost_x), Some(200.0));
    assert_eq!(charge.map(|c| c.value), Some(0.0));

    // The next airborne tick applies the boosted horizontal target.
    tick(&mut app);
    let expected_x = if facing_right { 350.0 } else { -350.0 };
    assert_eq!(
        app.world().get::<TargetSpeed>(player).map(|t| t.0.x),
        Some(expected_x)
    );
    assert_eq!(
        app.world().get::<FacingRight>(player).map(|f| f.0),
        Some(facing_right)
    );
}

/// A straight charged release puts the whole boost into the vertical.
#[rstest]
fn vertical_charged_release_uses_full_boost() {
    let (mut app, player) = control_app();
    if let Some(mut state) = app.world_mut().get_mut::<PlayerState>(player) {
        *state = PlayerState::Charge;
    }
    if let Some(mut charge) = app.world_mut().get_mut::<ChargeJump>(player) {
        charge.value = 200.0;
    }

    input(&mut app).release(Action::Jump);
    app.update();

    assert_eq!(
        app.world().get::<TargetSpeed>(player).map(|t| t.0.y),
        Some(-500.0)
    );
    assert_eq!(
        app.world().get::<ChargeJump>(player).map(|c| c.boost_x),
        Some(0.0)
    );
}

/// Losing the ground mid-charge forfeits the accumulated value.
#[rstest]
fn airborne_charge_without_release_is_lost() {
    let (mut app, player) = control_app();
    if let Some(mut state) = app.world_mut().get_mut::<PlayerState>(player) {
        *state = PlayerState::Charge;
    }
    if let Some(mut charge) = app.world_mut().get_mut::<ChargeJump>(player) {
        charge.value = 120.0;
    }
    if let Some(mut grounded) = app.world_mut().get_mut::<Grounded>(player) {
        grounded.0 = false;
    }

    input(&mut app).press(Action::Jump);
    input(&mut app).tick(); // Still holding; no release edge.
    app.update();

    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Jumping)
    );
    assert_eq!(
        app.world().get::<ChargeJump>(player).map(|c| c.value),
        Some(0.0)
    );
}

/// Resetting a dead player respawns it idle at the given position with
/// motion zeroed, facing restored, and the collider moved along.
#[rstest]
fn reset_revives_a_dead_player_in_place() {
    let mut world = World::new();
    let config = EntityConfig::default();
    let player = spawn_player(&mut world, &config, Vec2::new(64.0, 80.0));

    // Leave the player dead and drifting after a fall.
    if let Some(mut state) = world.get_mut::<PlayerState>(player) {
        *state = PlayerState::Dead;
    }
    if let Some(mut velocity) = world.get_mut::<Velocity>(player) {
        velocity.0 = Vec2::new(0.0, 6.5);
    }
    if let Some(mut target) = world.get_mut::<TargetSpeed>(player) {
        target.0 = Vec2::new(0.0, 400.0);
    }
    if let Some(mut facing) = world.get_mut::<FacingRight>(player) {
        facing.0 = false;
    }

    reset_player(&mut world, player, Vec2::new(16.0, 32.0));

    assert_eq!(
        world.get::<PlayerState>(player).copied(),
        Some(PlayerState::Idle)
    );
    assert_eq!(world.get::<Position>(player).map(|p| p.0), Some(Vec2::new(16.0, 32.0)));
    assert_eq!(world.get::<Velocity>(player).map(|v| v.0), Some(Vec2::ZERO));
    assert_eq!(world.get::<TargetSpeed>(player).map(|t| t.0), Some(Vec2::ZERO));
    assert_eq!(world.get::<FacingRight>(player).map(|f| f.0), Some(true));
    let bounds = world.get::<Collider>(player).map(|c| (c.bounds.x, c.bounds.y));
    assert_eq!(bounds, Some((16.0, 32.0 + config.collider_offset)));
}

/// Charge accumulation inside the charge state stops at the cap: once the
/// value reaches `max_charge` no further ticks grow it.
#[rstest]
fn charge_accumulation_is_bounded_by_the_cap() {
    let mut app = App::new();
    app.init_resource::<TickClock>()
        .add_systems(Update, integrate_player_system);
    let config = EntityConfig::default();
    let player = spawn_player(app.world_mut(), &config, Vec2::ZERO);
    if let Some(mut state) = app.world_mut().get_mut::<PlayerState>(player) {
        *state = PlayerState::Charge;
    }

    // Long enough to overshoot max_charge at increment * dt per tick.
    for _ in 0..200 {
        app.update();
    }

    let value = app.world().get::<ChargeJump>(player).map(|c| c.value);
    let per_tick = config.charge_increment / 60.0;
    assert!(
        value.is_some_and(|v| v >= config.max_charge && v < config.max_charge + per_tick),
        "charge {value:?} not settled at the {} cap",
        config.max_charge
    );

    // Settled: further ticks change nothing.
    app.update();
    assert_eq!(app.world().get::<ChargeJump>(player).map(|c| c.value), value);
}

/// With unchanged inputs the machine is idempotent: repeating a tick leaves
/// state, target speed, and facing untouched.
#[rstest]
fn control_tick_is_idempotent_with_unchanged_input() {
    let (mut app, player) = control_app();
    input(&mut app).press(Action::Right);
    input(&mut app).tick(); // Held from here on.

    app.update();
    app.update();
    let snapshot = (
        app.world().get::<PlayerState>(player).copied(),
        app.world().get::<TargetSpeed>(player).map(|t| t.0),
        app.world().get::<FacingRight>(player).map(|f| f.0),
    );
    app.update();
    let repeated = (
        app.world().get::<PlayerState>(player).copied(),
        app.world().get::<TargetSpeed>(player).map(|t| t.0),
        app.world().get::<FacingRight>(player).map(|f| f.0),
    );
    assert_eq!(snapshot, repeated);
    assert_eq!(snapshot.0, Some(PlayerState::Moving));
    assert_eq!(snapshot.1, Some(Vec2::new(150.0, 0.0)));
}

/// The god toggle flips on the press edge only, in both directions.
#[rstest]
fn god_toggle_flips_on_the_press_edge() {
    let (mut app, player) = control_app();

    input(&mut app).press(Action::GodToggle);
    app.update();
    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::God)
    );

    // Held does not re-toggle.
    tick(&mut app);
    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::God)
    );

    input(&mut app).tick();
    input(&mut app).release(Action::GodToggle);
    app.update();
    input(&mut app).tick();
    input(&mut app).press(Action::GodToggle);
    app.update();
    assert_eq!(
        app.world().get::<PlayerState>(player).copied(),
        Some(PlayerState::Idle)
    );
}

/// Win halts horizontal pursuit of input; Dead only emits its cue.
#[rstest]
#[case::win(PlayerState::Win, AnimationCue::Win)]
#[case::dead(PlayerState::Dead, AnimationCue::Dead)]
fn terminal_states_ignore_movement_input(#[case] state: PlayerState, #[case] cue: AnimationCue) {
    let (mut app, player) = control_app();
    if let Some(mut current) = app.world_mut().get_mut::<PlayerState>(player) {
        *current = state;
    }
    input(&mut app).press(Action::Right);
    input(&mut app).tick();
    app.update();

    assert_eq!(app.world().get::<PlayerState>(player).copied(), Some(state));
    assert_eq!(app.world().get::<AnimationCue>(player).copied(), Some(cue));
    if state == PlayerState::Win {
        assert_eq!(
            app.world().get::<TargetSpeed>(player).map(|t| t.0.x),
            Some(0.0)
        );
    }
}
