//! Kinematic integrator.
//!
//! The integrator blends the target speed toward the current velocity with
//! an exponential-smoothing factor and folds the timestep into the result:
//!
//! `velocity = (target * a + velocity * (1 - a)) * dt`
//!
//! Note that `dt` scales the *blend result*, not the target alone. The
//! scheme is slightly non-physical but unconditionally stable, and the rest
//! of the core depends on its exact motion curves, so it is reproduced
//! as-is. Gravity accumulates into the vertical target speed while airborne
//! and is capped by the falling speed ceiling; ascending speed is never
//! capped.

use bevy::prelude::*;
use glam::Vec2;

use crate::components::{
    ChargeJump, EnemyState, FlyingEnemy, GroundEnemy, MotionTunables, Player, PlayerState,
    TargetSpeed, TickClock, Velocity,
};
use crate::input::{Action, ControlInput, KeyState};

/// Blends `target` toward `velocity` and scales by the timestep.
///
/// For `acceleration` in `(0, 1)` the unscaled blend is a convex
/// combination of the two inputs; at `1.0` the result is exactly
/// `target * dt`.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use gully::kinematics::blend_velocity;
///
/// let v = blend_velocity(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0, 0.5);
/// assert!((v.x - 5.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn blend_velocity(target: Vec2, velocity: Vec2, acceleration: f32, dt: f32) -> Vec2 {
    (target * acceleration + velocity * (1.0 - acceleration)) * dt
}

/// Accumulates gravity into a vertical target speed, capped at the falling
/// speed ceiling. Y grows downward, so falling speed is positive.
#[must_use]
pub fn apply_gravity(target_y: f32, gravity: f32, fall_speed: f32, dt: f32) -> f32 {
    let accelerated = target_y + gravity * dt;
    accelerated.min(fall_speed)
}

/// Toggles the player between god mode and idle on the toggle edge.
pub fn god_toggle_system(
    input: Res<ControlInput>,
    mut players: Query<&mut PlayerState, With<Player>>,
) {
    if input.state(Action::GodToggle) != KeyState::Pressed {
        return;
    }
    for mut state in &mut players {
        *state = if *state == PlayerState::God {
            PlayerState::Idle
        } else {
            PlayerState::God
        };
    }
}

/// Integrates the player: gravity while airborne, charge accumulation, and
/// the velocity blend.
///
/// Charge accumulation lives here rather than in the state machine because
/// it is a per-tick integration: bounded by `charged_time` while the key is
/// merely held, and by `max_charge` once the `Charge` state is entered.
pub fn integrate_player_system(
    clock: Res<TickClock>,
    mut players: Query<
        (
            &mut TargetSpeed,
            &mut Velocity,
            &mut ChargeJump,
            &PlayerState,
            &MotionTunables,
        ),
        With<Player>,
    >,
) {
    let dt = clock.dt;
    for (mut target, mut velocity, mut charge, state, tunables) in &mut players {
        match state {
            PlayerState::Jumping => {
                target.0.y =
                    apply_gravity(target.0.y, tunables.gravity, tunables.fall_speed, dt);
            }
            PlayerState::Charge => {
                if charge.value < charge.max_charge {
                    charge.value += charge.increment * dt;
                }
            }
            _ => {
                if charge.charging && charge.value < charge.charged_time {
                    charge.value += charge.increment * dt;
                }
            }
        }
        velocity.0 = blend_velocity(target.0, velocity.0, tunables.acceleration, dt);
    }
}

/// Integrates enemies. Fliers share the same path with a zero gravity
/// tunable, so the airborne branch is a no-op for them.
pub fn integrate_enemy_system(
    clock: Res<TickClock>,
    mut enemies: Query<
        (
            &mut TargetSpeed,
            &mut Velocity,
            &EnemyState,
            &MotionTunables,
        ),
        Or<(With<GroundEnemy>, With<FlyingEnemy>)>,
    >,
) {
    let dt = clock.dt;
    for (mut target, mut velocity, state, tunables) in &mut enemies {
        if *state == EnemyState::Jumping {
            target.0.y = apply_gravity(target.0.y, tunables.gravity, tunables.fall_speed, dt);
        }
        velocity.0 = blend_velocity(target.0, velocity.0, tunables.acceleration, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_is_exact_at_full_acceleration() {
        let out = blend_velocity(Vec2::new(4.0, -2.0), Vec2::new(100.0, 100.0), 1.0, 0.25);
        assert!((out.x - 1.0).abs() < 1e-6);
        assert!((out.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn gravity_caps_falling_but_not_ascending() {
        assert!((apply_gravity(390.0, 600.0, 400.0, 1.0) - 400.0).abs() < f32::EPSILON);
        // Ascending target (negative Y) just accrues gravity.
        let ascending = apply_gravity(-300.0, 600.0, 400.0, 0.1);
        assert!((ascending + 240.0).abs() < 1e-4);
    }
}
