//! Unit tests for the kinematic integrator.
//!
//! Pins the blend scheme: dt scales the blend result, the output is a
//! convex combination of the inputs, and full acceleration reproduces the
//! target exactly.

use approx::assert_relative_eq;
use glam::Vec2;
use gully::kinematics::{apply_gravity, blend_velocity};
use rstest::rstest;

#[rstest]
#[case::half_blend(0.5)]
#[case::light_blend(0.1)]
#[case::heavy_blend(0.9)]
fn blend_is_a_convex_combination(#[case] acceleration: f32) {
    let target = Vec2::new(100.0, -40.0);
    let velocity = Vec2::new(10.0, 5.0);
    let dt = 1.0 / 60.0;

    let out = blend_velocity(target, velocity, acceleration, dt);
    let unscaled = out / dt;

    for (axis, t, v, u) in [
        ("x", target.x, velocity.x, unscaled.x),
        ("y", target.y, velocity.y, unscaled.y),
    ] {
        let lo = t.min(v);
        let hi = t.max(v);
        assert!(
            (lo..=hi).contains(&u),
            "axis {axis}: {u} outside [{lo}, {hi}]"
        );
    }
}

#[rstest]
fn full_acceleration_reproduces_target_exactly() {
    let target = Vec2::new(123.0, -45.0);
    let dt = 0.25;
    let out = blend_velocity(target, Vec2::new(999.0, 999.0), 1.0, dt);
    assert_relative_eq!(out.x, target.x * dt);
    assert_relative_eq!(out.y, target.y * dt);
}

#[rstest]
#[case::under_cap(100.0, 600.0, 400.0, 0.1, 160.0)]
#[case::capped(395.0, 600.0, 400.0, 0.1, 400.0)]
#[case::ascending_uncapped(-500.0, 600.0, 400.0, 0.1, -440.0)]
fn gravity_accrues_and_caps_falling_only(
    #[case] target_y: f32,
    #[case] gravity: f32,
    #[case] fall_speed: f32,
    #[case] dt: f32,
    #[case] expected: f32,
) {
    assert_relative_eq!(apply_gravity(target_y, gravity, fall_speed, dt), expected);
}
