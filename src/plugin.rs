//! Bevy plugin wiring the simulation systems into the schedule.
//!
//! The tick contract is strict: `PreUpdate` resolves pursuit planning and
//! state-machine inputs, `Update` integrates, clamps, checks deaths, and
//! finally runs the deferred collider cleanup. Within each phase the
//! systems are chained; nothing in the core runs concurrently.

use bevy::prelude::*;

use crate::collision::{step_enemy_system, step_flier_system, step_player_system, Obstacles};
use crate::components::{ReloadRequest, TickClock};
use crate::control::{enemy_control_system, flier_control_system, player_control_system};
use crate::input::ControlInput;
use crate::kinematics::{god_toggle_system, integrate_enemy_system, integrate_player_system};
use crate::pursuit::{
    chase_gate_system, follow_path_system, plan_path_system, sync_chase_target_system,
    ChaseTarget, Planner,
};
use crate::audio::Sfx;
use crate::spawn::{check_death_system, despawn_marked_system};

/// Installs the movement/pursuit simulation.
///
/// Collaborator resources ([`Obstacles`], [`Planner`], [`Sfx`]) get null
/// defaults unless the embedding application inserted its own before the
/// plugin builds. A [`crate::grid::TileGrid`] is optional; without one the
/// death check and path planning stand down.
#[derive(Default)]
pub struct GullyPlugin;

impl Plugin for GullyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlInput>()
            .init_resource::<TickClock>()
            .init_resource::<ReloadRequest>()
            .init_resource::<ChaseTarget>();

        if !app.world().contains_resource::<Obstacles>() {
            app.init_resource::<Obstacles>();
        }
        if !app.world().contains_resource::<Planner>() {
            app.init_resource::<Planner>();
        }
        if !app.world().contains_resource::<Sfx>() {
            app.init_resource::<Sfx>();
        }

        app.add_systems(
            PreUpdate,
            (
                sync_chase_target_system,
                chase_gate_system,
                plan_path_system,
                follow_path_system,
                player_control_system,
                enemy_control_system,
                flier_control_system,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                god_toggle_system,
                integrate_player_system,
                integrate_enemy_system,
                step_player_system,
                step_enemy_system,
                step_flier_system,
                check_death_system,
                despawn_marked_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_installs_resources_and_schedules() {
        let mut app = App::new();
        app.add_plugins(GullyPlugin);
        assert!(app.world().contains_resource::<ControlInput>());
        assert!(app.world().contains_resource::<TickClock>());
        assert!(app.world().contains_resource::<ChaseTarget>());
        app.update();
    }
}
