//! Library crate providing the `gully` movement simulation.
//!
//! A deterministic per-tick platformer core: a kinematic integrator with
//! exponential velocity smoothing, a per-axis collision clamp that bounds
//! displacement by obstacle clearance, per-kind behaviour state machines,
//! and a waypoint-following pursuit layer consuming an external pathfinder.
//! Everything runs as chained Bevy systems in `PreUpdate` and `Update`;
//! rendering, audio mixing, input polling, and pathfinding are external
//! collaborators behind traits.

pub mod audio;
pub mod collision;
pub mod components;
pub mod constants;
pub mod control;
pub mod grid;
pub mod input;
pub mod kinematics;
pub mod logging;
pub mod numeric;
pub mod plugin;
pub mod pursuit;
pub mod save;
pub mod spawn;

pub use constants::*;

// Re-export commonly used items.
pub use audio::{AudioFx, FxHandle, NullAudio, Sfx};
pub use collision::{ObstacleQuery, Obstacles, OpenWorld};
pub use components::{
    AnimationCue, Bounds, ChargeJump, Chase, Collider, EnemyState, FacingRight, FlyingEnemy,
    GroundEnemy, Grounded, JumpFx, MotionTunables, MoveIntent, Player, PlayerState, Position,
    PursuitPath, ReloadRequest, TargetSpeed, TickClock, Velocity,
};
pub use grid::{TileGrid, TileObstacleQuery};
pub use input::{Action, ControlInput, KeyState};
pub use kinematics::{apply_gravity, blend_velocity};
pub use logging::init as init_logging;
pub use plugin::GullyPlugin;
pub use pursuit::{ChaseTarget, NullPlanner, PathPlanner, Planner};
pub use save::{EnemyRecord, PlayerRecord, SaveError};
pub use spawn::{reset_player, spawn_flier, spawn_ground_enemy, spawn_player, EntityConfig};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use gully::prelude::*;
    //! ```

    pub use crate::components::{
        EnemyState, Grounded, PlayerState, Position, TargetSpeed, Velocity,
    };
    pub use crate::input::{Action, ControlInput};
    pub use crate::plugin::GullyPlugin;
    pub use crate::spawn::EntityConfig;
    pub use crate::TileGrid;
}
