//! Entity behaviour state machines.
//!
//! Runs in `PreUpdate`, after pursuit has resolved intents, so the
//! integrator and collision clamp later in the tick see settled target
//! speeds. The player machine is input-driven; enemy machines consume the
//! [`MoveIntent`] flags the path follower emitted. Both are idempotent
//! given unchanged inputs and grounded state; the charge value and path
//! cursor are the documented exceptions.

use bevy::prelude::*;
use log::debug;

use crate::audio::{AudioFx, FxHandle, Sfx};
use crate::components::{
    AnimationCue, ChargeJump, EnemyState, FacingRight, FlyingEnemy, GroundEnemy, Grounded,
    JumpFx, MotionTunables, MoveIntent, Player, PlayerState, TargetSpeed, Velocity,
};
use crate::input::{Action, ControlInput, KeyState};

/// One player's mutable view for a single control tick.
struct PlayerFrame<'a> {
    state: &'a mut PlayerState,
    target: &'a mut TargetSpeed,
    velocity: &'a mut Velocity,
    grounded: &'a mut Grounded,
    facing: &'a mut FacingRight,
    cue: &'a mut AnimationCue,
    charge: &'a mut ChargeJump,
    tunables: &'a MotionTunables,
}

impl PlayerFrame<'_> {
    /// Executes a jump with the given vertical boost: upward is negative Y.
    /// Resets the accumulated charge and fires the jump cue.
    fn jump(&mut self, boost_y: f32, audio: &dyn AudioFx, fx: FxHandle) {
        self.target.0.y = -self.tunables.jump_speed - boost_y;
        self.grounded.0 = false;
        *self.state = PlayerState::Jumping;
        self.charge.value = 0.0;
        self.charge.charging = false;
        audio.play_fx(fx);
    }

    /// Shared jump-key handling for the grounded states: holding charges,
    /// releasing jumps.
    fn handle_jump_key(&mut self, input: &ControlInput, audio: &dyn AudioFx, fx: FxHandle) {
        match input.state(Action::Jump) {
            KeyState::Held => {
                self.charge.charging = true;
                if self.charge.value >= self.charge.charged_time {
                    *self.state = PlayerState::Charge;
                    self.charge.charging = false;
                }
            }
            KeyState::Released => self.jump(0.0, audio, fx),
            KeyState::Pressed | KeyState::Idle => {}
        }
    }

    fn idle_update(&mut self, input: &ControlInput, audio: &dyn AudioFx, fx: FxHandle) {
        self.target.0.x = 0.0;
        *self.cue = AnimationCue::Idle;
        if input.state(Action::Right) != input.state(Action::Left) {
            *self.state = PlayerState::Moving;
        }
        self.handle_jump_key(input, audio, fx);
        if !self.grounded.0 {
            *self.state = PlayerState::Jumping;
        }
    }

    fn moving_update(&mut self, input: &ControlInput, audio: &dyn AudioFx, fx: FxHandle) {
        *self.cue = AnimationCue::Moving;
        if input.state(Action::Right) == input.state(Action::Left) {
            *self.state = PlayerState::Idle;
            self.target.0.x = 0.0;
        } else if input.state(Action::Right) == KeyState::Held {
            self.target.0.x = self.tunables.movement_speed;
            self.facing.0 = true;
        } else if input.state(Action::Left) == KeyState::Held {
            self.target.0.x = -self.tunables.movement_speed;
            self.facing.0 = false;
        }
        self.handle_jump_key(input, audio, fx);
        if !self.grounded.0 {
            *self.state = PlayerState::Jumping;
        }
    }

    /// Air control: horizontal target follows current intents, carrying the
    /// diagonal charge boost until it is cancelled by a reversal.
    fn jumping_update(&mut self, input: &ControlInput) {
        *self.cue = AnimationCue::Jumping;
        if input.state(Action::Right) == input.state(Action::Left) {
            self.target.0.x = 0.0;
            self.charge.boost_x = 0.0;
        } else if input.state(Action::Right) == KeyState::Held {
            if self.target.0.x < 0.0 {
                self.charge.boost_x = 0.0;
            }
            self.target.0.x = self.tunables.movement_speed + self.charge.boost_x;
            self.facing.0 = true;
        } else if input.state(Action::Left) == KeyState::Held {
            if self.target.0.x > 0.0 {
                self.charge.boost_x = 0.0;
            }
            self.target.0.x = -self.tunables.movement_speed - self.charge.boost_x;
            self.facing.0 = false;
        }

        if self.grounded.0 {
            *self.state = if input.state(Action::Right) == input.state(Action::Left) {
                PlayerState::Idle
            } else {
                PlayerState::Moving
            };
            self.target.0.y = 0.0;
            self.velocity.0.y = 0.0;
            self.charge.boost_x = 0.0;
        }
    }

    /// Charged jump: horizontal movement is locked; the release executes a
    /// boosted jump. A diagonal release splits the boost, halving the
    /// vertical share to conserve the implied diagonal magnitude.
    fn charging_update(&mut self, input: &ControlInput, audio: &dyn AudioFx, fx: FxHandle) {
        self.target.0.x = 0.0;
        *self.cue = AnimationCue::Charge;

        if input.state(Action::Jump) == KeyState::Released {
            let boost = self.charge.value;
            if input.state(Action::Right) == KeyState::Held
                || input.state(Action::Left) == KeyState::Held
            {
                self.charge.boost_x = boost;
                self.jump(boost / 2.0, audio, fx);
            } else {
                self.jump(boost, audio, fx);
            }
            debug!("charged jump released with boost {boost}");
        } else if !self.grounded.0 {
            // Ground vanished under us without a release; the charge is lost.
            *self.state = PlayerState::Jumping;
            self.charge.value = 0.0;
        }
    }

    /// Free-fly: intents map directly to constant-speed target velocity on
    /// both axes, with no gravity and no collision clamp.
    fn god_update(&mut self, input: &ControlInput) {
        *self.cue = AnimationCue::Jumping;
        if input.state(Action::Right) == input.state(Action::Left) {
            self.target.0.x = 0.0;
        } else if input.state(Action::Right) == KeyState::Held {
            self.target.0.x = self.tunables.movement_speed;
            self.facing.0 = true;
        } else if input.state(Action::Left) == KeyState::Held {
            self.target.0.x = -self.tunables.movement_speed;
            self.facing.0 = false;
        }
        if input.state(Action::Up) == input.state(Action::Down) {
            self.target.0.y = 0.0;
        }
        if input.state(Action::Up) == KeyState::Held {
            self.target.0.y = -self.tunables.movement_speed;
        } else if input.state(Action::Down) == KeyState::Held {
            self.target.0.y = self.tunables.movement_speed;
        }
    }
}

/// Drives the player state machine from the current input.
pub fn player_control_system(
    input: Res<ControlInput>,
    audio: Res<Sfx>,
    mut players: Query<
        (
            &mut PlayerState,
            &mut TargetSpeed,
            &mut Velocity,
            &mut Grounded,
            &mut FacingRight,
            &mut AnimationCue,
            &mut ChargeJump,
            &JumpFx,
            &MotionTunables,
        ),
        With<Player>,
    >,
) {
    for (
        mut state,
        mut target,
        mut velocity,
        mut grounded,
        mut facing,
        mut cue,
        mut charge,
        jump_fx,
        tunables,
    ) in &mut players
    {
        let mut frame = PlayerFrame {
            state: &mut state,
            target: &mut target,
            velocity: &mut velocity,
            grounded: &mut grounded,
            facing: &mut facing,
            cue: &mut cue,
            charge: &mut charge,
            tunables,
        };
        match *frame.state {
            PlayerState::Idle => frame.idle_update(&input, audio.0.as_ref(), jump_fx.0),
            PlayerState::Moving => frame.moving_update(&input, audio.0.as_ref(), jump_fx.0),
            PlayerState::Jumping => frame.jumping_update(&input),
            PlayerState::Dead => *frame.cue = AnimationCue::Dead,
            PlayerState::Charge => frame.charging_update(&input, audio.0.as_ref(), jump_fx.0),
            PlayerState::Win => {
                frame.target.0.x = 0.0;
                *frame.cue = AnimationCue::Win;
            }
            PlayerState::God => frame.god_update(&input),
        }
    }
}

/// One enemy's mutable view for a single control tick.
struct EnemyFrame<'a> {
    state: &'a mut EnemyState,
    target: &'a mut TargetSpeed,
    velocity: &'a mut Velocity,
    grounded: &'a mut Grounded,
    facing: &'a mut FacingRight,
    cue: &'a mut AnimationCue,
    tunables: &'a MotionTunables,
}

impl EnemyFrame<'_> {
    /// Enemy jumps carry no boost and no audio cue.
    fn jump(&mut self) {
        self.target.0.y = -self.tunables.jump_speed;
        self.grounded.0 = false;
        *self.state = EnemyState::Jumping;
    }

    /// Maps the horizontal intents onto the target speed and facing.
    fn steer(&mut self, intent: &MoveIntent) {
        if intent.left == intent.right {
            self.target.0.x = 0.0;
        } else if intent.right {
            self.target.0.x = self.tunables.movement_speed;
            self.facing.0 = true;
        } else {
            self.target.0.x = -self.tunables.movement_speed;
            self.facing.0 = false;
        }
    }

    fn idle_update(&mut self, intent: &MoveIntent) {
        self.target.0.x = 0.0;
        *self.cue = AnimationCue::Idle;
        if intent.left != intent.right {
            *self.state = EnemyState::Moving;
        }
        if intent.jump {
            self.jump();
        }
        if !self.grounded.0 {
            *self.state = EnemyState::Jumping;
        }
    }

    fn moving_update(&mut self, intent: &MoveIntent) {
        *self.cue = AnimationCue::Moving;
        if intent.left == intent.right {
            *self.state = EnemyState::Idle;
            self.target.0.x = 0.0;
        } else {
            self.steer(intent);
        }
        if intent.jump {
            self.jump();
        }
        if !self.grounded.0 {
            *self.state = EnemyState::Jumping;
        }
    }

    fn jumping_update(&mut self, intent: &MoveIntent) {
        *self.cue = AnimationCue::Jumping;
        self.steer(intent);
        if self.grounded.0 {
            *self.state = if intent.left == intent.right {
                EnemyState::Idle
            } else {
                EnemyState::Moving
            };
            self.target.0.y = 0.0;
            self.velocity.0.y = 0.0;
        }
    }

    /// Flier airborne handling: the vertical intents map straight onto the
    /// vertical target speed, no jump impulse and no landing.
    fn flying_update(&mut self, intent: &MoveIntent) {
        *self.cue = AnimationCue::Jumping;
        self.steer(intent);
        if intent.jump {
            self.target.0.y = -self.tunables.movement_speed;
        } else if intent.down {
            self.target.0.y = self.tunables.movement_speed;
        } else {
            self.target.0.y = 0.0;
            // With no vertical intent left the flier settles back into its
            // horizontal states.
            *self.state = if intent.left == intent.right {
                EnemyState::Idle
            } else {
                EnemyState::Moving
            };
        }
    }
}

/// Drives walking-enemy state machines from their pursuit intents.
pub fn enemy_control_system(
    mut enemies: Query<
        (
            &mut EnemyState,
            &mut TargetSpeed,
            &mut Velocity,
            &mut Grounded,
            &mut FacingRight,
            &mut AnimationCue,
            &MoveIntent,
            &MotionTunables,
        ),
        With<GroundEnemy>,
    >,
) {
    for (mut state, mut target, mut velocity, mut grounded, mut facing, mut cue, intent, tunables) in
        &mut enemies
    {
        let mut frame = EnemyFrame {
            state: &mut state,
            target: &mut target,
            velocity: &mut velocity,
            grounded: &mut grounded,
            facing: &mut facing,
            cue: &mut cue,
            tunables,
        };
        match *frame.state {
            EnemyState::Idle => frame.idle_update(intent),
            EnemyState::Moving => frame.moving_update(intent),
            EnemyState::Jumping => frame.jumping_update(intent),
            EnemyState::Dead => *frame.cue = AnimationCue::Dead,
        }
    }
}

/// Drives flier state machines. Fliers reuse the shared state subset but
/// treat the jump intent as "ascend" and the down intent as "descend".
pub fn flier_control_system(
    mut fliers: Query<
        (
            &mut EnemyState,
            &mut TargetSpeed,
            &mut Velocity,
            &mut Grounded,
            &mut FacingRight,
            &mut AnimationCue,
            &MoveIntent,
            &MotionTunables,
        ),
        With<FlyingEnemy>,
    >,
) {
    for (mut state, mut target, mut velocity, mut grounded, mut facing, mut cue, intent, tunables) in
        &mut fliers
    {
        let mut frame = EnemyFrame {
            state: &mut state,
            target: &mut target,
            velocity: &mut velocity,
            grounded: &mut grounded,
            facing: &mut facing,
            cue: &mut cue,
            tunables,
        };
        match *frame.state {
            EnemyState::Idle => {
                frame.target.0.x = 0.0;
                *frame.cue = AnimationCue::Idle;
                if intent.left != intent.right {
                    *frame.state = EnemyState::Moving;
                }
                if intent.jump || intent.down {
                    *frame.state = EnemyState::Jumping;
                }
            }
            EnemyState::Moving => {
                *frame.cue = AnimationCue::Moving;
                if intent.left == intent.right {
                    *frame.state = EnemyState::Idle;
                    frame.target.0.x = 0.0;
                } else {
                    frame.steer(intent);
                }
                if intent.jump || intent.down {
                    *frame.state = EnemyState::Jumping;
                }
            }
            EnemyState::Jumping => frame.flying_update(intent),
            EnemyState::Dead => *frame.cue = AnimationCue::Dead,
        }
    }
}
