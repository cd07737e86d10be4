// Player character controller
//
// Owns the player's state machine and health. Collision contacts come in
// through `handle_collision`, input through `update`. Effects on the world
// are queued as `ActorCommand`s for the level to apply.

use glam::Vec2;

use crate::core::math::{away_from_x, clamp};
use crate::engine::fsm::{Callbacks, StateContext, StateError, StateMachine};
use crate::engine::input::InputFrame;
use crate::engine::timer::{TimerId, Timers};
use crate::game::bodies::{BodyId, BodyInfo, EntityId, PickupKind};
use crate::game::events::{EnemyRef, GameEvent, GameEvents};
use crate::game::obstacles::ObstacleRegistry;

use super::collision::{classify, Reaction};
use super::command::ActorCommand;
use super::state::PlayerState;
use super::stats::PlayerStats;

pub const MAX_HEALTH: i32 = 100;

/// Enemy the player most recently collided with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyContact {
    pub body: BodyId,
    pub entity: Option<EntityId>,
    pub position: Vec2,
}

impl EnemyContact {
    fn event_ref(&self) -> EnemyRef {
        EnemyRef {
            body: self.body,
            entity: self.entity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerTimer {
    ClearTint,
    LevelEnd,
}

#[derive(Debug)]
pub struct PlayerController {
    machine: StateMachine<Self>,
    stats: PlayerStats,
    body: BodyId,
    health: i32,
    input: InputFrame,
    /// Player position as of the latest collision
    position: Vec2,
    last_enemy: Option<EnemyContact>,
    collisions_enabled: bool,
    events: GameEvents,
    timers: Timers<PlayerTimer>,
    tint_timer: Option<TimerId>,
    level_end_timer: Option<TimerId>,
    commands: Vec<ActorCommand>,
}

impl StateContext for PlayerController {
    type State = PlayerState;

    fn state_machine(&self) -> &StateMachine<Self> {
        &self.machine
    }

    fn state_machine_mut(&mut self) -> &mut StateMachine<Self> {
        &mut self.machine
    }
}

impl PlayerController {
    /// Create a controller for the player collider `body`, starting in idle
    pub fn new(body: BodyId, stats: PlayerStats, events: GameEvents) -> Result<Self, StateError> {
        let mut machine = StateMachine::new("player");
        machine
            .add_state(
                PlayerState::Idle,
                Callbacks::new()
                    .on_enter(Self::idle_on_enter)
                    .on_update(Self::idle_on_update),
            )?
            .add_state(
                PlayerState::Walk,
                Callbacks::new()
                    .on_enter(Self::walk_on_enter)
                    .on_update(Self::walk_on_update),
            )?
            .add_state(
                PlayerState::Jump,
                Callbacks::new()
                    .on_enter(Self::jump_on_enter)
                    .on_update(Self::jump_on_update),
            )?
            .add_state(
                PlayerState::SpikeHit,
                Callbacks::new().on_enter(Self::spike_hit_on_enter),
            )?
            .add_state(
                PlayerState::EnemyHit,
                Callbacks::new().on_enter(Self::enemy_hit_on_enter),
            )?
            .add_state(
                PlayerState::EnemyStomp,
                Callbacks::new().on_enter(Self::enemy_stomp_on_enter),
            )?
            .add_state(PlayerState::Dead, Callbacks::new().on_enter(Self::dead_on_enter))?;

        let mut player = Self {
            machine,
            stats,
            body,
            health: MAX_HEALTH,
            input: InputFrame::default(),
            position: Vec2::ZERO,
            last_enemy: None,
            collisions_enabled: true,
            events,
            timers: Timers::new(),
            tint_timer: None,
            level_end_timer: None,
            commands: Vec::new(),
        };
        StateMachine::set_state(&mut player, PlayerState::Idle)?;
        Ok(player)
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn state(&self) -> Option<PlayerState> {
        self.machine.current()
    }

    pub fn previous_state(&self) -> Option<PlayerState> {
        self.machine.previous()
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn is_dead(&self) -> bool {
        self.machine.is_current_state(PlayerState::Dead)
    }

    pub fn collisions_enabled(&self) -> bool {
        self.collisions_enabled
    }

    pub fn last_enemy(&self) -> Option<&EnemyContact> {
        self.last_enemy.as_ref()
    }

    /// Set health, clamped to `[0, MAX_HEALTH]`
    ///
    /// Publishes `health-changed` with the clamped value and switches to dead
    /// when it reaches zero. Ignored once dead.
    pub fn set_health(&mut self, value: i32) -> Result<(), StateError> {
        if self.is_dead() {
            return Ok(());
        }

        self.health = clamp(value, 0, MAX_HEALTH);
        self.events.emit(GameEvent::HealthChanged(self.health));

        if self.health <= 0 {
            StateMachine::set_state(self, PlayerState::Dead)?;
        }
        Ok(())
    }

    pub fn change_health(&mut self, delta: i32) -> Result<(), StateError> {
        self.set_health(self.health.saturating_add(delta))
    }

    /// React to a contact between the player (`this`) and `other`
    pub fn handle_collision(
        &mut self,
        obstacles: &ObstacleRegistry,
        this: &BodyInfo,
        other: &BodyInfo,
    ) -> Result<(), StateError> {
        if !self.collisions_enabled {
            return Ok(());
        }
        self.position = this.position;

        let Some(reaction) = classify(obstacles, self.state(), this, other) else {
            return Ok(());
        };
        log::debug!("player contact with {:?}: {:?}", other.id, reaction);

        match reaction {
            Reaction::SpikeHit => StateMachine::set_state(self, PlayerState::SpikeHit),
            Reaction::EnemyHit | Reaction::EnemyStomp => {
                self.last_enemy = Some(EnemyContact {
                    body: other.id,
                    entity: other.entity,
                    position: other.position,
                });
                let next = if reaction == Reaction::EnemyStomp {
                    PlayerState::EnemyStomp
                } else {
                    PlayerState::EnemyHit
                };
                StateMachine::set_state(self, next)
            }
            Reaction::Land => StateMachine::set_state(self, PlayerState::Idle),
            Reaction::Collect(pickup) => {
                self.commands.push(ActorCommand::RemoveBody(other.id));
                match pickup {
                    PickupKind::Star => {
                        self.events.emit(GameEvent::StarCollected);
                        Ok(())
                    }
                    PickupKind::Health { amount } => self.change_health(amount),
                }
            }
        }
    }

    /// Advance timers, then run the current state's update with `input`
    pub fn update(&mut self, dt: f32, input: InputFrame) -> Result<(), StateError> {
        self.input = input;

        for timer in self.timers.advance(dt) {
            match timer {
                PlayerTimer::ClearTint => {
                    self.tint_timer = None;
                    self.commands.push(ActorCommand::ClearTint);
                }
                PlayerTimer::LevelEnd => {
                    self.level_end_timer = None;
                    log::info!("player dead, ending level");
                    self.commands.push(ActorCommand::EndLevel);
                }
            }
        }

        StateMachine::update(self, dt)
    }

    /// Take every command queued since the last call
    pub fn drain_commands(&mut self) -> Vec<ActorCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Cancel pending timers, including a scheduled level end
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.tint_timer = None;
        self.level_end_timer = None;
    }

    pub fn has_pending_level_end(&self) -> bool {
        self.level_end_timer.is_some()
    }

    fn play_animation(&mut self, state: PlayerState) {
        if let Some(animation) = state.animation_name() {
            self.commands.push(ActorCommand::PlayAnimation(animation));
        }
    }

    fn flash_tint(&mut self) {
        if let Some(timer) = self.tint_timer.take() {
            self.timers.cancel(timer);
        }
        self.commands.push(ActorCommand::FlashTint {
            color: self.stats.tint_color,
            duration: self.stats.tint_duration,
        });
        self.tint_timer = Some(
            self.timers
                .schedule(self.stats.tint_duration, PlayerTimer::ClearTint),
        );
    }

    /// Horizontal velocity from held input; also faces the sprite.
    /// Left wins when both directions are held. No input keeps momentum.
    fn steer(&mut self) {
        let direction = if self.input.left {
            -1.0
        } else if self.input.right {
            1.0
        } else {
            return;
        };
        self.commands
            .push(ActorCommand::SetVelocityX(direction * self.stats.move_speed));
        self.commands.push(ActorCommand::SetFlipX(direction < 0.0));
    }

    // State callbacks

    fn idle_on_enter(&mut self) -> Result<(), StateError> {
        self.play_animation(PlayerState::Idle);
        Ok(())
    }

    fn idle_on_update(&mut self, _dt: f32) -> Result<(), StateError> {
        if self.input.jump_pressed {
            StateMachine::set_state(self, PlayerState::Jump)?;
        } else if self.input.moving() {
            StateMachine::set_state(self, PlayerState::Walk)?;
        }
        Ok(())
    }

    fn walk_on_enter(&mut self) -> Result<(), StateError> {
        self.play_animation(PlayerState::Walk);
        Ok(())
    }

    fn walk_on_update(&mut self, _dt: f32) -> Result<(), StateError> {
        if self.input.jump_pressed {
            return StateMachine::set_state(self, PlayerState::Jump);
        }
        if !self.input.moving() {
            self.commands.push(ActorCommand::SetVelocityX(0.0));
            return StateMachine::set_state(self, PlayerState::Idle);
        }
        self.steer();
        Ok(())
    }

    fn jump_on_enter(&mut self) -> Result<(), StateError> {
        self.commands
            .push(ActorCommand::SetVelocityY(-self.stats.jump_speed));
        self.play_animation(PlayerState::Jump);
        Ok(())
    }

    fn jump_on_update(&mut self, _dt: f32) -> Result<(), StateError> {
        self.steer();
        Ok(())
    }

    fn spike_hit_on_enter(&mut self) -> Result<(), StateError> {
        self.commands
            .push(ActorCommand::SetVelocityY(-self.stats.hazard_bounce));
        self.flash_tint();
        // Idle first so that a fatal hit leaves the player dead
        StateMachine::set_state(self, PlayerState::Idle)?;
        self.change_health(-self.stats.hit_damage)
    }

    fn enemy_hit_on_enter(&mut self) -> Result<(), StateError> {
        match self.last_enemy {
            Some(enemy) => {
                let direction = away_from_x(self.position, enemy.position);
                self.commands
                    .push(ActorCommand::SetVelocityX(direction * self.stats.knockback_speed));
            }
            None => self
                .commands
                .push(ActorCommand::SetVelocityY(-self.stats.knockback_speed)),
        }
        self.flash_tint();
        StateMachine::set_state(self, PlayerState::Idle)?;
        self.change_health(-self.stats.hit_damage)
    }

    fn enemy_stomp_on_enter(&mut self) -> Result<(), StateError> {
        self.commands
            .push(ActorCommand::SetVelocityY(-self.stats.stomp_bounce));
        if let Some(enemy) = self.last_enemy {
            self.events.emit(GameEvent::EnemyDefeated(enemy.event_ref()));
        }
        StateMachine::set_state(self, PlayerState::Idle)
    }

    fn dead_on_enter(&mut self) -> Result<(), StateError> {
        self.collisions_enabled = false;
        self.commands.push(ActorCommand::SetVelocityX(0.0));
        self.play_animation(PlayerState::Dead);
        if self.level_end_timer.is_none() {
            self.level_end_timer = Some(
                self.timers
                    .schedule(self.stats.death_delay, PlayerTimer::LevelEnd),
            );
        }
        Ok(())
    }
}
