// Patrolling enemy controller

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::events::Subscription;
use crate::engine::fsm::{Callbacks, StateContext, StateError, StateMachine};
use crate::game::bodies::{BodyId, EntityId};
use crate::game::events::{GameEvent, GameEvents, GameTopic};

use super::command::ActorCommand;
use super::state::EnemyState;
use super::stats::EnemyStats;

/// Walks left and right until stomped by the player
#[derive(Debug)]
pub struct EnemyController {
    machine: StateMachine<Self>,
    stats: EnemyStats,
    body: BodyId,
    entity: Option<EntityId>,
    /// Time spent walking in the current direction
    patrol_elapsed: f32,
    stomped: Rc<Cell<bool>>,
    subscription: Option<Subscription<GameEvent>>,
    commands: Vec<ActorCommand>,
}

impl StateContext for EnemyController {
    type State = EnemyState;

    fn state_machine(&self) -> &StateMachine<Self> {
        &self.machine
    }

    fn state_machine_mut(&mut self) -> &mut StateMachine<Self> {
        &mut self.machine
    }
}

impl EnemyController {
    pub fn new(
        body: BodyId,
        entity: Option<EntityId>,
        stats: EnemyStats,
        events: &GameEvents,
    ) -> Result<Self, StateError> {
        let mut machine = StateMachine::new("enemy");
        machine
            .add_state(EnemyState::Idle, Callbacks::new().on_enter(Self::idle_on_enter))?
            .add_state(
                EnemyState::MoveLeft,
                Callbacks::new()
                    .on_enter(Self::move_left_on_enter)
                    .on_update(Self::move_left_on_update),
            )?
            .add_state(
                EnemyState::MoveRight,
                Callbacks::new()
                    .on_enter(Self::move_right_on_enter)
                    .on_update(Self::move_right_on_update),
            )?
            .add_state(EnemyState::Dead, Callbacks::new().on_enter(Self::dead_on_enter))?;

        let stomped = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stomped);
        let subscription = events.subscribe(GameTopic::EnemyDefeated, move |event| {
            if let GameEvent::EnemyDefeated(enemy) = event {
                if enemy.body == body {
                    flag.set(true);
                }
            }
        });

        let mut enemy = Self {
            machine,
            stats,
            body,
            entity,
            patrol_elapsed: 0.0,
            stomped,
            subscription: Some(subscription),
            commands: Vec::new(),
        };
        StateMachine::set_state(&mut enemy, EnemyState::Idle)?;
        Ok(enemy)
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn state(&self) -> Option<EnemyState> {
        self.machine.current()
    }

    pub fn is_dead(&self) -> bool {
        self.machine.is_current_state(EnemyState::Dead)
    }

    pub fn update(&mut self, dt: f32) -> Result<(), StateError> {
        if self.stomped.get() && !self.is_dead() {
            StateMachine::set_state(self, EnemyState::Dead)?;
        }
        StateMachine::update(self, dt)
    }

    pub fn drain_commands(&mut self) -> Vec<ActorCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Stop listening for defeat notifications
    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    fn patrol(&mut self, dt: f32, direction: f32, turn_to: EnemyState) -> Result<(), StateError> {
        self.commands
            .push(ActorCommand::SetVelocityX(direction * self.stats.patrol_speed));
        self.patrol_elapsed += dt;
        if self.patrol_elapsed >= self.stats.patrol_interval {
            StateMachine::set_state(self, turn_to)?;
        }
        Ok(())
    }

    fn idle_on_enter(&mut self) -> Result<(), StateError> {
        StateMachine::set_state(self, EnemyState::MoveLeft)
    }

    fn move_left_on_enter(&mut self) -> Result<(), StateError> {
        self.patrol_elapsed = 0.0;
        self.commands.push(ActorCommand::SetFlipX(true));
        Ok(())
    }

    fn move_left_on_update(&mut self, dt: f32) -> Result<(), StateError> {
        self.patrol(dt, -1.0, EnemyState::MoveRight)
    }

    fn move_right_on_enter(&mut self) -> Result<(), StateError> {
        self.patrol_elapsed = 0.0;
        self.commands.push(ActorCommand::SetFlipX(false));
        Ok(())
    }

    fn move_right_on_update(&mut self, dt: f32) -> Result<(), StateError> {
        self.patrol(dt, 1.0, EnemyState::MoveLeft)
    }

    fn dead_on_enter(&mut self) -> Result<(), StateError> {
        log::debug!("enemy {:?} defeated", self.body);
        self.subscription = None;
        self.commands.push(ActorCommand::RemoveBody(self.body));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::EnemyRef;

    fn body(id: u32) -> BodyId {
        BodyId::from_raw_parts(id, 0)
    }

    fn defeat(events: &GameEvents, id: u32) {
        events.emit(GameEvent::EnemyDefeated(EnemyRef {
            body: body(id),
            entity: None,
        }));
    }

    #[test]
    fn test_starts_walking_left() {
        let events = GameEvents::new();
        let mut enemy = EnemyController::new(body(3), Some(1), EnemyStats::default(), &events).unwrap();

        assert_eq!(enemy.state(), Some(EnemyState::MoveLeft));
        enemy.update(0.1).unwrap();
        assert_eq!(
            enemy.drain_commands(),
            vec![ActorCommand::SetFlipX(true), ActorCommand::SetVelocityX(-3.0)]
        );
    }

    #[test]
    fn test_patrol_turns_after_interval() {
        let events = GameEvents::new();
        let mut enemy = EnemyController::new(body(3), None, EnemyStats::default(), &events).unwrap();

        enemy.update(1.5).unwrap();
        assert_eq!(enemy.state(), Some(EnemyState::MoveLeft));
        enemy.update(0.5).unwrap();
        assert_eq!(enemy.state(), Some(EnemyState::MoveRight));
        enemy.drain_commands();

        enemy.update(0.1).unwrap();
        assert_eq!(enemy.drain_commands(), vec![ActorCommand::SetVelocityX(3.0)]);

        enemy.update(2.0).unwrap();
        assert_eq!(enemy.state(), Some(EnemyState::MoveLeft));
    }

    #[test]
    fn test_dies_only_when_own_body_stomped() {
        let events = GameEvents::new();
        let mut enemy = EnemyController::new(body(3), None, EnemyStats::default(), &events).unwrap();
        let mut other = EnemyController::new(body(4), None, EnemyStats::default(), &events).unwrap();
        enemy.drain_commands();
        other.drain_commands();

        defeat(&events, 3);
        enemy.update(0.1).unwrap();
        other.update(0.1).unwrap();

        assert!(enemy.is_dead());
        assert!(!other.is_dead());
        assert_eq!(enemy.drain_commands(), vec![ActorCommand::RemoveBody(body(3))]);
        assert_eq!(events.listener_count(GameTopic::EnemyDefeated), 1);
    }

    #[test]
    fn test_dead_enemy_stays_dead() {
        let events = GameEvents::new();
        let mut enemy = EnemyController::new(body(3), None, EnemyStats::default(), &events).unwrap();
        defeat(&events, 3);
        enemy.update(0.1).unwrap();
        enemy.drain_commands();

        enemy.update(5.0).unwrap();
        assert!(enemy.drain_commands().is_empty());
        assert_eq!(enemy.state(), Some(EnemyState::Dead));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let events = GameEvents::new();
        let enemy = EnemyController::new(body(3), None, EnemyStats::default(), &events).unwrap();
        assert_eq!(events.listener_count(GameTopic::EnemyDefeated), 1);
        drop(enemy);
        assert_eq!(events.listener_count(GameTopic::EnemyDefeated), 0);
    }
}
