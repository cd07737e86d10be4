// Presentation-side listener for gameplay events

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::events::Subscription;
use crate::game::events::{GameEvent, GameEvents, GameTopic};

use super::characters::MAX_HEALTH;

#[derive(Debug)]
struct Counters {
    stars: Cell<u32>,
    health: Cell<i32>,
    defeated: Cell<u32>,
}

/// Star counter, health display and defeated-enemy tally
#[derive(Debug)]
pub struct Hud {
    counters: Rc<Counters>,
    subscriptions: Vec<Subscription<GameEvent>>,
}

impl Hud {
    /// Start listening on `events`
    pub fn attach(events: &GameEvents) -> Self {
        let counters = Rc::new(Counters {
            stars: Cell::new(0),
            health: Cell::new(MAX_HEALTH),
            defeated: Cell::new(0),
        });

        let subscriptions = [
            GameTopic::StarCollected,
            GameTopic::HealthChanged,
            GameTopic::EnemyDefeated,
        ]
        .into_iter()
        .map(|topic| {
            let counters = Rc::clone(&counters);
            events.subscribe(topic, move |event| match event {
                GameEvent::StarCollected => counters.stars.set(counters.stars.get() + 1),
                GameEvent::HealthChanged(value) => counters.health.set(*value),
                GameEvent::EnemyDefeated(_) => counters.defeated.set(counters.defeated.get() + 1),
            })
        })
        .collect();

        Self {
            counters,
            subscriptions,
        }
    }

    pub fn stars(&self) -> u32 {
        self.counters.stars.get()
    }

    pub fn health(&self) -> i32 {
        self.counters.health.get()
    }

    pub fn defeated(&self) -> u32 {
        self.counters.defeated.get()
    }

    pub fn stars_label(&self) -> String {
        format!("Stars: {}", self.stars())
    }

    pub fn health_label(&self) -> String {
        format!("Health: {}", self.health())
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Stop listening. Counters keep their last values.
    pub fn detach(&mut self) {
        self.subscriptions.clear();
    }
}
