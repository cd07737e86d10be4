// Generic finite state machine driven by callbacks on an owning context
//
// The machine is stored inside the context it drives. Callbacks are plain
// function references to methods of that context, so every callback has
// access to the full context state, including the machine itself.
//
// ```rust,ignore
// let mut machine = StateMachine::new("player");
// machine
//     .add_state(State::Idle, Callbacks::new().on_enter(Player::idle_on_enter))?
//     .add_state(State::Walk, Callbacks::new().on_update(Player::walk_on_update))?;
// // ...store `machine` in the player, then:
// StateMachine::set_state(&mut player, State::Idle)?;
// StateMachine::update(&mut player, dt)?;
// ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// State machine errors
///
/// Both variants point at a misconfigured state table and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("state machine '{machine}' has no state {state}")]
    UnknownState { machine: String, state: String },

    #[error("state machine '{machine}' already has a state {state}")]
    DuplicateState { machine: String, state: String },
}

/// Anything usable as a state identifier
pub trait StateKey: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> StateKey for T {}

/// A type that owns a [`StateMachine`] over itself
pub trait StateContext: Sized {
    type State: StateKey;

    fn state_machine(&self) -> &StateMachine<Self>;
    fn state_machine_mut(&mut self) -> &mut StateMachine<Self>;
}

pub type EnterFn<C> = fn(&mut C) -> Result<(), StateError>;
pub type UpdateFn<C> = fn(&mut C, f32) -> Result<(), StateError>;
pub type ExitFn<C> = fn(&mut C) -> Result<(), StateError>;

/// Callbacks attached to a single state. Every callback is optional.
pub struct Callbacks<C> {
    on_enter: Option<EnterFn<C>>,
    on_update: Option<UpdateFn<C>>,
    on_exit: Option<ExitFn<C>>,
}

impl<C> Callbacks<C> {
    pub fn new() -> Self {
        Self {
            on_enter: None,
            on_update: None,
            on_exit: None,
        }
    }

    pub fn on_enter(mut self, f: EnterFn<C>) -> Self {
        self.on_enter = Some(f);
        self
    }

    pub fn on_update(mut self, f: UpdateFn<C>) -> Self {
        self.on_update = Some(f);
        self
    }

    pub fn on_exit(mut self, f: ExitFn<C>) -> Self {
        self.on_exit = Some(f);
        self
    }
}

impl<C> Default for Callbacks<C> {
    fn default() -> Self {
        Self::new()
    }
}

// Function pointers are Copy regardless of C, so derive would be too strict.
impl<C> Clone for Callbacks<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Callbacks<C> {}

/// Keyed state table plus the currently active state
pub struct StateMachine<C: StateContext> {
    id: String,
    states: HashMap<C::State, Callbacks<C>>,
    current: Option<C::State>,
    previous: Option<C::State>,
}

impl<C: StateContext> StateMachine<C> {
    /// Create an empty machine. `id` only shows up in logs and errors.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: HashMap::new(),
            current: None,
            previous: None,
        }
    }

    /// Register a state
    ///
    /// Fails if `key` is already registered; the existing callbacks are kept.
    pub fn add_state(
        &mut self,
        key: C::State,
        callbacks: Callbacks<C>,
    ) -> Result<&mut Self, StateError> {
        if self.states.contains_key(&key) {
            return Err(StateError::DuplicateState {
                machine: self.id.clone(),
                state: format!("{key:?}"),
            });
        }
        self.states.insert(key, callbacks);
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Currently active state, `None` before the first transition
    pub fn current(&self) -> Option<C::State> {
        self.current
    }

    /// State that was active before the last transition
    pub fn previous(&self) -> Option<C::State> {
        self.previous
    }

    pub fn is_current_state(&self, key: C::State) -> bool {
        self.current == Some(key)
    }

    /// Number of registered states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Transition `ctx` to `key`
    ///
    /// Runs the outgoing state's exit callback, switches, then runs the
    /// incoming state's enter callback. Selecting the current state again is
    /// a reset: exit and enter still run. Transitions requested from inside
    /// the enter callback complete before this call returns.
    pub fn set_state(ctx: &mut C, key: C::State) -> Result<(), StateError> {
        let machine = ctx.state_machine_mut();
        let Some(next) = machine.states.get(&key).copied() else {
            return Err(StateError::UnknownState {
                machine: machine.id.clone(),
                state: format!("{key:?}"),
            });
        };

        let outgoing = machine.current;
        let on_exit = outgoing
            .and_then(|state| machine.states.get(&state))
            .and_then(|callbacks| callbacks.on_exit);
        log::debug!("[{}] {:?} -> {:?}", machine.id, outgoing, key);

        if let Some(on_exit) = on_exit {
            on_exit(ctx)?;
        }

        let machine = ctx.state_machine_mut();
        machine.previous = outgoing;
        machine.current = Some(key);

        if let Some(on_enter) = next.on_enter {
            on_enter(ctx)?;
        }
        Ok(())
    }

    /// Run the current state's update callback, if any
    pub fn update(ctx: &mut C, dt: f32) -> Result<(), StateError> {
        let machine = ctx.state_machine();
        let on_update = machine
            .current
            .and_then(|state| machine.states.get(&state))
            .and_then(|callbacks| callbacks.on_update);

        match on_update {
            Some(on_update) => on_update(ctx, dt),
            None => Ok(()),
        }
    }
}

impl<C: StateContext> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("states", &self.states.len())
            .field("current", &self.current)
            .field("previous", &self.previous)
            .finish()
    }
}
