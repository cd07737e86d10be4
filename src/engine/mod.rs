// Engine modules: state machines, events, timers, frame loop, input, physics

pub mod events;
pub mod fsm;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod timer;
