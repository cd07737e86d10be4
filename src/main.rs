use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use penguin_platformer::engine::events::Subscription;
use penguin_platformer::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use penguin_platformer::engine::input::InputManager;
use penguin_platformer::game::characters::PlayerStats;
use penguin_platformer::game::events::{GameEvent, GameEvents, GameTopic};
use penguin_platformer::game::hud::Hud;
use penguin_platformer::game::level::Level;

const BUNDLED_LEVEL: &str = include_str!("../levels/iceworld.json");

/// Simulated display refresh for the headless run
const FRAME_TIME: Duration = Duration::from_millis(16);
const RUN_SECONDS: f32 = 12.0;

/// Scripted key presses: (time in seconds, key, pressed)
const TIMELINE: &[(f32, KeyCode, bool)] = &[
    (0.5, KeyCode::ArrowRight, true),
    (1.2, KeyCode::Space, true),
    (1.3, KeyCode::Space, false),
    (2.5, KeyCode::ArrowRight, false),
    (3.0, KeyCode::KeyD, true),
    (3.4, KeyCode::ArrowUp, true),
    (3.5, KeyCode::ArrowUp, false),
    (5.0, KeyCode::KeyD, false),
    (5.5, KeyCode::KeyA, true),
    (6.5, KeyCode::KeyA, false),
];

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Penguin Platformer (headless)...");

    let source = match std::env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read level file {path}"))?
        }
        None => BUNDLED_LEVEL.to_string(),
    };

    let events = GameEvents::new();
    let mut hud = Hud::attach(&events);
    let _log = log_events(&events);

    let mut level = Level::from_json(&source, events.clone(), PlayerStats::default())
        .context("failed to build level")?;
    let mut input = InputManager::new();
    let mut game_loop = GameLoop::new();

    let mut clock = 0.0;
    let mut script = TIMELINE.iter().peekable();
    while clock < RUN_SECONDS && !level.is_ended() {
        while let Some((_, key, pressed)) = script.next_if(|&&(at, _, _)| at <= clock) {
            let state = if *pressed {
                ElementState::Pressed
            } else {
                ElementState::Released
            };
            input.process_key(*key, state, false);
        }

        let steps = game_loop.advance(FRAME_TIME);
        for _ in 0..steps {
            level.step(FIXED_TIMESTEP, input.frame())?;
            input.end_frame();
        }
        clock += FRAME_TIME.as_secs_f32();
    }

    let position = level.player_position();
    info!(
        "finished after {} frames / {} steps: player {} at ({:.2}, {:.2}), {}, {}, {} defeated",
        game_loop.frame_count(),
        game_loop.step_count(),
        level.player().state().map_or("none", |state| state.name()),
        position.x,
        position.y,
        hud.stars_label(),
        hud.health_label(),
        hud.defeated()
    );

    level.teardown();
    hud.detach();

    Ok(())
}

fn log_events(events: &GameEvents) -> Vec<Subscription<GameEvent>> {
    [
        GameTopic::StarCollected,
        GameTopic::HealthChanged,
        GameTopic::EnemyDefeated,
    ]
    .into_iter()
    .map(|topic| {
        events.subscribe(topic, move |event| match event {
            GameEvent::HealthChanged(value) => info!("{topic}: {value}"),
            GameEvent::EnemyDefeated(enemy) => info!("{topic}: {:?}", enemy.body),
            GameEvent::StarCollected => info!("{topic}"),
        })
    })
    .collect()
}
