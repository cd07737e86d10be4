// Level construction and per-frame orchestration
//
// A level is built from JSON object data: entities are spawned and tagged
// first, then the static terrain is converted into collidable bodies. Each
// logic step runs physics, dispatches the player's new contacts, updates the
// actors and applies the commands they queued.
//
// Coordinates are body centres in world units, y pointing down.

use std::collections::HashMap;

use glam::Vec2;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::fsm::StateError;
use crate::engine::input::InputFrame;
use crate::engine::physics::{presets, PhysicsWorld};
use crate::game::bodies::{BodyId, BodyInfo, BodyKind, EntityId, PickupKind};
use crate::game::characters::{ActorCommand, EnemyController, EnemyStats, PlayerController, PlayerStats};
use crate::game::events::GameEvents;
use crate::game::obstacles::{ObstacleError, ObstacleRegistry, ObstacleTag};

/// Size used for hazards and pickups that don't specify one
const DEFAULT_OBJECT_SIZE: f32 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("invalid level data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level '{0}' has no player spawn")]
    MissingPlayerSpawn(String),

    #[error(transparent)]
    Obstacle(#[from] ObstacleError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Serialized level description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<LevelObject>,
    #[serde(default)]
    pub terrain: Vec<TerrainRect>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A placed object: spawn point, hazard or pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Heal amount for health pickups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

impl LevelObject {
    fn size(&self) -> (f32, f32) {
        (
            self.width.unwrap_or(DEFAULT_OBJECT_SIZE),
            self.height.unwrap_or(DEFAULT_OBJECT_SIZE),
        )
    }
}

/// Solid ground rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Recognised values of [`LevelObject::kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    PlayerSpawn,
    EnemySpawn,
    Hazard,
    PickupStar,
    PickupHealth,
}

impl ObjectKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "player-spawn" => Some(Self::PlayerSpawn),
            "enemy-spawn" => Some(Self::EnemySpawn),
            "hazard" => Some(Self::Hazard),
            "pickup-star" => Some(Self::PickupStar),
            "pickup-health" => Some(Self::PickupHealth),
            _ => None,
        }
    }
}

/// Presentation state of an actor's sprite, driven by commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteState {
    pub animation: Option<&'static str>,
    pub flip_x: bool,
    /// Active damage tint (0xRRGGBB)
    pub tint: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct BodyRecord {
    kind: BodyKind,
    entity: Option<EntityId>,
}

pub struct Level {
    name: String,
    events: GameEvents,
    physics: PhysicsWorld,
    obstacles: ObstacleRegistry,
    bodies: HashMap<BodyId, BodyRecord>,
    sprites: HashMap<BodyId, SpriteState>,
    player: PlayerController,
    enemies: Vec<EnemyController>,
    ended: bool,
}

impl Level {
    /// Parse `json` and build the level it describes
    pub fn from_json(json: &str, events: GameEvents, stats: PlayerStats) -> Result<Self, LevelError> {
        let data = LevelData::from_json(json)?;
        Self::build(&data, events, stats)
    }

    pub fn build(data: &LevelData, events: GameEvents, stats: PlayerStats) -> Result<Self, LevelError> {
        let mut physics = PhysicsWorld::new();
        let mut obstacles = ObstacleRegistry::new();
        let mut bodies = HashMap::new();
        let mut enemies = Vec::new();
        let mut player_body = None;
        let mut next_entity: EntityId = 0;

        for object in &data.objects {
            let Some(kind) = ObjectKind::parse(&object.kind) else {
                debug!("ignoring object '{}' of unknown type '{}'", object.name, object.kind);
                continue;
            };

            match kind {
                ObjectKind::PlayerSpawn => {
                    if player_body.is_some() {
                        warn!("ignoring extra player spawn '{}'", object.name);
                        continue;
                    }
                    let (_, collider) = physics.spawn(
                        presets::actor_body(object.x, object.y),
                        presets::player_collider(stats.width, stats.height),
                    );
                    bodies.insert(collider, actor_record(&mut next_entity));
                    player_body = Some(collider);
                }
                ObjectKind::EnemySpawn => {
                    let enemy_stats = EnemyStats::default();
                    let (_, collider) = physics.spawn(
                        presets::actor_body(object.x, object.y),
                        presets::enemy_collider(enemy_stats.width, enemy_stats.height),
                    );
                    let record = actor_record(&mut next_entity);
                    bodies.insert(collider, record);
                    obstacles.add(ObstacleTag::Enemy, collider)?;
                    enemies.push(EnemyController::new(collider, record.entity, enemy_stats, &events)?);
                }
                ObjectKind::Hazard => {
                    let (width, height) = object.size();
                    let (_, collider) = physics.spawn(
                        presets::static_body(object.x, object.y),
                        presets::hazard_collider(width, height),
                    );
                    bodies.insert(
                        collider,
                        BodyRecord {
                            kind: BodyKind::Fixture,
                            entity: None,
                        },
                    );
                    obstacles.add(ObstacleTag::Hazard, collider)?;
                }
                ObjectKind::PickupStar | ObjectKind::PickupHealth => {
                    let pickup = if kind == ObjectKind::PickupStar {
                        PickupKind::Star
                    } else {
                        PickupKind::Health {
                            amount: object.value.unwrap_or(stats.default_heal),
                        }
                    };
                    let (width, height) = object.size();
                    let (_, collider) = physics.spawn(
                        presets::static_body(object.x, object.y),
                        presets::pickup_sensor(width, height),
                    );
                    let entity = next_entity;
                    next_entity += 1;
                    bodies.insert(
                        collider,
                        BodyRecord {
                            kind: BodyKind::Pickup(pickup),
                            entity: Some(entity),
                        },
                    );
                }
            }
        }

        let player_body = player_body.ok_or_else(|| LevelError::MissingPlayerSpawn(data.name.clone()))?;
        let player = PlayerController::new(player_body, stats, events.clone())?;

        // Terrain goes in after every entity is spawned and tagged
        for rect in &data.terrain {
            let (_, collider) = physics.spawn(
                presets::static_body(rect.x, rect.y),
                presets::terrain_collider(rect.width, rect.height),
            );
            bodies.insert(
                collider,
                BodyRecord {
                    kind: BodyKind::Terrain,
                    entity: None,
                },
            );
        }

        info!(
            "level '{}' built: {} enemies, {} obstacles, {} bodies",
            data.name,
            enemies.len(),
            obstacles.len(),
            bodies.len()
        );

        let mut level = Self {
            name: data.name.clone(),
            events,
            physics,
            obstacles,
            bodies,
            sprites: HashMap::new(),
            player,
            enemies,
            ended: false,
        };
        level.apply_commands();
        Ok(level)
    }

    /// Run one logic step
    pub fn step(&mut self, dt: f32, input: InputFrame) -> Result<(), StateError> {
        self.physics.step(dt);

        let player_body = self.player.body();
        for event in self.physics.collision_events() {
            if let Some(other) = event.started_with(player_body) {
                self.dispatch_contact(other)?;
            }
        }

        self.player.update(dt, input)?;
        for enemy in &mut self.enemies {
            enemy.update(dt)?;
        }

        self.apply_commands();
        self.enemies.retain(|enemy| !enemy.is_dead());
        Ok(())
    }

    /// Hand a contact between the player and `other` to the player controller
    pub fn dispatch_contact(&mut self, other: BodyId) -> Result<(), StateError> {
        let Some(record) = self.bodies.get(&other).copied() else {
            return Ok(());
        };
        let player_body = self.player.body();
        let this = BodyInfo::new(
            player_body,
            self.physics.collider_position(player_body).unwrap_or_default(),
            BodyKind::Actor,
        );
        let other = BodyInfo {
            id: other,
            position: self.physics.collider_position(other).unwrap_or_default(),
            kind: record.kind,
            entity: record.entity,
        };

        self.player.handle_collision(&self.obstacles, &this, &other)
    }

    /// Apply everything the actors queued since the last call
    pub fn apply_commands(&mut self) {
        let player_body = self.player.body();
        let mut queued: Vec<(BodyId, ActorCommand)> = self
            .player
            .drain_commands()
            .into_iter()
            .map(|command| (player_body, command))
            .collect();
        for enemy in &mut self.enemies {
            let body = enemy.body();
            queued.extend(enemy.drain_commands().into_iter().map(|command| (body, command)));
        }

        for (body, command) in queued {
            self.apply(body, command);
        }
    }

    fn apply(&mut self, body: BodyId, command: ActorCommand) {
        match command {
            ActorCommand::SetVelocityX(vx) => self.physics.set_velocity_x(body, vx),
            ActorCommand::SetVelocityY(vy) => self.physics.set_velocity_y(body, vy),
            ActorCommand::SetFlipX(flip) => self.sprites.entry(body).or_default().flip_x = flip,
            ActorCommand::PlayAnimation(name) => {
                self.sprites.entry(body).or_default().animation = Some(name)
            }
            ActorCommand::FlashTint { color, .. } => {
                self.sprites.entry(body).or_default().tint = Some(color)
            }
            ActorCommand::ClearTint => self.sprites.entry(body).or_default().tint = None,
            ActorCommand::RemoveBody(target) => {
                self.physics.remove_collider_body(target);
                self.bodies.remove(&target);
                self.sprites.remove(&target);
            }
            ActorCommand::EndLevel => {
                if !self.ended {
                    info!("level '{}' ended", self.name);
                    self.ended = true;
                }
            }
        }
    }

    /// Cancel pending timers and drop event subscriptions
    pub fn teardown(&mut self) {
        self.player.teardown();
        for enemy in &mut self.enemies {
            enemy.teardown();
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &GameEvents {
        &self.events
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn enemies(&self) -> &[EnemyController] {
        &self.enemies
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn body_kind(&self, body: BodyId) -> Option<BodyKind> {
        self.bodies.get(&body).map(|record| record.kind)
    }

    /// Every live body of `kind`
    pub fn bodies_of(&self, kind: BodyKind) -> Vec<BodyId> {
        let mut found: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(body, _)| *body)
            .collect();
        found.sort_by_key(|body| body.into_raw_parts());
        found
    }

    pub fn sprite(&self, body: BodyId) -> Option<&SpriteState> {
        self.sprites.get(&body)
    }

    pub fn player_position(&self) -> Vec2 {
        self.physics
            .collider_position(self.player.body())
            .unwrap_or_default()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

fn actor_record(next_entity: &mut EntityId) -> BodyRecord {
    let entity = *next_entity;
    *next_entity += 1;
    BodyRecord {
        kind: BodyKind::Actor,
        entity: Some(entity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::PlayerState;
    use crate::game::hud::Hud;

    const LEVEL: &str = r#"{
        "name": "test",
        "objects": [
            { "name": "start", "type": "player-spawn", "x": 0.0, "y": 0.0 },
            { "name": "penguin", "type": "enemy-spawn", "x": 6.0, "y": 5.0 },
            { "name": "spikes", "type": "hazard", "x": 12.0, "y": 8.0, "width": 2.0, "height": 0.5 },
            { "name": "star", "type": "pickup-star", "x": 3.0, "y": 0.0 },
            { "name": "fish", "type": "pickup-health", "x": 4.0, "y": 0.0, "value": 25 },
            { "name": "sign", "type": "decoration", "x": 1.0, "y": 1.0 }
        ],
        "terrain": [
            { "x": 0.0, "y": 20.0, "width": 40.0, "height": 1.0 }
        ]
    }"#;

    fn build() -> Level {
        Level::from_json(LEVEL, GameEvents::new(), PlayerStats::default()).unwrap()
    }

    fn pickup(level: &Level, kind: PickupKind) -> BodyId {
        level.bodies_of(BodyKind::Pickup(kind))[0]
    }

    #[test]
    fn test_object_kinds() {
        assert_eq!(ObjectKind::parse("enemy-spawn"), Some(ObjectKind::EnemySpawn));
        assert_eq!(ObjectKind::parse("pickup-health"), Some(ObjectKind::PickupHealth));
        assert_eq!(ObjectKind::parse("decoration"), None);
    }

    #[test]
    fn test_build_spawns_objects() {
        let level = build();
        assert_eq!(level.name(), "test");
        assert_eq!(level.enemies().len(), 1);
        assert_eq!(level.obstacles().len(), 2);
        assert_eq!(level.bodies_of(BodyKind::Fixture).len(), 1);
        assert_eq!(level.bodies_of(BodyKind::Terrain).len(), 1);
        // player, enemy, spikes, 2 pickups, terrain; the decoration is skipped
        assert_eq!(level.physics().collider_count(), 6);

        let enemy = level.enemies()[0].body();
        assert!(level.obstacles().is(ObstacleTag::Enemy, enemy));
        let spikes = level.bodies_of(BodyKind::Fixture)[0];
        assert!(level.obstacles().is(ObstacleTag::Hazard, spikes));
    }

    #[test]
    fn test_terrain_built_after_entities() {
        let level = build();
        let terrain = level.bodies_of(BodyKind::Terrain)[0].into_raw_parts().0;
        let others = [level.player().body(), level.enemies()[0].body()];
        assert!(others.iter().all(|body| body.into_raw_parts().0 < terrain));
    }

    #[test]
    fn test_missing_player_spawn() {
        let json = r#"{ "name": "empty", "objects": [ { "type": "hazard", "x": 0.0, "y": 0.0 } ] }"#;
        let err = Level::from_json(json, GameEvents::new(), PlayerStats::default())
            .err()
            .unwrap();
        assert!(matches!(err, LevelError::MissingPlayerSpawn(name) if name == "empty"));
    }

    #[test]
    fn test_invalid_json() {
        let err = Level::from_json("{ not json", GameEvents::new(), PlayerStats::default())
            .err()
            .unwrap();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_extra_player_spawn_ignored() {
        let json = r#"{ "name": "two", "objects": [
            { "type": "player-spawn", "x": 0.0, "y": 0.0 },
            { "type": "player-spawn", "x": 9.0, "y": 0.0 }
        ] }"#;
        let level = Level::from_json(json, GameEvents::new(), PlayerStats::default()).unwrap();
        assert_eq!(level.physics().collider_count(), 1);
        assert_eq!(level.player_position(), Vec2::ZERO);
    }

    #[test]
    fn test_player_sprite_starts_idle() {
        let level = build();
        let sprite = level.sprite(level.player().body()).unwrap();
        assert_eq!(sprite.animation, Some("player-idle"));
        assert_eq!(sprite.tint, None);
    }

    #[test]
    fn test_collect_pickups() {
        let events = GameEvents::new();
        let hud = Hud::attach(&events);
        let mut level = Level::from_json(LEVEL, events, PlayerStats::default()).unwrap();
        level.player_mut().set_health(50).unwrap();

        let star = pickup(&level, PickupKind::Star);
        let fish = pickup(&level, PickupKind::Health { amount: 25 });
        level.dispatch_contact(star).unwrap();
        level.dispatch_contact(fish).unwrap();
        level.apply_commands();

        assert_eq!(hud.stars(), 1);
        assert_eq!(hud.health(), 75);
        assert_eq!(level.body_kind(star), None);
        assert_eq!(level.body_kind(fish), None);
        assert_eq!(level.physics().collider_count(), 4);

        // Removed bodies no longer react
        level.dispatch_contact(star).unwrap();
        assert_eq!(hud.stars(), 1);
    }

    #[test]
    fn test_hazard_contact_tints_player() {
        let mut level = build();
        let spikes = level.bodies_of(BodyKind::Fixture)[0];
        level.dispatch_contact(spikes).unwrap();
        level.apply_commands();

        assert_eq!(level.player().health(), 90);
        let sprite = level.sprite(level.player().body()).unwrap();
        assert_eq!(sprite.tint, Some(0xff0000));
    }

    #[test]
    fn test_stomp_removes_enemy() {
        let events = GameEvents::new();
        let hud = Hud::attach(&events);
        let mut level = Level::from_json(LEVEL, events, PlayerStats::default()).unwrap();
        let enemy = level.enemies()[0].body();

        // Player spawns at y=0, above the enemy at y=5
        level.dispatch_contact(enemy).unwrap();
        assert_eq!(level.player().previous_state(), Some(PlayerState::EnemyStomp));
        assert_eq!(hud.defeated(), 1);

        level.step(1.0 / 60.0, InputFrame::default()).unwrap();
        assert!(level.enemies().is_empty());
        assert_eq!(level.body_kind(enemy), None);
        assert_eq!(level.player().health(), 100);
    }

    #[test]
    fn test_falling_onto_spikes() {
        let json = r#"{ "name": "pit", "objects": [
            { "type": "player-spawn", "x": 0.0, "y": 0.0 },
            { "type": "hazard", "x": 0.0, "y": 3.0, "width": 6.0, "height": 1.0 }
        ] }"#;
        let mut level = Level::from_json(json, GameEvents::new(), PlayerStats::default()).unwrap();

        for _ in 0..120 {
            level.step(1.0 / 60.0, InputFrame::default()).unwrap();
            if level.player().health() < 100 {
                break;
            }
        }
        assert_eq!(level.player().health(), 90);
    }

    #[test]
    fn test_death_ends_level_once() {
        let mut level = build();
        level.player_mut().set_health(0).unwrap();

        for _ in 0..60 {
            level.step(1.0 / 60.0, InputFrame::default()).unwrap();
        }
        assert!(!level.is_ended());
        for _ in 0..60 {
            level.step(1.0 / 60.0, InputFrame::default()).unwrap();
        }
        assert!(level.is_ended());
        assert_eq!(
            level.sprite(level.player().body()).and_then(|s| s.animation),
            Some("player-death")
        );
    }

    #[test]
    fn test_teardown_cancels_level_end() {
        let events = GameEvents::new();
        let mut level = Level::from_json(LEVEL, events.clone(), PlayerStats::default()).unwrap();
        level.player_mut().set_health(0).unwrap();
        level.teardown();

        for _ in 0..200 {
            level.step(1.0 / 60.0, InputFrame::default()).unwrap();
        }
        assert!(!level.is_ended());
        assert_eq!(
            events.listener_count(crate::game::events::GameTopic::EnemyDefeated),
            0
        );
    }

    #[test]
    fn test_bundled_level_builds() {
        let json = include_str!("../../levels/iceworld.json");
        let level = Level::from_json(json, GameEvents::new(), PlayerStats::default()).unwrap();
        assert_eq!(level.name(), "iceworld");
        assert_eq!(level.enemies().len(), 2);
        assert_eq!(level.bodies_of(BodyKind::Pickup(PickupKind::Star)).len(), 2);
        assert_eq!(
            level.bodies_of(BodyKind::Pickup(PickupKind::Health { amount: 20 })).len(),
            1
        );
    }

    #[test]
    fn test_level_data_defaults() {
        let data = LevelData::from_json(r#"{ "name": "bare" }"#).unwrap();
        assert!(data.objects.is_empty());
        assert!(data.terrain.is_empty());
    }
}
