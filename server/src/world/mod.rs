//! The simulation: one player, the monsters of one map, and the tick loop.
//!
//! A tick runs player intents, then player upkeep, then every monster in id
//! order, then player/monster collision, then cleanup and top-up spawning. The timestamp passed to `tick` is
//! reused for every comparison inside it.

mod spawn_area;
mod zone_manager;

pub use spawn_area::{SpawnRequest, TopUpSpawner};
pub use zone_manager::{MapDefinition, MapId, MonsterSpawn, ZoneManager};

use std::collections::BTreeMap;

use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use mir_shared::{EntityId, GameEvent, Intent, Millis, SkillRef};

use crate::catalog::ContentCatalog;
use crate::combat::{basic_attack, cast_hotkey, cast_skill, Damageable};
use crate::config::SimConfig;
use crate::display::{camera_offset, Display, EntityView};
use crate::entities::{Candidate, Monster, Player};
use crate::navigation::{Aabb, Vec2, WorldBounds, MONSTER_CLAMP_SIZE, PLAYER_HEIGHT, PLAYER_WIDTH};

/// Monster ids start high to stay clear of the player id
const FIRST_MONSTER_ID: EntityId = 10000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("no definition for map {0}")]
    UnknownMap(MapId),
    #[error("unknown monster: {0}")]
    UnknownMonster(String),
}

pub struct GameWorld {
    pub catalog: ContentCatalog,
    pub bounds: WorldBounds,
    map: MapDefinition,
    pub player: Player,
    monsters: BTreeMap<EntityId, Monster>,
    next_monster_id: EntityId,
    rng: ChaCha8Rng,
    spawner: TopUpSpawner,
    /// Monsters found dead at the end of the previous tick
    corpses: Vec<EntityId>,
    death_announced: bool,
    pub tick: u64,
}

impl GameWorld {
    /// Load a map and populate it from its spawn table
    pub fn new(
        catalog: ContentCatalog,
        config: &SimConfig,
        zones: &ZoneManager,
        map_id: MapId,
        player: Player,
        seed: u64,
    ) -> Result<(Self, Vec<GameEvent>), WorldError> {
        let map = zones.get_map(map_id).cloned().ok_or(WorldError::UnknownMap(map_id))?;
        let bounds = config.bounds();

        let mut world = Self {
            catalog,
            bounds,
            map,
            player,
            monsters: BTreeMap::new(),
            next_monster_id: FIRST_MONSTER_ID,
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawner: TopUpSpawner::new(
                config.live_monster_threshold,
                config.top_up_chance,
                config.boss_chance,
                bounds,
            ),
            corpses: Vec::new(),
            death_announced: false,
            tick: 0,
        };

        let events = world.spawn_map_monsters();
        Ok((world, events))
    }

    fn spawn_map_monsters(&mut self) -> Vec<GameEvent> {
        let spawns = self.map.spawns.clone();
        let mut events = Vec::new();

        for spawn in spawns {
            match self.spawn_monster(&spawn.monster, spawn.position(), spawn.activity_area) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping spawn on {}: {}", self.map.id, e),
            }
        }

        info!("Spawned {} monsters on {}", events.len(), self.map.id);
        events
    }

    /// Add a monster by template name
    pub fn spawn_monster(
        &mut self,
        name: &str,
        position: Vec2,
        activity_area: Option<Aabb>,
    ) -> Result<GameEvent, WorldError> {
        let template = self
            .catalog
            .monster(name)
            .cloned()
            .ok_or_else(|| WorldError::UnknownMonster(name.to_string()))?;

        let id = self.next_monster_id;
        self.next_monster_id += 1;

        let monster = Monster::new(id, template, position, activity_area, &mut self.rng);
        let event = GameEvent::MonsterSpawned {
            id,
            monster: monster.template.name.clone(),
            position: position.as_tuple(),
            is_boss: monster.is_boss(),
        };
        if monster.is_boss() {
            info!("Boss {} #{} spawned at ({:.0}, {:.0})", name, id, position.x, position.y);
        }
        self.monsters.insert(id, monster);
        Ok(event)
    }

    pub fn map(&self) -> &MapDefinition {
        &self.map
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn monster(&self, id: EntityId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn monster_mut(&mut self, id: EntityId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    pub fn live_monster_count(&self) -> usize {
        self.monsters.values().filter(|m| !m.is_dead()).count()
    }

    // =========================================================================
    // Tick
    // =========================================================================

    pub fn tick(&mut self, now: Millis, intents: &[Intent]) -> Vec<GameEvent> {
        self.tick += 1;
        let mut events = Vec::new();

        for intent in intents {
            events.extend(self.apply_intent(intent, now));
        }
        events.extend(self.player.update(now));
        events.extend(self.update_monsters(now));
        self.resolve_collisions();
        events.extend(self.cleanup_and_top_up());

        events
    }

    pub fn apply_intent(&mut self, intent: &Intent, now: Millis) -> Vec<GameEvent> {
        if self.player.is_dead() {
            return vec![GameEvent::ActionRejected { reason: "you are dead".to_string() }];
        }

        match intent {
            Intent::Move(facing) => {
                self.player.move_step(*facing, &self.bounds);
                Vec::new()
            }
            Intent::CastSkill { skill, target } => {
                let result = match skill {
                    SkillRef::Hotkey(key) => {
                        cast_hotkey(&mut self.player, *key, &mut self.monsters, now, &mut self.rng)
                    }
                    SkillRef::Name(name) => {
                        cast_skill(&mut self.player, name, *target, &mut self.monsters, now, &mut self.rng)
                    }
                };
                match result {
                    Ok(outcome) => outcome.events(self.player.id, self.player.health),
                    Err(e) => {
                        let label = match skill {
                            SkillRef::Hotkey(key) => format!("hotkey {}", key),
                            SkillRef::Name(name) => name.clone(),
                        };
                        debug!("Cast of {} rejected: {}", label, e);
                        vec![GameEvent::SkillRejected { skill: label, reason: e.to_string() }]
                    }
                }
            }
            Intent::BasicAttack { target } => self.basic_attack(*target, now),
            Intent::Equip { inventory_index } => {
                match self.player.equip_from_inventory(*inventory_index, &self.catalog) {
                    Ok(events) => events,
                    Err(e) => vec![GameEvent::ActionRejected { reason: e.to_string() }],
                }
            }
            Intent::Unequip { slot } => match self.player.unequip(*slot) {
                Ok(item) => vec![GameEvent::Unequipped { item: item.name, slot: *slot }],
                Err(e) => vec![GameEvent::ActionRejected { reason: e.to_string() }],
            },
            Intent::UseItem { inventory_index } => {
                match self.player.use_item(*inventory_index, &self.catalog) {
                    Ok(events) => events,
                    Err(e) => vec![GameEvent::ActionRejected { reason: e.to_string() }],
                }
            }
        }
    }

    /// Attack a named monster, or the first live one in reach
    fn basic_attack(&mut self, target: Option<EntityId>, now: Millis) -> Vec<GameEvent> {
        let target = match target {
            Some(id) => id,
            None => {
                let origin = self.player.center();
                let range = self.player.attack_profile().range;
                let found = self
                    .monsters
                    .values()
                    .find(|m| !m.is_dead() && origin.distance_to(m.center()) <= range)
                    .map(|m| m.id);
                match found {
                    Some(id) => id,
                    None => return vec![GameEvent::ActionRejected { reason: "no target in range".to_string() }],
                }
            }
        };

        let Some(monster) = self.monsters.get_mut(&target).filter(|m| !m.is_dead()) else {
            debug!("Basic attack target #{} is gone", target);
            return Vec::new();
        };

        basic_attack(&mut self.player, monster, now, &mut self.rng).events(self.player.id)
    }

    fn update_monsters(&mut self, now: Millis) -> Vec<GameEvent> {
        let mut events = Vec::new();

        let candidates = if self.player.is_dead() {
            Vec::new()
        } else {
            vec![Candidate {
                id: self.player.id,
                center: self.player.center(),
                detectable: !self.player.is_stealthed(),
            }]
        };

        // Collect attacks first, then apply them
        let mut attacks = Vec::new();
        for monster in self.monsters.values_mut() {
            if let Some(attack) = monster.update(now, &candidates, &self.bounds, &mut self.rng) {
                attacks.push(attack);
            }
        }

        for attack in attacks {
            if attack.target != self.player.id || self.player.is_dead() {
                continue;
            }
            let damage = self.player.take_damage(attack.damage, attack.monster_id, now);
            events.push(GameEvent::Damage {
                attacker: attack.monster_id,
                target: self.player.id,
                damage,
                target_health: self.player.health,
            });

            if self.player.is_dead() && !self.death_announced {
                info!("{} was killed by monster #{}", self.player.name, attack.monster_id);
                self.death_announced = true;
                events.push(GameEvent::PlayerDied { killer: Some(attack.monster_id) });
            }
        }

        events
    }

    /// Push live monsters out of the player's box. The player never moves.
    fn resolve_collisions(&mut self) {
        if self.player.is_dead() {
            return;
        }
        let player_box = Aabb::from_center(self.player.center(), PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0);

        for monster in self.monsters.values_mut().filter(|m| !m.is_dead()) {
            let size = monster.template.size.body_size();
            let body = Aabb::from_center(monster.center(), size / 2.0, size / 2.0);
            if let Some(offset) = player_box.push_out(&body) {
                monster.position = self.bounds.clamp(monster.position + offset, MONSTER_CLAMP_SIZE, MONSTER_CLAMP_SIZE);
                trace!("Monster #{} pushed off the player by ({:.1}, {:.1})", monster.id, offset.x, offset.y);
            }
        }
    }

    fn cleanup_and_top_up(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for id in std::mem::take(&mut self.corpses) {
            if self.monsters.remove(&id).is_some() {
                events.push(GameEvent::MonsterDespawned { id });
            }
        }
        self.corpses = self
            .monsters
            .values()
            .filter(|m| m.is_dead())
            .map(|m| m.id)
            .collect();

        let live = self.live_monster_count();
        if let Some(request) = self.spawner.update(live, &self.map, &mut self.rng) {
            match self.spawn_monster(&request.monster, request.position, None) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Top-up spawn failed: {}", e),
            }
        }

        events
    }

    /// Bring a dead (or living) player back at the map's spawn point
    pub fn respawn_player(&mut self) -> GameEvent {
        self.player.respawn(self.map.player_spawn);
        self.death_announced = false;
        info!("{} respawned", self.player.name);
        GameEvent::PlayerRespawned { position: self.map.player_spawn.as_tuple() }
    }

    /// Push the current frame to a display
    pub fn present(&self, display: &mut dyn Display) {
        let offset = camera_offset(self.player.center(), &self.bounds);

        display.render(
            &EntityView {
                id: self.player.id,
                label: self.player.name.clone(),
                position: self.player.position,
                facing: self.player.facing,
                health: self.player.health,
                max_health: self.player.max_health,
            },
            offset,
        );
        for monster in self.monsters.values() {
            display.render(
                &EntityView {
                    id: monster.id,
                    label: monster.template.name.clone(),
                    position: monster.position,
                    facing: monster.facing,
                    health: monster.health,
                    max_health: monster.max_health,
                },
                offset,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mir_shared::{Facing, Profession, PLAYER_ID};

    fn quiet_config() -> SimConfig {
        SimConfig { top_up_chance: 0.0, ..SimConfig::default() }
    }

    fn world_on(map: MapId, profession: Profession) -> (GameWorld, Vec<GameEvent>) {
        let catalog = ContentCatalog::builtin();
        let zones = ZoneManager::with_defaults();
        let spawn = zones.get_map(map).unwrap().player_spawn;
        let player = Player::new(PLAYER_ID, "Hero", profession, spawn, &catalog);
        GameWorld::new(catalog, &quiet_config(), &zones, map, player, 7).unwrap()
    }

    /// Move the monster so its center sits `dx` px right of the player's center
    fn park_next_to_player(world: &mut GameWorld, id: EntityId, dx: f64) {
        let center = world.player.center() + Vec2::new(dx, 0.0);
        let monster = world.monster_mut(id).unwrap();
        let half = monster.template.size.body_size() / 2.0;
        monster.position = center - Vec2::new(half, half);
        monster.spawn_point = monster.position;
        monster.region = crate::entities::ActivityRegion::Radius(500.0);
    }

    #[test]
    fn test_map_load_spawns_table_in_id_order() {
        let (world, events) = world_on(MapId::Village, Profession::Warrior);
        assert_eq!(events.len(), 9);
        assert_eq!(world.live_monster_count(), 9);
        assert_eq!(world.monsters().next().map(|m| m.id), Some(10_000));
        assert!(matches!(&events[0], GameEvent::MonsterSpawned { id: 10_000, monster, .. } if monster == "Scarecrow"));
    }

    #[test]
    fn test_dead_monsters_leave_the_tick_after() {
        let (mut world, _) = world_on(MapId::Village, Profession::Warrior);
        world.monster_mut(10_000).unwrap().health = 0;

        let first = world.tick(0, &[]);
        assert!(!first.contains(&GameEvent::MonsterDespawned { id: 10_000 }));
        assert!(world.monster(10_000).is_some());

        let second = world.tick(16, &[]);
        assert!(second.contains(&GameEvent::MonsterDespawned { id: 10_000 }));
        assert!(world.monster(10_000).is_none());
        assert_eq!(world.live_monster_count(), 8);
    }

    #[test]
    fn test_basic_attack_intent_auto_targets() {
        let (mut world, _) = world_on(MapId::Village, Profession::Warrior);
        park_next_to_player(&mut world, 10_003, 20.0);

        let events = world.tick(0, &[Intent::BasicAttack { target: None }]);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Damage { attacker: PLAYER_ID, target: 10_003, .. }
        )));
    }

    #[test]
    fn test_overlapping_monster_is_pushed_off_the_player() {
        let (mut world, _) = world_on(MapId::Village, Profession::Warrior);
        park_next_to_player(&mut world, 10_000, 2.0);

        world.tick(0, &[]);

        // Center started 2 px to the right, so it leaves sideways
        let monster = world.monster(10_000).unwrap();
        let half = monster.template.size.body_size() / 2.0;
        let gap = monster.center() - world.player.center();
        assert!(gap.x >= PLAYER_WIDTH / 2.0 + half - 1e-9);
        assert!(gap.y.abs() < 1e-9);
    }

    #[test]
    fn test_missing_target_is_a_silent_no_op() {
        let (mut world, _) = world_on(MapId::Village, Profession::Warrior);
        let events = world.apply_intent(&Intent::BasicAttack { target: Some(99) }, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_monster_attacks_and_kills_player_once() {
        let (mut world, _) = world_on(MapId::Dungeon, Profession::Mage);
        let boss = world
            .monsters()
            .find(|m| m.template.name == "Zuma Taurus")
            .map(|m| m.id)
            .unwrap();
        park_next_to_player(&mut world, boss, 10.0);
        world.player.health = 1;

        let events = world.tick(0, &[]);
        let deaths = events.iter().filter(|e| matches!(e, GameEvent::PlayerDied { .. })).count();
        assert_eq!(deaths, 1);
        assert!(world.player.is_dead());

        // Dead players are ignored by monsters and cannot act
        let later = world.tick(2000, &[Intent::Move(Facing::Left)]);
        assert!(!later.iter().any(|e| matches!(e, GameEvent::PlayerDied { .. })));
        assert!(later.contains(&GameEvent::ActionRejected { reason: "you are dead".into() }));

        let respawned = world.respawn_player();
        assert_eq!(respawned, GameEvent::PlayerRespawned { position: (1200.0, 900.0) });
        assert_eq!(world.player.health, world.player.max_health);
    }

    #[test]
    fn test_cast_rejection_becomes_an_event() {
        let (mut world, _) = world_on(MapId::Village, Profession::Mage);
        let events = world.apply_intent(
            &Intent::CastSkill { skill: SkillRef::Name("Lightning".into()), target: None },
            0,
        );
        assert!(matches!(&events[0], GameEvent::SkillRejected { skill, .. } if skill == "Lightning"));
    }

    #[test]
    fn test_top_up_refills_an_empty_map() {
        let catalog = ContentCatalog::builtin();
        let mut zones = ZoneManager::with_defaults();
        let dir = std::env::temp_dir().join(format!("mir-world-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("maps.json");
        std::fs::write(
            &path,
            r#"[{ "id": "Forest", "player_spawn": {"x": 0.0, "y": 0.0}, "spawns": [], "top_up_pool": ["Wolf"] }]"#,
        )
        .unwrap();
        zones.load_from_json(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        let config = SimConfig { top_up_chance: 1.0, ..SimConfig::default() };
        let player = Player::new(PLAYER_ID, "Hero", Profession::Taoist, Vec2::new(0.0, 0.0), &catalog);
        let (mut world, events) = GameWorld::new(catalog, &config, &zones, MapId::Forest, player, 3).unwrap();
        assert!(events.is_empty());

        let events = world.tick(0, &[]);
        assert!(events.iter().any(|e| matches!(e, GameEvent::MonsterSpawned { monster, .. } if monster == "Wolf")));
        assert_eq!(world.live_monster_count(), 1);
    }

    #[test]
    fn test_same_seed_same_world() {
        let (mut a, _) = world_on(MapId::Forest, Profession::Warrior);
        let (mut b, _) = world_on(MapId::Forest, Profession::Warrior);
        for t in 0..120 {
            a.tick(t * 16, &[]);
            b.tick(t * 16, &[]);
        }
        let pa: Vec<Vec2> = a.monsters().map(|m| m.position).collect();
        let pb: Vec<Vec2> = b.monsters().map(|m| m.position).collect();
        assert_eq!(pa, pb);
    }
}
