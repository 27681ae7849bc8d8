//! Map definitions: spawn tables, activity areas and top-up pools.
//!
//! Spawn tables are read once when a map loads and never mutated. Built-in
//! tables can be replaced per map from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::navigation::{Aabb, Vec2};

/// Half-extent of a normal monster's activity area
const MONSTER_AREA_HALF: f64 = 100.0;

/// Half-extent of a boss's activity area
const BOSS_AREA_HALF: f64 = 200.0;

/// Where a fresh character appears
const DEFAULT_PLAYER_SPAWN: Vec2 = Vec2 { x: 1200.0, y: 900.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapId {
    Village,
    Forest,
    Desert,
    Dungeon,
    Snowfield,
}

impl MapId {
    pub fn all() -> [MapId; 5] {
        [Self::Village, Self::Forest, Self::Desert, Self::Dungeon, Self::Snowfield]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Village => "Village",
            Self::Forest => "Forest",
            Self::Desert => "Desert",
            Self::Dungeon => "Dungeon",
            Self::Snowfield => "Snowfield",
        }
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for MapId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown map: {}", s))
    }
}

/// One spawn table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpawn {
    pub monster: String,
    pub x: f64,
    pub y: f64,
    /// Without an area the monster roams a radius around its spawn point
    #[serde(default)]
    pub activity_area: Option<Aabb>,
}

impl MonsterSpawn {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: MapId,
    pub player_spawn: Vec2,
    pub spawns: Vec<MonsterSpawn>,
    /// Monsters the top-up spawner picks from
    pub top_up_pool: Vec<String>,
    /// Bosses that may stand in for a top-up spawn; empty on peaceful maps
    #[serde(default)]
    pub boss_pool: Vec<String>,
}

/// Known maps, keyed by id
#[derive(Debug, Clone, Default)]
pub struct ZoneManager {
    maps: HashMap<MapId, MapDefinition>,
}

fn around(monster: &str, x: f64, y: f64, half: f64) -> MonsterSpawn {
    MonsterSpawn {
        monster: monster.to_string(),
        x,
        y,
        activity_area: Some(Aabb::from_center(Vec2::new(x, y), half, half)),
    }
}

/// Normal spawns: every listed point gets a ±100 px activity area
fn normals(monster: &str, points: &[(f64, f64)]) -> Vec<MonsterSpawn> {
    points.iter().map(|&(x, y)| around(monster, x, y, MONSTER_AREA_HALF)).collect()
}

fn boss(monster: &str, x: f64, y: f64) -> MonsterSpawn {
    around(monster, x, y, BOSS_AREA_HALF)
}

fn pool(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl ZoneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five built-in maps
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();

        let mut village = normals("Scarecrow", &[(200.0, 600.0), (1000.0, 800.0), (1800.0, 600.0)]);
        village.extend(normals("Chicken", &[(400.0, 400.0), (1200.0, 400.0), (2000.0, 400.0)]));
        village.extend(normals("Deer", &[(600.0, 1000.0), (1400.0, 1000.0), (2200.0, 1000.0)]));
        manager.insert(MapId::Village, village, pool(&["Scarecrow", "Chicken", "Deer"]), Vec::new());

        let mut forest = normals("Wolf", &[(400.0, 400.0), (1200.0, 600.0), (2000.0, 400.0)]);
        forest.extend(normals("Deer", &[(600.0, 800.0), (1400.0, 800.0)]));
        forest.extend(normals("Scarecrow", &[(800.0, 1200.0), (1600.0, 1200.0)]));
        forest.push(boss("Skeleton King", 1000.0, 500.0));
        forest.push(boss("Zombie King", 1000.0, 1000.0));
        manager.insert(MapId::Forest, forest, pool(&["Wolf", "Deer", "Scarecrow"]), Vec::new());

        let mut desert = normals("Wolf", &[(400.0, 400.0), (1200.0, 400.0), (2000.0, 400.0)]);
        desert.extend(normals(
            "Skeleton",
            &[(600.0, 800.0), (1400.0, 800.0), (800.0, 1200.0), (1600.0, 1200.0)],
        ));
        desert.push(boss("Skeleton King", 1000.0, 600.0));
        desert.push(boss("Woma Taurus", 1000.0, 1000.0));
        manager.insert(MapId::Desert, desert, pool(&["Wolf", "Skeleton"]), pool(&["Skeleton King"]));

        let mut dungeon = normals("Skeleton", &[(400.0, 400.0), (1200.0, 400.0), (2000.0, 400.0)]);
        dungeon.extend(normals(
            "Zombie",
            &[(600.0, 800.0), (1400.0, 800.0), (800.0, 1200.0), (1600.0, 1200.0)],
        ));
        dungeon.push(boss("Zombie King", 1000.0, 600.0));
        dungeon.push(boss("Woma Taurus", 1000.0, 1000.0));
        dungeon.push(boss("Zuma Taurus", 1000.0, 1400.0));
        manager.insert(
            MapId::Dungeon,
            dungeon,
            pool(&["Skeleton", "Zombie"]),
            pool(&["Zombie King", "Woma Taurus"]),
        );

        let mut snowfield = normals("Scarecrow", &[(400.0, 400.0), (1200.0, 400.0), (2000.0, 400.0)]);
        snowfield.extend(normals("Chicken", &[(600.0, 800.0), (1400.0, 800.0)]));
        snowfield.extend(normals("Deer", &[(800.0, 1200.0), (1600.0, 1200.0)]));
        snowfield.push(boss("Skeleton King", 1000.0, 500.0));
        snowfield.push(boss("Zombie King", 1000.0, 1000.0));
        manager.insert(
            MapId::Snowfield,
            snowfield,
            pool(&["Scarecrow", "Chicken", "Deer", "Wolf", "Skeleton", "Zombie"]),
            Vec::new(),
        );

        info!("Initialized {} built-in maps", manager.maps.len());
        manager
    }

    fn insert(&mut self, id: MapId, spawns: Vec<MonsterSpawn>, top_up_pool: Vec<String>, boss_pool: Vec<String>) {
        debug!("Map {}: {} spawn points", id, spawns.len());
        self.maps.insert(
            id,
            MapDefinition {
                id,
                player_spawn: DEFAULT_PLAYER_SPAWN,
                spawns,
                top_up_pool,
                boss_pool,
            },
        );
    }

    /// Replace map definitions from a JSON array of maps.
    /// Maps not mentioned in the file keep their current definition.
    pub fn load_from_json<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, String> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read map file {:?}: {}", path, e))?;

        let maps: Vec<MapDefinition> = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse map file {:?}: {}", path, e))?;

        let count = maps.len();
        for map in maps {
            if map.spawns.is_empty() {
                warn!("Map {} has no spawns", map.id);
            }
            self.maps.insert(map.id, map);
        }

        info!("Loaded {} map definitions from {:?}", count, path);
        Ok(count)
    }

    pub fn get_map(&self, id: MapId) -> Option<&MapDefinition> {
        self.maps.get(&id)
    }

    pub fn map_ids(&self) -> Vec<MapId> {
        let mut ids: Vec<MapId> = self.maps.keys().copied().collect();
        ids.sort();
        ids
    }
}
