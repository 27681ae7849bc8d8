//! Shared entity definitions.

use serde::{Deserialize, Serialize};

use crate::{Millis, Profession, FRAME_MS};

/// Base stats before equipment and buffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
}

impl BaseStats {
    /// Level 1 stats for a profession
    pub fn for_profession(profession: Profession) -> Self {
        match profession {
            Profession::Warrior => Self { max_health: 120, attack: 25, defense: 15, magic: 10 },
            Profession::Mage => Self { max_health: 80, attack: 15, defense: 8, magic: 30 },
            Profession::Taoist => Self { max_health: 100, attack: 20, defense: 12, magic: 20 },
        }
    }

    /// Stats gained on every level-up
    pub fn growth(profession: Profession) -> Self {
        match profession {
            Profession::Warrior => Self { max_health: 15, attack: 5, defense: 3, magic: 1 },
            Profession::Mage => Self { max_health: 8, attack: 2, defense: 1, magic: 8 },
            Profession::Taoist => Self { max_health: 12, attack: 3, defense: 2, magic: 5 },
        }
    }
}

impl std::ops::Add for BaseStats {
    type Output = BaseStats;
    fn add(self, rhs: BaseStats) -> BaseStats {
        BaseStats {
            max_health: self.max_health + rhs.max_health,
            attack: self.attack + rhs.attack,
            defense: self.defense + rhs.defense,
            magic: self.magic + rhs.magic,
        }
    }
}

/// Rough body size, used for hit centers and the default roaming radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Sprite edge length in pixels
    pub fn body_size(&self) -> f64 {
        match self {
            Self::Small => 28.0,
            Self::Medium => 32.0,
            Self::Large => 36.0,
        }
    }
}

/// Drop table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    pub quantity: u32,
    pub chance: f64, // 0.0 - 1.0
}

impl LootEntry {
    pub fn new(item: &str, quantity: u32, chance: f64) -> Self {
        Self { item: item.into(), quantity, chance }
    }
}

fn default_speed() -> f64 {
    1.5
}

fn default_aggro_range() -> f64 {
    150.0
}

fn default_attack_range() -> f64 {
    30.0
}

fn default_attack_cooldown_ms() -> Millis {
    60 * FRAME_MS
}

/// Monster kind: stats, rewards and AI tuning. Every monster is one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: u32,
    pub name: String,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub exp_reward: u32,
    pub gold_reward: u32,
    pub size: SizeClass,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_aggro_range")]
    pub aggro_range: f64,
    #[serde(default = "default_attack_range")]
    pub attack_range: f64,
    #[serde(default = "default_attack_cooldown_ms")]
    pub attack_cooldown_ms: Millis,
    #[serde(default)]
    pub drop_table: Vec<LootEntry>,
}

impl MonsterTemplate {
    /// Roaming radius around the spawn point when no activity area is given
    pub fn activity_radius(&self) -> f64 {
        if self.is_boss {
            500.0
        } else if self.size == SizeClass::Large {
            300.0
        } else {
            200.0
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn monster(
    id: u32,
    name: &str,
    max_health: i32,
    attack: i32,
    defense: i32,
    exp_reward: u32,
    gold_reward: u32,
    size: SizeClass,
    is_boss: bool,
    drop_table: Vec<LootEntry>,
) -> MonsterTemplate {
    MonsterTemplate {
        id,
        name: name.into(),
        max_health,
        attack,
        defense,
        exp_reward,
        gold_reward,
        size,
        is_boss,
        speed: default_speed(),
        aggro_range: default_aggro_range(),
        attack_range: default_attack_range(),
        attack_cooldown_ms: default_attack_cooldown_ms(),
        drop_table,
    }
}

/// Built-in monster roster
pub fn get_monster_templates() -> Vec<MonsterTemplate> {
    use SizeClass::*;

    let wolf = MonsterTemplate {
        speed: 3.0,
        ..monster(4, "Wolf", 70, 18, 4, 35, 18, Large, false, vec![
            LootEntry::new("Golden Wound Potion", 2, 0.4),
            LootEntry::new("Wolf Pelt", 1, 0.3),
            LootEntry::new("Wolf Fang", 1, 0.2),
        ])
    };

    vec![
        monster(1, "Scarecrow", 30, 5, 2, 10, 5, Small, false, vec![
            LootEntry::new("Golden Wound Potion", 1, 0.3),
            LootEntry::new("Scarecrow Heart", 1, 0.1),
        ]),
        monster(2, "Chicken", 20, 3, 1, 5, 2, Small, false, vec![
            LootEntry::new("Chicken Meat", 1, 0.5),
            LootEntry::new("Chicken Feather", 1, 0.3),
        ]),
        monster(3, "Deer", 40, 8, 3, 15, 8, Small, false, vec![
            LootEntry::new("Deer Meat", 1, 0.4),
            LootEntry::new("Deer Hide", 1, 0.2),
            LootEntry::new("Deer Antler", 1, 0.1),
        ]),
        wolf,
        monster(5, "Skeleton", 60, 15, 5, 30, 15, Large, false, vec![
            LootEntry::new("Golden Wound Potion", 2, 0.4),
            LootEntry::new("Skeleton Bone", 1, 0.3),
            LootEntry::new("Rusty Sword", 1, 0.2),
        ]),
        monster(6, "Zombie", 80, 20, 8, 40, 20, Large, false, vec![
            LootEntry::new("Golden Wound Potion", 3, 0.5),
            LootEntry::new("Zombie Tooth", 1, 0.3),
            LootEntry::new("Rotten Flesh", 1, 0.4),
        ]),
        monster(7, "Skeleton King", 250, 40, 10, 200, 100, Medium, true, vec![
            LootEntry::new("Super Wound Potion", 4, 0.7),
            LootEntry::new("Super Mana Potion", 3, 0.6),
            LootEntry::new("Skeleton Bone", 3, 0.5),
            LootEntry::new("Flaming Sword Book", 1, 0.15),
            LootEntry::new("Mass Healing Book", 1, 0.1),
        ]),
        monster(8, "Zombie King", 200, 35, 20, 150, 75, Medium, true, vec![
            LootEntry::new("Super Wound Potion", 3, 0.6),
            LootEntry::new("Super Mana Potion", 2, 0.5),
            LootEntry::new("Zombie Tooth", 2, 0.4),
            LootEntry::new("Half-Moon Blade Book", 1, 0.1),
            LootEntry::new("Magic Shield Book", 1, 0.1),
        ]),
        monster(9, "Woma Taurus", 500, 60, 30, 500, 300, Medium, true, vec![
            LootEntry::new("Super Wound Potion", 10, 0.9),
            LootEntry::new("Super Mana Potion", 8, 0.9),
            LootEntry::new("Woma Horn", 2, 0.5),
            LootEntry::new("Shoulder Dash Book", 1, 0.3),
            LootEntry::new("Ice Roar Book", 1, 0.3),
            LootEntry::new("Summon Beast Book", 1, 0.3),
        ]),
        monster(10, "Zuma Taurus", 800, 80, 40, 1000, 500, Medium, true, vec![
            LootEntry::new("Super Wound Potion", 15, 0.95),
            LootEntry::new("Super Mana Potion", 12, 0.95),
            LootEntry::new("Zuma Idol", 3, 0.7),
            LootEntry::new("Heaven Splitter Book", 1, 0.5),
            LootEntry::new("Dragon Thunder Book", 1, 0.5),
            LootEntry::new("Talisman Barrage Book", 1, 0.5),
        ]),
        monster(11, "Woma Guardian", 150, 30, 15, 100, 50, Medium, false, vec![
            LootEntry::new("Golden Wound Potion", 5, 0.6),
            LootEntry::new("Mana Potion", 3, 0.5),
            LootEntry::new("Woma Horn", 1, 0.2),
            LootEntry::new("Lightning Book", 1, 0.1),
            LootEntry::new("Summon Skeleton Book", 1, 0.1),
        ]),
        monster(12, "Zuma Guardian", 300, 45, 25, 250, 150, Medium, false, vec![
            LootEntry::new("Super Wound Potion", 5, 0.7),
            LootEntry::new("Super Mana Potion", 4, 0.6),
            LootEntry::new("Zuma Idol", 1, 0.3),
            LootEntry::new("Heaven Splitter Book", 1, 0.1),
            LootEntry::new("Dragon Thunder Book", 1, 0.1),
        ]),
    ]
}

/// Get a built-in monster template by name
pub fn get_monster_template(name: &str) -> Option<MonsterTemplate> {
    get_monster_templates().into_iter().find(|m| m.name == name)
}
