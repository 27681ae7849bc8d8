//! Item definitions.

use serde::{Deserialize, Serialize};

use crate::Profession;

/// Equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Boots,
}

impl EquipSlot {
    pub fn all() -> [EquipSlot; 4] {
        [Self::Weapon, Self::Armor, Self::Helmet, Self::Boots]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Helmet => "helmet",
            Self::Boots => "boots",
        }
    }
}

impl std::str::FromStr for EquipSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weapon" => Ok(Self::Weapon),
            "armor" | "armour" => Ok(Self::Armor),
            "helmet" => Ok(Self::Helmet),
            "boots" => Ok(Self::Boots),
            other => Err(format!("unknown equipment slot: {}", other)),
        }
    }
}

/// Additive stat bonuses granted by equipment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub magic: i32,
}

impl std::ops::Add for StatBonus {
    type Output = StatBonus;
    fn add(self, rhs: StatBonus) -> StatBonus {
        StatBonus {
            attack: self.attack + rhs.attack,
            defense: self.defense + rhs.defense,
            magic: self.magic + rhs.magic,
        }
    }
}

/// What a consumable does when used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    RestoreHealth(i32),
    /// Accepted and reported; there is no mana pool in the simulation
    RestoreMana(i32),
}

/// Item kinds, each carrying only the fields that matter to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Equipment {
        slot: EquipSlot,
        bonus: StatBonus,
        /// Attack range granted by a weapon
        range: Option<f64>,
        required_profession: Option<Profession>,
    },
    Consumable(ConsumableEffect),
    Material,
    SkillBook {
        skill: String,
    },
}

/// Item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: u32,
    pub name: String,
    pub kind: ItemKind,
}

impl ItemDef {
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match &self.kind {
            ItemKind::Equipment { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    pub fn bonus(&self) -> StatBonus {
        match &self.kind {
            ItemKind::Equipment { bonus, .. } => *bonus,
            _ => StatBonus::default(),
        }
    }

    pub fn weapon_range(&self) -> Option<f64> {
        match &self.kind {
            ItemKind::Equipment { slot: EquipSlot::Weapon, range, .. } => *range,
            _ => None,
        }
    }
}

fn weapon(
    id: u32,
    name: &str,
    attack: i32,
    magic: i32,
    range: f64,
    required_profession: Option<Profession>,
) -> ItemDef {
    ItemDef {
        id,
        name: name.into(),
        kind: ItemKind::Equipment {
            slot: EquipSlot::Weapon,
            bonus: StatBonus { attack, defense: 0, magic },
            range: Some(range),
            required_profession,
        },
    }
}

fn wearable(id: u32, name: &str, slot: EquipSlot, defense: i32, required_profession: Option<Profession>) -> ItemDef {
    ItemDef {
        id,
        name: name.into(),
        kind: ItemKind::Equipment {
            slot,
            bonus: StatBonus { attack: 0, defense, magic: 0 },
            range: None,
            required_profession,
        },
    }
}

fn consumable(id: u32, name: &str, effect: ConsumableEffect) -> ItemDef {
    ItemDef { id, name: name.into(), kind: ItemKind::Consumable(effect) }
}

fn material(id: u32, name: &str) -> ItemDef {
    ItemDef { id, name: name.into(), kind: ItemKind::Material }
}

fn skill_book(id: u32, skill: &str) -> ItemDef {
    ItemDef {
        id,
        name: format!("{} Book", skill),
        kind: ItemKind::SkillBook { skill: skill.into() },
    }
}

/// Built-in item definitions
pub fn get_item_definitions() -> Vec<ItemDef> {
    use ConsumableEffect::*;
    use EquipSlot::*;
    use Profession::*;

    vec![
        // Weapons (1000s)
        weapon(1001, "Wooden Sword", 5, 0, 50.0, None),
        weapon(1002, "Iron Sword", 10, 0, 60.0, Some(Warrior)),
        weapon(1003, "Bronze Sword", 15, 0, 70.0, Some(Warrior)),
        weapon(1004, "Wooden Staff", 3, 8, 120.0, Some(Mage)),
        weapon(1005, "Peachwood Sword", 5, 5, 90.0, Some(Taoist)),
        weapon(1006, "Rusty Sword", 8, 0, 40.0, None),
        // Armor (2000s)
        wearable(2001, "Cloth Armor", Armor, 2, None),
        wearable(2002, "Iron Armor", Armor, 5, Some(Warrior)),
        wearable(2003, "Leather Cap", Helmet, 1, None),
        wearable(2004, "Straw Sandals", Boots, 1, None),
        // Consumables (3000s)
        consumable(3001, "Golden Wound Potion", RestoreHealth(20)),
        consumable(3002, "Mana Potion", RestoreMana(15)),
        consumable(3003, "Super Wound Potion", RestoreHealth(50)),
        consumable(3004, "Super Mana Potion", RestoreMana(40)),
        // Materials (4000s)
        material(4001, "Chicken Feather"),
        material(4002, "Deer Antler"),
        material(4003, "Wolf Pelt"),
        material(4004, "Skeleton Bone"),
        material(4005, "Zombie Tooth"),
        material(4006, "Rotten Flesh"),
        material(4007, "Scarecrow Heart"),
        material(4008, "Woma Horn"),
        material(4009, "Zuma Idol"),
        material(4010, "Chicken Meat"),
        material(4011, "Deer Meat"),
        material(4012, "Deer Hide"),
        material(4013, "Wolf Fang"),
        // Skill books (5000s)
        skill_book(5001, "Slaying"),
        skill_book(5002, "Lightning"),
        skill_book(5003, "Summon Skeleton"),
        skill_book(5004, "Half-Moon Blade"),
        skill_book(5005, "Magic Shield"),
        skill_book(5006, "Shoulder Dash"),
        skill_book(5007, "Ice Roar"),
        skill_book(5008, "Summon Beast"),
        skill_book(5009, "Heaven Splitter"),
        skill_book(5010, "Dragon Thunder"),
        skill_book(5011, "Talisman Barrage"),
        skill_book(5012, "Flaming Sword"),
        skill_book(5013, "Mass Healing"),
    ]
}

/// Get a built-in item by name
pub fn get_item_definition(name: &str) -> Option<ItemDef> {
    get_item_definitions().into_iter().find(|i| i.name == name)
}
