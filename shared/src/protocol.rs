//! Core <-> outside world definitions: constants, intents and events.

use serde::{Deserialize, Serialize};

use crate::EquipSlot;

/// Save file format version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

/// Simulation tick rate in Hz (one tick per rendered frame)
pub const TICK_RATE: u32 = 60;

/// Nominal frame length in milliseconds
pub const FRAME_MS: Millis = 16;

/// World size in pixels
pub const WORLD_WIDTH: f64 = 2400.0;
pub const WORLD_HEIGHT: f64 = 1800.0;

/// Number of save slots offered to the player
pub const SAVE_SLOTS: u8 = 3;

/// Identity of anything that can attack or be attacked
pub type EntityId = u64;

/// Milliseconds on the simulation clock
pub type Millis = i64;

/// The single player always has this id; monsters start at 10000
pub const PLAYER_ID: EntityId = 1;

// =============================================================================
// Professions
// =============================================================================

/// Player profession
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Profession {
    Warrior = 0,
    Mage = 1,
    Taoist = 2,
}

impl Profession {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Warrior),
            1 => Some(Self::Mage),
            2 => Some(Self::Taoist),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Mage => "Mage",
            Self::Taoist => "Taoist",
        }
    }

    pub fn all() -> [Profession; 3] {
        [Self::Warrior, Self::Mage, Self::Taoist]
    }
}

impl std::fmt::Display for Profession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Profession {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warrior" => Ok(Self::Warrior),
            "mage" | "wizard" => Ok(Self::Mage),
            "taoist" => Ok(Self::Taoist),
            other => Err(format!("unknown profession: {}", other)),
        }
    }
}

// =============================================================================
// Facing
// =============================================================================

/// Four-way facing used for wandering and sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Facing {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// Unit offset in screen coordinates (y grows downward)
    pub fn offset(&self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Right => (1.0, 0.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "north" | "w" => Ok(Self::Up),
            "right" | "east" | "d" => Ok(Self::Right),
            "down" | "south" | "s" => Ok(Self::Down),
            "left" | "west" | "a" => Ok(Self::Left),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

// =============================================================================
// Input -> Core
// =============================================================================

/// How a cast request names its skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillRef {
    Hotkey(u8),
    Name(String),
}

/// Discrete player intents, already decoded from device input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Move(Facing),
    CastSkill {
        skill: SkillRef,
        target: Option<EntityId>,
    },
    BasicAttack {
        target: Option<EntityId>,
    },
    Equip {
        inventory_index: usize,
    },
    Unequip {
        slot: EquipSlot,
    },
    UseItem {
        inventory_index: usize,
    },
}

// =============================================================================
// Core -> Display
// =============================================================================

/// Everything the core reports to the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Damage {
        attacker: EntityId,
        target: EntityId,
        damage: i32,
        target_health: i32,
    },
    AttackOutOfRange {
        target: EntityId,
        distance: f64,
        range: f64,
    },
    SkillCast {
        skill: String,
        targets: usize,
    },
    SkillRejected {
        skill: String,
        reason: String,
    },
    SkillNoTarget {
        skill: String,
    },
    Healed {
        amount: i32,
        health: i32,
    },
    BuffApplied {
        skill: String,
        until: Millis,
    },
    BuffExpired {
        skill: String,
    },
    Summoned {
        skill: String,
        strength: f64,
    },
    MonsterKilled {
        id: EntityId,
        monster: String,
        killer: EntityId,
    },
    RewardGranted {
        exp: u32,
        gold: u32,
    },
    ItemLooted {
        item: String,
        quantity: u32,
    },
    LevelUp {
        level: u32,
    },
    SkillLearned {
        skill: String,
    },
    SkillUpgraded {
        skill: String,
        level: u8,
    },
    Equipped {
        item: String,
        slot: EquipSlot,
    },
    Unequipped {
        item: String,
        slot: EquipSlot,
    },
    ItemUsed {
        item: String,
    },
    ActionRejected {
        reason: String,
    },
    MonsterSpawned {
        id: EntityId,
        monster: String,
        position: (f64, f64),
        is_boss: bool,
    },
    MonsterDespawned {
        id: EntityId,
    },
    PlayerDied {
        killer: Option<EntityId>,
    },
    PlayerRespawned {
        position: (f64, f64),
    },
}
