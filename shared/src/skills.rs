//! Skill definitions for the three professions.
//!
//! Every skill carries one rank entry per skill level, so runtime code never
//! has to guess which fields a skill has: it matches on [`SkillEffect`] and
//! reads the rank for the caster's current level.

use serde::{Deserialize, Serialize};

use crate::{Millis, Profession};

/// Which stat scales a damage skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    /// Scales with attack
    Physical,
    /// Scales with magic
    Magic,
    /// Scales with (attack + magic) / 2
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRank {
    pub multiplier: f64,
    pub cooldown_ms: Millis,
    pub range: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealRank {
    pub heal: i32,
    pub cooldown_ms: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffRank {
    /// Defense multiplier for shields; unused by stealth
    pub factor: f64,
    pub cooldown_ms: Millis,
    pub duration_ms: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummonRank {
    pub strength: f64,
    pub cooldown_ms: Millis,
}

/// What a skill does, decided once when content is loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillEffect {
    Damage {
        damage_type: DamageType,
        /// Cast without a target hits every monster in range
        area: bool,
        ranks: Vec<DamageRank>,
    },
    Heal {
        ranks: Vec<HealRank>,
    },
    Shield {
        ranks: Vec<BuffRank>,
    },
    Stealth {
        ranks: Vec<BuffRank>,
    },
    Summon {
        ranks: Vec<SummonRank>,
    },
}

/// Skill definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub name: String,
    pub profession: Profession,
    /// Character level needed to learn it
    pub required_level: u32,
    pub animation: String,
    pub effect: SkillEffect,
}

/// Rank for a 1-based skill level, clamped to the last defined rank
fn rank_at<T>(ranks: &[T], level: u8) -> Option<&T> {
    if level == 0 || ranks.is_empty() {
        return None;
    }
    let index = (level as usize - 1).min(ranks.len() - 1);
    ranks.get(index)
}

impl SkillDef {
    pub fn max_level(&self) -> u8 {
        let ranks = match &self.effect {
            SkillEffect::Damage { ranks, .. } => ranks.len(),
            SkillEffect::Heal { ranks } => ranks.len(),
            SkillEffect::Shield { ranks } | SkillEffect::Stealth { ranks } => ranks.len(),
            SkillEffect::Summon { ranks } => ranks.len(),
        };
        ranks as u8
    }

    pub fn cooldown_ms(&self, level: u8) -> Millis {
        let cooldown = match &self.effect {
            SkillEffect::Damage { ranks, .. } => rank_at(ranks, level).map(|r| r.cooldown_ms),
            SkillEffect::Heal { ranks } => rank_at(ranks, level).map(|r| r.cooldown_ms),
            SkillEffect::Shield { ranks } | SkillEffect::Stealth { ranks } => {
                rank_at(ranks, level).map(|r| r.cooldown_ms)
            }
            SkillEffect::Summon { ranks } => rank_at(ranks, level).map(|r| r.cooldown_ms),
        };
        cooldown.unwrap_or(0)
    }

    /// Targeting range; self-only skills report zero
    pub fn range(&self, level: u8) -> f64 {
        match &self.effect {
            SkillEffect::Damage { ranks, .. } => rank_at(ranks, level).map(|r| r.range).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn damage_rank(&self, level: u8) -> Option<(DamageType, bool, DamageRank)> {
        match &self.effect {
            SkillEffect::Damage { damage_type, area, ranks } => {
                rank_at(ranks, level).map(|r| (*damage_type, *area, *r))
            }
            _ => None,
        }
    }

    pub fn heal_rank(&self, level: u8) -> Option<HealRank> {
        match &self.effect {
            SkillEffect::Heal { ranks } => rank_at(ranks, level).copied(),
            _ => None,
        }
    }

    pub fn buff_rank(&self, level: u8) -> Option<BuffRank> {
        match &self.effect {
            SkillEffect::Shield { ranks } | SkillEffect::Stealth { ranks } => rank_at(ranks, level).copied(),
            _ => None,
        }
    }

    pub fn summon_rank(&self, level: u8) -> Option<SummonRank> {
        match &self.effect {
            SkillEffect::Summon { ranks } => rank_at(ranks, level).copied(),
            _ => None,
        }
    }
}

// =============================================================================
// Skill Definitions
// =============================================================================

const MAX_SKILL_LEVEL: u8 = 3;

/// Expand a base rank plus per-level bonuses into explicit ranks
fn scaled_ranks(
    multiplier: f64,
    multiplier_bonus: f64,
    cooldown_ms: Millis,
    cooldown_reduction: f64,
    range: f64,
    range_bonus: f64,
) -> Vec<DamageRank> {
    (0..MAX_SKILL_LEVEL)
        .map(|step| {
            let step = step as f64;
            DamageRank {
                multiplier: multiplier + multiplier_bonus * step,
                cooldown_ms: (cooldown_ms as f64 * (1.0 - cooldown_reduction * step)).round() as Millis,
                range: range + range_bonus * step,
            }
        })
        .collect()
}

fn damage_skill(
    profession: Profession,
    name: &str,
    required_level: u32,
    animation: &str,
    damage_type: DamageType,
    area: bool,
    ranks: Vec<DamageRank>,
) -> SkillDef {
    SkillDef {
        name: name.into(),
        profession,
        required_level,
        animation: animation.into(),
        effect: SkillEffect::Damage { damage_type, area, ranks },
    }
}

fn skill(profession: Profession, name: &str, required_level: u32, animation: &str, effect: SkillEffect) -> SkillDef {
    SkillDef {
        name: name.into(),
        profession,
        required_level,
        animation: animation.into(),
        effect,
    }
}

fn damage_ranks(table: [(f64, Millis, f64); 3]) -> Vec<DamageRank> {
    table
        .iter()
        .map(|&(multiplier, cooldown_ms, range)| DamageRank { multiplier, cooldown_ms, range })
        .collect()
}

fn warrior_skills() -> Vec<SkillDef> {
    use DamageType::Physical;
    let p = Profession::Warrior;

    vec![
        damage_skill(p, "Basic Swordsmanship", 1, "sword_basic", Physical, false,
            scaled_ranks(2.0, 0.5, 600, 0.15, 45.0, 0.0)),
        damage_skill(p, "Slaying", 10, "sword_power", Physical, false,
            scaled_ranks(2.8, 0.6, 900, 0.2, 50.0, 0.0)),
        damage_skill(p, "Half-Moon Blade", 15, "sword_area", Physical, true,
            scaled_ranks(2.5, 0.5, 1200, 0.15, 55.0, 10.0)),
        damage_skill(p, "Shoulder Dash", 20, "charge", Physical, false,
            scaled_ranks(2.2, 0.5, 1500, 0.25, 30.0, 8.0)),
        damage_skill(p, "Flaming Sword", 25, "fire_sword", Physical, false,
            scaled_ranks(4.0, 0.8, 1800, 0.25, 55.0, 0.0)),
        damage_skill(p, "Sun-Chasing Sword", 30, "slash", Physical, false,
            scaled_ranks(3.5, 0.6, 2500, 0.25, 70.0, 15.0)),
        damage_skill(p, "Heaven Splitter", 35, "heaven_split", Physical, false,
            scaled_ranks(5.0, 1.0, 3000, 0.3, 80.0, 20.0)),
    ]
}

fn mage_skills() -> Vec<SkillDef> {
    use DamageType::Magic;
    let p = Profession::Mage;

    let shield_ranks = (0..MAX_SKILL_LEVEL)
        .map(|step| BuffRank {
            factor: 2.5 + 0.8 * step as f64,
            cooldown_ms: (2500.0 * (1.0 - 0.25 * step as f64)).round() as Millis,
            duration_ms: 10_000 + 3_000 * step as Millis,
        })
        .collect();

    vec![
        damage_skill(p, "Fireball", 1, "fireball", Magic, false,
            scaled_ranks(2.2, 0.5, 600, 0.15, 150.0, 25.0)),
        damage_skill(p, "Lightning", 10, "lightning", Magic, false,
            scaled_ranks(2.8, 0.6, 900, 0.2, 180.0, 35.0)),
        damage_skill(p, "Hellfire", 15, "hellfire", Magic, true,
            scaled_ranks(2.6, 0.5, 1500, 0.25, 120.0, 30.0)),
        damage_skill(p, "Ice Roar", 20, "ice_roar", Magic, true,
            scaled_ranks(2.7, 0.5, 1200, 0.2, 100.0, 25.0)),
        skill(p, "Magic Shield", 25, "magic_shield", SkillEffect::Shield { ranks: shield_ranks }),
        damage_skill(p, "Dragon Thunder", 30, "dragon_thunder", Magic, false,
            scaled_ranks(3.5, 0.8, 1800, 0.25, 200.0, 45.0)),
        damage_skill(p, "Sky Burner", 35, "sky_burner", Magic, true,
            scaled_ranks(3.2, 0.6, 1500, 0.25, 150.0, 35.0)),
    ]
}

fn taoist_skills() -> Vec<SkillDef> {
    use DamageType::{Magic, Mixed};
    let p = Profession::Taoist;

    vec![
        damage_skill(p, "Soul Fire Talisman", 1, "soul_fire", Mixed, false,
            damage_ranks([(2.2, 600, 100.0), (2.8, 550, 110.0), (3.4, 500, 120.0)])),
        skill(p, "Healing", 1, "heal", SkillEffect::Heal {
            ranks: vec![
                HealRank { heal: 30, cooldown_ms: 900 },
                HealRank { heal: 45, cooldown_ms: 800 },
                HealRank { heal: 60, cooldown_ms: 700 },
            ],
        }),
        damage_skill(p, "Poison Cloud", 10, "poison", Magic, true,
            damage_ranks([(1.2, 1200, 120.0), (1.5, 1100, 130.0), (1.8, 900, 140.0)])),
        skill(p, "Summon Skeleton", 15, "summon_skull", SkillEffect::Summon {
            ranks: vec![
                SummonRank { strength: 1.2, cooldown_ms: 2500 },
                SummonRank { strength: 1.6, cooldown_ms: 2300 },
                SummonRank { strength: 2.0, cooldown_ms: 2000 },
            ],
        }),
        skill(p, "Stealth", 20, "stealth", SkillEffect::Stealth {
            ranks: vec![
                BuffRank { factor: 1.0, cooldown_ms: 3000, duration_ms: 15_000 },
                BuffRank { factor: 1.0, cooldown_ms: 2900, duration_ms: 20_000 },
                BuffRank { factor: 1.0, cooldown_ms: 2700, duration_ms: 25_000 },
            ],
        }),
        skill(p, "Mass Healing", 25, "mass_heal", SkillEffect::Heal {
            ranks: vec![
                HealRank { heal: 45, cooldown_ms: 1500 },
                HealRank { heal: 60, cooldown_ms: 1400 },
                HealRank { heal: 75, cooldown_ms: 1200 },
            ],
        }),
        skill(p, "Summon Beast", 30, "summon_beast", SkillEffect::Summon {
            ranks: vec![
                SummonRank { strength: 1.3, cooldown_ms: 3600 },
                SummonRank { strength: 1.8, cooldown_ms: 3500 },
                SummonRank { strength: 2.3, cooldown_ms: 3300 },
            ],
        }),
        damage_skill(p, "Talisman Barrage", 35, "talisman_barrage", Mixed, false,
            damage_ranks([(2.5, 1800, 100.0), (3.0, 1700, 110.0), (3.5, 1500, 120.0)])),
    ]
}

/// Get all skill definitions
pub fn get_skill_definitions() -> Vec<SkillDef> {
    let mut skills = warrior_skills();
    skills.extend(mage_skills());
    skills.extend(taoist_skills());
    skills
}

/// Get the skill list of one profession, in display order
pub fn get_skills_for_profession(profession: Profession) -> Vec<SkillDef> {
    match profession {
        Profession::Warrior => warrior_skills(),
        Profession::Mage => mage_skills(),
        Profession::Taoist => taoist_skills(),
    }
}
