//! Skill casting and cooldowns.

use std::collections::BTreeMap;

use log::{debug, trace};
use rand::Rng;
use thiserror::Error;

use mir_shared::{DamageType, EntityId, GameEvent, Millis, SkillEffect};

use super::{strike, Damageable, Hit};
use crate::entities::{BuffKind, Monster, Player};
use crate::navigation::Vec2;

/// Expected rejections; the caster simply doesn't get to cast
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    #[error("{0} has not been learned")]
    NotLearned(String),
    #[error("skill is on cooldown for another {0} ms")]
    OnCooldown(Millis),
    #[error("target is out of range ({0:.1})")]
    OutOfRange(f64),
    #[error("no skill bound to hotkey {0}")]
    UnboundHotkey(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CastOutcome {
    Struck { skill: String, hits: Vec<Hit> },
    /// Cast went off but hit nothing; the cooldown is still spent
    NoTarget { skill: String },
    Healed { skill: String, amount: i32, health: i32 },
    Buffed { skill: String, until: Millis },
    Summoned { skill: String, strength: f64 },
    /// The named target no longer exists; nothing happened and no cooldown was spent
    Dropped { skill: String },
}

impl CastOutcome {
    pub fn events(&self, caster: EntityId, health: i32) -> Vec<GameEvent> {
        match self {
            Self::Struck { skill, hits } => {
                let mut events = vec![GameEvent::SkillCast { skill: skill.clone(), targets: hits.len() }];
                for hit in hits {
                    events.extend(hit.events(caster));
                }
                events
            }
            Self::NoTarget { skill } => vec![GameEvent::SkillNoTarget { skill: skill.clone() }],
            Self::Healed { skill, amount, .. } => vec![
                GameEvent::SkillCast { skill: skill.clone(), targets: 1 },
                GameEvent::Healed { amount: *amount, health },
            ],
            Self::Buffed { skill, until } => vec![
                GameEvent::SkillCast { skill: skill.clone(), targets: 1 },
                GameEvent::BuffApplied { skill: skill.clone(), until: *until },
            ],
            Self::Summoned { skill, strength } => vec![
                GameEvent::SkillCast { skill: skill.clone(), targets: 0 },
                GameEvent::Summoned { skill: skill.clone(), strength: *strength },
            ],
            Self::Dropped { .. } => Vec::new(),
        }
    }
}

fn scaling_stat(caster: &Player, damage_type: DamageType) -> i32 {
    match damage_type {
        DamageType::Physical => caster.attack,
        DamageType::Magic => caster.magic,
        DamageType::Mixed => (caster.attack + caster.magic) / 2,
    }
}

/// Closest live monster within `range` of `origin`; lower ids win ties
fn nearest_monster(origin: Vec2, range: f64, monsters: &BTreeMap<EntityId, Monster>) -> Option<EntityId> {
    monsters
        .values()
        .filter(|m| !m.is_dead())
        .map(|m| (m.id, origin.distance_to(m.center())))
        .filter(|&(_, distance)| distance <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Cast a skill by name.
///
/// Checks run in order: learned, level, cooldown, then range for a targeted
/// damage skill. A targeted cast whose target has vanished is dropped
/// without spending the cooldown.
pub fn cast_skill<R: Rng + ?Sized>(
    caster: &mut Player,
    skill_name: &str,
    target: Option<EntityId>,
    monsters: &mut BTreeMap<EntityId, Monster>,
    now: Millis,
    rng: &mut R,
) -> Result<CastOutcome, CastError> {
    let not_learned = || CastError::NotLearned(skill_name.to_string());

    if !caster.learned_skills.contains(skill_name) {
        return Err(not_learned());
    }
    let skill = caster.skill(skill_name).cloned().ok_or_else(not_learned)?;
    if skill.level == 0 {
        return Err(not_learned());
    }

    let remaining = caster.cooldown_remaining(skill_name, now);
    if remaining > 0 {
        trace!("{} on cooldown for {} ms", skill_name, remaining);
        return Err(CastError::OnCooldown(remaining));
    }

    let name = skill.def.name.clone();
    let level = skill.level;

    let outcome = match &skill.def.effect {
        SkillEffect::Damage { .. } => {
            let (damage_type, area, rank) = skill.def.damage_rank(level).ok_or_else(not_learned)?;
            let raw = (scaling_stat(caster, damage_type) as f64 * rank.multiplier).floor() as i32;
            let origin = caster.center();

            match target {
                Some(id) => {
                    let Some(monster) = monsters.get_mut(&id).filter(|m| !m.is_dead()) else {
                        debug!("{} target #{} is gone, dropping cast", name, id);
                        return Ok(CastOutcome::Dropped { skill: name });
                    };
                    let distance = origin.distance_to(monster.center());
                    if distance > rank.range {
                        return Err(CastError::OutOfRange(distance));
                    }
                    let hit = strike(caster, monster, raw, now, rng);
                    CastOutcome::Struck { skill: name, hits: vec![hit] }
                }
                None if area => {
                    let in_range: Vec<EntityId> = monsters
                        .values()
                        .filter(|m| !m.is_dead() && origin.distance_to(m.center()) <= rank.range)
                        .map(|m| m.id)
                        .collect();
                    let mut hits = Vec::with_capacity(in_range.len());
                    for id in in_range {
                        if let Some(monster) = monsters.get_mut(&id) {
                            hits.push(strike(caster, monster, raw, now, rng));
                        }
                    }
                    if hits.is_empty() {
                        CastOutcome::NoTarget { skill: name }
                    } else {
                        CastOutcome::Struck { skill: name, hits }
                    }
                }
                None => CastOutcome::NoTarget { skill: name },
            }
        }
        SkillEffect::Heal { .. } => {
            let rank = skill.def.heal_rank(level).ok_or_else(not_learned)?;
            let amount = rank.heal + (caster.magic as f64 * 0.5).floor() as i32;
            let healed = caster.heal(amount);
            CastOutcome::Healed { skill: name, amount: healed, health: caster.health }
        }
        SkillEffect::Shield { .. } => {
            let rank = skill.def.buff_rank(level).ok_or_else(not_learned)?;
            let until = now + rank.duration_ms;
            caster.apply_buff(&name, BuffKind::Shield { factor: rank.factor }, until);
            CastOutcome::Buffed { skill: name, until }
        }
        SkillEffect::Stealth { .. } => {
            let rank = skill.def.buff_rank(level).ok_or_else(not_learned)?;
            let until = now + rank.duration_ms;
            caster.apply_buff(&name, BuffKind::Stealth, until);
            CastOutcome::Buffed { skill: name, until }
        }
        SkillEffect::Summon { .. } => {
            let rank = skill.def.summon_rank(level).ok_or_else(not_learned)?;
            CastOutcome::Summoned { skill: name, strength: rank.strength }
        }
    };

    caster.skill_cooldowns.insert(skill.def.name.clone(), now);
    debug!("{} cast {} (level {})", caster.name, skill.def.name, level);
    Ok(outcome)
}

/// Cast whatever is bound to a hotkey. Single-target damage skills pick the
/// nearest live monster in range; area skills go off around the caster.
pub fn cast_hotkey<R: Rng + ?Sized>(
    caster: &mut Player,
    hotkey: u8,
    monsters: &mut BTreeMap<EntityId, Monster>,
    now: Millis,
    rng: &mut R,
) -> Result<CastOutcome, CastError> {
    let skill = caster.skill_for_hotkey(hotkey).ok_or(CastError::UnboundHotkey(hotkey))?;
    let name = skill.def.name.clone();

    let target = match skill.def.damage_rank(skill.level) {
        Some((_, false, rank)) => nearest_monster(caster.center(), rank.range, monsters),
        _ => None,
    };

    cast_skill(caster, &name, target, monsters, now, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentCatalog;
    use mir_shared::Profession;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Arena {
        catalog: ContentCatalog,
        rng: ChaCha8Rng,
        monsters: BTreeMap<EntityId, Monster>,
    }

    impl Arena {
        fn new() -> Self {
            Self {
                catalog: ContentCatalog::builtin(),
                rng: ChaCha8Rng::seed_from_u64(11),
                monsters: BTreeMap::new(),
            }
        }

        fn player(&self, profession: Profession) -> Player {
            // Center at (112, 118)
            Player::new(1, "Caster", profession, Vec2::new(100.0, 100.0), &self.catalog)
        }

        /// Spawn a monster whose center sits at `center`
        fn spawn(&mut self, id: EntityId, name: &str, center: Vec2) {
            let template = self.catalog.monster(name).unwrap().clone();
            let half = template.size.body_size() / 2.0;
            let position = center - Vec2::new(half, half);
            let monster = Monster::new(id, template, position, None, &mut self.rng);
            self.monsters.insert(id, monster);
        }
    }

    #[test]
    fn test_cooldown_gating() {
        let mut arena = Arena::new();
        let mut mage = arena.player(Profession::Mage);
        assert_eq!(mage.skill("Fireball").unwrap().def.cooldown_ms(1), 600);

        let cast = |mage: &mut Player, arena: &mut Arena, now| {
            cast_skill(mage, "Fireball", None, &mut arena.monsters, now, &mut arena.rng)
        };

        assert_eq!(cast(&mut mage, &mut arena, 0), Ok(CastOutcome::NoTarget { skill: "Fireball".into() }));
        assert_eq!(cast(&mut mage, &mut arena, 300), Err(CastError::OnCooldown(300)));
        assert!(cast(&mut mage, &mut arena, 601).is_ok());
    }

    #[test]
    fn test_unlearned_skills_are_rejected() {
        let mut arena = Arena::new();
        let mut mage = arena.player(Profession::Mage);

        for name in ["Lightning", "Slaying", "No Such Skill"] {
            assert_eq!(
                cast_skill(&mut mage, name, None, &mut arena.monsters, 0, &mut arena.rng),
                Err(CastError::NotLearned(name.into()))
            );
        }
    }

    #[test]
    fn test_out_of_range_and_vanished_targets_keep_cooldown() {
        let mut arena = Arena::new();
        let mut mage = arena.player(Profession::Mage);
        arena.spawn(10_000, "Deer", Vec2::new(412.0, 118.0));

        let far = cast_skill(&mut mage, "Fireball", Some(10_000), &mut arena.monsters, 0, &mut arena.rng);
        assert_eq!(far, Err(CastError::OutOfRange(300.0)));

        let gone = cast_skill(&mut mage, "Fireball", Some(424_242), &mut arena.monsters, 0, &mut arena.rng);
        assert_eq!(gone, Ok(CastOutcome::Dropped { skill: "Fireball".into() }));

        assert_eq!(mage.cooldown_remaining("Fireball", 0), 0);
        assert!(mage.skill_cooldowns.is_empty());
    }

    #[test]
    fn test_targeted_damage_scales_with_stat() {
        let mut arena = Arena::new();
        let mut mage = arena.player(Profession::Mage);
        arena.spawn(10_000, "Zombie", Vec2::new(212.0, 118.0));

        let outcome = cast_skill(&mut mage, "Fireball", Some(10_000), &mut arena.monsters, 0, &mut arena.rng).unwrap();
        let CastOutcome::Struck { hits, .. } = outcome else {
            panic!("expected a hit");
        };
        // floor(30 * 2.2) = 66, minus zombie defense 8
        assert_eq!(hits[0].damage, 58);
        assert_eq!(arena.monsters[&10_000].health, 22);
        assert_eq!(arena.monsters[&10_000].aggro.threat_of(1), Some(132.0));
    }

    #[test]
    fn test_area_skill_hits_everything_in_range() {
        let mut arena = Arena::new();
        let mut warrior = arena.player(Profession::Warrior);
        while warrior.level < 15 {
            warrior.level_up();
        }
        assert!(warrior.learned_skills.contains("Half-Moon Blade"));

        arena.spawn(10_000, "Scarecrow", Vec2::new(144.0, 118.0));
        arena.spawn(10_001, "Scarecrow", Vec2::new(112.0, 154.0));
        arena.spawn(10_002, "Scarecrow", Vec2::new(900.0, 900.0));

        let outcome =
            cast_skill(&mut warrior, "Half-Moon Blade", None, &mut arena.monsters, 0, &mut arena.rng).unwrap();
        let CastOutcome::Struck { hits, .. } = outcome else {
            panic!("expected hits");
        };
        assert_eq!(hits.iter().map(|h| h.target).collect::<Vec<_>>(), vec![10_000, 10_001]);
        assert!(hits.iter().all(|h| h.kill.is_some()));
        assert_eq!(arena.monsters[&10_002].health, 30);
        assert_eq!(warrior.gold, 10);
    }

    #[test]
    fn test_area_skill_with_nothing_around_still_cools_down() {
        let mut arena = Arena::new();
        let mut taoist = arena.player(Profession::Taoist);
        taoist.level = 10;
        taoist.learn_skill("Poison Cloud").unwrap();

        let outcome = cast_skill(&mut taoist, "Poison Cloud", None, &mut arena.monsters, 0, &mut arena.rng);
        assert_eq!(outcome, Ok(CastOutcome::NoTarget { skill: "Poison Cloud".into() }));
        assert_eq!(taoist.cooldown_remaining("Poison Cloud", 0), 1200);
    }

    #[test]
    fn test_heal_adds_half_magic() {
        let mut arena = Arena::new();
        let mut taoist = arena.player(Profession::Taoist);
        taoist.health = 50;

        let outcome = cast_skill(&mut taoist, "Healing", None, &mut arena.monsters, 0, &mut arena.rng);
        assert_eq!(
            outcome,
            Ok(CastOutcome::Healed { skill: "Healing".into(), amount: 40, health: 90 })
        );
    }

    #[test]
    fn test_magic_shield_and_stealth_apply_buffs() {
        let mut arena = Arena::new();
        let mut mage = arena.player(Profession::Mage);
        mage.level = 25;
        mage.learn_skill("Magic Shield").unwrap();

        let outcome = cast_skill(&mut mage, "Magic Shield", None, &mut arena.monsters, 100, &mut arena.rng);
        assert_eq!(outcome, Ok(CastOutcome::Buffed { skill: "Magic Shield".into(), until: 10_100 }));
        assert_eq!(mage.defense, 20);

        let mut taoist = arena.player(Profession::Taoist);
        taoist.level = 20;
        taoist.learn_skill("Stealth").unwrap();
        cast_skill(&mut taoist, "Stealth", None, &mut arena.monsters, 0, &mut arena.rng).unwrap();
        assert!(taoist.is_stealthed());
    }

    #[test]
    fn test_summon_only_spends_cooldown() {
        let mut arena = Arena::new();
        let mut taoist = arena.player(Profession::Taoist);
        taoist.level = 15;
        taoist.learn_skill("Summon Skeleton").unwrap();

        let outcome = cast_skill(&mut taoist, "Summon Skeleton", None, &mut arena.monsters, 0, &mut arena.rng);
        assert_eq!(outcome, Ok(CastOutcome::Summoned { skill: "Summon Skeleton".into(), strength: 1.2 }));
        assert_eq!(taoist.cooldown_remaining("Summon Skeleton", 500), 2000);
    }

    #[test]
    fn test_hotkey_targets_nearest_monster() {
        let mut arena = Arena::new();
        let mut mage = arena.player(Profession::Mage);
        arena.spawn(10_000, "Chicken", Vec2::new(212.0, 118.0));
        arena.spawn(10_001, "Chicken", Vec2::new(162.0, 118.0));

        let outcome = cast_hotkey(&mut mage, 1, &mut arena.monsters, 0, &mut arena.rng).unwrap();
        let CastOutcome::Struck { hits, .. } = outcome else {
            panic!("expected a hit");
        };
        assert_eq!(hits[0].target, 10_001);

        assert_eq!(
            cast_hotkey(&mut mage, 5, &mut arena.monsters, 1000, &mut arena.rng),
            Err(CastError::UnboundHotkey(5))
        );
    }
}
