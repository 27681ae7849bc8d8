//! Kill rewards: experience, gold and drop table rolls.

use log::debug;
use rand::Rng;

use mir_shared::{GameEvent, LootEntry};

use super::Lootable;

/// A level reached while absorbing experience
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    /// Skills auto-learned at this level
    pub learned: Vec<String>,
}

/// Receives rewards; the player is the only implementor in practice
pub trait RewardSink {
    /// Add experience, returning every level reached along the way
    fn grant_experience(&mut self, exp: u32) -> Vec<LevelUp>;
    fn grant_gold(&mut self, gold: u32);
    fn grant_item(&mut self, item: &str, quantity: u32);
}

/// What one kill paid out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rewards {
    pub exp: u32,
    pub gold: u32,
    pub items: Vec<(String, u32)>,
    pub level_ups: Vec<LevelUp>,
}

impl Rewards {
    pub fn events(&self) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::RewardGranted { exp: self.exp, gold: self.gold }];
        for (item, quantity) in &self.items {
            events.push(GameEvent::ItemLooted { item: item.clone(), quantity: *quantity });
        }
        for level_up in &self.level_ups {
            events.push(GameEvent::LevelUp { level: level_up.level });
            for skill in &level_up.learned {
                events.push(GameEvent::SkillLearned { skill: skill.clone() });
            }
        }
        events
    }
}

/// Roll every entry independently: uniform [0, 1) below `chance` drops it
pub fn roll_drops<R: Rng + ?Sized>(table: &[LootEntry], rng: &mut R) -> Vec<(String, u32)> {
    table
        .iter()
        .filter(|entry| rng.gen::<f64>() < entry.chance)
        .map(|entry| (entry.item.clone(), entry.quantity))
        .collect()
}

/// Pay the killer for a victim. Never fails; an empty drop table just drops nothing.
pub fn distribute_rewards<K, V, R>(killer: &mut K, victim: &V, rng: &mut R) -> Rewards
where
    K: RewardSink + ?Sized,
    V: Lootable + ?Sized,
    R: Rng + ?Sized,
{
    let exp = victim.exp_reward();
    let gold = victim.gold_reward();

    let level_ups = killer.grant_experience(exp);
    killer.grant_gold(gold);

    let items = roll_drops(victim.drop_table(), rng);
    for (item, quantity) in &items {
        killer.grant_item(item, *quantity);
    }

    debug!("Rewards: {} exp, {} gold, {} item drops", exp, gold, items.len());

    Rewards { exp, gold, items, level_ups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct Purse {
        exp: u32,
        gold: u32,
        items: Vec<(String, u32)>,
    }

    impl RewardSink for Purse {
        fn grant_experience(&mut self, exp: u32) -> Vec<LevelUp> {
            self.exp += exp;
            Vec::new()
        }

        fn grant_gold(&mut self, gold: u32) {
            self.gold += gold;
        }

        fn grant_item(&mut self, item: &str, quantity: u32) {
            self.items.push((item.to_string(), quantity));
        }
    }

    struct Dummy(Vec<LootEntry>);

    impl Lootable for Dummy {
        fn drop_table(&self) -> &[LootEntry] {
            &self.0
        }
        fn exp_reward(&self) -> u32 {
            10
        }
        fn gold_reward(&self) -> u32 {
            5
        }
    }

    #[test]
    fn test_certain_and_impossible_drops() {
        let victim = Dummy(vec![
            LootEntry::new("Golden Wound Potion", 2, 1.0),
            LootEntry::new("Scarecrow Heart", 1, 0.0),
        ]);

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut purse = Purse::default();
            let rewards = distribute_rewards(&mut purse, &victim, &mut rng);

            assert_eq!(rewards.items, vec![("Golden Wound Potion".to_string(), 2)]);
            assert_eq!(purse.items, rewards.items);
            assert_eq!(purse.exp, 10);
            assert_eq!(purse.gold, 5);
        }
    }

    #[test]
    fn test_empty_table_still_pays_exp_and_gold() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut purse = Purse::default();
        let rewards = distribute_rewards(&mut purse, &Dummy(Vec::new()), &mut rng);

        assert!(rewards.items.is_empty());
        assert_eq!((purse.exp, purse.gold), (10, 5));
        assert_eq!(rewards.events(), vec![GameEvent::RewardGranted { exp: 10, gold: 5 }]);
    }

    #[test]
    fn test_same_seed_same_drops() {
        let table = vec![
            LootEntry::new("Deer Meat", 1, 0.4),
            LootEntry::new("Deer Hide", 1, 0.2),
            LootEntry::new("Deer Antler", 1, 0.1),
        ];
        let a = roll_drops(&table, &mut ChaCha8Rng::seed_from_u64(99));
        let b = roll_drops(&table, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
