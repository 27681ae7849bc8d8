//! Per-monster threat bookkeeping.
//!
//! Proximity adds a trickle of threat every tick, damage adds a lot. Entries
//! fade once nobody has refreshed them for a second, and are dropped when the
//! attacker wanders too far away.

use log::trace;
use mir_shared::{EntityId, Millis};

/// Threat lost per tick once an entry has gone stale
pub const AGGRO_DECAY_RATE: f32 = 0.5;

/// How long an entry must go untouched before it starts decaying
pub const AGGRO_DECAY_DELAY_MS: Millis = 1000;

/// Entries further than `aggro_range * EVICTION_FACTOR` are dropped
pub const EVICTION_FACTOR: f64 = 1.5;

/// Threat gained per tick just by standing inside aggro range
const PROXIMITY_THREAT: f32 = 1.0;

/// One attacker the monster can currently see, with its center distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub id: EntityId,
    pub distance: f64,
    /// False while the attacker is hidden; it keeps existing threat but gains none
    pub detectable: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct AggroEntry {
    attacker: EntityId,
    threat: f32,
    last_aggro: Millis,
}

/// Attacker -> threat map. Insertion order is kept so ties resolve to the
/// attacker that was seen first.
#[derive(Debug, Clone)]
pub struct AggroTable {
    entries: Vec<AggroEntry>,
    aggro_range: f64,
    combat_state: bool,
}

impl AggroTable {
    pub fn new(aggro_range: f64) -> Self {
        Self {
            entries: Vec::new(),
            aggro_range,
            combat_state: false,
        }
    }

    pub fn aggro_range(&self) -> f64 {
        self.aggro_range
    }

    /// True while any attacker holds threat
    pub fn in_combat(&self) -> bool {
        self.combat_state
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn threat_of(&self, attacker: EntityId) -> Option<f32> {
        self.entries.iter().find(|e| e.attacker == attacker).map(|e| e.threat)
    }

    pub fn add_aggro(&mut self, attacker: EntityId, amount: f32, now: Millis) {
        match self.entries.iter_mut().find(|e| e.attacker == attacker) {
            Some(entry) => {
                entry.threat += amount;
                entry.last_aggro = now;
            }
            None => self.entries.push(AggroEntry { attacker, threat: amount, last_aggro: now }),
        }
        self.combat_state = true;
    }

    /// Single-candidate refresh: proximity threat, then decay and eviction.
    /// Entries for attackers other than `candidate` are treated as gone.
    pub fn update_aggro(&mut self, candidate: EntityId, distance: f64, now: Millis) {
        self.refresh(&[Sighting { id: candidate, distance, detectable: true }], now);
    }

    /// Refresh against everything the monster can see this tick.
    ///
    /// Attackers missing from `sightings` (dead, despawned) are evicted along
    /// with those beyond the eviction distance and those decayed to zero.
    pub fn refresh(&mut self, sightings: &[Sighting], now: Millis) {
        for s in sightings {
            if s.detectable && s.distance <= self.aggro_range {
                self.add_aggro(s.id, PROXIMITY_THREAT, now);
            }
        }

        let eviction_distance = self.aggro_range * EVICTION_FACTOR;
        self.entries.retain_mut(|entry| {
            let distance = match sightings.iter().find(|s| s.id == entry.attacker) {
                Some(s) => s.distance,
                None => return false,
            };
            if distance > eviction_distance {
                trace!("Evicting attacker {} at distance {:.1}", entry.attacker, distance);
                return false;
            }
            if now - entry.last_aggro > AGGRO_DECAY_DELAY_MS {
                entry.threat = (entry.threat - AGGRO_DECAY_RATE).max(0.0);
            }
            entry.threat > 0.0
        });

        if self.entries.is_empty() {
            self.combat_state = false;
        }
    }

    /// Forget one attacker (e.g. after it died)
    pub fn forget(&mut self, attacker: EntityId) {
        self.entries.retain(|e| e.attacker != attacker);
        if self.entries.is_empty() {
            self.combat_state = false;
        }
    }

    /// Highest-threat attacker; the earliest inserted wins ties
    pub fn resolve_target(&self) -> Option<EntityId> {
        let mut best: Option<&AggroEntry> = None;
        for entry in &self.entries {
            match best {
                Some(b) if entry.threat <= b.threat => {}
                _ => best = Some(entry),
            }
        }
        best.map(|e| e.attacker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_picks_highest_threat() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(1, 5.0, 0);
        table.add_aggro(2, 10.0, 0);
        table.add_aggro(3, 3.0, 0);

        for _ in 0..10 {
            assert_eq!(table.resolve_target(), Some(2));
        }
    }

    #[test]
    fn test_ties_go_to_first_inserted() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(7, 4.0, 0);
        table.add_aggro(3, 4.0, 0);
        assert_eq!(table.resolve_target(), Some(7));
    }

    #[test]
    fn test_empty_table_has_no_target() {
        let table = AggroTable::new(150.0);
        assert_eq!(table.resolve_target(), None);
        assert!(!table.in_combat());
    }

    #[test]
    fn test_far_attacker_is_evicted_regardless_of_threat() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(1, 1000.0, 0);
        assert!(table.in_combat());

        table.update_aggro(1, 400.0, 16);

        assert!(table.threat_of(1).is_none());
        assert!(!table.in_combat());
    }

    #[test]
    fn test_proximity_adds_threat() {
        let mut table = AggroTable::new(150.0);
        table.update_aggro(1, 100.0, 0);
        table.update_aggro(1, 100.0, 16);
        assert_eq!(table.threat_of(1), Some(2.0));
    }

    #[test]
    fn test_between_range_and_eviction_keeps_entry() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(1, 10.0, 0);
        table.update_aggro(1, 200.0, 500);
        assert_eq!(table.threat_of(1), Some(10.0));
    }

    #[test]
    fn test_stale_entries_decay_then_evict() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(1, 1.0, 0);

        // Fresh: no decay yet
        table.update_aggro(1, 200.0, 1000);
        assert_eq!(table.threat_of(1), Some(1.0));

        table.update_aggro(1, 200.0, 1001);
        assert_eq!(table.threat_of(1), Some(0.5));

        table.update_aggro(1, 200.0, 1017);
        assert!(table.threat_of(1).is_none());
        assert!(!table.in_combat());
    }

    #[test]
    fn test_hidden_attacker_keeps_but_does_not_gain_threat() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(1, 3.0, 0);
        table.refresh(&[Sighting { id: 1, distance: 50.0, detectable: false }], 100);
        assert_eq!(table.threat_of(1), Some(3.0));
    }

    #[test]
    fn test_unseen_attacker_is_dropped() {
        let mut table = AggroTable::new(150.0);
        table.add_aggro(1, 3.0, 0);
        table.add_aggro(2, 3.0, 0);
        table.refresh(&[Sighting { id: 2, distance: 10.0, detectable: true }], 16);
        assert!(table.threat_of(1).is_none());
        assert_eq!(table.threat_of(2), Some(4.0));
    }
}
