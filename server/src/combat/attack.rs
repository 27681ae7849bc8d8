//! Basic attacks.

use log::debug;
use rand::Rng;

use mir_shared::{EntityId, GameEvent, Millis};

use super::{strike, Hit};
use crate::entities::{Monster, Player};

#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Hit(Hit),
    /// Nothing happened; the target was too far away
    OutOfRange {
        target: EntityId,
        distance: f64,
        range: f64,
    },
}

impl AttackOutcome {
    pub fn events(&self, attacker: EntityId) -> Vec<GameEvent> {
        match self {
            Self::Hit(hit) => hit.events(attacker),
            Self::OutOfRange { target, distance, range } => vec![GameEvent::AttackOutOfRange {
                target: *target,
                distance: *distance,
                range: *range,
            }],
        }
    }
}

/// Swing at a monster using the attacker's profession profile
pub fn basic_attack<R: Rng + ?Sized>(
    attacker: &mut Player,
    target: &mut Monster,
    now: Millis,
    rng: &mut R,
) -> AttackOutcome {
    let profile = attacker.attack_profile();
    let distance = attacker.center().distance_to(target.center());

    if distance > profile.range {
        debug!(
            "Basic attack on #{} out of range ({:.1} > {:.1})",
            target.id, distance, profile.range
        );
        return AttackOutcome::OutOfRange {
            target: target.id,
            distance,
            range: profile.range,
        };
    }

    AttackOutcome::Hit(strike(attacker, target, profile.base_damage, now, rng))
}
