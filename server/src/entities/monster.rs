//! Monster entity with threat-driven AI.

use log::{debug, trace};
use rand::Rng;

use mir_shared::{EntityId, Facing, LootEntry, Millis, MonsterTemplate};

use crate::combat::{damage_after_defense, AggroTable, Damageable, Lootable, Sighting};
use crate::navigation::{facing_towards, step_towards, Aabb, Vec2, WorldBounds, MONSTER_CLAMP_SIZE};

/// Speed multiplier while walking back into the allowed region
const RETURN_SPEED_FACTOR: f64 = 1.2;

/// Wander speed multiplier near the edge of the allowed region
const EDGE_SLOWDOWN_FACTOR: f64 = 0.7;

/// Pixels from an activity area edge that count as "near the edge"
const AREA_EDGE_MARGIN: f64 = 50.0;

/// Fraction of a roaming radius past which wandering slows down
const RADIUS_EDGE_FRACTION: f64 = 0.8;

/// Ticks between wander direction changes
const WANDER_TICKS_MIN: u32 = 60;
const WANDER_TICKS_MAX: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterState {
    Wandering,
    Chasing,
    Attacking,
    ReturningToSpawn,
}

/// Where a monster is allowed to roam
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityRegion {
    Area(Aabb),
    /// Radius around the spawn point
    Radius(f64),
}

/// Someone the monster might fight this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: EntityId,
    pub center: Vec2,
    /// False while stealthed
    pub detectable: bool,
}

/// An attack a monster decided to make; the world applies it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterAttack {
    pub monster_id: EntityId,
    pub target: EntityId,
    pub damage: i32,
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub id: EntityId,
    pub template: MonsterTemplate,
    /// Top-left corner of the sprite
    pub position: Vec2,
    pub spawn_point: Vec2,
    pub region: ActivityRegion,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: f64,
    pub wander_speed: f64,
    pub facing: Facing,
    wander_timer: u32,
    wander_duration: u32,
    pub aggro: AggroTable,
    pub target: Option<EntityId>,
    pub state: MonsterState,
    pub last_attack_time: Option<Millis>,
    pub attack_cooldown_ms: Millis,
}

fn random_facing<R: Rng + ?Sized>(rng: &mut R) -> Facing {
    Facing::from_u8(rng.gen_range(0..4)).unwrap_or(Facing::Down)
}

impl Monster {
    pub fn new<R: Rng + ?Sized>(
        id: EntityId,
        template: MonsterTemplate,
        position: Vec2,
        activity_area: Option<Aabb>,
        rng: &mut R,
    ) -> Self {
        let region = match activity_area {
            Some(area) => ActivityRegion::Area(area),
            None => ActivityRegion::Radius(template.activity_radius()),
        };

        Self {
            id,
            position,
            spawn_point: position,
            region,
            health: template.max_health,
            max_health: template.max_health,
            attack: template.attack,
            defense: template.defense,
            speed: template.speed,
            wander_speed: template.speed,
            facing: random_facing(rng),
            wander_timer: 0,
            wander_duration: rng.gen_range(WANDER_TICKS_MIN..=WANDER_TICKS_MAX),
            aggro: AggroTable::new(template.aggro_range),
            target: None,
            state: MonsterState::Wandering,
            last_attack_time: None,
            attack_cooldown_ms: template.attack_cooldown_ms,
            template,
        }
    }

    pub fn center(&self) -> Vec2 {
        let half = self.template.size.body_size() / 2.0;
        self.position + Vec2::new(half, half)
    }

    pub fn is_boss(&self) -> bool {
        self.template.is_boss
    }

    /// Where to head when outside the region, or None if inside. Also picks
    /// the wander speed for this tick.
    fn check_region(&mut self) -> Option<Vec2> {
        match self.region {
            ActivityRegion::Area(area) => {
                if !area.contains(self.position) {
                    return Some(area.center());
                }
                self.wander_speed = if area.edge_distance(self.position) < AREA_EDGE_MARGIN {
                    self.speed * EDGE_SLOWDOWN_FACTOR
                } else {
                    self.speed
                };
            }
            ActivityRegion::Radius(radius) => {
                let distance = self.position.distance_to(self.spawn_point);
                if distance > radius {
                    return Some(self.spawn_point);
                }
                self.wander_speed = if distance > radius * RADIUS_EDGE_FRACTION {
                    self.speed * EDGE_SLOWDOWN_FACTOR
                } else {
                    self.speed
                };
            }
        }
        None
    }

    /// Run one AI tick. Returns Some(attack) if the monster attacks this frame.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: Millis,
        candidates: &[Candidate],
        bounds: &WorldBounds,
        rng: &mut R,
    ) -> Option<MonsterAttack> {
        if self.is_dead() {
            return None;
        }

        let attack = self.think(now, candidates, rng);
        self.position = bounds.clamp(self.position, MONSTER_CLAMP_SIZE, MONSTER_CLAMP_SIZE);
        attack
    }

    fn think<R: Rng + ?Sized>(&mut self, now: Millis, candidates: &[Candidate], rng: &mut R) -> Option<MonsterAttack> {
        if let Some(home) = self.check_region() {
            if self.state != MonsterState::ReturningToSpawn {
                trace!("Monster {} left its region, returning", self.id);
            }
            self.state = MonsterState::ReturningToSpawn;
            self.target = None;
            let next = step_towards(self.position, home, self.speed * RETURN_SPEED_FACTOR);
            self.facing = facing_towards(next - self.position);
            self.position = next;
            return None;
        }

        let center = self.center();
        let sightings: Vec<Sighting> = candidates
            .iter()
            .map(|c| Sighting {
                id: c.id,
                distance: center.distance_to(c.center),
                detectable: c.detectable,
            })
            .collect();
        self.aggro.refresh(&sightings, now);

        self.target = self.aggro.resolve_target();
        let target = self
            .target
            .and_then(|id| candidates.iter().find(|c| c.id == id).copied());

        let Some(target) = target else {
            self.wander(rng);
            return None;
        };

        let distance = center.distance_to(target.center);
        if distance <= self.template.attack_range {
            self.state = MonsterState::Attacking;
            let ready = self
                .last_attack_time
                .map_or(true, |last| now - last >= self.attack_cooldown_ms);
            if ready {
                self.last_attack_time = Some(now);
                return Some(MonsterAttack {
                    monster_id: self.id,
                    target: target.id,
                    damage: self.attack,
                });
            }
        } else {
            self.state = MonsterState::Chasing;
            let direction = (target.center - center).normalized();
            self.position = self.position + direction * self.speed;
            self.facing = facing_towards(direction);
        }
        None
    }

    fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state = MonsterState::Wandering;
        self.wander_timer += 1;
        if self.wander_timer >= self.wander_duration {
            self.facing = random_facing(rng);
            self.wander_duration = rng.gen_range(WANDER_TICKS_MIN..=WANDER_TICKS_MAX);
            self.wander_timer = 0;
        }
        self.position = self.position + Vec2::from(self.facing) * self.wander_speed;
    }
}

impl Damageable for Monster {
    fn health(&self) -> i32 {
        self.health
    }

    fn defense(&self) -> i32 {
        self.defense
    }

    /// Raw damage (before defense) feeds the aggro table twice over
    fn take_damage(&mut self, raw: i32, attacker: EntityId, now: Millis) -> i32 {
        let damage = damage_after_defense(raw, self.defense);
        self.health -= damage;
        self.aggro.add_aggro(attacker, raw.max(0) as f32 * 2.0, now);
        debug!("{} #{} took {} damage ({} left)", self.template.name, self.id, damage, self.health);
        damage
    }
}

impl Lootable for Monster {
    fn drop_table(&self) -> &[LootEntry] {
        &self.template.drop_table
    }

    fn exp_reward(&self) -> u32 {
        self.template.exp_reward
    }

    fn gold_reward(&self) -> u32 {
        self.template.gold_reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mir_shared::{get_monster_template, PLAYER_ID};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scarecrow(position: Vec2, area: Option<Aabb>) -> Monster {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        Monster::new(10_000, get_monster_template("Scarecrow").unwrap(), position, area, &mut rng)
    }

    fn player_at(center: Vec2) -> Candidate {
        Candidate { id: PLAYER_ID, center, detectable: true }
    }

    #[test]
    fn test_outside_area_moves_closer_to_center() {
        let area = Aabb::from_corners(100.0, 500.0, 300.0, 700.0);
        let mut m = scarecrow(Vec2::new(200.0, 600.0), Some(area));
        m.position = Vec2::new(600.0, 900.0);
        let before = m.position.distance_to(area.center());

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let attack = m.update(0, &[player_at(m.center())], &WorldBounds::default(), &mut rng);

        assert!(attack.is_none());
        assert_eq!(m.state, MonsterState::ReturningToSpawn);
        assert!(m.position.distance_to(area.center()) < before);
        // Aggro is skipped while returning
        assert!(m.aggro.is_empty());
    }

    #[test]
    fn test_outside_radius_heads_for_spawn() {
        let mut m = scarecrow(Vec2::new(1000.0, 1000.0), None);
        m.position = Vec2::new(1300.0, 1000.0);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        m.update(0, &[], &WorldBounds::default(), &mut rng);

        assert_eq!(m.state, MonsterState::ReturningToSpawn);
        assert!((m.position.x - (1300.0 - 1.5 * 1.2)).abs() < 1e-9);
        assert_eq!(m.facing, Facing::Left);
    }

    #[test]
    fn test_edge_of_area_slows_wandering() {
        let area = Aabb::from_corners(100.0, 500.0, 300.0, 700.0);
        let mut m = scarecrow(Vec2::new(110.0, 600.0), Some(area));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        m.update(0, &[], &WorldBounds::default(), &mut rng);

        assert_eq!(m.state, MonsterState::Wandering);
        assert!((m.wander_speed - 1.5 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_attacks_in_range_respecting_cooldown() {
        let mut m = scarecrow(Vec2::new(1000.0, 1000.0), None);
        let target = player_at(m.center() + Vec2::new(20.0, 0.0));
        let bounds = WorldBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let first = m.update(0, &[target], &bounds, &mut rng);
        assert_eq!(first, Some(MonsterAttack { monster_id: 10_000, target: PLAYER_ID, damage: 5 }));
        assert_eq!(m.state, MonsterState::Attacking);

        assert!(m.update(500, &[target], &bounds, &mut rng).is_none());
        assert!(m.update(960, &[target], &bounds, &mut rng).is_some());
    }

    #[test]
    fn test_chases_target_out_of_attack_range() {
        let mut m = scarecrow(Vec2::new(1000.0, 1000.0), None);
        let target = player_at(m.center() + Vec2::new(0.0, 100.0));
        let before = m.center().distance_to(target.center);

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        m.update(0, &[target], &WorldBounds::default(), &mut rng);

        assert_eq!(m.state, MonsterState::Chasing);
        assert_eq!(m.target, Some(PLAYER_ID));
        assert_eq!(m.facing, Facing::Down);
        assert!((before - m.center().distance_to(target.center) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_stealthed_player_is_ignored() {
        let mut m = scarecrow(Vec2::new(1000.0, 1000.0), None);
        let hidden = Candidate { id: PLAYER_ID, center: m.center(), detectable: false };

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(m.update(0, &[hidden], &WorldBounds::default(), &mut rng).is_none());
        assert_eq!(m.state, MonsterState::Wandering);
        assert_eq!(m.target, None);
    }

    #[test]
    fn test_damage_feeds_aggro() {
        let mut m = scarecrow(Vec2::new(1000.0, 1000.0), None);
        assert_eq!(m.take_damage(25, PLAYER_ID, 0), 23);
        assert_eq!(m.health, 7);
        assert_eq!(m.aggro.threat_of(PLAYER_ID), Some(50.0));
        assert!(m.aggro.in_combat());
    }

    #[test]
    fn test_position_clamped_to_world() {
        let mut m = scarecrow(Vec2::new(0.0, 0.0), None);
        m.facing = Facing::Up;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        m.update(0, &[], &WorldBounds::default(), &mut rng);
        assert!(m.position.x >= 0.0 && m.position.y >= 0.0);
    }
}
