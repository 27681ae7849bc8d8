//! Display boundary. The simulation pushes entity views and events out;
//! nothing a display does feeds back into the simulation.

use log::{debug, info, trace, warn};

use mir_shared::{EntityId, Facing, GameEvent};

use crate::navigation::{Vec2, WorldBounds};

/// Visible screen size in pixels
pub const SCREEN_WIDTH: f64 = 800.0;
pub const SCREEN_HEIGHT: f64 = 600.0;

/// Snapshot of one entity for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub label: String,
    pub position: Vec2,
    pub facing: Facing,
    pub health: i32,
    pub max_health: i32,
}

pub trait Display {
    fn render(&mut self, entity: &EntityView, camera_offset: Vec2);
    fn report(&mut self, event: &GameEvent);
}

/// Top-left of the screen when following `focus`, kept inside the world
pub fn camera_offset(focus: Vec2, bounds: &WorldBounds) -> Vec2 {
    Vec2::new(
        (focus.x - SCREEN_WIDTH / 2.0).clamp(0.0, (bounds.width - SCREEN_WIDTH).max(0.0)),
        (focus.y - SCREEN_HEIGHT / 2.0).clamp(0.0, (bounds.height - SCREEN_HEIGHT).max(0.0)),
    )
}

/// Headless display that writes everything to the log
#[derive(Debug, Default)]
pub struct LogDisplay;

impl Display for LogDisplay {
    fn render(&mut self, entity: &EntityView, camera_offset: Vec2) {
        let screen = entity.position - camera_offset;
        trace!(
            "{} #{} at ({:.0}, {:.0}) hp {}/{}",
            entity.label,
            entity.id,
            screen.x,
            screen.y,
            entity.health,
            entity.max_health
        );
    }

    fn report(&mut self, event: &GameEvent) {
        match event {
            GameEvent::MonsterKilled { id, monster, .. } => info!("{} #{} was slain", monster, id),
            GameEvent::LevelUp { level } => info!("Level up! Now level {}", level),
            GameEvent::SkillLearned { skill } => info!("Learned {}", skill),
            GameEvent::ItemLooted { item, quantity } => info!("Looted {} x{}", item, quantity),
            GameEvent::PlayerDied { killer } => warn!("You died (killer: {:?})", killer),
            GameEvent::MonsterSpawned { id, monster, is_boss: true, .. } => {
                info!("Boss {} #{} has appeared", monster, id)
            }
            GameEvent::SkillRejected { skill, reason } => debug!("{}: {}", skill, reason),
            GameEvent::ActionRejected { reason } => info!("{}", reason),
            other => debug!("{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follows_and_clamps() {
        let bounds = WorldBounds::default();
        assert_eq!(camera_offset(Vec2::new(1200.0, 900.0), &bounds), Vec2::new(800.0, 600.0));
        assert_eq!(camera_offset(Vec2::new(10.0, 10.0), &bounds), Vec2::new(0.0, 0.0));
        assert_eq!(camera_offset(Vec2::new(2390.0, 1790.0), &bounds), Vec2::new(1600.0, 1200.0));
    }
}
