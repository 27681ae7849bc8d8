//! 2D geometry for the pixel-position world.
//!
//! This module provides:
//! - `Vec2` positions and directions (y grows downward, screen style)
//! - `Aabb` activity areas
//! - World bounds clamping
//! - Facing helpers shared by the player and monster movement

use mir_shared::{Facing, WORLD_HEIGHT, WORLD_WIDTH};
use serde::{Deserialize, Serialize};

/// Sprite edge used when clamping monsters to the world
pub const MONSTER_CLAMP_SIZE: f64 = 32.0;

/// Player sprite size in pixels
pub const PLAYER_WIDTH: f64 = 24.0;
pub const PLAYER_HEIGHT: f64 = 36.0;

/// A 2D position or direction in world pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_tuple(pos: (f64, f64)) -> Self {
        Self { x: pos.0, y: pos.1 }
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self { x: 0.0, y: 0.0 }
        }
    }

    pub fn distance_to(&self, other: Vec2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

impl From<Facing> for Vec2 {
    fn from(facing: Facing) -> Self {
        let (x, y) = facing.offset();
        Vec2 { x, y }
    }
}

/// Axis-aligned rectangle (activity areas)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (smallest x, y)
    pub min: Vec2,
    /// Maximum corner (largest x, y)
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from min/max corners
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min: Vec2::new(x1.min(x2), y1.min(y2)),
            max: Vec2::new(x1.max(x2), y1.max(y2)),
        }
    }

    /// Create a box from center position and half-extents
    pub fn from_center(center: Vec2, half_width: f64, half_height: f64) -> Self {
        Self {
            min: Vec2::new(center.x - half_width, center.y - half_height),
            max: Vec2::new(center.x + half_width, center.y + half_height),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Distance from an inside point to the nearest edge
    pub fn edge_distance(&self, p: Vec2) -> f64 {
        (p.x - self.min.x)
            .min(self.max.x - p.x)
            .min(p.y - self.min.y)
            .min(self.max.y - p.y)
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x && self.min.y < other.max.y && other.min.y < self.max.y
    }

    /// Offset that moves `other` out of this box along the axis its center is
    /// furthest off on. `None` when the boxes don't overlap.
    pub fn push_out(&self, other: &Aabb) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }
        let delta = other.center() - self.center();
        let reach = self.half_extents() + other.half_extents();
        let offset = if delta.x.abs() > delta.y.abs() {
            let depth = reach.x - delta.x.abs();
            Vec2::new(if delta.x > 0.0 { depth } else { -depth }, 0.0)
        } else {
            let depth = reach.y - delta.y.abs();
            Vec2::new(0.0, if delta.y < 0.0 { -depth } else { depth })
        };
        Some(offset)
    }
}

/// Playable world rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self { width: WORLD_WIDTH, height: WORLD_HEIGHT }
    }
}

impl WorldBounds {
    /// Keep a sprite of the given size fully inside the world
    pub fn clamp(&self, pos: Vec2, width: f64, height: f64) -> Vec2 {
        Vec2::new(
            pos.x.clamp(0.0, (self.width - width).max(0.0)),
            pos.y.clamp(0.0, (self.height - height).max(0.0)),
        )
    }
}

/// Four-way facing that best matches a movement direction
pub fn facing_towards(delta: Vec2) -> Facing {
    if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 { Facing::Right } else { Facing::Left }
    } else if delta.y > 0.0 {
        Facing::Down
    } else {
        Facing::Up
    }
}

/// Move `from` toward `to` by at most `speed` pixels
pub fn step_towards(from: Vec2, to: Vec2, speed: f64) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= 0.0001 {
        return from;
    }
    from + delta.normalized() * speed.min(dist)
}
