//! Axis-aligned rectangle geometry for entity bounds
//!
//! World space has y growing upward, so `bottom` is the smaller y edge.
//! A rectangle is stored as center + half extents; the center is the
//! authoritative transform for every entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Center point
    pub center: Vec2,
    /// Half width / half height
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Build from the bottom-left corner, the way level layouts describe entities
    pub fn from_bottom_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        let size = Vec2::new(width, height);
        Self::new(Vec2::new(x, y) + size * 0.5, size)
    }

    /// Square bounds around a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            half: Vec2::splat(radius),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Move so the bottom edge sits at `y`
    pub fn set_bottom(&mut self, y: f32) {
        self.center.y = y + self.half.y;
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Strict interior overlap; rectangles sharing only an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// Thin band of the given depth hanging below the bottom edge
    ///
    /// An entity resting exactly on another (bottom == other.top) overlaps
    /// the other through this band.
    pub fn probe_below(&self, depth: f32) -> Rect {
        Rect {
            center: Vec2::new(self.center.x, self.bottom() - depth * 0.5),
            half: Vec2::new(self.half.x, depth * 0.5),
        }
    }
}
