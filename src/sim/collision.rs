//! Axis-aligned bounding-box collision
//!
//! Everything in a wave is a rectangle: collisions are a discrete per-frame
//! overlap test with no sweeping. Touching edges count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closed axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box centered on `center` with the given full size
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Same box moved by `offset`
    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Closed-interval intersection on both axes
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }
}

/// Anything with a hit-box
///
/// The hit-box defaults to the drawn bounds; barriers shift theirs.
pub trait Collidable {
    fn hitbox(&self) -> Aabb;
}

/// True iff the hit-boxes of `a` and `b` intersect
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.hitbox().intersects(&b.hitbox())
}
