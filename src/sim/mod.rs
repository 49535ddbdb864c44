//! Deterministic wave simulation
//!
//! All gameplay logic lives here:
//! - Called once per frame, no background work
//! - Seeded RNG only
//! - Stable iteration order (row-major over the alien grid)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod grid;
pub mod wave;

pub use collision::{Aabb, Collidable, overlaps};
pub use entity::{
    Alien, AlienKind, Animated, Barrier, BarrierDamage, Bolt, Direction, Ship, Sprite,
};
pub use grid::{AlienGrid, Slot};
pub use wave::{Wave, WaveEvent, WaveOutcome, WaveSnapshot};
