//! Wave entities: ship, aliens, bolts and barriers
//!
//! Plain data with geometric accessors. The wave decides when anything
//! moves, dies or disappears.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collidable};
use crate::consts::*;

/// A rectangular sprite positioned by its center
pub trait Sprite {
    fn pos(&self) -> Vec2;
    fn size(&self) -> Vec2;

    /// Drawn bounds
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos(), self.size())
    }
}

/// A sprite with a sprite-sheet frame
pub trait Animated {
    fn frame(&self) -> u32;
}

/// Horizontal direction for ship moves and the alien march
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// False while the break-up animation plays
    pub alive: bool,
    pub frame: u32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            alive: true,
            frame: 0,
        }
    }

    /// Start the break-up animation
    pub fn kill(&mut self) {
        self.alive = false;
        self.frame = SHIP_BREAK_FRAME;
    }

    /// Back in one piece after a lost life
    pub fn restore(&mut self) {
        self.alive = true;
        self.frame = 0;
    }

    /// Where a fired bolt appears: centered on the ship's top edge
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + SHIP_HEIGHT / 2.0)
    }
}

impl Sprite for Ship {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        Vec2::new(SHIP_WIDTH, SHIP_HEIGHT)
    }
}

impl Animated for Ship {
    fn frame(&self) -> u32 {
        self.frame
    }
}

impl Collidable for Ship {
    fn hitbox(&self) -> Aabb {
        self.bounds()
    }
}

/// Alien kinds, bottom rows to top rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlienKind {
    #[default]
    Crab,
    Octopus,
    Squid,
}

impl AlienKind {
    /// Map a row kind index (0, 1, 2) to a kind; larger indices saturate
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => AlienKind::Crab,
            1 => AlienKind::Octopus,
            _ => AlienKind::Squid,
        }
    }

    /// Index into `ALIEN_SCORE` and the sprite strips
    pub fn index(self) -> usize {
        match self {
            AlienKind::Crab => 0,
            AlienKind::Octopus => 1,
            AlienKind::Squid => 2,
        }
    }

    pub fn score(self) -> u64 {
        ALIEN_SCORE[self.index()]
    }
}

/// A single alien in the formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alien {
    pub pos: Vec2,
    pub kind: AlienKind,
    pub alive: bool,
    pub frame: u32,
}

impl Alien {
    pub fn new(pos: Vec2, kind: AlienKind) -> Self {
        Self {
            pos,
            kind,
            alive: true,
            frame: 0,
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
        self.frame = ALIEN_BREAK_FRAME;
    }

    /// Swap between the two marching frames
    pub fn toggle_walk_frame(&mut self) {
        if self.alive {
            self.frame = (self.frame + 1) % 2;
        }
    }

    /// Where an alien bolt appears: centered on the alien's bottom edge
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - ALIEN_HEIGHT / 2.0)
    }
}

impl Sprite for Alien {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        Vec2::new(ALIEN_WIDTH, ALIEN_HEIGHT)
    }
}

impl Animated for Alien {
    fn frame(&self) -> u32 {
        self.frame
    }
}

impl Collidable for Alien {
    fn hitbox(&self) -> Aabb {
        self.bounds()
    }
}

/// A laser bolt
///
/// Positive velocity travels up (fired by the ship), negative travels down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt {
    pub pos: Vec2,
    /// Pixels per frame along y
    pub velocity: f32,
}

impl Bolt {
    pub fn player(pos: Vec2) -> Self {
        Self {
            pos,
            velocity: BOLT_SPEED,
        }
    }

    pub fn alien(pos: Vec2) -> Self {
        Self {
            pos,
            velocity: -BOLT_SPEED,
        }
    }

    #[inline]
    pub fn is_player_bolt(&self) -> bool {
        self.velocity > 0.0
    }

    pub fn advance(&mut self) {
        self.pos.y += self.velocity;
    }

    /// Left the play area in its direction of travel
    pub fn is_offscreen(&self) -> bool {
        let bounds = self.bounds();
        if self.is_player_bolt() {
            bounds.bottom() > GAME_HEIGHT
        } else {
            bounds.top() <= 0.0
        }
    }
}

impl Sprite for Bolt {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        Vec2::new(BOLT_WIDTH, BOLT_HEIGHT)
    }
}

impl Collidable for Bolt {
    fn hitbox(&self) -> Aabb {
        self.bounds()
    }
}

/// Outcome of damaging a barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierDamage {
    Weakened,
    Destroyed,
}

/// A destructible defense barrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub pos: Vec2,
    /// Damage frame, 0 (intact) up to `DEFENSE_BARRIERS_FRAMES`
    pub frame: u32,
}

impl Barrier {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, frame: 0 }
    }

    /// One hit. A hit taken at the last damage frame destroys the barrier.
    pub fn damage(&mut self) -> BarrierDamage {
        if self.frame < DEFENSE_BARRIERS_FRAMES {
            self.frame += 1;
            BarrierDamage::Weakened
        } else {
            BarrierDamage::Destroyed
        }
    }
}

impl Sprite for Barrier {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        Vec2::new(DEFENSE_BARRIERS_WIDTH, DEFENSE_BARRIERS_HEIGHT)
    }
}

impl Animated for Barrier {
    fn frame(&self) -> u32 {
        self.frame
    }
}

impl Collidable for Barrier {
    /// The solid part of the barrier art sits lower than the sprite box
    fn hitbox(&self) -> Aabb {
        self.bounds()
            .translated(Vec2::new(0.0, -DEFENSE_BARRIERS_COLLIDES_GAP))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::overlaps;

    #[test]
    fn test_bolt_direction_and_offscreen() {
        let mut up = Bolt::player(Vec2::new(100.0, GAME_HEIGHT + BOLT_HEIGHT / 2.0 - 5.0));
        assert!(up.is_player_bolt());
        assert!(!up.is_offscreen());
        up.advance();
        assert!(up.is_offscreen());

        let mut down = Bolt::alien(Vec2::new(100.0, 1.0));
        assert!(!down.is_player_bolt());
        assert!(!down.is_offscreen());
        down.advance();
        assert!(down.is_offscreen());
    }

    #[test]
    fn test_alien_kind_scores() {
        assert_eq!(AlienKind::from_index(0).score(), 10);
        assert_eq!(AlienKind::from_index(1).score(), 20);
        assert_eq!(AlienKind::from_index(2).score(), 40);
    }

    #[test]
    fn test_walk_frame_toggles_only_while_alive() {
        let mut alien = Alien::new(Vec2::ZERO, AlienKind::Crab);
        alien.toggle_walk_frame();
        assert_eq!(alien.frame, 1);
        alien.toggle_walk_frame();
        assert_eq!(alien.frame, 0);
        alien.kill();
        alien.toggle_walk_frame();
        assert_eq!(alien.frame, ALIEN_BREAK_FRAME);
    }

    #[test]
    fn test_barrier_hitbox_is_offset_down() {
        let barrier = Barrier::new(Vec2::new(200.0, 300.0));
        let drawn = barrier.bounds();
        let hit = barrier.hitbox();
        assert_eq!(hit.top(), drawn.top() - DEFENSE_BARRIERS_COLLIDES_GAP);

        // A bolt just above the hit-box but inside the drawn sprite misses
        let bolt = Bolt::alien(Vec2::new(200.0, hit.top() + BOLT_HEIGHT / 2.0 + 1.0));
        assert!(bolt.bounds().intersects(&drawn));
        assert!(!overlaps(&barrier, &bolt));
    }

    #[test]
    fn test_barrier_destroyed_after_last_frame() {
        let mut barrier = Barrier::new(Vec2::ZERO);
        for _ in 0..DEFENSE_BARRIERS_FRAMES {
            assert_eq!(barrier.damage(), BarrierDamage::Weakened);
        }
        assert_eq!(barrier.frame, DEFENSE_BARRIERS_FRAMES);
        assert_eq!(barrier.damage(), BarrierDamage::Destroyed);
    }

    #[test]
    fn test_ship_kill_and_restore() {
        let mut ship = Ship::new(Vec2::new(400.0, 54.0));
        ship.kill();
        assert!(!ship.alive);
        assert_eq!(ship.frame, SHIP_BREAK_FRAME);
        ship.restore();
        assert!(ship.alive);
        assert_eq!(ship.frame, 0);
        assert_eq!(ship.muzzle(), Vec2::new(400.0, 76.0));
    }
}
