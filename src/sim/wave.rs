//! A single wave: the alien formation, the ship, bolts and barriers
//!
//! `Wave::advance` is called once per frame while the wave is running. It
//! marches the aliens, moves bolts, resolves collisions and plays break-up
//! animations, then reports how the wave stands through `WaveOutcome`.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::overlaps;
use super::entity::{Alien, Barrier, BarrierDamage, Bolt, Direction, Ship};
use super::grid::AlienGrid;
use crate::consts::*;
use crate::error::{ConfigError, WaveError};
use crate::settings::WaveConfig;

/// How the wave stands after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveOutcome {
    #[default]
    Running,
    /// A life was lost; the caller pauses and later calls `Wave::resume`
    ShipBreaking,
    /// Every alien destroyed
    Cleared,
    /// Out of lives, or the aliens reached the defense line
    GameOver,
}

impl WaveOutcome {
    /// The wave is over and will not run again
    pub fn is_terminal(self) -> bool {
        matches!(self, WaveOutcome::Cleared | WaveOutcome::GameOver)
    }
}

/// Fire-and-forget notifications for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveEvent {
    BoltFired,
    AlienDestroyed,
    ShipDestroyed,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSnapshot {
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    pub outcome: WaveOutcome,
    pub ship: Option<Ship>,
    pub aliens: Vec<Alien>,
    pub bolts: Vec<Bolt>,
    pub barriers: Vec<Barrier>,
}

/// One level's live simulation
#[derive(Debug, Clone)]
pub struct Wave {
    level: u32,
    grid: AlienGrid,
    ship: Option<Ship>,
    bolts: Vec<Bolt>,
    barriers: Vec<Barrier>,
    lives: u32,
    score: u64,
    direction: Direction,
    /// Seconds since the last alien step
    step_timer: f32,
    /// Alien steps left until the next alien bolt
    bolt_countdown: u32,
    bolt_rate: u32,
    base_speed: f32,
    /// Level-based cut to the step interval
    penalty_speed: f32,
    /// Seconds between alien steps
    step_interval: f32,
    destroyed: u32,
    total_aliens: u32,
    outcome: WaveOutcome,
    events: Vec<WaveEvent>,
    rng: Pcg32,
}

impl Wave {
    /// Build a fresh wave for `level` (1-based)
    pub fn create(config: &WaveConfig, level: u32, seed: u64) -> Result<Self, WaveError> {
        config.validate()?;
        if level == 0 {
            return Err(ConfigError::LevelZero.into());
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let bolt_countdown = rng.random_range(1..=config.bolt_rate);

        let penalty_speed = if level > 1 {
            (level - 1).min(9) as f32 * 0.1 * config.alien_speed
        } else {
            0.0
        };

        let barriers = (0..DEFENSE_BARRIERS_NUM)
            .map(|i| {
                let x = DEFENSE_BARRIERS_SEP
                    + DEFENSE_BARRIERS_WIDTH / 2.0
                    + i as f32 * (DEFENSE_BARRIERS_WIDTH + DEFENSE_BARRIERS_SEP);
                Barrier::new(Vec2::new(x, DEFENSE_BARRIERS_LINE))
            })
            .collect();

        log::info!(
            "Level {}: {}x{} aliens, step {:.2}s (penalty {:.2}s)",
            level,
            config.rows,
            config.aliens_per_row,
            config.alien_speed,
            penalty_speed
        );

        Ok(Self {
            level,
            grid: AlienGrid::new(config.rows as usize, config.aliens_per_row as usize),
            ship: Some(Ship::new(Vec2::new(
                GAME_WIDTH / 2.0,
                SHIP_BOTTOM + SHIP_HEIGHT / 2.0,
            ))),
            bolts: Vec::new(),
            barriers,
            lives: SHIP_LIVES,
            score: 0,
            direction: Direction::Right,
            step_timer: 0.0,
            bolt_countdown,
            bolt_rate: config.bolt_rate,
            base_speed: config.alien_speed,
            penalty_speed,
            step_interval: config.alien_speed,
            destroyed: 0,
            total_aliens: config.total_aliens(),
            outcome: WaveOutcome::Running,
            events: Vec::new(),
            rng,
        })
    }

    /// Start from a score carried over from the previous wave
    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn outcome(&self) -> WaveOutcome {
        self.outcome
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn grid(&self) -> &AlienGrid {
        &self.grid
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn step_interval(&self) -> f32 {
        self.step_interval
    }

    pub fn destroyed_count(&self) -> u32 {
        self.destroyed
    }

    pub fn total_aliens(&self) -> u32 {
        self.total_aliens
    }

    pub fn player_bolt_count(&self) -> usize {
        self.bolts.iter().filter(|b| b.is_player_bolt()).count()
    }

    /// Drain sound events queued since the last call
    pub fn take_events(&mut self) -> Vec<WaveEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> WaveSnapshot {
        WaveSnapshot {
            level: self.level,
            score: self.score,
            lives: self.lives,
            outcome: self.outcome,
            ship: self.ship.clone(),
            aliens: self.grid.iter().map(|(_, a)| a.clone()).collect(),
            bolts: self.bolts.clone(),
            barriers: self.barriers.clone(),
        }
    }

    /// Pick the game back up after a lost life
    pub fn resume(&mut self) {
        if self.outcome == WaveOutcome::ShipBreaking {
            self.outcome = WaveOutcome::Running;
        }
    }

    /// Fire from the ship unless a player bolt is already in flight
    pub fn fire_ship_bolt(&mut self) -> Result<(), WaveError> {
        let Some(ship) = &self.ship else {
            return Err(WaveError::PreconditionViolation {
                operation: "fire_ship_bolt",
                reason: "no ship present",
            });
        };
        if self.bolts.iter().any(Bolt::is_player_bolt) {
            return Ok(());
        }
        self.bolts.push(Bolt::player(ship.muzzle()));
        self.events.push(WaveEvent::BoltFired);
        Ok(())
    }

    /// Shift the ship one step, keeping it fully on screen
    pub fn move_ship(&mut self, direction: Direction) -> Result<(), WaveError> {
        let Some(ship) = &mut self.ship else {
            return Err(WaveError::PreconditionViolation {
                operation: "move_ship",
                reason: "no ship present",
            });
        };
        let x = ship.pos.x + SHIP_MOVEMENT * direction.sign();
        ship.pos.x = x.clamp(SHIP_WIDTH / 2.0, GAME_WIDTH - SHIP_WIDTH / 2.0);
        Ok(())
    }

    /// Advance the wave by one frame of `dt` seconds
    ///
    /// A zero-length frame changes nothing, and nothing happens once the
    /// wave has left `Running`.
    pub fn advance(&mut self, dt: f32) -> Result<(), WaveError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(WaveError::PreconditionViolation {
                operation: "advance",
                reason: "frame time must be finite and non-negative",
            });
        }
        if dt == 0.0 || self.outcome != WaveOutcome::Running {
            return Ok(());
        }

        self.step_timer += dt;
        if self.step_timer >= self.step_interval {
            self.step_aliens();
            if self.outcome == WaveOutcome::Running {
                self.fire_alien_bolt();
            }
            self.step_timer = 0.0;
        }

        if self.outcome != WaveOutcome::Running {
            return Ok(());
        }

        self.move_bolts();
        self.resolve_bolt_collisions();
        if self.outcome == WaveOutcome::Running {
            self.resolve_barrier_collisions();
        }
        if self.outcome == WaveOutcome::Running {
            self.advance_break_animations();
        }
        Ok(())
    }

    /// March sideways, or drop and turn around at a wall
    fn step_aliens(&mut self) {
        if self.grid.at_wall(self.direction) {
            self.direction = self.direction.flipped();
            self.grid.descend();
            log::debug!("Formation reversed, now marching {:?}", self.direction);
            if self.grid.reached_line(DEFENSE_LINE) {
                log::info!("Aliens reached the defense line");
                self.end(WaveOutcome::GameOver);
            }
        } else {
            self.grid.march(self.direction);
        }
    }

    fn fire_alien_bolt(&mut self) {
        self.bolt_countdown = self.bolt_countdown.saturating_sub(1);
        if self.bolt_countdown > 0 {
            return;
        }
        let shooters = self.grid.shooters();
        if let Some(&(row, col)) = shooters.choose(&mut self.rng) {
            if let Some(alien) = self.grid.get(row, col) {
                log::debug!("Alien ({row}, {col}) fires");
                self.bolts.push(Bolt::alien(alien.muzzle()));
            }
        }
        self.bolt_countdown = self.rng.random_range(1..=self.bolt_rate);
    }

    fn move_bolts(&mut self) {
        for bolt in &mut self.bolts {
            bolt.advance();
        }
        self.bolts.retain(|b| !b.is_offscreen());
    }

    /// At most one alien and one ship hit per frame, first match wins
    fn resolve_bolt_collisions(&mut self) {
        let mut alien_hit = false;
        let mut ship_hit = false;
        let mut i = 0;
        while i < self.bolts.len() {
            let bolt = &self.bolts[i];
            if bolt.is_player_bolt() {
                if !alien_hit {
                    let target = self
                        .grid
                        .alive()
                        .find(|(_, alien)| overlaps(*alien, bolt))
                        .map(|(cell, _)| cell);
                    if let Some(cell) = target {
                        self.bolts.remove(i);
                        alien_hit = true;
                        self.events.push(WaveEvent::AlienDestroyed);
                        self.destroy_alien(cell);
                        if self.outcome != WaveOutcome::Running {
                            return;
                        }
                        continue;
                    }
                }
            } else if !ship_hit {
                if let Some(ship) = self.ship.as_mut().filter(|s| s.alive) {
                    if overlaps(&*ship, bolt) {
                        ship.kill();
                        self.bolts.remove(i);
                        ship_hit = true;
                        self.events.push(WaveEvent::ShipDestroyed);
                        continue;
                    }
                }
            }
            i += 1;
        }
    }

    /// Aliens crash into barriers, and barriers soak up bolts
    fn resolve_barrier_collisions(&mut self) {
        if self.destroyed < self.total_aliens {
            let mut d = 0;
            while d < self.barriers.len() {
                let barrier = &self.barriers[d];
                let crashed = self
                    .grid
                    .alive()
                    .find(|(_, alien)| overlaps(barrier, *alien))
                    .map(|(cell, _)| cell);
                if let Some(cell) = crashed {
                    self.destroy_alien(cell);
                    if self.outcome != WaveOutcome::Running {
                        return;
                    }
                    if self.barriers[d].damage() == BarrierDamage::Destroyed {
                        self.barriers.remove(d);
                        continue;
                    }
                }
                d += 1;
            }
        }

        let mut d = 0;
        while d < self.barriers.len() {
            let barrier = &self.barriers[d];
            if let Some(i) = self.bolts.iter().position(|b| overlaps(barrier, b)) {
                self.bolts.remove(i);
                if self.barriers[d].damage() == BarrierDamage::Destroyed {
                    self.barriers.remove(d);
                    continue;
                }
            }
            d += 1;
        }
    }

    fn advance_break_animations(&mut self) {
        let mut finished = Vec::new();
        for (cell, alien) in self.grid.iter_mut() {
            if !alien.alive {
                if alien.frame < BREAK_FRAME_END {
                    alien.frame += 1;
                } else {
                    finished.push(cell);
                }
            }
        }
        for (row, col) in finished {
            self.grid.remove(row, col);
        }

        let mut ship_lost = false;
        if let Some(ship) = self.ship.as_mut().filter(|s| !s.alive) {
            if ship.frame < BREAK_FRAME_END {
                ship.frame += 1;
            } else {
                ship_lost = true;
            }
        }
        if ship_lost {
            self.lose_life();
        }
    }

    /// Kill, score and count an alien, then speed up the survivors
    fn destroy_alien(&mut self, (row, col): (usize, usize)) {
        let Some(alien) = self.grid.get_mut(row, col) else {
            return;
        };
        alien.kill();
        self.score += alien.kind.score();
        self.destroyed += 1;

        let fraction = ((self.destroyed + 1) as f32 / self.total_aliens as f32).min(1.0);
        self.step_interval =
            (self.base_speed - self.penalty_speed) * (1.0 - fraction * ALIEN_SPEED_RATIO);

        if self.destroyed >= self.total_aliens {
            log::info!("Level {} cleared with score {}", self.level, self.score);
            self.end(WaveOutcome::Cleared);
        }
    }

    /// The ship's break-up animation has finished
    fn lose_life(&mut self) {
        debug_assert!(self.lives > 0, "ship destroyed with no lives left");
        self.lives = self.lives.saturating_sub(1);
        if let Some(ship) = &mut self.ship {
            ship.restore();
        }
        self.bolts.clear();
        if self.lives > 0 {
            log::info!("Ship destroyed, {} lives left", self.lives);
            self.outcome = WaveOutcome::ShipBreaking;
        } else {
            log::info!("Ship destroyed, no lives left");
            self.end(WaveOutcome::GameOver);
        }
    }

    /// Finish the wave: bolts vanish and the ship leaves the field
    fn end(&mut self, outcome: WaveOutcome) {
        debug_assert!(outcome.is_terminal());
        if self.outcome.is_terminal() {
            return;
        }
        self.outcome = outcome;
        self.bolts.clear();
        self.ship = None;
    }
}
