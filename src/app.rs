//! Session state machine
//!
//! Owns the current `Wave`, turns per-frame key states into commands, and
//! handles level progression, score carry-over and pauses between lives.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::SHIP_MOVEMENT;
use crate::error::{ConfigError, WaveError};
use crate::highscores::HighScores;
use crate::settings::WaveConfig;
use crate::sim::{Direction, Wave, WaveEvent, WaveOutcome, WaveSnapshot};

/// Top-level session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppState {
    /// Welcome screen
    #[default]
    Intro,
    /// Waiting for the player to start the current level
    Inactive,
    /// Building a wave; lasts a single frame
    NewWave,
    /// Wave in play
    Active,
    /// Between lives (or paused by the player), wave still visible
    Paused,
    /// Restoring play after a pause; lasts a single frame
    Continue,
    /// Wave won or lost
    Complete,
}

/// Rising-edge detector for a key sampled once per frame
///
/// Holding a key reports a single press; it must be released before it
/// counts again.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEdge {
    held: bool,
}

impl KeyEdge {
    /// Feed this frame's key state; true only on the frame it goes down
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.held;
        self.held = down;
        pressed
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// Key states for a single frame (held, not edges)
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Start / continue key
    pub trigger: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// The game session
#[derive(Debug, Clone)]
pub struct App {
    config: WaveConfig,
    state: AppState,
    wave: Option<Wave>,
    /// Current level, 1-based
    level: u32,
    /// Score handed to the next wave after a clear
    carried_score: u64,
    /// Final score of the last finished wave
    last_score: u64,
    last_outcome: Option<WaveOutcome>,
    trigger: KeyEdge,
    fire: KeyEdge,
    high_scores: HighScores,
    /// Source of per-wave seeds
    seeds: Pcg32,
    events: Vec<WaveEvent>,
}

impl App {
    pub fn new(config: WaveConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AppState::Intro,
            wave: None,
            level: 1,
            carried_score: 0,
            last_score: 0,
            last_outcome: None,
            trigger: KeyEdge::default(),
            fire: KeyEdge::default(),
            high_scores: HighScores::new(),
            seeds: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn wave(&self) -> Option<&Wave> {
        self.wave.as_ref()
    }

    /// Score for the HUD: the live wave's, else the last finished wave's
    pub fn score(&self) -> u64 {
        self.wave.as_ref().map_or(self.last_score, Wave::score)
    }

    pub fn lives(&self) -> u32 {
        self.wave.as_ref().map_or(0, Wave::lives)
    }

    /// How the last finished wave ended, for the completion screen
    pub fn last_outcome(&self) -> Option<WaveOutcome> {
        self.last_outcome
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn snapshot(&self) -> Option<WaveSnapshot> {
        self.wave.as_ref().map(Wave::snapshot)
    }

    /// Drain sound events from waves played since the last call
    pub fn take_events(&mut self) -> Vec<WaveEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one frame
    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Result<(), WaveError> {
        let input = if input.idle_mode {
            self.idle_input()
        } else {
            input.clone()
        };

        let fire_pressed = self.fire.update(input.fire);
        if self.trigger.update(input.trigger) {
            self.on_trigger();
        }

        match self.state {
            AppState::NewWave => {
                self.start_wave()?;
                self.state = AppState::Active;
            }
            AppState::Active => self.update_active(&input, fire_pressed, dt)?,
            AppState::Continue => {
                if let Some(wave) = &mut self.wave {
                    wave.resume();
                }
                self.state = AppState::Active;
            }
            AppState::Intro | AppState::Inactive | AppState::Paused | AppState::Complete => {}
        }
        Ok(())
    }

    fn on_trigger(&mut self) {
        let next = match self.state {
            AppState::Intro => AppState::Inactive,
            AppState::Inactive => AppState::NewWave,
            AppState::Active => AppState::Paused,
            AppState::Paused => AppState::Continue,
            AppState::Complete if self.level > 1 => AppState::Inactive,
            AppState::Complete => AppState::Intro,
            other => other,
        };
        if next != self.state {
            log::debug!("{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn start_wave(&mut self) -> Result<(), WaveError> {
        let seed = self.seeds.random::<u64>();
        let wave = Wave::create(&self.config, self.level, seed)?.with_score(self.carried_score);
        self.carried_score = 0;
        self.wave = Some(wave);
        Ok(())
    }

    fn update_active(
        &mut self,
        input: &FrameInput,
        fire_pressed: bool,
        dt: f32,
    ) -> Result<(), WaveError> {
        let Some(wave) = self.wave.as_mut() else {
            return Err(WaveError::PreconditionViolation {
                operation: "update",
                reason: "active state without a wave",
            });
        };

        if input.right {
            wave.move_ship(Direction::Right)?;
        }
        if input.left {
            wave.move_ship(Direction::Left)?;
        }
        if fire_pressed {
            wave.fire_ship_bolt()?;
        }
        wave.advance(dt)?;
        self.events.extend(wave.take_events());

        match wave.outcome() {
            WaveOutcome::Running => {}
            WaveOutcome::ShipBreaking => self.state = AppState::Paused,
            WaveOutcome::Cleared => self.finish_wave(WaveOutcome::Cleared),
            WaveOutcome::GameOver => self.finish_wave(WaveOutcome::GameOver),
        }
        Ok(())
    }

    /// Drop the finished wave and set up the next level (or a fresh run)
    fn finish_wave(&mut self, outcome: WaveOutcome) {
        let score = self.wave.take().map_or(0, |w| w.score());
        self.last_score = score;
        self.last_outcome = Some(outcome);
        self.state = AppState::Complete;

        if outcome == WaveOutcome::Cleared {
            self.carried_score = score;
            self.level += 1;
            log::info!("Level cleared, advancing to level {}", self.level);
        } else {
            log::info!("Game over on level {} with score {}", self.level, score);
            if let Some(rank) = self.high_scores.add_score(score, self.level) {
                log::info!("New high score #{}: {}", rank, score);
            }
            self.carried_score = 0;
            self.level = 1;
        }
    }

    /// Autopilot input: press through menus, then chase the nearest shooter
    fn idle_input(&self) -> FrameInput {
        let mut input = FrameInput {
            idle_mode: true,
            ..Default::default()
        };

        if self.state != AppState::Active {
            // Alternate so every other frame is a fresh press
            input.trigger = !self.trigger.is_held();
            return input;
        }

        let Some(wave) = &self.wave else {
            return input;
        };
        let Some(ship) = wave.ship() else {
            return input;
        };
        let grid = wave.grid();
        let target = grid
            .shooters()
            .into_iter()
            .filter_map(|(row, col)| grid.get(row, col))
            .map(|alien| alien.pos.x)
            .min_by(|a, b| {
                (a - ship.pos.x)
                    .abs()
                    .partial_cmp(&(b - ship.pos.x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        if let Some(x) = target {
            let dx = x - ship.pos.x;
            if dx > SHIP_MOVEMENT {
                input.right = true;
            } else if dx < -SHIP_MOVEMENT {
                input.left = true;
            } else {
                input.fire = !self.fire.is_held();
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn press(app: &mut App) {
        let trigger = FrameInput {
            trigger: true,
            ..Default::default()
        };
        app.update(&trigger, SIM_DT).unwrap();
        app.update(&FrameInput::default(), SIM_DT).unwrap();
    }

    fn single_alien_app() -> App {
        let config = WaveConfig {
            rows: 1,
            aliens_per_row: 1,
            alien_speed: 3.0,
            bolt_rate: 5,
        };
        App::new(config, 11).unwrap()
    }

    /// Line up under the lone alien with time frozen, then shoot it down
    fn clear_single_alien(app: &mut App) {
        let left = FrameInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..74 {
            app.update(&left, 0.0).unwrap();
        }
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        app.update(&fire, SIM_DT).unwrap();
        for _ in 0..100 {
            if app.state() != AppState::Active {
                break;
            }
            app.update(&FrameInput::default(), SIM_DT).unwrap();
        }
    }

    #[test]
    fn test_key_edge_ignores_held_key() {
        let mut edge = KeyEdge::default();
        assert!(edge.update(true));
        assert!(!edge.update(true));
        assert!(!edge.update(true));
        assert!(!edge.update(false));
        assert!(edge.update(true));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = WaveConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(App::new(config, 0).is_err());
    }

    #[test]
    fn test_intro_to_active() {
        let mut app = App::new(WaveConfig::default(), 1).unwrap();
        assert_eq!(app.state(), AppState::Intro);

        // Holding the trigger only counts once
        let held = FrameInput {
            trigger: true,
            ..Default::default()
        };
        app.update(&held, SIM_DT).unwrap();
        app.update(&held, SIM_DT).unwrap();
        assert_eq!(app.state(), AppState::Inactive);
        assert!(app.wave().is_none());

        app.update(&FrameInput::default(), SIM_DT).unwrap();
        press(&mut app);
        assert_eq!(app.state(), AppState::Active);
        let wave = app.wave().unwrap();
        assert_eq!(wave.level(), 1);
        assert_eq!(wave.score(), 0);
        assert_eq!(app.lives(), crate::consts::SHIP_LIVES);
    }

    #[test]
    fn test_manual_pause_and_continue() {
        let mut app = App::new(WaveConfig::default(), 1).unwrap();
        press(&mut app);
        press(&mut app);
        assert_eq!(app.state(), AppState::Active);

        press(&mut app);
        assert_eq!(app.state(), AppState::Paused);
        let frozen = app.snapshot();
        app.update(&FrameInput::default(), 1.0).unwrap();
        assert_eq!(app.snapshot(), frozen);

        let trigger = FrameInput {
            trigger: true,
            ..Default::default()
        };
        app.update(&trigger, SIM_DT).unwrap();
        // Continue lasts a single frame
        assert_eq!(app.state(), AppState::Active);
    }

    #[test]
    fn test_clear_carries_score_to_next_level() {
        let mut app = single_alien_app();
        press(&mut app);
        press(&mut app);
        clear_single_alien(&mut app);

        assert_eq!(app.state(), AppState::Complete);
        assert_eq!(app.last_outcome(), Some(WaveOutcome::Cleared));
        assert_eq!(app.level(), 2);
        assert_eq!(app.score(), 10);
        assert!(app.wave().is_none());
        let events = app.take_events();
        assert!(events.contains(&WaveEvent::BoltFired));
        assert!(events.contains(&WaveEvent::AlienDestroyed));

        // Level > 1 goes back to the start screen for the next level
        press(&mut app);
        assert_eq!(app.state(), AppState::Inactive);
        press(&mut app);
        assert_eq!(app.state(), AppState::Active);
        let wave = app.wave().unwrap();
        assert_eq!(wave.level(), 2);
        assert_eq!(wave.score(), 10);
        assert!(app.high_scores().is_empty());
    }

    #[test]
    fn test_game_over_resets_progress() {
        // A dense, fast formation reaches the defense line quickly
        let config = WaveConfig {
            rows: 10,
            aliens_per_row: 15,
            alien_speed: 0.01,
            bolt_rate: 5,
        };
        let mut app = App::new(config, 3).unwrap();
        press(&mut app);
        press(&mut app);

        let mut frame = 0u32;
        while app.state() != AppState::Complete && frame < 5_000 {
            // Press through any pause between lives
            let input = FrameInput {
                trigger: app.state() == AppState::Paused && frame % 2 == 0,
                ..Default::default()
            };
            app.update(&input, SIM_DT).unwrap();
            frame += 1;
        }

        assert_eq!(app.state(), AppState::Complete);
        assert_eq!(app.last_outcome(), Some(WaveOutcome::GameOver));
        assert_eq!(app.level(), 1);
        // Aliens crashing into barriers scored points
        assert!(app.score() > 0);
        assert_eq!(app.high_scores().top_score(), Some(app.score()));

        app.update(&FrameInput::default(), SIM_DT).unwrap();
        press(&mut app);
        assert_eq!(app.state(), AppState::Intro);
    }

    #[test]
    fn test_idle_mode_plays_itself() {
        let mut app = App::new(WaveConfig::default(), 5).unwrap();
        let idle = FrameInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut saw_active = false;
        let mut fired = false;
        for _ in 0..3_000 {
            app.update(&idle, SIM_DT).unwrap();
            saw_active |= app.state() == AppState::Active;
            fired |= app.take_events().contains(&WaveEvent::BoltFired);
        }
        assert!(saw_active);
        assert!(fired);
    }
}
