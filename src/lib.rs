//! Alien Invaders - wave simulation core
//!
//! Core modules:
//! - `sim`: Deterministic wave simulation (entities, collisions, marching aliens)
//! - `app`: Session state machine driving waves and level progression
//! - `settings`: Tuning configuration consumed at wave creation
//! - `highscores`: In-memory leaderboard for finished runs
//! - `error`: Configuration and precondition errors

pub mod app;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use app::{App, AppState, FrameInput, KeyEdge};
pub use error::{ConfigError, WaveError};
pub use highscores::HighScores;
pub use settings::WaveConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one bolt move per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play area dimensions (origin bottom-left, y grows upward)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 700.0;

    /// Ship sprite size
    pub const SHIP_WIDTH: f32 = 44.0;
    pub const SHIP_HEIGHT: f32 = 44.0;
    /// Distance of the bottom of the ship from the bottom of the screen
    pub const SHIP_BOTTOM: f32 = 32.0;
    /// Pixels moved per `move_ship` call
    pub const SHIP_MOVEMENT: f32 = 5.0;
    /// Lives granted at the start of every wave
    pub const SHIP_LIVES: u32 = 3;

    /// y-coordinate of the line the ship defends
    pub const DEFENSE_LINE: f32 = 100.0;

    /// Barrier sprite size
    pub const DEFENSE_BARRIERS_WIDTH: f32 = 120.0;
    pub const DEFENSE_BARRIERS_HEIGHT: f32 = 120.0;
    /// Horizontal gap between barriers (and before the first one)
    pub const DEFENSE_BARRIERS_SEP: f32 = 64.0;
    /// Hit-box drop relative to the drawn sprite (art is 120px, solid part is 70px)
    pub const DEFENSE_BARRIERS_COLLIDES_GAP: f32 = 50.0;
    /// Center height of the barrier row
    pub const DEFENSE_BARRIERS_LINE: f32 = DEFENSE_LINE + 2.0 + DEFENSE_BARRIERS_HEIGHT / 2.0;
    pub const DEFENSE_BARRIERS_NUM: usize = 4;
    /// Last damage frame; a hit at this frame removes the barrier
    pub const DEFENSE_BARRIERS_FRAMES: u32 = 9;

    /// Alien sprite size and spacing
    pub const ALIEN_WIDTH: f32 = 33.0;
    pub const ALIEN_HEIGHT: f32 = 33.0;
    pub const ALIEN_H_SEP: f32 = 16.0;
    pub const ALIEN_V_SEP: f32 = 16.0;
    /// Sideways distance per march step
    pub const ALIEN_H_WALK: f32 = 8.0;
    /// Downward distance per descent step
    pub const ALIEN_V_WALK: f32 = 16.0;
    /// Distance of the top alien row from the top of the screen
    pub const ALIEN_CEILING: f32 = 100.0;
    /// Score per alien kind
    pub const ALIEN_SCORE: [u64; 3] = [10, 20, 40];
    /// How much the step interval shrinks as the formation thins out
    pub const ALIEN_SPEED_RATIO: f32 = 0.5;
    pub const ALIEN_ROWS_MAX: u32 = 10;
    pub const ALIENS_IN_ROW_MAX: u32 = 15;
    /// Upper bound for the base step interval (seconds)
    pub const ALIEN_SPEED_MAX: f32 = 3.0;

    /// Alien kind per row (bottom to top), indexed by `rows - 1`
    pub const ALIEN_TYPE_MAP: [&[u8]; ALIEN_ROWS_MAX as usize] = [
        &[0],
        &[0, 1],
        &[0, 1, 2],
        &[0, 0, 1, 2],
        &[0, 0, 1, 1, 2],
        &[0, 0, 0, 1, 1, 2],
        &[0, 0, 0, 1, 1, 1, 2],
        &[0, 0, 0, 1, 1, 1, 2, 2],
        &[0, 0, 0, 0, 1, 1, 1, 2, 2],
        &[0, 0, 0, 0, 1, 1, 1, 1, 2, 2],
    ];

    /// Laser bolt size and per-frame speed
    pub const BOLT_WIDTH: f32 = 4.0;
    pub const BOLT_HEIGHT: f32 = 16.0;
    pub const BOLT_SPEED: f32 = 10.0;

    /// Frame a destroyed ship starts its break-up animation on
    pub const SHIP_BREAK_FRAME: u32 = 1;
    /// Frame a destroyed alien starts its break-up animation on
    pub const ALIEN_BREAK_FRAME: u32 = 2;
    /// Last frame of every break-up animation
    pub const BREAK_FRAME_END: u32 = 5;
}
