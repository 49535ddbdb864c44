//! Alien Invaders headless runner
//!
//! Plays the game in idle mode at the fixed timestep and logs how the
//! session goes. Usage: `alien-invaders [config.json] [frames]`.

#[cfg(not(target_arch = "wasm32"))]
use alien_invaders::{App, AppState, FrameInput, WaveConfig, consts::SIM_DT};

/// Ten minutes of play at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u64 = 36_000;

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: Option<&str>) -> WaveConfig {
    let Some(path) = path else {
        return WaveConfig::default();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| WaveConfig::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(config) => {
            log::info!("Loaded wave config from {}", path);
            config
        }
        Err(e) => {
            log::warn!("Failed to load config {}: {} - using defaults", path, e);
            WaveConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Alien Invaders (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str));
    let frames = match args.get(1).map(|s| s.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::warn!("Invalid frame count: {} - using {}", e, DEFAULT_FRAMES);
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    // Config was already validated, either by from_json or as the default
    let mut app = match App::new(config, seed) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return;
        }
    };

    let input = FrameInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut last_state = app.state();
    for frame in 0..frames {
        if let Err(e) = app.update(&input, SIM_DT) {
            log::error!("Frame {}: {}", frame, e);
            return;
        }
        app.take_events();

        let state = app.state();
        if state != last_state {
            log::info!(
                "Frame {}: {:?} (level {}, score {}, lives {})",
                frame,
                state,
                app.level(),
                app.score(),
                app.lives()
            );
            if state == AppState::Complete {
                log::info!("Wave finished: {:?}", app.last_outcome());
            }
            last_state = state;
        }
    }

    match app.high_scores().top_score() {
        Some(best) => log::info!("Best score this session: {}", best),
        None => log::info!("No finished runs this session"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core has no browser front end
}
