//! Property tests for wave invariants, driven through the public API

use alien_invaders::consts::SIM_DT;
use alien_invaders::sim::{Direction, Wave, WaveOutcome};
use alien_invaders::WaveConfig;
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = WaveConfig> {
    (1u32..=10, 1u32..=15, 0.05f32..=3.0, 1u32..=10).prop_map(
        |(rows, aliens_per_row, alien_speed, bolt_rate)| WaveConfig {
            rows,
            aliens_per_row,
            alien_speed,
            bolt_rate,
        },
    )
}

proptest! {
    #[test]
    fn fresh_wave_fills_the_grid(config in config_strategy(), level in 1u32..30, seed: u64) {
        let wave = Wave::create(&config, level, seed).unwrap();
        let cells = (config.rows * config.aliens_per_row) as usize;
        prop_assert_eq!(wave.grid().capacity(), cells);
        prop_assert_eq!(wave.grid().occupied_count(), cells);
        prop_assert!(wave.bolts().is_empty());
        prop_assert_eq!(wave.score(), 0);
        prop_assert!(wave.step_interval() > 0.0);
    }

    #[test]
    fn at_most_one_player_bolt(
        seed: u64,
        actions in prop::collection::vec((any::<bool>(), 0u8..3), 1..300),
    ) {
        let mut wave = Wave::create(&WaveConfig::default(), 1, seed).unwrap();
        for (fire, steer) in actions {
            if wave.outcome().is_terminal() {
                break;
            }
            match steer {
                0 => wave.move_ship(Direction::Left).unwrap(),
                1 => wave.move_ship(Direction::Right).unwrap(),
                _ => {}
            }
            if fire {
                wave.fire_ship_bolt().unwrap();
            }
            wave.advance(SIM_DT).unwrap();
            prop_assert!(wave.player_bolt_count() <= 1);
        }
    }

    #[test]
    fn step_interval_never_grows(seed: u64, level in 1u32..12, offsets in prop::collection::vec(0u8..3, 600)) {
        let config = WaveConfig {
            rows: 4,
            aliens_per_row: 10,
            alien_speed: 0.2,
            bolt_rate: 3,
        };
        let mut wave = Wave::create(&config, level, seed).unwrap();
        let mut last = wave.step_interval();
        let mut last_destroyed = 0;
        for steer in offsets {
            if wave.outcome().is_terminal() {
                break;
            }
            if wave.outcome() == WaveOutcome::Running {
                match steer {
                    0 => wave.move_ship(Direction::Left).unwrap(),
                    1 => wave.move_ship(Direction::Right).unwrap(),
                    _ => {}
                }
                wave.fire_ship_bolt().unwrap();
            } else {
                wave.resume();
            }
            wave.advance(SIM_DT).unwrap();

            let interval = wave.step_interval();
            prop_assert!(interval > 0.0);
            prop_assert!(interval <= last);
            prop_assert!(wave.destroyed_count() >= last_destroyed);
            last = interval;
            last_destroyed = wave.destroyed_count();
        }
    }

    #[test]
    fn zero_dt_is_idempotent(config in config_strategy(), seed: u64, warmup in 0usize..200, repeats in 1usize..20) {
        let mut wave = Wave::create(&config, 1, seed).unwrap();
        for _ in 0..warmup {
            wave.advance(SIM_DT).unwrap();
        }
        let before = wave.snapshot();
        for _ in 0..repeats {
            wave.advance(0.0).unwrap();
        }
        prop_assert_eq!(wave.snapshot(), before);
    }
}
