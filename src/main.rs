//! Mini Battles entry point
//!
//! Native builds run a headless scripted battle and log the outcome. The web
//! build starts from `web::start` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;

    use mini_battles::settings::{Settings, SettingsError};
    use mini_battles::sim::{GameState, TickInput, tick};
    use mini_battles::ui::hud_lines;

    #[derive(Parser, Debug)]
    #[command(author, version, about)]
    struct Cli {
        /// RNG seed for the run
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// JSON settings file (missing keys use defaults)
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    /// Scripted commands: which tick, and what the player does on it
    fn script(tick_index: u64, settings: &Settings) -> TickInput {
        let (w, h) = (settings.arena_width, settings.arena_height);
        match tick_index {
            0 => TickInput {
                toggle_group: Some(0),
                move_target: Some(Vec2::new(w * 0.25, h * 0.85)),
                ..Default::default()
            },
            1 => TickInput {
                toggle_group: Some(1),
                move_target: Some(Vec2::new(w * 0.75, h * 0.85)),
                ..Default::default()
            },
            600 => TickInput {
                toggle_group: Some(1),
                move_target: Some(Vec2::new(w * 0.5, h * 0.15)),
                ..Default::default()
            },
            1200 => TickInput {
                move_target: Some(settings.base_center()),
                ..Default::default()
            },
            _ => TickInput::default(),
        }
    }

    pub fn run() -> Result<(), SettingsError> {
        let cli = Cli::parse();
        let settings = match &cli.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let mut state = GameState::with_settings(cli.seed, settings)?;
        for i in 0..cli.ticks {
            let input = script(i, &state.settings);
            state.apply_input(&input);
            tick(&mut state);
        }

        log::info!(
            "After {} ticks: wave {}, {} player units, {} enemies",
            state.time_ticks,
            state.enemy_wave,
            state.player_unit_count(),
            state.enemies.len()
        );
        for line in hud_lines(&state) {
            log::info!("{}", line);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), mini_battles::SettingsError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Mini Battles (native) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
