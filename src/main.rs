//! Pixel Arena - top-down team arena shooter
//!
//! This binary is the embedding host for the simulation core. It handles:
//! - Environment and configuration loading
//! - Tracing initialization
//! - Window bootstrap and the display-refresh frame loop
//!
//! The match itself (physics, combat, bots, rounds, anti-cheat) lives in
//! the `game` modules and is driven once per refresh by `app::ArenaApp`.

mod app;
mod config;
mod game;
mod input;
mod render;
mod store;
mod util;

use macroquad::prelude::Conf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::ArenaApp;
use crate::config::Config;
use crate::game::constants::{WORLD_HEIGHT, WORLD_WIDTH};

fn window_conf() -> Conf {
    Conf {
        window_title: "PIXEL SHOTS".to_string(),
        window_width: WORLD_WIDTH as i32,
        window_height: WORLD_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return;
        }
    };

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Pixel Arena");
    info!(mode = %config.match_mode, class = ?config.player_class, "match setup");

    let app = ArenaApp::new(&config);
    app.run().await;

    info!("Shutdown complete");
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
