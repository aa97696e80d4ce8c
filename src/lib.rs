pub mod app;
pub mod audio;
pub mod config;
pub mod draw;
pub mod input;
pub mod main_loop;
pub mod menu;
pub mod scores;
pub mod server;
pub mod session;
pub mod settings;
pub mod state_manager;
pub mod states;
pub mod surface;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the fmt subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
