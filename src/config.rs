use std::net::SocketAddr;
use std::path::PathBuf;

// Canvas and grid
pub const CANVAS_WIDTH: i32 = 800;
pub const CANVAS_HEIGHT: i32 = 600;
pub const TILE_SIZE: i32 = 20;
pub const GRID_COLS: i32 = CANVAS_WIDTH / TILE_SIZE;
pub const GRID_ROWS: i32 = CANVAS_HEIGHT / TILE_SIZE;

// Loop timing (milliseconds)
pub const DEFAULT_TICK_MS: f64 = 5.0;
pub const MAX_FRAME_MS: f64 = 250.0; // spiral-of-death guard
pub const FPS_REFRESH_MS: f64 = 500.0;

// Score cache
pub const FETCH_COOLDOWN_MS: f64 = 5000.0;
pub const DEFAULT_SCORES_URL: &str = "http://127.0.0.1:8000/scores";

// Score server
pub const MAX_NAME_CHARS: usize = 30;
pub const TOP_SCORES_LIMIT: usize = 20;
pub const DEV_PORT: u16 = 8000;
pub const PRODUCTION_PORT: u16 = 80;

// Durable settings
pub const SETTINGS_KEY: &str = "snakeGameSettings";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub settings_dir: PathBuf,
    pub scores_url: String,
    pub tick_ms: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            settings_dir: PathBuf::from("."),
            scores_url: DEFAULT_SCORES_URL.to_string(),
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl ClientConfig {
    pub fn from_env<F>(mut get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let settings_dir = get_env("SNAKE_SETTINGS_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let base = get_env("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .or_else(|| {
                        get_env("HOME").map(|home| {
                            let mut p = PathBuf::from(home);
                            p.push(".config");
                            p
                        })
                    });
                match base {
                    Some(mut p) => {
                        p.push("snake-arcade");
                        p
                    }
                    None => PathBuf::from("."),
                }
            });

        let scores_url = get_env("SNAKE_SCORES_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCORES_URL.to_string());

        let tick_ms = get_env("SNAKE_TICK_MS")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .unwrap_or(DEFAULT_TICK_MS);

        Self { settings_dir, scores_url, tick_ms }
    }
}

pub fn resolve_server_addr<F>(mut get_env: F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = get_env("SNAKE_SERVER_ADDR").and_then(|v| v.parse().ok()) {
        return addr;
    }

    let port = match get_env("APP_ENV").as_deref() {
        Some("production") => PRODUCTION_PORT,
        _ => DEV_PORT,
    };
    SocketAddr::from(([0, 0, 0, 0], port))
}
