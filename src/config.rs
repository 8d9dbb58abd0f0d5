use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TICK_MS: u64 = 250;
const MIN_TICK_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub source: SourceKind,
    pub players: Vec<String>,
    pub tick_rate: Duration,
    pub log_filter: Option<String>,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Reads `.env.local` and `.env` (when present) into the process
    /// environment, then builds the config from it.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let base_url = non_empty("FNCS_BASE_URL")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let source = match non_empty("FNCS_SOURCE")
            .map(|val| val.trim().to_lowercase())
            .as_deref()
        {
            Some("demo") => SourceKind::Demo,
            _ => SourceKind::Http,
        };
        let players = non_empty("FNCS_PLAYERS")
            .map(|raw| parse_players(&raw))
            .unwrap_or_default();
        let tick_ms = non_empty("FNCS_TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICK_MS)
            .max(MIN_TICK_MS);
        let log_filter = non_empty("FNCS_LOG");
        let log_dir = non_empty("FNCS_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        Self {
            base_url,
            source,
            players,
            tick_rate: Duration::from_millis(tick_ms),
            log_filter,
            log_dir,
        }
    }
}

fn parse_players(raw: &str) -> Vec<String> {
    let mut players: Vec<String> = Vec::new();
    for name in raw.split([',', ';']).map(str::trim).filter(|s| !s.is_empty()) {
        if !players.iter().any(|p| p == name) {
            players.push(name.to_string());
        }
    }
    players
}
