//! Runtime and generator settings read from the environment (`.env` honored).

use std::path::PathBuf;
use std::time::Duration;

use crate::trigger::DEFAULT_TRIGGER_CAPACITY;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    /// Per-table broadcast buffer. A subscriber that falls further behind still re-evaluates once per publish.
    pub trigger_capacity: usize,
    /// Default coalescing delay for reactive streams.
    pub emit_delay: Duration,
    pub declarations_path: PathBuf,
    pub output_dir: PathBuf,
    /// Crate path generated code uses to reach the runtime.
    pub runtime_crate: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "sqlite::memory:".into(),
            max_connections: 5,
            trigger_capacity: DEFAULT_TRIGGER_CAPACITY,
            emit_delay: Duration::ZERO,
            declarations_path: PathBuf::from("declarations.json"),
            output_dir: PathBuf::from("generated"),
            runtime_crate: "dao_synth".into(),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read `DAO_SYNTH_*` variables over the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();
        Settings {
            database_url: env_or("DAO_SYNTH_DATABASE_URL", defaults.database_url),
            max_connections: env_parse("DAO_SYNTH_MAX_CONNECTIONS", defaults.max_connections),
            trigger_capacity: env_parse("DAO_SYNTH_TRIGGER_CAPACITY", defaults.trigger_capacity),
            emit_delay: Duration::from_millis(env_parse("DAO_SYNTH_EMIT_DELAY_MS", 0u64)),
            declarations_path: PathBuf::from(env_or(
                "DAO_SYNTH_DECLARATIONS",
                defaults.declarations_path.display().to_string(),
            )),
            output_dir: PathBuf::from(env_or(
                "DAO_SYNTH_OUTPUT_DIR",
                defaults.output_dir.display().to_string(),
            )),
            runtime_crate: env_or("DAO_SYNTH_RUNTIME_CRATE", defaults.runtime_crate),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_values_fall_back_to_default() {
        std::env::set_var("DAO_SYNTH_TEST_CAPACITY", " 128 ");
        assert_eq!(env_parse("DAO_SYNTH_TEST_CAPACITY", 64usize), 128);
        std::env::set_var("DAO_SYNTH_TEST_CAPACITY", "lots");
        assert_eq!(env_parse("DAO_SYNTH_TEST_CAPACITY", 64usize), 64);
        assert_eq!(env_parse("DAO_SYNTH_TEST_UNSET", 3u32), 3);
    }

    #[test]
    fn defaults_use_an_in_memory_store() {
        let settings = Settings::default();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.runtime_crate, "dao_synth");
        assert_eq!(settings.emit_delay, Duration::ZERO);
    }
}
