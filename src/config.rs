use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "maturity_platform.db";

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let path = env::var("MATURITY_DB_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let log_level = env::var("MATURITY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            database: DatabaseConfig {
                path: PathBuf::from(path),
            },
            telemetry: TelemetryConfig { log_level },
        }
    }
}

/// Location of the SQLite file backing the assessment store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("MATURITY_DB_PATH");
        env::remove_var("MATURITY_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load();
        assert_eq!(config.database.path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_reads_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATURITY_DB_PATH", "/tmp/assessments.db");
        env::set_var("MATURITY_LOG_LEVEL", "debug");
        let config = AppConfig::load();
        assert_eq!(config.database.path, PathBuf::from("/tmp/assessments.db"));
        assert_eq!(config.telemetry.log_level, "debug");
        reset_env();
    }
}
