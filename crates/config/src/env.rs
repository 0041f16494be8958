use blink_common::error::{BlinkError, BlinkResult};
use serde::Deserialize;
use std::env;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Max users processed per scheduler run.
    pub batch_size: usize,
    /// When set, the scheduler computes scores but writes nothing.
    pub dry_run: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    pub fn from_env() -> BlinkResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: get_var("DATABASE_URL")?,
            host: get_var_or("HOST", "0.0.0.0"),
            port: get_var_or("PORT", "8080")
                .parse()
                .map_err(|e| BlinkError::Config(format!("invalid PORT: {e}")))?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            batch_size: get_var_or("BATCH_SIZE", "100")
                .parse()
                .map_err(|e| BlinkError::Config(format!("invalid BATCH_SIZE: {e}")))?,
            dry_run: get_var_or("DRY_RUN", "false").eq_ignore_ascii_case("true"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Install the global tracing subscriber. An explicit `RUST_LOG` wins;
    /// otherwise the configured level applies, with sqlx statement logging
    /// held at warn so per-user scoring logs stay readable.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", self.log_level)));

        fmt().with_env_filter(filter).with_target(true).init();
    }
}

fn get_var(key: &str) -> BlinkResult<String> {
    env::var(key).map_err(|_| BlinkError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn config_from_env_succeeds_with_required_vars() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATABASE_URL", "postgres://localhost/blink_test");
        env::remove_var("BATCH_SIZE");
        env::remove_var("DRY_RUN");

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.database_url, "postgres://localhost/blink_test");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.batch_size, 100);
        assert!(!cfg.dry_run);

        env::remove_var("DATABASE_URL");
    }

    #[test]
    fn config_from_env_fails_without_database_url() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::remove_var("DATABASE_URL");
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn config_reads_batch_knobs() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATABASE_URL", "postgres://localhost/blink_test");
        env::set_var("BATCH_SIZE", "25");
        env::set_var("DRY_RUN", "TRUE");

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.batch_size, 25);
        assert!(cfg.dry_run);

        env::remove_var("DATABASE_URL");
        env::remove_var("BATCH_SIZE");
        env::remove_var("DRY_RUN");
    }

    #[test]
    fn bind_addr_formats_correctly() {
        let cfg = AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".to_owned(),
            port: 3000,
            log_level: "debug".to_owned(),
            batch_size: 100,
            dry_run: false,
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }
}
