use std::env;
use std::str::FromStr;

/// Rate limit configuration for public endpoints (requests per minute per IP).
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Validation and info lookups
    pub standard_rpm: u32,
    /// Index and health checks
    pub relaxed_rpm: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            standard_rpm: 30,
            relaxed_rpm: 60,
        }
    }
}

/// Connection pool and SQLite tuning.
#[derive(Debug, Clone, Copy)]
pub struct DbConfig {
    pub pool_size: u32,
    /// How long a statement waits on a locked database before failing
    pub busy_timeout_ms: u64,
    /// How long a request waits for a pooled connection before failing
    pub connection_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            busy_timeout_ms: 5000,
            connection_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub db: DbConfig,
    /// Credential required on admin routes. None disables them.
    pub api_key: Option<String>,
    pub rate_limit: RateLimitConfig,
    pub dev_mode: bool,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("HWLICENSE_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let db_defaults = DbConfig::default();
        let rate_defaults = RateLimitConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 3000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "hwlicense.db".to_string()),
            db: DbConfig {
                pool_size: env_or("DB_POOL_SIZE", db_defaults.pool_size).max(1),
                busy_timeout_ms: env_or("DB_BUSY_TIMEOUT_MS", db_defaults.busy_timeout_ms),
                connection_timeout_secs: env_or(
                    "DB_CONNECTION_TIMEOUT_SECS",
                    db_defaults.connection_timeout_secs,
                )
                .max(1),
            },
            api_key: env::var("API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            rate_limit: RateLimitConfig {
                standard_rpm: env_or("RATE_LIMIT_STANDARD_RPM", rate_defaults.standard_rpm).max(1),
                relaxed_rpm: env_or("RATE_LIMIT_RELAXED_RPM", rate_defaults.relaxed_rpm).max(1),
            },
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
