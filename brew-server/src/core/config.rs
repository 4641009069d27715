use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_PATH | {WORK_DIR}/brew.db | SQLite file |
/// | HTTP_PORT | 8080 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | default log filter |
/// | LOG_DIR | unset | daily rolling log files |
/// | DB_MAX_CONNECTIONS | 5 | connection pool size |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout (ms) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/brew HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    /// SQLite database file
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
    pub db_max_connections: u32,
    /// Request timeout (ms)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("brew.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            work_dir,
            database_path,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override work dir and port, keeping everything else from the environment.
    ///
    /// Mostly for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = PathBuf::from(&config.work_dir)
            .join("brew.db")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }

    /// Create the work directory if it does not exist
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides_moves_database() {
        let config = Config::with_overrides("/tmp/brew-test", 9100);
        assert_eq!(config.work_dir, "/tmp/brew-test");
        assert_eq!(config.http_port, 9100);
        assert!(config.database_path.starts_with("/tmp/brew-test"));
        assert!(config.database_path.ends_with("brew.db"));
    }

    #[test]
    fn test_environment_flags() {
        let mut config = Config::with_overrides("/tmp/brew-test", 9100);
        config.environment = "production".into();
        assert!(config.is_production());
        assert!(!config.is_development());

        config.environment = "development".into();
        assert!(config.is_development());
    }
}
