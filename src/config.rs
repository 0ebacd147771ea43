use std::path::PathBuf;

pub const DEFAULT_DB_FILE: &str = "finance_tracker.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

impl LogLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            LogLevel::Quiet
        } else if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// Default `env_logger` filter; `RUST_LOG` still wins when set.
    pub fn default_filter(self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
}

impl AppConfig {
    pub fn new(db_path: Option<PathBuf>, verbose: bool, quiet: bool) -> Self {
        Self {
            db_path: db_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
            log_level: LogLevel::from_flags(verbose, quiet),
        }
    }

    pub fn init_logging(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.default_filter()),
        )
        .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path() {
        let config = AppConfig::new(None, false, false);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(config.log_level, LogLevel::Normal);
        assert_eq!(config.log_level.default_filter(), "info");
    }

    #[test]
    fn test_explicit_db_path() {
        let config = AppConfig::new(Some(PathBuf::from("/tmp/x.db")), false, false);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Quiet);
        assert_eq!(LogLevel::from_flags(true, false).default_filter(), "debug");
        assert_eq!(LogLevel::Quiet.default_filter(), "error");
    }
}
