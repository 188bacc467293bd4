use std::collections::HashMap;
use std::str::FromStr;
use tracing::Level;

/// Per-scope log levels, e.g. `LOCOMOTION_LOG="warn,teleport=debug,climb=info"`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        let mut config = Self::new();

        if let Ok(log_config) = std::env::var(env_var_name) {
            config.parse_config_string(&log_config);
        }

        config
    }

    fn parse_config_string(&mut self, config_str: &str) {
        for part in config_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((scope, level)) => {
                    if let Ok(level) = Level::from_str(level.trim()) {
                        self.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Ok(level) = Level::from_str(part) {
                        self.global_level = level;
                    }
                }
            }
        }
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        let target_level = self.scope_levels.get(scope).unwrap_or(&self.global_level);
        level <= *target_level
    }

    /// The most verbose level any scope asks for.
    pub fn max_level(&self) -> Level {
        self.scope_levels
            .values()
            .copied()
            .fold(self.global_level, |acc, level| acc.max(level))
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the tracing subscriber and the scoped log configuration read from
/// `env_var_name`. `RUST_LOG` still wins when set; otherwise the subscriber is
/// opened up to the most verbose scope so the scope filter can do its job.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    let config = LogConfig::from_env(env_var_name);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(config.max_level().as_str().to_lowercase())
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    super::set_log_config(config.clone());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_level() {
        let mut config = LogConfig::new();
        config.parse_config_string("debug");
        assert_eq!(config.global_level, Level::DEBUG);
    }

    #[test]
    fn test_parse_scope_levels() {
        let mut config = LogConfig::new();
        config.parse_config_string("warn, teleport=debug,climb=trace,");

        assert_eq!(config.global_level, Level::WARN);
        assert_eq!(config.scope_levels.get("teleport"), Some(&Level::DEBUG));
        assert_eq!(config.scope_levels.get("climb"), Some(&Level::TRACE));
    }

    #[test]
    fn test_unknown_level_is_ignored() {
        let mut config = LogConfig::new();
        config.parse_config_string("loud,comfort=shouty");

        assert_eq!(config.global_level, Level::WARN);
        assert!(config.scope_levels.is_empty());
    }

    #[test]
    fn test_should_log() {
        let mut config = LogConfig::new();
        config.set_scope_level("physics", Level::DEBUG);

        assert!(config.should_log("unknown", Level::ERROR));
        assert!(config.should_log("unknown", Level::WARN));
        assert!(!config.should_log("unknown", Level::INFO));

        assert!(config.should_log("physics", Level::ERROR));
        assert!(config.should_log("physics", Level::DEBUG));
        assert!(!config.should_log("physics", Level::TRACE));
    }

    #[test]
    fn test_max_level_covers_scopes() {
        let mut config = LogConfig::new();
        assert_eq!(config.max_level(), Level::WARN);

        config.set_scope_level("teleport", Level::TRACE);
        assert_eq!(config.max_level(), Level::TRACE);
    }
}
