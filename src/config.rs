//! Server settings read from the environment.

/// Bracket size assumed by the completion check when a tournament has no max set.
pub const DEFAULT_BRACKET_SIZE: u32 = 8;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub default_bracket_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            default_bracket_size: DEFAULT_BRACKET_SIZE,
        }
    }
}

impl AppConfig {
    /// Read HOST, PORT and DEFAULT_BRACKET_SIZE, falling back to defaults for missing or bad values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let default_bracket_size = lookup("DEFAULT_BRACKET_SIZE")
            .and_then(|s| s.parse().ok())
            .filter(|&n: &u32| n >= 2)
            .unwrap_or(defaults.default_bracket_size);
        Self {
            host,
            port,
            default_bracket_size,
        }
    }
}
