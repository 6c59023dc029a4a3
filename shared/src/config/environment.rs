//! Deployment environment and the defaults that depend on it

use serde::{Deserialize, Serialize};
use std::{env, fmt, str::FromStr};

/// Where the server is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Read `ENVIRONMENT` (or `RUST_ENV`); unknown values mean development
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("RUST_ENV"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Whether an unreachable database may be replaced by the in-memory
    /// user directory. Accounts created that way vanish on restart.
    pub fn allows_in_memory_directory(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// `env_logger` filter used when `RUST_LOG` is not set
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "og_api=debug,og_core=debug,og_infra=debug,actix_web=info",
            Environment::Staging | Environment::Production => "info",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        })
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(" Stage ".parse::<Environment>(), Ok(Environment::Staging));
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_only_development_falls_back() {
        assert!(Environment::Development.allows_in_memory_directory());
        assert!(!Environment::Staging.allows_in_memory_directory());
        assert!(!Environment::Production.allows_in_memory_directory());
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [("ENVIRONMENT", Some("production")), ("RUST_ENV", None)],
            || assert_eq!(Environment::from_env(), Environment::Production),
        );
        temp_env::with_vars(
            [("ENVIRONMENT", None), ("RUST_ENV", Some("bogus"))],
            || assert_eq!(Environment::from_env(), Environment::Development),
        );
    }
}
