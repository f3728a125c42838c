use anyhow::{Context, Result, bail};

/// Placeholder session secret that only belongs on a dev machine.
pub const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub session_secret: String,
    pub session_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port: u16 = get("WIKI_PORT", "8501")
            .parse()
            .context("WIKI_PORT must be a port number")?;
        let session_days: i64 = get("WIKI_SESSION_DAYS", "30")
            .parse()
            .context("WIKI_SESSION_DAYS must be a whole number of days")?;
        if session_days <= 0 {
            bail!("WIKI_SESSION_DAYS must be at least 1, got {}", session_days);
        }

        Ok(Self {
            host: get("WIKI_HOST", "0.0.0.0"),
            port,
            db_path: get("WIKI_DB_PATH", "wiki.db"),
            session_secret: get("WIKI_SESSION_SECRET", PLACEHOLDER_SECRET),
            session_days,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.session_secret == PLACEHOLDER_SECRET
    }
}
