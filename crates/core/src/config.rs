//! Configuration for the skillrouter server.
//!
//! Settings come from three places, strongest first: CLI flags (applied by the
//! binary), environment variables, and an optional `skillrouter.toml` file:
//!
//! ```toml
//! skills_dir = "/srv/skills"
//!
//! [executor]
//! timeout_secs = 120
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! file = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable that overrides the skills root directory.
pub const SKILLS_DIR_ENV: &str = "SKILLS_DIR";

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "skillrouter.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory scanned for skills (lower priority than `SKILLS_DIR`)
    pub skills_dir: Option<PathBuf>,

    /// Skill command execution settings
    pub executor: ExecutorConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Settings for skill command execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Maximum seconds a skill command may run; absent means wait indefinitely
    pub timeout_secs: Option<u64>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when no `SKILLROUTER_LOG`/`RUST_LOG` is set
    pub level: String,

    /// Output format: `pretty`, `json`, or `compact`; empty means auto-detect
    pub format: String,

    /// Mirror logs to a daily-rolling file
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: String::new(), file: false }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("TOML parse error: {}", e)))
    }

    /// Load a configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from an explicit path, or from `skillrouter.toml`
    /// in the working directory when present, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(explicit) => Self::from_file(explicit),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() { Self::from_file(default) } else { Ok(Self::default()) }
            }
        }
    }

    /// Resolve the skills root directory.
    ///
    /// Priority: `SKILLS_DIR` environment variable, then the config file's
    /// `skills_dir`, then [`Config::default_skills_dir`].
    pub fn resolve_skills_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(SKILLS_DIR_ENV)
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }

        if let Some(dir) = &self.skills_dir {
            return dir.clone();
        }

        Self::default_skills_dir()
    }

    /// Built-in skills directory: `skills/` next to the running executable
    /// when that exists (development layout), otherwise the per-user data
    /// directory.
    pub fn default_skills_dir() -> PathBuf {
        if let Ok(exe) = std::env::current_exe()
            && let Some(exe_dir) = exe.parent()
        {
            let dev_dir = exe_dir.join("skills");
            if dev_dir.is_dir() {
                return dev_dir;
            }
        }

        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillrouter")
            .join("skills")
    }

    /// Executor deadline as a [`Duration`], if configured.
    pub fn executor_timeout(&self) -> Option<Duration> {
        self.executor.timeout_secs.map(Duration::from_secs)
    }
}
