use std::path::PathBuf;

pub const ENV_WORKSPACE: &str = "GRADEBOOKD_WORKSPACE";
pub const ENV_LOG: &str = "GRADEBOOKD_LOG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("invalid log filter {filter:?}: {message}")]
    LogFilter { filter: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Workspace opened at startup, as if `workspace.select` had been sent.
    pub workspace: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then environment overrides, then validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(ws) = lookup(ENV_WORKSPACE) {
            if ws.trim().is_empty() {
                return Err(ConfigError::Empty(ENV_WORKSPACE));
            }
            config.workspace = Some(PathBuf::from(ws));
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Empty(ENV_LOG));
        }
        tracing_subscriber::EnvFilter::try_new(&self.log_filter).map_err(|e| {
            ConfigError::LogFilter {
                filter: self.log_filter.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}
