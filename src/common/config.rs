use std::path::PathBuf;

/// Name of the trash directory under the user data home
pub const HOME_TRASH_DIR_NAME: &str = "Trash";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Filter used when the user asks for verbose output
pub const VERBOSE_LOG_FILTER: &str = "debug";

/// Trash location settings
#[derive(Debug, Clone)]
pub struct TrashConfig {
    /// Base directory for user data (`$XDG_DATA_HOME` or `~/.local/share`).
    /// `None` when it cannot be determined; the home trash is then skipped.
    pub data_home: Option<PathBuf>,
    /// Whether per-volume trash directories are scanned
    pub scan_volumes: bool,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            data_home: None,
            scan_volumes: true,
        }
    }
}

impl TrashConfig {
    /// Root of the home trash, `<data-home>/Trash`
    pub fn home_trash_root(&self) -> Option<PathBuf> {
        self.data_home
            .as_ref()
            .map(|data_home| data_home.join(HOME_TRASH_DIR_NAME))
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Global application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub trash: TrashConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Builds the configuration from the process environment.
    ///
    /// Falls back to the platform data directory when neither
    /// `XDG_DATA_HOME` nor `HOME` is usable.
    pub fn from_env() -> Self {
        let mut config = Self::from_environ(|key| std::env::var(key).ok());
        if config.trash.data_home.is_none() {
            config.trash.data_home =
                directories::BaseDirs::new().map(|dirs| dirs.data_dir().to_path_buf());
        }
        config
    }

    /// Builds the configuration from an arbitrary environment lookup.
    pub fn from_environ<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let data_home = non_empty("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".local/share")));

        let filter = non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            trash: TrashConfig {
                data_home,
                ..TrashConfig::default()
            },
            logging: LoggingConfig { filter },
        }
    }
}
