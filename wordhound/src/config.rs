use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration for one search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.wordhound.yaml` in the current directory
/// 3. Global `$HOME/.config/wordhound/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Word to search for (matched as literal text, never as a pattern)
/// term: "needle"
///
/// # File or directory to search
/// root_path: "."
///
/// # Fold case before comparing
/// case_insensitive: false
///
/// # Directory descent bound, counted in path separators.
/// # 0 keeps the search to a separator-free root's immediate entries;
/// # null removes the bound entirely.
/// max_depth: 0
///
/// # Thread count (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// # CLI Integration
///
/// Command-line arguments take precedence over config file values. The
/// merging behavior is defined in the `merge_with_cli` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The word to search for; an empty term matches every line
    #[serde(default)]
    pub term: String,

    /// File or directory to start the search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Whether to fold case before substring comparison
    #[serde(default)]
    pub case_insensitive: bool,

    /// Directory descent bound, measured in path-separator count of the
    /// traversed path; `None` recurses without bound
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,

    /// Number of threads to use for searching.
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_depth() -> Option<usize> {
    Some(0)
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            term: String::new(),
            root_path: default_root_path(),
            case_insensitive: false,
            max_depth: default_max_depth(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration for `term` under `root_path` with defaults
    /// for everything else
    pub fn new(term: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            term: term.into(),
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    /// Sets the case-insensitivity mode
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Sets the directory descent bound
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the worker thread count
    pub fn with_thread_count(mut self, thread_count: NonZeroUsize) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // An explicitly named file must exist; the default locations are
        // optional.
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::Message(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("wordhound/config.yaml")),
            // Local config
            Some(PathBuf::from(".wordhound.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// A CLI value wins whenever it differs from the field's default, so
    /// unspecified flags leave the file values in place.
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        if !cli_config.term.is_empty() {
            self.term = cli_config.term;
        }
        if cli_config.root_path != default_root_path() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.case_insensitive {
            self.case_insensitive = true;
        }
        if cli_config.max_depth != default_max_depth() {
            self.max_depth = cli_config.max_depth;
        }
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
