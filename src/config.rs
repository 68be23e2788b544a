//! Configuration for booklend.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (BOOKLEND_HOME, BOOKLEND_BORROWER)
//! 2. Config file (.booklend/config.yaml)
//! 3. Defaults (~/.booklend, borrower "User", sample seeding on)
//!
//! Config file discovery:
//! - Searches current directory and parents for .booklend/config.yaml
//! - `paths.home` is relative to the .booklend/ directory

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::library::{LibraryOptions, DEFAULT_BORROWER};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Directory name searched for while discovering the config file
pub const CONFIG_DIR: &str = ".booklend";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub lending: Option<LendingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Data directory (relative to the .booklend/ directory)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LendingConfig {
    pub borrower: Option<String>,
    pub seed_samples: Option<bool>,
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub home: Option<String>,
    pub borrower: Option<String>,
}

impl EnvOverrides {
    /// Read BOOKLEND_HOME and BOOKLEND_BORROWER
    pub fn from_env() -> Self {
        Self {
            home: std::env::var("BOOKLEND_HOME").ok(),
            borrower: std::env::var("BOOKLEND_BORROWER").ok(),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Data directory
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Lending settings
    pub lending: LendingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendingSettings {
    pub borrower: String,
    pub seed_samples: bool,
}

impl Default for LendingSettings {
    fn default() -> Self {
        Self {
            borrower: DEFAULT_BORROWER.to_string(),
            seed_samples: true,
        }
    }
}

impl ResolvedConfig {
    /// Directory holding the key-value files
    pub fn store_dir(&self) -> PathBuf {
        paths::store_dir(&self.home)
    }

    /// Replace the data directory (e.g. from `--home`)
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }

    /// Options for opening the library
    pub fn library_options(&self) -> LibraryOptions {
        LibraryOptions {
            borrower: self.lending.borrower.clone(),
            seed_samples: self.lending.seed_samples,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine defaults, an optional config file, and environment overrides
fn resolve_config(
    config_file: Option<PathBuf>,
    env: &EnvOverrides,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let mut home = default_home;
    let mut lending = LendingSettings::default();

    if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        if let Some(ref home_path) = config.paths.home {
            let config_dir = config_path.parent().unwrap_or(Path::new("."));
            home = resolve_path(config_dir, home_path);
        }

        if let Some(section) = config.lending {
            if let Some(borrower) = section.borrower {
                lending.borrower = borrower;
            }
            if let Some(seed) = section.seed_samples {
                lending.seed_samples = seed;
            }
        }
    }

    if let Some(ref env_home) = env.home {
        home = PathBuf::from(env_home);
    }
    if let Some(ref borrower) = env.borrower {
        lending.borrower = borrower.clone();
    }

    Ok(ResolvedConfig {
        home,
        config_file,
        lending,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let config_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file(&cwd));

    resolve_config(config_file, &EnvOverrides::from_env(), default_home)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
