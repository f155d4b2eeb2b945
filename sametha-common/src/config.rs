//! Configuration loading and root folder resolution
//!
//! Every setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed TOML file never stops startup: it is logged and the
//! defaults apply.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::normalize::SourceScript;
use crate::store::StorageBackend;
use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "SAMETHA_ROOT_FOLDER";

/// Environment variable overriding the storage backend
pub const STORAGE_BACKEND_ENV: &str = "SAMETHA_STORAGE_BACKEND";

/// Values used when nothing else is configured
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub bind_address: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub source_script: SourceScript,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: "info".to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Csv,
            source_script: SourceScript::Telugu,
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/sametha (or /var/lib/sametha for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("sametha"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/sametha"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("sametha"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/sametha"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("sametha"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\sametha"))
    } else {
        PathBuf::from("./sametha_data")
    }
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Contents of `<module>.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub storage_backend: Option<StorageBackend>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub source_script: Option<SourceScript>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}

/// Locates and reads the module's TOML file and resolves the root folder
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    explicit_config: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            explicit_config: None,
        }
    }

    /// Use this file instead of searching the platform config folders
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_config = Some(path.into());
        self
    }

    /// First existing candidate config file
    pub fn config_file_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit_config {
            return Some(path.clone());
        }

        let file_name = format!("{}.toml", self.module_name);
        let mut candidates = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("sametha").join(&file_name));
        }
        if cfg!(target_os = "linux") {
            candidates.push(PathBuf::from("/etc/sametha").join(&file_name));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// TOML settings; defaults when no file exists, an error when one exists
    /// but cannot be read or parsed
    pub fn try_load_toml(&self) -> Result<TomlConfig> {
        let Some(path) = self.config_file_path() else {
            debug!(module = %self.module_name, "No config file found, using defaults");
            return Ok(TomlConfig::default());
        };

        let config = TomlConfig::load(&path)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// TOML settings, or defaults when the file is missing or malformed
    pub fn load_toml(&self) -> TomlConfig {
        self.try_load_toml().unwrap_or_else(|e| {
            warn!("{} - using defaults", e);
            TomlConfig::default()
        })
    }

    /// Root folder from environment, TOML, or compiled default
    pub fn resolve(&self) -> PathBuf {
        self.resolve_with(None, &self.load_toml())
    }

    pub fn resolve_with(&self, cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &toml.root_folder {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and knows the file layout inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding the CSV collections
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root.join("sametha.db")
    }

    /// Create the root folder if needed; safe to call repeatedly
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            Error::Config(format!("Cannot create root folder {}: {}", self.root.display(), e))
        })
    }
}

/// Explicit values from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub storage_backend: Option<StorageBackend>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub storage_backend: StorageBackend,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    pub source_script: SourceScript,
    /// Problems found while resolving, for the caller to log once its
    /// subscriber is installed
    pub warnings: Vec<String>,
}

impl ServiceConfig {
    pub fn resolve(module_name: &str, overrides: ConfigOverrides) -> Self {
        let mut resolver = RootFolderResolver::new(module_name);
        if let Some(path) = &overrides.config_file {
            resolver = resolver.with_config_file(path);
        }

        let (toml, toml_warning) = match resolver.try_load_toml() {
            Ok(toml) => (toml, None),
            Err(e) => (TomlConfig::default(), Some(format!("{} - using defaults", e))),
        };

        let mut config = Self::from_layers(&resolver, overrides, toml);
        if let Some(warning) = toml_warning {
            config.warnings.insert(0, warning);
        }
        config
    }

    /// Merge the layers; split out so tests can supply the TOML layer directly
    pub fn from_layers(
        resolver: &RootFolderResolver,
        overrides: ConfigOverrides,
        toml: TomlConfig,
    ) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        let root_folder = resolver.resolve_with(overrides.root_folder.as_deref(), &toml);

        let mut warnings = Vec::new();
        let env_backend = std::env::var(STORAGE_BACKEND_ENV)
            .ok()
            .and_then(|raw| match raw.parse::<StorageBackend>() {
                Ok(backend) => Some(backend),
                Err(e) => {
                    warnings.push(format!("Ignoring {}: {}", STORAGE_BACKEND_ENV, e));
                    None
                }
            });

        Self {
            root_folder,
            storage_backend: overrides
                .storage_backend
                .or(env_backend)
                .or(toml.storage_backend)
                .unwrap_or(defaults.storage_backend),
            bind_address: overrides
                .bind_address
                .or(toml.bind_address)
                .unwrap_or(defaults.bind_address),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level),
            source_script: toml.source_script.unwrap_or(defaults.source_script),
            warnings,
        }
    }
}
