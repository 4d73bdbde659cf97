//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML configuration file into [`AppConfig`]. Missing sections
//! and keys fall back to defaults; inconsistencies between collections are
//! left for `validate_collections` to report when the store is seeded.
//!
//! ```toml
//! [storage]
//! database_path = "/home/me/.local/share/clipkeep/clipkeep.db"
//!
//! [capture]
//! active_collection = "inbox"
//!
//! [retention]
//! trash_retention_days = 30
//! idle_after_secs = 300
//!
//! [[collections]]
//! id = "inbox"
//! name = "Inbox"
//! purge_policy = { kind = "keep_last", count = 200 }
//! overflow = "archive"
//!
//! [[filters]]
//! process_name = "KeePassXC*"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use ck_core::{ApplicationFilter, Collection, CollectionId, EngineConfig, PurgePolicy};

const APP_DIR: &str = "clipkeep";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("clipkeep.db")),
        }
    }

    pub fn log_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.log_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("logs")),
        }
    }
}

/// One `[[collections]]` entry. New collections accept captures unless the
/// file says otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sort_key: i64,
    #[serde(default = "default_true")]
    pub accept_new_clips: bool,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub purge_policy: PurgePolicy,
    #[serde(default)]
    pub overflow: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CollectionConfig {
    pub fn to_collection(&self) -> Collection {
        Collection {
            id: CollectionId::from(self.id.as_str()),
            name: self.name.clone(),
            sort_key: self.sort_key,
            accept_new_clips: self.accept_new_clips,
            is_virtual: self.is_virtual,
            read_only: self.read_only,
            purge_policy: self.purge_policy,
            overflow_collection_id: self.overflow.as_deref().map(CollectionId::from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub collections: Vec<CollectionConfig>,
    pub filters: Vec<ApplicationFilter>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct FileSections {
    storage: StorageConfig,
    collections: Vec<CollectionConfig>,
    filters: Vec<ApplicationFilter>,
}

impl AppConfig {
    pub fn from_toml(value: &toml::Value) -> anyhow::Result<Self> {
        let engine: EngineConfig = value
            .clone()
            .try_into()
            .context("Invalid [capture] or [retention] section")?;
        let sections: FileSections = value
            .clone()
            .try_into()
            .context("Invalid [storage], [[collections]] or [[filters]] section")?;
        Ok(Self {
            engine,
            storage: sections.storage,
            collections: sections.collections,
            filters: sections.filters,
        })
    }

    /// Configured collections, or a single accepting `inbox` when none are
    /// configured.
    pub fn collections(&self) -> Vec<Collection> {
        if self.collections.is_empty() {
            return vec![Collection::new("inbox", "Inbox", 0)];
        }
        self.collections.iter().map(CollectionConfig::to_collection).collect()
    }

    /// Explicit active collection, else the first configured one.
    pub fn active_collection(&self) -> Option<CollectionId> {
        self.engine
            .capture
            .active_collection
            .clone()
            .or_else(|| self.collections().first().map(|c| c.id.clone()))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(dir.join(APP_DIR).join("config.toml"))
}

fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_local_dir().context("Could not determine the local data directory")?;
    Ok(dir.join(APP_DIR))
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        info!(path = %config_path.display(), "No config file found, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(config_path)
}
