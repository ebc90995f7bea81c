//! Application configuration.
//!
//! Loaded from a YAML file whose path comes from `SCHOOL_DASHBOARD_CONFIG`
//! (default `school_dashboard.yaml`). A missing file yields the defaults.
//! `SCHOOL_DASHBOARD_DATA_DIR` and `SCHOOL_DASHBOARD_BIND_ADDR` override the
//! corresponding file values.
//!
//! ```yaml
//! server:
//!   bind_addr: "127.0.0.1:3000"
//!   allowed_origin: "http://localhost:8080"
//! storage:
//!   backend: json
//!   data_directory: data
//! catalog:
//!   subjects: [arabic, mathematics, science]
//!   grades: ["Grade 5", "Grade 6"]
//! history_limit: 50
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::{CatalogResponse, Subject, SubjectInfo};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::student_store::DEFAULT_HISTORY_LIMIT;

pub const CONFIG_PATH_ENV: &str = "SCHOOL_DASHBOARD_CONFIG";
pub const DATA_DIR_ENV: &str = "SCHOOL_DASHBOARD_DATA_DIR";
pub const BIND_ADDR_ENV: &str = "SCHOOL_DASHBOARD_BIND_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "school_dashboard.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub catalog: SchoolCatalog,
    /// Maximum number of undo steps kept
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            catalog: SchoolCatalog::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origin allowed by CORS. `None` allows any origin.
    pub allowed_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            allowed_origin: Some("http://localhost:8080".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            data_directory: PathBuf::from("data"),
        }
    }
}

/// The subjects and grades the school offers. Both are closed sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolCatalog {
    pub subjects: Vec<Subject>,
    pub grades: Vec<String>,
}

impl Default for SchoolCatalog {
    fn default() -> Self {
        Self {
            subjects: Subject::ALL.to_vec(),
            grades: (1..=6).map(|n| format!("Grade {}", n)).collect(),
        }
    }
}

impl SchoolCatalog {
    pub fn offers_subject(&self, subject: Subject) -> bool {
        self.subjects.contains(&subject)
    }

    pub fn has_grade(&self, grade: &str) -> bool {
        self.grades.iter().any(|g| g == grade)
    }

    pub fn to_response(&self) -> CatalogResponse {
        CatalogResponse {
            subjects: self
                .subjects
                .iter()
                .map(|subject| SubjectInfo {
                    id: *subject,
                    name: subject.display_name().to_string(),
                })
                .collect(),
            grades: self.grades.clone(),
        }
    }
}

impl AppConfig {
    /// Load from the path named by `SCHOOL_DASHBOARD_CONFIG` and apply env overrides
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_path(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment overrides through `lookup` so tests need not touch the process env
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Data directory overridden by {}: {}", DATA_DIR_ENV, dir);
            self.storage.data_directory = PathBuf::from(dir);
        }
        if let Some(addr) = lookup(BIND_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Bind address overridden by {}: {}", BIND_ADDR_ENV, addr);
            self.server.bind_addr = addr;
        }
    }
}
