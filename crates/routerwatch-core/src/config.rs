use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::RouterWatchError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub router: RouterConfig,
    pub pages: PageConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

/// Relative page names served by the router's web UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    pub line_stats: String,
    pub wan_status: String,
    pub system_details: String,
    pub attached_devices: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    pub interval_secs: u64,
    pub columns: usize,
    pub connect_drift_secs: i64,
    pub redraw: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Append-only event log. `${DATA_DIR}` expands to the project data dir.
    pub log_file: Option<String>,
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            router: RouterConfig {
                base_url: "http://192.168.0.1".to_string(),
                username: "admin".to_string(),
                password: "sky".to_string(),
                timeout_secs: 10,
            },
            pages: PageConfig {
                line_stats: "sky_system.html".to_string(),
                wan_status: "sky_st_poe.html".to_string(),
                system_details: "sky_router_status.html".to_string(),
                attached_devices: "sky_attached_devices.html".to_string(),
            },
            monitor: MonitorConfig {
                interval_secs: 30,
                columns: 3,
                connect_drift_secs: 60,
                redraw: true,
            },
            logging: LoggingConfig {
                log_file: None,
                level: "info".to_string(),
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RouterWatchError> {
        if self.router.base_url.trim().is_empty() {
            return Err(RouterWatchError::InvalidConfig(
                "router.base_url must not be empty".to_string(),
            ));
        }
        if self.monitor.columns == 0 {
            return Err(RouterWatchError::InvalidConfig(
                "monitor.columns must be at least 1".to_string(),
            ));
        }
        if self.monitor.interval_secs == 0 {
            return Err(RouterWatchError::InvalidConfig(
                "monitor.interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_path(&self, paths: &ConfigPaths) -> Option<PathBuf> {
        self.logging
            .log_file
            .as_deref()
            .map(|template| expand_path_template(template, paths))
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "routerwatch", "routerwatch")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        Ok(Self {
            config_path: project_dirs.config_dir().join("config.toml"),
            data_dir: project_dirs.data_dir().to_path_buf(),
        })
    }
}

pub fn expand_path_template(template: &str, paths: &ConfigPaths) -> PathBuf {
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| "/".to_string());
    let replaced = template
        .replace("${HOME}", &home_dir)
        .replace("${DATA_DIR}", &paths.data_dir.to_string_lossy());
    PathBuf::from(replaced)
}
