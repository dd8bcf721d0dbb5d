use std::{
    fs,
    path::{Path, PathBuf},
};

use ime_switch_core::{locale::SystemLocale, usage::HistoryPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

const APP_DIR: &str = "ime-switch";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// 系统 locale（例如 `en_US`）；用于给同名子类型排优先级
    #[serde(default = "default_system_locale")]
    pub system_locale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default)]
    pub history: HistoryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 输入法目录文件
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            system_locale: default_system_locale(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_system_locale() -> String {
    "en_US".to_string()
}

fn default_catalog_path() -> PathBuf {
    config_dir().join("catalog.toml")
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Config {
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// 读取配置；文件不存在时返回默认值（不落盘）。
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn system_locale(&self) -> SystemLocale {
        SystemLocale::new(self.locale.system_locale.as_str())
    }
}
