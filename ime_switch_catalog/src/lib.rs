//! `ime_switch_catalog`：输入法目录（候选来源）与用户配置，负责全部文件 I/O。
pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{CatalogError, ConfigError};
