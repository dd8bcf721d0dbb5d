use std::{io, path::PathBuf};

use thiserror::Error;

/// 目录加载/修改时的错误。
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("provider #{0} has an empty name")]
    EmptyProviderName(usize),

    #[error("provider {0:?} is declared more than once")]
    DuplicateProvider(String),

    #[error("provider {provider:?}: variant #{index} duplicates an earlier variant")]
    DuplicateVariant { provider: String, index: usize },

    #[error("unknown provider {0:?}")]
    UnknownProvider(String),
}

/// 配置读写错误。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
