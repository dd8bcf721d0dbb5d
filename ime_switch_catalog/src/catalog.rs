use std::{collections::HashSet, fs, path::Path};

use ime_switch_core::{locale::SystemLocale, model::Item, source::VariantSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;

/// 一个子类型（variant）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEntry {
    /// locale tag，例如 `en_US`
    pub locale: String,
    /// 展示名；省略时用 locale tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// 一个输入法（provider）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    #[serde(default)]
    pub supports_rotation: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 为空表示“单一无名子类型”
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantEntry>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "provider")]
    providers: Vec<ProviderEntry>,
}

/// TOML 格式的输入法目录：
///
/// ```toml
/// [[provider]]
/// name = "LatinIme"
/// supports_rotation = true
/// variants = [{ locale = "en_US" }, { locale = "fr", name = "French" }]
/// ```
///
/// `variants` 的下标即 `Item::variant_index`；`enabled = false` 的输入法不进入候选列表。
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    providers: Vec<ProviderEntry>,
}

impl Catalog {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&s)?;
        debug!(path = %path.display(), providers = catalog.providers.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(s)?;
        Self::from_providers(file.providers)
    }

    pub fn from_providers(providers: Vec<ProviderEntry>) -> Result<Self, CatalogError> {
        validate(&providers)?;
        Ok(Self { providers })
    }

    pub fn providers(&self) -> &[ProviderEntry] {
        &self.providers
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// 启用/禁用某个输入法；返回状态是否发生变化。
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<bool, CatalogError> {
        let provider = self
            .providers
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| CatalogError::UnknownProvider(name.to_string()))?;
        let changed = provider.enabled != enabled;
        provider.enabled = enabled;
        debug!(provider = name, enabled, changed, "updated provider state");
        Ok(changed)
    }

    /// 把某个输入法展开成条目（不论是否启用）。
    pub fn items_of(provider: &ProviderEntry, system: &SystemLocale) -> Vec<Item> {
        if provider.variants.is_empty() {
            return vec![
                Item::builder(provider.name.as_str())
                    .rotation(provider.supports_rotation)
                    .build(system),
            ];
        }
        provider
            .variants
            .iter()
            .enumerate()
            .map(|(index, v)| {
                let name = v.name.clone().unwrap_or_else(|| v.locale.clone());
                Item::builder(provider.name.as_str())
                    .variant(index, name)
                    .locale(v.locale.as_str())
                    .rotation(provider.supports_rotation)
                    .build(system)
            })
            .collect()
    }

    /// 全部条目，包括未启用的输入法。
    pub fn all_items(&self, system: &SystemLocale) -> Vec<Item> {
        self.providers
            .iter()
            .flat_map(|p| Self::items_of(p, system))
            .collect()
    }
}

/// 校验：provider 名非空且唯一；同一 provider 内 (locale, name) 不重复。
fn validate(providers: &[ProviderEntry]) -> Result<(), CatalogError> {
    let mut names: HashSet<&str> = HashSet::new();
    for (idx, p) in providers.iter().enumerate() {
        if p.name.trim().is_empty() {
            return Err(CatalogError::EmptyProviderName(idx + 1));
        }
        if !names.insert(p.name.as_str()) {
            return Err(CatalogError::DuplicateProvider(p.name.clone()));
        }
        let mut variants: HashSet<(&str, Option<&str>)> = HashSet::new();
        for (index, v) in p.variants.iter().enumerate() {
            if !variants.insert((v.locale.as_str(), v.name.as_deref())) {
                return Err(CatalogError::DuplicateVariant {
                    provider: p.name.clone(),
                    index,
                });
            }
        }
    }
    Ok(())
}

impl VariantSource for Catalog {
    fn enabled_items(&self, system: &SystemLocale) -> Vec<Item> {
        self.providers
            .iter()
            .filter(|p| p.enabled)
            .flat_map(|p| Self::items_of(p, system))
            .collect()
    }
}
