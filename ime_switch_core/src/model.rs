use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::locale::{LocaleRank, SystemLocale};

/// 可切换的输入法条目：一个输入法（provider）加上可选的子类型（variant）。
///
/// 注意：
/// - 相等性只看 `(provider_name, variant_index, locale_tag)`，派生字段不参与
/// - `locale_rank` 在构造时根据系统 locale 计算一次，之后不再变化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// 输入法标识
    provider_name: String,
    /// 子类型展示名；单一无名子类型的输入法为 `None`
    variant_name: Option<String>,
    /// 子类型在其输入法中的下标；`None` 表示“没有子类型”
    variant_index: Option<usize>,
    /// locale tag（例如 `en_US`），可以为空
    locale_tag: String,
    /// 是否直接参与循环切换
    supports_rotation: bool,
    /// 相对系统 locale 的优先级
    locale_rank: LocaleRank,
}

impl Item {
    pub fn builder(provider_name: impl Into<String>) -> ItemBuilder {
        ItemBuilder {
            provider_name: provider_name.into(),
            variant_name: None,
            variant_index: None,
            locale_tag: String::new(),
            supports_rotation: false,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn variant_name(&self) -> Option<&str> {
        self.variant_name.as_deref()
    }

    pub fn variant_index(&self) -> Option<usize> {
        self.variant_index
    }

    pub fn locale_tag(&self) -> &str {
        &self.locale_tag
    }

    pub fn supports_rotation(&self) -> bool {
        self.supports_rotation
    }

    pub fn locale_rank(&self) -> LocaleRank {
        self.locale_rank
    }

    /// locale 与系统 locale 完全一致。
    pub fn is_system_locale(&self) -> bool {
        self.locale_rank == LocaleRank::SystemLocale
    }

    /// 语言与系统一致（完全一致的 locale 也算）。
    pub fn is_system_language(&self) -> bool {
        self.locale_rank <= LocaleRank::SystemLanguage
    }

    /// 是否指向同一个 (provider, variant)。
    pub fn is_same_variant(&self, provider_name: &str, variant_index: Option<usize>) -> bool {
        self.provider_name == provider_name && self.variant_index == variant_index
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.provider_name == other.provider_name
            && self.variant_index == other.variant_index
            && self.locale_tag == other.locale_tag
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider_name.hash(state);
        self.variant_index.hash(state);
        self.locale_tag.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.provider_name)?;
        if let Some(name) = &self.variant_name {
            write!(f, " / {name}")?;
        }
        if !self.locale_tag.is_empty() {
            write!(f, " ({})", self.locale_tag)?;
        }
        Ok(())
    }
}

/// `Item` 构造器；`build` 时根据系统 locale 计算派生字段。
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    provider_name: String,
    variant_name: Option<String>,
    variant_index: Option<usize>,
    locale_tag: String,
    supports_rotation: bool,
}

impl ItemBuilder {
    /// 设置子类型下标与展示名。
    pub fn variant(mut self, index: usize, name: impl Into<String>) -> Self {
        self.variant_index = Some(index);
        self.variant_name = Some(name.into());
        self
    }

    /// 只设置子类型下标（无展示名）。
    pub fn variant_index(mut self, index: usize) -> Self {
        self.variant_index = Some(index);
        self
    }

    pub fn locale(mut self, tag: impl Into<String>) -> Self {
        self.locale_tag = tag.into();
        self
    }

    pub fn rotation(mut self, supports_rotation: bool) -> Self {
        self.supports_rotation = supports_rotation;
        self
    }

    pub fn build(self, system: &SystemLocale) -> Item {
        let locale_rank = system.rank(&self.locale_tag);
        Item {
            provider_name: self.provider_name,
            variant_name: self.variant_name,
            variant_index: self.variant_index,
            locale_tag: self.locale_tag,
            supports_rotation: self.supports_rotation,
            locale_rank,
        }
    }
}
