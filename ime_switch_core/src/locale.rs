//! `locale`：系统 locale 上下文。
//!
//! core 不负责解析“系统 locale 是什么”，只把外部给定的 tag 当成不透明字符串做比较。

use serde::{Deserialize, Serialize};

/// 语言子标签的最小长度；更短的子标签（例如 `"e"`）不参与语言匹配。
const MIN_LANGUAGE_LEN: usize = 2;

/// locale 优先级分类：数值越小越靠前。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocaleRank {
    /// 与系统 locale 完全一致（忽略 ASCII 大小写）
    SystemLocale,
    /// 语言子标签与系统一致，但 locale 不完全一致
    SystemLanguage,
    /// 其他（包括空 tag）
    Other,
}

/// 系统 locale（例如 `en_US`），由外部 locale 提供方给出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLocale {
    tag: String,
    language: String,
}

impl SystemLocale {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let language = language_of(&tag).to_owned();
        Self { tag, language }
    }

    /// 原始 tag。
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 语言子标签（`en_US` -> `en`）。
    pub fn language(&self) -> &str {
        &self.language
    }

    /// 计算某个 locale tag 相对系统 locale 的优先级。
    pub fn rank(&self, locale_tag: &str) -> LocaleRank {
        if self.tag.is_empty() || locale_tag.is_empty() {
            return LocaleRank::Other;
        }
        if self.tag.eq_ignore_ascii_case(locale_tag) {
            return LocaleRank::SystemLocale;
        }
        let language = language_of(locale_tag);
        if self.language.len() >= MIN_LANGUAGE_LEN && self.language.eq_ignore_ascii_case(language) {
            LocaleRank::SystemLanguage
        } else {
            LocaleRank::Other
        }
    }
}

/// 取 `_` 或 `-` 之前的部分作为语言子标签。
pub fn language_of(locale_tag: &str) -> &str {
    locale_tag
        .split(['_', '-'])
        .next()
        .unwrap_or(locale_tag)
}
