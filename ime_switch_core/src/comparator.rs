//! `comparator`：条目的全序比较，用于生成规范的参考顺序。
//!
//! 排序键（优先级从高到低）：
//! - provider 名（字节序升序，空串排最后）
//! - variant 名（缺省视为空串，同样空串排最后）
//! - locale 优先级：系统 locale < 系统语言 < 其他；“其他”之间互相视为相等

use std::cmp::Ordering;

use crate::model::Item;

/// 比较两个可能为空的名字：非空按字节序升序，空串排在所有非空之后。
fn compare_names(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => a.cmp(b),
        (empty_a, empty_b) => empty_a.cmp(&empty_b),
    }
}

impl Item {
    /// 按切换顺序比较两个条目。
    ///
    /// 与 `==` 不一致：locale 都不属于系统语言的两个条目可能比较相等但 `!=`。
    pub fn compare(&self, other: &Item) -> Ordering {
        compare_names(self.provider_name(), other.provider_name())
            .then_with(|| {
                compare_names(
                    self.variant_name().unwrap_or_default(),
                    other.variant_name().unwrap_or_default(),
                )
            })
            .then_with(|| self.locale_rank().cmp(&other.locale_rank()))
    }
}

/// 供 `sort_by` 使用的比较函数。
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    a.compare(b)
}

/// 稳定排序：比较相等的条目保持输入顺序。
pub fn sorted(items: &[Item]) -> Vec<Item> {
    let mut out = items.to_vec();
    out.sort_by(compare_items);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::SystemLocale;

    fn item(provider: &str, name: &str, locale: &str, index: usize, system: &str) -> Item {
        Item::builder(provider)
            .variant(index, name)
            .locale(locale)
            .rotation(true)
            .build(&SystemLocale::new(system))
    }

    #[test]
    fn test_strict_order_grid() {
        let mut items = Vec::new();
        let mut index = 0;
        for provider in ["X", "Y", ""] {
            for name in ["A", "Z", ""] {
                for locale in ["en_US", "en", "ja"] {
                    items.push(item(provider, name, locale, index, "en_US"));
                    index += 1;
                }
            }
        }

        for (i, a) in items.iter().enumerate() {
            assert_eq!(a.compare(a), Ordering::Equal);
            for b in &items[i + 1..] {
                assert_eq!(a.compare(b), Ordering::Less, "{a} < {b}");
                assert_eq!(b.compare(a), Ordering::Greater, "{b} > {a}");
            }
        }
    }

    #[test]
    fn test_non_system_locales_tie() {
        let ja = item("X", "A", "ja_JP", 0, "en_us");
        let hi = item("X", "A", "hi_IN", 1, "en_us");
        assert_eq!(ja.compare(&hi), Ordering::Equal);
        assert_eq!(hi.compare(&ja), Ordering::Equal);
        assert_ne!(ja, hi);
    }

    #[test]
    fn test_missing_variant_name_sorts_like_empty() {
        let system = SystemLocale::new("en_US");
        let bare = Item::builder("X").build(&system);
        let empty = item("X", "", "", 0, "en_US");
        let named = item("X", "A", "", 1, "en_US");
        assert_eq!(bare.compare(&empty), Ordering::Equal);
        assert_eq!(named.compare(&bare), Ordering::Less);
    }

    #[test]
    fn test_sorted_is_stable_for_ties() {
        let ja = item("X", "A", "ja", 0, "en_US");
        let hi = item("X", "A", "hi", 1, "en_US");
        let en = item("X", "A", "en", 2, "en_US");
        let out = sorted(&[ja.clone(), hi.clone(), en.clone()]);
        assert_eq!(out, vec![en.clone(), ja.clone(), hi.clone()]);
        let out = sorted(&[hi.clone(), ja.clone(), en.clone()]);
        assert_eq!(out, vec![en, hi, ja]);
    }
}
