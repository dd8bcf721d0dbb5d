use crate::{locale::SystemLocale, model::Item};

/// 候选来源抽象：core 不关心已安装的输入法从哪里来。
///
/// 约定：
/// - 返回的条目已经填好 provider/variant/locale/supports_rotation
/// - 同一列表内 `(provider_name, variant_index)` 唯一
pub trait VariantSource {
    /// 当前启用的全部条目（不要求有序）。
    fn enabled_items(&self, system: &SystemLocale) -> Vec<Item>;
}

impl VariantSource for Vec<Item> {
    fn enabled_items(&self, _system: &SystemLocale) -> Vec<Item> {
        self.clone()
    }
}

impl VariantSource for [Item] {
    fn enabled_items(&self, _system: &SystemLocale) -> Vec<Item> {
        self.to_vec()
    }
}
