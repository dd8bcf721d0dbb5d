//! `SwitchingController`：对上层提供的切换门面。
//!
//! 状态 = 候选列表 + 两个环 + aware 环的使用记录：
//! - `rebuild_from`：整体替换全部状态（可延续旧 controller 的使用记录）
//! - `record_user_action`：只更新使用记录
//! - `get_next`：纯查询，不改状态

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    comparator,
    locale::SystemLocale,
    model::Item,
    ring::{step, Direction, Rings},
    source::VariantSource,
    usage::{HistoryPolicy, UsageRecord, UsageTracker},
};

/// controller 的只读快照（用于调试输出 / 序列化）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    /// aware 环的有效顺序
    pub aware: Vec<Item>,
    /// unaware 环的顺序
    pub unaware: Vec<Item>,
    pub usage: UsageRecord,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchingController {
    /// 当前候选列表（输入顺序）
    candidates: Vec<Item>,
    rings: Rings,
    usage: UsageTracker,
}

impl SwitchingController {
    /// 首次构造：没有使用记录。
    pub fn new(candidates: Vec<Item>, policy: HistoryPolicy) -> Self {
        warn_on_duplicates(&candidates);
        let rings = Rings::partition(&candidates);
        debug!(
            aware = rings.aware.len(),
            unaware = rings.unaware.len(),
            "built switching rings"
        );
        Self {
            candidates,
            rings,
            usage: UsageTracker::new(policy),
        }
    }

    /// 从新的候选列表重建；若旧 controller 的使用记录仍然有效，则延续下去。
    ///
    /// 记录按值相等（provider + variant 下标 + locale）匹配，而不是按对象身份。
    pub fn rebuild_from(previous: Option<&Self>, candidates: Vec<Item>) -> Self {
        let policy = previous.map(|p| p.usage.policy()).unwrap_or_default();
        let mut next = Self::new(candidates, policy);
        if let Some(prev) = previous {
            next.usage = prev.usage.carried_into(&next.rings.aware);
            debug!(
                carried = next.usage.record().recent.len(),
                "carried usage record into rebuilt controller"
            );
        }
        next
    }

    /// 从候选来源重建（来源负责过滤掉未启用的输入法）。
    pub fn rebuild_from_source<S>(previous: Option<&Self>, source: &S, system: &SystemLocale) -> Self
    where
        S: VariantSource + ?Sized,
    {
        Self::rebuild_from(previous, source.enabled_items(system))
    }

    /// 计算下一个/上一个切换目标。
    ///
    /// - 当前条目不在任何环里：`None`
    /// - `only_current_provider`：只在同一 provider 的条目间轮转
    /// - 可轮转的条目少于 2 个：`None`（不能切到自己）
    pub fn get_next(
        &self,
        only_current_provider: bool,
        current: &Item,
        direction: Direction,
    ) -> Option<&Item> {
        let order: Vec<&Item> = if self.rings.aware.contains(current) {
            self.usage.effective_order(&self.rings.aware)
        } else if self.rings.unaware.contains(current) {
            self.rings.unaware.items().iter().collect()
        } else {
            return None;
        };

        let order: Vec<&Item> = if only_current_provider {
            order
                .into_iter()
                .filter(|it| it.provider_name() == current.provider_name())
                .collect()
        } else {
            order
        };
        if order.len() < 2 {
            return None;
        }
        let index = order.iter().position(|it| *it == current)?;
        Some(order[step(order.len(), index, direction)])
    }

    /// 按 (provider, variant 下标) 定位当前条目后再计算切换目标。
    pub fn get_next_for(
        &self,
        only_current_provider: bool,
        provider_name: &str,
        variant_index: Option<usize>,
        direction: Direction,
    ) -> Option<&Item> {
        let current = self.find(provider_name, variant_index)?;
        self.get_next(only_current_provider, current, direction)
    }

    /// 用户对某个条目做了动作（例如在其上输入了文字）。
    ///
    /// 只影响 aware 环；未知条目或 unaware 条目直接忽略。
    pub fn record_user_action(&mut self, item: &Item) {
        self.usage.record_use(&self.rings.aware, item);
    }

    pub fn find(&self, provider_name: &str, variant_index: Option<usize>) -> Option<&Item> {
        self.candidates
            .iter()
            .find(|it| it.is_same_variant(provider_name, variant_index))
    }

    pub fn candidates(&self) -> &[Item] {
        &self.candidates
    }

    /// 全部候选按比较器排序（用于选择器 UI）。
    pub fn sorted_candidates(&self) -> Vec<Item> {
        comparator::sorted(&self.candidates)
    }

    pub fn rings(&self) -> &Rings {
        &self.rings
    }

    pub fn usage(&self) -> &UsageRecord {
        self.usage.record()
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.usage.policy()
    }

    /// aware 环当前的有效顺序。
    pub fn aware_order(&self) -> Vec<&Item> {
        self.usage.effective_order(&self.rings.aware)
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            aware: self.aware_order().into_iter().cloned().collect(),
            unaware: self.rings.unaware.items().to_vec(),
            usage: self.usage.record().clone(),
        }
    }

    /// 逐行输出两个环的当前顺序。
    pub fn dump_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.push("switching-aware rotation:".to_string());
        for (i, it) in self.aware_order().into_iter().enumerate() {
            out.push(format!("  {i}: {it}"));
        }
        out.push("switching-unaware rotation:".to_string());
        for (i, it) in self.rings.unaware.items().iter().enumerate() {
            out.push(format!("  {i}: {it}"));
        }
        out
    }
}

fn warn_on_duplicates(candidates: &[Item]) {
    let mut seen: HashSet<(&str, Option<usize>)> = HashSet::with_capacity(candidates.len());
    for it in candidates {
        if !seen.insert((it.provider_name(), it.variant_index())) {
            warn!(item = %it, "duplicate (provider, variant) in candidate list");
        }
    }
}
