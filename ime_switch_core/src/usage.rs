//! `usage`：记录用户动作，并据此给出 aware 环的“有效顺序”。
//!
//! 只有支持循环切换的条目会被记录；对 unaware 条目的动作一律忽略。

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{model::Item, ring::Ring};

/// 使用记录的保留策略。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// 只记住最近一次使用的条目：它排到最前，其余保持排序顺序
    #[default]
    SinglePromotion,
    /// 记住完整的最近使用序列：按最近使用顺序排前，未使用过的保持排序顺序
    RecencyStack,
}

/// 使用记录（可序列化，便于快照与调试）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub policy: HistoryPolicy,
    /// 最近使用在前；`SinglePromotion` 下最多一项
    pub recent: Vec<Item>,
}

impl UsageRecord {
    pub fn most_recent(&self) -> Option<&Item> {
        self.recent.first()
    }
}

/// aware 环的使用记录维护者。
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    record: UsageRecord,
}

impl UsageTracker {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            record: UsageRecord {
                policy,
                recent: Vec::new(),
            },
        }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.record.policy
    }

    pub fn record(&self) -> &UsageRecord {
        &self.record
    }

    pub fn most_recent(&self) -> Option<&Item> {
        self.record.most_recent()
    }

    /// 记录一次用户动作；返回有效顺序是否因此改变。
    ///
    /// 条目必须支持循环切换且属于 `ring`，否则什么都不做。
    pub fn record_use(&mut self, ring: &Ring, item: &Item) -> bool {
        if !item.supports_rotation() {
            trace!(item = %item, "ignoring user action on rotation-unaware item");
            return false;
        }
        let Some(index) = ring.position(item) else {
            trace!(item = %item, "ignoring user action on unknown item");
            return false;
        };
        if self.record.most_recent() == Some(item) {
            return false;
        }
        // 以环内的条目为准，保证记录里的派生字段来自当前候选列表
        let member = ring.items()[index].clone();
        match self.record.policy {
            HistoryPolicy::SinglePromotion => {
                self.record.recent.clear();
                self.record.recent.push(member);
            }
            HistoryPolicy::RecencyStack => {
                self.record.recent.retain(|it| it != &member);
                self.record.recent.insert(0, member);
            }
        }
        debug!(item = %item, policy = ?self.record.policy, "promoted item in rotation order");
        true
    }

    /// 有效顺序：使用记录中的条目在前（最近的最前），其余按环内排序顺序。
    pub fn effective_order<'a>(&'a self, ring: &'a Ring) -> Vec<&'a Item> {
        let mut out: Vec<&Item> = Vec::with_capacity(ring.len());
        for used in &self.record.recent {
            if let Some(index) = ring.position(used) {
                out.push(&ring.items()[index]);
            }
        }
        for it in ring.items() {
            if !self.record.recent.contains(it) {
                out.push(it);
            }
        }
        out
    }

    /// 重建时的延续：只保留仍在新 aware 环中的记录，过期的静默丢弃。
    pub fn carried_into(&self, ring: &Ring) -> Self {
        let mut recent = Vec::with_capacity(self.record.recent.len());
        for used in &self.record.recent {
            match ring.position(used) {
                Some(index) => recent.push(ring.items()[index].clone()),
                None => debug!(item = %used, "dropping stale usage record"),
            }
        }
        Self {
            record: UsageRecord {
                policy: self.record.policy,
                recent,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{locale::SystemLocale, ring::Rings};

    struct Fixture {
        rings: Rings,
        en: Item,
        fr: Item,
        ja: Item,
        hi: Item,
    }

    fn fixture() -> Fixture {
        let system = SystemLocale::new("en_US");
        let en = Item::builder("P1").variant(0, "A").locale("en_US").rotation(true).build(&system);
        let fr = Item::builder("P1").variant(1, "B").locale("fr").rotation(true).build(&system);
        let ja = Item::builder("P2").locale("ja_JP").rotation(true).build(&system);
        let hi = Item::builder("P3").variant(0, "hi").locale("hi").rotation(false).build(&system);
        let rings = Rings::partition(&[en.clone(), fr.clone(), ja.clone(), hi.clone()]);
        Fixture { rings, en, fr, ja, hi }
    }

    fn order(tracker: &UsageTracker, ring: &Ring) -> Vec<Item> {
        tracker.effective_order(ring).into_iter().cloned().collect()
    }

    #[test]
    fn test_fresh_tracker_keeps_sorted_order() {
        let f = fixture();
        let tracker = UsageTracker::default();
        assert_eq!(tracker.policy(), HistoryPolicy::SinglePromotion);
        assert_eq!(order(&tracker, &f.rings.aware), vec![f.en, f.fr, f.ja]);
    }

    #[test]
    fn test_single_promotion_is_idempotent() {
        let f = fixture();
        let mut tracker = UsageTracker::new(HistoryPolicy::SinglePromotion);
        assert!(tracker.record_use(&f.rings.aware, &f.fr));
        assert_eq!(order(&tracker, &f.rings.aware), vec![f.fr.clone(), f.en.clone(), f.ja.clone()]);
        assert!(!tracker.record_use(&f.rings.aware, &f.fr));
        assert_eq!(order(&tracker, &f.rings.aware), vec![f.fr.clone(), f.en.clone(), f.ja.clone()]);

        // 只提升一次，不形成最近使用栈
        assert!(tracker.record_use(&f.rings.aware, &f.ja));
        assert_eq!(order(&tracker, &f.rings.aware), vec![f.ja, f.en, f.fr]);
    }

    #[test]
    fn test_recency_stack_keeps_history() {
        let f = fixture();
        let mut tracker = UsageTracker::new(HistoryPolicy::RecencyStack);
        tracker.record_use(&f.rings.aware, &f.fr);
        tracker.record_use(&f.rings.aware, &f.ja);
        assert_eq!(order(&tracker, &f.rings.aware), vec![f.ja.clone(), f.fr.clone(), f.en.clone()]);
        assert!(!tracker.record_use(&f.rings.aware, &f.ja));
        tracker.record_use(&f.rings.aware, &f.fr);
        assert_eq!(order(&tracker, &f.rings.aware), vec![f.fr, f.ja, f.en]);
    }

    #[test]
    fn test_unaware_and_unknown_items_are_ignored() {
        let f = fixture();
        let mut tracker = UsageTracker::default();
        assert!(!tracker.record_use(&f.rings.aware, &f.hi));
        let stranger = Item::builder("Unknown")
            .variant(0, "en_US")
            .locale("en_US")
            .rotation(true)
            .build(&SystemLocale::new("en_US"));
        assert!(!tracker.record_use(&f.rings.aware, &stranger));
        assert!(tracker.most_recent().is_none());
        assert_eq!(order(&tracker, &f.rings.unaware), vec![f.hi]);
    }

    #[test]
    fn test_carried_into_drops_stale_entries() {
        let f = fixture();
        let mut tracker = UsageTracker::new(HistoryPolicy::RecencyStack);
        tracker.record_use(&f.rings.aware, &f.en);
        tracker.record_use(&f.rings.aware, &f.ja);

        let smaller = Rings::partition(&[f.en.clone(), f.fr.clone()]);
        let carried = tracker.carried_into(&smaller.aware);
        assert_eq!(carried.record().recent, vec![f.en.clone()]);
        assert_eq!(carried.policy(), HistoryPolicy::RecencyStack);
        assert_eq!(order(&carried, &smaller.aware), vec![f.en, f.fr]);
    }

    #[test]
    fn test_usage_record_serializes() {
        let f = fixture();
        let mut tracker = UsageTracker::default();
        tracker.record_use(&f.rings.aware, &f.fr);
        let json = serde_json::to_value(tracker.record()).unwrap();
        assert_eq!(json["policy"], "single_promotion");
        assert_eq!(json["recent"][0]["provider_name"], "P1");
        assert_eq!(json["recent"][0]["locale_tag"], "fr");
    }
}
