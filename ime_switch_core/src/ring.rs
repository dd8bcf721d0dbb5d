//! `ring`：把候选列表按“是否支持循环切换”分成两个环。
//!
//! 两个环都来自同一次稳定排序，组内保持排序后的相对顺序。

use serde::{Deserialize, Serialize};

use crate::{comparator::compare_items, model::Item};

/// 导航方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// 下一个（越过末尾回到开头）
    Forward,
    /// 上一个（越过开头回到末尾）
    Backward,
}

impl Direction {
    pub fn from_forward(forward: bool) -> Self {
        if forward { Self::Forward } else { Self::Backward }
    }
}

/// 在长度为 `len` 的环上从 `index` 走一步；调用方保证 `len > 0`。
pub fn step(len: usize, index: usize, direction: Direction) -> usize {
    match direction {
        Direction::Forward => (index + 1) % len,
        Direction::Backward => (index + len - 1) % len,
    }
}

/// 一个环：`supports_rotation` 相同的条目，按比较器排好序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    items: Vec<Item>,
}

impl Ring {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    pub fn position(&self, item: &Item) -> Option<usize> {
        self.items.iter().position(|it| it == item)
    }
}

/// 分环结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rings {
    /// 支持循环切换的环（使用记录只作用于这里）
    pub aware: Ring,
    /// 不支持循环切换的环
    pub unaware: Ring,
}

impl Rings {
    /// 稳定排序后按 `supports_rotation` 过滤成两个环。
    pub fn partition(candidates: &[Item]) -> Self {
        let mut sorted: Vec<&Item> = candidates.iter().collect();
        sorted.sort_by(|a, b| compare_items(a, b));

        let (aware, unaware): (Vec<&Item>, Vec<&Item>) =
            sorted.into_iter().partition(|it| it.supports_rotation());
        Self {
            aware: Ring {
                items: aware.into_iter().cloned().collect(),
            },
            unaware: Ring {
                items: unaware.into_iter().cloned().collect(),
            },
        }
    }
}
