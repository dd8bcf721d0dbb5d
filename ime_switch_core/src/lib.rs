//! `ime_switch_core`：输入法切换顺序的纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **核心可复用**：CLI/GUI/服务端都能复用同一套切换逻辑
//! - **分层清晰**：model（条目） -> comparator（排序） -> ring（分环） -> usage（使用记录） -> controller（对外门面）
//! - **确定性**：相同候选列表 + 相同使用记录，总是得到相同的切换结果
//!
//! 并发约定：controller 本身不加锁，由上层在同一把锁内完成导航、用户动作与重建。
pub mod comparator;
pub mod controller;
pub mod locale;
pub mod model;
pub mod ring;
pub mod source;
pub mod usage;
