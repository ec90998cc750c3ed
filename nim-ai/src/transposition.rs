//! 置换表
//!
//! 用于缓存已搜索过的局面，避免重复计算。
//! 堆的身份不影响局面价值，因此键使用排序后的非空堆，
//! 互为置换的局面共享同一条目。

use std::collections::HashMap;

use nim_core::GameState;

/// 置换表键：规范化的 (局面, 走子方)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranspositionKey {
    /// 升序排列的非空堆
    piles: Vec<u32>,
    /// 是否轮到 MAX 走棋
    maximizing: bool,
}

impl TranspositionKey {
    pub fn new(state: &GameState, maximizing: bool) -> Self {
        let mut piles: Vec<u32> = state.piles().iter().copied().filter(|&p| p > 0).collect();
        piles.sort_unstable();
        Self { piles, maximizing }
    }

    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    pub fn maximizing(&self) -> bool {
        self.maximizing
    }
}

/// 置换表
///
/// 每次 `get_best_move` 调用独享一张表，调用结束即丢弃。
#[derive(Debug, Default)]
pub struct TranspositionTable {
    /// 条目
    entries: HashMap<TranspositionKey, i32>,
    /// 命中次数
    hits: u64,
    /// 查询次数
    probes: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询条目
    pub fn probe(&mut self, key: &TranspositionKey) -> Option<i32> {
        self.probes += 1;
        let value = self.entries.get(key).copied();
        if value.is_some() {
            self.hits += 1;
        }
        value
    }

    /// 存储条目
    pub fn store(&mut self, key: TranspositionKey, value: i32) {
        self.entries.insert(key, value);
    }

    /// 清空表
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.probes = 0;
    }

    /// 获取统计信息
    pub fn stats(&self) -> TTStats {
        TTStats {
            entries: self.entries.len(),
            hits: self.hits,
            probes: self.probes,
        }
    }
}

/// 置换表统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    pub entries: usize,
    pub hits: u64,
    pub probes: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64
        }
    }
}
