//! 局面与玩家

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NimError;

/// 玩家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// 先手
    One,
    /// 后手
    Two,
}

impl Player {
    /// 获取对手
    pub fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 玩家编号（1 或 2）
    pub fn number(&self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// 座位索引（0 或 1）
    pub fn index(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// 局面：每堆剩余棋子数
///
/// 值语义，创建后不可变；所有状态转移都返回新的局面。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    piles: Vec<u32>,
}

impl GameState {
    /// 从各堆大小创建局面
    pub fn new(piles: Vec<u32>) -> Self {
        Self { piles }
    }

    /// 各堆大小
    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    /// 堆数
    pub fn len(&self) -> usize {
        self.piles.len()
    }

    /// 是否没有任何堆
    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// 指定堆的大小
    pub fn pile(&self, index: usize) -> Option<u32> {
        self.piles.get(index).copied()
    }

    /// 剩余棋子总数（按 u64 累加，多个大堆相加不会溢出）
    pub fn total(&self) -> u64 {
        self.piles.iter().map(|&p| u64::from(p)).sum()
    }

    /// 所有堆均为空
    pub fn is_terminal(&self) -> bool {
        self.piles.iter().all(|&p| p == 0)
    }

    /// NIM-SUM：所有堆大小的异或
    pub fn nim_sum(&self) -> u32 {
        self.piles.iter().fold(0, |acc, &p| acc ^ p)
    }

    /// 恰好只剩 1 个棋子的堆数
    pub fn singleton_count(&self) -> usize {
        self.piles.iter().filter(|&&p| p == 1).count()
    }

    /// 棋子数大于 1 的堆数
    pub fn big_count(&self) -> usize {
        self.piles.iter().filter(|&&p| p > 1).count()
    }

    /// 第一个非空堆的索引
    pub fn first_nonempty(&self) -> Option<usize> {
        self.piles.iter().position(|&p| p > 0)
    }

    /// 排序后的堆（置换等价的局面得到同一结果）
    pub fn sorted_piles(&self) -> Vec<u32> {
        let mut piles = self.piles.clone();
        piles.sort_unstable();
        piles
    }

    /// 统计信息
    pub fn info(&self) -> GameInfo {
        GameInfo {
            total_counters: self.total(),
            active_piles: self.piles.iter().filter(|&&p| p > 0).count(),
            empty_piles: self.piles.iter().filter(|&&p| p == 0).count(),
            total_piles: self.piles.len(),
        }
    }

    /// 生成指定堆减少 `count` 后的新局面（不检查规则，内部使用）
    pub(crate) fn with_taken(&self, pile: usize, count: u32) -> Self {
        let mut piles = self.piles.clone();
        piles[pile] -= count;
        Self { piles }
    }
}

impl From<Vec<u32>> for GameState {
    fn from(piles: Vec<u32>) -> Self {
        Self::new(piles)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.piles)
    }
}

/// 解析形如 `1,3,5,7` 或 `[1, 3, 5, 7]` 的局面描述
impl FromStr for GameState {
    type Err = NimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        if trimmed.trim().is_empty() {
            return Err(NimError::InvalidState {
                reason: "Empty pile list".to_string(),
            });
        }

        let piles = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>().map_err(|e| NimError::InvalidState {
                    reason: format!("Bad pile size '{}': {}", part, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let state = Self::new(piles);
        if state.total() > u64::from(u32::MAX) {
            return Err(NimError::InvalidState {
                reason: format!("Total counters {} exceeds {}", state.total(), u32::MAX),
            });
        }
        Ok(state)
    }
}

/// 局面统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub total_counters: u64,
    pub active_piles: usize,
    pub empty_piles: usize,
    pub total_piles: usize,
}
