//! 难度预设

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NimError;
use crate::state::GameState;

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：4 堆，16 个棋子
    Easy,
    /// 中等：8 堆，64 个棋子
    Medium,
    /// 困难：10 堆，500 个棋子
    Hard,
    /// 极限：10 堆，2000 个棋子
    Extreme,
}

impl Difficulty {
    /// 所有难度
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Extreme,
        ]
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }

    /// 获取预设
    pub fn preset(&self) -> DifficultyPreset {
        match self {
            Difficulty::Easy => DifficultyPreset {
                difficulty: *self,
                description: "Light game for quick testing".to_string(),
                piles: vec![1, 3, 5, 7],
                total_counters: 16,
            },
            Difficulty::Medium => DifficultyPreset {
                difficulty: *self,
                description: "Moderate challenge with more piles".to_string(),
                piles: vec![1, 3, 5, 7, 9, 11, 13, 15],
                total_counters: 64,
            },
            Difficulty::Hard => DifficultyPreset {
                difficulty: *self,
                description: "Heavy challenge with 500 counters".to_string(),
                piles: vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 50],
                total_counters: 500,
            },
            Difficulty::Extreme => DifficultyPreset {
                difficulty: *self,
                description: "Extreme challenge with 2000 counters".to_string(),
                piles: vec![100, 150, 200, 250, 300, 350, 250, 200, 150, 50],
                total_counters: 2000,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Difficulty {
    type Err = NimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::all()
            .iter()
            .copied()
            .find(|d| d.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NimError::InvalidState {
                reason: format!("Unknown difficulty '{}'", s),
            })
    }
}

/// 难度预设：初始堆布局与总棋子数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyPreset {
    pub difficulty: Difficulty,
    pub description: String,
    pub piles: Vec<u32>,
    pub total_counters: u32,
}

impl DifficultyPreset {
    /// 初始局面
    pub fn initial_state(&self) -> GameState {
        GameState::new(self.piles.clone())
    }

    /// 总棋子数不超过上限时才允许使用搜索 AI
    pub fn search_admissible(&self, ceiling: u32) -> bool {
        self.total_counters <= ceiling
    }
}
