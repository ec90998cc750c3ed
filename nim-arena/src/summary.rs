//! 对局汇总

use chrono::{DateTime, Utc};
use nim_core::Player;
use serde::{Deserialize, Serialize};

use crate::controller::{EndReason, TurnRecord};

/// 单方统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub algorithm: String,
    pub moves_count: u32,
    pub total_time_ms: f64,
    pub avg_time_ms: f64,
    pub total_nodes: u64,
    /// 被替换为兜底走法的次数
    pub fallback_count: u32,
}

impl PlayerSummary {
    /// 从历史记录统计指定玩家
    pub(crate) fn collect(algorithm: &str, player: Player, history: &[TurnRecord]) -> Self {
        let turns: Vec<&TurnRecord> = history.iter().filter(|t| t.player == player).collect();
        let moves_count = turns.len() as u32;
        let total_time_ms: f64 = turns.iter().map(|t| t.stats.duration_ms).sum();
        let total_nodes = turns.iter().map(|t| t.stats.nodes_explored).sum();
        let fallback_count = turns.iter().filter(|t| t.stats.fallback_used).count() as u32;

        Self {
            algorithm: algorithm.to_string(),
            moves_count,
            total_time_ms,
            avg_time_ms: if moves_count > 0 {
                total_time_ms / moves_count as f64
            } else {
                0.0
            },
            total_nodes,
            fallback_count,
        }
    }
}

/// 对局汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// 胜者，未结束或异常终止时为 `None`
    pub winner: Option<Player>,
    pub loser: Option<Player>,
    pub total_moves: u32,
    pub match_duration_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub player1: PlayerSummary,
    pub player2: PlayerSummary,
}

impl MatchSummary {
    /// 指定玩家的统计
    pub fn player(&self, player: Player) -> &PlayerSummary {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }

    /// 胜方使用的算法
    pub fn winner_algorithm(&self) -> Option<&str> {
        self.winner.map(|p| self.player(p).algorithm.as_str())
    }
}
