//! 错误类型定义

use nim_core::{NimError, Player};
use thiserror::Error;

/// 对局平台错误
#[derive(Error, Debug)]
pub enum ArenaError {
    /// 未知的算法名称（配置错误）
    #[error("Unknown algorithm: '{name}'")]
    UnknownAlgorithm { name: String },

    /// 局面过大，不允许使用搜索 AI
    #[error("Search agent not admissible: {total} counters exceeds ceiling {ceiling}")]
    SearchNotAdmissible { total: u64, ceiling: u32 },

    /// 该场景不支持人类玩家
    #[error("Human seats are not supported here")]
    HumanSeat,

    /// 等待人类玩家走棋
    #[error("Waiting for a move from {player}")]
    HumanTurnPending { player: Player },

    /// 当前不是人类玩家的回合
    #[error("Not a human turn")]
    NotHumanTurn,

    /// 对局已结束
    #[error("Match is already over")]
    MatchOver,

    /// 规则错误
    #[error("Rule error: {0}")]
    Rules(#[from] NimError),
}

/// 对局平台操作结果类型
pub type Result<T> = std::result::Result<T, ArenaError>;
