//! 错误类型定义

use thiserror::Error;

/// 规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NimError {
    /// 非法走法（堆索引越界或取子数不在 1..=堆大小 内）
    #[error("Illegal move: take {count} from pile {pile} of {piles:?}")]
    IllegalMove {
        pile: usize,
        count: u32,
        piles: Vec<u32>,
    },

    /// 在非终局局面上询问胜者
    #[error("State is not terminal: {piles:?}")]
    NotTerminal { piles: Vec<u32> },

    /// 无效的局面描述
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, NimError>;
