//! 走法提供者接口
//!
//! 对局控制器通过 [`MoveProvider`] 统一调用各类 AI。

use std::collections::BTreeMap;

use nim_core::{GameState, Move, NimError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// AI 失败原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// AI 主动报告失败
    #[error("Agent '{agent}' failed: {reason}")]
    Failed { agent: String, reason: String },

    /// AI 计算过程中 panic
    #[error("Agent '{agent}' panicked: {message}")]
    Panicked { agent: String, message: String },

    /// 局面未结束却没有给出走法
    #[error("Agent '{agent}' returned no move for live state {piles:?}")]
    NoMove { agent: String, piles: Vec<u32> },

    /// 给出了非法走法
    #[error("Agent '{agent}' proposed an illegal move: {source}")]
    IllegalMove {
        agent: String,
        #[source]
        source: NimError,
    },
}

/// 单步统计信息
///
/// 固定字段之外的诊断信息放在 `extra` 中，控制器原样透传。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    /// 算法名称
    pub algorithm: String,
    /// 耗时（毫秒）
    pub duration_ms: f64,
    /// 搜索节点数
    pub nodes_explored: u64,
    /// 剪枝次数
    pub prunes: u64,
    /// 置换表命中次数
    pub cache_hits: u64,
    /// 使用的策略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// 是否由控制器替换为兜底走法
    pub fallback_used: bool,
    /// 诊断备注
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// 其他诊断字段
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AgentStats {
    /// 创建指定算法的空统计
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            ..Self::default()
        }
    }

    /// 添加备注
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// 设置扩展字段
    pub fn set_extra(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.extra.insert(key.to_string(), value.into());
    }
}

/// AI 输出：走法（终局时为 `None`）和统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub mv: Option<Move>,
    pub stats: AgentStats,
}

impl AgentResult {
    pub fn new(mv: Option<Move>, stats: AgentStats) -> Self {
        Self { mv, stats }
    }
}

/// 走法提供者
pub trait MoveProvider {
    /// 算法名称
    fn name(&self) -> &str;

    /// 为当前局面选择走法
    fn select_move(&mut self, state: &GameState) -> Result<AgentResult, AgentError>;
}
