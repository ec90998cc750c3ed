//! 反 Nim AI 引擎
//!
//! 包含:
//! - 统一的走法提供者接口
//! - 基于 NIM-SUM 的启发式（反射）AI
//! - Minimax + Alpha-Beta 搜索
//! - 置换表

mod agent;
mod heuristic;
mod search;
mod transposition;

pub use agent::{AgentError, AgentResult, AgentStats, MoveProvider};
pub use heuristic::{HeuristicAgent, Strategy, LOSS, WIN};
pub use search::{SearchAgent, SearchConfig, SearchOutcome};
pub use transposition::{TTStats, TranspositionKey, TranspositionTable};
