//! 反 Nim 对局平台
//!
//! 包含:
//! - 对局控制（回合状态机、故障隔离、统计汇总）
//! - AI 注册表
//! - 平台设置
//! - 批量基准测试与 CSV 导出

pub mod benchmark;
pub mod controller;
pub mod error;
pub mod registry;
pub mod settings;
pub mod summary;

pub use benchmark::{random_layout, BenchmarkConfig, BenchmarkReport, TrialRow};
pub use controller::{EndReason, MatchController, MatchPhase, Seat, TurnRecord};
pub use error::{ArenaError, Result};
pub use registry::AgentKind;
pub use settings::ArenaSettings;
pub use summary::{MatchSummary, PlayerSummary};
