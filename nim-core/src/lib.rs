//! 反 Nim（Misère Nim）规则库
//!
//! 包含:
//! - 局面、走法、玩家等核心数据结构
//! - 走法生成和合法性验证
//! - 终局与反 Nim 胜负判定
//! - 难度预设

mod constants;
mod difficulty;
mod error;
mod rules;
mod state;

pub use constants::*;
pub use difficulty::{Difficulty, DifficultyPreset};
pub use error::{NimError, Result};
pub use rules::{Move, Rules};
pub use state::{GameInfo, GameState, Player};
