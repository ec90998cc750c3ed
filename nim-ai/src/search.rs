//! 搜索引擎
//!
//! 实现深度受限的 Minimax + Alpha-Beta 剪枝 + 置换表。
//! 反 Nim 只有胜负两种结果，估值只取 +1 / -1。

use std::time::{Duration, Instant};

use nim_core::{
    GameState, Move, Rules, DEFAULT_DEPTH_LIMIT, LARGE_GAME_THRESHOLD, REDUCED_DEPTH_LIMIT,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::{AgentError, AgentResult, AgentStats, MoveProvider};
use crate::heuristic::{HeuristicAgent, LOSS, WIN};
use crate::transposition::{TTStats, TranspositionKey, TranspositionTable};

/// 算法名称
const ALGORITHM_NAME: &str = "Alpha-Beta";

/// 剩余深度大于该值时才对走法排序
const ORDERING_MIN_DEPTH: u32 = 2;

/// 搜索配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 默认深度上限
    pub depth_limit: u32,
    /// 大规模局面的深度上限
    pub reduced_depth_limit: u32,
    /// 总棋子数超过该值时使用缩减深度
    pub large_game_threshold: u32,
}

impl SearchConfig {
    /// 根据局面规模选择深度上限
    pub fn depth_limit_for(&self, state: &GameState) -> u32 {
        if state.total() > u64::from(self.large_game_threshold) {
            self.reduced_depth_limit
        } else {
            self.depth_limit
        }
    }

    /// 固定深度（不随局面规模变化）
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth_limit: depth,
            reduced_depth_limit: depth,
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            reduced_depth_limit: REDUCED_DEPTH_LIMIT,
            large_game_threshold: LARGE_GAME_THRESHOLD,
        }
    }
}

/// 一次搜索的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// 最佳走法（终局时为 `None`）
    pub best_move: Option<Move>,
    /// 最佳走法的估值（MAX 视角），终局时为 `None`
    pub best_value: Option<i32>,
    pub nodes_explored: u64,
    pub prunes: u64,
    /// 置换表统计
    pub cache: TTStats,
    /// 根节点候选走法数
    pub candidate_moves: usize,
    pub depth_limit: u32,
    pub elapsed: Duration,
}

/// 搜索 AI
pub struct SearchAgent {
    config: SearchConfig,
    nodes_explored: u64,
    prunes: u64,
    table: TranspositionTable,
}

impl SearchAgent {
    /// 创建新的搜索 AI
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            nodes_explored: 0,
            prunes: 0,
            table: TranspositionTable::new(),
        }
    }

    /// 搜索最佳走法
    pub fn get_best_move(&mut self, state: &GameState) -> SearchOutcome {
        let started = Instant::now();
        self.nodes_explored = 0;
        self.prunes = 0;
        // 置换表只在本次调用内有效
        self.table.clear();

        let depth_limit = self.config.depth_limit_for(state);

        if Rules::is_terminal(state) {
            return self.outcome(None, None, 0, depth_limit, started);
        }

        let moves = ordered_moves(state, true);
        let mut best_move = None;
        let mut best_value = i32::MIN;
        let mut alpha = i32::MIN;

        for mv in &moves {
            let Ok(child) = Rules::apply(state, mv) else {
                continue;
            };

            // 根节点已展开一层
            let value = self.alpha_beta(
                &child,
                false,
                alpha,
                i32::MAX,
                depth_limit.saturating_sub(1),
            );

            if best_move.is_none() || value > best_value {
                best_value = value;
                best_move = Some(*mv);
            }
            alpha = alpha.max(value);

            // 已找到必胜走法
            if value == WIN {
                break;
            }
        }

        let outcome = self.outcome(
            best_move,
            best_move.map(|_| best_value),
            moves.len(),
            depth_limit,
            started,
        );
        debug!(
            "搜索完成: {} 最佳 {:?} 估值 {:?}, 节点 {}, 剪枝 {}, 命中 {}, 耗时 {:?}",
            state,
            outcome.best_move,
            outcome.best_value,
            outcome.nodes_explored,
            outcome.prunes,
            outcome.cache.hits,
            outcome.elapsed
        );
        outcome
    }

    /// Alpha-Beta 搜索
    fn alpha_beta(
        &mut self,
        state: &GameState,
        is_maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        depth: u32,
    ) -> i32 {
        self.nodes_explored += 1;

        let key = TranspositionKey::new(state, is_maximizing);
        if let Some(value) = self.table.probe(&key) {
            return value;
        }

        // 终局：轮到走棋的一方获胜
        if state.is_terminal() {
            return if is_maximizing { WIN } else { LOSS };
        }

        // 到达深度限制，返回评估值
        if depth == 0 {
            let value = HeuristicAgent::heuristic_value(state, is_maximizing);
            self.table.store(key, value);
            return value;
        }

        let moves = ordered_moves(state, depth > ORDERING_MIN_DEPTH);
        let mut value = if is_maximizing { i32::MIN } else { i32::MAX };

        for (i, mv) in moves.iter().enumerate() {
            let Ok(child) = Rules::apply(state, mv) else {
                continue;
            };
            let score = self.alpha_beta(&child, !is_maximizing, alpha, beta, depth - 1);

            // 达到本方最好结果后无需再搜，同时保证返回值是精确值而非边界
            let decided = if is_maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
                value == WIN
            } else {
                value = value.min(score);
                beta = beta.min(value);
                value == LOSS
            };

            if decided || alpha >= beta {
                if i + 1 < moves.len() {
                    self.prunes += 1;
                }
                break;
            }
        }

        self.table.store(key, value);
        value
    }

    fn outcome(
        &self,
        best_move: Option<Move>,
        best_value: Option<i32>,
        candidate_moves: usize,
        depth_limit: u32,
        started: Instant,
    ) -> SearchOutcome {
        SearchOutcome {
            best_move,
            best_value,
            nodes_explored: self.nodes_explored,
            prunes: self.prunes,
            cache: self.table.stats(),
            candidate_moves,
            depth_limit,
            elapsed: started.elapsed(),
        }
    }
}

impl Default for SearchAgent {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl MoveProvider for SearchAgent {
    fn name(&self) -> &str {
        ALGORITHM_NAME
    }

    fn select_move(&mut self, state: &GameState) -> Result<AgentResult, AgentError> {
        let outcome = self.get_best_move(state);

        let mut stats = AgentStats::new(ALGORITHM_NAME);
        stats.duration_ms = outcome.elapsed.as_secs_f64() * 1000.0;
        stats.nodes_explored = outcome.nodes_explored;
        stats.prunes = outcome.prunes;
        stats.cache_hits = outcome.cache.hits;
        if let Some(value) = outcome.best_value {
            stats.set_extra("best_value", value);
        }
        stats.set_extra("total_possible_moves", outcome.candidate_moves);
        stats.set_extra("depth_limit", outcome.depth_limit);
        stats.set_extra("cache_entries", outcome.cache.entries);
        stats.set_extra("cache_hit_rate", outcome.cache.hit_rate());

        Ok(AgentResult::new(outcome.best_move, stats))
    }
}

/// 生成走法，需要时按取子数降序排列（稳定排序，同数量保持堆顺序）
fn ordered_moves(state: &GameState, sort: bool) -> Vec<Move> {
    let mut moves = Rules::legal_moves(state);
    if sort {
        moves.sort_by(|a, b| b.count.cmp(&a.count));
    }
    moves
}
