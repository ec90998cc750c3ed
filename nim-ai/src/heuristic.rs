//! 启发式（反射）AI
//!
//! 基于 NIM-SUM 的反 Nim 闭式策略，O(堆数) 时间给出走法，
//! 同时作为搜索到达深度上限时的局面评估。

use std::time::Instant;

use nim_core::{GameState, Move, Rules};

use crate::agent::{AgentError, AgentResult, AgentStats, MoveProvider};

/// 胜
pub const WIN: i32 = 1;
/// 负
pub const LOSS: i32 = -1;

/// 算法名称
const ALGORITHM_NAME: &str = "Reflex";

/// 选择走法时使用的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 所有非空堆都只剩 1 个，只能取 1
    AllSingletons,
    /// 只有一个大堆：调整单子堆数的奇偶
    SingleBigPile,
    /// NIM-SUM = 0，必败局面
    LosingPosition,
    /// 使 NIM-SUM 归零
    ForceZeroNimSum,
    /// 兜底
    Fallback,
    /// 已终局，无走法
    Terminal,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::AllSingletons => "All piles have 1 counter",
            Strategy::SingleBigPile => "Single big pile (misere parity)",
            Strategy::LosingPosition => "NIM-SUM = 0 (losing position)",
            Strategy::ForceZeroNimSum => "Force NIM-SUM = 0 (winning position)",
            Strategy::Fallback => "Fallback strategy",
            Strategy::Terminal => "Terminal state",
        }
    }
}

/// 启发式 AI
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    pub fn new() -> Self {
        Self
    }

    /// 按反 Nim 理论选择走法
    pub fn choose(state: &GameState) -> (Option<Move>, Strategy) {
        if state.is_terminal() {
            return (None, Strategy::Terminal);
        }

        let ones = state.singleton_count();
        let chosen = match state.big_count() {
            0 => Rules::fallback_move(state).map(|mv| (mv, Strategy::AllSingletons)),
            1 => {
                // 大堆取完后只剩单子堆，要留给对手奇数个
                state.piles().iter().position(|&p| p > 1).map(|pile| {
                    let size = state.piles()[pile];
                    let keep = if ones % 2 == 0 { 1 } else { 0 };
                    (Move::new(pile, size - keep), Strategy::SingleBigPile)
                })
            }
            _ => {
                let nim_sum = state.nim_sum();
                if nim_sum == 0 {
                    Rules::fallback_move(state).map(|mv| (mv, Strategy::LosingPosition))
                } else {
                    state
                        .piles()
                        .iter()
                        .enumerate()
                        .find(|&(_, &p)| (p ^ nim_sum) < p)
                        .map(|(pile, &p)| {
                            (Move::new(pile, p - (p ^ nim_sum)), Strategy::ForceZeroNimSum)
                        })
                }
            }
        };

        match chosen {
            Some((mv, strategy)) => (Some(mv), strategy),
            None => (Rules::fallback_move(state), Strategy::Fallback),
        }
    }

    /// 轮到走棋的一方在完美对弈下是否获胜
    ///
    /// 全为单子堆时，单子堆数为偶数则走棋方胜（含终局）；否则 NIM-SUM 非零则胜。
    pub fn mover_wins(state: &GameState) -> bool {
        if state.big_count() == 0 {
            state.singleton_count() % 2 == 0
        } else {
            state.nim_sum() != 0
        }
    }

    /// 搜索截断时的评估值（MAX 视角）
    pub fn heuristic_value(state: &GameState, is_maximizing: bool) -> i32 {
        if Self::mover_wins(state) == is_maximizing {
            WIN
        } else {
            LOSS
        }
    }
}

impl MoveProvider for HeuristicAgent {
    fn name(&self) -> &str {
        ALGORITHM_NAME
    }

    fn select_move(&mut self, state: &GameState) -> Result<AgentResult, AgentError> {
        let started = Instant::now();
        let (mv, strategy) = Self::choose(state);

        let mut stats = AgentStats::new(ALGORITHM_NAME);
        stats.duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        stats.strategy = Some(strategy.label().to_string());
        stats.set_extra("nim_sum_before", state.nim_sum());

        tracing::debug!("启发式走法: {:?}, 策略: {}", mv, strategy.label());
        Ok(AgentResult::new(mv, stats))
    }
}
