//! 对局控制
//!
//! 回合状态机：每回合调用一方 AI，校验并修正其输出，执行走法，
//! 判定终局并汇总统计。AI 出错、panic 或给出非法走法时替换为兜底走法，
//! 对局继续进行。

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use nim_ai::{AgentError, AgentResult, AgentStats, MoveProvider, SearchConfig};
use nim_core::{GameState, Move, Player, Rules};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{ArenaError, Result};
use crate::registry::AgentKind;
use crate::settings::ArenaSettings;
use crate::summary::{MatchSummary, PlayerSummary};

/// 人类玩家的算法标签
const HUMAN_LABEL: &str = "Human";

/// 对局阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// 尚未走第一步
    Ready,
    /// 进行中
    InProgress,
    /// 已结束
    Over,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// 一方取走了最后一个棋子
    LastCounterTaken,
    /// 轮到走棋时局面已是终局
    AlreadyTerminal,
    /// 步数超过总棋子数，逻辑错误
    InvariantViolation,
}

enum SeatKind {
    Agent(Box<dyn MoveProvider>),
    Human,
}

/// 座位：AI 或人类
pub struct Seat {
    label: String,
    kind: SeatKind,
}

impl Seat {
    /// AI 座位，标签取算法名称
    pub fn agent(provider: Box<dyn MoveProvider>) -> Self {
        Self {
            label: provider.name().to_string(),
            kind: SeatKind::Agent(provider),
        }
    }

    /// 人类座位
    pub fn human() -> Self {
        Self {
            label: HUMAN_LABEL.to_string(),
            kind: SeatKind::Human,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_human(&self) -> bool {
        matches!(self.kind, SeatKind::Human)
    }
}

impl fmt::Debug for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seat")
            .field("label", &self.label)
            .field("human", &self.is_human())
            .finish()
    }
}

/// 单步记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub move_number: u32,
    pub player: Player,
    pub algorithm: String,
    pub mv: Move,
    pub state_after: GameState,
    pub stats: AgentStats,
    pub game_over: bool,
    pub winner: Option<Player>,
    pub loser: Option<Player>,
}

/// 对局控制器
#[derive(Debug)]
pub struct MatchController {
    initial_state: GameState,
    state: GameState,
    seats: [Seat; 2],
    current_player: Player,
    phase: MatchPhase,
    winner: Option<Player>,
    end_reason: Option<EndReason>,
    notes: Vec<String>,
    history: Vec<TurnRecord>,
    /// 步数上限：每步至少取 1 个，总步数不会超过初始棋子数
    move_limit: u64,
    started_at: Option<Instant>,
    started_at_utc: Option<DateTime<Utc>>,
    turn_started: Option<Instant>,
    duration: Duration,
}

impl MatchController {
    /// 创建新对局，玩家 1 先手
    pub fn new(initial_state: GameState, player1: Seat, player2: Seat) -> Self {
        let move_limit = initial_state.total();
        Self {
            state: initial_state.clone(),
            initial_state,
            seats: [player1, player2],
            current_player: Player::One,
            phase: MatchPhase::Ready,
            winner: None,
            end_reason: None,
            notes: Vec::new(),
            history: Vec::new(),
            move_limit,
            started_at: None,
            started_at_utc: None,
            turn_started: None,
            duration: Duration::ZERO,
        }
    }

    /// 按算法名称创建对局
    ///
    /// 局面总棋子数超过设置上限时拒绝使用搜索 AI，除非 `force_search`。
    pub fn from_names(
        initial_state: GameState,
        player1: &str,
        player2: &str,
        settings: &ArenaSettings,
        force_search: bool,
    ) -> Result<Self> {
        let kinds = [player1.parse::<AgentKind>()?, player2.parse::<AgentKind>()?];
        Self::from_kinds(initial_state, kinds, settings.search, settings.search_max_counters, force_search)
    }

    /// 按玩家类型创建对局
    pub fn from_kinds(
        initial_state: GameState,
        kinds: [AgentKind; 2],
        search: SearchConfig,
        search_max_counters: u32,
        force_search: bool,
    ) -> Result<Self> {
        let total = initial_state.total();
        if kinds.iter().any(AgentKind::uses_search) && total > u64::from(search_max_counters) {
            if !force_search {
                return Err(ArenaError::SearchNotAdmissible {
                    total,
                    ceiling: search_max_counters,
                });
            }
            warn!("强制在 {} 个棋子的局面上使用搜索 AI", total);
        }

        Ok(Self::new(
            initial_state,
            kinds[0].seat(search),
            kinds[1].seat(search),
        ))
    }

    /// 重置到初始局面
    pub fn reset(&mut self) {
        self.state = self.initial_state.clone();
        self.current_player = Player::One;
        self.phase = MatchPhase::Ready;
        self.winner = None;
        self.end_reason = None;
        self.notes.clear();
        self.history.clear();
        self.started_at = None;
        self.started_at_utc = None;
        self.turn_started = None;
        self.duration = Duration::ZERO;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn initial_state(&self) -> &GameState {
        &self.initial_state
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// 指定玩家使用的算法标签
    pub fn algorithm(&self, player: Player) -> &str {
        self.seats[player.index()].label()
    }

    /// 当前是否轮到人类玩家
    pub fn is_human_turn(&self) -> bool {
        !self.is_over() && self.seats[self.current_player.index()].is_human()
    }

    /// 执行一步 AI 走棋
    ///
    /// 对局已结束、本步直接判定结束、或轮到人类玩家时返回 `None`。
    pub fn play_one_move(&mut self) -> Option<TurnRecord> {
        if self.is_over() {
            return None;
        }
        self.begin();

        if self.finish_if_stuck() {
            return None;
        }

        let player = self.current_player;
        let seat = &mut self.seats[player.index()];
        let SeatKind::Agent(provider) = &mut seat.kind else {
            debug!("等待 {} 走棋", player);
            return None;
        };
        let algorithm = seat.label.clone();

        let started = Instant::now();
        let result = invoke_agent(provider.as_mut(), &self.state);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let (mv, stats) = match result {
            Ok(chosen) => chosen,
            Err(failure) => {
                let Some(fallback) = Rules::fallback_move(&self.state) else {
                    self.finish(Some(player), EndReason::AlreadyTerminal);
                    return None;
                };
                warn!("{} ({}) 出错，使用兜底走法 {}: {}", player, algorithm, fallback, failure.error);

                let mut stats = failure.stats.unwrap_or_else(|| {
                    let mut stats = AgentStats::new(algorithm.as_str());
                    stats.duration_ms = elapsed_ms;
                    stats
                });
                stats.fallback_used = true;
                stats.set_extra("error", failure.error.to_string());
                stats.note(format!("fallback move used: {}", failure.error));
                (fallback, stats)
            }
        };

        Some(self.commit(player, algorithm, mv, stats))
    }

    /// 执行人类玩家的走法
    ///
    /// 人类走法与 AI 走法经过相同的合法性检查；非法走法直接拒绝，不替换。
    pub fn play_human_move(&mut self, mv: Move) -> Result<TurnRecord> {
        if self.is_over() {
            return Err(ArenaError::MatchOver);
        }
        if !self.is_human_turn() {
            return Err(ArenaError::NotHumanTurn);
        }
        self.begin();

        if self.finish_if_stuck() {
            return Err(ArenaError::MatchOver);
        }

        // 只做校验，真正执行在 commit 中
        Rules::apply(&self.state, &mv)?;

        let mut stats = AgentStats::new(HUMAN_LABEL);
        stats.duration_ms = self
            .turn_started
            .map(|t| t.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0);

        let player = self.current_player;
        Ok(self.commit(player, HUMAN_LABEL.to_string(), mv, stats))
    }

    /// 一直走到对局结束
    ///
    /// 遇到人类玩家回合时返回 [`ArenaError::HumanTurnPending`]。
    pub fn run_to_end(&mut self) -> Result<MatchSummary> {
        while !self.is_over() {
            if self.play_one_move().is_none() && !self.is_over() {
                return Err(ArenaError::HumanTurnPending {
                    player: self.current_player,
                });
            }
        }
        Ok(self.summary())
    }

    /// 对局汇总
    pub fn summary(&self) -> MatchSummary {
        let duration = match (self.phase, self.started_at) {
            (MatchPhase::InProgress, Some(started)) => started.elapsed(),
            _ => self.duration,
        };

        MatchSummary {
            winner: self.winner,
            loser: self.winner.map(|w| w.opponent()),
            total_moves: self.history.len() as u32,
            match_duration_sec: duration.as_secs_f64(),
            started_at: self.started_at_utc,
            end_reason: self.end_reason,
            notes: self.notes.clone(),
            player1: PlayerSummary::collect(self.algorithm(Player::One), Player::One, &self.history),
            player2: PlayerSummary::collect(self.algorithm(Player::Two), Player::Two, &self.history),
        }
    }

    /// 第一步时开始计时
    fn begin(&mut self) {
        if self.phase == MatchPhase::Ready {
            self.phase = MatchPhase::InProgress;
            self.started_at = Some(Instant::now());
            self.started_at_utc = Some(Utc::now());
            self.turn_started = self.started_at;
            info!(
                "对局开始: {} | {} vs {}",
                self.state,
                self.algorithm(Player::One),
                self.algorithm(Player::Two)
            );
        }
    }

    /// 局面已终局或步数超限时直接结束对局
    fn finish_if_stuck(&mut self) -> bool {
        if self.state.is_terminal() {
            // 反 Nim：轮到走棋的一方获胜
            let winner = self.current_player;
            self.finish(Some(winner), EndReason::AlreadyTerminal);
            return true;
        }

        if self.history.len() as u64 >= self.move_limit {
            let note = format!(
                "move guard tripped: {} moves for {} initial counters, state {}",
                self.history.len(),
                self.move_limit,
                self.state
            );
            warn!("{}", note);
            self.notes.push(note);
            self.finish(None, EndReason::InvariantViolation);
            return true;
        }

        false
    }

    /// 执行走法并记录
    fn commit(
        &mut self,
        player: Player,
        algorithm: String,
        mut mv: Move,
        mut stats: AgentStats,
    ) -> TurnRecord {
        let next = match Rules::apply(&self.state, &mv) {
            Ok(next) => next,
            Err(e) => {
                error!("{} 的走法 {} 执行失败: {}", player, mv, e);
                stats.fallback_used = true;
                stats.note(format!("apply failed ({}), fallback applied", e));

                let fallback = Rules::fallback_move(&self.state)
                    .and_then(|fb| Rules::apply(&self.state, &fb).ok().map(|next| (fb, next)));
                match fallback {
                    Some((fb, next)) => {
                        mv = fb;
                        next
                    }
                    None => self.state.clone(),
                }
            }
        };

        self.state = next;
        let mut record = TurnRecord {
            move_number: self.history.len() as u32 + 1,
            player,
            algorithm,
            mv,
            state_after: self.state.clone(),
            stats,
            game_over: false,
            winner: None,
            loser: None,
        };
        debug!("第 {} 步: {} {} -> {}", record.move_number, player, mv, self.state);

        if self.state.is_terminal() {
            // 取走最后一个棋子的一方输
            self.finish(Some(player.opponent()), EndReason::LastCounterTaken);
            record.game_over = true;
            record.winner = self.winner;
            record.loser = Some(player);
        } else {
            self.current_player = player.opponent();
            self.turn_started = Some(Instant::now());
        }

        self.history.push(record.clone());
        record
    }

    fn finish(&mut self, winner: Option<Player>, reason: EndReason) {
        self.phase = MatchPhase::Over;
        self.winner = winner;
        self.end_reason = Some(reason);
        self.duration = self.started_at.map(|t| t.elapsed()).unwrap_or_default();

        match winner {
            Some(w) => info!(
                "对局结束: {} ({}) 获胜, 共 {} 步, 原因 {:?}",
                w,
                self.algorithm(w),
                self.history.len(),
                reason
            ),
            None => warn!("对局异常结束, 无胜者, 原因 {:?}", reason),
        }
    }
}

/// AI 调用失败，附带 AI 已给出的统计（如果有）
struct AgentFailure {
    error: AgentError,
    stats: Option<AgentStats>,
}

/// 调用 AI 并校验输出：隔离 panic、缺失走法和非法走法
fn invoke_agent(
    provider: &mut dyn MoveProvider,
    state: &GameState,
) -> std::result::Result<(Move, AgentStats), AgentFailure> {
    let agent = provider.name().to_string();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| provider.select_move(state)));
    let AgentResult { mv, stats } = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => return Err(AgentFailure { error, stats: None }),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            return Err(AgentFailure {
                error: AgentError::Panicked { agent, message },
                stats: None,
            });
        }
    };

    let Some(mv) = mv else {
        return Err(AgentFailure {
            error: AgentError::NoMove {
                agent,
                piles: state.piles().to_vec(),
            },
            stats: Some(stats),
        });
    };

    if let Err(source) = Rules::apply(state, &mv) {
        return Err(AgentFailure {
            error: AgentError::IllegalMove { agent, source },
            stats: Some(stats),
        });
    }

    Ok((mv, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nim_ai::{HeuristicAgent, SearchAgent};

    /// 总是报错的 AI
    struct FailingAgent;

    impl MoveProvider for FailingAgent {
        fn name(&self) -> &str {
            "Failing"
        }

        fn select_move(&mut self, _state: &GameState) -> std::result::Result<AgentResult, AgentError> {
            Err(AgentError::Failed {
                agent: "Failing".to_string(),
                reason: "always fails".to_string(),
            })
        }
    }

    /// 总是 panic 的 AI
    struct PanickingAgent;

    impl MoveProvider for PanickingAgent {
        fn name(&self) -> &str {
            "Panicking"
        }

        fn select_move(&mut self, _state: &GameState) -> std::result::Result<AgentResult, AgentError> {
            panic!("agent exploded");
        }
    }

    /// 总是“取 0 个”的 AI
    struct TakeZeroAgent;

    impl MoveProvider for TakeZeroAgent {
        fn name(&self) -> &str {
            "TakeZero"
        }

        fn select_move(&mut self, _state: &GameState) -> std::result::Result<AgentResult, AgentError> {
            Ok(AgentResult::new(Some(Move::new(0, 0)), AgentStats::new("TakeZero")))
        }
    }

    /// 局面未结束也不给走法的 AI
    struct SilentAgent;

    impl MoveProvider for SilentAgent {
        fn name(&self) -> &str {
            "Silent"
        }

        fn select_move(&mut self, _state: &GameState) -> std::result::Result<AgentResult, AgentError> {
            Ok(AgentResult::new(None, AgentStats::new("Silent")))
        }
    }

    fn state(piles: &[u32]) -> GameState {
        GameState::new(piles.to_vec())
    }

    fn heuristic() -> Seat {
        Seat::agent(Box::new(HeuristicAgent::new()))
    }

    fn search(depth: u32) -> Seat {
        Seat::agent(Box::new(SearchAgent::new(SearchConfig::with_depth(depth))))
    }

    #[test]
    fn test_pair_of_singletons_first_player_wins() {
        // [1, 1]：先手取 1，后手被迫取最后一个
        let mut controller = MatchController::new(state(&[1, 1]), search(4), search(4));
        let summary = controller.run_to_end().unwrap();

        assert_eq!(summary.winner, Some(Player::One));
        assert_eq!(summary.loser, Some(Player::Two));
        assert_eq!(summary.total_moves, 2);
        assert_eq!(summary.end_reason, Some(EndReason::LastCounterTaken));
    }

    #[test]
    fn test_phase_transitions() {
        let mut controller = MatchController::new(state(&[2]), heuristic(), heuristic());
        assert_eq!(controller.phase(), MatchPhase::Ready);

        let first = controller.play_one_move().unwrap();
        assert_eq!(first.mv, Move::new(0, 1));
        assert!(!first.game_over);
        assert_eq!(controller.phase(), MatchPhase::InProgress);
        assert_eq!(controller.current_player(), Player::Two);

        let last = controller.play_one_move().unwrap();
        assert!(last.game_over);
        assert_eq!(last.loser, Some(Player::Two));
        assert_eq!(last.winner, Some(Player::One));
        assert_eq!(controller.phase(), MatchPhase::Over);

        // 结束后不再处理
        assert!(controller.play_one_move().is_none());
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    fn test_history_records_states() {
        let mut controller = MatchController::new(state(&[3, 4]), heuristic(), search(200));
        controller.run_to_end().unwrap();

        let mut previous = state(&[3, 4]);
        for (i, turn) in controller.history().iter().enumerate() {
            assert_eq!(turn.move_number as usize, i + 1);
            assert_eq!(turn.state_after.total(), previous.total() - u64::from(turn.mv.count));
            assert!(!turn.stats.fallback_used);
            previous = turn.state_after.clone();
        }
        assert!(previous.is_terminal());
    }

    #[test]
    fn test_heuristic_wins_from_winning_position() {
        // [3, 4] 先手必胜，启发式 AI 作为先手应当获胜
        let mut controller = MatchController::new(state(&[3, 4]), heuristic(), search(200));
        let summary = controller.run_to_end().unwrap();
        assert_eq!(summary.winner, Some(Player::One));
        assert_eq!(summary.winner_algorithm(), Some("Reflex"));
    }

    #[test]
    fn test_search_beats_heuristic_from_winning_side() {
        // [1, 3, 5, 7] NIM-SUM 为 0，后手必胜
        let mut controller = MatchController::new(state(&[1, 3, 5, 7]), heuristic(), search(200));
        let summary = controller.run_to_end().unwrap();
        assert_eq!(summary.winner, Some(Player::Two));
        assert!(summary.player2.total_nodes > 0);
        assert_eq!(summary.player1.total_nodes, 0);
    }

    #[test]
    fn test_failing_agent_uses_fallback() {
        let mut controller = MatchController::new(
            state(&[1, 3, 5, 7]),
            Seat::agent(Box::new(FailingAgent)),
            heuristic(),
        );
        let summary = controller.run_to_end().unwrap();

        assert!(summary.winner.is_some());
        assert_eq!(summary.end_reason, Some(EndReason::LastCounterTaken));
        for turn in controller.history().iter().filter(|t| t.player == Player::One) {
            assert!(turn.stats.fallback_used);
            assert!(turn.stats.notes[0].contains("always fails"));
        }
        assert_eq!(summary.player1.fallback_count, summary.player1.moves_count);
        assert_eq!(summary.player2.fallback_count, 0);
    }

    #[test]
    fn test_panicking_agents_are_contained() {
        let mut controller = MatchController::new(
            state(&[2, 2]),
            Seat::agent(Box::new(PanickingAgent)),
            Seat::agent(Box::new(PanickingAgent)),
        );
        let summary = controller.run_to_end().unwrap();

        // 双方都从第一个非空堆取 1：共 4 步，后手取走最后一个
        assert_eq!(summary.total_moves, 4);
        assert_eq!(summary.winner, Some(Player::One));
        assert!(controller.history().iter().all(|t| t.stats.fallback_used));
        assert!(controller.history()[0].stats.notes[0].contains("agent exploded"));
    }

    #[test]
    fn test_take_zero_never_trips_guard() {
        let mut controller = MatchController::new(
            state(&[2, 3]),
            Seat::agent(Box::new(TakeZeroAgent)),
            Seat::agent(Box::new(TakeZeroAgent)),
        );
        let summary = controller.run_to_end().unwrap();

        assert_eq!(summary.end_reason, Some(EndReason::LastCounterTaken));
        assert_eq!(summary.total_moves, 5);
        assert!(summary.winner.is_some());
        assert!(summary.notes.is_empty());
        for turn in controller.history() {
            assert!(turn.stats.fallback_used);
            assert_eq!(turn.mv.count, 1);
            assert_eq!(turn.stats.algorithm, "TakeZero");
        }
    }

    #[test]
    fn test_missing_move_uses_fallback() {
        let mut controller = MatchController::new(
            state(&[0, 2]),
            Seat::agent(Box::new(SilentAgent)),
            heuristic(),
        );
        let record = controller.play_one_move().unwrap();
        assert_eq!(record.mv, Move::new(1, 1));
        assert!(record.stats.fallback_used);
        assert!(record.stats.notes[0].contains("no move"));
    }

    #[test]
    fn test_already_terminal_credits_player_to_move() {
        let mut controller = MatchController::new(state(&[0, 0]), heuristic(), heuristic());
        assert!(controller.play_one_move().is_none());
        assert!(controller.is_over());
        assert_eq!(controller.winner(), Some(Player::One));

        let summary = controller.summary();
        assert_eq!(summary.total_moves, 0);
        assert_eq!(summary.end_reason, Some(EndReason::AlreadyTerminal));
    }

    #[test]
    fn test_guard_trips_without_winner() {
        let mut controller = MatchController::new(state(&[3]), heuristic(), heuristic());
        // 人为把步数上限压到 0，模拟逻辑错误
        controller.move_limit = 0;

        assert!(controller.play_one_move().is_none());
        let summary = controller.summary();
        assert_eq!(summary.winner, None);
        assert_eq!(summary.loser, None);
        assert_eq!(summary.end_reason, Some(EndReason::InvariantViolation));
        assert!(summary.notes[0].contains("move guard tripped"));
    }

    #[test]
    fn test_human_turns() {
        let mut controller = MatchController::new(state(&[1, 2]), Seat::human(), heuristic());
        assert!(controller.is_human_turn());

        // AI 路径不会替人类走棋
        assert!(controller.play_one_move().is_none());
        assert!(matches!(
            controller.run_to_end(),
            Err(ArenaError::HumanTurnPending { player: Player::One })
        ));

        // 非法走法被拒绝，不替换
        assert!(matches!(
            controller.play_human_move(Move::new(0, 2)),
            Err(ArenaError::Rules(_))
        ));
        assert!(controller.history().is_empty());

        // [1, 2] -> [1, 0]，对手只能取最后一个
        let record = controller.play_human_move(Move::new(1, 2)).unwrap();
        assert_eq!(record.algorithm, "Human");
        assert!(!controller.is_human_turn());
        assert!(matches!(
            controller.play_human_move(Move::new(0, 1)),
            Err(ArenaError::NotHumanTurn)
        ));

        let summary = controller.run_to_end().unwrap();
        assert_eq!(summary.winner, Some(Player::One));
        assert!(matches!(
            controller.play_human_move(Move::new(0, 1)),
            Err(ArenaError::MatchOver)
        ));
    }

    #[test]
    fn test_reset() {
        let mut controller = MatchController::new(state(&[2, 1]), heuristic(), heuristic());
        controller.run_to_end().unwrap();
        assert!(controller.is_over());

        controller.reset();
        assert_eq!(controller.phase(), MatchPhase::Ready);
        assert_eq!(controller.state(), &state(&[2, 1]));
        assert!(controller.history().is_empty());
        assert_eq!(controller.winner(), None);
    }

    #[test]
    fn test_from_names() {
        let settings = ArenaSettings::default();
        let controller =
            MatchController::from_names(state(&[1, 3, 5, 7]), "Reflex", "Alpha-Beta", &settings, false)
                .unwrap();
        assert_eq!(controller.algorithm(Player::One), "Reflex");
        assert_eq!(controller.algorithm(Player::Two), "Alpha-Beta");

        let err = MatchController::from_names(state(&[1]), "Reflex", "Random", &settings, false)
            .unwrap_err();
        assert!(matches!(err, ArenaError::UnknownAlgorithm { .. }));
    }

    #[test]
    fn test_search_ceiling() {
        let settings = ArenaSettings::default();
        let big = state(&[100, 100]);

        let err = MatchController::from_names(big.clone(), "Alpha-Beta", "Reflex", &settings, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ArenaError::SearchNotAdmissible { total: 200, ceiling: 64 }
        ));

        assert!(MatchController::from_names(big.clone(), "Reflex", "Reflex", &settings, false).is_ok());
        assert!(MatchController::from_names(big, "Alpha-Beta", "Reflex", &settings, true).is_ok());
    }

    #[test]
    fn test_huge_layout_plays_normally() {
        // 总数超过 u32::MAX 时步数上限与搜索上限检查都不能溢出
        let settings = ArenaSettings::default();
        let huge = state(&[u32::MAX, 1]);
        let total = u64::from(u32::MAX) + 1;

        let err = MatchController::from_names(huge.clone(), "Alpha-Beta", "Reflex", &settings, false)
            .unwrap_err();
        assert!(matches!(err, ArenaError::SearchNotAdmissible { total: t, .. } if t == total));

        let mut controller =
            MatchController::from_names(huge, "Reflex", "Reflex", &settings, false).unwrap();
        assert_eq!(controller.move_limit, total);

        // 一个单子堆时把大堆取空，对手被迫取最后一个
        let summary = controller.run_to_end().unwrap();
        assert_eq!(summary.winner, Some(Player::One));
        assert_eq!(summary.total_moves, 2);
        assert_eq!(summary.end_reason, Some(EndReason::LastCounterTaken));
        assert!(summary.notes.is_empty());
    }

    #[test]
    fn test_summary_totals() {
        let mut controller = MatchController::new(state(&[1, 3, 5]), heuristic(), search(200));
        let summary = controller.run_to_end().unwrap();

        assert_eq!(
            summary.player1.moves_count + summary.player2.moves_count,
            summary.total_moves
        );
        assert!(summary.started_at.is_some());
        assert!(summary.match_duration_sec >= 0.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["player2"]["algorithm"], "Alpha-Beta");
    }
}
