//! 走法生成和验证

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_TAKE;
use crate::error::{NimError, Result};
use crate::state::{GameState, Player};

/// 走法：从第 `pile` 堆取走 `count` 个棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 堆索引
    pub pile: usize,
    /// 取走的棋子数
    pub count: u32,
}

impl Move {
    /// 创建新走法
    pub fn new(pile: usize, count: u32) -> Self {
        Self { pile, count }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take {} from pile {}", self.count, self.pile)
    }
}

/// 规则引擎
///
/// 全部为纯函数，不持有状态。
pub struct Rules;

impl Rules {
    /// 是否终局（所有堆均为空）
    pub fn is_terminal(state: &GameState) -> bool {
        state.is_terminal()
    }

    /// 生成所有合法走法：按堆顺序，同一堆内取子数升序
    pub fn legal_moves(state: &GameState) -> Vec<Move> {
        let mut moves = Vec::with_capacity(state.total() as usize);
        for (pile, &size) in state.piles().iter().enumerate() {
            for count in 1..=size {
                moves.push(Move::new(pile, count));
            }
        }
        moves
    }

    /// 走法是否合法（不会失败）
    pub fn is_legal(state: &GameState, mv: &Move) -> bool {
        match state.pile(mv.pile) {
            Some(size) => mv.count >= 1 && mv.count <= size,
            None => false,
        }
    }

    /// 执行走法，返回新局面
    ///
    /// 走法越界时返回 [`NimError::IllegalMove`]。
    pub fn apply(state: &GameState, mv: &Move) -> Result<GameState> {
        if !Self::is_legal(state, mv) {
            return Err(NimError::IllegalMove {
                pile: mv.pile,
                count: mv.count,
                piles: state.piles().to_vec(),
            });
        }
        Ok(state.with_taken(mv.pile, mv.count))
    }

    /// 宽松版本：非法走法返回未改变的局面副本
    ///
    /// 仅供防御性调用方使用，搜索内部不使用。
    pub fn apply_or_unchanged(state: &GameState, mv: &Move) -> GameState {
        match Self::apply(state, mv) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!("忽略非法走法: {}", e);
                state.clone()
            }
        }
    }

    /// 终局胜者：反 Nim 规则下，终局时轮到走棋的一方获胜
    /// （对手在上一步取走了最后一个棋子）
    pub fn misere_winner_if_terminal(state: &GameState, player_to_move: Player) -> Result<Player> {
        if !state.is_terminal() {
            return Err(NimError::NotTerminal {
                piles: state.piles().to_vec(),
            });
        }
        Ok(player_to_move)
    }

    /// 兜底走法：从第一个非空堆取走 1 个棋子，终局时为 `None`
    pub fn fallback_move(state: &GameState) -> Option<Move> {
        state
            .first_nonempty()
            .map(|pile| Move::new(pile, FALLBACK_TAKE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_moves_ordering() {
        let state = GameState::new(vec![2, 0, 1]);
        let moves = Rules::legal_moves(&state);
        assert_eq!(
            moves,
            vec![Move::new(0, 1), Move::new(0, 2), Move::new(2, 1)]
        );
    }

    #[test]
    fn test_legal_moves_are_legal() {
        let state = GameState::new(vec![1, 3, 5, 7]);
        let moves = Rules::legal_moves(&state);
        assert_eq!(moves.len(), 16);

        for mv in &moves {
            assert!(Rules::is_legal(&state, mv));
            let next = Rules::apply(&state, mv).unwrap();
            assert_eq!(next.total(), state.total() - u64::from(mv.count));
        }
    }

    #[test]
    fn test_is_legal_bounds() {
        let state = GameState::new(vec![3, 0]);
        assert!(Rules::is_legal(&state, &Move::new(0, 3)));
        assert!(!Rules::is_legal(&state, &Move::new(0, 4)));
        assert!(!Rules::is_legal(&state, &Move::new(0, 0)));
        assert!(!Rules::is_legal(&state, &Move::new(1, 1)));
        assert!(!Rules::is_legal(&state, &Move::new(2, 1)));
    }

    #[test]
    fn test_apply_does_not_mutate() {
        let state = GameState::new(vec![4, 2]);
        let next = Rules::apply(&state, &Move::new(0, 3)).unwrap();
        assert_eq!(state.piles(), &[4, 2]);
        assert_eq!(next.piles(), &[1, 2]);
    }

    #[test]
    fn test_apply_illegal() {
        let state = GameState::new(vec![4, 2]);
        let err = Rules::apply(&state, &Move::new(1, 3)).unwrap_err();
        assert_eq!(
            err,
            NimError::IllegalMove {
                pile: 1,
                count: 3,
                piles: vec![4, 2],
            }
        );

        let unchanged = Rules::apply_or_unchanged(&state, &Move::new(5, 1));
        assert_eq!(unchanged, state);
    }

    #[test]
    fn test_repeated_apply_terminates() {
        let initial = GameState::new(vec![3, 1, 4]);
        let mut state = initial.clone();
        let mut moves = 0;
        while let Some(mv) = Rules::fallback_move(&state) {
            state = Rules::apply(&state, &mv).unwrap();
            moves += 1;
        }
        assert!(Rules::is_terminal(&state));
        assert_eq!(moves, initial.total());
    }

    #[test]
    fn test_misere_winner() {
        let terminal = GameState::new(vec![0, 0]);
        assert_eq!(
            Rules::misere_winner_if_terminal(&terminal, Player::Two),
            Ok(Player::Two)
        );

        let live = GameState::new(vec![0, 1]);
        assert!(matches!(
            Rules::misere_winner_if_terminal(&live, Player::One),
            Err(NimError::NotTerminal { .. })
        ));
    }

    #[test]
    fn test_fallback_move() {
        assert_eq!(
            Rules::fallback_move(&GameState::new(vec![0, 0, 5])),
            Some(Move::new(2, 1))
        );
        assert_eq!(Rules::fallback_move(&GameState::new(vec![0, 0])), None);
    }
}
