//! AI 注册表
//!
//! 把配置中的算法名称映射为具体的走法提供者。

use std::fmt;
use std::str::FromStr;

use nim_ai::{HeuristicAgent, SearchAgent, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::controller::Seat;
use crate::error::ArenaError;

/// 玩家类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// 启发式（反射）AI
    Heuristic,
    /// Alpha-Beta 搜索 AI
    Search,
    /// 人类玩家
    Human,
}

impl AgentKind {
    /// 所有可用类型
    pub fn all() -> &'static [AgentKind] {
        &[AgentKind::Heuristic, AgentKind::Search, AgentKind::Human]
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Heuristic => "Reflex",
            AgentKind::Search => "Alpha-Beta",
            AgentKind::Human => "Human",
        }
    }

    /// 说明
    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Heuristic => "Rule-based agent (NIM-SUM)",
            AgentKind::Search => "Minimax with Alpha-Beta pruning",
            AgentKind::Human => "Interactive player",
        }
    }

    pub fn uses_search(&self) -> bool {
        matches!(self, AgentKind::Search)
    }

    /// 创建座位
    pub fn seat(&self, config: SearchConfig) -> Seat {
        match self {
            AgentKind::Heuristic => Seat::agent(Box::new(HeuristicAgent::new())),
            AgentKind::Search => Seat::agent(Box::new(SearchAgent::new(config))),
            AgentKind::Human => Seat::human(),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflex" | "heuristic" => Ok(AgentKind::Heuristic),
            "alpha-beta" | "alphabeta" | "search" => Ok(AgentKind::Search),
            "human" => Ok(AgentKind::Human),
            _ => Err(ArenaError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("Reflex".parse::<AgentKind>().unwrap(), AgentKind::Heuristic);
        assert_eq!("heuristic".parse::<AgentKind>().unwrap(), AgentKind::Heuristic);
        assert_eq!("Alpha-Beta".parse::<AgentKind>().unwrap(), AgentKind::Search);
        assert_eq!(" SEARCH ".parse::<AgentKind>().unwrap(), AgentKind::Search);
        assert_eq!("Human".parse::<AgentKind>().unwrap(), AgentKind::Human);
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "Monte-Carlo".parse::<AgentKind>().unwrap_err();
        assert!(matches!(err, ArenaError::UnknownAlgorithm { ref name } if name == "Monte-Carlo"));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in AgentKind::all() {
            assert_eq!(kind.name().parse::<AgentKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_seat_labels() {
        let config = SearchConfig::default();
        assert_eq!(AgentKind::Heuristic.seat(config).label(), "Reflex");
        assert_eq!(AgentKind::Search.seat(config).label(), "Alpha-Beta");
        assert!(AgentKind::Human.seat(config).is_human());
    }

    #[test]
    fn test_descriptions_are_distinct() {
        let descriptions: std::collections::HashSet<_> =
            AgentKind::all().iter().map(AgentKind::description).collect();
        assert_eq!(descriptions.len(), AgentKind::all().len());
        assert!(AgentKind::Search.description().contains("Alpha-Beta"));
    }
}
