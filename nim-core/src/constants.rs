//! 规则与搜索常量

/// 允许启用搜索 AI 的最大总棋子数（由调用方强制执行）
pub const SEARCH_MAX_COUNTERS: u32 = 64;

/// 搜索默认深度上限
pub const DEFAULT_DEPTH_LIMIT: u32 = 200;

/// 大规模局面使用的缩减深度上限
pub const REDUCED_DEPTH_LIMIT: u32 = 100;

/// 总棋子数超过该值时视为大规模局面
pub const LARGE_GAME_THRESHOLD: u32 = 500;

/// 兜底走法每次取走的棋子数
pub const FALLBACK_TAKE: u32 = 1;
