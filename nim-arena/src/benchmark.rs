//! 批量基准测试
//!
//! 按难度模板生成随机布局，重复运行固定配对的对局并汇总胜负与耗时。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use nim_core::{Difficulty, GameState, NimError, Player};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::controller::MatchController;
use crate::error::{ArenaError, Result};
use crate::registry::AgentKind;
use crate::settings::ArenaSettings;

/// 按模板形状生成总数为 `total` 的随机布局
///
/// 权重为模板堆大小乘以 `[0.5, 1.5)` 的噪声，按比例取整后把余数随机分配。
pub fn random_layout<R: Rng>(template: &[u32], total: u32, rng: &mut R) -> Result<Vec<u32>> {
    if template.is_empty() {
        return Err(NimError::InvalidState {
            reason: "empty pile template".to_string(),
        }
        .into());
    }

    let weights: Vec<f64> = template
        .iter()
        .map(|&p| p.max(1) as f64 * (0.5 + rng.gen::<f64>()))
        .collect();
    let sum: f64 = weights.iter().sum();

    let mut piles: Vec<u32> = weights
        .iter()
        .map(|w| (w / sum * total as f64) as u32)
        .collect();

    let assigned: u32 = piles.iter().sum();
    debug_assert!(assigned <= total, "layout {:?} exceeds {} counters", piles, total);
    for _ in 0..total.saturating_sub(assigned) {
        let i = rng.gen_range(0..piles.len());
        piles[i] += 1;
    }

    if total > 0 && piles.iter().all(|&p| p == 0) {
        let i = rng.gen_range(0..piles.len());
        piles[i] = total;
    }

    Ok(piles)
}

/// 基准测试参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub difficulty: Difficulty,
    pub trials: u32,
    pub player1: AgentKind,
    pub player2: AgentKind,
    pub seed: u64,
    /// 超过上限时仍使用搜索 AI
    pub force_search: bool,
}

impl BenchmarkConfig {
    /// 使用设置中的默认参数
    pub fn from_settings(difficulty: Difficulty, settings: &ArenaSettings) -> Result<Self> {
        Ok(Self {
            difficulty,
            trials: settings.benchmark.trials,
            player1: settings.benchmark.player1.parse()?,
            player2: settings.benchmark.player2.parse()?,
            seed: settings.benchmark.seed,
            force_search: false,
        })
    }

    fn uses_search(&self) -> bool {
        self.player1.uses_search() || self.player2.uses_search()
    }
}

/// 单局结果（CSV 一行）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRow {
    pub trial: u32,
    pub difficulty: String,
    pub initial_state: String,
    pub p1_algo: String,
    pub p2_algo: String,
    pub winner_player: Option<u8>,
    pub winner_algo: Option<String>,
    pub total_moves: u32,
    pub match_duration_sec: f64,
    pub p1_avg_time_ms: f64,
    pub p2_avg_time_ms: f64,
    pub p1_total_nodes: u64,
    pub p2_total_nodes: u64,
}

/// 基准测试汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub difficulty: Difficulty,
    pub trials: u32,
    pub player1: String,
    pub player2: String,
    pub total_counters: u32,
    pub pile_count: usize,
    pub wins_by_algorithm: BTreeMap<String, u32>,
    pub player1_wins: u32,
    pub player2_wins: u32,
    /// 异常终止、无胜者的对局数
    pub no_winner: u32,
    pub avg_total_moves: f64,
    pub avg_match_duration_sec: f64,
    pub p1_avg_time_ms: f64,
    pub p2_avg_time_ms: f64,
    pub p1_avg_nodes: f64,
    pub p2_avg_nodes: f64,
    #[serde(skip)]
    pub rows: Vec<TrialRow>,
}

impl BenchmarkReport {
    fn from_rows(config: &BenchmarkConfig, template: &[u32], total: u32, rows: Vec<TrialRow>) -> Self {
        let mut wins_by_algorithm = BTreeMap::new();
        let (mut player1_wins, mut player2_wins, mut no_winner) = (0, 0, 0);
        for row in &rows {
            match row.winner_player {
                Some(1) => player1_wins += 1,
                Some(_) => player2_wins += 1,
                None => no_winner += 1,
            }
            if let Some(algo) = &row.winner_algo {
                *wins_by_algorithm.entry(algo.clone()).or_insert(0) += 1;
            }
        }

        Self {
            difficulty: config.difficulty,
            trials: config.trials,
            player1: config.player1.name().to_string(),
            player2: config.player2.name().to_string(),
            total_counters: total,
            pile_count: template.len(),
            wins_by_algorithm,
            player1_wins,
            player2_wins,
            no_winner,
            avg_total_moves: mean(rows.iter().map(|r| r.total_moves as f64)),
            avg_match_duration_sec: mean(rows.iter().map(|r| r.match_duration_sec)),
            p1_avg_time_ms: mean(rows.iter().map(|r| r.p1_avg_time_ms)),
            p2_avg_time_ms: mean(rows.iter().map(|r| r.p2_avg_time_ms)),
            p1_avg_nodes: mean(rows.iter().map(|r| r.p1_total_nodes as f64)),
            p2_avg_nodes: mean(rows.iter().map(|r| r.p2_total_nodes as f64)),
            rows,
        }
    }

    /// 指定算法的胜局数
    pub fn wins_for(&self, algorithm: &str) -> u32 {
        self.wins_by_algorithm.get(algorithm).copied().unwrap_or(0)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 运行一组基准对局
///
/// 使用搜索 AI 且总棋子数超过上限时跳过（返回 `None`），除非 `force_search`。
pub fn run_trials(config: &BenchmarkConfig, settings: &ArenaSettings) -> Result<Option<BenchmarkReport>> {
    if config.player1 == AgentKind::Human || config.player2 == AgentKind::Human {
        return Err(ArenaError::HumanSeat);
    }

    let preset = config.difficulty.preset();
    let total = preset.total_counters;

    if config.uses_search() && !preset.search_admissible(settings.search_max_counters) {
        if !config.force_search {
            warn!(
                "跳过 {}: 总棋子数 {} 超过搜索上限 {}",
                config.difficulty, total, settings.search_max_counters
            );
            return Ok(None);
        }
        warn!("强制在 {} 上运行搜索 AI，可能耗时很长", config.difficulty);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut rows = Vec::with_capacity(config.trials as usize);

    for trial in 1..=config.trials {
        let layout = random_layout(&preset.piles, total, &mut rng)?;
        let state = GameState::new(layout);
        debug!("第 {} 局初始布局: {}", trial, state);

        let mut controller = MatchController::from_kinds(
            state.clone(),
            [config.player1, config.player2],
            settings.search,
            settings.search_max_counters,
            true,
        )?;
        let summary = controller.run_to_end()?;

        rows.push(TrialRow {
            trial,
            difficulty: config.difficulty.to_string(),
            initial_state: state.to_string(),
            p1_algo: summary.player1.algorithm.clone(),
            p2_algo: summary.player2.algorithm.clone(),
            winner_player: summary.winner.map(|p| p.number()),
            winner_algo: summary.winner_algorithm().map(str::to_string),
            total_moves: summary.total_moves,
            match_duration_sec: summary.match_duration_sec,
            p1_avg_time_ms: summary.player(Player::One).avg_time_ms,
            p2_avg_time_ms: summary.player(Player::Two).avg_time_ms,
            p1_total_nodes: summary.player1.total_nodes,
            p2_total_nodes: summary.player2.total_nodes,
        });
    }

    let report = BenchmarkReport::from_rows(config, &preset.piles, total, rows);
    info!(
        "{} 完成 {} 局: {} 胜 {} | {} 胜 {}",
        config.difficulty,
        config.trials,
        report.player1,
        report.player1_wins,
        report.player2,
        report.player2_wins
    );
    Ok(Some(report))
}

/// 写出 CSV
pub fn write_csv(rows: &[TrialRow], path: &Path) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("无法创建 CSV 文件: {:?}", path))?;
    for row in rows {
        writer.serialize(row).context("写入 CSV 行失败")?;
    }
    writer.flush()?;
    info!("CSV 已保存: {:?}", path);
    Ok(())
}

/// 多难度模式下每个难度的 CSV 路径：`out.csv` -> `out_Easy.csv`
pub fn csv_path_for(base: &Path, difficulty: Difficulty) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, difficulty, ext.to_string_lossy()),
        None => format!("{}_{}", stem, difficulty),
    };
    base.with_file_name(file_name)
}
