//! Nim 对局平台命令行入口

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nim_arena::benchmark::{csv_path_for, run_trials, write_csv};
use nim_arena::{AgentKind, ArenaSettings, BenchmarkConfig, BenchmarkReport, MatchController, TurnRecord};
use nim_core::{Difficulty, GameState, Move};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 反 Nim 对局平台：AI 对战、人机对战与批量基准测试
#[derive(Parser, Debug)]
#[command(name = "nim-arena")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 设置文件（JSON）
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行单局对战
    Play {
        /// 初始布局，例如 "1,3,5,7"（优先于 --difficulty）
        #[arg(long)]
        piles: Option<String>,

        /// 难度预设: Easy, Medium, Hard, Extreme
        #[arg(short, long, default_value = "Easy")]
        difficulty: String,

        /// 玩家 1: Reflex, Alpha-Beta, Human
        #[arg(long, default_value = "Reflex")]
        p1: String,

        /// 玩家 2: Reflex, Alpha-Beta, Human
        #[arg(long, default_value = "Alpha-Beta")]
        p2: String,

        /// 超过上限时仍使用搜索 AI
        #[arg(long)]
        force_search: bool,

        /// 以 JSON 输出对局汇总
        #[arg(long)]
        json: bool,
    },

    /// 列出可用的 AI 与难度预设
    List,

    /// 批量基准测试
    Bench {
        /// 难度预设，或 "all"
        #[arg(short, long, default_value = "Easy")]
        difficulty: String,

        /// 每个难度的对局数（默认取设置）
        #[arg(short, long)]
        trials: Option<u32>,

        #[arg(long)]
        p1: Option<String>,

        #[arg(long)]
        p2: Option<String>,

        /// 随机种子（默认取设置）
        #[arg(short, long)]
        seed: Option<u64>,

        /// 输出 CSV 路径
        #[arg(long)]
        csv: Option<PathBuf>,

        /// 超过上限时仍使用搜索 AI
        #[arg(long)]
        force_search: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("nim_arena=info".parse()?))
        .init();

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => ArenaSettings::load(path),
        None => ArenaSettings::default(),
    };

    match args.command {
        Commands::Play {
            piles,
            difficulty,
            p1,
            p2,
            force_search,
            json,
        } => {
            let initial = match piles {
                Some(piles) => piles.parse::<GameState>()?,
                None => difficulty.parse::<Difficulty>()?.preset().initial_state(),
            };
            play(initial, &p1, &p2, &settings, force_search, json)
        }
        Commands::List => {
            print_catalog(&settings);
            Ok(())
        }
        Commands::Bench {
            difficulty,
            trials,
            p1,
            p2,
            seed,
            csv,
            force_search,
        } => {
            let difficulties: Vec<Difficulty> = if difficulty.eq_ignore_ascii_case("all") {
                Difficulty::all().to_vec()
            } else {
                vec![difficulty.parse()?]
            };

            for &difficulty in &difficulties {
                let mut config = BenchmarkConfig::from_settings(difficulty, &settings)?;
                if let Some(trials) = trials {
                    config.trials = trials;
                }
                if let Some(p1) = &p1 {
                    config.player1 = p1.parse()?;
                }
                if let Some(p2) = &p2 {
                    config.player2 = p2.parse()?;
                }
                if let Some(seed) = seed {
                    config.seed = seed;
                }
                config.force_search = force_search;

                let Some(report) = run_trials(&config, &settings)? else {
                    println!("[SKIP] {}: search agent not admissible, use --force-search", difficulty);
                    continue;
                };
                print_report(&report);

                if let Some(base) = &csv {
                    let path = if difficulties.len() > 1 {
                        csv_path_for(base, difficulty)
                    } else {
                        base.clone()
                    };
                    write_csv(&report.rows, &path)?;
                    println!("CSV saved: {}", path.display());
                }
            }
            Ok(())
        }
    }
}

fn play(
    initial: GameState,
    p1: &str,
    p2: &str,
    settings: &ArenaSettings,
    force_search: bool,
    json: bool,
) -> Result<()> {
    let mut controller = MatchController::from_names(initial, p1, p2, settings, force_search)?;
    info!("初始局面: {} ({:?})", controller.state(), controller.state().info());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !controller.is_over() {
        if controller.is_human_turn() {
            print!(
                "{} | {} to move, enter \"<pile> <count>\" (pile from 0): ",
                controller.state(),
                controller.current_player()
            );
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                bail!("input closed before the match ended");
            };
            let line = line.context("failed to read move")?;
            let mv = match parse_move(&line) {
                Some(mv) => mv,
                None => {
                    println!("expected two numbers, e.g. \"2 3\"");
                    continue;
                }
            };

            match controller.play_human_move(mv) {
                Ok(record) => print_turn(&record, json),
                Err(e) => println!("{}", e),
            }
        } else if let Some(record) = controller.play_one_move() {
            print_turn(&record, json);
        }
    }

    let summary = controller.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match summary.winner {
            Some(winner) => println!(
                "Winner: {} ({}) after {} moves",
                winner,
                summary.winner_algorithm().unwrap_or("?"),
                summary.total_moves
            ),
            None => println!("Match ended without a winner: {:?}", summary.notes),
        }
        for (label, player) in [("P1", &summary.player1), ("P2", &summary.player2)] {
            println!(
                "{} {}: {} moves, avg {:.4} ms, {} nodes, {} fallbacks",
                label,
                player.algorithm,
                player.moves_count,
                player.avg_time_ms,
                player.total_nodes,
                player.fallback_count
            );
        }
    }
    Ok(())
}

fn print_catalog(settings: &ArenaSettings) {
    println!("Agents:");
    for kind in AgentKind::all() {
        println!("  {:<12} {}", kind.name(), kind.description());
    }

    println!("Difficulties (search ceiling {}):", settings.search_max_counters);
    for difficulty in Difficulty::all() {
        let preset = difficulty.preset();
        let search = if preset.search_admissible(settings.search_max_counters) {
            "search ok"
        } else {
            "reflex only"
        };
        println!(
            "  {:<8} {:>5} counters  {:?}  {} ({})",
            difficulty.display_name(),
            preset.total_counters,
            preset.piles,
            preset.description,
            search
        );
    }
}

fn parse_move(line: &str) -> Option<Move> {
    let mut parts = line.split_whitespace();
    let pile = parts.next()?.parse().ok()?;
    let count = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Move::new(pile, count))
}

fn print_turn(record: &TurnRecord, json: bool) {
    if json {
        return;
    }
    let fallback = if record.stats.fallback_used { " (fallback)" } else { "" };
    println!(
        "#{} {} [{}]: {}{} -> {}",
        record.move_number, record.player, record.algorithm, record.mv, fallback, record.state_after
    );
}

fn print_report(report: &BenchmarkReport) {
    println!(
        "\n=== {} | trials={} | P1={} vs P2={} ===",
        report.difficulty, report.trials, report.player1, report.player2
    );
    println!("Total counters: {} | piles: {}", report.total_counters, report.pile_count);
    for (algorithm, wins) in &report.wins_by_algorithm {
        println!("Wins {}: {}", algorithm, wins);
    }
    println!(
        "Wins by seat: P1={} | P2={} | none={}",
        report.player1_wins, report.player2_wins, report.no_winner
    );
    println!("Avg total moves: {:.2}", report.avg_total_moves);
    println!("Avg match duration (sec): {:.4}", report.avg_match_duration_sec);
    println!(
        "P1 avg time per move (ms): {:.4} | avg nodes: {:.2}",
        report.p1_avg_time_ms, report.p1_avg_nodes
    );
    println!(
        "P2 avg time per move (ms): {:.4} | avg nodes: {:.2}",
        report.p2_avg_time_ms, report.p2_avg_nodes
    );
}
