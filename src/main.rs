//! Binary entrypoint for the kappatrack CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `status` - print the active user's progress summary
//! - `views --by <map|trader> [--mode <available|finished|future>]` - partition tabs with counts
//! - `quests --partition <name> [--mode ...]` - quests visible on one partition
//! - `complete <quest-id>` / `uncomplete <quest-id>` - update the progress snapshot
//! - `set-level <n>` / `set-prestige <n>` - adjust the snapshot's gates
//! - `reset` - two-step confirmed wipe of the active user's progress
//! - `rankings [--mode <prestige|completion>] [--limit N]` - leaderboard
//! - `stats [--user <id>]` - activity feed and chart series
//!
//! See the library crate docs for module-level details: `kappatrack::`.
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use kappatrack::config::Config;
use kappatrack::logutil::escape_log;
use kappatrack::tracker::{
    self, map_partitions, trader_partitions, ActivityEvent, ConfirmGate, ConfirmOutcome,
    Partition, ProgressStore, QuestGraph, RankingMode, UserFilter, ViewMode,
};

#[derive(Parser)]
#[command(name = "kappatrack")]
#[command(about = "Quest progression tracker for the Kappa completionist grind")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Active user id
    #[arg(short, long, default_value = "default", global = true)]
    user: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliViewMode {
    Available,
    Finished,
    Future,
}

impl From<CliViewMode> for ViewMode {
    fn from(mode: CliViewMode) -> Self {
        match mode {
            CliViewMode::Available => ViewMode::Available,
            CliViewMode::Finished => ViewMode::Finished,
            CliViewMode::Future => ViewMode::Future,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliPartitionMode {
    Map,
    Trader,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliRankingMode {
    Prestige,
    Completion,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new tracker configuration
    Init,
    /// Show the active user's progress summary
    Status,
    /// List partition tabs with their counts
    Views {
        /// Partition axis
        #[arg(long, value_enum, default_value_t = CliPartitionMode::Map)]
        by: CliPartitionMode,
        /// View mode controlling the `available` count
        #[arg(long, value_enum, default_value_t = CliViewMode::Available)]
        mode: CliViewMode,
    },
    /// List quests visible on one partition
    Quests {
        /// Partition name (a map or trader, depending on --by)
        #[arg(long)]
        partition: Option<String>,
        #[arg(long, value_enum, default_value_t = CliPartitionMode::Map)]
        by: CliPartitionMode,
        #[arg(long, value_enum, default_value_t = CliViewMode::Available)]
        mode: CliViewMode,
    },
    /// Mark a quest completed
    Complete { quest_id: String },
    /// Mark a quest not completed (the activity log keeps its history)
    Uncomplete { quest_id: String },
    /// Set the active user's PMC level
    SetLevel { level: u32 },
    /// Set the active user's prestige tier (-1 for PVE)
    SetPrestige { prestige: i32 },
    /// Wipe the active user's progress (asks for a second confirmation)
    Reset {
        /// Skip the interactive confirm step
        #[arg(long)]
        yes: bool,
    },
    /// Show the cross-user leaderboard
    Rankings {
        #[arg(long, value_enum, default_value_t = CliRankingMode::Prestige)]
        mode: CliRankingMode,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the activity feed and chart series
    Stats {
        /// Restrict to a single user id
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    if !matches!(cli.command, Commands::Init) {
        init_logging(&pre_config, cli.verbose);
    }

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote default configuration to {}", cli.config);
            println!("Point tracker.catalog_path at your quest catalog JSON before use.");
            Ok(())
        }
        command => {
            let config = pre_config.ok_or_else(|| {
                anyhow!(
                    "No usable config at {} (run `kappatrack init` first)",
                    cli.config
                )
            })?;
            run_command(command, &config, &cli.user)
        }
    }
}

/// Load the catalog, degrading to an empty one when the fetch fails.
/// The engine behaves correctly on an empty snapshot; retry policy is not
/// our concern here.
fn load_graph(config: &Config) -> QuestGraph {
    let quests = match tracker::load_quests_from_json(&config.tracker.catalog_path) {
        Ok(quests) => quests,
        Err(e) => {
            warn!(
                "Catalog load failed ({}), continuing with an empty catalog",
                e
            );
            Vec::new()
        }
    };
    QuestGraph::new(quests)
}

fn run_command(command: Commands, config: &Config, user: &str) -> Result<()> {
    let graph = load_graph(config);
    let store = ProgressStore::open(&config.tracker.data_dir)?;

    match command {
        Commands::Init => unreachable!("handled before config load"),
        Commands::Status => {
            let state = store.get_progress(user)?;
            let total = graph.total_kappa();
            let rate = if total == 0 {
                0.0
            } else {
                state.total_completed() as f64 / total as f64 * 100.0
            };
            println!("User:      {}", user);
            println!("PMC level: {}", state.pmc_level);
            println!("Prestige:  {}", state.prestige);
            println!(
                "Kappa:     {}/{} ({:.1}%)",
                state.total_completed(),
                total,
                rate
            );
        }
        Commands::Views { by, mode } => {
            let state = store.get_progress(user)?;
            let mode = mode.into();
            let entries = match by {
                CliPartitionMode::Map => map_partitions(&graph, &state, mode),
                CliPartitionMode::Trader => trader_partitions(&graph, &state, mode),
            };
            for (partition, stats) in entries {
                println!(
                    "{:<20} {:>3} shown  {:>3}/{:<3} done",
                    partition.name(),
                    stats.available,
                    stats.completed,
                    stats.total
                );
            }
        }
        Commands::Quests {
            partition,
            by,
            mode,
        } => {
            let state = store.get_progress(user)?;
            let mode: ViewMode = mode.into();
            let partition = partition.map(|name| match by {
                CliPartitionMode::Map => Partition::Map(name),
                CliPartitionMode::Trader => Partition::Trader(name),
            });
            for quest in tracker::quests_for_mode(&graph, &state, partition.as_ref(), mode) {
                let missing = tracker::missing_prerequisites(&graph, quest, &state);
                let gate = if mode == ViewMode::Future && !missing.is_empty() {
                    let names: Vec<&str> =
                        missing.iter().take(2).map(|q| q.name.as_str()).collect();
                    let more = missing.len().saturating_sub(2);
                    if more > 0 {
                        format!("  [needs {} (+{} more)]", names.join(", "), more)
                    } else {
                        format!("  [needs {}]", names.join(", "))
                    }
                } else if mode == ViewMode::Future && state.pmc_level < quest.level {
                    format!("  [needs level {}]", quest.level)
                } else {
                    String::new()
                };
                println!("{:<40} {} L{}{}", quest.name, quest.trader, quest.level, gate);
            }
        }
        Commands::Complete { quest_id } => {
            let state = store.get_progress(user)?;
            if state.is_completed(&quest_id) {
                println!("{} is already completed", quest_id);
                return Ok(());
            }
            store.put_progress(user, state.mark_completed(&quest_id))?;
            if let Some(quest) = graph.quest(&quest_id) {
                store.record_completion(ActivityEvent::new(user, quest, Utc::now()))?;
                info!("{} completed {}", user, escape_log(&quest.name));
            } else {
                // Catalog and progress move independently; record the bare id.
                kappatrack::metrics::inc_dangling_quest_refs();
                warn!(
                    "Completed quest {} is not in the current catalog",
                    escape_log(&quest_id)
                );
            }
            println!("Marked {} completed", quest_id);
        }
        Commands::Uncomplete { quest_id } => {
            let state = store.get_progress(user)?;
            store.put_progress(user, state.mark_uncompleted(&quest_id))?;
            println!("Marked {} not completed", quest_id);
        }
        Commands::SetLevel { level } => {
            let mut state = store.get_progress(user)?;
            state.pmc_level = level.max(1);
            store.put_progress(user, state)?;
            println!("PMC level set to {}", level.max(1));
        }
        Commands::SetPrestige { prestige } => {
            let mut state = store.get_progress(user)?;
            state.prestige = prestige;
            store.put_progress(user, state)?;
            println!("Prestige set to {}", prestige);
        }
        Commands::Reset { yes } => {
            if !yes {
                let mut gate =
                    ConfirmGate::new(Duration::seconds(config.tracker.confirm_window_seconds));
                gate.press(Utc::now());
                println!(
                    "This wipes all progress for {}. Press Enter within {}s to confirm, Ctrl-C to abort.",
                    user, config.tracker.confirm_window_seconds
                );
                let mut line = String::new();
                std::io::stdin().read_line(&mut line)?;
                match gate.press(Utc::now()) {
                    ConfirmOutcome::Committed => {}
                    ConfirmOutcome::Armed => {
                        println!("Confirmation window expired; nothing was reset.");
                        return Ok(());
                    }
                }
            }
            store.reset_progress(user)?;
            info!("Progress reset for {}", user);
            println!("Progress reset for {}", user);
        }
        Commands::Rankings { mode, limit } => {
            let mode = match mode {
                CliRankingMode::Prestige => RankingMode::PrestigeWeighted,
                CliRankingMode::Completion => RankingMode::CompletionWeighted,
            };
            let limit = limit.or(Some(config.tracker.rankings_limit));
            for ranked in store.rankings(graph.total_kappa(), mode, limit)? {
                let entry = &ranked.entry;
                println!(
                    "#{:<3} {:<20} P{:<3} L{:<3} {:>5.1}% ({} quests)",
                    ranked.rank,
                    entry.identity,
                    entry.prestige,
                    entry.pmc_level,
                    entry.completion_rate,
                    entry.total_completed
                );
            }
        }
        Commands::Stats { user: stats_user } => {
            let filter = match stats_user {
                Some(id) => UserFilter::Single(id),
                None => UserFilter::All,
            };
            let window = Duration::minutes(config.tracker.downsample_window_minutes);
            for user_stats in store.statistics(window, &filter)? {
                println!("{} ({} events)", user_stats.user_id, user_stats.activity.len());
                for point in &user_stats.series {
                    println!(
                        "  {}  {:>4} completed",
                        point.timestamp.format("%Y-%m-%d %H:%M"),
                        point.cumulative_count
                    );
                }
            }
            println!("--- recent activity ---");
            for event in store.global_timeline(&filter)?.into_iter().take(20) {
                println!(
                    "{}  {}  {} ({})",
                    event.completed_at.format("%Y-%m-%d %H:%M"),
                    event.user_id,
                    event.quest_name,
                    event.trader
                );
            }
        }
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => match config.as_ref().map(|c| c.logging.level.as_str()) {
            Some("debug") => log::LevelFilter::Debug,
            Some("trace") => log::LevelFilter::Trace,
            Some("warn") => log::LevelFilter::Warn,
            Some("error") => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        },
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let write_mutex = mutex.clone();
            // If stdout is a TTY, mirror log lines to the console as well.
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
