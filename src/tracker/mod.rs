//! Quest progression and aggregation engine.
//!
//! The engine is pure and single-threaded: every operation is a synchronous
//! transformation over a catalog snapshot ([`graph::QuestGraph`]) and a
//! progress snapshot ([`types::UserProgressState`]) supplied by the caller.
//! Nothing in here blocks, suspends, or holds shared mutable state; the
//! sled-backed [`storage::ProgressStore`] is the only stateful collaborator
//! and is the sole writer of progress snapshots.

pub mod availability;
pub mod confirm;
pub mod errors;
pub mod graph;
pub mod partition;
pub mod rankings;
pub mod seed_loader;
pub mod statistics;
pub mod storage;
pub mod types;

pub use availability::{
    available_quests, finished_quests, future_quests, is_unlocked, missing_prerequisites,
    quests_for_mode, status_of, QuestStatus,
};
pub use confirm::{ConfirmGate, ConfirmOutcome};
pub use errors::TrackerError;
pub use graph::QuestGraph;
pub use partition::{map_partitions, stats_for, trader_partitions, ViewSelection, TRADER_ORDER};
pub use rankings::{rank_users, RankedEntry, RankingMode};
pub use seed_loader::{load_quests_from_json, load_quests_from_str};
pub use statistics::{cumulative_series, downsample, merge_timeline, UserFilter};
pub use storage::{ProgressStore, ProgressStoreBuilder, UserStatistics};
pub use types::*;
