//! # Kappatrack - Quest Progression Tracker
//!
//! Kappatrack tracks a player's progress through a large set of
//! interdependent game quests and exposes filtered views (by map, by
//! trader, by completion state), cross-player rankings, and activity
//! statistics for charting.
//!
//! ## Features
//!
//! - **Prerequisite Graph**: Quest unlock eligibility resolved from a
//!   prerequisite graph plus per-quest level gates, with fail-open handling
//!   of malformed catalog data.
//! - **Partitioned Views**: Per-map and per-trader quest counts under
//!   `available`, `finished`, and `future` view modes.
//! - **Rankings**: Deterministic, stable multi-key leaderboards across
//!   users, with a reserved sentinel tier for non-prestige (PVE) players.
//! - **Statistics**: Merged completion timelines and window-downsampled
//!   cumulative-progress series so chart lines stay readable.
//! - **Persistence**: Sled-backed progress store with full-replace
//!   snapshots and an append-only activity log.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kappatrack::config::Config;
//! use kappatrack::tracker::{self, QuestGraph, ProgressStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let quests = tracker::load_quests_from_json(&config.tracker.catalog_path)?;
//!     let graph = QuestGraph::new(quests);
//!
//!     let store = ProgressStore::open(&config.tracker.data_dir)?;
//!     let state = store.get_progress("player1")?;
//!     let available = tracker::available_quests(&graph, &state, None);
//!     println!("{} quests available", available.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`tracker`] - The progression engine: graph, availability, partitions,
//!   rankings, statistics, and the progress store
//! - [`config`] - Configuration management and validation
//! - [`metrics`] - Fail-open diagnostic counters
//! - [`logutil`] - Log sanitization for catalog-supplied strings
//!
//! ## Architecture
//!
//! The engine core is pure: it consumes a catalog snapshot and a progress
//! snapshot as plain data and returns computed views. Rendering surfaces,
//! authentication, and the mechanics of fetching snapshots are external
//! collaborators and never appear below the catalog/store boundary.

pub mod config;
pub mod logutil;
pub mod metrics;
pub mod tracker;
