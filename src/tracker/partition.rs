//! Per-map and per-trader partition stats and tab ordering.

use std::collections::HashSet;

use crate::tracker::availability::{available_quests, future_quests};
use crate::tracker::graph::QuestGraph;
use crate::tracker::types::{
    Partition, PartitionStats, Quest, UserProgressState, ViewMode, ANY_LOCATION,
};

/// Canonical trader display order. Traders not in this list sort after all
/// listed traders, in catalog-encounter order.
pub const TRADER_ORDER: &[&str] = &[
    "Prapor",
    "Therapist",
    "Skier",
    "Peacekeeper",
    "Mechanic",
    "Ragman",
    "Jaeger",
    "Fence",
];

/// Counts for one partition tab under the active view mode.
///
/// `total` and `completed` are unconditional; `available` follows the mode:
/// in `Finished` it equals `completed`, in `Future` it counts every
/// not-yet-completed quest (gating ignored), in `Available` it counts
/// unlocked, not-completed quests.
pub fn stats_for(
    graph: &QuestGraph,
    partition: &Partition,
    state: &UserProgressState,
    mode: ViewMode,
) -> PartitionStats {
    let total = graph
        .kappa_quests()
        .filter(|q| partition.matches(q))
        .count();
    let completed = graph
        .kappa_quests()
        .filter(|q| partition.matches(q) && state.is_completed(&q.id))
        .count();
    let available = match mode {
        ViewMode::Finished => completed,
        ViewMode::Future => future_quests(graph, state, Some(partition)).len(),
        ViewMode::Available => available_quests(graph, state, Some(partition)).len(),
    };
    PartitionStats {
        total,
        completed,
        available,
    }
}

fn distinct_in_catalog_order<F>(graph: &QuestGraph, key: F) -> Vec<String>
where
    F: Fn(&Quest) -> &str,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for quest in graph.kappa_quests() {
        let value = key(quest);
        if seen.insert(value.to_string()) {
            out.push(value.to_string());
        }
    }
    out
}

/// Map partitions with their stats, sorted descending by `available` count.
/// The "Any Location" partition is always pinned first when present.
pub fn map_partitions(
    graph: &QuestGraph,
    state: &UserProgressState,
    mode: ViewMode,
) -> Vec<(Partition, PartitionStats)> {
    let mut entries: Vec<(Partition, PartitionStats)> =
        distinct_in_catalog_order(graph, |q| q.map_name.as_str())
            .into_iter()
            .map(|name| {
                let partition = Partition::Map(name);
                let stats = stats_for(graph, &partition, state, mode);
                (partition, stats)
            })
            .collect();

    // Stable sort keeps catalog-encounter order among equal counts.
    entries.sort_by(|a, b| b.1.available.cmp(&a.1.available));
    if let Some(pos) = entries.iter().position(|(p, _)| p.name() == ANY_LOCATION) {
        let pinned = entries.remove(pos);
        entries.insert(0, pinned);
    }
    entries
}

/// Trader partitions with their stats, in canonical trader order. Traders
/// absent from [`TRADER_ORDER`] follow the listed ones, in the order they
/// first appear in the catalog.
pub fn trader_partitions(
    graph: &QuestGraph,
    state: &UserProgressState,
    mode: ViewMode,
) -> Vec<(Partition, PartitionStats)> {
    let encountered = distinct_in_catalog_order(graph, |q| q.trader.as_str());
    let mut ordered: Vec<String> = TRADER_ORDER
        .iter()
        .filter(|t| encountered.iter().any(|e| e == *t))
        .map(|t| t.to_string())
        .collect();
    for trader in encountered {
        if !TRADER_ORDER.contains(&trader.as_str()) {
            ordered.push(trader);
        }
    }

    ordered
        .into_iter()
        .map(|name| {
            let partition = Partition::Trader(name);
            let stats = stats_for(graph, &partition, state, mode);
            (partition, stats)
        })
        .collect()
}

/// Active view selection: one partition axis at a time. Switching axes
/// resets the other side to its default, so the two can never be combined
/// (the old UI kept this as a shared mutable flag; here it is an explicit
/// value threaded through each query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSelection {
    pub partition: Partition,
    pub mode: ViewMode,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            partition: Partition::Map(ANY_LOCATION.to_string()),
            mode: ViewMode::Available,
        }
    }
}

impl ViewSelection {
    /// Select a map; any active trader selection is discarded.
    pub fn select_map(&self, map_name: &str) -> Self {
        Self {
            partition: Partition::Map(map_name.to_string()),
            mode: self.mode,
        }
    }

    /// Select a trader; the active map resets to the default.
    pub fn select_trader(&self, trader: &str) -> Self {
        Self {
            partition: Partition::Trader(trader.to_string()),
            mode: self.mode,
        }
    }

    pub fn with_mode(&self, mode: ViewMode) -> Self {
        Self {
            partition: self.partition.clone(),
            mode,
        }
    }
}
