//! Quest availability classification.
//!
//! Free functions over a [`QuestGraph`] and a user's progress snapshot.
//! Everything here is filtered to Kappa-required quests and, when a
//! partition is given, to quests on that partition. The four result sets
//! obey: `available` and `finished` are disjoint, and `future` is a
//! superset of `available` (future ignores level/prerequisite gating).

use crate::tracker::graph::QuestGraph;
use crate::tracker::types::{Partition, Quest, UserProgressState, ViewMode};

/// How a single quest stands relative to one user's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    /// Level gate or a prerequisite not met.
    Locked,
    /// Unlocked and not yet completed.
    Available,
    /// Completed.
    Finished,
}

/// Classify one quest against a user's snapshot.
pub fn status_of(graph: &QuestGraph, quest: &Quest, state: &UserProgressState) -> QuestStatus {
    if state.is_completed(&quest.id) {
        QuestStatus::Finished
    } else if is_unlocked(graph, quest, state) {
        QuestStatus::Available
    } else {
        QuestStatus::Locked
    }
}

/// True iff the user meets the level gate and has completed every
/// prerequisite of `quest`. A quest whose raw prerequisite field was
/// malformed has an empty normalized list and passes the prerequisite
/// check unconditionally.
pub fn is_unlocked(graph: &QuestGraph, quest: &Quest, state: &UserProgressState) -> bool {
    if state.pmc_level < quest.level {
        return false;
    }
    graph
        .prerequisites_of(&quest.id)
        .iter()
        .all(|id| state.completed_quests.contains(id))
}

fn on_partition(quest: &Quest, partition: Option<&Partition>) -> bool {
    partition.map(|p| p.matches(quest)).unwrap_or(true)
}

/// Quests the user can work on right now: not completed and unlocked.
pub fn available_quests<'a>(
    graph: &'a QuestGraph,
    state: &UserProgressState,
    partition: Option<&Partition>,
) -> Vec<&'a Quest> {
    graph
        .kappa_quests()
        .filter(|q| on_partition(q, partition))
        .filter(|q| !state.is_completed(&q.id) && is_unlocked(graph, q, state))
        .collect()
}

/// Quests the user has already completed.
pub fn finished_quests<'a>(
    graph: &'a QuestGraph,
    state: &UserProgressState,
    partition: Option<&Partition>,
) -> Vec<&'a Quest> {
    graph
        .kappa_quests()
        .filter(|q| on_partition(q, partition))
        .filter(|q| state.is_completed(&q.id))
        .collect()
}

/// Every remaining quest on the partition regardless of lock status.
/// Used to preview the full remaining chain.
pub fn future_quests<'a>(
    graph: &'a QuestGraph,
    state: &UserProgressState,
    partition: Option<&Partition>,
) -> Vec<&'a Quest> {
    graph
        .kappa_quests()
        .filter(|q| on_partition(q, partition))
        .filter(|q| !state.is_completed(&q.id))
        .collect()
}

/// Quests visible under `mode`, for rendering a view body.
pub fn quests_for_mode<'a>(
    graph: &'a QuestGraph,
    state: &UserProgressState,
    partition: Option<&Partition>,
    mode: ViewMode,
) -> Vec<&'a Quest> {
    match mode {
        ViewMode::Available => available_quests(graph, state, partition),
        ViewMode::Finished => finished_quests(graph, state, partition),
        ViewMode::Future => future_quests(graph, state, partition),
    }
}

/// The prerequisites of `quest` the user has not completed yet, resolved to
/// live catalog records. Dangling prerequisite ids are silently excluded
/// (they cannot be shown, and the unlock check already counts them).
/// Lets a future view explain "missing quest X, Y" vs "missing level".
pub fn missing_prerequisites<'a>(
    graph: &'a QuestGraph,
    quest: &Quest,
    state: &UserProgressState,
) -> Vec<&'a Quest> {
    graph
        .prerequisites_of(&quest.id)
        .iter()
        .filter(|id| !state.completed_quests.contains(*id))
        .filter_map(|id| graph.quest(id))
        .collect()
}
