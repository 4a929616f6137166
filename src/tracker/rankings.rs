//! Cross-user leaderboard ordering.
//!
//! The sort is a stable total order: PVE entries (prestige sentinel `-1`)
//! always partition strictly after everyone else, then the selected mode's
//! three keys apply in sequence. Ties after all keys keep input-relative
//! order, and ranks are assigned strictly by final index (no shared ranks).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::tracker::types::{RankingEntry, PVE_PRESTIGE};

/// Which key dominates within each prestige partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Prestige desc, then completion rate desc, then PMC level desc.
    PrestigeWeighted,
    /// Completion rate desc, then prestige desc, then PMC level desc.
    CompletionWeighted,
}

/// A leaderboard row: the entry plus its 1-based rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub entry: RankingEntry,
}

fn pve_partition(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    let a_pve = a.prestige == PVE_PRESTIGE;
    let b_pve = b.prestige == PVE_PRESTIGE;
    a_pve.cmp(&b_pve)
}

fn by_rate_desc(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.completion_rate
        .partial_cmp(&a.completion_rate)
        .unwrap_or(Ordering::Equal)
}

fn compare(a: &RankingEntry, b: &RankingEntry, mode: RankingMode) -> Ordering {
    pve_partition(a, b).then_with(|| match mode {
        RankingMode::PrestigeWeighted => b
            .prestige
            .cmp(&a.prestige)
            .then_with(|| by_rate_desc(a, b))
            .then_with(|| b.pmc_level.cmp(&a.pmc_level)),
        RankingMode::CompletionWeighted => by_rate_desc(a, b)
            .then_with(|| b.prestige.cmp(&a.prestige))
            .then_with(|| b.pmc_level.cmp(&a.pmc_level)),
    })
}

/// Sort `entries` under `mode` and assign ranks. `sort_by` is stable, so
/// re-running with identical input yields identical output and fully tied
/// entries keep their input order.
pub fn rank_users(mut entries: Vec<RankingEntry>, mode: RankingMode) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| compare(a, b, mode));
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| RankedEntry {
            rank: idx + 1,
            entry,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(identity: &str, prestige: i32, rate: f64, level: u32) -> RankingEntry {
        RankingEntry {
            identity: identity.to_string(),
            pmc_level: level,
            prestige,
            total_completed: 0,
            completion_rate: rate,
        }
    }

    #[test]
    fn prestige_weighted_mode_prefers_prestige() {
        let ranked = rank_users(
            vec![entry("u2", 0, 95.0, 40), entry("u1", 2, 80.0, 30)],
            RankingMode::PrestigeWeighted,
        );
        assert_eq!(ranked[0].entry.identity, "u1");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].entry.identity, "u2");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn completion_weighted_mode_prefers_rate() {
        let ranked = rank_users(
            vec![entry("u1", 2, 80.0, 30), entry("u2", 0, 95.0, 40)],
            RankingMode::CompletionWeighted,
        );
        assert_eq!(ranked[0].entry.identity, "u2");
    }

    #[test]
    fn pve_sentinel_ranks_last_in_both_modes() {
        let entries = vec![
            entry("pve", PVE_PRESTIGE, 100.0, 79),
            entry("low", 0, 5.0, 2),
        ];
        for mode in [RankingMode::PrestigeWeighted, RankingMode::CompletionWeighted] {
            let ranked = rank_users(entries.clone(), mode);
            assert_eq!(ranked.last().unwrap().entry.identity, "pve");
        }
    }

    #[test]
    fn full_ties_keep_input_order() {
        let ranked = rank_users(
            vec![entry("first", 1, 50.0, 20), entry("second", 1, 50.0, 20)],
            RankingMode::PrestigeWeighted,
        );
        assert_eq!(ranked[0].entry.identity, "first");
        assert_eq!(ranked[1].entry.identity, "second");
        // Ranks are strictly positional even for ties.
        assert_eq!(ranked[1].rank, 2);
    }
}
