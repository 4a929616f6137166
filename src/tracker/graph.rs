//! Quest catalog index: id lookups plus the reverse prerequisite relation.
//!
//! Built once per catalog load. Only one-hop lookups are exposed; the
//! prerequisite relation is assumed (never verified) to be acyclic, and no
//! transitive closure is computed, so a cyclic catalog cannot cause
//! non-termination inside the graph itself. Callers layering recursive
//! traversal on top must bring their own visited-set guard.

use std::collections::HashMap;

use crate::tracker::types::Quest;

/// Indexed view over an immutable quest catalog for one session.
pub struct QuestGraph {
    quests: Vec<Quest>,
    by_id: HashMap<String, usize>,
    /// quest id -> indices of quests that list it as a prerequisite.
    dependents: HashMap<String, Vec<usize>>,
}

impl QuestGraph {
    /// Build the forward and reverse indices from a loaded catalog.
    /// Duplicate ids keep the first record; later duplicates are ignored.
    pub fn new(quests: Vec<Quest>) -> Self {
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(quests.len());
        let mut dependents: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, quest) in quests.iter().enumerate() {
            by_id.entry(quest.id.clone()).or_insert(idx);
            for prereq_id in &quest.prerequisite_quests {
                dependents.entry(prereq_id.clone()).or_default().push(idx);
            }
        }

        Self {
            quests,
            by_id,
            dependents,
        }
    }

    /// Look up a quest by id. Dangling ids (from an independently updated
    /// progress snapshot) simply return `None`.
    pub fn quest(&self, quest_id: &str) -> Option<&Quest> {
        self.by_id.get(quest_id).map(|&idx| &self.quests[idx])
    }

    /// The normalized prerequisite list for `quest_id`. Unknown ids and
    /// quests whose raw prerequisite field failed to parse both yield an
    /// empty slice (fail-open, normalized at catalog load).
    pub fn prerequisites_of(&self, quest_id: &str) -> &[String] {
        self.quest(quest_id)
            .map(|q| q.prerequisite_quests.as_slice())
            .unwrap_or(&[])
    }

    /// All quests whose prerequisite list contains `quest_id`.
    pub fn dependents_of(&self, quest_id: &str) -> Vec<&Quest> {
        self.dependents
            .get(quest_id)
            .map(|indices| indices.iter().map(|&idx| &self.quests[idx]).collect())
            .unwrap_or_default()
    }

    /// Every quest in catalog order.
    pub fn all_quests(&self) -> &[Quest] {
        &self.quests
    }

    /// Quests counted toward the Kappa objective, in catalog order.
    /// All views and counts operate only over these.
    pub fn kappa_quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(|q| q.required_for_kappa)
    }

    pub fn total_kappa(&self) -> usize {
        self.kappa_quests().count()
    }
}
