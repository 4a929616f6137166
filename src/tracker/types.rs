use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const PROGRESS_SCHEMA_VERSION: u8 = 1;
pub const ACTIVITY_SCHEMA_VERSION: u8 = 1;

/// Map name used for quests that are not tied to a specific location.
/// This partition is always pinned first in map-ordered views.
pub const ANY_LOCATION: &str = "Any Location";

/// Item requirement categories tracked per quest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Keys,
    Markers,
    Jammers,
    Cameras,
    /// Found-in-raid hand-in items.
    Fir,
}

/// A single tagged item requirement on a quest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredItem {
    pub category: ItemCategory,
    pub name: String,
    pub count: u32,
}

/// Immutable catalog entry for one quest.
///
/// Prerequisites are already normalized at load time (see `seed_loader`):
/// a malformed or absent raw field becomes an empty list, so nothing past
/// the catalog boundary ever parses or swallows errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub trader: String,
    pub map_name: String,
    /// Minimum PMC level required, always >= 1.
    pub level: u32,
    pub prerequisite_quests: Vec<String>,
    /// Only quests with this flag set are ever counted or shown.
    pub required_for_kappa: bool,
    pub required_items: Vec<RequiredItem>,
    pub objectives: Vec<String>,
    // Opaque display fields, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shopping_list: Vec<String>,
}

impl Quest {
    pub fn new(id: &str, name: &str, trader: &str, level: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            trader: trader.to_string(),
            map_name: ANY_LOCATION.to_string(),
            level: level.max(1),
            prerequisite_quests: Vec::new(),
            required_for_kappa: true,
            required_items: Vec::new(),
            objectives: Vec::new(),
            wiki_link: None,
            notes: None,
            images: Vec::new(),
            shopping_list: Vec::new(),
        }
    }

    pub fn with_map(mut self, map_name: &str) -> Self {
        self.map_name = map_name.to_string();
        self
    }

    pub fn with_prerequisite(mut self, quest_id: &str) -> Self {
        self.prerequisite_quests.push(quest_id.to_string());
        self
    }

    pub fn with_required_item(mut self, category: ItemCategory, name: &str, count: u32) -> Self {
        self.required_items.push(RequiredItem {
            category,
            name: name.to_string(),
            count,
        });
        self
    }

    pub fn with_objective(mut self, objective: &str) -> Self {
        self.objectives.push(objective.to_string());
        self
    }

    pub fn not_kappa(mut self) -> Self {
        self.required_for_kappa = false;
        self
    }
}

/// Prestige value reserved for the non-prestige alternate mode (PVE).
/// Ranked strictly below every real prestige tier.
pub const PVE_PRESTIGE: i32 = -1;

pub const DEFAULT_PMC_LEVEL: u32 = 1;
pub const DEFAULT_PRESTIGE: i32 = 0;

/// Per-user progress snapshot. The store is the sole writer; the engine
/// only reads these and returns modified copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProgressState {
    pub pmc_level: u32,
    pub prestige: i32,
    pub completed_quests: HashSet<String>,
    pub schema_version: u8,
}

impl Default for UserProgressState {
    fn default() -> Self {
        Self {
            pmc_level: DEFAULT_PMC_LEVEL,
            prestige: DEFAULT_PRESTIGE,
            completed_quests: HashSet::new(),
            schema_version: PROGRESS_SCHEMA_VERSION,
        }
    }
}

impl UserProgressState {
    pub fn new(pmc_level: u32, prestige: i32) -> Self {
        Self {
            pmc_level: pmc_level.max(1),
            prestige,
            completed_quests: HashSet::new(),
            schema_version: PROGRESS_SCHEMA_VERSION,
        }
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.completed_quests.contains(quest_id)
    }

    /// Return a copy with `quest_id` marked complete. Idempotent: marking an
    /// already-completed quest is a no-op.
    pub fn mark_completed(&self, quest_id: &str) -> Self {
        let mut next = self.clone();
        next.completed_quests.insert(quest_id.to_string());
        next
    }

    /// Return a copy with `quest_id` no longer complete. Removing an absent
    /// id is a no-op.
    pub fn mark_uncompleted(&self, quest_id: &str) -> Self {
        let mut next = self.clone();
        next.completed_quests.remove(quest_id);
        next
    }

    pub fn total_completed(&self) -> usize {
        self.completed_quests.len()
    }
}

/// Which quests a view shows for the active partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Not completed and currently unlocked.
    Available,
    /// Already completed.
    Finished,
    /// Every remaining quest, ignoring level and prerequisite gating.
    Future,
}

/// Which axis the view is grouped on. Selecting one axis resets the other's
/// active selection; the two are never combined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    ByMap,
    ByTrader,
}

/// A single grouping value on the active axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Map(String),
    Trader(String),
}

impl Partition {
    pub fn matches(&self, quest: &Quest) -> bool {
        match self {
            Partition::Map(name) => quest.map_name == *name,
            Partition::Trader(name) => quest.trader == *name,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Partition::Map(name) | Partition::Trader(name) => name,
        }
    }
}

/// Counts shown on a partition tab. `available` is view-mode dependent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartitionStats {
    pub total: usize,
    pub completed: usize,
    pub available: usize,
}

/// One user's progress summary as fed to the rankings sort.
/// `completion_rate` is computed by the store query, never by the sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingEntry {
    pub identity: String,
    pub pmc_level: u32,
    pub prestige: i32,
    pub total_completed: usize,
    /// Percentage of Kappa quests completed (0.0 to 100.0).
    pub completion_rate: f64,
}

/// A completion event in the activity log. Append-only, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEvent {
    pub user_id: String,
    pub quest_id: String,
    pub quest_name: String,
    pub trader: String,
    pub completed_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ActivityEvent {
    pub fn new(user_id: &str, quest: &Quest, completed_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            quest_id: quest.id.clone(),
            quest_name: quest.name.clone(),
            trader: quest.trader.clone(),
            completed_at,
            schema_version: ACTIVITY_SCHEMA_VERSION,
        }
    }
}

/// One point on a user's cumulative-progress chart line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProgressPoint {
    pub timestamp: DateTime<Utc>,
    pub cumulative_count: usize,
}
