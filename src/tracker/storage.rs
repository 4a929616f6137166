use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use sled::IVec;

use crate::tracker::errors::TrackerError;
use crate::tracker::rankings::{rank_users, RankedEntry, RankingMode};
use crate::tracker::statistics::{cumulative_series, downsample, merge_timeline, UserFilter};
use crate::tracker::types::{
    ActivityEvent, ProgressPoint, RankingEntry, UserProgressState, ACTIVITY_SCHEMA_VERSION,
    PROGRESS_SCHEMA_VERSION,
};

const TREE_PROGRESS: &str = "tracker_progress";
const TREE_ACTIVITY: &str = "tracker_activity";

fn next_timestamp_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000)
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct ProgressStoreBuilder {
    path: PathBuf,
}

impl ProgressStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<ProgressStore, TrackerError> {
        ProgressStore::open(self.path)
    }
}

/// Sled-backed persistence for per-user progress snapshots and the
/// append-only activity log. Snapshots are replaced wholesale on every
/// persist; there are no partial-field updates. This is the sole writer of
/// progress state — the engine only reads snapshots and returns copies.
pub struct ProgressStore {
    _db: sled::Db,
    progress: sled::Tree,
    activity: sled::Tree,
}

/// One user's statistics view: display identity, newest-first activity, and
/// a downsampled cumulative-progress series for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStatistics {
    pub user_id: String,
    pub activity: Vec<ActivityEvent>,
    pub series: Vec<ProgressPoint>,
}

impl ProgressStore {
    /// Open (or create) the progress store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TrackerError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let progress = db.open_tree(TREE_PROGRESS)?;
        let activity = db.open_tree(TREE_ACTIVITY)?;
        Ok(Self {
            _db: db,
            progress,
            activity,
        })
    }

    fn progress_key(user_id: &str) -> Vec<u8> {
        format!("progress:{}", user_id.to_ascii_lowercase()).into_bytes()
    }

    fn activity_prefix(user_id: &str) -> Vec<u8> {
        format!("activity:{}:", user_id.to_ascii_lowercase()).into_bytes()
    }

    fn activity_key(user_id: &str, timestamp_nanos: i64) -> Vec<u8> {
        format!(
            "activity:{}:{:020}",
            user_id.to_ascii_lowercase(),
            timestamp_nanos
        )
        .into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, TrackerError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, TrackerError> {
        Ok(bincode::deserialize(&bytes)?)
    }

    /// Fetch a user's snapshot, or defaults (level 1, prestige 0, nothing
    /// completed) when the user has never persisted one.
    pub fn get_progress(&self, user_id: &str) -> Result<UserProgressState, TrackerError> {
        let Some(bytes) = self.progress.get(Self::progress_key(user_id))? else {
            return Ok(UserProgressState::default());
        };
        let record: UserProgressState = Self::deserialize(bytes)?;
        if record.schema_version != PROGRESS_SCHEMA_VERSION {
            return Err(TrackerError::SchemaMismatch {
                entity: "progress",
                expected: PROGRESS_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Replace a user's snapshot wholesale.
    pub fn put_progress(
        &self,
        user_id: &str,
        mut state: UserProgressState,
    ) -> Result<(), TrackerError> {
        state.schema_version = PROGRESS_SCHEMA_VERSION;
        let bytes = Self::serialize(&state)?;
        self.progress.insert(Self::progress_key(user_id), bytes)?;
        self.progress.flush()?;
        Ok(())
    }

    /// Clear completions and reset level/prestige to defaults.
    pub fn reset_progress(&self, user_id: &str) -> Result<(), TrackerError> {
        self.put_progress(user_id, UserProgressState::default())
    }

    /// Append a completion event to the activity log. Events are keyed by
    /// timestamp and never mutated or deleted afterwards; uncompleting a
    /// quest rewrites the snapshot only, history stays.
    pub fn record_completion(&self, mut event: ActivityEvent) -> Result<(), TrackerError> {
        event.schema_version = ACTIVITY_SCHEMA_VERSION;
        let key = Self::activity_key(&event.user_id, next_timestamp_nanos());
        let bytes = Self::serialize(&event)?;
        self.activity.insert(key, bytes)?;
        self.activity.flush()?;
        Ok(())
    }

    /// A user's events in append (oldest-first) order.
    pub fn activity_for(&self, user_id: &str) -> Result<Vec<ActivityEvent>, TrackerError> {
        let mut events = Vec::new();
        for entry in self.activity.scan_prefix(Self::activity_prefix(user_id)) {
            let (_, bytes) = entry?;
            events.push(Self::deserialize(bytes)?);
        }
        Ok(events)
    }

    /// All user ids with a persisted snapshot.
    pub fn list_users(&self) -> Result<Vec<String>, TrackerError> {
        let mut ids = Vec::new();
        for entry in self.progress.scan_prefix(b"progress:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(user_id) = text.strip_prefix("progress:") {
                ids.push(user_id.to_string());
            }
        }
        Ok(ids)
    }

    /// Rank every known user. `total_kappa` is the live catalog's Kappa
    /// quest count; completion rate is computed here, outside the sort.
    /// `limit` caps the returned list when set.
    pub fn rankings(
        &self,
        total_kappa: usize,
        mode: RankingMode,
        limit: Option<usize>,
    ) -> Result<Vec<RankedEntry>, TrackerError> {
        let mut entries = Vec::new();
        for user_id in self.list_users()? {
            let state = self.get_progress(&user_id)?;
            let total_completed = state.total_completed();
            let completion_rate = if total_kappa == 0 {
                0.0
            } else {
                total_completed as f64 / total_kappa as f64 * 100.0
            };
            entries.push(RankingEntry {
                identity: user_id,
                pmc_level: state.pmc_level,
                prestige: state.prestige,
                total_completed,
                completion_rate,
            });
        }
        let mut ranked = rank_users(entries, mode);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }

    /// Per-user statistics: newest-first activity plus a cumulative series
    /// downsampled to `window`. Users with no events get an empty series.
    pub fn statistics(
        &self,
        window: Duration,
        filter: &UserFilter,
    ) -> Result<Vec<UserStatistics>, TrackerError> {
        let mut out = Vec::new();
        for user_id in self.list_users()? {
            if !filter.matches(&user_id) {
                continue;
            }
            let events = self.activity_for(&user_id)?;
            let series = downsample(&cumulative_series(&events), window);
            let activity = merge_timeline(vec![events], &UserFilter::All);
            out.push(UserStatistics {
                user_id,
                activity,
                series,
            });
        }
        Ok(out)
    }

    /// The global activity feed across all users, newest first.
    pub fn global_timeline(&self, filter: &UserFilter) -> Result<Vec<ActivityEvent>, TrackerError> {
        let mut per_user = Vec::new();
        for user_id in self.list_users()? {
            per_user.push(self.activity_for(&user_id)?);
        }
        Ok(merge_timeline(per_user, filter))
    }
}
