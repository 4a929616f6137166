//! Fail-open diagnostic counters.
//!
//! The engine never aborts on bad catalog data; it narrows results and
//! bumps one of these counters so operators can see how degraded a load
//! was. Counters are process-global and monotonically increasing.

use std::sync::atomic::{AtomicU64, Ordering};

static MALFORMED_PREREQUISITES: AtomicU64 = AtomicU64::new(0);
static MALFORMED_REQUIRED_ITEMS: AtomicU64 = AtomicU64::new(0);
static DANGLING_QUEST_REFS: AtomicU64 = AtomicU64::new(0);

pub fn inc_malformed_prerequisites() {
    MALFORMED_PREREQUISITES.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_malformed_required_items() {
    MALFORMED_REQUIRED_ITEMS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_dangling_quest_refs() {
    DANGLING_QUEST_REFS.fetch_add(1, Ordering::Relaxed);
}

/// Point-in-time snapshot of all counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub malformed_prerequisites: u64,
    pub malformed_required_items: u64,
    pub dangling_quest_refs: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        malformed_prerequisites: MALFORMED_PREREQUISITES.load(Ordering::Relaxed),
        malformed_required_items: MALFORMED_REQUIRED_ITEMS.load(Ordering::Relaxed),
        dangling_quest_refs: DANGLING_QUEST_REFS.load(Ordering::Relaxed),
    }
}
