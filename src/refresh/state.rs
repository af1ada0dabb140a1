use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::RankedParticipant;

/// Point-in-time view of the leaderboard handed to readers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub participants: Vec<RankedParticipant>,
    /// Source that produced `participants`
    pub source: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// A refresh is in flight. Existing participants stay visible meanwhile.
    pub loading: bool,
    /// Error of the most recent refresh, cleared by the next success
    pub last_error: Option<String>,
    /// Refresh generation that produced `participants`, 0 before the first load
    pub generation: u64,
}

impl Snapshot {
    pub fn has_data(&self) -> bool {
        self.generation > 0
    }
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: Snapshot,
    latest_started: u64,
}

/// Holds the current leaderboard. Updates go through `begin` and one of
/// `commit`/`fail`/`abandon`, each tagged with the refresh generation;
/// updates from any generation other than the newest started are ignored.
#[derive(Debug, Default)]
pub struct LeaderboardState {
    inner: RwLock<Inner>,
}

impl LeaderboardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot.clone()
    }

    /// Marks `generation` as the newest refresh. Participants are kept.
    pub fn begin(&self, generation: u64) {
        let mut inner = self.write();
        if generation > inner.latest_started {
            inner.latest_started = generation;
            inner.snapshot.loading = true;
        }
    }

    /// Replaces the participant list. Returns false, leaving the state
    /// untouched, when a newer refresh has started since `generation`.
    pub fn commit(
        &self,
        generation: u64,
        participants: Vec<RankedParticipant>,
        source: String,
    ) -> bool {
        let mut inner = self.write();
        if generation != inner.latest_started {
            return false;
        }

        inner.snapshot = Snapshot {
            participants,
            source: Some(source),
            last_updated: Some(Utc::now()),
            loading: false,
            last_error: None,
            generation,
        };
        true
    }

    /// Records a failed refresh without touching the participant list.
    pub fn fail(&self, generation: u64, error: String) -> bool {
        let mut inner = self.write();
        if generation != inner.latest_started {
            return false;
        }

        inner.snapshot.loading = false;
        inner.snapshot.last_error = Some(error);
        true
    }

    /// Ends a refresh that produced nothing, such as one cancelled at
    /// shutdown.
    pub fn abandon(&self, generation: u64) {
        let mut inner = self.write();
        if generation == inner.latest_started {
            inner.snapshot.loading = false;
        }
    }
}
