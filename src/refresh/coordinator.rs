use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::LeaderboardError;
use crate::refresh::state::LeaderboardState;
use crate::scoring;
use crate::sources::DataSourceResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Committed {
        generation: u64,
        participants: usize,
        source: String,
    },
    /// Every source failed; the previous leaderboard was kept.
    Failed { generation: u64, error: String },
    /// Superseded by a newer refresh before finishing
    Cancelled { generation: u64 },
    /// Finished, but a newer refresh had already started
    Stale { generation: u64 },
}

impl RefreshOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            RefreshOutcome::Committed { generation, .. }
            | RefreshOutcome::Failed { generation, .. }
            | RefreshOutcome::Cancelled { generation }
            | RefreshOutcome::Stale { generation } => *generation,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, RefreshOutcome::Committed { .. })
    }
}

struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// Runs refresh cycles against a resolver and publishes results into the
/// shared state. Starting a refresh cancels the one in flight.
pub struct Refresher {
    resolver: Arc<DataSourceResolver>,
    state: Arc<LeaderboardState>,
    next_generation: AtomicU64,
    in_flight: Mutex<Option<InFlight>>,
}

impl Refresher {
    pub fn new(resolver: Arc<DataSourceResolver>, state: Arc<LeaderboardState>) -> Self {
        Self {
            resolver,
            state,
            next_generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    pub fn state(&self) -> &Arc<LeaderboardState> {
        &self.state
    }

    /// Allocates a generation, cancels the previous refresh and marks the
    /// state as loading. Done under one lock so generations and tokens are
    /// handed out in the same order.
    fn start(&self) -> (u64, CancellationToken) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        if let Some(previous) = in_flight.replace(InFlight {
            generation,
            token: token.clone(),
        }) {
            debug!(
                "Refresh {} supersedes in-flight refresh {}",
                generation, previous.generation
            );
            previous.token.cancel();
        }

        self.state.begin(generation);
        (generation, token)
    }

    fn finish(&self, generation: u64) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.as_ref().map(|f| f.generation) == Some(generation) {
            in_flight.take();
        }
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let (generation, token) = self.start();
        debug!("Starting refresh {}", generation);

        let outcome = match self.resolver.resolve(&token).await {
            Ok(resolved) => {
                let board = scoring::build_leaderboard(resolved.records);
                let participants = board.len();

                if self.state.commit(generation, board, resolved.source.clone()) {
                    info!(
                        "Refresh {} committed {} participants from {}",
                        generation, participants, resolved.source
                    );
                    RefreshOutcome::Committed {
                        generation,
                        participants,
                        source: resolved.source,
                    }
                } else {
                    debug!("Discarding stale result of refresh {}", generation);
                    RefreshOutcome::Stale { generation }
                }
            }
            Err(LeaderboardError::Cancelled) => {
                debug!("Refresh {} cancelled", generation);
                self.state.abandon(generation);
                RefreshOutcome::Cancelled { generation }
            }
            Err(e) => {
                let error = e.to_string();
                if self.state.fail(generation, error.clone()) {
                    warn!("Refresh {} failed, keeping previous leaderboard: {}", generation, error);
                    RefreshOutcome::Failed { generation, error }
                } else {
                    debug!("Ignoring failure of stale refresh {}", generation);
                    RefreshOutcome::Stale { generation }
                }
            }
        };

        self.finish(generation);
        outcome
    }

    /// Starts a refresh in the background.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let refresher = Arc::clone(self);
        tokio::spawn(async move { refresher.refresh().await })
    }

    /// Cancels the refresh in flight, if any.
    pub fn cancel_in_flight(&self) {
        let in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = in_flight.as_ref() {
            current.token.cancel();
        }
    }
}
