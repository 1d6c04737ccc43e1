use std::collections::HashMap;
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard, PoisonError};

use memorito_core::reconcile_best;

use super::*;

/// In-process leaderboard that answers every call immediately.
///
/// Deterministic stand-in for a remote service: failures can be injected per operation and every submission is
/// recorded for inspection.
#[derive(Debug, Default)]
pub struct MemoryScoreService {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    player: Option<String>,
    boards: HashMap<LeaderboardId, u32>,
    submissions: Vec<(LeaderboardId, u32)>,
    fail_authentication: bool,
    fail_submissions: bool,
    fail_loads: bool,
}

impl MemoryScoreService {
    pub fn new(player: impl Into<String>) -> Self {
        Self::from_state(MemoryState { player: Some(player.into()), ..Default::default() })
    }

    /// Service for a player who never signs in.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn with_best(self, leaderboard: &LeaderboardId, value: u32) -> Self {
        self.set_best(leaderboard, value);
        self
    }

    pub fn fail_authentication(self) -> Self {
        self.lock().fail_authentication = true;
        self
    }

    pub fn fail_submissions(self) -> Self {
        self.lock().fail_submissions = true;
        self
    }

    pub fn fail_loads(self) -> Self {
        self.lock().fail_loads = true;
        self
    }

    /// Overwrites the stored best, as another device of the same player would.
    pub fn set_best(&self, leaderboard: &LeaderboardId, value: u32) {
        self.lock().boards.insert(leaderboard.clone(), value);
    }

    pub fn best(&self, leaderboard: &LeaderboardId) -> Option<u32> {
        self.lock().boards.get(leaderboard).copied()
    }

    pub fn submissions(&self) -> Vec<(LeaderboardId, u32)> {
        self.lock().submissions.clone()
    }

    fn from_state(state: MemoryState) -> Self {
        Self { state: Mutex::new(state) }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_authenticated(state: &MemoryState) -> Result<(), ScoreError> {
        if state.player.is_some() {
            Ok(())
        } else {
            Err(ScoreError::NotAuthenticated)
        }
    }
}

impl ScoreService for MemoryScoreService {
    fn authenticate(&self) -> impl Future<Output = Result<AuthState, ScoreError>> + Send {
        let state = self.lock();
        let result = if state.fail_authentication {
            Err(ScoreError::Unavailable("authentication failed".into()))
        } else {
            Ok(match &state.player {
                Some(player) => AuthState::Authenticated { player: player.clone() },
                None => AuthState::Unauthenticated,
            })
        };
        ready(result)
    }

    fn submit_score(
        &self,
        value: u32,
        leaderboard: &LeaderboardId,
    ) -> impl Future<Output = Result<(), ScoreError>> + Send {
        let mut state = self.lock();
        let result = if state.fail_submissions {
            Err(ScoreError::Unavailable("submission rejected".into()))
        } else {
            Self::check_authenticated(&state).map(|()| {
                state.submissions.push((leaderboard.clone(), value));
                let best = reconcile_best(state.boards.get(leaderboard).copied(), Some(value));
                if let Some(best) = best {
                    state.boards.insert(leaderboard.clone(), best);
                }
            })
        };
        ready(result)
    }

    fn load_personal_best(
        &self,
        leaderboard: &LeaderboardId,
    ) -> impl Future<Output = Result<Option<u32>, ScoreError>> + Send {
        let state = self.lock();
        let result = if state.fail_loads {
            Err(ScoreError::Unavailable("leaderboard not reachable".into()))
        } else {
            Self::check_authenticated(&state).map(|()| state.boards.get(leaderboard).copied())
        };
        ready(result)
    }
}
