use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ScoreError;

pub use json_file::*;
pub use memory::*;

mod json_file;
mod memory;

/// Board used for both submissions and personal-best lookups.
pub const DEFAULT_LEADERBOARD: &str = "KingOfTheHill";

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderboardId(String);

impl LeaderboardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LeaderboardId {
    fn default() -> Self {
        Self::new(DEFAULT_LEADERBOARD)
    }
}

impl fmt::Display for LeaderboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    Authenticated {
        player: String,
    },
    #[default]
    Unauthenticated,
}

impl AuthState {
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Remote leaderboard the engine reports wins to. Lower scores are better.
///
/// Calls may fail or never be authenticated; the engine keeps playing either way.
pub trait ScoreService: Send + Sync + 'static {
    fn authenticate(&self) -> impl Future<Output = Result<AuthState, ScoreError>> + Send;

    fn submit_score(
        &self,
        value: u32,
        leaderboard: &LeaderboardId,
    ) -> impl Future<Output = Result<(), ScoreError>> + Send;

    /// `Ok(None)` when the player has no score on the board yet.
    fn load_personal_best(
        &self,
        leaderboard: &LeaderboardId,
    ) -> impl Future<Output = Result<Option<u32>, ScoreError>> + Send;
}

impl<T: ScoreService> ScoreService for Arc<T> {
    fn authenticate(&self) -> impl Future<Output = Result<AuthState, ScoreError>> + Send {
        (**self).authenticate()
    }

    fn submit_score(
        &self,
        value: u32,
        leaderboard: &LeaderboardId,
    ) -> impl Future<Output = Result<(), ScoreError>> + Send {
        (**self).submit_score(value, leaderboard)
    }

    fn load_personal_best(
        &self,
        leaderboard: &LeaderboardId,
    ) -> impl Future<Output = Result<Option<u32>, ScoreError>> + Send {
        (**self).load_personal_best(leaderboard)
    }
}
