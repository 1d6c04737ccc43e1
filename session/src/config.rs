use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use memorito_core::{DEFAULT_PAIRS, PairCount, is_improvement};
use serde::{Deserialize, Serialize};

use crate::LeaderboardId;

/// How long a mismatched pair stays up before it is turned back down.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(900);

/// When a winning move count is sent to the leaderboard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitPolicy {
    /// Every win, the leaderboard keeps its own minimum.
    Always,
    /// Only wins that beat the personal best known when the game ended.
    #[default]
    ImprovementsOnly,
}

impl SubmitPolicy {
    pub const fn should_submit(self, previous_best: Option<u32>, moves: u32) -> bool {
        match self {
            Self::Always => true,
            Self::ImprovementsOnly => is_improvement(previous_best, moves),
        }
    }
}

impl fmt::Display for SubmitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Always => "always",
            Self::ImprovementsOnly => "improvements-only",
        })
    }
}

impl FromStr for SubmitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "improvements-only" | "improvements" => Ok(Self::ImprovementsOnly),
            other => Err(format!("unknown submit policy {other:?}, expected \"always\" or \"improvements-only\"")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pairs: PairCount,
    pub grace_period: Duration,
    pub leaderboard: LeaderboardId,
    pub submit_policy: SubmitPolicy,
    /// Fixes the sequence of decks, entropy when unset.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS,
            grace_period: DEFAULT_GRACE_PERIOD,
            leaderboard: LeaderboardId::default(),
            submit_policy: SubmitPolicy::default(),
            seed: None,
        }
    }
}
