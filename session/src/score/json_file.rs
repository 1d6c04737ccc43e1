use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use memorito_core::reconcile_best;
use tokio::io::AsyncWriteExt;

use super::*;

const DIRNAME: &str = "memorito";
const FILENAME: &str = "scores.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct BoardRecord {
    best: Option<u32>,
    submissions: u32,
}

type Boards = BTreeMap<String, BoardRecord>;

/// Leaderboard kept in a local JSON file, for playing without a remote service.
///
/// Saves go to a sibling `.tmp` file that is renamed over the scores, so the file on disk is always a complete
/// document.
#[derive(Debug)]
pub struct JsonFileScoreService {
    path: PathBuf,
    player: Option<String>,
    // held across every read and read-modify-write of the file
    file_lock: tokio::sync::Mutex<()>,
}

impl JsonFileScoreService {
    /// The player name comes from `$USER` (or `$USERNAME`); without one the player stays signed out.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let player = std::env::var("USER").or_else(|_| std::env::var("USERNAME")).ok().filter(|name| !name.is_empty());
        Self { path: path.into(), player, file_lock: tokio::sync::Mutex::new(()) }
    }

    pub fn with_player(mut self, player: Option<String>) -> Self {
        self.player = player;
        self
    }

    /// `$XDG_CONFIG_HOME/memorito/scores.json`, or under `~/.config` when unset.
    pub fn default_path() -> PathBuf {
        let base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
            _ => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        base.join(DIRNAME).join(FILENAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_boards(&self) -> Result<Boards, ScoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => Ok(serde_json::from_slice(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Boards::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_boards(&self, boards: &Boards) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_vec_pretty(boards)?;

        let staging = self.staging_path();
        let mut file = tokio::fs::File::create(&staging).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_else(|| FILENAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn check_authenticated(&self) -> Result<(), ScoreError> {
        if self.player.is_some() {
            Ok(())
        } else {
            Err(ScoreError::NotAuthenticated)
        }
    }
}

impl ScoreService for JsonFileScoreService {
    async fn authenticate(&self) -> Result<AuthState, ScoreError> {
        Ok(match &self.player {
            Some(player) => AuthState::Authenticated { player: player.clone() },
            None => AuthState::Unauthenticated,
        })
    }

    async fn submit_score(&self, value: u32, leaderboard: &LeaderboardId) -> Result<(), ScoreError> {
        self.check_authenticated()?;

        let _guard = self.file_lock.lock().await;
        let mut boards = self.read_boards().await?;
        let record = boards.entry(leaderboard.as_str().to_owned()).or_default();
        record.submissions += 1;
        record.best = reconcile_best(record.best, Some(value));
        self.write_boards(&boards).await
    }

    async fn load_personal_best(&self, leaderboard: &LeaderboardId) -> Result<Option<u32>, ScoreError> {
        self.check_authenticated()?;

        let _guard = self.file_lock.lock().await;
        let boards = self.read_boards().await?;
        Ok(boards.get(leaderboard.as_str()).and_then(|record| record.best))
    }
}
