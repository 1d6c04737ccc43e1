//! Observable contract between the game engine and its collaborators.

use memorito_core::{IndexPair, PlayEngine, Tile};
use serde::{Deserialize, Serialize};

/// Discrete notifications, in the order the engine produced them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    NewGame { generation: u64, pairs: usize },
    Matched { indices: IndexPair },
    Mismatched { indices: IndexPair },
    /// The grace period of a mismatch ran out and both tiles are face down again.
    MismatchHidden { indices: IndexPair },
    Won { moves: u32 },
    PersonalBest { value: u32 },
    AuthChanged { authenticated: bool },
}

impl GameEvent {
    pub fn matched_indices(&self) -> Option<IndexPair> {
        match self {
            Self::Matched { indices } => Some(*indices),
            _ => None,
        }
    }

    pub fn mismatched_indices(&self) -> Option<IndexPair> {
        match self {
            Self::Mismatched { indices } => Some(*indices),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: u16,
    pub symbol: String,
    pub face_up: bool,
    pub matched: bool,
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id().get(),
            symbol: tile.symbol().to_string(),
            face_up: tile.is_face_up(),
            matched: tile.is_matched(),
        }
    }
}

/// Polled view of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: u64,
    pub tiles: Vec<TileView>,
    pub move_count: u32,
    pub personal_best: Option<u32>,
    pub is_won: bool,
    pub authenticated: bool,
    pub pairs_matched: usize,
    pub total_pairs: usize,
    pub progress: f64,
}

impl Snapshot {
    pub fn from_engine(engine: &PlayEngine, generation: u64, personal_best: Option<u32>, authenticated: bool) -> Self {
        Self {
            generation,
            tiles: engine.tiles().iter().map(TileView::from).collect(),
            move_count: engine.move_count(),
            personal_best,
            is_won: engine.is_won(),
            authenticated,
            pairs_matched: engine.matched_pairs(),
            total_pairs: engine.total_pairs(),
            progress: engine.progress(),
        }
    }
}

/// One JSON document per line, as consumed by line-oriented front-ends.
pub fn to_json_line<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}
