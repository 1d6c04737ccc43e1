use thiserror::Error;

use crate::PairCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid tile index")]
    InvalidIndex,
    #[error("Tile is already face up")]
    AlreadyFaceUp,
    #[error("Tile is already matched")]
    AlreadyMatched,
    #[error("A revealed pair is still being resolved")]
    PairPending,
    #[error("A deck needs at least one pair")]
    NoPairs,
    #[error("Too many pairs, requested {requested} but only {available} symbols exist")]
    TooManyPairs { requested: PairCount, available: PairCount },
    #[error("Every symbol must appear exactly twice")]
    UnpairedSymbol,
    #[error("Tile state does not fit a fresh or partly solved deck")]
    InvalidTile,
}

pub type Result<T> = core::result::Result<T, GameError>;
