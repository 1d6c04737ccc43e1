use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Opaque identifier of a tile, stable for the lifetime of its deck.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u16);

impl TileId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Canonical tile state stored by the play engine.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    symbol: Symbol,
    pub(crate) face_up: bool,
    pub(crate) matched: bool,
}

impl Tile {
    pub const fn new(id: TileId, symbol: Symbol) -> Self {
        Self { id, symbol, face_up: false, matched: false }
    }

    pub const fn id(self) -> TileId {
        self.id
    }

    pub const fn symbol(self) -> Symbol {
        self.symbol
    }

    pub const fn is_face_up(self) -> bool {
        self.face_up
    }

    pub const fn is_matched(self) -> bool {
        self.matched
    }

    /// Revealed but not yet confirmed as part of a pair.
    pub const fn is_pending(self) -> bool {
        self.face_up && !self.matched
    }
}
