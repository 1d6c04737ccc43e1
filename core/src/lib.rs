#![no_std]

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::ops::Index;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use personal_best::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod personal_best;
mod tile;
mod types;

/// Pair count of a 4x6 board.
pub const DEFAULT_PAIRS: PairCount = 12;

/// Each symbol forms at most one pair per deck.
pub const MAX_PAIRS: PairCount = ALPHABET_SIZE as PairCount;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub pairs: PairCount,
}

impl GameConfig {
    pub const fn new_unchecked(pairs: PairCount) -> Self {
        Self { pairs }
    }

    /// Lenient constructor: an out-of-range pair count is a programmer error and panics in debug builds. Release
    /// builds clamp it to `1..=MAX_PAIRS` and log a warning.
    pub fn new(pairs: PairCount) -> Self {
        debug_assert!((1..=MAX_PAIRS).contains(&pairs), "pair count {pairs} outside 1..={MAX_PAIRS}");
        let clamped = pairs.clamp(1, MAX_PAIRS);
        if clamped != pairs {
            log::warn!("Requested {} pairs, clamped to {}", pairs, clamped);
        }
        Self::new_unchecked(clamped)
    }

    pub fn try_new(pairs: PairCount) -> Result<Self> {
        match pairs {
            0 => Err(GameError::NoPairs),
            requested if requested > MAX_PAIRS => Err(GameError::TooManyPairs { requested, available: MAX_PAIRS }),
            pairs => Ok(Self::new_unchecked(pairs)),
        }
    }

    pub const fn total_tiles(&self) -> usize {
        self.pairs as usize * 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_PAIRS)
    }
}

/// Ordered, position-addressable tiles of one game.
///
/// Decoding runs the same checks as [`Deck::from_symbols`], plus tile state: a decoded deck may be partly solved
/// but never has a tile up that is not matched together with its twin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDeck")]
pub struct Deck {
    tiles: Vec<Tile>,
}

#[derive(Deserialize)]
struct RawDeck {
    tiles: Vec<Tile>,
}

impl TryFrom<RawDeck> for Deck {
    type Error = GameError;

    fn try_from(raw: RawDeck) -> Result<Self> {
        check_pairing(raw.tiles.iter().map(|tile| tile.symbol()))?;

        let mut ids = BTreeSet::new();
        let mut matched: BTreeMap<Symbol, bool> = BTreeMap::new();
        for tile in &raw.tiles {
            let symbol = tile.symbol();
            let known_symbol = Symbol::new(symbol.suit(), symbol.rank()).is_some();
            let twin_agrees = *matched.entry(symbol).or_insert(tile.is_matched()) == tile.is_matched();
            if !known_symbol || !twin_agrees || !ids.insert(tile.id()) || tile.is_matched() != tile.is_face_up() {
                return Err(GameError::InvalidTile);
            }
        }
        Ok(Self::from_tiles(raw.tiles))
    }
}

fn check_pairing(symbols: impl Iterator<Item = Symbol>) -> Result<()> {
    let mut counts: BTreeMap<Symbol, usize> = BTreeMap::new();
    for symbol in symbols {
        *counts.entry(symbol).or_default() += 1;
    }
    if counts.is_empty() {
        Err(GameError::NoPairs)
    } else if counts.values().any(|&count| count != 2) {
        Err(GameError::UnpairedSymbol)
    } else {
        Ok(())
    }
}

impl Deck {
    /// Lays out the symbols in the given order, every symbol must appear exactly twice.
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self> {
        check_pairing(symbols.iter().copied())?;

        let tiles = symbols.iter().enumerate().map(|(i, &symbol)| Tile::new(TileId::new(i as u16), symbol)).collect();
        Ok(Self::from_tiles(tiles))
    }

    pub(crate) fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, index: TileIndex) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn matched_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_matched()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_pending()).count()
    }

    /// All tiles matched.
    pub fn is_cleared(&self) -> bool {
        !self.tiles.is_empty() && self.tiles.iter().all(|tile| tile.is_matched())
    }

    pub(crate) fn tile_mut(&mut self, index: TileIndex) -> &mut Tile {
        &mut self.tiles[index]
    }
}

impl Index<TileIndex> for Deck {
    type Output = Tile;

    fn index(&self, index: TileIndex) -> &Self::Output {
        &self.tiles[index]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// Rejected reveal, nothing changed.
    NoChange,
    /// First tile of a pair turned up.
    FirstUp(TileIndex),
    Matched { pair: IndexPair, won: bool },
    /// Both tiles stay up until the mismatch is resolved.
    Mismatched { pair: IndexPair },
}

impl RevealOutcome {
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Matched { won: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_symbols_assigns_ids_in_order() {
        let (a, b) = (ALPHABET[0], ALPHABET[1]);
        let deck = Deck::from_symbols(&[a, b, a, b]).unwrap();

        assert_eq!(deck.len(), 4);
        assert_eq!(deck.pair_count(), 2);
        assert_eq!(deck[2].symbol(), a);
        assert_eq!(deck[3].id(), TileId::new(3));
        assert!(deck.tiles().iter().all(|tile| !tile.is_face_up()));
    }

    #[test]
    fn from_symbols_rejects_unpaired_layouts() {
        let (a, b) = (ALPHABET[0], ALPHABET[1]);

        assert_eq!(Deck::from_symbols(&[]), Err(GameError::NoPairs));
        assert_eq!(Deck::from_symbols(&[a, b, a]), Err(GameError::UnpairedSymbol));
        assert_eq!(Deck::from_symbols(&[a, a, a, a]), Err(GameError::UnpairedSymbol));
    }

    #[test]
    fn decoded_deck_keeps_partly_solved_state() {
        let (a, b) = (ALPHABET[0], ALPHABET[1]);
        let mut engine = PlayEngine::new(Deck::from_symbols(&[a, b, a, b]).unwrap());
        engine.reveal(0).unwrap();
        engine.reveal(2).unwrap();

        let json = serde_json::to_string(engine.deck()).unwrap();
        let decoded: Deck = serde_json::from_str(&json).unwrap();

        assert_eq!(&decoded, engine.deck());
        assert_eq!(decoded.matched_count(), 2);
    }

    #[test]
    fn decoding_rejects_layouts_the_engine_cannot_reach() {
        let (a, b) = (ALPHABET[0], ALPHABET[1]);
        let decode = |deck: &Deck| serde_json::from_str::<Deck>(&serde_json::to_string(deck).unwrap());
        let fresh = Deck::from_symbols(&[a, b, a, b]).unwrap();

        let unpaired = Deck::from_tiles(vec![Tile::new(TileId::new(0), a), Tile::new(TileId::new(1), b)]);
        assert!(decode(&unpaired).is_err());
        assert!(decode(&Deck::from_tiles(vec![])).is_err());

        let duplicate_id = Deck::from_tiles(vec![Tile::new(TileId::new(0), a), Tile::new(TileId::new(0), a)]);
        assert!(decode(&duplicate_id).is_err());

        let mut pending = fresh.clone();
        pending.tile_mut(1).face_up = true;
        assert!(decode(&pending).is_err());

        let mut half_matched = fresh.clone();
        half_matched.tile_mut(0).face_up = true;
        half_matched.tile_mut(0).matched = true;
        assert!(decode(&half_matched).is_err());

        let json = serde_json::to_string(&fresh).unwrap().replace(r#""rank":1}"#, r#""rank":0}"#);
        assert!(serde_json::from_str::<Deck>(&json).is_err());

        assert_eq!(decode(&fresh).unwrap(), fresh);
    }

    #[test]
    fn try_new_rejects_out_of_range_pairs() {
        let too_many = MAX_PAIRS + 1;

        assert_eq!(GameConfig::try_new(0), Err(GameError::NoPairs));
        assert_eq!(GameConfig::try_new(too_many), Err(GameError::TooManyPairs { requested: too_many, available: 27 }));
        assert_eq!(GameConfig::try_new(MAX_PAIRS).map(|c| c.total_tiles()), Ok(54));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn new_clamps_too_many_pairs() {
        let config = GameConfig::new(MAX_PAIRS + 5);

        assert_eq!(config.pairs, MAX_PAIRS);
    }

    #[test]
    fn default_config_is_a_4x6_board() {
        assert_eq!(GameConfig::default().total_tiles(), 24);
    }

    #[test]
    fn config_serializes_as_plain_struct() {
        let json = serde_json::to_string(&GameConfig::new(8)).unwrap();

        assert_eq!(json, r#"{"pairs":8}"#);
    }
}
