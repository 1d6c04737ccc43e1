use core::num::Saturating;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How many revealed tiles are waiting on a match decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingPhase {
    Idle,
    OneUp,
    Resolving,
}

/// Reveal/match state machine over a single deck.
///
/// At most two tiles are ever face up without being matched: a second reveal either matches the first one right
/// away or leaves the pair up in [`PendingPhase::Resolving`] until [`PlayEngine::resolve_mismatch`] is called. No
/// reveal is accepted in between.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayEngine {
    deck: Deck,
    pending: SmallVec<[TileIndex; 2]>,
    move_count: Saturating<u32>,
    won: bool,
}

impl PlayEngine {
    pub fn new(deck: Deck) -> Self {
        Self { deck, pending: SmallVec::new(), move_count: Saturating(0), won: false }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn tiles(&self) -> &[Tile] {
        self.deck.tiles()
    }

    pub fn tile_at(&self, index: TileIndex) -> Option<Tile> {
        self.deck.get(index).copied()
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Accepted reveals so far.
    pub fn move_count(&self) -> u32 {
        self.move_count.0
    }

    pub fn pending_indices(&self) -> &[TileIndex] {
        &self.pending
    }

    pub fn phase(&self) -> PendingPhase {
        match self.pending.len() {
            0 => PendingPhase::Idle,
            1 => PendingPhase::OneUp,
            _ => PendingPhase::Resolving,
        }
    }

    pub fn total_pairs(&self) -> usize {
        self.deck.pair_count()
    }

    pub fn matched_pairs(&self) -> usize {
        self.deck.matched_count() / 2
    }

    /// Share of matched tiles, `0.0` for an empty deck.
    pub fn progress(&self) -> f64 {
        if self.deck.is_empty() {
            return 0.0;
        }
        self.deck.matched_count() as f64 / self.deck.len() as f64
    }

    pub fn reveal(&mut self, index: TileIndex) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        self.check_revealable(index)?;

        self.move_count += 1;
        self.deck.tile_mut(index).face_up = true;
        self.pending.push(index);

        if self.pending.len() < 2 {
            return Ok(FirstUp(index));
        }

        let pair = [self.pending[0], self.pending[1]];
        if self.deck[pair[0]].symbol() != self.deck[pair[1]].symbol() {
            log::trace!("tiles {:?} mismatched", pair);
            return Ok(Mismatched { pair });
        }

        for index in pair {
            self.deck.tile_mut(index).matched = true;
        }
        self.pending.clear();
        let won = self.check_win();
        Ok(Matched { pair, won })
    }

    /// Turns a mismatched pair back down. Returns the pair, or `None` when nothing was waiting.
    pub fn resolve_mismatch(&mut self) -> Option<IndexPair> {
        if self.phase() != PendingPhase::Resolving {
            return None;
        }

        let pair = [self.pending[0], self.pending[1]];
        for index in pair {
            self.deck.tile_mut(index).face_up = false;
        }
        self.pending.clear();
        Some(pair)
    }

    fn check_revealable(&self, index: TileIndex) -> Result<()> {
        let tile = self.deck.get(index).ok_or(GameError::InvalidIndex)?;
        if tile.is_matched() {
            Err(GameError::AlreadyMatched)
        } else if tile.is_face_up() {
            Err(GameError::AlreadyFaceUp)
        } else if self.phase() == PendingPhase::Resolving {
            Err(GameError::PairPending)
        } else {
            Ok(())
        }
    }

    fn check_win(&mut self) -> bool {
        if !self.won && self.deck.is_cleared() {
            self.won = true;
            log::debug!("deck cleared in {} moves", self.move_count.0);
        }
        self.won
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::prelude::*;

    fn abab() -> PlayEngine {
        let (a, b) = (ALPHABET[0], ALPHABET[1]);
        PlayEngine::new(Deck::from_symbols(&[a, b, a, b]).unwrap())
    }

    #[test]
    fn mismatch_then_two_matches_wins_in_six_moves() {
        let mut engine = abab();

        assert_eq!(engine.reveal(0), Ok(RevealOutcome::FirstUp(0)));
        assert_eq!(engine.move_count(), 1);
        assert_eq!(engine.phase(), PendingPhase::OneUp);

        assert_eq!(engine.reveal(1), Ok(RevealOutcome::Mismatched { pair: [0, 1] }));
        assert_eq!(engine.move_count(), 2);
        assert_eq!(engine.phase(), PendingPhase::Resolving);
        assert!(engine.tiles()[0].is_face_up() && engine.tiles()[1].is_face_up());

        assert_eq!(engine.resolve_mismatch(), Some([0, 1]));
        assert_eq!(engine.phase(), PendingPhase::Idle);
        assert!(!engine.tiles()[0].is_face_up() && !engine.tiles()[1].is_face_up());

        engine.reveal(0).unwrap();
        assert_eq!(engine.move_count(), 3);
        assert_eq!(engine.reveal(2), Ok(RevealOutcome::Matched { pair: [0, 2], won: false }));
        assert_eq!(engine.move_count(), 4);
        assert_eq!(engine.matched_pairs(), 1);
        assert!(!engine.is_won());

        engine.reveal(1).unwrap();
        let outcome = engine.reveal(3).unwrap();

        assert!(outcome.is_win());
        assert_eq!(engine.move_count(), 6);
        assert!(engine.is_won());
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn rejected_reveals_do_not_count_moves() {
        let mut engine = abab();

        assert_eq!(engine.reveal(4), Err(GameError::InvalidIndex));
        engine.reveal(0).unwrap();
        assert_eq!(engine.reveal(0), Err(GameError::AlreadyFaceUp));
        engine.reveal(1).unwrap();
        assert_eq!(engine.reveal(2), Err(GameError::PairPending));
        assert_eq!(engine.reveal(1), Err(GameError::AlreadyFaceUp));

        assert_eq!(engine.move_count(), 2);
        assert_eq!(engine.pending_indices(), &[0, 1]);
    }

    #[test]
    fn matched_tiles_stay_matched() {
        let mut engine = abab();
        engine.reveal(0).unwrap();
        engine.reveal(2).unwrap();

        assert_eq!(engine.reveal(2), Err(GameError::AlreadyMatched));
        assert_eq!(engine.resolve_mismatch(), None);
        assert!(engine.tiles()[0].is_matched() && engine.tiles()[2].is_matched());
        assert!(engine.tiles()[0].is_face_up());
    }

    #[test]
    fn repeated_reveal_of_pending_tile_is_idempotent() {
        let mut engine = abab();
        engine.reveal(3).unwrap();
        let before = engine.clone();

        for _ in 0..5 {
            assert_eq!(engine.reveal(3), Err(GameError::AlreadyFaceUp));
        }

        assert_eq!(engine, before);
    }

    #[test]
    fn random_play_keeps_pending_window_and_monotonic_flags() {
        let mut rng = SmallRng::seed_from_u64(7);
        let deck = RandomDeckGenerator::new(99).generate(GameConfig::new(6));
        let mut engine = PlayEngine::new(deck);
        let len = engine.deck().len();
        let mut was_won = false;

        for _ in 0..2000 {
            let before = engine.move_count();
            let matched_before: Vec<bool> = engine.tiles().iter().map(|t| t.is_matched()).collect();

            let accepted = engine.reveal(rng.random_range(0..len + 1)).is_ok();
            if engine.phase() == PendingPhase::Resolving && rng.random_bool(0.5) {
                engine.resolve_mismatch();
            }

            assert_eq!(engine.move_count(), before + u32::from(accepted));
            assert!(engine.deck().pending_count() <= 2);
            for (tile, matched) in engine.tiles().iter().zip(matched_before) {
                assert!(tile.is_matched() || !matched);
            }
            assert!(engine.is_won() || !was_won);
            was_won = engine.is_won();
        }
    }
}
