use alloc::vec::Vec;

use super::*;

/// Draws `pairs` distinct symbols from the alphabet and shuffles two tiles of each into a deck. The same seed always
/// produces the same deck.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, config: GameConfig) -> Deck {
        use rand::prelude::*;

        let mut pairs = usize::from(config.pairs);
        if pairs > ALPHABET_SIZE {
            log::warn!("Alphabet too small, requested {} pairs but only fits {}", pairs, ALPHABET_SIZE);
            pairs = ALPHABET_SIZE;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);

        // selection without replacement
        let mut alphabet = ALPHABET;
        alphabet.shuffle(&mut rng);
        let chosen = &alphabet[..pairs];

        let mut tiles: Vec<Tile> = chosen
            .iter()
            .chain(chosen)
            .enumerate()
            .map(|(i, &symbol)| Tile::new(TileId::new(i as u16), symbol))
            .collect();
        tiles.shuffle(&mut rng);

        log::debug!("generated deck of {} tiles from seed {}", tiles.len(), self.seed);
        Deck::from_tiles(tiles)
    }
}
