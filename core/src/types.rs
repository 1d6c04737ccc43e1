use core::fmt;
use serde::{Deserialize, Serialize};

/// Position of a tile inside a deck.
pub type TileIndex = usize;

/// Two tile positions revealed together, in reveal order.
pub type IndexPair = [TileIndex; 2];

/// Count type used for the number of pairs in a deck.
pub type PairCount = u8;

/// Ranks per suit.
pub const RANKS: u8 = 9;

/// Number of distinct symbols a deck can draw from.
pub const ALPHABET_SIZE: usize = Suit::ALL.len() * RANKS as usize;

/// Every symbol a deck can draw from, in suit-major order.
pub const ALPHABET: [Symbol; ALPHABET_SIZE] = build_alphabet();

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Man,
    Sou,
    Pin,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Man, Suit::Sou, Suit::Pin];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Man => "Man",
            Self::Sou => "Sou",
            Self::Pin => "Pin",
        }
    }
}

/// Face of a tile. Two tiles of a deck carry each symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol {
    suit: Suit,
    rank: u8,
}

impl Symbol {
    pub const fn new(suit: Suit, rank: u8) -> Option<Self> {
        if rank >= 1 && rank <= RANKS {
            Some(Self { suit, rank })
        } else {
            None
        }
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn rank(self) -> u8 {
        self.rank
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit.name(), self.rank)
    }
}

const fn build_alphabet() -> [Symbol; ALPHABET_SIZE] {
    let mut symbols = [Symbol { suit: Suit::Man, rank: 1 }; ALPHABET_SIZE];
    let mut i = 0;
    while i < ALPHABET_SIZE {
        symbols[i] = Symbol { suit: Suit::ALL[i / RANKS as usize], rank: (i % RANKS as usize) as u8 + 1 };
        i += 1;
    }
    symbols
}
