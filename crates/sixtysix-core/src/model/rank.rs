use core::fmt;
use serde::{Deserialize, Serialize};

/// Card ranks in trick-taking order, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Nine = 0,
    Jack = 1,
    Queen = 2,
    King = 3,
    Ten = 4,
    Ace = 5,
}

impl Rank {
    pub const ORDERED: [Rank; 6] = [
        Rank::Nine,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ten,
        Rank::Ace,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Rank::Nine),
            1 => Some(Rank::Jack),
            2 => Some(Rank::Queen),
            3 => Some(Rank::King),
            4 => Some(Rank::Ten),
            5 => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Position in the fixed ordering 9 < J < Q < K < 10 < A.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Card points collected by whoever wins the trick.
    pub const fn points(self) -> u32 {
        match self {
            Rank::Nine => 0,
            Rank::Jack => 2,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Ten => 10,
            Rank::Ace => 11,
        }
    }

    pub const fn is_marriage_rank(self) -> bool {
        matches!(self, Rank::King | Rank::Queen)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Nine => "9",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ten => "10",
            Rank::Ace => "A",
        };
        f.write_str(text)
    }
}
