use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn value(self) -> u32 {
        self.rank.points()
    }

    /// King or Queen, the two halves of a marriage.
    pub const fn is_marriage_card(self) -> bool {
        self.rank.is_marriage_rank()
    }

    /// The other half of a marriage for a King or Queen.
    pub const fn marriage_partner(self) -> Option<Card> {
        match self.rank {
            Rank::King => Some(Card::new(Rank::Queen, self.suit)),
            Rank::Queen => Some(Card::new(Rank::King, self.suit)),
            _ => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
