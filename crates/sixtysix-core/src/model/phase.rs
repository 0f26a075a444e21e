use core::fmt;
use serde::{Deserialize, Serialize};

/// Rule set in force for the next trick.
///
/// Phase one allows free play and drawing; phase two requires following suit,
/// else trumping, and nobody draws. The phase is never stored: it is derived
/// from the closed flag and what remains of the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    pub const fn derive(closed: bool, draw_pile_len: usize, trump_card_present: bool) -> Self {
        if !closed && (draw_pile_len > 0 || trump_card_present) {
            Phase::One
        } else {
            Phase::Two
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
