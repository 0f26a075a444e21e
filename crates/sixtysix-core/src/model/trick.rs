use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRUMP_BASE: u8 = 100;
pub const LEAD_SUIT_BASE: u8 = 50;

/// Strength of `card` within a single trick. Trumps score `100 + rank index`,
/// lead-suit cards `50 + rank index`, anything else just its rank index and
/// can never win.
pub fn strength(card: Card, lead_suit: Suit, trump_suit: Suit) -> u8 {
    let base = card.rank.index();
    if card.suit == trump_suit {
        TRUMP_BASE + base
    } else if card.suit == lead_suit {
        LEAD_SUIT_BASE + base
    } else {
        base
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: PlayerPosition,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub position: PlayerPosition,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: PlayerPosition) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(2),
        }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 2
    }

    pub fn lead_card(&self) -> Option<Card> {
        self.plays.first().map(|play| play.card)
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.lead_card().map(|card| card.suit)
    }

    /// Seat expected to play next, `None` once both cards are down.
    pub fn expected_position(&self) -> Option<PlayerPosition> {
        match self.plays.len() {
            0 => Some(self.leader),
            1 => Some(self.leader.opponent()),
            _ => None,
        }
    }

    pub fn play(&mut self, position: PlayerPosition, card: Card) -> Result<(), TrickError> {
        let expected = self.expected_position().ok_or(TrickError::TrickComplete)?;
        if expected != position {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }

        self.plays.push(Play { position, card });
        Ok(())
    }

    /// The follower wins only by strictly exceeding the leader's strength.
    pub fn winner(&self, trump_suit: Suit) -> Option<PlayerPosition> {
        let [lead, follow] = self.plays.as_slice() else {
            return None;
        };
        let lead_suit = lead.card.suit;
        if strength(follow.card, lead_suit, trump_suit) > strength(lead.card, lead_suit, trump_suit)
        {
            Some(follow.position)
        } else {
            Some(lead.position)
        }
    }

    pub fn points(&self) -> u32 {
        self.plays.iter().map(|play| play.card.value()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{LEAD_SUIT_BASE, TRUMP_BASE, Trick, TrickError, strength};
    use crate::model::card::Card;
    use crate::model::player::PlayerPosition;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn strength_bands_trump_lead_and_off_suit() {
        let ace_clubs = Card::new(Rank::Ace, Suit::Clubs);
        assert_eq!(
            strength(ace_clubs, Suit::Hearts, Suit::Clubs),
            TRUMP_BASE + 5
        );
        assert_eq!(
            strength(ace_clubs, Suit::Clubs, Suit::Spades),
            LEAD_SUIT_BASE + 5
        );
        assert_eq!(strength(ace_clubs, Suit::Hearts, Suit::Spades), 5);
    }

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(PlayerPosition::North);
        assert!(matches!(
            trick.play(PlayerPosition::South, Card::new(Rank::Nine, Suit::Clubs)),
            Err(TrickError::OutOfTurn { .. })
        ));
        trick
            .play(PlayerPosition::North, Card::new(Rank::Nine, Suit::Clubs))
            .unwrap();
        trick
            .play(PlayerPosition::South, Card::new(Rank::Ten, Suit::Clubs))
            .unwrap();
        assert_eq!(
            trick.play(PlayerPosition::North, Card::new(Rank::Ace, Suit::Clubs)),
            Err(TrickError::TrickComplete)
        );
    }

    #[test]
    fn higher_card_of_lead_suit_wins() {
        let mut trick = Trick::new(PlayerPosition::South);
        trick
            .play(PlayerPosition::South, Card::new(Rank::King, Suit::Hearts))
            .unwrap();
        trick
            .play(PlayerPosition::North, Card::new(Rank::Ten, Suit::Hearts))
            .unwrap();
        assert_eq!(trick.winner(Suit::Spades), Some(PlayerPosition::North));
        assert_eq!(trick.points(), 14);
    }

    #[test]
    fn off_suit_discard_loses_even_when_higher() {
        let mut trick = Trick::new(PlayerPosition::South);
        trick
            .play(PlayerPosition::South, Card::new(Rank::Nine, Suit::Hearts))
            .unwrap();
        trick
            .play(PlayerPosition::North, Card::new(Rank::Ace, Suit::Diamonds))
            .unwrap();
        assert_eq!(trick.winner(Suit::Spades), Some(PlayerPosition::South));
    }

    #[test]
    fn any_trump_beats_the_lead_suit() {
        let mut trick = Trick::new(PlayerPosition::North);
        trick
            .play(PlayerPosition::North, Card::new(Rank::Ace, Suit::Hearts))
            .unwrap();
        trick
            .play(PlayerPosition::South, Card::new(Rank::Nine, Suit::Clubs))
            .unwrap();
        assert_eq!(trick.winner(Suit::Clubs), Some(PlayerPosition::South));
        assert_eq!(trick.points(), 11);
    }

    #[test]
    fn incomplete_trick_has_no_winner() {
        let mut trick = Trick::new(PlayerPosition::North);
        assert_eq!(trick.winner(Suit::Clubs), None);
        trick
            .play(PlayerPosition::North, Card::new(Rank::Ace, Suit::Hearts))
            .unwrap();
        assert_eq!(trick.winner(Suit::Clubs), None);
        assert_eq!(trick.lead_suit(), Some(Suit::Hearts));
    }
}
