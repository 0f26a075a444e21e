use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decision returned by whichever seat is on move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play the card at `index` of the acting hand, optionally announcing a
    /// marriage in `marriage` (leading only).
    PlayCard {
        index: usize,
        marriage: Option<Suit>,
    },
    /// Exchange the trump-suit nine for the face-up trump card.
    SwapTrump,
    /// Close the stock: no more drawing, phase two rules from now on.
    CloseGame,
    /// End the winner-privilege window without acting.
    Pass,
}

impl Action {
    pub const fn play(index: usize) -> Self {
        Action::PlayCard {
            index,
            marriage: None,
        }
    }

    pub const fn play_with_marriage(index: usize, suit: Suit) -> Self {
        Action::PlayCard {
            index,
            marriage: Some(suit),
        }
    }

    pub const fn card_index(self) -> Option<usize> {
        match self {
            Action::PlayCard { index, .. } => Some(index),
            _ => None,
        }
    }

    pub const fn marriage(self) -> Option<Suit> {
        match self {
            Action::PlayCard { marriage, .. } => marriage,
            _ => None,
        }
    }

    pub const fn is_play(self) -> bool {
        matches!(self, Action::PlayCard { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PlayCard {
                index,
                marriage: Some(suit),
            } => write!(f, "play #{index} announcing {suit} marriage"),
            Action::PlayCard {
                index,
                marriage: None,
            } => write!(f, "play #{index}"),
            Action::SwapTrump => f.write_str("swap trump"),
            Action::CloseGame => f.write_str("close game"),
            Action::Pass => f.write_str("pass"),
        }
    }
}

/// Rejections from [`RoundState::apply`](crate::model::round::RoundState::apply).
/// The round is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    RoundOver,
    NotYourTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    /// The action is absent from the legal list generated for this decision point.
    Illegal {
        seat: PlayerPosition,
        action: Action,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::RoundOver => write!(f, "round is already over"),
            ActionError::NotYourTurn { expected, actual } => {
                write!(f, "expected {expected} to act but got {actual}")
            }
            ActionError::Illegal { seat, action } => {
                write!(f, "{seat} attempted illegal action: {action}")
            }
        }
    }
}

impl std::error::Error for ActionError {}
