use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::score::GameAward;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Public happenings produced by one applied action, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    CardPlayed {
        seat: PlayerPosition,
        card: Card,
        marriage: Option<Suit>,
    },
    MarriageAnnounced {
        seat: PlayerPosition,
        suit: Suit,
        points: u32,
    },
    TrickCompleted {
        leader: PlayerPosition,
        leader_card: Card,
        follower_card: Card,
        winner: PlayerPosition,
        points: u32,
    },
    /// Which seats received a card, in drawing order. Card identities stay private.
    CardsDrawn {
        first: Option<PlayerPosition>,
        second: Option<PlayerPosition>,
    },
    TrumpSwapped {
        seat: PlayerPosition,
        taken: Card,
        nine: Card,
    },
    GameClosed {
        seat: PlayerPosition,
    },
    /// `round_winner` is who reached the round target, if anybody;
    /// the award may still go the other way after a failed close.
    /// `scores` are the final round points, South first.
    RoundOver {
        round_winner: Option<PlayerPosition>,
        award: GameAward,
        scores: [u32; 2],
    },
}

/// Everything a successful `apply` produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub events: Vec<RoundEvent>,
}

impl StepOutcome {
    pub fn push(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    pub fn round_over(&self) -> Option<GameAward> {
        self.events.iter().find_map(|event| match event {
            RoundEvent::RoundOver { award, .. } => Some(*award),
            _ => None,
        })
    }
}
