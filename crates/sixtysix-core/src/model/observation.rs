use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::phase::Phase;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// What one seat may legally see and do at a decision point.
///
/// `valid_actions` is exhaustive: the engine accepts exactly these actions
/// and nothing else for this snapshot. Card indices refer to `hand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservableState {
    pub seat: PlayerPosition,
    pub hand: Vec<Card>,
    pub trump_suit: Suit,
    pub trump_card: Option<Card>,
    pub draw_pile_size: usize,
    pub phase: Phase,
    pub closed: bool,
    pub closed_by: Option<PlayerPosition>,
    pub my_score: u32,
    pub opponent_score: u32,
    pub is_leading: bool,
    /// The opponent's card when responding.
    pub lead_card: Option<Card>,
    pub valid_actions: Vec<Action>,
    /// Post-trick swap/close choice rather than a card play.
    pub is_winner_privilege: bool,
    pub opponent_hand_size: usize,
    pub last_drawn: Option<Card>,
    pub seen_cards: Vec<Card>,
    pub round_winner: Option<PlayerPosition>,
}

impl ObservableState {
    pub fn is_valid(&self, action: &Action) -> bool {
        self.valid_actions.contains(action)
    }

    /// The hand card an action would play.
    pub fn card_for(&self, action: &Action) -> Option<Card> {
        action
            .card_index()
            .and_then(|index| self.hand.get(index).copied())
    }

    pub fn plays(&self) -> impl Iterator<Item = &Action> {
        self.valid_actions.iter().filter(|a| a.is_play())
    }

    /// Distinct playable cards, in hand order.
    pub fn playable_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = Vec::new();
        for card in self.plays().filter_map(|a| self.card_for(a)) {
            if !cards.contains(&card) {
                cards.push(card);
            }
        }
        cards
    }

    /// Suits with a marriage announcement on offer, in first-seen order.
    pub fn marriage_suits(&self) -> Vec<Suit> {
        let mut suits = Vec::new();
        for suit in self.valid_actions.iter().filter_map(|a| a.marriage()) {
            if !suits.contains(&suit) {
                suits.push(suit);
            }
        }
        suits
    }

    pub fn can_swap(&self) -> bool {
        self.is_valid(&Action::SwapTrump)
    }
}
