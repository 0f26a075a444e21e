use crate::model::action::{Action, ActionError};
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::event::{RoundEvent, StepOutcome};
use crate::model::hand::Hand;
use crate::model::observation::ObservableState;
use crate::model::phase::Phase;
use crate::model::player::PlayerPosition;
use crate::model::rank::Rank;
use crate::model::score::{
    GameAward, ROUND_TARGET, ScoreBoard, calculate_game_points, marriage_value,
};
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{Level, event};

pub const HAND_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStage {
    Trick,
    WinnerPrivilege,
    Over,
}

#[derive(Debug, Clone)]
pub struct RoundState {
    hands: [Hand; 2],
    draw_pile: Vec<Card>,
    trump_card: Option<Card>,
    trump_suit: Suit,
    scores: ScoreBoard,
    closed_by: Option<PlayerPosition>,
    current_trick: Trick,
    trick_history: Vec<Trick>,
    starting_player: PlayerPosition,
    stage: RoundStage,
    round_winner: Option<PlayerPosition>,
    played: Vec<Card>,
    last_drawn: [Option<Card>; 2],
    seen: [BTreeSet<Card>; 2],
}

/// Arbitrary mid-round position. Cards absent from hands, pile and trump slot count as played.
#[derive(Debug, Clone)]
pub struct RoundLayout {
    pub hands: [Vec<Card>; 2],
    pub draw_pile: Vec<Card>,
    pub trump_card: Option<Card>,
    pub trump_suit: Suit,
    pub leader: PlayerPosition,
    pub scores: [u32; 2],
    pub closed_by: Option<PlayerPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    DuplicateCard(Card),
    EmptyHands,
    UnevenHands { south: usize, north: usize },
    OversizedHand(usize),
    OddStock(usize),
    TrumpSuitMismatch { trump_card: Card, trump_suit: Suit },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::DuplicateCard(card) => write!(f, "{card} appears more than once"),
            LayoutError::EmptyHands => write!(f, "both hands are empty, nothing left to play"),
            LayoutError::UnevenHands { south, north } => {
                write!(f, "hands differ in size: South {south}, North {north}")
            }
            LayoutError::OversizedHand(len) => {
                write!(f, "hands hold {len} cards, more than {HAND_SIZE}")
            }
            LayoutError::OddStock(len) => {
                write!(f, "stock of {len} cards cannot be shared evenly")
            }
            LayoutError::TrumpSuitMismatch {
                trump_card,
                trump_suit,
            } => write!(f, "trump card {trump_card} is not of trump suit {trump_suit}"),
        }
    }
}

impl std::error::Error for LayoutError {}

impl RoundState {
    pub fn deal(deck: &Deck, starting_player: PlayerPosition) -> Self {
        let mut cards = deck.cards().to_vec();
        let mut hands = [Hand::new(), Hand::new()];

        for _ in 0..HAND_SIZE {
            for seat in [starting_player, starting_player.opponent()] {
                if let Some(card) = cards.pop() {
                    hands[seat.index()].add(card);
                }
            }
        }

        let trump_card = cards
            .pop()
            .expect("a 24-card deck leaves a trump card after dealing");
        let seen = std::array::from_fn(|idx| {
            let mut seen: BTreeSet<Card> = hands[idx].iter().copied().collect();
            seen.insert(trump_card);
            seen
        });

        event!(
            Level::DEBUG,
            leader = %starting_player,
            trump = %trump_card,
            draw_pile = cards.len(),
            "dealt round"
        );

        Self {
            hands,
            draw_pile: cards,
            trump_card: Some(trump_card),
            trump_suit: trump_card.suit,
            scores: ScoreBoard::new(),
            closed_by: None,
            current_trick: Trick::new(starting_player),
            trick_history: Vec::new(),
            starting_player,
            stage: RoundStage::Trick,
            round_winner: None,
            played: Vec::new(),
            last_drawn: [None, None],
            seen,
        }
    }

    pub fn from_layout(layout: RoundLayout) -> Result<Self, LayoutError> {
        let RoundLayout {
            hands,
            draw_pile,
            trump_card,
            trump_suit,
            leader,
            scores,
            closed_by,
        } = layout;

        let [south, north] = &hands;
        if south.len() != north.len() {
            return Err(LayoutError::UnevenHands {
                south: south.len(),
                north: north.len(),
            });
        }
        if south.is_empty() {
            return Err(LayoutError::EmptyHands);
        }
        if south.len() > HAND_SIZE {
            return Err(LayoutError::OversizedHand(south.len()));
        }
        let stock = draw_pile.len() + usize::from(trump_card.is_some());
        if stock % 2 != 0 {
            return Err(LayoutError::OddStock(stock));
        }
        if let Some(card) = trump_card {
            if card.suit != trump_suit {
                return Err(LayoutError::TrumpSuitMismatch {
                    trump_card: card,
                    trump_suit,
                });
            }
        }

        let mut present = BTreeSet::new();
        for card in south
            .iter()
            .chain(north.iter())
            .chain(draw_pile.iter())
            .chain(trump_card.iter())
        {
            if !present.insert(*card) {
                return Err(LayoutError::DuplicateCard(*card));
            }
        }
        let played: Vec<Card> = Deck::standard()
            .into_cards()
            .into_iter()
            .filter(|card| !present.contains(card))
            .collect();

        let hands = hands.map(Hand::with_cards);
        let seen = std::array::from_fn(|idx| {
            let mut seen: BTreeSet<Card> = hands[idx].iter().copied().collect();
            seen.extend(trump_card);
            seen.extend(played.iter().copied());
            seen
        });
        let mut board = ScoreBoard::new();
        board.set_totals(scores);

        Ok(Self {
            hands,
            draw_pile,
            trump_card,
            trump_suit,
            scores: board,
            closed_by,
            current_trick: Trick::new(leader),
            trick_history: Vec::new(),
            starting_player: leader,
            stage: RoundStage::Trick,
            round_winner: None,
            played,
            last_drawn: [None, None],
            seen,
        })
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.trump_card
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn phase(&self) -> Phase {
        Phase::derive(
            self.is_closed(),
            self.draw_pile.len(),
            self.trump_card.is_some(),
        )
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.scores.score(seat)
    }

    pub fn is_closed(&self) -> bool {
        self.closed_by.is_some()
    }

    pub fn closed_by(&self) -> Option<PlayerPosition> {
        self.closed_by
    }

    pub fn leader(&self) -> PlayerPosition {
        self.current_trick.leader()
    }

    pub fn starting_player(&self) -> PlayerPosition {
        self.starting_player
    }

    pub fn stage(&self) -> RoundStage {
        self.stage
    }

    pub fn is_over(&self) -> bool {
        matches!(self.stage, RoundStage::Over)
    }

    pub fn round_winner(&self) -> Option<PlayerPosition> {
        self.round_winner
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn last_drawn(&self, seat: PlayerPosition) -> Option<Card> {
        self.last_drawn[seat.index()]
    }

    pub fn accounted_cards(&self) -> usize {
        self.hands.iter().map(Hand::len).sum::<usize>()
            + self.draw_pile.len()
            + usize::from(self.trump_card.is_some())
            + self.played.len()
    }

    pub fn to_act(&self) -> Option<PlayerPosition> {
        match self.stage {
            RoundStage::Trick => self.current_trick.expected_position(),
            RoundStage::WinnerPrivilege => Some(self.current_trick.leader()),
            RoundStage::Over => None,
        }
    }

    pub fn legal_cards(&self, seat: PlayerPosition) -> Vec<Card> {
        legal_cards(
            &self.hands[seat.index()],
            self.current_trick.lead_card(),
            self.phase(),
            self.trump_suit,
        )
    }

    pub fn legal_actions(&self, seat: PlayerPosition) -> Vec<Action> {
        if self.to_act() != Some(seat) {
            return Vec::new();
        }

        match self.stage {
            RoundStage::WinnerPrivilege => {
                let mut actions = Vec::with_capacity(3);
                if self.can_swap_trump(seat) {
                    actions.push(Action::SwapTrump);
                }
                actions.push(Action::CloseGame);
                actions.push(Action::Pass);
                actions
            }
            RoundStage::Trick => self.card_play_actions(seat),
            RoundStage::Over => Vec::new(),
        }
    }

    pub fn observe(&self, seat: PlayerPosition) -> ObservableState {
        let lead_card = self
            .current_trick
            .lead_card()
            .filter(|_| self.current_trick.leader() != seat);
        let is_leading = matches!(self.stage, RoundStage::Trick)
            && self.current_trick.is_empty()
            && self.current_trick.leader() == seat;
        let is_winner_privilege = matches!(self.stage, RoundStage::WinnerPrivilege)
            && self.current_trick.leader() == seat;

        ObservableState {
            seat,
            hand: self.hands[seat.index()].cards().to_vec(),
            trump_suit: self.trump_suit,
            trump_card: self.trump_card,
            draw_pile_size: self.draw_pile.len(),
            phase: self.phase(),
            closed: self.is_closed(),
            closed_by: self.closed_by,
            my_score: self.scores.score(seat),
            opponent_score: self.scores.score(seat.opponent()),
            is_leading,
            lead_card,
            valid_actions: self.legal_actions(seat),
            is_winner_privilege,
            opponent_hand_size: self.hands[seat.opponent().index()].len(),
            last_drawn: self.last_drawn[seat.index()],
            seen_cards: self.seen[seat.index()].iter().copied().collect(),
            round_winner: self.round_winner,
        }
    }

    /// Rejects anything `legal_actions` did not offer and leaves the round untouched.
    pub fn apply(
        &mut self,
        seat: PlayerPosition,
        action: Action,
    ) -> Result<StepOutcome, ActionError> {
        let expected = self.to_act().ok_or(ActionError::RoundOver)?;
        if expected != seat {
            return Err(ActionError::NotYourTurn {
                expected,
                actual: seat,
            });
        }
        if !self.legal_actions(seat).contains(&action) {
            event!(Level::WARN, seat = %seat, action = %action, "rejected illegal action");
            return Err(ActionError::Illegal { seat, action });
        }

        event!(Level::DEBUG, seat = %seat, action = %action, "applying action");
        let mut outcome = StepOutcome::default();
        match action {
            Action::PlayCard { index, marriage } => {
                self.play_card(seat, index, marriage, &mut outcome)?
            }
            Action::SwapTrump => self.swap_trump(seat, &mut outcome)?,
            Action::CloseGame => self.close(seat, &mut outcome),
            Action::Pass => self.stage = RoundStage::Trick,
        }
        Ok(outcome)
    }

    pub fn calculate_game_points(&self) -> GameAward {
        calculate_game_points(&self.scores, self.round_winner, self.closed_by)
    }

    fn can_swap_trump(&self, seat: PlayerPosition) -> bool {
        self.trump_card.is_some()
            && self.hands[seat.index()].contains(Card::new(Rank::Nine, self.trump_suit))
    }

    fn card_play_actions(&self, seat: PlayerPosition) -> Vec<Action> {
        let hand = &self.hands[seat.index()];
        let lead = self.current_trick.lead_card();
        let legal = self.legal_cards(seat);
        let marriages = if lead.is_none() {
            hand.marriages()
        } else {
            Vec::new()
        };

        let mut actions = Vec::with_capacity(hand.len() + 2 * marriages.len());
        for (index, card) in hand.iter().copied().enumerate() {
            if !legal.contains(&card) {
                continue;
            }
            for &suit in &marriages {
                if card.suit == suit && card.is_marriage_card() {
                    actions.push(Action::play_with_marriage(index, suit));
                }
            }
            actions.push(Action::play(index));
        }
        actions
    }

    fn play_card(
        &mut self,
        seat: PlayerPosition,
        index: usize,
        marriage: Option<Suit>,
        outcome: &mut StepOutcome,
    ) -> Result<(), ActionError> {
        let illegal = ActionError::Illegal {
            seat,
            action: Action::PlayCard { index, marriage },
        };
        let card = self.hands[seat.index()]
            .get(index)
            .ok_or_else(|| illegal.clone())?;
        self.current_trick
            .play(seat, card)
            .map_err(|_| illegal.clone())?;
        self.hands[seat.index()].remove_at(index);
        self.played.push(card);
        self.last_drawn[seat.index()] = None;
        self.seen[seat.opponent().index()].insert(card);
        outcome.push(RoundEvent::CardPlayed {
            seat,
            card,
            marriage,
        });

        if let Some(suit) = marriage {
            self.announce_marriage(seat, card, suit, outcome);
        }

        if self.current_trick.is_complete() {
            self.resolve_trick(outcome);
        }
        Ok(())
    }

    // Marriage points land before the trick resolves.
    fn announce_marriage(
        &mut self,
        seat: PlayerPosition,
        card: Card,
        suit: Suit,
        outcome: &mut StepOutcome,
    ) {
        debug_assert!(card.suit == suit && card.is_marriage_card());
        if let Some(partner) = card.marriage_partner() {
            debug_assert!(self.hands[seat.index()].contains(partner));
            self.seen[seat.opponent().index()].insert(partner);
        }

        let points = marriage_value(suit, self.trump_suit);
        self.scores.add(seat, points);
        event!(
            Level::DEBUG,
            seat = %seat,
            suit = %suit,
            points,
            score = self.scores.score(seat),
            "marriage announced"
        );
        outcome.push(RoundEvent::MarriageAnnounced { seat, suit, points });
        self.check_round_target(seat);
    }

    fn check_round_target(&mut self, seat: PlayerPosition) {
        if self.round_winner.is_none() && self.scores.score(seat) >= ROUND_TARGET {
            self.round_winner = Some(seat);
        }
    }

    fn resolve_trick(&mut self, outcome: &mut StepOutcome) {
        let leader = self.current_trick.leader();
        let winner = self
            .current_trick
            .winner(self.trump_suit)
            .unwrap_or(leader);
        let points = self.current_trick.points();
        self.scores.add(winner, points);
        self.check_round_target(winner);

        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
        if let [lead, follow] = finished.plays() {
            outcome.push(RoundEvent::TrickCompleted {
                leader,
                leader_card: lead.card,
                follower_card: follow.card,
                winner,
                points,
            });
        }
        self.trick_history.push(finished);

        event!(
            Level::DEBUG,
            winner = %winner,
            points,
            south = self.scores.score(PlayerPosition::South),
            north = self.scores.score(PlayerPosition::North),
            "trick resolved"
        );

        if self.round_winner.is_some() || self.hands.iter().any(Hand::is_empty) {
            self.finish(outcome);
            return;
        }

        self.draw(outcome);
        self.stage = match self.phase() {
            Phase::One => RoundStage::WinnerPrivilege,
            Phase::Two => RoundStage::Trick,
        };
    }

    // Leader draws first; the face-up trump is the last card drawn.
    fn draw(&mut self, outcome: &mut StepOutcome) {
        self.last_drawn = [None, None];
        if self.is_closed() {
            return;
        }

        let leader = self.current_trick.leader();
        let mut receivers = [None, None];
        for (slot, seat) in [leader, leader.opponent()].into_iter().enumerate() {
            let Some(card) = self.draw_pile.pop().or_else(|| self.trump_card.take()) else {
                break;
            };
            self.hands[seat.index()].add(card);
            self.last_drawn[seat.index()] = Some(card);
            self.seen[seat.index()].insert(card);
            receivers[slot] = Some(seat);
        }

        if receivers[0].is_some() {
            outcome.push(RoundEvent::CardsDrawn {
                first: receivers[0],
                second: receivers[1],
            });
        }
    }

    fn swap_trump(
        &mut self,
        seat: PlayerPosition,
        outcome: &mut StepOutcome,
    ) -> Result<(), ActionError> {
        let illegal = ActionError::Illegal {
            seat,
            action: Action::SwapTrump,
        };
        let nine = Card::new(Rank::Nine, self.trump_suit);
        let taken = self.trump_card.ok_or_else(|| illegal.clone())?;
        if !self.hands[seat.index()].remove(nine) {
            return Err(illegal);
        }
        self.hands[seat.index()].add(taken);
        self.trump_card = Some(nine);
        self.seen[seat.opponent().index()].insert(nine);

        event!(Level::DEBUG, seat = %seat, taken = %taken, "trump nine swapped");
        outcome.push(RoundEvent::TrumpSwapped { seat, taken, nine });
        Ok(())
    }

    fn close(&mut self, seat: PlayerPosition, outcome: &mut StepOutcome) {
        self.closed_by = Some(seat);
        self.stage = RoundStage::Trick;
        event!(
            Level::DEBUG,
            seat = %seat,
            score = self.scores.score(seat),
            "game closed"
        );
        outcome.push(RoundEvent::GameClosed { seat });
    }

    fn finish(&mut self, outcome: &mut StepOutcome) {
        self.stage = RoundStage::Over;
        let award = self.calculate_game_points();
        event!(
            Level::DEBUG,
            round_winner = ?self.round_winner,
            award_winner = ?award.winner,
            game_points = award.game_points,
            reason = %award.reason,
            "round over"
        );
        outcome.push(RoundEvent::RoundOver {
            round_winner: self.round_winner,
            award,
            scores: *self.scores.standings(),
        });
    }
}

pub fn legal_cards(hand: &Hand, lead: Option<Card>, phase: Phase, trump_suit: Suit) -> Vec<Card> {
    let Some(lead) = lead else {
        return hand.cards().to_vec();
    };
    if phase == Phase::One {
        return hand.cards().to_vec();
    }

    let same_suit: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead.suit).collect();
    if !same_suit.is_empty() {
        return same_suit;
    }
    let trumps: Vec<Card> = hand.iter().copied().filter(|c| c.suit == trump_suit).collect();
    if !trumps.is_empty() {
        return trumps;
    }
    hand.cards().to_vec()
}

const _: () = assert!(2 * HAND_SIZE < DECK_SIZE);
