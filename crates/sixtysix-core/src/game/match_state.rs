use crate::model::action::{Action, ActionError};
use crate::model::deck::Deck;
use crate::model::event::StepOutcome;
use crate::model::player::PlayerPosition;
use crate::model::round::RoundState;
use crate::model::score::{GameAward, ScoreBoard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{Level, event};

/// Game points needed to take the match.
pub const MATCH_TARGET: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    MatchOver,
    /// Scoring was requested before the current round finished.
    RoundInProgress,
    Action(ActionError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::MatchOver => write!(f, "the match is already decided"),
            MatchError::RoundInProgress => write!(f, "the current round is still being played"),
            MatchError::Action(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Action(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActionError> for MatchError {
    fn from(err: ActionError) -> Self {
        MatchError::Action(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: PlayerPosition,
    pub game_points: [u32; 2],
    pub rounds_played: u32,
    pub awards: Vec<GameAward>,
}

impl MatchResult {
    pub fn tie_rounds(&self) -> usize {
        self.awards.iter().filter(|award| award.winner.is_none()).count()
    }
}

/// A sequence of rounds played until one seat collects `target` game points.
///
/// Every deck, and the first leader, come from one `StdRng` seeded at
/// construction, so a seed fully determines the deals.
#[derive(Debug, Clone)]
pub struct MatchState {
    game_points: ScoreBoard,
    target: u32,
    round_number: u32,
    current_round: RoundState,
    awards: Vec<GameAward>,
    winner: Option<PlayerPosition>,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    pub fn new() -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_target(seed, MATCH_TARGET)
    }

    pub fn with_target(seed: u64, target: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let first_leader = draw_first_leader(&mut rng);
        Self::start(rng, seed, 1, first_leader, target)
    }

    /// Resumes at `round_number` with `starting_player` leading, dealing the
    /// same deck the uninterrupted match would have dealt for that round.
    pub fn resume(
        seed: u64,
        round_number: u32,
        starting_player: PlayerPosition,
        target: u32,
    ) -> Self {
        let normalized_round = round_number.max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let _ = draw_first_leader(&mut rng);
        for _ in 1..normalized_round {
            let _ = Deck::shuffled(&mut rng);
        }
        Self::start(rng, seed, normalized_round, starting_player, target)
    }

    fn start(
        mut rng: StdRng,
        seed: u64,
        round_number: u32,
        starting_player: PlayerPosition,
        target: u32,
    ) -> Self {
        let deck = Deck::shuffled(&mut rng);
        let current_round = RoundState::deal(&deck, starting_player);
        event!(
            Level::INFO,
            seed,
            round = round_number,
            leader = %starting_player,
            target,
            "match started"
        );

        Self {
            game_points: ScoreBoard::new(),
            target: target.max(1),
            round_number,
            current_round,
            awards: Vec::new(),
            winner: None,
            rng,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn game_points(&self) -> &ScoreBoard {
        &self.game_points
    }

    /// Overwrites both match totals, re-evaluating whether the match is decided.
    pub fn set_game_points(&mut self, totals: [u32; 2]) {
        self.game_points.set_totals(totals);
        self.winner = self.game_points.reached(self.target);
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn awards(&self) -> &[GameAward] {
        &self.awards
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<PlayerPosition> {
        self.winner
    }

    pub fn apply(
        &mut self,
        seat: PlayerPosition,
        action: Action,
    ) -> Result<StepOutcome, MatchError> {
        if self.is_over() {
            return Err(MatchError::MatchOver);
        }
        Ok(self.current_round.apply(seat, action)?)
    }

    /// Folds the finished round's award into the match totals and, unless the
    /// match is now decided, deals the next round with the other seat leading.
    pub fn finish_round_and_start_next(&mut self) -> Result<GameAward, MatchError> {
        if self.is_over() {
            return Err(MatchError::MatchOver);
        }
        if !self.current_round.is_over() {
            return Err(MatchError::RoundInProgress);
        }

        let award = self.current_round.calculate_game_points();
        self.settle(award);
        if self.is_over() {
            return Ok(award);
        }

        self.deal_next();
        Ok(award)
    }

    fn deal_next(&mut self) {
        self.round_number += 1;
        let next_leader = self.current_round.starting_player().opponent();
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(&deck, next_leader);
    }

    fn settle(&mut self, award: GameAward) {
        if let Some(seat) = award.winner {
            self.game_points.add(seat, award.game_points);
        }
        self.awards.push(award);
        self.winner = self.game_points.reached(self.target);

        event!(
            Level::INFO,
            round = self.round_number,
            award_winner = ?award.winner,
            game_points = award.game_points,
            reason = %award.reason,
            south = self.game_points.score(PlayerPosition::South),
            north = self.game_points.score(PlayerPosition::North),
            "round settled"
        );
        if let Some(winner) = self.winner {
            event!(Level::INFO, winner = %winner, rounds = self.round_number, "match over");
        }
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.winner.map(|winner| MatchResult {
            winner,
            game_points: *self.game_points.standings(),
            rounds_played: self.round_number,
            awards: self.awards.clone(),
        })
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_first_leader<R: Rng + ?Sized>(rng: &mut R) -> PlayerPosition {
    if rng.gen_bool(0.5) {
        PlayerPosition::South
    } else {
        PlayerPosition::North
    }
}
