use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card points needed to win a round.
pub const ROUND_TARGET: u32 = 66;
/// A loser below this many card points concedes a double award.
pub const SCHNEIDER_THRESHOLD: u32 = 33;
pub const MARRIAGE_POINTS: u32 = 20;
pub const TRUMP_MARRIAGE_POINTS: u32 = 40;
pub const CLOSED_GAME_POINTS: u32 = 3;
pub const SCHNEIDER_GAME_POINTS: u32 = 2;
pub const STANDARD_GAME_POINTS: u32 = 1;

pub fn marriage_value(suit: Suit, trump_suit: Suit) -> u32 {
    if suit == trump_suit {
        TRUMP_MARRIAGE_POINTS
    } else {
        MARRIAGE_POINTS
    }
}

/// Per-seat point totals, used for round card points and match game points alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [u32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn add(&mut self, seat: PlayerPosition, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn set_totals(&mut self, totals: [u32; 2]) {
        self.totals = totals;
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    /// First seat at or above `target`, if any.
    pub fn reached(&self, target: u32) -> Option<PlayerPosition> {
        PlayerPosition::LOOP
            .iter()
            .copied()
            .find(|seat| self.score(*seat) >= target)
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwardReason {
    /// The closer reached the round target.
    ClosedByWinner,
    /// The closer failed to reach the round target; the defender takes the award.
    ClosedAndFailed,
    /// The loser finished below the schneider threshold.
    Schneider,
    Standard,
    /// Cards ran out before anybody reached the round target.
    Tie,
}

impl fmt::Display for AwardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AwardReason::ClosedByWinner => "closed game won",
            AwardReason::ClosedAndFailed => "closed game lost",
            AwardReason::Schneider => "opponent < 33",
            AwardReason::Standard => "standard win",
            AwardReason::Tie => "tie",
        };
        f.write_str(text)
    }
}

/// Game points earned from one finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAward {
    pub winner: Option<PlayerPosition>,
    pub game_points: u32,
    pub reason: AwardReason,
}

impl GameAward {
    pub const fn tie() -> Self {
        Self {
            winner: None,
            game_points: 0,
            reason: AwardReason::Tie,
        }
    }
}

pub fn calculate_game_points(
    scores: &ScoreBoard,
    round_winner: Option<PlayerPosition>,
    closed_by: Option<PlayerPosition>,
) -> GameAward {
    if let Some(closer) = closed_by {
        return if round_winner == Some(closer) {
            GameAward {
                winner: Some(closer),
                game_points: CLOSED_GAME_POINTS,
                reason: AwardReason::ClosedByWinner,
            }
        } else {
            GameAward {
                winner: Some(closer.opponent()),
                game_points: CLOSED_GAME_POINTS,
                reason: AwardReason::ClosedAndFailed,
            }
        };
    }

    match round_winner {
        Some(winner) if scores.score(winner.opponent()) < SCHNEIDER_THRESHOLD => GameAward {
            winner: Some(winner),
            game_points: SCHNEIDER_GAME_POINTS,
            reason: AwardReason::Schneider,
        },
        Some(winner) => GameAward {
            winner: Some(winner),
            game_points: STANDARD_GAME_POINTS,
            reason: AwardReason::Standard,
        },
        None => GameAward::tie(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(south: u32, north: u32) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        board.set_totals([south, north]);
        board
    }

    #[test]
    fn scoreboard_tracks_points_per_seat() {
        let mut board = ScoreBoard::new();
        board.add(PlayerPosition::North, 14);
        board.add(PlayerPosition::North, 20);
        assert_eq!(board.score(PlayerPosition::North), 34);
        assert_eq!(board.score(PlayerPosition::South), 0);
        assert_eq!(board.reached(34), Some(PlayerPosition::North));
        assert_eq!(board.reached(35), None);
    }

    #[test]
    fn trump_marriage_is_worth_forty() {
        assert_eq!(marriage_value(Suit::Clubs, Suit::Clubs), 40);
        assert_eq!(marriage_value(Suit::Hearts, Suit::Clubs), 20);
    }

    #[test]
    fn winner_against_low_opponent_takes_two() {
        let award = calculate_game_points(&board(68, 30), Some(PlayerPosition::South), None);
        assert_eq!(award.winner, Some(PlayerPosition::South));
        assert_eq!(award.game_points, 2);
        assert_eq!(award.reason, AwardReason::Schneider);
    }

    #[test]
    fn winner_against_opponent_at_threshold_takes_one() {
        let award = calculate_game_points(&board(33, 70), Some(PlayerPosition::North), None);
        assert_eq!(award.winner, Some(PlayerPosition::North));
        assert_eq!(award.game_points, 1);
    }

    #[test]
    fn failed_close_hands_three_to_defender() {
        let award = calculate_game_points(&board(40, 20), None, Some(PlayerPosition::South));
        assert_eq!(award.winner, Some(PlayerPosition::North));
        assert_eq!(award.game_points, 3);
        assert_eq!(award.reason, AwardReason::ClosedAndFailed);
    }

    #[test]
    fn failed_close_ignores_point_gap() {
        let award = calculate_game_points(
            &board(60, 70),
            Some(PlayerPosition::North),
            Some(PlayerPosition::South),
        );
        assert_eq!(award.winner, Some(PlayerPosition::North));
        assert_eq!(award.game_points, 3);
    }

    #[test]
    fn successful_close_takes_three() {
        let award = calculate_game_points(
            &board(66, 50),
            Some(PlayerPosition::South),
            Some(PlayerPosition::South),
        );
        assert_eq!(award.winner, Some(PlayerPosition::South));
        assert_eq!(award.game_points, 3);
        assert_eq!(award.reason, AwardReason::ClosedByWinner);
    }

    #[test]
    fn nobody_at_target_is_a_tie() {
        assert_eq!(calculate_game_points(&board(60, 60), None, None), GameAward::tie());
    }
}
