//! Plain-text rendering of observations, events and results.

use sixtysix_core::game::match_state::MatchResult;
use sixtysix_core::model::card::Card;
use sixtysix_core::model::event::RoundEvent;
use sixtysix_core::model::observation::ObservableState;
use sixtysix_core::model::phase::Phase;
use sixtysix_core::model::player::PlayerPosition;
use sixtysix_core::model::score::{AwardReason, GameAward, marriage_value};
use std::fmt::Write as _;

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";

/// Display names for both seats, South first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatNames {
    names: [String; 2],
}

impl SeatNames {
    pub fn new(south: impl Into<String>, north: impl Into<String>) -> Self {
        Self {
            names: [south.into(), north.into()],
        }
    }

    /// "You" for `human`, `opponent` for the other seat.
    pub fn human(human: PlayerPosition, opponent: impl Into<String>) -> Self {
        let mut names = [String::new(), String::new()];
        names[human.index()] = "You".to_string();
        names[human.opponent().index()] = opponent.into();
        Self { names }
    }

    pub fn of(&self, seat: PlayerPosition) -> &str {
        &self.names[seat.index()]
    }
}

pub fn card_label(card: Card) -> String {
    format!("{}{}", card.rank, card.suit.symbol())
}

fn card_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card_label(*card))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Cards on one line, their 1-based selection numbers aligned underneath.
pub fn hand_lines(cards: &[Card]) -> String {
    let mut top = String::new();
    let mut bottom = String::new();
    for (idx, card) in cards.iter().enumerate() {
        let label = card_label(*card);
        let number = format!("[{}]", idx + 1);
        let width = label.chars().count().max(number.len()) + 2;
        let _ = write!(top, "{label:<width$}");
        let _ = write!(bottom, "{number:<width$}");
    }
    format!("{}\n{}", top.trim_end(), bottom.trim_end())
}

pub fn welcome() -> String {
    [
        RULE,
        "               SIXTY-SIX",
        RULE,
        "",
        "Round rules:",
        "- First to 66 card points wins the round",
        "- Trumps beat every other suit; within a suit the higher rank wins",
        "- Card values: A=11, 10=10, K=4, Q=3, J=2, 9=0",
        "- Marriage (K+Q of one suit, announced when leading): 20, trump marriage 40",
        "",
        "Phases:",
        "- Phase 1 (stock on the table): play any card; the trick winner may",
        "  swap the trump 9 for the face-up trump or close the game",
        "- Phase 2 (stock gone or closed): follow suit, else trump, else anything",
        "",
        "Game points (first to 7 wins the match):",
        "- Win the round: 1, opponent under 33: 2",
        "- Closed game: 3 to the closer if they reach 66, else 3 to the opponent",
        "- Nobody at 66 when the cards run out: tie, no game points",
    ]
    .join("\n")
}

/// Full table view for the seat that owns `view`.
pub fn render_state(view: &ObservableState, names: &SeatNames, match_points: [u32; 2]) -> String {
    let me = view.seat;
    let opponent = me.opponent();
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "SIXTY-SIX     Match: {} {} - {} {}",
        names.of(me),
        match_points[me.index()],
        match_points[opponent.index()],
        names.of(opponent)
    );
    let _ = writeln!(out, "{RULE}");

    let trump = match view.trump_card {
        Some(card) => card_label(card),
        None => format!("[{}]", view.trump_suit.symbol()),
    };
    let phase = match (view.closed_by, view.phase) {
        (Some(closer), _) => format!("CLOSED by {}", names.of(closer)),
        (None, Phase::One) => "Phase 1 (free play)".to_string(),
        (None, Phase::Two) => "Phase 2 (must follow)".to_string(),
    };
    let _ = writeln!(
        out,
        "Trump: {trump}  |  Draw pile: {} cards  |  {phase}",
        view.draw_pile_size
    );
    let _ = writeln!(
        out,
        "Score - {}: {:3}  |  {}: {:3}",
        names.of(me),
        view.my_score,
        names.of(opponent),
        view.opponent_score
    );
    let _ = writeln!(out, "{THIN_RULE}");
    let _ = writeln!(
        out,
        "{}: {}",
        names.of(opponent),
        vec!["[?]"; view.opponent_hand_size].join(" ")
    );
    let _ = writeln!(out);
    match view.lead_card {
        Some(card) => {
            let _ = writeln!(out, "  {} played: {}", names.of(opponent), card_label(card));
        }
        None => {
            let _ = writeln!(out);
        }
    }
    let _ = writeln!(out, "{THIN_RULE}");

    match view.last_drawn {
        Some(card) => {
            let _ = writeln!(out, "Your hand:  (drew: {})", card_label(card));
        }
        None => {
            let _ = writeln!(out, "Your hand:");
        }
    }
    let _ = writeln!(out, "{}", hand_lines(&view.hand));
    out
}

/// Hint shown above the card prompt: the lead to answer, or the marriages on offer.
pub fn play_hint(view: &ObservableState) -> String {
    match view.lead_card {
        Some(lead) if view.phase == Phase::Two => format!(
            "Must follow: {}  |  Valid: {}",
            lead.suit.symbol(),
            card_list(&view.playable_cards())
        ),
        Some(lead) => format!("Lead: {} (any card allowed)", lead.suit.symbol()),
        None => {
            let marriages = view.marriage_suits();
            if marriages.is_empty() {
                ">>> Your lead!".to_string()
            } else {
                let offers = marriages
                    .iter()
                    .map(|suit| {
                        format!("{} ({}pts)", suit.symbol(), marriage_value(*suit, view.trump_suit))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(">>> Your lead!  Marriages: {offers}")
            }
        }
    }
}

/// One line per public event worth narrating; draws stay silent.
pub fn describe_event(event: &RoundEvent, names: &SeatNames) -> Option<String> {
    match *event {
        RoundEvent::CardPlayed { seat, card, .. } => {
            Some(format!("{} played {}", names.of(seat), card_label(card)))
        }
        RoundEvent::MarriageAnnounced { seat, suit, points } => Some(format!(
            "{} announced the {} marriage (+{points} points)",
            names.of(seat),
            suit.symbol()
        )),
        RoundEvent::TrickCompleted {
            leader_card,
            follower_card,
            winner,
            points,
            ..
        } => Some(format!(
            "{} took the trick {} / {} (+{points} points)",
            names.of(winner),
            card_label(leader_card),
            card_label(follower_card)
        )),
        RoundEvent::TrumpSwapped { seat, taken, nine } => Some(format!(
            "{} swapped {} for the trump {}",
            names.of(seat),
            card_label(nine),
            card_label(taken)
        )),
        RoundEvent::GameClosed { seat } => Some(format!("{} closed the game", names.of(seat))),
        RoundEvent::RoundOver {
            award, scores, ..
        } => Some(describe_award(&award, scores, names)),
        RoundEvent::CardsDrawn { .. } => None,
    }
}

pub fn describe_award(award: &GameAward, scores: [u32; 2], names: &SeatNames) -> String {
    let south = PlayerPosition::South;
    let north = PlayerPosition::North;
    let mut out = format!(
        "Round over - {} {}, {} {}. ",
        names.of(south),
        scores[south.index()],
        names.of(north),
        scores[north.index()]
    );
    match award.winner {
        Some(winner) => {
            let reason = match award.reason {
                AwardReason::ClosedByWinner | AwardReason::ClosedAndFailed => " (closed game)",
                AwardReason::Schneider => " (opponent < 33)",
                AwardReason::Standard | AwardReason::Tie => "",
            };
            let _ = write!(
                out,
                "{} won the round: +{} game point(s){reason}",
                names.of(winner),
                award.game_points
            );
        }
        None => out.push_str("Tie, no game points awarded."),
    }
    out
}

pub fn describe_match(result: &MatchResult, names: &SeatNames) -> String {
    let south = PlayerPosition::South;
    let north = PlayerPosition::North;
    format!(
        "{RULE}\nMATCH OVER\n{RULE}\nFinal match score: {} {} - {} {}\nRounds played: {}\nWinner: {}",
        names.of(south),
        result.game_points[south.index()],
        result.game_points[north.index()],
        names.of(north),
        result.rounds_played,
        names.of(result.winner)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sixtysix_core::model::rank::Rank;
    use sixtysix_core::model::suit::Suit;

    #[test]
    fn hand_numbers_line_up_with_cards() {
        let cards = [
            Card::new(Rank::Ten, Suit::Spades),
            Card::new(Rank::Nine, Suit::Hearts),
        ];
        let lines = hand_lines(&cards);
        let mut parts = lines.lines();
        let top = parts.next().unwrap();
        let bottom = parts.next().unwrap();
        assert!(top.starts_with("10♠"));
        assert!(bottom.starts_with("[1]"));
        assert_eq!(
            top.chars().position(|c| c == '9'),
            bottom.chars().position(|c| c == '2').map(|p| p - 1)
        );
    }

    #[test]
    fn award_mentions_reason() {
        let names = SeatNames::human(PlayerPosition::South, "Computer");
        let award = GameAward {
            winner: Some(PlayerPosition::North),
            game_points: 3,
            reason: AwardReason::ClosedAndFailed,
        };
        let text = describe_award(&award, [45, 32], &names);
        assert!(text.contains("You 45"));
        assert!(text.contains("Computer won the round: +3"));
        assert!(text.contains("closed game"));

        let tie = describe_award(&GameAward::tie(), [60, 60], &names);
        assert!(tie.contains("Tie"));
    }

    #[test]
    fn draws_are_not_narrated() {
        let names = SeatNames::new("South", "North");
        let event = RoundEvent::CardsDrawn {
            first: Some(PlayerPosition::South),
            second: Some(PlayerPosition::North),
        };
        assert_eq!(describe_event(&event, &names), None);
        let closed = RoundEvent::GameClosed {
            seat: PlayerPosition::North,
        };
        assert_eq!(
            describe_event(&closed, &names).as_deref(),
            Some("North closed the game")
        );
    }
}
