use sixtysix_core::game::driver::{Seats, play_match, play_round};
use sixtysix_core::game::match_state::{MATCH_TARGET, MatchState};
use sixtysix_core::game::policy::{FirstLegal, Policy};
use sixtysix_core::game::serialization::MatchSnapshot;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::card::Card;
use sixtysix_core::model::observation::ObservableState;
use sixtysix_core::model::player::PlayerPosition;
use sixtysix_core::model::rank::Rank;
use sixtysix_core::model::round::{RoundLayout, RoundState};
use sixtysix_core::model::score::AwardReason;
use sixtysix_core::model::suit::Suit;

/// Never swaps or closes, and plays the highest-value legal card.
fn passive(state: &ObservableState) -> Action {
    if state.is_winner_privilege {
        return Action::Pass;
    }
    state
        .plays()
        .filter(|action| action.marriage().is_none())
        .max_by_key(|action| state.card_for(action).map(Card::value))
        .copied()
        .unwrap_or(state.valid_actions[0])
}

#[test]
fn leaders_alternate_regardless_of_results() {
    let mut state = MatchState::with_seed(31);
    let first = state.round().starting_player();
    let mut south = passive;
    let mut north = passive;

    for round in 1..=4u32 {
        if state.is_over() {
            break;
        }
        let expected = if round % 2 == 1 { first } else { first.opponent() };
        assert_eq!(state.round().starting_player(), expected, "round {round}");
        let mut seats: Seats<'_> = [&mut south, &mut north];
        play_round(state.round_mut(), &mut seats).unwrap();
        state.finish_round_and_start_next().unwrap();
    }
}

#[test]
fn awards_sum_to_match_totals() {
    let mut state = MatchState::with_seed(8080);
    let mut south = passive;
    let mut north = FirstLegal;
    let mut seats: Seats<'_> = [&mut south, &mut north];
    let result = play_match(&mut state, &mut seats).unwrap();

    let mut totals = [0u32; 2];
    for award in &result.awards {
        if let Some(seat) = award.winner {
            totals[seat.index()] += award.game_points;
        }
        assert!(award.game_points <= 3);
    }
    assert_eq!(totals, result.game_points);
    assert!(result.game_points[result.winner.index()] >= MATCH_TARGET);
    assert!(result.game_points[result.winner.opponent().index()] < MATCH_TARGET);
    assert_eq!(result.tie_rounds(), result.awards.iter().filter(|a| a.reason == AwardReason::Tie).count());
}

#[test]
fn same_seed_same_match() {
    let run = |seed| {
        let mut state = MatchState::with_seed(seed);
        let mut south = passive;
        let mut north = passive;
        let mut seats: Seats<'_> = [&mut south, &mut north];
        play_match(&mut state, &mut seats).unwrap()
    };
    assert_eq!(run(555), run(555));
}

#[test]
fn snapshot_between_rounds_resumes_identically() {
    let mut state = MatchState::with_seed(404);
    let mut south = passive;
    let mut north = passive;
    {
        let mut seats: Seats<'_> = [&mut south, &mut north];
        play_round(state.round_mut(), &mut seats).unwrap();
    }
    state.finish_round_and_start_next().unwrap();

    let json = MatchSnapshot::to_json(&state).unwrap();
    let mut restored = MatchSnapshot::from_json(&json).unwrap().restore();
    assert_eq!(restored.round_number(), state.round_number());
    assert_eq!(restored.game_points(), state.game_points());

    let finish = |state: &mut MatchState| {
        let mut a = passive;
        let mut b = passive;
        let mut seats: Seats<'_> = [&mut a, &mut b];
        let award = play_round(state.round_mut(), &mut seats).unwrap();
        (award, state.round().scores().standings().to_owned())
    };
    assert_eq!(finish(&mut restored), finish(&mut state));
}

/// Records how many observations arrive at privilege points.
struct PrivilegeCounter {
    privileges: usize,
}

impl Policy for PrivilegeCounter {
    fn choose(&mut self, state: &ObservableState) -> Action {
        if state.is_winner_privilege {
            self.privileges += 1;
            assert!(state.valid_actions.contains(&Action::CloseGame));
            assert!(state.valid_actions.contains(&Action::Pass));
        }
        passive(state)
    }
}

#[test]
fn failed_close_pays_the_defender() {
    let c = Card::new;
    let mut round = RoundState::from_layout(RoundLayout {
        hands: [
            vec![c(Rank::Ace, Suit::Spades), c(Rank::Jack, Suit::Hearts)],
            vec![c(Rank::Nine, Suit::Spades), c(Rank::Queen, Suit::Diamonds)],
        ],
        draw_pile: vec![
            c(Rank::King, Suit::Diamonds),
            c(Rank::Ten, Suit::Diamonds),
            c(Rank::Jack, Suit::Diamonds),
        ],
        trump_card: Some(c(Rank::Ace, Suit::Clubs)),
        trump_suit: Suit::Clubs,
        leader: PlayerPosition::South,
        scores: [29, 20],
        closed_by: None,
    })
    .unwrap();

    let mut closer = |state: &ObservableState| {
        if state.is_winner_privilege {
            Action::CloseGame
        } else {
            passive(state)
        }
    };
    let mut defender = PrivilegeCounter { privileges: 0 };
    let award = {
        let mut seats: Seats<'_> = [&mut closer, &mut defender];
        play_round(&mut round, &mut seats).unwrap()
    };

    assert_eq!(round.closed_by(), Some(PlayerPosition::South));
    assert!(round.score(PlayerPosition::South) < 66);
    assert_eq!(award.winner, Some(PlayerPosition::North));
    assert_eq!(award.game_points, 3);
    assert_eq!(award.reason, AwardReason::ClosedAndFailed);
    assert_eq!(defender.privileges, 0);
}
