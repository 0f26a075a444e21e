use super::match_state::{MatchError, MatchResult, MatchState};
use super::policy::Policy;
use crate::model::action::ActionError;
use crate::model::round::RoundState;
use crate::model::score::GameAward;
use tracing::{Level, event};

/// Decision-makers indexed by seat: South first, then North.
pub type Seats<'a> = [&'a mut dyn Policy; 2];

/// Plays `round` to completion, asking the seat on move for each action and
/// forwarding every resulting event to both policies.
///
/// An action outside the offered list aborts the round with the engine's error.
pub fn play_round(round: &mut RoundState, seats: &mut Seats<'_>) -> Result<GameAward, ActionError> {
    while let Some(seat) = round.to_act() {
        let view = round.observe(seat);
        let action = seats[seat.index()].choose(&view);
        let outcome = round.apply(seat, action).inspect_err(|err| {
            event!(Level::ERROR, seat = %seat, error = %err, "policy broke the action contract");
        })?;
        for round_event in &outcome.events {
            for policy in seats.iter_mut() {
                policy.notify(round_event);
            }
        }
    }
    Ok(round.calculate_game_points())
}

/// Plays rounds until the match is decided.
pub fn play_match(
    state: &mut MatchState,
    seats: &mut Seats<'_>,
) -> Result<MatchResult, MatchError> {
    loop {
        if let Some(result) = state.result() {
            return Ok(result);
        }
        play_round(state.round_mut(), seats)?;
        state.finish_round_and_start_next()?;
    }
}

#[cfg(test)]
mod tests {
    use super::{Seats, play_match, play_round};
    use crate::game::match_state::MatchState;
    use crate::game::policy::{FirstLegal, Policy};
    use crate::model::action::{Action, ActionError};
    use crate::model::deck::Deck;
    use crate::model::event::RoundEvent;
    use crate::model::observation::ObservableState;
    use crate::model::player::PlayerPosition;
    use crate::model::round::RoundState;

    #[derive(Default)]
    struct Recorder {
        events: Vec<RoundEvent>,
    }

    impl Policy for Recorder {
        fn choose(&mut self, state: &ObservableState) -> Action {
            state.valid_actions[0]
        }

        fn notify(&mut self, event: &RoundEvent) {
            self.events.push(*event);
        }
    }

    #[test]
    fn both_seats_hear_every_event() {
        let mut round = RoundState::deal(&Deck::shuffled_with_seed(12), PlayerPosition::South);
        let mut south = Recorder::default();
        let mut north = Recorder::default();
        let award = {
            let mut seats: Seats<'_> = [&mut south, &mut north];
            play_round(&mut round, &mut seats).unwrap()
        };

        assert!(round.is_over());
        assert_eq!(south.events, north.events);
        match south.events.last() {
            Some(RoundEvent::RoundOver { award: last, .. }) => assert_eq!(*last, award),
            other => panic!("expected RoundOver last, got {other:?}"),
        }
    }

    #[test]
    fn contract_violation_aborts_the_round() {
        let mut round = RoundState::deal(&Deck::shuffled_with_seed(2), PlayerPosition::South);
        let mut cheat = |_: &ObservableState| Action::SwapTrump;
        let mut fair = FirstLegal;
        let mut seats: Seats<'_> = [&mut cheat, &mut fair];
        let err = play_round(&mut round, &mut seats).unwrap_err();
        assert!(matches!(err, ActionError::Illegal { .. }));
    }

    #[test]
    fn first_legal_players_finish_a_match() {
        let mut state = MatchState::with_seed(2024);
        let mut south = FirstLegal;
        let mut north = FirstLegal;
        let mut seats: Seats<'_> = [&mut south, &mut north];
        let result = play_match(&mut state, &mut seats).unwrap();

        assert!(result.game_points[result.winner.index()] >= 7);
        assert_eq!(result.awards.len() as u32, result.rounds_played);
        assert!(state.is_over());
    }
}
