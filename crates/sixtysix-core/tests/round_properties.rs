use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::card::Card;
use sixtysix_core::model::deck::{DECK_SIZE, Deck};
use sixtysix_core::model::event::RoundEvent;
use sixtysix_core::model::player::PlayerPosition;
use sixtysix_core::model::rank::Rank;
use sixtysix_core::model::round::{RoundStage, RoundState};
use sixtysix_core::model::suit::Suit;
use sixtysix_core::model::trick::strength;

fn leader_for(seed: u64) -> PlayerPosition {
    if seed % 2 == 0 {
        PlayerPosition::South
    } else {
        PlayerPosition::North
    }
}

fn any_card() -> impl Strategy<Value = Card> {
    (0usize..6, 0usize..4).prop_map(|(rank, suit)| {
        Card::new(
            Rank::from_index(rank).unwrap(),
            Suit::from_index(suit).unwrap(),
        )
    })
}

fn any_suit() -> impl Strategy<Value = Suit> {
    (0usize..4).prop_map(|suit| Suit::from_index(suit).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn every_card_is_accounted_for_and_offered_actions_apply(
        deal_seed in any::<u64>(),
        play_seed in any::<u64>(),
    ) {
        let deck = Deck::shuffled_with_seed(deal_seed);
        let mut round = RoundState::deal(&deck, leader_for(deal_seed));
        let mut rng = StdRng::seed_from_u64(play_seed);
        let mut steps = 0;

        while let Some(seat) = round.to_act() {
            prop_assert_eq!(round.accounted_cards(), DECK_SIZE);
            let view = round.observe(seat);
            prop_assert!(!view.valid_actions.is_empty());
            let action = *view.valid_actions.choose(&mut rng).unwrap();
            let applied = round.apply(seat, action);
            prop_assert!(applied.is_ok(), "offered {action} was rejected: {applied:?}");
            steps += 1;
            prop_assert!(steps < 200, "round failed to terminate");
        }

        prop_assert!(round.is_over());
        prop_assert_eq!(round.accounted_cards(), DECK_SIZE);
    }

    #[test]
    fn closing_freezes_the_stock(
        deal_seed in any::<u64>(),
        play_seed in any::<u64>(),
    ) {
        let deck = Deck::shuffled_with_seed(deal_seed);
        let mut round = RoundState::deal(&deck, leader_for(deal_seed));
        let mut rng = StdRng::seed_from_u64(play_seed);

        // Play plainly until the first winner privilege, then close.
        while round.stage() != RoundStage::WinnerPrivilege {
            let Some(seat) = round.to_act() else { break };
            let view = round.observe(seat);
            let action = *view.valid_actions.choose(&mut rng).unwrap();
            round.apply(seat, action).unwrap();
        }
        let Some(closer) = round.to_act() else {
            return Ok(());
        };
        round.apply(closer, Action::CloseGame).unwrap();

        let pile = round.draw_pile_len();
        let trump = round.trump_card();
        let mut sizes = [round.hand(PlayerPosition::South).len(), round.hand(PlayerPosition::North).len()];

        while let Some(seat) = round.to_act() {
            let view = round.observe(seat);
            prop_assert!(view.closed);
            prop_assert!(!view.is_winner_privilege);
            let action = *view.valid_actions.choose(&mut rng).unwrap();
            let outcome = round.apply(seat, action).unwrap();
            let drew = outcome
                .events
                .iter()
                .any(|e| matches!(e, RoundEvent::CardsDrawn { .. }));
            prop_assert!(!drew, "drew after the game was closed");
            prop_assert_eq!(round.draw_pile_len(), pile);
            prop_assert_eq!(round.trump_card(), trump);

            let now = [round.hand(PlayerPosition::South).len(), round.hand(PlayerPosition::North).len()];
            prop_assert!(now[0] <= sizes[0] && now[1] <= sizes[1]);
            sizes = now;
        }
        prop_assert!(round.calculate_game_points().game_points == 3);
    }

    #[test]
    fn lead_card_never_ties_with_the_response(
        lead in any_card(),
        response in any_card(),
        trump in any_suit(),
    ) {
        prop_assume!(lead != response);
        let lead_strength = strength(lead, lead.suit, trump);
        let response_strength = strength(response, lead.suit, trump);
        prop_assert_ne!(lead_strength, response_strength);
    }

    #[test]
    fn phase_two_responses_respect_follow_rules(
        deal_seed in any::<u64>(),
        play_seed in any::<u64>(),
    ) {
        let deck = Deck::shuffled_with_seed(deal_seed);
        let mut round = RoundState::deal(&deck, leader_for(deal_seed));
        let mut rng = StdRng::seed_from_u64(play_seed);

        while let Some(seat) = round.to_act() {
            let view = round.observe(seat);
            if let (Some(lead), true) = (view.lead_card, view.phase.number() == 2) {
                let playable = view.playable_cards();
                let follows = view.hand.iter().any(|c| c.suit == lead.suit);
                let trumps = view.hand.iter().any(|c| c.suit == view.trump_suit);
                if follows {
                    prop_assert!(playable.iter().all(|c| c.suit == lead.suit));
                } else if trumps {
                    prop_assert!(playable.iter().all(|c| c.suit == view.trump_suit));
                } else {
                    prop_assert_eq!(playable.len(), view.hand.len());
                }
            }
            let action = *view.valid_actions.choose(&mut rng).unwrap();
            round.apply(seat, action).unwrap();
        }
    }
}
