use super::{log_decision, privilege_choice};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sixtysix_core::game::policy::Policy;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::observation::ObservableState;

/// Announces a marriage whenever one is offered, trump first; otherwise plays
/// the highest-value legal card (first in hand order on equal value).
#[derive(Debug, Clone)]
pub struct GreedyPolicy {
    rng: StdRng,
}

impl GreedyPolicy {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick_marriage(&mut self, state: &ObservableState) -> Option<(Action, &'static str)> {
        let marriages: Vec<Action> = state
            .valid_actions
            .iter()
            .copied()
            .filter(|action| action.marriage().is_some())
            .collect();
        let trump: Vec<Action> = marriages
            .iter()
            .copied()
            .filter(|action| action.marriage() == Some(state.trump_suit))
            .collect();

        if let Some(action) = trump.choose(&mut self.rng) {
            return Some((*action, "trump_marriage"));
        }
        marriages
            .choose(&mut self.rng)
            .map(|action| (*action, "marriage"))
    }
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for GreedyPolicy {
    fn choose(&mut self, state: &ObservableState) -> Action {
        if state.is_winner_privilege {
            let action = privilege_choice(state);
            log_decision("greedy", state, action, "privilege");
            return action;
        }

        if let Some((action, reason)) = self.pick_marriage(state) {
            log_decision("greedy", state, action, reason);
            return action;
        }

        let mut best: Option<(Action, u32)> = None;
        for action in state.plays() {
            let Some(card) = state.card_for(action) else {
                continue;
            };
            if best.is_none_or(|(_, value)| card.value() > value) {
                best = Some((*action, card.value()));
            }
        }

        let action = match best {
            Some((action, _)) => action,
            None => state
                .valid_actions
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(Action::Pass),
        };
        log_decision("greedy", state, action, "highest_value");
        action
    }
}
