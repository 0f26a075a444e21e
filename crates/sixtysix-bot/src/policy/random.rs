use super::{log_decision, privilege_choice};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sixtysix_core::game::policy::Policy;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::observation::ObservableState;

/// Uniform choice among the offered actions, marriage variants included.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, state: &ObservableState) -> Action {
        if state.is_winner_privilege {
            let action = privilege_choice(state);
            log_decision("random", state, action, "privilege");
            return action;
        }

        let action = state
            .valid_actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Pass);
        log_decision("random", state, action, "uniform");
        action
    }
}

#[cfg(test)]
mod tests {
    use super::RandomPolicy;
    use sixtysix_core::game::policy::Policy;
    use sixtysix_core::model::deck::Deck;
    use sixtysix_core::model::player::PlayerPosition;
    use sixtysix_core::model::round::RoundState;

    #[test]
    fn same_seed_same_choices() {
        let round = RoundState::deal(&Deck::shuffled_with_seed(17), PlayerPosition::South);
        let view = round.observe(PlayerPosition::South);
        let mut a = RandomPolicy::with_seed(3);
        let mut b = RandomPolicy::with_seed(3);
        for _ in 0..10 {
            let chosen = a.choose(&view);
            assert_eq!(chosen, b.choose(&view));
            assert!(view.is_valid(&chosen));
        }
    }
}
