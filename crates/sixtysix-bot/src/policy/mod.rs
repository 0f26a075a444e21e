mod greedy;
mod random;
mod scripted;

pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
pub use scripted::ScriptedPolicy;

use sixtysix_core::game::policy::Policy;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::observation::ObservableState;
use std::fmt;
use std::str::FromStr;
use tracing::{Level, event};

/// The built-in computer opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyKind {
    Random,
    #[default]
    Greedy,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [PolicyKind::Random, PolicyKind::Greedy];

    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Greedy => "greedy",
        }
    }

    /// A fresh policy of this kind whose tie-breaks are driven by `seed`.
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::with_seed(seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy::with_seed(seed)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicyKind(pub String);

impl fmt::Display for UnknownPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown policy '{}' (expected random or greedy)", self.0)
    }
}

impl std::error::Error for UnknownPolicyKind {}

impl FromStr for PolicyKind {
    type Err = UnknownPolicyKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "random" | "rand" => Ok(PolicyKind::Random),
            "greedy" | "default" => Ok(PolicyKind::Greedy),
            _ => Err(UnknownPolicyKind(raw.to_string())),
        }
    }
}

/// Privilege points are handled identically by every built-in bot:
/// take the swap when it is offered, never close.
fn privilege_choice(state: &ObservableState) -> Action {
    if state.can_swap() {
        Action::SwapTrump
    } else {
        Action::Pass
    }
}

fn log_decision(policy: &'static str, state: &ObservableState, chosen: Action, reason: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let chosen_card = state
        .card_for(&chosen)
        .map(|card| card.to_string())
        .unwrap_or_default();
    event!(
        target: "sixtysix_bot::decision",
        Level::DEBUG,
        policy,
        seat = %state.seat,
        phase = state.phase.number(),
        valid = state.valid_actions.len(),
        chosen = %chosen,
        card = %chosen_card,
        reason
    );
}
