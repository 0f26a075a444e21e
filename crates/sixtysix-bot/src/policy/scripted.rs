use sixtysix_core::game::policy::Policy;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::event::RoundEvent;
use sixtysix_core::model::observation::ObservableState;
use std::collections::VecDeque;
use tracing::{Level, event};

/// Test stub: replays queued actions in order, then falls back to the first
/// offered action. Every observation and event it receives is kept.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: VecDeque<Action>,
    observations: Vec<ObservableState>,
    events: Vec<RoundEvent>,
}

impl ScriptedPolicy {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, action: Action) {
        self.script.push_back(action);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn observations(&self) -> &[ObservableState] {
        &self.observations
    }

    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }
}

impl Policy for ScriptedPolicy {
    fn choose(&mut self, state: &ObservableState) -> Action {
        self.observations.push(state.clone());
        if let Some(action) = self.script.pop_front() {
            return action;
        }
        event!(Level::TRACE, seat = %state.seat, "script exhausted, taking first legal action");
        state.valid_actions.first().copied().unwrap_or(Action::Pass)
    }

    fn notify(&mut self, event: &RoundEvent) {
        self.events.push(*event);
    }
}
