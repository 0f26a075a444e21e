use crate::model::action::Action;
use crate::model::event::RoundEvent;
use crate::model::observation::ObservableState;

/// A decision-maker for one seat.
///
/// `choose` must return one of `state.valid_actions`; the engine rejects
/// anything else. `notify` receives every public event of the round, both
/// seats' actions included.
pub trait Policy {
    fn choose(&mut self, state: &ObservableState) -> Action;

    fn notify(&mut self, _event: &RoundEvent) {}
}

impl<F> Policy for F
where
    F: FnMut(&ObservableState) -> Action,
{
    fn choose(&mut self, state: &ObservableState) -> Action {
        self(state)
    }
}

impl Policy for Box<dyn Policy> {
    fn choose(&mut self, state: &ObservableState) -> Action {
        (**self).choose(state)
    }

    fn notify(&mut self, event: &RoundEvent) {
        (**self).notify(event)
    }
}

/// Always takes the first legal action.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegal;

impl Policy for FirstLegal {
    fn choose(&mut self, state: &ObservableState) -> Action {
        state.valid_actions.first().copied().unwrap_or(Action::Pass)
    }
}
