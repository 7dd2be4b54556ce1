use crate::engine::Engine;
use crate::state::State;

/// Collaborator notified on every lifecycle transition.
///
/// Listeners run in registration order after the engine has entered `state`.
/// For [`State::ClosedRegistration`] the registry is already frozen when
/// they run. Listeners must not call [`Engine::update_state`].
pub trait StateListener: Send + Sync {
	fn on_state_change(&self, engine: &Engine, state: State);
}

impl<F> StateListener for F
where
	F: Fn(&Engine, State) + Send + Sync,
{
	fn on_state_change(&self, engine: &Engine, state: State) {
		self(engine, state)
	}
}
