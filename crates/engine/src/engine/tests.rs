use std::sync::{Arc, Barrier};

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use quill_registry::{EFFECT, RegistryError, STATEMENT, SyntaxElement, SyntaxInfo};

use super::*;

#[derive(Default)]
struct Say;
impl SyntaxElement for Say {}

fn say_module(addon: &Addon, registry: &mut ModuleRegistry<'_>) -> Result<(), RegistryError> {
	registry.register(
		&EFFECT,
		SyntaxInfo::builder::<Say>()
			.origin(addon.origin())
			.add_pattern("say %string%")
			.build()?,
	)
}

fn failing_module(_: &Addon, _: &mut ModuleRegistry<'_>) -> Result<(), RegistryError> {
	Err(RegistryError::Uninitialized { what: "test fixture" })
}

fn engine() -> Engine {
	Engine::new(Addon::new("Core"), &[&say_module]).unwrap()
}

#[test]
fn test_engine_registers_itself_first() {
	let engine = engine();
	engine.register_addon(Addon::new("Extra"), &[]).unwrap();

	let names: Vec<_> = engine.addons().iter().map(|a| a.name().to_string()).collect();
	assert_eq!(names, ["Core", "Extra"]);
	assert_eq!(engine.addon().name(), "Core");
	assert_eq!(engine.state(), State::Registration);
	assert_eq!(engine.syntaxes(&STATEMENT).len(), 1);
	assert_eq!(engine.syntaxes(&EFFECT)[0].origin().name(), "Core");
}

#[test]
fn test_duplicate_addon_rejected() {
	let engine = engine();
	let err = engine.register_addon(Addon::new("Core"), &[&say_module]).unwrap_err();
	assert!(matches!(err, EngineError::DuplicateAddon { ref name } if &**name == "Core"));
	assert_eq!(engine.syntaxes(&EFFECT).len(), 1);
	assert_eq!(engine.addons().len(), 1);
}

/// A failing module leaves no descriptors behind and frees the name.
#[test]
fn test_failed_load_is_not_committed() {
	let engine = engine();
	let err = engine
		.register_addon(Addon::new("Broken"), &[&say_module, &failing_module])
		.unwrap_err();
	assert!(matches!(err, EngineError::Module { ref addon, .. } if &**addon == "Broken"));
	assert_eq!(engine.syntaxes(&EFFECT).len(), 1);
	assert_eq!(engine.addons().len(), 1);

	engine.register_addon(Addon::new("Broken"), &[&say_module]).unwrap();
	assert_eq!(engine.syntaxes(&EFFECT).len(), 2);
}

/// Passes only when exactly one effect is staged and one is committed.
fn expects_staged_say(_: &Addon, registry: &mut ModuleRegistry<'_>) -> Result<(), RegistryError> {
	let staged = registry.staged(&EFFECT).count();
	let committed = registry.syntaxes(&EFFECT).len();
	if staged == 1 && committed == 1 {
		Ok(())
	} else {
		Err(RegistryError::Uninitialized { what: "staged effect" })
	}
}

#[test]
fn test_modules_see_staged_writes() {
	let engine = engine();
	engine
		.register_addon(Addon::new("Ordered"), &[&say_module, &expects_staged_say])
		.unwrap();
	assert_eq!(engine.syntaxes(&EFFECT).len(), 2);
}

/// Same modules, reversed: the check runs before anything is staged.
#[test]
fn test_modules_run_in_supplied_order() {
	let engine = engine();
	let err = engine
		.register_addon(Addon::new("Reversed"), &[&expects_staged_say, &say_module])
		.unwrap_err();
	assert!(matches!(err, EngineError::Module { ref addon, .. } if &**addon == "Reversed"));
	assert_eq!(engine.syntaxes(&EFFECT).len(), 1);
}

static LOAD_GATE: Barrier = Barrier::new(2);

/// Signals that loading started, then waits to be released.
fn gated_say_module(addon: &Addon, registry: &mut ModuleRegistry<'_>) -> Result<(), RegistryError> {
	LOAD_GATE.wait();
	LOAD_GATE.wait();
	say_module(addon, registry)
}

/// A load still running when registration ends is discarded, and listeners
/// of the ended state saw the final descriptor set.
#[test]
fn test_load_spanning_ended_registration_is_discarded() {
	let engine = engine();
	engine.update_state(State::AddonRegistration).unwrap();

	let seen = Arc::new(Mutex::new(None));
	{
		let seen = Arc::clone(&seen);
		engine.add_listener(move |engine: &Engine, state: State| {
			if state == State::EndedRegistration {
				*seen.lock() = Some(engine.syntaxes(&EFFECT).len());
			}
		});
	}

	let result = std::thread::scope(|scope| {
		let load = scope.spawn(|| engine.register_addon(Addon::new("Slow"), &[&gated_say_module]));
		LOAD_GATE.wait();
		engine.update_state(State::EndedRegistration).unwrap();
		LOAD_GATE.wait();
		load.join().unwrap()
	});

	assert!(matches!(
		result,
		Err(EngineError::RegistrationClosed {
			state: State::EndedRegistration
		})
	));
	assert_eq!(engine.state(), State::EndedRegistration);
	assert_eq!(*seen.lock(), Some(1));
	assert_eq!(engine.syntaxes(&EFFECT).len(), 1);
	let names: Vec<_> = engine.addons().iter().map(|a| a.name().to_string()).collect();
	assert_eq!(names, ["Core"]);
}

#[test]
fn test_registration_closes_after_ended() {
	let engine = engine();
	engine.update_state(State::EndedRegistration).unwrap();

	let err = engine.register_addon(Addon::new("Late"), &[]).unwrap_err();
	assert!(matches!(
		err,
		EngineError::RegistrationClosed {
			state: State::EndedRegistration
		}
	));
	assert!(!engine.registry().is_closed());
}

#[test]
fn test_state_never_moves_backwards() {
	let engine = engine();
	engine.update_state(State::AddonRegistration).unwrap();

	for to in [State::Registration, State::AddonRegistration] {
		let err = engine.update_state(to).unwrap_err();
		assert!(matches!(
			err,
			EngineError::InvalidTransition {
				from: State::AddonRegistration,
				..
			}
		));
	}
	assert_eq!(engine.state(), State::AddonRegistration);
}

/// Listeners see every state, and the registry is frozen by the time they
/// hear about the close.
#[test]
fn test_listeners_walk_every_state() {
	let engine = engine();
	let log = Arc::new(Mutex::new(Vec::new()));
	{
		let log = Arc::clone(&log);
		engine.add_listener(move |engine: &Engine, state: State| {
			log.lock().push((state, engine.state(), engine.registry().is_closed()));
		});
	}

	engine.update_state(State::ClosedRegistration).unwrap();
	assert_eq!(
		*log.lock(),
		[
			(State::AddonRegistration, State::AddonRegistration, false),
			(State::EndedRegistration, State::EndedRegistration, false),
			(State::ClosedRegistration, State::ClosedRegistration, true),
		]
	);
}

#[test]
fn test_view_is_read_only() {
	let engine = engine();
	let info = SyntaxInfo::builder::<Say>().add_pattern("shout").build().unwrap();
	assert_eq!(
		engine.registry().register(&EFFECT, info).unwrap_err(),
		RegistryError::RegistrationClosed { key: Some("effect") }
	);
	assert_eq!(engine.registry().syntaxes(&EFFECT).len(), 1);
}
