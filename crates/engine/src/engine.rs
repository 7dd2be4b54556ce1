//! The engine: owner of the syntax registry and its registration lifecycle.
//!
//! # Role
//!
//! [`Engine`] creates the registry, loads addons into it and drives the
//! lifecycle from [`State::Registration`] to [`State::ClosedRegistration`].
//! The engine is itself an addon and always loads first.
//!
//! # Invariants
//!
//! - Addon names are unique for the engine's lifetime. The duplicate check
//!   and name reservation happen in one critical section.
//! - An addon load is all-or-nothing: modules write to a staging registry
//!   that is committed atomically after all of them succeed.
//! - States only move forward. Skipped states are still entered, in order,
//!   so every listener sees every phase.
//! - The registry is frozen before listeners hear about
//!   [`State::ClosedRegistration`].
//! - A load commits only if registration is still accepted at commit time.
//!   The state check and the commit share the registration gate with state
//!   stores, so nothing lands after a listener has seen a non-accepting
//!   state.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use quill_registry::{Key, SyntaxRegistry, Syntaxes, UnmodifiableRegistry};
use rustc_hash::FxHashSet;
use tracing::{info, warn};

use crate::addon::{Addon, AddonModule, ModuleRegistry};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::listener::StateListener;
use crate::state::State;
use crate::submitted;

#[derive(Default)]
struct Addons {
	/// Names reserved by loaded and in-flight addons.
	names: FxHashSet<Arc<str>>,
	/// Fully loaded addons in load order.
	loaded: Vec<Addon>,
}

/// Owner of one syntax registry and its lifecycle.
pub struct Engine {
	addon: Addon,
	registry: Arc<SyntaxRegistry>,
	view: UnmodifiableRegistry,
	state: RwLock<State>,
	/// Read by commits, written by state stores.
	registration: RwLock<()>,
	transition: Mutex<()>,
	addons: Mutex<Addons>,
	listeners: RwLock<Vec<Arc<dyn StateListener>>>,
}

impl Engine {
	/// Creates an engine and registers it as addon `core` with `modules`.
	pub fn new(core: Addon, modules: &[&dyn AddonModule]) -> Result<Self> {
		let registry = Arc::new(SyntaxRegistry::new());
		let engine = Self {
			addon: core.clone(),
			view: registry.unmodifiable_view(),
			registry,
			state: RwLock::new(State::Registration),
			registration: RwLock::new(()),
			transition: Mutex::new(()),
			addons: Mutex::new(Addons::default()),
			listeners: RwLock::new(Vec::new()),
		};
		engine.register_addon(core, modules)?;
		Ok(engine)
	}

	/// Creates an engine from `config`, then loads submitted addons if the
	/// configuration asks for it.
	pub fn from_config(config: &EngineConfig, modules: &[&dyn AddonModule]) -> Result<Self> {
		let engine = Self::new(config.core_addon(), modules)?;
		if config.collect_submitted_addons {
			engine.load_submitted_addons()?;
		}
		Ok(engine)
	}

	/// The engine's own addon.
	pub fn addon(&self) -> &Addon {
		&self.addon
	}

	/// Loads `addon` by running each module in order, then commits
	/// everything they registered.
	///
	/// # Errors
	///
	/// - [`EngineError::RegistrationClosed`] outside an accepting state, or
	///   if registration ended while the modules were running.
	/// - [`EngineError::DuplicateAddon`] if the name is taken.
	/// - [`EngineError::Module`] if a module fails; nothing is committed and
	///   the name is released.
	/// - [`EngineError::Registry`] if the commit fails; nothing is committed.
	pub fn register_addon(&self, addon: Addon, modules: &[&dyn AddonModule]) -> Result<()> {
		let state = self.state();
		if !state.accepts_registration() {
			warn!(addon = addon.name(), %state, "addon rejected: registration closed");
			return Err(EngineError::RegistrationClosed { state });
		}

		let name = addon.shared_name();
		if !self.addons.lock().names.insert(Arc::clone(&name)) {
			warn!(addon = %name, "addon rejected: duplicate name");
			return Err(EngineError::DuplicateAddon { name });
		}

		match self.load(addon, modules) {
			Ok(count) => {
				info!(addon = %name, modules = modules.len(), syntaxes = count, "registered addon");
				Ok(())
			}
			Err(err) => {
				self.addons.lock().names.remove(&name);
				Err(err)
			}
		}
	}

	/// Runs `modules` against a staging registry, then commits under the
	/// registration gate.
	fn load(&self, addon: Addon, modules: &[&dyn AddonModule]) -> Result<usize> {
		let mut staging = ModuleRegistry::new(&self.registry);
		for module in modules {
			module.load(&addon, &mut staging).map_err(|source| EngineError::Module {
				addon: addon.shared_name(),
				source,
			})?;
		}

		// Modules ran ungated, so the state may have moved on.
		let _gate = self.registration.read();
		let state = self.state();
		if !state.accepts_registration() {
			warn!(addon = addon.name(), %state, "addon load discarded: registration ended while loading");
			return Err(EngineError::RegistrationClosed { state });
		}
		let count = self.registry.commit(staging.into_batch())?;
		self.addons.lock().loaded.push(addon);
		Ok(count)
	}

	/// Registers every addon submitted with `inventory::submit!`, ordered by
	/// priority then name. Returns how many were loaded.
	pub fn load_submitted_addons(&self) -> Result<usize> {
		let submitted = submitted::submitted_addons();
		for entry in &submitted {
			let modules: Vec<&dyn AddonModule> = entry.modules.iter().map(|m| m as &dyn AddonModule).collect();
			self.register_addon(entry.addon(), &modules)?;
		}
		Ok(submitted.len())
	}

	pub fn state(&self) -> State {
		*self.state.read()
	}

	/// Moves the lifecycle forward to `to`.
	///
	/// Intermediate states are entered in order. Entering
	/// [`State::ClosedRegistration`] freezes the registry first.
	///
	/// # Errors
	///
	/// [`EngineError::InvalidTransition`] unless `to` is strictly later than
	/// the current state.
	pub fn update_state(&self, to: State) -> Result<()> {
		let _transition = self.transition.lock();
		let from = self.state();
		if to <= from {
			return Err(EngineError::InvalidTransition { from, to });
		}

		let mut previous = from;
		for next in from.path_to(to) {
			{
				let _gate = self.registration.write();
				if next == State::ClosedRegistration {
					self.registry.close_registration()?;
				}
				*self.state.write() = next;
			}
			info!(from = %previous, to = %next, "engine state changed");
			self.notify(next);
			previous = next;
		}
		Ok(())
	}

	fn notify(&self, state: State) {
		let listeners = self.listeners.read().clone();
		for listener in &listeners {
			listener.on_state_change(self, state);
		}
	}

	/// Adds a listener for later transitions.
	pub fn add_listener(&self, listener: impl StateListener + 'static) {
		self.listeners.write().push(Arc::new(listener));
	}

	/// Snapshot of loaded addons in load order; the engine comes first.
	pub fn addons(&self) -> Vec<Addon> {
		self.addons.lock().loaded.clone()
	}

	/// Read-only view of the registry.
	pub fn registry(&self) -> &UnmodifiableRegistry {
		&self.view
	}

	/// Current descriptors for `key`.
	pub fn syntaxes<K>(&self, key: &Key<K>) -> Syntaxes {
		self.registry.syntaxes(key)
	}
}

impl core::fmt::Debug for Engine {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Engine")
			.field("addon", &self.addon.name())
			.field("state", &self.state())
			.field("registry", &self.registry)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
