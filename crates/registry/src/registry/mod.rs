//! The syntax registry: one register per key, with child-to-parent fan-out.
//!
//! # Role
//!
//! [`SyntaxRegistry`] maps key names to registers, creates registers on first
//! use and writes each descriptor into its key and every ancestor key. Closing
//! the registry freezes all registers at once.
//!
//! # Invariants
//!
//! - A `register` call either lands in the key and all ancestors or in none.
//! - At most one register is ever created per key name.
//! - Once `close_registration` has started, every write fails with
//!   [`RegistryError::RegistrationClosed`]. Writers hold the gate for reading;
//!   closing takes it for writing, so no write straddles the close.
//! - After close, `syntaxes` returns the same collection on every call.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::info::{SyntaxId, SyntaxInfo};
use crate::key::{Key, RawKey, SyntaxKind};
use crate::register::{FrozenRegister, Register, SyntaxRegister, Syntaxes};

#[cfg(test)]
mod tests;

enum Slot {
	Live(Arc<SyntaxRegister>),
	Frozen(FrozenRegister),
}

impl Slot {
	fn as_register(&self) -> &dyn Register {
		match self {
			Self::Live(register) => register.as_ref(),
			Self::Frozen(register) => register,
		}
	}
}

/// Registers touched by one write, kept for rollback.
type Applied = SmallVec<[(Arc<SyntaxRegister>, SyntaxId); 4]>;

/// Registry of all syntax descriptors, keyed by category.
#[derive(Default)]
pub struct SyntaxRegistry {
	closed: RwLock<bool>,
	registers: RwLock<FxHashMap<&'static str, Slot>>,
}

impl SyntaxRegistry {
	/// Creates an empty, open registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `info` under `key` and every ancestor of `key`.
	///
	/// # Errors
	///
	/// - [`RegistryError::KindMismatch`] if the payload does not fit the key
	///   or one of its ancestors.
	/// - [`RegistryError::RegistrationClosed`] after `close_registration`.
	/// - [`RegistryError::DuplicateSyntax`] if the descriptor is already
	///   present under any key of the chain. Nothing is written in that case.
	pub fn register<K: SyntaxKind>(&self, key: &Key<K>, info: impl Into<Arc<SyntaxInfo>>) -> Result<()> {
		let info = info.into();
		let gate = self.closed.read();
		if *gate {
			warn!(key = key.name(), syntax = %info.id(), "registration rejected: registry closed");
			return Err(RegistryError::RegistrationClosed { key: Some(key.name()) });
		}

		let mut applied = Applied::new();
		if let Err(err) = self.insert_chain(key.raw(), &info, &mut applied) {
			rollback(applied);
			return Err(err);
		}
		Ok(())
	}

	/// Applies every staged registration of `batch`, or none of them.
	///
	/// Returns the number of descriptors committed.
	pub fn commit(&self, batch: RegistrationBatch) -> Result<usize> {
		let gate = self.closed.read();
		if *gate {
			warn!(staged = batch.len(), "batch rejected: registry closed");
			return Err(RegistryError::RegistrationClosed { key: None });
		}

		let mut applied = Applied::new();
		for (key, info) in &batch.entries {
			if let Err(err) = self.insert_chain(key, info, &mut applied) {
				rollback(applied);
				return Err(err);
			}
		}
		Ok(batch.entries.len())
	}

	/// Current descriptors for `key`, in match order.
	///
	/// An unknown key yields an empty snapshot.
	pub fn syntaxes<K>(&self, key: &Key<K>) -> Syntaxes {
		self.registers
			.read()
			.get(key.name())
			.map(|slot| slot.as_register().syntaxes())
			.unwrap_or_default()
	}

	/// Freezes every register. Later writes anywhere fail.
	///
	/// # Errors
	///
	/// [`RegistryError::RegistrationClosed`] if already closed.
	pub fn close_registration(&self) -> Result<()> {
		let mut gate = self.closed.write();
		if *gate {
			return Err(RegistryError::RegistrationClosed { key: None });
		}
		*gate = true;

		let mut registers = self.registers.write();
		let mut total = 0;
		for slot in registers.values_mut() {
			let frozen = match slot {
				Slot::Live(register) => register.close_registration()?,
				Slot::Frozen(_) => continue,
			};
			total += frozen.syntaxes().len();
			*slot = Slot::Frozen(frozen);
		}
		info!(registers = registers.len(), syntaxes = total, "syntax registry closed");
		Ok(())
	}

	pub fn is_closed(&self) -> bool {
		*self.closed.read()
	}

	/// Names of all keys that have a register, sorted.
	pub fn keys(&self) -> Vec<&'static str> {
		let mut keys: Vec<_> = self.registers.read().keys().copied().collect();
		keys.sort_unstable();
		keys
	}

	/// Read-only handle sharing this registry.
	pub fn unmodifiable_view(self: &Arc<Self>) -> UnmodifiableRegistry {
		UnmodifiableRegistry {
			inner: Arc::clone(self),
		}
	}

	fn insert_chain(&self, key: &RawKey, info: &Arc<SyntaxInfo>, applied: &mut Applied) -> Result<()> {
		let lineage = key.lineage();
		for link in &lineage {
			if !link.accepts(info.payload()) {
				return Err(RegistryError::KindMismatch {
					key: link.name(),
					expected: link.kind(),
					found: info.kind_name(),
				});
			}
		}

		for link in &lineage {
			let register = self.live_register(link.name())?;
			register.add(Arc::clone(info))?;
			applied.push((register, info.id()));
		}
		debug!(
			key = key.name(),
			syntax = %info.id(),
			priority = %info.priority(),
			origin = %info.origin(),
			"registered syntax"
		);
		Ok(())
	}

	/// Resolves the register for `name`, creating it if absent.
	fn live_register(&self, name: &'static str) -> Result<Arc<SyntaxRegister>> {
		if let Some(slot) = self.registers.read().get(name) {
			return live(slot, name);
		}
		let mut registers = self.registers.write();
		let slot = registers
			.entry(name)
			.or_insert_with(|| Slot::Live(Arc::new(SyntaxRegister::new(name))));
		live(slot, name)
	}
}

fn live(slot: &Slot, name: &'static str) -> Result<Arc<SyntaxRegister>> {
	match slot {
		Slot::Live(register) => Ok(Arc::clone(register)),
		Slot::Frozen(_) => Err(RegistryError::RegistrationClosed { key: Some(name) }),
	}
}

fn rollback(applied: Applied) {
	for (register, id) in applied.into_iter().rev() {
		register.retract(id);
	}
}

impl core::fmt::Debug for SyntaxRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("SyntaxRegistry")
			.field("closed", &self.is_closed())
			.field("keys", &self.keys())
			.finish()
	}
}

/// Registrations staged for an all-or-nothing [`SyntaxRegistry::commit`].
///
/// Kinds are checked when pushing, so a commit can only fail on a closed
/// registry or a duplicate identity.
#[derive(Default)]
pub struct RegistrationBatch {
	entries: Vec<(RawKey, Arc<SyntaxInfo>)>,
}

impl RegistrationBatch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stages `info` under `key`.
	pub fn push<K: SyntaxKind>(&mut self, key: &Key<K>, info: impl Into<Arc<SyntaxInfo>>) -> Result<()> {
		let info = info.into();
		let raw = *key.raw();
		if let Some(link) = raw.lineage().into_iter().find(|link| !link.accepts(info.payload())) {
			return Err(RegistryError::KindMismatch {
				key: link.name(),
				expected: link.kind(),
				found: info.kind_name(),
			});
		}
		self.entries.push((raw, info));
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Staged descriptors for exactly `key`, in staging order.
	pub fn staged<K>(&self, key: &Key<K>) -> impl Iterator<Item = &Arc<SyntaxInfo>> {
		let name = key.name();
		self.entries
			.iter()
			.filter(move |(raw, _)| raw.name() == name)
			.map(|(_, info)| info)
	}
}

impl core::fmt::Debug for RegistrationBatch {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("RegistrationBatch")
			.field("len", &self.entries.len())
			.finish()
	}
}

/// Handle to a registry that never accepts writes.
#[derive(Debug, Clone)]
pub struct UnmodifiableRegistry {
	inner: Arc<SyntaxRegistry>,
}

impl UnmodifiableRegistry {
	/// Always fails with [`RegistryError::RegistrationClosed`].
	pub fn register<K: SyntaxKind>(&self, key: &Key<K>, _info: impl Into<Arc<SyntaxInfo>>) -> Result<()> {
		Err(RegistryError::RegistrationClosed { key: Some(key.name()) })
	}

	pub fn syntaxes<K>(&self, key: &Key<K>) -> Syntaxes {
		self.inner.syntaxes(key)
	}

	pub fn keys(&self) -> Vec<&'static str> {
		self.inner.keys()
	}

	pub fn is_closed(&self) -> bool {
		self.inner.is_closed()
	}
}
