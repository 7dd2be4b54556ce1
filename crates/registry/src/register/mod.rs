//! Per-key ordered descriptor collections.
//!
//! # Role
//!
//! A [`SyntaxRegister`] holds every descriptor of one key, sorted by priority.
//! Writers publish a new sorted snapshot with a CAS loop; readers get an
//! immutable [`Syntaxes`] snapshot and never observe a later write.
//!
//! # Invariants
//!
//! - Entries are sorted by `(priority, id)`. Equal priorities are all kept;
//!   the id only breaks ties.
//! - A descriptor id appears at most once per register.
//! - Concurrent `add` calls never lose entries (CAS retry on contention).
//! - Once closed, a live register rejects every write and every further
//!   close. The [`FrozenRegister`] it hands out is read-only for good.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{RegistryError, Result};
use crate::info::{SyntaxId, SyntaxInfo};


/// Immutable point-in-time view of one register, in match order.
#[derive(Clone, Default)]
pub struct Syntaxes(Arc<[Arc<SyntaxInfo>]>);

impl Syntaxes {
	/// Whether both snapshots are the same published collection.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	pub fn iter(&self) -> core::slice::Iter<'_, Arc<SyntaxInfo>> {
		self.0.iter()
	}
}

impl core::ops::Deref for Syntaxes {
	type Target = [Arc<SyntaxInfo>];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<'a> IntoIterator for &'a Syntaxes {
	type Item = &'a Arc<SyntaxInfo>;
	type IntoIter = core::slice::Iter<'a, Arc<SyntaxInfo>>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl core::fmt::Debug for Syntaxes {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}

/// Operations shared by live and frozen registers.
pub trait Register: Send + Sync {
	/// Name of the key this register belongs to.
	fn key(&self) -> &'static str;

	/// Inserts `info` in priority order.
	fn add(&self, info: Arc<SyntaxInfo>) -> Result<()>;

	/// Current contents.
	fn syntaxes(&self) -> Syntaxes;

	/// Freezes the register, returning its read-only successor.
	fn close_registration(&self) -> Result<FrozenRegister>;
}

struct Contents {
	entries: Arc<[Arc<SyntaxInfo>]>,
	closed: bool,
}

/// Mutable register for one key.
pub struct SyntaxRegister {
	key: &'static str,
	contents: ArcSwap<Contents>,
}

impl SyntaxRegister {
	pub fn new(key: &'static str) -> Self {
		Self {
			key,
			contents: ArcSwap::from_pointee(Contents {
				entries: Arc::from(Vec::new()),
				closed: false,
			}),
		}
	}

	pub fn len(&self) -> usize {
		self.contents.load().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_closed(&self) -> bool {
		self.contents.load().closed
	}

	/// Removes the descriptor with `id`, if present. Used to undo a partially
	/// applied registration.
	pub(crate) fn retract(&self, id: SyntaxId) {
		loop {
			let old = self.contents.load_full();
			let Some(pos) = old.entries.iter().position(|info| info.id() == id) else {
				return;
			};
			let mut entries = old.entries.to_vec();
			entries.remove(pos);
			let new = Arc::new(Contents {
				entries: Arc::from(entries),
				closed: old.closed,
			});

			let prev = self.contents.compare_and_swap(&old, new);
			if Arc::ptr_eq(&prev, &old) {
				return;
			}
		}
	}
}

impl Register for SyntaxRegister {
	fn key(&self) -> &'static str {
		self.key
	}

	fn add(&self, info: Arc<SyntaxInfo>) -> Result<()> {
		let order = info.order_key();
		loop {
			let old = self.contents.load_full();
			if old.closed {
				return Err(RegistryError::RegistrationClosed { key: Some(self.key) });
			}

			// Ids are unique, so an exact key match is the same descriptor.
			let pos = match old.entries.binary_search_by_key(&order, |entry| entry.order_key()) {
				Ok(_) => {
					return Err(RegistryError::DuplicateSyntax {
						key: self.key,
						id: info.id(),
					});
				}
				Err(pos) => pos,
			};

			let mut entries = Vec::with_capacity(old.entries.len() + 1);
			entries.extend_from_slice(&old.entries[..pos]);
			entries.push(info.clone());
			entries.extend_from_slice(&old.entries[pos..]);
			let new = Arc::new(Contents {
				entries: Arc::from(entries),
				closed: false,
			});

			let prev = self.contents.compare_and_swap(&old, new);
			if Arc::ptr_eq(&prev, &old) {
				return Ok(());
			}
			// Lost the race; retry against the newer snapshot.
		}
	}

	fn syntaxes(&self) -> Syntaxes {
		Syntaxes(self.contents.load().entries.clone())
	}

	fn close_registration(&self) -> Result<FrozenRegister> {
		loop {
			let old = self.contents.load_full();
			if old.closed {
				return Err(RegistryError::RegistrationClosed { key: Some(self.key) });
			}
			let new = Arc::new(Contents {
				entries: old.entries.clone(),
				closed: true,
			});

			let prev = self.contents.compare_and_swap(&old, new);
			if Arc::ptr_eq(&prev, &old) {
				return Ok(FrozenRegister {
					key: self.key,
					syntaxes: Syntaxes(old.entries.clone()),
				});
			}
		}
	}
}

impl core::fmt::Debug for SyntaxRegister {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let contents = self.contents.load();
		f.debug_struct("SyntaxRegister")
			.field("key", &self.key)
			.field("len", &contents.entries.len())
			.field("closed", &contents.closed)
			.finish()
	}
}

/// Read-only register produced by closing a [`SyntaxRegister`].
#[derive(Debug, Clone)]
pub struct FrozenRegister {
	key: &'static str,
	syntaxes: Syntaxes,
}

impl Register for FrozenRegister {
	fn key(&self) -> &'static str {
		self.key
	}

	fn add(&self, _info: Arc<SyntaxInfo>) -> Result<()> {
		Err(RegistryError::RegistrationClosed { key: Some(self.key) })
	}

	/// Always the same collection.
	fn syntaxes(&self) -> Syntaxes {
		self.syntaxes.clone()
	}

	fn close_registration(&self) -> Result<FrozenRegister> {
		Err(RegistryError::RegistrationClosed { key: Some(self.key) })
	}
}
