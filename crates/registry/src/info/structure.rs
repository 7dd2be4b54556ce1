//! Structure descriptor data and the per-instance entry container.

use std::sync::Arc;

use crate::error::{RegistryError, Result};

/// One `key: value` line from a structure's section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
	pub key: String,
	pub value: String,
}

impl SectionEntry {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// Validates the entries of a structure body.
///
/// Implemented outside the registry; descriptors only carry it around.
pub trait EntryValidator: Send + Sync + core::fmt::Debug {
	/// Returns the validated container, or `None` if the body is rejected.
	fn validate(&self, entries: &[SectionEntry]) -> Option<EntryContainer>;
}

/// Result of validating a structure body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryContainer {
	entries: Vec<SectionEntry>,
	unhandled: Vec<SectionEntry>,
}

impl EntryContainer {
	/// Container built by a validator.
	pub fn new(entries: Vec<SectionEntry>, unhandled: Vec<SectionEntry>) -> Self {
		Self { entries, unhandled }
	}

	/// Container for structures without a validator; every entry is left for
	/// the structure to interpret.
	pub fn without_validator(entries: Vec<SectionEntry>) -> Self {
		Self {
			entries: Vec::new(),
			unhandled: entries,
		}
	}

	/// Value of the first validated entry named `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|entry| entry.key == key)
			.map(|entry| entry.value.as_str())
	}

	pub fn entries(&self) -> &[SectionEntry] {
		&self.entries
	}

	/// Entries the validator did not claim.
	pub fn unhandled(&self) -> &[SectionEntry] {
		&self.unhandled
	}
}

/// Structure-specific descriptor data.
#[derive(Debug, Clone, Default)]
pub struct StructureInfo {
	pub(crate) entry_validator: Option<Arc<dyn EntryValidator>>,
}

impl StructureInfo {
	pub fn entry_validator(&self) -> Option<&Arc<dyn EntryValidator>> {
		self.entry_validator.as_ref()
	}
}

impl PartialEq for StructureInfo {
	fn eq(&self, other: &Self) -> bool {
		match (&self.entry_validator, &other.entry_validator) {
			(None, None) => true,
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl Eq for StructureInfo {}

/// Entry container slot owned by one parsed structure instance.
///
/// The container only exists once [`StructureEntries::initialize`] has run
/// against the owning descriptor's validator.
#[derive(Debug, Default)]
pub struct StructureEntries {
	container: Option<EntryContainer>,
}

impl StructureEntries {
	pub fn new() -> Self {
		Self::default()
	}

	/// Validates `entries` and stores the container.
	///
	/// Returns `false` when the validator rejected the body, in which case the
	/// slot stays uninitialized.
	pub fn initialize(&mut self, validator: Option<&dyn EntryValidator>, entries: Vec<SectionEntry>) -> bool {
		let container = match validator {
			None => Some(EntryContainer::without_validator(entries)),
			Some(validator) => validator.validate(&entries),
		};
		match container {
			Some(container) => {
				self.container = Some(container);
				true
			}
			None => false,
		}
	}

	pub fn is_initialized(&self) -> bool {
		self.container.is_some()
	}

	/// The validated container.
	///
	/// # Errors
	///
	/// [`RegistryError::Uninitialized`] before a successful `initialize`.
	pub fn entry_container(&self) -> Result<&EntryContainer> {
		self.container.as_ref().ok_or(RegistryError::Uninitialized {
			what: "structure entry container",
		})
	}
}
