//! Syntax descriptors.
//!
//! # Role
//!
//! A [`SyntaxInfo`] is the unit of registration: one grammar production with
//! its origin, implementing type, factory, ordered patterns and priority. The
//! category-specific parts live in a closed [`SyntaxPayload`].
//!
//! # Invariants
//!
//! - Descriptors are immutable once built and shared through `Arc`.
//! - Every built descriptor has a unique [`SyntaxId`]; registers use it as the
//!   identity for duplicate detection and as the final ordering tie-break.
//! - Patterns are non-empty. Expression return types are value types.
//!   Event ids are derived once from the name.

mod builder;
mod event;
mod expression;
mod structure;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use builder::{EventBuilder, ExpressionBuilder, StructureBuilder, SyntaxInfoBuilder};
pub use event::{EventDocs, EventInfo, EventPriority, event_pattern, fix_pattern};
pub use expression::{ExpressionInfo, ExpressionType};
pub use structure::{EntryContainer, EntryValidator, SectionEntry, StructureEntries, StructureInfo};

use crate::element::{SyntaxElement, TypeHandle};
use crate::origin::SyntaxOrigin;
use crate::priority::Priority;

/// Builds a fresh element instance.
pub type Factory = Arc<dyn Fn() -> Box<dyn SyntaxElement> + Send + Sync>;

static NEXT_SYNTAX_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one built descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyntaxId(u64);

impl SyntaxId {
	fn next() -> Self {
		Self(NEXT_SYNTAX_ID.fetch_add(1, Ordering::Relaxed))
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

impl core::fmt::Display for SyntaxId {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Category-specific descriptor data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxPayload {
	/// Statements, effects, conditions, sections.
	Plain,
	Expression(ExpressionInfo),
	Structure(StructureInfo),
	/// Events are structures with host event bindings and documentation.
	Event(EventInfo),
}

impl SyntaxPayload {
	/// Human-readable category name used in diagnostics.
	pub const fn kind_name(&self) -> &'static str {
		match self {
			Self::Plain => "syntax",
			Self::Expression(_) => "expression",
			Self::Structure(_) => "structure",
			Self::Event(_) => "event",
		}
	}
}

/// Immutable description of one registrable syntax production.
pub struct SyntaxInfo {
	id: SyntaxId,
	origin: SyntaxOrigin,
	element: TypeHandle,
	factory: Factory,
	custom_factory: bool,
	patterns: Arc<[String]>,
	priority: Priority,
	payload: SyntaxPayload,
}

impl SyntaxInfo {
	/// Starts a descriptor for a default-constructible element.
	pub fn builder<E: SyntaxElement + Default>() -> SyntaxInfoBuilder {
		let factory: Factory = Arc::new(|| Box::new(E::default()) as Box<dyn SyntaxElement>);
		SyntaxInfoBuilder::new(TypeHandle::of::<E>(), factory, false)
	}

	/// Starts a descriptor whose instances come from `factory`.
	pub fn builder_with<E, F>(factory: F) -> SyntaxInfoBuilder
	where
		E: SyntaxElement,
		F: Fn() -> E + Send + Sync + 'static,
	{
		let factory: Factory = Arc::new(move || Box::new(factory()) as Box<dyn SyntaxElement>);
		SyntaxInfoBuilder::new(TypeHandle::of::<E>(), factory, true)
	}

	pub fn id(&self) -> SyntaxId {
		self.id
	}

	pub fn origin(&self) -> &SyntaxOrigin {
		&self.origin
	}

	/// The implementing type this descriptor instantiates.
	pub fn element_type(&self) -> TypeHandle {
		self.element
	}

	/// Whether the producer supplied its own factory instead of relying on
	/// `Default`.
	pub fn has_custom_factory(&self) -> bool {
		self.custom_factory
	}

	/// Builds a fresh element.
	pub fn instance(&self) -> Box<dyn SyntaxElement> {
		(self.factory)()
	}

	/// Patterns in the order the matcher tries them.
	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	/// Effective priority, including the expression category if any.
	pub fn priority(&self) -> Priority {
		self.priority
	}

	pub fn payload(&self) -> &SyntaxPayload {
		&self.payload
	}

	pub fn kind_name(&self) -> &'static str {
		self.payload.kind_name()
	}

	pub fn as_expression(&self) -> Option<&ExpressionInfo> {
		match &self.payload {
			SyntaxPayload::Expression(info) => Some(info),
			_ => None,
		}
	}

	/// Structure data; `None` for events, which never carry a validator.
	pub fn as_structure(&self) -> Option<&StructureInfo> {
		match &self.payload {
			SyntaxPayload::Structure(info) => Some(info),
			_ => None,
		}
	}

	pub fn as_event(&self) -> Option<&EventInfo> {
		match &self.payload {
			SyntaxPayload::Event(info) => Some(info),
			_ => None,
		}
	}

	/// Entry validator of a structure descriptor.
	pub fn entry_validator(&self) -> Option<&Arc<dyn EntryValidator>> {
		self.as_structure().and_then(StructureInfo::entry_validator)
	}

	/// Ordering key inside a register: priority first, identity last.
	pub(crate) fn order_key(&self) -> (Priority, SyntaxId) {
		(self.priority, self.id)
	}
}

impl PartialEq for SyntaxInfo {
	/// Value equality: identity and priority are ignored.
	fn eq(&self, other: &Self) -> bool {
		self.origin == other.origin
			&& self.element == other.element
			&& self.patterns == other.patterns
			&& self.payload == other.payload
	}
}

impl Eq for SyntaxInfo {}

impl core::fmt::Debug for SyntaxInfo {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("SyntaxInfo")
			.field("id", &self.id)
			.field("origin", &self.origin)
			.field("element", &self.element)
			.field("patterns", &self.patterns)
			.field("priority", &self.priority)
			.field("payload", &self.payload)
			.finish_non_exhaustive()
	}
}
