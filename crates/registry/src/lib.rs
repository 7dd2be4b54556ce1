//! Syntax descriptor registry.
//!
//! Producers describe grammar productions as [`SyntaxInfo`] descriptors and
//! register them under typed [`Key`]s. Each key owns a priority-ordered
//! register; child keys also write into their parents. Closing the
//! [`SyntaxRegistry`] freezes every register for the rest of the process.
//!
//! # Modules
//!
//! - [`info`] - descriptors, their builders and category payloads
//! - [`key`] - typed keys, category markers and the default key set
//! - [`register`] - per-key ordered collections and their frozen form
//! - [`registry`] - the key to register map, batches and read-only views
//! - [`priority`] - ordering ranks and the packed legacy encoding

pub mod element;
pub mod error;
pub mod info;
pub mod key;
pub mod origin;
pub mod priority;
pub mod register;
pub mod registry;

pub use element::{SyntaxElement, TypeHandle};
pub use error::{RegistryError, Result};
pub use info::{
	EntryContainer, EntryValidator, EventBuilder, EventDocs, EventInfo, EventPriority,
	ExpressionBuilder, ExpressionInfo, ExpressionType, Factory, SectionEntry, StructureBuilder,
	StructureEntries, StructureInfo, SyntaxId, SyntaxInfo, SyntaxInfoBuilder, SyntaxPayload,
	event_pattern, fix_pattern,
};
pub use key::{
	CONDITION, ChildKey, EFFECT, EVENT, EXPRESSION, Key, RawKey, Refines, SECTION, STATEMENT,
	STRUCTURE, SyntaxKind, kinds,
};
pub use origin::SyntaxOrigin;
pub use priority::{MAX_PACKED_RANK, Priority};
pub use register::{FrozenRegister, Register, SyntaxRegister, Syntaxes};
pub use registry::{RegistrationBatch, SyntaxRegistry, UnmodifiableRegistry};
