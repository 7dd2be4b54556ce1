//! Typed keys identifying syntax categories.
//!
//! # Role
//!
//! A [`Key`] names one category of syntax (statements, expressions, events,
//! ...). Its type parameter is a [`SyntaxKind`] marker that says which
//! descriptor payloads the category accepts. A [`ChildKey`] additionally links
//! to a parent key; the registry writes every descriptor registered under a
//! child into all of its ancestors too.
//!
//! # Invariants
//!
//! - Keys compare and hash by name only. The kind parameter is a static
//!   check and does not take part in identity.
//! - `ChildKey::parent` returns exactly the key passed to `ChildKey::of`.
//! - Parent chains must not form a cycle. Nothing checks this; a cyclic chain
//!   makes registration walk forever.

use core::marker::PhantomData;
use core::ops::Deref;

use smallvec::SmallVec;

use crate::info::SyntaxPayload;

/// Static description of a syntax category.
pub trait SyntaxKind: 'static {
	/// Category name used in diagnostics.
	const NAME: &'static str;

	/// Whether a descriptor with `payload` belongs to this category.
	fn accepts(payload: &SyntaxPayload) -> bool;
}

/// Marks `Self` as a refinement of category `P`.
///
/// Every payload `Self` accepts must also be accepted by `P`, since child
/// registrations are written into the parent as well.
pub trait Refines<P: SyntaxKind>: SyntaxKind {}

/// Built-in category markers.
pub mod kinds {
	use super::{Refines, SyntaxKind};
	use crate::info::SyntaxPayload;

	macro_rules! plain_kind {
		($($(#[$meta:meta])* $name:ident => $label:literal;)*) => {$(
			$(#[$meta])*
			#[derive(Debug)]
			pub enum $name {}

			impl SyntaxKind for $name {
				const NAME: &'static str = $label;

				fn accepts(payload: &SyntaxPayload) -> bool {
					matches!(payload, SyntaxPayload::Plain)
				}
			}
		)*};
	}

	plain_kind! {
		/// Any line-level statement.
		Statement => "statement";
		/// Statements performing an action.
		Effect => "effect";
		/// Statements testing a predicate.
		Condition => "condition";
		/// Statements owning an indented body.
		Section => "section";
	}

	#[derive(Debug)]
	pub enum Expression {}

	impl SyntaxKind for Expression {
		const NAME: &'static str = "expression";

		fn accepts(payload: &SyntaxPayload) -> bool {
			matches!(payload, SyntaxPayload::Expression(_))
		}
	}

	/// Top-level script blocks. Events are structures.
	#[derive(Debug)]
	pub enum Structure {}

	impl SyntaxKind for Structure {
		const NAME: &'static str = "structure";

		fn accepts(payload: &SyntaxPayload) -> bool {
			matches!(payload, SyntaxPayload::Structure(_) | SyntaxPayload::Event(_))
		}
	}

	#[derive(Debug)]
	pub enum Event {}

	impl SyntaxKind for Event {
		const NAME: &'static str = "event";

		fn accepts(payload: &SyntaxPayload) -> bool {
			matches!(payload, SyntaxPayload::Event(_))
		}
	}

	impl Refines<Statement> for Effect {}
	impl Refines<Statement> for Condition {}
	impl Refines<Structure> for Event {}
}

/// Untyped key data shared by [`Key`] and [`ChildKey`].
#[derive(Clone, Copy)]
pub struct RawKey {
	name: &'static str,
	kind: &'static str,
	accepts: fn(&SyntaxPayload) -> bool,
	parent: Option<&'static RawKey>,
}

impl RawKey {
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Name of the category this key accepts.
	pub const fn kind(&self) -> &'static str {
		self.kind
	}

	pub const fn parent(&self) -> Option<&'static RawKey> {
		self.parent
	}

	pub fn accepts(&self, payload: &SyntaxPayload) -> bool {
		(self.accepts)(payload)
	}

	/// This key followed by each ancestor, nearest first.
	pub fn lineage(&self) -> SmallVec<[RawKey; 4]> {
		let mut chain = SmallVec::new();
		chain.push(*self);
		let mut next = self.parent;
		while let Some(parent) = next {
			chain.push(*parent);
			next = parent.parent;
		}
		chain
	}
}

impl PartialEq for RawKey {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for RawKey {}

impl core::hash::Hash for RawKey {
	fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl core::fmt::Debug for RawKey {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let mut s = f.debug_struct("Key");
		s.field("name", &self.name).field("kind", &self.kind);
		if let Some(parent) = self.parent {
			s.field("parent", &parent.name);
		}
		s.finish()
	}
}

/// Key for a category whose descriptors satisfy `K`.
pub struct Key<K> {
	raw: RawKey,
	_kind: PhantomData<fn() -> K>,
}

impl<K: SyntaxKind> Key<K> {
	/// Root key called `name`.
	pub const fn of(name: &'static str) -> Self {
		Self {
			raw: RawKey {
				name,
				kind: K::NAME,
				accepts: K::accepts,
				parent: None,
			},
			_kind: PhantomData,
		}
	}
}

impl<K> Key<K> {
	pub const fn name(&self) -> &'static str {
		self.raw.name
	}

	pub const fn raw(&self) -> &RawKey {
		&self.raw
	}
}

impl<K> Clone for Key<K> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<K> Copy for Key<K> {}

impl<K, L> PartialEq<Key<L>> for Key<K> {
	fn eq(&self, other: &Key<L>) -> bool {
		self.raw == other.raw
	}
}

impl<K> Eq for Key<K> {}

impl<K> core::hash::Hash for Key<K> {
	fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
		self.raw.hash(state);
	}
}

impl<K> core::fmt::Debug for Key<K> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		self.raw.fmt(f)
	}
}

/// Key for category `K` nested under a parent key of category `P`.
pub struct ChildKey<K, P: 'static> {
	key: Key<K>,
	parent: &'static Key<P>,
}

impl<K: Refines<P>, P: SyntaxKind> ChildKey<K, P> {
	pub const fn of(parent: &'static Key<P>, name: &'static str) -> Self {
		Self {
			key: Key {
				raw: RawKey {
					name,
					kind: K::NAME,
					accepts: K::accepts,
					parent: Some(&parent.raw),
				},
				_kind: PhantomData,
			},
			parent,
		}
	}
}

impl<K, P: 'static> ChildKey<K, P> {
	/// The key this child was created under.
	pub const fn parent(&self) -> &'static Key<P> {
		self.parent
	}

	pub const fn key(&self) -> &Key<K> {
		&self.key
	}
}

impl<K, P: 'static> Deref for ChildKey<K, P> {
	type Target = Key<K>;

	fn deref(&self) -> &Key<K> {
		&self.key
	}
}

impl<K, P: 'static> core::fmt::Debug for ChildKey<K, P> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		self.key.fmt(f)
	}
}

/// Top-level script blocks.
pub static STRUCTURE: Key<kinds::Structure> = Key::of("structure");
/// Statements owning an indented body.
pub static SECTION: Key<kinds::Section> = Key::of("section");
pub static STATEMENT: Key<kinds::Statement> = Key::of("statement");
pub static EFFECT: ChildKey<kinds::Effect, kinds::Statement> = ChildKey::of(&STATEMENT, "effect");
pub static CONDITION: ChildKey<kinds::Condition, kinds::Statement> = ChildKey::of(&STATEMENT, "condition");
pub static EXPRESSION: Key<kinds::Expression> = Key::of("expression");
/// Events; every event is also a structure.
pub static EVENT: ChildKey<kinds::Event, kinds::Structure> = ChildKey::of(&STRUCTURE, "event");
