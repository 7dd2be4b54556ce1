//! Handles to the concrete implementations descriptors instantiate.

use std::any::{Any, TypeId};

/// A concrete syntax implementation produced by a descriptor's factory.
///
/// The registry never calls into elements; it only builds them on request so
/// the matcher can initialize them.
pub trait SyntaxElement: Any + Send + Sync {}

impl dyn SyntaxElement {
	/// Returns the element as `T` if that is its concrete type.
	pub fn downcast_ref<T: SyntaxElement>(&self) -> Option<&T> {
		(self as &dyn Any).downcast_ref::<T>()
	}

	/// Returns true if the element's concrete type is `T`.
	pub fn is<T: SyntaxElement>(&self) -> bool {
		(self as &dyn Any).is::<T>()
	}
}

/// Names that [`TypeHandle::is_value_type`] refuses.
const PRIMITIVES: &[&str] = &[
	"bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
	"usize", "f32", "f64", "!",
];

/// Opaque, comparable handle to a Rust type.
#[derive(Clone, Copy)]
pub struct TypeHandle {
	id: TypeId,
	name: &'static str,
}

impl TypeHandle {
	/// Handle for `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	/// Fully qualified type name, for diagnostics.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Whether this is a nominal value type usable as an expression result.
	///
	/// Primitives, slices, arrays, tuples (including unit), references, raw
	/// pointers, function pointers and trait objects are rejected.
	pub fn is_value_type(&self) -> bool {
		let name = self.name;
		if PRIMITIVES.contains(&name) {
			return false;
		}
		!(name.starts_with('[')
			|| name.starts_with('(')
			|| name.starts_with('&')
			|| name.starts_with('*')
			|| name.starts_with("fn(")
			|| name.starts_with("dyn "))
	}
}

impl PartialEq for TypeHandle {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeHandle {}

impl core::hash::Hash for TypeHandle {
	fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl core::fmt::Debug for TypeHandle {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.name)
	}
}
