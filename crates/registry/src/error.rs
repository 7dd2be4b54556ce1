//! Error taxonomy for descriptor construction and registration.

use crate::info::SyntaxId;

/// Errors raised while building descriptors or writing to a registry.
///
/// Every variant is fatal for the operation that produced it: callers are
/// expected to abort the current module load rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A category-required builder field was never set.
	#[error("{kind} descriptor for {type_name} is missing required field `{field}`")]
	MissingField {
		kind: &'static str,
		type_name: &'static str,
		field: &'static str,
	},

	/// A descriptor was built without any pattern.
	#[error("descriptor for {type_name} has no patterns")]
	EmptyPatterns { type_name: &'static str },

	/// An expression return type is not a nominal value type.
	#[error("return type must be a plain value type, got {type_name}")]
	InvalidReturnType { type_name: &'static str },

	/// The descriptor payload does not belong to the key's category.
	#[error("key `{key}` expects {expected} descriptors, got {found}")]
	KindMismatch {
		key: &'static str,
		expected: &'static str,
		found: &'static str,
	},

	/// A write reached a register or registry after it was closed.
	#[error("registration is closed (key: {})", .key.unwrap_or("<registry>"))]
	RegistrationClosed { key: Option<&'static str> },

	/// The same descriptor identity is already present under `key`.
	#[error("duplicate syntax {id} under key `{key}`")]
	DuplicateSyntax { key: &'static str, id: SyntaxId },

	/// Derived state was read before its owner finished initializing.
	#[error("{what} accessed before initialization")]
	Uninitialized { what: &'static str },
}

/// Result alias for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
