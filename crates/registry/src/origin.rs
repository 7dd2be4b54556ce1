use std::sync::Arc;

/// Where a syntax descriptor was contributed from.
///
/// Used for diagnostics and documentation only; dispatch never looks at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxOrigin {
	/// No producer was recorded.
	#[default]
	Unknown,
	/// Contributed by the named addon.
	Addon(Arc<str>),
}

impl SyntaxOrigin {
	/// Origin pointing at the addon called `name`.
	pub fn addon(name: impl Into<Arc<str>>) -> Self {
		Self::Addon(name.into())
	}

	/// Name of the producer, or `"unknown"`.
	pub fn name(&self) -> &str {
		match self {
			Self::Unknown => "unknown",
			Self::Addon(name) => name,
		}
	}
}

impl core::fmt::Display for SyntaxOrigin {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::Unknown => write!(f, "unknown"),
			Self::Addon(name) => write!(f, "addon:{name}"),
		}
	}
}
