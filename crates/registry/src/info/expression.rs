use crate::element::TypeHandle;

/// Broad classification of an expression, used only to bias match order.
///
/// Earlier variants are tried first: a [`ExpressionType::Simple`] expression
/// always precedes a [`ExpressionType::PatternMatchesEverything`] one,
/// whatever their base ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpressionType {
	/// Literal-like patterns with no sub-expressions.
	Simple,
	/// Values only available inside a particular event.
	Event,
	/// Patterns combining several sub-expressions.
	Combined,
	/// `%type%'s property` / `property of %type%` shapes.
	Property,
	/// Patterns broad enough to match almost any input.
	PatternMatchesEverything,
}

impl ExpressionType {
	/// All categories in ordinal order.
	pub const ALL: [ExpressionType; 5] = [
		Self::Simple,
		Self::Event,
		Self::Combined,
		Self::Property,
		Self::PatternMatchesEverything,
	];

	/// Ordinal folded into the expression's priority category.
	pub const fn ordinal(self) -> u8 {
		self as u8
	}
}

/// Expression-specific descriptor data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionInfo {
	pub(crate) return_type: TypeHandle,
	pub(crate) expression_type: ExpressionType,
}

impl ExpressionInfo {
	/// Type of the values the expression yields.
	pub fn return_type(&self) -> TypeHandle {
		self.return_type
	}

	pub fn expression_type(&self) -> ExpressionType {
		self.expression_type
	}
}
