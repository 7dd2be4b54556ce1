//! Ordering ranks for syntax descriptors.
//!
//! # Role
//!
//! A [`Priority`] decides where a descriptor sits inside its register. Smaller
//! values come first and are tried first by the matcher.
//!
//! # Ordering
//!
//! Priorities compare lexicographically on `(category, rank)`. Plain
//! descriptors live in category `0`; expression descriptors use the ordinal of
//! their [`crate::ExpressionType`], so category dominates and the rank only
//! breaks ties within one category.
//!
//! # Packed encoding
//!
//! Older consumers expect a single integer of the form
//! `rank | category << 24`. [`Priority::packed`] produces it, which only works
//! while `rank <= MAX_PACKED_RANK` (fewer than 2^24 ranks) and the category fits
//! in 8 bits (fewer than 256 categories). Both are hard limits of the packed
//! form; the tuple ordering itself has no such ceiling.

use std::sync::atomic::{AtomicU32, Ordering};

/// Largest rank representable in the packed encoding.
pub const MAX_PACKED_RANK: u32 = (1 << 24) - 1;

/// Process-wide source of default ranks.
static NEXT_RANK: AtomicU32 = AtomicU32::new(0);

/// Comparable rank of a descriptor within its register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
	category: u8,
	rank: u32,
}

impl Priority {
	/// Creates an explicit priority. Smaller ranks take precedence.
	pub const fn new(rank: u32) -> Self {
		Self { category: 0, rank }
	}

	/// Draws the next default priority from the process-wide counter.
	///
	/// Successive calls return strictly increasing ranks, which keeps
	/// descriptors without an explicit priority in construction order.
	pub fn next() -> Self {
		Self::new(NEXT_RANK.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns this priority moved into `category`, keeping the rank.
	pub const fn in_category(self, category: u8) -> Self {
		Self {
			category,
			rank: self.rank,
		}
	}

	/// Rank within the category.
	pub const fn rank(self) -> u32 {
		self.rank
	}

	/// Primary sort key.
	pub const fn category(self) -> u8 {
		self.category
	}

	/// Returns the `rank | category << 24` encoding, or `None` when the rank
	/// does not fit in 24 bits.
	pub const fn packed(self) -> Option<u32> {
		if self.rank > MAX_PACKED_RANK {
			return None;
		}
		Some(self.rank | (self.category as u32) << 24)
	}
}

impl core::fmt::Display for Priority {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		if self.category == 0 {
			write!(f, "{}", self.rank)
		} else {
			write!(f, "{}:{}", self.category, self.rank)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_priorities_increase() {
		let a = Priority::next();
		let b = Priority::next();
		let c = Priority::next();
		assert!(a < b && b < c);
	}

	#[test]
	fn category_dominates_rank() {
		let low_category = Priority::new(5_000_000).in_category(1);
		let high_category = Priority::new(0).in_category(2);
		assert!(low_category < high_category);
		assert!(Priority::new(3).in_category(1) < Priority::new(4).in_category(1));
	}

	#[test]
	fn packed_encoding_matches_legacy_layout() {
		assert_eq!(Priority::new(7).in_category(3).packed(), Some(7 | 3 << 24));
		assert_eq!(Priority::new(MAX_PACKED_RANK).packed(), Some(MAX_PACKED_RANK));
		assert_eq!(Priority::new(MAX_PACKED_RANK + 1).packed(), None);
	}

	#[test]
	fn packed_order_agrees_with_tuple_order_within_bounds() {
		let a = Priority::new(MAX_PACKED_RANK).in_category(0);
		let b = Priority::new(0).in_category(1);
		assert!(a < b);
		assert!(a.packed() < b.packed());
	}
}
