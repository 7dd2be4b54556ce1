use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::element::SyntaxElement;
use crate::info::ExpressionType;
use crate::key::{CONDITION, EFFECT, EVENT, EXPRESSION, STATEMENT, STRUCTURE};
use crate::origin::SyntaxOrigin;
use crate::priority::Priority;

#[derive(Default)]
struct Probe;
impl SyntaxElement for Probe {}

fn effect(pattern: &str) -> SyntaxInfo {
	SyntaxInfo::builder::<Probe>()
		.origin(SyntaxOrigin::addon("Test"))
		.add_pattern(pattern)
		.build()
		.unwrap()
}

fn ranked(pattern: &str, rank: u32) -> SyntaxInfo {
	SyntaxInfo::builder::<Probe>()
		.add_pattern(pattern)
		.priority(Priority::new(rank))
		.build()
		.unwrap()
}

fn event(name: &str, pattern: &str) -> SyntaxInfo {
	SyntaxInfo::builder::<Probe>()
		.add_pattern(pattern)
		.event(name)
		.build()
		.unwrap()
}

fn expression(expression_type: ExpressionType, rank: u32) -> SyntaxInfo {
	SyntaxInfo::builder::<Probe>()
		.add_pattern("probe")
		.priority(Priority::new(rank))
		.expression::<String>()
		.expression_type(expression_type)
		.build()
		.unwrap()
}

fn first_patterns(syntaxes: &Syntaxes) -> Vec<String> {
	syntaxes.iter().map(|info| info.patterns()[0].clone()).collect()
}

/// A child registration is visible under the child and its parent.
#[test]
fn test_child_registration_reaches_parent() {
	let registry = SyntaxRegistry::new();
	let info = Arc::new(effect("say %string%"));
	registry.register(&EFFECT, info.clone()).unwrap();

	let effects = registry.syntaxes(&EFFECT);
	let statements = registry.syntaxes(&STATEMENT);
	assert_eq!(effects.len(), 1);
	assert_eq!(statements.len(), 1);
	assert!(Arc::ptr_eq(&effects[0], &info));
	assert!(Arc::ptr_eq(&statements[0], &info));
	assert!(registry.syntaxes(&CONDITION).is_empty());
	assert_eq!(registry.keys(), ["effect", "statement"]);
}

#[test]
fn test_unknown_key_is_empty() {
	let registry = SyntaxRegistry::new();
	assert!(registry.syntaxes(&EXPRESSION).is_empty());
	assert!(registry.keys().is_empty());
}

#[test]
fn test_kind_mismatch_rejected() {
	let registry = SyntaxRegistry::new();
	let err = registry.register(&EXPRESSION, effect("say")).unwrap_err();
	assert_eq!(
		err,
		RegistryError::KindMismatch {
			key: "expression",
			expected: "expression",
			found: "syntax",
		}
	);
	assert!(registry.keys().is_empty());
}

/// Events are accepted by structure keys directly as well.
#[test]
fn test_events_are_structures() {
	let registry = SyntaxRegistry::new();
	registry.register(&STRUCTURE, event("*load", "load")).unwrap();
	assert_eq!(registry.syntaxes(&STRUCTURE).len(), 1);
	assert!(registry.syntaxes(&EVENT).is_empty());
}

/// A failure further up the chain undoes the writes below it.
#[test]
fn test_failed_chain_is_rolled_back() {
	let registry = SyntaxRegistry::new();
	let info = Arc::new(event("*join", "%player%"));
	registry.register(&STRUCTURE, info.clone()).unwrap();

	let err = registry.register(&EVENT, info.clone()).unwrap_err();
	assert_eq!(
		err,
		RegistryError::DuplicateSyntax {
			key: "structure",
			id: info.id(),
		}
	);
	assert!(registry.syntaxes(&EVENT).is_empty());
	assert_eq!(registry.syntaxes(&STRUCTURE).len(), 1);
}

#[test]
fn test_close_rejects_writes_and_freezes_reads() {
	let registry = SyntaxRegistry::new();
	registry.register(&EFFECT, effect("a")).unwrap();
	registry.close_registration().unwrap();

	assert!(registry.is_closed());
	assert_eq!(
		registry.register(&EFFECT, effect("b")).unwrap_err(),
		RegistryError::RegistrationClosed { key: Some("effect") }
	);
	// Keys without a register are rejected too.
	assert_eq!(
		registry.register(&EXPRESSION, expression(ExpressionType::Simple, 0)).unwrap_err(),
		RegistryError::RegistrationClosed { key: Some("expression") }
	);
	assert_eq!(
		registry.close_registration().unwrap_err(),
		RegistryError::RegistrationClosed { key: None }
	);

	let first = registry.syntaxes(&STATEMENT);
	let second = registry.syntaxes(&STATEMENT);
	assert!(first.ptr_eq(&second));
	assert_eq!(first_patterns(&first), ["a"]);
}

#[test]
fn test_batch_commits_everything() {
	let registry = SyntaxRegistry::new();
	let mut batch = RegistrationBatch::new();
	batch.push(&EFFECT, effect("a")).unwrap();
	batch.push(&CONDITION, effect("b")).unwrap();
	batch.push(&EVENT, event("*join", "%player%")).unwrap();
	assert_eq!(batch.staged(&EFFECT).count(), 1);

	assert_eq!(registry.commit(batch).unwrap(), 3);
	assert_eq!(registry.syntaxes(&STATEMENT).len(), 2);
	assert_eq!(registry.syntaxes(&STRUCTURE).len(), 1);
}

/// A duplicate late in the batch leaves no trace of earlier entries.
#[test]
fn test_batch_is_all_or_nothing() {
	let registry = SyntaxRegistry::new();
	let shared = Arc::new(effect("shared"));
	let mut batch = RegistrationBatch::new();
	batch.push(&EFFECT, effect("a")).unwrap();
	batch.push(&EFFECT, shared.clone()).unwrap();
	batch.push(&CONDITION, shared.clone()).unwrap();

	let err = registry.commit(batch).unwrap_err();
	assert_eq!(
		err,
		RegistryError::DuplicateSyntax {
			key: "statement",
			id: shared.id(),
		}
	);
	assert!(registry.syntaxes(&EFFECT).is_empty());
	assert!(registry.syntaxes(&CONDITION).is_empty());
	assert!(registry.syntaxes(&STATEMENT).is_empty());
}

#[test]
fn test_batch_checks_kinds_on_push() {
	let mut batch = RegistrationBatch::new();
	let err = batch.push(&EVENT, effect("a")).unwrap_err();
	assert!(matches!(err, RegistryError::KindMismatch { key: "event", .. }));
	assert!(batch.is_empty());
}

#[test]
fn test_commit_after_close_fails() {
	let registry = SyntaxRegistry::new();
	registry.close_registration().unwrap();
	let mut batch = RegistrationBatch::new();
	batch.push(&EFFECT, effect("a")).unwrap();
	assert_eq!(
		registry.commit(batch).unwrap_err(),
		RegistryError::RegistrationClosed { key: None }
	);
}

#[test]
fn test_unmodifiable_view_reads_but_never_writes() {
	let registry = Arc::new(SyntaxRegistry::new());
	let view = registry.unmodifiable_view();
	registry.register(&EFFECT, effect("a")).unwrap();

	assert_eq!(view.syntaxes(&EFFECT).len(), 1);
	assert_eq!(
		view.register(&EFFECT, effect("b")).unwrap_err(),
		RegistryError::RegistrationClosed { key: Some("effect") }
	);
	assert_eq!(registry.syntaxes(&EFFECT).len(), 1);
	assert!(!view.is_closed());
}

/// Default priorities keep registration order when descriptors are built as
/// they are registered.
#[test]
fn test_default_priorities_keep_registration_order() {
	let registry = SyntaxRegistry::new();
	for pattern in ["one", "two", "three", "four"] {
		registry.register(&EFFECT, effect(pattern)).unwrap();
	}
	assert_eq!(
		first_patterns(&registry.syntaxes(&EFFECT)),
		["one", "two", "three", "four"]
	);
}

proptest! {
	/// Every call into a child shows up once in the child and each ancestor.
	#[test]
	fn prop_child_registrations_fan_out(count in 1usize..24) {
		let registry = SyntaxRegistry::new();
		for i in 0..count {
			registry.register(&EVENT, event(&format!("event {i}"), "%player%")).unwrap();
		}
		let events = registry.syntaxes(&EVENT);
		let structures = registry.syntaxes(&STRUCTURE);
		prop_assert_eq!(events.len(), count);
		prop_assert_eq!(structures.len(), count);
		for info in &events {
			prop_assert_eq!(structures.iter().filter(|other| other.id() == info.id()).count(), 1);
		}
	}

	/// Explicit ranks sort ascending whatever the insertion order.
	#[test]
	fn prop_explicit_priorities_sort(ranks in prop::collection::vec(0u32..1_000, 1..40)) {
		let registry = SyntaxRegistry::new();
		for (i, rank) in ranks.iter().enumerate() {
			registry.register(&EFFECT, ranked(&format!("p{i}"), *rank)).unwrap();
		}
		let listed: Vec<u32> = registry.syntaxes(&EFFECT).iter().map(|info| info.priority().rank()).collect();
		let mut expected = ranks.clone();
		expected.sort_unstable();
		prop_assert_eq!(listed, expected);
	}

	/// Expression category dominates the base rank.
	#[test]
	fn prop_expression_category_dominates(
		entries in prop::collection::vec((0usize..ExpressionType::ALL.len(), 0u32..=crate::priority::MAX_PACKED_RANK), 1..40)
	) {
		let registry = SyntaxRegistry::new();
		for (ordinal, rank) in &entries {
			registry.register(&EXPRESSION, expression(ExpressionType::ALL[*ordinal], *rank)).unwrap();
		}
		let listed: Vec<(u8, u32)> = registry
			.syntaxes(&EXPRESSION)
			.iter()
			.map(|info| (info.priority().category(), info.priority().rank()))
			.collect();
		let mut expected: Vec<(u8, u32)> = entries.iter().map(|(o, r)| (*o as u8, *r)).collect();
		expected.sort_unstable();
		prop_assert_eq!(&listed, &expected);

		let packed: Vec<u32> = registry
			.syntaxes(&EXPRESSION)
			.iter()
			.filter_map(|info| info.priority().packed())
			.collect();
		prop_assert!(packed.windows(2).all(|pair| pair[0] <= pair[1]));
	}
}
