//! Event descriptor data and event-pattern canonicalization.

use serde::Serialize;

use crate::element::TypeHandle;

/// Characters dropped when deriving an event id from its name.
const ID_STRIPPED: &[char] = &['#', '\'', '"', '<', '>', '/', '&', '*'];

/// Host listener priorities an event may be declared with, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
	Lowest,
	Low,
	Normal,
	High,
	Highest,
	Monitor,
}

impl EventPriority {
	pub const ALL: [EventPriority; 6] = [
		Self::Lowest,
		Self::Low,
		Self::Normal,
		Self::High,
		Self::Highest,
		Self::Monitor,
	];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Lowest => "lowest",
			Self::Low => "low",
			Self::Normal => "normal",
			Self::High => "high",
			Self::Highest => "highest",
			Self::Monitor => "monitor",
		}
	}

	/// Parses a priority name as written in scripts.
	pub fn parse(name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|priority| priority.as_str().eq_ignore_ascii_case(name))
	}
}

/// Marks every type placeholder in `pattern` as nullable.
///
/// Each unescaped `%` that opens a type span gets a `-` inserted after it,
/// unless one of the two following characters already is a `-`. A backslash
/// copies itself and the next character verbatim without toggling the span.
///
/// Callers apply it exactly once per raw pattern, before the `[on]` prefix
/// and priority clause are attached by [`event_pattern`].
pub fn fix_pattern(pattern: &str) -> String {
	let chars: Vec<char> = pattern.chars().collect();
	let mut fixed = String::with_capacity(pattern.len() + 4);

	let mut in_type = false;
	let mut i = 0;
	while i < chars.len() {
		let c = chars[i];
		fixed.push(c);

		if c == '%' {
			in_type = !in_type;
			if in_type && i + 2 < chars.len() && chars[i + 1] != '-' && chars[i + 2] != '-' {
				fixed.push('-');
			}
		} else if c == '\\' && i + 1 < chars.len() {
			fixed.push(chars[i + 1]);
			i += 1;
		}
		i += 1;
	}
	fixed
}

/// Stored form of a raw event pattern: `[on] <fixed> [with priority (...)]`.
pub fn event_pattern(pattern: &str) -> String {
	let priorities: Vec<&str> = EventPriority::ALL.iter().map(|p| p.as_str()).collect();
	format!("[on] {} [with priority ({})]", fix_pattern(pattern), priorities.join("|"))
}

/// Display name for an event: a leading `*` means "use verbatim", otherwise
/// the name is prefixed with `On `.
pub(crate) fn display_name(name: &str) -> String {
	match name.strip_prefix('*') {
		Some(verbatim) => verbatim.to_string(),
		None => format!("On {name}"),
	}
}

/// Documentation-friendly id: lower-cased, punctuation stripped, whitespace
/// runs collapsed to `_`.
pub(crate) fn event_id(name: &str) -> String {
	let name = name.strip_prefix('*').unwrap_or(name);
	let mut id = String::with_capacity(name.len());
	let mut in_space = false;
	for c in name.to_lowercase().chars() {
		if ID_STRIPPED.contains(&c) {
			continue;
		}
		if c.is_whitespace() {
			if !in_space {
				id.push('_');
				in_space = true;
			}
			continue;
		}
		in_space = false;
		id.push(c);
	}
	id
}

/// Documentation bundle attached to event descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventDocs {
	pub name: String,
	pub id: String,
	pub since: Option<String>,
	pub documentation_id: Option<String>,
	pub description: Vec<String>,
	pub examples: Vec<String>,
	pub keywords: Vec<String>,
	pub required_plugins: Vec<String>,
}

/// Event-specific descriptor data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInfo {
	pub(crate) docs: EventDocs,
	pub(crate) events: Vec<TypeHandle>,
}

impl EventInfo {
	pub fn name(&self) -> &str {
		&self.docs.name
	}

	/// Id derived from the name at construction; stable for the descriptor's
	/// lifetime.
	pub fn id(&self) -> &str {
		&self.docs.id
	}

	pub fn docs(&self) -> &EventDocs {
		&self.docs
	}

	/// Host event types the event listens for.
	pub fn events(&self) -> &[TypeHandle] {
		&self.events
	}
}
