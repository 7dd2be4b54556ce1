//! Descriptor builders.
//!
//! [`SyntaxInfoBuilder`] collects the fields shared by every category and
//! either builds a plain descriptor or turns into one of the category
//! builders. All builders validate on `build()`; nothing is checked earlier.

use std::sync::Arc;

use super::event::{EventDocs, EventInfo, display_name, event_id, event_pattern};
use super::expression::{ExpressionInfo, ExpressionType};
use super::structure::{EntryValidator, StructureInfo};
use super::{Factory, SyntaxId, SyntaxInfo, SyntaxPayload};
use crate::element::TypeHandle;
use crate::error::{RegistryError, Result};
use crate::origin::SyntaxOrigin;
use crate::priority::Priority;

struct Common {
	element: TypeHandle,
	factory: Factory,
	custom_factory: bool,
	origin: SyntaxOrigin,
	patterns: Vec<String>,
	priority: Option<Priority>,
}

impl Common {
	fn finish(self, payload: SyntaxPayload) -> Result<SyntaxInfo> {
		if self.patterns.is_empty() {
			return Err(RegistryError::EmptyPatterns {
				type_name: self.element.name(),
			});
		}

		// Default ranks are drawn at construction so they follow build order.
		let mut priority = self.priority.unwrap_or_else(Priority::next);
		if let SyntaxPayload::Expression(info) = &payload {
			priority = priority.in_category(info.expression_type.ordinal());
		}

		Ok(SyntaxInfo {
			id: SyntaxId::next(),
			origin: self.origin,
			element: self.element,
			factory: self.factory,
			custom_factory: self.custom_factory,
			patterns: Arc::from(self.patterns),
			priority,
			payload,
		})
	}
}

macro_rules! common_setters {
	() => {
		/// Records which producer contributed the descriptor.
		pub fn origin(mut self, origin: SyntaxOrigin) -> Self {
			self.common.origin = origin;
			self
		}

		/// Appends one pattern; order is preserved.
		pub fn add_pattern(mut self, pattern: impl Into<String>) -> Self {
			self.common.patterns.push(pattern.into());
			self
		}

		pub fn add_patterns<I, S>(mut self, patterns: I) -> Self
		where
			I: IntoIterator<Item = S>,
			S: Into<String>,
		{
			self.common
				.patterns
				.extend(patterns.into_iter().map(Into::into));
			self
		}

		/// Explicit priority. Without one, a default rank is drawn at build.
		pub fn priority(mut self, priority: Priority) -> Self {
			self.common.priority = Some(priority);
			self
		}
	};
}

/// Builder for plain descriptors and entry point for category builders.
pub struct SyntaxInfoBuilder {
	common: Common,
}

impl SyntaxInfoBuilder {
	pub(super) fn new(element: TypeHandle, factory: Factory, custom_factory: bool) -> Self {
		Self {
			common: Common {
				element,
				factory,
				custom_factory,
				origin: SyntaxOrigin::Unknown,
				patterns: Vec::new(),
				priority: None,
			},
		}
	}

	common_setters!();

	/// Continues as an expression yielding values of type `R`.
	pub fn expression<R: ?Sized + 'static>(self) -> ExpressionBuilder {
		ExpressionBuilder {
			common: self.common,
			return_type: TypeHandle::of::<R>(),
			expression_type: None,
		}
	}

	/// Continues as a structure.
	pub fn structure(self) -> StructureBuilder {
		StructureBuilder {
			common: self.common,
			entry_validator: None,
		}
	}

	/// Continues as an event called `name`. A leading `*` keeps the name
	/// verbatim; otherwise it is displayed as `On <name>`.
	pub fn event(self, name: impl Into<String>) -> EventBuilder {
		EventBuilder {
			common: self.common,
			name: name.into(),
			since: None,
			documentation_id: None,
			description: Vec::new(),
			examples: Vec::new(),
			keywords: Vec::new(),
			required_plugins: Vec::new(),
			events: Vec::new(),
		}
	}

	/// Builds a plain descriptor (statement, effect, condition, section).
	pub fn build(self) -> Result<SyntaxInfo> {
		self.common.finish(SyntaxPayload::Plain)
	}
}

/// Builder for expression descriptors.
pub struct ExpressionBuilder {
	common: Common,
	return_type: TypeHandle,
	expression_type: Option<ExpressionType>,
}

impl ExpressionBuilder {
	common_setters!();

	/// Sets the category; required before `build`.
	pub fn expression_type(mut self, expression_type: ExpressionType) -> Self {
		self.expression_type = Some(expression_type);
		self
	}

	pub fn build(self) -> Result<SyntaxInfo> {
		let type_name = self.common.element.name();
		if !self.return_type.is_value_type() {
			return Err(RegistryError::InvalidReturnType {
				type_name: self.return_type.name(),
			});
		}
		let Some(expression_type) = self.expression_type else {
			return Err(RegistryError::MissingField {
				kind: "expression",
				type_name,
				field: "expression_type",
			});
		};
		self.common.finish(SyntaxPayload::Expression(ExpressionInfo {
			return_type: self.return_type,
			expression_type,
		}))
	}
}

/// Builder for structure descriptors.
pub struct StructureBuilder {
	common: Common,
	entry_validator: Option<Arc<dyn EntryValidator>>,
}

impl StructureBuilder {
	common_setters!();

	pub fn entry_validator(mut self, validator: Arc<dyn EntryValidator>) -> Self {
		self.entry_validator = Some(validator);
		self
	}

	pub fn build(self) -> Result<SyntaxInfo> {
		self.common.finish(SyntaxPayload::Structure(StructureInfo {
			entry_validator: self.entry_validator,
		}))
	}
}

/// Builder for event descriptors.
///
/// Patterns are canonicalized with [`event_pattern`] at build time, so pass
/// them raw. Events never carry an entry validator.
pub struct EventBuilder {
	common: Common,
	name: String,
	since: Option<String>,
	documentation_id: Option<String>,
	description: Vec<String>,
	examples: Vec<String>,
	keywords: Vec<String>,
	required_plugins: Vec<String>,
	events: Vec<TypeHandle>,
}

impl EventBuilder {
	common_setters!();

	pub fn since(mut self, since: impl Into<String>) -> Self {
		self.since = Some(since.into());
		self
	}

	pub fn documentation_id(mut self, id: impl Into<String>) -> Self {
		self.documentation_id = Some(id.into());
		self
	}

	pub fn add_description(mut self, line: impl Into<String>) -> Self {
		self.description.push(line.into());
		self
	}

	pub fn add_descriptions<I, S>(mut self, lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.description.extend(lines.into_iter().map(Into::into));
		self
	}

	pub fn add_example(mut self, example: impl Into<String>) -> Self {
		self.examples.push(example.into());
		self
	}

	pub fn add_examples<I, S>(mut self, examples: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.examples.extend(examples.into_iter().map(Into::into));
		self
	}

	pub fn add_keyword(mut self, keyword: impl Into<String>) -> Self {
		self.keywords.push(keyword.into());
		self
	}

	pub fn add_keywords<I, S>(mut self, keywords: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.keywords.extend(keywords.into_iter().map(Into::into));
		self
	}

	/// Host plugin required for the event to work.
	pub fn add_required_plugin(mut self, plugin: impl Into<String>) -> Self {
		self.required_plugins.push(plugin.into());
		self
	}

	pub fn add_required_plugins<I, S>(mut self, plugins: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.required_plugins
			.extend(plugins.into_iter().map(Into::into));
		self
	}

	/// Adds a host event type the event listens for.
	pub fn add_event<T: ?Sized + 'static>(mut self) -> Self {
		self.events.push(TypeHandle::of::<T>());
		self
	}

	pub fn add_event_type(mut self, event: TypeHandle) -> Self {
		self.events.push(event);
		self
	}

	pub fn build(mut self) -> Result<SyntaxInfo> {
		self.common.patterns = self
			.common
			.patterns
			.iter()
			.map(|pattern| event_pattern(pattern))
			.collect();
		let docs = EventDocs {
			name: display_name(&self.name),
			id: event_id(&self.name),
			since: self.since,
			documentation_id: self.documentation_id,
			description: self.description,
			examples: self.examples,
			keywords: self.keywords,
			required_plugins: self.required_plugins,
		};
		self.common.finish(SyntaxPayload::Event(EventInfo {
			docs,
			events: self.events,
		}))
	}
}
