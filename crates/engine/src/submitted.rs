use crate::addon::{Addon, ModuleFn};

/// An addon declared at compile time with `inventory::submit!`.
///
/// ```ignore
/// inventory::submit! {
///     SubmittedAddon::new("Extras", &[extras_module]).priority(10)
/// }
/// ```
pub struct SubmittedAddon {
	pub name: &'static str,
	/// Lower loads earlier; ties are broken by name.
	pub priority: i16,
	pub data_file_directory: Option<&'static str>,
	pub language_file_directory: Option<&'static str>,
	pub modules: &'static [ModuleFn],
}

inventory::collect!(SubmittedAddon);

impl SubmittedAddon {
	pub const fn new(name: &'static str, modules: &'static [ModuleFn]) -> Self {
		Self {
			name,
			priority: 0,
			data_file_directory: None,
			language_file_directory: None,
			modules,
		}
	}

	pub const fn priority(mut self, priority: i16) -> Self {
		self.priority = priority;
		self
	}

	pub const fn data_file_directory(mut self, dir: &'static str) -> Self {
		self.data_file_directory = Some(dir);
		self
	}

	pub const fn language_file_directory(mut self, dir: &'static str) -> Self {
		self.language_file_directory = Some(dir);
		self
	}

	/// Runtime addon handle for this declaration.
	pub fn addon(&self) -> Addon {
		let mut addon = Addon::new(self.name);
		if let Some(dir) = self.data_file_directory {
			addon = addon.with_data_file_directory(dir);
		}
		if let Some(dir) = self.language_file_directory {
			addon = addon.with_language_file_directory(dir);
		}
		addon
	}
}

/// All submitted addons in load order.
pub fn submitted_addons() -> Vec<&'static SubmittedAddon> {
	let mut addons: Vec<&'static SubmittedAddon> = inventory::iter::<SubmittedAddon>.into_iter().collect();
	addons.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(b.name)));
	addons
}
