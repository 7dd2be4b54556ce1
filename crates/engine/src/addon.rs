//! Addons, their load-time modules and the staging registry modules write to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_registry::{
	Key, RegistrationBatch, RegistryError, SyntaxInfo, SyntaxKind, SyntaxOrigin, SyntaxRegistry,
	Syntaxes,
};

/// A named producer of syntax. Names are unique per engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Addon {
	name: Arc<str>,
	data_file_directory: Option<PathBuf>,
	language_file_directory: Option<PathBuf>,
}

impl Addon {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self {
			name: name.into(),
			data_file_directory: None,
			language_file_directory: None,
		}
	}

	pub fn with_data_file_directory(mut self, dir: impl Into<PathBuf>) -> Self {
		self.data_file_directory = Some(dir.into());
		self
	}

	pub fn with_language_file_directory(mut self, dir: impl Into<PathBuf>) -> Self {
		self.language_file_directory = Some(dir.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn shared_name(&self) -> Arc<str> {
		Arc::clone(&self.name)
	}

	/// Where the addon keeps its data files. Opaque to the engine.
	pub fn data_file_directory(&self) -> Option<&Path> {
		self.data_file_directory.as_deref()
	}

	/// Where the addon keeps its language files. Opaque to the engine.
	pub fn language_file_directory(&self) -> Option<&Path> {
		self.language_file_directory.as_deref()
	}

	/// Origin to stamp on descriptors this addon contributes.
	pub fn origin(&self) -> SyntaxOrigin {
		SyntaxOrigin::Addon(self.shared_name())
	}
}

/// One load-time callback of an addon.
pub trait AddonModule: Send + Sync {
	/// Pushes the module's descriptors into `registry`.
	fn load(&self, addon: &Addon, registry: &mut ModuleRegistry<'_>) -> Result<(), RegistryError>;
}

impl<F> AddonModule for F
where
	F: Fn(&Addon, &mut ModuleRegistry<'_>) -> Result<(), RegistryError> + Send + Sync,
{
	fn load(&self, addon: &Addon, registry: &mut ModuleRegistry<'_>) -> Result<(), RegistryError> {
		self(addon, registry)
	}
}

/// Plain function module, usable in statics.
pub type ModuleFn = fn(&Addon, &mut ModuleRegistry<'_>) -> Result<(), RegistryError>;

/// Registry handle given to modules while an addon loads.
///
/// Writes are staged and only reach the shared registry once every module of
/// the addon has returned `Ok`. Reads see the shared registry as committed
/// so far.
pub struct ModuleRegistry<'a> {
	shared: &'a SyntaxRegistry,
	batch: RegistrationBatch,
}

impl<'a> ModuleRegistry<'a> {
	pub(crate) fn new(shared: &'a SyntaxRegistry) -> Self {
		Self {
			shared,
			batch: RegistrationBatch::new(),
		}
	}

	/// Stages `info` under `key` and, on commit, its ancestors.
	///
	/// # Errors
	///
	/// [`RegistryError::RegistrationClosed`] if the shared registry is already
	/// closed, or [`RegistryError::KindMismatch`] for a payload the key does
	/// not accept.
	pub fn register<K: SyntaxKind>(&mut self, key: &Key<K>, info: impl Into<Arc<SyntaxInfo>>) -> Result<(), RegistryError> {
		if self.shared.is_closed() {
			return Err(RegistryError::RegistrationClosed { key: Some(key.name()) });
		}
		self.batch.push(key, info)
	}

	/// Committed descriptors for `key`; excludes anything staged here.
	pub fn syntaxes<K>(&self, key: &Key<K>) -> Syntaxes {
		self.shared.syntaxes(key)
	}

	/// Descriptors staged by this load for exactly `key`.
	pub fn staged<K>(&self, key: &Key<K>) -> impl Iterator<Item = &Arc<SyntaxInfo>> {
		self.batch.staged(key)
	}

	pub(crate) fn into_batch(self) -> RegistrationBatch {
		self.batch
	}
}
