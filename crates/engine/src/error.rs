//! Error types for the engine lifecycle and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use quill_registry::RegistryError;
use thiserror::Error;

use crate::state::State;

/// Errors raised by [`crate::Engine`] operations.
#[derive(Debug, Error)]
pub enum EngineError {
	/// A registry operation failed.
	#[error(transparent)]
	Registry(#[from] RegistryError),

	/// Another addon already uses this name.
	#[error("an addon named '{name}' is already registered")]
	DuplicateAddon { name: Arc<str> },

	/// Addon registration attempted outside an accepting state.
	#[error("registration is closed (state: {state})")]
	RegistrationClosed { state: State },

	/// `update_state` to a state that is not strictly later.
	#[error("cannot move from {from} to {to}")]
	InvalidTransition { from: State, to: State },

	/// A module of `addon` failed; nothing it staged was committed.
	#[error("module of addon '{addon}' failed: {source}")]
	Module {
		addon: Arc<str>,
		#[source]
		source: RegistryError,
	},

	/// Configuration text is not valid TOML for [`crate::EngineConfig`].
	#[error("config parse error: {0}")]
	Config(#[from] toml::de::Error),

	/// Reading a configuration file failed.
	#[error("I/O error reading {path}: {error}")]
	ConfigIo {
		path: PathBuf,
		error: std::io::Error,
	},
}

/// Result type for engine operations.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
