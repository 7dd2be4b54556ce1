//! Registration lifecycle and addon loading on top of `quill-registry`.
//!
//! An [`Engine`] owns one [`quill_registry::SyntaxRegistry`]. Addons load
//! through [`Engine::register_addon`] while the [`State`] accepts
//! registration; [`Engine::update_state`] to [`State::ClosedRegistration`]
//! freezes the registry for good.

mod addon;
mod config;
mod engine;
mod error;
mod listener;
mod state;
mod submitted;

pub use addon::{Addon, AddonModule, ModuleFn, ModuleRegistry};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use listener::StateListener;
pub use state::State;
pub use submitted::{SubmittedAddon, submitted_addons};

#[doc(hidden)]
pub use inventory;
