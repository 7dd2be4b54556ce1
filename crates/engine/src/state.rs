/// Registration lifecycle of an [`crate::Engine`].
///
/// States only move forward, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
	/// Initial state; the engine's own modules load here.
	Registration,
	/// Addons may load.
	AddonRegistration,
	/// No further writes; derived lookup tables are built here.
	EndedRegistration,
	/// Registries are frozen for the rest of the process.
	ClosedRegistration,
}

impl State {
	/// All states in transition order.
	pub const ALL: [State; 4] = [
		Self::Registration,
		Self::AddonRegistration,
		Self::EndedRegistration,
		Self::ClosedRegistration,
	];

	/// Whether addons and modules may still register syntax.
	pub const fn accepts_registration(self) -> bool {
		matches!(self, Self::Registration | Self::AddonRegistration)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Registration => "registration",
			Self::AddonRegistration => "addon registration",
			Self::EndedRegistration => "ended registration",
			Self::ClosedRegistration => "closed registration",
		}
	}

	/// States strictly after `self`, up to and including `to`.
	pub(crate) fn path_to(self, to: State) -> impl Iterator<Item = State> {
		Self::ALL.into_iter().filter(move |state| *state > self && *state <= to)
	}
}

impl core::fmt::Display for State {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.as_str())
	}
}
