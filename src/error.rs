use std::fmt::{Debug, Display};

/// Everything that can go wrong constructing a [`crate::plan::Planner`] or
/// running [`crate::pipeline::Prefilter::process`].
///
/// Grounded on `rad_graph::Error` (hand-rolled `Display`/`Debug`, no
/// `thiserror`): the teacher workspace never pulls in an error-derive crate
/// for its own first-party error types.
#[derive(Clone)]
pub enum Error {
	/// Fewer than six faces were supplied where a full face set is required.
	InvalidArity { found: usize },
	/// A face's backing storage is smaller than `4 * n * n`, or `n` exceeds
	/// the hard 32768 ceiling.
	InvalidSize { message: String },
	/// A format other than premultiplied-alpha float reached a boundary that
	/// requires it.
	InvalidFormat { message: String },
	/// An even-length kernel, non-positive scale, or a kernel too large for
	/// the face it would run on.
	InvalidKernel { message: String },
	/// The `mip_level_sigmas` sequence is not monotonically non-decreasing.
	NonMonotonicSigmas { level: usize, sigma: f64, previous: f64 },
	/// One of the three external collaborators (§6) failed; the core just
	/// forwards the message, since it has no way to interpret a host error.
	Collaborator { message: String },
}

impl Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::InvalidArity { found } => write!(f, "expected 6 cube faces, found {found}"),
			Error::InvalidSize { message } => write!(f, "invalid face size: {message}"),
			Error::InvalidFormat { message } => write!(f, "invalid pixel format: {message}"),
			Error::InvalidKernel { message } => write!(f, "invalid kernel: {message}"),
			Error::NonMonotonicSigmas { level, sigma, previous } => write!(
				f,
				"mip_level_sigmas must be non-decreasing: level {level} has sigma {sigma} < previous {previous}"
			),
			Error::Collaborator { message } => write!(f, "external collaborator failed: {message}"),
		}
	}
}

impl Debug for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result { <Self as Display>::fmt(self, f) }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
