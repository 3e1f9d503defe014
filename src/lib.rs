//! Linear-time approximate spherical Gaussian (LTASG) cube-map prefilter.
//!
//! Generates a pre-filtered mipmapped radiance environment map from a
//! six-face cube-map input: each mip level is the input convolved with a
//! spherical Gaussian whose sigma grows with the level, for approximating
//! glossy (Blinn-Phong) reflections in real-time shading.
//!
//! Pixel-format coercion, inter-level downsampling, and image decoding are
//! the host's job; see [`traits`] for the three seams this crate consumes.

pub mod convolve;
pub mod error;
pub mod face;
pub mod kernel;
pub mod orchestrator;
pub mod pipeline;
pub mod plan;
pub mod topology;
pub mod traits;

pub use error::{Error, Result};
pub use face::{Face, FaceImage, FaceSet};
pub use pipeline::{Level, Prefilter};
pub use plan::{Plan, PlanLevel, PrefilterOptions};
pub use traits::{ImageCoerceIn, ImageCoerceOut, Resample};
