//! Plan builder (spec.md §4.5): turns a per-level sigma sequence into a
//! pass descriptor (kernel, scale, pass count) for every mip level.

use crate::error::{Error, Result};
use crate::kernel::build_kernel;

/// User-visible options (spec.md §6).
#[derive(Clone, Debug)]
pub struct PrefilterOptions {
	/// Side length of the level-0 face, in pixels. Must be `<= 32768`.
	pub image_size: u32,
	/// Target sigma per mip level, unitless relative to a full face side.
	/// Must be non-decreasing.
	pub mip_level_sigmas: Vec<f64>,
	/// Floor on passes-per-level, regardless of how little variance a level
	/// needs to shed.
	pub min_num_passes: u32,
	/// `kappa`: taps per pixel. Larger means denser sampling.
	pub kernel_resolution: f64,
	/// `omega`: ratio of kernel half-extent to per-pass sigma.
	pub kernel_width: f64,
}

impl Default for PrefilterOptions {
	fn default() -> Self {
		Self {
			image_size: 0,
			mip_level_sigmas: Vec::new(),
			min_num_passes: 2,
			kernel_resolution: 2.0,
			kernel_width: 3.0,
		}
	}
}

/// Derived pass descriptor for one mip level (spec.md §3).
#[derive(Clone)]
pub struct PlanLevel {
	pub size: u32,
	pub kernel: Vec<f32>,
	pub scale: f64,
	pub num_passes: u32,
}

/// Immutable, read-only after construction (spec.md §3 Lifecycle).
pub struct Plan {
	pub levels: Vec<PlanLevel>,
}

impl Plan {
	pub fn build(opts: &PrefilterOptions) -> Result<Plan> {
		if opts.image_size == 0 || opts.image_size > 32768 {
			return Err(Error::InvalidSize { message: format!("image_size {} out of range (1..=32768)", opts.image_size) });
		}
		if opts.kernel_resolution <= 0.0 {
			return Err(Error::InvalidKernel {
				message: format!("kernel_resolution must be positive, got {}", opts.kernel_resolution),
			});
		}
		if opts.kernel_width <= 0.0 {
			return Err(Error::InvalidKernel { message: format!("kernel_width must be positive, got {}", opts.kernel_width) });
		}
		if opts.min_num_passes == 0 {
			return Err(Error::InvalidKernel { message: "min_num_passes must be at least 1".into() });
		}

		let sigma_limit = 0.5 / opts.kernel_width;
		let mut last_variance = 0.0f64; // advanced by desiredVar, not residueVar -- see below
		let mut levels = Vec::with_capacity(opts.mip_level_sigmas.len());

		for (level, &sigma) in opts.mip_level_sigmas.iter().enumerate() {
			if level > 0 && sigma < opts.mip_level_sigmas[level - 1] {
				return Err(Error::NonMonotonicSigmas { level, sigma, previous: opts.mip_level_sigmas[level - 1] });
			}

			let size = ((opts.image_size as u64) + (1u64 << level) - 1) >> level;
			let size = size as u32;

			let desired_var = sigma * sigma;
			let residue_var = desired_var - last_variance;
			if residue_var < 0.0 {
				// Should be unreachable given the monotonicity check above, but
				// variance is not linear in sigma, so keep the invariant explicit.
				return Err(Error::NonMonotonicSigmas { level, sigma, previous: opts.mip_level_sigmas[level - 1] });
			}

			// The oversize guard must run against the level's total residual
			// sigma, not the per-pass sigma below: num_passes is chosen to keep
			// the per-pass sigma under sigma_limit, which keeps the per-pass
			// radius bounded to roughly 0.5*size*kernel_resolution regardless of
			// how wide a blur was actually requested -- so checking the
			// decomposed radius can never catch an oversized request, it just
			// silently grows num_passes instead. Evaluate the guard as if the
			// whole residual were a single pass (num_passes = 1): that is the
			// radius the request implies before decomposition is allowed to
			// shrink it, and is what actually answers "does this mip level's
			// target blur fit this face".
			let total_sigma = residue_var.sqrt() * size as f64;
			let check_r = (total_sigma * opts.kernel_resolution * opts.kernel_width).floor();
			let scale = 1.0 / opts.kernel_resolution;
			let limit = check_r * scale * 1.8; // sqrt(3) rounded up, per spec's own guard form
			if (size as f64) <= limit {
				return Err(Error::InvalidKernel {
					message: format!(
						"level {level}: size {size} <= r*s*1.8 ({limit:.3}); requested blur too wide for this face"
					),
				});
			}

			let num_passes = ((residue_var / (sigma_limit * sigma_limit)).ceil() as u32).max(opts.min_num_passes);
			let level_sigma = (residue_var / num_passes as f64).sqrt() * size as f64;

			// Kernel-σ unit conversion, resolved per the design notes: the
			// Gaussian handed to the builder is in kernel-tap units
			// (pixelSigma / s == pixelSigma * kernelResolution), not pixels.
			let r = (level_sigma * opts.kernel_resolution * opts.kernel_width).floor() as u32;

			let kernel = build_kernel(r, level_sigma * opts.kernel_resolution);

			levels.push(PlanLevel { size, kernel, scale, num_passes });

			// The corrected update: advance by the cumulative target, not the
			// decomposed residue, so numerical slack never accumulates
			// across levels (spec.md §4.5 note, §9).
			last_variance = desired_var;
		}

		Ok(Plan { levels })
	}

	pub fn max_size(&self) -> u32 { self.levels.iter().map(|l| l.size).max().unwrap_or(0) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn opts(image_size: u32, sigmas: &[f64]) -> PrefilterOptions {
		PrefilterOptions { image_size, mip_level_sigmas: sigmas.to_vec(), ..Default::default() }
	}

	#[test]
	fn non_monotonic_sigmas_are_rejected() {
		let err = Plan::build(&opts(64, &[0.1, 0.05])).unwrap_err();
		assert!(matches!(err, Error::NonMonotonicSigmas { .. }));
	}

	/// S6: a small face asked for a wide blur must be rejected outright, not
	/// silently satisfied by growing num_passes until the per-pass kernel
	/// happens to fit.
	#[test]
	fn oversized_kernel_is_rejected() {
		let o = opts(8, &[0.4]);
		let err = Plan::build(&o).unwrap_err();
		assert!(matches!(err, Error::InvalidKernel { .. }), "expected InvalidKernel, got {err:?}");
	}

	#[test]
	fn growing_num_passes_does_not_mask_an_oversized_request() {
		// Same total blur as `oversized_kernel_is_rejected`, but forced through
		// many more passes -- if the guard checked the decomposed per-pass
		// radius instead of the level's total residual sigma, a large
		// min_num_passes would shrink the per-pass kernel enough to slip past
		// it despite the request being just as oversized for the face.
		let o = PrefilterOptions { min_num_passes: 50, ..opts(8, &[0.4]) };
		let err = Plan::build(&o).unwrap_err();
		assert!(matches!(err, Error::InvalidKernel { .. }), "expected InvalidKernel, got {err:?}");
	}

	#[test]
	fn residue_variance_is_non_increasing_for_a_constant_sigma_sequence() {
		let o = opts(64, &[0.1, 0.1, 0.1]);
		let plan = Plan::build(&o).unwrap();
		// level 0 does the work; later levels target zero additional variance.
		assert!(plan.levels[0].num_passes >= plan.levels[1].num_passes || plan.levels[1].kernel.len() <= plan.levels[0].kernel.len());
		assert_eq!(plan.levels[1].kernel.len(), 1, "zero residual variance collapses to a radius-0 kernel");
	}

	#[test]
	fn level_sizes_halve_and_round_up() {
		let o = opts(65, &[0.05, 0.05, 0.05]);
		let plan = Plan::build(&o).unwrap();
		assert_eq!(plan.levels[0].size, 65);
		assert_eq!(plan.levels[1].size, 33);
		assert_eq!(plan.levels[2].size, 17);
	}

	#[test]
	fn non_positive_kernel_resolution_is_rejected() {
		let o = PrefilterOptions { kernel_resolution: 0.0, ..opts(64, &[0.1]) };
		assert!(matches!(Plan::build(&o).unwrap_err(), Error::InvalidKernel { .. }));
	}

	#[test]
	fn non_positive_kernel_width_is_rejected() {
		let o = PrefilterOptions { kernel_width: -1.0, ..opts(64, &[0.1]) };
		assert!(matches!(Plan::build(&o).unwrap_err(), Error::InvalidKernel { .. }));
	}

	#[test]
	fn zero_min_num_passes_is_rejected() {
		let o = PrefilterOptions { min_num_passes: 0, ..opts(64, &[0.1]) };
		assert!(matches!(Plan::build(&o).unwrap_err(), Error::InvalidKernel { .. }));
	}

	#[test]
	fn oversized_image_is_rejected() {
		let err = Plan::build(&opts(70000, &[0.1])).unwrap_err();
		assert!(matches!(err, Error::InvalidSize { .. }));
	}
}
