//! 1-D Gaussian kernel builder (spec.md §4.1).

/// Build a normalized, symmetric Gaussian kernel of radius `r` (length
/// `2r + 1`) with standard deviation `sigma`, expressed in kernel-tap units.
///
/// `sigma` must be positive for `r > 0`; `r == 0` is always a legal no-op
/// kernel (`[1.0]`), independent of `sigma` -- a plan that decomposes to
/// zero residual variance at some level passes `sigma == 0` here, which
/// would otherwise divide by zero.
pub fn build_kernel(r: u32, sigma: f64) -> Vec<f32> {
	if r == 0 {
		return vec![1.0];
	}
	let r = r as i64;
	let mut weights = Vec::with_capacity((2 * r + 1) as usize);
	let mut sum = 0.0f64;
	for i in -r..=r {
		let x = i as f64 / sigma;
		let w = (-0.5 * x * x).exp();
		weights.push(w);
		sum += w;
	}
	for w in &mut weights {
		*w /= sum;
	}
	weights.iter().map(|&w| w as f32).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sums_to_one() {
		for &(r, sigma) in &[(0u32, 0.5f64), (1, 1.0), (5, 2.0), (20, 7.0)] {
			let k = build_kernel(r, sigma);
			assert_eq!(k.len(), 2 * r as usize + 1);
			let sum: f32 = k.iter().sum();
			assert!((sum - 1.0).abs() < 1e-6, "kernel sum {sum} for r={r} sigma={sigma}");
		}
	}

	#[test]
	fn is_symmetric() {
		let k = build_kernel(6, 2.5);
		for i in 0..k.len() {
			assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
		}
	}

	#[test]
	fn radius_zero_is_identity_weight() {
		let k = build_kernel(0, 1.0);
		assert_eq!(k, vec![1.0]);
	}

	#[test]
	fn radius_zero_ignores_degenerate_sigma() {
		let k = build_kernel(0, 0.0);
		assert_eq!(k, vec![1.0]);
	}
}
