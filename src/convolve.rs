//! Single-axis six-face convolution (spec.md §4.3).

use vek::Rgba;

use crate::face::{Face, FaceSet};
use crate::topology::CubeTopology;

/// Which separable direction one convolution pass runs along.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
	/// In-plane, along pixel columns.
	U = 0,
	/// In-plane, along pixel rows.
	V = 1,
	/// Cross-face, the pass that recovers approximate isotropy on the sphere
	/// (design notes §9). Offsets both `u` and `v` together, so an
	/// out-of-range tap along this axis is the corner case the topology
	/// table's bounded re-resolution loop exists for.
	W = 2,
}

/// Offset applied to `(u, v)` for kernel tap `i` along `axis`, scaled by the
/// kernel's sampling stride `s` (spec.md §3: "a tap at offset i samples the
/// source at pixel offset round(i*s)").
#[inline]
fn tap_offset(axis: Axis, i: i64, s: f64) -> (i64, i64) {
	let d = (i as f64 * s).round() as i64;
	match axis {
		Axis::U => (d, 0),
		Axis::V => (0, d),
		Axis::W => (d, d),
	}
}

/// Convolve all six faces of `src` into `dst` along `axis`, using `kernel`
/// (odd length `2r+1`, already normalized) sampled `s` pixels apart per tap.
///
/// `src` and `dst` must be distinct buffers (the orchestrator's ping-pong
/// discipline guarantees this); the implementation does not alias-check.
pub fn ltasg_single(topo: &CubeTopology, kernel: &[f32], s: f64, axis: Axis, src: &FaceSet, dst: &mut FaceSet) {
	debug_assert!(kernel.len() % 2 == 1, "kernel length must be odd");
	let n = src.size() as i64;
	let r = (kernel.len() / 2) as i64;

	for face in Face::ALL {
		convolve_face(topo, kernel, s, axis, r, n, face, src, dst);
	}
}

#[cfg(feature = "parallel")]
fn convolve_face(
	topo: &CubeTopology, kernel: &[f32], s: f64, axis: Axis, r: i64, n: i64, face: Face, src: &FaceSet,
	dst: &mut FaceSet,
) {
	use rayon::prelude::*;

	dst.face_mut(face).rows_mut().enumerate().par_bridge().for_each(|(v, row)| {
		convolve_row(topo, kernel, s, axis, r, n, face, src, v as i64, row);
	});
}

#[cfg(not(feature = "parallel"))]
fn convolve_face(
	topo: &CubeTopology, kernel: &[f32], s: f64, axis: Axis, r: i64, n: i64, face: Face, src: &FaceSet,
	dst: &mut FaceSet,
) {
	let size = dst.size();
	for v in 0..size {
		let row = dst.face_mut(face).row_mut(v);
		convolve_row(topo, kernel, s, axis, r, n, face, src, v as i64, row);
	}
}

#[inline]
fn convolve_row(
	topo: &CubeTopology, kernel: &[f32], s: f64, axis: Axis, r: i64, n: i64, face: Face, src: &FaceSet, v: i64,
	row: &mut [f32],
) {
	for u in 0..n {
		let mut acc = Rgba::new(0.0f32, 0.0, 0.0, 0.0);
		for (i, &w) in kernel.iter().enumerate() {
			let i = i as i64 - r;
			let (du, dv) = tap_offset(axis, i, s);
			let (sf, su, sv) = topo.sample(face, u + du, v + dv, n);
			let px = src.face(sf).get(su, sv);
			acc += px * w;
		}
		let idx = 4 * u as usize;
		row[idx] = acc.r;
		row[idx + 1] = acc.g;
		row[idx + 2] = acc.b;
		row[idx + 3] = acc.a;
	}
}
