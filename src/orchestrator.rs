//! Pass orchestrator (spec.md §4.4): ping-pongs two owned six-face buffers
//! through `numPasses` rounds of `(axis=0, axis=1, axis=2)`.

use crate::convolve::{ltasg_single, Axis};
use crate::face::FaceSet;
use crate::topology::CubeTopology;

/// Two owned six-face scratch buffers, sized to the largest mip level and
/// reused across every level of a single [`crate::pipeline::Prefilter::process`]
/// call — mirrors the teacher's staging-buffer reuse in preference to an
/// allocator-per-pass.
pub struct Scratch {
	p: FaceSet,
	q: FaceSet,
}

impl Scratch {
	pub fn new(max_size: u32) -> Self { Self { p: FaceSet::new(max_size), q: FaceSet::new(max_size) } }

	/// Run the orchestrator of spec.md §4.4: apply `(kernel, s)` as
	/// `num_passes` rounds of `(u, v, w)` convolutions over `input`,
	/// returning the result in `output`. `input` and `output` may be the
	/// same handle; `Scratch`'s two buffers are the ones actually written
	/// through the pass chain.
	pub fn run(
		&mut self, topo: &CubeTopology, kernel: &[f32], s: f64, num_passes: u32, size: u32, input: &FaceSet,
		output: &mut FaceSet,
	) {
		self.resize_to(size);
		copy_into(input, &mut self.p);

		let (mut front, mut back) = (&mut self.p, &mut self.q);
		for _ in 0..num_passes {
			for axis in [Axis::U, Axis::V, Axis::W] {
				ltasg_single(topo, kernel, s, axis, front, back);
				std::mem::swap(&mut front, &mut back);
			}
		}
		copy_into(front, output);
	}

	/// Reallocate the two buffers if the requested level size differs from
	/// what they currently hold. This happens once per mip level (at most a
	/// handful of times per `process` call), never once per pass.
	fn resize_to(&mut self, size: u32) {
		if self.p.size() != size {
			self.p = FaceSet::new(size);
		}
		if self.q.size() != size {
			self.q = FaceSet::new(size);
		}
	}
}

fn copy_into(src: &FaceSet, dst: &mut FaceSet) {
	use crate::face::Face;
	debug_assert_eq!(src.size(), dst.size());
	for face in Face::ALL {
		dst.face_mut(face).data_mut().copy_from_slice(src.face(face).data());
	}
}

#[cfg(test)]
mod tests {
	use vek::Rgba;

	use super::*;
	use crate::face::Face;
	use crate::kernel::build_kernel;

	#[test]
	fn dimensions_are_preserved() {
		let topo = CubeTopology::new();
		let input = FaceSet::new(16);
		let mut output = FaceSet::new(16);
		let mut scratch = Scratch::new(16);
		let kernel = build_kernel(3, 2.0);
		scratch.run(&topo, &kernel, 1.0, 2, 16, &input, &mut output);
		assert_eq!(output.size(), 16);
	}

	#[test]
	fn k_passes_equals_k_applications_of_one_pass() {
		let topo = CubeTopology::new();
		let mut input = FaceSet::new(8);
		input.face_mut(Face::PosX).set(3, 3, Rgba::new(1.0, 0.5, 0.25, 1.0));
		let kernel = build_kernel(1, 1.0);

		let mut combined = FaceSet::new(8);
		let mut scratch_a = Scratch::new(8);
		scratch_a.run(&topo, &kernel, 1.0, 3, 8, &input, &mut combined);

		let mut stepwise = input.clone();
		let mut scratch_b = Scratch::new(8);
		for _ in 0..3 {
			let mut next = FaceSet::new(8);
			scratch_b.run(&topo, &kernel, 1.0, 1, 8, &stepwise, &mut next);
			stepwise = next;
		}

		for face in Face::ALL {
			for (a, b) in combined.face(face).data().iter().zip(stepwise.face(face).data()) {
				assert!((a - b).abs() < 1e-4, "face {face:?} diverged: {a} vs {b}");
			}
		}
	}
}
