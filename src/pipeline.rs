//! Pipeline driver (spec.md §4.6): coerce six input faces, then for each mip
//! level downsample-from-previous, run the orchestrator, coerce back out.

use tracing::{debug, info_span};

use crate::error::{Error, Result};
use crate::face::{Face, FaceImage, FaceSet};
use crate::orchestrator::Scratch;
use crate::plan::{Plan, PrefilterOptions};
use crate::topology::CubeTopology;
use crate::traits::{ImageCoerceIn, ImageCoerceOut, Resample};

/// One emitted mip level: six encoded faces in [`Face::ALL`] order.
pub type Level<T> = [T; 6];

/// Owns the plan and cube topology table built once at construction
/// (spec.md §3 Lifecycle: "a plan is built once at construction from
/// immutable options and retained read-only").
pub struct Prefilter {
	plan: Plan,
	topo: CubeTopology,
}

impl Prefilter {
	pub fn new(opts: &PrefilterOptions) -> Result<Self> {
		let plan = Plan::build(opts)?;
		Ok(Self { plan, topo: CubeTopology::new() })
	}

	/// Run the full pipeline of spec.md §4.6 over six input faces, returning
	/// one encoded [`Level`] per mip level, level 0 first.
	///
	/// `in_images` must have exactly six entries, ordered [`Face::ALL`].
	pub fn process<In, Out, Ds>(
		&self, coerce_in: &In, coerce_out: &Out, resample: &Ds, in_images: &[In::Image], in_format: &In::Format,
		out_format: &Out::Format,
	) -> Result<Vec<Level<Out::Output>>>
	where
		In: ImageCoerceIn,
		Out: ImageCoerceOut,
		Ds: Resample,
	{
		let raw = self.process_raw(coerce_in, resample, in_images, in_format)?;
		raw.into_iter()
			.map(|level| {
				let mut out: [Option<Out::Output>; 6] = Default::default();
				for face in Face::ALL {
					let encoded = coerce_out
						.coerce_out(&level[face.index()], out_format)
						.map_err(|e| Error::Collaborator { message: format!("{e:?}") })?;
					out[face.index()] = Some(encoded);
				}
				Ok(out.map(|o| o.expect("every face slot filled above")))
			})
			.collect()
	}

	/// Like [`Prefilter::process`], but skips the reverse coercion
	/// collaborator and returns the internal premultiplied-alpha float
	/// representation directly -- for callers that want to keep working in
	/// that format (e.g. chaining into another float-based stage).
	pub fn process_raw<In, Ds>(
		&self, coerce_in: &In, resample: &Ds, in_images: &[In::Image], in_format: &In::Format,
	) -> Result<Vec<Level<FaceImage>>>
	where
		In: ImageCoerceIn,
		Ds: Resample,
	{
		if in_images.len() < 6 {
			return Err(Error::InvalidArity { found: in_images.len() });
		}
		let n = self.plan.levels.first().map(|l| l.size).unwrap_or(0);

		let mut current = FaceSet::new(n);
		for face in Face::ALL {
			let coerced = coerce_in
				.coerce_in(&in_images[face.index()], in_format, n, n)
				.map_err(|e| Error::Collaborator { message: format!("{e:?}") })?;
			if coerced.data().len() < 4 * n as usize * n as usize {
				return Err(Error::InvalidSize {
					message: format!("face {face:?}: coerced buffer shorter than 4*{n}*{n}"),
				});
			}
			*current.face_mut(face) = coerced;
		}

		let max_size = self.plan.max_size();
		let mut scratch = Scratch::new(max_size);
		let mut levels = Vec::with_capacity(self.plan.levels.len());

		for (level_idx, level) in self.plan.levels.iter().enumerate() {
			let span = info_span!("ltasg_level", level = level_idx, size = level.size, num_passes = level.num_passes);
			let _enter = span.enter();

			if level_idx > 0 {
				current = downsample(resample, &current, level.size)?;
			}

			let mut blurred = FaceSet::new(level.size);
			scratch.run(&self.topo, &level.kernel, level.scale, level.num_passes, level.size, &current, &mut blurred);
			current = blurred;

			debug!(radius = (level.kernel.len() / 2), scale = level.scale, "level blurred");

			levels.push(current.clone().into_faces());
		}

		Ok(levels)
	}

	pub fn plan(&self) -> &Plan { &self.plan }
}

fn downsample<Ds: Resample>(resample: &Ds, src: &FaceSet, dst_size: u32) -> Result<FaceSet> {
	let mut dst = FaceSet::new(dst_size);
	for face in Face::ALL {
		let resampled = resample
			.resample(src.face(face), dst_size, dst_size)
			.map_err(|e| Error::Collaborator { message: format!("{e:?}") })?;
		*dst.face_mut(face) = resampled;
	}
	Ok(dst)
}
