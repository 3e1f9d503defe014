use vek::Rgba;

/// One of the six cube faces, indexed per spec: `+X, -X, +Y, -Y, +Z, -Z`.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Face {
	PosX = 0,
	NegX = 1,
	PosY = 2,
	NegY = 3,
	PosZ = 4,
	NegZ = 5,
}

impl Face {
	pub const ALL: [Face; 6] = [Face::PosX, Face::NegX, Face::PosY, Face::NegY, Face::PosZ, Face::NegZ];

	pub fn index(self) -> usize { self as usize }

	pub fn from_index(i: usize) -> Face {
		match i {
			0 => Face::PosX,
			1 => Face::NegX,
			2 => Face::PosY,
			3 => Face::NegY,
			4 => Face::PosZ,
			5 => Face::NegZ,
			_ => unreachable!("cube face index out of range: {i}"),
		}
	}
}

/// A single square face, row-major, 4-channel premultiplied-alpha float.
///
/// The backing storage is a flat `Vec<f32>` of `4 * size * size` elements
/// rather than a `Vec<Rgba<f32>>`: the convolution inner loop wants to walk
/// contiguous scanlines, and a flat buffer is what the external coercion
/// collaborators (§6) hand in and take back out.
#[derive(Clone)]
pub struct FaceImage {
	size: u32,
	data: Vec<f32>,
}

impl FaceImage {
	pub fn new(size: u32) -> Self { Self { size, data: vec![0.0; 4 * size as usize * size as usize] } }

	/// Wrap caller-owned storage. `data.len()` must be at least `4 * size * size`;
	/// this is checked at the `Prefilter::process` boundary, not here.
	pub fn from_vec(size: u32, data: Vec<f32>) -> Self { Self { size, data } }

	pub fn size(&self) -> u32 { self.size }

	pub fn data(&self) -> &[f32] { &self.data }

	pub fn data_mut(&mut self) -> &mut [f32] { &mut self.data }

	pub fn into_vec(self) -> Vec<f32> { self.data }

	/// Raw little-endian byte view of the backing storage, for a host's
	/// `ImageCoerceOut` implementation to hand off to an encoder that wants
	/// bytes rather than floats (e.g. writing an EXR/HDR buffer) without an
	/// intermediate copy.
	pub fn as_bytes(&self) -> &[u8] { bytemuck::cast_slice(&self.data) }

	/// Wrap a raw byte buffer produced by a host decoder as a face's backing
	/// storage, zero-copy. `bytes.len()` must be `4 * size * size * 4`
	/// (f32 is 4 bytes); panics via `bytemuck` otherwise, same as
	/// `from_vec`'s length contract.
	pub fn from_bytes(size: u32, bytes: &[u8]) -> Self { Self { size, data: bytemuck::cast_slice(bytes).to_vec() } }

	#[inline]
	pub fn get(&self, u: i64, v: i64) -> Rgba<f32> {
		let idx = self.offset(u, v);
		Rgba::new(self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3])
	}

	#[inline]
	pub fn set(&mut self, u: i64, v: i64, px: Rgba<f32>) {
		let idx = self.offset(u, v);
		self.data[idx..idx + 4].copy_from_slice(&[px.r, px.g, px.b, px.a]);
	}

	#[inline]
	fn offset(&self, u: i64, v: i64) -> usize {
		debug_assert!(u >= 0 && v >= 0 && (u as u32) < self.size && (v as u32) < self.size);
		4 * (v as usize * self.size as usize + u as usize)
	}

	pub fn row_mut(&mut self, v: u32) -> &mut [f32] {
		let n = self.size as usize;
		let start = 4 * v as usize * n;
		&mut self.data[start..start + 4 * n]
	}

	pub fn row(&self, v: u32) -> &[f32] {
		let n = self.size as usize;
		let start = 4 * v as usize * n;
		&self.data[start..start + 4 * n]
	}

	/// Rows as contiguous `4 * size`-wide chunks, for splitting the scanline
	/// loop across a thread pool without per-row bounds games.
	pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, f32> { self.data.chunks_mut(4 * self.size as usize) }
}

/// The six faces of one mip level, always in `Face::ALL` order.
#[derive(Clone)]
pub struct FaceSet {
	faces: [FaceImage; 6],
}

impl FaceSet {
	pub fn new(size: u32) -> Self {
		Self { faces: std::array::from_fn(|_| FaceImage::new(size)) }
	}

	pub fn from_faces(faces: [FaceImage; 6]) -> Self {
		let size = faces[0].size();
		debug_assert!(faces.iter().all(|f| f.size() == size), "all six faces must share a size");
		Self { faces }
	}

	pub fn size(&self) -> u32 { self.faces[0].size() }

	pub fn face(&self, f: Face) -> &FaceImage { &self.faces[f.index()] }

	pub fn face_mut(&mut self, f: Face) -> &mut FaceImage { &mut self.faces[f.index()] }

	pub fn iter(&self) -> impl Iterator<Item = (Face, &FaceImage)> { Face::ALL.into_iter().map(|f| (f, self.face(f))) }

	pub fn into_faces(self) -> [FaceImage; 6] { self.faces }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn byte_round_trip_preserves_pixels() {
		let mut f = FaceImage::new(4);
		f.set(1, 2, Rgba::new(0.25, 0.5, 0.75, 1.0));
		let bytes = f.as_bytes().to_vec();
		let back = FaceImage::from_bytes(4, &bytes);
		assert_eq!(back.data(), f.data());
	}

	#[test]
	fn face_index_round_trips() {
		for f in Face::ALL {
			assert_eq!(Face::from_index(f.index()), f);
		}
	}
}
