use crate::glb::format::{AttributeFormat, ScalarKind, unpack_weights};
use crate::glb::{GlbError, Result};

/// One decoded vertex attribute element: up to four numeric lanes.
///
/// Lanes are widened to `f64` so every catalog scalar kind round-trips
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
	lanes: [f64; 4],
	len: usize,
}

impl Element {
	/// Return the decoded lanes.
	pub fn as_slice(&self) -> &[f64] {
		&self.lanes[..self.len]
	}

	/// Number of lanes.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Return whether the element has no lanes.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

/// Pull-based decoder over one interleaved attribute of a raw buffer region.
///
/// Never materializes the stream: each [`read`](Self::read) decodes exactly
/// one element at a computed byte offset.
#[derive(Debug)]
pub struct VertexStream<'a> {
	data: &'a [u8],
	format: AttributeFormat,
	offset: usize,
	element_offset: usize,
	stride: usize,
}

impl<'a> VertexStream<'a> {
	/// Create a stream over `data`.
	///
	/// `offset` is the descriptor-block base, `element_offset` the attribute
	/// position inside one interleaved element, `stride` the distance between
	/// consecutive elements (0 means tightly packed).
	pub fn new(data: &'a [u8], format: AttributeFormat, offset: usize, element_offset: usize, stride: usize) -> Self {
		let stride = if stride == 0 { format.byte_size() } else { stride };
		Self {
			data,
			format,
			offset,
			element_offset,
			stride,
		}
	}

	/// Storage format of this stream.
	pub fn format(&self) -> AttributeFormat {
		self.format
	}

	/// Decode the element at `index`.
	pub fn read(&self, index: usize) -> Result<Element> {
		let at = self
			.stride
			.checked_mul(index)
			.and_then(|span| span.checked_add(self.offset))
			.and_then(|span| span.checked_add(self.element_offset))
			.ok_or(GlbError::StreamOutOfBounds {
				at: usize::MAX,
				need: self.format.byte_size(),
				len: self.data.len(),
			})?;
		self.decode_at(at)
	}

	/// Decode one element per input index, order preserved.
	pub fn read_batch(&self, indices: &[usize]) -> Result<Vec<Element>> {
		indices.iter().map(|index| self.read(*index)).collect()
	}

	fn decode_at(&self, at: usize) -> Result<Element> {
		let need = self.format.byte_size();
		let end = at.checked_add(need).ok_or(GlbError::StreamOutOfBounds {
			at,
			need,
			len: self.data.len(),
		})?;
		let bytes = self.data.get(at..end).ok_or(GlbError::StreamOutOfBounds {
			at,
			need,
			len: self.data.len(),
		})?;

		if self.format == AttributeFormat::PackedWeights {
			let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
			return Ok(Element {
				lanes: unpack_weights(word),
				len: 4,
			});
		}

		let mut lanes = [0.0_f64; 4];
		let len = self.format.element_count();
		let width = self.format.scalar_kind().width();
		for (lane, chunk) in lanes[..len].iter_mut().zip(bytes.chunks_exact(width)) {
			*lane = match self.format.scalar_kind() {
				ScalarKind::F32 => f64::from(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
				ScalarKind::U8 => f64::from(chunk[0]),
				ScalarKind::U16 => f64::from(u16::from_le_bytes([chunk[0], chunk[1]])),
				ScalarKind::U32 => f64::from(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
			};
		}

		Ok(Element { lanes, len })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn f32_buffer(values: &[f32]) -> Vec<u8> {
		values.iter().flat_map(|value| value.to_le_bytes()).collect()
	}

	#[test]
	fn reads_address_offsets_by_stride() {
		// Two interleaved attributes: position (vec3) then uv (vec2), stride 20.
		let mut data = Vec::new();
		for i in 0..3_i32 {
			let base = i as f32 * 10.0;
			data.extend_from_slice(&f32_buffer(&[base, base + 1.0, base + 2.0, base + 3.0, base + 4.0]));
		}

		let position = VertexStream::new(&data, AttributeFormat::Float3, 0, 0, 20);
		let uv = VertexStream::new(&data, AttributeFormat::Float2, 0, 12, 20);

		for i in 0..3 {
			let base = i as f64 * 10.0;
			assert_eq!(position.read(i).expect("in range").as_slice(), &[base, base + 1.0, base + 2.0]);
			assert_eq!(uv.read(i).expect("in range").as_slice(), &[base + 3.0, base + 4.0]);
		}
	}

	#[test]
	fn zero_stride_means_tightly_packed() {
		let data = f32_buffer(&[1.0, 2.0, 3.0, 4.0]);
		let stream = VertexStream::new(&data, AttributeFormat::Float2, 0, 0, 0);
		assert_eq!(stream.read(0).expect("in range").as_slice(), &[1.0, 2.0]);
		assert_eq!(stream.read(1).expect("in range").as_slice(), &[3.0, 4.0]);
	}

	#[test]
	fn integer_kinds_decode_exactly() {
		let data = [1_u8, 2, 3, 4, 0x34, 0x12, 0x78, 0x56];
		let joints = VertexStream::new(&data, AttributeFormat::UByte4, 0, 0, 0);
		assert_eq!(joints.read(0).expect("in range").as_slice(), &[1.0, 2.0, 3.0, 4.0]);

		let shorts = VertexStream::new(&data, AttributeFormat::UShort2, 4, 0, 0);
		assert_eq!(shorts.read(0).expect("in range").as_slice(), &[f64::from(0x1234_u16), f64::from(0x5678_u16)]);
	}

	#[test]
	fn packed_weights_decode_through_catalog_rule() {
		let word: u32 = (1024 << 21) | (512 << 10) | 256;
		let data = word.to_le_bytes();
		let stream = VertexStream::new(&data, AttributeFormat::PackedWeights, 0, 0, 0);

		let element = stream.read(0).expect("in range");
		let lanes = element.as_slice();
		assert_eq!(lanes[1], 1024.0 * crate::glb::format::WEIGHT_SCALE);
		assert_eq!(lanes[2], 512.0 * crate::glb::format::WEIGHT_SCALE);
		assert_eq!(lanes[3], 256.0 * crate::glb::format::WEIGHT_SCALE);
		let sum: f64 = lanes.iter().sum();
		assert!((sum - 1.0).abs() < 1e-9);
	}

	#[test]
	fn batch_reads_preserve_order() {
		let data = f32_buffer(&[0.0, 1.0, 2.0, 3.0]);
		let stream = VertexStream::new(&data, AttributeFormat::Float, 0, 0, 0);
		let elements = stream.read_batch(&[3, 0, 2]).expect("all in range");
		let values: Vec<f64> = elements.iter().map(|element| element.as_slice()[0]).collect();
		assert_eq!(values, vec![3.0, 0.0, 2.0]);
	}

	#[test]
	fn out_of_range_read_surfaces_error() {
		let data = f32_buffer(&[0.0, 1.0]);
		let stream = VertexStream::new(&data, AttributeFormat::Float2, 0, 0, 0);
		assert!(stream.read(0).is_ok());
		assert!(matches!(stream.read(1), Err(GlbError::StreamOutOfBounds { at: 8, need: 8, len: 8 })));
	}
}
