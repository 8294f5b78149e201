use serde::Serialize;

use crate::glb::{GlbError, Result};

/// Quantization step for packed skinning weights, from the vendor runtime.
pub const WEIGHT_SCALE: f64 = 0.0002442;

/// Numeric kind of one decoded scalar lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarKind {
	/// 32-bit float.
	F32,
	/// Unsigned byte.
	U8,
	/// Unsigned 16-bit integer.
	U16,
	/// Unsigned 32-bit integer.
	U32,
}

impl ScalarKind {
	/// Byte width of one scalar of this kind.
	pub fn width(self) -> usize {
		match self {
			Self::U8 => 1,
			Self::U16 => 2,
			Self::F32 | Self::U32 => 4,
		}
	}
}

/// Vertex attribute storage format, keyed by the vendor's small integer
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeFormat {
	/// One `f32`.
	Float,
	/// Two `f32`.
	Float2,
	/// Three `f32`.
	Float3,
	/// Four `f32`.
	Float4,
	/// Four `u8`.
	UByte4,
	/// Two `u16`.
	UShort2,
	/// Four `u16`.
	UShort4,
	/// One `u32` holding three bit-packed quantized weights; decodes to four
	/// normalized `f32` weights.
	PackedWeights,
}

impl AttributeFormat {
	/// Look up a format by its vendor code.
	pub fn from_code(code: u64) -> Result<Self> {
		Ok(match code {
			0 => Self::Float,
			1 => Self::Float2,
			2 => Self::Float3,
			3 => Self::Float4,
			4 => Self::UByte4,
			5 => Self::UShort2,
			6 => Self::UShort4,
			7 => Self::PackedWeights,
			_ => return Err(GlbError::UnknownAttributeFormat { code }),
		})
	}

	/// Number of logical lanes one decoded element carries.
	pub fn element_count(self) -> usize {
		match self {
			Self::Float => 1,
			Self::Float2 | Self::UShort2 => 2,
			Self::Float3 => 3,
			Self::Float4 | Self::UByte4 | Self::UShort4 | Self::PackedWeights => 4,
		}
	}

	/// Scalar kind of the decoded lanes.
	pub fn scalar_kind(self) -> ScalarKind {
		match self {
			Self::Float | Self::Float2 | Self::Float3 | Self::Float4 | Self::PackedWeights => ScalarKind::F32,
			Self::UByte4 => ScalarKind::U8,
			Self::UShort2 | Self::UShort4 => ScalarKind::U16,
		}
	}

	/// Bytes one stored element occupies in the raw buffer.
	pub fn byte_size(self) -> usize {
		match self {
			Self::PackedWeights => 4,
			_ => self.element_count() * self.scalar_kind().width(),
		}
	}
}

/// Semantic kind of a vertex attribute, keyed by the vendor's type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeKind {
	/// Vertex position.
	Position,
	/// Vertex normal.
	Normal,
	/// Vertex tangent.
	Tangent,
	/// First UV channel.
	TexCoord0,
	/// Second UV channel.
	TexCoord1,
	/// Vertex color.
	Color0,
	/// Skinning joint indices.
	Joints0,
	/// Skinning joint weights.
	Weights0,
}

impl AttributeKind {
	/// Look up a semantic kind by its vendor code.
	pub fn from_code(code: u64) -> Result<Self> {
		Ok(match code {
			0 => Self::Position,
			1 => Self::Normal,
			2 => Self::Tangent,
			3 => Self::TexCoord0,
			4 => Self::TexCoord1,
			5 => Self::Color0,
			6 => Self::Joints0,
			7 => Self::Weights0,
			_ => return Err(GlbError::UnknownAttributeKind { code }),
		})
	}

	/// Canonical attribute name downstream consumers key on.
	pub fn name(self) -> &'static str {
		match self {
			Self::Position => "POSITION",
			Self::Normal => "NORMAL",
			Self::Tangent => "TANGENT",
			Self::TexCoord0 => "TEXCOORD_0",
			Self::TexCoord1 => "TEXCOORD_1",
			Self::Color0 => "COLOR_0",
			Self::Joints0 => "JOINTS_0",
			Self::Weights0 => "WEIGHTS_0",
		}
	}
}

/// Unpack a bit-packed weight word into four normalized weights.
///
/// Layout: top 11 bits, next 11 bits, bottom 10 bits, each scaled by
/// [`WEIGHT_SCALE`]; the first output lane is derived so the four lanes sum
/// to one.
pub fn unpack_weights(value: u32) -> [f64; 4] {
	let x = f64::from(value >> 21) * WEIGHT_SCALE;
	let y = f64::from((value >> 10) & 0x7FF) * WEIGHT_SCALE;
	let z = f64::from(value & 0x3FF) * WEIGHT_SCALE;
	[((1.0 - x) - y) - z, x, y, z]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_word_gives_full_first_weight() {
		assert_eq!(unpack_weights(0), [1.0, 0.0, 0.0, 0.0]);
	}

	#[test]
	fn weights_always_sum_to_one() {
		for value in [0_u32, 1, 0x3FF, 0x7FF << 10, 0x7FF << 21, 0xDEAD_BEEF, u32::MAX] {
			let weights = unpack_weights(value);
			let sum: f64 = weights.iter().sum();
			assert!((sum - 1.0).abs() < 1e-9, "sum {sum} for {value:#x}");
		}
	}

	#[test]
	fn maximal_fields_stay_in_range() {
		let weights = unpack_weights(u32::MAX);
		assert!(weights[1] <= 2047.0 * WEIGHT_SCALE + 1e-9);
		assert!(weights[2] <= 2047.0 * WEIGHT_SCALE + 1e-9);
		assert!(weights[3] <= 1023.0 * WEIGHT_SCALE + 1e-9);
		assert!((weights[0] - (1.0 - weights[1] - weights[2] - weights[3])).abs() < 1e-9);
	}

	#[test]
	fn catalog_round_trips_codes() {
		for code in 0..8_u64 {
			let format = AttributeFormat::from_code(code).expect("code in catalog");
			assert!(format.element_count() >= 1 && format.element_count() <= 4);
			if format != AttributeFormat::PackedWeights {
				assert_eq!(format.byte_size(), format.element_count() * format.scalar_kind().width());
			}
		}
		assert!(matches!(
			AttributeFormat::from_code(99),
			Err(GlbError::UnknownAttributeFormat { code: 99 })
		));
		assert!(matches!(
			AttributeKind::from_code(99),
			Err(GlbError::UnknownAttributeKind { code: 99 })
		));
	}

	#[test]
	fn packed_weights_occupy_one_word() {
		assert_eq!(AttributeFormat::PackedWeights.byte_size(), 4);
		assert_eq!(AttributeFormat::PackedWeights.element_count(), 4);
		assert_eq!(AttributeFormat::Float3.byte_size(), 12);
		assert_eq!(AttributeFormat::UShort2.byte_size(), 4);
	}
}
