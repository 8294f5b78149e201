use std::rc::Rc;

use serde_json::Value;

use crate::glb::format::{AttributeFormat, AttributeKind};
use crate::glb::stream::VertexStream;
use crate::glb::{GlbError, Result};

/// One attribute inside a vertex descriptor block.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
	/// Semantic attribute kind.
	pub kind: AttributeKind,
	/// Storage format code.
	pub format: AttributeFormat,
	/// Byte offset of this attribute inside one interleaved element.
	pub offset: usize,
}

/// One interleaved vertex block: base offset, stride, and its attributes.
#[derive(Debug, Clone)]
pub struct VertexDescriptor {
	/// Byte offset of the block inside the mesh data region.
	pub offset: usize,
	/// Distance between consecutive elements; 0 means tightly packed.
	pub stride: usize,
	/// Ordered attribute list.
	pub attributes: Vec<AttributeSpec>,
}

/// Decoded per-mesh vendor descriptor: an ordered list of vertex blocks.
#[derive(Debug, Clone)]
pub struct MeshDataInfo {
	/// Vertex descriptor blocks.
	pub descriptors: Vec<VertexDescriptor>,
}

/// Ordered mapping of canonical attribute name to its stream decoder.
pub type AttributeSet<'a> = Vec<(&'static str, Rc<VertexStream<'a>>)>;

impl MeshDataInfo {
	/// Parse one `meshDataInfos` entry from the Odin extension block.
	pub fn from_value(value: &Value) -> Result<Self> {
		let blocks = value
			.get("vertexDescriptors")
			.and_then(Value::as_array)
			.ok_or(GlbError::BadVertexDescriptor {
				detail: "missing vertexDescriptors list",
			})?;

		let mut descriptors = Vec::with_capacity(blocks.len());
		for block in blocks {
			let offset = field_usize(block, "offset").unwrap_or(0);
			let stride = field_usize(block, "stride").unwrap_or(0);

			let entries = block.get("attributes").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
			let mut attributes = Vec::with_capacity(entries.len());
			for entry in entries {
				let kind_code = field_u64(entry, "index").ok_or(GlbError::BadVertexDescriptor {
					detail: "attribute missing index",
				})?;
				let format_code = field_u64(entry, "format").ok_or(GlbError::BadVertexDescriptor {
					detail: "attribute missing format",
				})?;

				attributes.push(AttributeSpec {
					kind: AttributeKind::from_code(kind_code)?,
					format: AttributeFormat::from_code(format_code)?,
					offset: field_usize(entry, "offset").unwrap_or(0),
				});
			}

			descriptors.push(VertexDescriptor { offset, stride, attributes });
		}

		Ok(Self { descriptors })
	}

	/// Instantiate one stream decoder per attribute over `data`.
	///
	/// A later block redefining an attribute name replaces the earlier
	/// stream, matching the vendor's last-wins descriptor semantics.
	pub fn decode<'a>(&self, data: &'a [u8]) -> AttributeSet<'a> {
		let mut set: AttributeSet<'a> = Vec::new();
		for descriptor in &self.descriptors {
			for spec in &descriptor.attributes {
				let name = spec.kind.name();
				let stream = Rc::new(VertexStream::new(
					data,
					spec.format,
					descriptor.offset,
					spec.offset,
					descriptor.stride,
				));

				if let Some(slot) = set.iter_mut().find(|(existing, _)| *existing == name) {
					slot.1 = stream;
				} else {
					set.push((name, stream));
				}
			}
		}
		set
	}
}

fn field_u64(value: &Value, key: &str) -> Option<u64> {
	value.get(key)?.as_u64()
}

fn field_usize(value: &Value, key: &str) -> Option<usize> {
	usize::try_from(field_u64(value, key)?).ok()
}
