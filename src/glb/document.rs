use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::glb::{GlbError, Result};

/// Extension key carrying vendor mesh data, node parents, and relocated
/// materials.
pub const SC_ODIN_EXTENSION: &str = "SC_odin_mesh";
/// Extension key carrying the vendor shader material block.
pub const SC_SHADER_EXTENSION: &str = "SC_shader";

/// Mask keeping only the standard low 16 bits of an accessor component type.
pub const COMPONENT_TYPE_MASK: u32 = 0x0000_FFFF;

/// Parsed structural document: the scene graph before and after
/// normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
	/// Extension names the asset requires.
	pub extensions_required: Vec<String>,
	/// Extension names the asset uses.
	pub extensions_used: Vec<String>,
	/// Scene list; absent in many vendor files until normalization.
	pub scenes: Option<Vec<Scene>>,
	/// Default scene index.
	pub scene: Option<usize>,
	/// Node list.
	pub nodes: Option<Vec<Node>>,
	/// Mesh list.
	pub meshes: Option<Vec<Mesh>>,
	/// Material list.
	pub materials: Option<Vec<Material>>,
	/// Skin list.
	pub skins: Option<Vec<Skin>>,
	/// Accessor list.
	pub accessors: Option<Vec<Accessor>>,
	/// Buffer view list.
	pub buffer_views: Option<Vec<BufferView>>,
	/// Buffer list.
	pub buffers: Option<Vec<Buffer>>,
	/// Image list.
	pub images: Option<Vec<Image>>,
	/// Document-level extension blocks.
	pub extensions: Option<Map<String, Value>>,
}

/// One scene: a list of root node indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
	/// Optional scene name.
	pub name: Option<String>,
	/// Root node indices.
	pub nodes: Option<Vec<usize>>,
}

/// One scene-graph node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
	/// Optional node name.
	pub name: Option<String>,
	/// Mesh reference.
	pub mesh: Option<usize>,
	/// Skin reference.
	pub skin: Option<usize>,
	/// Child node indices; reconstructed from parent pointers when absent.
	pub children: Option<Vec<usize>>,
	/// Local translation.
	pub translation: Option<[f32; 3]>,
	/// Local rotation quaternion.
	pub rotation: Option<[f32; 4]>,
	/// Local scale.
	pub scale: Option<[f32; 3]>,
	/// Node-level extension blocks.
	pub extensions: Option<Map<String, Value>>,
	/// Whether normalization demoted this node to a non-mesh dummy.
	#[serde(skip)]
	pub dummy: bool,
}

/// One mesh: a list of primitives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mesh {
	/// Optional mesh name.
	pub name: Option<String>,
	/// Primitive list.
	pub primitives: Vec<MeshPrimitive>,
	/// Mesh-level extension blocks.
	pub extensions: Option<Map<String, Value>>,
}

/// One mesh primitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeshPrimitive {
	/// Attribute semantic name to accessor index.
	pub attributes: BTreeMap<String, usize>,
	/// Index accessor reference.
	pub indices: Option<usize>,
	/// Material reference.
	pub material: Option<usize>,
	/// Topology mode.
	pub mode: Option<u32>,
	/// Primitive-level extension blocks.
	pub extensions: Option<Map<String, Value>>,
}

/// One material entry; vendor payload lives in `extensions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
	/// Optional material name.
	pub name: Option<String>,
	/// Material-level extension blocks.
	pub extensions: Option<Map<String, Value>>,
}

/// One skin: joints plus an optional skeleton root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skin {
	/// Optional skin name.
	pub name: Option<String>,
	/// Joint node indices.
	pub joints: Vec<usize>,
	/// Skeleton root node index; inferred during normalization.
	pub skeleton: Option<usize>,
	/// Inverse bind matrices accessor.
	pub inverse_bind_matrices: Option<usize>,
}

/// One accessor describing typed elements over a buffer view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accessor {
	/// Buffer view reference.
	pub buffer_view: Option<usize>,
	/// Byte offset into the buffer view.
	pub byte_offset: usize,
	/// Component type tag; vendor files set flag bits above the low 16.
	pub component_type: u32,
	/// Element count.
	pub count: usize,
	/// Element shape name (`SCALAR`, `VEC3`, ...).
	#[serde(rename = "type")]
	pub element_type: String,
	/// Whether integer components are normalized.
	pub normalized: bool,
}

/// One view into a raw buffer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BufferView {
	/// Buffer reference.
	pub buffer: usize,
	/// Byte offset into the buffer.
	pub byte_offset: usize,
	/// View length in bytes.
	pub byte_length: usize,
	/// Optional fixed stride.
	pub byte_stride: Option<usize>,
}

/// One raw buffer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Buffer {
	/// Buffer length in bytes.
	pub byte_length: usize,
	/// Optional external URI; absent for the GLB-embedded buffer.
	pub uri: Option<String>,
}

/// One image record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
	/// Optional image name.
	pub name: Option<String>,
	/// Source URI; texture properties resolve through this.
	pub uri: Option<String>,
	/// Embedded image buffer view.
	pub buffer_view: Option<usize>,
}

impl Document {
	/// Return the document-level Odin extension block, if present.
	pub fn odin_extension(&self) -> Option<&Map<String, Value>> {
		self.extensions.as_ref()?.get(SC_ODIN_EXTENSION)?.as_object()
	}

	/// Return whether this document carries the vendor extensions this crate
	/// decodes.
	pub fn is_supercell(&self) -> bool {
		let required = self.extensions_required.iter().any(|name| name == SC_ODIN_EXTENSION);
		let used = self.extensions_used.iter().any(|name| name == SC_SHADER_EXTENSION);
		required || used
	}
}

/// Slice the shared raw buffer through a buffer view, bounds-checked.
pub fn buffer_view_bytes<'a>(doc: &Document, bin: &'a [u8], index: usize) -> Result<&'a [u8]> {
	let views = doc.buffer_views.as_deref().unwrap_or(&[]);
	let view = views.get(index).ok_or(GlbError::IndexOutOfRange {
		kind: "bufferView",
		index,
		len: views.len(),
	})?;

	let end = view.byte_offset.checked_add(view.byte_length).ok_or(GlbError::UnexpectedEof {
		at: view.byte_offset,
		need: view.byte_length,
		rem: bin.len().saturating_sub(view.byte_offset),
	})?;
	bin.get(view.byte_offset..end).ok_or(GlbError::UnexpectedEof {
		at: view.byte_offset,
		need: view.byte_length,
		rem: bin.len().saturating_sub(view.byte_offset),
	})
}
