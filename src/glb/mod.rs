mod bytes;
mod chunk;
mod document;
mod error;
mod flat;
mod format;
mod material;
mod mesh;
mod normalize;
mod session;
mod stream;

/// Container envelope parsing: header validation and chunk walking.
pub use chunk::{CHUNK_BIN, CHUNK_FLAT, CHUNK_JSON, Chunk, ChunkIter, GLB_HEADER_SIZE, GLB_MAGIC, GLB_VERSION, Glb};
/// Document model, extension keys, and buffer view slicing.
pub use document::{
	Accessor, Buffer, BufferView, COMPONENT_TYPE_MASK, Document, Image, Material, Mesh, MeshPrimitive, Node,
	SC_ODIN_EXTENSION, SC_SHADER_EXTENSION, Scene, Skin, buffer_view_bytes,
};
/// Error and result aliases.
pub use error::{GlbError, Result};
/// Vendor flat-table chunk decoding.
pub use flat::decode_flat_table;
/// Attribute format and semantic-kind catalogs.
pub use format::{AttributeFormat, AttributeKind, ScalarKind, WEIGHT_SCALE, unpack_weights};
/// Shader material decoding types.
pub use material::{BlendMode, ShaderMaterial, ShaderProperty, TextureRef};
/// Per-mesh vendor descriptor model.
pub use mesh::{AttributeSet, AttributeSpec, MeshDataInfo, VertexDescriptor};
/// Document fix-up passes.
pub use normalize::{
	clear_invalid_mesh_ref, infer_scenes, infer_skeleton_roots, mask_component_types, rebuild_children,
	relocate_materials, root_nodes,
};
/// Import session, host hooks, and settings.
pub use session::{HostTuning, ImportSession, ImportSettings, ShaderPreset};
/// Pull-based vertex attribute decoding.
pub use stream::{Element, VertexStream};
