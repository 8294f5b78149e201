use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::Value;

use crate::glb::document::{Document, SC_ODIN_EXTENSION, SC_SHADER_EXTENSION, buffer_view_bytes};
use crate::glb::material::ShaderMaterial;
use crate::glb::mesh::{AttributeSet, MeshDataInfo};
use crate::glb::stream::VertexStream;
use crate::glb::{GlbError, Result, normalize};

/// Shader preset selector carried for the host's material builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderPreset {
	/// Flat unlit shading.
	#[default]
	Unlit,
}

/// Host-provided import switches; read-only inputs to normalization and
/// material decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSettings {
	/// Assign one skeleton root to every skin.
	pub single_skeleton: bool,
	/// Expose recommended host importer tuning.
	pub recommended_settings: bool,
	/// Shader preset for the downstream material builder.
	pub shader_preset: ShaderPreset,
	/// Ask the host to switch its view transform for raw color output.
	pub adjust_color_space: bool,
}

/// Host importer tuning the session recommends when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostTuning {
	/// Skip generated bone display shapes.
	pub disable_bone_shape: bool,
	/// Bone orientation heuristic name.
	pub bone_heuristic: &'static str,
	/// Merge duplicate vertices after import.
	pub merge_vertices: bool,
}

impl HostTuning {
	/// Tuning applied when recommended settings are requested.
	pub fn recommended() -> Self {
		Self {
			disable_bone_shape: true,
			bone_heuristic: "BLENDER",
			merge_vertices: true,
		}
	}
}

/// One decode session: owns the document, borrows the shared raw buffer, and
/// holds every per-import cache.
///
/// Hooks mirror the host importer's fixed call order: the document hook once,
/// then per-mesh, per-node, and per-material hooks. Non-Supercell documents
/// turn every hook into a no-op.
pub struct ImportSession<'a> {
	/// Normalized document, mutated in place by the hooks.
	pub doc: Document,
	bin: Option<&'a [u8]>,
	settings: ImportSettings,
	active: bool,
	host_tuning: Option<HostTuning>,
	mesh_data_cache: HashMap<usize, Rc<AttributeSet<'a>>>,
	accessor_streams: HashMap<usize, Rc<VertexStream<'a>>>,
	virtual_accessor_offset: usize,
	materials: HashMap<usize, ShaderMaterial>,
}

impl<'a> ImportSession<'a> {
	/// Create a session over a parsed document and the container's raw
	/// buffer.
	pub fn new(doc: Document, bin: Option<&'a [u8]>, settings: ImportSettings) -> Self {
		let active = doc.is_supercell();
		Self {
			doc,
			bin,
			settings,
			active,
			host_tuning: None,
			mesh_data_cache: HashMap::new(),
			accessor_streams: HashMap::new(),
			virtual_accessor_offset: 0,
			materials: HashMap::new(),
		}
	}

	/// Return whether the document carries the vendor extensions.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Settings this session was created with.
	pub fn settings(&self) -> ImportSettings {
		self.settings
	}

	/// Recommended host tuning, present only after the document hook ran with
	/// recommended settings enabled.
	pub fn host_tuning(&self) -> Option<HostTuning> {
		self.host_tuning
	}

	/// Document-level hook: run the normalization pipeline once.
	pub fn before_import_hook(&mut self) -> Result<()> {
		if !self.active {
			return Ok(());
		}

		normalize::mask_component_types(&mut self.doc);
		normalize::relocate_materials(&mut self.doc);
		normalize::rebuild_children(&mut self.doc)?;
		normalize::infer_scenes(&mut self.doc);
		if self.settings.single_skeleton {
			normalize::infer_skeleton_roots(&mut self.doc);
		}
		if self.doc.meshes.is_none() {
			self.doc.meshes = Some(Vec::new());
		}

		if self.settings.recommended_settings {
			self.host_tuning = Some(HostTuning::recommended());
		}

		Ok(())
	}

	/// Per-mesh hook: decode every primitive's vendor geometry and register
	/// virtual accessors for it.
	///
	/// The synthetic index counter restarts just past the real accessor table
	/// on every call; each mesh pass allocates from the same baseline.
	pub fn mesh_options_hook(&mut self, mesh_index: usize) -> Result<()> {
		if !self.active {
			return Ok(());
		}

		self.virtual_accessor_offset = self.doc.accessors.as_ref().map_or(0, Vec::len);

		let meshes_len = self.doc.meshes.as_ref().map_or(0, Vec::len);
		if mesh_index >= meshes_len {
			return Err(GlbError::IndexOutOfRange {
				kind: "mesh",
				index: mesh_index,
				len: meshes_len,
			});
		}

		let primitive_count = self.doc.meshes.as_ref().map_or(0, |meshes| meshes[mesh_index].primitives.len());
		for primitive_index in 0..primitive_count {
			self.decode_primitive(mesh_index, primitive_index)?;
		}

		Ok(())
	}

	/// Per-node hook: clear dangling mesh references.
	pub fn node_sanity_hook(&mut self, node_index: usize) -> Result<()> {
		if !self.active {
			return Ok(());
		}
		normalize::clear_invalid_mesh_ref(&mut self.doc, node_index)
	}

	/// Per-material hook (before host construction): decode the shader
	/// extension block and apply its name to the document material.
	pub fn material_before_hook(&mut self, material_index: usize) -> Result<()> {
		if !self.active {
			return Ok(());
		}

		let materials_len = self.doc.materials.as_ref().map_or(0, Vec::len);
		let Some(block) = self
			.doc
			.materials
			.as_ref()
			.and_then(|materials| materials.get(material_index))
			.and_then(|material| material.extensions.as_ref())
			.and_then(|ext| ext.get(SC_SHADER_EXTENSION))
			.cloned()
		else {
			if material_index >= materials_len {
				return Err(GlbError::IndexOutOfRange {
					kind: "material",
					index: material_index,
					len: materials_len,
				});
			}
			return Ok(());
		};

		let material = ShaderMaterial::from_extension(&self.doc, &block)?;
		if let Some(entry) = self.doc.materials.as_mut().and_then(|materials| materials.get_mut(material_index)) {
			entry.name = Some(material.name.clone());
		}
		self.materials.insert(material_index, material);
		Ok(())
	}

	/// Per-material hook (after host construction): hand the decoded
	/// material to the caller's shader builder.
	pub fn material_after_hook(&mut self, material_index: usize) -> Option<&mut ShaderMaterial> {
		if !self.active {
			return None;
		}
		self.materials.get_mut(&material_index)
	}

	/// Resolve one mesh-data index to its attribute set, decoding on first
	/// use and caching for the rest of the session.
	pub fn resolve_mesh_data(&mut self, index: usize) -> Result<Rc<AttributeSet<'a>>> {
		if let Some(cached) = self.mesh_data_cache.get(&index) {
			return Ok(Rc::clone(cached));
		}

		let odin = self.doc.odin_extension().ok_or(GlbError::MissingMeshData)?;
		let infos = odin.get("meshDataInfos").and_then(Value::as_array).ok_or(GlbError::MissingMeshData)?;
		let view_index = odin
			.get("bufferView")
			.and_then(Value::as_u64)
			.and_then(|raw| usize::try_from(raw).ok())
			.ok_or(GlbError::MissingMeshData)?;

		let entry = infos.get(index).ok_or(GlbError::IndexOutOfRange {
			kind: "meshDataInfo",
			index,
			len: infos.len(),
		})?;
		let info = MeshDataInfo::from_value(entry)?;

		let bin = self.bin.ok_or(GlbError::MissingMeshData)?;
		let data = buffer_view_bytes(&self.doc, bin, view_index)?;

		let set = Rc::new(info.decode(data));
		self.mesh_data_cache.insert(index, Rc::clone(&set));
		Ok(set)
	}

	/// Look up the stream behind an accessor index, the same path real
	/// accessor consumers use for synthetic indices.
	pub fn accessor_stream(&self, index: usize) -> Option<&Rc<VertexStream<'a>>> {
		self.accessor_streams.get(&index)
	}

	fn decode_primitive(&mut self, mesh_index: usize, primitive_index: usize) -> Result<()> {
		let info_index = self
			.doc
			.meshes
			.as_ref()
			.and_then(|meshes| meshes.get(mesh_index))
			.and_then(|mesh| mesh.primitives.get(primitive_index))
			.and_then(|primitive| primitive.extensions.as_ref())
			.and_then(|ext| ext.get(SC_ODIN_EXTENSION))
			.and_then(|ext| ext.get("meshDataInfoIndex"))
			.and_then(Value::as_u64)
			.and_then(|raw| usize::try_from(raw).ok());
		let Some(info_index) = info_index else {
			return Ok(());
		};

		let set = self.resolve_mesh_data(info_index)?;

		// Rewrite the primitive's attribute table to point at freshly
		// allocated synthetic accessor indices, registered in the same lookup
		// real accessors resolve through.
		let mut attributes = BTreeMap::new();
		for (name, stream) in set.iter() {
			let synthetic = self.virtual_accessor_offset;
			self.virtual_accessor_offset += 1;
			self.accessor_streams.insert(synthetic, Rc::clone(stream));
			attributes.insert((*name).to_owned(), synthetic);
		}

		if let Some(primitive) = self
			.doc
			.meshes
			.as_mut()
			.and_then(|meshes| meshes.get_mut(mesh_index))
			.and_then(|mesh| mesh.primitives.get_mut(primitive_index))
		{
			primitive.attributes = attributes;
		}

		Ok(())
	}
}
