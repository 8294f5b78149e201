//! Idempotent document fix-up passes run once before geometry and material
//! decoding.
//!
//! Vendor files omit children lists, scene lists, and skeleton roots, and
//! stash materials inside the document-level extension block; these passes
//! rebuild the standard shape in place.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::glb::document::{COMPONENT_TYPE_MASK, Document, Material, SC_ODIN_EXTENSION, SC_SHADER_EXTENSION, Scene};
use crate::glb::{GlbError, Result};

/// Strip the vendor high-16-bit flag from every accessor component type.
pub fn mask_component_types(doc: &mut Document) {
	for accessor in doc.accessors.iter_mut().flatten() {
		accessor.component_type &= COMPONENT_TYPE_MASK;
	}
}

/// Replace the material list with materials lifted out of the Odin
/// extension's `materials` array.
///
/// Pre-existing standard materials are discarded, not merged; each entry is
/// rewrapped as a material whose shader extension carries the raw block.
pub fn relocate_materials(doc: &mut Document) {
	let Some(entries) = doc.odin_extension().and_then(|ext| ext.get("materials")).and_then(Value::as_array).cloned()
	else {
		return;
	};

	let materials = entries
		.into_iter()
		.map(|entry| {
			let mut extensions = Map::new();
			extensions.insert(SC_SHADER_EXTENSION.to_owned(), entry);
			Material {
				name: None,
				extensions: Some(extensions),
			}
		})
		.collect();

	doc.materials = Some(materials);
}

/// Rebuild children lists from per-node `parent` extension fields.
///
/// Only forward parent-to-child links are added, so the result is cycle-free
/// by construction. Nodes without the extension are left untouched.
pub fn rebuild_children(doc: &mut Document) -> Result<()> {
	let nodes = doc.nodes.as_mut().map(Vec::as_mut_slice).unwrap_or(&mut []);
	let len = nodes.len();

	let mut links: Vec<(usize, usize)> = Vec::new();
	for (index, node) in nodes.iter().enumerate() {
		let parent = node
			.extensions
			.as_ref()
			.and_then(|ext| ext.get(SC_ODIN_EXTENSION))
			.and_then(|ext| ext.get("parent"))
			.and_then(Value::as_u64);
		let Some(parent) = parent else {
			continue;
		};

		let parent = usize::try_from(parent).unwrap_or(usize::MAX);
		if parent >= len {
			return Err(GlbError::IndexOutOfRange {
				kind: "node parent",
				index: parent,
				len,
			});
		}
		links.push((parent, index));
	}

	for (parent, child) in links {
		let children = nodes[parent].children.get_or_insert_with(Vec::new);
		if !children.contains(&child) {
			children.push(child);
		}
	}

	Ok(())
}

/// Synthesize a scene from root nodes when the scene list is absent.
///
/// Roots are exactly the node indices never referenced as any node's child.
pub fn infer_scenes(doc: &mut Document) {
	if doc.scenes.is_some() {
		return;
	}

	let nodes = doc.nodes.as_deref().unwrap_or(&[]);
	let mut referenced: HashSet<usize> = HashSet::new();
	for node in nodes {
		referenced.extend(node.children.iter().flatten().copied());
	}

	let roots: Vec<usize> = (0..nodes.len()).filter(|index| !referenced.contains(index)).collect();
	doc.scenes = Some(vec![Scene {
		name: None,
		nodes: Some(roots),
	}]);
}

/// Return the root node indices of the first scene.
pub fn root_nodes(doc: &Document) -> Vec<usize> {
	doc.scenes
		.iter()
		.flatten()
		.next()
		.and_then(|scene| scene.nodes.clone())
		.unwrap_or_default()
}

/// Assign a skeleton root to every skin (single-skeleton mode).
///
/// With one root, every skin gets it. With several, each skin gets the first
/// root whose descendant closure intersects the skin's joints; closures are
/// computed with an explicit stack to bound depth.
pub fn infer_skeleton_roots(doc: &mut Document) {
	let roots = root_nodes(doc);
	if roots.is_empty() {
		return;
	}

	if roots.len() == 1 {
		for skin in doc.skins.iter_mut().flatten() {
			skin.skeleton = Some(roots[0]);
		}
		return;
	}

	let nodes = doc.nodes.as_deref().unwrap_or(&[]);
	let closures: Vec<(usize, HashSet<usize>)> = roots
		.iter()
		.map(|root| {
			let mut descendants = HashSet::new();
			let mut stack: Vec<usize> = nodes
				.get(*root)
				.and_then(|node| node.children.clone())
				.unwrap_or_default();
			while let Some(index) = stack.pop() {
				if !descendants.insert(index) {
					continue;
				}
				if let Some(node) = nodes.get(index) {
					stack.extend(node.children.iter().flatten().copied());
				}
			}
			(*root, descendants)
		})
		.collect();

	for skin in doc.skins.iter_mut().flatten() {
		for (root, descendants) in &closures {
			if skin.joints.iter().any(|joint| descendants.contains(joint)) {
				skin.skeleton = Some(*root);
				break;
			}
		}
	}
}

/// Clear a node's mesh reference when it points past the mesh list.
///
/// The node is reclassified as a non-mesh dummy so downstream scene
/// construction does not fault on the dangling index.
pub fn clear_invalid_mesh_ref(doc: &mut Document, node_index: usize) -> Result<()> {
	let meshes_len = doc.meshes.as_ref().map_or(0, Vec::len);
	let nodes = doc.nodes.as_mut().map(Vec::as_mut_slice).unwrap_or(&mut []);
	let len = nodes.len();
	let node = nodes.get_mut(node_index).ok_or(GlbError::IndexOutOfRange {
		kind: "node",
		index: node_index,
		len,
	})?;

	if let Some(mesh) = node.mesh
		&& mesh >= meshes_len
	{
		node.mesh = None;
		node.dummy = true;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::glb::document::{Accessor, Node, Skin};

	use super::*;

	fn parented_node(parent: Option<usize>) -> Node {
		let mut node = Node::default();
		if let Some(parent) = parent {
			let mut ext = Map::new();
			ext.insert(SC_ODIN_EXTENSION.to_owned(), json!({ "parent": parent }));
			node.extensions = Some(ext);
		}
		node
	}

	#[test]
	fn component_type_masking_strips_high_bits() {
		let mut doc = Document {
			accessors: Some(vec![
				Accessor {
					component_type: 0x0001_1406,
					..Default::default()
				},
				Accessor {
					component_type: 5126,
					..Default::default()
				},
			]),
			..Default::default()
		};

		mask_component_types(&mut doc);
		let accessors = doc.accessors.as_ref().expect("accessors present");
		assert_eq!(accessors[0].component_type, 0x1406);
		assert_eq!(accessors[1].component_type, 5126);

		// Idempotent.
		mask_component_types(&mut doc);
		assert_eq!(doc.accessors.as_ref().expect("accessors present")[0].component_type, 0x1406);
	}

	#[test]
	fn children_rebuilt_from_parent_pointers() {
		let mut doc = Document {
			nodes: Some(vec![
				parented_node(None),
				parented_node(Some(0)),
				parented_node(Some(0)),
				parented_node(Some(1)),
			]),
			..Default::default()
		};

		rebuild_children(&mut doc).expect("parents in range");
		infer_scenes(&mut doc);

		let nodes = doc.nodes.as_ref().expect("nodes present");
		assert_eq!(nodes[0].children, Some(vec![1, 2]));
		assert_eq!(nodes[1].children, Some(vec![3]));
		assert_eq!(nodes[2].children, None);
		assert_eq!(root_nodes(&doc), vec![0]);
	}

	#[test]
	fn rebuild_is_idempotent() {
		let mut doc = Document {
			nodes: Some(vec![parented_node(None), parented_node(Some(0))]),
			..Default::default()
		};

		rebuild_children(&mut doc).expect("parents in range");
		rebuild_children(&mut doc).expect("parents in range");
		assert_eq!(doc.nodes.as_ref().expect("nodes present")[0].children, Some(vec![1]));
	}

	#[test]
	fn out_of_range_parent_is_fatal() {
		let mut doc = Document {
			nodes: Some(vec![parented_node(Some(9))]),
			..Default::default()
		};
		assert!(matches!(
			rebuild_children(&mut doc),
			Err(GlbError::IndexOutOfRange { kind: "node parent", index: 9, len: 1 })
		));
	}

	#[test]
	fn skeleton_goes_to_first_root_with_matching_closure() {
		let node_with_children = |children: Vec<usize>| Node {
			children: Some(children),
			..Default::default()
		};

		let mut doc = Document {
			nodes: Some(vec![
				node_with_children(vec![2, 3]),
				node_with_children(vec![4, 5]),
				Node::default(),
				Node::default(),
				Node::default(),
				Node::default(),
			]),
			scenes: Some(vec![Scene {
				name: None,
				nodes: Some(vec![0, 1]),
			}]),
			skins: Some(vec![Skin {
				joints: vec![3, 5],
				..Default::default()
			}]),
			..Default::default()
		};

		infer_skeleton_roots(&mut doc);
		assert_eq!(doc.skins.as_ref().expect("skins present")[0].skeleton, Some(0));
	}

	#[test]
	fn single_root_is_assigned_to_every_skin() {
		let mut doc = Document {
			nodes: Some(vec![Node::default()]),
			scenes: Some(vec![Scene {
				name: None,
				nodes: Some(vec![0]),
			}]),
			skins: Some(vec![Skin::default(), Skin::default()]),
			..Default::default()
		};

		infer_skeleton_roots(&mut doc);
		for skin in doc.skins.as_ref().expect("skins present") {
			assert_eq!(skin.skeleton, Some(0));
		}
	}

	#[test]
	fn dangling_mesh_reference_is_cleared() {
		let mut doc = Document {
			nodes: Some(vec![Node {
				mesh: Some(3),
				..Default::default()
			}]),
			meshes: Some(Vec::new()),
			..Default::default()
		};

		clear_invalid_mesh_ref(&mut doc, 0).expect("node in range");
		let node = &doc.nodes.as_ref().expect("nodes present")[0];
		assert_eq!(node.mesh, None);
		assert!(node.dummy);

		assert!(matches!(
			clear_invalid_mesh_ref(&mut doc, 5),
			Err(GlbError::IndexOutOfRange { kind: "node", .. })
		));
	}

	#[test]
	fn materials_are_relocated_from_extension_block() {
		let mut ext = Map::new();
		ext.insert(
			SC_ODIN_EXTENSION.to_owned(),
			json!({ "materials": [{"name": "body", "blendMode": 4}] }),
		);
		let mut doc = Document {
			extensions: Some(ext),
			materials: Some(vec![Material {
				name: Some("stale".to_owned()),
				extensions: None,
			}]),
			..Default::default()
		};

		relocate_materials(&mut doc);
		let materials = doc.materials.as_ref().expect("materials present");
		assert_eq!(materials.len(), 1);
		let block = materials[0]
			.extensions
			.as_ref()
			.and_then(|ext| ext.get(SC_SHADER_EXTENSION))
			.expect("shader extension present");
		assert_eq!(block.get("name").and_then(Value::as_str), Some("body"));
	}
}
