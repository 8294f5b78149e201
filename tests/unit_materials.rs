#![allow(missing_docs)]

use serde_json::json;

use scglb::glb::{
	BlendMode, Glb, ImportSession, ImportSettings, SC_ODIN_EXTENSION, SC_SHADER_EXTENSION, ShaderProperty,
};

fn container(doc: &serde_json::Value) -> Vec<u8> {
	let mut json_bytes = serde_json::to_vec(doc).expect("document serializes");
	while json_bytes.len() % 4 != 0 {
		json_bytes.push(b' ');
	}

	let mut out = Vec::new();
	out.extend_from_slice(b"glTF");
	out.extend_from_slice(&2_u32.to_le_bytes());
	out.extend_from_slice(&0_u32.to_le_bytes());
	out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
	out.extend_from_slice(b"JSON");
	out.extend_from_slice(&json_bytes);

	let total = out.len() as u32;
	out[8..12].copy_from_slice(&total.to_le_bytes());
	out
}

fn material_doc() -> serde_json::Value {
	json!({
		"extensionsUsed": [SC_SHADER_EXTENSION],
		"extensions": {
			SC_ODIN_EXTENSION: {
				"materials": [
					{
						"name": "hero_body",
						"shader": "uber",
						"blendMode": 2,
						"constants": ["USE_FOG"],
						"variables": {
							"floats": {"Glossiness": 0.5},
							"textures": {"Diffuse": "body.png#repeat+clamp"},
							"Tint": [1.0, 0.0, 0.0, 1.0]
						}
					}
				]
			}
		},
		"materials": [{"name": "standard_fallback"}],
		"images": [{"uri": "atlas.png"}]
	})
}

#[test]
fn relocated_materials_decode_through_hooks() {
	let bytes = container(&material_doc());
	let glb = Glb::parse(&bytes).expect("container parses");
	let doc = glb.document().expect("document parses");

	let mut session = ImportSession::new(doc, glb.bin, ImportSettings::default());
	session.before_import_hook().expect("document hook succeeds");

	// The extension list replaced the standard materials wholesale.
	let materials = session.doc.materials.as_ref().expect("materials present");
	assert_eq!(materials.len(), 1);
	assert!(materials[0].name.is_none());

	session.material_before_hook(0).expect("material hook succeeds");
	assert_eq!(
		session.doc.materials.as_ref().expect("materials present")[0].name.as_deref(),
		Some("hero_body")
	);

	let material = session.material_after_hook(0).expect("material decoded");
	assert_eq!(material.blend_mode, BlendMode::Clip);
	assert_eq!(material.shader, "uber");

	assert!(material.has_constant("USE_FOG"));
	assert_eq!(material.property("Glossiness"), Some(&ShaderProperty::Float(0.5)));
	let Some(ShaderProperty::Texture(texture)) = material.property("Diffuse").cloned() else {
		panic!("Diffuse is a texture");
	};
	assert_eq!(texture.path, "body.png");
	assert_eq!(texture.keywords, vec!["repeat".to_owned(), "clamp".to_owned()]);

	let unused: Vec<&str> = material.unused_properties().into_iter().map(|(key, _)| key).collect();
	assert_eq!(unused, vec!["Tint"]);
	assert!(material.unused_constants().is_empty());
}

#[test]
fn material_without_shader_extension_is_skipped() {
	let doc = json!({
		"extensionsUsed": [SC_SHADER_EXTENSION],
		"materials": [{"name": "plain"}]
	});
	let bytes = container(&doc);
	let glb = Glb::parse(&bytes).expect("container parses");

	let mut session = ImportSession::new(glb.document().expect("document parses"), glb.bin, ImportSettings::default());
	session.before_import_hook().expect("document hook succeeds");
	session.material_before_hook(0).expect("plain material is a no-op");
	assert!(session.material_after_hook(0).is_none());
}

#[test]
fn non_supercell_documents_are_untouched() {
	let doc = json!({
		"nodes": [{"name": "a"}],
		"materials": [{"name": "plain"}]
	});
	let bytes = container(&doc);
	let glb = Glb::parse(&bytes).expect("container parses");

	let mut session = ImportSession::new(glb.document().expect("document parses"), glb.bin, ImportSettings::default());
	assert!(!session.is_active());
	session.before_import_hook().expect("no-op succeeds");
	assert!(session.doc.scenes.is_none());
	assert_eq!(
		session.doc.materials.as_ref().expect("materials present")[0].name.as_deref(),
		Some("plain")
	);
}
