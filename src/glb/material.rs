use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use crate::glb::document::Document;
use crate::glb::{GlbError, Result};

/// Material compositing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlendMode {
	/// Alpha blending.
	Blend,
	/// Hashed (stochastic) transparency.
	Hashed,
	/// Alpha clip.
	Clip,
	/// Fully opaque.
	Opaque,
}

impl BlendMode {
	/// Map the vendor's blend mode integer to the enumeration.
	pub fn from_value(value: i64) -> Result<Self> {
		Ok(match value {
			0 => Self::Blend,
			1 => Self::Hashed,
			2 => Self::Clip,
			4 => Self::Opaque,
			_ => return Err(GlbError::UnknownBlendMode { value }),
		})
	}
}

/// A texture reference with its `#`-delimited modifier keywords split off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureRef {
	/// Base path without the keyword suffix.
	pub path: String,
	/// Ordered modifier keywords.
	pub keywords: Vec<String>,
}

impl TextureRef {
	/// Split `path#kw1+kw2` into a base path and keyword list.
	pub fn parse(raw: &str) -> Self {
		match raw.split_once('#') {
			Some((path, keywords)) => Self {
				path: path.to_owned(),
				keywords: keywords.split('+').map(str::to_owned).collect(),
			},
			None => Self {
				path: raw.to_owned(),
				keywords: Vec::new(),
			},
		}
	}
}

/// One typed shader property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ShaderProperty {
	/// Scalar float.
	Float(f32),
	/// Float vector.
	FloatVector(Vec<f32>),
	/// Boolean flag.
	Boolean(bool),
	/// Texture reference.
	Texture(TextureRef),
}

/// Decoded vendor shader material: blend mode, feature constants, and a
/// typed property bag.
///
/// Constant and property reads are tracked so a downstream builder's leftover
/// entries can be reported instead of silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ShaderMaterial {
	/// Material name.
	pub name: String,
	/// Shader program name.
	pub shader: String,
	/// Compositing mode.
	pub blend_mode: BlendMode,
	constants: Vec<String>,
	properties: BTreeMap<String, ShaderProperty>,
	#[serde(skip)]
	used_constants: HashSet<String>,
	#[serde(skip)]
	used_properties: HashSet<String>,
}

impl ShaderMaterial {
	/// Decode a material's shader extension block.
	pub fn from_extension(doc: &Document, block: &Value) -> Result<Self> {
		let name = block.get("name").and_then(Value::as_str).unwrap_or("").to_owned();
		let shader = block.get("shader").and_then(Value::as_str).unwrap_or("").to_owned();

		// Absent blendMode falls back to opaque; a present but unknown value
		// is a decode error.
		let blend_mode = match block.get("blendMode").and_then(Value::as_i64) {
			Some(value) => BlendMode::from_value(value)?,
			None => BlendMode::Opaque,
		};

		let constants = block
			.get("constants")
			.and_then(Value::as_array)
			.map(|entries| {
				entries
					.iter()
					.filter_map(Value::as_str)
					.map(str::to_owned)
					.collect()
			})
			.unwrap_or_default();

		let mut properties = BTreeMap::new();
		if let Some(variables) = block.get("variables").and_then(Value::as_object) {
			for (key, value) in variables {
				decode_variable(doc, &mut properties, key, value)?;
			}
		}

		Ok(Self {
			name,
			shader,
			blend_mode,
			constants,
			properties,
			used_constants: HashSet::new(),
			used_properties: HashSet::new(),
		})
	}

	/// Return whether `key` is a declared feature constant, marking it
	/// consumed.
	pub fn has_constant(&mut self, key: &str) -> bool {
		if self.constants.iter().any(|constant| constant == key) {
			self.used_constants.insert(key.to_owned());
			return true;
		}
		false
	}

	/// Return the property named `key`, marking it consumed.
	pub fn property(&mut self, key: &str) -> Option<&ShaderProperty> {
		if self.properties.contains_key(key) {
			self.used_properties.insert(key.to_owned());
		}
		self.properties.get(key)
	}

	/// Declared feature constants.
	pub fn constants(&self) -> &[String] {
		&self.constants
	}

	/// All decoded properties in name order.
	pub fn properties(&self) -> impl Iterator<Item = (&str, &ShaderProperty)> {
		self.properties.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Constants never consumed through [`has_constant`](Self::has_constant).
	pub fn unused_constants(&self) -> Vec<&str> {
		self.constants
			.iter()
			.filter(|constant| !self.used_constants.contains(*constant))
			.map(String::as_str)
			.collect()
	}

	/// Properties never consumed through [`property`](Self::property).
	pub fn unused_properties(&self) -> Vec<(&str, &ShaderProperty)> {
		self.properties
			.iter()
			.filter(|(key, _)| !self.used_properties.contains(*key))
			.map(|(key, value)| (key.as_str(), value))
			.collect()
	}
}

fn decode_variable(
	doc: &Document,
	properties: &mut BTreeMap<String, ShaderProperty>,
	key: &str,
	value: &Value,
) -> Result<()> {
	match key {
		"booleans" => {
			for (name, entry) in typed_group(value, key)? {
				let flag = entry.as_bool().ok_or_else(|| bad_property(name))?;
				properties.insert(name.clone(), ShaderProperty::Boolean(flag));
			}
		}
		"floats" => {
			for (name, entry) in typed_group(value, key)? {
				let number = entry.as_f64().ok_or_else(|| bad_property(name))?;
				properties.insert(name.clone(), ShaderProperty::Float(number as f32));
			}
		}
		"floatVectors" => {
			for (name, entry) in typed_group(value, key)? {
				properties.insert(name.clone(), ShaderProperty::FloatVector(float_vector(name, entry)?));
			}
		}
		"textures" => {
			for (name, entry) in typed_group(value, key)? {
				let raw = entry.as_str().ok_or_else(|| bad_property(name))?;
				properties.insert(name.clone(), ShaderProperty::Texture(TextureRef::parse(raw)));
			}
		}
		_ => {
			properties.insert(key.to_owned(), infer_property(doc, key, value)?);
		}
	}
	Ok(())
}

/// Infer an ungrouped property's type from its value shape.
fn infer_property(doc: &Document, key: &str, value: &Value) -> Result<ShaderProperty> {
	match value {
		Value::Array(_) => Ok(ShaderProperty::FloatVector(float_vector(key, value)?)),
		Value::Bool(flag) => Ok(ShaderProperty::Boolean(*flag)),
		Value::Number(number) => {
			let number = number.as_f64().ok_or_else(|| bad_property(key))?;
			Ok(ShaderProperty::Float(number as f32))
		}
		Value::Object(map) => {
			let index = map.get("index").and_then(Value::as_u64).ok_or_else(|| bad_property(key))?;
			let index = usize::try_from(index).map_err(|_| bad_property(key))?;
			let images = doc.images.as_deref().unwrap_or(&[]);
			let image = images.get(index).ok_or(GlbError::IndexOutOfRange {
				kind: "image",
				index,
				len: images.len(),
			})?;
			let uri = image.uri.as_deref().unwrap_or("");
			Ok(ShaderProperty::Texture(TextureRef::parse(uri)))
		}
		_ => Err(bad_property(key)),
	}
}

fn typed_group<'a>(value: &'a Value, key: &str) -> Result<&'a serde_json::Map<String, Value>> {
	value.as_object().ok_or_else(|| bad_property(key))
}

fn float_vector(key: &str, value: &Value) -> Result<Vec<f32>> {
	let entries = value.as_array().ok_or_else(|| bad_property(key))?;
	entries
		.iter()
		.map(|entry| entry.as_f64().map(|number| number as f32).ok_or_else(|| bad_property(key)))
		.collect()
}

fn bad_property(key: &str) -> GlbError {
	GlbError::BadPropertyValue { key: key.to_owned() }
}
