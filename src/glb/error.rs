use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, GlbError>;

/// Errors produced while parsing, normalizing, and decoding Supercell glTF
/// container data.
#[derive(Debug, Error)]
pub enum GlbError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Structural chunk JSON failed to parse.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Leading file magic is not `glTF`.
	#[error("not a glTF/glb file (magic={magic:?})")]
	BadMagic {
		/// First four bytes of the container.
		magic: [u8; 4],
	},
	/// Container version field is not the supported major version.
	#[error("unsupported glb version {version} (expected 2)")]
	UnsupportedVersion {
		/// Parsed version field.
		version: u32,
	},
	/// Declared total length does not match the actual buffer length.
	#[error("declared length {declared} does not match buffer length {actual}")]
	LengthMismatch {
		/// Length from the container header.
		declared: u32,
		/// Actual byte count handed to the parser.
		actual: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// First chunk is neither the JSON tag nor the vendor flat-table tag.
	#[error("bad first chunk tag {tag:?} (expected JSON or FLA2)")]
	BadFirstChunk {
		/// Offending chunk tag.
		tag: [u8; 4],
	},
	/// Vendor flat-table chunk schema is not available to this decoder.
	#[error("FLA2 table chunk ({size} bytes) has no supported schema")]
	FlatTableUnsupported {
		/// Size of the undecodable chunk payload.
		size: usize,
	},
	/// Scene-level mesh data extension fields are absent.
	#[error("missing Supercell mesh data (meshDataInfos/bufferView)")]
	MissingMeshData,
	/// An index referenced a sequence position that does not exist.
	#[error("{kind} index out of range: idx={index}, len={len}")]
	IndexOutOfRange {
		/// Logical sequence kind being indexed.
		kind: &'static str,
		/// Offending index value.
		index: usize,
		/// Length of the indexed sequence.
		len: usize,
	},
	/// Vertex attribute format code is not in the catalog.
	#[error("unknown attribute format code {code}")]
	UnknownAttributeFormat {
		/// Offending format code.
		code: u64,
	},
	/// Vertex attribute type code has no semantic name mapping.
	#[error("unknown attribute type code {code}")]
	UnknownAttributeKind {
		/// Offending attribute type code.
		code: u64,
	},
	/// Vertex stream read fell outside the backing buffer region.
	#[error("vertex stream read out of bounds: at={at}, need={need}, len={len}")]
	StreamOutOfBounds {
		/// Absolute byte offset of the attempted read.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Backing region length.
		len: usize,
	},
	/// Mesh data descriptor entry is malformed.
	#[error("malformed vertex descriptor: {detail}")]
	BadVertexDescriptor {
		/// Human-readable description of the malformed field.
		detail: &'static str,
	},
	/// Material blend mode value has no known enumeration entry.
	#[error("unknown blend mode {value}")]
	UnknownBlendMode {
		/// Offending blend mode integer.
		value: i64,
	},
	/// Material property value shape could not be inferred.
	#[error("cannot infer property type for {key:?}")]
	BadPropertyValue {
		/// Property key whose value was uninferable.
		key: String,
	},
}
