use crate::glb::bytes::Cursor;
use crate::glb::document::Document;
use crate::glb::{GlbError, Result, flat};

/// Leading container magic.
pub const GLB_MAGIC: [u8; 4] = *b"glTF";
/// Supported container major version.
pub const GLB_VERSION: u32 = 2;
/// Fixed container header size in bytes.
pub const GLB_HEADER_SIZE: usize = 12;

/// Standard structural chunk tag.
pub const CHUNK_JSON: [u8; 4] = *b"JSON";
/// Vendor flat-table structural chunk tag.
pub const CHUNK_FLAT: [u8; 4] = *b"FLA2";
/// Raw binary buffer chunk tag.
pub const CHUNK_BIN: [u8; 4] = *b"BIN\0";

/// One parsed container chunk.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
	/// Four-byte chunk type tag.
	pub tag: [u8; 4],
	/// Chunk payload without padding.
	pub payload: &'a [u8],
	/// Byte offset of the chunk header within the container.
	pub file_offset: usize,
}

/// Iterator over container chunks starting past the fixed header.
pub struct ChunkIter<'a> {
	cursor: Cursor<'a>,
	offset_base: usize,
	done: bool,
}

impl<'a> ChunkIter<'a> {
	/// Iterate chunks of `bytes` beginning at `offset`.
	pub fn new(bytes: &'a [u8], offset: usize) -> Self {
		let slice = bytes.get(offset..).unwrap_or(&[]);
		Self {
			cursor: Cursor::new(slice),
			offset_base: offset,
			done: false,
		}
	}
}

impl<'a> Iterator for ChunkIter<'a> {
	type Item = Result<Chunk<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		if self.cursor.remaining() == 0 {
			self.done = true;
			return None;
		}

		let file_offset = self.offset_base + self.cursor.pos();
		let parsed = (|| {
			let len = self.cursor.read_u32_le()? as usize;
			let tag = self.cursor.read_tag4()?;
			let payload = self.cursor.read_exact(len)?;
			self.cursor.align4()?;
			Ok(Chunk { tag, payload, file_offset })
		})();

		if parsed.is_err() {
			self.done = true;
		}

		Some(parsed)
	}
}

/// Parsed container envelope: one structural chunk plus the optional shared
/// raw buffer chunk.
#[derive(Debug, Clone, Copy)]
pub struct Glb<'a> {
	/// Container version field.
	pub version: u32,
	/// Structural chunk (`JSON` or `FLA2`).
	pub structure: Chunk<'a>,
	/// Shared raw buffer from the `BIN\0` chunk, if present.
	pub bin: Option<&'a [u8]>,
}

impl<'a> Glb<'a> {
	/// Validate the container header and walk its chunks.
	pub fn parse(bytes: &'a [u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		let magic = cursor.read_tag4().map_err(|_| GlbError::BadMagic {
			magic: first_four(bytes),
		})?;
		if magic != GLB_MAGIC {
			return Err(GlbError::BadMagic { magic });
		}

		let version = cursor.read_u32_le()?;
		if version != GLB_VERSION {
			return Err(GlbError::UnsupportedVersion { version });
		}

		let declared = cursor.read_u32_le()?;
		if declared as usize != bytes.len() {
			return Err(GlbError::LengthMismatch {
				declared,
				actual: bytes.len(),
			});
		}

		let mut chunks = ChunkIter::new(bytes, GLB_HEADER_SIZE);
		let structure = chunks.next().ok_or(GlbError::UnexpectedEof {
			at: GLB_HEADER_SIZE,
			need: 8,
			rem: 0,
		})??;
		if structure.tag != CHUNK_JSON && structure.tag != CHUNK_FLAT {
			return Err(GlbError::BadFirstChunk { tag: structure.tag });
		}

		let mut bin = None;
		if let Some(chunk) = chunks.next() {
			let chunk = chunk?;
			if chunk.tag == CHUNK_BIN {
				bin = Some(chunk.payload);
			}
		}

		Ok(Self { version, structure, bin })
	}

	/// Decode the structural chunk into a document.
	pub fn document(&self) -> Result<Document> {
		if self.structure.tag == CHUNK_FLAT {
			return flat::decode_flat_table(self.structure.payload);
		}
		Ok(serde_json::from_slice(self.structure.payload)?)
	}
}

fn first_four(bytes: &[u8]) -> [u8; 4] {
	let mut out = [0_u8; 4];
	for (dst, src) in out.iter_mut().zip(bytes.iter()) {
		*dst = *src;
	}
	out
}
