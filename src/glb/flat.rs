//! Vendor flat-table structural chunk (`FLA2`) decoding.
//!
//! The vendor replaces the standard JSON chunk with a proprietary flat binary
//! table. The contract of this module is its output shape only: a [`Document`]
//! structurally equivalent to what the JSON path produces. The table's byte
//! layout is not publicly specified, so decoding is refused with a precise
//! error until that schema is supplied.

use crate::glb::document::Document;
use crate::glb::{GlbError, Result};

/// Decode a `FLA2` structural chunk into a document.
///
/// Currently always fails with [`GlbError::FlatTableUnsupported`]; callers
/// should treat such files as undecodable rather than guessing at field
/// semantics.
pub fn decode_flat_table(bytes: &[u8]) -> Result<Document> {
	if bytes.is_empty() {
		return Err(GlbError::UnexpectedEof { at: 0, need: 4, rem: 0 });
	}

	Err(GlbError::FlatTableUnsupported { size: bytes.len() })
}
