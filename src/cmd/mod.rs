/// Normalized document dump command.
pub mod doc;
/// Container-level information command.
pub mod info;
/// Shader material dump command.
pub mod materials;
/// Mesh attribute decode command.
pub mod mesh;

use scglb::glb::{Glb, ImportSession, ImportSettings, Result};

/// Parse container bytes and run the document-level hook.
pub fn session_from_bytes(bytes: &[u8], settings: ImportSettings) -> Result<ImportSession<'_>> {
	let glb = Glb::parse(bytes)?;
	let doc = glb.document()?;
	let mut session = ImportSession::new(doc, glb.bin, settings);
	session.before_import_hook()?;
	Ok(session)
}
