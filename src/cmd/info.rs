use std::path::PathBuf;

use scglb::glb::{CHUNK_FLAT, ChunkIter, GLB_HEADER_SIZE, Glb, Result};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
}

/// Print container header fields and per-chunk statistics.
pub fn run(args: Args) -> Result<()> {
	let Args { path } = args;

	let bytes = std::fs::read(&path)?;
	let glb = Glb::parse(&bytes)?;

	println!("path: {}", path.display());
	println!("version: {}", glb.version);
	println!("total_length: {}", bytes.len());
	println!("structure_tag: {}", tag_label(glb.structure.tag));
	println!("bin_length: {}", glb.bin.map_or(0, <[u8]>::len));

	println!("chunks:");
	for chunk in ChunkIter::new(&bytes, GLB_HEADER_SIZE) {
		let chunk = chunk?;
		println!("  {} at {}: {} bytes", tag_label(chunk.tag), chunk.file_offset, chunk.payload.len());
	}

	if glb.structure.tag == CHUNK_FLAT {
		println!("document: FLA2 table (schema unsupported)");
		return Ok(());
	}

	let doc = glb.document()?;
	println!("supercell: {}", doc.is_supercell());
	println!("nodes: {}", doc.nodes.as_ref().map_or(0, Vec::len));
	println!("meshes: {}", doc.meshes.as_ref().map_or(0, Vec::len));
	println!("materials: {}", doc.materials.as_ref().map_or(0, Vec::len));
	println!("skins: {}", doc.skins.as_ref().map_or(0, Vec::len));
	println!("accessors: {}", doc.accessors.as_ref().map_or(0, Vec::len));

	Ok(())
}

fn tag_label(tag: [u8; 4]) -> String {
	let mut out = String::new();
	for byte in tag {
		if byte == 0 {
			continue;
		}
		if byte.is_ascii_graphic() || byte == b' ' {
			out.push(char::from(byte));
		} else {
			out.push('.');
		}
	}
	if out.is_empty() { "....".to_owned() } else { out }
}
