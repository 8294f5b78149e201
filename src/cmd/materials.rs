use std::path::PathBuf;

use scglb::glb::{ImportSettings, Result};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
}

/// Decode every shader material and dump the results as JSON.
pub fn run(args: Args) -> Result<()> {
	let Args { path } = args;

	let bytes = std::fs::read(&path)?;
	let mut session = crate::cmd::session_from_bytes(&bytes, ImportSettings::default())?;

	let count = session.doc.materials.as_ref().map_or(0, Vec::len);
	let mut decoded = Vec::new();
	for index in 0..count {
		session.material_before_hook(index)?;
		if let Some(material) = session.material_after_hook(index) {
			decoded.push(material.clone());
		}
	}

	println!("{}", serde_json::to_string_pretty(&decoded)?);
	Ok(())
}
