use std::path::PathBuf;

use scglb::glb::{ImportSettings, Result};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Assign one skeleton root to every skin.
	#[arg(long)]
	pub single_skeleton: bool,
}

/// Parse, normalize, and dump the document as pretty JSON.
pub fn run(args: Args) -> Result<()> {
	let Args { path, single_skeleton } = args;

	let bytes = std::fs::read(&path)?;
	let settings = ImportSettings {
		single_skeleton,
		..Default::default()
	};
	let session = crate::cmd::session_from_bytes(&bytes, settings)?;

	println!("{}", serde_json::to_string_pretty(&session.doc)?);
	Ok(())
}
