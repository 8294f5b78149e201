use std::path::PathBuf;

use scglb::glb::{ImportSettings, Result};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Mesh-data index to decode.
	#[arg(long, default_value_t = 0)]
	pub index: usize,
	/// Number of leading elements to print per attribute.
	#[arg(long, default_value_t = 3)]
	pub count: usize,
}

/// Resolve one mesh-data index and print its decoded attribute streams.
pub fn run(args: Args) -> Result<()> {
	let Args { path, index, count } = args;

	let bytes = std::fs::read(&path)?;
	let mut session = crate::cmd::session_from_bytes(&bytes, ImportSettings::default())?;
	let set = session.resolve_mesh_data(index)?;

	println!("mesh_data_index: {index}");
	println!("attributes: {}", set.len());
	for (name, stream) in set.iter() {
		println!("  {name}: {:?}", stream.format());
		for element in 0..count {
			match stream.read(element) {
				Ok(value) => println!("    [{element}] {:?}", value.as_slice()),
				Err(_) => break,
			}
		}
	}

	Ok(())
}
