#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "scglb", about = "Supercell glTF container inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print container header and chunk statistics.
	Info(cmd::info::Args),
	/// Dump the normalized document as JSON.
	Doc(cmd::doc::Args),
	/// Decode one mesh-data index and print its attribute streams.
	Mesh(cmd::mesh::Args),
	/// Decode shader materials and dump them as JSON.
	Materials(cmd::materials::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> scglb::glb::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Doc(args) => cmd::doc::run(args),
		Commands::Mesh(args) => cmd::mesh::run(args),
		Commands::Materials(args) => cmd::materials::run(args),
	}
}
