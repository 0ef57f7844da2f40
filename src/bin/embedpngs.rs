#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	log::error,
	rme_tools::{logging, pngfiles::embedDir},
	std::{path::PathBuf, process},
};

/// Converts every PNG in a directory into byte arrays for embedding into the C++ build.
#[derive(Parser)]
#[clap(name = "embedpngs", version)]
struct Args {
	#[clap(long, default_value = ".")]
	dir: PathBuf,

	#[clap(long, default_value = "pngfiles.h")]
	header: PathBuf,

	#[clap(long, default_value = "pngfiles.cpp")]
	source: PathBuf,

	#[clap(short, long)]
	verbose: bool,
}

fn main() {
	let Args { dir, header, source, verbose } = Args::parse();
	logging::init(verbose);
	if let Err(err) = embedDir(&dir, &header, &source) {
		error!("{err}");
		process::exit(1);
	}
}
