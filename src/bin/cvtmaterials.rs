#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	log::{error, info},
	rme_tools::{
		items::{Direction, ItemMap},
		logging,
		materials::{self, RuleSet},
		Error, Result,
	},
	std::{
		env, io,
		path::{Path, PathBuf},
		process,
	},
};

/// Rewrites the item ids of every material XML file in a directory through an id map.
#[derive(Parser, Debug)]
#[clap(name = "cvtmaterials", version)]
struct Args {
	/// JSON object (or .toml table) mapping old item ids to new ones
	itemMapPath: PathBuf,

	/// Also print every successful substitution
	#[clap(short, long)]
	verbose: bool,

	#[clap(short, long, value_enum, default_value_t)]
	direction: Direction,

	/// Directory holding the *.xml files [default: current directory]
	#[clap(long)]
	inputDir: Option<PathBuf>,

	/// [default: <INPUT_DIR>/out]
	#[clap(long)]
	outputDir: Option<PathBuf>,

	/// TOML rule table to use instead of the built-in one
	#[clap(long)]
	rules: Option<PathBuf>,
}

fn main() {
	let args = Args::parse();
	logging::init(args.verbose);
	if let Err(err) = run(args) {
		error!("{err}");
		process::exit(1);
	}
}

fn run(Args { itemMapPath, verbose, direction, inputDir, outputDir, rules }: Args) -> Result<()> {
	let itemMap = ItemMap::load(&itemMapPath, direction)?;
	info!("loaded {} item id(s) from {itemMapPath:?} ({direction})", itemMap.len());
	let ruleSet = match rules {
		Some(path) => RuleSet::load(&path)?,
		None => RuleSet::materials(),
	};
	let (inputDir, outputDir) = resolveDirs(inputDir, outputDir)?;
	materials::processDir(&inputDir, &outputDir, &ruleSet, &itemMap, verbose, &mut io::stdout().lock())?;
	Ok(())
}

/// Input defaults to the working directory, output to `<input>/out`.
fn resolveDirs(inputDir: Option<PathBuf>, outputDir: Option<PathBuf>) -> Result<(PathBuf, PathBuf)> {
	let inputDir = match inputDir {
		Some(dir) => dir,
		None => env::current_dir().map_err(|source| Error::io(Path::new("."), source))?,
	};
	let outputDir = outputDir.unwrap_or_else(|| inputDir.join("out"));
	Ok((inputDir, outputDir))
}
