#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub mod error;
pub mod items;
pub mod logging;
pub mod materials;
pub mod pngfiles;

pub use error::{Error, Result};

use std::{
	fs,
	path::{Path, PathBuf},
};

pub fn fs_readToString(path: &Path) -> Result<String> {
	fs::read_to_string(path).map_err(|source| Error::io(path, source))
}

pub fn fs_read(path: &Path) -> Result<Vec<u8>> {
	fs::read(path).map_err(|source| Error::io(path, source))
}

pub fn fs_write(path: &Path, bytes: impl AsRef<[u8]>) -> Result<()> {
	fs::write(path, bytes).map_err(|source| Error::io(path, source))
}

pub fn fs_createDirAll(path: &Path) -> Result<()> {
	fs::create_dir_all(path).map_err(|source| Error::io(path, source))
}

/// Regular files directly inside `dir` named `*.{extension}`, sorted by path.
pub fn filesWithExtension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
	let mut paths = Vec::new();
	for entry in fs::read_dir(dir).map_err(|source| Error::io(dir, source))? {
		let entry = entry.map_err(|source| Error::io(dir, source))?;
		let path = entry.path();
		if !entry.file_type().map_err(|source| Error::io(&path, source))?.is_file() {
			continue;
		}
		if path.extension().is_some_and(|ext| ext == extension) {
			paths.push(path);
		}
	}
	paths.sort();
	Ok(paths)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filesWithExtension_isSortedAndSkipsDirectories() {
		let dir = tempfile::tempdir().expect("tempdir");
		for name in ["b.xml", "a.xml", "c.txt", ".xml"] {
			fs::write(dir.path().join(name), "").expect("write");
		}
		fs::create_dir(dir.path().join("d.xml")).expect("mkdir");

		let names: Vec<_> = filesWithExtension(dir.path(), "xml")
			.expect("list")
			.into_iter()
			.map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
			.collect();
		assert_eq!(names, ["a.xml", "b.xml"]);
	}

	#[test]
	fn fs_readToString_reportsPath() {
		let dir = tempfile::tempdir().expect("tempdir");
		let missing = dir.path().join("missing.json");
		let err = fs_readToString(&missing).unwrap_err();
		assert!(err.to_string().contains("missing.json"), "{err}");
	}
}
