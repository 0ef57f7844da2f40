use {
	std::{
		io,
		path::{Path, PathBuf},
	},
	thiserror::Error,
};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("{path:?}: {source}")]
	Io { path: PathBuf, source: io::Error },

	#[error("{path:?}: {source}")]
	Json { path: PathBuf, source: serde_json::Error },

	#[error("{path:?}: {source}")]
	Toml { path: PathBuf, source: toml::de::Error },

	#[error("{path:?}: {source}")]
	Xml { path: PathBuf, source: crate::materials::XmlError },

	#[error("{path:?}: tag {tag:?} appears in more than one rule")]
	DuplicateRule { path: PathBuf, tag: String },

	#[error("{header:?}, {sourceFile:?}: {source}")]
	Embed { header: PathBuf, sourceFile: PathBuf, source: io::Error },

	#[error("writing conversion report: {0}")]
	Report(#[source] io::Error),
}

impl Error {
	pub fn io(path: &Path, source: io::Error) -> Self {
		Self::Io { path: path.to_owned(), source }
	}
}
