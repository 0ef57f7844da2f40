//! Old→new item identifier table, loaded from a JSON or TOML object.

use {
	crate::{fs_readToString, Error, Result},
	clap::ValueEnum,
	core::fmt,
	std::{collections::HashMap, path::Path},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Direction {
	#[default]
	Forward,
	Reverse,
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Forward => "forward",
			Self::Reverse => "reverse",
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemMap {
	ids: HashMap<String, String>,
}

impl ItemMap {
	/// Later pairs overwrite earlier ones, so a non-bijective source loses entries when reversed.
	pub fn fromPairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>, direction: Direction) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		let mut ids = HashMap::new();
		for (key, value) in pairs {
			let (key, value) = (key.into(), value.into());
			match direction {
				Direction::Forward => ids.insert(key, value),
				Direction::Reverse => ids.insert(value, key),
			};
		}
		Self { ids }
	}

	/// Reads `path` as TOML when it ends in `.toml`, as JSON otherwise.
	pub fn load(path: &Path, direction: Direction) -> Result<Self> {
		let text = fs_readToString(path)?;
		let pairs = if path.extension().is_some_and(|ext| ext == "toml") {
			tomlPairs(path, &text)?
		} else {
			jsonPairs(path, &text)?
		};
		Ok(Self::fromPairs(pairs, direction))
	}

	pub fn get(&self, id: &str) -> Option<&str> {
		self.ids.get(id).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

fn jsonPairs(path: &Path, text: &str) -> Result<Vec<(String, String)>> {
	use serde_json::Value;
	let object: serde_json::Map<String, Value> =
		serde_json::from_str(text).map_err(|source| Error::Json { path: path.to_owned(), source })?;
	Ok(object
		.into_iter()
		.map(|(key, value)| match value {
			Value::String(s) => (key, s),
			other => (key, jsonRepr(&other)),
		})
		.collect())
}

fn tomlPairs(path: &Path, text: &str) -> Result<Vec<(String, String)>> {
	use toml::Value;
	let table: toml::value::Table =
		toml::from_str(text).map_err(|source| Error::Toml { path: path.to_owned(), source })?;
	Ok(table
		.into_iter()
		.map(|(key, value)| match value {
			Value::String(s) => (key, s),
			other => (key, tomlRepr(&other)),
		})
		.collect())
}

// Any value is accepted and spelled the way the older Python tooling printed it, so maps written
// for it load unchanged: `None`, `True`, `[1, 'a']`, `{'k': 2}`.
fn jsonRepr(value: &serde_json::Value) -> String {
	use serde_json::Value;
	match value {
		Value::Null => "None".to_owned(),
		Value::Bool(b) => pythonBool(*b).to_owned(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => pythonQuoted(s),
		Value::Array(items) => format!("[{}]", joined(items.iter().map(jsonRepr))),
		Value::Object(fields) => {
			format!("{{{}}}", joined(fields.iter().map(|(k, v)| format!("{}: {}", pythonQuoted(k), jsonRepr(v)))))
		}
	}
}

fn tomlRepr(value: &toml::Value) -> String {
	use toml::Value;
	match value {
		Value::String(s) => pythonQuoted(s),
		Value::Integer(i) => i.to_string(),
		Value::Float(f) => format!("{f:?}"),
		Value::Boolean(b) => pythonBool(*b).to_owned(),
		Value::Datetime(datetime) => datetime.to_string(),
		Value::Array(items) => format!("[{}]", joined(items.iter().map(tomlRepr))),
		Value::Table(fields) => {
			format!("{{{}}}", joined(fields.iter().map(|(k, v)| format!("{}: {}", pythonQuoted(k), tomlRepr(v)))))
		}
	}
}

fn joined(parts: impl Iterator<Item = String>) -> String {
	parts.collect::<Vec<_>>().join(", ")
}

fn pythonQuoted(s: &str) -> String {
	let escaped = s.replace('\\', "\\\\");
	if s.contains('\'') && !s.contains('"') {
		format!("\"{escaped}\"")
	} else {
		format!("'{}'", escaped.replace('\'', "\\'"))
	}
}

fn pythonBool(b: bool) -> &'static str {
	if b {
		"True"
	} else {
		"False"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn forwardKeepsOrientation() {
		let map = ItemMap::fromPairs([("100", "200"), ("101", "201")], Direction::Forward);
		assert_eq!(map.get("100"), Some("200"));
		assert_eq!(map.get("101"), Some("201"));
		assert_eq!(map.get("200"), None);
		assert_eq!(map.len(), 2);
	}

	#[test]
	fn reverseMatchesSwappedForward() {
		let reversed = ItemMap::fromPairs([("100", "200"), ("7", "8")], Direction::Reverse);
		let swapped = ItemMap::fromPairs([("200", "100"), ("8", "7")], Direction::Forward);
		assert_eq!(reversed, swapped);
	}

	#[test]
	fn reverseOfNonBijectionIsLastWriteWins() {
		let map = ItemMap::fromPairs([("1", "5"), ("2", "5"), ("3", "5")], Direction::Reverse);
		assert_eq!(map.len(), 1);
		assert_eq!(map.get("5"), Some("3"));
	}

	#[test]
	fn loadJsonCoercesScalars() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("items.json");
		fs::write(&path, r#"{"100": 200, "101": "201", "102": 2.5, "103": true}"#).expect("write");

		let map = ItemMap::load(&path, Direction::Forward).expect("load");
		assert_eq!(map.get("100"), Some("200"));
		assert_eq!(map.get("101"), Some("201"));
		assert_eq!(map.get("102"), Some("2.5"));
		assert_eq!(map.get("103"), Some("True"));
	}

	#[test]
	fn loadJsonReversePreservesFileOrder() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("items.json");
		fs::write(&path, r#"{"9": 1, "2": 1}"#).expect("write");

		let map = ItemMap::load(&path, Direction::Reverse).expect("load");
		assert_eq!(map.get("1"), Some("2"));
	}

	#[test]
	fn loadToml() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("items.toml");
		fs::write(&path, "100 = 200\n\"101\" = \"201\"\n").expect("write");

		let map = ItemMap::load(&path, Direction::Reverse).expect("load");
		assert_eq!(map.get("200"), Some("100"));
		assert_eq!(map.get("201"), Some("101"));
	}

	#[test]
	fn loadCoercesNonScalarValuesLikeTheOldTooling() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("items.json");
		fs::write(&path, r#"{"100": [1, "a", null], "101": null, "102": {"k": false}, "103": "it's"}"#)
			.expect("write");

		let map = ItemMap::load(&path, Direction::Forward).expect("load");
		assert_eq!(map.get("100"), Some("[1, 'a', None]"));
		assert_eq!(map.get("101"), Some("None"));
		assert_eq!(map.get("102"), Some("{'k': False}"));
		assert_eq!(map.get("103"), Some("it's"));
	}

	#[test]
	fn loadTomlCoercesArrays() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("items.toml");
		fs::write(&path, "100 = [\"a\", \"it's\"]\n").expect("write");

		let map = ItemMap::load(&path, Direction::Reverse).expect("load");
		assert_eq!(map.get("['a', \"it's\"]"), Some("100"));
	}

	#[test]
	fn directionDefaultsToForward() {
		assert_eq!(Direction::default(), Direction::Forward);
		assert_eq!(Direction::Reverse.to_string(), "reverse");
	}

	#[test]
	fn loadMalformedJsonFails() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("items.json");
		fs::write(&path, "{\"100\": ").expect("write");

		assert!(matches!(ItemMap::load(&path, Direction::Forward), Err(Error::Json { .. })));
	}

	#[test]
	fn loadMissingFileFails() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("nope.json");
		assert!(matches!(ItemMap::load(&path, Direction::Forward), Err(Error::Io { .. })));
	}
}
