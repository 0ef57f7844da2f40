//! Which attributes of which tags hold item identifiers.
//!
//! The built-in table covers the material files shipped with the editor. A replacement can be
//! read from TOML:
//!
//! ```toml
//! [[rule]]
//! tags = ["brush"]
//! rename = [{ from = "server_lookid", to = "lookid" }]
//! remap = ["lookid"]
//! ```

use {
	crate::{fs_readToString, Error, Result},
	serde::{Deserialize, Serialize},
	std::{
		collections::{HashMap, HashSet},
		path::Path,
	},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
	pub from: String,
	pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
	pub tags: Vec<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub remap: Vec<String>,

	// Tables after plain values, or the TOML serializer refuses the struct.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub rename: Vec<Rename>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeOp<'a> {
	Rename { from: &'a str, to: &'a str },
	Remap(&'a str),
}

impl TagRule {
	fn new(tags: &[&str], rename: &[(&str, &str)], remap: &[&str]) -> Self {
		Self {
			tags: tags.iter().map(|&tag| tag.to_owned()).collect(),
			remap: remap.iter().map(|&attribute| attribute.to_owned()).collect(),
			rename: rename.iter().map(|&(from, to)| Rename { from: from.to_owned(), to: to.to_owned() }).collect(),
		}
	}

	/// Renames first, then remaps.
	pub fn ops(&self) -> impl Iterator<Item = AttributeOp<'_>> {
		let renames =
			self.rename.iter().map(|Rename { from, to }| AttributeOp::Rename { from: from.as_str(), to: to.as_str() });
		renames.chain(self.remap.iter().map(|attribute| AttributeOp::Remap(attribute.as_str())))
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
	#[serde(rename = "rule")]
	pub rules: Vec<TagRule>,
}

impl RuleSet {
	pub fn materials() -> Self {
		// fromid/toid bound a range; only the endpoints are remapped, not the ids in between.
		Self {
			rules: vec![
				TagRule::new(&["item", "carpet", "door"], &[], &["id", "fromid", "toid"]),
				TagRule::new(&["brush"], &[("server_lookid", "lookid")], &["lookid"]),
				TagRule::new(&["borderitem"], &[], &["item"]),
				TagRule::new(&["border"], &[], &["ground_equivalent"]),
				TagRule::new(&["replace_border", "replace_item"], &[], &["with"]),
			],
		}
	}

	pub fn load(path: &Path) -> Result<Self> {
		let ruleSet: Self = toml::from_str(&fs_readToString(path)?)
			.map_err(|source| Error::Toml { path: path.to_owned(), source })?;
		if let Some(tag) = ruleSet.duplicateTag() {
			return Err(Error::DuplicateRule { path: path.to_owned(), tag: tag.to_owned() });
		}
		Ok(ruleSet)
	}

	pub fn ruleFor(&self, tag: &str) -> Option<&TagRule> {
		self.rules.iter().find(|rule| rule.tags.iter().any(|t| t == tag))
	}

	/// Every tag paired with its rule.
	pub fn byTag(&self) -> HashMap<&str, &TagRule> {
		let mut byTag = HashMap::new();
		for rule in &self.rules {
			for tag in &rule.tags {
				byTag.entry(tag.as_str()).or_insert(rule);
			}
		}
		byTag
	}

	fn duplicateTag(&self) -> Option<&str> {
		let mut seen = HashSet::new();
		for tag in self.rules.iter().flat_map(|rule| &rule.tags) {
			if !seen.insert(tag.as_str()) {
				return Some(tag);
			}
		}
		None
	}
}

impl Default for RuleSet {
	fn default() -> Self {
		Self::materials()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn opsFor<'a>(ruleSet: &'a RuleSet, tag: &str) -> Vec<AttributeOp<'a>> {
		ruleSet.ruleFor(tag).map(|rule| rule.ops().collect()).unwrap_or_default()
	}

	#[test]
	fn idTagsRemapRangeEndpoints() {
		let ruleSet = RuleSet::materials();
		for tag in ["item", "carpet", "door"] {
			assert_eq!(
				opsFor(&ruleSet, tag),
				[AttributeOp::Remap("id"), AttributeOp::Remap("fromid"), AttributeOp::Remap("toid")]
			);
		}
	}

	#[test]
	fn brushRenamesBeforeRemapping() {
		assert_eq!(
			opsFor(&RuleSet::materials(), "brush"),
			[AttributeOp::Rename { from: "server_lookid", to: "lookid" }, AttributeOp::Remap("lookid")]
		);
	}

	#[test]
	fn singleAttributeTags() {
		let ruleSet = RuleSet::materials();
		assert_eq!(opsFor(&ruleSet, "borderitem"), [AttributeOp::Remap("item")]);
		assert_eq!(opsFor(&ruleSet, "border"), [AttributeOp::Remap("ground_equivalent")]);
		assert_eq!(opsFor(&ruleSet, "replace_border"), [AttributeOp::Remap("with")]);
		assert_eq!(opsFor(&ruleSet, "replace_item"), [AttributeOp::Remap("with")]);
	}

	#[test]
	fn unknownTagHasNoOps() {
		let ruleSet = RuleSet::materials();
		assert!(opsFor(&ruleSet, "tileset").is_empty());
		assert!(opsFor(&ruleSet, "Item").is_empty());
	}

	#[test]
	fn builtinTableRoundTripsThroughToml() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("rules.toml");
		fs::write(&path, toml::to_string(&RuleSet::materials()).expect("serialize")).expect("write");

		assert_eq!(RuleSet::load(&path).expect("load"), RuleSet::materials());
	}

	#[test]
	fn loadRejectsDuplicateTags() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("rules.toml");
		fs::write(
			&path,
			"[[rule]]\ntags = [\"item\"]\nremap = [\"id\"]\n\n[[rule]]\ntags = [\"door\", \"item\"]\nremap = [\"id\"]\n",
		)
		.expect("write");

		match RuleSet::load(&path) {
			Err(Error::DuplicateRule { tag, .. }) => assert_eq!(tag, "item"),
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn byTagCoversEveryTag() {
		let ruleSet = RuleSet::materials();
		let byTag = ruleSet.byTag();
		assert_eq!(byTag.len(), 9);
		assert_eq!(byTag["door"].remap, ["id", "fromid", "toid"]);
	}
}
