//! Rewrites item identifiers inside editor material files (`items.xml`, `borders.xml`,
//! `tilesets.xml`...). Every attribute the rule table names for a tag goes through the
//! [`ItemMap`]; identifiers the map does not know become [`SENTINEL_ID`] and are reported.

pub mod batch;
pub mod rules;

pub use {
	batch::{outputPathFor, processDir, processFile, BatchSummary},
	rules::{AttributeOp, RuleSet, TagRule},
};

use {
	crate::items::ItemMap,
	core::fmt,
	encoding_rs::{Encoding, UTF_8},
	memchr::memmem,
	std::collections::HashMap,
	thiserror::Error,
	xot::{NameId, Node, Xot},
};

/// "No item" in the target schema.
pub const SENTINEL_ID: &str = "0";

pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

#[derive(Error, Debug)]
#[error("{0}")]
pub struct XmlError(String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
	Mapped { tag: String, attribute: String, from: String, to: String },
	Invalid { tag: String, attribute: String, value: String },
}

impl Conversion {
	pub fn isInvalid(&self) -> bool {
		matches!(self, Self::Invalid { .. })
	}
}

impl fmt::Display for Conversion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Mapped { tag, attribute, from, to } => {
				write!(f, "<{tag} \"{attribute}\"=\"{from}\"> => <{tag} \"{attribute}\"=\"{to}\">")
			}
			Self::Invalid { tag, attribute, value } => {
				write!(f, "WARNING: invalid conversion for <{tag} \"{attribute}\"=\"{value}\">")
			}
		}
	}
}

/// Decodes a material file by its BOM, else by the `encoding` of its XML declaration, else as
/// UTF-8. The declaration is dropped since the text no longer is in that encoding.
pub fn decodeXml(bytes: &[u8]) -> Result<String, XmlError> {
	let (encoding, body) = match Encoding::for_bom(bytes) {
		Some((encoding, bomLen)) => (encoding, &bytes[bomLen..]),
		None => (declaredEncoding(bytes)?, bytes),
	};
	let text = encoding
		.decode_without_bom_handling_and_without_replacement(body)
		.ok_or_else(|| XmlError(format!("input is not valid {}", encoding.name())))?;
	Ok(match xmlDeclaration(text.as_bytes()) {
		Some(declaration) => text[declaration.len()..].to_owned(),
		None => text.into_owned(),
	})
}

/// `<?xml ... ?>` at the very start of `bytes`, if any.
fn xmlDeclaration(bytes: &[u8]) -> Option<&[u8]> {
	if !bytes.starts_with(b"<?xml") || !bytes.get(5).is_some_and(u8::is_ascii_whitespace) {
		return None;
	}
	memmem::find(bytes, b"?>").map(|end| &bytes[..end + 2])
}

fn declaredEncoding(bytes: &[u8]) -> Result<&'static Encoding, XmlError> {
	let Some(declaration) = xmlDeclaration(bytes) else {
		return Ok(UTF_8);
	};
	let Some(label) = pseudoAttribute(declaration, b"encoding") else {
		return Ok(UTF_8);
	};
	Encoding::for_label(label)
		.ok_or_else(|| XmlError(format!("unsupported encoding {:?}", String::from_utf8_lossy(label))))
}

/// Value of `name="..."` (or `'...'`) inside an XML declaration.
fn pseudoAttribute<'a>(declaration: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
	let rest = &declaration[memmem::find(declaration, name)? + name.len()..];
	let rest = skipWhitespace(skipWhitespace(rest).strip_prefix(b"=")?);
	let (&quote, rest) = rest.split_first()?;
	if quote != b'"' && quote != b'\'' {
		return None;
	}
	rest.get(..memchr::memchr(quote, rest)?)
}

fn skipWhitespace(bytes: &[u8]) -> &[u8] {
	&bytes[bytes.iter().take_while(|b| b.is_ascii_whitespace()).count()..]
}

pub struct Document {
	xot: Xot,
	root: Node,
}

impl Document {
	pub fn parse(text: &str) -> Result<Self, XmlError> {
		let mut xot = Xot::new();
		let root = xot.parse(text).map_err(|err| XmlError(err.to_string()))?;
		Ok(Self { xot, root })
	}

	/// Serialized tree, always preceded by [`XML_DECLARATION`].
	pub fn toXmlString(&self) -> Result<String, XmlError> {
		let body = self.xot.to_string(self.root).map_err(|err| XmlError(err.to_string()))?;
		Ok(format!("{XML_DECLARATION}{}", body.trim_start()))
	}

	/// Elements in document order, pre-order.
	pub fn elements(&self) -> Vec<Node> {
		let xot = &self.xot;
		xot.descendants(self.root).filter(|&node| xot.element(node).is_some()).collect()
	}

	pub fn elementsNamed(&mut self, tag: &str) -> Vec<Node> {
		let name = self.xot.add_name(tag);
		let xot = &self.xot;
		xot.descendants(self.root).filter(|&node| xot.element(node).is_some_and(|e| e.name() == name)).collect()
	}

	pub fn attribute(&mut self, node: Node, name: &str) -> Option<String> {
		let name = self.xot.add_name(name);
		self.xot.attributes(node).get(name).map(ToString::to_string)
	}

	pub fn setAttribute(&mut self, node: Node, name: &str, value: String) {
		let name = self.xot.add_name(name);
		self.xot.attributes_mut(node).insert(name, value);
	}

	pub fn removeAttribute(&mut self, node: Node, name: &str) -> Option<String> {
		let name = self.xot.add_name(name);
		self.xot.attributes_mut(node).remove(name)
	}

	fn elementName(&self, node: Node) -> Option<NameId> {
		self.xot.element(node).map(|element| element.name())
	}
}

/// Replaces `attribute` on `node` by its mapped value, or by [`SENTINEL_ID`] when unmapped.
/// Returns `None` when the attribute is absent.
pub fn convertIdAttribute(
	document: &mut Document,
	node: Node,
	tag: &str,
	attribute: &str,
	itemMap: &ItemMap,
) -> Option<Conversion> {
	let oldId = document.attribute(node, attribute)?;
	let (tag, attribute) = (tag.to_owned(), attribute.to_owned());
	Some(match itemMap.get(&oldId) {
		Some(newId) => {
			document.setAttribute(node, &attribute, newId.to_owned());
			Conversion::Mapped { tag, attribute, from: oldId, to: newId.to_owned() }
		}
		None => {
			document.setAttribute(node, &attribute, SENTINEL_ID.to_owned());
			Conversion::Invalid { tag, attribute, value: oldId }
		}
	})
}

pub fn renameAttribute(document: &mut Document, node: Node, from: &str, to: &str) {
	if let Some(value) = document.removeAttribute(node, from) {
		document.setAttribute(node, to, value);
	}
}

/// Applies `ruleSet` to every element of `document`, returning what was converted in document
/// order. Elements whose tag has no rule are not touched.
pub fn remapDocument(document: &mut Document, ruleSet: &RuleSet, itemMap: &ItemMap) -> Vec<Conversion> {
	let rulesByName: HashMap<NameId, (&str, &TagRule)> = ruleSet
		.byTag()
		.into_iter()
		.map(|(tag, rule)| (document.xot.add_name(tag), (tag, rule)))
		.collect();
	let mut conversions = Vec::new();
	for node in document.elements() {
		let Some(&(tag, rule)) = document.elementName(node).and_then(|name| rulesByName.get(&name)) else {
			continue;
		};
		for op in rule.ops() {
			match op {
				AttributeOp::Rename { from, to } => renameAttribute(document, node, from, to),
				AttributeOp::Remap(attribute) => {
					conversions.extend(convertIdAttribute(document, node, tag, attribute, itemMap));
				}
			}
		}
	}
	conversions
}
