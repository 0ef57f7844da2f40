use {
	super::{decodeXml, remapDocument, Conversion, Document, RuleSet, XmlError},
	crate::{filesWithExtension, fs_createDirAll, fs_read, fs_write, items::ItemMap, Error, Result},
	log::{debug, info},
	std::{
		fs,
		io::Write,
		path::{Path, PathBuf},
	},
};

const OUT_SUFFIX: &str = ".out.xml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
	pub files: usize,
	pub mapped: usize,
	pub invalid: usize,
}

fn sameDir(a: &Path, b: &Path) -> bool {
	a == b || matches!((fs::canonicalize(a), fs::canonicalize(b)), (Ok(a), Ok(b)) if a == b)
}

fn xmlError(path: &Path) -> impl FnOnce(XmlError) -> Error + '_ {
	move |source| Error::Xml { path: path.to_owned(), source }
}

/// Where the converted copy of `inputPath` goes. Converting in place keeps the source by writing
/// `<stem>.out.xml` beside it.
pub fn outputPathFor(inputPath: &Path, outputDir: &Path, inPlace: bool) -> PathBuf {
	let stem = inputPath.file_stem().unwrap_or_default().to_string_lossy();
	outputDir.join(if inPlace { format!("{stem}{OUT_SUFFIX}") } else { format!("{stem}.xml") })
}

/// Parses `inputPath`, remaps it and writes the result to `outputPath`, creating missing
/// directories.
pub fn processFile(
	inputPath: &Path,
	outputPath: &Path,
	ruleSet: &RuleSet,
	itemMap: &ItemMap,
) -> Result<Vec<Conversion>> {
	let text = decodeXml(&fs_read(inputPath)?).map_err(xmlError(inputPath))?;
	let mut document = Document::parse(&text).map_err(xmlError(inputPath))?;
	let conversions = remapDocument(&mut document, ruleSet, itemMap);
	let xml = document.toXmlString().map_err(xmlError(outputPath))?;
	if let Some(parent) = outputPath.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs_createDirAll(parent)?;
	}
	fs_write(outputPath, xml)?;
	Ok(conversions)
}

/// Converts every `*.xml` in `inputDir` into `outputDir`, stopping at the first failure.
/// Invalid conversions are always written to `report`; successful ones only when `verbose`.
pub fn processDir(
	inputDir: &Path,
	outputDir: &Path,
	ruleSet: &RuleSet,
	itemMap: &ItemMap,
	verbose: bool,
	report: &mut impl Write,
) -> Result<BatchSummary> {
	let inPlace = sameDir(inputDir, outputDir);
	let mut summary = BatchSummary::default();
	for inputPath in filesWithExtension(inputDir, "xml")? {
		if inPlace && inputPath.to_string_lossy().ends_with(OUT_SUFFIX) {
			continue;
		}
		let outputPath = outputPathFor(&inputPath, outputDir, inPlace);
		debug!("{inputPath:?} -> {outputPath:?}");
		let conversions = processFile(&inputPath, &outputPath, ruleSet, itemMap)?;
		for conversion in &conversions {
			if conversion.isInvalid() {
				summary.invalid += 1;
			} else {
				summary.mapped += 1;
				if !verbose {
					continue;
				}
			}
			writeln!(report, "{conversion}").map_err(Error::Report)?;
		}
		summary.files += 1;
	}
	info!(
		"converted {} file(s) from {inputDir:?}: {} identifier(s) mapped, {} invalid",
		summary.files, summary.mapped, summary.invalid
	);
	Ok(summary)
}
