//! Turns a directory of PNG images into `pngfiles.h`/`pngfiles.cpp`, one `unsigned char` array
//! per image, for linking into the editor binary.

use {
	crate::{filesWithExtension, fs_read, Error, Result},
	const_format::concatcp,
	log::{debug, info, warn},
	std::{
		fs::File,
		io::{self, BufWriter, Write},
		path::Path,
	},
};

pub const HEADER_GUARD: &str = "RME_PNGFILES_H_";
const HEADER_PROLOGUE: &str = concatcp!("#ifndef ", HEADER_GUARD, "\n#define ", HEADER_GUARD, "\n");
const HEADER_EPILOGUE: &str = concatcp!("#endif //", HEADER_GUARD);

const BYTES_PER_LINE: usize = 8;

/// Whether `name` can be used as a C variable name.
pub fn isCIdentifier(name: &str) -> bool {
	let mut chars = name.chars();
	chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Width and height from the PNG header.
pub fn probePng(data: &[u8]) -> Result<(u32, u32), png::DecodingError> {
	let reader = png::Decoder::new(data).read_info()?;
	let info = reader.info();
	Ok((info.width, info.height))
}

/// Owns both output streams for the length of one batch.
pub struct Embedder<H: Write, S: Write> {
	header: H,
	source: S,
}

impl<H: Write, S: Write> Embedder<H, S> {
	pub fn new(mut header: H, source: S) -> io::Result<Self> {
		header.write_all(HEADER_PROLOGUE.as_bytes())?;
		Ok(Self { header, source })
	}

	/// Emits `<symbol>_png`, declared in the header and defined in the source.
	pub fn embed(&mut self, fileName: &str, symbol: &str, data: &[u8]) -> io::Result<()> {
		let len = data.len();
		writeln!(self.header, "extern unsigned char {symbol}_png[{len}];")?;

		let source = &mut self.source;
		writeln!(source, "/* {fileName} - {len} bytes */")?;
		write!(source, "unsigned char {symbol}_png[{len}] = {{")?;
		for (i, byte) in data.iter().enumerate() {
			if i % BYTES_PER_LINE == 0 {
				write!(source, "\n  0x{byte:02x},")?;
			} else {
				write!(source, " 0x{byte:02x},")?;
			}
		}
		source.write_all(b"\n};\n")
	}

	pub fn finish(mut self) -> io::Result<(H, S)> {
		self.header.write_all(HEADER_EPILOGUE.as_bytes())?;
		self.source.write_all(b"\n")?;
		self.header.flush()?;
		self.source.flush()?;
		Ok((self.header, self.source))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmbedSummary {
	pub embedded: usize,
	pub skipped: usize,
}

/// Embeds every `*.png` directly inside `dir`, in file-name order. Files whose stem is not a C
/// identifier, or whose contents do not decode as PNG, are skipped with a warning.
pub fn embedDir(dir: &Path, headerPath: &Path, sourcePath: &Path) -> Result<EmbedSummary> {
	let embedError = |source| Error::Embed { header: headerPath.to_owned(), sourceFile: sourcePath.to_owned(), source };
	let create = |path: &Path| File::create(path).map(BufWriter::new).map_err(|source| Error::io(path, source));

	let mut embedder = Embedder::new(create(headerPath)?, create(sourcePath)?).map_err(embedError)?;
	let mut summary = EmbedSummary::default();
	for path in filesWithExtension(dir, "png")? {
		let fileName = path.file_name().unwrap_or_default().to_string_lossy();
		let symbol = path.file_stem().unwrap_or_default().to_string_lossy();
		if !isCIdentifier(&symbol) {
			warn!("Skipped file (unsuitable filename): {fileName}");
			summary.skipped += 1;
			continue;
		}
		let data = fs_read(&path)?;
		match probePng(&data) {
			Ok((width, height)) => debug!("{fileName}: {width}x{height}, {} bytes", data.len()),
			Err(err) => {
				warn!("Skipped file (not a PNG image): {fileName}: {err}");
				summary.skipped += 1;
				continue;
			}
		}
		embedder.embed(&fileName, &symbol, &data).map_err(embedError)?;
		summary.embedded += 1;
	}
	embedder.finish().map_err(embedError)?;
	info!("embedded {} image(s) into {headerPath:?} and {sourcePath:?}, skipped {}", summary.embedded, summary.skipped);
	Ok(summary)
}
