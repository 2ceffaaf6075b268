use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::io;

/// Reads a whole text file into a `String`.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Returns `true` if the path ends with the given extension (case-insensitive).
///
/// Examples:
/// - `"data/source.json"`, `"json"` → `true`
/// - `"data/source.JSON"`, `"json"` → `true`
/// - `"data/source"`, `"json"` → `false`
pub(crate) fn has_extension<P: AsRef<Path>>(path: P, extension: &str) -> bool {
	path.as_ref()
		.extension()
		.map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
		.unwrap_or(false)
}
