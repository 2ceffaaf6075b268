use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::io::{has_extension, read_file};

/// Probability literals per key, in document order.
pub type LiteralTable = IndexMap<String, String>;

/// Unvalidated description of a discrete source, as read from disk.
///
/// Mirrors the JSON document:
/// ```json
/// {
///   "models":   { "m1": { "x": "1/2", "y": "0.5" } },
///   "switches": { "A":  { "m1": "1" } },
///   "source":   ["A"]
/// }
/// ```
/// Map order is preserved, it is the sampling order of each table.
/// The same structure is stored in the saved snapshot, so a snapshot
/// goes through the same validation as a JSON file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SourceDescription {
	pub models: IndexMap<String, LiteralTable>,
	pub switches: IndexMap<String, LiteralTable>,
	pub source: Vec<String>,
}

impl SourceDescription {
	/// Parses a JSON description.
	///
	/// # Errors
	/// Returns [`SourceError::ConfigFormat`] if the document is not valid JSON,
	/// misses `models`, `switches` or `source`, or has values of the wrong type.
	pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
		serde_json::from_str(json).map_err(|e| SourceError::ConfigFormat { reason: e.to_string() })
	}

	/// Reads and parses a JSON description file.
	///
	/// # Notes
	/// - A file without the `.json` extension is still read; a warning is logged.
	pub fn from_json_file<P: AsRef<Path>>(filepath: P) -> Result<Self, SourceError> {
		let path = filepath.as_ref();
		if !has_extension(path, "json") {
			log::warn!("{} does not have a .json extension, reading it anyway", path.display());
		}
		Self::from_json_str(&read_file(path)?)
	}

	/// Writes the description as a compact `postcard` snapshot.
	pub fn save_snapshot<P: AsRef<Path>>(&self, filepath: P) -> Result<(), SourceError> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(&filepath, bytes)?;
		log::debug!("saved source snapshot to {}", filepath.as_ref().display());
		Ok(())
	}

	/// Reads a snapshot written by [`save_snapshot`](Self::save_snapshot).
	///
	/// # Errors
	/// - [`SourceError::ConfigFormat`] if no snapshot exists at `filepath`
	/// - [`SourceError::Snapshot`] if the file cannot be decoded
	pub fn load_snapshot<P: AsRef<Path>>(filepath: P) -> Result<Self, SourceError> {
		let path = filepath.as_ref();
		if !path.exists() {
			return Err(SourceError::ConfigFormat {
				reason: format!("no saved source at {}, a description file is required", path.display()),
			});
		}
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}
}
