use std::path::Path;

use indexmap::IndexMap;

use crate::error::SourceError;
use super::description::SourceDescription;
use super::distribution::DistributionTable;

/// A validated two-level discrete source.
///
/// This struct holds:
/// - `models`: symbol distributions, indexed by model name.
/// - `switches`: model-name distributions, indexed by switch name.
/// - `source`: the cyclic schedule of switch names.
///
/// # Invariants
/// - Every model named by a switch exists in `models`
/// - Every switch named by `source` exists in `switches`
/// - `source` is not empty
///
/// The model is immutable once built and can be shared between
/// threads without locking (wrap it in an `Arc`).
#[derive(Clone, Debug)]
pub struct SourceModel {
	models: IndexMap<String, DistributionTable>,
	switches: IndexMap<String, DistributionTable>,
	source: Vec<String>,
}

impl SourceModel {
	/// Builds and validates a model from its three parts.
	///
	/// # Errors
	/// - [`SourceError::ConfigFormat`] if `source` is empty
	/// - [`SourceError::UnknownReference`] for the first dangling name
	pub fn new(
		models: IndexMap<String, DistributionTable>,
		switches: IndexMap<String, DistributionTable>,
		source: Vec<String>,
	) -> Result<Self, SourceError> {
		if source.is_empty() {
			return Err(SourceError::ConfigFormat { reason: "`source` must name at least one switch".to_owned() });
		}

		for (switch_name, table) in &switches {
			if let Some(unknown) = table.keys().find(|model_name| !models.contains_key(*model_name)) {
				return Err(SourceError::UnknownReference {
					kind: "model",
					name: unknown.to_owned(),
					referrer: format!("switch `{}`", switch_name),
				});
			}
		}

		for (i, switch_name) in source.iter().enumerate() {
			if !switches.contains_key(switch_name) {
				return Err(SourceError::UnknownReference {
					kind: "switch",
					name: switch_name.clone(),
					referrer: format!("source[{}]", i),
				});
			}
		}

		log::debug!("source model: {} models, {} switches, period {}", models.len(), switches.len(), source.len());
		Ok(Self { models, switches, source })
	}

	/// Parses every literal table of a description, then validates references.
	///
	/// All distributions are checked before any cross-reference.
	pub fn from_description(description: &SourceDescription) -> Result<Self, SourceError> {
		let mut models = IndexMap::with_capacity(description.models.len());
		for (name, literals) in &description.models {
			let table = DistributionTable::from_literals(&format!("model `{}`", name), literals)?;
			models.insert(name.clone(), table);
		}

		let mut switches = IndexMap::with_capacity(description.switches.len());
		for (name, literals) in &description.switches {
			let table = DistributionTable::from_literals(&format!("switch `{}`", name), literals)?;
			switches.insert(name.clone(), table);
		}

		Self::new(models, switches, description.source.clone())
	}

	/// Loads and validates a JSON description file.
	pub fn from_json_file<P: AsRef<Path>>(filepath: P) -> Result<Self, SourceError> {
		Self::from_description(&SourceDescription::from_json_file(filepath)?)
	}

	/// Number of positions after which the switch schedule repeats.
	pub fn period(&self) -> usize {
		self.source.len()
	}

	/// Switch name active at `position` (`source[position mod period]`).
	pub fn switch_for(&self, position: u64) -> &str {
		// period() >= 1 is guaranteed by `new`
		let index = (position % self.source.len() as u64) as usize;
		&self.source[index]
	}

	/// Symbol distribution of a model, if it exists.
	pub fn model_distribution(&self, model_name: &str) -> Option<&DistributionTable> {
		self.models.get(model_name)
	}

	/// Model-name distribution of a switch, if it exists.
	pub fn switch_distribution(&self, switch_name: &str) -> Option<&DistributionTable> {
		self.switches.get(switch_name)
	}

	/// Model names in description order.
	pub fn model_names(&self) -> impl Iterator<Item=&str> {
		self.models.keys().map(String::as_str)
	}

	/// Switch names in description order.
	pub fn switch_names(&self) -> impl Iterator<Item=&str> {
		self.switches.keys().map(String::as_str)
	}

	/// The switch schedule.
	pub fn source(&self) -> &[String] {
		&self.source
	}
}

impl TryFrom<&SourceDescription> for SourceModel {
	type Error = SourceError;

	fn try_from(description: &SourceDescription) -> Result<Self, Self::Error> {
		Self::from_description(description)
	}
}
