use indexmap::IndexMap;

use crate::error::SourceError;

/// Absolute tolerance accepted between the sum of a table and `1.0`.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Parses a probability literal.
///
/// Accepts a decimal (`"0.25"`) or a simple fraction (`"1/4"`).
/// Surrounding whitespace is ignored on both sides of the slash.
///
/// # Errors
/// Returns [`SourceError::InvalidLiteral`] if a part is not a number,
/// the denominator is zero or the value is not finite.
/// The range is not checked here, see [`DistributionTable::validate`].
pub fn parse_probability(key: &str, literal: &str) -> Result<f64, SourceError> {
	let invalid = |reason: &str| SourceError::InvalidLiteral {
		key: key.to_owned(),
		literal: literal.to_owned(),
		reason: reason.to_owned(),
	};
	let number = |s: &str| s.trim().parse::<f64>().map_err(|_| invalid("not a number"));

	let value = match literal.split_once('/') {
		Some((numerator, denominator)) => {
			let numerator = number(numerator)?;
			let denominator = number(denominator)?;
			if denominator == 0.0 {
				return Err(invalid("zero denominator"));
			}
			numerator / denominator
		}
		None => number(literal)?,
	};

	if !value.is_finite() {
		return Err(invalid("not finite"));
	}
	Ok(value)
}

/// A validated categorical distribution over string keys.
///
/// Conceptually the outgoing edges of a node, each weighted by a
/// probability rather than an observation count.
///
/// ## Invariants
/// - Every probability lies in [0, 1]
/// - The probabilities sum to 1 within [`SUM_TOLERANCE`]
/// - Key order is the insertion order and never changes; sampling
///   depends on it
#[derive(Clone, Debug)]
pub struct DistributionTable {
	/// Name used in error and log messages (ex. `model "m1"`).
	name: String,
	/// Probability per key, in sampling order.
	entries: IndexMap<String, f64>,
}

impl DistributionTable {
	/// Builds a table from already-parsed probabilities.
	///
	/// # Errors
	/// Returns [`SourceError::InvalidDistribution`] if the invariants do not hold.
	pub fn new(name: &str, entries: IndexMap<String, f64>) -> Result<Self, SourceError> {
		let table = Self { name: name.to_owned(), entries };
		table.validate()?;
		Ok(table)
	}

	/// Builds a table from probability literals, keeping their order.
	///
	/// # Errors
	/// - [`SourceError::InvalidLiteral`] for the first unparsable literal
	/// - [`SourceError::InvalidDistribution`] if the parsed table is invalid
	pub fn from_literals(name: &str, literals: &IndexMap<String, String>) -> Result<Self, SourceError> {
		let mut entries = IndexMap::with_capacity(literals.len());
		for (key, literal) in literals {
			entries.insert(key.clone(), parse_probability(key, literal)?);
		}
		Self::new(name, entries)
	}

	/// Checks the range and sum invariants.
	pub fn validate(&self) -> Result<(), SourceError> {
		for (key, probability) in &self.entries {
			if !(0.0..=1.0).contains(probability) {
				return Err(SourceError::InvalidDistribution {
					table: self.name.clone(),
					reason: format!("probability of `{}` is {}, outside [0, 1]", key, probability),
				});
			}
		}

		let sum: f64 = self.entries.values().sum();
		if (sum - 1.0).abs() > SUM_TOLERANCE {
			return Err(SourceError::InvalidDistribution {
				table: self.name.clone(),
				reason: format!("probabilities sum to {}, expected 1", sum),
			});
		}
		Ok(())
	}

	/// Returns the probability of `key`, if present.
	pub fn get(&self, key: &str) -> Option<f64> {
		self.entries.get(key).copied()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Keys in sampling order.
	pub fn keys(&self) -> impl Iterator<Item=&str> {
		self.entries.keys().map(String::as_str)
	}

	/// `(key, probability)` pairs in sampling order.
	pub fn iter(&self) -> impl Iterator<Item=(&str, f64)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), *v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Selects a key by inverse-CDF sampling.
	///
	/// Walks the keys in order, accumulating probabilities, and returns the
	/// first key whose cumulative total exceeds `draw`.
	///
	/// # Notes
	/// - If rounding leaves the total slightly under 1 and `draw` falls in
	///   that gap, the last key with a non-zero probability is returned.
	/// - A draw outside [0, 1) that selects nothing is reported as
	///   [`SourceError::SamplingExhausted`].
	pub fn sample(&self, draw: f64) -> Result<&str, SourceError> {
		let mut cumulative = 0.0;
		for (key, probability) in &self.entries {
			cumulative += probability;
			if draw < cumulative {
				return Ok(key);
			}
		}

		if (0.0..1.0).contains(&draw) {
			if let Some((key, _)) = self.entries.iter().rev().find(|(_, p)| **p > 0.0) {
				log::debug!("{}: draw {} above cumulative {}, falling back to `{}`", self.name, draw, cumulative, key);
				return Ok(key);
			}
		}

		Err(SourceError::SamplingExhausted { table: self.name.clone(), draw })
	}
}
