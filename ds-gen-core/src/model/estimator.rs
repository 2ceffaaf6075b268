use std::collections::VecDeque;

use crate::error::SourceError;
use super::draw::UniformDraw;
use super::generator::SymbolGenerator;
use super::source_model::SourceModel;

/// The last `capacity` symbols of a run, oldest first.
#[derive(Clone, Debug)]
pub struct Window<'a> {
	capacity: usize,
	symbols: VecDeque<&'a str>,
}

impl<'a> Window<'a> {
	pub fn new(capacity: usize) -> Self {
		Self { capacity, symbols: VecDeque::with_capacity(capacity) }
	}

	/// Appends a symbol, dropping the oldest one once the window is full.
	pub fn push(&mut self, symbol: &'a str) {
		if self.symbols.len() == self.capacity {
			self.symbols.pop_front();
		}
		self.symbols.push_back(symbol);
	}

	pub fn is_full(&self) -> bool {
		self.symbols.len() == self.capacity
	}

	/// Exact, ordered comparison with `target`.
	pub fn matches<S: AsRef<str>>(&self, target: &[S]) -> bool {
		self.symbols.len() == target.len()
			&& self.symbols.iter().zip(target).all(|(symbol, expected)| *symbol == expected.as_ref())
	}
}

/// Checks that `target` fits in `total_count` samples.
///
/// # Returns
/// The number of valid window positions, `total_count - target_len + 1`.
///
/// # Errors
/// Returns [`SourceError::InvalidWindow`] if the target is empty or longer
/// than the run.
pub fn window_positions(target_len: usize, total_count: u64) -> Result<u64, SourceError> {
	if target_len == 0 || target_len as u64 > total_count {
		return Err(SourceError::InvalidWindow { target_len, total_count });
	}
	Ok(total_count - target_len as u64 + 1)
}

/// Fraction of sliding windows over `symbols` equal to `target`.
///
/// One comparison is made per fully populated window, so exactly
/// `symbols.len() - target.len() + 1` windows are counted.
pub fn estimate_run<S: AsRef<str>, T: AsRef<str>>(symbols: &[S], target: &[T]) -> Result<f64, SourceError> {
	let total_cases = window_positions(target.len(), symbols.len() as u64)?;
	let good_cases = symbols.windows(target.len())
		.filter(|window| window.iter().zip(target).all(|(s, t)| s.as_ref() == t.as_ref()))
		.count();
	Ok(good_cases as f64 / total_cases as f64)
}

/// Estimates how often a target subsequence appears in a generated run.
pub struct SequenceProbabilityEstimator<'m> {
	generator: SymbolGenerator<'m>,
}

impl<'m> SequenceProbabilityEstimator<'m> {
	pub fn new(model: &'m SourceModel) -> Self {
		Self { generator: SymbolGenerator::new(model) }
	}

	/// Generates `total_count` symbols and returns the fraction of windows
	/// equal to `target`.
	///
	/// # Behavior
	/// - Positions `0..total_count` are generated in order, each one
	///   pushed into a window of `target.len()` symbols.
	/// - Once the window is full it is compared after every push.
	/// - The result is `matches / (total_count - target.len() + 1)`, in [0, 1].
	///
	/// # Errors
	/// - [`SourceError::InvalidWindow`] if `target` is empty or longer than
	///   `total_count`; nothing is generated in that case.
	/// - Any error from [`SymbolGenerator::emit`].
	pub fn estimate<S: AsRef<str>>(&self, total_count: u64, target: &[S], draw: &mut impl UniformDraw) -> Result<f64, SourceError> {
		let total_cases = window_positions(target.len(), total_count)?;

		let mut window = Window::new(target.len());
		let mut good_cases: u64 = 0;
		for position in 0..total_count {
			window.push(self.generator.emit(position, draw)?);
			if window.is_full() && window.matches(target) {
				good_cases += 1;
			}
		}

		log::debug!("{} matches over {} windows", good_cases, total_cases);
		Ok(good_cases as f64 / total_cases as f64)
	}
}
