use rand::Rng;

/// A source of uniform draws in [0, 1).
///
/// Every `rand::Rng` is a `UniformDraw`; tests and replays use
/// [`ScriptedDraws`] instead so that sampling becomes reproducible.
pub trait UniformDraw {
	/// Returns the next draw, in [0, 1).
	fn next_unit(&mut self) -> f64;
}

impl<R: Rng> UniformDraw for R {
	fn next_unit(&mut self) -> f64 {
		self.random::<f64>()
	}
}

/// Replays a fixed list of draws, cycling back to the start when exhausted.
///
/// Values are returned as given, they are not clamped to [0, 1).
#[derive(Clone, Debug)]
pub struct ScriptedDraws {
	draws: Vec<f64>,
	next: usize,
}

impl ScriptedDraws {
	/// Creates a replay of `draws`.
	///
	/// # Errors
	/// Returns an error if `draws` is empty.
	pub fn new(draws: Vec<f64>) -> Result<Self, String> {
		if draws.is_empty() {
			return Err("ScriptedDraws needs at least one draw".to_owned());
		}
		Ok(Self { draws, next: 0 })
	}

	/// Number of draws consumed so far.
	pub fn consumed(&self) -> usize {
		self.next
	}
}

impl UniformDraw for ScriptedDraws {
	fn next_unit(&mut self) -> f64 {
		let draw = self.draws[self.next % self.draws.len()];
		self.next += 1;
		draw
	}
}
