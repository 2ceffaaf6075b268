use crate::error::SourceError;
use super::draw::UniformDraw;
use super::source_model::SourceModel;

/// Emits symbols from a [`SourceModel`].
///
/// # Responsibilities
/// - Resolve the active switch for a position
/// - Pick a model from the switch distribution
/// - Pick a symbol from the model distribution
///
/// The generator only borrows the model. It keeps no state between calls:
/// the same position may yield a different symbol each time since every
/// call consumes fresh draws.
#[derive(Clone, Copy, Debug)]
pub struct SymbolGenerator<'m> {
	model: &'m SourceModel,
}

impl<'m> SymbolGenerator<'m> {
	pub fn new(model: &'m SourceModel) -> Self {
		Self { model }
	}

	/// Emits the symbol for `position`.
	///
	/// # Behavior
	/// - Takes two draws from `draw`, in this order: `u_switch`, then `u_model`.
	/// - `switch = source[position mod period]`.
	/// - The model is the first key of the switch table whose cumulative
	///   probability exceeds `u_switch`.
	/// - The symbol is selected the same way from the model table with `u_model`.
	///
	/// # Errors
	/// Returns [`SourceError::SamplingExhausted`] if a draw selects nothing
	/// (only possible with draws outside [0, 1)).
	pub fn emit(&self, position: u64, draw: &mut impl UniformDraw) -> Result<&'m str, SourceError> {
		let u_switch = draw.next_unit();
		let u_model = draw.next_unit();

		let switch_name = self.model.switch_for(position);
		// Both lookups are guaranteed by SourceModel validation
		let switch = self.model.switch_distribution(switch_name).ok_or_else(|| exhausted(switch_name, u_switch))?;
		let model_name = switch.sample(u_switch)?;
		let model = self.model.model_distribution(model_name).ok_or_else(|| exhausted(model_name, u_model))?;
		let symbol = model.sample(u_model)?;

		log::trace!("#{} {} -> {} -> {}", position, switch_name, model_name, symbol);
		Ok(symbol)
	}
}

fn exhausted(table: &str, draw: f64) -> SourceError {
	SourceError::SamplingExhausted { table: table.to_owned(), draw }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::description::SourceDescription;
	use crate::model::draw::ScriptedDraws;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn model(json: &str) -> SourceModel {
		SourceModel::from_description(&SourceDescription::from_json_str(json).unwrap()).unwrap()
	}

	fn two_switches() -> SourceModel {
		model(r#"{
			"models": {
				"low": { "a": "0.5", "b": "0.5" },
				"high": { "c": "0.25", "d": "0.75" }
			},
			"switches": {
				"L": { "low": "1" },
				"H": { "low": "0.2", "high": "0.8" }
			},
			"source": ["L", "H"]
		}"#)
	}

	#[test]
	fn draws_select_switch_then_model() {
		let source = two_switches();
		let generator = SymbolGenerator::new(&source);

		// position 1 -> H; u_switch 0.1 -> low; u_model 0.7 -> b
		let mut draws = ScriptedDraws::new(vec![0.1, 0.7]).unwrap();
		assert_eq!(generator.emit(1, &mut draws).unwrap(), "b");
		assert_eq!(draws.consumed(), 2);

		// position 3 -> H; u_switch 0.5 -> high; u_model 0.2 -> c
		let mut draws = ScriptedDraws::new(vec![0.5, 0.2]).unwrap();
		assert_eq!(generator.emit(3, &mut draws).unwrap(), "c");

		// position 0 -> L; always low
		let mut draws = ScriptedDraws::new(vec![0.99, 0.0]).unwrap();
		assert_eq!(generator.emit(0, &mut draws).unwrap(), "a");
	}

	#[test]
	fn emitted_symbol_belongs_to_selected_model() {
		let source = two_switches();
		let generator = SymbolGenerator::new(&source);
		let model_draws = [0.0, 0.1, 0.25, 0.4999, 0.5, 0.75, 0.9999];

		// Switch H: u_switch below 0.2 selects "low", from 0.2 on "high"
		let cases = [(1, 0.0, "low"), (1, 0.19, "low"), (3, 0.2, "high"), (3, 0.99, "high"), (0, 0.99, "low")];
		for (position, u_switch, expected_model) in cases {
			let table = source.model_distribution(expected_model).unwrap();
			for u_model in model_draws {
				let mut draws = ScriptedDraws::new(vec![u_switch, u_model]).unwrap();
				let symbol = generator.emit(position, &mut draws).unwrap();
				assert!(table.contains(symbol), "{symbol} not in {expected_model} (u_switch {u_switch}, u_model {u_model})");
			}
		}
	}

	#[test]
	fn seeded_emission_stays_in_model_alphabet() {
		let source = two_switches();
		let generator = SymbolGenerator::new(&source);
		let mut rng = StdRng::seed_from_u64(42);

		for position in 0..2_000 {
			let symbol = generator.emit(position, &mut rng).unwrap();
			if source.switch_for(position) == "L" {
				assert!(source.model_distribution("low").unwrap().contains(symbol));
			} else {
				assert!(source.model_names().any(|m| source.model_distribution(m).unwrap().contains(symbol)));
			}
		}
	}

	#[test]
	fn any_unit_draw_yields_a_symbol() {
		let source = two_switches();
		let generator = SymbolGenerator::new(&source);
		for u in [0.0, 0.2, 0.199_999_999, 0.5, 0.75, 0.999_999_999_999] {
			let mut draws = ScriptedDraws::new(vec![u]).unwrap();
			assert!(generator.emit(1, &mut draws).is_ok());
		}
	}

	#[test]
	fn out_of_range_draw_is_exhausted() {
		let source = two_switches();
		let generator = SymbolGenerator::new(&source);
		let mut draws = ScriptedDraws::new(vec![1.5]).unwrap();
		assert!(matches!(generator.emit(0, &mut draws), Err(SourceError::SamplingExhausted { .. })));
	}
}
