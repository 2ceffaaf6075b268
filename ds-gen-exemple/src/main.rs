use ds_gen_core::{
    ScriptedDraws, SequenceProbabilityEstimator, SourceDescription, SourceModel, StreamDriver, SymbolGenerator,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load and validate the description in "data" (models, switches, source)
    let description = SourceDescription::from_json_file("./data/weather.json")?;
    let model = SourceModel::from_description(&description)?;

    // The schedule repeats every `period` positions
    println!("Period: {}", model.period());
    for position in 0..7 {
        println!("Position {}: switch '{}'", position, model.switch_for(position));
    }

    // Each switch is a distribution over models, each model a distribution over symbols
    // Key order is the order of the JSON file and is the sampling order
    for name in model.switch_names() {
        if let Some(table) = model.switch_distribution(name) {
            for (model_name, p) in table.iter() {
                println!("{} -> {}: {}", name, model_name, p);
            }
        }
    }

    // A seeded generator gives reproducible runs
    let mut rng = StdRng::seed_from_u64(42);
    let symbols = StreamDriver::new(&model).generate(10, &mut rng)?;
    println!("Generated: {}", symbols.join(" "));

    // Scripted draws fix both stages: u_switch then u_model for every symbol
    // 0.0 always selects the first model of the switch, 0.99 the last symbol of the model
    let generator = SymbolGenerator::new(&model);
    let mut draws = ScriptedDraws::new(vec![0.0, 0.99])?;
    println!("Scripted symbol at 0: {}", generator.emit(0, &mut draws)?);

    // Invalid descriptions are rejected before any generation
    let broken = r#"{ "models": { "m": { "x": "1/2" } }, "switches": { "A": { "m": "1" } }, "source": ["A"] }"#;
    match SourceModel::from_description(&SourceDescription::from_json_str(broken)?) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    // Probability of two rainy positions in a row over 10 000 samples
    let target = ["rain", "rain"];
    let p = SequenceProbabilityEstimator::new(&model).estimate(10_000, &target, &mut rng)?;
    println!("P(rain rain) ~ {}", p);

    // The target cannot be longer than the run
    match SequenceProbabilityEstimator::new(&model).estimate(1, &target, &mut rng) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}
