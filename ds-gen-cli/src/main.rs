mod cli;
mod live;
mod logging;

use std::io;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cli::{Cli, Command, GenerateArgs, ProbabilityArgs};
use ds_gen_core::{LineSink, SequenceProbabilityEstimator, SourceDescription, SourceModel, StreamDriver};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate(&args, cli.seed, &cli.snapshot),
        Command::Probability(args) => probability(&args, cli.seed, &cli.snapshot),
    }
}

/// Builds the random stream, seeded if requested.
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            log::info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

/// Loads the source from `file`, or from the saved snapshot if no file is given.
///
/// A successfully loaded file replaces the snapshot.
fn load_source(file: Option<&Path>, snapshot: &Path) -> anyhow::Result<SourceModel> {
    let Some(path) = file else {
        log::info!("no source file, using saved source {}", snapshot.display());
        let description = SourceDescription::load_snapshot(snapshot)?;
        return Ok(SourceModel::from_description(&description)?);
    };

    log::info!("processing {}", path.display());
    let description = SourceDescription::from_json_file(path)
        .with_context(|| format!("failed to read source description {}", path.display()))?;
    let model = SourceModel::from_description(&description)
        .with_context(|| format!("invalid source description {}", path.display()))?;

    // The snapshot is a convenience: a failure to write it is not fatal
    if let Err(e) = description.save_snapshot(snapshot) {
        log::warn!("could not save source to {}: {e}", snapshot.display());
    }
    Ok(model)
}

fn generate(args: &GenerateArgs, seed: Option<u64>, snapshot: &Path) -> anyhow::Result<()> {
    let model = load_source(Some(&args.file), snapshot)?;
    let mut rng = make_rng(seed);

    match args.count {
        Some(count) => {
            log::info!("generating {count} symbols");
            let mut sink = LineSink::new(io::stdout().lock());
            StreamDriver::new(&model).run_bounded(count, &mut rng, &mut sink)?;
        }
        None => {
            eprintln!("Generating until '{}' or Ctrl-C", args.quit_key);
            let count = live::run(model, rng, args.quit_key)?;
            log::info!("printed {count} symbols");
        }
    }
    Ok(())
}

fn probability(args: &ProbabilityArgs, seed: Option<u64>, snapshot: &Path) -> anyhow::Result<()> {
    let model = load_source(args.file.as_deref(), snapshot)?;
    let mut rng = make_rng(seed);

    let p = SequenceProbabilityEstimator::new(&model).estimate(args.count, &args.sequence, &mut rng)?;
    log::info!("probability of {:?} over {} samples", args.sequence, args.count);
    println!("{p}");
    Ok(())
}
