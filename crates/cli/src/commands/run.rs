use anyhow::{Context, Result};
use moran_sim::simulation::{Simulation, SimulationConfig};
use moran_sim::storage::{DirectorySink, HistorySink};

use crate::args::{default_parameter, RunArgs};
use crate::printing::{print_header, print_run_parameters, print_run_result};

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    print_header("Running Simulation");

    let parameter = args.parameter.unwrap_or_else(|| default_parameter(args.policy));
    let policy = args
        .policy
        .with_parameter(parameter)
        .context("Invalid policy parameter")?;
    let config = SimulationConfig::new(
        args.population_size,
        args.initial_mutants,
        policy,
        Some(args.max_steps),
        args.seed,
    )
    .context("Invalid simulation parameters")?;

    print_run_parameters(&config);

    let run = Simulation::new(config)
        .context("Failed to initialize simulation")?
        .run();

    let artifact = if args.recording.no_save {
        None
    } else {
        let rec = &args.recording;
        let sink = DirectorySink::new(&rec.output_dir, rec.format, rec.collision);
        let name = sink
            .persist(args.run_number, &run.history)
            .context("Failed to save history")?;
        Some(sink.path_for(&name))
    };

    print_run_result(&run, artifact.as_deref());
    Ok(())
}
