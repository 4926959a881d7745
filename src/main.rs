pub mod error;
pub mod instance;
pub mod pheromone;
pub mod props;
pub mod selection;
pub mod system;
pub mod utils;

use crate::instance::Instance;
use crate::props::{AntProps, DepositStrategy, TraceLevel};
use crate::system::AntSystem;
use crate::utils::{pretty_matrix, ToDisplayPath};
use anyhow::{Context, Error};
use clap::Parser;
use indicatif::ProgressIterator;
use prettytable::format::consts::FORMAT_BOX_CHARS;
use prettytable::table;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Searches a short closed tour over a TSPLIB instance with an ant system.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TSPLIB file with an EUC_2D NODE_COORD_SECTION
    instance: PathBuf,

    /// Pheromone exponent
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Visibility exponent
    #[arg(long, default_value_t = 2.0)]
    beta: f64,

    /// Evaporation rate, in (0, 1]
    #[arg(long, default_value_t = 0.5)]
    rho: f64,

    #[arg(long, default_value_t = 0.1)]
    initial_pheromone: f64,

    #[arg(short, long, default_value_t = 100)]
    iterations: usize,

    #[arg(short, long, default_value_t = 50)]
    ants: usize,

    /// Deposit per edge: `global` (1 / tour length) or `edge` (1 / edge length)
    #[arg(long, default_value = "global")]
    deposit: DepositStrategy,

    /// Lower bound for evaporated pheromone, 0 disables it
    #[arg(long, default_value_t = 0.0)]
    pheromone_floor: f64,

    /// Seed for a reproducible run, random when absent
    #[arg(short, long)]
    seed: Option<u64>,

    /// off, iterations, ants or steps
    #[arg(long, default_value = "iterations")]
    trace_level: TraceLevel,

    /// Trace file
    #[arg(short, long, default_value = "ant-colony-tsp.out")]
    output: PathBuf,
}

impl Args {
    fn props(&self) -> AntProps {
        AntProps::default()
            .with_alpha(self.alpha)
            .with_beta(self.beta)
            .with_rho(self.rho)
            .with_initial_pheromone(self.initial_pheromone)
            .with_iterations(self.iterations)
            .with_ants(self.ants)
            .with_deposit(self.deposit)
            .with_pheromone_floor(self.pheromone_floor)
            .with_trace(self.trace_level)
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let instance = Instance::from_path(&args.instance)?;
    let distances = instance.distance_matrix()?;
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut ant_system = AntSystem::new(distances, args.props())?;
    let props = ant_system.props().clone();
    let name = instance.name.clone().unwrap_or_else(|| "-".to_owned());

    let mut table = table! {
        ["Instance", name],
        ["Cities", instance.len()],
        ["Ants", props.ants],
        ["Iterations", props.iterations],
        ["Initial city", 0],
        ["𝛼 (alpha)", props.alpha],
        ["𝛽 (beta)", props.beta],
        ["𝜌 (rho)", props.rho],
        ["Deposit", props.deposit],
        ["Initial pheromone", props.initial_pheromone],
        ["Pheromone floor", props.pheromone_floor],
        ["Seed", seed]
    };
    table.set_format(*FORMAT_BOX_CHARS);

    let out = File::create(&args.output)
        .with_context(|| format!("couldn't create {}", args.output.display()))?;
    let mut out = BufWriter::new(out);

    writeln!(out, "Parameters")?;
    writeln!(out, "{}\n", table)?;

    if props.trace >= TraceLevel::Ants {
        writeln!(
            out,
            "Visibility matrix:\n{}",
            pretty_matrix(ant_system.visibility(), 6)
        )?;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in (0..props.iterations).progress() {
        ant_system.iterate(&mut rng, &mut out)?;
    }

    let tour = ant_system
        .best_tour()
        .context("the ant system finished without a tour")?
        .to_display_path();
    let length = ant_system.best_length();

    writeln!(out, "\nGlobal best path: {} with cost {}", tour, length)?;
    out.flush()?;

    let mut result = table! {
        ["Best path", tour],
        ["Distance", length]
    };
    result.set_format(*FORMAT_BOX_CHARS);
    result.printstd();

    Ok(())
}
