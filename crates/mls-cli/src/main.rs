//! Command-line front end: solve stack definitions, inspect materials.
//!
//! Usage:
//!   mls solve stack.toml --output results.json
//!   mls solve stack.toml --frequencies 100:10:2000 --angles 0,45
//!   mls medium foam.toml --frequency 1000

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use mls_core::media::MediumType;
use mls_core::{load_medium, load_stack, AnalysisResult, AnalysisSpec, Medium};
use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mls")]
#[command(version, about = "Reflection and transmission of acoustic multilayers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the analyses of a stack definition
    Solve {
        /// Stack definition (TOML)
        stack: PathBuf,

        /// Draws per stochastic layer
        #[arg(long)]
        draws: Option<usize>,

        /// Seed of the stochastic campaigns
        #[arg(long)]
        seed: Option<u64>,

        /// Solve this frequency literal instead of the declared analyses
        #[arg(short, long)]
        frequencies: Option<String>,

        /// Angle literal used with --frequencies
        #[arg(short, long, default_value = "0")]
        angles: String,

        /// Write the results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the frequency-dependent properties of a material
    Medium {
        /// Material file (TOML)
        file: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value_t = 1000.0)]
        frequency: f64,

        /// Override the medium type written in the file
        #[arg(long = "type")]
        medium_type: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Solve {
            stack,
            draws,
            seed,
            frequencies,
            angles,
            output,
        } => solve(stack, draws, seed, frequencies, angles, output),
        Commands::Medium {
            file,
            frequency,
            medium_type,
        } => medium(file, frequency, medium_type),
    }
}

fn solve(
    stack: PathBuf,
    draws: Option<usize>,
    seed: Option<u64>,
    frequencies: Option<String>,
    angles: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut solver =
        load_stack(&stack).with_context(|| format!("loading stack {}", stack.display()))?;
    if let Some(draws) = draws {
        solver = solver.with_draws(draws);
    }
    if let Some(seed) = seed {
        solver = solver.with_seed(seed);
    }
    for layer in &solver.layers {
        info!("{layer}");
    }

    let results = match frequencies {
        Some(f) => solver.solve(AnalysisSpec::Literal(f), AnalysisSpec::Literal(angles)),
        None => {
            if solver.analyses.is_empty() {
                bail!("{} declares no analysis, pass --frequencies", stack.display());
            }
            solver.solve_all()
        }
    }
    .context("solving stack")?;

    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&results)?;
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} result(s) to {}", results.len(), path.display());
        }
        None => results.iter().for_each(print_summary),
    }
    Ok(())
}

/// Draw-averaged indicators per point.
fn print_summary(result: &AnalysisResult) {
    match &result.stochastics {
        Some(s) => println!(
            "# {} - layer {} {} over {} draws (seed {})",
            result.name,
            s.layer,
            s.parameter,
            s.values.len(),
            s.seed
        ),
        None => println!("# {}", result.name),
    }
    println!("frequency\tangle\tabsorption\ttransmission_loss");
    for (i_f, f) in result.frequencies.iter().enumerate() {
        for (i_a, a) in result.angles.iter().enumerate() {
            let alpha = result.mean_absorption(i_f, i_a);
            let tl = result
                .mean_transmission_loss(i_f, i_a)
                .map(|tl| format!("{tl:.3}"))
                .unwrap_or_else(|| "-".into());
            println!("{f}\t{a}\t{alpha:.4}\t{tl}");
        }
    }
}

fn medium(file: PathBuf, frequency: f64, medium_type: Option<String>) -> Result<()> {
    let force = medium_type
        .map(|t| t.parse::<MediumType>())
        .transpose()?;
    let mut medium =
        load_medium(&file, force).with_context(|| format!("loading {}", file.display()))?;
    let omega = 2.0 * PI * frequency;
    medium.update(omega);

    println!("{medium} at {frequency} Hz");
    match &medium {
        Medium::Fluid(m) => {
            println!("rho = {}", m.rho);
            println!("c = {}", m.c);
            println!("Z = {}", m.impedance());
        }
        Medium::EquivalentFluid(m) => {
            let s = m.state()?;
            println!("rho_eq = {}", s.rho_eq);
            println!("K_eq = {}", s.k_eq);
            println!("c_eq = {}", s.c_eq);
            println!("Z_eq = {}", s.rho_eq * s.c_eq);
        }
        Medium::Elastic(m) => {
            let (lambda, mu) = m.lame();
            println!("lambda = {lambda}");
            println!("mu = {mu}");
            println!("c_p = {}", ((lambda + 2.0 * mu) / m.rho).sqrt());
            println!("c_s = {}", (mu / m.rho).sqrt());
        }
        Medium::PoroElastic(m) | Medium::Screen(m) => {
            let s = m.state()?;
            println!("rho_eq = {}", s.rho_eq);
            println!("K_eq = {}", s.k_eq);
            for (i, d) in s.delta.iter().enumerate() {
                println!("delta_{} = {d}", i + 1);
            }
            println!("N = {}", s.n);
        }
    }
    Ok(())
}
