use anyhow::{ensure, Result};
use bethe_qaoa::builders::bethe::bethe_graph;
use bethe_qaoa::contractionpath::paths::Heuristic;
use bethe_qaoa::simulator::{edge_expectation, lightcone_cost};
use bethe_qaoa::tree::recursion::TreeContractor;
use bethe_qaoa::types::{Observable, QaoaParams};
use bethe_qaoa::utils::timing::timed;
use clap::Parser;
use flexi_logger::{json_format, Duplicate, FileSpec, Logger, LoggerHandle};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{Cli, Command};
use crate::results::{RunResult, Writer};

mod cli;
mod results;

/// Logs to a JSON file and duplicates everything from info level to stdout.
fn setup_logging() -> Result<LoggerHandle> {
    let logger = Logger::with(LevelFilter::Debug)
        .format(json_format)
        .log_to_file(
            FileSpec::default()
                .suppress_timestamp()
                .suffix("log.json"),
        )
        .duplicate_to_stdout(Duplicate::Info)
        .start()?;
    Ok(logger)
}

fn compare(
    layers: usize,
    degree: usize,
    seeds: u64,
    tolerance: f64,
    writer: &mut Writer,
) -> Result<()> {
    let graph = bethe_graph(layers, degree)?;
    for seed in 0..seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = QaoaParams::random(layers, &mut rng)?;

        let (recursive, recursive_time) = timed("recursive", || {
            TreeContractor::new(&params, degree)?.expectation(Observable::PAULI_Z)
        });
        let recursive = recursive?;
        let (reference, reference_time) = timed("reference", || {
            edge_expectation(&graph, &params, (0, 1), Observable::PAULI_Z)
        });
        let reference = reference?;

        info!(seed, recursive:% = recursive, reference:% = reference; "Compared methods");
        ensure!(
            (recursive - reference).norm() <= tolerance,
            "Methods disagree for seed {seed}: {recursive} vs {reference}"
        );
        writer.write(&RunResult::Compare {
            seed,
            layers,
            degree,
            params,
            recursive: recursive.re,
            reference: reference.re,
            recursive_time,
            reference_time,
        })?;
    }
    Ok(())
}

fn sweep(
    min_layers: usize,
    max_layers: usize,
    degree: usize,
    seed: u64,
    writer: &mut Writer,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    for layers in min_layers..=max_layers {
        let params = QaoaParams::random(layers, &mut rng)?;
        let (value, time) = timed("recursive", || {
            TreeContractor::new(&params, degree)?.expectation(Observable::PAULI_Z)
        });
        let value = value?;
        info!(layers, value = value.re; "Finished layer count");
        writer.write(&RunResult::Sweep {
            layers,
            degree,
            params,
            value: value.re,
            time,
        })?;
    }
    Ok(())
}

fn width(layers: usize, degree: usize, writer: &mut Writer) -> Result<()> {
    let graph = bethe_graph(layers, degree)?;
    let params = QaoaParams::new(vec![0.0; layers], vec![0.0; layers])?;
    let heuristic = Heuristic::MinFill;
    let (flops, width) = lightcone_cost(&graph, &params, (0, 1), heuristic)?;
    println!("layers={layers} degree={degree} width={width} flops={flops:e}");
    writer.write(&RunResult::Width {
        layers,
        degree,
        heuristic,
        width,
        flops,
    })
}

fn main() -> Result<()> {
    let _logger = setup_logging()?;
    let args = Cli::parse();
    let mut writer = Writer::new(args.out_file.as_deref())?;

    match args.command {
        Command::Compare {
            layers,
            degree,
            seeds,
            tolerance,
        } => compare(layers, degree, seeds, tolerance, &mut writer),
        Command::Sweep {
            min_layers,
            max_layers,
            degree,
            seed,
        } => sweep(min_layers, max_layers, degree, seed, &mut writer),
        Command::Width { layers, degree } => width(layers, degree, &mut writer),
    }
}
