use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Appends the results as JSON to this file
    #[arg(short, long, global = true)]
    pub out_file: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compares the recursive contraction with the lightcone network for random angles
    Compare {
        #[arg(short, long)]
        layers: usize,
        #[arg(short, long, default_value_t = 3)]
        degree: usize,
        #[arg(short, long, default_value_t = 10)]
        seeds: u64,
        #[arg(short, long, default_value_t = 1e-8)]
        tolerance: f64,
    },
    /// Times the recursive contraction for a range of layers
    Sweep {
        #[arg(long, default_value_t = 1)]
        min_layers: usize,
        #[arg(long)]
        max_layers: usize,
        #[arg(short, long, default_value_t = 3)]
        degree: usize,
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },
    /// Reports the contraction width of the lightcone network
    Width {
        #[arg(short, long)]
        layers: usize,
        #[arg(short, long, default_value_t = 3)]
        degree: usize,
    },
}
