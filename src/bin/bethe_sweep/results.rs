use std::{fs, time::Duration};

use anyhow::{Context, Result};
use bethe_qaoa::contractionpath::paths::Heuristic;
use bethe_qaoa::types::QaoaParams;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub enum RunResult {
    Compare {
        seed: u64,
        layers: usize,
        degree: usize,
        params: QaoaParams,
        recursive: f64,
        reference: f64,
        recursive_time: Duration,
        reference_time: Duration,
    },
    Sweep {
        layers: usize,
        degree: usize,
        params: QaoaParams,
        value: f64,
        time: Duration,
    },
    Width {
        layers: usize,
        degree: usize,
        heuristic: Heuristic,
        width: usize,
        flops: f64,
    },
}

/// Appends results to a file, if one was given.
#[derive(Default)]
pub struct Writer(Option<fs::File>);

impl Writer {
    pub fn new(filename: Option<&str>) -> Result<Self> {
        let Some(filename) = filename else {
            return Ok(Self::default());
        };
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(filename)
            .with_context(|| format!("Failed to open {filename}"))?;
        Ok(Self(Some(file)))
    }

    pub fn write(&mut self, result: &RunResult) -> Result<()> {
        if let Some(file) = &mut self.0 {
            serde_json::to_writer(file, &[result])?;
        }
        Ok(())
    }
}
