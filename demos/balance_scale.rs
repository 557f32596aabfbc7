extern crate scalesat;

use std::{env, process};

use log::debug;
use scalesat::scale::{self, verify, PuzzleConfig, ScaleError};
use thiserror::Error;

#[derive(Error, Debug)]
enum Error {
    #[error("failed to load config: {0}")]
    Config(#[from] scale::ConfigError),
    #[error("failed to solve: {0}")]
    Solve(#[from] ScaleError),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = match args.len() {
        1 => None,
        2 => args.get(1),
        _ => {
            eprintln!("balance_scale [path to config file]");
            process::exit(-1);
        }
    };
    if let Err(err) = run(config_path) {
        eprintln!("{}", err);
        eprintln!("execution failed");
        process::exit(-1);
    }
}

fn run(config_path: Option<&String>) -> Result<(), Error> {
    let config = match config_path {
        Some(path) => PuzzleConfig::load(path)?,
        None => PuzzleConfig::default(),
    };

    let mut index = 0;
    let enumeration = scale::solve_puzzle(&config, |solution| {
        println!("Solution {}", index);
        println!("{}", solution);
        for target in config.targets() {
            if let Some(placement) = verify::placement_for(solution.weights(), target) {
                debug!("{} = {}", target, placement);
            }
        }
        index += 1;
    })?;

    println!();
    println!("Status = {}", enumeration.status);
    println!("Number of solutions found: {}", enumeration.solution_count());
    Ok(())
}
