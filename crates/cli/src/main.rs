//! Economy CLI
//!
//! Line-oriented client for experimenting with the market. Type `help`
//! at the prompt for the command list.

mod command;
mod config;
mod session;

use std::io::{self, BufRead, Write};

use economy_clock::SystemClock;
use economy_market::InMemoryAccounts;
use env_logger::Env;
use log::{info, warn};

use crate::command::{Command, CommandError};
use crate::config::{CliConfig, DATA_FILE_ENV, load_config, load_default_config};
use crate::session::Session;

fn print_help() {
    eprintln!(
        r#"Economy - continuous two-sided market playground

USAGE:
    economy [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    ECONOMY_DATA        Snapshot file (overrides the config)
    RUST_LOG            Log level filter
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config: CliConfig = match &config_path {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();
    if let Some(path) = &config_path {
        info!("Loaded configuration from: {}", path);
    }

    let accounts = InMemoryAccounts::new();
    for seed in &config.accounts {
        accounts.set_balance(seed.id, seed.balance);
    }
    let data_file = config.data_file_with_override(std::env::var(DATA_FILE_ENV).ok());
    info!(
        "Data file: {}, seeded accounts: {}",
        data_file.display(),
        config.accounts.len()
    );

    let session = Session::new(accounts, SystemClock::millis(), data_file);
    run(&session)
}

fn run(session: &Session<SystemClock>) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = session.execute(command, &mut stdout) {
                    warn!("Command failed: {}", e);
                    writeln!(stdout, "{}", e)?;
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => writeln!(stdout, "{}", e)?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}
