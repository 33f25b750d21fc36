//! codetodocx - convert Python source code into a syntax-colored Word document

mod cli;
mod colors;
mod config;
mod convert;
mod docx;
mod error;
mod formatter;
mod mapping;
mod render;
mod syntax;

use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use convert::Converter;
use error::{ConvertError, Result};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let jobs = cli.jobs();
    if jobs.is_empty() {
        return Err(ConvertError::NoInput);
    }

    let converter = Converter::new(cli.resolver()?, cli.render_options(), cli.formatter())?;
    match converter.run_all(&jobs)? {
        0 => Ok(()),
        skipped => Err(ConvertError::Skipped(skipped)),
    }
}
