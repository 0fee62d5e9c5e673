//! xvert CLI entry point.

use clap::Parser;
use xvert::cli::{self, Cli, EXIT_ERROR};
use xvert::logger;

fn main() {
    let cli = Cli::parse();
    logger::init_logger(!logger::should_use_colors());

    let exit_code = match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
