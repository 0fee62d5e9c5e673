//! Command-line interface for xvert.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::convert::{find_convertible_files, Runner};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Convert plain `:param`/`:return` docstrings to NumPy format.
///
/// Converted copies are written next to each input file. Nothing is
/// overwritten: after checking the copies, run the generated rename script.
#[derive(Parser)]
#[command(name = "xvert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to walk through to find files for conversion
    #[arg(short = 'i', long = "i-folder")]
    pub i_folder: PathBuf,

    /// File path to the script to run to replace the non-converted files
    /// with the converted files (after checking)
    #[arg(short = 'o', long = "o-mv")]
    pub o_mv: Option<PathBuf>,
}

/// Run a conversion.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let metadata = std::fs::metadata(&cli.i_folder).map_err(|e| {
        anyhow::anyhow!("cannot access input folder {}: {}", cli.i_folder.display(), e)
    })?;
    if !metadata.is_dir() {
        anyhow::bail!("input path {} is not a folder", cli.i_folder.display());
    }

    let config = Config::load_for(&cli.i_folder)?;
    let jobs = find_convertible_files(&cli.i_folder, &config)?;
    tracing::info!(files = jobs.len(), "files with plain docstrings");

    let runner = Runner::new(&config);
    let result = runner.run(&jobs, report::write_progress)?;

    if let Some(script) = &cli.o_mv {
        report::write_script(script, &result.commands)?;
    }
    report::write_pretty(&result, cli.o_mv.as_deref());

    Ok(EXIT_SUCCESS)
}
