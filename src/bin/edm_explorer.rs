use clap::Parser;
use edm_explorer::cli::{run_cli, Cli};
use edm_explorer::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    if let Err(err) = init_logging(&log_config) {
        eprintln!("warning: {err:#}");
    }

    let stdout = std::io::stdout();
    match run_cli(&cli, &mut stdout.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
