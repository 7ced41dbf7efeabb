use std::process::ExitCode;

use anyhow::Result;

use java_indent::config::{Config, OutputFormat};
use java_indent::core::{render_json, render_text};
use java_indent::runner;

const EXIT_CLEAN: u8 = 0;
const EXIT_VIOLATIONS: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<u8> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let outcome = runner::run(&config);
    let output = match config.format {
        OutputFormat::Text => render_text(&outcome.reports),
        OutputFormat::Json => format!("{}\n", render_json(&outcome.reports)?),
    };
    print!("{}", output);

    log::info!(
        "{} violations in {} files",
        outcome.violation_count(),
        outcome.reports.len()
    );

    Ok(if outcome.failures > 0 {
        EXIT_ERROR
    } else if outcome.violation_count() > 0 {
        EXIT_VIOLATIONS
    } else {
        EXIT_CLEAN
    })
}
