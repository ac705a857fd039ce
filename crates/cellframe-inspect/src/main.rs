//! cellframe-inspect binary

use std::{io::Write, process::ExitCode};

use cellframe_inspect::{Args, InspectError, run};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(filter: &str) -> Result<(), InspectError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| InspectError::LogFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })?;

    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log) {
        // No subscriber yet; report directly
        let _ = writeln!(std::io::stderr(), "cellframe-inspect: {e}");
        return ExitCode::from(e.exit_code());
    }

    match run(&args, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Inspection failed");
            ExitCode::from(e.exit_code())
        },
    }
}
