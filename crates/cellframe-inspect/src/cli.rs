//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Parse a cellframe buffer and summarize its contents.
#[derive(Debug, Clone, Parser)]
#[command(name = "cellframe-inspect", version)]
pub struct Args {
    /// Frame file to read (`-` reads stdin)
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Input is hex text rather than raw bytes
    #[arg(long)]
    pub hex: bool,

    /// What to write to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit non-zero when the frame is only partially parsed
    #[arg(long)]
    pub strict: bool,

    /// Log filter (tracing `EnvFilter` syntax); logs go to stderr
    #[arg(long, env = "CELLFRAME_LOG", default_value = "info")]
    pub log: String,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing of sub-frames and cells
    Text,
    /// CBOR-encoded frame record
    Cbor,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["cellframe-inspect"]).expect("valid");
        assert_eq!(args.input, PathBuf::from("-"));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.hex);
        assert!(!args.strict);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "cellframe-inspect",
            "frame.bin",
            "--hex",
            "--format",
            "cbor",
            "--strict",
            "--log",
            "debug",
        ])
        .expect("valid");
        assert_eq!(args.input, PathBuf::from("frame.bin"));
        assert_eq!(args.format, OutputFormat::Cbor);
        assert!(args.hex && args.strict);
        assert_eq!(args.log, "debug");
    }
}
