//! Inspector error types.

use std::{io, path::PathBuf};

use cellframe_proto::{ParseCondition, ProtocolError};
use thiserror::Error;

/// Errors that end an inspection run
#[derive(Debug, Error)]
pub enum InspectError {
    /// Input could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Input path (`-` for stdin)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// `--hex` input is not valid hex
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Frame rejected by the parser, or its contents could not be encoded
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Frame only partially parsed under `--strict`
    #[error("frame only partially parsed: {0}")]
    Partial(ParseCondition),

    /// Log filter directive could not be parsed
    #[error("invalid log filter {filter:?}: {reason}")]
    LogFilter {
        /// Directive as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// Output could not be written
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl InspectError {
    /// Process exit code for this error
    ///
    /// `1` when the frame itself is at fault, `2` for environment problems.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Protocol(_) | Self::Partial(_) => 1,
            Self::Read { .. } | Self::Hex(_) | Self::LogFilter { .. } | Self::Output(_) => 2,
        }
    }
}
