//! Command line inspector for cellframe buffers
//!
//! Reads one frame from a file or stdin, parses it with
//! [`cellframe_proto::parse`], logs the outcome and writes either a text
//! summary or the CBOR-encoded [`cellframe_proto::FrameRecord`]. The binary in
//! `main.rs` is a thin shell over [`run`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod error;
pub mod inspect;

pub use cli::{Args, OutputFormat};
pub use error::InspectError;
pub use inspect::{decode_input, read_input, render_text, run};
