//! Wire format for cellframe frames.
//!
//! A frame is a fixed 6-byte header followed by up to 128 sub-frames. Each
//! sub-frame is a fixed 6-byte header followed by up to 32 data cells of 3
//! bytes each. See [`layout`] for the exact byte and bit layout.
//!
//! Parsing is zero-copy: [`parse`] builds a [`ParsedIndex`] of references cast
//! straight out of the caller's buffer, and the nested iterators in [`iter`]
//! walk that index without touching the bytes again.
//!
//! ```
//! use cellframe_proto::{FrameBuilder, FrameType, SubFrameStatus, parse};
//!
//! let bytes = FrameBuilder::new(1, FrameType::Data)
//!     .sub_frame(10, SubFrameStatus::Active, [(3u16, 4u8), (4, 5)])
//!     .sub_frame(11, SubFrameStatus::Pending, [(5u16, 6u8)])
//!     .to_bytes()?;
//!
//! let index = parse(&bytes)?;
//! for sub in &index {
//!     for cell in sub.cells() {
//!         assert!(cell.id() >= 3);
//!     }
//! }
//! # Ok::<(), cellframe_proto::ProtocolError>(())
//! ```
//!
//! # Security
//!
//! All casts use compile-time verified layouts via `zerocopy`; every byte
//! pattern is a valid record. Every read is bounds checked against the buffer
//! and declared counts are capped before anything is indexed. Truncated or
//! malformed input yields an error or a partial index, never a panic.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod encode;
pub mod errors;
pub mod frame;
pub mod iter;
pub mod layout;
pub mod parser;
pub mod record;

pub use encode::FrameBuilder;
pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use iter::{DataCells, SubFrame, SubFrames};
pub use layout::{
    DATA_CELL_SIZE, DataCell, FRAME_HEADER_SIZE, FrameHeader, FrameType, MAX_CELLS_PER_SUBFRAME,
    MAX_SUBFRAMES, SUBFRAME_HEADER_SIZE, SubFrameHeader, SubFrameStatus,
};
pub use parser::{ParseCondition, ParseOutcome, ParsedIndex, parse};
pub use record::{CellRecord, FrameRecord, SubFrameRecord};
