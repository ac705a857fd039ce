//! Single-pass frame parser producing a borrowed index.
//!
//! [`parse`] walks the buffer once and records where every sub-frame header
//! and data cell lives. Nothing is copied: the resulting [`ParsedIndex`] holds
//! references cast out of the caller's buffer, so the borrow checker keeps
//! the buffer alive and unmodified for as long as the index exists.
//!
//! # Outcomes
//!
//! - **Rejected**: `Err(ProtocolError)`. The frame header is truncated or a
//!   declared count exceeds static capacity. No index is produced.
//! - **Partial**: `Ok(index)` with [`ParseOutcome::Partial`]. Parsing stopped
//!   early on truncated data or a malformed sub-frame length; everything
//!   parsed before that point is valid and iterable.
//! - **Complete**: `Ok(index)` with [`ParseOutcome::Complete`].
//!
//! The parser never logs and never panics, whatever the input.

use zerocopy::FromBytes;

use crate::{
    errors::{ProtocolError, Result},
    iter::{SubFrame, SubFrames},
    layout::{
        DATA_CELL_SIZE, DataCell, FRAME_HEADER_SIZE, FrameHeader, FrameType,
        MAX_CELLS_PER_SUBFRAME, MAX_SUBFRAMES, SUBFRAME_HEADER_SIZE, SubFrameHeader,
    },
};

/// Why a parse stopped before consuming every declared sub-frame and cell
///
/// Offsets are byte positions within the parsed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseCondition {
    /// Buffer ended before the next sub-frame header or data cell
    Truncated {
        /// Where the incomplete record starts
        offset: usize,
        /// Size of the record that did not fit
        needed: usize,
        /// Bytes left in the buffer at `offset`
        available: usize,
    },

    /// Sub-frame length is not a multiple of the data-cell size
    ///
    /// The offending sub-frame is not part of the index.
    InvalidSubFrameLength {
        /// Position of the sub-frame within the frame
        sub_frame: usize,
        /// Where its header starts
        offset: usize,
        /// Declared length
        length: u16,
    },
}

impl std::fmt::Display for ParseCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Truncated { offset, needed, available } => write!(
                f,
                "truncated at offset {offset}: needed {needed} bytes, {available} available"
            ),
            Self::InvalidSubFrameLength { sub_frame, offset, length } => write!(
                f,
                "sub-frame {sub_frame} at offset {offset} has length {length}, not a multiple of {DATA_CELL_SIZE}"
            ),
        }
    }
}

/// Result of a successful (possibly partial) parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every declared sub-frame and cell was parsed
    Complete,
    /// Parsing stopped early; the index holds what came before
    Partial(ParseCondition),
}

/// Borrowed index over one parsed frame
///
/// Built by [`parse`]. Holds only references into the source buffer and is
/// read-only for its whole lifetime; parse again to index a new buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIndex<'a> {
    header: &'a FrameHeader,
    sub_frames: Vec<SubFrame<'a>>,
    outcome: ParseOutcome,
    consumed: usize,
    buffer_len: usize,
}

impl<'a> ParsedIndex<'a> {
    /// Frame header
    #[must_use]
    pub fn header(&self) -> &'a FrameHeader {
        self.header
    }

    /// Frame id
    #[must_use]
    pub fn frame_id(&self) -> u32 {
        self.header.id()
    }

    /// Frame type
    #[must_use]
    pub fn frame_type(&self) -> FrameType {
        self.header.frame_type()
    }

    /// Number of sub-frames the header declares
    #[must_use]
    pub fn declared_sub_frames(&self) -> usize {
        usize::from(self.header.sub_frame_count())
    }

    /// Number of sub-frames present in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.sub_frames.len()
    }

    /// Whether the index holds no sub-frames
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sub_frames.is_empty()
    }

    /// Total number of data cells present in the index
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.sub_frames.iter().map(SubFrame::cell_count).sum()
    }

    /// How the parse ended
    #[must_use]
    pub fn outcome(&self) -> ParseOutcome {
        self.outcome
    }

    /// The condition that stopped a partial parse
    #[must_use]
    pub fn condition(&self) -> Option<ParseCondition> {
        match self.outcome {
            ParseOutcome::Complete => None,
            ParseOutcome::Partial(condition) => Some(condition),
        }
    }

    /// Whether every declared sub-frame and cell was parsed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == ParseOutcome::Complete
    }

    /// Bytes of the buffer covered by parsed records
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes after the last declared sub-frame of a complete parse
    ///
    /// Always zero for partial parses.
    #[must_use]
    pub fn trailing_len(&self) -> usize {
        if self.is_complete() { self.buffer_len - self.consumed } else { 0 }
    }

    /// Sub-frame at `index` (O(1))
    #[must_use]
    pub fn sub_frame(&self, index: usize) -> Option<SubFrame<'a>> {
        self.sub_frames.get(index).copied()
    }

    /// Iterate the sub-frames in wire order
    #[must_use]
    pub fn sub_frames(&self) -> SubFrames<'_, 'a> {
        SubFrames::new(&self.sub_frames)
    }
}

impl<'i, 'a> IntoIterator for &'i ParsedIndex<'a> {
    type Item = SubFrame<'a>;
    type IntoIter = SubFrames<'i, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.sub_frames()
    }
}

/// Read position within the source buffer
struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a [u8] {
        self.buffer.get(self.offset..).unwrap_or_default()
    }

    fn advance(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.buffer.len());
    }

    fn truncated(&self, needed: usize) -> ParseOutcome {
        ParseOutcome::Partial(ParseCondition::Truncated {
            offset: self.offset,
            needed,
            available: self.rest().len(),
        })
    }
}

/// Parse one frame from `buffer`.
///
/// # Errors
///
/// Returns `ProtocolError` if:
/// - Buffer is shorter than the frame header (`TruncatedHeader`)
/// - Header declares more than [`MAX_SUBFRAMES`] sub-frames
///   (`SubFrameCountOverflow`)
/// - A sub-frame declares more than [`MAX_CELLS_PER_SUBFRAME`] cells
///   (`CellCountOverflow`)
///
/// Truncated sub-frame data and malformed sub-frame lengths are not errors;
/// see [`ParseOutcome::Partial`].
pub fn parse(buffer: &[u8]) -> Result<ParsedIndex<'_>> {
    let header = FrameHeader::from_bytes(buffer)?;

    let declared = usize::from(header.sub_frame_count());
    if declared > MAX_SUBFRAMES {
        return Err(ProtocolError::SubFrameCountOverflow { count: declared, max: MAX_SUBFRAMES });
    }

    let mut cursor = Cursor { buffer, offset: FRAME_HEADER_SIZE };
    let mut sub_frames = Vec::with_capacity(declared);
    let outcome = index_sub_frames(&mut cursor, declared, &mut sub_frames)?;

    debug_assert!(sub_frames.len() <= declared);
    debug_assert!(cursor.offset <= buffer.len());

    Ok(ParsedIndex { header, sub_frames, outcome, consumed: cursor.offset, buffer_len: buffer.len() })
}

fn index_sub_frames<'a>(
    cursor: &mut Cursor<'a>,
    declared: usize,
    sub_frames: &mut Vec<SubFrame<'a>>,
) -> Result<ParseOutcome> {
    for index in 0..declared {
        let offset = cursor.offset;
        let Ok((header, _)) = SubFrameHeader::ref_from_prefix(cursor.rest()) else {
            return Ok(cursor.truncated(SUBFRAME_HEADER_SIZE));
        };
        cursor.advance(SUBFRAME_HEADER_SIZE);

        if !header.is_length_aligned() {
            return Ok(ParseOutcome::Partial(ParseCondition::InvalidSubFrameLength {
                sub_frame: index,
                offset,
                length: header.length(),
            }));
        }

        let declared_cells = header.cell_count();
        if declared_cells > MAX_CELLS_PER_SUBFRAME {
            return Err(ProtocolError::CellCountOverflow {
                sub_frame: index,
                count: declared_cells,
                max: MAX_CELLS_PER_SUBFRAME,
            });
        }

        let fitting = declared_cells.min(cursor.rest().len() / DATA_CELL_SIZE);
        let Ok((cells, _)) = <[DataCell]>::ref_from_prefix_with_elems(cursor.rest(), fitting)
        else {
            return Ok(cursor.truncated(DATA_CELL_SIZE));
        };

        sub_frames.push(SubFrame::new(header, cells, offset, declared_cells));
        cursor.advance(fitting * DATA_CELL_SIZE);

        if fitting < declared_cells {
            return Ok(cursor.truncated(DATA_CELL_SIZE));
        }
    }

    Ok(ParseOutcome::Complete)
}
