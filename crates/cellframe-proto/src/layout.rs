//! Fixed binary records of the cellframe wire format.
//!
//! ```text
//! | FrameHeader | sub-frame 0 | sub-frame 1 | .. | sub-frame n-1 |
//!
//! sub-frame:
//! | SubFrameHeader | DataCell 0 | DataCell 1 | .. | DataCell m-1 |
//! ```
//!
//! All multi-byte integers are Little Endian. The records carry no padding and
//! are stored as raw byte arrays so they can be cast directly out of an
//! untrusted buffer with `zerocopy`; every byte pattern is a valid value.
//!
//! # Bit packing
//!
//! Two header fields share a 16-bit word. Bits are numbered from the least
//! significant bit of the Little Endian `u16`:
//!
//! ```text
//! FrameHeader word:     bit 0 = type, bits 1..=15 = sub_frame_count
//! SubFrameHeader word:  bits 0..=13 = length, bits 14..=15 = status
//! ```
//!
//! This is the layout a packed C bit-field produces on little-endian targets,
//! but it is fixed here by masking and shifting, not by compiler choice.

use std::mem::size_of;

use serde_repr::{Deserialize_repr, Serialize_repr};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::errors::{ProtocolError, Result};

/// Size of [`FrameHeader`] on the wire
pub const FRAME_HEADER_SIZE: usize = 6;

/// Size of [`SubFrameHeader`] on the wire
pub const SUBFRAME_HEADER_SIZE: usize = 6;

/// Size of [`DataCell`] on the wire
pub const DATA_CELL_SIZE: usize = 3;

/// Maximum number of sub-frames in one frame
pub const MAX_SUBFRAMES: usize = 128;

/// Maximum number of data cells in one sub-frame
pub const MAX_CELLS_PER_SUBFRAME: usize = 32;

const FRAME_TYPE_MASK: u16 = 0x0001;
const SUB_FRAME_COUNT_SHIFT: u32 = 1;
const SUB_FRAME_COUNT_BITS: u32 = 15;

const LENGTH_MASK: u16 = 0x3FFF;
const LENGTH_BITS: u32 = 14;
const STATUS_SHIFT: u32 = 14;
const STATUS_BITS: u32 = 2;

const _: () = assert!(size_of::<FrameHeader>() == FRAME_HEADER_SIZE);
const _: () = assert!(size_of::<SubFrameHeader>() == SUBFRAME_HEADER_SIZE);
const _: () = assert!(size_of::<DataCell>() == DATA_CELL_SIZE);

/// Largest value representable in a bit field of the given width
const fn field_max(bits: u32) -> u16 {
    ((1u32 << bits) - 1) as u16
}

fn check_field(field: &'static str, value: u16, bits: u32) -> Result<()> {
    if value > field_max(bits) {
        return Err(ProtocolError::FieldOverflow { field, value: value as usize, bits });
    }
    Ok(())
}

/// Frame discriminator carried in the single `type` bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum FrameType {
    /// Regular data frame (bit cleared)
    Data = 0,
    /// Control frame (bit set)
    Control = 1,
}

impl FrameType {
    /// Convert to the raw bit value
    #[must_use]
    pub const fn to_bit(self) -> u8 {
        self as u8
    }

    /// Convert from a raw bit value; only the lowest bit is considered
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 { Self::Data } else { Self::Control }
    }
}

/// Sub-frame status carried in the 2-bit `status` field
///
/// The wire field can also hold `3`, which has no assigned meaning. Such
/// headers still parse; [`SubFrameHeader::status`] returns `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SubFrameStatus {
    /// Cells are not yet processed
    Pending = 0,
    /// Cells are being processed
    Active = 1,
    /// Cells have been fully processed
    Complete = 2,
}

impl SubFrameStatus {
    /// Convert to raw value
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from raw value
    ///
    /// Returns `None` for values without an assigned status.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Active),
            2 => Some(Self::Complete),
            _ => None,
        }
    }
}

/// Fixed 6-byte frame header
///
/// ```text
/// bytes 0..4  id                      u32 LE
/// bytes 4..6  type | sub_frame_count  u16 LE, bit 0 = type
/// ```
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct FrameHeader {
    id: [u8; 4],
    word: [u8; 2],
}

impl FrameHeader {
    /// Size of the serialized header
    pub const SIZE: usize = FRAME_HEADER_SIZE;

    /// Largest count the 15-bit field can carry (the parser accepts at most
    /// [`MAX_SUBFRAMES`])
    pub const MAX_ENCODABLE_COUNT: u16 = field_max(SUB_FRAME_COUNT_BITS);

    /// Create a header from field values.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FieldOverflow`] if `sub_frame_count` does not
    /// fit in 15 bits. Counts above [`MAX_SUBFRAMES`] are still accepted here
    /// so that oversized frames can be produced for testing.
    pub fn new(id: u32, frame_type: FrameType, sub_frame_count: u16) -> Result<Self> {
        check_field("sub_frame_count", sub_frame_count, SUB_FRAME_COUNT_BITS)?;

        let word = u16::from(frame_type.to_bit()) | (sub_frame_count << SUB_FRAME_COUNT_SHIFT);
        Ok(Self { id: id.to_le_bytes(), word: word.to_le_bytes() })
    }

    /// Cast the header out of the start of `bytes` (zero-copy).
    ///
    /// Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(bytes)
            .map(|(header, _)| header)
            .map_err(|_| ProtocolError::TruncatedHeader { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Serialize header to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)] // Common serialization pattern
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }

    fn word(&self) -> u16 {
        u16::from_le_bytes(self.word)
    }

    /// Get the frame id
    #[must_use]
    pub fn id(&self) -> u32 {
        u32::from_le_bytes(self.id)
    }

    /// Get the raw type bit (0 or 1)
    #[must_use]
    pub fn frame_type_bit(&self) -> u8 {
        (self.word() & FRAME_TYPE_MASK) as u8
    }

    /// Get the frame type
    #[must_use]
    pub fn frame_type(&self) -> FrameType {
        FrameType::from_bit(self.frame_type_bit())
    }

    /// Get the declared number of sub-frames
    #[must_use]
    pub fn sub_frame_count(&self) -> u16 {
        self.word() >> SUB_FRAME_COUNT_SHIFT
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("id", &self.id())
            .field("frame_type", &self.frame_type())
            .field("sub_frame_count", &self.sub_frame_count())
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for FrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for FrameHeader {}

/// Fixed 6-byte sub-frame header
///
/// ```text
/// bytes 0..4  id               u32 LE
/// bytes 4..6  length | status  u16 LE, bits 0..=13 = length
/// ```
///
/// `length` counts the bytes of data cells following this header, not the
/// header itself.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct SubFrameHeader {
    id: [u8; 4],
    word: [u8; 2],
}

impl SubFrameHeader {
    /// Size of the serialized header
    pub const SIZE: usize = SUBFRAME_HEADER_SIZE;

    /// Largest length the 14-bit field can carry
    pub const MAX_ENCODABLE_LENGTH: u16 = LENGTH_MASK;

    /// Create a header from field values.
    ///
    /// `length` need not be a multiple of [`DATA_CELL_SIZE`]; malformed
    /// headers are constructible on purpose.
    pub fn new(id: u32, length: u16, status: SubFrameStatus) -> Result<Self> {
        Self::from_raw_parts(id, length, status.to_u8())
    }

    /// Create a header from raw field values, including status bits without
    /// an assigned [`SubFrameStatus`].
    pub fn from_raw_parts(id: u32, length: u16, status_bits: u8) -> Result<Self> {
        check_field("length", length, LENGTH_BITS)?;
        check_field("status", u16::from(status_bits), STATUS_BITS)?;

        let word = length | (u16::from(status_bits) << STATUS_SHIFT);
        Ok(Self { id: id.to_le_bytes(), word: word.to_le_bytes() })
    }

    /// Serialize header to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)] // Common serialization pattern
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }

    fn word(&self) -> u16 {
        u16::from_le_bytes(self.word)
    }

    /// Get the sub-frame id
    #[must_use]
    pub fn id(&self) -> u32 {
        u32::from_le_bytes(self.id)
    }

    /// Get the declared byte length of the data-cell region
    #[must_use]
    pub fn length(&self) -> u16 {
        self.word() & LENGTH_MASK
    }

    /// Get the raw status bits (0..=3)
    #[must_use]
    pub fn status_raw(&self) -> u8 {
        (self.word() >> STATUS_SHIFT) as u8
    }

    /// Get the status, if the bits hold an assigned value
    #[must_use]
    pub fn status(&self) -> Option<SubFrameStatus> {
        SubFrameStatus::from_u8(self.status_raw())
    }

    /// Whether `length` is a whole number of data cells
    #[must_use]
    pub fn is_length_aligned(&self) -> bool {
        usize::from(self.length()) % DATA_CELL_SIZE == 0
    }

    /// Number of whole data cells covered by `length`
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::from(self.length()) / DATA_CELL_SIZE
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for SubFrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubFrameHeader")
            .field("id", &self.id())
            .field("length", &self.length())
            .field("status", &self.status_raw())
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for SubFrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for SubFrameHeader {}

/// Fixed 3-byte data cell
///
/// ```text
/// bytes 0..2  id          u16 LE
/// byte  2     symbol_num  u8
/// ```
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct DataCell {
    id: [u8; 2],
    symbol_num: u8,
}

impl DataCell {
    /// Size of the serialized cell
    pub const SIZE: usize = DATA_CELL_SIZE;

    /// Create a cell from field values
    #[must_use]
    pub const fn new(id: u16, symbol_num: u8) -> Self {
        Self { id: id.to_le_bytes(), symbol_num }
    }

    /// Serialize cell to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)] // Common serialization pattern
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }

    /// Get the cell id
    #[must_use]
    pub fn id(&self) -> u16 {
        u16::from_le_bytes(self.id)
    }

    /// Get the number of symbols
    #[must_use]
    pub fn symbol_num(&self) -> u8 {
        self.symbol_num
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for DataCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCell")
            .field("id", &self.id())
            .field("symbol_num", &self.symbol_num())
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for DataCell {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DataCell {}
