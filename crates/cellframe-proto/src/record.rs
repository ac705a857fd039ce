//! Owned representation of a parsed frame.
//!
//! Views from a [`ParsedIndex`] cannot outlive the buffer they borrow. When
//! frame contents have to be kept, forwarded or archived, convert them into
//! a [`FrameRecord`]: plain owned values that serialize as CBOR and can be
//! turned back into wire bytes.
//!
//! A record made from a partial index holds only what was parsed. Encoding
//! it again yields a complete frame with those contents; sub-frame lengths
//! are recomputed from the cells present.

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::{
    encode::FrameBuilder,
    errors::{ProtocolError, Result},
    iter::SubFrame,
    layout::{DataCell, FrameType, SubFrameStatus},
    parser::ParsedIndex,
};

/// Owned data cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRecord {
    /// Cell id
    pub id: u16,
    /// Number of symbols
    pub symbol_num: u8,
}

impl From<&DataCell> for CellRecord {
    fn from(cell: &DataCell) -> Self {
        Self { id: cell.id(), symbol_num: cell.symbol_num() }
    }
}

impl From<CellRecord> for DataCell {
    fn from(record: CellRecord) -> Self {
        Self::new(record.id, record.symbol_num)
    }
}

/// Owned sub-frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFrameRecord {
    /// Sub-frame id
    pub id: u32,
    /// Sub-frame status
    pub status: SubFrameStatus,
    /// Cells in wire order
    pub cells: Vec<CellRecord>,
}

impl TryFrom<SubFrame<'_>> for SubFrameRecord {
    type Error = ProtocolError;

    fn try_from(sub: SubFrame<'_>) -> Result<Self> {
        let status =
            sub.status().ok_or(ProtocolError::UnknownStatus(sub.header().status_raw()))?;
        Ok(Self { id: sub.id(), status, cells: sub.cells().map(CellRecord::from).collect() })
    }
}

/// Owned frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame id
    pub id: u32,
    /// Frame type
    pub frame_type: FrameType,
    /// Sub-frames in wire order
    pub sub_frames: Vec<SubFrameRecord>,
}

impl FrameRecord {
    /// Copy the contents of an index into owned values
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownStatus`] if a sub-frame carries status
    /// bits without an assigned [`SubFrameStatus`].
    pub fn from_index(index: &ParsedIndex<'_>) -> Result<Self> {
        let sub_frames = index.sub_frames().map(SubFrameRecord::try_from).collect::<Result<_>>()?;
        Ok(Self { id: index.frame_id(), frame_type: index.frame_type(), sub_frames })
    }

    /// Builder holding the same contents
    #[must_use]
    pub fn to_builder(&self) -> FrameBuilder {
        let mut builder = FrameBuilder::new(self.id, self.frame_type);
        for sub in &self.sub_frames {
            builder.push_sub_frame(sub.id, sub.status, sub.cells.iter().copied());
        }
        builder
    }

    /// Encode as wire bytes into `dst`
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        self.to_builder().encode(dst)
    }

    /// Serialize as CBOR
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(self, &mut buf)
            .map_err(|e| ProtocolError::CborEncode(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        ciborium::de::from_reader(bytes).map_err(|e| ProtocolError::CborDecode(e.to_string()))
    }
}
