//! Frame encoding.
//!
//! [`FrameBuilder`] collects field values and writes the wire layout into any
//! [`BufMut`]. Capacity limits are enforced here so that every builder output
//! parses back completely.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    Frame,
    errors::{ProtocolError, Result},
    layout::{
        DATA_CELL_SIZE, DataCell, FRAME_HEADER_SIZE, FrameHeader, FrameType,
        MAX_CELLS_PER_SUBFRAME, MAX_SUBFRAMES, SUBFRAME_HEADER_SIZE, SubFrameHeader,
        SubFrameStatus,
    },
};

impl From<(u16, u8)> for DataCell {
    fn from((id, symbol_num): (u16, u8)) -> Self {
        Self::new(id, symbol_num)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSubFrame {
    id: u32,
    status: SubFrameStatus,
    cells: Vec<DataCell>,
}

/// Builder for a complete wire frame
///
/// ```
/// use cellframe_proto::{FrameBuilder, FrameType, SubFrameStatus, parse};
///
/// let bytes = FrameBuilder::new(1, FrameType::Control)
///     .sub_frame(2, SubFrameStatus::Active, [(3u16, 4u8), (4, 5), (5, 6)])
///     .to_bytes()?;
///
/// let index = parse(&bytes)?;
/// assert!(index.is_complete());
/// assert_eq!(index.cell_count(), 3);
/// # Ok::<(), cellframe_proto::ProtocolError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuilder {
    id: u32,
    frame_type: FrameType,
    sub_frames: Vec<PendingSubFrame>,
}

impl FrameBuilder {
    /// Start a frame with no sub-frames
    #[must_use]
    pub fn new(id: u32, frame_type: FrameType) -> Self {
        Self { id, frame_type, sub_frames: Vec::new() }
    }

    /// Append a sub-frame holding `cells`
    #[must_use]
    pub fn sub_frame<I>(mut self, id: u32, status: SubFrameStatus, cells: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DataCell>,
    {
        self.push_sub_frame(id, status, cells);
        self
    }

    /// Append a sub-frame holding `cells` in place
    pub fn push_sub_frame<I>(&mut self, id: u32, status: SubFrameStatus, cells: I)
    where
        I: IntoIterator,
        I::Item: Into<DataCell>,
    {
        let cells = cells.into_iter().map(Into::into).collect();
        self.sub_frames.push(PendingSubFrame { id, status, cells });
    }

    /// Number of sub-frames added so far
    #[must_use]
    pub fn sub_frame_count(&self) -> usize {
        self.sub_frames.len()
    }

    /// Size of the encoded frame in bytes
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE
            + self
                .sub_frames
                .iter()
                .map(|s| SUBFRAME_HEADER_SIZE + s.cells.len() * DATA_CELL_SIZE)
                .sum::<usize>()
    }

    fn validate(&self) -> Result<()> {
        if self.sub_frames.len() > MAX_SUBFRAMES {
            return Err(ProtocolError::SubFrameCountOverflow {
                count: self.sub_frames.len(),
                max: MAX_SUBFRAMES,
            });
        }

        for (index, sub) in self.sub_frames.iter().enumerate() {
            if sub.cells.len() > MAX_CELLS_PER_SUBFRAME {
                return Err(ProtocolError::CellCountOverflow {
                    sub_frame: index,
                    count: sub.cells.len(),
                    max: MAX_CELLS_PER_SUBFRAME,
                });
            }
        }

        Ok(())
    }

    /// Encode the frame into `dst`
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SubFrameCountOverflow`] or
    /// [`ProtocolError::CellCountOverflow`] if a capacity limit is exceeded.
    /// Nothing is written in that case.
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        self.validate()?;

        // Bounded by MAX_SUBFRAMES and MAX_CELLS_PER_SUBFRAME above, so both
        // fit their bit fields.
        let header = FrameHeader::new(self.id, self.frame_type, self.sub_frames.len() as u16)?;
        dst.put_slice(&header.to_bytes());

        for sub in &self.sub_frames {
            let length = (sub.cells.len() * DATA_CELL_SIZE) as u16;
            let header = SubFrameHeader::new(sub.id, length, sub.status)?;
            dst.put_slice(&header.to_bytes());
            for cell in &sub.cells {
                dst.put_slice(&cell.to_bytes());
            }
        }

        Ok(())
    }

    /// Encode the frame into a fresh buffer
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Encode the frame into an owning [`Frame`]
    pub fn build(&self) -> Result<Frame> {
        self.to_bytes().map(Frame::new)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::parse;

    fn arbitrary_status() -> impl Strategy<Value = SubFrameStatus> {
        prop_oneof![
            Just(SubFrameStatus::Pending),
            Just(SubFrameStatus::Active),
            Just(SubFrameStatus::Complete),
        ]
    }

    fn arbitrary_sub_frame() -> impl Strategy<Value = (u32, SubFrameStatus, Vec<(u16, u8)>)> {
        (
            any::<u32>(),
            arbitrary_status(),
            prop::collection::vec(any::<(u16, u8)>(), 0..=MAX_CELLS_PER_SUBFRAME),
        )
    }

    prop_compose! {
        fn arbitrary_frame()(
            id in any::<u32>(),
            control in any::<bool>(),
            sub_frames in prop::collection::vec(arbitrary_sub_frame(), 0..=MAX_SUBFRAMES),
        ) -> (u32, FrameType, Vec<(u32, SubFrameStatus, Vec<(u16, u8)>)>) {
            let frame_type = if control { FrameType::Control } else { FrameType::Data };
            (id, frame_type, sub_frames)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn encode_then_parse((id, frame_type, subs) in arbitrary_frame()) {
            let mut builder = FrameBuilder::new(id, frame_type);
            for (sub_id, status, cells) in &subs {
                builder.push_sub_frame(*sub_id, *status, cells.iter().copied());
            }

            let bytes = builder.to_bytes().expect("within capacity");
            prop_assert_eq!(bytes.len(), builder.encoded_len());

            let index = parse(&bytes).expect("should parse");
            prop_assert!(index.is_complete());
            prop_assert_eq!(index.frame_id(), id);
            prop_assert_eq!(index.frame_type(), frame_type);
            prop_assert_eq!(index.len(), subs.len());

            for (sub, (sub_id, status, cells)) in index.sub_frames().zip(&subs) {
                prop_assert_eq!(sub.id(), *sub_id);
                prop_assert_eq!(sub.status(), Some(*status));
                prop_assert_eq!(usize::from(sub.length()), cells.len() * DATA_CELL_SIZE);
                let parsed: Vec<(u16, u8)> = sub.cells().map(|c| (c.id(), c.symbol_num())).collect();
                prop_assert_eq!(&parsed, cells);
            }
        }

        #[test]
        fn parse_is_idempotent((id, frame_type, subs) in arbitrary_frame()) {
            let mut builder = FrameBuilder::new(id, frame_type);
            for (sub_id, status, cells) in subs {
                builder.push_sub_frame(sub_id, status, cells);
            }
            let bytes = builder.to_bytes().expect("within capacity");

            prop_assert_eq!(parse(&bytes), parse(&bytes));
        }
    }

    #[test]
    fn reject_too_many_sub_frames() {
        let mut builder = FrameBuilder::new(0, FrameType::Data);
        for id in 0..=MAX_SUBFRAMES as u32 {
            builder.push_sub_frame(id, SubFrameStatus::Pending, Vec::<DataCell>::new());
        }

        let mut buf = Vec::new();
        let result = builder.encode(&mut buf);
        assert_eq!(result, Err(ProtocolError::SubFrameCountOverflow { count: 129, max: 128 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn reject_too_many_cells() {
        let cells = (0..=MAX_CELLS_PER_SUBFRAME as u16).map(|id| (id, 0u8));
        let builder = FrameBuilder::new(0, FrameType::Data)
            .sub_frame(0, SubFrameStatus::Pending, [(1u16, 1u8)])
            .sub_frame(1, SubFrameStatus::Pending, cells);

        assert_eq!(
            builder.to_bytes(),
            Err(ProtocolError::CellCountOverflow { sub_frame: 1, count: 33, max: 32 })
        );
    }

    #[test]
    fn maximum_frame_parses() {
        let mut builder = FrameBuilder::new(u32::MAX, FrameType::Data);
        for id in 0..MAX_SUBFRAMES as u32 {
            let cells = (0..MAX_CELLS_PER_SUBFRAME as u16).map(|c| (c, u8::MAX));
            builder.push_sub_frame(id, SubFrameStatus::Complete, cells);
        }

        let frame = builder.build().expect("within capacity");
        let index = frame.index().expect("should parse");
        assert!(index.is_complete());
        assert_eq!(index.len(), MAX_SUBFRAMES);
        assert_eq!(index.cell_count(), MAX_SUBFRAMES * MAX_CELLS_PER_SUBFRAME);
    }
}
