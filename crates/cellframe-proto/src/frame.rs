//! Owning frame buffer.
//!
//! A `Frame` holds the raw bytes delivered by a transport. Indexes are
//! borrowed from it on demand, so the compiler rejects any attempt to drop or
//! replace the buffer while views are outstanding. Cloning a `Frame` is cheap
//! (`Bytes` is reference counted).

use bytes::Bytes;

use crate::{errors::Result, parser::ParsedIndex};

/// Raw bytes of a single frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Take ownership of a received buffer
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into() }
    }

    /// Raw bytes
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Give the raw bytes back
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Buffer length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Parse the buffer into a borrowed index
    ///
    /// Each call runs a fresh parse; the index lives no longer than `self`.
    pub fn index(&self) -> Result<ParsedIndex<'_>> {
        crate::parse(&self.bytes)
    }
}

impl From<Bytes> for Frame {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Frame {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameBuilder, FrameType, ProtocolError, SubFrameStatus};

    #[test]
    fn index_borrows_frame() {
        let frame = FrameBuilder::new(9, FrameType::Data)
            .sub_frame(1, SubFrameStatus::Pending, [(1u16, 2u8)])
            .build()
            .expect("within capacity");

        let index = frame.index().expect("should parse");
        assert_eq!(index.frame_id(), 9);
        assert_eq!(index.consumed(), frame.len());
    }

    #[test]
    fn empty_frame_is_rejected() {
        let frame = Frame::default();
        assert!(frame.is_empty());
        assert_eq!(frame.index(), Err(ProtocolError::TruncatedHeader { expected: 6, actual: 0 }));
    }

    #[test]
    fn clones_share_bytes() {
        let frame = Frame::from(vec![0u8; 6]);
        let copy = frame.clone();
        assert_eq!(frame.bytes().as_ptr(), copy.bytes().as_ptr());
    }
}
