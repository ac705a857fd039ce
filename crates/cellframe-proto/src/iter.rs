//! Two-level traversal over a [`ParsedIndex`](crate::ParsedIndex).
//!
//! The outer sequence ([`SubFrames`]) yields one [`SubFrame`] view per parsed
//! sub-frame; each view hands out an inner sequence ([`DataCells`]) over its
//! cells. Both are index cursors over slices the parser already built, so
//! advancing and obtaining an inner sequence are O(1). Every view borrows the
//! source buffer. Sequences can be restarted by asking the index (or the
//! sub-frame) for a fresh one.

use std::iter::FusedIterator;

use crate::layout::{DataCell, SubFrameHeader, SubFrameStatus};

/// Borrowed view of one parsed sub-frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubFrame<'a> {
    header: &'a SubFrameHeader,
    cells: &'a [DataCell],
    offset: usize,
    declared_cells: usize,
}

impl<'a> SubFrame<'a> {
    pub(crate) fn new(
        header: &'a SubFrameHeader,
        cells: &'a [DataCell],
        offset: usize,
        declared_cells: usize,
    ) -> Self {
        debug_assert!(cells.len() <= declared_cells);
        Self { header, cells, offset, declared_cells }
    }

    /// Sub-frame header
    #[must_use]
    pub fn header(&self) -> &'a SubFrameHeader {
        self.header
    }

    /// Sub-frame id
    #[must_use]
    pub fn id(&self) -> u32 {
        self.header.id()
    }

    /// Declared byte length of the cell region
    #[must_use]
    pub fn length(&self) -> u16 {
        self.header.length()
    }

    /// Status, if the header carries an assigned value
    #[must_use]
    pub fn status(&self) -> Option<SubFrameStatus> {
        self.header.status()
    }

    /// Byte offset of the sub-frame header within the source buffer
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of cells present
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells the header declares
    #[must_use]
    pub fn declared_cell_count(&self) -> usize {
        self.declared_cells
    }

    /// Whether all declared cells were parsed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.declared_cells
    }

    /// Cell at `index` (O(1))
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&'a DataCell> {
        self.cells.get(index)
    }

    /// Cells as a slice borrowed from the source buffer
    #[must_use]
    pub fn as_cells(&self) -> &'a [DataCell] {
        self.cells
    }

    /// Iterate the cells in wire order
    #[must_use]
    pub fn cells(&self) -> DataCells<'a> {
        DataCells { cells: self.cells, front: 0, back: self.cells.len() }
    }
}

impl<'a> IntoIterator for SubFrame<'a> {
    type Item = &'a DataCell;
    type IntoIter = DataCells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

/// Outer sequence: sub-frames of a parsed frame in wire order
#[derive(Debug, Clone)]
pub struct SubFrames<'i, 'a> {
    sub_frames: &'i [SubFrame<'a>],
    front: usize,
    back: usize,
}

impl<'i, 'a> SubFrames<'i, 'a> {
    pub(crate) fn new(sub_frames: &'i [SubFrame<'a>]) -> Self {
        Self { sub_frames, front: 0, back: sub_frames.len() }
    }

    /// Index of the next sub-frame `next()` yields
    ///
    /// Positions are only comparable between clones of the same sequence.
    #[must_use]
    pub fn position(&self) -> usize {
        self.front
    }
}

impl<'a> Iterator for SubFrames<'_, 'a> {
    type Item = SubFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.sub_frames.get(self.front).copied();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for SubFrames<'_, '_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.sub_frames.get(self.back).copied()
    }
}

impl ExactSizeIterator for SubFrames<'_, '_> {}

impl FusedIterator for SubFrames<'_, '_> {}

/// Inner sequence: data cells of one sub-frame in wire order
#[derive(Debug, Clone)]
pub struct DataCells<'a> {
    cells: &'a [DataCell],
    front: usize,
    back: usize,
}

impl DataCells<'_> {
    /// Index of the next cell `next()` yields
    ///
    /// Positions are only comparable between clones of the same sequence.
    #[must_use]
    pub fn position(&self) -> usize {
        self.front
    }
}

impl<'a> Iterator for DataCells<'a> {
    type Item = &'a DataCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.cells.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for DataCells<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.cells.get(self.back)
    }
}

impl ExactSizeIterator for DataCells<'_> {}

impl FusedIterator for DataCells<'_> {}

#[cfg(test)]
mod tests {
    use crate::{FrameBuilder, FrameType, SubFrameStatus, parse};

    fn sample() -> Vec<u8> {
        let mut builder = FrameBuilder::new(1, FrameType::Control);
        for id in 0..4u32 {
            let cells = (0..id as u16).map(|c| (c, c as u8 * 2));
            builder = builder.sub_frame(id, SubFrameStatus::Complete, cells);
        }
        builder.to_bytes().expect("within capacity").to_vec()
    }

    #[test]
    fn outer_sequence_is_restartable() {
        let buf = sample();
        let index = parse(&buf).expect("should parse");

        let first: Vec<u32> = index.sub_frames().map(|s| s.id()).collect();
        let second: Vec<u32> = index.sub_frames().map(|s| s.id()).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn exact_size_and_reverse() {
        let buf = sample();
        let index = parse(&buf).expect("should parse");

        let mut outer = index.sub_frames();
        assert_eq!(outer.len(), 4);
        assert_eq!(outer.next_back().map(|s| s.id()), Some(3));
        assert_eq!(outer.len(), 3);

        let last = index.sub_frame(3).expect("present");
        let ids: Vec<u16> = last.cells().rev().map(|c| c.id()).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }

    #[test]
    fn positions_track_progress() {
        let buf = sample();
        let index = parse(&buf).expect("should parse");

        let mut outer = index.sub_frames();
        let start = outer.clone();
        assert_eq!(outer.position(), start.position());
        outer.next();
        assert_ne!(outer.position(), start.position());

        let mut cells = index.sub_frame(2).expect("present").cells();
        assert_eq!(cells.nth(1).map(|c| c.symbol_num()), Some(2));
        assert_eq!(cells.position(), 2);
        assert_eq!(cells.next(), None);
        assert_eq!(cells.next(), None);
    }

    #[test]
    fn nested_for_loops() {
        let buf = sample();
        let index = parse(&buf).expect("should parse");

        let mut total = 0;
        for sub in &index {
            for (j, cell) in sub.into_iter().enumerate() {
                assert_eq!(usize::from(cell.id()), j);
                total += 1;
            }
        }
        assert_eq!(total, index.cell_count());
        assert_eq!(total, 6);
    }

    #[test]
    fn views_are_zero_copy() {
        let buf = sample();
        let index = parse(&buf).expect("should parse");
        let range = buf.as_ptr_range();

        for sub in &index {
            let header_ptr: *const u8 = std::ptr::from_ref(sub.header()).cast();
            assert!(range.contains(&header_ptr));
            for cell in sub {
                let cell_ptr: *const u8 = std::ptr::from_ref(cell).cast();
                assert!(range.contains(&cell_ptr));
            }
        }
    }
}
