//! Random input fuzzer for the frame parser
//!
//! Feeds arbitrary bytes to `parse` and checks that it never panics and that
//! every view it hands out lies inside the input buffer.

#![no_main]

use cellframe_proto::{MAX_CELLS_PER_SUBFRAME, MAX_SUBFRAMES, SUBFRAME_HEADER_SIZE, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(index) = parse(data) else {
        return;
    };

    assert!(index.consumed() <= data.len());
    assert!(index.len() <= MAX_SUBFRAMES);
    assert!(index.len() <= index.declared_sub_frames());

    let range = data.as_ptr_range();
    let mut cells = 0;
    for sub in &index {
        assert!(sub.offset() + SUBFRAME_HEADER_SIZE <= data.len());
        assert!(sub.cell_count() <= MAX_CELLS_PER_SUBFRAME);
        for cell in sub {
            let ptr: *const u8 = std::ptr::from_ref(cell).cast();
            assert!(range.contains(&ptr));
            cells += 1;
        }
    }
    assert_eq!(cells, index.cell_count());

    // Parsing is a pure function of the buffer
    assert_eq!(parse(data).ok().as_ref(), Some(&index));
});
