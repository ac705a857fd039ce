//! Re-encoding fuzzer
//!
//! Whatever parses (fully or partially) must survive conversion to an owned
//! record, re-encoding, and a second parse with identical contents.

#![no_main]

use cellframe_proto::{FrameRecord, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(index) = parse(data) else {
        return;
    };
    let Ok(record) = FrameRecord::from_index(&index) else {
        return; // unknown status bits
    };

    let mut wire = Vec::new();
    record.encode(&mut wire).expect("parsed frames are within capacity");

    let reparsed = parse(&wire).expect("encoder output parses");
    assert!(reparsed.is_complete());
    assert_eq!(FrameRecord::from_index(&reparsed).ok(), Some(record));
});
