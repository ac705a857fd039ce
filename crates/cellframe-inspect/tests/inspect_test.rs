//! End-to-end runs of the inspector over frame files on disk.

use std::{io::Write, path::PathBuf};

use cellframe_inspect::{Args, InspectError, OutputFormat, run};
use cellframe_proto::{FrameBuilder, FrameRecord, FrameType, ProtocolError, SubFrameStatus};
use tempfile::NamedTempFile;

fn sample_bytes() -> Vec<u8> {
    FrameBuilder::new(1, FrameType::Control)
        .sub_frame(2, SubFrameStatus::Active, [(3u16, 4u8), (4, 5), (5, 6)])
        .sub_frame(2, SubFrameStatus::Active, [(3u16, 4u8), (4, 5), (5, 6)])
        .to_bytes()
        .expect("within capacity")
        .to_vec()
}

fn write_input(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file
}

fn args(input: PathBuf) -> Args {
    Args { input, hex: false, format: OutputFormat::Text, strict: false, log: "off".to_string() }
}

#[test]
fn text_report_for_complete_frame() {
    let file = write_input(&sample_bytes());
    let mut out = Vec::new();

    run(&args(file.path().to_path_buf()), &mut out).expect("inspection succeeds");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.starts_with("frame id=1 type=Control sub_frames=2/2 cells=6\n"));
    assert!(text.ends_with("outcome: complete, 0 trailing bytes\n"));
}

#[test]
fn cbor_report_decodes_to_record() {
    let file = write_input(&sample_bytes());
    let mut out = Vec::new();
    let args = Args { format: OutputFormat::Cbor, ..args(file.path().to_path_buf()) };

    run(&args, &mut out).expect("inspection succeeds");

    let record = FrameRecord::from_cbor(&out).expect("valid CBOR");
    assert_eq!(record.sub_frames.len(), 2);
    assert!(record.sub_frames.iter().all(|s| s.cells.len() == 3));
}

#[test]
fn hex_input() {
    let text = hex::encode(sample_bytes());
    let file = write_input(text.as_bytes());
    let mut out = Vec::new();
    let args = Args { hex: true, ..args(file.path().to_path_buf()) };

    run(&args, &mut out).expect("inspection succeeds");
    assert!(!out.is_empty());
}

#[test]
fn partial_frame_passes_unless_strict() {
    let mut bytes = sample_bytes();
    bytes.truncate(25);
    let file = write_input(&bytes);

    let mut out = Vec::new();
    run(&args(file.path().to_path_buf()), &mut out).expect("partial is not an error");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("outcome: partial, truncated at offset 21"));

    let strict = Args { strict: true, ..args(file.path().to_path_buf()) };
    let err = run(&strict, &mut Vec::new()).expect_err("strict rejects partial");
    assert!(matches!(err, InspectError::Partial(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn rejected_frame() {
    let file = write_input(&[0x01, 0x02]);

    let err = run(&args(file.path().to_path_buf()), &mut Vec::new()).expect_err("too short");
    assert!(matches!(
        err,
        InspectError::Protocol(ProtocolError::TruncatedHeader { expected: 6, actual: 2 })
    ));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn missing_file() {
    let err = run(&args(PathBuf::from("/nonexistent/frame.bin")), &mut Vec::new())
        .expect_err("no such file");
    assert!(matches!(err, InspectError::Read { .. }));
    assert_eq!(err.exit_code(), 2);
}
