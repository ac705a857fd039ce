//! Read, parse and report a single frame.

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use cellframe_proto::{Frame, FrameRecord, ParseOutcome, ParsedIndex};

use crate::{
    cli::{Args, OutputFormat},
    error::InspectError,
};

/// Read the whole input; `-` reads stdin
pub fn read_input(path: &Path) -> Result<Vec<u8>, InspectError> {
    let read_err = |source| InspectError::Read { path: path.to_path_buf(), source };

    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf).map_err(read_err)?;
        Ok(buf)
    } else {
        fs::read(path).map_err(read_err)
    }
}

/// Turn raw input into frame bytes, hex decoding if requested
///
/// Whitespace is ignored in hex input so dumps can be wrapped over lines.
pub fn decode_input(raw: Vec<u8>, hex: bool) -> Result<Vec<u8>, InspectError> {
    if !hex {
        return Ok(raw);
    }
    let digits: Vec<u8> = raw.into_iter().filter(|b| !b.is_ascii_whitespace()).collect();
    Ok(hex::decode(digits)?)
}

/// Write a human-readable listing of the index
pub fn render_text(index: &ParsedIndex<'_>, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "frame id={} type={:?} sub_frames={}/{} cells={}",
        index.frame_id(),
        index.frame_type(),
        index.len(),
        index.declared_sub_frames(),
        index.cell_count(),
    )?;

    for (i, sub) in index.sub_frames().enumerate() {
        let status = sub.status().map_or_else(
            || format!("unknown({})", sub.header().status_raw()),
            |status| format!("{status:?}"),
        );
        writeln!(
            out,
            "  sub_frame[{i}] id={} status={status} length={} cells={}/{} offset={}",
            sub.id(),
            sub.length(),
            sub.cell_count(),
            sub.declared_cell_count(),
            sub.offset(),
        )?;

        for (j, cell) in sub.cells().enumerate() {
            writeln!(out, "    cell[{j}] id={} symbol_num={}", cell.id(), cell.symbol_num())?;
        }
    }

    match index.outcome() {
        ParseOutcome::Complete => {
            writeln!(out, "outcome: complete, {} trailing bytes", index.trailing_len())
        },
        ParseOutcome::Partial(condition) => writeln!(out, "outcome: partial, {condition}"),
    }
}

fn log_outcome(index: &ParsedIndex<'_>) {
    match index.outcome() {
        ParseOutcome::Complete => tracing::info!(
            frame_id = index.frame_id(),
            sub_frames = index.len(),
            cells = index.cell_count(),
            trailing = index.trailing_len(),
            "Frame parsed"
        ),
        ParseOutcome::Partial(condition) => tracing::warn!(
            frame_id = index.frame_id(),
            sub_frames = index.len(),
            declared = index.declared_sub_frames(),
            cells = index.cell_count(),
            %condition,
            "Frame partially parsed"
        ),
    }
}

/// Run one inspection, writing the report to `out`
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), InspectError> {
    let raw = read_input(&args.input)?;
    let frame = Frame::new(decode_input(raw, args.hex)?);
    tracing::debug!(path = %args.input.display(), bytes = frame.len(), "Read frame buffer");

    let index = frame.index().inspect_err(|e| {
        tracing::error!(bytes = frame.len(), error = %e, "Frame rejected");
    })?;
    log_outcome(&index);

    match args.format {
        OutputFormat::Text => render_text(&index, out).map_err(InspectError::Output)?,
        OutputFormat::Cbor => {
            let cbor = FrameRecord::from_index(&index)?.to_cbor()?;
            out.write_all(&cbor).map_err(InspectError::Output)?;
        },
    }
    out.flush().map_err(InspectError::Output)?;

    match index.condition() {
        Some(condition) if args.strict => Err(InspectError::Partial(condition)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use cellframe_proto::{FrameBuilder, FrameType, SubFrameStatus, parse};

    use super::*;

    #[test]
    fn hex_input_ignores_whitespace() {
        let decoded = decode_input(b"0100 0000\n0000\n".to_vec(), true).expect("valid hex");
        assert_eq!(decoded, vec![1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn raw_input_passes_through() {
        let decoded = decode_input(vec![0xff, 0x00], false).expect("raw");
        assert_eq!(decoded, vec![0xff, 0x00]);
    }

    #[test]
    fn reject_bad_hex() {
        let result = decode_input(b"0g".to_vec(), true);
        assert!(matches!(result, Err(InspectError::Hex(_))));
    }

    #[test]
    fn render_complete_frame() {
        let bytes = FrameBuilder::new(1, FrameType::Control)
            .sub_frame(2, SubFrameStatus::Active, [(3u16, 4u8), (4, 5)])
            .to_bytes()
            .expect("within capacity");
        let index = parse(&bytes).expect("should parse");

        let mut out = Vec::new();
        render_text(&index, &mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");

        insta::assert_snapshot!(text, @r"
        frame id=1 type=Control sub_frames=1/1 cells=2
          sub_frame[0] id=2 status=Active length=6 cells=2/2 offset=6
            cell[0] id=3 symbol_num=4
            cell[1] id=4 symbol_num=5
        outcome: complete, 0 trailing bytes
        ");
    }
}
