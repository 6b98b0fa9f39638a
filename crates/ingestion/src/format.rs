//! On-disk record layout and writer.
//!
//! A frame file is a sequence of self-contained records, each:
//!
//! ```text
//! [TAG_TEXT] <json metadata object> [NUL] [TAG_IMAGE] <payload bytes>
//! ```
//!
//! The metadata block is NUL-terminated JSON; the payload length is fixed by
//! the stream's [`PayloadGeometry`] and carries no framing of its own. Files
//! are append-only logs read strictly sequentially from offset 0.
//!
//! The writer half exists for test harnesses and demo data generation; the
//! capture daemon producing real files follows the same layout.

use std::io::{self, Write};

use contracts::FrameMeta;

/// Type tag preceding a metadata block
pub const TAG_TEXT: u8 = 1;

/// Type tag preceding a pixel payload
pub const TAG_IMAGE: u8 = 2;

/// Append one record: metadata block followed by raw payload bytes.
///
/// The caller is responsible for `payload.len()` matching the stream's
/// configured geometry; the reader side enforces it.
pub fn write_record<W: Write>(w: &mut W, meta: &FrameMeta, payload: &[u8]) -> io::Result<()> {
    let json = serde_json::to_string(meta)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    w.write_all(&[TAG_TEXT])?;
    w.write_all(json.as_bytes())?;
    w.write_all(&[0u8])?;
    w.write_all(&[TAG_IMAGE])?;
    w.write_all(payload)?;
    Ok(())
}

/// Append one record with a 2-byte-per-pixel payload.
pub fn write_record_u16<W: Write>(w: &mut W, meta: &FrameMeta, pixels: &[u16]) -> io::Result<()> {
    write_record(w, meta, bytemuck::cast_slice(pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn meta() -> FrameMeta {
        FrameMeta {
            mod_num: 1,
            quabo_num: 2,
            pkt_num: 3,
            pkt_utc: 1_658_385_828,
            pkt_nsec: 42,
            tv_sec: 1_658_385_829,
            tv_usec: 100,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn record_layout() {
        let mut buf = Vec::new();
        write_record(&mut buf, &meta(), &[0xaa, 0xbb]).unwrap();

        assert_eq!(buf[0], TAG_TEXT);
        let nul = buf.iter().position(|&b| b == 0).unwrap();
        assert!(nul > 1);
        assert_eq!(buf[nul + 1], TAG_IMAGE);
        assert_eq!(&buf[nul + 2..], &[0xaa, 0xbb]);

        // the metadata block is plain JSON
        let parsed: FrameMeta = serde_json::from_slice(&buf[1..nul]).unwrap();
        assert_eq!(parsed.pkt_nsec, 42);
    }

    #[test]
    fn u16_payload_is_little_endian() {
        let mut buf = Vec::new();
        write_record_u16(&mut buf, &meta(), &[0x1234]).unwrap();
        assert_eq!(&buf[buf.len() - 2..], &[0x34, 0x12]);
    }
}
