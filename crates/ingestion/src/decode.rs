//! Frame record decoder.
//!
//! Reads exactly one record per call from a byte source positioned at a
//! record boundary. The two terminal outcomes are kept structurally apart:
//!
//! - `Ok(None)` — clean end-of-stream (zero bytes available at the first
//!   tag position),
//! - `Err(DecodeError)` — mid-stream corruption: wrong tag, truncated or
//!   unparsable metadata, short payload.
//!
//! After an error the reader position is unspecified; callers abort the
//! stream rather than attempt resynchronization, which could fabricate
//! spurious matches.

use std::io::{self, Read};

use bytes::Bytes;
use contracts::{FrameMeta, ImagePayload, PayloadGeometry};
use thiserror::Error;

use crate::format::{TAG_IMAGE, TAG_TEXT};

const MAX_NSEC: u32 = 1_000_000_000;

/// One decoded record before stream identity is attached.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Decoded metadata block
    pub meta: FrameMeta,

    /// Pixel payload bytes under the configured geometry
    pub payload: ImagePayload,
}

/// Mid-stream decode failure. Never produced at a clean end-of-file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A type tag other than the expected one was read
    #[error("bad type tag {found:#04x}, expected {expected:#04x}")]
    BadTag { expected: u8, found: u8 },

    /// EOF before the metadata block's NUL terminator
    #[error("metadata block truncated before terminator")]
    TruncatedMetadata,

    /// The metadata block is not a valid metadata object
    #[error("malformed metadata block: {0}")]
    MalformedMetadata(String),

    /// `pkt_nsec` outside `[0, 1e9)`
    #[error("pkt_nsec {0} out of range")]
    NanosOutOfRange(u32),

    /// EOF inside the fixed-length payload
    #[error("payload truncated: got {got} of {expected} bytes")]
    TruncatedPayload { got: usize, expected: usize },

    /// Underlying read failure
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Read one record, or `None` at clean end-of-stream.
///
/// On success the reader has advanced exactly past one full record.
pub fn read_record<R: Read>(
    reader: &mut R,
    geometry: PayloadGeometry,
) -> Result<Option<RawRecord>, DecodeError> {
    let tag = match read_byte(reader)? {
        Some(tag) => tag,
        None => return Ok(None),
    };
    if tag != TAG_TEXT {
        return Err(DecodeError::BadTag {
            expected: TAG_TEXT,
            found: tag,
        });
    }

    let json = read_metadata_block(reader)?;
    let meta: FrameMeta =
        serde_json::from_slice(&json).map_err(|e| DecodeError::MalformedMetadata(e.to_string()))?;
    if meta.pkt_nsec >= MAX_NSEC {
        return Err(DecodeError::NanosOutOfRange(meta.pkt_nsec));
    }

    match read_byte(reader)? {
        Some(TAG_IMAGE) => {}
        Some(found) => {
            return Err(DecodeError::BadTag {
                expected: TAG_IMAGE,
                found,
            })
        }
        None => {
            return Err(DecodeError::TruncatedPayload {
                got: 0,
                expected: geometry.byte_len(),
            })
        }
    }

    let expected = geometry.byte_len();
    let mut data = vec![0u8; expected];
    let got = read_full(reader, &mut data)?;
    if got < expected {
        return Err(DecodeError::TruncatedPayload { got, expected });
    }

    Ok(Some(RawRecord {
        meta,
        payload: ImagePayload {
            geometry,
            data: Bytes::from(data),
        },
    }))
}

/// Read a single byte, `None` at EOF.
fn read_byte<R: Read>(reader: &mut R) -> Result<Option<u8>, io::Error> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Read bytes up to the NUL terminator (terminator consumed, not returned).
fn read_metadata_block<R: Read>(reader: &mut R) -> Result<Vec<u8>, DecodeError> {
    let mut block = Vec::with_capacity(256);
    loop {
        match read_byte(reader)? {
            Some(0) => return Ok(block),
            Some(b) => block.push(b),
            None => return Err(DecodeError::TruncatedMetadata),
        }
    }
}

/// Fill `buf` as far as the source allows, returning the byte count read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, io::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::write_record;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn geometry() -> PayloadGeometry {
        PayloadGeometry {
            side: 2,
            bytes_per_pixel: 2,
        }
    }

    fn meta(pkt_nsec: u32) -> FrameMeta {
        FrameMeta {
            mod_num: 1,
            quabo_num: 0,
            pkt_num: 9,
            pkt_utc: 1_658_385_828,
            pkt_nsec,
            tv_sec: 1_658_385_829,
            tv_usec: 0,
            extra: HashMap::new(),
        }
    }

    fn encoded(pkt_nsec: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_record(&mut buf, &meta(pkt_nsec), &[0u8; 8]).unwrap();
        buf
    }

    #[test]
    fn decodes_what_the_writer_wrote() {
        let bytes = encoded(77);
        let mut cursor = Cursor::new(bytes);

        let record = read_record(&mut cursor, geometry()).unwrap().unwrap();
        assert_eq!(record.meta.pkt_nsec, 77);
        assert_eq!(record.payload.data.len(), 8);

        // exactly one record was consumed
        assert!(read_record(&mut cursor, geometry()).unwrap().is_none());
    }

    #[test]
    fn empty_source_is_clean_eof() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(read_record(&mut cursor, geometry()).unwrap().is_none());
    }

    #[test]
    fn bad_leading_tag_is_an_error() {
        let mut bytes = encoded(0);
        bytes[0] = 0x7b;
        let mut cursor = Cursor::new(bytes);
        let err = read_record(&mut cursor, geometry()).unwrap_err();
        assert!(matches!(err, DecodeError::BadTag { found: 0x7b, .. }));
    }

    #[test]
    fn truncated_metadata_is_not_clean_eof() {
        let bytes = encoded(0);
        let nul = bytes.iter().position(|&b| b == 0).unwrap();
        let mut cursor = Cursor::new(bytes[..nul - 2].to_vec());
        let err = read_record(&mut cursor, geometry()).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedMetadata));
    }

    #[test]
    fn short_payload_is_an_error() {
        let bytes = encoded(0);
        let mut cursor = Cursor::new(bytes[..bytes.len() - 3].to_vec());
        let err = read_record(&mut cursor, geometry()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedPayload {
                got: 5,
                expected: 8
            }
        ));
    }

    #[test]
    fn metadata_missing_required_field_is_malformed() {
        let mut buf = Vec::new();
        buf.push(TAG_TEXT);
        buf.extend_from_slice(br#"{"mod_num": 1}"#);
        buf.push(0);
        buf.push(TAG_IMAGE);
        buf.extend_from_slice(&[0u8; 8]);

        let mut cursor = Cursor::new(buf);
        let err = read_record(&mut cursor, geometry()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedMetadata(_)));
    }

    #[test]
    fn nsec_out_of_range_is_rejected() {
        // serde accepts the value; the range check has to catch it
        let mut buf = Vec::new();
        let mut bad = meta(0);
        bad.pkt_nsec = 1_500_000_000;
        write_record(&mut buf, &bad, &[0u8; 8]).unwrap();

        let mut cursor = Cursor::new(buf);
        let err = read_record(&mut cursor, geometry()).unwrap_err();
        assert!(matches!(err, DecodeError::NanosOutOfRange(1_500_000_000)));
    }
}
