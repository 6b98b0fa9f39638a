//! FrameCursor - pull-one-record stream cursor.
//!
//! Wraps one open byte source and the record decoder. Owns the per-stream
//! frame index counter and detects timestamp regressions against the
//! ordering invariant (non-decreasing timestamps within a stream).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use contracts::{
    CoreError, Frame, FrameSource, PayloadGeometry, StreamLabel, TimestampBasis,
};
use tracing::{trace, warn};

use crate::decode::read_record;

/// Sequential cursor over one frame file.
///
/// Exactly one record is consumed per [`pull`](FrameSource::pull); there is
/// no speculative read-ahead. The source is held for exclusive sequential
/// access and closed when the cursor drops.
pub struct FrameCursor<R> {
    reader: R,
    stream: StreamLabel,
    geometry: PayloadGeometry,
    basis: TimestampBasis,
    next_index: u64,
    last_timestamp_ns: Option<i64>,
    ordering_violations: u64,
    poisoned: bool,
}

impl FrameCursor<BufReader<File>> {
    /// Open a frame file for sequential reading.
    pub fn open(
        path: impl AsRef<Path>,
        stream: StreamLabel,
        geometry: PayloadGeometry,
        basis: TimestampBasis,
    ) -> Result<Self, CoreError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), stream, geometry, basis))
    }
}

impl<R: Read> FrameCursor<R> {
    /// Wrap an already-open byte source.
    ///
    /// The source is read one byte at a time while decoding metadata; pass
    /// something buffered for file-backed inputs.
    pub fn new(
        reader: R,
        stream: StreamLabel,
        geometry: PayloadGeometry,
        basis: TimestampBasis,
    ) -> Self {
        Self {
            reader,
            stream,
            geometry,
            basis,
            next_index: 0,
            last_timestamp_ns: None,
            ordering_violations: 0,
            poisoned: false,
        }
    }

    /// Frames pulled so far.
    pub fn frames_read(&self) -> u64 {
        self.next_index
    }

    fn check_ordering(&mut self, frame: &Frame) {
        let ts = frame.timestamp_ns(self.basis);
        if let Some(last) = self.last_timestamp_ns {
            if ts < last {
                self.ordering_violations += 1;
                warn!(
                    stream = %self.stream,
                    frame_index = frame.index,
                    timestamp_ns = ts,
                    previous_ns = last,
                    "timestamp regression: stream violates ordering invariant, \
                     downstream results may be incomplete"
                );
                metrics::counter!(
                    "coincidence_ordering_violations_total",
                    "stream" => self.stream.to_string()
                )
                .increment(1);
            }
        }
        self.last_timestamp_ns = Some(ts);
    }
}

impl<R: Read> FrameSource for FrameCursor<R> {
    fn stream(&self) -> StreamLabel {
        self.stream
    }

    fn ordering_violations(&self) -> u64 {
        self.ordering_violations
    }

    fn pull(&mut self) -> Result<Option<Frame>, CoreError> {
        if self.poisoned {
            return Err(CoreError::decode(
                self.stream,
                self.next_index,
                "cursor poisoned by earlier decode error",
            ));
        }

        let record = match read_record(&mut self.reader, self.geometry) {
            Ok(Some(record)) => record,
            Ok(None) => {
                trace!(stream = %self.stream, frames = self.next_index, "clean end of stream");
                return Ok(None);
            }
            Err(e) => {
                self.poisoned = true;
                return Err(CoreError::decode(self.stream, self.next_index, e.to_string()));
            }
        };

        let frame = Frame {
            stream: self.stream,
            index: self.next_index,
            meta: record.meta,
            payload: record.payload,
        };
        self.next_index += 1;

        metrics::counter!(
            "coincidence_frames_read_total",
            "stream" => self.stream.to_string()
        )
        .increment(1);

        self.check_ordering(&frame);
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::write_record;
    use contracts::FrameMeta;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn geometry() -> PayloadGeometry {
        PayloadGeometry {
            side: 2,
            bytes_per_pixel: 2,
        }
    }

    fn meta_at(tv_sec: i64, pkt_nsec: u32) -> FrameMeta {
        FrameMeta {
            mod_num: 1,
            quabo_num: 0,
            pkt_num: 0,
            pkt_utc: tv_sec as u32,
            pkt_nsec,
            tv_sec,
            tv_usec: 0,
            extra: HashMap::new(),
        }
    }

    fn stream_bytes(stamps: &[(i64, u32)]) -> Vec<u8> {
        let mut buf = Vec::new();
        for &(tv_sec, pkt_nsec) in stamps {
            write_record(&mut buf, &meta_at(tv_sec, pkt_nsec), &[0u8; 8]).unwrap();
        }
        buf
    }

    #[test]
    fn assigns_indices_in_pull_order() {
        let bytes = stream_bytes(&[(10, 0), (10, 5), (11, 0)]);
        let mut cursor = FrameCursor::new(
            Cursor::new(bytes),
            StreamLabel::A,
            geometry(),
            TimestampBasis::Receive,
        );

        let indices: Vec<u64> = std::iter::from_fn(|| cursor.pull().unwrap())
            .map(|f| f.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(cursor.frames_read(), 3);
        assert_eq!(cursor.ordering_violations(), 0);
    }

    #[test]
    fn counts_timestamp_regressions() {
        let bytes = stream_bytes(&[(10, 500), (10, 100), (12, 0)]);
        let mut cursor = FrameCursor::new(
            Cursor::new(bytes),
            StreamLabel::B,
            geometry(),
            TimestampBasis::Receive,
        );

        while cursor.pull().unwrap().is_some() {}
        assert_eq!(cursor.ordering_violations(), 1);
    }

    #[test]
    fn decode_error_poisons_the_cursor() {
        let mut bytes = stream_bytes(&[(10, 0)]);
        bytes.extend_from_slice(&[0xff, 0xff]); // garbage after a valid record

        let mut cursor = FrameCursor::new(
            Cursor::new(bytes),
            StreamLabel::A,
            geometry(),
            TimestampBasis::Receive,
        );

        assert!(cursor.pull().unwrap().is_some());
        let err = cursor.pull().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Decode {
                stream: StreamLabel::A,
                frame_index: 1,
                ..
            }
        ));

        // pulled again: still an error, never a silent EOF
        assert!(cursor.pull().is_err());
    }

    #[test]
    fn reads_from_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module_1.pff");
        std::fs::write(&path, stream_bytes(&[(100, 1), (100, 2)])).unwrap();

        let mut cursor = FrameCursor::open(
            &path,
            StreamLabel::A,
            geometry(),
            TimestampBasis::Receive,
        )
        .unwrap();

        assert_eq!(cursor.pull().unwrap().unwrap().meta.pkt_nsec, 1);
        assert_eq!(cursor.pull().unwrap().unwrap().meta.pkt_nsec, 2);
        assert!(cursor.pull().unwrap().is_none());
    }
}
