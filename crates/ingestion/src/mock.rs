//! Mock 帧源
//!
//! 无需磁盘文件的内存帧源，用于测试与演示。

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;
use contracts::{
    CoreError, Frame, FrameMeta, FrameSource, ImagePayload, PayloadGeometry, StreamLabel,
};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// In-memory frame source.
///
/// Hands out pre-built frames one per `pull()`, exactly like a file-backed
/// cursor, and can optionally fail at a chosen index to exercise decode
/// error propagation.
pub struct MemoryFrameSource {
    stream: StreamLabel,
    frames: VecDeque<Frame>,
    fail_at: Option<u64>,
    pulled: u64,
}

impl MemoryFrameSource {
    /// Wrap a list of already-built frames.
    pub fn new(stream: StreamLabel, frames: Vec<Frame>) -> Self {
        Self {
            stream,
            frames: frames.into(),
            fail_at: None,
            pulled: 0,
        }
    }

    /// Build a source whose frames have the given nanosecond timestamps
    /// (under either basis) and a zeroed payload.
    ///
    /// Indices are assigned in list order, matching cursor behavior.
    pub fn from_timestamps(stream: StreamLabel, timestamps_ns: &[i64]) -> Self {
        let geometry = PayloadGeometry {
            side: 4,
            bytes_per_pixel: 2,
        };
        let frames = timestamps_ns
            .iter()
            .enumerate()
            .map(|(i, &ts)| synthetic_frame(stream, i as u64, ts, geometry))
            .collect();
        Self::new(stream, frames)
    }

    /// Make `pull()` return a decode error at the given index.
    pub fn fail_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl FrameSource for MemoryFrameSource {
    fn stream(&self) -> StreamLabel {
        self.stream
    }

    fn pull(&mut self) -> Result<Option<Frame>, CoreError> {
        if self.fail_at == Some(self.pulled) {
            return Err(CoreError::decode(
                self.stream,
                self.pulled,
                "injected decode failure",
            ));
        }
        self.pulled += 1;
        Ok(self.frames.pop_front())
    }
}

/// Build one synthetic frame whose timestamp equals `ts_ns` under both bases.
pub fn synthetic_frame(
    stream: StreamLabel,
    index: u64,
    ts_ns: i64,
    geometry: PayloadGeometry,
) -> Frame {
    let tv_sec = ts_ns.div_euclid(NANOS_PER_SEC);
    let pkt_nsec = ts_ns.rem_euclid(NANOS_PER_SEC) as u32;
    Frame {
        stream,
        index,
        meta: FrameMeta {
            mod_num: match stream {
                StreamLabel::A => 1,
                StreamLabel::B => 254,
            },
            quabo_num: 0,
            pkt_num: index as u32,
            pkt_utc: tv_sec as u32,
            pkt_nsec,
            tv_sec,
            tv_usec: 0,
            extra: HashMap::new(),
        },
        payload: ImagePayload {
            geometry,
            data: Bytes::from(vec![0u8; geometry.byte_len()]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TimestampBasis;

    #[test]
    fn pulls_in_order_then_eof() {
        let mut source = MemoryFrameSource::from_timestamps(StreamLabel::A, &[100, 200, 300]);

        let f0 = source.pull().unwrap().unwrap();
        assert_eq!(f0.index, 0);
        assert_eq!(f0.timestamp_ns(TimestampBasis::Receive), 100);

        assert_eq!(source.pull().unwrap().unwrap().index, 1);
        assert_eq!(source.pull().unwrap().unwrap().index, 2);
        assert!(source.pull().unwrap().is_none());
    }

    #[test]
    fn both_bases_agree_for_synthetic_frames() {
        let frame = synthetic_frame(
            StreamLabel::B,
            0,
            5_000_000_123,
            PayloadGeometry::default(),
        );
        assert_eq!(frame.timestamp_ns(TimestampBasis::Receive), 5_000_000_123);
        assert_eq!(frame.timestamp_ns(TimestampBasis::PacketUtc), 5_000_000_123);
    }

    #[test]
    fn injected_failure_fires_at_index() {
        let mut source =
            MemoryFrameSource::from_timestamps(StreamLabel::B, &[1, 2, 3]).fail_at(1);
        assert!(source.pull().is_ok());
        assert!(matches!(
            source.pull().unwrap_err(),
            CoreError::Decode { frame_index: 1, .. }
        ));
    }
}
