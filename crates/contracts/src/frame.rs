//! Frame - Ingestion 输出
//!
//! 单条已解码的传感器记录：元数据块 + 定长像素载荷。

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{StreamLabel, TimestampBasis};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Decoded metadata block of one record.
///
/// The on-disk block is a JSON object; the fields below are required, any
/// additional keys are preserved in `extra` and carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameMeta {
    /// Detector module number (identifying, not used for matching)
    pub mod_num: u16,

    /// Quadrant board number within the module
    pub quabo_num: u8,

    /// Packet sequence number assigned by the data acquisition board
    pub pkt_num: u32,

    /// GPS-disciplined packet time, integer UTC seconds
    pub pkt_utc: u32,

    /// Nanosecond part of the packet time, `0 <= pkt_nsec < 1e9`
    pub pkt_nsec: u32,

    /// Host receive time, integer seconds (gettimeofday)
    pub tv_sec: i64,

    /// Microsecond part of the host receive time
    pub tv_usec: i64,

    /// Unrecognized metadata keys, preserved verbatim
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Identity of the physical packet a frame was decoded from.
///
/// Two frames share an identity only when the same captured packet was read
/// twice (stream re-read, duplicated file content) — the signal used to flag
/// duplicate pair observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketIdentity {
    pub mod_num: u16,
    pub quabo_num: u8,
    pub pkt_num: u32,
    pub pkt_utc: u32,
    pub pkt_nsec: u32,
}

impl FrameMeta {
    /// Identity of the captured packet this metadata describes.
    pub fn packet_identity(&self) -> PacketIdentity {
        PacketIdentity {
            mod_num: self.mod_num,
            quabo_num: self.quabo_num,
            pkt_num: self.pkt_num,
            pkt_utc: self.pkt_utc,
            pkt_nsec: self.pkt_nsec,
        }
    }

    /// Nanosecond epoch timestamp under the given basis.
    ///
    /// `Receive` pairs the host second with the GPS nanosecond part, which is
    /// what the capture daemon records side by side; `PacketUtc` stays
    /// entirely on the GPS clock.
    pub fn timestamp_ns(&self, basis: TimestampBasis) -> i64 {
        match basis {
            TimestampBasis::Receive => self.tv_sec * NANOS_PER_SEC + i64::from(self.pkt_nsec),
            TimestampBasis::PacketUtc => {
                i64::from(self.pkt_utc) * NANOS_PER_SEC + i64::from(self.pkt_nsec)
            }
        }
    }
}

/// Pixel payload geometry: square image side length and bytes per pixel.
///
/// Always supplied by configuration; the decoder never infers it from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PayloadGeometry {
    /// Image side length in pixels
    #[validate(range(min = 1))]
    pub side: u16,

    /// Bytes per pixel (1 or 2, little-endian)
    #[validate(range(min = 1, max = 2))]
    pub bytes_per_pixel: u8,
}

impl Default for PayloadGeometry {
    fn default() -> Self {
        // 16x16 pulse-height images at 2 bytes per pixel
        Self {
            side: 16,
            bytes_per_pixel: 2,
        }
    }
}

impl PayloadGeometry {
    /// Number of pixels in one payload
    pub fn pixel_count(&self) -> usize {
        usize::from(self.side) * usize::from(self.side)
    }

    /// Payload length in bytes
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * usize::from(self.bytes_per_pixel)
    }
}

/// Raw pixel payload (零拷贝)
///
/// Holds the undecoded little-endian payload bytes together with the
/// geometry they were read under. Cloning shares the underlying buffer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagePayload {
    /// Geometry the payload was decoded under
    pub geometry: PayloadGeometry,

    /// Raw little-endian pixel bytes, exactly `geometry.byte_len()` long
    pub data: Bytes,
}

impl ImagePayload {
    /// Decode all pixel values.
    pub fn pixels(&self) -> Vec<u16> {
        match self.geometry.bytes_per_pixel {
            1 => self.data.iter().map(|&b| u16::from(b)).collect(),
            _ => self
                .data
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        }
    }

    /// Decode a single pixel by row-major index, `None` when out of range.
    pub fn pixel(&self, idx: usize) -> Option<u16> {
        match self.geometry.bytes_per_pixel {
            1 => self.data.get(idx).map(|&b| u16::from(b)),
            _ => {
                let off = idx.checked_mul(2)?;
                let hi = *self.data.get(off + 1)?;
                let lo = self.data[off];
                Some(u16::from_le_bytes([lo, hi]))
            }
        }
    }
}

/// 传感器帧
///
/// One decoded record from one input stream. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Which input stream the frame came from
    pub stream: StreamLabel,

    /// 0-based pull order within the stream
    pub index: u64,

    /// Decoded metadata block
    pub meta: FrameMeta,

    /// Pixel payload
    pub payload: ImagePayload,
}

impl Frame {
    /// Nanosecond epoch timestamp under the given basis.
    pub fn timestamp_ns(&self, basis: TimestampBasis) -> i64 {
        self.meta.timestamp_ns(basis)
    }
}
