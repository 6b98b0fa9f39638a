//! Capture file-name parsing.
//!
//! Capture files are named from dot-separated `key_value` components, e.g.
//!
//! ```text
//! start_2022-07-21T06_03_03Z.dp_ph16.bpp_2.dome_0.module_1.seqno_0.pff
//! ```
//!
//! Only the first underscore of each component separates key from value, so
//! values may themselves contain underscores (the start timestamp does).
//! Parsing is a convenience for callers: explicit configuration always wins
//! over anything inferred from a name.

use tracing::trace;

/// Fields recoverable from a capture file name. All optional: a name may
/// carry any subset of the known keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNameInfo {
    /// Observation start time, as written (`2022-07-21T06_03_03Z`)
    pub start: Option<String>,

    /// Data product name (`ph16`, `img8`, ...)
    pub data_product: Option<String>,

    /// Bytes per pixel
    pub bytes_per_pixel: Option<u8>,

    /// Dome number
    pub dome: Option<u32>,

    /// Detector module number
    pub module: Option<u32>,

    /// File sequence number within the observation
    pub seqno: Option<u32>,
}

/// Whether `name` looks like a capture frame file.
pub fn is_frame_file(name: &str) -> bool {
    name.ends_with(".pff")
}

/// Parse the `key_value` components of a capture file name.
///
/// Unknown keys and unparsable values are skipped (traced, not fatal); a
/// name with no recognizable components yields a default (all-`None`) info.
pub fn parse_name(name: &str) -> FileNameInfo {
    let stem = name.strip_suffix(".pff").unwrap_or(name);

    let mut info = FileNameInfo::default();
    for piece in stem.split('.') {
        let Some((key, value)) = piece.split_once('_') else {
            trace!(piece, "file name component without key_value shape");
            continue;
        };
        match key {
            "start" => info.start = Some(value.to_string()),
            "dp" => info.data_product = Some(value.to_string()),
            "bpp" => info.bytes_per_pixel = value.parse().ok(),
            "dome" => info.dome = value.parse().ok(),
            "module" => info.module = value.parse().ok(),
            "seqno" => info.seqno = value.parse().ok(),
            _ => trace!(key, "unknown file name key"),
        }
    }
    info
}
