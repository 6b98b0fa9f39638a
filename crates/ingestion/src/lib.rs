//! # Ingestion
//!
//! 帧文件读取模块。
//!
//! 负责：
//! - 逐条解码帧记录（元数据块 + 定长像素载荷）
//! - `FrameCursor`：单条拉取、索引分配、时间戳回退检测
//! - 帧文件写入（供测试与演示生成数据）
//! - 捕获文件名解析
//!
//! ## 使用示例
//!
//! ```ignore
//! use contracts::{FrameSource, PayloadGeometry, StreamLabel, TimestampBasis};
//! use ingestion::FrameCursor;
//!
//! let mut cursor = FrameCursor::open(
//!     "module_1.pff",
//!     StreamLabel::A,
//!     PayloadGeometry::default(),
//!     TimestampBasis::Receive,
//! )?;
//!
//! while let Some(frame) = cursor.pull()? {
//!     // one record consumed per pull, in file order
//! }
//! ```

mod cursor;
mod decode;
mod filename;
mod format;
mod mock;

pub use cursor::FrameCursor;
pub use decode::{read_record, DecodeError, RawRecord};
pub use filename::{is_frame_file, parse_name, FileNameInfo};
pub use format::{write_record, write_record_u16, TAG_IMAGE, TAG_TEXT};
pub use mock::{synthetic_frame, MemoryFrameSource};

// Re-export contracts types
pub use contracts::{Frame, FrameMeta, FrameSource, ImagePayload, PayloadGeometry};
