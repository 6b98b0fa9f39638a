//! StreamLabel - which of the two input streams a frame belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input stream identity.
///
/// A matching run always joins exactly two streams; frame indices are scoped
/// to their own stream, so the label is part of a frame's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamLabel {
    /// The driving stream (the matcher pulls it to completion).
    A,
    /// The buffered stream (held in the window buffer).
    B,
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamLabel::A => write!(f, "A"),
            StreamLabel::B => write!(f, "B"),
        }
    }
}
