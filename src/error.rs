//! Ошибки кодека savestream.
//!
//! Каждый вариант: отдельный, восстанавливаемый на стороне вызывающего случай.
//! Внутри кодека ничего не ретраится.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SavestreamError>;

#[derive(Debug, Error)]
pub enum SavestreamError {
    /// Header/info of an input snapshot cannot be parsed.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown block id {0} referenced by superblock")]
    UnknownBlockReference(u32),

    #[error("unknown superblock id {0} referenced by frame")]
    UnknownSuperblockReference(u32),

    #[error("info patch does not apply: operation #{index} ({op} {path}): {reason}")]
    PatchApplication {
        index: usize,
        op: &'static str,
        path: String,
        reason: &'static str,
    },

    #[error("index {index} out of range for savestream with {len} saves")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no states in range [{start}, {end}) of savestream with {len} saves")]
    EmptyRange { start: i64, end: i64, len: usize },

    /// Stream bytes are not a valid frame array (truncated, wrong shape, bad sizes).
    #[error("corrupt savestream: {0}")]
    CorruptStream(String),

    #[error("frame serialization failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SavestreamError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SavestreamError::MalformedSnapshot(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        SavestreamError::CorruptStream(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SavestreamError::InvalidArgument(msg.into())
    }
}

impl From<rmp_serde::decode::Error> for SavestreamError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        SavestreamError::CorruptStream(e.to_string())
    }
}
