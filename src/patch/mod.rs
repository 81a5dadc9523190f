//! patch: JSON Patch (RFC 6902) для info‑сегментов.
//!
//! Состав:
//! - pointer: JSON Pointer (RFC 6901) escape/parse.
//! - diff: генерация патча prev → curr (mirror compare).
//! - apply: применение патча; любой неразрешимый путь: ошибка.
//!
//! Patches travel inside frames as UTF‑8 JSON bytes (`[{"op":"replace",...}]`).

pub mod apply;
pub mod diff;
pub mod pointer;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SavestreamError};

pub use apply::apply_patch;
pub use diff::diff;

/// One JSON Patch operation. Serialized with the `op` tag first, as RFC 6902 shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOp {
    pub fn name(&self) -> &'static str {
        match self {
            PatchOp::Add { .. } => "add",
            PatchOp::Remove { .. } => "remove",
            PatchOp::Replace { .. } => "replace",
            PatchOp::Move { .. } => "move",
            PatchOp::Copy { .. } => "copy",
            PatchOp::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            PatchOp::Add { path, .. }
            | PatchOp::Remove { path }
            | PatchOp::Replace { path, .. }
            | PatchOp::Move { path, .. }
            | PatchOp::Copy { path, .. }
            | PatchOp::Test { path, .. } => path,
        }
    }
}

/// Patch → UTF‑8 JSON bytes (frame `infoPatch`).
pub fn encode_patch(ops: &[PatchOp]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(ops)?)
}

/// UTF‑8 JSON bytes → patch. Unparsable bytes mean a corrupt frame.
pub fn decode_patch(bytes: &[u8]) -> Result<Vec<PatchOp>> {
    serde_json::from_slice(bytes)
        .map_err(|e| SavestreamError::corrupt(format!("info patch is not a JSON Patch: {e}")))
}
