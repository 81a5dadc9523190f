//! codec: savestream encode/decode.
//!
//! Состав:
//! - encoder: Encoder (push по одному снимку, finish → поток).
//! - decoder: FrameReader (сырые кадры), Decoder (ленивый итератор снимков).
//! - stats: сводка по потоку без восстановления снимков.
//!
//! Верхнеуровневые функции ниже: тонкие обёртки над ними.

pub mod decoder;
pub mod encoder;
pub mod stats;

use log::{debug, info};

use crate::config::CodecConfig;
use crate::error::{Result, SavestreamError};

pub use decoder::{Decoder, FrameReader};
pub use encoder::Encoder;
pub use stats::{stats, FrameStats, StreamStats};

/// Encode an ordered sequence of savestates into one savestream.
///
/// All or nothing: the first failing savestate aborts the call.
pub fn encode<I, B>(savestates: I, cfg: &CodecConfig) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut enc = Encoder::new(*cfg)?;
    for (i, s) in savestates.into_iter().enumerate() {
        enc.push(s.as_ref()).map_err(|e| {
            debug!("encode aborted at savestate #{i}: {e}");
            e
        })?;
    }
    enc.finish()
}

/// Lazy decode. Nothing past the array header is read until the first next().
pub fn decode<'a>(stream: &'a [u8], cfg: &CodecConfig) -> Result<Decoder<'a>> {
    Decoder::new(stream, *cfg)
}

/// Number of savestates in the stream (array header only).
pub fn decode_len(stream: &[u8]) -> Result<usize> {
    decoder::frame_count(stream)
}

/// Reconstruct the savestate at `index` without building the earlier ones.
pub fn decode_one(stream: &[u8], index: usize, cfg: &CodecConfig) -> Result<Vec<u8>> {
    let len = decode_len(stream)?;
    if index >= len {
        return Err(SavestreamError::IndexOutOfRange { index, len });
    }
    let mut dec = decode(stream, cfg)?;
    dec.skip_frames(index)?;
    match dec.next() {
        Some(res) => res,
        None => Err(SavestreamError::corrupt(format!(
            "stream ended before frame {index}"
        ))),
    }
}

/// Resolve `[start, end)` against a stream of `len` savestates.
///
/// Negative `end` counts from the end, absent `end` means `len`, `end` past
/// `len` is clamped. Negative `start` is rejected.
pub fn resolve_range(start: i64, end: Option<i64>, len: usize) -> Result<(usize, usize)> {
    if start < 0 {
        return Err(SavestreamError::invalid(format!(
            "trim start must be non-negative, got {start}"
        )));
    }
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let end_i = match end {
        None => len_i,
        Some(e) if e < 0 => len_i.saturating_add(e).max(0),
        Some(e) => e.min(len_i),
    };
    if start >= end_i {
        return Err(SavestreamError::EmptyRange {
            start,
            end: end.unwrap_or(len_i),
            len,
        });
    }
    // 0 <= start < end_i <= len
    Ok((start as usize, end_i as usize))
}

/// Re-encode savestates `[start, end)` as a new self-contained savestream.
pub fn trim(stream: &[u8], start: i64, end: Option<i64>, cfg: &CodecConfig) -> Result<Vec<u8>> {
    let len = decode_len(stream)?;
    let (from, to) = resolve_range(start, end, len)?;

    let mut dec = decode(stream, cfg)?;
    dec.skip_frames(from)?;

    let mut enc = Encoder::new(*cfg)?;
    for savestate in dec.take(to - from) {
        enc.push(&savestate?)?;
    }
    if enc.len() != to - from {
        return Err(SavestreamError::corrupt(format!(
            "stream ended after {} of {} requested frames",
            enc.len(),
            to - from
        )));
    }

    info!("trim [{from}, {to}) of {len} savestates");
    enc.finish()
}
