//! Статистика savestream без восстановления снимков.
//!
//! Кадры проходят тот же Replay::advance, что и при decode (размеры,
//! повторные id, ссылки на неизвестные id, применимость патча), но
//! выровненные буферы не собираются.

use serde::Serialize;

use crate::config::CodecConfig;
use crate::error::Result;
use crate::hash::hash64;

use super::decoder::{FrameReader, Replay};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub index: usize,
    pub new_blocks: usize,
    pub new_super_blocks: usize,
    /// Raw size of the new blocks and superblock id lists.
    pub new_bytes: usize,
    /// Length of the superblock id sequence.
    pub super_blocks: usize,
    pub patch_ops: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub frames: usize,
    /// Distinct blocks, the zero block included.
    pub unique_blocks: usize,
    /// Distinct superblocks, the zero superblock included.
    pub unique_super_blocks: usize,
    /// Superblock references over all frames.
    pub super_block_refs: usize,
    /// Sum of the padded aligned buffer sizes.
    pub aligned_bytes: u64,
    pub stream_bytes: usize,
    /// xxhash64 of the stream bytes.
    pub fingerprint: u64,
    pub per_frame: Vec<FrameStats>,
}

impl StreamStats {
    /// Aligned bytes actually stored as unique blocks.
    pub fn unique_bytes(&self, cfg: &CodecConfig) -> u64 {
        (self.unique_blocks as u64).saturating_mul(cfg.block_size as u64)
    }
}

pub fn stats(stream: &[u8], cfg: &CodecConfig) -> Result<StreamStats> {
    let mut replay = Replay::new(*cfg)?;
    let sb_size = cfg.super_block_size() as u64;

    let mut out = StreamStats {
        stream_bytes: stream.len(),
        fingerprint: hash64(stream),
        ..StreamStats::default()
    };

    for (index, frame) in FrameReader::new(stream)?.enumerate() {
        let frame = frame?;
        let new_blocks = frame.new_blocks.len();
        let new_super_blocks = frame.new_super_blocks.len();
        let new_bytes = frame.new_content_len();

        let r = replay.advance(frame)?;

        let seq = r.super_ids.len();
        out.super_block_refs += seq;
        out.aligned_bytes = out
            .aligned_bytes
            .saturating_add((seq as u64).saturating_mul(sb_size));
        out.per_frame.push(FrameStats {
            index,
            new_blocks,
            new_super_blocks,
            new_bytes,
            super_blocks: seq,
            patch_ops: r.patch_ops,
        });
    }

    out.frames = out.per_frame.len();
    out.unique_blocks = replay.dictionary().block_count();
    out.unique_super_blocks = replay.dictionary().super_block_count();
    Ok(out)
}
