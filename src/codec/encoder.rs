//! Streaming encoder: one push() per savestate, finish() emits the savestream.
//!
//! Кадры сериализуются сразу по мере push(); в finish() перед телом
//! дописывается заголовок MessagePack‑массива (число кадров).

use log::{debug, info};
use serde_bytes::ByteBuf;
use serde_json::{Map, Value};

use crate::align::{align_buffer, pad_to};
use crate::config::CodecConfig;
use crate::error::{Result, SavestreamError};
use crate::frame::{Frame, WireId};
use crate::metrics;
use crate::patch::{diff, encode_patch};
use crate::snapshot::{buffer_infos, parse_info, split};
use crate::store::ContentStore;

pub struct Encoder {
    cfg: CodecConfig,
    store: ContentStore,
    prev_info: Value,
    body: Vec<u8>,
    frames: u32,
}

impl Encoder {
    pub fn new(cfg: CodecConfig) -> Result<Self> {
        let store = ContentStore::new(&cfg)?;
        Ok(Self {
            cfg,
            store,
            prev_info: Value::Object(Map::new()),
            body: Vec::new(),
            frames: 0,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.cfg
    }

    /// Frames pushed so far.
    pub fn len(&self) -> usize {
        self.frames as usize
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Encode one savestate as the next frame.
    ///
    /// Parsing errors are reported before the store is touched. After any
    /// error the encoder should be dropped: the stream it would produce is
    /// not guaranteed to be consistent.
    pub fn push(&mut self, savestate: &[u8]) -> Result<()> {
        let parts = split(savestate)?;
        let info = parse_info(parts.info)?;
        let regions = buffer_infos(&info)?;

        let aligned = align_buffer(&regions, parts.buffer, self.cfg.block_size)?;
        let aligned = pad_to(aligned, self.cfg.super_block_size())?;

        let frames = self
            .frames
            .checked_add(1)
            .ok_or_else(|| SavestreamError::invalid("too many savestates for one stream"))?;

        let delta = self.store.add_aligned(&aligned)?;
        debug!(
            "encode frame #{}: {} superblocks of {} bytes, new superblocks={}, new blocks={}, reused={}",
            self.frames,
            delta.super_id_sequence.len(),
            self.cfg.super_block_size(),
            delta.new_super_blocks.len(),
            delta.new_blocks.len(),
            delta.reused
        );
        metrics::record_frame_encoded(
            savestate.len(),
            delta.new_blocks.len(),
            delta.new_super_blocks.len(),
            delta.reused,
        );

        let ops = diff(&self.prev_info, &info);
        let frame = Frame {
            header_block: ByteBuf::from(parts.header.to_vec()),
            info_patch: ByteBuf::from(encode_patch(&ops)?),
            new_blocks: delta
                .new_blocks
                .into_iter()
                .map(|(id, bytes)| (WireId(id), ByteBuf::from(bytes)))
                .collect(),
            new_super_blocks: delta
                .new_super_blocks
                .into_iter()
                .map(|(id, ids)| (WireId(id), ids))
                .collect(),
            super_id_sequence: delta.super_id_sequence,
        };
        rmp_serde::encode::write_named(&mut self.body, &frame)?;

        self.prev_info = info;
        self.frames = frames;
        Ok(())
    }

    /// Prefix the frame array header and return the finished savestream.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.body.len() + 5);
        rmp::encode::write_array_len(&mut out, self.frames)
            .map_err(|e| SavestreamError::Encode(rmp_serde::encode::Error::InvalidValueWrite(e)))?;
        out.extend_from_slice(&self.body);

        info!(
            "savestream: {} frames, {} blocks, {} superblocks, {} bytes",
            self.frames,
            self.store.block_count(),
            self.store.super_block_count(),
            out.len()
        );
        metrics::record_stream_written(out.len());
        Ok(out)
    }
}
