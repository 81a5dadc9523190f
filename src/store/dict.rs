//! Decode‑side dictionaries.
//!
//! Новые блоки/суперблоки кадра вливаются ДО разбора его superIdSequence;
//! ссылка на id, которого ещё нет, означает битый или обрезанный поток.

use std::collections::{BTreeMap, HashMap};

use serde_bytes::ByteBuf;

use crate::config::CodecConfig;
use crate::consts::{ZERO_BLOCK_ID, ZERO_SUPER_BLOCK_ID};
use crate::error::{Result, SavestreamError};
use crate::frame::WireId;

pub struct Dictionary {
    block_size: usize,
    super_block_multiple: usize,
    blocks: HashMap<u32, Vec<u8>>,
    super_blocks: HashMap<u32, Vec<u32>>,
}

impl Dictionary {
    pub fn new(cfg: &CodecConfig) -> Result<Self> {
        cfg.validate()?;
        let mut blocks = HashMap::new();
        blocks.insert(ZERO_BLOCK_ID, vec![0u8; cfg.block_size]);
        let mut super_blocks = HashMap::new();
        super_blocks.insert(
            ZERO_SUPER_BLOCK_ID,
            vec![ZERO_BLOCK_ID; cfg.super_block_multiple],
        );
        Ok(Self {
            block_size: cfg.block_size,
            super_block_multiple: cfg.super_block_multiple,
            blocks,
            super_blocks,
        })
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn super_block_count(&self) -> usize {
        self.super_blocks.len()
    }

    /// Merge a frame's new content. The frame must already have passed
    /// `Frame::validate`, so sizes are not checked here.
    ///
    /// Блоки кадра вливаются первыми: суперблок может ссылаться на блок из
    /// того же кадра, но не из будущего. Id вводится один раз на поток.
    pub fn merge(
        &mut self,
        new_blocks: BTreeMap<WireId, ByteBuf>,
        new_super_blocks: BTreeMap<WireId, Vec<u32>>,
    ) -> Result<()> {
        for (WireId(id), bytes) in new_blocks {
            if self.blocks.insert(id, bytes.into_vec()).is_some() {
                return Err(SavestreamError::corrupt(format!("block {id} introduced twice")));
            }
        }
        for (WireId(id), ids) in new_super_blocks {
            if let Some(&bad) = ids.iter().find(|&b| !self.blocks.contains_key(b)) {
                return Err(SavestreamError::UnknownBlockReference(bad));
            }
            if self.super_blocks.insert(id, ids).is_some() {
                return Err(SavestreamError::corrupt(format!(
                    "superblock {id} introduced twice"
                )));
            }
        }
        Ok(())
    }

    /// Every id of a superIdSequence must already be known.
    pub fn check_refs(&self, super_ids: &[u32]) -> Result<()> {
        match super_ids.iter().find(|&s| !self.super_blocks.contains_key(s)) {
            Some(&bad) => Err(SavestreamError::UnknownSuperblockReference(bad)),
            None => Ok(()),
        }
    }

    /// Concatenate the blocks of every superblock in `super_ids`.
    pub fn rebuild(&self, super_ids: &[u32]) -> Result<Vec<u8>> {
        let sb_size = self.block_size * self.super_block_multiple;
        let mut out = Vec::with_capacity(super_ids.len().saturating_mul(sb_size));
        for &sid in super_ids {
            let block_ids = self
                .super_blocks
                .get(&sid)
                .ok_or(SavestreamError::UnknownSuperblockReference(sid))?;
            for &bid in block_ids {
                let block = self
                    .blocks
                    .get(&bid)
                    .ok_or(SavestreamError::UnknownBlockReference(bid))?;
                out.extend_from_slice(block);
            }
        }
        Ok(out)
    }
}
