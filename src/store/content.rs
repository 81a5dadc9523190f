//! Encode‑side interning.
//!
//! Порядок сканирования фиксирован: суперблоки в порядке буфера, внутри каждого
//! блоки в порядке суперблока. От него зависят все id, поэтому никакой
//! перестановки или нумерации по хэшу.
//!
//! Superblocks are keyed by their ordered block‑id list. Two superblocks have
//! equal content iff their id lists are equal, and a known superblock never
//! contains an unknown block, so the numbering matches content keying exactly.

use std::collections::BTreeMap;

use log::trace;

use crate::config::CodecConfig;
use crate::consts::{FIRST_DYNAMIC_ID, ZERO_BLOCK_ID, ZERO_SUPER_BLOCK_ID};
use crate::error::{Result, SavestreamError};
use crate::hash::{content_map, ContentMap};

/// What one snapshot contributed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameDelta {
    /// Blocks first seen in this snapshot, by id.
    pub new_blocks: BTreeMap<u32, Vec<u8>>,
    /// Superblocks first seen in this snapshot → their block ids.
    pub new_super_blocks: BTreeMap<u32, Vec<u32>>,
    /// Superblock ids composing the padded aligned buffer.
    pub super_id_sequence: Vec<u32>,
    /// References to superblocks already known before this snapshot.
    pub reused: usize,
}

pub struct ContentStore {
    block_size: usize,
    super_block_multiple: usize,
    blocks: ContentMap<Vec<u8>, u32>,
    super_blocks: ContentMap<Vec<u32>, u32>,
    next_block_id: u32,
    next_super_block_id: u32,
}

impl ContentStore {
    pub fn new(cfg: &CodecConfig) -> Result<Self> {
        cfg.validate()?;
        let mut blocks = content_map();
        blocks.insert(vec![0u8; cfg.block_size], ZERO_BLOCK_ID);
        let mut super_blocks = content_map();
        super_blocks.insert(
            vec![ZERO_BLOCK_ID; cfg.super_block_multiple],
            ZERO_SUPER_BLOCK_ID,
        );
        Ok(Self {
            block_size: cfg.block_size,
            super_block_multiple: cfg.super_block_multiple,
            blocks,
            super_blocks,
            next_block_id: FIRST_DYNAMIC_ID,
            next_super_block_id: FIRST_DYNAMIC_ID,
        })
    }

    pub fn super_block_size(&self) -> usize {
        self.block_size * self.super_block_multiple
    }

    /// Known blocks, including the zero block.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Known superblocks, including the zero superblock.
    pub fn super_block_count(&self) -> usize {
        self.super_blocks.len()
    }

    /// Id of `bytes`, assigning the next id if unseen. Second value: newly assigned.
    pub fn intern_block(&mut self, bytes: &[u8]) -> Result<(u32, bool)> {
        debug_assert_eq!(bytes.len(), self.block_size);
        if let Some(&id) = self.blocks.get(bytes) {
            return Ok((id, false));
        }
        let id = take_id(&mut self.next_block_id, "block")?;
        self.blocks.insert(bytes.to_vec(), id);
        Ok((id, true))
    }

    /// Id of an ordered block‑id list, assigning the next id if unseen.
    pub fn intern_super_block(&mut self, block_ids: &[u32]) -> Result<(u32, bool)> {
        debug_assert_eq!(block_ids.len(), self.super_block_multiple);
        if let Some(&id) = self.super_blocks.get(block_ids) {
            return Ok((id, false));
        }
        let id = take_id(&mut self.next_super_block_id, "superblock")?;
        self.super_blocks.insert(block_ids.to_vec(), id);
        Ok((id, true))
    }

    /// Intern a whole aligned buffer (already padded to a superblock multiple).
    pub fn add_aligned(&mut self, aligned: &[u8]) -> Result<FrameDelta> {
        let sb_size = self.super_block_size();
        if aligned.len() % sb_size != 0 {
            return Err(SavestreamError::invalid(format!(
                "aligned buffer of {} bytes is not a multiple of superblock size {}",
                aligned.len(),
                sb_size
            )));
        }

        let mut delta = FrameDelta::default();
        let mut block_ids = Vec::with_capacity(self.super_block_multiple);

        for chunk in aligned.chunks_exact(sb_size) {
            block_ids.clear();
            for block in chunk.chunks_exact(self.block_size) {
                let (id, is_new) = self.intern_block(block)?;
                if is_new {
                    delta.new_blocks.insert(id, block.to_vec());
                }
                block_ids.push(id);
            }

            let (sid, is_new) = self.intern_super_block(&block_ids)?;
            if is_new {
                trace!("superblock {} = {} blocks", sid, block_ids.len());
                delta.new_super_blocks.insert(sid, block_ids.clone());
            } else {
                delta.reused += 1;
            }
            delta.super_id_sequence.push(sid);
        }

        Ok(delta)
    }
}

fn take_id(next: &mut u32, what: &str) -> Result<u32> {
    let id = *next;
    *next = id
        .checked_add(1)
        .ok_or_else(|| SavestreamError::invalid(format!("{what} id space exhausted")))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(bs: usize, mult: usize) -> ContentStore {
        ContentStore::new(&CodecConfig::new(bs, mult)).unwrap()
    }

    #[test]
    fn zero_content_is_preregistered() {
        let mut s = store(4, 2);
        assert_eq!(s.intern_block(&[0; 4]).unwrap(), (0, false));
        assert_eq!(s.intern_super_block(&[0, 0]).unwrap(), (0, false));
        let delta = s.add_aligned(&[0; 16]).unwrap();
        assert_eq!(delta.super_id_sequence, vec![0, 0]);
        assert!(delta.new_blocks.is_empty() && delta.new_super_blocks.is_empty());
        assert_eq!(delta.reused, 2);
    }

    #[test]
    fn ids_follow_first_appearance() {
        let mut s = store(2, 2);
        // superblocks: [AA BB] [BB CC] [AA BB]
        let delta = s.add_aligned(&[1, 1, 2, 2, 2, 2, 3, 3, 1, 1, 2, 2]).unwrap();
        assert_eq!(delta.new_blocks.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(delta.new_blocks[&1], vec![1, 1]);
        assert_eq!(delta.new_blocks[&3], vec![3, 3]);
        assert_eq!(delta.new_super_blocks[&1], vec![1, 2]);
        assert_eq!(delta.new_super_blocks[&2], vec![2, 3]);
        assert_eq!(delta.super_id_sequence, vec![1, 2, 1]);
        assert_eq!(delta.reused, 1);
        assert_eq!(s.block_count(), 4);
        assert_eq!(s.super_block_count(), 3);
    }

    #[test]
    fn rejects_unpadded_buffer() {
        let mut s = store(2, 2);
        assert!(matches!(
            s.add_aligned(&[1, 2, 3]),
            Err(SavestreamError::InvalidArgument(_))
        ));
    }
}
