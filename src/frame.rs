//! frame: one encoded savestate inside a savestream.
//!
//! Wire format (MessagePack, поля по имени):
//!   headerBlock      bin(16)
//!   infoPatch        bin (UTF‑8 JSON Patch)
//!   newBlocks        map<"id", bin(block_size)>
//!   newSuperBlocks   map<"id", [int; super_block_multiple]>
//!   superIdSequence  [int]
//!
//! Id keys are written as decimal strings; reading also accepts integer keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_bytes::ByteBuf;

use crate::config::CodecConfig;
use crate::consts::HEADER_SIZE;
use crate::error::{Result, SavestreamError};

/// Block or superblock id as a map key on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(pub u32);

impl Serialize for WireId {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WireId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = WireId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a u32 id as decimal string or integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<WireId, E> {
                u32::try_from(v)
                    .map(WireId)
                    .map_err(|_| E::custom(format!("id {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<WireId, E> {
                u32::try_from(v)
                    .map(WireId)
                    .map_err(|_| E::custom(format!("id {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<WireId, E> {
                v.parse::<u32>()
                    .map(WireId)
                    .map_err(|_| E::custom(format!("bad id key {v:?}")))
            }
        }

        d.deserialize_any(IdVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub header_block: ByteBuf,
    pub info_patch: ByteBuf,
    pub new_blocks: BTreeMap<WireId, ByteBuf>,
    pub new_super_blocks: BTreeMap<WireId, Vec<u32>>,
    pub super_id_sequence: Vec<u32>,
}

impl Frame {
    /// Structural checks that do not need the dictionaries: header size and
    /// the sizes of every newly introduced block/superblock.
    pub fn validate(&self, cfg: &CodecConfig) -> Result<()> {
        if self.header_block.len() != HEADER_SIZE {
            return Err(SavestreamError::corrupt(format!(
                "headerBlock is {} bytes, expected {}",
                self.header_block.len(),
                HEADER_SIZE
            )));
        }
        for (id, bytes) in &self.new_blocks {
            if bytes.len() != cfg.block_size {
                return Err(SavestreamError::corrupt(format!(
                    "block {} is {} bytes, expected {}",
                    id.0,
                    bytes.len(),
                    cfg.block_size
                )));
            }
        }
        for (id, ids) in &self.new_super_blocks {
            if ids.len() != cfg.super_block_multiple {
                return Err(SavestreamError::corrupt(format!(
                    "superblock {} has {} blocks, expected {}",
                    id.0,
                    ids.len(),
                    cfg.super_block_multiple
                )));
            }
        }
        Ok(())
    }

    /// Raw size of the new content this frame carries (block bytes + u32 id lists).
    pub fn new_content_len(&self) -> usize {
        let blocks: usize = self.new_blocks.values().map(|b| b.len()).sum();
        let supers: usize = self
            .new_super_blocks
            .values()
            .map(|ids| ids.len() * std::mem::size_of::<u32>())
            .sum();
        blocks + supers
    }
}
