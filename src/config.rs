//! Centralized codec configuration.
//!
//! Goals:
//! - One place for the two stream tunables instead of threading loose integers.
//! - CodecConfig::from_env() reads the same env vars the CLI honours.
//! - Fluent setters for overrides (CLI flags, tests).
//!
//! Block size and superblock multiple are NOT stored in the stream: a reader
//! must be given the same values the writer used.
//!
//! Env:
//! - SAVESTREAM_BLOCK_SIZE (default 256)
//! - SAVESTREAM_SUPER_BLOCK_MULTIPLE (default 256)

use std::fmt;

use crate::consts::{
    DEFAULT_BLOCK_SIZE, DEFAULT_SUPER_BLOCK_MULTIPLE, ENV_BLOCK_SIZE, ENV_SUPER_BLOCK_MULTIPLE,
};
use crate::error::{Result, SavestreamError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Block size in bytes (dedup granularity).
    pub block_size: usize,

    /// Blocks per superblock.
    pub super_block_multiple: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            super_block_multiple: DEFAULT_SUPER_BLOCK_MULTIPLE,
        }
    }
}

impl CodecConfig {
    pub fn new(block_size: usize, super_block_multiple: usize) -> Self {
        Self {
            block_size,
            super_block_multiple,
        }
    }

    /// Load configuration from environment variables; unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_BLOCK_SIZE) {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.block_size = n;
            }
        }

        if let Ok(v) = std::env::var(ENV_SUPER_BLOCK_MULTIPLE) {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.super_block_multiple = n;
            }
        }

        cfg
    }

    pub fn with_block_size(mut self, n: usize) -> Self {
        self.block_size = n;
        self
    }

    pub fn with_super_block_multiple(mut self, n: usize) -> Self {
        self.super_block_multiple = n;
        self
    }

    /// Superblock size in bytes. Call validate() first; saturates on overflow.
    pub fn super_block_size(&self) -> usize {
        self.block_size.saturating_mul(self.super_block_multiple)
    }

    /// Reject zero sizes and a superblock size that does not fit in usize.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(SavestreamError::invalid(
                "block size must be a positive integer",
            ));
        }
        if self.super_block_multiple == 0 {
            return Err(SavestreamError::invalid(
                "superblock multiple must be a positive integer",
            ));
        }
        if self.block_size.checked_mul(self.super_block_multiple).is_none() {
            return Err(SavestreamError::invalid(format!(
                "superblock size overflows ({} * {})",
                self.block_size, self.super_block_multiple
            )));
        }
        Ok(())
    }
}

impl fmt::Display for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CodecConfig {{ block_size: {}, super_block_multiple: {}, super_block_size: {} }}",
            self.block_size,
            self.super_block_multiple,
            self.super_block_size(),
        )
    }
}
