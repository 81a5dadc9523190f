//! Общие константы форматов (v86 savestate, savestream frames, CLI files).

// -------- v86 savestate envelope --------
pub const HEADER_SIZE: usize = 16;
// [magic u32][version u32][total_len u32][info_len i32 LE]
pub const INFO_LEN_OFFSET: usize = 12;
/// Buffer region and its sub-regions start on 4-byte boundaries.
pub const REGION_ALIGN: usize = 4;

// -------- Content store --------
pub const DEFAULT_BLOCK_SIZE: usize = 256;
pub const DEFAULT_SUPER_BLOCK_MULTIPLE: usize = 256;
/// Pre-registered ids (all-zero block / all-zero superblock).
pub const ZERO_BLOCK_ID: u32 = 0;
pub const ZERO_SUPER_BLOCK_ID: u32 = 0;
/// First id handed out to unseen content.
pub const FIRST_DYNAMIC_ID: u32 = 1;

// -------- Env --------
pub const ENV_BLOCK_SIZE: &str = "SAVESTREAM_BLOCK_SIZE";
pub const ENV_SUPER_BLOCK_MULTIPLE: &str = "SAVESTREAM_SUPER_BLOCK_MULTIPLE";

// -------- Files (capture tooling) --------
pub const SAVESTATE_PREFIX: &str = "v86state";
pub const SAVESTATE_EXT: &str = "bin";
pub const DEFAULT_STREAM_FILE: &str = "last.savestream";
