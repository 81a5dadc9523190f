//! Lightweight global metrics for the savestream codec.
//!
//! Потокобезопасные атомарные счётчики:
//! - Encode (frames, input bytes, new blocks/superblocks, reused superblocks)
//! - Decode (frames, reconstructed bytes)
//!
//! Counters never affect codec output; they exist for the CLI and for callers
//! that want dedup figures across many encode calls.

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Encode -----
static FRAMES_ENCODED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_BYTES_IN: AtomicU64 = AtomicU64::new(0);
static BLOCKS_NEW: AtomicU64 = AtomicU64::new(0);
static SUPER_BLOCKS_NEW: AtomicU64 = AtomicU64::new(0);
static SUPER_BLOCKS_REUSED: AtomicU64 = AtomicU64::new(0);
static STREAM_BYTES_OUT: AtomicU64 = AtomicU64::new(0);

// ----- Decode -----
static FRAMES_DECODED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_BYTES_OUT: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Encode
    pub frames_encoded: u64,
    pub snapshot_bytes_in: u64,
    pub blocks_new: u64,
    pub super_blocks_new: u64,
    pub super_blocks_reused: u64,
    pub stream_bytes_out: u64,

    // Decode
    pub frames_decoded: u64,
    pub snapshot_bytes_out: u64,
}

impl MetricsSnapshot {
    /// Доля ссылок на уже известные суперблоки.
    pub fn super_block_reuse_ratio(&self) -> f64 {
        let total = self.super_blocks_new + self.super_blocks_reused;
        if total == 0 {
            0.0
        } else {
            self.super_blocks_reused as f64 / total as f64
        }
    }

    /// Input snapshot bytes per emitted stream byte.
    pub fn compression_ratio(&self) -> f64 {
        if self.stream_bytes_out == 0 {
            0.0
        } else {
            self.snapshot_bytes_in as f64 / self.stream_bytes_out as f64
        }
    }
}

// ----- Recorders (Encode) -----
pub fn record_frame_encoded(snapshot_len: usize, new_blocks: usize, new_super_blocks: usize, reused: usize) {
    FRAMES_ENCODED.fetch_add(1, Ordering::Relaxed);
    SNAPSHOT_BYTES_IN.fetch_add(snapshot_len as u64, Ordering::Relaxed);
    BLOCKS_NEW.fetch_add(new_blocks as u64, Ordering::Relaxed);
    SUPER_BLOCKS_NEW.fetch_add(new_super_blocks as u64, Ordering::Relaxed);
    SUPER_BLOCKS_REUSED.fetch_add(reused as u64, Ordering::Relaxed);
}

pub fn record_stream_written(bytes: usize) {
    STREAM_BYTES_OUT.fetch_add(bytes as u64, Ordering::Relaxed);
}

// ----- Recorders (Decode) -----
pub fn record_frame_decoded(snapshot_len: usize) {
    FRAMES_DECODED.fetch_add(1, Ordering::Relaxed);
    SNAPSHOT_BYTES_OUT.fetch_add(snapshot_len as u64, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        frames_encoded: FRAMES_ENCODED.load(Ordering::Relaxed),
        snapshot_bytes_in: SNAPSHOT_BYTES_IN.load(Ordering::Relaxed),
        blocks_new: BLOCKS_NEW.load(Ordering::Relaxed),
        super_blocks_new: SUPER_BLOCKS_NEW.load(Ordering::Relaxed),
        super_blocks_reused: SUPER_BLOCKS_REUSED.load(Ordering::Relaxed),
        stream_bytes_out: STREAM_BYTES_OUT.load(Ordering::Relaxed),

        frames_decoded: FRAMES_DECODED.load(Ordering::Relaxed),
        snapshot_bytes_out: SNAPSHOT_BYTES_OUT.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    FRAMES_ENCODED.store(0, Ordering::Relaxed);
    SNAPSHOT_BYTES_IN.store(0, Ordering::Relaxed);
    BLOCKS_NEW.store(0, Ordering::Relaxed);
    SUPER_BLOCKS_NEW.store(0, Ordering::Relaxed);
    SUPER_BLOCKS_REUSED.store(0, Ordering::Relaxed);
    STREAM_BYTES_OUT.store(0, Ordering::Relaxed);

    FRAMES_DECODED.store(0, Ordering::Relaxed);
    SNAPSHOT_BYTES_OUT.store(0, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_handle_empty_counters() {
        let m = MetricsSnapshot::default();
        assert_eq!(m.super_block_reuse_ratio(), 0.0);
        assert_eq!(m.compression_ratio(), 0.0);

        let m = MetricsSnapshot {
            super_blocks_new: 1,
            super_blocks_reused: 3,
            snapshot_bytes_in: 1000,
            stream_bytes_out: 250,
            ..MetricsSnapshot::default()
        };
        assert_eq!(m.super_block_reuse_ratio(), 0.75);
        assert_eq!(m.compression_ratio(), 4.0);
    }

    #[test]
    fn record_and_reset() {
        // единственный unit‑тест, который пишет в глобальные счётчики
        reset();
        record_frame_encoded(100, 2, 1, 3);
        record_stream_written(40);
        record_frame_decoded(100);
        let m = snapshot();
        assert_eq!((m.frames_encoded, m.blocks_new, m.super_blocks_reused), (1, 2, 3));
        assert_eq!((m.stream_bytes_out, m.frames_decoded, m.snapshot_bytes_out), (40, 1, 100));
        reset();
        assert_eq!(snapshot().frames_encoded, 0);
    }
}
