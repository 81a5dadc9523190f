//! Lazy decode.
//!
//! FrameReader читает кадры из MessagePack‑массива по одному (без разбора
//! всего потока). Replay держит словари и предыдущий info; Decoder: итератор
//! savestate'ов поверх них.
//!
//! Каждый next() делает работу ровно одного кадра. Итератор однопроходный;
//! для повторного чтения вызовите decode() ещё раз. После ошибки итератор
//! возвращает None.

use log::debug;
use serde_bytes::ByteBuf;
use serde_json::{Map, Value};

use crate::align::unalign_buffer;
use crate::config::CodecConfig;
use crate::error::{Result, SavestreamError};
use crate::frame::Frame;
use crate::metrics;
use crate::patch::{apply_patch, decode_patch};
use crate::snapshot::info::serialize_info;
use crate::snapshot::{buffer_infos, recombine};
use crate::store::Dictionary;

/// Number of frames, read from the array header only.
pub fn frame_count(stream: &[u8]) -> Result<usize> {
    let mut rest = stream;
    read_frame_count(&mut rest)
}

fn read_frame_count(rest: &mut &[u8]) -> Result<usize> {
    let n = rmp::decode::read_array_len(rest).map_err(|e| {
        SavestreamError::corrupt(format!("savestream is not a frame array: {e}"))
    })?;
    Ok(n as usize)
}

/// Pull‑based reader of raw frames.
pub struct FrameReader<'a> {
    rest: &'a [u8],
    remaining: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(stream: &'a [u8]) -> Result<Self> {
        let mut rest = stream;
        let remaining = read_frame_count(&mut rest)?;
        Ok(Self { rest, remaining })
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for FrameReader<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Result<Frame>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let res = rmp_serde::from_read::<_, Frame>(&mut self.rest).map_err(SavestreamError::from);
        if res.is_err() {
            self.remaining = 0;
        }
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// A frame whose content is merged and whose info is known, but whose
/// savestate is not built yet.
pub(crate) struct Replayed {
    header: ByteBuf,
    pub(crate) super_ids: Vec<u32>,
    pub(crate) patch_ops: usize,
}

/// Dictionaries + previous info, advanced frame by frame.
///
/// Все проверки кадра живут здесь: decode, skip_frames и stats проходят
/// через advance() и отвергают одни и те же потоки.
pub(crate) struct Replay {
    cfg: CodecConfig,
    dict: Dictionary,
    info: Value,
}

impl Replay {
    pub(crate) fn new(cfg: CodecConfig) -> Result<Self> {
        Ok(Self {
            dict: Dictionary::new(&cfg)?,
            cfg,
            info: Value::Object(Map::new()),
        })
    }

    pub(crate) fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub(crate) fn advance(&mut self, frame: Frame) -> Result<Replayed> {
        frame.validate(&self.cfg)?;
        let Frame {
            header_block,
            info_patch,
            new_blocks,
            new_super_blocks,
            super_id_sequence,
        } = frame;

        self.dict.merge(new_blocks, new_super_blocks)?;
        self.dict.check_refs(&super_id_sequence)?;
        let ops = decode_patch(&info_patch)?;
        self.info = apply_patch(&self.info, &ops)?;

        Ok(Replayed {
            header: header_block,
            super_ids: super_id_sequence,
            patch_ops: ops.len(),
        })
    }

    fn materialize(&self, r: Replayed) -> Result<Vec<u8>> {
        let info_bytes = serialize_info(&self.info)?;
        let regions = buffer_infos(&self.info)
            .map_err(|e| SavestreamError::corrupt(format!("reconstructed info: {e}")))?;
        let aligned = self.dict.rebuild(&r.super_ids)?;
        let buffer = unalign_buffer(&regions, &aligned, self.cfg.block_size)?;
        Ok(recombine(&r.header, &info_bytes, &buffer))
    }
}

/// Iterator of savestates reconstructed from a savestream.
pub struct Decoder<'a> {
    frames: FrameReader<'a>,
    replay: Replay,
    index: usize,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(stream: &'a [u8], cfg: CodecConfig) -> Result<Self> {
        Ok(Self {
            frames: FrameReader::new(stream)?,
            replay: Replay::new(cfg)?,
            index: 0,
            failed: false,
        })
    }

    /// Index of the next savestate next() would yield.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Frames left in the stream.
    pub fn remaining(&self) -> usize {
        self.frames.remaining()
    }

    /// Advance over `n` frames, replaying their content and info without
    /// building their savestates.
    pub fn skip_frames(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            let frame = match self.frames.next() {
                Some(Ok(f)) => f,
                Some(Err(e)) => return Err(self.fail(e)),
                None => {
                    return Err(self.fail(SavestreamError::corrupt(format!(
                        "stream ended at frame {}",
                        self.index
                    ))))
                }
            };
            if let Err(e) = self.replay.advance(frame) {
                return Err(self.fail(e));
            }
            self.index += 1;
        }
        Ok(())
    }

    fn fail(&mut self, e: SavestreamError) -> SavestreamError {
        self.failed = true;
        e
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Result<Vec<u8>>> {
        if self.failed {
            return None;
        }
        let res = match self.frames.next()? {
            Ok(frame) => self
                .replay
                .advance(frame)
                .and_then(|r| self.replay.materialize(r)),
            Err(e) => Err(e),
        };
        match res {
            Ok(savestate) => {
                debug!("decode frame #{}: {} bytes", self.index, savestate.len());
                metrics::record_frame_decoded(savestate.len());
                self.index += 1;
                Some(Ok(savestate))
            }
            Err(e) => Some(Err(self.fail(e))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            self.frames.size_hint()
        }
    }
}
