//! snapshot: разбор и сборка v86 savestate.
//!
//! Layout:
//!   [0..16)                    header; i32 LE info_len at byte 12
//!   [16..16+info_len)          info (UTF‑8 JSON, см. info.rs)
//!   [align4(16+info_len)..)    buffer region
//!
//! split() borrows; recombine() allocates the full savestate.

pub mod info;

use byteorder::{ByteOrder, LittleEndian};

use crate::align::align4;
use crate::consts::{HEADER_SIZE, INFO_LEN_OFFSET};
use crate::error::{Result, SavestreamError};

pub use info::{buffer_infos, parse_info, BufferInfo};

/// Borrowed view of the three savestate segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavestateParts<'a> {
    pub header: &'a [u8],
    pub info: &'a [u8],
    pub buffer: &'a [u8],
}

/// Read info_len from a 16-byte header.
pub fn info_len(header: &[u8]) -> Result<usize> {
    if header.len() < HEADER_SIZE {
        return Err(SavestreamError::malformed(format!(
            "header too short: {} < {} bytes",
            header.len(),
            HEADER_SIZE
        )));
    }
    let n = LittleEndian::read_i32(&header[INFO_LEN_OFFSET..INFO_LEN_OFFSET + 4]);
    if n < 0 {
        return Err(SavestreamError::malformed(format!("negative info length {n}")));
    }
    Ok(n as usize)
}

/// Split a savestate into header/info/buffer.
///
/// If info ends flush with the input (no room for alignment padding), the
/// buffer is empty.
pub fn split(savestate: &[u8]) -> Result<SavestateParts<'_>> {
    let header = savestate.get(..HEADER_SIZE).ok_or_else(|| {
        SavestreamError::malformed(format!(
            "savestate too short for header: {} bytes",
            savestate.len()
        ))
    })?;
    let info_len = info_len(header)?;

    let info_end = HEADER_SIZE
        .checked_add(info_len)
        .filter(|&end| end <= savestate.len())
        .ok_or_else(|| {
            SavestreamError::malformed(format!(
                "info length {} reads past end of {}-byte savestate",
                info_len,
                savestate.len()
            ))
        })?;
    let info = &savestate[HEADER_SIZE..info_end];

    let buffer_offset = align4(info_end).min(savestate.len());
    let buffer = &savestate[buffer_offset..];

    Ok(SavestateParts {
        header,
        info,
        buffer,
    })
}

/// Inverse of split(): header, info, zero padding to a 4-byte boundary, buffer.
pub fn recombine(header: &[u8], info: &[u8], buffer: &[u8]) -> Vec<u8> {
    let padding = align4(info.len()) - info.len();
    let mut out = Vec::with_capacity(header.len() + info.len() + padding + buffer.len());
    out.extend_from_slice(header);
    out.extend_from_slice(info);
    out.resize(out.len() + padding, 0);
    out.extend_from_slice(buffer);
    out
}

impl SavestateParts<'_> {
    pub fn recombine(&self) -> Vec<u8> {
        recombine(self.header, self.info, self.buffer)
    }
}
