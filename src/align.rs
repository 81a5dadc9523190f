//! Выравнивание буферного сегмента.
//!
//! align_buffer(): каждый регион из buffer_infos дополняется нулями до кратного
//! block_size и регионы склеиваются подряд: так одинаковые страницы памяти
//! попадают на одинаковые границы блоков.
//!
//! unalign_buffer(): обратный ход. Регионы извлекаются по тем же границам
//! block_size, но раскладываются обратно с 4-байтовым выравниванием (формат
//! буферного сегмента v86). Асимметрия намеренная.

use crate::consts::REGION_ALIGN;
use crate::error::{Result, SavestreamError};
use crate::snapshot::BufferInfo;

/// Round up to the next multiple of 4.
#[inline]
pub fn align4(n: usize) -> usize {
    (n + (REGION_ALIGN - 1)) & !(REGION_ALIGN - 1)
}

/// Zero bytes needed to bring `len` to a multiple of `multiple` (multiple > 0).
#[inline]
fn padding_for(len: usize, multiple: usize) -> usize {
    (multiple - len % multiple) % multiple
}

fn check_multiple(multiple: usize, what: &str) -> Result<()> {
    if multiple == 0 {
        return Err(SavestreamError::invalid(format!(
            "{what} must be a positive integer"
        )));
    }
    Ok(())
}

/// Zero-pad `buf` in place to a multiple of `multiple`.
pub fn pad_to(mut buf: Vec<u8>, multiple: usize) -> Result<Vec<u8>> {
    check_multiple(multiple, "padding multiple")?;
    let padding = padding_for(buf.len(), multiple);
    if padding != 0 {
        buf.resize(buf.len() + padding, 0);
    }
    Ok(buf)
}

/// Length of the aligned form of `regions` for a given block size.
pub fn aligned_len(regions: &[BufferInfo], block_size: usize) -> Result<usize> {
    check_multiple(block_size, "block size")?;
    Ok(regions
        .iter()
        .map(|r| r.length.saturating_add(padding_for(r.length, block_size)))
        .fold(0usize, usize::saturating_add))
}

/// Extract every region, pad each to `block_size`, concatenate in order.
pub fn align_buffer(regions: &[BufferInfo], buffer: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_multiple(block_size, "block size")?;
    let mut out = Vec::with_capacity(buffer.len());

    for (i, r) in regions.iter().enumerate() {
        let raw = r
            .offset
            .checked_add(r.length)
            .and_then(|end| buffer.get(r.offset..end))
            .ok_or_else(|| {
                SavestreamError::malformed(format!(
                    "buffer_infos[{}] ({}+{}) exceeds {}-byte buffer",
                    i,
                    r.offset,
                    r.length,
                    buffer.len()
                ))
            })?;
        out.extend_from_slice(raw);
        out.resize(out.len() + padding_for(r.length, block_size), 0);
    }

    Ok(out)
}

/// Inverse of align_buffer(): regions re-emitted back to back on 4-byte boundaries.
pub fn unalign_buffer(
    regions: &[BufferInfo],
    aligned: &[u8],
    block_size: usize,
) -> Result<Vec<u8>> {
    check_multiple(block_size, "block size")?;
    let mut out = Vec::with_capacity(aligned.len());

    let mut offset = 0usize;
    for (i, r) in regions.iter().enumerate() {
        let raw = offset
            .checked_add(r.length)
            .and_then(|end| aligned.get(offset..end))
            .ok_or_else(|| {
                SavestreamError::corrupt(format!(
                    "aligned buffer ({} bytes) too short for buffer_infos[{}]",
                    aligned.len(),
                    i
                ))
            })?;
        out.extend_from_slice(raw);
        out.resize(align4(out.len()), 0);
        offset = offset.saturating_add(r.length + padding_for(r.length, block_size));
    }

    Ok(out)
}
