use anyhow::Result;
use std::path::PathBuf;

use savestream::CodecConfig;

use crate::util::{read_all, write_all};

pub fn exec(cfg: &CodecConfig, stream: PathBuf, start: i64, end: Option<i64>, out: PathBuf) -> Result<()> {
    let bytes = read_all(&stream)?;
    let trimmed = savestream::trim(&bytes, start, end, cfg)?;
    write_all(&out, &trimmed)?;
    println!(
        "{} savestates -> {} ({} bytes, was {})",
        savestream::decode_len(&trimmed)?,
        out.display(),
        trimmed.len(),
        bytes.len()
    );
    Ok(())
}
