use anyhow::Result;
use std::path::PathBuf;

use savestream::CodecConfig;

use crate::util::{read_all, write_all};

pub fn exec(cfg: &CodecConfig, stream: PathBuf, index: usize, out: PathBuf) -> Result<()> {
    let bytes = read_all(&stream)?;
    let savestate = savestream::decode_one(&bytes, index, cfg)?;
    write_all(&out, &savestate)?;
    println!("savestate #{} -> {} ({} bytes)", index, out.display(), savestate.len());
    Ok(())
}
