use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use savestream::CodecConfig;

use crate::util::{read_all, savestate_file_name, write_all};

pub fn exec(cfg: &CodecConfig, stream: PathBuf, out_dir: PathBuf) -> Result<()> {
    let bytes = read_all(&stream)?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("create {}", out_dir.display()))?;

    let mut n = 0usize;
    for (i, savestate) in savestream::decode(&bytes, cfg)?.enumerate() {
        let savestate = savestate.with_context(|| format!("decode savestate #{i}"))?;
        write_all(&out_dir.join(savestate_file_name(i)), &savestate)?;
        n += 1;
    }

    println!("{} savestates -> {}", n, out_dir.display());
    Ok(())
}
