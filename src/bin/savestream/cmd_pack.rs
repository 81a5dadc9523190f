use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use savestream::{metrics, CodecConfig, Encoder};

use crate::util::{collect_savestates, read_all, write_all};

pub fn exec(cfg: &CodecConfig, inputs: Vec<PathBuf>, out: PathBuf) -> Result<()> {
    let files = collect_savestates(&inputs)?;
    if files.is_empty() {
        bail!("no savestate files found");
    }

    // Файлы читаются по одному; в памяти держим только словари энкодера.
    let mut enc = Encoder::new(*cfg)?;
    for path in &files {
        let bytes = read_all(path)?;
        enc.push(&bytes)
            .with_context(|| format!("encode {}", path.display()))?;
    }
    let stream = enc.finish()?;
    write_all(&out, &stream)?;

    info!(
        "packed {} savestates into {} ({} bytes, {})",
        files.len(),
        out.display(),
        stream.len(),
        cfg
    );
    let ms = metrics::snapshot();
    info!(
        "superblock reuse {:.1}%, snapshot/stream {:.2}x",
        ms.super_block_reuse_ratio() * 100.0,
        ms.compression_ratio()
    );
    println!("{} savestates -> {} ({} bytes)", files.len(), out.display(), stream.len());
    Ok(())
}
