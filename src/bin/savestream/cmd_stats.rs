use anyhow::Result;
use std::path::PathBuf;

use savestream::CodecConfig;

use crate::util::read_all;

pub fn exec(cfg: &CodecConfig, stream: PathBuf, json: bool, frames: bool) -> Result<()> {
    let bytes = read_all(&stream)?;
    let mut st = savestream::stats(&bytes, cfg)?;
    let unique_bytes = st.unique_bytes(cfg);

    if json {
        if !frames {
            st.per_frame.clear();
        }
        let mut v = serde_json::to_value(&st)?;
        if let Some(obj) = v.as_object_mut() {
            obj.insert("block_size".into(), cfg.block_size.into());
            obj.insert("super_block_multiple".into(), cfg.super_block_multiple.into());
            obj.insert("unique_bytes".into(), unique_bytes.into());
        }
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    println!("Savestream: {}", stream.display());
    println!("  {}", cfg);
    println!("  frames:              {}", st.frames);
    println!("  stream bytes:        {}", st.stream_bytes);
    println!("  aligned bytes:       {}", st.aligned_bytes);
    println!("  unique blocks:       {} ({} bytes)", st.unique_blocks, unique_bytes);
    println!("  unique superblocks:  {}", st.unique_super_blocks);
    println!("  superblock refs:     {}", st.super_block_refs);
    if st.stream_bytes > 0 {
        println!(
            "  aligned/stream:      {:.2}x",
            st.aligned_bytes as f64 / st.stream_bytes as f64
        );
    }
    println!("  fingerprint:         {:016x}", st.fingerprint);

    if frames {
        println!("  per frame (index new_blocks new_superblocks new_bytes superblocks patch_ops):");
        for f in &st.per_frame {
            println!(
                "    {:>5} {:>8} {:>8} {:>10} {:>8} {:>5}",
                f.index, f.new_blocks, f.new_super_blocks, f.new_bytes, f.super_blocks, f.patch_ops
            );
        }
    }
    Ok(())
}
