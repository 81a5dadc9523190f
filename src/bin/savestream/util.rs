use anyhow::{Context, Result};
use log::warn;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use savestream::consts::{SAVESTATE_EXT, SAVESTATE_PREFIX};
use savestream::CodecConfig;

/// Env config + CLI overrides, validated.
pub fn codec_config(block_size: Option<usize>, super_block_multiple: Option<usize>) -> Result<CodecConfig> {
    let mut cfg = CodecConfig::from_env();
    if let Some(n) = block_size {
        cfg = cfg.with_block_size(n);
    }
    if let Some(n) = super_block_multiple {
        cfg = cfg.with_super_block_multiple(n);
    }
    cfg.validate()?;
    Ok(cfg)
}

pub fn read_all(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

pub fn write_all(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}

/// File name for the i‑th savestate, as the capture tool names them.
pub fn savestate_file_name(i: usize) -> String {
    format!("{SAVESTATE_PREFIX} ({i}).{SAVESTATE_EXT}")
}

/// Number in parentheses of `v86state (N).bin`, if any.
pub fn savestate_number(name: &str) -> Option<u64> {
    let open = name.rfind('(')?;
    let close = name[open..].find(')')? + open;
    name[open + 1..close].trim().parse().ok()
}

/// Numbered files first (ascending N), then the rest by name.
pub fn savestate_order(a: &Path, b: &Path) -> Ordering {
    let name = |p: &Path| {
        p.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let (na, nb) = (name(a), name(b));
    match (savestate_number(&na), savestate_number(&nb)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| na.cmp(&nb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => na.cmp(&nb),
    }
}

/// Expand inputs into an ordered list of savestate files.
///
/// A directory contributes its `*.bin` files sorted by savestate_order;
/// explicit files keep their command‑line position.
pub fn collect_savestates(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        let md = fs::metadata(input).with_context(|| format!("stat {}", input.display()))?;
        if !md.is_dir() {
            out.push(input.clone());
            continue;
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(input).with_context(|| format!("read_dir {}", input.display()))? {
            let path = entry?.path();
            let is_bin = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case(SAVESTATE_EXT))
                .unwrap_or(false);
            if path.is_file() && is_bin {
                files.push(path);
            } else {
                warn!("skip {}", path.display());
            }
        }
        files.sort_by(|a, b| savestate_order(a, b));
        out.extend(files);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_files_sort_numerically() {
        let mut v: Vec<PathBuf> = ["v86state (10).bin", "zz.bin", "v86state (2).bin", "a.bin", "v86state (0).bin"]
            .iter()
            .map(PathBuf::from)
            .collect();
        v.sort_by(|a, b| savestate_order(a, b));
        let names: Vec<_> = v.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(
            names,
            ["v86state (0).bin", "v86state (2).bin", "v86state (10).bin", "a.bin", "zz.bin"]
        );
    }

    #[test]
    fn file_name_matches_capture_tool() {
        assert_eq!(savestate_file_name(3), "v86state (3).bin");
        assert_eq!(savestate_number("v86state (3).bin"), Some(3));
        assert_eq!(savestate_number("v86state.bin"), None);
    }
}
