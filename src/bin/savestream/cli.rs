use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для savestream: упаковка/распаковка последовательностей v86 savestate
#[derive(Parser, Debug)]
#[command(name = "savestream", version, about = "v86 savestream CLI")]
pub struct Cli {
    /// Block size in bytes (overrides SAVESTREAM_BLOCK_SIZE)
    #[arg(long, global = true)]
    pub block_size: Option<usize>,

    /// Blocks per superblock (overrides SAVESTREAM_SUPER_BLOCK_MULTIPLE)
    #[arg(long, global = true)]
    pub super_block_multiple: Option<usize>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Encode savestate files into one savestream
    ///
    /// Каталоги разворачиваются в `v86state (N).bin` (по возрастанию N;
    /// файлы без номера: после, по имени). Явно перечисленные файлы
    /// берутся в заданном порядке.
    Pack {
        /// Savestate files or directories (repeatable)
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,
        /// Output stream file
        #[arg(long, default_value = savestream::consts::DEFAULT_STREAM_FILE)]
        out: PathBuf,
    },
    /// Decode every savestate into `v86state (i).bin` files
    Unpack {
        #[arg(long)]
        stream: PathBuf,
        /// Target directory (created if missing)
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the number of savestates (reads the array header only)
    Len {
        #[arg(long)]
        stream: PathBuf,
    },
    /// Reconstruct a single savestate by index
    Extract {
        #[arg(long)]
        stream: PathBuf,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Re-encode savestates [start, end) as a new stream
    Trim {
        #[arg(long)]
        stream: PathBuf,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        start: i64,
        /// Exclusive end; negative counts from the end, omitted = to the end
        #[arg(long, allow_negative_numbers = true)]
        end: Option<i64>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Dedup statistics without reconstructing savestates
    Stats {
        #[arg(long)]
        stream: PathBuf,
        /// Print one JSON object
        #[arg(long)]
        json: bool,
        /// Include per-frame rows
        #[arg(long)]
        frames: bool,
    },
}
