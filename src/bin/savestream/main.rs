use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod cmd_pack;
mod cmd_unpack;
mod cmd_len;
mod cmd_extract;
mod cmd_trim;
mod cmd_stats;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт: info.
    // Пример: RUST_LOG=debug savestream pack --input ./states
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let cfg = util::codec_config(cli.block_size, cli.super_block_multiple)?;

    match cli.cmd {
        cli::Cmd::Pack { inputs, out } =>
            cmd_pack::exec(&cfg, inputs, out),

        cli::Cmd::Unpack { stream, out_dir } =>
            cmd_unpack::exec(&cfg, stream, out_dir),

        cli::Cmd::Len { stream } =>
            cmd_len::exec(stream),

        cli::Cmd::Extract { stream, index, out } =>
            cmd_extract::exec(&cfg, stream, index, out),

        cli::Cmd::Trim { stream, start, end, out } =>
            cmd_trim::exec(&cfg, stream, start, end, out),

        // Stats supports --json flag
        cli::Cmd::Stats { stream, json, frames } =>
            cmd_stats::exec(&cfg, stream, json, frames),
    }
}
