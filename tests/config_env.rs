// tests/config_env.rs
//
// CodecConfig: дефолты, env, fluent‑сеттеры, validate(). Всё, что трогает
// переменные окружения, собрано в одном тесте (env общий на процесс).

use anyhow::Result;

use savestream::consts::{ENV_BLOCK_SIZE, ENV_SUPER_BLOCK_MULTIPLE};
use savestream::{decode, encode, CodecConfig, Encoder, SavestreamError};

mod common;
use common::capture_sequence;

#[test]
fn defaults_and_env() -> Result<()> {
    let d = CodecConfig::default();
    assert_eq!((d.block_size, d.super_block_multiple), (256, 256));
    assert_eq!(d.super_block_size(), 65536);

    std::env::set_var(ENV_BLOCK_SIZE, "64");
    std::env::set_var(ENV_SUPER_BLOCK_MULTIPLE, " 8 ");
    let cfg = CodecConfig::from_env();
    assert_eq!(cfg, CodecConfig::new(64, 8));

    // мусор в env игнорируется
    std::env::set_var(ENV_BLOCK_SIZE, "lots");
    assert_eq!(CodecConfig::from_env().block_size, 256);

    std::env::remove_var(ENV_BLOCK_SIZE);
    std::env::remove_var(ENV_SUPER_BLOCK_MULTIPLE);
    assert_eq!(CodecConfig::from_env(), CodecConfig::default());
    Ok(())
}

#[test]
fn fluent_overrides() {
    let cfg = CodecConfig::default()
        .with_block_size(32)
        .with_super_block_multiple(2);
    assert_eq!(cfg.super_block_size(), 64);
    assert!(cfg.to_string().contains("block_size: 32"));
}

#[test]
fn validation() {
    assert!(matches!(
        CodecConfig::new(0, 4).validate(),
        Err(SavestreamError::InvalidArgument(_))
    ));
    assert!(matches!(
        CodecConfig::new(4, 0).validate(),
        Err(SavestreamError::InvalidArgument(_))
    ));
    assert!(matches!(
        CodecConfig::new(usize::MAX, 2).validate(),
        Err(SavestreamError::InvalidArgument(_))
    ));
    assert!(matches!(
        Encoder::new(CodecConfig::new(0, 1)),
        Err(SavestreamError::InvalidArgument(_))
    ));
    assert!(matches!(
        encode(Vec::<Vec<u8>>::new(), &CodecConfig::new(8, 0)),
        Err(SavestreamError::InvalidArgument(_))
    ));
}

#[test]
fn reader_must_use_writer_geometry() -> Result<()> {
    let states = capture_sequence(51, 3);
    let stream = encode(&states, &CodecConfig::new(16, 4))?;

    let mut dec = decode(&stream, &CodecConfig::new(32, 4))?;
    assert!(matches!(dec.next(), Some(Err(SavestreamError::CorruptStream(_)))));
    assert!(dec.next().is_none());
    Ok(())
}
