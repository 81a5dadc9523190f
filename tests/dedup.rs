// tests/dedup.rs
//
// Свойства двухуровневой дедупликации, видимые в самих кадрах:
// - id выдаются плотно, по первому появлению;
// - повтор суперблока не переизлучается;
// - нулевые блок/суперблок предзарегистрированы под id 0;
// - два одинаковых снимка подряд: второй кадр без нового контента, патч `[]`.

use anyhow::Result;
use oorandom::Rand64;
use serde_json::json;

use savestream::codec::FrameReader;
use savestream::frame::Frame;
use savestream::{encode, CodecConfig};

mod common;
use common::{capture_sequence, random_bytes, savestate, small_cfg};

fn frames(stream: &[u8]) -> Result<Vec<Frame>> {
    Ok(FrameReader::new(stream)?.collect::<savestream::Result<Vec<_>>>()?)
}

#[test]
fn identical_consecutive_snapshots() -> Result<()> {
    let mut rng = Rand64::new(41);
    let s = savestate(&[random_bytes(&mut rng, 500)], &json!({ "tick": 1 }));
    let stream = encode([&s, &s], &small_cfg())?;
    let fs = frames(&stream)?;
    assert_eq!(fs.len(), 2);

    assert!(!fs[0].new_blocks.is_empty());
    assert!(!fs[0].new_super_blocks.is_empty());

    assert!(fs[1].new_blocks.is_empty());
    assert!(fs[1].new_super_blocks.is_empty());
    assert_eq!(fs[1].super_id_sequence, fs[0].super_id_sequence);
    assert_eq!(&fs[1].info_patch[..], b"[]");
    assert_eq!(fs[1].header_block, fs[0].header_block);
    Ok(())
}

#[test]
fn ids_are_dense_and_increasing() -> Result<()> {
    let states = capture_sequence(42, 10);
    let stream = encode(&states, &small_cfg())?;

    let mut next_block = 1u32;
    let mut next_super = 1u32;
    for f in frames(&stream)? {
        for id in f.new_blocks.keys() {
            assert_eq!(id.0, next_block);
            next_block += 1;
        }
        for id in f.new_super_blocks.keys() {
            assert_eq!(id.0, next_super);
            next_super += 1;
        }
        // Новые суперблоки появляются в последовательности в порядке id.
        let first_uses: Vec<u32> = {
            let mut seen = Vec::new();
            for &s in &f.super_id_sequence {
                if f.new_super_blocks.keys().any(|k| k.0 == s) && !seen.contains(&s) {
                    seen.push(s);
                }
            }
            seen
        };
        let declared: Vec<u32> = f.new_super_blocks.keys().map(|k| k.0).collect();
        assert_eq!(first_uses, declared);
    }
    Ok(())
}

#[test]
fn repeated_superblock_is_not_reemitted() -> Result<()> {
    let cfg = CodecConfig::new(8, 2);
    let mut rng = Rand64::new(43);
    let a = random_bytes(&mut rng, 16);
    let b = random_bytes(&mut rng, 16);

    // Кадр 0: [A B A]; кадр 1: [B A C]
    let c = random_bytes(&mut rng, 16);
    let s0 = savestate(&[a.clone(), b.clone(), a.clone()], &json!({}));
    let s1 = savestate(&[b.clone(), a.clone(), c], &json!({}));
    let fs = frames(&encode([s0, s1], &cfg)?)?;

    assert_eq!(fs[0].super_id_sequence, vec![1, 2, 1]);
    assert_eq!(fs[0].new_super_blocks.len(), 2);
    assert_eq!(fs[0].new_blocks.len(), 4);

    assert_eq!(fs[1].super_id_sequence, vec![2, 1, 3]);
    assert_eq!(fs[1].new_super_blocks.keys().map(|k| k.0).collect::<Vec<_>>(), vec![3]);
    assert_eq!(fs[1].new_blocks.len(), 2);
    Ok(())
}

#[test]
fn zero_content_uses_preregistered_ids() -> Result<()> {
    let cfg = CodecConfig::new(16, 4);
    let s = savestate(&[vec![0u8; 64 * 3]], &json!({}));
    let fs = frames(&encode([s], &cfg)?)?;
    assert_eq!(fs[0].super_id_sequence, vec![0, 0, 0]);
    assert!(fs[0].new_blocks.is_empty());
    assert!(fs[0].new_super_blocks.is_empty());
    Ok(())
}

#[test]
fn partial_zero_superblock_reuses_zero_block() -> Result<()> {
    let cfg = CodecConfig::new(4, 4);
    // один ненулевой блок, остальные три: нулевые
    let s = savestate(&[vec![1, 2, 3, 4]], &json!({}));
    let fs = frames(&encode([s], &cfg)?)?;
    assert_eq!(fs[0].super_id_sequence, vec![1]);
    assert_eq!(fs[0].new_blocks.len(), 1);
    let ids = fs[0].new_super_blocks.values().next().cloned().unwrap_or_default();
    assert_eq!(ids, vec![1, 0, 0, 0]);
    Ok(())
}
