// tests/common/mod.rs
//
// Общие билдеры для интеграционных тестов: синтетические v86 savestate в
// каноническом виде (регионы подряд с 4‑байтовым выравниванием, info в виде
// компактного JSON), плюс детерминированные мутации через oorandom.

#![allow(dead_code)]

use oorandom::Rand64;
use serde_json::{json, Value};

use savestream::consts::{HEADER_SIZE, INFO_LEN_OFFSET};
use savestream::CodecConfig;

pub const MAGIC: u32 = 0x8676_8676;
pub const VERSION: u32 = 6;

/// Small blocks so a few hundred bytes already span several superblocks.
pub fn small_cfg() -> CodecConfig {
    CodecConfig::new(16, 4)
}

fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// One synthetic VM capture: regions + free-form info fields.
#[derive(Clone, Debug)]
pub struct State {
    pub regions: Vec<Vec<u8>>,
    pub extra: Value,
}

impl State {
    pub fn new(regions: Vec<Vec<u8>>) -> Self {
        Self {
            regions,
            extra: json!({ "cpu": { "eip": 0, "flags": [0, 0, 0] }, "devices": ["pic", "pit"] }),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        savestate(&self.regions, &self.extra)
    }
}

/// Build a savestate whose buffer is the regions laid out on 4-byte boundaries.
pub fn savestate(regions: &[Vec<u8>], extra: &Value) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut infos = Vec::new();
    for r in regions {
        infos.push(json!({ "offset": buffer.len(), "length": r.len() }));
        buffer.extend_from_slice(r);
        buffer.resize(align4(buffer.len()), 0);
    }
    let info = json!({ "buffer_infos": infos, "state": extra });
    let info = serde_json::to_vec(&info).expect("info json");

    let buffer_offset = align4(HEADER_SIZE + info.len());
    let total = buffer_offset + buffer.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    assert_eq!(out.len(), INFO_LEN_OFFSET);
    out.extend_from_slice(&(info.len() as i32).to_le_bytes());
    out.extend_from_slice(&info);
    out.resize(buffer_offset, 0);
    out.extend_from_slice(&buffer);
    out
}

/// Savestate from raw parts (header is built, info taken as-is, buffer verbatim).
pub fn raw_savestate(info: &[u8], buffer: &[u8]) -> Vec<u8> {
    let buffer_offset = align4(HEADER_SIZE + info.len());
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&((buffer_offset + buffer.len()) as u32).to_le_bytes());
    out.extend_from_slice(&(info.len() as i32).to_le_bytes());
    out.extend_from_slice(info);
    out.resize(buffer_offset, 0);
    out.extend_from_slice(buffer);
    out
}

pub fn random_bytes(rng: &mut Rand64, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.rand_u64() as u8).collect()
}

/// Mostly-zero "RAM" with a few random pages, like an idle guest.
pub fn sparse_ram(rng: &mut Rand64, len: usize, page: usize) -> Vec<u8> {
    let mut ram = vec![0u8; len];
    for chunk in ram.chunks_mut(page) {
        if rng.rand_range(0..4) == 0 {
            for b in chunk.iter_mut() {
                *b = rng.rand_u64() as u8;
            }
        }
    }
    ram
}

/// Next capture: a few bytes flipped, counters bumped, sometimes a region
/// grows or shrinks.
pub fn evolve(rng: &mut Rand64, prev: &State) -> State {
    let mut next = prev.clone();
    for r in next.regions.iter_mut() {
        if r.is_empty() {
            continue;
        }
        let flips = rng.rand_range(0..4) as usize;
        for _ in 0..flips {
            let i = rng.rand_range(0..r.len() as u64) as usize;
            r[i] = rng.rand_u64() as u8;
        }
    }
    if let Some(last) = next.regions.last_mut() {
        match rng.rand_range(0..8) {
            0 => last.extend(random_bytes(rng, 7)),
            1 if last.len() > 5 => {
                let n = last.len() - 5;
                last.truncate(n);
            }
            _ => {}
        }
    }

    let eip = next.extra["cpu"]["eip"].as_u64().unwrap_or(0) + rng.rand_range(1..1000);
    next.extra["cpu"]["eip"] = json!(eip);
    if rng.rand_range(0..5) == 0 {
        next.extra["cpu"]["flags"] = json!([rng.rand_range(0..2), 1]);
    }
    next
}

/// Deterministic capture sequence of `n` savestates.
pub fn capture_sequence(seed: u64, n: usize) -> Vec<Vec<u8>> {
    let mut rng = Rand64::new(seed as u128);
    let mut state = State::new(vec![
        random_bytes(&mut rng, 61),
        sparse_ram(&mut rng, 1024, 64),
        vec![0u8; 200],
        random_bytes(&mut rng, 13),
    ]);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(state.to_bytes());
        state = evolve(&mut rng, &state);
    }
    out
}
