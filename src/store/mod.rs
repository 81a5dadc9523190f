//! store: двухуровневое контент‑адресное хранилище (blocks + superblocks).
//!
//! Состав:
//! - ContentStore (content.rs): сторона encode. Выдаёт плотные id новым
//!   блокам/суперблокам строго в порядке первого появления и копит «новое в
//!   этом кадре» для эмиссии.
//! - Dictionary (dict.rs): сторона decode. Принимает новые блоки/суперблоки
//!   кадра и собирает выровненный буфер по последовательности id суперблоков.
//!
//! Оба начинают с предзарегистрированных нулевых id:
//!   block 0      = block_size нулевых байт
//!   superblock 0 = [0; super_block_multiple]
//!
//! Время жизни: один проход encode/decode; между вызовами ничего не шарится.

pub mod content;
pub mod dict;

pub use content::{ContentStore, FrameDelta};
pub use dict::Dictionary;
