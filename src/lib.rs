// Базовые модули
pub mod consts;
pub mod config;
pub mod error;
pub mod hash;
pub mod metrics;

// Снимок v86: разбор, выравнивание
pub mod snapshot; // src/snapshot/{mod,info}.rs
pub mod align;

// JSON Patch для info
pub mod patch; // src/patch/{mod,pointer,diff,apply}.rs

// Дедупликация и формат кадра
pub mod store; // src/store/{mod,content,dict}.rs
pub mod frame;

// Кодек потока
pub mod codec; // src/codec/{mod,encoder,decoder,stats}.rs

// Удобные реэкспорты
pub use codec::{
    decode, decode_len, decode_one, encode, stats, trim, Decoder, Encoder, StreamStats,
};
pub use config::CodecConfig;
pub use error::{Result, SavestreamError};
