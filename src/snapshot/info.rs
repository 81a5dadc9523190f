//! snapshot/info: JSON info segment.
//!
//! Формат (фрагмент, остальные поля кодеку безразличны):
//!   { ..., "buffer_infos": [ {"offset": 0, "length": 1024}, ... ], ... }
//!
//! Info is kept as a serde_json::Value (key order preserved) because the
//! differencer works on the whole document, not just buffer_infos.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SavestreamError};

/// One meaningful sub-region of the buffer segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferInfo {
    pub offset: usize,
    pub length: usize,
}

/// Parse info bytes into a JSON document. Must be an object.
pub fn parse_info(info: &[u8]) -> Result<Value> {
    let doc: Value = serde_json::from_slice(info)
        .map_err(|e| SavestreamError::malformed(format!("info is not valid JSON: {e}")))?;
    if !doc.is_object() {
        return Err(SavestreamError::malformed("info is not a JSON object"));
    }
    Ok(doc)
}

/// Extract `buffer_infos` from a parsed info document.
pub fn buffer_infos(info: &Value) -> Result<Vec<BufferInfo>> {
    let raw = info
        .get("buffer_infos")
        .ok_or_else(|| SavestreamError::malformed("info has no buffer_infos"))?;
    Vec::<BufferInfo>::deserialize(raw)
        .map_err(|e| SavestreamError::malformed(format!("bad buffer_infos: {e}")))
}

/// Compact serialization, byte-identical to what the capture side writes.
///
/// Bit-for-bit only for compact JSON whose keys keep their relative order
/// between savestates and whose numbers are already in serde_json's form.
/// Whitespace is dropped, a key added in the middle of an object comes
/// back appended after the existing keys, and floats are re-printed
/// (`1e+21` becomes `1e21`). The parsed value is always the same.
pub fn serialize_info(info: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(info)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn buffer_infos_in_order() {
        let doc = parse_info(
            br#"{"state":[1,2],"buffer_infos":[{"offset":0,"length":9},{"offset":12,"length":4}]}"#,
        )
        .unwrap();
        let regions = buffer_infos(&doc).unwrap();
        assert_eq!(
            regions,
            vec![
                BufferInfo { offset: 0, length: 9 },
                BufferInfo { offset: 12, length: 4 }
            ]
        );
    }

    #[test]
    fn missing_or_bad_buffer_infos_is_malformed() {
        let err = buffer_infos(&json!({"state": []})).unwrap_err();
        assert!(matches!(err, SavestreamError::MalformedSnapshot(_)));
        let err = buffer_infos(&json!({"buffer_infos": [{"offset": -1, "length": 2}]})).unwrap_err();
        assert!(matches!(err, SavestreamError::MalformedSnapshot(_)));
        assert!(parse_info(b"[1,2]").is_err());
        assert!(parse_info(b"{oops").is_err());
    }

    #[test]
    fn serialize_keeps_key_order() {
        let raw = br#"{"z":1,"a":{"y":2,"b":3},"buffer_infos":[]}"#;
        let doc = parse_info(raw).unwrap();
        assert_eq!(serialize_info(&doc).unwrap(), raw.to_vec());
    }

    #[test]
    fn reserialization_keeps_value_not_formatting() {
        let compact = br#"{"a":1,"b":[true,null],"c":{"d":"x"}}"#;
        assert_eq!(serialize_info(&parse_info(compact).unwrap()).unwrap(), compact);

        let spaced = parse_info(b"{ \"a\" : 1,\n \"f\": 1e+21 }").unwrap();
        let out = serialize_info(&spaced).unwrap();
        assert_eq!(out, br#"{"a":1,"f":1e21}"#);
        assert_eq!(parse_info(&out).unwrap(), spaced);
    }
}
