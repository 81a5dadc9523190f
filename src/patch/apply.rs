//! Применение JSON Patch.
//!
//! Строгий режим: путь, который не разрешается (нет ключа, индекс вне
//! диапазона, кривой pointer), считается ошибкой, а не молчаливое создание значения.
//! Патч применяется к копии: при ошибке исходный документ не меняется.

use serde_json::Value;

use super::pointer;
use super::PatchOp;
use crate::error::{Result, SavestreamError};

type OpResult<T> = std::result::Result<T, &'static str>;

/// Apply `ops` to `doc`, returning the patched document.
pub fn apply_patch(doc: &Value, ops: &[PatchOp]) -> Result<Value> {
    let mut out = doc.clone();
    for (index, op) in ops.iter().enumerate() {
        apply_one(&mut out, op).map_err(|reason| SavestreamError::PatchApplication {
            index,
            op: op.name(),
            path: op.path().to_string(),
            reason,
        })?;
    }
    Ok(out)
}

fn apply_one(doc: &mut Value, op: &PatchOp) -> OpResult<()> {
    match op {
        PatchOp::Add { path, value } => add(doc, path, value.clone()),
        PatchOp::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOp::Replace { path, value } => replace(doc, path, value.clone()),
        PatchOp::Move { from, path } => {
            if from == path {
                return lookup(doc, from).map(|_| ());
            }
            if path.starts_with(from.as_str()) && path[from.len()..].starts_with('/') {
                return Err("cannot move a value into one of its children");
            }
            let v = remove(doc, from)?;
            add(doc, path, v)
        }
        PatchOp::Copy { from, path } => {
            let v = lookup(doc, from)?.clone();
            add(doc, path, v)
        }
        PatchOp::Test { path, value } => {
            if lookup(doc, path)? == value {
                Ok(())
            } else {
                Err("test failed")
            }
        }
    }
}

fn tokens(path: &str) -> OpResult<Vec<String>> {
    pointer::parse(path).ok_or("path is not a JSON pointer")
}

fn array_index(token: &str, len: usize) -> OpResult<usize> {
    match pointer::parse_index(token) {
        Some(i) if i < len => Ok(i),
        Some(_) => Err("array index out of range"),
        None => Err("invalid array index"),
    }
}

fn lookup<'a>(doc: &'a Value, path: &str) -> OpResult<&'a Value> {
    let mut cur = doc;
    for t in tokens(path)? {
        cur = match cur {
            Value::Object(m) => m.get(t.as_str()).ok_or("path does not exist")?,
            Value::Array(a) => &a[array_index(&t, a.len())?],
            _ => return Err("path traverses a scalar"),
        };
    }
    Ok(cur)
}

fn lookup_mut<'a>(doc: &'a mut Value, toks: &[String]) -> OpResult<&'a mut Value> {
    let mut cur = doc;
    for t in toks {
        cur = match cur {
            Value::Object(m) => m.get_mut(t.as_str()).ok_or("path does not exist")?,
            Value::Array(a) => {
                let i = array_index(t, a.len())?;
                &mut a[i]
            }
            _ => return Err("path traverses a scalar"),
        };
    }
    Ok(cur)
}

fn add(doc: &mut Value, path: &str, value: Value) -> OpResult<()> {
    let toks = tokens(path)?;
    let Some((last, parent)) = toks.split_last() else {
        *doc = value;
        return Ok(());
    };
    match lookup_mut(doc, parent)? {
        // существующий ключ заменяется на месте (порядок ключей сохраняется)
        Value::Object(m) => {
            m.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(a) => {
            if last == "-" {
                a.push(value);
                return Ok(());
            }
            match pointer::parse_index(last) {
                Some(i) if i <= a.len() => {
                    a.insert(i, value);
                    Ok(())
                }
                Some(_) => Err("array index out of range"),
                None => Err("invalid array index"),
            }
        }
        _ => Err("parent is not a container"),
    }
}

fn remove(doc: &mut Value, path: &str) -> OpResult<Value> {
    let toks = tokens(path)?;
    let Some((last, parent)) = toks.split_last() else {
        return Err("cannot remove the document root");
    };
    match lookup_mut(doc, parent)? {
        Value::Object(m) => m.shift_remove(last.as_str()).ok_or("path does not exist"),
        Value::Array(a) => {
            let i = array_index(last, a.len())?;
            Ok(a.remove(i))
        }
        _ => Err("parent is not a container"),
    }
}

fn replace(doc: &mut Value, path: &str, value: Value) -> OpResult<()> {
    let toks = tokens(path)?;
    let Some((last, parent)) = toks.split_last() else {
        *doc = value;
        return Ok(());
    };
    let slot = match lookup_mut(doc, parent)? {
        Value::Object(m) => m.get_mut(last.as_str()).ok_or("path does not exist")?,
        Value::Array(a) => {
            let i = array_index(last, a.len())?;
            &mut a[i]
        }
        _ => return Err("parent is not a container"),
    };
    *slot = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(v: Value) -> PatchOp {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn move_and_copy() {
        let doc = json!({"a": {"b": 1}, "c": [1, 2]});
        let out = apply_patch(
            &doc,
            &[
                op(json!({"op": "move", "from": "/a/b", "path": "/c/-"})),
                op(json!({"op": "copy", "from": "/c", "path": "/d"})),
            ],
        )
        .unwrap();
        assert_eq!(out, json!({"a": {}, "c": [1, 2, 1], "d": [1, 2, 1]}));
    }

    #[test]
    fn move_into_own_child_fails() {
        let doc = json!({"a": {"b": 1}});
        let err = apply_patch(&doc, &[op(json!({"op": "move", "from": "/a", "path": "/a/b/c"}))])
            .unwrap_err();
        assert!(matches!(err, SavestreamError::PatchApplication { index: 0, .. }));
    }

    #[test]
    fn test_op_checks_equality() {
        let doc = json!({"a": [1]});
        assert!(apply_patch(&doc, &[op(json!({"op": "test", "path": "/a/0", "value": 1}))]).is_ok());
        assert!(apply_patch(&doc, &[op(json!({"op": "test", "path": "/a/0", "value": 2}))]).is_err());
    }

    #[test]
    fn remove_keeps_remaining_key_order() {
        let doc = json!({"x": 1, "y": 2, "z": 3});
        let out = apply_patch(&doc, &[op(json!({"op": "remove", "path": "/x"}))]).unwrap();
        assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"y":2,"z":3}"#);
    }

    #[test]
    fn failure_leaves_input_untouched() {
        let doc = json!({"a": 1});
        let ops = [
            op(json!({"op": "replace", "path": "/a", "value": 5})),
            op(json!({"op": "remove", "path": "/missing"})),
        ];
        let err = apply_patch(&doc, &ops).unwrap_err();
        assert!(matches!(err, SavestreamError::PatchApplication { index: 1, op: "remove", .. }));
        assert_eq!(doc, json!({"a": 1}));
    }
}
