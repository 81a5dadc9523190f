//! Генерация JSON Patch (mirror compare).
//!
//! Алгоритм (тот же порядок операций, что даёт классический fast-json-patch
//! `compare`, чтобы патчи совпадали побайтно):
//! 1. Старые ключи обходятся с конца. Ключ есть в новом документе:
//!    - оба значения контейнеры одного вида (object/object, array/array) → рекурсия;
//!    - иначе при неравенстве → `replace`.
//!    Ключа нет → `remove`.
//! 2. Если ничего не удалено и число ключей совпадает: готово. Иначе новые
//!    ключи в порядке нового документа → `add`.
//!
//! Массивы адресуются индексами; удаление идёт с хвоста, поэтому индексы
//! остаются валидными при последовательном применении.

use serde_json::Value;

use super::pointer;
use super::PatchOp;

/// Patch turning `prev` into `curr`. Containers of different kinds at the
/// root are replaced whole.
pub fn diff(prev: &Value, curr: &Value) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    if is_container(prev) && is_container(curr) && same_kind(prev, curr) {
        generate(prev, curr, "", &mut ops);
    } else if prev != curr {
        ops.push(PatchOp::Replace {
            path: String::new(),
            value: curr.clone(),
        });
    }
    ops
}

fn is_container(v: &Value) -> bool {
    v.is_object() || v.is_array()
}

fn same_kind(a: &Value, b: &Value) -> bool {
    a.is_array() == b.is_array()
}

fn keys(v: &Value) -> Vec<String> {
    match v {
        Value::Object(m) => m.keys().cloned().collect(),
        Value::Array(a) => (0..a.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

fn child<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    match v {
        Value::Object(m) => m.get(key),
        Value::Array(a) => key.parse::<usize>().ok().and_then(|i| a.get(i)),
        _ => None,
    }
}

fn generate(old: &Value, new: &Value, path: &str, ops: &mut Vec<PatchOp>) {
    let old_keys = keys(old);
    let new_keys = keys(new);
    let mut deleted = false;

    for key in old_keys.iter().rev() {
        let old_val = match child(old, key) {
            Some(v) => v,
            None => continue,
        };
        match child(new, key) {
            Some(new_val) => {
                if is_container(old_val) && is_container(new_val) && same_kind(old_val, new_val) {
                    generate(old_val, new_val, &pointer::join(path, key), ops);
                } else if old_val != new_val {
                    ops.push(PatchOp::Replace {
                        path: pointer::join(path, key),
                        value: new_val.clone(),
                    });
                }
            }
            None => {
                ops.push(PatchOp::Remove {
                    path: pointer::join(path, key),
                });
                deleted = true;
            }
        }
    }

    if !deleted && new_keys.len() == old_keys.len() {
        return;
    }

    for key in &new_keys {
        if child(old, key).is_none() {
            if let Some(v) = child(new, key) {
                ops.push(PatchOp::Add {
                    path: pointer::join(path, key),
                    value: v.clone(),
                });
            }
        }
    }
}
