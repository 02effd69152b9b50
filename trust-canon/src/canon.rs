//! Canonical JSON per spec.md §4.A: UTF-8, object keys sorted by code-unit
//! (byte) order at every nesting level, no insignificant whitespace, numbers
//! in shortest round-tripping form, arrays preserve input order.

use crate::digest::Digest;
use serde_json::Value;

/// Serializes `value` to its canonical byte representation.
///
/// `serde_json::Value`'s object type is a `BTreeMap` by default (this crate
/// does not enable the `preserve_order` feature anywhere in the workspace),
/// so keys are already held in byte-order-sorted form; `serde_json::to_vec`
/// emits compact output with no extra whitespace and minimal string
/// escaping (`\"`, `\\`, and the C0 control escapes) out of the box. We walk
/// the value once to assert that invariant rather than merely hoping the
/// `preserve_order` feature stays off somewhere in the dependency graph.
pub fn to_canonical_bytes(value: &Value) -> Vec<u8> {
    assert_canonical_shape(value);
    serde_json::to_vec(value).expect("serde_json::Value serialization is infallible")
}

/// `digest(canonical(value))` from spec.md §4.A.
pub fn digest_value(value: &Value) -> Digest {
    Digest::of_bytes(to_canonical_bytes(value))
}

/// Parses canonical JSON bytes back into a `Value` for round-trip checks.
pub fn from_canonical_bytes(bytes: &[u8]) -> serde_json::Result<Value> {
    serde_json::from_slice(bytes)
}

fn assert_canonical_shape(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut prev: Option<&str> = None;
            for key in map.keys() {
                if let Some(p) = prev {
                    debug_assert!(p < key.as_str(), "canonical object keys must be sorted by byte order: {p:?} >= {key:?}");
                }
                prev = Some(key.as_str());
            }
            for v in map.values() {
                assert_canonical_shape(v);
            }
        }
        Value::Array(items) => {
            for v in items {
                assert_canonical_shape(v);
            }
        }
        _ => {}
    }
}
