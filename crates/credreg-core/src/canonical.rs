//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only input accepted by [`crate::sha256_digest`].
//! Two store snapshots holding the same records produce the same bytes, no
//! matter how their maps were populated.
//!
//! Serialization goes through `serde_json::Value` and then `serde_jcs`
//! (RFC 8785): sorted keys, compact separators, deterministic output. Floats
//! are rejected; heights and every other number in the registry are integers.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No float values.
/// - Object keys are sorted; separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a float, `SerializationFailed`
    /// if serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn sorts_keys_compactly() {
        let data = serde_json::json!({"verified": false, "owner": "alice", "name": "Test University"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"name":"Test University","owner":"alice","verified":false}"#
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut a = HashMap::new();
        a.insert("inst-1", 1);
        a.insert("inst-2", 2);
        a.insert("inst-3", 3);
        let mut b = HashMap::new();
        b.insert("inst-3", 3);
        b.insert("inst-1", 1);
        b.insert("inst-2", 2);
        assert_eq!(CanonicalBytes::new(&a).unwrap(), CanonicalBytes::new(&b).unwrap());
    }

    #[test]
    fn nested_float_rejected() {
        let data = serde_json::json!({"a": {"b": [{"c": 3.5}]}});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 3.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn large_heights_accepted() {
        let data = serde_json::json!({"issueHeight": u64::MAX});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            format!(r#"{{"issueHeight":{}}}"#, u64::MAX)
        );
    }

    #[test]
    fn null_and_empty_containers() {
        assert_eq!(CanonicalBytes::new(&serde_json::json!({"uri": null})).unwrap().as_bytes(), br#"{"uri":null}"#);
        assert_eq!(CanonicalBytes::new(&serde_json::json!({})).unwrap().as_bytes(), b"{}");
        assert!(!CanonicalBytes::new(&serde_json::json!([])).unwrap().is_empty());
    }
}
