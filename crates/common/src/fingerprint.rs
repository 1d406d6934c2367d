use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonicalize::canonical_sequence;

pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Content fingerprint of an ordered list of JSON documents. Stable across
/// processes, so it can stand in for a version token when a remote store
/// does not hand one out.
pub fn fingerprint_documents(docs: &[Value]) -> String {
    fingerprint(&canonical_sequence(docs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deterministic() {
        let docs = vec![json!({"ID": "a", "Status": "Enabled"})];
        assert_eq!(fingerprint_documents(&docs), fingerprint_documents(&docs));
    }

    #[test]
    fn different_inputs_different_fingerprint() {
        let a = fingerprint_documents(&[json!({"ID": "a"})]);
        let b = fingerprint_documents(&[json!({"ID": "b"})]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_sequence_has_stable_fingerprint() {
        assert_eq!(fingerprint_documents(&[]), fingerprint_documents(&[]));
    }

    #[test]
    fn string_is_hex() {
        let s = fingerprint(b"lifecycle");
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
