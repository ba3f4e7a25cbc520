//! Stable fingerprints for rendered plans and schema exports.

use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        use std::fmt::Write as _;
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    let mut h = Hasher::new();
    h.update(bytes);
    Fingerprint(h.finalize().into())
}

pub fn fingerprint_str(s: &str) -> Fingerprint {
    fingerprint_bytes(s.as_bytes())
}

/// Fingerprint a serde value via its JSON encoding.
///
/// `serde_json::Value` objects are key-sorted, so equal documents hash equally.
pub fn fingerprint_serde<T: Serialize>(v: &T) -> crate::error::Result<Fingerprint> {
    let bytes = serde_json::to_vec(v)?;
    Ok(fingerprint_bytes(&bytes))
}
