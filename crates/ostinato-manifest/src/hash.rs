//! Manifest content hash.
//!
//! The hash fingerprints the manifest's require sets so an install can
//! detect drift between `composer.json` and the lockfile. The maps are
//! canonically serialized (sorted keys, compact JSON) before hashing so
//! the result is a pure function of the requirements, independent of map
//! iteration order.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Length of the emitted hex fingerprint.
const CONTENT_HASH_LEN: usize = 12;

#[derive(Serialize)]
struct HashPayload<'a> {
    require: &'a BTreeMap<String, String>,
    #[serde(rename = "require-dev")]
    require_dev: &'a BTreeMap<String, String>,
}

/// Compute the lockfile content hash over the manifest's require sets.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use ostinato_manifest::content_hash;
///
/// let mut require = BTreeMap::new();
/// require.insert("acme/log".to_string(), "^1.0".to_string());
/// let hash = content_hash(&require, &BTreeMap::new());
/// assert_eq!(hash.len(), 12);
/// ```
#[must_use]
pub fn content_hash(
    require: &BTreeMap<String, String>,
    require_dev: &BTreeMap<String, String>,
) -> String {
    let payload = HashPayload {
        require,
        require_dev,
    };
    let canonical =
        serde_json::to_string(&payload).expect("string maps always serialize");
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hex = bytes_to_hex(&digest);
    hex.truncate(CONTENT_HASH_LEN);
    hex
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
