//! Content fingerprinting — deterministic identification of input record sets.
//!
//! The hash is BLAKE3 over the canonical `serde_json` encoding. Struct fields
//! serialize in declaration order, so two equal record sets always produce the
//! same `DatasetHash`, and any change to a run, strategy or filter produces a
//! different one.

use serde::Serialize;

use crate::domain::DatasetHash;

/// Hash any serializable value.
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> Result<DatasetHash, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, value)?;
    Ok(DatasetHash(hasher.finalize().to_hex().to_string()))
}
