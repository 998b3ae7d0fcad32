//! Request checksums.
//!
//! The server authenticates each call by recomputing a SHA-1 digest over the
//! call name, the query string exactly as sent, and the shared secret.

use sha1::{Digest, Sha1};

/// Computes the lowercase hex checksum for a call.
///
/// The digest covers `call`, `query` and `secret` concatenated without
/// separators. `query` must be the encoded query string without the
/// `checksum` pair.
pub fn sign(call: &str, query: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(call.as_bytes());
    hasher.update(query.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns true if `checksum` matches the one computed for the inputs.
pub fn verify(call: &str, query: &str, secret: &str, checksum: &str) -> bool {
    sign(call, query, secret).eq_ignore_ascii_case(checksum)
}
