/// Refresh-token fingerprints
///
/// Sessions store the SHA-256 of the current refresh token, never the token
/// itself. A presented token is accepted only if its fingerprint matches the
/// stored one; comparison runs in constant time.

use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of a refresh token (64 chars)
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Compares two strings without short-circuiting on the first difference
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Whether `token` is the one fingerprinted in `stored_hash`
pub fn refresh_token_matches(token: &str, stored_hash: &str) -> bool {
    constant_time_eq(&hash_refresh_token(token), stored_hash)
}
