//! Content checksums using BLAKE3

use blake3::Hasher;

/// Compute the hex-encoded checksum of file content
///
/// Uses BLAKE3 to hash content deterministically; the result is what
/// [`Entry::checksum`](crate::entry::Entry::checksum) stores.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hex::encode(hasher.finalize().as_bytes())
}
