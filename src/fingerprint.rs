//! Content fingerprints used as the deduplication key for source files.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded fingerprint
pub const FINGERPRINT_LEN: usize = 64;

/// SHA-256 of the raw bytes, lowercase hex.
#[must_use]
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            fingerprint(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn one_byte_changes_digest() {
        let a = fingerprint(b"1 25544U 98067A");
        let b = fingerprint(b"1 25545U 98067A");
        assert_ne!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert_eq!(a, fingerprint(b"1 25544U 98067A"));
    }
}
