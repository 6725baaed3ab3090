//! CRC32 checksum over serialized workbook contents
//!
//! Every workbook load validates the checksum. A mismatch aborts the load.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = br#"[{"title":"users","rows":[["Username"]]}]"#;
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_checksum_detects_edit() {
        let original = compute_checksum(br#"[["Alan","alan@example.com"]]"#);
        let edited = compute_checksum(br#"[["Alan","alan@example.org"]]"#);
        assert_ne!(original, edited);
    }

    #[test]
    fn test_verify_checksum() {
        let data = b"workbook payload";
        let checksum = compute_checksum(data);
        assert!(verify_checksum(data, checksum));
        assert!(!verify_checksum(data, checksum ^ 1));
    }
}
