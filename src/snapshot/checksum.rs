//! CRC32 checksums for snapshot records

/// Compute the CRC32 checksum of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_deterministic() {
        let data = b"the same bytes";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_checksum_detects_single_bit_flip() {
        let mut data = b"sensitive payload".to_vec();
        let original = compute_checksum(&data);
        data[3] ^= 0x01;
        assert_ne!(compute_checksum(&data), original);
    }

    #[test]
    fn test_empty_input_has_stable_checksum() {
        assert_eq!(compute_checksum(&[]), 0);
    }
}
