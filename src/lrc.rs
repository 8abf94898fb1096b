//! Longitudinal redundancy check (XOR) checksums
//!
//! An 8-bit accumulator XORed with every byte of the data word.  Bit
//! *i* of the accumulator is the running parity of bit *i* across all
//! bytes seen so far, so this is eight independent parity checksums
//! computed in one pass.
//!
//! Any single corrupted byte is detected.  Two flips at the same bit
//! position in different bytes cancel and are missed, independent of
//! what happens at other bit positions.
//!
//! # Examples
//!
//! ```
//! use checksum_mosaic::lrc::Lrc;
//! use checksum_mosaic::Checksum;
//!
//! let data = "stack".as_bytes();
//! let mut lrc = Lrc::default();
//! assert_eq!(lrc.compute(data), 0x6E);
//! ```

use crate::Checksum;

/// Byte-wise XOR accumulator.
#[derive(Default)]
pub struct Lrc {
    state: u8,
}

impl Checksum<u8> for Lrc {
    fn compute(&mut self, data: &[u8]) -> u8 {
        self.reset();
        for byte in data {
            self.update(*byte);
        }

        self.finalize()
    }

    fn update(&mut self, data: u8) -> u8 {
        self.state ^= data;
        self.state
    }

    fn finalize(&self) -> u8 {
        self.state
    }

    fn reset(&mut self) {
        self.state = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::Lrc;
    use crate::Checksum;

    #[test]
    fn known_value_works() {
        let mut lrc = Lrc::default();
        assert_eq!(lrc.compute(b"stack"), 0x6E);
        assert_eq!(lrc.compute(b"123456789"), 0x31);
    }

    /// Any single-bit flip lands in exactly one bit position, so it
    /// always changes the output
    #[test]
    fn single_bit_flip_always_detected() {
        let data: [u8; 5] = *b"stack";
        let mut lrc = Lrc::default();
        let original = lrc.compute(&data);

        for byte in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data;
                corrupted[byte] ^= 1 << bit;
                assert_ne!(lrc.compute(&corrupted), original);
            }
        }
    }

    /// Two flips at the same bit position in different bytes cancel
    #[test]
    fn same_column_flips_cancel() {
        let data: [u8; 5] = *b"stack";
        let mut lrc = Lrc::default();
        let original = lrc.compute(&data);

        let mut corrupted = data;
        corrupted[1] ^= 1 << 4;
        corrupted[4] ^= 1 << 4;
        assert_eq!(lrc.compute(&corrupted), original);
    }

    /// Flips at different bit positions never cancel
    #[test]
    fn different_column_flips_detected() {
        let data: [u8; 5] = *b"stack";
        let mut lrc = Lrc::default();
        let original = lrc.compute(&data);

        let mut corrupted = data;
        corrupted[1] ^= 1 << 4;
        corrupted[4] ^= 1 << 2;
        assert_ne!(lrc.compute(&corrupted), original);
    }

    #[test]
    fn compute_called_twice_works() {
        let mut lrc = Lrc::default();
        let first = lrc.compute(b"stack");
        let second = lrc.compute(b"stack");
        assert_eq!(first, second);
    }

    #[test]
    fn reset_works() {
        let mut lrc = Lrc::default();
        lrc.update(0xAB);
        lrc.reset();
        assert_eq!(lrc.finalize(), 0);
    }
}
