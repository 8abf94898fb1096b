//! Adler-style dual modular checksums
//!
//! Two chained accumulators reduced modulo a prime: `A` sums the data
//! bytes and `B` sums the running values of `A`.  Because `B` carries
//! a weighted history of `A`, reordering the same bytes changes the
//! result, which pure summation checksums cannot see.
//!
//! The modulus is configurable and must be prime.  A modulus that
//! fits in eight bits (the default, 251) gives a 16-bit checksum; a
//! wider modulus such as the classic 65521 gives the familiar 32-bit
//! Adler value.
//!
//! Mixing is weak while the data word is shorter than the modulus,
//! since `A` is then close to a plain sum; effectiveness improves
//! with longer inputs.
//!
//! # Examples
//!
//! ```
//! use checksum_mosaic::adler::Adler;
//! use checksum_mosaic::Checksum;
//!
//! let data = "stack".as_bytes();
//! let mut adler = Adler::default();
//! assert_eq!(adler.compute(data), 0x8621);
//! ```
use core::default::Default;

use crate::{Checksum, ChecksumError};

/// Trial division is plenty for a 16-bit candidate.
fn is_prime(n: u16) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut d = 3u32;
    while d * d <= n as u32 {
        if n as u32 % d == 0 {
            return false;
        }
        d += 2;
    }

    true
}

/// The data structure used for dual modular checksums
/// Stores parameters and state
pub struct Adler {
    modulus: u32,
    half_width: u8,
    /// Initial packed value of the checksum, saved for reset.
    initial: u32,
    a: u32,
    b: u32,
}

impl Adler {
    /// Create a checksum with the given prime modulus.
    ///
    /// `A` starts at 1 and `B` at 0.  The checksum is 16 bits wide
    /// for a modulus up to 2^8 and 32 bits wide beyond that.
    ///
    /// Returns [`ChecksumError::InvalidConfig`] if the modulus is not
    /// prime.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::adler::Adler;
    /// use checksum_mosaic::Checksum;
    ///
    /// let data = "123456789".as_bytes();
    /// let mut adler32 = Adler::new(65521).unwrap();
    /// assert_eq!(adler32.compute(data), 0x091E01DE);
    /// ```
    pub fn new(modulus: u16) -> Result<Adler, ChecksumError> {
        Adler::with_initial(modulus, 1)
    }

    /// Create a checksum with a custom packed initial value.
    ///
    /// The high half of `initial` seeds `B` and the low half seeds
    /// `A`, each reduced modulo the modulus.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::adler::Adler;
    /// use checksum_mosaic::Checksum;
    ///
    /// let data = "123456789".as_bytes();
    /// let mut adler32 = Adler::with_initial(65521, 0x12345678).unwrap();
    /// assert_eq!(adler32.compute(data), 0x25AE5855);
    /// ```
    pub fn with_initial(modulus: u16, initial: u32) -> Result<Adler, ChecksumError> {
        if !is_prime(modulus) {
            return Err(ChecksumError::InvalidConfig("modulus must be prime"));
        }

        let half_width = if modulus as u32 <= 1 << 8 { 8 } else { 16 };
        let modulus = modulus as u32;

        let mut adler = Adler {
            modulus,
            half_width,
            initial,
            a: 0,
            b: 0,
        };
        adler.reset();

        Ok(adler)
    }

    /// The modulus this checksum reduces with.
    pub fn modulus(&self) -> u16 {
        self.modulus as u16
    }

    /// Width of the finalized checksum in bits: both accumulators
    /// side by side.
    pub fn width_bits(&self) -> u8 {
        self.half_width * 2
    }

    fn half_mask(&self) -> u32 {
        (1 << self.half_width) - 1
    }
}

impl Default for Adler {
    fn default() -> Adler {
        Adler {
            modulus: 251,
            half_width: 8,
            initial: 1,
            a: 1,
            b: 0,
        }
    }
}

impl Checksum<u32> for Adler {
    fn compute(&mut self, data: &[u8]) -> u32 {
        self.reset();
        for byte in data {
            self.update(*byte);
        }

        self.finalize()
    }

    fn update(&mut self, data: u8) -> u32 {
        self.a = (self.a + data as u32) % self.modulus;
        self.b = (self.b + self.a) % self.modulus;

        self.finalize()
    }

    /// `B` in the high bits, `A` in the low bits.
    fn finalize(&self) -> u32 {
        (self.b << self.half_width) | self.a
    }

    fn reset(&mut self) {
        self.a = (self.initial & self.half_mask()) % self.modulus;
        self.b = (self.initial >> self.half_width) % self.modulus;
    }
}

#[cfg(test)]
mod tests {
    use super::{is_prime, Adler};
    use crate::{Checksum, ChecksumError};

    #[test]
    fn default_modulus_known_values() {
        let mut adler = Adler::default();
        assert_eq!(adler.compute(b"stack"), 0x8621);
        assert_eq!(adler.compute(b"123456789"), 0x4BE3);
        assert_eq!(adler.compute(b"abcde"), 0xE1F5);
    }

    /// Reordering the same bytes changes the checksum; this is the
    /// property pure summation misses
    #[test]
    fn reordered_bytes_detected() {
        let mut adler = Adler::default();
        assert_ne!(adler.compute(b"stack"), adler.compute(b"stcak"));
    }

    /// Test against Python 3 zlib module output
    #[test]
    fn adler32_modulus_python3_zlib_result() {
        let mut adler32 = Adler::new(65521).expect("65521 is prime");
        assert_eq!(adler32.compute(b"123456789"), 0x091E01DE);
        assert_eq!(adler32.width_bits(), 32);
    }

    /// This test data is from the Go hash package
    #[test]
    fn adler32_modulus_byte_string_works() {
        let string = "It's a tiny change to the code and not completely disgusting. - Bob Manchek";
        let mut adler32 = Adler::new(65521).expect("65521 is prime");
        assert_eq!(adler32.compute(string.as_bytes()), 0xE4801A6A);
    }

    /// Test that a rolling update works
    /// This test data is from the Go hash package
    #[test]
    fn rolling_update_works() {
        let mut adler32 = Adler::new(65521).expect("65521 is prime");

        let result = adler32.update(b'a');
        assert_eq!(result, 0x00620062);

        let result = adler32.update(b'b');
        assert_eq!(result, 0x012600C4);
    }

    /// Test a 32-bit initial value
    /// Verified against Python zlib
    #[test]
    fn initial_value_works() {
        let mut adler32 = Adler::with_initial(65521, 0x12345678).expect("65521 is prime");
        assert_eq!(adler32.compute(b"123456789"), 0x25AE5855);

        let mut adler32 = Adler::with_initial(65521, 0x1234).expect("65521 is prime");
        assert_eq!(adler32.compute(b"123456789"), 0xACE91411);
    }

    #[test]
    fn non_prime_modulus_rejected() {
        // Fletcher's 255 and the two degenerate cases
        for modulus in [255u16, 1, 0, 256] {
            assert_eq!(
                Adler::new(modulus).err(),
                Some(ChecksumError::InvalidConfig("modulus must be prime"))
            );
        }
    }

    #[test]
    fn primality_check_works() {
        assert!(is_prime(2));
        assert!(is_prime(251));
        assert!(is_prime(257));
        assert!(is_prime(65521));
        assert!(!is_prime(1));
        assert!(!is_prime(255));
        assert!(!is_prime(65520));
    }

    #[test]
    fn reset_preserves_parameters() {
        let mut adler = Adler::with_initial(65521, 0x12345678).expect("65521 is prime");
        let expected = adler.compute(b"123456789");

        adler.reset();
        assert_eq!(adler.compute(b"123456789"), expected);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut adler = Adler::default();
        adler.update(0x73);
        let first = adler.finalize();
        assert_eq!(adler.finalize(), first);
    }
}
