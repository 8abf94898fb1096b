//! crate for a family of error-detecting checksum algorithms
//!
//! This crate provides an API and set of implementations that can be
//! used to compute integrity checksums for collections of bytes: bit
//! parity, longitudinal redundancy check (XOR), additive checksums
//! with truncating or one's-complement finalization, an Adler-style
//! dual modular checksum, and a configurable-polynomial CRC.
//!
//! None of these algorithms resist deliberate forgery; they detect
//! accidental corruption only.
#![warn(missing_docs)]
#![warn(unsafe_code)]
#![no_std]

pub mod additive;
pub mod adler;
pub mod bits;
pub mod crc;
pub mod crc_table;
pub mod error;
pub mod lrc;
pub mod parity;
pub mod registry;

pub use error::ChecksumError;

/// Checksum trait all checksum algorithms should implement
///
/// There are multiple uses of the term check or checksum.  The term
/// in this context is a computation of an error-detecting code for a
/// set of data.  Sometimes a checksum specifically refers to a
/// computation whose result should equal zero.  That's not the
/// meaning here.
///
/// `T` is the algorithm's natural output type; the number of
/// meaningful bits in it is fixed per algorithm (one for parity,
/// eight for XOR and additive checksums, and so on).
pub trait Checksum<T> {
    /// Compute a checksum over a u8 byte slice
    ///
    /// Every call to compute resets the state to its initial value
    /// first, so calling it twice with the same data yields the same
    /// result.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::Checksum;
    /// use checksum_mosaic::adler::Adler;
    ///
    /// let expected: u32 = 0x4BE3;
    /// let data = "123456789".as_bytes();
    /// let mut adler = Adler::default();
    /// let result = adler.compute(data);
    /// assert_eq!(result, expected);
    /// ```
    fn compute(&mut self, data: &[u8]) -> T;

    /// Absorb one byte into the running checksum.
    ///
    /// Returns the running value.  Absorbing a sequence byte by byte
    /// is equivalent to absorbing it in one `compute` call, whatever
    /// the chunk boundaries.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::Checksum;
    /// use checksum_mosaic::adler::Adler;
    ///
    /// let mut adler = Adler::default();
    /// assert_eq!(adler.update(b'1'), 0x3232);
    /// assert_eq!(adler.update(b'2'), 0x9664);
    /// ```
    fn update(&mut self, data: u8) -> T;

    /// Derive the checksum value from the current state.
    ///
    /// Finalization never mutates the state, so repeated calls return
    /// the same value.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::Checksum;
    /// use checksum_mosaic::lrc::Lrc;
    ///
    /// let mut lrc = Lrc::default();
    /// lrc.update(0x73);
    /// lrc.update(0x74);
    /// assert_eq!(lrc.finalize(), 0x07);
    /// assert_eq!(lrc.finalize(), 0x07);
    /// ```
    fn finalize(&self) -> T;

    /// Reset the checksum to the original state.
    ///
    /// This resets the checksum to the state it was in when it was
    /// created.  If it was created with non-default parameters, those
    /// are preserved.
    fn reset(&mut self);
}
