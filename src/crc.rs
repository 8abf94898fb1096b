//! CRC checksums
//!
//! A cyclic redundancy check treats the data word as one long binary
//! number and computes the remainder of its division by a generator
//! polynomial over GF(2), where addition and subtraction are both XOR
//! and nothing carries.  The register is as wide as the polynomial's
//! degree, so a degree-*k* configuration detects every single-bit
//! error and every burst of *k* bits or fewer.  Detection guarantees
//! for longer patterns are algebraic facts about the specific
//! polynomial and data length; consult the published distance tables
//! for a polynomial rather than assuming them from its degree.
//!
//! # Examples
//!
//! ```
//! use checksum_mosaic::crc::{BitOrder, Crc, CrcConfiguration};
//! use checksum_mosaic::Checksum;
//!
//! let expected: u64 = 0xCBF43926;
//! let data = "123456789".as_bytes();
//! let mut crc32 = Crc::new(
//!     CrcConfiguration::new(
//!         "CRC-32/ISO-HDLC",
//!         32,
//!         BitOrder::LSBFirst,
//!         0x04C11DB7,
//!         true,
//!         Some(0xFFFFFFFF),
//!         Some(0xFFFFFFFF),
//!     )
//!     .unwrap(),
//!     true,
//! );
//!
//! assert_eq!(crc32.compute(data), expected);
//! ```
#![warn(missing_docs)]
#![warn(unsafe_code)]

use core::fmt::{Debug, Display, Formatter};

use crate::bits::{mask, reflect};
use crate::{crc_table, Checksum, ChecksumError};

pub use crate::bits::BitOrder;

/// Configuration settings for a CRC
///
/// This incorporates the parameter model described in:
/// Williams, Ross N. "A Painless Guide to CRC Error Detection
/// Algorithms", Rocksoft Pty Ltd., 1993, crc_ross.pdf
///
/// It differs from that model in that a bit order property is used
/// instead of relying solely on reflect-in and reflect-out: running
/// [`BitOrder::LSBFirst`] behaves exactly as reflect-in would.
///
/// The divisor is given as its low *k* coefficient bits; the leading
/// x^k term is implicit, as is conventional.  A configuration is
/// immutable once constructed and may be shared freely between
/// computations.
#[derive(Clone, Copy)]
pub struct CrcConfiguration<'name> {
    /// The common or standard name of this CRC configuration
    name: &'name str,
    /// Degree of the polynomial and width of the register, 1..=64
    width: u8,
    /// The order data bits are fed through the register
    bit_order: BitOrder,
    /// The polynomial's low `width` coefficient bits
    poly: u64,
    /// "Reflect" the final value.  For most CRCs this is false when
    /// the bit order is MSB first and true when it is LSB first.
    reflect_out: bool,
    /// Initial value of the register
    initial: u64,
    /// Whether the remainder should be XORed before being returned,
    /// and what it should be XORed with.
    xor_out: Option<u64>,
}

impl<'name> CrcConfiguration<'name> {
    /// Create a new CrcConfiguration
    ///
    /// `width` is the polynomial degree; `poly`, `initial` and
    /// `xor_out` must all fit within it.  An absent `initial`
    /// defaults to zero.
    ///
    /// Returns [`ChecksumError::InvalidConfig`] for a zero or
    /// out-of-range width, an empty polynomial, or any value pattern
    /// wider than the declared width.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'name str,
        width: u8,
        bit_order: BitOrder,
        poly: u64,
        reflect_out: bool,
        initial: Option<u64>,
        xor_out: Option<u64>,
    ) -> Result<CrcConfiguration<'name>, ChecksumError> {
        if width == 0 || width > 64 {
            return Err(ChecksumError::InvalidConfig("width must be between 1 and 64 bits"));
        }
        if poly == 0 {
            return Err(ChecksumError::InvalidConfig("polynomial must not be empty"));
        }
        if poly & !mask(width) != 0 {
            return Err(ChecksumError::InvalidConfig(
                "polynomial pattern wider than declared width",
            ));
        }

        let initial = initial.unwrap_or_default();
        if initial & !mask(width) != 0 {
            return Err(ChecksumError::InvalidConfig(
                "initial value wider than declared width",
            ));
        }
        if let Some(xor_out) = xor_out {
            if xor_out & !mask(width) != 0 {
                return Err(ChecksumError::InvalidConfig(
                    "final XOR value wider than declared width",
                ));
            }
        }

        Ok(CrcConfiguration {
            name,
            width,
            bit_order,
            poly,
            reflect_out,
            initial,
            xor_out,
        })
    }

    /// The configuration's common or standard name.
    pub fn name(&self) -> &'name str {
        self.name
    }

    /// Degree of the polynomial and width of the register.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// The order data bits are fed through the register.
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// The polynomial's low coefficient bits.
    pub fn poly(&self) -> u64 {
        self.poly
    }

    /// Whether the final value is reflected.
    pub fn reflect_out(&self) -> bool {
        self.reflect_out
    }

    /// The register's initial value.
    pub fn initial(&self) -> u64 {
        self.initial
    }

    /// The value XORed into the remainder before it is returned.
    pub fn xor_out(&self) -> Option<u64> {
        self.xor_out
    }

    fn write_term(f: &mut Formatter<'_>, power: u8) -> core::fmt::Result {
        match power {
            0 => write!(f, "1"),
            1 => write!(f, "x"),
            _ => write!(f, "x^{}", power),
        }
    }

    /// Write the full generator polynomial, implicit leading term
    /// included, with the smallest term last.
    fn write_polynomial(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        CrcConfiguration::write_term(f, self.width)?;
        for power in (0..self.width).rev() {
            if (self.poly >> power) & 1 == 1 {
                write!(f, " + ")?;
                CrcConfiguration::write_term(f, power)?;
            }
        }

        Ok(())
    }
}

impl<'name> Debug for CrcConfiguration<'name> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "name: {:?}", self.name)?;
        write!(f, ", width: {}", self.width)?;
        write!(f, ", bit_order: {:?}", self.bit_order)?;
        write!(f, ", polynomial: 0x{:X}", self.poly)?;
        write!(f, ", reflect_out: {:?}", self.reflect_out)?;
        write!(f, ", initial: 0x{:X}", self.initial)?;
        if let Some(xor_out) = self.xor_out {
            write!(f, ", xor_out: 0x{:X}", xor_out)
        } else {
            write!(f, ", xor_out: None")
        }
    }
}

impl<'name> Display for CrcConfiguration<'name> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.write_polynomial(f)
    }
}

/// A streaming CRC computation
///
/// The register lives in the top or bottom of a u64 depending on the
/// bit order, so one engine serves every width from 1 to 64.
pub struct Crc<'a> {
    configuration: CrcConfiguration<'a>,
    /// The pre-computed values to speed up computing the CRC
    pub table: Option<[u64; 256]>,

    /// The divisor aligned for the configured bit order
    poly_bits: u64,

    /// state of the CRC for rolling checksums
    crc: u64,
}

impl<'a> Crc<'a> {
    /// Create a new CRC
    ///
    /// If `build_table` is true, precompute a table to speed up
    /// multiple runs of the CRC.  If it is false, entries are derived
    /// on the fly instead, which is useful on memory-constrained
    /// systems.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::crc::{BitOrder, Crc, CrcConfiguration};
    ///
    /// let crc = Crc::new(
    ///     CrcConfiguration::new("CRC-16/KERMIT", 16, BitOrder::LSBFirst, 0x1021, true, None, None)
    ///         .unwrap(),
    ///     false,
    /// );
    /// assert!(crc.table.is_none());
    /// ```
    pub fn new(configuration: CrcConfiguration<'a>, build_table: bool) -> Self {
        let table = if build_table {
            Some(crc_table::build_table(&configuration))
        } else {
            None
        };

        let poly_bits = match configuration.bit_order {
            BitOrder::LSBFirst => reflect(configuration.poly, configuration.width),
            BitOrder::MSBFirst => configuration.poly << (64 - configuration.width),
        };

        let crc = Crc::init(&configuration);

        Crc {
            configuration,
            table,
            poly_bits,
            crc,
        }
    }

    /// The register value for a freshly initialized computation
    fn init(configuration: &CrcConfiguration<'a>) -> u64 {
        match configuration.bit_order {
            BitOrder::LSBFirst => reflect(configuration.initial, configuration.width),
            BitOrder::MSBFirst => configuration.initial << (64 - configuration.width),
        }
    }

    /// The configuration this CRC was built from.
    pub fn configuration(&self) -> &CrcConfiguration<'a> {
        &self.configuration
    }

    /// Get the current raw state of the register
    pub fn state(&self) -> u64 {
        self.crc
    }

    /// Absorb a single data bit.
    ///
    /// This is the polynomial-division step itself: the register
    /// shifts by one, the data bit enters, and the divisor is XORed
    /// in whenever a one falls off the open end.  The conceptual
    /// zero-padding of the data word by the register width is built
    /// in, so the register holds the remainder as soon as the last
    /// data bit has been absorbed.
    ///
    /// Byte-oriented updates are equivalent to eight calls in the
    /// configured bit order.
    pub fn update_bit(&mut self, bit: bool) -> u64 {
        match self.configuration.bit_order {
            BitOrder::MSBFirst => {
                self.crc ^= (bit as u64) << 63;
                let out = self.crc >> 63;
                self.crc <<= 1;
                if out == 1 {
                    self.crc ^= self.poly_bits;
                }
            }
            BitOrder::LSBFirst => {
                self.crc ^= bit as u64;
                let out = self.crc & 1;
                self.crc >>= 1;
                if out == 1 {
                    self.crc ^= self.poly_bits;
                }
            }
        }

        self.crc
    }
}

impl<'a> Debug for Crc<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "configuration: {:?}", self.configuration)?;
        write!(f, ", crc: 0x{:016X}", self.crc)?;
        write!(f, ", table: {}", if self.table.is_some() { "built" } else { "none" })
    }
}

impl<'a> Checksum<u64> for Crc<'a> {
    fn compute(&mut self, data: &[u8]) -> u64 {
        self.reset();

        for byte in data {
            self.update(*byte);
        }

        self.finalize()
    }

    fn update(&mut self, data: u8) -> u64 {
        // table is an array of 256 64-bit constants
        self.crc = match self.configuration.bit_order {
            BitOrder::LSBFirst => {
                let index = ((self.crc ^ data as u64) & 0xFF) as u8;
                let val = if let Some(table) = &self.table {
                    table[index as usize]
                } else {
                    crc_table::entry(&self.configuration, index)
                };
                (self.crc >> 8) ^ val
            }
            BitOrder::MSBFirst => {
                let index = (((self.crc >> 56) ^ data as u64) & 0xFF) as u8;
                let val = if let Some(table) = &self.table {
                    table[index as usize]
                } else {
                    crc_table::entry(&self.configuration, index)
                };
                (self.crc << 8) ^ val
            }
        };

        self.crc
    }

    /// Derive the final value: reflect or realign the register,
    /// then apply the final XOR.  The register itself is untouched.
    fn finalize(&self) -> u64 {
        let width = self.configuration.width;
        let mut crc = self.crc;

        match self.configuration.bit_order {
            BitOrder::MSBFirst => {
                if self.configuration.reflect_out {
                    crc = crc.reverse_bits();
                } else {
                    crc >>= 64 - width;
                }
            }
            BitOrder::LSBFirst => {
                if !self.configuration.reflect_out {
                    crc = crc.reverse_bits() >> (64 - width);
                }
            }
        }

        if let Some(xor_out) = self.configuration.xor_out {
            crc ^ xor_out
        } else {
            crc
        }
    }

    /// Reset the CRC to the initial state
    fn reset(&mut self) {
        self.crc = Crc::init(&self.configuration);
    }
}
