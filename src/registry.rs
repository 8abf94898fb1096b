//! Uniform dispatch over the checksum family
//!
//! The registry lets callers pick an algorithm by name or by a tagged
//! configuration value and stream data through it behind one surface.
//! Each algorithm keeps its own accumulator shape and finalize rule;
//! the registry only erases the output width behind [`ChecksumValue`].
//!
//! # Examples
//!
//! ```
//! use checksum_mosaic::registry::{compute, verify};
//!
//! let data = "stack".as_bytes();
//! let value = compute("adler", None, data).unwrap();
//! assert_eq!(value, 0x8621);
//! assert!(verify("adler", None, data, &value).unwrap());
//! ```
use core::fmt::{Display, Formatter};

use crate::additive::{Additive, AdditiveMode};
use crate::adler::Adler;
use crate::bits::mask;
use crate::crc::{Crc, CrcConfiguration};
use crate::lrc::Lrc;
use crate::parity::Parity;
use crate::{Checksum, ChecksumError};

/// The modulus used when the dual modular checksum is selected by
/// name alone: the largest prime below 2^8.
const DEFAULT_ADLER_MODULUS: u16 = 251;

const CONFIG_MISMATCH: ChecksumError =
    ChecksumError::InvalidConfig("configuration does not match algorithm");

/// A finalized checksum: an unsigned value tagged with its width.
///
/// Two values are equal only if both the width and the value agree.
/// Serialized form is big-endian, using the fewest whole bytes that
/// hold the width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumValue {
    width_bits: u8,
    value: u64,
}

impl ChecksumValue {
    /// Tag `value` with a width, discarding bits above it.
    pub fn new(width_bits: u8, value: u64) -> ChecksumValue {
        ChecksumValue {
            width_bits,
            value: value & mask(width_bits),
        }
    }

    /// The checksum as an unsigned integer.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of meaningful bits.
    pub fn width_bits(&self) -> u8 {
        self.width_bits
    }

    /// Number of bytes in the serialized check sequence.
    pub fn byte_len(&self) -> usize {
        self.width_bits.div_ceil(8) as usize
    }

    /// Serialize as a big-endian check sequence into the front of
    /// `out`, returning the written prefix.
    ///
    /// Returns `None` when `out` is shorter than [`byte_len`].
    /// Appending the returned bytes to the data word forms the code
    /// word the verification helpers expect.
    ///
    /// [`byte_len`]: ChecksumValue::byte_len
    ///
    /// # Examples
    ///
    /// ```
    /// use checksum_mosaic::registry::compute;
    ///
    /// let value = compute("adler", None, b"stack").unwrap();
    /// let mut buf = [0u8; 8];
    /// assert_eq!(value.write_be(&mut buf), Some(&[0x86, 0x21][..]));
    /// ```
    pub fn write_be<'b>(&self, out: &'b mut [u8]) -> Option<&'b [u8]> {
        let len = self.byte_len();
        if out.len() < len {
            return None;
        }

        let bytes = self.value.to_be_bytes();
        out[..len].copy_from_slice(&bytes[8 - len..]);

        Some(&out[..len])
    }
}

impl PartialEq<u64> for ChecksumValue {
    fn eq(&self, other: &u64) -> bool {
        self.value == *other
    }
}

impl Display for ChecksumValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:0width$X}", self.value, width = self.byte_len() * 2)
    }
}

/// Algorithm selection plus per-algorithm configuration.
///
/// The family is a closed set; each variant carries exactly the
/// parameters its algorithm recognizes.
#[derive(Clone, Copy, Debug)]
pub enum AlgorithmConfig<'a> {
    /// Single-bit XOR parity.
    Parity,
    /// Byte-wise XOR (longitudinal redundancy check).
    Lrc,
    /// Additive checksum with the given narrowing mode.
    Additive(AdditiveMode),
    /// Dual modular checksum with a prime modulus.
    Adler {
        /// The prime the accumulators reduce with.
        modulus: u16,
    },
    /// Polynomial-division checksum.
    Crc(CrcConfiguration<'a>),
}

enum Algorithm<'a> {
    Parity(Parity),
    Lrc(Lrc),
    Additive(Additive),
    Adler(Adler),
    Crc(Crc<'a>),
}

impl<'a> Algorithm<'a> {
    fn update(&mut self, byte: u8) {
        match self {
            Algorithm::Parity(parity) => {
                parity.update(byte);
            }
            Algorithm::Lrc(lrc) => {
                lrc.update(byte);
            }
            Algorithm::Additive(additive) => {
                additive.update(byte);
            }
            Algorithm::Adler(adler) => {
                adler.update(byte);
            }
            Algorithm::Crc(crc) => {
                crc.update(byte);
            }
        }
    }

    fn finalize(&self) -> u64 {
        match self {
            Algorithm::Parity(parity) => parity.finalize() as u64,
            Algorithm::Lrc(lrc) => lrc.finalize() as u64,
            Algorithm::Additive(additive) => additive.finalize() as u64,
            Algorithm::Adler(adler) => adler.finalize() as u64,
            Algorithm::Crc(crc) => crc.finalize(),
        }
    }

    fn reset(&mut self) {
        match self {
            Algorithm::Parity(parity) => parity.reset(),
            Algorithm::Lrc(lrc) => lrc.reset(),
            Algorithm::Additive(additive) => additive.reset(),
            Algorithm::Adler(adler) => adler.reset(),
            Algorithm::Crc(crc) => crc.reset(),
        }
    }

    fn width_bits(&self) -> u8 {
        match self {
            Algorithm::Parity(_) => 1,
            Algorithm::Lrc(_) => 8,
            Algorithm::Additive(_) => 8,
            Algorithm::Adler(adler) => adler.width_bits(),
            Algorithm::Crc(crc) => crc.configuration().width(),
        }
    }
}

/// A streaming checksum computation behind the uniform surface.
///
/// Once [`finalize`] has been called the state is terminal: further
/// [`absorb`] calls are rejected until an explicit [`reset`].
///
/// [`absorb`]: Engine::absorb
/// [`finalize`]: Engine::finalize
/// [`reset`]: Engine::reset
///
/// # Examples
///
/// ```
/// use checksum_mosaic::registry::Engine;
///
/// let mut engine = Engine::for_name("lrc", None).unwrap();
/// engine.absorb(b"sta").unwrap();
/// engine.absorb(b"ck").unwrap();
/// assert_eq!(engine.finalize(), 0x6E);
/// ```
pub struct Engine<'a> {
    algorithm: Algorithm<'a>,
    finalized: bool,
}

impl<'a> Engine<'a> {
    /// Build an engine from a tagged configuration.
    ///
    /// Returns [`ChecksumError::InvalidConfig`] when the carried
    /// parameters are malformed.
    pub fn new(configuration: AlgorithmConfig<'a>) -> Result<Engine<'a>, ChecksumError> {
        let algorithm = match configuration {
            AlgorithmConfig::Parity => Algorithm::Parity(Parity::default()),
            AlgorithmConfig::Lrc => Algorithm::Lrc(Lrc::default()),
            AlgorithmConfig::Additive(mode) => Algorithm::Additive(Additive::new(mode)),
            AlgorithmConfig::Adler { modulus } => Algorithm::Adler(Adler::new(modulus)?),
            AlgorithmConfig::Crc(configuration) => Algorithm::Crc(Crc::new(configuration, true)),
        };

        Ok(Engine {
            algorithm,
            finalized: false,
        })
    }

    /// Build an engine from an algorithm identifier, with an optional
    /// configuration refining it.
    ///
    /// Recognized identifiers: `parity`, `lrc` (or `xor`), `sum` (or
    /// `additive`), `sum-1c` (or `ones-complement`), `adler`, `crc`.
    /// Anything else is [`ChecksumError::UnknownAlgorithm`].
    ///
    /// A `crc` selection always needs a configuration carrying its
    /// polynomial; there is no default to fall back on.  A supplied
    /// configuration whose variant contradicts the identifier is
    /// [`ChecksumError::InvalidConfig`].
    pub fn for_name(
        id: &str,
        configuration: Option<AlgorithmConfig<'a>>,
    ) -> Result<Engine<'a>, ChecksumError> {
        let selected = match id {
            "parity" => match configuration {
                None | Some(AlgorithmConfig::Parity) => AlgorithmConfig::Parity,
                Some(_) => return Err(CONFIG_MISMATCH),
            },
            "lrc" | "xor" => match configuration {
                None | Some(AlgorithmConfig::Lrc) => AlgorithmConfig::Lrc,
                Some(_) => return Err(CONFIG_MISMATCH),
            },
            "sum" | "additive" => match configuration {
                None => AlgorithmConfig::Additive(AdditiveMode::Truncating),
                Some(given @ AlgorithmConfig::Additive(_)) => given,
                Some(_) => return Err(CONFIG_MISMATCH),
            },
            "sum-1c" | "ones-complement" => match configuration {
                None => AlgorithmConfig::Additive(AdditiveMode::OnesComplement),
                Some(given @ AlgorithmConfig::Additive(_)) => given,
                Some(_) => return Err(CONFIG_MISMATCH),
            },
            "adler" => match configuration {
                None => AlgorithmConfig::Adler {
                    modulus: DEFAULT_ADLER_MODULUS,
                },
                Some(given @ AlgorithmConfig::Adler { .. }) => given,
                Some(_) => return Err(CONFIG_MISMATCH),
            },
            "crc" => match configuration {
                Some(given @ AlgorithmConfig::Crc(_)) => given,
                Some(_) => return Err(CONFIG_MISMATCH),
                None => {
                    return Err(ChecksumError::InvalidConfig(
                        "crc requires a polynomial configuration",
                    ))
                }
            },
            _ => return Err(ChecksumError::UnknownAlgorithm),
        };

        Engine::new(selected)
    }

    /// Width of the finalized checksum in bits.
    pub fn width_bits(&self) -> u8 {
        self.algorithm.width_bits()
    }

    /// Absorb a sequence of bytes into the running checksum.
    ///
    /// Chunk boundaries never matter: absorbing `[a, b, c]` in one
    /// call equals absorbing `[a]` then `[b, c]`.
    ///
    /// Returns [`ChecksumError::StateReuse`] if the state was already
    /// finalized and has not been reset.
    pub fn absorb(&mut self, data: &[u8]) -> Result<(), ChecksumError> {
        if self.finalized {
            return Err(ChecksumError::StateReuse);
        }

        for byte in data {
            self.algorithm.update(*byte);
        }

        Ok(())
    }

    /// Derive the checksum value and mark the state terminal.
    ///
    /// Repeated calls return the same value without mutating the
    /// accumulators further.
    pub fn finalize(&mut self) -> ChecksumValue {
        self.finalized = true;

        ChecksumValue::new(self.algorithm.width_bits(), self.algorithm.finalize())
    }

    /// Return the state to its initial, pre-absorb condition.
    pub fn reset(&mut self) {
        self.algorithm.reset();
        self.finalized = false;
    }

    /// Single-pass convenience: reset, absorb everything, finalize.
    pub fn compute(&mut self, data: &[u8]) -> ChecksumValue {
        self.reset();
        for byte in data {
            self.algorithm.update(*byte);
        }

        self.finalize()
    }
}

/// Compute a checksum over `data` in one pass.
///
/// Identifier and configuration semantics are those of
/// [`Engine::for_name`].
pub fn compute(
    id: &str,
    configuration: Option<AlgorithmConfig<'_>>,
    data: &[u8],
) -> Result<ChecksumValue, ChecksumError> {
    let mut engine = Engine::for_name(id, configuration)?;

    Ok(engine.compute(data))
}

/// True iff computing the checksum of `data` yields `expected`.
pub fn verify(
    id: &str,
    configuration: Option<AlgorithmConfig<'_>>,
    data: &[u8],
    expected: &ChecksumValue,
) -> Result<bool, ChecksumError> {
    Ok(compute(id, configuration, data)? == *expected)
}

/// Verify a code word: a data word with its big-endian check sequence
/// appended.
///
/// The trailing bytes are split off by the algorithm's serialized
/// width and compared against a fresh computation over the rest.  A
/// code word too short to hold the check sequence verifies false.
///
/// # Examples
///
/// ```
/// use checksum_mosaic::registry::verify_code_word;
///
/// // "stack" followed by its dual modular checksum 0x8621
/// let code_word = [0x73, 0x74, 0x61, 0x63, 0x6B, 0x86, 0x21];
/// assert!(verify_code_word("adler", None, &code_word).unwrap());
/// ```
pub fn verify_code_word(
    id: &str,
    configuration: Option<AlgorithmConfig<'_>>,
    code_word: &[u8],
) -> Result<bool, ChecksumError> {
    let mut engine = Engine::for_name(id, configuration)?;

    let check_len = (engine.width_bits().div_ceil(8)) as usize;
    if code_word.len() < check_len {
        return Ok(false);
    }

    let (data, check_sequence) = code_word.split_at(code_word.len() - check_len);
    let value = engine.compute(data);

    let mut buf = [0u8; 8];
    match value.write_be(&mut buf) {
        Some(serialized) => Ok(serialized == check_sequence),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::{compute, verify, verify_code_word, AlgorithmConfig, ChecksumValue, Engine};
    use crate::additive::AdditiveMode;
    use crate::crc::{BitOrder, CrcConfiguration};
    use crate::ChecksumError;

    fn iso_hdlc() -> CrcConfiguration<'static> {
        CrcConfiguration::new(
            "CRC-32/ISO-HDLC",
            32,
            BitOrder::LSBFirst,
            0x04C11DB7,
            true,
            Some(0xFFFFFFFF),
            Some(0xFFFFFFFF),
        )
        .expect("valid configuration")
    }

    #[test]
    fn every_algorithm_computes_by_name() {
        let data = b"stack";

        assert_eq!(compute("parity", None, data).unwrap(), 1);
        assert_eq!(compute("lrc", None, data).unwrap(), 0x6E);
        assert_eq!(compute("sum", None, data).unwrap(), 22);
        assert_eq!(compute("sum-1c", None, data).unwrap(), 24);
        assert_eq!(compute("adler", None, data).unwrap(), 0x8621);

        let crc = compute(
            "crc",
            Some(AlgorithmConfig::Crc(iso_hdlc())),
            b"123456789",
        )
        .unwrap();
        assert_eq!(crc, 0xCBF43926);
        assert_eq!(crc.width_bits(), 32);
    }

    #[test]
    fn aliases_select_the_same_algorithm() {
        let data = b"stack";
        assert_eq!(
            compute("lrc", None, data).unwrap(),
            compute("xor", None, data).unwrap()
        );
        assert_eq!(
            compute("sum", None, data).unwrap(),
            compute("additive", None, data).unwrap()
        );
        assert_eq!(
            compute("sum-1c", None, data).unwrap(),
            compute("ones-complement", None, data).unwrap()
        );
    }

    #[test]
    fn unknown_algorithm_rejected() {
        assert_eq!(
            compute("md5", None, b"stack").err(),
            Some(ChecksumError::UnknownAlgorithm)
        );
    }

    /// The registry never guesses a polynomial
    #[test]
    fn crc_without_configuration_rejected() {
        assert!(matches!(
            compute("crc", None, b"stack").err(),
            Some(ChecksumError::InvalidConfig(_))
        ));
    }

    #[test]
    fn mismatched_configuration_rejected() {
        assert!(matches!(
            compute("parity", Some(AlgorithmConfig::Lrc), b"stack").err(),
            Some(ChecksumError::InvalidConfig(_))
        ));
        assert!(matches!(
            compute("crc", Some(AlgorithmConfig::Parity), b"stack").err(),
            Some(ChecksumError::InvalidConfig(_))
        ));
    }

    #[test]
    fn explicit_configuration_overrides_defaults() {
        let _ = env_logger::try_init();

        let data = b"123456789";
        let value = compute("adler", Some(AlgorithmConfig::Adler { modulus: 65521 }), data).unwrap();
        log::debug!("adler/65521 over {:?}: {}", data, value);
        assert_eq!(value, 0x091E01DE);
        assert_eq!(value.width_bits(), 32);

        let value = compute(
            "sum",
            Some(AlgorithmConfig::Additive(AdditiveMode::OnesComplement)),
            data,
        )
        .unwrap();
        assert_eq!(value, 0xDE);
    }

    #[test]
    fn invalid_modulus_surfaces_from_dispatch() {
        assert_eq!(
            compute("adler", Some(AlgorithmConfig::Adler { modulus: 255 }), b"stack").err(),
            Some(ChecksumError::InvalidConfig("modulus must be prime"))
        );
    }

    /// The dual modular checksum sees reordering that summation misses
    #[test]
    fn order_sensitivity_split() {
        let adler_stack = compute("adler", None, b"stack").unwrap();
        let adler_stcak = compute("adler", None, b"stcak").unwrap();
        assert_ne!(adler_stack, adler_stcak);

        let sum_stack = compute("sum", None, b"stack").unwrap();
        let sum_stcak = compute("sum", None, b"stcak").unwrap();
        assert_eq!(sum_stack, sum_stcak);
    }

    #[test]
    fn chunked_absorbs_match_one_shot() {
        let data = b"the quick brown fox jumps over the lazy dog";

        for id in ["parity", "lrc", "sum", "sum-1c", "adler"] {
            let expected = compute(id, None, data).unwrap();

            let mut engine = Engine::for_name(id, None).unwrap();
            let (head, tail) = data.split_at(11);
            engine.absorb(head).unwrap();
            engine.absorb(tail).unwrap();
            assert_eq!(engine.finalize(), expected, "chunked {} diverged", id);
        }

        let expected = compute("crc", Some(AlgorithmConfig::Crc(iso_hdlc())), data).unwrap();
        let mut engine = Engine::for_name("crc", Some(AlgorithmConfig::Crc(iso_hdlc()))).unwrap();
        engine.absorb(&data[..1]).unwrap();
        engine.absorb(&data[1..]).unwrap();
        assert_eq!(engine.finalize(), expected);
    }

    #[test]
    fn absorbing_after_finalize_requires_reset() {
        let mut engine = Engine::for_name("lrc", None).unwrap();
        engine.absorb(b"stack").unwrap();

        let first = engine.finalize();
        assert_eq!(engine.finalize(), first);
        assert_eq!(engine.absorb(b"more"), Err(ChecksumError::StateReuse));

        engine.reset();
        engine.absorb(b"stack").unwrap();
        assert_eq!(engine.finalize(), first);
    }

    #[test]
    fn verification_round_trips() {
        let data = b"stack";
        for id in ["parity", "lrc", "sum", "sum-1c", "adler"] {
            let value = compute(id, None, data).unwrap();
            assert!(verify(id, None, data, &value).unwrap());

            let corrupted = ChecksumValue::new(value.width_bits(), value.value() ^ 1);
            assert!(!verify(id, None, data, &corrupted).unwrap());
        }
    }

    /// Equality is width-aware: a parity 1 is not a CRC-32 1
    #[test]
    fn values_with_different_widths_never_equal() {
        assert_ne!(ChecksumValue::new(1, 1), ChecksumValue::new(32, 1));
    }

    #[test]
    fn code_word_round_trip() {
        let data = b"stack";
        let value = compute("adler", None, data).unwrap();

        let mut code_word = [0u8; 7];
        code_word[..5].copy_from_slice(data);
        value.write_be(&mut code_word[5..]).unwrap();
        assert!(verify_code_word("adler", None, &code_word).unwrap());

        // Corrupt the payload
        let mut corrupted = code_word;
        corrupted[0] ^= 0x40;
        assert!(!verify_code_word("adler", None, &corrupted).unwrap());

        // Corrupt the check sequence
        let mut corrupted = code_word;
        corrupted[6] ^= 0x01;
        assert!(!verify_code_word("adler", None, &corrupted).unwrap());

        // Too short to even hold the check sequence
        assert!(!verify_code_word("adler", None, &code_word[..1]).unwrap());
    }

    #[test]
    fn serialization_is_big_endian_and_width_sized() {
        let value = ChecksumValue::new(32, 0xCBF43926);
        assert_eq!(value.byte_len(), 4);

        let mut buf = [0u8; 8];
        assert_eq!(
            value.write_be(&mut buf),
            Some(&[0xCB, 0xF4, 0x39, 0x26][..])
        );

        // Parity still occupies a whole byte on the wire
        let parity = ChecksumValue::new(1, 1);
        assert_eq!(parity.byte_len(), 1);
        assert_eq!(parity.write_be(&mut buf), Some(&[0x01][..]));

        // A 12-bit CRC rounds up to two bytes
        let umts = ChecksumValue::new(12, 0xDAF);
        assert_eq!(umts.byte_len(), 2);
        assert_eq!(umts.write_be(&mut buf), Some(&[0x0D, 0xAF][..]));

        let mut small = [0u8; 1];
        assert_eq!(umts.write_be(&mut small), None);
    }

    #[test]
    fn out_of_width_bits_are_discarded() {
        assert_eq!(ChecksumValue::new(8, 0x1FF), 0xFF);
    }
}
