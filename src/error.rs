//! Error types for checksum construction and dispatch
//!
//! All misuse is detected synchronously at the call site; there are no
//! transient failures and nothing is retried internally.
use thiserror::Error;

/// Errors surfaced by checksum constructors and the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChecksumError {
    /// The algorithm identifier given to the registry was not recognized.
    #[error("unknown checksum algorithm")]
    UnknownAlgorithm,

    /// A configuration value was malformed at construction time.
    ///
    /// The payload names the offending parameter, e.g. a polynomial
    /// pattern wider than its declared width or a non-prime modulus.
    #[error("invalid checksum configuration: {0}")]
    InvalidConfig(&'static str),

    /// Data was absorbed into a state that was already finalized.
    ///
    /// The state must be explicitly reset before it can be reused.
    #[error("checksum state already finalized; reset before absorbing more data")]
    StateReuse,
}
