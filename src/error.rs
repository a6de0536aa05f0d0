//! Error types
use thiserror::Error;

/// Violated group or trustee parameters. Only ever produced while validating a configuration.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum ConfigError {
    #[error("configuration: at least one trustee is required")]
    NoTrustees,

    #[error("configuration: threshold must be between 1 and {trustees}, got {threshold}")]
    InvalidThreshold { trustees: u8, threshold: u8 },

    #[error("configuration: prime modulus is not an odd prime")]
    PrimeNotPrime,

    #[error("configuration: exponent modulus is not an odd prime")]
    ExpModulusNotPrime,

    #[error("configuration: exponent modulus does not divide (prime - 1)")]
    ExpModulusNotDivisor,

    #[error("configuration: generator must lie strictly between 1 and the prime")]
    GeneratorOutOfRange,

    #[error("configuration: generator does not generate the order-Q subgroup")]
    GeneratorOrder,

    #[error("configuration: element width of {0} bits must be a multiple of 8 between {1} and {2}")]
    ElementWidth(usize, usize, usize),

    #[error("configuration: hash output of {0} bits exceeds the integer capacity of {1} bits")]
    HashWidth(usize, usize),
}

/// Malformed or incomplete input records
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum Error {
    #[error("expected {expected} {what}, found {found}")]
    WrongLength {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("encoded value is out of range for its ring")]
    OutOfRange,

    #[error("encoded record is truncated or has trailing bytes")]
    BadEncoding,

    #[error("trustee indices must be non-zero and distinct")]
    InvalidTrusteeIndex,

    #[error("key share does not match the published commitments")]
    KeyShareMismatch,
}

/// The reason a proof was rejected. An invalid proof is an expected outcome, so verifiers
/// return this instead of panicking.
#[derive(Debug, Error, Eq, PartialEq, Clone, Copy)]
pub enum Rejection {
    #[error("proof rejected: element is not in the order-Q subgroup")]
    SubgroupMembership,

    #[error("proof rejected: recomputed challenge does not match")]
    ChallengeMismatch,

    #[error("proof rejected: verification equation does not hold")]
    EquationMismatch,

    #[error("proof rejected: wrong number of components")]
    Structure,
}
