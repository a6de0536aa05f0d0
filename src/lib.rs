//! Threshold ElGamal over a prime-order subgroup, with the Schnorr and Chaum-Pedersen proofs
//! needed to run an end-to-end verifiable election
use crypto_bigint::Uint;

/// Use the same big integer type everywhere
pub const LIMBS: usize = 2048 / 64; // 32 words each 64 bits, a total of 2048 bits
pub type BigInt = Uint<LIMBS>;

pub mod arithmetics;
pub mod config;
pub mod encoding;
pub mod encryption;
pub mod error;
pub mod hash;
pub mod keys;
pub mod proofs;
pub mod tally;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{ConfigError, Error, Rejection};
