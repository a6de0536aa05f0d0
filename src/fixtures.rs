//! Shared parameters for unit tests
use crate::{
    config::{Config, ElectionContext},
    BigInt,
};
use rand::{rngs::StdRng, SeedableRng};

/// Safe prime 2 ** 128 - 15449; Q = (P - 1) / 2 is also prime
const PRIME_128: u128 = 0xffff_ffff_ffff_ffff_ffff_ffff_ffff_c3a7;
const EXP_MODULUS_128: u128 = 0x7fff_ffff_ffff_ffff_ffff_ffff_ffff_e1d3;

/// P = 23, Q = 11, g = 4
pub fn toy_config() -> Config {
    return Config {
        prime: BigInt::from_u8(23),
        exp_modulus: BigInt::from_u8(11),
        generator: BigInt::from_u8(4),
        trustees: 1,
        threshold: 1,
        element_bits: 8,
    };
}

pub fn toy_context() -> ElectionContext {
    return toy_config().validate().unwrap();
}

/// A 128-bit safe-prime group; 4 is a square and so generates the order-Q subgroup
pub fn config(trustees: u8, threshold: u8) -> Config {
    return Config {
        prime: BigInt::from_u128(PRIME_128),
        exp_modulus: BigInt::from_u128(EXP_MODULUS_128),
        generator: BigInt::from_u8(4),
        trustees,
        threshold,
        element_bits: 128,
    };
}

/// Three trustees, any two of which can decrypt
pub fn context() -> ElectionContext {
    return config(3, 2).validate().unwrap();
}

pub fn context_with(trustees: u8, threshold: u8) -> ElectionContext {
    return config(trustees, threshold).validate().unwrap();
}

pub fn rng() -> StdRng {
    return StdRng::seed_from_u64(0x5eed);
}
