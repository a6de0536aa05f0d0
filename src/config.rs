//! Election parameters, checked once at setup.
//!
//! A `Config` is raw input. `Config::validate` checks every numeric constraint eagerly and
//! produces the `ElectionContext` that all other operations borrow; misconfiguration is fatal
//! and is never discovered halfway through an election.
use std::{fmt, marker::PhantomData};

use crate::{arithmetics::Group, error::ConfigError, BigInt};
use crypto_bigint::NonZero;
use digest::Digest;
use sha3::Sha3_256;
use tracing::{info, warn};

/// The raw election parameters
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Config {
    /// The prime P
    pub prime: BigInt,

    /// The exponent modulus Q, the order of the subgroup generated by `generator`
    pub exp_modulus: BigInt,

    pub generator: BigInt,

    /// Number of trustees holding a piece of the election key
    pub trustees: u8,

    /// Number of trustees needed to decrypt; also the number of polynomial coefficients
    pub threshold: u8,

    /// Width of every encoded group element, both in the hash chain and on the wire
    pub element_bits: usize,
}

/// Validated parameters, together with the hash used for Fiat-Shamir challenges.
/// The hash is a type parameter so that it can be swapped without touching the proofs.
pub struct ElectionContext<D = Sha3_256> {
    group: Group,
    trustees: u8,
    threshold: u8,
    element_bits: usize,
    hash: PhantomData<fn() -> D>,
}

impl Config {
    /// Check every constraint and build the election context
    pub fn validate<D: Digest>(&self) -> Result<ElectionContext<D>, ConfigError> {
        match self.check::<D>() {
            Ok(group) => {
                info!(
                    trustees = self.trustees,
                    threshold = self.threshold,
                    element_bits = self.element_bits,
                    "election parameters validated"
                );
                return Ok(ElectionContext {
                    group,
                    trustees: self.trustees,
                    threshold: self.threshold,
                    element_bits: self.element_bits,
                    hash: PhantomData,
                });
            }
            Err(err) => {
                warn!(%err, "rejected election parameters");
                return Err(err);
            }
        }
    }

    fn check<D: Digest>(&self) -> Result<Group, ConfigError> {
        if self.trustees == 0 {
            return Err(ConfigError::NoTrustees);
        }
        if self.threshold == 0 || self.threshold > self.trustees {
            return Err(ConfigError::InvalidThreshold {
                trustees: self.trustees,
                threshold: self.threshold,
            });
        }

        // Montgomery arithmetic needs odd moduli, so 2 is excluded for both
        let two = BigInt::from_u8(2);
        if self.prime <= two || !crypto_primes::is_prime(&self.prime) {
            return Err(ConfigError::PrimeNotPrime);
        }
        if self.exp_modulus <= two || !crypto_primes::is_prime(&self.exp_modulus) {
            return Err(ConfigError::ExpModulusNotPrime);
        }
        let q = Option::<NonZero<BigInt>>::from(NonZero::new(self.exp_modulus))
            .ok_or(ConfigError::ExpModulusNotPrime)?;
        if self.prime.wrapping_sub(&BigInt::ONE) % q != BigInt::ZERO {
            return Err(ConfigError::ExpModulusNotDivisor);
        }

        if self.generator <= BigInt::ONE || self.generator >= self.prime {
            return Err(ConfigError::GeneratorOutOfRange);
        }
        let group = Group::new(&self.prime, &self.exp_modulus, &self.generator)
            .ok_or(ConfigError::ExpModulusNotPrime)?;
        if !group.is_member(&group.generator()) {
            return Err(ConfigError::GeneratorOrder);
        }

        let needed = self.prime.bits().max(self.exp_modulus.bits());
        let capacity = BigInt::BITS;
        if self.element_bits % 8 != 0 || self.element_bits < needed || self.element_bits > capacity
        {
            return Err(ConfigError::ElementWidth(self.element_bits, needed, capacity));
        }

        let hash_bits = <D as Digest>::output_size() * 8;
        if hash_bits > capacity {
            return Err(ConfigError::HashWidth(hash_bits, capacity));
        }

        return Ok(group);
    }
}

impl<D> ElectionContext<D> {
    pub fn group(&self) -> &Group {
        return &self.group;
    }

    pub fn trustees(&self) -> u8 {
        return self.trustees;
    }

    pub fn threshold(&self) -> u8 {
        return self.threshold;
    }

    pub fn element_bits(&self) -> usize {
        return self.element_bits;
    }

    /// Width of one encoded element in bytes
    pub fn element_bytes(&self) -> usize {
        return self.element_bits / 8;
    }
}

impl<D> Clone for ElectionContext<D> {
    fn clone(&self) -> Self {
        return Self {
            group: self.group,
            trustees: self.trustees,
            threshold: self.threshold,
            element_bits: self.element_bits,
            hash: PhantomData,
        };
    }
}

impl<D> fmt::Debug for ElectionContext<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElectionContext")
            .field("group", &self.group)
            .field("trustees", &self.trustees)
            .field("threshold", &self.threshold)
            .field("element_bits", &self.element_bits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn toy() -> Config {
        return fixtures::toy_config();
    }

    #[test]
    fn test_valid_configs() {
        assert!(toy().validate::<Sha3_256>().is_ok());
        assert!(fixtures::config(3, 2).validate::<Sha3_256>().is_ok());
        assert!(fixtures::config(3, 2).validate::<sha2::Sha256>().is_ok());
    }

    #[test]
    fn test_trustee_counts() {
        let mut config = toy();
        config.threshold = 2;
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::InvalidThreshold {
                trustees: 1,
                threshold: 2
            }
        );
        config.threshold = 0;
        assert!(matches!(
            config.validate::<Sha3_256>(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
        config.trustees = 0;
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::NoTrustees
        );
    }

    #[test]
    fn test_bad_moduli() {
        let mut config = toy();
        config.prime = BigInt::from_u8(25);
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::PrimeNotPrime
        );

        let mut config = toy();
        config.exp_modulus = BigInt::from_u8(9);
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::ExpModulusNotPrime
        );

        let mut config = toy();
        config.exp_modulus = BigInt::from_u8(7);
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::ExpModulusNotDivisor
        );
    }

    #[test]
    fn test_bad_generator() {
        let mut config = toy();
        config.generator = BigInt::from_u8(23);
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::GeneratorOutOfRange
        );
        config.generator = BigInt::ONE;
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::GeneratorOutOfRange
        );
        // 5 generates all of Z/23, so 5 ** 11 != 1
        config.generator = BigInt::from_u8(5);
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::GeneratorOrder
        );
    }

    #[test]
    fn test_element_width() {
        let mut config = toy();
        config.element_bits = 4;
        assert_eq!(
            config.validate::<Sha3_256>().unwrap_err(),
            ConfigError::ElementWidth(4, 5, BigInt::BITS)
        );
        config.element_bits = 12;
        assert!(matches!(
            config.validate::<Sha3_256>(),
            Err(ConfigError::ElementWidth(12, _, _))
        ));
        config.element_bits = BigInt::BITS + 8;
        assert!(matches!(
            config.validate::<Sha3_256>(),
            Err(ConfigError::ElementWidth(..))
        ));
        config.element_bits = 16;
        assert!(config.validate::<Sha3_256>().is_ok());
    }
}
