//! Arithmetics over the two rings used everywhere else: the multiplicative group of integers
//! (mod P), written ZP, and the exponent ring of integers (mod Q), written ZQ.
//!
//! Both rings are represented in Montgomery form. Exponentiation is bounded by the bit length of
//! Q because every exponent is reduced (mod Q) before use.
use std::ops;

use crate::{error::Error, BigInt, LIMBS};
use crypto_bigint::{
    modular::runtime_mod::{DynResidue, DynResidueParams},
    NonZero, RandomMod,
};
use rand::{CryptoRng, RngCore};

/// The ambient group: prime P, exponent modulus Q and a generator g of the order-Q subgroup.
/// Only `config` constructs one, after checking the parameters.
#[derive(Debug, Clone, Copy)]
pub struct Group {
    p: DynResidueParams<LIMBS>,
    q: DynResidueParams<LIMBS>,
    q_nonzero: NonZero<BigInt>,
    generator: DynResidue<LIMBS>,
}

/// An element of ZP
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Element(DynResidue<LIMBS>);

/// An element of ZQ: secrets, nonces, challenges and responses
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Exponent(DynResidue<LIMBS>);

impl Group {
    /// Instantiate with no check other than Q being non-zero. P and Q must be odd.
    pub(crate) fn new(prime: &BigInt, exp_modulus: &BigInt, generator: &BigInt) -> Option<Self> {
        let q_nonzero = Option::<NonZero<BigInt>>::from(NonZero::new(*exp_modulus))?;
        let p = DynResidueParams::new(prime);
        let q = DynResidueParams::new(exp_modulus);
        let generator = DynResidue::new(generator, p);
        return Some(Self {
            p,
            q,
            q_nonzero,
            generator,
        });
    }

    pub fn prime(&self) -> &BigInt {
        return self.p.modulus();
    }

    pub fn exp_modulus(&self) -> &BigInt {
        return self.q.modulus();
    }

    pub fn generator(&self) -> Element {
        return Element(self.generator);
    }

    /// Reduce an arbitrary integer into ZP
    pub fn element(&self, value: &BigInt) -> Element {
        return Element(DynResidue::new(value, self.p));
    }

    /// Same as `element`, but values outside of [0, P) are an error instead of being reduced
    pub fn try_element(&self, value: &BigInt) -> Result<Element, Error> {
        if value >= self.prime() {
            return Err(Error::OutOfRange);
        }
        return Ok(self.element(value));
    }

    /// Reduce an arbitrary integer into ZQ
    pub fn exponent(&self, value: &BigInt) -> Exponent {
        return Exponent(DynResidue::new(value, self.q));
    }

    /// Same as `exponent`, but values outside of [0, Q) are an error instead of being reduced
    pub fn try_exponent(&self, value: &BigInt) -> Result<Exponent, Error> {
        if value >= self.exp_modulus() {
            return Err(Error::OutOfRange);
        }
        return Ok(self.exponent(value));
    }

    pub fn exponent_from_u64(&self, value: u64) -> Exponent {
        return self.exponent(&BigInt::from_u64(value));
    }

    /// The multiplicative identity of ZP
    pub fn identity(&self) -> Element {
        return self.element(&BigInt::ONE);
    }

    /// The additive identity of ZQ
    pub fn zero(&self) -> Exponent {
        return self.exponent(&BigInt::ZERO);
    }

    /// g ** e
    pub fn g_pow(&self, exponent: &Exponent) -> Element {
        return self.generator().pow(exponent);
    }

    /// g ** n for a plain integer, negative exponents included
    pub fn g_pow_int(&self, exponent: i64) -> Element {
        return self.generator().pow_int(exponent);
    }

    /// Multiply a sequence of elements together. The empty product is 1.
    pub fn product<'a, I>(&self, elements: I) -> Element
    where
        I: IntoIterator<Item = &'a Element>,
    {
        return elements
            .into_iter()
            .fold(self.identity(), |acc, elem| acc * *elem);
    }

    /// Add a sequence of exponents together. The empty sum is 0.
    pub fn sum<'a, I>(&self, exponents: I) -> Exponent
    where
        I: IntoIterator<Item = &'a Exponent>,
    {
        return exponents
            .into_iter()
            .fold(self.zero(), |acc, exp| acc + *exp);
    }

    /// Subgroup membership: x ** Q == 1 (mod P)
    pub fn is_member(&self, x: &Element) -> bool {
        let q = self.exp_modulus();
        return x.0.pow_bounded_exp(q, q.bits()).retrieve() == BigInt::ONE;
    }

    /// Sample a uniformly random exponent. Every nonce must come from a fresh call.
    pub fn random_exponent<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Exponent {
        let value = BigInt::random_mod(rng, &self.q_nonzero);
        return self.exponent(&value);
    }

    /// Interpret a big-endian digest as an integer and reduce it into ZQ. Digests wider than the
    /// integer capacity keep only their trailing bytes; `config` rules such digests out.
    pub fn exponent_from_digest(&self, digest: &[u8]) -> Exponent {
        let capacity = BigInt::BITS / 8;
        let mut buf = vec![0u8; capacity];
        if digest.len() >= capacity {
            buf.copy_from_slice(&digest[digest.len() - capacity..]);
        } else {
            buf[capacity - digest.len()..].copy_from_slice(digest);
        }
        let value = BigInt::from_be_slice(&buf) % self.q_nonzero;
        return self.exponent(&value);
    }
}

impl Element {
    /// Return the canonical integer in [0, P)
    pub fn retrieve(&self) -> BigInt {
        return self.0.retrieve();
    }

    /// Raise to a power in ZQ
    pub fn pow(&self, exponent: &Exponent) -> Element {
        return Element(
            self.0
                .pow_bounded_exp(&exponent.retrieve(), exponent.modulus_bits()),
        );
    }

    /// Raise to a plain integer power. A negative power goes through the modular inverse, which
    /// is how decryption removes the mask: public_key ** (-s).
    pub fn pow_int(&self, exponent: i64) -> Element {
        let magnitude = BigInt::from_u64(exponent.unsigned_abs());
        let raised = Element(self.0.pow_bounded_exp(&magnitude, u64::BITS as usize));
        if exponent < 0 {
            return raised.invert();
        }
        return raised;
    }

    /// Multiplicative inverse by Fermat's little theorem, x ** (P - 2). Total: 0 maps to 0.
    pub fn invert(&self) -> Element {
        let p = self.0.params().modulus();
        let p_minus_two = p.wrapping_sub(&BigInt::from_u8(2));
        return Element(self.0.pow_bounded_exp(&p_minus_two, p.bits()));
    }
}

impl ops::Mul for Element {
    type Output = Element;

    fn mul(self, rhs: Element) -> Element {
        return Element(self.0.mul(&rhs.0));
    }
}

impl ops::Div for Element {
    type Output = Element;

    fn div(self, rhs: Element) -> Element {
        return self * rhs.invert();
    }
}

impl Exponent {
    /// Return the canonical integer in [0, Q)
    pub fn retrieve(&self) -> BigInt {
        return self.0.retrieve();
    }

    fn modulus_bits(&self) -> usize {
        return self.0.params().modulus().bits();
    }

    /// Multiplicative inverse (mod Q), None for zero
    pub fn invert(&self) -> Option<Exponent> {
        let (inverse, invertible) = self.0.invert();
        if invertible.into() {
            return Some(Exponent(inverse));
        }
        return None;
    }
}

impl ops::Add for Exponent {
    type Output = Exponent;

    fn add(self, rhs: Exponent) -> Exponent {
        return Exponent(self.0.add(&rhs.0));
    }
}

impl ops::Sub for Exponent {
    type Output = Exponent;

    fn sub(self, rhs: Exponent) -> Exponent {
        return Exponent(self.0.sub(&rhs.0));
    }
}

impl ops::Mul for Exponent {
    type Output = Exponent;

    fn mul(self, rhs: Exponent) -> Exponent {
        return Exponent(self.0.mul(&rhs.0));
    }
}

impl ops::Neg for Exponent {
    type Output = Exponent;

    fn neg(self) -> Exponent {
        let zero = DynResidue::new(&BigInt::ZERO, *self.0.params());
        return Exponent(zero.sub(&self.0));
    }
}

/// Brute-force discrete log for small exponents: find the smallest t <= bound with
/// base ** t == target. If no such t exists, return None.
pub fn discrete_log(base: &Element, target: &Element, bound: u64) -> Option<u64> {
    let mut acc = Element(DynResidue::new(&BigInt::ONE, *base.0.params()));
    for exp in 0..=bound {
        if acc == *target {
            return Some(exp);
        }
        acc = acc * *base;
    }
    return None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_toy_exponentiation() {
        let group = *fixtures::toy_context().group();
        let s = group.exponent_from_u64(3);
        assert_eq!(group.g_pow(&s).retrieve(), BigInt::from_u8(18));
        assert_eq!(group.element(&BigInt::from_u8(18)).pow_int(2).retrieve(), BigInt::from_u8(2));
        // 16 ** -3 = 2 ** -1 = 12 (mod 23)
        let sixteen = group.element(&BigInt::from_u8(16));
        assert_eq!(sixteen.pow_int(-3).retrieve(), BigInt::from_u8(12));
        assert_eq!(group.g_pow_int(-1) * group.generator(), group.identity());
    }

    #[test]
    fn test_exponent_ring() {
        let group = *fixtures::toy_context().group();
        let seven = group.exponent_from_u64(7);
        let six = group.exponent_from_u64(6);
        assert_eq!((seven + six).retrieve(), BigInt::from_u8(2));
        assert_eq!((six - seven).retrieve(), BigInt::from_u8(10));
        assert_eq!((seven * six).retrieve(), BigInt::from_u8(9));
        assert_eq!((-seven).retrieve(), BigInt::from_u8(4));
        assert_eq!((seven * seven.invert().unwrap()).retrieve(), BigInt::ONE);
        assert!(group.zero().invert().is_none());
    }

    /// g ** Q == 1 means g ** e only depends on e (mod Q)
    #[test]
    fn test_exponent_reduction() {
        let group = *fixtures::toy_context().group();
        let thirteen = group.exponent_from_u64(13);
        assert_eq!(thirteen.retrieve(), BigInt::from_u8(2));
        assert_eq!(group.g_pow(&thirteen), group.g_pow_int(2));
    }

    #[test]
    fn test_membership() {
        let group = *fixtures::toy_context().group();
        // quadratic residues (mod 23) form the order-11 subgroup
        for x in 1u8..23 {
            let elem = group.element(&BigInt::from_u8(x));
            let is_square = (1u16..23).any(|y| (y * y) % 23 == x as u16);
            assert_eq!(group.is_member(&elem), is_square);
        }
        assert!(!group.is_member(&group.element(&BigInt::ZERO)));
    }

    #[test]
    fn test_invert() {
        let mut rng = fixtures::rng();
        let ctx = fixtures::context();
        let group = ctx.group();
        for _ in 0..32 {
            let x = group.g_pow(&group.random_exponent(&mut rng));
            assert_eq!(x * x.invert(), group.identity());
            assert_eq!(x / x, group.identity());
        }
        assert_eq!(group.element(&BigInt::ZERO).invert(), group.element(&BigInt::ZERO));
    }

    #[test]
    fn test_try_ranges() {
        let group = *fixtures::toy_context().group();
        assert!(group.try_element(&BigInt::from_u8(22)).is_ok());
        assert_eq!(group.try_element(&BigInt::from_u8(23)), Err(Error::OutOfRange));
        assert!(group.try_exponent(&BigInt::from_u8(10)).is_ok());
        assert_eq!(group.try_exponent(&BigInt::from_u8(11)), Err(Error::OutOfRange));
    }

    #[test]
    fn test_product_and_sum() {
        let group = *fixtures::toy_context().group();
        let elems = [group.g_pow_int(1), group.g_pow_int(2), group.g_pow_int(4)];
        assert_eq!(group.product(&elems), group.g_pow_int(7));
        assert_eq!(group.product(&[]), group.identity());
        let exps = [group.exponent_from_u64(5), group.exponent_from_u64(9)];
        assert_eq!(group.sum(&exps), group.exponent_from_u64(3));
    }

    #[test]
    fn test_exponent_from_digest() {
        let group = *fixtures::toy_context().group();
        assert_eq!(group.exponent_from_digest(&[0x01, 0x00]), group.exponent_from_u64(256));
        assert_eq!(group.exponent_from_digest(&[]), group.zero());
    }

    #[test]
    fn test_discrete_log() {
        let group = *fixtures::toy_context().group();
        let g = group.generator();
        assert_eq!(discrete_log(&g, &group.g_pow_int(7), 10), Some(7));
        assert_eq!(discrete_log(&g, &group.identity(), 10), Some(0));
        assert_eq!(discrete_log(&g, &group.g_pow_int(7), 5), None);
        // 5 is not in the subgroup generated by 4
        assert_eq!(discrete_log(&g, &group.element(&BigInt::from_u8(5)), 22), None);
    }
}
