//! Fiat-Shamir hash chain.
//!
//! The base hash binds the system parameters: P, Q and g at the element width, then the trustee
//! count and threshold as single bytes, then caller data. Every extension appends group elements
//! at the element width to the previous digest and hashes again. The encoding is fixed-width and
//! big-endian, so a verifier recomputes exactly the prover's challenge and any reordering or
//! omission of an element changes it.
use crate::{
    arithmetics::{Element, Exponent},
    config::ElectionContext,
    encoding::write_uint,
};
use digest::Digest;

/// A digest in the hash chain
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct ChainHash(Vec<u8>);

impl ChainHash {
    pub fn new(bytes: Vec<u8>) -> Self {
        return Self(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        return &self.0;
    }
}

impl<D: Digest> ElectionContext<D> {
    /// Hash the system parameters followed by `data`
    pub fn base_hash(&self, data: &[u8]) -> ChainHash {
        let width = self.element_bytes();
        let mut bytes = vec![];
        write_uint(self.group().prime(), width, &mut bytes);
        write_uint(self.group().exp_modulus(), width, &mut bytes);
        write_uint(&self.group().generator().retrieve(), width, &mut bytes);
        bytes.push(self.trustees());
        bytes.push(self.threshold());
        bytes.extend_from_slice(data);

        return ChainHash(D::digest(&bytes).to_vec());
    }

    /// Extend `prior` with the encoding of each element, in order
    pub fn extended_hash(&self, prior: &ChainHash, elements: &[Element]) -> ChainHash {
        let width = self.element_bytes();
        let mut hasher = D::new();
        hasher.update(prior.as_bytes());
        let mut buf = Vec::with_capacity(width);
        for elem in elements {
            buf.clear();
            write_uint(&elem.retrieve(), width, &mut buf);
            hasher.update(&buf);
        }
        return ChainHash(hasher.finalize().to_vec());
    }

    /// Extend the chain and reduce the digest into ZQ for use as a challenge
    pub fn extended_hash_z(&self, prior: &ChainHash, elements: &[Element]) -> Exponent {
        let digest = self.extended_hash(prior, elements);
        return self.group().exponent_from_digest(digest.as_bytes());
    }
}
