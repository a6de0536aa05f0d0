//! Schnorr proof of knowledge of a discrete log
//! statement: K = g^x
//! commit: h = g^u
//! challenge: c, from the hash chain
//! response: v = u + cx
//! verify: g^v == h * K^c
use crate::{
    arithmetics::{Element, Exponent, Group},
    error::Rejection,
    proofs::{ensure, Verification},
};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct SchnorrProof {
    pub commitment: Element,

    pub challenge: Exponent,

    pub response: Exponent,
}

impl SchnorrProof {
    /// Complete the proof once the challenge is known. `nonce` must be the one used for the
    /// commitment g^nonce that went into the challenge.
    pub fn respond(group: &Group, witness: &Exponent, nonce: &Exponent, challenge: Exponent) -> Self {
        return Self {
            commitment: group.g_pow(nonce),
            challenge,
            response: *nonce + challenge * *witness,
        };
    }

    /// Check the Schnorr equation for `public`. The challenge is taken as given; callers that
    /// derive it from a transcript must compare it themselves.
    pub fn verify(&self, group: &Group, public: &Element) -> Verification {
        ensure(
            group.is_member(public) && group.is_member(&self.commitment),
            Rejection::SubgroupMembership,
        )?;
        let lhs = group.g_pow(&self.response);
        let rhs = self.commitment * public.pow(&self.challenge);
        return ensure(lhs == rhs, Rejection::EquationMismatch);
    }
}
