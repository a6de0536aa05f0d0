//! Disjunctive Chaum-Pedersen proof that a ballot selection encrypts 0 or 1.
//!
//! The statement is a ciphertext (alpha, beta). The left branch claims plaintext g^0 and the
//! right branch claims g^1. The prover knows which branch is true, so it simulates the false
//! branch first from a random challenge and response, then hashes the ciphertext together with
//! both commitments. The real branch takes the total challenge minus the simulated one, so the
//! two challenges sum to a value the prover could not choose before committing.
use crate::{
    arithmetics::{Element, Exponent, Group},
    config::ElectionContext,
    encryption::{encrypt_selection, EncryptedMessage},
    error::Rejection,
    hash::ChainHash,
    proofs::{
        chaum_pedersen::{commit, simulate, strip_plaintext, verify_cp_proof, CPProof},
        ensure, report, Verification,
    },
};
use digest::Digest;
use rand::{CryptoRng, RngCore};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct CPProofDisj {
    /// Proof for plaintext 0
    pub left: CPProof,

    /// Proof for plaintext 1
    pub right: CPProof,
}

/// Fresh randomness for one proven selection
#[derive(Debug, Clone, Copy)]
pub struct BallotNonces {
    /// Encryption nonce
    pub nonce: Exponent,

    /// Challenge of the simulated branch
    pub c_old: Exponent,

    /// Response of the simulated branch
    pub v_old: Exponent,

    /// Commitment nonce of the real branch
    pub u: Exponent,
}

impl BallotNonces {
    pub fn random<R: RngCore + CryptoRng>(group: &Group, rng: &mut R) -> Self {
        return Self {
            nonce: group.random_exponent(rng),
            c_old: group.random_exponent(rng),
            v_old: group.random_exponent(rng),
            u: group.random_exponent(rng),
        };
    }
}

fn total_challenge<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    msg: &EncryptedMessage,
    left: &EncryptedMessage,
    right: &EncryptedMessage,
) -> Exponent {
    return ctx.extended_hash_z(
        hash,
        &[
            msg.public_key,
            msg.ciphertext,
            left.public_key,
            left.ciphertext,
            right.public_key,
            right.ciphertext,
        ],
    );
}

/// Encrypt a selection under `key` and prove that it is 0 or 1
pub fn encrypt_with_proof<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    key: &Element,
    selection: bool,
    nonces: &BallotNonces,
) -> (EncryptedMessage, CPProofDisj) {
    let group = ctx.group();
    let msg = encrypt_selection(group, key, selection, &nonces.nonce);

    // the false branch must be fixed before the challenge is derived
    let other = group.exponent_from_u64(!selection as u64);
    let simulated = CPProof {
        commitment: simulate(
            group,
            key,
            &msg.public_key,
            &strip_plaintext(group, &msg, &other),
            &nonces.c_old,
            &nonces.v_old,
        ),
        challenge: nonces.c_old,
        response: nonces.v_old,
    };
    let real_commitment = commit(group, key, &nonces.u);

    let (left, right) = if selection {
        (&simulated.commitment, &real_commitment)
    } else {
        (&real_commitment, &simulated.commitment)
    };
    let challenge = total_challenge(ctx, hash, &msg, left, right) - nonces.c_old;
    let real = CPProof {
        commitment: real_commitment,
        challenge,
        response: nonces.u + challenge * nonces.nonce,
    };

    let proof = if selection {
        CPProofDisj {
            left: simulated,
            right: real,
        }
    } else {
        CPProofDisj {
            left: real,
            right: simulated,
        }
    };
    return (msg, proof);
}

/// Check both branches and that their challenges sum to the recomputed total challenge
pub fn verify_cp_proof_disj<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    key: &Element,
    msg: &EncryptedMessage,
    proof: &CPProofDisj,
) -> Verification {
    return report("ballot", check_disjunction(ctx, hash, key, msg, proof));
}

fn check_disjunction<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    key: &Element,
    msg: &EncryptedMessage,
    proof: &CPProofDisj,
) -> Verification {
    let group = ctx.group();
    verify_cp_proof(group, &group.zero(), &proof.left, key, msg)?;
    verify_cp_proof(group, &group.exponent_from_u64(1), &proof.right, key, msg)?;
    let total = total_challenge(
        ctx,
        hash,
        msg,
        &proof.left.commitment,
        &proof.right.commitment,
    );
    return ensure(
        proof.left.challenge + proof.right.challenge == total,
        Rejection::ChallengeMismatch,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encryption, fixtures};

    /// An honest voter can always prove either selection
    #[test]
    fn test_correctness() {
        let mut rng = fixtures::rng();
        let ctx = fixtures::context();
        let group = ctx.group();
        let hash = ctx.base_hash(b"ballot");
        let key = group.g_pow(&group.random_exponent(&mut rng));
        for i in 0..16 {
            let selection = i % 2 == 0;
            let nonces = BallotNonces::random(group, &mut rng);
            let (msg, proof) = encrypt_with_proof(&ctx, &hash, &key, selection, &nonces);
            assert_eq!(
                msg,
                encryption::encrypt_selection(group, &key, selection, &nonces.nonce)
            );
            assert_eq!(verify_cp_proof_disj(&ctx, &hash, &key, &msg, &proof), Ok(()));
        }
    }

    #[test]
    fn test_toy_correctness() {
        let ctx = fixtures::toy_context();
        let group = ctx.group();
        let hash = ctx.base_hash(b"");
        let key = group.g_pow_int(3);
        let nonces = BallotNonces {
            nonce: group.exponent_from_u64(2),
            c_old: group.exponent_from_u64(4),
            v_old: group.exponent_from_u64(9),
            u: group.exponent_from_u64(6),
        };
        for selection in [false, true] {
            let (msg, proof) = encrypt_with_proof(&ctx, &hash, &key, selection, &nonces);
            assert_eq!(verify_cp_proof_disj(&ctx, &hash, &key, &msg, &proof), Ok(()));
        }
    }

    /// Changing any single field of the proof makes it fail
    #[test]
    fn test_soundness() {
        let mut rng = fixtures::rng();
        let ctx = fixtures::context();
        let group = ctx.group();
        let hash = ctx.base_hash(b"ballot");
        let key = group.g_pow(&group.random_exponent(&mut rng));
        let one = group.exponent_from_u64(1);
        let bump = group.g_pow_int(1);

        for selection in [false, true] {
            let nonces = BallotNonces::random(group, &mut rng);
            let (msg, proof) = encrypt_with_proof(&ctx, &hash, &key, selection, &nonces);

            let mutations: Vec<Box<dyn Fn(&mut CPProofDisj)>> = vec![
                Box::new(move |p| p.left.challenge = p.left.challenge + one),
                Box::new(move |p| p.right.challenge = p.right.challenge + one),
                Box::new(move |p| p.left.response = p.left.response + one),
                Box::new(move |p| p.right.response = p.right.response + one),
                Box::new(move |p| p.left.commitment.public_key = p.left.commitment.public_key * bump),
                Box::new(move |p| p.left.commitment.ciphertext = p.left.commitment.ciphertext * bump),
                Box::new(move |p| p.right.commitment.public_key = p.right.commitment.public_key * bump),
                Box::new(move |p| p.right.commitment.ciphertext = p.right.commitment.ciphertext * bump),
                Box::new(move |p| std::mem::swap(&mut p.left, &mut p.right)),
            ];
            for mutate in mutations.iter() {
                let mut tampered = proof;
                mutate(&mut tampered);
                assert!(verify_cp_proof_disj(&ctx, &hash, &key, &msg, &tampered).is_err());
            }

            // the proof is bound to the ciphertext, the key and the chain position
            let other = encryption::encrypt_selection(group, &key, selection, &group.random_exponent(&mut rng));
            assert!(verify_cp_proof_disj(&ctx, &hash, &key, &other, &proof).is_err());
            let other_key = key * bump;
            assert!(verify_cp_proof_disj(&ctx, &hash, &other_key, &msg, &proof).is_err());
            assert_eq!(
                verify_cp_proof_disj(&ctx, &ctx.base_hash(b"elsewhere"), &key, &msg, &proof),
                Err(Rejection::ChallengeMismatch)
            );
        }
    }

    /// A ciphertext of 2 cannot carry a valid proof built for 0 or 1
    #[test]
    fn test_rejects_out_of_range_plaintext() {
        let mut rng = fixtures::rng();
        let ctx = fixtures::context();
        let group = ctx.group();
        let hash = ctx.base_hash(b"ballot");
        let key = group.g_pow(&group.random_exponent(&mut rng));
        let nonces = BallotNonces::random(group, &mut rng);
        let (msg, proof) = encrypt_with_proof(&ctx, &hash, &key, true, &nonces);
        let doubled = EncryptedMessage {
            public_key: msg.public_key,
            ciphertext: msg.ciphertext * group.g_pow_int(1),
        };
        assert!(verify_cp_proof_disj(&ctx, &hash, &key, &doubled, &proof).is_err());
    }
}
