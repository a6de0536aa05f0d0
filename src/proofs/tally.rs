//! Proof that an aggregate ciphertext encrypts a declared number of selections.
//!
//! A contest ciphertext (alpha, beta) = (g^R, g^L * K^R) with R the sum of the selection nonces
//! is proven to carry exactly L with a single Chaum-Pedersen proof; the verifier folds the count
//! into the second equation as g^(L * c).
use crate::{
    arithmetics::{Element, Exponent},
    config::ElectionContext,
    encryption::EncryptedMessage,
    error::Rejection,
    hash::ChainHash,
    proofs::{
        chaum_pedersen::{commit, verify_cp_proof, CPProof},
        ensure, report, Verification,
    },
};
use digest::Digest;

fn challenge<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    msg: &EncryptedMessage,
    commitment: &EncryptedMessage,
) -> Exponent {
    return ctx.extended_hash_z(
        hash,
        &[
            msg.public_key,
            msg.ciphertext,
            commitment.public_key,
            commitment.ciphertext,
        ],
    );
}

/// Prove knowledge of the aggregate nonce R of `msg`
pub fn aggregate_encryption_proof<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    key: &Element,
    msg: &EncryptedMessage,
    total_nonce: &Exponent,
    u: &Exponent,
) -> CPProof {
    let commitment = commit(ctx.group(), key, u);
    let challenge = challenge(ctx, hash, msg, &commitment);
    return CPProof {
        commitment,
        challenge,
        response: *u + challenge * *total_nonce,
    };
}

/// Check that `msg` encrypts g^selections under `key`
pub fn verify_aggregate_encryption_proof<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    key: &Element,
    msg: &EncryptedMessage,
    selections: u64,
    proof: &CPProof,
) -> Verification {
    let group = ctx.group();
    let outcome = ensure(
        proof.challenge == challenge(ctx, hash, msg, &proof.commitment),
        Rejection::ChallengeMismatch,
    )
    .and_then(|_| {
        verify_cp_proof(
            group,
            &group.exponent_from_u64(selections),
            proof,
            key,
            msg,
        )
    });
    return report("aggregate encryption", outcome);
}
