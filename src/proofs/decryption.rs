//! Proof that a trustee's partial decryption M = alpha^s matches its public key K = g^s
//! commit: (a, b) = (g^u, alpha^u)
//! challenge: c = H(alpha, beta, a, b, M)
//! response: v = u + cs
//! verify: g^v == a * K^c and alpha^v == b * M^c
//!
//! This is the general Chaum-Pedersen check with bases (g, alpha), so it goes through the same
//! routine as the ballot proofs.
use crate::{
    arithmetics::{Element, Exponent},
    config::ElectionContext,
    encryption::EncryptedMessage,
    error::Rejection,
    hash::ChainHash,
    proofs::{
        chaum_pedersen::{commit, verify_equal_logs, CPProof},
        ensure, report, Verification,
    },
};
use digest::Digest;

fn challenge<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    msg: &EncryptedMessage,
    commitment: &EncryptedMessage,
    partial: &Element,
) -> Exponent {
    return ctx.extended_hash_z(
        hash,
        &[
            msg.public_key,
            msg.ciphertext,
            commitment.public_key,
            commitment.ciphertext,
            *partial,
        ],
    );
}

/// Prove that `partial` is `msg.public_key ** secret`
pub fn trustee_decrypt_proof<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    secret: &Exponent,
    msg: &EncryptedMessage,
    partial: &Element,
    u: &Exponent,
) -> CPProof {
    let commitment = commit(ctx.group(), &msg.public_key, u);
    let challenge = challenge(ctx, hash, msg, &commitment, partial);
    return CPProof {
        commitment,
        challenge,
        response: *u + challenge * *secret,
    };
}

/// Check a partial decryption against the trustee's public key `key`
pub fn check_trustee_decrypt_proof<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    key: &Element,
    msg: &EncryptedMessage,
    partial: &Element,
    proof: &CPProof,
) -> Verification {
    let outcome = ensure(
        proof.challenge == challenge(ctx, hash, msg, &proof.commitment, partial),
        Rejection::ChallengeMismatch,
    )
    .and_then(|_| verify_equal_logs(ctx.group(), &msg.public_key, key, partial, proof));
    return report("partial decryption", outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encryption, fixtures, tally};

    #[test]
    fn test_correctness() {
        let mut rng = fixtures::rng();
        let ctx = fixtures::context();
        let group = ctx.group();
        let hash = ctx.base_hash(b"decryption");
        for _ in 0..8 {
            let s = group.random_exponent(&mut rng);
            let key = group.g_pow(&s);
            let msg = encryption::encrypt_selection(group, &key, true, &group.random_exponent(&mut rng));
            let partial = tally::trustee_decrypt(&s, &msg);
            let proof =
                trustee_decrypt_proof(&ctx, &hash, &s, &msg, &partial, &group.random_exponent(&mut rng));
            assert_eq!(
                check_trustee_decrypt_proof(&ctx, &hash, &key, &msg, &partial, &proof),
                Ok(())
            );
        }
    }

    /// Swapping the partial decryption for an unrelated element fails
    #[test]
    fn test_swapped_partial() {
        let mut rng = fixtures::rng();
        let ctx = fixtures::context();
        let group = ctx.group();
        let hash = ctx.base_hash(b"decryption");
        let s = group.random_exponent(&mut rng);
        let key = group.g_pow(&s);
        let msg = encryption::encrypt_selection(group, &key, false, &group.random_exponent(&mut rng));
        let partial = tally::trustee_decrypt(&s, &msg);
        let proof = trustee_decrypt_proof(&ctx, &hash, &s, &msg, &partial, &group.random_exponent(&mut rng));

        let unrelated = group.g_pow(&group.random_exponent(&mut rng));
        assert_eq!(
            check_trustee_decrypt_proof(&ctx, &hash, &key, &msg, &unrelated, &proof),
            Err(Rejection::ChallengeMismatch)
        );

        // a cheating trustee that hashes the fake value still fails the equations
        let u = group.random_exponent(&mut rng);
        let cheat = trustee_decrypt_proof(&ctx, &hash, &s, &msg, &unrelated, &u);
        assert_eq!(
            check_trustee_decrypt_proof(&ctx, &hash, &key, &msg, &unrelated, &cheat),
            Err(Rejection::EquationMismatch)
        );

        let wrong_key = key * group.generator();
        assert_eq!(
            check_trustee_decrypt_proof(&ctx, &hash, &wrong_key, &msg, &partial, &proof),
            Err(Rejection::EquationMismatch)
        );
    }
}
