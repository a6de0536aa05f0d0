//! Chaum-Pedersen proof that two discrete logs are equal
//! statement: x = g^w and y = h^w
//! commit: (a, b) = (g^u, h^u)
//! challenge: c, from the hash chain
//! response: v = u + cw
//! verify: g^v == a * x^c and h^v == b * y^c
//!
//! The same check serves both uses. A ciphertext (alpha, beta) under key K encrypts g^m with
//! nonce r iff log_g(alpha) == log_K(beta / g^m) == r. A partial decryption M of alpha by a
//! trustee with key K is honest iff log_g(K) == log_alpha(M).
use crate::{
    arithmetics::{Element, Exponent, Group},
    encryption::EncryptedMessage,
    error::Rejection,
    proofs::{ensure, Verification},
};

/// The commitment (a, b) is stored in the shape of a ciphertext: (g^u, h^u)
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct CPProof {
    pub commitment: EncryptedMessage,

    pub challenge: Exponent,

    pub response: Exponent,
}

/// (g^u, h^u)
pub(crate) fn commit(group: &Group, h: &Element, nonce: &Exponent) -> EncryptedMessage {
    return EncryptedMessage {
        public_key: group.g_pow(nonce),
        ciphertext: h.pow(nonce),
    };
}

/// Solve the verification equations backward for the commitment, given any challenge and
/// response: (a, b) = (g^v / x^c, h^v / y^c). Used for the simulated branch of a disjunction.
pub(crate) fn simulate(
    group: &Group,
    h: &Element,
    x: &Element,
    y: &Element,
    challenge: &Exponent,
    response: &Exponent,
) -> EncryptedMessage {
    return EncryptedMessage {
        public_key: group.g_pow(response) / x.pow(challenge),
        ciphertext: h.pow(response) / y.pow(challenge),
    };
}

/// Check log_g(x) == log_h(y). Every element involved must lie in the order-Q subgroup.
pub(crate) fn verify_equal_logs(
    group: &Group,
    h: &Element,
    x: &Element,
    y: &Element,
    proof: &CPProof,
) -> Verification {
    let a = &proof.commitment.public_key;
    let b = &proof.commitment.ciphertext;
    ensure(
        [h, x, y, a, b].iter().all(|elem| group.is_member(elem)),
        Rejection::SubgroupMembership,
    )?;
    ensure(
        group.g_pow(&proof.response) == *a * x.pow(&proof.challenge),
        Rejection::EquationMismatch,
    )?;
    return ensure(
        h.pow(&proof.response) == *b * y.pow(&proof.challenge),
        Rejection::EquationMismatch,
    );
}

/// beta / g^m: what the second ciphertext component would be if the plaintext were g^0
pub(crate) fn strip_plaintext(group: &Group, msg: &EncryptedMessage, plaintext: &Exponent) -> Element {
    return msg.ciphertext * group.g_pow(&-*plaintext);
}

/// Check that `msg` encrypts g^plaintext under `key`, i.e. g^v == a * alpha^c and
/// g^(plaintext * c) * key^v == b * beta^c. The challenge is taken as given.
pub fn verify_cp_proof(
    group: &Group,
    plaintext: &Exponent,
    proof: &CPProof,
    key: &Element,
    msg: &EncryptedMessage,
) -> Verification {
    let stripped = strip_plaintext(group, msg, plaintext);
    return verify_equal_logs(group, key, &msg.public_key, &stripped, proof);
}
