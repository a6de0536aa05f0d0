//! Decryption and tallying.
//!
//! Each trustee publishes a partial decryption M_i = alpha^(s_i) of the aggregate ciphertext.
//! With all trustees present the plaintext is beta / prod(M_i). With only a threshold subset,
//! the partial decryptions are made with combined key shares x_j = sum_i P_i(j) and are
//! interpolated in the exponent with Lagrange coefficients at zero.
use crate::{
    arithmetics::{discrete_log, Element, Exponent, Group},
    config::ElectionContext,
    encryption::EncryptedMessage,
    error::Error,
};

/// alpha ** secret
pub fn trustee_decrypt(secret: &Exponent, msg: &EncryptedMessage) -> Element {
    return msg.public_key.pow(secret);
}

/// Remove the mask using one partial decryption from every trustee
pub fn full_decrypt<D>(
    ctx: &ElectionContext<D>,
    shares: &[Element],
    msg: &EncryptedMessage,
) -> Result<Element, Error> {
    let expected = ctx.trustees() as usize;
    if shares.len() != expected {
        return Err(Error::WrongLength {
            what: "partial decryptions",
            expected,
            found: shares.len(),
        });
    }
    return Ok(msg.ciphertext / ctx.group().product(shares));
}

/// Does the decrypted value M encode the tally t, i.e. M == g^t
pub fn check_tally(group: &Group, decrypted: &Element, tally: u64) -> bool {
    return *decrypted == group.g_pow(&group.exponent_from_u64(tally));
}

/// Recover t from M = g^t, provided t <= max
pub fn tally_value(group: &Group, decrypted: &Element, max: u64) -> Option<u64> {
    return discrete_log(&group.generator(), decrypted, max);
}

/// Homomorphically add up ciphertexts. The empty aggregate is the trivial encryption (1, 1) of 0.
pub fn aggregate(group: &Group, ballots: &[EncryptedMessage]) -> EncryptedMessage {
    let identity = EncryptedMessage {
        public_key: group.identity(),
        ciphertext: group.identity(),
    };
    return ballots.iter().fold(identity, |acc, ballot| acc * *ballot);
}

/// Lagrange coefficient at zero for trustee `index` within the set `indices`:
/// prod_{l != index} l / (l - index)
pub fn lagrange_coefficient(group: &Group, index: u8, indices: &[u8]) -> Result<Exponent, Error> {
    let distinct = indices
        .iter()
        .enumerate()
        .all(|(pos, idx)| !indices[pos + 1..].contains(idx));
    if index == 0 || indices.contains(&0) || !distinct || !indices.contains(&index) {
        return Err(Error::InvalidTrusteeIndex);
    }

    let j = group.exponent_from_u64(index as u64);
    let mut numerator = group.exponent_from_u64(1);
    let mut denominator = group.exponent_from_u64(1);
    for other in indices.iter().filter(|other| **other != index) {
        let l = group.exponent_from_u64(*other as u64);
        numerator = numerator * l;
        denominator = denominator * (l - j);
    }
    // indices that collide (mod Q) leave nothing to invert
    let inverse = denominator.invert().ok_or(Error::InvalidTrusteeIndex)?;
    return Ok(numerator * inverse);
}

/// Decrypt with partial decryptions (trustee index, alpha^(x_j)) from at least `threshold`
/// trustees, where x_j is trustee j's combined key share
pub fn combine_threshold_shares<D>(
    ctx: &ElectionContext<D>,
    shares: &[(u8, Element)],
    msg: &EncryptedMessage,
) -> Result<Element, Error> {
    let needed = ctx.threshold() as usize;
    if shares.len() < needed {
        return Err(Error::WrongLength {
            what: "partial decryptions",
            expected: needed,
            found: shares.len(),
        });
    }
    if shares
        .iter()
        .any(|(index, _)| *index == 0 || *index > ctx.trustees())
    {
        return Err(Error::InvalidTrusteeIndex);
    }

    let group = ctx.group();
    let indices = shares.iter().map(|(index, _)| *index).collect::<Vec<u8>>();
    let mut mask = group.identity();
    for (index, partial) in shares.iter() {
        let coefficient = lagrange_coefficient(group, *index, &indices)?;
        mask = mask * partial.pow(&coefficient);
    }
    return Ok(msg.ciphertext / mask);
}
