//! ElGamal encryption of selections and contests.
//!
//! A selection b is encoded as g^b, so multiplying ciphertexts adds selections in the exponent.
//! That is what makes the tally homomorphic.
use std::ops;

use crate::{
    arithmetics::{Element, Exponent, Group},
    error::Error,
};

/// An ElGamal ciphertext (g^r, m * K^r)
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct EncryptedMessage {
    pub public_key: Element,

    pub ciphertext: Element,
}

/// An ordered sequence of selections with a declared length
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Contest {
    selections: Vec<bool>,
}

impl Contest {
    pub fn new(selections: Vec<bool>, declared_len: usize) -> Result<Self, Error> {
        if selections.len() != declared_len {
            return Err(Error::WrongLength {
                what: "contest selections",
                expected: declared_len,
                found: selections.len(),
            });
        }
        return Ok(Self { selections });
    }

    pub fn get_selections(&self) -> &[bool] {
        return &self.selections;
    }

    /// Number of selections set to 1
    pub fn count(&self) -> u64 {
        return self.selections.iter().filter(|sel| **sel).count() as u64;
    }
}

/// Multiplying two ciphertexts gives a ciphertext of the product of the plaintexts under the sum
/// of the nonces
impl ops::Mul for EncryptedMessage {
    type Output = EncryptedMessage;

    fn mul(self, rhs: EncryptedMessage) -> EncryptedMessage {
        return EncryptedMessage {
            public_key: self.public_key * rhs.public_key,
            ciphertext: self.ciphertext * rhs.ciphertext,
        };
    }
}

fn check_nonce_count(expected: usize, nonces: &[Exponent]) -> Result<(), Error> {
    if nonces.len() != expected {
        return Err(Error::WrongLength {
            what: "nonces",
            expected,
            found: nonces.len(),
        });
    }
    return Ok(());
}

/// (g^nonce, message * key^nonce)
pub fn encrypt(group: &Group, key: &Element, message: &Element, nonce: &Exponent) -> EncryptedMessage {
    return EncryptedMessage {
        public_key: group.g_pow(nonce),
        ciphertext: *message * key.pow(nonce),
    };
}

/// g^0 or g^1
pub fn encode_selection(group: &Group, selection: bool) -> Element {
    return group.g_pow_int(selection as i64);
}

pub fn encrypt_selection(group: &Group, key: &Element, selection: bool, nonce: &Exponent) -> EncryptedMessage {
    return encrypt(group, key, &encode_selection(group, selection), nonce);
}

/// Encryption of the product of `messages` under the sum of `nonces`; the same as encrypting
/// each message and multiplying the ciphertexts, with two exponentiations in total
pub fn encrypt_multiple(
    group: &Group,
    key: &Element,
    messages: &[Element],
    nonces: &[Exponent],
) -> Result<EncryptedMessage, Error> {
    check_nonce_count(messages.len(), nonces)?;
    return Ok(encrypt(group, key, &group.product(messages), &group.sum(nonces)));
}

/// Encryption of the number of selected options, equal to the product of the per-selection
/// encryptions with the same nonces
pub fn encrypt_contest(
    group: &Group,
    key: &Element,
    contest: &Contest,
    nonces: &[Exponent],
) -> Result<EncryptedMessage, Error> {
    check_nonce_count(contest.selections.len(), nonces)?;
    let count = group.exponent_from_u64(contest.count());
    return Ok(encrypt(group, key, &group.g_pow(&count), &group.sum(nonces)));
}

/// ciphertext * public_key^(-secret). Only recovers the message under the matching secret.
pub fn decrypt(secret: &Exponent, msg: &EncryptedMessage) -> Element {
    return msg.ciphertext / msg.public_key.pow(secret);
}
