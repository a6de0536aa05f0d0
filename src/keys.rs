//! Trustee keys.
//!
//! Each trustee picks a secret s and a polynomial P(x) = s + a_1 x + ... + a_{t-1} x^(t-1) with
//! t = threshold. The election key is the product of the trustees' public keys g^s. Trustee i
//! hands trustee j the value P_i(j), encrypted to j's public key; trustee j checks it against the
//! commitments g^(a_k) that i published with Schnorr proofs of possession.
use crate::{
    arithmetics::{Element, Exponent, Group},
    config::ElectionContext,
    error::{Error, Rejection},
    hash::ChainHash,
    proofs::{ensure, report, schnorr::SchnorrProof, Verification},
};
use digest::Digest;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// A trustee's secret and polynomial. `coefficients[0]` is the secret itself.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct IndividualPrivateKey {
    secret: Exponent,
    coefficients: Vec<Exponent>,
}

/// g^s for a single trustee
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct IndividualPublicKey(Element);

/// The product of every trustee's public key; ballots are encrypted under this key
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct AggregatePublicKey(Element);

/// P_i(j), masked for trustee j: (g^r, P_i(j) + H(g^r, K_j^r))
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct EncryptedPrivateKeyShare {
    /// 1-based index of the receiving trustee
    pub recipient: u8,

    pub ephemeral: Element,

    pub masked: Exponent,
}

/// The public image g^(a_k) of each polynomial coefficient, each with a Schnorr proof that the
/// trustee knows a_k. All proofs share one challenge.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PublicKeyCommitments {
    pub public_values: Vec<Element>,

    pub proofs: Vec<SchnorrProof>,
}

impl IndividualPublicKey {
    pub fn new(key: Element) -> Self {
        return Self(key);
    }

    pub fn as_element(&self) -> &Element {
        return &self.0;
    }
}

impl AggregatePublicKey {
    pub fn as_element(&self) -> &Element {
        return &self.0;
    }
}

impl IndividualPrivateKey {
    pub fn get_secret(&self) -> &Exponent {
        return &self.secret;
    }

    /// All `threshold` coefficients, starting with the secret
    pub fn get_coefficients(&self) -> &[Exponent] {
        return &self.coefficients;
    }

    pub fn public_key(&self, group: &Group) -> IndividualPublicKey {
        return IndividualPublicKey(group.g_pow(&self.secret));
    }

    /// Generate a key pair with a random secret and random coefficients
    pub fn random<D, R: RngCore + CryptoRng>(
        ctx: &ElectionContext<D>,
        rng: &mut R,
    ) -> (IndividualPublicKey, IndividualPrivateKey) {
        let group = ctx.group();
        let coefficients = (0..ctx.threshold())
            .map(|_| group.random_exponent(rng))
            .collect::<Vec<Exponent>>();
        let private = Self {
            secret: coefficients[0],
            coefficients,
        };
        return (private.public_key(group), private);
    }
}

/// Build a key pair from a secret and the remaining `threshold - 1` coefficients
pub fn generate_key_pair<D>(
    ctx: &ElectionContext<D>,
    secret: Exponent,
    coefficients: &[Exponent],
) -> Result<(IndividualPublicKey, IndividualPrivateKey), Error> {
    let expected = ctx.threshold() as usize - 1;
    if coefficients.len() != expected {
        return Err(Error::WrongLength {
            what: "polynomial coefficients",
            expected,
            found: coefficients.len(),
        });
    }
    let mut all = Vec::with_capacity(coefficients.len() + 1);
    all.push(secret);
    all.extend_from_slice(coefficients);
    let private = IndividualPrivateKey {
        secret,
        coefficients: all,
    };
    return Ok((private.public_key(ctx.group()), private));
}

/// Evaluate the trustee's polynomial at x using Horner's rule
pub fn compute_trustee_polynomial(
    group: &Group,
    private: &IndividualPrivateKey,
    x: &Exponent,
) -> Exponent {
    return private
        .coefficients
        .iter()
        .rev()
        .fold(group.zero(), |acc, coef| acc * *x + *coef);
}

/// Multiply every trustee's public key together. Only defined once all keys are present.
pub fn form_aggregate_key<D>(
    ctx: &ElectionContext<D>,
    keys: &[IndividualPublicKey],
) -> Result<AggregatePublicKey, Error> {
    let expected = ctx.trustees() as usize;
    if keys.len() != expected {
        return Err(Error::WrongLength {
            what: "trustee public keys",
            expected,
            found: keys.len(),
        });
    }
    let key = ctx.group().product(keys.iter().map(|key| &key.0));
    return Ok(AggregatePublicKey(key));
}

fn check_trustee_index<D>(ctx: &ElectionContext<D>, index: u8) -> Result<(), Error> {
    if index == 0 || index > ctx.trustees() {
        return Err(Error::InvalidTrusteeIndex);
    }
    return Ok(());
}

/// Compute P(recipient) and mask it so that only the holder of `recipient_key` can read it
pub fn generate_key_share<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    sender: &IndividualPrivateKey,
    recipient: u8,
    recipient_key: &IndividualPublicKey,
    nonce: &Exponent,
) -> Result<EncryptedPrivateKeyShare, Error> {
    check_trustee_index(ctx, recipient)?;
    let group = ctx.group();
    let share = compute_trustee_polynomial(group, sender, &group.exponent_from_u64(recipient as u64));
    let ephemeral = group.g_pow(nonce);
    let mask = ctx.extended_hash_z(hash, &[ephemeral, recipient_key.0.pow(nonce)]);
    return Ok(EncryptedPrivateKeyShare {
        recipient,
        ephemeral,
        masked: share + mask,
    });
}

/// Remove the mask from a share addressed to the holder of `recipient`
pub fn decrypt_key_share<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    recipient: &IndividualPrivateKey,
    share: &EncryptedPrivateKeyShare,
) -> Exponent {
    let shared = share.ephemeral.pow(&recipient.secret);
    let mask = ctx.extended_hash_z(hash, &[share.ephemeral, shared]);
    return share.masked - mask;
}

/// Check a decrypted share P_i(index) against trustee i's commitments:
/// g^share == prod_k C_k^(index^k)
pub fn verify_key_share(
    group: &Group,
    commitments: &PublicKeyCommitments,
    index: u8,
    share: &Exponent,
) -> Result<(), Error> {
    if index == 0 {
        return Err(Error::InvalidTrusteeIndex);
    }
    if group.g_pow(share) != commitment_image(group, commitments, index) {
        debug!(index, "key share does not match commitments");
        return Err(Error::KeyShareMismatch);
    }
    return Ok(());
}

/// prod_k C_k^(index^k), i.e. g^P(index), evaluated by Horner's rule in the exponent
fn commitment_image(group: &Group, commitments: &PublicKeyCommitments, index: u8) -> Element {
    let x = group.exponent_from_u64(index as u64);
    return commitments
        .public_values
        .iter()
        .rev()
        .fold(group.identity(), |acc, value| acc.pow(&x) * *value);
}

/// The public counterpart g^x_j of trustee j's combined key share x_j, computed from everyone's
/// commitments. Partial decryptions made with x_j are checked against this key.
pub fn share_verification_key(
    group: &Group,
    commitments: &[PublicKeyCommitments],
    index: u8,
) -> Element {
    let images = commitments
        .iter()
        .map(|comms| commitment_image(group, comms, index))
        .collect::<Vec<Element>>();
    return group.product(&images);
}

/// A trustee's share of the joint secret: the sum of the shares it received, its own included
pub fn combine_key_shares(group: &Group, shares: &[Exponent]) -> Exponent {
    return group.sum(shares);
}

/// Publish g^(a_k) for every coefficient with a proof of possession. There must be one fresh
/// nonce per coefficient. The shared challenge is H(hash, public values ++ commitments).
pub fn publish_commitments<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    private: &IndividualPrivateKey,
    nonces: &[Exponent],
) -> Result<PublicKeyCommitments, Error> {
    let expected = ctx.threshold() as usize;
    if nonces.len() != expected || private.coefficients.len() != expected {
        return Err(Error::WrongLength {
            what: "commitment nonces",
            expected,
            found: nonces.len(),
        });
    }
    let group = ctx.group();
    let public_values = private
        .coefficients
        .iter()
        .map(|coef| group.g_pow(coef))
        .collect::<Vec<Element>>();
    let mut transcript = public_values.clone();
    transcript.extend(nonces.iter().map(|nonce| group.g_pow(nonce)));
    let challenge = ctx.extended_hash_z(hash, &transcript);

    let proofs = private
        .coefficients
        .iter()
        .zip(nonces.iter())
        .map(|(coef, nonce)| SchnorrProof::respond(group, coef, nonce, challenge))
        .collect::<Vec<SchnorrProof>>();
    debug!(coefficients = expected, "published key commitments");
    return Ok(PublicKeyCommitments {
        public_values,
        proofs,
    });
}

/// Check every proof of possession. The shared challenge is recomputed from the published values
/// rather than trusted, so a stale or forged challenge is rejected.
pub fn verify_public_key_commitments<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    comms: &PublicKeyCommitments,
) -> Verification {
    return report("key commitments", check_commitments(ctx, hash, comms));
}

fn check_commitments<D: Digest>(
    ctx: &ElectionContext<D>,
    hash: &ChainHash,
    comms: &PublicKeyCommitments,
) -> Verification {
    let expected = ctx.threshold() as usize;
    ensure(
        comms.public_values.len() == expected && comms.proofs.len() == expected,
        Rejection::Structure,
    )?;
    let group = ctx.group();

    let mut transcript = comms.public_values.clone();
    transcript.extend(comms.proofs.iter().map(|proof| proof.commitment));
    let challenge = ctx.extended_hash_z(hash, &transcript);
    ensure(
        comms.proofs.iter().all(|proof| proof.challenge == challenge),
        Rejection::ChallengeMismatch,
    )?;

    for (value, proof) in comms.public_values.iter().zip(comms.proofs.iter()) {
        proof.verify(group, value)?;
    }
    return Ok(());
}

impl PublicKeyCommitments {
    /// The trustee's public key is the image of the constant coefficient
    pub fn public_key(&self) -> Option<IndividualPublicKey> {
        return self.public_values.first().map(|value| IndividualPublicKey(*value));
    }
}
