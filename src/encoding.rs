//! Fixed-width wire format for the artifacts trustees and voters publish.
//!
//! Every ZP and ZQ value is a big-endian integer of exactly `element_bits`, the same encoding the
//! hash chain uses. Records are the flat concatenation of their fields; trustee indices are one
//! byte. Sequences have no length prefix because their lengths follow from the threshold.
use crate::{
    arithmetics::{Element, Exponent, Group},
    config::ElectionContext,
    encryption::EncryptedMessage,
    error::Error,
    keys::{EncryptedPrivateKeyShare, IndividualPublicKey, PublicKeyCommitments},
    proofs::{ballot::CPProofDisj, chaum_pedersen::CPProof, schnorr::SchnorrProof},
    BigInt,
};

/// Append the trailing `width` bytes of the big-endian encoding of `value`
pub(crate) fn write_uint(value: &BigInt, width: usize, out: &mut Vec<u8>) {
    let mut bytes = Vec::with_capacity(BigInt::BITS / 8);
    for word in value.as_words().iter().rev() {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    out.extend_from_slice(&bytes[bytes.len() - width..]);
}

/// Consume `width` bytes from the front of `input` as a big-endian integer
fn read_uint(input: &mut &[u8], width: usize) -> Result<BigInt, Error> {
    if input.len() < width {
        return Err(Error::BadEncoding);
    }
    let (head, rest) = input.split_at(width);
    *input = rest;

    let capacity = BigInt::BITS / 8;
    let mut buf = vec![0u8; capacity];
    buf[capacity - width..].copy_from_slice(head);
    return Ok(BigInt::from_be_slice(&buf));
}

/// Encoder and decoder bound to one election's parameters
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    group: &'a Group,
    width: usize,
    threshold: usize,
}

/// A record with a fixed-width encoding
pub trait Artifact: Sized {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>);

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error>;
}

impl<D> ElectionContext<D> {
    pub fn codec(&self) -> Codec<'_> {
        return Codec {
            group: self.group(),
            width: self.element_bytes(),
            threshold: self.threshold() as usize,
        };
    }
}

impl<'a> Codec<'a> {
    pub fn encode<A: Artifact>(&self, artifact: &A) -> Vec<u8> {
        let mut out = vec![];
        artifact.write(self, &mut out);
        return out;
    }

    /// Decode exactly one record; leftover bytes are an error
    pub fn decode<A: Artifact>(&self, bytes: &[u8]) -> Result<A, Error> {
        let mut input = bytes;
        let artifact = A::read(self, &mut input)?;
        if !input.is_empty() {
            return Err(Error::BadEncoding);
        }
        return Ok(artifact);
    }

    fn read_many<A: Artifact>(&self, input: &mut &[u8], count: usize) -> Result<Vec<A>, Error> {
        return (0..count).map(|_| A::read(self, input)).collect();
    }
}

impl Artifact for Element {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        write_uint(&self.retrieve(), codec.width, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        let value = read_uint(input, codec.width)?;
        return codec.group.try_element(&value);
    }
}

impl Artifact for Exponent {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        write_uint(&self.retrieve(), codec.width, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        let value = read_uint(input, codec.width)?;
        return codec.group.try_exponent(&value);
    }
}

impl Artifact for EncryptedMessage {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        self.public_key.write(codec, out);
        self.ciphertext.write(codec, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        let public_key = Element::read(codec, input)?;
        let ciphertext = Element::read(codec, input)?;
        return Ok(Self {
            public_key,
            ciphertext,
        });
    }
}

impl Artifact for SchnorrProof {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        self.commitment.write(codec, out);
        self.challenge.write(codec, out);
        self.response.write(codec, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        return Ok(Self {
            commitment: Element::read(codec, input)?,
            challenge: Exponent::read(codec, input)?,
            response: Exponent::read(codec, input)?,
        });
    }
}

impl Artifact for CPProof {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        self.commitment.write(codec, out);
        self.challenge.write(codec, out);
        self.response.write(codec, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        return Ok(Self {
            commitment: EncryptedMessage::read(codec, input)?,
            challenge: Exponent::read(codec, input)?,
            response: Exponent::read(codec, input)?,
        });
    }
}

impl Artifact for CPProofDisj {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        self.left.write(codec, out);
        self.right.write(codec, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        let left = CPProof::read(codec, input)?;
        let right = CPProof::read(codec, input)?;
        return Ok(Self { left, right });
    }
}

impl Artifact for IndividualPublicKey {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        self.as_element().write(codec, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        return Ok(IndividualPublicKey::new(Element::read(codec, input)?));
    }
}

impl Artifact for EncryptedPrivateKeyShare {
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        out.push(self.recipient);
        self.ephemeral.write(codec, out);
        self.masked.write(codec, out);
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        let (recipient, rest) = input.split_first().ok_or(Error::BadEncoding)?;
        let recipient = *recipient;
        *input = rest;
        if recipient == 0 {
            return Err(Error::InvalidTrusteeIndex);
        }
        return Ok(Self {
            recipient,
            ephemeral: Element::read(codec, input)?,
            masked: Exponent::read(codec, input)?,
        });
    }
}

impl Artifact for PublicKeyCommitments {
    /// All public values first, then one Schnorr proof per coefficient
    fn write(&self, codec: &Codec, out: &mut Vec<u8>) {
        for value in self.public_values.iter() {
            value.write(codec, out);
        }
        for proof in self.proofs.iter() {
            proof.write(codec, out);
        }
    }

    fn read(codec: &Codec, input: &mut &[u8]) -> Result<Self, Error> {
        let public_values = codec.read_many(input, codec.threshold)?;
        let proofs = codec.read_many(input, codec.threshold)?;
        return Ok(Self {
            public_values,
            proofs,
        });
    }
}
