//! A sample election: three trustees, any two of which can decrypt, and a handful of voters who
//! each pick exactly one of three candidates
use std::error::Error;

use elgamal_election::{
    arithmetics::Exponent,
    config::{Config, ElectionContext},
    encryption::EncryptedMessage,
    keys::{self, IndividualPrivateKey, IndividualPublicKey, PublicKeyCommitments},
    proofs::{
        ballot::{self, BallotNonces, CPProofDisj},
        decryption, tally as tally_proofs,
    },
    tally, BigInt,
};
use rand::{rngs::OsRng, Rng};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TRUSTEES: u8 = 3;
const THRESHOLD: u8 = 2;
const CANDIDATES: usize = 3;
const VOTERS: usize = 10;

/// The largest safe prime below 2 ** 256 is 2 ** 256 - 36113
fn config() -> Config {
    let prime = BigInt::ONE
        .shl_vartime(256)
        .wrapping_sub(&BigInt::from_u32(36113));
    return Config {
        prime,
        exp_modulus: prime.shr_vartime(1),
        generator: BigInt::from_u8(4),
        trustees: TRUSTEES,
        threshold: THRESHOLD,
        element_bits: 256,
    };
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let ctx: ElectionContext = config().validate()?;
    let group = ctx.group();
    let codec = ctx.codec();
    let hash = ctx.base_hash(b"simple election");

    // Every trustee commits to its polynomial and proves possession of the coefficients
    let pairs: Vec<(IndividualPublicKey, IndividualPrivateKey)> = (0..TRUSTEES)
        .map(|_| IndividualPrivateKey::random(&ctx, &mut OsRng))
        .collect();
    let mut commitments: Vec<PublicKeyCommitments> = vec![];
    for (_, private) in pairs.iter() {
        let nonces: Vec<Exponent> = (0..THRESHOLD)
            .map(|_| group.random_exponent(&mut OsRng))
            .collect();
        let comms = keys::publish_commitments(&ctx, &hash, private, &nonces)?;
        let published: PublicKeyCommitments = codec.decode(&codec.encode(&comms))?;
        keys::verify_public_key_commitments(&ctx, &hash, &published)?;
        commitments.push(published);
    }
    let publics: Vec<IndividualPublicKey> = commitments
        .iter()
        .filter_map(|comms| comms.public_key())
        .collect();
    let election_key = keys::form_aggregate_key(&ctx, &publics)?;
    let key = election_key.as_element();

    // Trustees exchange encrypted shares and check each one against the sender's commitments
    let mut combined_shares: Vec<Exponent> = vec![];
    for recipient in 1..=TRUSTEES {
        let (recipient_public, recipient_private) = &pairs[recipient as usize - 1];
        let mut received = vec![];
        for (sender, (_, sender_private)) in pairs.iter().enumerate() {
            let share = keys::generate_key_share(
                &ctx,
                &hash,
                sender_private,
                recipient,
                recipient_public,
                &group.random_exponent(&mut OsRng),
            )?;
            let share = keys::decrypt_key_share(&ctx, &hash, recipient_private, &share);
            keys::verify_key_share(group, &commitments[sender], recipient, &share)?;
            received.push(share);
        }
        combined_shares.push(keys::combine_key_shares(group, &received));
    }
    info!(trustees = TRUSTEES, threshold = THRESHOLD, "key generation complete");

    // Each voter encrypts a one-hot contest, proves every selection is 0 or 1, and proves that
    // the contest as a whole holds exactly one selection
    let mut true_tally = [0u64; CANDIDATES];
    let mut columns: Vec<Vec<EncryptedMessage>> = vec![vec![]; CANDIDATES];
    for _ in 0..VOTERS {
        let choice = OsRng.gen_range(0..CANDIDATES);
        true_tally[choice] += 1;

        let mut selections = vec![];
        let mut nonces = vec![];
        for candidate in 0..CANDIDATES {
            let ballot_nonces = BallotNonces::random(group, &mut OsRng);
            let (msg, proof) =
                ballot::encrypt_with_proof(&ctx, &hash, key, candidate == choice, &ballot_nonces);
            let proof: CPProofDisj = codec.decode(&codec.encode(&proof))?;
            ballot::verify_cp_proof_disj(&ctx, &hash, key, &msg, &proof)?;
            selections.push(msg);
            nonces.push(ballot_nonces.nonce);
        }

        let contest = tally::aggregate(group, &selections);
        let proof = tally_proofs::aggregate_encryption_proof(
            &ctx,
            &hash,
            key,
            &contest,
            &group.sum(&nonces),
            &group.random_exponent(&mut OsRng),
        );
        tally_proofs::verify_aggregate_encryption_proof(&ctx, &hash, key, &contest, 1, &proof)?;

        for (column, msg) in columns.iter_mut().zip(selections) {
            column.push(msg);
        }
    }
    info!(voters = VOTERS, "ballots cast");

    // Trustees 1 and 3 decrypt each candidate's total; trustee 2 stays offline
    let present = [1u8, 3];
    for (candidate, column) in columns.iter().enumerate() {
        let total = tally::aggregate(group, column);
        let mut partials = vec![];
        for index in present {
            let share = &combined_shares[index as usize - 1];
            let partial = tally::trustee_decrypt(share, &total);
            let proof = decryption::trustee_decrypt_proof(
                &ctx,
                &hash,
                share,
                &total,
                &partial,
                &group.random_exponent(&mut OsRng),
            );
            let verification_key = keys::share_verification_key(group, &commitments, index);
            decryption::check_trustee_decrypt_proof(
                &ctx,
                &hash,
                &verification_key,
                &total,
                &partial,
                &proof,
            )?;
            partials.push((index, partial));
        }
        let decrypted = tally::combine_threshold_shares(&ctx, &partials, &total)?;
        let count = tally::tally_value(group, &decrypted, VOTERS as u64);
        if count != Some(true_tally[candidate]) {
            panic!("the final tally is incorrect!");
        }
        info!(candidate, votes = true_tally[candidate], "tally verified");
    }

    println!("The election is a success!");
    return Ok(());
}
