//! Non-interactive zero-knowledge proofs used to show that trustees and voters are acting in
//! accordance to protocol at various stages of the election. All challenges come from the hash
//! chain (Fiat-Shamir), so each proof can be checked by anyone holding the public parameters.

pub mod ballot; // a selection encrypts 0 or 1
pub mod chaum_pedersen; // equality of discrete logs, shared by every verifier below
pub mod decryption; // a trustee's partial decryption matches its public key
pub mod schnorr; // possession of a discrete log
pub mod tally; // an aggregate ciphertext encrypts a declared count

use crate::error::Rejection;
use tracing::debug;

/// Outcome of checking a proof: either accepted, or the first check that failed
pub type Verification = Result<(), Rejection>;

pub(crate) fn ensure(condition: bool, rejection: Rejection) -> Verification {
    if condition {
        return Ok(());
    }
    return Err(rejection);
}

/// Log rejected proofs before handing the outcome back
pub(crate) fn report(proof: &'static str, outcome: Verification) -> Verification {
    if let Err(reason) = outcome {
        debug!(proof, %reason, "proof rejected");
    }
    return outcome;
}
