use std::fmt::{Debug, Display, Formatter};

use sha2::{Digest, Sha256};
use thiserror::Error;

use election_core::{LeaderIndex, Participant};

/// Content address of the state of every participant in a run.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GlobalDigest([u8; 32]);

impl Display for GlobalDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for GlobalDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GlobalDigest({})", hex::encode(&self.0[..4]))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("participant {0} has no canonical form")]
pub struct Unrepresentable(pub LeaderIndex);

/// Digest the global state of `participants`.
///
/// Each participant's canonical bytes are hashed, the hashes sorted and the
/// concatenation hashed again. The result therefore only depends on the multiset
/// of participant states, never on the order participants are listed in.
///
/// # Returns
/// The digest, or the index of the first participant that cannot be represented.
pub fn global_digest<P: Participant>(participants: &[P]) -> Result<GlobalDigest, Unrepresentable> {
    let mut hashes: Vec<[u8; 32]> = Vec::with_capacity(participants.len());
    for (idx, participant) in participants.iter().enumerate() {
        let bytes = participant.canonical_bytes().ok_or(Unrepresentable(idx))?;
        hashes.push(Sha256::digest(&bytes).into());
    }
    hashes.sort_unstable();

    let mut hasher = Sha256::new();
    for hash in &hashes {
        hasher.update(hash);
    }
    Ok(GlobalDigest(hasher.finalize().into()))
}
