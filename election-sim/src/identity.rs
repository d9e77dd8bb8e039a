use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 32 byte identity of a leader or volunteer.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Identity([u8; 32]);

impl Identity {
    pub fn leader(index: usize) -> Self {
        Self::derive("leader", index)
    }

    pub fn volunteer(index: usize) -> Self {
        Self::derive("volunteer", index)
    }

    fn derive(role: &str, index: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(role.as_bytes());
        hasher.update(b"-");
        hasher.update((index as u64).to_be_bytes());
        Identity(hasher.finalize().into())
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..3]))
    }
}

impl Debug for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identity({})", self)
    }
}

/// Rank of a volunteer. Higher wins.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Priority(pub u32);

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_are_stable_and_role_separated() {
        assert_eq!(Identity::leader(1), Identity::leader(1));
        assert_ne!(Identity::leader(1), Identity::leader(2));
        assert_ne!(Identity::leader(1), Identity::volunteer(1));
    }

    #[test]
    fn display_is_short_hex() {
        assert_eq!(Identity::leader(0).to_string().len(), 6);
    }
}
