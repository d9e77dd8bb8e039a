use std::collections::HashSet;

use crate::canonical::GlobalDigest;

/// Global states already expanded during one run.
///
/// Entries are never removed; the cache lives exactly as long as its run.
#[derive(Debug, Default)]
pub struct MirrorCache {
    seen: HashSet<GlobalDigest>,
}

impl MirrorCache {
    pub fn new() -> Self {
        MirrorCache {
            seen: HashSet::with_capacity(10_000),
        }
    }

    /// Remember `digest`.
    ///
    /// # Returns
    /// `true` if the digest is new, `false` if the state is a mirror of one
    /// explored before.
    pub fn insert(&mut self, digest: GlobalDigest) -> bool {
        self.seen.insert(digest)
    }

    pub fn contains(&self, digest: &GlobalDigest) -> bool {
        self.seen.contains(digest)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::canonical::global_digest;
    use crate::test_utils::participants::Scripted;

    use super::*;

    #[test]
    fn second_insert_is_a_mirror() {
        let mut cache = MirrorCache::new();
        let digest = global_digest(&[Scripted::with_value(0, 1), Scripted::with_value(1, 2)]).unwrap();
        let mirrored = global_digest(&[Scripted::with_value(0, 2), Scripted::with_value(1, 1)]).unwrap();

        assert!(cache.is_empty());
        assert!(cache.insert(digest));
        assert!(cache.contains(&mirrored));
        assert!(!cache.insert(mirrored));
        assert_eq!(cache.len(), 1);
    }
}
