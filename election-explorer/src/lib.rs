//! Exhaustive exploration of a leader election.
//!
//! A [`Run`] delivers the pending messages of an election to its participants in
//! every possible order, down to a depth limit. States already explored are pruned
//! through their order independent [`GlobalDigest`], and every call is classified
//! as a safe majority, a safety violation, a mirror, a limit hit or a dead end. The
//! counts end up in a [`RunSummary`].

use election_sim::{new_run, Message};

pub mod canonical;
pub mod error;
pub mod explorer;
pub mod mirror;
pub mod params;
pub mod report;
pub mod stats;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_utils;

pub use canonical::{global_digest, GlobalDigest, Unrepresentable};
pub use error::ExploreError;
pub use explorer::{Outcome, RecordedPath, Run, RunReport};
pub use mirror::MirrorCache;
pub use params::ExplorerParams;
pub use stats::{DepthHistogram, RunStatistics, RunSummary};
pub use terminal::{evaluate, Verdict};

/// Bootstrap the election described by `params` and explore it.
pub fn explore_election(params: &ExplorerParams) -> Result<RunReport<Message>, ExploreError> {
    params.validate()?;
    let (mut leaders, queue) = new_run(params.election())?;
    Run::new(params).explore(&queue, &mut leaders)
}

#[cfg(test)]
mod tests {
    use election_sim::ElectionParams;

    use super::*;

    #[test]
    fn explores_a_small_election() {
        let params = ExplorerParams::default().with_election(ElectionParams::new(3, 1));
        let report = explore_election(&params).unwrap();

        assert!(report.summary.solutions >= 1);
        assert_eq!(report.summary.violations, 0);
        assert!(report.distinct_states > 0);
    }

    #[test]
    fn rejects_an_election_without_volunteers() {
        let params = ExplorerParams::default().with_election(ElectionParams::new(3, 0));
        assert!(matches!(explore_election(&params), Err(ExploreError::InvalidParams(_))));
    }
}
