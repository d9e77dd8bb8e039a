use thiserror::Error;

use election_core::LeaderIndex;
use election_sim::ElectionError;

/// Conditions that stop a run.
///
/// Safety violations, limit hits and dead ends are not errors: they are counted
/// in the run statistics and exploration carries on.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// A participant has no canonical form, so the model itself is inconsistent.
    #[error("participant {participant} has no canonical form at depth {depth}, reached by:\n{path}")]
    StateUnrepresentable {
        participant: LeaderIndex,
        depth: usize,
        /// The delivered messages leading to the state, in interpreter notation.
        path: String,
    },
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Election(#[from] ElectionError),
}
