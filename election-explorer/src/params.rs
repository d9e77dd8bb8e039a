use serde::{Deserialize, Serialize};

use election_sim::ElectionParams;

use crate::error::ExploreError;

/// Exploration parameters
///
/// Parameters which bound a single exploration run. Loaded from TOML by the
/// command line tool; every field is optional there and falls back to the
/// defaults below.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerParams {
    /// Shape of the simulated election.
    election: ElectionParams,

    /// The maximum number of messages delivered along any one path.
    ///
    /// A call reached after `depth_limit` deliveries is cut off and reported as a
    /// limit hit instead of being expanded.
    depth_limit: usize,

    /// Depth at which limit hits collected below are classified.
    ///
    /// A subtree that hit the limit is a loop if it also contains a solution and a
    /// failure if it does not. `None` lets limit hits propagate to the root
    /// unclassified. Must be below `depth_limit`, since calls at the limit are
    /// cut off before any classification happens.
    loop_horizon: Option<usize>,

    /// Number of solution paths, and separately violation paths, kept for the report.
    max_recorded_paths: usize,

    /// How many message applications between progress lines. Zero disables them.
    progress_interval: u64,
}

impl Default for ExplorerParams {
    fn default() -> Self {
        ExplorerParams {
            election: ElectionParams::default(),
            depth_limit: 100,
            loop_horizon: Some(9),
            max_recorded_paths: 16,
            progress_interval: 50_000,
        }
    }
}

impl ExplorerParams {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn with_election(mut self, election: ElectionParams) -> Self {
        self.election = election;
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_loop_horizon(mut self, loop_horizon: Option<usize>) -> Self {
        self.loop_horizon = loop_horizon;
        self
    }

    pub fn with_max_recorded_paths(mut self, max_recorded_paths: usize) -> Self {
        self.max_recorded_paths = max_recorded_paths;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn election(&self) -> &ElectionParams {
        &self.election
    }
    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }
    pub fn loop_horizon(&self) -> Option<usize> {
        self.loop_horizon
    }
    pub fn max_recorded_paths(&self) -> usize {
        self.max_recorded_paths
    }
    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    /// Reject parameter combinations a run cannot honour.
    pub fn validate(&self) -> Result<(), ExploreError> {
        if self.election.leader_count() == 0 || self.election.volunteer_count() == 0 {
            return Err(ExploreError::InvalidParams(format!(
                "an election needs leaders and volunteers, got {} and {}",
                self.election.leader_count(),
                self.election.volunteer_count()
            )));
        }
        if let Some(horizon) = self.loop_horizon {
            if horizon >= self.depth_limit {
                return Err(ExploreError::InvalidParams(format!(
                    "loop horizon {} must be below the depth limit {}",
                    horizon, self.depth_limit
                )));
            }
        }
        Ok(())
    }
}
