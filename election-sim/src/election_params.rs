use serde::{Deserialize, Serialize};

/// How a leader chooses the volunteer it votes for.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingRule {
    /// Wait until every volunteer has been seen, then vote for the best one.
    #[default]
    Patient,
    /// Vote for the best volunteer seen so far and re-vote whenever a better
    /// one shows up. Two leaders can commit on different volunteers.
    Eager,
}

/// Election parameters
///
/// Shape of a simulated election: who takes part and how leaders vote.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionParams {
    /// Number of federated leaders taking part in the election.
    leader_count: usize,

    /// Number of audit servers volunteering to replace the faulted leader.
    volunteer_count: usize,

    /// Rule every leader uses to pick its vote.
    voting_rule: VotingRule,
}

impl Default for ElectionParams {
    fn default() -> Self {
        ElectionParams {
            leader_count: 5,
            volunteer_count: 2,
            voting_rule: VotingRule::Patient,
        }
    }
}

impl ElectionParams {
    pub fn new(leader_count: usize, volunteer_count: usize) -> Self {
        ElectionParams {
            leader_count,
            volunteer_count,
            ..Default::default()
        }
    }

    pub fn with_voting_rule(mut self, voting_rule: VotingRule) -> Self {
        self.voting_rule = voting_rule;
        self
    }

    pub fn leader_count(&self) -> usize {
        self.leader_count
    }
    pub fn volunteer_count(&self) -> usize {
        self.volunteer_count
    }
    pub fn voting_rule(&self) -> VotingRule {
        self.voting_rule
    }
}
