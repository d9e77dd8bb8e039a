//! A small simulated leader election, driven one delivered message at a time.
//!
//! Leaders learn about volunteers, vote for one of them and commit once a majority
//! agrees. The model only exists to give the explorer something to explore; it
//! performs no signing and keeps no history beyond what decides its next step.

use std::sync::Arc;

use thiserror::Error;

use election_core::{DirectedMessage, LeaderIndex};

pub mod election_params;
pub mod identity;
pub mod leader;
pub mod message;
pub mod roster;

pub use election_params::{ElectionParams, VotingRule};
pub use identity::{Identity, Priority};
pub use leader::Leader;
pub use message::{Ballot, Message};
pub use roster::Roster;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ElectionError {
    #[error("an election needs at least one leader")]
    NoLeaders,
    #[error("an election needs at least one volunteer")]
    NoVolunteers,
    #[error("{0} volunteers do not fit the priority range")]
    TooManyVolunteers(usize),
    #[error("leader {0} is not in the roster")]
    UnknownLeader(LeaderIndex),
}

/// Build the leaders of a fresh election and the messages that kick it off.
///
/// # Params
/// - params: Number of leaders and volunteers, and the voting rule.
///
/// # Returns
/// One [`Leader`] per federated server, and one volunteer message addressed to every
/// leader for each volunteer, ordered volunteer by volunteer.
pub fn new_run(params: &ElectionParams) -> Result<(Vec<Leader>, Vec<DirectedMessage<Message>>), ElectionError> {
    if params.leader_count() == 0 {
        return Err(ElectionError::NoLeaders);
    }
    if params.volunteer_count() == 0 {
        return Err(ElectionError::NoVolunteers);
    }

    let roster = Arc::new(Roster::new(params.leader_count(), params.volunteer_count())?);
    let leaders = (0..params.leader_count())
        .map(|idx| Leader::new(roster.clone(), idx, params.voting_rule()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut msgs = Vec::with_capacity(params.leader_count() * params.volunteer_count());
    for (idx, volunteer, priority) in roster.volunteers() {
        for leader in &leaders {
            msgs.push(DirectedMessage::new(
                leader.index(),
                Message::volunteer(volunteer, idx, priority),
            ));
        }
    }

    Ok((leaders, msgs))
}
