use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use election_core::LeaderIndex;

use crate::identity::{Identity, Priority};

/// A leader's choice of volunteer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Ballot {
    pub volunteer: usize,
    pub priority: Priority,
}

impl Ballot {
    pub fn new(volunteer: usize, priority: Priority) -> Self {
        Ballot {
            volunteer,
            priority,
        }
    }

    /// Whether this ballot should replace `current`.
    pub fn beats(&self, current: Option<&Ballot>) -> bool {
        match current {
            None => true,
            Some(current) => self.priority > current.priority,
        }
    }
}

impl Display for Ballot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}({})", self.volunteer, self.priority)
    }
}

/// Messages exchanged during an election.
///
/// Positions in the roster are resolved when a message is built, so rendering a
/// message never needs a lookup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// An audit server offering to replace the faulted leader.
    Volunteer {
        volunteer: Identity,
        index: usize,
        priority: Priority,
    },
    /// A leader announcing the volunteer it votes for.
    Vote {
        signer: Identity,
        signer_index: LeaderIndex,
        ballot: Ballot,
    },
}

impl Message {
    pub fn volunteer(volunteer: Identity, index: usize, priority: Priority) -> Self {
        Message::Volunteer {
            volunteer,
            index,
            priority,
        }
    }

    pub fn vote(signer: Identity, signer_index: LeaderIndex, ballot: Ballot) -> Self {
        Message::Vote {
            signer,
            signer_index,
            ballot,
        }
    }
}

impl election_core::Message for Message {
    fn interpreter_line(&self, target: LeaderIndex) -> String {
        match self {
            Message::Volunteer { index, .. } => format!("{} {{ {} }} <-v", index, target),
            Message::Vote {
                signer_index,
                ballot,
                ..
            } => format!("{{ {} }} {} {{ {} }} <-o", signer_index, ballot.volunteer, target),
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Volunteer {
                volunteer,
                index,
                priority,
            } => write!(f, "Volunteer v{} [{}] {}", index, volunteer, priority),
            Message::Vote {
                signer,
                signer_index,
                ballot,
            } => write!(f, "Vote L{} [{}] for {}", signer_index, signer, ballot),
        }
    }
}
