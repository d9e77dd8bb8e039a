use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Position of a participant in the run's participant vector.
pub type LeaderIndex = usize;

/// An already-decoded election message.
pub trait Message: Clone + Debug {
    /// Render this message, delivered to `target`, as one line of the replay
    /// interpreter notation.
    fn interpreter_line(&self, target: LeaderIndex) -> String;
}

/// One simulated leader running an instance of the election protocol.
///
/// `Clone` must produce an independent copy: mutating the copy can never be
/// observed through the original, and vice versa. Immutable data may be shared.
/// `Display` renders a one line dump used in diagnostics.
pub trait Participant: Clone + Display {
    type Message: Message;
    type Priority: Eq + Copy + Debug;

    /// Apply `msg` to this participant.
    ///
    /// # Params
    /// - msg: The message being delivered.
    /// - depth: How many messages were delivered before this one on the current path.
    ///
    /// # Returns
    /// A message to broadcast to every other participant, if any, and whether the
    /// participant's state changed.
    fn execute(&mut self, msg: &Self::Message, depth: usize) -> (Option<Self::Message>, bool);

    /// Whether this participant has finalized its vote. Never reverts once set.
    fn committed(&self) -> bool;

    /// Priority of the current vote, or `None` if the participant has not voted.
    fn vote_priority(&self) -> Option<Self::Priority>;

    /// A canonical byte form of the state, or `None` if it cannot be represented.
    fn canonical_bytes(&self) -> Option<Vec<u8>>;
}

/// Smallest strict majority of `participant_count` participants.
pub fn majority(participant_count: usize) -> usize {
    participant_count / 2 + 1
}

/// A message addressed to a single participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DirectedMessage<M> {
    target: LeaderIndex,
    msg: M,
}

impl<M> DirectedMessage<M> {
    pub fn new(target: LeaderIndex, msg: M) -> Self {
        DirectedMessage { target, msg }
    }

    pub fn target(&self) -> LeaderIndex {
        self.target
    }

    pub fn msg(&self) -> &M {
        &self.msg
    }
}

impl<M: Message> Display for DirectedMessage<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg.interpreter_line(self.target))
    }
}

/// Address `msg` to every participant except `from`.
pub fn broadcast<M: Clone>(
    msg: &M,
    from: LeaderIndex,
    participant_count: usize,
) -> impl Iterator<Item = DirectedMessage<M>> + '_ {
    (0..participant_count)
        .filter(move |idx| *idx != from)
        .map(move |idx| DirectedMessage::new(idx, msg.clone()))
}
