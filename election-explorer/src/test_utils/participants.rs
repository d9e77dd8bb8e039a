use std::fmt::{Display, Formatter};

use derivative::Derivative;
use serde::Serialize;

use election_core::{DirectedMessage, LeaderIndex, Message, Participant};

/// Instructions for a [`Scripted`] participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) enum TestMessage {
    /// Take the head as the new value and pass the rest on to every other participant.
    Relay(Vec<u32>),
    /// Count up and make every other participant count up too. Never settles.
    Tick,
    /// Commit with the given priority.
    Commit(u32),
    /// Accepted but changes nothing.
    Noop,
    /// Leave the participant without a canonical form.
    Corrupt,
}

impl Message for TestMessage {
    fn interpreter_line(&self, target: LeaderIndex) -> String {
        match self {
            TestMessage::Relay(values) => format!("relay {:?} {{ {} }}", values, target),
            TestMessage::Tick => format!("tick {{ {} }}", target),
            TestMessage::Commit(priority) => format!("commit {} {{ {} }}", priority, target),
            TestMessage::Noop => format!("noop {{ {} }}", target),
            TestMessage::Corrupt => format!("corrupt {{ {} }}", target),
        }
    }
}

/// A participant whose transitions are spelled out by its messages.
#[derive(Derivative, Serialize)]
#[derivative(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Scripted {
    #[derivative(PartialEq = "ignore")]
    #[serde(skip)]
    id: LeaderIndex,
    value: u32,
    committed: bool,
    priority: Option<u32>,
    #[serde(skip)]
    representable: bool,
}

impl Scripted {
    pub fn new(id: LeaderIndex) -> Self {
        Scripted::with_value(id, 0)
    }

    pub fn with_value(id: LeaderIndex, value: u32) -> Self {
        Scripted {
            id,
            value,
            committed: false,
            priority: None,
            representable: true,
        }
    }

    pub fn committed_with(id: LeaderIndex, priority: u32) -> Self {
        Scripted {
            committed: true,
            priority: Some(priority),
            ..Scripted::new(id)
        }
    }
}

impl Participant for Scripted {
    type Message = TestMessage;
    type Priority = u32;

    fn execute(&mut self, msg: &TestMessage, _depth: usize) -> (Option<TestMessage>, bool) {
        if self.committed {
            return (None, false);
        }

        match msg {
            TestMessage::Relay(values) => match values.split_first() {
                None => (None, false),
                Some((head, [])) => {
                    self.value = *head;
                    (None, true)
                }
                Some((head, tail)) => {
                    self.value = *head;
                    (Some(TestMessage::Relay(tail.to_vec())), true)
                }
            },
            TestMessage::Tick => {
                self.value += 1;
                (Some(TestMessage::Tick), true)
            }
            TestMessage::Commit(priority) => {
                self.committed = true;
                self.priority = Some(*priority);
                (None, true)
            }
            TestMessage::Noop => (None, false),
            TestMessage::Corrupt => {
                self.representable = false;
                (None, true)
            }
        }
    }

    fn committed(&self) -> bool {
        self.committed
    }

    fn vote_priority(&self) -> Option<u32> {
        self.priority
    }

    fn canonical_bytes(&self) -> Option<Vec<u8>> {
        if !self.representable {
            return None;
        }
        serde_json::to_vec(self).ok()
    }
}

impl Display for Scripted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{} value {}", self.id, self.value)?;
        if let Some(priority) = self.priority {
            write!(f, " p{}", priority)?;
        }
        if self.committed {
            write!(f, " COMMITTED")?;
        }
        Ok(())
    }
}

pub(crate) fn directed(target: LeaderIndex, msg: TestMessage) -> DirectedMessage<TestMessage> {
    DirectedMessage::new(target, msg)
}

