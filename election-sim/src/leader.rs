use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use derivative::Derivative;
use serde::Serialize;
use tracing::trace;

use election_core::{majority, LeaderIndex, Participant};

use crate::election_params::VotingRule;
use crate::identity::{Identity, Priority};
use crate::message::{Ballot, Message};
use crate::roster::Roster;
use crate::ElectionError;

/// One federated leader's view of an election.
///
/// A leader collects volunteers, votes for one of them according to its
/// [`VotingRule`] and commits once a majority of the leaders it has heard from
/// (itself included) vote the same way. A committed leader ignores every later
/// message.
#[derive(Derivative)]
#[derivative(Clone, Debug, PartialEq, Eq)]
pub struct Leader {
    /// Shared and never mutated, so copies of a leader may point at the same roster.
    #[derivative(Debug = "ignore")]
    #[derivative(PartialEq = "ignore")]
    roster: Arc<Roster>,
    index: LeaderIndex,
    identity: Identity,
    rule: VotingRule,
    /// Positions of the volunteers seen so far.
    seen: BTreeSet<usize>,
    current_vote: Option<Ballot>,
    /// Latest ballot received from each peer.
    peer_votes: BTreeMap<LeaderIndex, Ballot>,
    committed: bool,
    /// Path depth of the last state change. Diagnostic only, so two leaders in
    /// the same state reached at different depths still compare equal.
    #[derivative(PartialEq = "ignore")]
    changed_at: Option<usize>,
}

/// The part of a leader's state that decides its future behaviour.
///
/// Leader identity is left out and peer ballots are tallied rather than keyed
/// by signer, so leaders in symmetric positions produce identical bytes.
#[derive(Serialize)]
struct CanonicalLeader<'a> {
    seen: &'a BTreeSet<usize>,
    vote: Option<Ballot>,
    tally: Vec<(Ballot, usize)>,
    committed: bool,
}

impl Leader {
    pub fn new(roster: Arc<Roster>, index: LeaderIndex, rule: VotingRule) -> Result<Self, ElectionError> {
        let identity = roster
            .leader_identity(index)
            .ok_or(ElectionError::UnknownLeader(index))?;

        Ok(Leader {
            roster,
            index,
            identity,
            rule,
            seen: BTreeSet::new(),
            current_vote: None,
            peer_votes: BTreeMap::new(),
            committed: false,
            changed_at: None,
        })
    }

    pub fn index(&self) -> LeaderIndex {
        self.index
    }

    pub fn current_vote(&self) -> Option<Ballot> {
        self.current_vote
    }

    pub fn seen(&self) -> &BTreeSet<usize> {
        &self.seen
    }

    fn on_volunteer(&mut self, volunteer: &Identity, index: usize) -> (Option<Message>, bool) {
        if self.roster.volunteer_index(volunteer) != Some(index) {
            return (None, false);
        }
        if !self.seen.insert(index) {
            return (None, false);
        }

        let vote = self.reconsider();
        self.check_commit();
        (vote, true)
    }

    fn on_vote(&mut self, signer: &Identity, signer_index: LeaderIndex, ballot: Ballot) -> (Option<Message>, bool) {
        if signer_index == self.index || self.roster.leader_index(signer) != Some(signer_index) {
            return (None, false);
        }
        if self.peer_votes.get(&signer_index) == Some(&ballot) {
            return (None, false);
        }

        self.peer_votes.insert(signer_index, ballot);
        self.check_commit();
        (None, true)
    }

    /// Pick a new ballot if the voting rule allows one and it beats the current
    /// vote. Returns the vote to broadcast.
    fn reconsider(&mut self) -> Option<Message> {
        let candidate = match self.rule {
            VotingRule::Patient if self.seen.len() < self.roster.volunteer_count() => None,
            _ => self.best_seen(),
        }?;

        if !candidate.beats(self.current_vote.as_ref()) {
            return None;
        }

        self.current_vote = Some(candidate);
        Some(Message::vote(self.identity, self.index, candidate))
    }

    fn best_seen(&self) -> Option<Ballot> {
        self.seen
            .iter()
            .map(|idx| Ballot::new(*idx, self.roster.volunteer_priority(*idx)))
            .max_by_key(|ballot| ballot.priority)
    }

    fn check_commit(&mut self) {
        if let Some(vote) = self.current_vote {
            let support = 1 + self.peer_votes.values().filter(|ballot| **ballot == vote).count();
            if support >= majority(self.roster.leader_count()) {
                self.committed = true;
            }
        }
    }

    fn canonical(&self) -> CanonicalLeader<'_> {
        let mut tally: BTreeMap<Ballot, usize> = BTreeMap::new();
        for ballot in self.peer_votes.values() {
            *tally.entry(*ballot).or_default() += 1;
        }

        CanonicalLeader {
            seen: &self.seen,
            vote: self.current_vote,
            tally: tally.into_iter().collect(),
            committed: self.committed,
        }
    }
}

impl Participant for Leader {
    type Message = Message;
    type Priority = Priority;

    fn execute(&mut self, msg: &Message, depth: usize) -> (Option<Message>, bool) {
        if self.committed {
            return (None, false);
        }

        let (generated, changed) = match msg {
            Message::Volunteer {
                volunteer, index, ..
            } => self.on_volunteer(volunteer, *index),
            Message::Vote {
                signer,
                signer_index,
                ballot,
            } => self.on_vote(signer, *signer_index, *ballot),
        };

        if changed {
            self.changed_at = Some(depth);
            if self.committed {
                trace!(leader = self.index, depth, vote = ?self.current_vote, "leader committed");
            }
        }
        (generated, changed)
    }

    fn committed(&self) -> bool {
        self.committed
    }

    fn vote_priority(&self) -> Option<Priority> {
        self.current_vote.map(|ballot| ballot.priority)
    }

    fn canonical_bytes(&self) -> Option<Vec<u8>> {
        serde_json::to_vec(&self.canonical()).ok()
    }
}

impl Display for Leader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{} [{}] seen {:?}", self.index, self.identity, self.seen)?;
        match self.current_vote {
            None => write!(f, " vote -")?,
            Some(vote) => write!(f, " vote {}", vote)?,
        }
        write!(f, " peers {{")?;
        for (idx, ballot) in &self.peer_votes {
            write!(f, " L{}:{}", idx, ballot)?;
        }
        write!(f, " }}")?;
        if self.committed {
            write!(f, " COMMITTED")?;
        }
        if let Some(depth) = self.changed_at {
            write!(f, " @{}", depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaders(count: usize, volunteers: usize, rule: VotingRule) -> (Arc<Roster>, Vec<Leader>) {
        let roster = Arc::new(Roster::new(count, volunteers).unwrap());
        let leaders = (0..count)
            .map(|idx| Leader::new(roster.clone(), idx, rule).unwrap())
            .collect();
        (roster, leaders)
    }

    fn volunteer(roster: &Roster, idx: usize) -> Message {
        Message::volunteer(Identity::volunteer(idx), idx, roster.volunteer_priority(idx))
    }

    #[test]
    fn patient_leader_waits_for_every_volunteer() {
        let (roster, mut leaders) = leaders(3, 2, VotingRule::Patient);
        let leader = &mut leaders[0];

        assert_eq!(leader.execute(&volunteer(&roster, 1), 0), (None, true));
        assert_eq!(leader.current_vote(), None);

        let (vote, changed) = leader.execute(&volunteer(&roster, 0), 1);
        assert!(changed);
        let expected = Ballot::new(0, Priority(2));
        assert_eq!(vote, Some(Message::vote(Identity::leader(0), 0, expected)));
        assert_eq!(leader.current_vote(), Some(expected));
    }

    #[test]
    fn repeated_volunteer_is_not_a_change() {
        let (roster, mut leaders) = leaders(3, 2, VotingRule::Patient);
        let leader = &mut leaders[0];

        assert!(leader.execute(&volunteer(&roster, 0), 0).1);
        assert_eq!(leader.execute(&volunteer(&roster, 0), 1), (None, false));
    }

    #[test]
    fn unknown_signers_are_ignored() {
        let (_, mut leaders) = leaders(3, 2, VotingRule::Patient);
        let forged = Message::vote(Identity::volunteer(0), 1, Ballot::new(0, Priority(2)));
        let own = Message::vote(Identity::leader(0), 0, Ballot::new(0, Priority(2)));

        assert_eq!(leaders[0].execute(&forged, 0), (None, false));
        assert_eq!(leaders[0].execute(&own, 0), (None, false));
    }

    #[test]
    fn commits_once_a_majority_agrees() {
        let (roster, mut leaders) = leaders(3, 1, VotingRule::Patient);
        let (vote, _) = leaders[0].execute(&volunteer(&roster, 0), 0);
        let vote = vote.unwrap();

        assert!(!leaders[1].committed());
        leaders[1].execute(&volunteer(&roster, 0), 1);
        assert!(!leaders[1].committed());
        assert_eq!(leaders[1].execute(&vote, 2), (None, true));
        assert!(leaders[1].committed());
        assert_eq!(leaders[1].vote_priority(), Some(Priority(1)));

        // Committed leaders are frozen
        assert_eq!(leaders[1].execute(&volunteer(&roster, 0), 3), (None, false));
    }

    #[test]
    fn eager_leader_revotes_for_a_better_volunteer() {
        let (roster, mut leaders) = leaders(3, 2, VotingRule::Eager);
        let leader = &mut leaders[0];

        let (first, _) = leader.execute(&volunteer(&roster, 1), 0);
        assert_eq!(first, Some(Message::vote(Identity::leader(0), 0, Ballot::new(1, Priority(1)))));

        let (second, _) = leader.execute(&volunteer(&roster, 0), 1);
        assert_eq!(second, Some(Message::vote(Identity::leader(0), 0, Ballot::new(0, Priority(2)))));
    }

    #[test]
    fn clones_are_independent() {
        let (roster, leaders) = leaders(3, 2, VotingRule::Patient);
        let original = leaders[0].clone();
        let mut copy = original.clone();

        copy.execute(&volunteer(&roster, 0), 0);

        assert_ne!(copy, original);
        assert!(original.seen().is_empty());
        assert_eq!(leaders[0], original);
    }

    #[test]
    fn canonical_bytes_ignore_identity_and_depth() {
        let (roster, mut leaders) = leaders(3, 2, VotingRule::Patient);
        leaders[0].execute(&volunteer(&roster, 1), 0);
        leaders[1].execute(&volunteer(&roster, 1), 7);

        assert_eq!(leaders[0].canonical_bytes(), leaders[1].canonical_bytes());
        assert_ne!(leaders[0].canonical_bytes(), leaders[2].canonical_bytes());
    }
}
