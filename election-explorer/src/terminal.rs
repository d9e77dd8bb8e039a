use election_core::{majority, LeaderIndex, Participant};

/// Where a set of participants stands with respect to deciding the election.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict<Pr> {
    /// Not enough participants have committed.
    Unresolved,
    /// A majority committed and every committed participant agrees.
    SafeMajority { priority: Option<Pr>, committed: usize },
    /// Two committed participants disagree. The protocol is broken, but the run
    /// keeps going to see where it ends up.
    SafetyViolation {
        first: LeaderIndex,
        first_priority: Option<Pr>,
        second: LeaderIndex,
        second_priority: Option<Pr>,
    },
}

/// Evaluate whether `participants` reached a decision.
///
/// Every committed participant is compared against the first committed one
/// found; the first mismatch is reported as a violation.
pub fn evaluate<P: Participant>(participants: &[P]) -> Verdict<P::Priority> {
    let mut first: Option<(LeaderIndex, Option<P::Priority>)> = None;
    let mut committed = 0;

    for (idx, participant) in participants.iter().enumerate() {
        if !participant.committed() {
            continue;
        }
        committed += 1;
        let priority = participant.vote_priority();
        match first {
            None => first = Some((idx, priority)),
            Some((first_idx, first_priority)) if first_priority != priority => {
                return Verdict::SafetyViolation {
                    first: first_idx,
                    first_priority,
                    second: idx,
                    second_priority: priority,
                };
            }
            Some(_) => {}
        }
    }

    match first {
        Some((_, priority)) if committed >= majority(participants.len()) => {
            Verdict::SafeMajority { priority, committed }
        }
        _ => Verdict::Unresolved,
    }
}
