use bimap::BiMap;

use election_core::LeaderIndex;

use crate::identity::{Identity, Priority};
use crate::ElectionError;

/// The authority set of one election: leaders and volunteers, each mapped both
/// ways between identity and position.
///
/// Volunteer `i` of `n` has priority `n - i`, so volunteer 0 is preferred.
#[derive(Debug)]
pub struct Roster {
    leaders: BiMap<Identity, LeaderIndex>,
    volunteers: BiMap<Identity, usize>,
    /// Priority of volunteer 0, i.e. the volunteer count.
    top_priority: u32,
}

impl Roster {
    pub fn new(leader_count: usize, volunteer_count: usize) -> Result<Self, ElectionError> {
        let top_priority =
            u32::try_from(volunteer_count).map_err(|_| ElectionError::TooManyVolunteers(volunteer_count))?;
        let leaders = (0..leader_count)
            .map(|idx| (Identity::leader(idx), idx))
            .collect();
        let volunteers = (0..volunteer_count)
            .map(|idx| (Identity::volunteer(idx), idx))
            .collect();

        Ok(Roster {
            leaders,
            volunteers,
            top_priority,
        })
    }

    pub fn leader_count(&self) -> usize {
        self.leaders.len()
    }

    pub fn volunteer_count(&self) -> usize {
        self.volunteers.len()
    }

    pub fn leader_identity(&self, idx: LeaderIndex) -> Option<Identity> {
        self.leaders.get_by_right(&idx).copied()
    }

    pub fn leader_index(&self, identity: &Identity) -> Option<LeaderIndex> {
        self.leaders.get_by_left(identity).copied()
    }

    pub fn volunteer_index(&self, identity: &Identity) -> Option<usize> {
        self.volunteers.get_by_left(identity).copied()
    }

    pub fn volunteer_priority(&self, idx: usize) -> Priority {
        let rank = u32::try_from(idx).unwrap_or(u32::MAX);
        Priority(self.top_priority.saturating_sub(rank))
    }

    /// Iterate the volunteers in position order.
    pub fn volunteers(&self) -> impl Iterator<Item = (usize, Identity, Priority)> + '_ {
        (0..self.volunteers.len()).filter_map(move |idx| {
            self.volunteers
                .get_by_right(&idx)
                .map(|identity| (idx, *identity, self.volunteer_priority(idx)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_identities_both_ways() {
        let roster = Roster::new(3, 2).unwrap();

        assert_eq!(roster.leader_count(), 3);
        assert_eq!(roster.volunteer_count(), 2);
        for idx in 0..3 {
            let identity = roster.leader_identity(idx).unwrap();
            assert_eq!(roster.leader_index(&identity), Some(idx));
        }
        assert_eq!(roster.leader_identity(3), None);
        assert_eq!(roster.leader_index(&Identity::volunteer(0)), None);
        assert_eq!(roster.volunteer_index(&Identity::volunteer(1)), Some(1));
    }

    #[test]
    fn earlier_volunteers_have_higher_priority() {
        let roster = Roster::new(1, 3).unwrap();
        let volunteers: Vec<_> = roster.volunteers().collect();

        assert_eq!(volunteers.len(), 3);
        assert_eq!(volunteers[0].2, Priority(3));
        assert_eq!(volunteers[2].2, Priority(1));
        assert!(volunteers[0].2 > volunteers[1].2);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn volunteer_count_must_fit_a_priority() {
        let count = u32::MAX as usize + 1;
        assert_eq!(Roster::new(1, count).unwrap_err(), ElectionError::TooManyVolunteers(count));
    }

    #[test]
    fn priority_runs_out_past_the_last_volunteer() {
        let roster = Roster::new(1, 2).unwrap();
        assert_eq!(roster.volunteer_priority(2), Priority(0));
        assert_eq!(roster.volunteer_priority(usize::MAX), Priority(0));
    }
}
