use std::collections::HashMap;

use crate::{MatchId, PlayerId, Role};

/// `Active` is only reached through an external confirmation; the relay
/// never observes whether the peer-to-peer channel came up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    Connecting,
    Active,
}

#[derive(Clone, Debug)]
pub struct Match {
    pub match_id: MatchId,
    pub host: PlayerId,
    pub guest: PlayerId,
    pub status: MatchStatus,
}

impl Match {
    pub fn role_of(
        &self,
        player_id: &PlayerId,
    ) -> Option<Role> {
        if *player_id == self.host {
            Some(Role::Host)
        } else if *player_id == self.guest {
            Some(Role::Guest)
        } else {
            None
        }
    }

    pub fn opponent_of(
        &self,
        player_id: &PlayerId,
    ) -> Option<&PlayerId> {
        match self.role_of(player_id)? {
            Role::Host => Some(&self.guest),
            Role::Guest => Some(&self.host),
        }
    }
}

/// Live pairings, indexed by match id and by each participant.
#[derive(Default, Debug)]
pub struct MatchTable {
    matches: HashMap<MatchId, Match>,
    by_player: HashMap<PlayerId, MatchId>,
}

impl MatchTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        host: PlayerId,
        guest: PlayerId,
    ) -> &Match {
        let match_id = loop {
            let id = MatchId::new();
            if !self.matches.contains_key(&id) {
                break id;
            }
        };

        self.by_player.insert(host.clone(), match_id.clone());
        self.by_player.insert(guest.clone(), match_id.clone());
        self.matches.entry(match_id.clone()).or_insert(Match {
            match_id,
            host,
            guest,
            status: MatchStatus::Connecting,
        })
    }

    pub fn get(
        &self,
        match_id: &MatchId,
    ) -> Option<&Match> {
        self.matches.get(match_id)
    }

    pub fn match_of(
        &self,
        player_id: &PlayerId,
    ) -> Option<&Match> {
        self.by_player.get(player_id).and_then(|id| self.matches.get(id))
    }

    pub fn contains_player(
        &self,
        player_id: &PlayerId,
    ) -> bool {
        self.by_player.contains_key(player_id)
    }

    pub fn set_status(
        &mut self,
        match_id: &MatchId,
        status: MatchStatus,
    ) -> bool {
        match self.matches.get_mut(match_id) {
            Some(m) => {
                m.status = status;
                true
            }
            None => false,
        }
    }

    /// Drops the match and both participants' index entries.
    pub fn remove(
        &mut self,
        match_id: &MatchId,
    ) -> Option<Match> {
        let removed = self.matches.remove(match_id)?;
        self.by_player.remove(&removed.host);
        self.by_player.remove(&removed.guest);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_indexes_both_participants() {
        let mut table = MatchTable::new();
        let match_id = table.create("a".into(), "b".into()).match_id.clone();

        assert_eq!(table.match_of(&"a".into()).map(|m| &m.match_id), Some(&match_id));
        assert_eq!(table.match_of(&"b".into()).map(|m| &m.match_id), Some(&match_id));
        assert_eq!(table.get(&match_id).map(|m| m.status), Some(MatchStatus::Connecting));
    }

    #[test]
    fn opponent_and_role_lookup() {
        let mut table = MatchTable::new();
        let m = table.create("a".into(), "b".into());

        assert_eq!(m.role_of(&"a".into()), Some(Role::Host));
        assert_eq!(m.role_of(&"b".into()), Some(Role::Guest));
        assert_eq!(m.opponent_of(&"b".into()), Some(&PlayerId::from("a")));
        assert_eq!(m.opponent_of(&"x".into()), None);
    }

    #[test]
    fn remove_clears_player_index() {
        let mut table = MatchTable::new();
        let match_id = table.create("a".into(), "b".into()).match_id.clone();

        assert!(table.remove(&match_id).is_some());
        assert!(!table.contains_player(&"a".into()));
        assert!(!table.contains_player(&"b".into()));
        assert!(table.remove(&match_id).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn match_ids_are_distinct() {
        let mut table = MatchTable::new();
        let first = table.create("a".into(), "b".into()).match_id.clone();
        let second = table.create("c".into(), "d".into()).match_id.clone();

        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
    }
}
