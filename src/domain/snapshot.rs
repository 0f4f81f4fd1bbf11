use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::models::{
    Bye, Pairing, PairingKind, Player, PlayerAvailability, PlayerId, PrizeWinner, Round,
    RoundId, Season, SeasonPlayer, SeasonPrize, Team, TeamId, TeamPairing, TeamPairingId,
};

/// Every record of one season, as exchanged with the repository and the
/// import document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonData {
    pub season: Season,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub season_players: Vec<SeasonPlayer>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub team_pairings: Vec<TeamPairing>,
    #[serde(default)]
    pub pairings: Vec<Pairing>,
    #[serde(default)]
    pub byes: Vec<Bye>,
    #[serde(default)]
    pub availability: Vec<PlayerAvailability>,
    #[serde(default)]
    pub prizes: Vec<SeasonPrize>,
    #[serde(default)]
    pub prize_winners: Vec<PrizeWinner>,
}

/// Immutable view of one season used for a single computation
pub struct SeasonSnapshot {
    data: SeasonData,
    players: HashMap<PlayerId, Player>,
    rounds_by_id: HashMap<RoundId, usize>,
    team_pairings: HashMap<TeamPairingId, TeamPairing>,
}

impl SeasonSnapshot {
    /// Build a snapshot, ordering rounds by number. Records that point outside
    /// the season are rejected.
    pub fn new(mut data: SeasonData) -> Result<Self> {
        data.rounds.sort_by_key(|r| r.number);

        let players: HashMap<PlayerId, Player> =
            data.players.iter().map(|p| (p.id, p.clone())).collect();
        let rounds_by_id: HashMap<RoundId, usize> = data
            .rounds
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id, idx))
            .collect();
        let team_pairings: HashMap<TeamPairingId, TeamPairing> = data
            .team_pairings
            .iter()
            .map(|tp| (tp.id, tp.clone()))
            .collect();

        let snapshot = Self {
            data,
            players,
            rounds_by_id,
            team_pairings,
        };
        snapshot.check_references()?;
        Ok(snapshot)
    }

    fn check_references(&self) -> Result<()> {
        let team_ids: HashSet<TeamId> = self.data.teams.iter().map(|t| t.id).collect();

        for sp in &self.data.season_players {
            self.require_player(sp.player_id, "season player")?;
        }
        for tp in &self.data.team_pairings {
            self.require_round(tp.round_id, "team pairing", tp.id)?;
            for team in [tp.white_team, tp.black_team] {
                if !team_ids.contains(&team) {
                    bail!("Team pairing {} references team {} outside the season", tp.id, team);
                }
            }
        }
        for pairing in &self.data.pairings {
            match pairing.kind {
                PairingKind::Lone { round_id, .. } => {
                    self.require_round(round_id, "pairing", pairing.id)?
                }
                PairingKind::Team { team_pairing_id, .. } => {
                    if !self.team_pairings.contains_key(&team_pairing_id) {
                        bail!(
                            "Pairing {} references team pairing {} outside the season",
                            pairing.id,
                            team_pairing_id
                        );
                    }
                }
            }
            for player in [pairing.white, pairing.black].into_iter().flatten() {
                self.require_player(player, "pairing")?;
            }
        }
        for bye in &self.data.byes {
            self.require_round(bye.round_id, "bye", bye.id)?;
            self.require_player(bye.player_id, "bye")?;
        }
        Ok(())
    }

    fn require_round(&self, round_id: RoundId, what: &str, id: i64) -> Result<()> {
        if !self.rounds_by_id.contains_key(&round_id) {
            bail!("{} {} references round {} outside the season", what, id, round_id);
        }
        Ok(())
    }

    fn require_player(&self, player_id: PlayerId, what: &str) -> Result<()> {
        if !self.players.contains_key(&player_id) {
            bail!("{} references unknown player {}", what, player_id);
        }
        Ok(())
    }

    pub fn season(&self) -> &Season {
        &self.data.season
    }

    pub fn data(&self) -> &SeasonData {
        &self.data
    }

    /// Rounds in ascending number order
    pub fn rounds(&self) -> &[Round] {
        &self.data.rounds
    }

    pub fn round(&self, round_id: RoundId) -> Option<&Round> {
        self.rounds_by_id.get(&round_id).map(|&idx| &self.data.rounds[idx])
    }

    pub fn round_by_number(&self, number: i32) -> Option<&Round> {
        self.data.rounds.iter().find(|r| r.number == number)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn players(&self) -> &HashMap<PlayerId, Player> {
        &self.players
    }

    pub fn season_players(&self) -> &[SeasonPlayer] {
        &self.data.season_players
    }

    pub fn teams(&self) -> &[Team] {
        &self.data.teams
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.data.teams.iter().find(|t| t.id == team_id)
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.data.pairings
    }

    pub fn byes(&self) -> &[Bye] {
        &self.data.byes
    }

    pub fn team_pairings(&self) -> &[TeamPairing] {
        &self.data.team_pairings
    }

    pub fn prizes(&self) -> &[SeasonPrize] {
        &self.data.prizes
    }

    pub fn prize_winners(&self) -> &[PrizeWinner] {
        &self.data.prize_winners
    }

    /// Individual pairings of a round in pairing order
    pub fn lone_pairings_in_round(&self, round_id: RoundId) -> Vec<&Pairing> {
        let mut pairings: Vec<(i32, &Pairing)> = self
            .data
            .pairings
            .iter()
            .filter_map(|p| match p.kind {
                PairingKind::Lone {
                    round_id: r,
                    pairing_order,
                } if r == round_id => Some((pairing_order, p)),
                _ => None,
            })
            .collect();
        pairings.sort_by_key(|(order, _)| *order);
        pairings.into_iter().map(|(_, p)| p).collect()
    }

    pub fn byes_in_round(&self, round_id: RoundId) -> Vec<&Bye> {
        self.data
            .byes
            .iter()
            .filter(|b| b.round_id == round_id)
            .collect()
    }

    pub fn team_pairings_in_round(&self, round_id: RoundId) -> Vec<&TeamPairing> {
        let mut pairings: Vec<&TeamPairing> = self
            .data
            .team_pairings
            .iter()
            .filter(|tp| tp.round_id == round_id)
            .collect();
        pairings.sort_by_key(|tp| tp.pairing_order);
        pairings
    }

    /// Board pairings of one team match ordered by board
    pub fn board_pairings(&self, team_pairing_id: TeamPairingId) -> Vec<&Pairing> {
        let mut boards: Vec<(i32, &Pairing)> = self
            .data
            .pairings
            .iter()
            .filter_map(|p| match p.kind {
                PairingKind::Team {
                    team_pairing_id: tp,
                    board_number,
                } if tp == team_pairing_id => Some((board_number, p)),
                _ => None,
            })
            .collect();
        boards.sort_by_key(|(board, _)| *board);
        boards.into_iter().map(|(_, p)| p).collect()
    }

    /// Pairings that belong to a team match
    pub fn team_board_pairings(&self) -> Vec<&Pairing> {
        self.data
            .pairings
            .iter()
            .filter(|p| matches!(p.kind, PairingKind::Team { .. }))
            .collect()
    }

    pub fn active_players(&self) -> HashSet<PlayerId> {
        self.data
            .season_players
            .iter()
            .filter(|sp| sp.is_active)
            .map(|sp| sp.player_id)
            .collect()
    }

    pub fn unavailable_players(&self, round_id: RoundId) -> HashSet<PlayerId> {
        self.data
            .availability
            .iter()
            .filter(|a| a.round_id == round_id && !a.is_available)
            .map(|a| a.player_id)
            .collect()
    }

    pub fn username(&self, player_id: PlayerId) -> &str {
        self.players
            .get(&player_id)
            .map(|p| p.username.as_str())
            .unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SeasonBuilder;

    #[test]
    fn test_rounds_are_ordered_by_number() {
        let mut builder = SeasonBuilder::lone(3);
        builder.shuffle_rounds();
        let snapshot = builder.build();

        let numbers: Vec<i32> = snapshot.rounds().iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_pairing_outside_season_is_rejected() {
        let mut builder = SeasonBuilder::lone(1);
        let a = builder.player("alice", Some(1800));
        let b = builder.player("bob", Some(1700));
        builder.pairing_in_round_id(999, Some(a), Some(b), "1-0");

        let err = SeasonSnapshot::new(builder.into_data()).err().unwrap();
        assert!(err.to_string().contains("outside the season"));
    }

    #[test]
    fn test_unavailable_players_per_round() {
        let mut builder = SeasonBuilder::team(2, 2);
        let a = builder.player("alice", None);
        let b = builder.player("bob", None);
        builder.availability(1, a, false);
        builder.availability(1, b, true);
        builder.availability(2, b, false);
        let snapshot = builder.build();

        let round1 = snapshot.round_by_number(1).unwrap().id;
        assert_eq!(snapshot.unavailable_players(round1), HashSet::from([a]));
    }
}
