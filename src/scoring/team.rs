use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::standings::effective_mode;
use super::types::{Points, ResultType, StandingsMode, TeamRankLookup};
use crate::config::settings::ScoringSettings;
use crate::domain::{Color, PlayerId, Round, SeasonSnapshot, Team, TeamId, TeamPairing};

/// Game points and wins of both sides of one team match
#[derive(Debug, Clone)]
pub struct MatchTally<'a> {
    pub team_pairing: &'a TeamPairing,
    pub white_points: Points,
    pub black_points: Points,
    white_wins: u32,
    black_wins: u32,
}

impl<'a> MatchTally<'a> {
    pub fn tally(snapshot: &'a SeasonSnapshot, team_pairing: &'a TeamPairing) -> Self {
        let mut tally = Self {
            team_pairing,
            white_points: Decimal::ZERO,
            black_points: Decimal::ZERO,
            white_wins: 0,
            black_wins: 0,
        };

        for pairing in snapshot.board_pairings(team_pairing.id) {
            let Some(board) = pairing.board_number() else {
                continue;
            };
            for color in [Color::White, Color::Black] {
                let Some(score) = pairing.score(color) else {
                    continue;
                };
                let won = u32::from(score == Decimal::ONE);
                if team_pairing.team_for(board, color) == team_pairing.white_team {
                    tally.white_points += score;
                    tally.white_wins += won;
                } else {
                    tally.black_points += score;
                    tally.black_wins += won;
                }
            }
        }
        tally
    }

    /// (own, opponent) game points for a team playing in this match
    pub fn points_of(&self, team_id: TeamId) -> Option<(Points, Points)> {
        if team_id == self.team_pairing.white_team {
            Some((self.white_points, self.black_points))
        } else if team_id == self.team_pairing.black_team {
            Some((self.black_points, self.white_points))
        } else {
            None
        }
    }

    fn wins_of(&self, team_id: TeamId) -> u32 {
        if team_id == self.team_pairing.white_team {
            self.white_wins
        } else if team_id == self.team_pairing.black_team {
            self.black_wins
        } else {
            0
        }
    }
}

fn completed_tallies(snapshot: &SeasonSnapshot) -> Vec<MatchTally<'_>> {
    snapshot
        .team_pairings()
        .iter()
        .filter(|tp| snapshot.round(tp.round_id).is_some_and(|r| r.is_completed))
        .map(|tp| MatchTally::tally(snapshot, tp))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team_id: TeamId,
    pub matches_played: u32,
    pub match_points: Points,
    pub game_points: Points,
    pub head_to_head: Points,
    pub games_won: u32,
    pub sonneborn_berger: Points,
}

impl TeamScore {
    fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            ..Self::default()
        }
    }

    pub fn sort_key(&self) -> (Points, Points, Points, u32, Points) {
        (
            self.match_points,
            self.game_points,
            self.head_to_head,
            self.games_won,
            self.sonneborn_berger,
        )
    }
}

/// Scores of every team from completed matches, in team order
pub fn compute_team_scores(snapshot: &SeasonSnapshot, scoring: &ScoringSettings) -> Vec<TeamScore> {
    let tallies = completed_tallies(snapshot);
    let mut scores: Vec<TeamScore> = snapshot.teams().iter().map(|t| TeamScore::new(t.id)).collect();

    for score in scores.iter_mut() {
        for tally in &tallies {
            let Some((own, opponent)) = tally.points_of(score.team_id) else {
                continue;
            };
            score.matches_played += 1;
            score.match_points += scoring.match_points(own, opponent);
            score.game_points += own;
            score.games_won += tally.wins_of(score.team_id);
        }
    }

    let totals: HashMap<TeamId, (Points, Points)> = scores
        .iter()
        .map(|s| (s.team_id, (s.match_points, s.game_points)))
        .collect();

    for score in scores.iter_mut() {
        let own_total = totals.get(&score.team_id).copied();
        for tally in &tallies {
            let Some((own, opponent_points)) = tally.points_of(score.team_id) else {
                continue;
            };
            let Some(opponent) = tally.team_pairing.opponent_of(score.team_id) else {
                continue;
            };
            let opponent_total = totals.get(&opponent).copied();

            if let Some((opponent_match_points, _)) = opponent_total {
                score.sonneborn_berger +=
                    opponent_match_points * result_factor(own, opponent_points);
            }
            if own_total.is_some() && opponent_total == own_total {
                score.head_to_head += scoring.match_points(own, opponent_points);
            }
        }
    }

    scores
}

fn result_factor(own: Points, opponent: Points) -> Decimal {
    match ResultType::from_match(own, opponent) {
        ResultType::Win => Decimal::ONE,
        ResultType::Draw => Decimal::new(5, 1),
        _ => Decimal::ZERO,
    }
}

/// One entry of a team's trajectory
#[derive(Debug, Clone)]
pub struct TeamRoundScore<'a> {
    pub round: &'a Round,
    pub result: ResultType,
    pub opponent: Option<TeamId>,
    pub opponent_rank: Option<usize>,
    pub game_points: Points,
    pub opponent_game_points: Points,
    pub cumulative_match_points: Points,
    pub cumulative_game_points: Points,
}

pub fn team_round_scores<'a>(
    team_id: TeamId,
    snapshot: &'a SeasonSnapshot,
    ranks: &TeamRankLookup,
    include_current: bool,
    scoring: &ScoringSettings,
) -> Vec<TeamRoundScore<'a>> {
    let mut cumulative_match_points = Decimal::ZERO;
    let mut cumulative_game_points = Decimal::ZERO;
    let mut entries = Vec::with_capacity(snapshot.rounds().len());

    for round in snapshot.rounds() {
        let mut entry = TeamRoundScore {
            round,
            result: ResultType::Upcoming,
            opponent: None,
            opponent_rank: None,
            game_points: Decimal::ZERO,
            opponent_game_points: Decimal::ZERO,
            cumulative_match_points,
            cumulative_game_points,
        };
        if !round.is_visible(include_current) {
            entries.push(entry);
            continue;
        }

        let team_pairing = snapshot
            .team_pairings_in_round(round.id)
            .into_iter()
            .find(|tp| tp.opponent_of(team_id).is_some());
        let Some(team_pairing) = team_pairing else {
            entry.result = ResultType::NoGame;
            entries.push(entry);
            continue;
        };

        let tally = MatchTally::tally(snapshot, team_pairing);
        let (own, opponent_points) = tally.points_of(team_id).unwrap_or_default();
        cumulative_game_points += own;
        entry.result = if round.is_completed {
            cumulative_match_points += scoring.match_points(own, opponent_points);
            ResultType::from_match(own, opponent_points)
        } else {
            ResultType::Pending
        };

        entry.opponent = team_pairing.opponent_of(team_id);
        entry.opponent_rank = entry.opponent.and_then(|o| ranks.get(&o).copied());
        entry.game_points = own;
        entry.opponent_game_points = opponent_points;
        entry.cumulative_match_points = cumulative_match_points;
        entry.cumulative_game_points = cumulative_game_points;
        entries.push(entry);
    }
    entries
}

#[derive(Debug, Clone)]
pub struct TeamStanding<'a> {
    pub rank: usize,
    pub team: &'a Team,
    pub score: TeamScore,
    pub round_scores: Vec<TeamRoundScore<'a>>,
}

pub fn team_standings<'a>(
    snapshot: &'a SeasonSnapshot,
    mode: StandingsMode,
    include_current: bool,
    scoring: &ScoringSettings,
) -> Vec<TeamStanding<'a>> {
    let mut scored: Vec<(&'a Team, TeamScore)> = compute_team_scores(snapshot, scoring)
        .into_iter()
        .filter_map(|s| snapshot.team(s.team_id).map(|t| (t, s)))
        .collect();

    match effective_mode(snapshot.season(), mode) {
        StandingsMode::Seed => scored.sort_by_key(|(team, _)| team.number),
        StandingsMode::Pairing | StandingsMode::Final => {
            scored.sort_by(|(_, a), (_, b)| b.sort_key().cmp(&a.sort_key()))
        }
    }

    let ranks: TeamRankLookup = scored
        .iter()
        .enumerate()
        .map(|(idx, (team, _))| (team.id, idx + 1))
        .collect();
    debug!("Ranked {} teams in {} mode", scored.len(), mode.as_str());

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (team, score))| TeamStanding {
            rank: idx + 1,
            team,
            round_scores: team_round_scores(team.id, snapshot, &ranks, include_current, scoring),
            score,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossCell {
    pub game_points: Points,
    pub opponent_game_points: Points,
}

/// Row of the team crosstable; cells follow the same team order as the rows
#[derive(Debug, Clone)]
pub struct CrossRow<'a> {
    pub team: &'a Team,
    pub cells: Vec<Option<CrossCell>>,
}

pub fn cross_scores(snapshot: &SeasonSnapshot) -> Vec<CrossRow<'_>> {
    let mut totals: HashMap<(TeamId, TeamId), CrossCell> = HashMap::new();
    for tally in completed_tallies(snapshot) {
        let tp = tally.team_pairing;
        for (team, opponent) in [(tp.white_team, tp.black_team), (tp.black_team, tp.white_team)] {
            let Some((own, against)) = tally.points_of(team) else {
                continue;
            };
            let cell = totals.entry((team, opponent)).or_insert(CrossCell {
                game_points: Decimal::ZERO,
                opponent_game_points: Decimal::ZERO,
            });
            cell.game_points += own;
            cell.opponent_game_points += against;
        }
    }

    let mut teams: Vec<&Team> = snapshot.teams().iter().collect();
    teams.sort_by_key(|t| t.number);

    teams
        .iter()
        .map(|&team| CrossRow {
            team,
            cells: teams
                .iter()
                .map(|other| totals.get(&(team.id, other.id)).copied())
                .collect(),
        })
        .collect()
}

/// Games each player has played for a team, across every round
pub fn team_game_counts(snapshot: &SeasonSnapshot, team_id: TeamId) -> HashMap<PlayerId, usize> {
    let mut counts = HashMap::new();
    for tp in snapshot.team_pairings() {
        if tp.opponent_of(team_id).is_none() {
            continue;
        }
        for pairing in snapshot.board_pairings(tp.id) {
            let player = pairing
                .board_number()
                .and_then(|board| tp.color_for(board, team_id))
                .and_then(|color| pairing.player(color));
            if let Some(player) = player {
                *counts.entry(player).or_insert(0) += 1;
            }
        }
    }
    counts
}
