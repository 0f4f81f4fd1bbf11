use log::debug;

use super::round_scores::PairingIndex;
use super::score::{compute_lone_scores, LonePlayerScore};
use super::team::{team_standings, TeamStanding};
use super::types::{RankLookup, RoundScore, StandingsMode};
use crate::config::settings::ScoringSettings;
use crate::domain::{CompetitorType, Player, Season, SeasonSnapshot};

#[derive(Debug, Clone)]
pub struct PlayerStanding<'a> {
    pub rank: usize,
    pub player: &'a Player,
    pub score: LonePlayerScore,
    pub round_scores: Vec<RoundScore<'a>>,
}

#[derive(Debug, Clone)]
pub enum Standings<'a> {
    Lone(Vec<PlayerStanding<'a>>),
    Team(Vec<TeamStanding<'a>>),
}

impl Standings<'_> {
    pub fn len(&self) -> usize {
        match self {
            Standings::Lone(rows) => rows.len(),
            Standings::Team(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished season is always ranked with the final key
pub fn effective_mode(season: &Season, mode: StandingsMode) -> StandingsMode {
    if season.is_completed && mode == StandingsMode::Pairing {
        StandingsMode::Final
    } else {
        mode
    }
}

pub fn compute_standings<'a>(
    snapshot: &'a SeasonSnapshot,
    mode: StandingsMode,
    include_current: bool,
    scoring: &ScoringSettings,
) -> Standings<'a> {
    match snapshot.season().competitor_type {
        CompetitorType::Lone => Standings::Lone(lone_standings(snapshot, mode, include_current)),
        CompetitorType::Team => {
            Standings::Team(team_standings(snapshot, mode, include_current, scoring))
        }
    }
}

pub fn lone_standings<'a>(
    snapshot: &'a SeasonSnapshot,
    mode: StandingsMode,
    include_current: bool,
) -> Vec<PlayerStanding<'a>> {
    let index = PairingIndex::build(snapshot);
    let mut scored: Vec<(&'a Player, LonePlayerScore)> = compute_lone_scores(snapshot, &index)
        .into_iter()
        .filter_map(|s| snapshot.player(s.player_id).map(|p| (p, s)))
        .collect();

    sort_lone_scores(&mut scored, effective_mode(snapshot.season(), mode));

    let ranks: RankLookup = scored
        .iter()
        .enumerate()
        .map(|(idx, (player, _))| (player.id, idx + 1))
        .collect();
    debug!("Ranked {} players in {} mode", scored.len(), mode.as_str());

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (player, score))| {
            let round_scores = score
                .round_scores(snapshot.rounds(), &ranks, &index, include_current)
                .collect();
            PlayerStanding {
                rank: idx + 1,
                player,
                score,
                round_scores,
            }
        })
        .collect()
}

/// Descending and stable, so equal keys keep season player order
fn sort_lone_scores(scored: &mut [(&Player, LonePlayerScore)], mode: StandingsMode) {
    match mode {
        StandingsMode::Seed => {
            scored.sort_by(|(_, a), (_, b)| b.seed_sort_key().cmp(&a.seed_sort_key()))
        }
        StandingsMode::Pairing => {
            scored.sort_by(|(_, a), (_, b)| b.pairing_sort_key().cmp(&a.pairing_sort_key()))
        }
        StandingsMode::Final => scored.sort_by(|(_, a), (_, b)| {
            b.final_standings_sort_key()
                .cmp(&a.final_standings_sort_key())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ByeType;
    use crate::scoring::types::ResultType;
    use crate::testing::SeasonBuilder;
    use rust_decimal::Decimal;

    fn lone(standings: Standings<'_>) -> Vec<PlayerStanding<'_>> {
        match standings {
            Standings::Lone(rows) => rows,
            Standings::Team(_) => panic!("expected individual standings"),
        }
    }

    #[test]
    fn test_bye_scenario_trajectories_and_order() {
        let mut builder = SeasonBuilder::lone(2);
        let p1 = builder.player("p1", Some(1500));
        let p2 = builder.player("p2", Some(1600));
        builder.pairing(1, Some(p1), Some(p2), "1-0");
        builder.bye(2, p2, ByeType::FullPoint);
        let snapshot = builder.build();

        let rows = lone(compute_standings(
            &snapshot,
            StandingsMode::Final,
            false,
            &ScoringSettings::default(),
        ));

        assert_eq!(rows[0].player.id, p1);
        assert_eq!(rows[1].player.id, p2);
        let p1_cumulative: Vec<Decimal> = rows[0].round_scores.iter().map(|r| r.cumulative).collect();
        let p2_cumulative: Vec<Decimal> = rows[1].round_scores.iter().map(|r| r.cumulative).collect();
        assert_eq!(p1_cumulative, vec![Decimal::ONE, Decimal::ONE]);
        assert_eq!(p2_cumulative, vec![Decimal::ZERO, Decimal::ONE]);
        assert_eq!(rows[0].round_scores[1].result, ResultType::NoGame);
        assert_eq!(rows[1].round_scores[1].result, ResultType::FullBye);
        assert_eq!(rows[0].round_scores[0].opponent_rank, Some(2));
    }

    #[test]
    fn test_seed_mode_orders_by_rating_with_unrated_last() {
        let mut builder = SeasonBuilder::lone(1);
        let unrated = builder.player("unrated", None);
        let low = builder.player("low", Some(1200));
        let high = builder.player("high", Some(2100));
        let snapshot = builder.build();

        let rows = lone_standings(&snapshot, StandingsMode::Seed, false);
        let order: Vec<_> = rows.iter().map(|r| r.player.id).collect();

        assert_eq!(order, vec![high, low, unrated]);
    }

    #[test]
    fn test_ranks_are_dense_for_every_mode() {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("a", Some(1500));
        let b = builder.player("b", Some(1500));
        let c = builder.player("c", Some(1400));
        builder.pairing(1, Some(a), Some(b), "1/2-1/2");
        builder.bye(1, c, ByeType::HalfPoint);
        let snapshot = builder.build();

        for mode in [StandingsMode::Seed, StandingsMode::Pairing, StandingsMode::Final] {
            let rows = lone_standings(&snapshot, mode, false);
            let ranks: Vec<usize> = rows.iter().map(|r| r.rank).collect();
            assert_eq!(ranks, vec![1, 2, 3]);
            assert!(rows.iter().all(|r| r.round_scores.len() == 2));
        }
    }

    #[test]
    fn test_ties_keep_season_player_order() {
        let mut builder = SeasonBuilder::lone(1);
        let first = builder.player("first", Some(1500));
        let second = builder.player("second", Some(1500));
        let snapshot = builder.build();

        let rows = lone_standings(&snapshot, StandingsMode::Pairing, false);

        assert_eq!(rows[0].player.id, first);
        assert_eq!(rows[1].player.id, second);
    }

    #[test]
    fn test_completed_season_uses_final_key() {
        let mut builder = SeasonBuilder::lone(1);
        let late = builder.player("late", Some(1500));
        let winner = builder.player("winner", Some(1400));
        let loser = builder.player("loser", Some(1300));
        builder.late_join_points(late, Decimal::from(2));
        builder.pairing(1, Some(winner), Some(loser), "1-0");
        builder.complete_season();
        let snapshot = builder.build();

        let rows = lone_standings(&snapshot, StandingsMode::Pairing, false);

        // the loser's solkoff puts them ahead of the idle late joiner
        assert_eq!(rows[0].player.id, winner);
        assert_eq!(rows[1].player.id, loser);
        assert_eq!(rows[2].player.id, late);
    }

    #[test]
    fn test_in_progress_key_counts_late_join_points() {
        let mut builder = SeasonBuilder::lone(1);
        let late = builder.player("late", Some(1500));
        let winner = builder.player("winner", Some(1400));
        let loser = builder.player("loser", Some(1300));
        builder.late_join_points(late, Decimal::from(2));
        builder.pairing(1, Some(winner), Some(loser), "1-0");
        let snapshot = builder.build();

        let rows = lone_standings(&snapshot, StandingsMode::Pairing, false);

        assert_eq!(rows[0].player.id, late);
        assert_eq!(rows[1].player.id, winner);
    }
}
