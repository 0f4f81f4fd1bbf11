use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::round_scores::{PairingIndex, RoundOutcome, RoundScores};
use super::types::{Points, RankLookup};
use crate::domain::{PlayerId, Round, SeasonPlayer, SeasonSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreaks {
    pub modified_median: Points,
    pub solkoff: Points,
    pub cumulative: Points,
    pub opposition_cumulative: Points,
}

/// Running score of one player in an individual season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LonePlayerScore {
    pub player_id: PlayerId,
    pub seed_rating: Option<i32>,
    /// Points from completed rounds
    pub points: Points,
    pub late_join_points: Points,
    pub games_played: u32,
    pub tiebreaks: TieBreaks,
}

impl LonePlayerScore {
    pub fn seed_sort_key(&self) -> Option<i32> {
        self.seed_rating
    }

    pub fn pairing_sort_key(&self) -> (Points, Option<i32>) {
        (self.points + self.late_join_points, self.seed_rating)
    }

    pub fn final_standings_sort_key(&self) -> (Points, Points, Points, Points, Points, Option<i32>) {
        (
            self.points,
            self.tiebreaks.modified_median,
            self.tiebreaks.solkoff,
            self.tiebreaks.cumulative,
            self.tiebreaks.opposition_cumulative,
            self.seed_rating,
        )
    }

    pub fn round_scores<'r, 'i>(
        &self,
        rounds: &'r [Round],
        ranks: &'i RankLookup,
        index: &'i PairingIndex<'r>,
        include_current: bool,
    ) -> RoundScores<'r, 'i> {
        RoundScores::new(self.player_id, rounds, ranks, index, include_current)
    }
}

struct PlayerTally {
    player_id: PlayerId,
    seed_rating: Option<i32>,
    late_join_points: Points,
    points: Points,
    cumulative: Points,
    opponents: Vec<PlayerId>,
}

/// Scores for every season player, in season player order
pub fn compute_lone_scores(snapshot: &SeasonSnapshot, index: &PairingIndex<'_>) -> Vec<LonePlayerScore> {
    let completed: Vec<&Round> = snapshot.rounds().iter().filter(|r| r.is_completed).collect();
    let tallies: Vec<PlayerTally> = snapshot
        .season_players()
        .iter()
        .map(|sp| tally_player(sp, &completed, index))
        .collect();

    let points: HashMap<PlayerId, Points> = tallies.iter().map(|t| (t.player_id, t.points)).collect();
    let cumulative: HashMap<PlayerId, Points> =
        tallies.iter().map(|t| (t.player_id, t.cumulative)).collect();
    let max_points = Decimal::from(completed.len() as u64);

    tallies
        .into_iter()
        .map(|t| build_score(t, &points, &cumulative, max_points))
        .collect()
}

fn tally_player(sp: &SeasonPlayer, completed: &[&Round], index: &PairingIndex<'_>) -> PlayerTally {
    let mut running = Decimal::ZERO;
    let mut cumulative = Decimal::ZERO;
    let mut unplayed = Decimal::ZERO;
    let mut opponents = Vec::new();

    for round in completed {
        let outcome = index.outcome(sp.player_id, round.id);
        let points = outcome.points();
        running += points;
        cumulative += running;

        if outcome.result_type().is_unplayed() {
            unplayed += points;
        } else if let Some(opponent) = played_opponent(&outcome) {
            opponents.push(opponent);
        }
    }

    PlayerTally {
        player_id: sp.player_id,
        seed_rating: sp.seed_rating,
        late_join_points: sp.late_join_points,
        points: running,
        cumulative: cumulative - unplayed,
        opponents,
    }
}

/// Opponent of a game decided over the board
fn played_opponent(outcome: &RoundOutcome<'_>) -> Option<PlayerId> {
    match outcome {
        RoundOutcome::Game(pairing, color) if pairing.result.is_set() => pairing.opponent(*color),
        _ => None,
    }
}

fn build_score(
    tally: PlayerTally,
    points: &HashMap<PlayerId, Points>,
    cumulative: &HashMap<PlayerId, Points>,
    max_points: Points,
) -> LonePlayerScore {
    let opponent_points = lookup_all(&tally.opponents, points);
    let opponent_cumulative = lookup_all(&tally.opponents, cumulative);

    let tiebreaks = TieBreaks {
        modified_median: modified_median(tally.points, opponent_points.clone(), max_points),
        solkoff: opponent_points.iter().sum(),
        cumulative: tally.cumulative,
        opposition_cumulative: opponent_cumulative.iter().sum(),
    };

    LonePlayerScore {
        player_id: tally.player_id,
        seed_rating: tally.seed_rating,
        points: tally.points,
        late_join_points: tally.late_join_points,
        games_played: tally.opponents.len() as u32,
        tiebreaks,
    }
}

fn lookup_all(players: &[PlayerId], values: &HashMap<PlayerId, Points>) -> Vec<Points> {
    players
        .iter()
        .map(|p| values.get(p).copied().unwrap_or(Decimal::ZERO))
        .collect()
}

/// Sum of opponents' scores without the extremes: above an even score the
/// lowest is dropped, below it the highest, at exactly even both
pub fn modified_median(points: Points, mut opponent_points: Vec<Points>, max_points: Points) -> Points {
    opponent_points.sort();
    let (drop_low, drop_high) = match points.cmp(&(max_points / Decimal::from(2))) {
        Ordering::Greater => (1, 0),
        Ordering::Less => (0, 1),
        Ordering::Equal => (1, 1),
    };

    if opponent_points.len() <= drop_low + drop_high {
        return Decimal::ZERO;
    }
    opponent_points[drop_low..opponent_points.len() - drop_high]
        .iter()
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ByeType;
    use crate::testing::SeasonBuilder;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_modified_median_drops_extremes() {
        let opponents = vec![d("1"), d("3"), d("2")];
        assert_eq!(modified_median(d("2.5"), opponents.clone(), d("3")), d("5"));
        assert_eq!(modified_median(d("0.5"), opponents.clone(), d("3")), d("3"));
        assert_eq!(modified_median(d("1.5"), opponents, d("3")), d("2"));
        assert_eq!(modified_median(d("1"), vec![d("1")], d("2")), Decimal::ZERO);
    }

    #[test]
    fn test_points_only_count_completed_rounds() {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("alice", Some(1800));
        let b = builder.player("bob", Some(1700));
        builder.pairing(1, Some(a), Some(b), "1-0");
        builder.pairing(2, Some(a), Some(b), "1-0");
        builder.round_state(2, false, true);
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);

        let scores = compute_lone_scores(&snapshot, &index);

        assert_eq!(scores[0].points, Decimal::ONE);
        assert_eq!(scores[1].points, Decimal::ZERO);
    }

    #[test]
    fn test_tiebreaks_from_opponents() {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("alice", Some(1800));
        let b = builder.player("bob", Some(1700));
        let c = builder.player("carol", Some(1600));
        let e = builder.player("erin", Some(1500));
        builder.pairing(1, Some(a), Some(b), "1-0");
        builder.pairing(1, Some(c), Some(e), "1/2-1/2");
        builder.pairing(2, Some(c), Some(a), "0-1");
        builder.bye(2, b, ByeType::FullPoint);
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);

        let scores = compute_lone_scores(&snapshot, &index);
        let alice = &scores[0];
        let bob = &scores[1];

        assert_eq!(alice.points, d("2"));
        assert_eq!(alice.tiebreaks.solkoff, d("1.5"));
        assert_eq!(alice.tiebreaks.cumulative, d("3"));
        assert_eq!(alice.games_played, 2);
        // the bye counts for points but not for cumulative or opponents
        assert_eq!(bob.points, Decimal::ONE);
        assert_eq!(bob.tiebreaks.cumulative, Decimal::ZERO);
        assert_eq!(bob.tiebreaks.solkoff, d("2"));
    }

    #[test]
    fn test_pairing_key_includes_late_join_points() {
        let mut builder = SeasonBuilder::lone(1);
        let a = builder.player("alice", Some(1800));
        builder.late_join_points(a, d("1.5"));
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);

        let scores = compute_lone_scores(&snapshot, &index);

        assert_eq!(scores[0].pairing_sort_key(), (d("1.5"), Some(1800)));
        assert_eq!(scores[0].final_standings_sort_key().0, Decimal::ZERO);
    }
}
