use rust_decimal::Decimal;
use std::collections::HashMap;
use std::slice;

use super::types::{Points, RankLookup, ResultType, RoundScore};
use crate::domain::{Bye, Color, Pairing, PairingKind, PlayerId, Round, RoundId, SeasonSnapshot};

/// White, black and bye lookups for every player of an individual season,
/// built in a single pass
#[derive(Debug, Default)]
pub struct PairingIndex<'a> {
    white: HashMap<PlayerId, Vec<(RoundId, &'a Pairing)>>,
    black: HashMap<PlayerId, Vec<(RoundId, &'a Pairing)>>,
    byes: HashMap<PlayerId, Vec<&'a Bye>>,
}

impl<'a> PairingIndex<'a> {
    pub fn build(snapshot: &'a SeasonSnapshot) -> Self {
        let mut index = Self::default();

        for pairing in snapshot.pairings() {
            let PairingKind::Lone { round_id, .. } = pairing.kind else {
                continue;
            };
            if let Some(white) = pairing.white {
                index.white.entry(white).or_default().push((round_id, pairing));
            }
            if let Some(black) = pairing.black {
                index.black.entry(black).or_default().push((round_id, pairing));
            }
        }

        for bye in snapshot.byes() {
            index.byes.entry(bye.player_id).or_default().push(bye);
        }

        index
    }

    pub fn white_pairing(&self, player_id: PlayerId, round_id: RoundId) -> Option<&'a Pairing> {
        find_pairing(&self.white, player_id, round_id)
    }

    pub fn black_pairing(&self, player_id: PlayerId, round_id: RoundId) -> Option<&'a Pairing> {
        find_pairing(&self.black, player_id, round_id)
    }

    pub fn bye(&self, player_id: PlayerId, round_id: RoundId) -> Option<&'a Bye> {
        self.byes
            .get(&player_id)?
            .iter()
            .find(|b| b.round_id == round_id)
            .copied()
    }

    /// What happened to a player in a round. A white pairing with an opponent
    /// wins over a black one, and any game wins over a bye.
    pub fn outcome(&self, player_id: PlayerId, round_id: RoundId) -> RoundOutcome<'a> {
        let white = self.white_pairing(player_id, round_id);
        let black = self.black_pairing(player_id, round_id);

        if let Some(pairing) = white.filter(|p| p.black.is_some()) {
            return RoundOutcome::Game(pairing, Color::White);
        }
        if let Some(pairing) = black.filter(|p| p.white.is_some()) {
            return RoundOutcome::Game(pairing, Color::Black);
        }
        if let Some(bye) = self.bye(player_id, round_id) {
            return RoundOutcome::Bye(bye);
        }
        if let Some(pairing) = white {
            return RoundOutcome::Game(pairing, Color::White);
        }
        if let Some(pairing) = black {
            return RoundOutcome::Game(pairing, Color::Black);
        }
        RoundOutcome::NoGame
    }
}

fn find_pairing<'a>(
    lookup: &HashMap<PlayerId, Vec<(RoundId, &'a Pairing)>>,
    player_id: PlayerId,
    round_id: RoundId,
) -> Option<&'a Pairing> {
    lookup
        .get(&player_id)?
        .iter()
        .find(|(r, _)| *r == round_id)
        .map(|(_, p)| *p)
}

#[derive(Debug, Clone, Copy)]
pub enum RoundOutcome<'a> {
    Game(&'a Pairing, Color),
    Bye(&'a Bye),
    NoGame,
}

impl RoundOutcome<'_> {
    /// Points scored; a pairing without a result scores nothing yet
    pub fn points(&self) -> Points {
        match self {
            RoundOutcome::Game(pairing, color) => pairing.score(*color).unwrap_or(Decimal::ZERO),
            RoundOutcome::Bye(bye) => bye.bye_type.score(),
            RoundOutcome::NoGame => Decimal::ZERO,
        }
    }

    pub fn result_type(&self) -> ResultType {
        match self {
            RoundOutcome::Game(pairing, color) => ResultType::from_game(pairing.result, *color),
            RoundOutcome::Bye(bye) => ResultType::from_bye(bye.bye_type),
            RoundOutcome::NoGame => ResultType::NoGame,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            RoundOutcome::Game(_, color) => Some(*color),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Option<PlayerId> {
        match self {
            RoundOutcome::Game(pairing, color) => pairing.opponent(*color),
            _ => None,
        }
    }
}

/// Lazy per-round trajectory of one player. Yields exactly one entry per
/// round; create a new one to start over.
pub struct RoundScores<'r, 'i> {
    player_id: PlayerId,
    rounds: slice::Iter<'r, Round>,
    ranks: &'i RankLookup,
    index: &'i PairingIndex<'r>,
    include_current: bool,
    cumulative: Points,
}

impl<'r, 'i> RoundScores<'r, 'i> {
    pub fn new(
        player_id: PlayerId,
        rounds: &'r [Round],
        ranks: &'i RankLookup,
        index: &'i PairingIndex<'r>,
        include_current: bool,
    ) -> Self {
        Self {
            player_id,
            rounds: rounds.iter(),
            ranks,
            index,
            include_current,
            cumulative: Decimal::ZERO,
        }
    }

    fn upcoming(&self, round: &'r Round) -> RoundScore<'r> {
        RoundScore {
            round,
            result: ResultType::Upcoming,
            color: None,
            opponent: None,
            opponent_rank: None,
            points: Decimal::ZERO,
            cumulative: self.cumulative,
        }
    }
}

impl<'r> Iterator for RoundScores<'r, '_> {
    type Item = RoundScore<'r>;

    fn next(&mut self) -> Option<Self::Item> {
        let round = self.rounds.next()?;
        if !round.is_visible(self.include_current) {
            return Some(self.upcoming(round));
        }

        let outcome = self.index.outcome(self.player_id, round.id);
        let points = outcome.points();
        self.cumulative += points;

        let opponent = outcome.opponent();
        Some(RoundScore {
            round,
            result: outcome.result_type(),
            color: outcome.color(),
            opponent,
            opponent_rank: opponent.and_then(|o| self.ranks.get(&o).copied()),
            points,
            cumulative: self.cumulative,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rounds.size_hint()
    }
}

impl ExactSizeIterator for RoundScores<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ByeType;
    use crate::testing::{round_id, SeasonBuilder};

    #[test]
    fn test_index_finds_each_color() {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("alice", Some(1800));
        let b = builder.player("bob", Some(1700));
        builder.pairing(1, Some(a), Some(b), "1-0");
        builder.pairing(2, Some(b), Some(a), "0-1");
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);

        assert!(index.white_pairing(a, round_id(1)).is_some());
        assert!(index.black_pairing(a, round_id(2)).is_some());
        assert!(index.white_pairing(a, round_id(2)).is_none());
    }

    #[test]
    fn test_trajectory_has_one_entry_per_round() {
        let mut builder = SeasonBuilder::lone(4);
        let a = builder.player("alice", Some(1800));
        let b = builder.player("bob", Some(1700));
        builder.pairing(1, Some(a), Some(b), "1/2-1/2");
        builder.bye(3, a, ByeType::HalfPoint);
        builder.round_state(4, false, false);
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);
        let ranks = RankLookup::from([(a, 1), (b, 2)]);

        let entries: Vec<_> = RoundScores::new(a, snapshot.rounds(), &ranks, &index, false).collect();
        let results: Vec<ResultType> = entries.iter().map(|e| e.result).collect();

        assert_eq!(
            results,
            vec![
                ResultType::Draw,
                ResultType::NoGame,
                ResultType::HalfBye,
                ResultType::Upcoming
            ]
        );
        assert_eq!(entries[0].opponent_rank, Some(2));
        assert_eq!(entries[3].cumulative, Decimal::ONE);
    }

    #[test]
    fn test_cumulative_never_decreases() {
        let mut builder = SeasonBuilder::lone(5);
        let a = builder.player("alice", None);
        let b = builder.player("bob", None);
        builder.pairing(1, Some(a), Some(b), "0-1");
        builder.pairing(2, Some(b), Some(a), "0-1");
        builder.bye(3, a, ByeType::ZeroPoint);
        builder.pairing(4, Some(a), Some(b), "1/2-1/2");
        builder.pairing(5, Some(a), Some(b), "1X-0F");
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);
        let ranks = RankLookup::new();

        let cumulative: Vec<Points> = RoundScores::new(a, snapshot.rounds(), &ranks, &index, true)
            .map(|e| e.cumulative)
            .collect();

        assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cumulative.last().copied(), Some(Decimal::new(25, 1)));
    }

    #[test]
    fn test_include_current_counts_published_round() {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("alice", None);
        let b = builder.player("bob", None);
        builder.pairing(1, Some(a), Some(b), "1-0");
        builder.pairing(2, Some(a), Some(b), "");
        builder.round_state(2, false, true);
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);
        let ranks = RankLookup::new();

        let hidden: Vec<_> = RoundScores::new(a, snapshot.rounds(), &ranks, &index, false).collect();
        let shown: Vec<_> = RoundScores::new(a, snapshot.rounds(), &ranks, &index, true).collect();

        assert_eq!(hidden[1].result, ResultType::Upcoming);
        assert_eq!(shown[1].result, ResultType::Pending);
        assert_eq!(shown[1].color, Some(Color::White));
        assert_eq!(shown[1].opponent, Some(b));
    }

    #[test]
    fn test_iterator_restarts_from_scratch() {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("alice", None);
        let b = builder.player("bob", None);
        builder.pairing(1, Some(a), Some(b), "1-0");
        builder.pairing(2, Some(a), Some(b), "1-0");
        let snapshot = builder.build();
        let index = PairingIndex::build(&snapshot);
        let ranks = RankLookup::new();

        let first: Vec<Points> = RoundScores::new(a, snapshot.rounds(), &ranks, &index, false)
            .map(|e| e.cumulative)
            .collect();
        let second: Vec<Points> = RoundScores::new(a, snapshot.rounds(), &ranks, &index, false)
            .map(|e| e.cumulative)
            .collect();

        assert_eq!(first, second);
    }
}
