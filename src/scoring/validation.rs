use std::collections::{HashMap, HashSet};

use crate::domain::{
    Bye, CompetitorType, Pairing, PairingKind, Player, PlayerId, Round, SeasonSnapshot, TeamPairing,
};

/// Players referenced more than once across pairings and byes
pub fn duplicate_players<'a>(
    pairings: impl IntoIterator<Item = &'a Pairing>,
    byes: impl IntoIterator<Item = &'a Bye>,
) -> HashSet<PlayerId> {
    let mut refcounts: HashMap<PlayerId, usize> = HashMap::new();
    for pairing in pairings {
        for player in [pairing.white, pairing.black].into_iter().flatten() {
            *refcounts.entry(player).or_insert(0) += 1;
        }
    }
    for bye in byes {
        *refcounts.entry(bye.player_id).or_insert(0) += 1;
    }

    refcounts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(player, _)| player)
        .collect()
}

fn username(players: &HashMap<PlayerId, Player>, player_id: PlayerId) -> &str {
    players
        .get(&player_id)
        .map(|p| p.username.as_str())
        .unwrap_or("?")
}

/// Problem with a pairing, shown to privileged viewers only
pub fn pairing_error(
    pairing: &Pairing,
    duplicates: &HashSet<PlayerId>,
    actives: &HashSet<PlayerId>,
    round_is_completed: bool,
    privileged: bool,
    players: &HashMap<PlayerId, Player>,
) -> Option<String> {
    if !privileged {
        return None;
    }
    let (Some(white), Some(black)) = (pairing.white, pairing.black) else {
        return Some("Missing player".to_string());
    };

    if let Some(player) = [white, black].into_iter().find(|p| duplicates.contains(p)) {
        return Some(format!("Duplicate player: {}", username(players, player)));
    }
    if round_is_completed {
        return None;
    }
    [white, black]
        .into_iter()
        .find(|p| !actives.contains(p))
        .map(|player| format!("Inactive player: {}", username(players, player)))
}

pub fn bye_error(
    bye: &Bye,
    duplicates: &HashSet<PlayerId>,
    actives: &HashSet<PlayerId>,
    round_is_completed: bool,
    privileged: bool,
    players: &HashMap<PlayerId, Player>,
) -> Option<String> {
    if !privileged {
        return None;
    }
    if duplicates.contains(&bye.player_id) {
        return Some(format!("Duplicate player: {}", username(players, bye.player_id)));
    }
    if !round_is_completed && !actives.contains(&bye.player_id) {
        return Some(format!("Inactive player: {}", username(players, bye.player_id)));
    }
    None
}

#[derive(Debug, Clone)]
pub struct ReviewedPairing<'a> {
    pub pairing: &'a Pairing,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewedBye<'a> {
    pub bye: &'a Bye,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewedMatch<'a> {
    pub team_pairing: &'a TeamPairing,
    pub boards: Vec<ReviewedPairing<'a>>,
}

/// One round's pairings and byes with their diagnostics
#[derive(Debug, Clone)]
pub struct RoundReview<'a> {
    pub round: &'a Round,
    pub pairings: Vec<ReviewedPairing<'a>>,
    pub matches: Vec<ReviewedMatch<'a>>,
    pub byes: Vec<ReviewedBye<'a>>,
    pub unavailable: HashSet<PlayerId>,
    /// Published round numbers, latest first
    pub published_rounds: Vec<i32>,
    pub next_pairing_order: i32,
}

/// Review the requested round, or the latest published one. Returns `None`
/// when that round does not exist or its pairings are not published.
pub fn review_round(
    snapshot: &SeasonSnapshot,
    round_number: Option<i32>,
    privileged: bool,
) -> Option<RoundReview<'_>> {
    let mut published_rounds: Vec<i32> = snapshot
        .rounds()
        .iter()
        .filter(|r| r.publish_pairings)
        .map(|r| r.number)
        .collect();
    published_rounds.sort_by(|a, b| b.cmp(a));

    let number = round_number.or_else(|| published_rounds.first().copied())?;
    let round = snapshot.round_by_number(number).filter(|r| r.publish_pairings)?;

    let lone_pairings = snapshot.lone_pairings_in_round(round.id);
    let team_pairings = snapshot.team_pairings_in_round(round.id);
    let board_pairings: Vec<(&TeamPairing, Vec<&Pairing>)> = team_pairings
        .iter()
        .map(|&tp| (tp, snapshot.board_pairings(tp.id)))
        .collect();
    let mut byes = snapshot.byes_in_round(round.id);
    byes.sort_by(|a, b| {
        (a.bye_type, a.player_rank.is_none(), a.player_rank, snapshot.username(a.player_id)).cmp(&(
            b.bye_type,
            b.player_rank.is_none(),
            b.player_rank,
            snapshot.username(b.player_id),
        ))
    });

    let duplicates = duplicate_players(
        lone_pairings
            .iter()
            .copied()
            .chain(board_pairings.iter().flat_map(|(_, boards)| boards.iter().copied())),
        byes.iter().copied(),
    );
    let actives = snapshot.active_players();
    let players = snapshot.players();
    let review = |pairing: &Pairing| {
        pairing_error(pairing, &duplicates, &actives, round.is_completed, privileged, players)
    };

    let pairings = lone_pairings
        .iter()
        .map(|&pairing| ReviewedPairing {
            pairing,
            error: review(pairing),
        })
        .collect();
    let matches = board_pairings
        .into_iter()
        .map(|(team_pairing, boards)| ReviewedMatch {
            team_pairing,
            boards: boards
                .into_iter()
                .map(|pairing| ReviewedPairing {
                    pairing,
                    error: review(pairing),
                })
                .collect(),
        })
        .collect();
    let reviewed_byes = byes
        .iter()
        .map(|&bye| ReviewedBye {
            bye,
            error: bye_error(bye, &duplicates, &actives, round.is_completed, privileged, players),
        })
        .collect();

    let next_pairing_order = match snapshot.season().competitor_type {
        CompetitorType::Lone => lone_pairings
            .iter()
            .filter_map(|p| match p.kind {
                PairingKind::Lone { pairing_order, .. } => Some(pairing_order + 1),
                PairingKind::Team { .. } => None,
            })
            .max(),
        CompetitorType::Team => team_pairings.iter().map(|tp| tp.pairing_order + 1).max(),
    }
    .unwrap_or(0);

    Some(RoundReview {
        round,
        pairings,
        matches,
        byes: reviewed_byes,
        unavailable: snapshot.unavailable_players(round.id),
        published_rounds,
        next_pairing_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ByeType;
    use crate::testing::SeasonBuilder;

    struct Lobby {
        snapshot: SeasonSnapshot,
        a: PlayerId,
        c: PlayerId,
        d: PlayerId,
    }

    fn lobby(setup: impl FnOnce(&mut SeasonBuilder, [PlayerId; 4])) -> Lobby {
        let mut builder = SeasonBuilder::lone(2);
        let a = builder.player("alice", Some(1800));
        let b = builder.player("bob", Some(1700));
        let c = builder.player("carol", Some(1600));
        let d = builder.player("dave", Some(1500));
        setup(&mut builder, [a, b, c, d]);
        Lobby {
            snapshot: builder.build(),
            a,
            c,
            d,
        }
    }

    fn errors(snapshot: &SeasonSnapshot, privileged: bool, completed: bool) -> Vec<Option<String>> {
        let duplicates = duplicate_players(snapshot.pairings(), snapshot.byes());
        let actives = snapshot.active_players();
        snapshot
            .pairings()
            .iter()
            .map(|p| pairing_error(p, &duplicates, &actives, completed, privileged, snapshot.players()))
            .collect()
    }

    #[test]
    fn test_duplicate_player_is_flagged_on_both_pairings() {
        let lobby = lobby(|builder, [a, b, c, _]| {
            builder.pairing(1, Some(a), Some(b), "");
            builder.pairing(1, Some(a), Some(c), "");
        });

        let found = errors(&lobby.snapshot, true, false);

        let expected = Some("Duplicate player: alice".to_string());
        assert_eq!(found, vec![expected.clone(), expected]);
        assert_eq!(
            duplicate_players(lobby.snapshot.pairings(), lobby.snapshot.byes()),
            HashSet::from([lobby.a])
        );
    }

    #[test]
    fn test_distinct_players_are_not_flagged() {
        let lobby = lobby(|builder, [a, b, c, d]| {
            builder.pairing(1, Some(a), Some(b), "");
            builder.pairing(1, Some(c), Some(d), "");
        });

        assert_eq!(errors(&lobby.snapshot, true, false), vec![None, None]);
    }

    #[test]
    fn test_unprivileged_viewers_see_nothing() {
        let lobby = lobby(|builder, [a, b, _, _]| {
            builder.pairing(1, Some(a), None, "");
            builder.pairing(1, Some(a), Some(b), "");
        });

        assert_eq!(errors(&lobby.snapshot, false, false), vec![None, None]);
    }

    #[test]
    fn test_missing_player_wins_over_duplicates() {
        let lobby = lobby(|builder, [a, b, _, _]| {
            builder.pairing(1, Some(a), None, "");
            builder.pairing(1, Some(a), Some(b), "");
        });

        let found = errors(&lobby.snapshot, true, false);

        assert_eq!(found[0].as_deref(), Some("Missing player"));
        assert_eq!(found[1].as_deref(), Some("Duplicate player: alice"));
    }

    #[test]
    fn test_inactive_player_only_while_round_is_open() {
        let lobby = lobby(|builder, [a, b, _, _]| {
            builder.pairing(1, Some(a), Some(b), "");
            builder.set_inactive(b);
        });

        assert_eq!(
            errors(&lobby.snapshot, true, false),
            vec![Some("Inactive player: bob".to_string())]
        );
        assert_eq!(errors(&lobby.snapshot, true, true), vec![None]);
    }

    #[test]
    fn test_bye_errors() {
        let lobby = lobby(|builder, [a, b, c, _]| {
            builder.pairing(1, Some(a), Some(b), "");
            builder.bye(1, a, ByeType::HalfPoint);
            builder.bye(1, c, ByeType::FullPoint);
            builder.set_inactive(c);
        });
        let snapshot = &lobby.snapshot;
        let duplicates = duplicate_players(snapshot.pairings(), snapshot.byes());
        let actives = snapshot.active_players();

        let found: Vec<Option<String>> = snapshot
            .byes()
            .iter()
            .map(|bye| bye_error(bye, &duplicates, &actives, false, true, snapshot.players()))
            .collect();

        assert_eq!(
            found,
            vec![
                Some("Duplicate player: alice".to_string()),
                Some("Inactive player: carol".to_string())
            ]
        );
    }

    #[test]
    fn test_review_defaults_to_latest_published_round() {
        let lobby = lobby(|builder, [a, b, c, d]| {
            builder.round_state(2, false, true);
            builder.pairing(1, Some(a), Some(b), "1-0");
            builder.pairing(2, Some(c), Some(d), "");
            builder.pairing(2, Some(b), Some(a), "");
            builder.bye(2, c, ByeType::HalfPoint);
            builder.bye(2, d, ByeType::FullPoint);
        });

        let review = review_round(&lobby.snapshot, None, true).unwrap();

        assert_eq!(review.round.number, 2);
        assert_eq!(review.published_rounds, vec![2, 1]);
        assert_eq!(review.pairings.len(), 2);
        assert_eq!(review.pairings[0].pairing.white, Some(lobby.c));
        assert_eq!(review.next_pairing_order, 3);
        let bye_players: Vec<PlayerId> = review.byes.iter().map(|b| b.bye.player_id).collect();
        assert_eq!(bye_players, vec![lobby.d, lobby.c]);
        assert!(review.byes.iter().all(|b| b.error.is_some()));
    }

    #[test]
    fn test_review_skips_unpublished_round() {
        let lobby = lobby(|builder, _| {
            builder.round_state(2, false, false);
        });

        assert!(review_round(&lobby.snapshot, Some(2), true).is_none());
        assert_eq!(review_round(&lobby.snapshot, None, true).unwrap().round.number, 1);
    }

    #[test]
    fn test_review_team_round_lists_boards() {
        let mut builder = SeasonBuilder::team(1, 2);
        let north = builder.team_entry("North");
        let south = builder.team_entry("South");
        let n1 = builder.player("n1", None);
        let n2 = builder.player("n2", None);
        let s1 = builder.player("s1", None);
        let s2 = builder.player("s2", None);
        builder.team_match(1, north, south, &[(n1, s1, ""), (n2, s2, "")]);
        builder.availability(1, s2, false);
        let snapshot = builder.build();

        let review = review_round(&snapshot, Some(1), true).unwrap();

        assert!(review.pairings.is_empty());
        assert_eq!(review.matches.len(), 1);
        assert_eq!(review.matches[0].boards.len(), 2);
        assert!(review.matches[0].boards.iter().all(|b| b.error.is_none()));
        assert_eq!(review.unavailable, HashSet::from([s2]));
        assert_eq!(review.next_pairing_order, 1);
    }
}
