use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{GameResult, Pairing, Player, PlayerId, SeasonSnapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounts {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Wins minus losses
    pub net: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPercents {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
    pub net: f64,
}

/// White's results on one board, or across all boards when `board_number` is `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardStats {
    pub board_number: Option<i32>,
    pub games: u32,
    pub counts: ResultCounts,
    pub percents: ResultPercents,
    /// Mean of white rating minus black rating
    pub avg_rating_delta: f64,
}

fn ratio(part: f64, total: u32) -> f64 {
    if total == 0 { 0.0 } else { part / f64::from(total) }
}

pub fn count_results(
    pairings: &[&Pairing],
    players: &HashMap<PlayerId, Player>,
    board_number: Option<i32>,
) -> BoardStats {
    let mut games = 0;
    let mut counts = ResultCounts::default();
    let mut rating_delta: i64 = 0;

    let counted = pairings
        .iter()
        .filter(|p| board_number.is_none_or(|board| p.board_number() == Some(board)))
        .filter(|p| p.is_played_game());
    for pairing in counted {
        games += 1;
        match pairing.result {
            GameResult::WhiteWin => {
                counts.wins += 1;
                counts.net += 1;
            }
            GameResult::Draw => counts.draws += 1,
            GameResult::BlackWin => {
                counts.losses += 1;
                counts.net -= 1;
            }
            _ => {}
        }

        let rating = |player: Option<PlayerId>| player.and_then(|id| players.get(&id)?.rating);
        if let (Some(white), Some(black)) = (rating(pairing.white), rating(pairing.black)) {
            rating_delta += i64::from(white) - i64::from(black);
        }
    }

    BoardStats {
        board_number,
        games,
        counts,
        percents: ResultPercents {
            win: ratio(f64::from(counts.wins), games),
            draw: ratio(f64::from(counts.draws), games),
            loss: ratio(f64::from(counts.losses), games),
            net: ratio(f64::from(counts.net), games),
        },
        avg_rating_delta: ratio(rating_delta as f64, games),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub total: BoardStats,
    pub boards: Vec<BoardStats>,
}

impl SeasonStats {
    pub fn has_win_rate_stats(&self) -> bool {
        self.total.counts != ResultCounts::default()
    }
}

/// Season total plus one entry per board of a team season
pub fn season_stats(snapshot: &SeasonSnapshot) -> SeasonStats {
    let pairings = snapshot.team_board_pairings();
    let players = snapshot.players();

    let boards = snapshot
        .season()
        .board_numbers()
        .into_iter()
        .map(|board| count_results(&pairings, players, Some(board)))
        .collect();

    SeasonStats {
        total: count_results(&pairings, players, None),
        boards,
    }
}
