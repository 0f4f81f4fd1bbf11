//! Owned, serializable views of scoring results, printed by the CLI and
//! stored by the standings cache.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::domain::{Color, CompetitorType, PlayerId, SeasonSnapshot};
use crate::scoring::{
    rating_sections, CrossRow, Highlight, PlayerStanding, RoundReview, RoundScore, SeasonStats,
    StandingsMode, TeamRoundScore, TeamStanding,
};

fn points(value: Decimal) -> String {
    value.normalize().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: usize,
    pub name: String,
    pub seed_rating: Option<i32>,
    pub score: String,
    pub tiebreaks: Vec<String>,
    pub highlight: Option<Highlight>,
    /// One cell per round: result code followed by the opponent's rank
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsReport {
    pub league: String,
    pub season: String,
    pub season_name: String,
    pub competitor_type: CompetitorType,
    pub mode: StandingsMode,
    pub section: Option<String>,
    /// Rating sections the season awards prizes in
    pub sections: Vec<String>,
    pub tiebreak_names: Vec<String>,
    pub rounds: Vec<i32>,
    pub rows: Vec<StandingRow>,
}

fn lone_cell(entry: &RoundScore<'_>) -> String {
    let color = match entry.color {
        Some(Color::White) => "w",
        Some(Color::Black) => "b",
        None => "",
    };
    match entry.opponent_rank {
        Some(rank) => format!("{}{}{}", entry.result.code(), rank, color),
        None => entry.result.code().to_string(),
    }
}

fn team_cell(entry: &TeamRoundScore<'_>) -> String {
    match entry.opponent_rank {
        Some(rank) => format!(
            "{}{} {}-{}",
            entry.result.code(),
            rank,
            points(entry.game_points),
            points(entry.opponent_game_points)
        ),
        None => entry.result.code().to_string(),
    }
}

impl StandingsReport {
    fn header(snapshot: &SeasonSnapshot, mode: StandingsMode, tiebreak_names: &[&str]) -> Self {
        let season = snapshot.season();
        Self {
            league: season.league_tag.clone(),
            season: season.tag.clone(),
            season_name: season.name.clone(),
            competitor_type: season.competitor_type,
            mode,
            section: None,
            sections: rating_sections(snapshot.prizes()).iter().map(|s| s.key()).collect(),
            tiebreak_names: tiebreak_names.iter().map(|n| n.to_string()).collect(),
            rounds: snapshot.rounds().iter().map(|r| r.number).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_players(
        snapshot: &SeasonSnapshot,
        mode: StandingsMode,
        standings: &[PlayerStanding<'_>],
        highlights: &HashMap<PlayerId, Highlight>,
    ) -> Self {
        let mut report = Self::header(snapshot, mode, &["MM", "Solk", "Cum", "OppCum"]);
        report.rows = standings
            .iter()
            .map(|s| {
                let tiebreaks = &s.score.tiebreaks;
                StandingRow {
                    rank: s.rank,
                    name: s.player.username.clone(),
                    seed_rating: s.score.seed_rating,
                    score: points(s.score.points),
                    tiebreaks: [
                        tiebreaks.modified_median,
                        tiebreaks.solkoff,
                        tiebreaks.cumulative,
                        tiebreaks.opposition_cumulative,
                    ]
                    .into_iter()
                    .map(points)
                    .collect(),
                    highlight: highlights.get(&s.player.id).copied(),
                    cells: s.round_scores.iter().map(lone_cell).collect(),
                }
            })
            .collect();
        report
    }

    pub fn from_teams(snapshot: &SeasonSnapshot, mode: StandingsMode, standings: &[TeamStanding<'_>]) -> Self {
        let mut report = Self::header(snapshot, mode, &["GP", "H2H", "Won", "SB"]);
        report.rows = standings
            .iter()
            .map(|s| StandingRow {
                rank: s.rank,
                name: s.team.name.clone(),
                seed_rating: None,
                score: points(s.score.match_points),
                tiebreaks: vec![
                    points(s.score.game_points),
                    points(s.score.head_to_head),
                    s.score.games_won.to_string(),
                    points(s.score.sonneborn_berger),
                ],
                highlight: None,
                cells: s.round_scores.iter().map(team_cell).collect(),
            })
            .collect();
        report
    }

    pub fn with_section(mut self, section: Option<String>) -> Self {
        self.section = section;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let section = self
            .section
            .as_deref()
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        let title = format!(
            "{} ({}) - {} standings{}",
            self.season_name,
            self.season,
            self.mode.as_str(),
            section
        );
        let _ = writeln!(out, "{}", title.bold());
        if !self.sections.is_empty() {
            let _ = writeln!(out, "Sections: {}", self.sections.join(", "));
        }

        let mut header = format!("{:>4}  {:<20} {:>6} {:>6}", "#", "Name", "Seed", "Pts");
        for name in &self.tiebreak_names {
            let _ = write!(header, " {:>6}", name);
        }
        for round in &self.rounds {
            let _ = write!(header, " {:>8}", format!("R{}", round));
        }
        let _ = writeln!(out, "{}", header.underline());

        for row in &self.rows {
            let seed = row.seed_rating.map(|r| r.to_string()).unwrap_or_default();
            let mut line = format!("{:>4}  {:<20} {:>6} {:>6}", row.rank, row.name, seed, row.score);
            for tiebreak in &row.tiebreaks {
                let _ = write!(line, " {:>6}", tiebreak);
            }
            for cell in &row.cells {
                let _ = write!(line, " {:>8}", cell);
            }
            let line = match row.highlight {
                Some(Highlight::Gold) => line.yellow().bold(),
                Some(Highlight::Silver) => line.white().bold(),
                Some(Highlight::Bronze) => line.red(),
                Some(Highlight::Blue) => line.blue(),
                None => line.normal(),
            };
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingRow {
    pub label: String,
    pub white: String,
    pub black: String,
    pub result: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingsReport {
    pub round: i32,
    pub is_completed: bool,
    pub published_rounds: Vec<i32>,
    pub next_pairing_order: i32,
    pub pairings: Vec<PairingRow>,
    pub byes: Vec<PairingRow>,
    pub unavailable: Vec<String>,
}

impl PairingsReport {
    pub fn from_review(snapshot: &SeasonSnapshot, review: &RoundReview<'_>) -> Self {
        let name = |player: Option<PlayerId>| {
            player
                .map(|p| snapshot.username(p).to_string())
                .unwrap_or_else(|| "-".to_string())
        };

        let mut pairings: Vec<PairingRow> = review
            .pairings
            .iter()
            .enumerate()
            .map(|(idx, reviewed)| PairingRow {
                label: format!("{}", idx + 1),
                white: name(reviewed.pairing.white),
                black: name(reviewed.pairing.black),
                result: reviewed.pairing.result.code().to_string(),
                error: reviewed.error.clone(),
            })
            .collect();
        for reviewed_match in &review.matches {
            let tp = reviewed_match.team_pairing;
            let team_name = |id| snapshot.team(id).map(|t| t.name.as_str()).unwrap_or("?");
            for board in &reviewed_match.boards {
                pairings.push(PairingRow {
                    label: format!(
                        "{} v {} #{}",
                        team_name(tp.white_team),
                        team_name(tp.black_team),
                        board.pairing.board_number().unwrap_or_default()
                    ),
                    white: name(board.pairing.white),
                    black: name(board.pairing.black),
                    result: board.pairing.result.code().to_string(),
                    error: board.error.clone(),
                });
            }
        }

        let byes = review
            .byes
            .iter()
            .map(|reviewed| PairingRow {
                label: reviewed.bye.bye_type.label().to_string(),
                white: name(Some(reviewed.bye.player_id)),
                black: String::new(),
                result: points(reviewed.bye.bye_type.score()),
                error: reviewed.error.clone(),
            })
            .collect();

        let mut unavailable: Vec<String> = review
            .unavailable
            .iter()
            .map(|&p| snapshot.username(p).to_string())
            .collect();
        unavailable.sort();

        Self {
            round: review.round.number,
            is_completed: review.round.is_completed,
            published_rounds: review.published_rounds.clone(),
            next_pairing_order: review.next_pairing_order,
            pairings,
            byes,
            unavailable,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let state = if self.is_completed { "completed" } else { "in progress" };
        let _ = writeln!(out, "{}", format!("Round {} ({})", self.round, state).bold());

        for row in self.pairings.iter().chain(&self.byes) {
            let _ = write!(
                out,
                "{:<24} {:<20} {:<20} {:>9}",
                row.label, row.white, row.black, row.result
            );
            if let Some(error) = &row.error {
                let _ = write!(out, "  {}", error.red());
            }
            out.push('\n');
        }
        if !self.unavailable.is_empty() {
            let _ = writeln!(out, "Unavailable: {}", self.unavailable.join(", "));
        }
        let rounds: Vec<String> = self.published_rounds.iter().map(|r| r.to_string()).collect();
        let _ = writeln!(out, "Published rounds: {}", rounds.join(", ").dimmed());
        out
    }
}

pub fn render_stats(stats: &SeasonStats) -> String {
    let mut out = String::new();
    if !stats.has_win_rate_stats() {
        let _ = writeln!(out, "No games played yet");
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:<8} {:>6} {:>7} {:>7} {:>7} {:>7} {:>8}",
            "Board", "Games", "White", "Draw", "Black", "Net", "Delta"
        )
        .underline()
    );
    for board in std::iter::once(&stats.total).chain(&stats.boards) {
        let label = board
            .board_number
            .map(|b| b.to_string())
            .unwrap_or_else(|| "All".to_string());
        let _ = writeln!(
            out,
            "{:<8} {:>6} {:>6.1}% {:>6.1}% {:>6.1}% {:>6.1}% {:>8.1}",
            label,
            board.games,
            board.percents.win * 100.0,
            board.percents.draw * 100.0,
            board.percents.loss * 100.0,
            board.percents.net * 100.0,
            board.avg_rating_delta
        );
    }
    out
}

pub fn render_crosstable(rows: &[CrossRow<'_>]) -> String {
    let mut out = String::new();
    let mut header = format!("{:<20}", "");
    for row in rows {
        let _ = write!(header, " {:>9}", row.team.number);
    }
    let _ = writeln!(out, "{}", header.underline());

    for row in rows {
        let mut line = format!("{:<20}", format!("{}. {}", row.team.number, row.team.name));
        for cell in &row.cells {
            let text = cell
                .map(|c| format!("{}-{}", points(c.game_points), points(c.opponent_game_points)))
                .unwrap_or_default();
            let _ = write!(line, " {:>9}", text);
        }
        let _ = writeln!(out, "{}", line);
    }
    out
}
