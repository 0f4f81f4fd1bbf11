use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{ByeType, Color, GameResult, PlayerId, Round, TeamId};

pub type Points = Decimal;
pub type RankLookup = HashMap<PlayerId, usize>;
pub type TeamRankLookup = HashMap<TeamId, usize>;

/// Outcome of a round from one competitor's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    Win,
    Draw,
    Loss,
    ForfeitWin,
    ForfeitLoss,
    ForfeitDraw,
    DoubleForfeit,
    /// Paired, result not entered yet
    Pending,
    FullBye,
    HalfBye,
    ZeroBye,
    /// Round counted, but the competitor was neither paired nor given a bye
    NoGame,
    /// Round not counted yet
    Upcoming,
}

impl ResultType {
    pub fn from_game(result: GameResult, color: Color) -> Self {
        let score = match color {
            Color::White => result.white_score(),
            Color::Black => result.black_score(),
        };
        let Some(score) = score else {
            return ResultType::Pending;
        };

        if result == GameResult::DoubleForfeit {
            ResultType::DoubleForfeit
        } else if result.is_forfeit() {
            forfeit_from_score(score)
        } else {
            played_from_score(score)
        }
    }

    pub fn from_bye(bye_type: ByeType) -> Self {
        match bye_type {
            ByeType::FullPoint => ResultType::FullBye,
            ByeType::HalfPoint => ResultType::HalfBye,
            ByeType::ZeroPoint => ResultType::ZeroBye,
        }
    }

    pub fn from_match(points: Points, opponent_points: Points) -> Self {
        match points.cmp(&opponent_points) {
            std::cmp::Ordering::Greater => ResultType::Win,
            std::cmp::Ordering::Equal => ResultType::Draw,
            std::cmp::Ordering::Less => ResultType::Loss,
        }
    }

    /// Short code shown in crosstables and wallcharts
    pub fn code(&self) -> &str {
        match self {
            ResultType::Win => "W",
            ResultType::Draw => "D",
            ResultType::Loss => "L",
            ResultType::ForfeitWin => "X",
            ResultType::ForfeitLoss => "Z",
            ResultType::ForfeitDraw => "F",
            ResultType::DoubleForfeit => "Z",
            ResultType::Pending => "",
            ResultType::FullBye => "B",
            ResultType::HalfBye => "H",
            ResultType::ZeroBye => "U",
            ResultType::NoGame => "-",
            ResultType::Upcoming => "",
        }
    }

    /// Points earned without playing over the board
    pub fn is_unplayed(&self) -> bool {
        matches!(
            self,
            ResultType::ForfeitWin
                | ResultType::ForfeitLoss
                | ResultType::ForfeitDraw
                | ResultType::DoubleForfeit
                | ResultType::FullBye
                | ResultType::HalfBye
                | ResultType::ZeroBye
                | ResultType::NoGame
        )
    }
}

fn forfeit_from_score(score: Decimal) -> ResultType {
    if score == Decimal::ONE {
        ResultType::ForfeitWin
    } else if score.is_zero() {
        ResultType::ForfeitLoss
    } else {
        ResultType::ForfeitDraw
    }
}

fn played_from_score(score: Decimal) -> ResultType {
    if score == Decimal::ONE {
        ResultType::Win
    } else if score.is_zero() {
        ResultType::Loss
    } else {
        ResultType::Draw
    }
}

/// One entry of an individual competitor's trajectory
#[derive(Debug, Clone)]
pub struct RoundScore<'a> {
    pub round: &'a Round,
    pub result: ResultType,
    pub color: Option<Color>,
    pub opponent: Option<PlayerId>,
    pub opponent_rank: Option<usize>,
    pub points: Points,
    pub cumulative: Points,
}

/// Which ordering a standings table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StandingsMode {
    /// Pre-season seed rating, for the wallchart
    Seed,
    /// In-progress score, while rounds are being played
    Pairing,
    /// Tie-break aware final ranking
    Final,
}

impl StandingsMode {
    pub fn as_str(&self) -> &str {
        match self {
            StandingsMode::Seed => "seed",
            StandingsMode::Pairing => "pairing",
            StandingsMode::Final => "final",
        }
    }
}
