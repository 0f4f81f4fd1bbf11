use anyhow::bail;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type SeasonId = i64;
pub type PlayerId = i64;
pub type TeamId = i64;
pub type RoundId = i64;
pub type PairingId = i64;
pub type TeamPairingId = i64;
pub type PrizeId = i64;

/// Whether a league pairs individual players or whole teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitorType {
    Lone,
    Team,
}

impl CompetitorType {
    pub fn as_str(&self) -> &str {
        match self {
            CompetitorType::Lone => "lone",
            CompetitorType::Team => "team",
        }
    }
}

impl FromStr for CompetitorType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lone" => Ok(CompetitorType::Lone),
            "team" => Ok(CompetitorType::Team),
            other => bail!("Unknown competitor type: {}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub league_tag: String,
    pub tag: String,
    pub name: String,
    pub rounds: i32,
    pub boards: Option<i32>,
    pub is_completed: bool,
    pub competitor_type: CompetitorType,
}

impl Season {
    pub fn board_numbers(&self) -> Vec<i32> {
        (1..=self.boards.unwrap_or(0)).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub rating: Option<i32>,
}

/// A player's registration for one season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonPlayer {
    pub player_id: PlayerId,
    pub seed_rating: Option<i32>,
    pub is_active: bool,
    #[serde(default)]
    pub late_join_points: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub number: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub number: i32,
    pub is_completed: bool,
    pub publish_pairings: bool,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl Round {
    /// Completed rounds always count; a published round counts only when the
    /// caller asks for the current round as well.
    pub fn is_visible(&self, include_current: bool) -> bool {
        self.is_completed || (include_current && self.publish_pairings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn as_str(&self) -> &str {
        match self {
            Color::White => "W",
            Color::Black => "B",
        }
    }
}

/// Result codes as entered by round administrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GameResult {
    #[default]
    Unset,
    WhiteWin,
    Draw,
    BlackWin,
    WhiteForfeitWin,
    BlackForfeitWin,
    ForfeitDraw,
    DoubleForfeit,
}

impl GameResult {
    pub fn code(&self) -> &'static str {
        match self {
            GameResult::Unset => "",
            GameResult::WhiteWin => "1-0",
            GameResult::Draw => "1/2-1/2",
            GameResult::BlackWin => "0-1",
            GameResult::WhiteForfeitWin => "1X-0F",
            GameResult::BlackForfeitWin => "0F-1X",
            GameResult::ForfeitDraw => "1/2Z-1/2Z",
            GameResult::DoubleForfeit => "0F-0F",
        }
    }

    pub fn is_set(&self) -> bool {
        *self != GameResult::Unset
    }

    pub fn is_forfeit(&self) -> bool {
        matches!(
            self,
            GameResult::WhiteForfeitWin
                | GameResult::BlackForfeitWin
                | GameResult::ForfeitDraw
                | GameResult::DoubleForfeit
        )
    }

    pub fn white_score(&self) -> Option<Decimal> {
        match self {
            GameResult::Unset => None,
            GameResult::WhiteWin | GameResult::WhiteForfeitWin => Some(Decimal::ONE),
            GameResult::Draw | GameResult::ForfeitDraw => Some(half_point()),
            GameResult::BlackWin | GameResult::BlackForfeitWin | GameResult::DoubleForfeit => {
                Some(Decimal::ZERO)
            }
        }
    }

    pub fn black_score(&self) -> Option<Decimal> {
        match self {
            GameResult::Unset => None,
            GameResult::BlackWin | GameResult::BlackForfeitWin => Some(Decimal::ONE),
            GameResult::Draw | GameResult::ForfeitDraw => Some(half_point()),
            GameResult::WhiteWin | GameResult::WhiteForfeitWin | GameResult::DoubleForfeit => {
                Some(Decimal::ZERO)
            }
        }
    }
}

impl FromStr for GameResult {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let result = match s.trim() {
            "" => GameResult::Unset,
            "1-0" => GameResult::WhiteWin,
            "1/2-1/2" => GameResult::Draw,
            "0-1" => GameResult::BlackWin,
            "1X-0F" => GameResult::WhiteForfeitWin,
            "0F-1X" => GameResult::BlackForfeitWin,
            "1/2Z-1/2Z" => GameResult::ForfeitDraw,
            "0F-0F" => GameResult::DoubleForfeit,
            other => bail!("Unknown game result: {:?}", other),
        };
        Ok(result)
    }
}

impl TryFrom<String> for GameResult {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameResult> for String {
    fn from(result: GameResult) -> Self {
        result.code().to_string()
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn half_point() -> Decimal {
    Decimal::new(5, 1)
}

/// Where a pairing sits: directly in a round, or on a board of a team match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PairingKind {
    Lone {
        round_id: RoundId,
        #[serde(default)]
        pairing_order: i32,
    },
    Team {
        team_pairing_id: TeamPairingId,
        board_number: i32,
    },
}

/// One game between two players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    pub id: PairingId,
    pub white: Option<PlayerId>,
    pub black: Option<PlayerId>,
    #[serde(default)]
    pub result: GameResult,
    #[serde(default)]
    pub game_link: String,
    #[serde(default)]
    pub scheduled_time: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub kind: PairingKind,
}

impl Pairing {
    pub fn player(&self, color: Color) -> Option<PlayerId> {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn score(&self, color: Color) -> Option<Decimal> {
        match color {
            Color::White => self.result.white_score(),
            Color::Black => self.result.black_score(),
        }
    }

    pub fn opponent(&self, color: Color) -> Option<PlayerId> {
        match color {
            Color::White => self.black,
            Color::Black => self.white,
        }
    }

    pub fn board_number(&self) -> Option<i32> {
        match self.kind {
            PairingKind::Team { board_number, .. } => Some(board_number),
            PairingKind::Lone { .. } => None,
        }
    }

    pub fn team_pairing_id(&self) -> Option<TeamPairingId> {
        match self.kind {
            PairingKind::Team { team_pairing_id, .. } => Some(team_pairing_id),
            PairingKind::Lone { .. } => None,
        }
    }

    /// Forfeits carry a result but no game link; only played games count
    pub fn is_played_game(&self) -> bool {
        self.result.is_set() && !self.game_link.is_empty()
    }
}

/// A match between two teams in one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPairing {
    pub id: TeamPairingId,
    pub round_id: RoundId,
    pub white_team: TeamId,
    pub black_team: TeamId,
    #[serde(default)]
    pub pairing_order: i32,
}

impl TeamPairing {
    /// The white team's player takes white on odd boards
    pub fn team_for(&self, board_number: i32, color: Color) -> TeamId {
        let odd = board_number % 2 == 1;
        match (odd, color) {
            (true, Color::White) | (false, Color::Black) => self.white_team,
            (true, Color::Black) | (false, Color::White) => self.black_team,
        }
    }

    /// The colour a team's player has on the given board
    pub fn color_for(&self, board_number: i32, team_id: TeamId) -> Option<Color> {
        if self.team_for(board_number, Color::White) == team_id {
            Some(Color::White)
        } else if self.team_for(board_number, Color::Black) == team_id {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, team_id: TeamId) -> Option<TeamId> {
        if self.white_team == team_id {
            Some(self.black_team)
        } else if self.black_team == team_id {
            Some(self.white_team)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByeType {
    FullPoint,
    HalfPoint,
    ZeroPoint,
}

impl ByeType {
    pub fn score(&self) -> Decimal {
        match self {
            ByeType::FullPoint => Decimal::ONE,
            ByeType::HalfPoint => half_point(),
            ByeType::ZeroPoint => Decimal::ZERO,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ByeType::FullPoint => "full-point",
            ByeType::HalfPoint => "half-point",
            ByeType::ZeroPoint => "zero-point",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ByeType::FullPoint => "Full point bye",
            ByeType::HalfPoint => "Half point bye",
            ByeType::ZeroPoint => "Zero point bye",
        }
    }
}

impl FromStr for ByeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-point" => Ok(ByeType::FullPoint),
            "half-point" => Ok(ByeType::HalfPoint),
            "zero-point" => Ok(ByeType::ZeroPoint),
            other => bail!("Unknown bye type: {}", other),
        }
    }
}

/// A round in which a player is not paired but still scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bye {
    pub id: i64,
    pub round_id: RoundId,
    pub player_id: PlayerId,
    pub bye_type: ByeType,
    #[serde(default)]
    pub player_rank: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAvailability {
    pub round_id: RoundId,
    pub player_id: PlayerId,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonPrize {
    pub id: PrizeId,
    pub rank: i32,
    pub max_rating: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizeWinner {
    pub prize_id: PrizeId,
    pub player_id: PlayerId,
}
