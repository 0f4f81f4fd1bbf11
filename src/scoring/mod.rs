pub mod prizes;
pub mod round_scores;
pub mod score;
pub mod standings;
pub mod stats;
pub mod team;
pub mod types;
pub mod validation;

pub use prizes::{player_highlights, rating_sections, section_standings, Highlight, RatingSection};
pub use round_scores::{PairingIndex, RoundOutcome, RoundScores};
pub use score::{compute_lone_scores, LonePlayerScore, TieBreaks};
pub use standings::{compute_standings, lone_standings, PlayerStanding, Standings};
pub use stats::{count_results, season_stats, BoardStats, SeasonStats};
pub use team::{
    cross_scores, team_game_counts, team_standings, CrossCell, CrossRow, TeamRoundScore, TeamScore,
    TeamStanding,
};
pub use types::{Points, RankLookup, ResultType, RoundScore, StandingsMode, TeamRankLookup};
pub use validation::{bye_error, duplicate_players, pairing_error, review_round, RoundReview};
