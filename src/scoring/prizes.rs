use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::standings::PlayerStanding;
use crate::domain::{PlayerId, PrizeWinner, SeasonPrize};

/// Prize decoration shown next to a player, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Gold,
    Silver,
    Bronze,
    Blue,
}

impl Highlight {
    pub fn as_str(&self) -> &str {
        match self {
            Highlight::Gold => "gold",
            Highlight::Silver => "silver",
            Highlight::Bronze => "bronze",
            Highlight::Blue => "blue",
        }
    }

    fn for_prize(prize: &SeasonPrize) -> Option<Self> {
        match (prize.max_rating, prize.rank) {
            (None, 1) => Some(Highlight::Gold),
            (None, 2) => Some(Highlight::Silver),
            (None, 3) => Some(Highlight::Bronze),
            (Some(_), 1) => Some(Highlight::Blue),
            _ => None,
        }
    }
}

/// Best highlight earned by each prize winner
pub fn player_highlights(prizes: &[SeasonPrize], winners: &[PrizeWinner]) -> HashMap<PlayerId, Highlight> {
    let by_prize: HashMap<_, _> = prizes
        .iter()
        .filter_map(|p| Highlight::for_prize(p).map(|h| (p.id, h)))
        .collect();

    let mut highlights: HashMap<PlayerId, Highlight> = HashMap::new();
    for winner in winners {
        let Some(&highlight) = by_prize.get(&winner.prize_id) else {
            continue;
        };
        highlights
            .entry(winner.player_id)
            .and_modify(|h| *h = (*h).min(highlight))
            .or_insert(highlight);
    }
    highlights
}

/// Standings restricted to players rated below a cap, keyed as `u<cap>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RatingSection {
    pub max_rating: i32,
}

fn compile_section_regex() -> Result<Regex> {
    Regex::new(r"^u(\d+)").context("Failed to compile rating section pattern")
}

impl RatingSection {
    /// `None` for keys that name no rating section
    pub fn parse(key: &str) -> Result<Option<Self>> {
        let regex = compile_section_regex()?;
        let Some(captures) = regex.captures(key) else {
            return Ok(None);
        };
        let max_rating = captures[1]
            .parse::<i32>()
            .with_context(|| format!("Invalid rating cap in section: {}", key))?;
        Ok(Some(Self { max_rating }))
    }

    pub fn key(&self) -> String {
        format!("u{}", self.max_rating)
    }

    /// Unrated players belong to every section
    pub fn contains(&self, seed_rating: Option<i32>) -> bool {
        seed_rating.is_none_or(|rating| rating < self.max_rating)
    }
}

/// Sections offered by a season, one per distinct prize cap
pub fn rating_sections(prizes: &[SeasonPrize]) -> Vec<RatingSection> {
    let mut sections: Vec<RatingSection> = prizes
        .iter()
        .filter_map(|p| p.max_rating)
        .map(|max_rating| RatingSection { max_rating })
        .collect();
    sections.sort();
    sections.dedup();
    sections
}

/// Keep the players of one section; ranks stay those of the full table
pub fn section_standings<'a>(
    standings: Vec<PlayerStanding<'a>>,
    section: RatingSection,
) -> Vec<PlayerStanding<'a>> {
    standings
        .into_iter()
        .filter(|s| section.contains(s.score.seed_rating))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{lone_standings, StandingsMode};
    use crate::testing::SeasonBuilder;

    #[test]
    fn test_highlights_keep_the_best_prize() {
        let mut builder = SeasonBuilder::lone(1);
        let a = builder.player("alice", Some(2000));
        let b = builder.player("bob", Some(1500));
        let c = builder.player("carol", Some(1400));
        let first = builder.prize(1, None);
        let second = builder.prize(2, None);
        let u1600 = builder.prize(1, Some(1600));
        let u1600_second = builder.prize(2, Some(1600));
        builder.winner(first, a);
        builder.winner(second, b);
        builder.winner(u1600, b);
        builder.winner(u1600_second, c);
        let snapshot = builder.build();

        let highlights = player_highlights(snapshot.prizes(), snapshot.prize_winners());

        assert_eq!(highlights.get(&a), Some(&Highlight::Gold));
        assert_eq!(highlights.get(&b), Some(&Highlight::Silver));
        assert_eq!(highlights.get(&c), None);
    }

    #[test]
    fn test_section_key_parsing() {
        assert_eq!(RatingSection::parse("u1600").unwrap().unwrap().max_rating, 1600);
        assert_eq!(RatingSection::parse("u1800-open").unwrap().unwrap().key(), "u1800");
        assert_eq!(RatingSection::parse("open").unwrap(), None);
        assert_eq!(RatingSection::parse("1600").unwrap(), None);
        assert!(RatingSection::parse("u99999999999").is_err());
    }

    #[test]
    fn test_sections_from_capped_prizes() {
        let mut builder = SeasonBuilder::lone(1);
        builder.prize(1, Some(1800));
        builder.prize(1, Some(1400));
        builder.prize(2, Some(1800));
        builder.prize(1, None);
        let snapshot = builder.build();

        let keys: Vec<String> = rating_sections(snapshot.prizes()).iter().map(|s| s.key()).collect();

        assert_eq!(keys, vec!["u1400", "u1800"]);
    }

    #[test]
    fn test_section_standings_keep_overall_ranks() {
        let mut builder = SeasonBuilder::lone(1);
        builder.player("strong", Some(2000));
        let mid = builder.player("mid", Some(1500));
        let unrated = builder.player("unrated", None);
        let snapshot = builder.build();
        let standings = lone_standings(&snapshot, StandingsMode::Seed, false);

        let section = section_standings(standings, RatingSection { max_rating: 1600 });

        let rows: Vec<(usize, PlayerId)> = section.iter().map(|s| (s.rank, s.player.id)).collect();
        assert_eq!(rows, vec![(2, mid), (3, unrated)]);
    }

    #[test]
    fn test_section_ranks_agree_with_opponent_ranks() {
        let mut builder = SeasonBuilder::lone(1);
        let strong = builder.player("strong", Some(2000));
        let weak = builder.player("weak", Some(1200));
        builder.pairing(1, Some(strong), Some(weak), "1-0");
        let snapshot = builder.build();
        let standings = lone_standings(&snapshot, StandingsMode::Final, false);

        let section = section_standings(standings, RatingSection { max_rating: 1600 });

        assert_eq!(section.len(), 1);
        assert_eq!(section[0].player.id, weak);
        assert_eq!(section[0].rank, 2);
        assert_eq!(section[0].round_scores[0].opponent_rank, Some(1));
    }
}
