use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::cache::{StandingsCache, StandingsKey};
use crate::config::settings::AppConfig;
use crate::database::{self, seasons, DbPool};
use crate::domain::{CompetitorType, PlayerId, SeasonSnapshot};
use crate::report::{render_crosstable, render_stats, PairingsReport, StandingsReport};
use crate::scoring::{
    compute_standings, cross_scores, player_highlights, review_round, season_stats,
    section_standings, Highlight, RatingSection, Standings, StandingsMode,
};
use std::collections::HashMap;

/// Which standings table to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsQuery {
    pub league: String,
    pub season: Option<String>,
    pub mode: StandingsMode,
    pub include_current: bool,
    pub section: Option<String>,
}

pub struct StandingsService {
    config: AppConfig,
    pool: DbPool,
    cache: Option<StandingsCache>,
}

impl StandingsService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let pool = database::create_pool(&config.database.path)?;
        Self::with_pool(config, pool)
    }

    pub fn with_pool(config: AppConfig, pool: DbPool) -> Result<Self> {
        let cache = if config.cache.enabled {
            Some(StandingsCache::new(&config.cache.dir)?)
        } else {
            None
        };
        Ok(Self { config, pool, cache })
    }

    fn load_snapshot(&self, league: &str, season: Option<&str>) -> Result<SeasonSnapshot> {
        let conn = database::get_connection(&self.pool)?;
        database::load_season(&conn, league, season)
    }

    pub fn standings(&self, query: &StandingsQuery) -> Result<StandingsReport> {
        let conn = database::get_connection(&self.pool)?;
        let season = seasons::find_season(&conn, &query.league, query.season.as_deref())?
            .ok_or_else(|| match &query.season {
                Some(tag) => anyhow!("Season {} not found in league {}", tag, query.league),
                None => anyhow!("League {} has no seasons", query.league),
            })?;
        drop(conn);

        let key = StandingsKey {
            league: query.league.clone(),
            season: season.tag.clone(),
            mode: query.mode,
            include_current: query.include_current,
            section: query.section.clone(),
        };
        if let Some(cache) = &self.cache {
            match cache.load(&key) {
                Ok(Some(report)) => return Ok(report),
                Ok(None) => {}
                Err(e) => warn!("Recomputing standings, unreadable cache entry: {:#}", e),
            }
        }

        let snapshot = self.load_snapshot(&query.league, Some(&season.tag))?;
        let highlights = self.highlights(&snapshot)?;
        let report = self.build_report(&snapshot, query, &highlights)?;
        info!(
            "Computed {} standings for {}/{}: {} rows",
            query.mode.as_str(),
            query.league,
            season.tag,
            report.rows.len()
        );

        if let Some(cache) = &self.cache {
            cache.save(&key, &report)?;
        }
        Ok(report)
    }

    fn highlights(&self, snapshot: &SeasonSnapshot) -> Result<HashMap<PlayerId, Highlight>> {
        let conn = database::get_connection(&self.pool)?;
        let (prizes, winners) = database::highlight_prizes(&conn, snapshot.season())?;
        Ok(player_highlights(&prizes, &winners))
    }

    fn build_report(
        &self,
        snapshot: &SeasonSnapshot,
        query: &StandingsQuery,
        highlights: &HashMap<PlayerId, Highlight>,
    ) -> Result<StandingsReport> {
        let section = match query.section.as_deref() {
            Some(key) => {
                let section = RatingSection::parse(key)?;
                if section.is_none() {
                    warn!("Ignoring unknown rating section {}", key);
                }
                section
            }
            None => None,
        };
        let standings = compute_standings(
            snapshot,
            query.mode,
            query.include_current,
            &self.config.scoring,
        );

        let report = match standings {
            Standings::Lone(rows) => {
                let rows = match section {
                    Some(section) => section_standings(rows, section),
                    None => rows,
                };
                StandingsReport::from_players(snapshot, query.mode, &rows, highlights)
            }
            Standings::Team(rows) => {
                if section.is_some() {
                    return Err(anyhow!("Rating sections apply to individual seasons only"));
                }
                StandingsReport::from_teams(snapshot, query.mode, &rows)
            }
        };
        Ok(report.with_section(section.map(|s| s.key())))
    }

    pub fn pairings(
        &self,
        league: &str,
        season: Option<&str>,
        round: Option<i32>,
        privileged: bool,
    ) -> Result<PairingsReport> {
        let snapshot = self.load_snapshot(league, season)?;
        let review = review_round(&snapshot, round, privileged).ok_or_else(|| match round {
            Some(round) => anyhow!("Round {} has no published pairings", round),
            None => anyhow!("No round of {} has published pairings", snapshot.season().tag),
        })?;
        Ok(PairingsReport::from_review(&snapshot, &review))
    }

    pub fn stats(&self, league: &str, season: Option<&str>) -> Result<String> {
        let snapshot = self.load_snapshot(league, season)?;
        Ok(render_stats(&season_stats(&snapshot)))
    }

    pub fn crosstable(&self, league: &str, season: Option<&str>) -> Result<String> {
        let snapshot = self.load_snapshot(league, season)?;
        if snapshot.season().competitor_type != CompetitorType::Team {
            return Err(anyhow!("Crosstables exist for team seasons only"));
        }
        Ok(render_crosstable(&cross_scores(&snapshot)))
    }
}
