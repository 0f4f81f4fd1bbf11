use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::cache::StandingsCache;
use crate::config::settings::AppConfig;
use crate::database::{self, DbPool};
use crate::domain::{SeasonData, SeasonSnapshot};
use crate::errors::with_parse_context;

/// Loads season documents into the database and drops stale cached standings
pub struct ImportService {
    pool: DbPool,
    cache: Option<StandingsCache>,
}

impl ImportService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let pool = database::create_pool(&config.database.path)?;
        Self::with_pool(config, pool)
    }

    pub fn with_pool(config: &AppConfig, pool: DbPool) -> Result<Self> {
        let cache = if config.cache.enabled {
            Some(StandingsCache::new(&config.cache.dir)?)
        } else {
            None
        };
        Ok(Self { pool, cache })
    }

    pub fn init(&self) -> Result<()> {
        let conn = database::get_connection(&self.pool)?;
        database::setup::reset_database(&conn)?;
        if let Some(cache) = &self.cache {
            cache.clear()?;
        }
        info!("Database schema reset");
        Ok(())
    }

    pub fn import_file(&self, path: &Path) -> Result<SeasonSnapshot> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read season document {}", path.display()))?;
        let data: SeasonData = with_parse_context(
            serde_json::from_str(&json),
            &format!("season document {}", path.display()),
        )?;
        self.import(data)
    }

    /// Check the document is self-consistent before anything is written
    pub fn import(&self, data: SeasonData) -> Result<SeasonSnapshot> {
        let snapshot = SeasonSnapshot::new(data.clone()).with_context(|| {
            format!("Rejected season {} of league {}", data.season.tag, data.season.league_tag)
        })?;

        let mut conn = database::get_connection(&self.pool)?;
        database::import_season(&mut conn, &data)?;

        if let Some(cache) = &self.cache {
            cache.invalidate_season(&data.season.league_tag, &data.season.tag)?;
        }
        Ok(snapshot)
    }
}
