use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;
use crate::scoring::StandingsMode;

/// Everything a rendered standings table depends on besides the season data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsKey {
    pub league: String,
    pub season: String,
    pub mode: StandingsMode,
    pub include_current: bool,
    pub section: Option<String>,
}

impl StandingsKey {
    fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.json",
            self.mode.as_str(),
            if self.include_current { "current" } else { "completed" },
            self.section.as_deref().unwrap_or("all")
        )
    }
}

/// File-based cache of computed standings, one directory per season
pub struct StandingsCache {
    cache_dir: PathBuf,
}

impl StandingsCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir })
    }

    fn season_dir(&self, league: &str, season: &str) -> PathBuf {
        self.cache_dir.join(league).join(season)
    }

    fn build_path(&self, key: &StandingsKey) -> PathBuf {
        self.season_dir(&key.league, &key.season).join(key.file_name())
    }

    pub fn save<T: Serialize>(&self, key: &StandingsKey, data: &T) -> Result<()> {
        let file_path = self.build_path(key);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create season cache directory")?;
        }
        self.write_json(&file_path, data)
            .with_context(|| cache_context("save", &file_path.display().to_string()))?;

        info!("Saved standings to cache: {}", file_path.display());
        Ok(())
    }

    pub fn load<T: for<'de> Deserialize<'de>>(&self, key: &StandingsKey) -> Result<Option<T>> {
        let file_path = self.build_path(key);
        let data = self
            .read_json_opt(&file_path)
            .with_context(|| cache_context("load", &file_path.display().to_string()))?;
        if data.is_some() {
            info!("Loaded standings from cache: {}", file_path.display());
        }
        Ok(data)
    }

    pub fn exists(&self, key: &StandingsKey) -> bool {
        self.build_path(key).exists()
    }

    /// Drop every cached table of one season, after its data changed
    pub fn invalidate_season(&self, league: &str, season: &str) -> Result<()> {
        let dir = self.season_dir(league, season);
        if !dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&dir).context("Failed to invalidate season cache")?;
        info!("Invalidated cache for {}/{}", league, season);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;
        fs::create_dir_all(&self.cache_dir).context("Failed to recreate cache directory")?;

        info!("Cleared cache directory");
        Ok(())
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}
