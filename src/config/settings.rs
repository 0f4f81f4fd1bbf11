use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::scoring::Points;

pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "league_standings.db".to_string()),
        }
    }
}

pub struct CacheSettings {
    pub dir: PathBuf,
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: std::env::var("STANDINGS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cache")),
            enabled: true,
        }
    }
}

/// Match points awarded per team match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringSettings {
    pub match_win_points: Points,
    pub match_draw_points: Points,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            match_win_points: Decimal::from(2),
            match_draw_points: Decimal::ONE,
        }
    }
}

impl ScoringSettings {
    pub fn match_points(&self, game_points: Points, opponent_game_points: Points) -> Points {
        if game_points > opponent_game_points {
            self.match_win_points
        } else if game_points == opponent_game_points {
            self.match_draw_points
        } else {
            Decimal::ZERO
        }
    }
}

pub struct AppConfig {
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub scoring: ScoringSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database: DatabaseSettings::default(),
            cache: CacheSettings::default(),
            scoring: ScoringSettings::default(),
        }
    }

    pub fn without_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }
}
