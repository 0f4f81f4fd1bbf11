pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod report;
pub mod scoring;
pub mod services;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::{Cli, SeasonArgs};
use std::path::Path;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::scoring::StandingsMode;
use crate::services::{ImportService, StandingsQuery, StandingsService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    let service = ImportService::new(&config)?;
    service.init()
}

pub fn handle_import(file: &Path) -> Result<()> {
    let config = AppConfig::new();
    let service = ImportService::new(&config)?;
    let snapshot = service.import_file(file)?;
    println!(
        "Imported {} ({} rounds, {} pairings)",
        snapshot.season().name,
        snapshot.rounds().len(),
        snapshot.pairings().len()
    );
    Ok(())
}

pub fn handle_standings(
    season: &SeasonArgs,
    mode: StandingsMode,
    include_current: bool,
    section: Option<&str>,
    no_cache: bool,
) -> Result<()> {
    let config = if no_cache {
        AppConfig::new().without_cache()
    } else {
        AppConfig::new()
    };
    let service = StandingsService::new(config)?;
    let report = service.standings(&StandingsQuery {
        league: season.league.clone(),
        season: season.season.clone(),
        mode,
        include_current,
        section: section.map(str::to_string),
    })?;
    print!("{}", report.render());
    Ok(())
}

pub fn handle_wallchart(season: &SeasonArgs) -> Result<()> {
    handle_standings(season, StandingsMode::Seed, true, None, false)
}

pub fn handle_pairings(season: &SeasonArgs, round: Option<i32>, privileged: bool) -> Result<()> {
    let service = StandingsService::new(AppConfig::new())?;
    let report = service.pairings(&season.league, season.season.as_deref(), round, privileged)?;
    print!("{}", report.render());
    Ok(())
}

pub fn handle_stats(season: &SeasonArgs) -> Result<()> {
    let service = StandingsService::new(AppConfig::new())?;
    print!("{}", service.stats(&season.league, season.season.as_deref())?);
    Ok(())
}

pub fn handle_crosstable(season: &SeasonArgs) -> Result<()> {
    let service = StandingsService::new(AppConfig::new())?;
    print!("{}", service.crosstable(&season.league, season.season.as_deref())?);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "league-standings", &mut std::io::stdout());
    Ok(())
}
