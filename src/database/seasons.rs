use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Season, SeasonId};
use crate::errors::{column_error, insert_context, query_context};

const SEASON_COLUMNS: &str =
    "id, league_tag, tag, name, rounds, boards, is_completed, competitor_type";

/// Find a season of a league by tag, or the most recent one when no tag is given
pub fn find_season(conn: &Connection, league_tag: &str, tag: Option<&str>) -> Result<Option<Season>> {
    match tag {
        Some(tag) => find_by_tag(conn, league_tag, tag),
        None => find_latest(conn, league_tag),
    }
}

fn find_by_tag(conn: &Connection, league_tag: &str, tag: &str) -> Result<Option<Season>> {
    let sql = format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE league_tag = ?1 AND tag = ?2");

    conn.query_row(&sql, params![league_tag, tag], parse_season_row)
        .optional()
        .with_context(|| query_context("season by tag"))
}

fn find_latest(conn: &Connection, league_tag: &str) -> Result<Option<Season>> {
    let sql = format!(
        "SELECT {SEASON_COLUMNS} FROM seasons WHERE league_tag = ?1 ORDER BY id DESC LIMIT 1"
    );

    conn.query_row(&sql, params![league_tag], parse_season_row)
        .optional()
        .with_context(|| query_context("latest season"))
}

pub fn insert_season(conn: &Connection, season: &Season) -> Result<()> {
    let sql = format!(
        "INSERT INTO seasons ({SEASON_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
    );

    conn.execute(
        &sql,
        params![
            season.id,
            season.league_tag,
            season.tag,
            season.name,
            season.rounds,
            season.boards,
            season.is_completed,
            season.competitor_type.as_str(),
        ],
    )
    .with_context(|| insert_context(&format!("season {}", season.tag)))?;
    Ok(())
}

/// Remove a season; its rounds, pairings and prizes go with it
pub fn delete_season(conn: &Connection, season_id: SeasonId) -> Result<usize> {
    conn.execute("DELETE FROM seasons WHERE id = ?1", params![season_id])
        .context("Failed to delete season")
}

pub fn find_season_by_id(conn: &Connection, season_id: SeasonId) -> Result<Option<Season>> {
    let sql = format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = ?1");

    conn.query_row(&sql, params![season_id], parse_season_row)
        .optional()
        .with_context(|| query_context("season by id"))
}

fn parse_season_row(row: &rusqlite::Row) -> rusqlite::Result<Season> {
    let competitor_type: String = row.get(7)?;

    Ok(Season {
        id: row.get(0)?,
        league_tag: row.get(1)?,
        tag: row.get(2)?,
        name: row.get(3)?,
        rounds: row.get(4)?,
        boards: row.get(5)?,
        is_completed: row.get(6)?,
        competitor_type: competitor_type.parse().map_err(|e| column_error(7, e))?,
    })
}
