use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{PlayerAvailability, Round, SeasonId};
use crate::errors::{insert_context, query_context};

pub fn insert_round(conn: &Connection, season_id: SeasonId, round: &Round) -> Result<()> {
    let sql = "INSERT INTO rounds \
               (id, season_id, number, is_completed, publish_pairings, start_date, end_date) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    conn.execute(
        sql,
        params![
            round.id,
            season_id,
            round.number,
            round.is_completed,
            round.publish_pairings,
            round.start_date,
            round.end_date,
        ],
    )
    .with_context(|| insert_context(&format!("round {}", round.number)))?;
    Ok(())
}

pub fn list_rounds(conn: &Connection, season_id: SeasonId) -> Result<Vec<Round>> {
    let sql = "SELECT id, number, is_completed, publish_pairings, start_date, end_date \
               FROM rounds WHERE season_id = ?1 ORDER BY number";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_round_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("rounds"))?;

    Ok(rows)
}

fn parse_round_row(row: &rusqlite::Row) -> rusqlite::Result<Round> {
    Ok(Round {
        id: row.get(0)?,
        number: row.get(1)?,
        is_completed: row.get(2)?,
        publish_pairings: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
    })
}

pub fn insert_availability(conn: &Connection, availability: &PlayerAvailability) -> Result<()> {
    let sql = "INSERT INTO availability (round_id, player_id, is_available) VALUES (?1, ?2, ?3)";

    conn.execute(
        sql,
        params![
            availability.round_id,
            availability.player_id,
            availability.is_available,
        ],
    )
    .with_context(|| insert_context("availability"))?;
    Ok(())
}

pub fn list_availability(conn: &Connection, season_id: SeasonId) -> Result<Vec<PlayerAvailability>> {
    let sql = "SELECT a.round_id, a.player_id, a.is_available FROM availability a \
               JOIN rounds r ON a.round_id = r.id WHERE r.season_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], |row| {
            Ok(PlayerAvailability {
                round_id: row.get(0)?,
                player_id: row.get(1)?,
                is_available: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("availability"))?;

    Ok(rows)
}
