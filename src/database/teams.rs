use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{SeasonId, Team, TeamPairing};
use crate::errors::{insert_context, query_context};

pub fn insert_team(conn: &Connection, season_id: SeasonId, team: &Team) -> Result<()> {
    conn.execute(
        "INSERT INTO teams (id, season_id, number, name) VALUES (?1, ?2, ?3, ?4)",
        params![team.id, season_id, team.number, team.name],
    )
    .with_context(|| insert_context(&format!("team {}", team.name)))?;
    Ok(())
}

pub fn list_teams(conn: &Connection, season_id: SeasonId) -> Result<Vec<Team>> {
    let sql = "SELECT id, number, name FROM teams WHERE season_id = ?1 ORDER BY number";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], |row| {
            Ok(Team {
                id: row.get(0)?,
                number: row.get(1)?,
                name: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("teams"))?;

    Ok(rows)
}

pub fn insert_team_pairing(conn: &Connection, team_pairing: &TeamPairing) -> Result<()> {
    let sql = "INSERT INTO team_pairings \
               (id, round_id, white_team_id, black_team_id, pairing_order) \
               VALUES (?1, ?2, ?3, ?4, ?5)";

    conn.execute(
        sql,
        params![
            team_pairing.id,
            team_pairing.round_id,
            team_pairing.white_team,
            team_pairing.black_team,
            team_pairing.pairing_order,
        ],
    )
    .with_context(|| insert_context("team pairing"))?;
    Ok(())
}

pub fn list_team_pairings(conn: &Connection, season_id: SeasonId) -> Result<Vec<TeamPairing>> {
    let sql = "SELECT tp.id, tp.round_id, tp.white_team_id, tp.black_team_id, tp.pairing_order \
               FROM team_pairings tp JOIN rounds r ON tp.round_id = r.id \
               WHERE r.season_id = ?1 ORDER BY r.number, tp.pairing_order";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_team_pairing_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("team pairings"))?;

    Ok(rows)
}

fn parse_team_pairing_row(row: &rusqlite::Row) -> rusqlite::Result<TeamPairing> {
    Ok(TeamPairing {
        id: row.get(0)?,
        round_id: row.get(1)?,
        white_team: row.get(2)?,
        black_team: row.get(3)?,
        pairing_order: row.get(4)?,
    })
}
