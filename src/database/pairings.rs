use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{Bye, Pairing, PairingKind, SeasonId};
use crate::errors::{column_error, insert_context, query_context};

pub fn insert_pairing(conn: &Connection, pairing: &Pairing) -> Result<()> {
    let (round_id, pairing_order, team_pairing_id, board_number) = match pairing.kind {
        PairingKind::Lone {
            round_id,
            pairing_order,
        } => (Some(round_id), Some(pairing_order), None, None),
        PairingKind::Team {
            team_pairing_id,
            board_number,
        } => (None, None, Some(team_pairing_id), Some(board_number)),
    };
    let sql = "INSERT INTO pairings \
               (id, white_id, black_id, result, game_link, scheduled_time, \
                round_id, pairing_order, team_pairing_id, board_number) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

    conn.execute(
        sql,
        params![
            pairing.id,
            pairing.white,
            pairing.black,
            pairing.result.code(),
            pairing.game_link,
            pairing.scheduled_time,
            round_id,
            pairing_order,
            team_pairing_id,
            board_number,
        ],
    )
    .with_context(|| insert_context(&format!("pairing {}", pairing.id)))?;
    Ok(())
}

/// Individual and board pairings of a season, in round order
pub fn list_pairings(conn: &Connection, season_id: SeasonId) -> Result<Vec<Pairing>> {
    let sql = "SELECT p.id, p.white_id, p.black_id, p.result, p.game_link, p.scheduled_time, \
                      p.round_id, p.pairing_order, p.team_pairing_id, p.board_number \
               FROM pairings p \
               LEFT JOIN team_pairings tp ON p.team_pairing_id = tp.id \
               JOIN rounds r ON r.id = COALESCE(p.round_id, tp.round_id) \
               WHERE r.season_id = ?1 \
               ORDER BY r.number, tp.pairing_order, p.pairing_order, p.board_number";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_pairing_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("pairings"))?;

    Ok(rows)
}

fn parse_pairing_row(row: &rusqlite::Row) -> rusqlite::Result<Pairing> {
    let id: i64 = row.get(0)?;
    let result: String = row.get(3)?;
    let round_id: Option<i64> = row.get(6)?;
    let pairing_order: Option<i32> = row.get(7)?;
    let team_pairing_id: Option<i64> = row.get(8)?;
    let board_number: Option<i32> = row.get(9)?;

    let kind = match (team_pairing_id, board_number, round_id) {
        (Some(team_pairing_id), Some(board_number), _) => PairingKind::Team {
            team_pairing_id,
            board_number,
        },
        (None, _, Some(round_id)) => PairingKind::Lone {
            round_id,
            pairing_order: pairing_order.unwrap_or(0),
        },
        _ => {
            return Err(column_error(
                6,
                anyhow!("Pairing {} has neither a round nor a board", id),
            ))
        }
    };

    Ok(Pairing {
        id,
        white: row.get(1)?,
        black: row.get(2)?,
        result: result.parse().map_err(|e| column_error(3, e))?,
        game_link: row.get(4)?,
        scheduled_time: row.get(5)?,
        kind,
    })
}

pub fn insert_bye(conn: &Connection, bye: &Bye) -> Result<()> {
    let sql = "INSERT INTO byes (id, round_id, player_id, bye_type, player_rank) \
               VALUES (?1, ?2, ?3, ?4, ?5)";

    conn.execute(
        sql,
        params![
            bye.id,
            bye.round_id,
            bye.player_id,
            bye.bye_type.as_str(),
            bye.player_rank,
        ],
    )
    .with_context(|| insert_context(&format!("bye {}", bye.id)))?;
    Ok(())
}

pub fn list_byes(conn: &Connection, season_id: SeasonId) -> Result<Vec<Bye>> {
    let sql = "SELECT b.id, b.round_id, b.player_id, b.bye_type, b.player_rank \
               FROM byes b JOIN rounds r ON b.round_id = r.id \
               WHERE r.season_id = ?1 ORDER BY r.number, b.id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_bye_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("byes"))?;

    Ok(rows)
}

fn parse_bye_row(row: &rusqlite::Row) -> rusqlite::Result<Bye> {
    let bye_type: String = row.get(3)?;

    Ok(Bye {
        id: row.get(0)?,
        round_id: row.get(1)?,
        player_id: row.get(2)?,
        bye_type: bye_type.parse().map_err(|e| column_error(3, e))?,
        player_rank: row.get(4)?,
    })
}
