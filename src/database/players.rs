use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{Player, SeasonId, SeasonPlayer};
use crate::errors::{column_error, insert_context, query_context};

/// Insert a player or refresh the username and rating of a known one
pub fn upsert_player(conn: &Connection, player: &Player) -> Result<()> {
    let sql = "INSERT INTO players (id, username, rating) VALUES (?1, ?2, ?3) \
               ON CONFLICT (id) DO UPDATE SET username = excluded.username, rating = excluded.rating";

    conn.execute(sql, params![player.id, player.username, player.rating])
        .with_context(|| format!("Failed to upsert player {}", player.username))?;
    Ok(())
}

/// Every player a season refers to: registered, paired, given a bye or a prize
pub fn list_for_season(conn: &Connection, season_id: SeasonId) -> Result<Vec<Player>> {
    let sql = "SELECT id, username, rating FROM players WHERE id IN ( \
                   SELECT player_id FROM season_players WHERE season_id = ?1 \
                   UNION SELECT p.white_id FROM pairings p JOIN rounds r ON p.round_id = r.id WHERE r.season_id = ?1 \
                   UNION SELECT p.black_id FROM pairings p JOIN rounds r ON p.round_id = r.id WHERE r.season_id = ?1 \
                   UNION SELECT p.white_id FROM pairings p JOIN team_pairings tp ON p.team_pairing_id = tp.id \
                       JOIN rounds r ON tp.round_id = r.id WHERE r.season_id = ?1 \
                   UNION SELECT p.black_id FROM pairings p JOIN team_pairings tp ON p.team_pairing_id = tp.id \
                       JOIN rounds r ON tp.round_id = r.id WHERE r.season_id = ?1 \
                   UNION SELECT b.player_id FROM byes b JOIN rounds r ON b.round_id = r.id WHERE r.season_id = ?1 \
                   UNION SELECT w.player_id FROM prize_winners w JOIN prizes z ON w.prize_id = z.id WHERE z.season_id = ?1 \
               ) ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("season players"))?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        username: row.get(1)?,
        rating: row.get(2)?,
    })
}

pub fn insert_season_player(
    conn: &Connection,
    season_id: SeasonId,
    position: usize,
    season_player: &SeasonPlayer,
) -> Result<()> {
    let sql = "INSERT INTO season_players \
               (season_id, player_id, seed_rating, is_active, late_join_points, position) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    conn.execute(
        sql,
        params![
            season_id,
            season_player.player_id,
            season_player.seed_rating,
            season_player.is_active,
            season_player.late_join_points.to_string(),
            position as i64,
        ],
    )
    .with_context(|| insert_context("season player"))?;
    Ok(())
}

/// Season players in registration order
pub fn list_season_players(conn: &Connection, season_id: SeasonId) -> Result<Vec<SeasonPlayer>> {
    let sql = "SELECT player_id, seed_rating, is_active, late_join_points FROM season_players \
               WHERE season_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_season_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("season player registrations"))?;

    Ok(rows)
}

fn parse_season_player_row(row: &rusqlite::Row) -> rusqlite::Result<SeasonPlayer> {
    let late_join_points: String = row.get(3)?;

    Ok(SeasonPlayer {
        player_id: row.get(0)?,
        seed_rating: row.get(1)?,
        is_active: row.get(2)?,
        late_join_points: late_join_points
            .parse()
            .map_err(|e: rust_decimal::Error| column_error(3, e.into()))?,
    })
}
