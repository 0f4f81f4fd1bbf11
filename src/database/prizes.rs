use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{PrizeWinner, SeasonId, SeasonPrize};
use crate::errors::{insert_context, query_context};

pub fn insert_prize(conn: &Connection, season_id: SeasonId, prize: &SeasonPrize) -> Result<()> {
    conn.execute(
        "INSERT INTO prizes (id, season_id, rank, max_rating) VALUES (?1, ?2, ?3, ?4)",
        params![prize.id, season_id, prize.rank, prize.max_rating],
    )
    .with_context(|| insert_context("prize"))?;
    Ok(())
}

pub fn insert_prize_winner(conn: &Connection, winner: &PrizeWinner) -> Result<()> {
    conn.execute(
        "INSERT INTO prize_winners (prize_id, player_id) VALUES (?1, ?2)",
        params![winner.prize_id, winner.player_id],
    )
    .with_context(|| insert_context("prize winner"))?;
    Ok(())
}

pub fn list_prizes(conn: &Connection, season_id: SeasonId) -> Result<Vec<SeasonPrize>> {
    let sql = "SELECT id, rank, max_rating FROM prizes WHERE season_id = ?1 ORDER BY max_rating, rank";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], |row| {
            Ok(SeasonPrize {
                id: row.get(0)?,
                rank: row.get(1)?,
                max_rating: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("prizes"))?;

    Ok(rows)
}

pub fn list_prize_winners(conn: &Connection, season_id: SeasonId) -> Result<Vec<PrizeWinner>> {
    let sql = "SELECT w.prize_id, w.player_id FROM prize_winners w \
               JOIN prizes z ON w.prize_id = z.id WHERE z.season_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], |row| {
            Ok(PrizeWinner {
                prize_id: row.get(0)?,
                player_id: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("prize winners"))?;

    Ok(rows)
}

/// Prizes of every season of a league
pub fn list_league_prizes(conn: &Connection, league_tag: &str) -> Result<Vec<SeasonPrize>> {
    let sql = "SELECT z.id, z.rank, z.max_rating FROM prizes z \
               JOIN seasons s ON z.season_id = s.id WHERE s.league_tag = ?1 \
               ORDER BY z.max_rating, z.rank";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_tag], |row| {
            Ok(SeasonPrize {
                id: row.get(0)?,
                rank: row.get(1)?,
                max_rating: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("league prizes"))?;

    Ok(rows)
}

pub fn list_league_prize_winners(conn: &Connection, league_tag: &str) -> Result<Vec<PrizeWinner>> {
    let sql = "SELECT w.prize_id, w.player_id FROM prize_winners w \
               JOIN prizes z ON w.prize_id = z.id \
               JOIN seasons s ON z.season_id = s.id WHERE s.league_tag = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_tag], |row| {
            Ok(PrizeWinner {
                prize_id: row.get(0)?,
                player_id: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("league prize winners"))?;

    Ok(rows)
}
