use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use rusqlite::Connection;

use super::{pairings, players, prizes, rounds, seasons, teams};
use crate::domain::{PrizeWinner, Season, SeasonData, SeasonPrize, SeasonSnapshot};

/// Load one season of a league into an immutable snapshot
pub fn load_season(conn: &Connection, league_tag: &str, tag: Option<&str>) -> Result<SeasonSnapshot> {
    let season = seasons::find_season(conn, league_tag, tag)?.ok_or_else(|| match tag {
        Some(tag) => anyhow!("Season {} not found in league {}", tag, league_tag),
        None => anyhow!("League {} has no seasons", league_tag),
    })?;
    let tag = season.tag.clone();

    let data = load_season_data(conn, season)?;
    debug!(
        "Loaded season {}: {} rounds, {} pairings, {} byes",
        tag,
        data.rounds.len(),
        data.pairings.len(),
        data.byes.len()
    );

    SeasonSnapshot::new(data).with_context(|| format!("Inconsistent data in season {}", tag))
}

fn load_season_data(conn: &Connection, season: Season) -> Result<SeasonData> {
    let id = season.id;

    Ok(SeasonData {
        players: players::list_for_season(conn, id)?,
        season_players: players::list_season_players(conn, id)?,
        teams: teams::list_teams(conn, id)?,
        rounds: rounds::list_rounds(conn, id)?,
        team_pairings: teams::list_team_pairings(conn, id)?,
        pairings: pairings::list_pairings(conn, id)?,
        byes: pairings::list_byes(conn, id)?,
        availability: rounds::list_availability(conn, id)?,
        prizes: prizes::list_prizes(conn, id)?,
        prize_winners: prizes::list_prize_winners(conn, id)?,
        season,
    })
}

/// Prizes that decide the highlights of a season's table: its own once the
/// season is completed, those of the whole league while it is running
pub fn highlight_prizes(conn: &Connection, season: &Season) -> Result<(Vec<SeasonPrize>, Vec<PrizeWinner>)> {
    if season.is_completed {
        return Ok((
            prizes::list_prizes(conn, season.id)?,
            prizes::list_prize_winners(conn, season.id)?,
        ));
    }
    Ok((
        prizes::list_league_prizes(conn, &season.league_tag)?,
        prizes::list_league_prize_winners(conn, &season.league_tag)?,
    ))
}

/// Replace a season with the records of an import document, in one transaction
pub fn import_season(conn: &mut Connection, data: &SeasonData) -> Result<()> {
    let season = &data.season;
    let tx = conn
        .transaction()
        .context("Failed to start import transaction")?;

    if let Some(owner) = seasons::find_season_by_id(&tx, season.id)? {
        if owner.league_tag != season.league_tag || owner.tag != season.tag {
            bail!(
                "Season id {} already belongs to season {} of league {}",
                season.id,
                owner.tag,
                owner.league_tag
            );
        }
    }
    if let Some(existing) = seasons::find_season(&tx, &season.league_tag, Some(&season.tag))? {
        seasons::delete_season(&tx, existing.id)?;
        info!("Replacing season {} of league {}", season.tag, season.league_tag);
    }

    seasons::insert_season(&tx, season)?;
    for player in &data.players {
        players::upsert_player(&tx, player)?;
    }
    for (position, season_player) in data.season_players.iter().enumerate() {
        players::insert_season_player(&tx, season.id, position, season_player)?;
    }
    for team in &data.teams {
        teams::insert_team(&tx, season.id, team)?;
    }
    for round in &data.rounds {
        rounds::insert_round(&tx, season.id, round)?;
    }
    for team_pairing in &data.team_pairings {
        teams::insert_team_pairing(&tx, team_pairing)?;
    }
    for pairing in &data.pairings {
        pairings::insert_pairing(&tx, pairing)?;
    }
    for bye in &data.byes {
        pairings::insert_bye(&tx, bye)?;
    }
    for availability in &data.availability {
        rounds::insert_availability(&tx, availability)?;
    }
    for prize in &data.prizes {
        prizes::insert_prize(&tx, season.id, prize)?;
    }
    for winner in &data.prize_winners {
        prizes::insert_prize_winner(&tx, winner)?;
    }

    tx.commit().context("Failed to commit season import")?;
    info!(
        "Imported season {} of league {} ({} pairings)",
        season.tag,
        season.league_tag,
        data.pairings.len()
    );
    Ok(())
}
