use std::collections::HashMap;

use chrono::Utc;
use futures::Stream;
use poise::{CreateReply, serenity_prelude::AutocompleteChoice};
use tracing::debug;

use super::{
    HockeyError, fetch_games,
    helper::{
        LeaderboardType, StandingsFilter, TeamScope, find_matchup, find_team, guild_timezone, local_day,
        parse_season, team_autocomplete,
    },
    menus::{
        LeaderboardPages, PlayerPages, RosterPages, StandingsPages, games_embed, leaderboard_rows,
    },
    models::{LeaderboardEntry, RosterResponse, StandingsResponse},
    players::{find_players, load_players, player_autocomplete},
    send_request,
};
use crate::{
    CommandResult, Context,
    utils::menu::{BaseMenu, PageSource},
};

/// Guild setting key holding the pickems leaderboard.
pub const LEADERBOARD_KEY: &str = "leaderboard";

/// NHL lookups: rosters, players, schedules, standings
#[poise::command(
    slash_command,
    subcommands("roster", "player", "games", "standings", "leaderboard"),
    category = "Hockey"
)]
pub async fn hockey(_: Context<'_>) -> CommandResult {
    Ok(())
}

/// Show a team's roster
#[poise::command(slash_command)]
async fn roster(
    ctx: Context<'_>,
    #[description = "Team name, nickname or tri-code"]
    #[autocomplete = "autocomplete_any_team"]
    team: String,
    #[description = "Season, e.g. 2023 or 2023-2024"] season: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();

    let team = find_team(&team, TeamScope::WithInactive)?
        .team()
        .ok_or(HockeyError::InvalidTeam)?;
    let (season_id, season_label) = match season.as_deref() {
        Some(season) => {
            let season = parse_season(season)?;
            (season.api_id(), season.to_string())
        }
        None => ("current".to_string(), "current".to_string()),
    };

    let path = format!("roster/{}/{}", team.tri_code, season_id);
    let roster: RosterResponse = send_request(&data.http, &data.settings.endpoints.nhl, &path, &[]).await?;
    if roster.is_empty() {
        ctx.say(format!("No {} roster found for the {} season.", team.name, season_label))
            .await?;
        return Ok(());
    }

    BaseMenu::new(RosterPages::new(team, season_label, roster))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Search the NHL player database
#[poise::command(slash_command)]
async fn player(
    ctx: Context<'_>,
    #[description = "Player name"]
    #[autocomplete = "autocomplete_player"]
    name: String,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();

    let players = load_players(&data.http, &data.settings, &data.store, Utc::now()).await?;
    let found = find_players(&players, &name);
    debug!("{} player(s) match '{}'", found.len(), name);
    if found.is_empty() {
        ctx.say(format!("No players found matching `{}`.", name)).await?;
        return Ok(());
    }

    BaseMenu::new(PlayerPages::new(name, found))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Show the games scheduled on a day
#[poise::command(slash_command)]
async fn games(
    ctx: Context<'_>,
    #[description = "Team, or a matchup like \"TOR vs MTL\""]
    #[autocomplete = "autocomplete_active_team"]
    team: Option<String>,
    #[description = "Date (YYYY-MM-DD, today, tomorrow)"] date: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();
    let now = Utc::now();

    let tz = guild_timezone(&data.store, ctx.guild_id())?;
    let day = local_day(date.as_deref(), now, tz)?;

    let mut games = fetch_games(&data.http, &data.settings.endpoints.nhl, day).await?;
    if let Some(team) = team.as_deref() {
        let mut matchup = find_matchup(team);
        if matchup.teams.is_empty() {
            let team = find_team(team, TeamScope::Active)?
                .team()
                .ok_or(HockeyError::InvalidTeam)?;
            matchup.teams.push(team);
        }
        games.retain(|game| matchup.matches(game));
    }

    ctx.send(CreateReply::default().embed(games_embed(day, &games, tz)))
        .await?;
    Ok(())
}

/// Show the current standings
#[poise::command(slash_command)]
async fn standings(
    ctx: Context<'_>,
    #[description = "Division, conference, all or league"]
    #[autocomplete = "autocomplete_standings"]
    search: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();

    let filter = search
        .as_deref()
        .and_then(StandingsFilter::parse)
        .unwrap_or(StandingsFilter::All);
    debug!("Standings filter: {}", filter.as_str());

    let response: StandingsResponse =
        send_request(&data.http, &data.settings.endpoints.nhl, "standings/now", &[]).await?;
    let pages = StandingsPages::new(filter, &response.standings);
    if pages.max_pages() == 0 {
        ctx.say("No standings are available right now.").await?;
        return Ok(());
    }

    BaseMenu::new(pages)
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Show this server's pickems leaderboard
#[poise::command(slash_command, guild_only)]
async fn leaderboard(
    ctx: Context<'_>,
    #[description = "Leaderboard type"]
    #[autocomplete = "autocomplete_leaderboard"]
    kind: Option<String>,
) -> CommandResult {
    let data = ctx.data();
    let guild_id = ctx.guild_id().ok_or(HockeyError::GuildOnly)?;
    let kind = kind
        .as_deref()
        .map(LeaderboardType::parse)
        .unwrap_or(LeaderboardType::Season);

    let entries: HashMap<String, LeaderboardEntry> = data
        .store
        .get_guild(guild_id, LEADERBOARD_KEY)?
        .unwrap_or_default();
    let rows = leaderboard_rows(&entries, kind);
    if rows.is_empty() {
        ctx.say(format!(
            "There is no {} leaderboard data for this server yet.",
            kind.label().to_lowercase()
        ))
        .await?;
        return Ok(());
    }

    BaseMenu::new(LeaderboardPages::new(kind, rows))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

pub(super) async fn autocomplete_active_team<'a>(
    _ctx: Context<'_>,
    partial: &'a str,
) -> impl Stream<Item = String> + 'a {
    futures::stream::iter(team_autocomplete(partial, TeamScope::Active))
}

pub(super) async fn autocomplete_any_team<'a>(
    _ctx: Context<'_>,
    partial: &'a str,
) -> impl Stream<Item = String> + 'a {
    futures::stream::iter(team_autocomplete(partial, TeamScope::WithInactive))
}

pub(super) async fn autocomplete_team_or_all<'a>(
    _ctx: Context<'_>,
    partial: &'a str,
) -> impl Stream<Item = String> + 'a {
    futures::stream::iter(team_autocomplete(partial, TeamScope::WithAll))
}

async fn autocomplete_player<'a>(ctx: Context<'_>, partial: &'a str) -> impl Stream<Item = String> + 'a {
    let data = ctx.data();
    let names = match load_players(&data.http, &data.settings, &data.store, Utc::now()).await {
        Ok(players) => player_autocomplete(&players, partial),
        Err(e) => {
            debug!("Player autocomplete unavailable: {}", e);
            Vec::new()
        }
    };
    futures::stream::iter(names)
}

async fn autocomplete_standings<'a>(
    _ctx: Context<'_>,
    partial: &'a str,
) -> Vec<AutocompleteChoice> {
    let partial = partial.to_lowercase();
    StandingsFilter::choices()
        .into_iter()
        .filter(|(name, _)| name.to_lowercase().contains(&partial))
        .map(|(name, value)| AutocompleteChoice::new(name, value))
        .collect()
}

async fn autocomplete_leaderboard<'a>(
    _ctx: Context<'_>,
    _partial: &'a str,
) -> Vec<AutocompleteChoice> {
    LeaderboardType::CHOICES
        .iter()
        .map(|(label, kind)| AutocompleteChoice::new(*label, kind.as_str()))
        .collect()
}
