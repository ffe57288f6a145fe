use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use futures::Stream;
use poise::serenity_prelude::{
    AutocompleteChoice, ChannelType, CreateChannel, CreateMessage, GuildId, Mentionable, RoleId,
};
use tracing::{info, warn};

use super::{
    HockeyError, fetch_games,
    helper::{
        HockeyState, TIMEZONE_KEY, TeamChoice, TeamScope, check_to_post, find_team, find_timezone,
        get_channel_obj, get_chn_name, get_team, get_team_role, guild_timezone, local_day,
        resolve_channels, save_team, timezone_names,
    },
    lookup::{autocomplete_active_team, autocomplete_team_or_all},
    menus::{TimezonePages, game_embed},
    models::{ChannelSettings, Game},
    teams::Team,
};
use crate::{
    CommandResult, Context, Data,
    utils::{formatting::humanize_list, menu::BaseMenu},
};

/// Game update settings for this server
#[poise::command(
    slash_command,
    subcommands("add", "remove", "state", "timezone", "gdc", "test"),
    guild_only,
    default_member_permissions = "MANAGE_CHANNELS",
    category = "Hockey"
)]
pub async fn hockeyset(_: Context<'_>) -> CommandResult {
    Ok(())
}

fn choice_label(choice: &TeamChoice) -> &'static str {
    match choice {
        TeamChoice::Team(team) => team.name,
        TeamChoice::All => "All",
    }
}

/// Post a team's game updates in this channel
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_CHANNELS")]
async fn add(
    ctx: Context<'_>,
    #[description = "Team, or \"all\""]
    #[autocomplete = "autocomplete_team_or_all"]
    team: String,
) -> CommandResult {
    let data = ctx.data();
    let guild_id = ctx.guild_id().ok_or(HockeyError::GuildOnly)?;
    let channel_id = ctx.channel_id();
    let choice = find_team(&team, TeamScope::WithAll)?;

    let mut settings: ChannelSettings = data.store.get_channel(channel_id)?.unwrap_or_default();
    settings.guild_id = Some(guild_id.get());
    let teams = settings.team.get_or_insert_with(Vec::new);
    if !teams.iter().any(|t| t == choice.name()) {
        teams.push(choice.name().to_string());
    }
    data.store.set_channel(channel_id, Some(guild_id), &settings)?;
    info!("Channel {} now follows {}", channel_id, choice.name());

    ctx.say(format!(
        "{} game updates will be posted in {}.",
        choice_label(&choice),
        channel_id.mention()
    ))
    .await?;
    Ok(())
}

/// Stop posting a team's game updates here, or all of them
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_CHANNELS")]
async fn remove(
    ctx: Context<'_>,
    #[description = "Team to remove; leave empty to remove everything"]
    #[autocomplete = "autocomplete_team_or_all"]
    team: Option<String>,
) -> CommandResult {
    let data = ctx.data();
    let channel_id = ctx.channel_id();

    let Some(team) = team else {
        data.store.clear_channel(channel_id)?;
        info!("Cleared game updates for channel {}", channel_id);
        ctx.say(format!(
            "Game updates will no longer be posted in {}.",
            channel_id.mention()
        ))
        .await?;
        return Ok(());
    };

    let choice = find_team(&team, TeamScope::WithAll)?;
    let mut settings: ChannelSettings = data.store.get_channel(channel_id)?.unwrap_or_default();
    let teams = settings.team.get_or_insert_with(Vec::new);
    let before = teams.len();
    teams.retain(|t| t != choice.name());

    if teams.len() == before {
        ctx.say(format!(
            "{} updates are not posted in {}.",
            choice_label(&choice),
            channel_id.mention()
        ))
        .await?;
        return Ok(());
    }

    data.store
        .set_channel(channel_id, ctx.guild_id(), &settings)?;
    ctx.say(format!(
        "{} game updates will no longer be posted in {}.",
        choice_label(&choice),
        channel_id.mention()
    ))
    .await?;
    Ok(())
}

/// Toggle which game states are posted in this channel
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_CHANNELS")]
async fn state(
    ctx: Context<'_>,
    #[description = "Game state to toggle"]
    #[autocomplete = "autocomplete_state"]
    state: String,
) -> CommandResult {
    let data = ctx.data();
    let channel_id = ctx.channel_id();
    let state = HockeyState::parse(&state)?;

    let mut settings: ChannelSettings = data.store.get_channel(channel_id)?.unwrap_or_default();
    settings.guild_id = ctx.guild_id().map(GuildId::get);
    let enabled = if settings.game_states.iter().any(|s| s == state.as_str()) {
        settings.game_states.retain(|s| s != state.as_str());
        false
    } else {
        settings.game_states.push(state.as_str().to_string());
        true
    };
    data.store.set_channel(channel_id, ctx.guild_id(), &settings)?;

    let titles: Vec<&str> = HockeyState::ALL
        .iter()
        .filter(|s| settings.game_states.iter().any(|g| g == s.as_str()))
        .map(|s| s.title())
        .collect();
    let summary = if titles.is_empty() {
        "Nothing will be posted here.".to_string()
    } else {
        format!("Posting: {}.", humanize_list(&titles))
    };
    ctx.say(format!(
        "{} updates {}. {}",
        state.title(),
        if enabled { "enabled" } else { "disabled" },
        summary
    ))
    .await?;
    Ok(())
}

/// Timezone used for this server's schedules
#[poise::command(
    slash_command,
    guild_only,
    subcommands("timezone_set", "timezone_show", "timezone_list")
)]
async fn timezone(_: Context<'_>) -> CommandResult {
    Ok(())
}

/// Set this server's timezone
#[poise::command(
    slash_command,
    guild_only,
    rename = "set",
    required_permissions = "MANAGE_GUILD"
)]
async fn timezone_set(
    ctx: Context<'_>,
    #[description = "Timezone name, e.g. America/Toronto"]
    #[autocomplete = "autocomplete_timezone"]
    timezone: String,
) -> CommandResult {
    let data = ctx.data();
    let guild_id = ctx.guild_id().ok_or(HockeyError::GuildOnly)?;
    let tz = find_timezone(&timezone)?;

    data.store.set_guild(guild_id, TIMEZONE_KEY, &tz.name())?;
    info!("Guild {} timezone set to {}", guild_id, tz.name());
    ctx.say(format!("Times will now be shown in `{}`.", tz.name()))
        .await?;
    Ok(())
}

/// Show this server's timezone
#[poise::command(slash_command, guild_only, rename = "show")]
async fn timezone_show(ctx: Context<'_>) -> CommandResult {
    let tz = guild_timezone(&ctx.data().store, ctx.guild_id())?;
    ctx.say(format!("Times are shown in `{}`.", tz.name())).await?;
    Ok(())
}

/// List the available timezones
#[poise::command(slash_command, rename = "list")]
async fn timezone_list(
    ctx: Context<'_>,
    #[description = "Only show zones containing this text"] filter: Option<String>,
) -> CommandResult {
    let needle = filter.as_deref().unwrap_or_default().to_lowercase();
    let names: Vec<&'static str> = timezone_names()
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect();
    if names.is_empty() {
        ctx.say(format!("No timezones contain `{}`.", needle)).await?;
        return Ok(());
    }

    BaseMenu::new(TimezonePages::new(names))
        .timeout(ctx.data().settings.menu_timeout)
        .ephemeral(true)
        .start(ctx)
        .await
}

/// The team's game on `date` (or today in the guild's timezone).
async fn find_game(
    data: &Data,
    team: &Team,
    date: Option<&str>,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<(NaiveDate, Option<Game>), HockeyError> {
    let day = local_day(date, now, tz)?;
    let games = fetch_games(&data.http, &data.settings.endpoints.nhl, day).await?;
    Ok((day, games.into_iter().find(|game| game.involves(team.name))))
}

/// Create a game day channel for a team's game
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_CHANNELS",
    required_bot_permissions = "MANAGE_CHANNELS"
)]
async fn gdc(
    ctx: Context<'_>,
    #[description = "Team"]
    #[autocomplete = "autocomplete_active_team"]
    team: String,
    #[description = "Date (YYYY-MM-DD, today, tomorrow)"] date: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();
    let guild_id = ctx.guild_id().ok_or(HockeyError::GuildOnly)?;
    let team = find_team(&team, TeamScope::Active)?
        .team()
        .ok_or(HockeyError::InvalidTeam)?;
    let tz = guild_timezone(&data.store, Some(guild_id))?;

    let (day, game) = find_game(data, team, date.as_deref(), tz, Utc::now()).await?;
    let Some(game) = game else {
        ctx.say(format!("No {} game found on {}.", team.name, day)).await?;
        return Ok(());
    };

    let name = get_chn_name(&game);
    let builder = CreateChannel::new(name.as_str())
        .kind(ChannelType::Text)
        .topic(format!("{} @ {}", game.away_team, game.home_team));
    let channel = guild_id.create_channel(ctx, builder).await?;

    let mut entry = get_team(&data.store, team.name)?;
    entry.created_channel.push(channel.id.get());
    save_team(&data.store, &entry)?;
    info!("Created game day channel {} ({}) in guild {}", name, channel.id, guild_id);

    ctx.say(format!("Created {}.", channel.id.mention())).await?;
    Ok(())
}

/// Post a test game update to every subscribed channel in this server
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
async fn test(
    ctx: Context<'_>,
    #[description = "Team"]
    #[autocomplete = "autocomplete_active_team"]
    team: String,
    #[description = "Game state to post (default: preview)"]
    #[autocomplete = "autocomplete_state"]
    state: Option<String>,
    #[description = "Date (YYYY-MM-DD, today, tomorrow)"] date: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();
    let guild_id = ctx.guild_id().ok_or(HockeyError::GuildOnly)?;
    let team = find_team(&team, TeamScope::Active)?
        .team()
        .ok_or(HockeyError::InvalidTeam)?;
    let state = HockeyState::parse(state.as_deref().unwrap_or("preview"))?;
    let tz = guild_timezone(&data.store, Some(guild_id))?;
    let now = Utc::now();

    let (day, game) = find_game(data, team, date.as_deref(), tz, now).await?;
    let Some(game) = game else {
        ctx.say(format!("No {} game found on {}.", team.name, day)).await?;
        return Ok(());
    };

    let roles: Vec<(String, RoleId)> = ctx
        .guild()
        .map(|guild| {
            guild
                .roles
                .values()
                .map(|role| (role.name.clone(), role.id))
                .collect()
        })
        .unwrap_or_default();
    let (home_role, away_role) = get_team_role(
        roles.iter().map(|(name, id)| (name.as_str(), *id)),
        &game.home_team,
        &game.away_team,
    );

    let post_state = vec![game.home_team.clone(), game.away_team.clone(), "all".to_string()];
    let embed = game_embed(&game, state, tz, now);
    let mut posted = 0;

    let channels: Vec<(_, ChannelSettings)> = data.store.channels_in_guild(guild_id)?;
    let serenity_ctx = ctx.serenity_context();
    let store = &data.store;
    let resolved = resolve_channels(channels, |channel_id, mut settings| async move {
        let channel = get_channel_obj(serenity_ctx, store, channel_id, &mut settings).await?;
        Ok::<_, HockeyError>((channel, settings))
    })
    .await;

    for (channel, settings) in resolved {
        let channel_id = channel.as_ref().map(|channel| channel.id);
        if !check_to_post(&data.store, channel_id, &settings, &post_state, state.as_str())? {
            continue;
        }
        let Some(channel_id) = channel_id else {
            continue;
        };

        let message = CreateMessage::new()
            .content(format!("**{}** - {} @ {}", state.title(), away_role, home_role))
            .embed(embed.clone());
        match channel_id.send_message(ctx, message).await {
            Ok(_) => posted += 1,
            Err(e) => warn!("Unable to post a {} update in {}: {}", state.as_str(), channel_id, e),
        }
    }

    ctx.say(format!(
        "Posted the {} update to {} channel(s).",
        state.as_str(),
        posted
    ))
    .await?;
    Ok(())
}

async fn autocomplete_state<'a>(_ctx: Context<'_>, partial: &'a str) -> Vec<AutocompleteChoice> {
    let partial = partial.to_lowercase();
    HockeyState::ALL
        .iter()
        .filter(|state| state.as_str().contains(&partial))
        .map(|state| AutocompleteChoice::new(state.title(), state.as_str()))
        .collect()
}

async fn autocomplete_timezone<'a>(
    _ctx: Context<'_>,
    partial: &'a str,
) -> impl Stream<Item = String> + 'a {
    let needle = partial.to_lowercase();
    let names: Vec<String> = timezone_names()
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(25)
        .map(String::from)
        .collect();
    futures::stream::iter(names)
}
