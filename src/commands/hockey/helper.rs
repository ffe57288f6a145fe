//! Converters that turn free-form user text into typed hockey arguments, plus the
//! channel/role helpers used when posting game updates.

use std::{future::Future, sync::LazyLock};

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::{TZ_VARIANTS, Tz};
use poise::serenity_prelude::{
    Channel, ChannelId, Context as SerenityContext, GuildChannel, GuildId, Mentionable, RoleId,
};
use regex::Regex;
use tracing::{debug, info, warn};

use super::{
    HockeyError,
    models::{ChannelSettings, Game, TeamEntry},
    teams::{CONFERENCES, DIVISIONS, TEAMS, Team},
};
use crate::utils::database::{ConfigStore, StoreError};

/// Timezone used when a guild has not set one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::US::Pacific;
/// Guild setting key holding the guild's timezone name.
pub const TIMEZONE_KEY: &str = "timezone";
/// Global setting key holding the tracked [`TeamEntry`] list.
pub const TEAMS_KEY: &str = "teams";

pub static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((19|20)\d\d)[- /.](0[1-9]|1[012]|[1-9])[- /.](0[1-9]|[12][0-9]|3[01]|[1-9])")
        .expect("date pattern compiles")
});

pub static DAY_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(yesterday|tomorrow|today)").expect("day reference pattern compiles")
});

pub static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((19|20)\d\d)-?/?((19|20)\d\d)?").expect("year pattern compiles")
});

/// Region zone names plus `UTC`/`GMT`. Legacy aliases such as `EET`, `GB` or `ROK`
/// are left out so ordinary words never resolve to a zone.
fn canonical_zones() -> impl Iterator<Item = Tz> {
    TZ_VARIANTS.iter().copied().filter(|tz| {
        let name = tz.name();
        (name.contains('/') && !name.starts_with("Etc/")) || name == "UTC" || name == "GMT"
    })
}

/// Canonical zone names, longest first so a zone is never cut short by a shorter prefix.
pub static TIMEZONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut names: Vec<&str> = canonical_zones().map(|tz| tz.name()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let pattern = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", pattern)).expect("timezone pattern compiles")
});

pub static ACTIVE_TEAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = active_teams()
        .flat_map(|team| {
            std::iter::once(team.name)
                .chain(std::iter::once(team.tri_code))
                .chain(team.nickname.iter().copied())
        })
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", pattern)).expect("team pattern compiles")
});

pub static VERSUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vs\.?|versus").expect("versus pattern compiles"));

/// Per-team word patterns, index-aligned with [`TEAMS`].
static TEAM_WORD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    TEAMS
        .iter()
        .map(|team| {
            let mut alternatives = vec![format!(r"{}\b", regex::escape(team.tri_code))];
            alternatives.extend(
                team.name
                    .split_whitespace()
                    .chain(team.nickname.iter().copied())
                    .map(|word| format!(r"\b{}\b", regex::escape(word))),
            );
            Regex::new(&format!(r"(?i)\b(?:{})", alternatives.join("|")))
                .expect("team word pattern compiles")
        })
        .collect()
});

fn active_teams() -> impl Iterator<Item = &'static Team> {
    TEAMS.iter().filter(|team| team.active && !team.is_all_star())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Looks for a date in `argument`: an explicit `YYYY-MM-DD` (any of `- /.` as
/// separators) or `today`/`yesterday`/`tomorrow` relative to `now`.
pub fn find_date(argument: &str, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, HockeyError> {
    if let Some(caps) = DATE_RE.captures(argument) {
        let parsed = NaiveDate::from_ymd_opt(
            caps[1].parse().unwrap_or_default(),
            caps[3].parse().unwrap_or_default(),
            caps[4].parse().unwrap_or_default(),
        )
        .ok_or_else(|| HockeyError::InvalidDate(argument.to_string()))?;
        return Ok(Some(midnight(parsed)));
    }

    if let Some(found) = DAY_REF_RE.find(argument) {
        let today = now.date_naive();
        let day = match found.as_str().to_lowercase().as_str() {
            "yesterday" => today.checked_sub_days(Days::new(1)),
            "tomorrow" => today.checked_add_days(Days::new(1)),
            _ => Some(today),
        }
        .ok_or_else(|| HockeyError::InvalidDate(argument.to_string()))?;
        return Ok(Some(midnight(day)));
    }

    Ok(None)
}

/// Strict date parsing: text without a date is an error.
pub fn parse_date(argument: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, HockeyError> {
    find_date(argument, now)?.ok_or_else(|| HockeyError::InvalidDate(argument.to_string()))
}

/// Lenient date parsing used by slash commands: text without a date means `now`.
pub fn parse_date_or_today(argument: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, HockeyError> {
    Ok(find_date(argument, now)?.unwrap_or(now))
}

/// The calendar day a command argument refers to, as seen in `tz`. Relative days and
/// a missing date count from the local date of `now`, not the UTC one.
pub fn local_day(argument: Option<&str>, now: DateTime<Utc>, tz: Tz) -> Result<NaiveDate, HockeyError> {
    let wall_clock = Utc.from_utc_datetime(&utc_to_local(now, tz).naive_local());
    Ok(parse_date_or_today(argument.unwrap_or_default(), wall_clock)?.date_naive())
}

/// A season spanning two calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Season {
    pub start: i32,
    pub end: i32,
}

impl Season {
    /// The `YYYYYYYY` form the NHL API expects.
    pub fn api_id(&self) -> String {
        format!("{}{}", self.start, self.end)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

pub fn parse_season(argument: &str) -> Result<Season, HockeyError> {
    let invalid = || HockeyError::InvalidYear(argument.to_string());
    let caps = YEAR_RE.captures(argument).ok_or_else(invalid)?;
    let start: i32 = caps[1].parse().map_err(|_| invalid())?;
    let end = match caps.get(3) {
        Some(end) => end.as_str().parse().map_err(|_| invalid())?,
        None => start + 1,
    };
    Ok(Season { start, end })
}

/// Which teams a team argument may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamScope {
    /// Current franchises only.
    Active,
    /// Current and relocated/defunct franchises.
    WithInactive,
    /// Current franchises or the literal `all`.
    WithAll,
}

impl TeamScope {
    fn allows(self, team: &Team) -> bool {
        !team.is_all_star() && (team.active || self == TeamScope::WithInactive)
    }
}

/// Result of resolving a team argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamChoice {
    Team(&'static Team),
    All,
}

impl TeamChoice {
    /// Value stored in channel subscriptions.
    pub fn name(&self) -> &'static str {
        match self {
            TeamChoice::Team(team) => team.name,
            TeamChoice::All => "all",
        }
    }

    pub fn team(&self) -> Option<&'static Team> {
        match self {
            TeamChoice::Team(team) => Some(team),
            TeamChoice::All => None,
        }
    }
}

/// Resolves a team from free text. Each word is tested against every eligible
/// team; the team matching the most words wins, earlier table entries on ties.
pub fn find_team(argument: &str, scope: TeamScope) -> Result<TeamChoice, HockeyError> {
    let words: Vec<&str> = argument.split_whitespace().collect();

    let mut best: Option<(&'static Team, usize)> = None;
    for (team, pattern) in TEAMS.iter().zip(TEAM_WORD_RES.iter()) {
        if !scope.allows(team) {
            continue;
        }
        let hits = words.iter().filter(|word| pattern.is_match(word)).count();
        if hits > 0 && best.is_none_or(|(_, most)| hits > most) {
            debug!("{} matched {} word(s) of '{}'", team.name, hits, argument);
            best = Some((team, hits));
        }
    }

    match best {
        Some((team, _)) => Ok(TeamChoice::Team(team)),
        None if scope == TeamScope::WithAll
            && words.iter().any(|word| word.eq_ignore_ascii_case("all")) =>
        {
            Ok(TeamChoice::All)
        }
        None => Err(HockeyError::InvalidTeam),
    }
}

/// Autocomplete values for a team argument.
pub fn team_autocomplete(current: &str, scope: TeamScope) -> Vec<String> {
    let needle = current.to_lowercase();
    let all = (scope == TeamScope::WithAll).then(|| "all".to_string());

    all.into_iter()
        .chain(
            TEAMS
                .iter()
                .filter(|team| scope.allows(team))
                .map(|team| team.name.to_string()),
        )
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(25)
        .collect()
}

/// Teams mentioned in a free-text matchup such as `"TOR vs Habs"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub teams: Vec<&'static Team>,
    pub versus: bool,
}

pub fn find_matchup(argument: &str) -> Matchup {
    let mut teams: Vec<&'static Team> = Vec::new();
    for found in ACTIVE_TEAM_RE.find_iter(argument) {
        let text = found.as_str().to_lowercase();
        let team = active_teams().find(|team| {
            team.name.to_lowercase() == text
                || team.tri_code.to_lowercase() == text
                || team.nickname.iter().any(|nick| nick.to_lowercase() == text)
        });
        match team {
            Some(team) if !teams.contains(&team) => teams.push(team),
            _ => {}
        }
    }

    Matchup {
        teams,
        versus: VERSUS_RE.is_match(argument),
    }
}

impl Matchup {
    /// Whether `game` is one this matchup asks for. A versus matchup of two teams
    /// needs both; otherwise any mentioned team is enough.
    pub fn matches(&self, game: &Game) -> bool {
        if self.versus && self.teams.len() >= 2 {
            self.teams.iter().take(2).all(|team| game.involves(team.name))
        } else {
            self.teams.iter().any(|team| game.involves(team.name))
        }
    }
}

/// The first known timezone name in `argument`.
pub fn find_timezone(argument: &str) -> Result<Tz, HockeyError> {
    let invalid = || HockeyError::InvalidTimezone(argument.to_string());
    let found = TIMEZONE_RE.find(argument).ok_or_else(invalid)?;
    canonical_zones()
        .find(|tz| tz.name().eq_ignore_ascii_case(found.as_str()))
        .ok_or_else(invalid)
}

/// All zone names, sorted, for listing.
pub fn timezone_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = canonical_zones().map(|tz| tz.name()).collect();
    names.sort_unstable();
    names
}

/// The timezone a guild chose, or [`DEFAULT_TIMEZONE`].
pub fn guild_timezone(store: &ConfigStore, guild_id: Option<GuildId>) -> Result<Tz, StoreError> {
    let Some(guild_id) = guild_id else {
        return Ok(DEFAULT_TIMEZONE);
    };
    let name: Option<String> = store.get_guild(guild_id, TIMEZONE_KEY)?;
    Ok(name
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(DEFAULT_TIMEZONE))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardType {
    Season,
    Weekly,
    Worst,
    Playoffs,
    PlayoffsWeekly,
    PreSeason,
    PreSeasonWeekly,
}

impl LeaderboardType {
    /// Display name and value of every choice, in autocomplete order.
    pub const CHOICES: [(&'static str, LeaderboardType); 7] = [
        ("Seasonal", LeaderboardType::Season),
        ("Worst", LeaderboardType::Worst),
        ("Playoffs", LeaderboardType::Playoffs),
        ("Playoffs Weekly", LeaderboardType::PlayoffsWeekly),
        ("Pre-Season", LeaderboardType::PreSeason),
        ("Pre-Season Weekly", LeaderboardType::PreSeasonWeekly),
        ("Weekly", LeaderboardType::Weekly),
    ];

    /// Lenient parse; anything unknown is the season board.
    pub fn parse(argument: &str) -> Self {
        match argument.replace(' ', "_").to_lowercase().as_str() {
            "weekly" | "week" => LeaderboardType::Weekly,
            "playoffs" | "playoff" => LeaderboardType::Playoffs,
            "playoffs_weekly" | "playoff_weekly" => LeaderboardType::PlayoffsWeekly,
            "pre-season" | "preseason" => LeaderboardType::PreSeason,
            "pre-season_weekly" | "preseason_weekly" => LeaderboardType::PreSeasonWeekly,
            "worst" => LeaderboardType::Worst,
            _ => LeaderboardType::Season,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardType::Season => "season",
            LeaderboardType::Weekly => "weekly",
            LeaderboardType::Worst => "worst",
            LeaderboardType::Playoffs => "playoffs",
            LeaderboardType::PlayoffsWeekly => "playoffs_weekly",
            LeaderboardType::PreSeason => "pre-season",
            LeaderboardType::PreSeasonWeekly => "pre-season_weekly",
        }
    }

    pub fn label(&self) -> &'static str {
        Self::CHOICES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(label, _)| *label)
            .unwrap_or("Seasonal")
    }
}

/// Game states a channel can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HockeyState {
    Preview,
    Live,
    Goal,
    PeriodRecap,
    Final,
}

impl HockeyState {
    pub const ALL: [HockeyState; 5] = [
        HockeyState::Preview,
        HockeyState::Live,
        HockeyState::Goal,
        HockeyState::PeriodRecap,
        HockeyState::Final,
    ];

    pub fn parse(argument: &str) -> Result<Self, HockeyError> {
        let lowered = argument.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == lowered)
            .ok_or_else(|| HockeyError::InvalidState(argument.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HockeyState::Preview => "preview",
            HockeyState::Live => "live",
            HockeyState::Goal => "goal",
            HockeyState::PeriodRecap => "periodrecap",
            HockeyState::Final => "final",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            HockeyState::Preview => "Preview",
            HockeyState::Live => "Live",
            HockeyState::Goal => "Goal",
            HockeyState::PeriodRecap => "Periodrecap",
            HockeyState::Final => "Final",
        }
    }
}

/// What part of the standings to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsFilter {
    All,
    League,
    Division(&'static str),
    Conference(&'static str),
}

impl StandingsFilter {
    /// Every fixed choice, in autocomplete order.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        [("All", "all"), ("League", "league")]
            .into_iter()
            .chain(DIVISIONS.iter().map(|d| (*d, *d)))
            .chain(CONFERENCES.iter().map(|c| (*c, *c)))
            .collect()
    }

    /// Exact division or conference, then `all`/`league`, then a substring match
    /// over divisions and conferences where the last hit wins.
    pub fn parse(argument: &str) -> Option<Self> {
        let lowered = argument.to_lowercase();

        if let Some(conference) = CONFERENCES.iter().find(|c| c.to_lowercase() == lowered) {
            return Some(StandingsFilter::Conference(conference));
        }
        if let Some(division) = DIVISIONS.iter().find(|d| d.to_lowercase() == lowered) {
            return Some(StandingsFilter::Division(division));
        }
        match lowered.as_str() {
            "all" => return Some(StandingsFilter::All),
            "league" => return Some(StandingsFilter::League),
            _ => {}
        }

        let division = DIVISIONS
            .iter()
            .rev()
            .find(|d| d.to_lowercase().contains(&lowered))
            .map(|d| StandingsFilter::Division(d));
        let conference = CONFERENCES
            .iter()
            .rev()
            .find(|c| c.to_lowercase().contains(&lowered))
            .map(|c| StandingsFilter::Conference(c));
        conference.or(division)
    }

    pub fn as_str(&self) -> String {
        match self {
            StandingsFilter::All => "all".to_string(),
            StandingsFilter::League => "league".to_string(),
            StandingsFilter::Division(name) | StandingsFilter::Conference(name) => {
                name.to_lowercase()
            }
        }
    }
}

pub fn utc_to_local(utc: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    utc.with_timezone(&tz)
}

/// Game-day channel name, e.g. `tor-vs-mtl-2024-1-15`.
pub fn get_chn_name(game: &Game) -> String {
    let start = utc_to_local(game.game_start, DEFAULT_TIMEZONE);
    format!(
        "{}-vs-{}-{}-{}-{}",
        game.home_abr,
        game.away_abr,
        start.year(),
        start.month(),
        start.day()
    )
    .to_lowercase()
}

/// Whether a game update in `game_state` for the teams in `post_state` belongs in a channel.
/// A channel whose team list was unset gets its team setting reset.
pub fn check_to_post(
    store: &ConfigStore,
    channel: Option<ChannelId>,
    settings: &ChannelSettings,
    post_state: &[String],
    game_state: &str,
) -> Result<bool, StoreError> {
    let Some(channel) = channel else {
        return Ok(false);
    };
    let Some(teams) = &settings.team else {
        let reset = ChannelSettings {
            team: Some(Vec::new()),
            ..settings.clone()
        };
        store.set_channel(channel, settings.guild_id.map(GuildId::new), &reset)?;
        debug!("Reset the team list of channel {}", channel);
        return Ok(false);
    };

    Ok(settings.game_states.iter().any(|state| state == game_state)
        && teams.iter().any(|team| post_state.contains(team)))
}

/// Role mentions for the two teams, or their names when no role exists.
pub fn get_team_role<'a>(
    roles: impl IntoIterator<Item = (&'a str, RoleId)>,
    home_team: &str,
    away_team: &str,
) -> (String, String) {
    let matches = |role_name: &str, team: &str| {
        (team.contains("Montréal Canadiens") && role_name.contains("Montreal Canadiens"))
            || role_name == team
    };

    let mut home_role = None;
    let mut away_role = None;
    for (name, id) in roles {
        if matches(name, home_team) {
            home_role = Some(id.mention().to_string());
        }
        if matches(name, away_team) {
            away_role = Some(id.mention().to_string());
        }
    }

    (
        home_role.unwrap_or_else(|| home_team.to_string()),
        away_role.unwrap_or_else(|| away_team.to_string()),
    )
}

/// The tracking entry of `team`, created and saved blank when unknown.
pub fn get_team(store: &ConfigStore, team: &str) -> Result<TeamEntry, StoreError> {
    let mut entries: Vec<TeamEntry> = store.get_global(TEAMS_KEY)?.unwrap_or_default();
    if let Some(entry) = entries.iter().find(|entry| entry.team_name == team) {
        return Ok(entry.clone());
    }

    let entry = TeamEntry::blank(team);
    entries.push(entry.clone());
    store.set_global(TEAMS_KEY, &entries)?;
    info!("Started tracking {}", team);
    Ok(entry)
}

/// Replaces the stored entry of the same team.
pub fn save_team(store: &ConfigStore, entry: &TeamEntry) -> Result<(), StoreError> {
    let mut entries: Vec<TeamEntry> = store.get_global(TEAMS_KEY)?.unwrap_or_default();
    match entries.iter_mut().find(|e| e.team_name == entry.team_name) {
        Some(existing) => *existing = entry.clone(),
        None => entries.push(entry.clone()),
    }
    store.set_global(TEAMS_KEY, &entries)
}

/// Resolves a configured channel (or thread). A channel that no longer exists, or
/// whose guild is gone, has its settings removed.
pub async fn get_channel_obj(
    ctx: &SerenityContext,
    store: &ConfigStore,
    channel_id: ChannelId,
    settings: &mut ChannelSettings,
) -> Result<Option<GuildChannel>, HockeyError> {
    let Some(guild_id) = settings.guild_id.map(GuildId::new) else {
        return match channel_id.to_channel(ctx).await {
            Ok(Channel::Guild(channel)) => {
                settings.guild_id = Some(channel.guild_id.get());
                store.set_channel(channel_id, Some(channel.guild_id), &*settings)?;
                debug!("Filled in guild {} for channel {}", channel.guild_id, channel_id);
                Ok(Some(channel))
            }
            Ok(_) => {
                store.clear_channel(channel_id)?;
                info!("Removed settings of non-guild channel {}", channel_id);
                Ok(None)
            }
            Err(::serenity::Error::Http(::serenity::http::HttpError::UnsuccessfulRequest(response)))
                if response.status_code.as_u16() == 404 =>
            {
                store.clear_channel(channel_id)?;
                info!("Removed settings of deleted channel {}", channel_id);
                Ok(None)
            }
            Err(e) => Err(HockeyError::BadRequest(format!(
                "Unable to resolve channel {}: {}",
                channel_id, e
            ))),
        };
    };

    let resolved = ctx.cache.guild(guild_id).map(|guild| {
        guild.channels.get(&channel_id).cloned().or_else(|| {
            guild
                .threads
                .iter()
                .find(|thread| thread.id == channel_id)
                .cloned()
        })
    });

    match resolved {
        Some(Some(channel)) => Ok(Some(channel)),
        Some(None) => {
            store.clear_channel(channel_id)?;
            info!("Removed settings of channel {} in guild {}: channel is gone", channel_id, guild_id);
            Ok(None)
        }
        None => {
            store.clear_channel(channel_id)?;
            info!("Removed settings of channel {}: guild {} is gone", channel_id, guild_id);
            Ok(None)
        }
    }
}

/// Resolves each configured channel in turn. A channel that fails to resolve is
/// logged and skipped; the others are still returned.
pub async fn resolve_channels<C, F, Fut>(
    channels: Vec<(ChannelId, ChannelSettings)>,
    mut resolve: F,
) -> Vec<(Option<C>, ChannelSettings)>
where
    F: FnMut(ChannelId, ChannelSettings) -> Fut,
    Fut: Future<Output = Result<(Option<C>, ChannelSettings), HockeyError>>,
{
    let mut resolved = Vec::with_capacity(channels.len());
    for (channel_id, settings) in channels {
        match resolve(channel_id, settings).await {
            Ok(channel) => resolved.push(channel),
            Err(e) => warn!("Skipping channel {}: {}", channel_id, e),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use test_case::test_case;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap()
    }

    fn store(name: &str) -> ConfigStore {
        let dir = std::env::temp_dir().join(format!("cogbot-helper-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        ConfigStore::open(dir.join("config.db")).unwrap()
    }

    fn game(home: &str, away: &str, start: DateTime<Utc>) -> Game {
        Game {
            id: 1,
            home_team: super::super::teams::display_name(home),
            away_team: super::super::teams::display_name(away),
            home_abr: home.to_string(),
            away_abr: away.to_string(),
            game_start: start,
            game_state: "FUT".to_string(),
            home_score: None,
            away_score: None,
            venue: None,
        }
    }

    #[rstest]
    #[case("2024-01-15", (2024, 1, 15))]
    #[case("games on 2023/9/4 please", (2023, 9, 4))]
    #[case("1999.12.31", (1999, 12, 31))]
    #[case("2024 2 29", (2024, 2, 29))]
    #[case("today", (2024, 3, 10))]
    #[case("Yesterday", (2024, 3, 9))]
    #[case("TOMORROW", (2024, 3, 11))]
    fn test_find_date(#[case] input: &str, #[case] expected: (i32, u32, u32)) {
        let found = find_date(input, now()).unwrap().unwrap();
        assert_eq!(
            found,
            Utc.with_ymd_and_hms(expected.0, expected.1, expected.2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_find_date_rejects_impossible_day() {
        assert_matches!(find_date("2023-02-30", now()), Err(HockeyError::InvalidDate(_)));
    }

    #[test]
    fn test_parse_date_strict_and_lenient() {
        assert_matches!(parse_date("next week", now()), Err(HockeyError::InvalidDate(_)));
        assert_eq!(parse_date_or_today("next week", now()).unwrap(), now());
    }

    #[rstest]
    #[case::no_date(None, (2024, 1, 5))]
    #[case::today(Some("today"), (2024, 1, 5))]
    #[case::tomorrow(Some("tomorrow"), (2024, 1, 6))]
    #[case::no_date_in_text(Some("whenever"), (2024, 1, 5))]
    #[case::explicit(Some("2024-01-06"), (2024, 1, 6))]
    fn test_local_day_uses_guild_timezone(#[case] argument: Option<&str>, #[case] expected: (i32, u32, u32)) {
        // Already the 6th in UTC, still the evening of the 5th in Los Angeles.
        let now = Utc.with_ymd_and_hms(2024, 1, 6, 3, 0, 0).unwrap();
        let day = local_day(argument, now, DEFAULT_TIMEZONE).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(expected.0, expected.1, expected.2).unwrap());
    }

    #[test]
    fn test_local_day_rejects_impossible_date() {
        let now = Utc.with_ymd_and_hms(2024, 1, 6, 3, 0, 0).unwrap();
        assert_matches!(
            local_day(Some("2023-02-30"), now, DEFAULT_TIMEZONE),
            Err(HockeyError::InvalidDate(_))
        );
    }

    #[test_case("2023", 2023, 2024 ; "single year")]
    #[test_case("2023-2024", 2023, 2024 ; "dashed")]
    #[test_case("20222023", 2022, 2023 ; "compact")]
    #[test_case("1987/1988", 1987, 1988 ; "slashed")]
    fn test_parse_season(input: &str, start: i32, end: i32) {
        let season = parse_season(input).unwrap();
        assert_eq!(season, Season { start, end });
        assert_eq!(season.api_id(), format!("{start}{end}"));
    }

    #[test]
    fn test_parse_season_error_message() {
        let err = parse_season("last year").unwrap_err();
        assert_eq!(err.to_string(), "`last year` is not a valid year.");
    }

    #[rstest]
    #[case("Boston Bruins", "Boston Bruins")]
    #[case("habs", "Montréal Canadiens")]
    #[case("TOR", "Toronto Maple Leafs")]
    #[case("new york rangers", "New York Rangers")]
    #[case("Utah", "Utah Mammoth")]
    fn test_find_team_active(#[case] input: &str, #[case] expected: &str) {
        let choice = find_team(input, TeamScope::Active).unwrap();
        assert_eq!(choice.name(), expected);
    }

    #[test]
    fn test_find_team_scopes() {
        assert_matches!(find_team("Whalers", TeamScope::Active), Err(HockeyError::InvalidTeam));
        assert_eq!(
            find_team("Whalers", TeamScope::WithInactive).unwrap().name(),
            "Hartford Whalers"
        );
        assert_eq!(find_team("all", TeamScope::WithAll).unwrap(), TeamChoice::All);
        assert_matches!(find_team("all", TeamScope::Active), Err(HockeyError::InvalidTeam));
    }

    #[test]
    fn test_find_team_never_returns_all_star() {
        assert_matches!(
            find_team("Team Pacific", TeamScope::WithInactive),
            Err(HockeyError::InvalidTeam)
        );
    }

    #[test]
    fn test_find_team_error_message() {
        let err = find_team("curling", TeamScope::Active).unwrap_err();
        assert_eq!(err.to_string(), "You must provide a valid current team.");
    }

    #[test]
    fn test_team_autocomplete() {
        let with_all = team_autocomplete("", TeamScope::WithAll);
        assert_eq!(with_all[0], "all");
        assert_eq!(with_all.len(), 25);

        let kings = team_autocomplete("kin", TeamScope::Active);
        assert_eq!(kings, vec!["Los Angeles Kings"]);

        assert!(team_autocomplete("whal", TeamScope::Active).is_empty());
        assert_eq!(team_autocomplete("whal", TeamScope::WithInactive), vec!["Hartford Whalers"]);
        assert!(team_autocomplete("team", TeamScope::WithInactive).is_empty());
    }

    #[test]
    fn test_find_matchup() {
        let matchup = find_matchup("TOR vs Habs");
        let names: Vec<&str> = matchup.teams.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Toronto Maple Leafs", "Montréal Canadiens"]);
        assert!(matchup.versus);

        let start = now();
        assert!(matchup.matches(&game("MTL", "TOR", start)));
        assert!(!matchup.matches(&game("TOR", "BOS", start)));

        let single = find_matchup("bruins games");
        assert!(!single.versus);
        assert!(single.matches(&game("TOR", "BOS", start)));
    }

    #[rstest]
    #[case("US/Eastern", "US/Eastern")]
    #[case("america/new_york", "America/New_York")]
    #[case("Europe/Helsinki please", "Europe/Helsinki")]
    fn test_find_timezone(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(find_timezone(input).unwrap().name(), expected);
    }

    #[rstest]
    #[case("Main Street")]
    #[case("gametime")]
    #[case("Seoul ROK")]
    #[case("EET")]
    fn test_find_timezone_ignores_legacy_aliases(#[case] input: &str) {
        assert_matches!(find_timezone(input), Err(HockeyError::InvalidTimezone(_)));
    }

    #[test]
    fn test_timezone_names_are_canonical() {
        let names = timezone_names();
        assert!(names.contains(&"America/Toronto"));
        assert!(names.contains(&"UTC"));
        assert!(!names.contains(&"EET"));
        assert!(!names.iter().any(|name| name.starts_with("Etc/")));
    }

    #[test]
    fn test_find_timezone_error_message() {
        let err = find_timezone("Mars/Olympus").unwrap_err();
        assert_eq!(
            err.to_string(),
            "`Mars/Olympus` is not a valid timezone. Please see `/hockeyset timezone list`."
        );
    }

    #[rstest]
    #[case("seasonal", LeaderboardType::Season)]
    #[case("week", LeaderboardType::Weekly)]
    #[case("Playoff Weekly", LeaderboardType::PlayoffsWeekly)]
    #[case("preseason", LeaderboardType::PreSeason)]
    #[case("Pre-Season Weekly", LeaderboardType::PreSeasonWeekly)]
    #[case("worst", LeaderboardType::Worst)]
    #[case("nonsense", LeaderboardType::Season)]
    fn test_leaderboard_type(#[case] input: &str, #[case] expected: LeaderboardType) {
        assert_eq!(LeaderboardType::parse(input), expected);
    }

    #[test]
    fn test_hockey_state() {
        assert_eq!(HockeyState::parse("PeriodRecap").unwrap(), HockeyState::PeriodRecap);
        let err = HockeyState::parse("intermission").unwrap_err();
        assert_eq!(err.to_string(), "\"intermission\" is not a valid game state.");
    }

    #[rstest]
    #[case("metropolitan", Some(StandingsFilter::Division("Metropolitan")))]
    #[case("Western", Some(StandingsFilter::Conference("Western")))]
    #[case("ALL", Some(StandingsFilter::All))]
    #[case("league", Some(StandingsFilter::League))]
    #[case("pac", Some(StandingsFilter::Division("Pacific")))]
    #[case("ern", Some(StandingsFilter::Conference("Western")))]
    #[case("hockey", None)]
    fn test_standings_filter(#[case] input: &str, #[case] expected: Option<StandingsFilter>) {
        assert_eq!(StandingsFilter::parse(input), expected);
    }

    #[test]
    fn test_get_chn_name_uses_pacific_date() {
        // 02:00 UTC on the 16th is still the 15th in Pacific time.
        let start = Utc.with_ymd_and_hms(2024, 1, 16, 2, 0, 0).unwrap();
        assert_eq!(get_chn_name(&game("TOR", "MTL", start)), "tor-vs-mtl-2024-1-15");
    }

    #[test]
    fn test_check_to_post() {
        let store = store("check-to-post");
        let channel = ChannelId::new(55);
        let settings = ChannelSettings {
            guild_id: Some(9),
            team: Some(vec!["Boston Bruins".to_string()]),
            ..Default::default()
        };
        let post_state = vec!["Boston Bruins".to_string(), "Toronto Maple Leafs".to_string()];

        assert!(!check_to_post(&store, None, &settings, &post_state, "preview").unwrap());
        assert!(check_to_post(&store, Some(channel), &settings, &post_state, "preview").unwrap());
        assert!(!check_to_post(&store, Some(channel), &settings, &post_state, "periodrecap").unwrap());
        assert!(
            !check_to_post(&store, Some(channel), &settings, &["Dallas Stars".to_string()], "live")
                .unwrap()
        );
    }

    #[test]
    fn test_check_to_post_resets_unset_teams() {
        let store = store("check-to-post-reset");
        let channel = ChannelId::new(56);
        let settings = ChannelSettings {
            guild_id: Some(9),
            team: None,
            ..Default::default()
        };

        assert!(!check_to_post(&store, Some(channel), &settings, &["all".to_string()], "live").unwrap());
        let saved: ChannelSettings = store.get_channel(channel).unwrap().unwrap();
        assert_eq!(saved.team, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_resolve_channels_skips_failures() {
        let channels = (1..=3)
            .map(|id| {
                let settings = ChannelSettings {
                    guild_id: Some(9),
                    ..Default::default()
                };
                (ChannelId::new(id), settings)
            })
            .collect();

        let resolved = resolve_channels(channels, |channel_id, settings| async move {
            match channel_id.get() {
                1 => Err(HockeyError::BadRequest("Unable to resolve channel 1".to_string())),
                2 => Ok((None, settings)),
                id => Ok((Some(id), settings)),
            }
        })
        .await;

        let ids: Vec<Option<u64>> = resolved.iter().map(|(channel, _)| *channel).collect();
        assert_eq!(ids, vec![None, Some(3)]);
        assert!(resolved.iter().all(|(_, settings)| settings.guild_id == Some(9)));
    }

    #[test]
    fn test_get_team_role() {
        let roles = [
            ("Montreal Canadiens fans", RoleId::new(1)),
            ("Toronto Maple Leafs", RoleId::new(2)),
        ];
        let (home, away) = get_team_role(roles, "Montréal Canadiens", "Toronto Maple Leafs");
        assert_eq!(home, "<@&1>");
        assert_eq!(away, "<@&2>");

        let (home, away) = get_team_role(roles, "Boston Bruins", "Toronto Maple Leafs");
        assert_eq!(home, "Boston Bruins");
        assert_eq!(away, "<@&2>");
    }

    #[test]
    fn test_get_team_creates_blank_entry_once() {
        let store = store("get-team");
        let entry = get_team(&store, "Seattle Kraken").unwrap();
        assert_eq!(entry, TeamEntry::blank("Seattle Kraken"));

        let mut updated = entry.clone();
        updated.created_channel.push(42);
        save_team(&store, &updated).unwrap();

        assert_eq!(get_team(&store, "Seattle Kraken").unwrap().created_channel, vec![42]);
        let all: Vec<TeamEntry> = store.get_global(TEAMS_KEY).unwrap().unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_guild_timezone_default_and_stored() {
        let store = store("guild-tz");
        let guild = GuildId::new(3);
        assert_eq!(guild_timezone(&store, Some(guild)).unwrap(), DEFAULT_TIMEZONE);
        store.set_guild(guild, TIMEZONE_KEY, &"Europe/Helsinki").unwrap();
        assert_eq!(guild_timezone(&store, Some(guild)).unwrap().name(), "Europe/Helsinki");
        assert_eq!(guild_timezone(&store, None).unwrap(), DEFAULT_TIMEZONE);
    }
}
