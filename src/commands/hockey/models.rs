//! NHL API payloads and the bot's own hockey records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::teams;

/// `{"default": "..."}` wrapper the NHL web API uses for translatable strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LocalizedName {
    pub default: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default)]
    pub game_week: Vec<GameDay>,
}

#[derive(Debug, Deserialize)]
pub struct GameDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub id: u64,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: DateTime<Utc>,
    #[serde(default)]
    pub game_state: String,
    pub away_team: ScheduleTeam,
    pub home_team: ScheduleTeam,
    pub venue: Option<LocalizedName>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleTeam {
    pub abbrev: String,
    pub score: Option<u32>,
}

/// A scheduled or played game, with team names resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: u64,
    pub home_team: String,
    pub away_team: String,
    pub home_abr: String,
    pub away_abr: String,
    pub game_start: DateTime<Utc>,
    /// Raw NHL state code (`FUT`, `PRE`, `LIVE`, `CRIT`, `FINAL`, `OFF`).
    pub game_state: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub venue: Option<String>,
}

impl Game {
    pub fn involves(&self, team_name: &str) -> bool {
        self.home_team == team_name || self.away_team == team_name
    }

    /// Human label for the raw state code.
    pub fn status(&self) -> &str {
        match self.game_state.as_str() {
            "FUT" | "PRE" => "Scheduled",
            "LIVE" | "CRIT" => "Live",
            "FINAL" | "OFF" => "Final",
            "PPD" => "Postponed",
            other => other,
        }
    }
}

impl From<ScheduleGame> for Game {
    fn from(game: ScheduleGame) -> Self {
        Self {
            id: game.id,
            home_team: teams::display_name(&game.home_team.abbrev),
            away_team: teams::display_name(&game.away_team.abbrev),
            home_abr: game.home_team.abbrev,
            away_abr: game.away_team.abbrev,
            game_start: game.start_time_utc,
            game_state: game.game_state,
            home_score: game.home_team.score,
            away_score: game.away_team.score,
            venue: game.venue.map(|venue| venue.default),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RosterResponse {
    #[serde(default)]
    pub forwards: Vec<RosterPlayer>,
    #[serde(default)]
    pub defensemen: Vec<RosterPlayer>,
    #[serde(default)]
    pub goalies: Vec<RosterPlayer>,
}

impl RosterResponse {
    pub fn is_empty(&self) -> bool {
        self.forwards.is_empty() && self.defensemen.is_empty() && self.goalies.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub id: u64,
    pub first_name: LocalizedName,
    pub last_name: LocalizedName,
    pub sweater_number: Option<u32>,
    pub position_code: String,
}

impl RosterPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.default, self.last_name.default)
    }
}

#[derive(Debug, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub standings: Vec<TeamRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub team_name: LocalizedName,
    pub team_abbrev: LocalizedName,
    pub division_name: String,
    pub conference_name: String,
    pub points: u32,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    #[serde(default)]
    pub league_sequence: u32,
    #[serde(default)]
    pub conference_sequence: u32,
    #[serde(default)]
    pub division_sequence: u32,
}

/// One row of the records API player database.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordPlayer {
    pub id: u64,
    #[serde(default)]
    pub full_name: Option<String>,
    /// `"Y"` or `"N"`.
    #[serde(default)]
    pub on_roster: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerDatabase {
    #[serde(default)]
    pub data: Vec<RecordPlayer>,
}

/// A player as the bot shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePlayer {
    pub id: u64,
    pub name: String,
    pub on_roster: bool,
}

impl BasePlayer {
    pub fn profile_url(&self) -> String {
        format!("https://www.nhl.com/player/{}", self.id)
    }
}

impl RecordPlayer {
    /// Records without a name are of no use for lookups.
    pub fn into_base(self) -> Option<BasePlayer> {
        Some(BasePlayer {
            id: self.id,
            name: self.full_name?,
            on_roster: self.on_roster.as_deref() == Some("Y"),
        })
    }
}

/// Game-update settings of one channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelSettings {
    pub guild_id: Option<u64>,
    /// Subscribed team names, or `"all"`. `None` means nothing is subscribed.
    #[serde(default)]
    pub team: Option<Vec<String>>,
    #[serde(default = "default_game_states")]
    pub game_states: Vec<String>,
}

pub fn default_game_states() -> Vec<String> {
    ["preview", "live", "final", "goal"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            guild_id: None,
            team: None,
            game_states: default_game_states(),
        }
    }
}

/// Tracking record of a team's current game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamEntry {
    pub game_state: String,
    pub team_name: String,
    pub period: u32,
    /// Channels currently showing the game.
    pub channel: Vec<u64>,
    /// Goal id to the message ids posted for it.
    pub goal_id: BTreeMap<String, Vec<u64>>,
    /// Game-day channels created for the team.
    pub created_channel: Vec<u64>,
    pub game_start: String,
}

impl TeamEntry {
    pub fn blank(team_name: &str) -> Self {
        Self {
            game_state: "Null".to_string(),
            team_name: team_name.to_string(),
            period: 0,
            channel: Vec::new(),
            goal_id: BTreeMap::new(),
            created_channel: Vec::new(),
            game_start: String::new(),
        }
    }
}

/// A member's pickems record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeaderboardEntry {
    pub season: u64,
    pub weekly: u64,
    pub total: u64,
    pub playoffs: u64,
    pub playoffs_weekly: u64,
    pub playoffs_total: u64,
    pub pre_season: u64,
    pub pre_season_weekly: u64,
    pub pre_season_total: u64,
}
