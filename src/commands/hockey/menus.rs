//! Page sources for the hockey menus and the game embeds.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter};

use super::{
    helper::{HockeyState, LeaderboardType, StandingsFilter, utc_to_local},
    models::{BasePlayer, Game, LeaderboardEntry, RosterPlayer, RosterResponse, TeamRecord},
    teams::{self, DIVISIONS, Team},
};
use crate::{
    Error,
    utils::menu::{ListPageSource, MissingPage, Page, PagePosition, PageSource},
};

const NHL_BLUE: u32 = 0x0033A0;

fn with_footer(embed: CreateEmbed, position: Option<PagePosition>) -> CreateEmbed {
    match position {
        Some(position) => embed.footer(position.footer()),
        None => embed,
    }
}

/// One position group of a roster.
#[derive(Debug, Clone)]
pub struct RosterSection {
    pub title: &'static str,
    pub players: Vec<RosterPlayer>,
}

/// A team roster, one position group per page.
pub struct RosterPages {
    team: &'static Team,
    season: String,
    source: ListPageSource<RosterSection>,
}

impl RosterPages {
    pub fn new(team: &'static Team, season: impl Into<String>, roster: RosterResponse) -> Self {
        let sections = [
            ("Forwards", roster.forwards),
            ("Defensemen", roster.defensemen),
            ("Goalies", roster.goalies),
        ]
        .into_iter()
        .filter(|(_, players)| !players.is_empty())
        .map(|(title, mut players)| {
            players.sort_by_key(|player| player.sweater_number.unwrap_or(u32::MAX));
            RosterSection { title, players }
        })
        .collect();

        Self {
            team,
            season: season.into(),
            source: ListPageSource::new(sections, 1),
        }
    }
}

#[async_trait]
impl PageSource for RosterPages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let section = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let lines: Vec<String> = section
            .players
            .iter()
            .map(|player| {
                let number = player
                    .sweater_number
                    .map(|n| format!("#{n}"))
                    .unwrap_or_else(|| "#-".to_string());
                format!(
                    "`{:>3}` {} ({})",
                    number,
                    player.full_name(),
                    player.position_code
                )
            })
            .collect();

        let embed = CreateEmbed::new()
            .title(format!("{} {} roster", self.team.name, self.season))
            .field(section.title, lines.join("\n"), false)
            .colour(self.team.colour);
        Ok(with_footer(embed, position).into())
    }
}

/// Player search results, ten per page.
pub struct PlayerPages {
    query: String,
    source: ListPageSource<BasePlayer>,
}

impl PlayerPages {
    pub fn new(query: impl Into<String>, players: Vec<BasePlayer>) -> Self {
        Self {
            query: query.into(),
            source: ListPageSource::new(players, 10),
        }
    }
}

#[async_trait]
impl PageSource for PlayerPages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let players = self.source.get_page(page).ok_or(MissingPage(page))?;
        let lines: Vec<String> = players
            .iter()
            .map(|player| {
                let status = if player.on_roster { "On a roster" } else { "Not on a roster" };
                format!("[{}]({}) - {}", player.name, player.profile_url(), status)
            })
            .collect();

        let embed = CreateEmbed::new()
            .title(format!("Players matching \"{}\"", self.query))
            .description(lines.join("\n"))
            .colour(NHL_BLUE);
        Ok(with_footer(embed, position).into())
    }
}

/// A titled slice of the standings.
#[derive(Debug, Clone)]
pub struct StandingsGroup {
    pub title: String,
    pub records: Vec<TeamRecord>,
}

/// Splits standings into the groups `filter` asks for, each sorted by rank.
pub fn standings_groups(filter: StandingsFilter, records: &[TeamRecord]) -> Vec<StandingsGroup> {
    let division = |name: &str| {
        let mut records: Vec<TeamRecord> = records
            .iter()
            .filter(|record| record.division_name == name)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.division_sequence);
        StandingsGroup {
            title: format!("{} Division", name),
            records,
        }
    };

    let groups: Vec<StandingsGroup> = match filter {
        StandingsFilter::All => DIVISIONS.iter().map(|&name| division(name)).collect(),
        StandingsFilter::Division(name) => vec![division(name)],
        StandingsFilter::Conference(name) => {
            let mut conference: Vec<TeamRecord> = records
                .iter()
                .filter(|record| record.conference_name == name)
                .cloned()
                .collect();
            conference.sort_by_key(|record| record.conference_sequence);
            vec![StandingsGroup {
                title: format!("{} Conference", name),
                records: conference,
            }]
        }
        StandingsFilter::League => {
            let mut league = records.to_vec();
            league.sort_by_key(|record| record.league_sequence);
            vec![StandingsGroup {
                title: "League".to_string(),
                records: league,
            }]
        }
    };

    groups
        .into_iter()
        .filter(|group| !group.records.is_empty())
        .collect()
}

pub struct StandingsPages {
    source: ListPageSource<StandingsGroup>,
}

impl StandingsPages {
    pub fn new(filter: StandingsFilter, records: &[TeamRecord]) -> Self {
        Self {
            source: ListPageSource::new(standings_groups(filter, records), 1),
        }
    }
}

#[async_trait]
impl PageSource for StandingsPages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let group = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let lines: Vec<String> = group
            .records
            .iter()
            .enumerate()
            .map(|(rank, record)| {
                format!(
                    "`{:>2}.` {} **{}** pts ({}-{}-{}, {} GP)",
                    rank + 1,
                    record.team_name.default,
                    record.points,
                    record.wins,
                    record.losses,
                    record.ot_losses,
                    record.games_played
                )
            })
            .collect();

        let colour = group
            .records
            .first()
            .and_then(|leader| teams::by_tri_code(&leader.team_abbrev.default))
            .map(|team| team.colour)
            .unwrap_or(NHL_BLUE);

        let embed = CreateEmbed::new()
            .title(format!("{} Standings", group.title))
            .description(lines.join("\n"))
            .colour(colour);
        Ok(with_footer(embed, position).into())
    }
}

/// Timezone names, twenty per page.
pub struct TimezonePages {
    source: ListPageSource<&'static str>,
}

impl TimezonePages {
    pub fn new(names: Vec<&'static str>) -> Self {
        Self {
            source: ListPageSource::new(names, 20),
        }
    }
}

#[async_trait]
impl PageSource for TimezonePages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let names = self.source.get_page(page).ok_or(MissingPage(page))?;
        let embed = CreateEmbed::new()
            .title("Timezones")
            .description(format!("```\n{}\n```", names.join("\n")))
            .colour(NHL_BLUE);
        Ok(with_footer(embed, position).into())
    }
}

/// One ranked member of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub user_id: u64,
    pub score: String,
}

/// Ranks members for `kind`, best first. Members without data for that board are left out.
pub fn leaderboard_rows(
    entries: &HashMap<String, LeaderboardEntry>,
    kind: LeaderboardType,
) -> Vec<LeaderboardRow> {
    let mut ranked: Vec<(u64, u64, String)> = entries
        .iter()
        .filter_map(|(user_id, entry)| {
            let user_id = user_id.parse::<u64>().ok()?;
            let (value, score) = match kind {
                LeaderboardType::Season => (
                    entry.season,
                    format!("{}/{} correct", entry.season, entry.total),
                ),
                LeaderboardType::Weekly => (entry.weekly, format!("{} correct", entry.weekly)),
                LeaderboardType::Worst => {
                    let wrong = entry.total.saturating_sub(entry.season);
                    (wrong, format!("{}/{} incorrect", wrong, entry.total))
                }
                LeaderboardType::Playoffs => (
                    entry.playoffs,
                    format!("{}/{} correct", entry.playoffs, entry.playoffs_total),
                ),
                LeaderboardType::PlayoffsWeekly => (
                    entry.playoffs_weekly,
                    format!("{} correct", entry.playoffs_weekly),
                ),
                LeaderboardType::PreSeason => (
                    entry.pre_season,
                    format!("{}/{} correct", entry.pre_season, entry.pre_season_total),
                ),
                LeaderboardType::PreSeasonWeekly => (
                    entry.pre_season_weekly,
                    format!("{} correct", entry.pre_season_weekly),
                ),
            };
            (value > 0).then_some((user_id, value, score))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .map(|(user_id, _, score)| LeaderboardRow { user_id, score })
        .collect()
}

pub struct LeaderboardPages {
    kind: LeaderboardType,
    source: ListPageSource<LeaderboardRow>,
}

impl LeaderboardPages {
    pub fn new(kind: LeaderboardType, rows: Vec<LeaderboardRow>) -> Self {
        Self {
            kind,
            source: ListPageSource::new(rows, 10),
        }
    }
}

#[async_trait]
impl PageSource for LeaderboardPages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let rows = self.source.get_page(page).ok_or(MissingPage(page))?;
        let offset = page * self.source.per_page();
        let lines: Vec<String> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| format!("{}. <@{}>: {}", offset + i + 1, row.user_id, row.score))
            .collect();

        let embed = CreateEmbed::new()
            .title(format!("{} Pickems Leaderboard", self.kind.label()))
            .description(lines.join("\n"))
            .colour(NHL_BLUE);
        Ok(with_footer(embed, position).into())
    }
}

fn score_line(game: &Game) -> Option<String> {
    match (game.away_score, game.home_score) {
        (Some(away), Some(home)) => Some(format!(
            "{} {} - {} {}",
            game.away_abr, away, home, game.home_abr
        )),
        _ => None,
    }
}

/// Schedule for one day as a single embed.
pub fn games_embed(date: NaiveDate, games: &[Game], tz: Tz) -> CreateEmbed {
    let description = if games.is_empty() {
        "No games scheduled.".to_string()
    } else {
        games
            .iter()
            .map(|game| {
                let start = utc_to_local(game.game_start, tz).format("%-I:%M %p %Z");
                match score_line(game) {
                    Some(score) => format!("**{}** ({})", score, game.status()),
                    None => format!(
                        "**{}** @ **{}** - {} ({})",
                        game.away_team,
                        game.home_team,
                        start,
                        game.status()
                    ),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    CreateEmbed::new()
        .title(format!("Games on {}", date.format("%A, %B %-d, %Y")))
        .description(description)
        .colour(NHL_BLUE)
}

/// Update embed for one game, as posted to subscribed channels.
pub fn game_embed(game: &Game, state: HockeyState, tz: Tz, now: DateTime<Utc>) -> CreateEmbed {
    let start = utc_to_local(game.game_start, tz);
    let colour = teams::by_tri_code(&game.home_abr)
        .map(|team| team.colour)
        .unwrap_or(NHL_BLUE);

    let mut embed = CreateEmbed::new()
        .title(format!("{} @ {}", game.away_team, game.home_team))
        .description(format!(
            "{} (<t:{}:R>)",
            start.format("%A, %B %-d at %-I:%M %p %Z"),
            game.game_start.timestamp()
        ))
        .field("Status", game.status(), true)
        .colour(colour)
        .timestamp(now)
        .footer(CreateEmbedFooter::new(state.title()));

    if let Some(score) = score_line(game) {
        embed = embed.field("Score", score, true);
    }
    if let Some(venue) = &game.venue {
        embed = embed.field("Venue", venue, true);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::hockey::models::LocalizedName;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn record(abbrev: &str, division: &str, conference: &str, seq: (u32, u32, u32), points: u32) -> TeamRecord {
        TeamRecord {
            team_name: LocalizedName {
                default: teams::display_name(abbrev),
            },
            team_abbrev: LocalizedName {
                default: abbrev.to_string(),
            },
            division_name: division.to_string(),
            conference_name: conference.to_string(),
            points,
            games_played: 60,
            wins: points / 2,
            losses: 20,
            ot_losses: 5,
            league_sequence: seq.0,
            conference_sequence: seq.1,
            division_sequence: seq.2,
        }
    }

    fn records() -> Vec<TeamRecord> {
        vec![
            record("TOR", "Atlantic", "Eastern", (3, 2, 2), 80),
            record("BOS", "Atlantic", "Eastern", (1, 1, 1), 90),
            record("NYR", "Metropolitan", "Eastern", (4, 3, 1), 78),
            record("DAL", "Central", "Western", (2, 1, 1), 85),
        ]
    }

    async fn embed_json(source: &impl PageSource, page: usize) -> Value {
        let position = PagePosition {
            current: page,
            max: source.max_pages(),
        };
        let rendered = source.format_page(page, Some(position)).await.unwrap();
        serde_json::to_value(&rendered.embeds[0]).unwrap()
    }

    #[test]
    fn test_standings_groups_all_skips_empty_divisions() {
        let groups = standings_groups(StandingsFilter::All, &records());
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Metropolitan Division", "Atlantic Division", "Central Division"]);
        assert_eq!(groups[1].records[0].team_abbrev.default, "BOS");
    }

    #[test]
    fn test_standings_groups_league_and_conference() {
        let league = standings_groups(StandingsFilter::League, &records());
        let order: Vec<&str> = league[0].records.iter().map(|r| r.team_abbrev.default.as_str()).collect();
        assert_eq!(order, vec!["BOS", "DAL", "TOR", "NYR"]);

        let east = standings_groups(StandingsFilter::Conference("Eastern"), &records());
        assert_eq!(east.len(), 1);
        assert_eq!(east[0].records.len(), 3);
        assert!(standings_groups(StandingsFilter::Division("Pacific"), &records()).is_empty());
    }

    #[tokio::test]
    async fn test_standings_page_lists_ranks() {
        let pages = StandingsPages::new(StandingsFilter::Division("Atlantic"), &records());
        let embed = embed_json(&pages, 0).await;

        assert_eq!(embed["title"], "Atlantic Division Standings");
        let description = embed["description"].as_str().unwrap();
        assert!(description.starts_with("` 1.` Boston Bruins **90** pts"), "{description}");
        assert_eq!(embed["footer"]["text"], "Page 1/1");
        assert_eq!(embed["color"], 0xFFB81C);
    }

    #[tokio::test]
    async fn test_missing_page_is_an_error() {
        let pages = TimezonePages::new(vec!["UTC"]);
        assert!(pages.format_page(3, None).await.is_err());
    }

    #[tokio::test]
    async fn test_player_pages() {
        let players: Vec<BasePlayer> = (1..=12)
            .map(|id| BasePlayer {
                id,
                name: format!("Player {id}"),
                on_roster: id % 2 == 0,
            })
            .collect();
        let pages = PlayerPages::new("player", players);
        assert_eq!(pages.max_pages(), 2);

        let embed = embed_json(&pages, 1).await;
        assert_eq!(
            embed["description"],
            "[Player 11](https://www.nhl.com/player/11) - Not on a roster\n\
             [Player 12](https://www.nhl.com/player/12) - On a roster"
        );
        assert_eq!(embed["footer"]["text"], "Page 2/2");
    }

    #[test]
    fn test_leaderboard_rows() {
        let mut entries = HashMap::new();
        entries.insert(
            "10".to_string(),
            LeaderboardEntry {
                season: 12,
                total: 20,
                weekly: 3,
                ..Default::default()
            },
        );
        entries.insert(
            "20".to_string(),
            LeaderboardEntry {
                season: 15,
                total: 18,
                ..Default::default()
            },
        );
        entries.insert("not-a-user".to_string(), LeaderboardEntry::default());

        let season = leaderboard_rows(&entries, LeaderboardType::Season);
        assert_eq!(
            season,
            vec![
                LeaderboardRow { user_id: 20, score: "15/18 correct".into() },
                LeaderboardRow { user_id: 10, score: "12/20 correct".into() },
            ]
        );

        let worst = leaderboard_rows(&entries, LeaderboardType::Worst);
        assert_eq!(worst[0].user_id, 10);
        assert_eq!(worst[0].score, "8/20 incorrect");

        let weekly = leaderboard_rows(&entries, LeaderboardType::Weekly);
        assert_eq!(weekly.len(), 1);
        assert!(leaderboard_rows(&entries, LeaderboardType::Playoffs).is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_continue_across_pages() {
        let rows = (1..=11)
            .map(|i| LeaderboardRow {
                user_id: i,
                score: format!("{i} correct"),
            })
            .collect();
        let pages = LeaderboardPages::new(LeaderboardType::Weekly, rows);
        let embed = embed_json(&pages, 1).await;
        assert_eq!(embed["description"], "11. <@11>: 11 correct");
        assert_eq!(embed["title"], "Weekly Pickems Leaderboard");
    }

    #[tokio::test]
    async fn test_roster_pages_skip_empty_groups_and_sort() {
        let roster: RosterResponse = serde_json::from_value(serde_json::json!({
            "forwards": [
                {"id": 2, "firstName": {"default": "Leon"}, "lastName": {"default": "Draisaitl"},
                 "sweaterNumber": 29, "positionCode": "C"},
                {"id": 1, "firstName": {"default": "Connor"}, "lastName": {"default": "McDavid"},
                 "sweaterNumber": 97, "positionCode": "C"},
                {"id": 3, "firstName": {"default": "Zach"}, "lastName": {"default": "Hyman"},
                 "sweaterNumber": 18, "positionCode": "L"}
            ],
            "goalies": [
                {"id": 4, "firstName": {"default": "Stuart"}, "lastName": {"default": "Skinner"},
                 "sweaterNumber": 74, "positionCode": "G"}
            ]
        }))
        .unwrap();
        let team = teams::by_tri_code("EDM").unwrap();
        let pages = RosterPages::new(team, "2023-2024", roster);
        assert_eq!(pages.max_pages(), 2);

        let first = embed_json(&pages, 0).await;
        assert_eq!(first["title"], "Edmonton Oilers 2023-2024 roster");
        assert_eq!(first["fields"][0]["name"], "Forwards");
        assert_eq!(
            first["fields"][0]["value"],
            "`#18` Zach Hyman (L)\n`#29` Leon Draisaitl (C)\n`#97` Connor McDavid (C)"
        );

        let second = embed_json(&pages, 1).await;
        assert_eq!(second["fields"][0]["name"], "Goalies");
    }

    #[test]
    fn test_games_embed() {
        let game = Game {
            id: 1,
            home_team: "Montréal Canadiens".into(),
            away_team: "Toronto Maple Leafs".into(),
            home_abr: "MTL".into(),
            away_abr: "TOR".into(),
            game_start: Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
            game_state: "FUT".into(),
            home_score: None,
            away_score: None,
            venue: None,
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let embed = serde_json::to_value(games_embed(date, &[game.clone()], chrono_tz::US::Eastern)).unwrap();
        assert_eq!(embed["title"], "Games on Monday, January 15, 2024");
        assert_eq!(
            embed["description"],
            "**Toronto Maple Leafs** @ **Montréal Canadiens** - 7:00 PM EST (Scheduled)"
        );

        let empty = serde_json::to_value(games_embed(date, &[], chrono_tz::US::Eastern)).unwrap();
        assert_eq!(empty["description"], "No games scheduled.");

        let finished = Game {
            game_state: "OFF".into(),
            home_score: Some(4),
            away_score: Some(2),
            ..game
        };
        let update = serde_json::to_value(game_embed(
            &finished,
            HockeyState::Final,
            chrono_tz::US::Eastern,
            Utc::now(),
        ))
        .unwrap();
        assert_eq!(update["fields"][1]["value"], "TOR 2 - 4 MTL");
        assert_eq!(update["footer"]["text"], "Final");
    }
}
