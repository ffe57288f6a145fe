use std::collections::HashMap;

use chrono::NaiveDate;
use cogbot::{
    Data,
    commands::hockey::{
        helper::{LeaderboardType, TIMEZONE_KEY, find_matchup, guild_timezone},
        lookup::LEADERBOARD_KEY,
        menus::{LeaderboardPages, RosterPages, games_embed, leaderboard_rows},
        models::{Game, LeaderboardEntry, RosterResponse, ScheduleResponse},
        teams,
    },
    serenity::GuildId,
    utils::menu::{PagePosition, PageSource},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::common::{self, fixtures};

fn games_on(date: NaiveDate) -> Vec<Game> {
    let schedule: ScheduleResponse = serde_json::from_value(fixtures::schedule()).unwrap();
    schedule
        .game_week
        .into_iter()
        .filter(|day| day.date == date)
        .flat_map(|day| day.games)
        .map(Game::from)
        .collect()
}

async fn first_embed(source: &impl PageSource, page: usize) -> Value {
    let position = PagePosition {
        current: page,
        max: source.max_pages(),
    };
    let rendered = source.format_page(page, Some(position)).await.unwrap();
    serde_json::to_value(&rendered.embeds[0]).unwrap()
}

#[test]
fn test_matchup_narrows_the_schedule() {
    common::init();
    let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let games = games_on(day);
    assert_eq!(games.len(), 2);

    let matchup = find_matchup("Leafs vs Habs");
    let picked: Vec<&Game> = games.iter().filter(|game| matchup.matches(game)).collect();
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].away_team, "Toronto Maple Leafs");
    assert_eq!(picked[0].home_team, "Montréal Canadiens");
}

#[test]
fn test_games_embed_for_a_day() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let embed = serde_json::to_value(games_embed(day, &games_on(day), chrono_tz::America::Toronto)).unwrap();

    assert_eq!(embed["title"], "Games on Friday, January 5, 2024");
    assert_eq!(
        embed["description"],
        "**Toronto Maple Leafs** @ **Montréal Canadiens** - 7:00 PM EST (Scheduled)\n\
         **CGY 2 - 5 EDM** (Final)"
    );
}

#[tokio::test]
async fn test_roster_menu_pages() {
    let roster: RosterResponse = serde_json::from_value(fixtures::roster()).unwrap();
    let team = teams::by_tri_code("TOR").unwrap();
    let pages = RosterPages::new(team, "current", roster);
    assert_eq!(pages.max_pages(), 3);

    let forwards = first_embed(&pages, 0).await;
    assert_eq!(forwards["title"], "Toronto Maple Leafs current roster");
    assert_eq!(forwards["fields"][0]["name"], "Forwards");
    assert_eq!(
        forwards["fields"][0]["value"],
        "`#16` Mitchell Marner (R)\n`#34` Auston Matthews (C)"
    );
    assert_eq!(forwards["footer"]["text"], "Page 1/3");

    let goalies = first_embed(&pages, 2).await;
    assert_eq!(goalies["fields"][0]["name"], "Goalies");
}

#[tokio::test]
async fn test_guild_settings_survive_a_restart() {
    let settings = common::scratch_settings("guild-settings");
    let guild = GuildId::new(4242);

    {
        let data = Data::new(settings.clone()).unwrap();
        data.store
            .set_guild(guild, TIMEZONE_KEY, &"Europe/Helsinki".to_string())
            .unwrap();

        let entries: HashMap<String, LeaderboardEntry> = serde_json::from_value(json!({
            "2": {"season": 5, "total": 6},
            "3": {"season": 7, "total": 9},
            "4": {}
        }))
        .unwrap();
        data.store.set_guild(guild, LEADERBOARD_KEY, &entries).unwrap();
    }

    let data = Data::new(settings).unwrap();
    assert_eq!(
        guild_timezone(&data.store, Some(guild)).unwrap(),
        chrono_tz::Europe::Helsinki
    );
    assert_eq!(
        guild_timezone(&data.store, Some(GuildId::new(1))).unwrap(),
        chrono_tz::US::Pacific
    );

    let entries: HashMap<String, LeaderboardEntry> =
        data.store.get_guild(guild, LEADERBOARD_KEY).unwrap().unwrap();
    let rows = leaderboard_rows(&entries, LeaderboardType::Season);
    let pages = LeaderboardPages::new(LeaderboardType::Season, rows);

    let embed = first_embed(&pages, 0).await;
    assert_eq!(embed["title"], "Seasonal Pickems Leaderboard");
    assert_eq!(embed["description"], "1. <@3>: 7/9 correct\n2. <@2>: 5/6 correct");
}
