use chrono::NaiveDate;
use poise::{ChoiceParameter, serenity_prelude::AutocompleteChoice};
use tracing::debug;

use super::{
    NasaError,
    menus::{EpicPages, MarsRoverManifest, MarsRoverPhotos, NasaApod, NasaEventPages, NasaImagesCollection},
    models::{
        ApodResponse, AstronomyPictureOfTheDay, CollectionItem, EpicData, Event, EventsResponse,
        ManifestResponse, PhotoManifest, RoverPhoto, RoverPhotosResponse, SearchResponse,
    },
    send_request,
};
use crate::{
    CommandResult, Context,
    utils::{
        config::Settings,
        menu::{BaseMenu, PageSource},
    },
};

const MAX_APOD_COUNT: u32 = 25;
const DEFAULT_EVENT_LIMIT: u32 = 25;
const MAX_EVENT_LIMIT: u32 = 100;

/// EONET category ids and their titles.
pub const EVENT_CATEGORIES: [(&str, &str); 13] = [
    ("drought", "Drought"),
    ("dustHaze", "Dust and Haze"),
    ("earthquakes", "Earthquakes"),
    ("floods", "Floods"),
    ("landslides", "Landslides"),
    ("manmade", "Manmade"),
    ("seaLakeIce", "Sea and Lake Ice"),
    ("severeStorms", "Severe Storms"),
    ("snow", "Snow"),
    ("tempExtremes", "Temperature Extremes"),
    ("volcanoes", "Volcanoes"),
    ("waterColor", "Water Color"),
    ("wildfires", "Wildfires"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ChoiceParameter)]
pub enum RoverName {
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
}

impl RoverName {
    pub fn slug(self) -> &'static str {
        match self {
            RoverName::Curiosity => "curiosity",
            RoverName::Opportunity => "opportunity",
            RoverName::Spirit => "spirit",
            RoverName::Perseverance => "perseverance",
        }
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate, NasaError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| NasaError::InvalidDate(date.to_string()))
}

fn api_key(settings: &Settings) -> Option<&str> {
    Some(settings.nasa_api_key.as_str()).filter(|key| !key.is_empty())
}

pub(crate) async fn search_images(
    client: &reqwest::Client,
    settings: &Settings,
    query: &str,
) -> Result<Vec<CollectionItem>, NasaError> {
    let response: SearchResponse = send_request(
        client,
        &settings.endpoints.nasa_images,
        "search",
        &[("q", query.to_string()), ("media_type", "image,video".to_string())],
        None,
    )
    .await?;
    Ok(response.collection.items)
}

/// `count` random pictures, or the picture of `date` (today when neither is given).
pub(crate) async fn fetch_apod(
    client: &reqwest::Client,
    settings: &Settings,
    date: Option<NaiveDate>,
    count: Option<u32>,
) -> Result<Vec<AstronomyPictureOfTheDay>, NasaError> {
    let mut query = vec![("thumbs", "true".to_string())];
    match (count, date) {
        (Some(count), _) => query.push(("count", count.clamp(1, MAX_APOD_COUNT).to_string())),
        (None, Some(date)) => query.push(("date", date.format("%Y-%m-%d").to_string())),
        (None, None) => {}
    }

    let response: ApodResponse = send_request(
        client,
        &settings.endpoints.nasa,
        "planetary/apod",
        &query,
        api_key(settings),
    )
    .await?;
    Ok(response.into_vec())
}

pub(crate) async fn fetch_manifest(
    client: &reqwest::Client,
    settings: &Settings,
    rover: RoverName,
) -> Result<PhotoManifest, NasaError> {
    let path = format!("mars-photos/api/v1/manifests/{}", rover.slug());
    let response: ManifestResponse =
        send_request(client, &settings.endpoints.nasa, &path, &[], api_key(settings)).await?;
    Ok(response.photo_manifest)
}

/// Photos of one sol or earth date, or the rover's latest photos when neither is given.
pub(crate) async fn fetch_rover_photos(
    client: &reqwest::Client,
    settings: &Settings,
    rover: RoverName,
    sol: Option<u32>,
    earth_date: Option<NaiveDate>,
    camera: Option<&str>,
) -> Result<Vec<RoverPhoto>, NasaError> {
    let mut query = Vec::new();
    let endpoint = match (sol, earth_date) {
        (Some(sol), _) => {
            query.push(("sol", sol.to_string()));
            "photos"
        }
        (None, Some(date)) => {
            query.push(("earth_date", date.format("%Y-%m-%d").to_string()));
            "photos"
        }
        (None, None) => "latest_photos",
    };
    if let Some(camera) = camera {
        query.push(("camera", camera.trim().to_lowercase()));
    }

    let path = format!("mars-photos/api/v1/rovers/{}/{}", rover.slug(), endpoint);
    let response: RoverPhotosResponse =
        send_request(client, &settings.endpoints.nasa, &path, &query, api_key(settings)).await?;
    Ok(response.photos)
}

pub(crate) async fn fetch_events(
    client: &reqwest::Client,
    settings: &Settings,
    category: Option<&str>,
    limit: u32,
) -> Result<Vec<Event>, NasaError> {
    let mut query = vec![
        ("status", "open".to_string()),
        ("limit", limit.clamp(1, MAX_EVENT_LIMIT).to_string()),
    ];
    if let Some(category) = category {
        query.push(("category", category.to_string()));
    }

    let response: EventsResponse =
        send_request(client, &settings.endpoints.eonet, "events", &query, None).await?;
    Ok(response.events)
}

pub(crate) async fn fetch_epic(
    client: &reqwest::Client,
    settings: &Settings,
    date: Option<NaiveDate>,
    enhanced: bool,
) -> Result<Vec<EpicData>, NasaError> {
    let kind = if enhanced { "enhanced" } else { "natural" };
    let path = match date {
        Some(date) => format!("EPIC/api/{}/date/{}", kind, date.format("%Y-%m-%d")),
        None => format!("EPIC/api/{}", kind),
    };
    send_request(client, &settings.endpoints.nasa, &path, &[], api_key(settings)).await
}

/// Browse NASA imagery and data
#[poise::command(
    slash_command,
    subcommands("images", "apod", "mars", "events", "epic"),
    category = "NASA"
)]
pub async fn nasa(_: Context<'_>) -> CommandResult {
    Ok(())
}

/// Search the NASA image and video library
#[poise::command(slash_command)]
async fn images(
    ctx: Context<'_>,
    #[description = "What to search for"] query: String,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();

    let items = search_images(&data.http, &data.settings, &query).await?;
    debug!("{} image library result(s) for '{}'", items.len(), query);
    if items.is_empty() {
        ctx.say(format!("No images found for `{}`.", query)).await?;
        return Ok(());
    }

    BaseMenu::new(NasaImagesCollection::new(data.http.clone(), items))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Astronomy Picture of the Day
#[poise::command(slash_command)]
async fn apod(
    ctx: Context<'_>,
    #[description = "Date (YYYY-MM-DD)"] date: Option<String>,
    #[description = "Number of random pictures to show instead"]
    #[min = 1]
    #[max = 25]
    count: Option<u32>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();
    let date = date.as_deref().map(parse_date).transpose()?;

    let pages = NasaApod::new(fetch_apod(&data.http, &data.settings, date, count).await?);
    match pages.max_pages() {
        0 => {
            ctx.say("NASA did not return a picture for that day.").await?;
            Ok(())
        }
        1 => {
            let page = pages.format_page(0, None).await?;
            ctx.send(page.to_reply(Vec::new())).await?;
            Ok(())
        }
        _ => {
            BaseMenu::new(pages)
                .timeout(data.settings.menu_timeout)
                .start(ctx)
                .await
        }
    }
}

/// Mars rover photos
#[poise::command(slash_command, subcommands("manifest", "photos"))]
async fn mars(_: Context<'_>) -> CommandResult {
    Ok(())
}

/// Show a rover's mission manifest
#[poise::command(slash_command)]
async fn manifest(
    ctx: Context<'_>,
    #[description = "Rover"] rover: RoverName,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();

    let manifest = fetch_manifest(&data.http, &data.settings, rover).await?;
    if manifest.photos.is_empty() {
        ctx.say(format!("{} has no photos yet.", manifest.name)).await?;
        return Ok(());
    }

    BaseMenu::new(MarsRoverManifest::new(manifest))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Show photos taken by a rover
#[poise::command(slash_command)]
async fn photos(
    ctx: Context<'_>,
    #[description = "Rover"] rover: RoverName,
    #[description = "Martian sol"] sol: Option<u32>,
    #[description = "Earth date (YYYY-MM-DD)"] earth_date: Option<String>,
    #[description = "Camera abbreviation, e.g. FHAZ or NAVCAM"] camera: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();
    let earth_date = earth_date.as_deref().map(parse_date).transpose()?;

    let photos = fetch_rover_photos(
        &data.http,
        &data.settings,
        rover,
        sol,
        earth_date,
        camera.as_deref(),
    )
    .await?;
    if photos.is_empty() {
        ctx.say(format!("No photos found for {}.", rover.name())).await?;
        return Ok(());
    }

    BaseMenu::new(MarsRoverPhotos::new(photos))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Show open natural events tracked by EONET
#[poise::command(slash_command)]
async fn events(
    ctx: Context<'_>,
    #[description = "Event category"]
    #[autocomplete = "autocomplete_category"]
    category: Option<String>,
    #[description = "How many events to fetch"]
    #[min = 1]
    #[max = 100]
    limit: Option<u32>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();

    let events = fetch_events(
        &data.http,
        &data.settings,
        category.as_deref(),
        limit.unwrap_or(DEFAULT_EVENT_LIMIT),
    )
    .await?;
    if events.is_empty() {
        ctx.say("There are no open events right now.").await?;
        return Ok(());
    }

    BaseMenu::new(NasaEventPages::new(events))
        .timeout(data.settings.menu_timeout)
        .start(ctx)
        .await
}

/// Whole-Earth images from the EPIC camera
#[poise::command(slash_command)]
async fn epic(
    ctx: Context<'_>,
    #[description = "Date (YYYY-MM-DD); latest images when empty"] date: Option<String>,
    #[description = "Show the colour-enhanced images"] enhanced: Option<bool>,
) -> CommandResult {
    ctx.defer().await?;
    let data = ctx.data();
    let enhanced = enhanced.unwrap_or(false);
    let date = date.as_deref().map(parse_date).transpose()?;

    let pages = fetch_epic(&data.http, &data.settings, date, enhanced).await?;
    if pages.is_empty() {
        ctx.say("No EPIC images are available for that day.").await?;
        return Ok(());
    }

    BaseMenu::new(EpicPages::new(
        pages,
        data.settings.endpoints.epic_archive.clone(),
        enhanced,
    ))
    .timeout(data.settings.menu_timeout)
    .start(ctx)
    .await
}

async fn autocomplete_category<'a>(_ctx: Context<'_>, partial: &'a str) -> Vec<AutocompleteChoice> {
    let partial = partial.to_lowercase();
    EVENT_CATEGORIES
        .iter()
        .filter(|(id, title)| {
            id.to_lowercase().contains(&partial) || title.to_lowercase().contains(&partial)
        })
        .map(|(id, title)| AutocompleteChoice::new(*title, *id))
        .collect()
}
