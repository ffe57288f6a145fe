//! Page sources for the NASA menus.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use poise::serenity_prelude::CreateEmbed;

use super::{
    fetch_video_url,
    models::{
        AstronomyPictureOfTheDay, CollectionItem, EpicData, Event, J2000Position, ManifestPhoto,
        PhotoManifest, RoverPhoto,
    },
};
use crate::{
    Error,
    utils::{
        formatting::{humanize_list, humanize_number, truncate},
        menu::{ListPageSource, MissingPage, Page, PagePosition, PageSource},
    },
};

const NASA_RED: u32 = 0xFC3D21;
const MAX_EMBEDS: usize = 10;
const MAX_TITLE: usize = 256;
const MAX_DESCRIPTION: usize = 4096;
const DATA_FIELD_LIMIT: usize = 512;

fn with_footer(embed: CreateEmbed, position: Option<PagePosition>) -> CreateEmbed {
    match position {
        Some(position) => embed.footer(position.footer()),
        None => embed,
    }
}

/// Discord's full date and time markup.
fn format_dt(date: DateTime<Utc>) -> String {
    format!("<t:{}:f>", date.timestamp())
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Image library search results, one item per page.
pub struct NasaImagesCollection {
    client: reqwest::Client,
    source: ListPageSource<CollectionItem>,
}

impl NasaImagesCollection {
    pub fn new(client: reqwest::Client, items: Vec<CollectionItem>) -> Self {
        Self {
            client,
            source: ListPageSource::new(items, 1),
        }
    }
}

#[async_trait]
impl PageSource for NasaImagesCollection {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let item = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let Some(data) = item.data.first() else {
            return Ok(Page::content("This result has no details."));
        };

        let url = if data.media_type == "video" {
            fetch_video_url(&self.client, &item.href).await?
        } else {
            None
        };

        let mut embed = CreateEmbed::new()
            .title(truncate(&data.title, MAX_TITLE))
            .colour(NASA_RED);
        if let Some(description) = &data.description {
            embed = embed.description(truncate(description, MAX_DESCRIPTION));
        }
        if let Some(created) = data.date_created {
            embed = embed.timestamp(created);
        }
        if let Some(url) = url {
            embed = embed.url(url);
        }
        let embed = with_footer(embed, position);

        let embeds: Vec<CreateEmbed> = item
            .links
            .iter()
            .filter(|link| link.rel == "preview")
            .take(MAX_EMBEDS)
            .map(|link| embed.clone().image(link.href.replace(' ', "%20")))
            .collect();

        if embeds.is_empty() {
            return Ok(embed.into());
        }
        Ok(Page::embeds(embeds))
    }
}

/// A rover's mission manifest, ten sols per page.
pub struct MarsRoverManifest {
    name: String,
    source: ListPageSource<ManifestPhoto>,
}

impl MarsRoverManifest {
    pub fn new(manifest: PhotoManifest) -> Self {
        Self {
            name: manifest.name,
            source: ListPageSource::new(manifest.photos, 10),
        }
    }
}

#[async_trait]
impl PageSource for MarsRoverManifest {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let photos = self.source.get_page(page).ok_or(MissingPage(page))?;
        let description: String = photos
            .iter()
            .map(|photo| {
                format!(
                    "Sol: {} - Earth Date: {}\nNumber of Photos: {} - Cameras: {}\n\n",
                    photo.sol,
                    photo.earth_date,
                    photo.total_photos,
                    humanize_list(&photo.cameras)
                )
            })
            .collect();

        let embed = CreateEmbed::new()
            .title(&self.name)
            .description(description)
            .colour(NASA_RED);
        Ok(with_footer(embed, position).into())
    }
}

pub struct MarsRoverPhotos {
    source: ListPageSource<RoverPhoto>,
}

impl MarsRoverPhotos {
    pub fn new(photos: Vec<RoverPhoto>) -> Self {
        Self {
            source: ListPageSource::new(photos, 1),
        }
    }
}

#[async_trait]
impl PageSource for MarsRoverPhotos {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let photo = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let embed = CreateEmbed::new()
            .title(format!("{} on {}", photo.camera.full_name, photo.rover.name))
            .description(format!("Sol: {}\nEarth Date: {}", photo.sol, photo.earth_date))
            .image(&photo.img_src)
            .colour(NASA_RED);
        Ok(with_footer(embed, position).into())
    }
}

/// Open natural events from EONET, one per page.
pub struct NasaEventPages {
    source: ListPageSource<Event>,
}

impl NasaEventPages {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            source: ListPageSource::new(events, 1),
        }
    }
}

/// Magnitude readings, newest first, until the field is long enough.
fn event_data(event: &Event) -> String {
    let mut value = String::new();
    for geometry in event.geometry.iter().rev() {
        if value.len() >= DATA_FIELD_LIMIT {
            break;
        }
        let Some(magnitude) = geometry.magnitude_value else {
            continue;
        };
        value.push_str(&format!(
            "{:?} {} - {}\n",
            magnitude,
            geometry.magnitude_unit.as_deref().unwrap_or_default(),
            format_dt(geometry.date)
        ));
    }
    value
}

#[async_trait]
impl PageSource for NasaEventPages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let event = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let mut embed = CreateEmbed::new()
            .title(truncate(&event.title, MAX_TITLE))
            .colour(NASA_RED);
        if let Some(description) = &event.description {
            embed = embed.description(truncate(description, MAX_DESCRIPTION));
        }
        if let Some(image) = &event.image_url {
            embed = embed.image(image);
        }

        if let Some((lat, lon)) = event.geometry.last().and_then(|geometry| geometry.lat_lon()) {
            let maps_url = format!("https://www.google.com/maps/search/?api=1&query={lat}%2C{lon}");
            embed = embed.field(
                "Coordinates",
                format!("[Latitude: {lat}\nLongitude: {lon}]({maps_url})"),
                true,
            );
        }

        let data = event_data(event);
        if !data.is_empty() {
            embed = embed.field("Data", data, true);
        }

        let sources: String = event
            .sources
            .iter()
            .map(|source| format!("[{}]({})\n", source.id, source.url))
            .collect();
        if !sources.is_empty() {
            embed = embed.field("Sources", sources, true);
        }

        Ok(with_footer(embed, position).into())
    }
}

/// Astronomy Pictures of the Day. Shown alone, a page has no footer.
pub struct NasaApod {
    source: ListPageSource<AstronomyPictureOfTheDay>,
}

impl NasaApod {
    pub fn new(pages: Vec<AstronomyPictureOfTheDay>) -> Self {
        Self {
            source: ListPageSource::new(pages, 1),
        }
    }
}

#[async_trait]
impl PageSource for NasaApod {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error> {
        let apod = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let mut embed = CreateEmbed::new()
            .title(truncate(&apod.title, MAX_TITLE))
            .description(truncate(&apod.explanation, MAX_DESCRIPTION))
            .colour(NASA_RED);
        if let Some(date) = midnight_utc(apod.date) {
            embed = embed.timestamp(date);
        }
        if let Some(url) = &apod.url {
            embed = embed.url(url);
        }
        if let Some(image) = apod.hdurl.as_ref().or(apod.url.as_ref()) {
            embed = embed.image(image);
        }
        if let Some(thumbnail) = &apod.thumbnail_url {
            embed = embed.thumbnail(thumbnail);
        }
        if let Some(copyright) = &apod.copyright {
            embed = embed.field("Copyright (c)", copyright.trim(), true);
        }
        Ok(with_footer(embed, position).into())
    }
}

/// EPIC images of the whole Earth, natural or enhanced colour.
pub struct EpicPages {
    archive_base: String,
    enhanced: bool,
    source: ListPageSource<EpicData>,
}

impl EpicPages {
    pub fn new(pages: Vec<EpicData>, archive_base: impl Into<String>, enhanced: bool) -> Self {
        Self {
            archive_base: archive_base.into(),
            enhanced,
            source: ListPageSource::new(pages, 1),
        }
    }
}

/// `N km (M Miles)`, both truncated to whole numbers.
pub fn format_distance(km: f64) -> String {
    format!(
        "{} km ({} Miles)",
        humanize_number(km as i64),
        humanize_number((km * 0.621371) as i64)
    )
}

fn distance_line(label: &str, position: Option<J2000Position>) -> String {
    match position {
        Some(position) => format!("Distance from {}: {}\n", label, format_distance(position.distance())),
        None => String::new(),
    }
}

#[async_trait]
impl PageSource for EpicPages {
    fn max_pages(&self) -> usize {
        self.source.max_pages()
    }

    async fn format_page(&self, page: usize, _position: Option<PagePosition>) -> Result<Page, Error> {
        let epic = self.source.get_entry(page).ok_or(MissingPage(page))?;
        let description = format!(
            "{}\n\n{}{}{}",
            epic.caption,
            distance_line("Earth", epic.dscovr_position()),
            distance_line("Sun", epic.sun_position()),
            distance_line("Moon", epic.lunar_position()),
        );

        let mut embed = CreateEmbed::new()
            .title(&epic.identifier)
            .description(description)
            .colour(NASA_RED);
        if let Some(url) = epic.archive_url(&self.archive_base, self.enhanced) {
            embed = embed.url(&url).image(url);
        }
        if let Some(taken) = epic.taken_at() {
            embed = embed.timestamp(Utc.from_utc_datetime(&taken));
        }
        Ok(embed.into())
    }
}
