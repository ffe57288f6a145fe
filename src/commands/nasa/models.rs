//! Response types of the NASA APIs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

// images-api.nasa.gov

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub collection: Collection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionItem {
    /// URL of the item's asset list.
    pub href: String,
    #[serde(default)]
    pub data: Vec<ItemData>,
    #[serde(default)]
    pub links: Vec<ItemLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    pub media_type: String,
    #[serde(default)]
    pub nasa_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemLink {
    pub href: String,
    pub rel: String,
    #[serde(default)]
    pub render: Option<String>,
}

// Mars rover photos

#[derive(Debug, Deserialize)]
pub struct ManifestResponse {
    pub photo_manifest: PhotoManifest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoManifest {
    pub name: String,
    pub landing_date: NaiveDate,
    pub launch_date: NaiveDate,
    pub status: String,
    pub max_sol: u32,
    pub max_date: NaiveDate,
    pub total_photos: u64,
    #[serde(default)]
    pub photos: Vec<ManifestPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestPhoto {
    pub sol: u32,
    pub earth_date: NaiveDate,
    pub total_photos: u64,
    #[serde(default)]
    pub cameras: Vec<String>,
}

/// Both `/photos` and `/latest_photos` answers.
#[derive(Debug, Deserialize)]
pub struct RoverPhotosResponse {
    #[serde(default, alias = "latest_photos")]
    pub photos: Vec<RoverPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoverPhoto {
    pub id: u64,
    pub sol: u32,
    pub camera: Camera,
    pub img_src: String,
    pub earth_date: NaiveDate,
    pub rover: Rover,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Camera {
    pub id: u64,
    pub name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rover {
    pub id: u64,
    pub name: String,
    pub landing_date: NaiveDate,
    pub launch_date: NaiveDate,
    pub status: String,
}

// EONET

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub closed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<EventCategory>,
    #[serde(default)]
    pub sources: Vec<EventSource>,
    #[serde(default)]
    pub geometry: Vec<EventGeometry>,
    /// Not sent by EONET v3; kept for feeds that attach one.
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCategory {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGeometry {
    #[serde(default)]
    pub magnitude_value: Option<f64>,
    #[serde(default)]
    pub magnitude_unit: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]` for points, nested rings for polygons.
    pub coordinates: Value,
}

impl EventGeometry {
    /// `(latitude, longitude)` of the point, or of the first vertex of a polygon.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        let mut current = &self.coordinates;
        loop {
            let items = current.as_array()?;
            match (items.first()?.as_f64(), items.get(1).and_then(Value::as_f64)) {
                (Some(lon), Some(lat)) => return Some((lat, lon)),
                _ => current = items.first()?,
            }
        }
    }
}

// APOD

/// A single APOD is an object; `count` queries answer with an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApodResponse {
    Many(Vec<AstronomyPictureOfTheDay>),
    One(Box<AstronomyPictureOfTheDay>),
}

impl ApodResponse {
    pub fn into_vec(self) -> Vec<AstronomyPictureOfTheDay> {
        match self {
            ApodResponse::Many(pages) => pages,
            ApodResponse::One(page) => vec![*page],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AstronomyPictureOfTheDay {
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hdurl: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

// EPIC

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct J2000Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl J2000Position {
    /// Distance from the origin, in km.
    pub fn distance(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpicCoords {
    pub dscovr_j2000_position: J2000Position,
    pub lunar_j2000_position: J2000Position,
    pub sun_j2000_position: J2000Position,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpicData {
    pub identifier: String,
    #[serde(default)]
    pub caption: String,
    pub image: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub date: String,
    #[serde(default)]
    pub coords: Option<EpicCoords>,
    #[serde(default)]
    pub dscovr_j2000_position: Option<J2000Position>,
    #[serde(default)]
    pub lunar_j2000_position: Option<J2000Position>,
    #[serde(default)]
    pub sun_j2000_position: Option<J2000Position>,
}

impl EpicData {
    pub fn taken_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S").ok()
    }

    /// Archive URL of the png, e.g. `{base}natural/2024/01/05/png/{image}.png`.
    pub fn archive_url(&self, archive_base: &str, enhanced: bool) -> Option<String> {
        let taken = self.taken_at()?;
        let kind = if enhanced { "enhanced" } else { "natural" };
        Some(format!(
            "{}{}/{}/png/{}.png",
            archive_base,
            kind,
            taken.format("%Y/%m/%d"),
            self.image
        ))
    }

    pub fn dscovr_position(&self) -> Option<J2000Position> {
        self.coords
            .as_ref()
            .map(|coords| coords.dscovr_j2000_position)
            .or(self.dscovr_j2000_position)
    }

    pub fn lunar_position(&self) -> Option<J2000Position> {
        self.coords
            .as_ref()
            .map(|coords| coords.lunar_j2000_position)
            .or(self.lunar_j2000_position)
    }

    pub fn sun_position(&self) -> Option<J2000Position> {
        self.coords
            .as_ref()
            .map(|coords| coords.sun_j2000_position)
            .or(self.sun_j2000_position)
    }
}
