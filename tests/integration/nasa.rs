use cogbot::{
    commands::nasa::{
        menus::{EpicPages, NasaEventPages},
        models::{EpicData, EventsResponse},
    },
    utils::menu::{PagePosition, PageSource},
};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::fixtures;

async fn embed(source: &impl PageSource, page: usize) -> Value {
    let position = PagePosition {
        current: page,
        max: source.max_pages(),
    };
    let rendered = source.format_page(page, Some(position)).await.unwrap();
    serde_json::to_value(&rendered.embeds[0]).unwrap()
}

#[tokio::test]
async fn test_event_pages_follow_the_latest_position() {
    let response: EventsResponse = serde_json::from_value(fixtures::events()).unwrap();
    let pages = NasaEventPages::new(response.events);
    assert_eq!(pages.max_pages(), 2);

    let storm = embed(&pages, 0).await;
    assert_eq!(storm["title"], "Tropical Storm Example");
    assert_eq!(
        storm["fields"][0]["value"],
        "[Latitude: -17.5\nLongitude: 152.25](https://www.google.com/maps/search/?api=1&query=-17.5%2C152.25)"
    );
    let data = storm["fields"][1]["value"].as_str().unwrap();
    assert_eq!(data.lines().next(), Some("55.0 kts - <t:1704412800:f>"));
    assert_eq!(data.lines().count(), 3);
    assert_eq!(storm["fields"][2]["name"], "Sources");

    let fire = embed(&pages, 1).await;
    assert_eq!(fire["fields"].as_array().unwrap().len(), 1);
    assert_eq!(fire["footer"]["text"], "Page 2/2");
}

#[tokio::test]
async fn test_epic_page_distances() {
    let images: Vec<EpicData> = serde_json::from_value(fixtures::epic()).unwrap();
    let pages = EpicPages::new(images, "https://epic.gsfc.nasa.gov/archive/", false);

    let page = embed(&pages, 0).await;
    assert_eq!(page["title"], "20240105003633");
    assert_eq!(
        page["url"],
        "https://epic.gsfc.nasa.gov/archive/natural/2024/01/05/png/epic_1b_20240105003633.png"
    );
    let description = page["description"].as_str().unwrap();
    assert!(description.contains("Distance from Earth: 1,200,000 km (745,645 Miles)\n"));
    assert!(description.contains("Distance from Sun: 147,100,000 km (91,403,674 Miles)\n"));
    assert!(description.contains("Distance from Moon: 384,400 km (238,855 Miles)\n"));
}
