//! Canned API payloads, trimmed down from real responses.

use serde_json::{Value, json};

/// `/schedule/2024-01-05` with two games that day and one the next.
pub fn schedule() -> Value {
    json!({
        "gameWeek": [
            {
                "date": "2024-01-05",
                "games": [
                    {
                        "id": 2023020601,
                        "startTimeUTC": "2024-01-06T00:00:00Z",
                        "gameState": "FUT",
                        "awayTeam": {"abbrev": "TOR"},
                        "homeTeam": {"abbrev": "MTL"},
                        "venue": {"default": "Centre Bell"}
                    },
                    {
                        "id": 2023020602,
                        "startTimeUTC": "2024-01-06T03:00:00Z",
                        "gameState": "OFF",
                        "awayTeam": {"abbrev": "CGY", "score": 2},
                        "homeTeam": {"abbrev": "EDM", "score": 5},
                        "venue": {"default": "Rogers Place"}
                    }
                ]
            },
            {
                "date": "2024-01-06",
                "games": [
                    {
                        "id": 2023020610,
                        "startTimeUTC": "2024-01-07T00:00:00Z",
                        "gameState": "FUT",
                        "awayTeam": {"abbrev": "MTL"},
                        "homeTeam": {"abbrev": "TOR"}
                    }
                ]
            }
        ]
    })
}

/// `/roster/TOR/current`.
pub fn roster() -> Value {
    let player = |id: u64, first: &str, last: &str, number: u32, position: &str| {
        json!({
            "id": id,
            "firstName": {"default": first},
            "lastName": {"default": last},
            "sweaterNumber": number,
            "positionCode": position
        })
    };
    json!({
        "forwards": [
            player(8479318, "Auston", "Matthews", 34, "C"),
            player(8478483, "Mitchell", "Marner", 16, "R")
        ],
        "defensemen": [player(8476853, "Morgan", "Rielly", 44, "D")],
        "goalies": [player(8479361, "Joseph", "Woll", 60, "G")]
    })
}

/// EONET `/events` with one storm tracked over three days and one fire.
pub fn events() -> Value {
    json!({
        "events": [
            {
                "id": "EONET_6500",
                "title": "Tropical Storm Example",
                "description": null,
                "categories": [{"id": "severeStorms", "title": "Severe Storms"}],
                "sources": [{"id": "JTWC", "url": "https://www.metoc.navy.mil/jtwc/"}],
                "geometry": [
                    {"magnitudeValue": 35.0, "magnitudeUnit": "kts", "date": "2024-01-03T00:00:00Z", "type": "Point", "coordinates": [150.5, -15.0]},
                    {"magnitudeValue": 45.0, "magnitudeUnit": "kts", "date": "2024-01-04T00:00:00Z", "type": "Point", "coordinates": [151.0, -16.5]},
                    {"magnitudeValue": 55.0, "magnitudeUnit": "kts", "date": "2024-01-05T00:00:00Z", "type": "Point", "coordinates": [152.25, -17.5]}
                ]
            },
            {
                "id": "EONET_6501",
                "title": "Wildfire Example",
                "categories": [{"id": "wildfires", "title": "Wildfires"}],
                "sources": [],
                "geometry": [
                    {"date": "2024-01-05T12:00:00Z", "type": "Point", "coordinates": [-120.0, 38.0]}
                ]
            }
        ]
    })
}

/// `/EPIC/api/natural` with a single image.
pub fn epic() -> Value {
    json!([{
        "identifier": "20240105003633",
        "caption": "This image was taken by NASA's EPIC camera onboard the NOAA DSCOVR spacecraft",
        "image": "epic_1b_20240105003633",
        "date": "2024-01-05 00:31:45",
        "coords": {
            "dscovr_j2000_position": {"x": 1_200_000.5, "y": 0.0, "z": 0.0},
            "lunar_j2000_position": {"x": 0.0, "y": 384_400.5, "z": 0.0},
            "sun_j2000_position": {"x": 0.0, "y": 0.0, "z": 147_100_000.5}
        }
    }])
}
