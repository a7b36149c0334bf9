// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static gazetteer of London locations with coordinates.
//!
//! Feeds the `Location` presentation payload: when an article names a known
//! landmark, the presentation layer gets coordinates to render a map pin.

use cicerone_core::types::MapLocation;

/// Known London landmarks and areas keyed by lowercase containment keyword.
const LOCATIONS: &[(&str, &str, f64, f64, &str)] = &[
    // Westminster area
    ("royal aquarium", "Royal Aquarium", 51.5007, -0.1268, "Site of the Royal Aquarium, Westminster"),
    ("westminster abbey", "Westminster Abbey", 51.4994, -0.1273, "Westminster Abbey"),
    ("westminster", "Westminster", 51.4995, -0.1248, "Westminster area"),
    ("thorney island", "Thorney Island", 51.4994, -0.1249, "Ancient Thorney Island, now Westminster"),
    ("parliament", "Houses of Parliament", 51.4995, -0.1248, "Palace of Westminster"),
    ("whitehall", "Whitehall", 51.5041, -0.1262, "Whitehall government area"),
    ("trafalgar square", "Trafalgar Square", 51.5080, -0.1281, "Trafalgar Square"),
    ("st james", "St James's", 51.5053, -0.1364, "St James's area"),
    ("pall mall", "Pall Mall", 51.5069, -0.1327, "Pall Mall"),
    ("devil's acre", "Devil's Acre", 51.4975, -0.1309, "The Devil's Acre slum behind Westminster Abbey"),
    // City of London
    ("city of london", "City of London", 51.5155, -0.0922, "The Square Mile"),
    ("tower of london", "Tower of London", 51.5081, -0.0759, "Tower of London"),
    ("london bridge", "London Bridge", 51.5079, -0.0877, "London Bridge"),
    ("fleet street", "Fleet Street", 51.5138, -0.1088, "Fleet Street, historic press district"),
    ("blackfriars", "Blackfriars", 51.5118, -0.1033, "Blackfriars area"),
    ("st paul", "St Paul's Cathedral", 51.5138, -0.0984, "St Paul's Cathedral"),
    ("old bailey", "Old Bailey", 51.5155, -0.1019, "Central Criminal Court"),
    ("cheapside", "Cheapside", 51.5145, -0.0930, "Historic Cheapside"),
    ("smithfield", "Smithfield", 51.5190, -0.1024, "Smithfield market and execution ground"),
    // South of the river
    ("southwark", "Southwark", 51.5034, -0.0946, "Southwark"),
    ("lambeth", "Lambeth", 51.4907, -0.1167, "Lambeth area"),
    ("bankside", "Bankside", 51.5065, -0.0955, "Bankside, historic theatre district"),
    ("vauxhall", "Vauxhall", 51.4861, -0.1229, "Vauxhall pleasure gardens area"),
    ("crystal palace", "Crystal Palace", 51.4225, -0.0750, "Site of the Crystal Palace"),
    ("greenwich", "Greenwich", 51.4826, -0.0077, "Greenwich"),
    ("woolwich", "Woolwich", 51.4880, 0.0633, "Woolwich"),
    ("bermondsey", "Bermondsey", 51.4979, -0.0637, "Bermondsey"),
    // East
    ("spitalfields", "Spitalfields", 51.5196, -0.0749, "Spitalfields market area"),
    ("whitechapel", "Whitechapel", 51.5175, -0.0659, "Whitechapel"),
    ("shoreditch", "Shoreditch", 51.5254, -0.0794, "Shoreditch"),
    // West
    ("tyburn", "Tyburn", 51.5127, -0.1599, "Site of Tyburn gallows, near Marble Arch"),
    ("mayfair", "Mayfair", 51.5107, -0.1495, "Mayfair"),
    ("hyde park", "Hyde Park", 51.5073, -0.1657, "Hyde Park"),
    ("chelsea", "Chelsea", 51.4875, -0.1687, "Chelsea"),
    ("kensington", "Kensington", 51.4988, -0.1749, "Kensington"),
    ("holborn", "Holborn", 51.5177, -0.1195, "Holborn"),
    ("covent garden", "Covent Garden", 51.5129, -0.1243, "Covent Garden"),
    ("somerset house", "Somerset House", 51.5108, -0.1170, "Somerset House"),
    ("strand", "The Strand", 51.5108, -0.1170, "The Strand"),
    ("chiswick", "Chiswick", 51.4928, -0.2548, "Chiswick"),
    // North
    ("islington", "Islington", 51.5362, -0.1033, "Islington"),
    ("clerkenwell", "Clerkenwell", 51.5232, -0.1054, "Clerkenwell"),
    ("kings cross", "King's Cross", 51.5309, -0.1233, "King's Cross area"),
    ("st pancras", "St Pancras", 51.5321, -0.1266, "St Pancras"),
    // Rivers and buried streams
    ("fleet river", "Fleet River", 51.5126, -0.1044, "Site of the buried Fleet River"),
    ("walbrook", "Walbrook", 51.5122, -0.0898, "Site of the Roman Walbrook stream"),
    ("thames", "River Thames", 51.5074, -0.1078, "River Thames at London"),
];

/// Find coordinates for a known landmark named in an article.
///
/// The title is checked before the body so the article's own subject wins
/// over a passing mention. Entries are ordered most-specific first
/// ("westminster abbey" before "westminster").
pub fn locate(title: &str, content: &str) -> Option<MapLocation> {
    let title_lower = title.to_lowercase();
    let content_lower = content.to_lowercase();

    for haystack in [&title_lower, &content_lower] {
        for (keyword, name, lat, lng, description) in LOCATIONS {
            if haystack.contains(keyword) {
                return Some(MapLocation {
                    name: (*name).to_string(),
                    lat: *lat,
                    lng: *lng,
                    description: Some((*description).to_string()),
                });
            }
        }
    }

    None
}

/// Look up a location by name alone ("where is X" requests).
pub fn locate_by_name(location_name: &str) -> Option<MapLocation> {
    let wanted = location_name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    for (keyword, name, lat, lng, description) in LOCATIONS {
        if wanted.contains(keyword) || keyword.contains(wanted.as_str()) {
            return Some(MapLocation {
                name: (*name).to_string(),
                lat: *lat,
                lng: *lng,
                description: Some((*description).to_string()),
            });
        }
    }
    None
}
