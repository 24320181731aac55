//! City table - display names and coordinates for known zones
//!
//! Zones missing from the table still get a name derived from their
//! identifier and sit at the origin of the map.

use chrono_tz::Tz;
use shared::search_timezones;

/// A known city backing a time zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    /// IANA zone identifier
    pub zone: &'static str,
    /// Display name, unique across the table
    pub name: &'static str,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Latitude in decimal degrees
    pub lat: f64,
}

const fn city(zone: &'static str, name: &'static str, lon: f64, lat: f64) -> City {
    City { zone, name, lon, lat }
}

pub const CITIES: &[City] = &[
    // Asia
    city("Asia/Shanghai", "Shanghai", 121.4737, 31.2304),
    city("Asia/Chongqing", "Chongqing", 106.5516, 29.5630),
    city("Asia/Harbin", "Harbin", 126.6424, 45.7560),
    city("Asia/Urumqi", "Urumqi", 87.6168, 43.8256),
    city("Asia/Taipei", "Taipei", 121.5654, 25.0330),
    city("Asia/Hong_Kong", "Hong Kong", 114.1694, 22.3193),
    city("Asia/Tokyo", "Tokyo", 139.6917, 35.6895),
    city("Asia/Seoul", "Seoul", 126.9780, 37.5665),
    city("Asia/Singapore", "Singapore", 103.8198, 1.3521),
    city("Asia/Kuala_Lumpur", "Kuala Lumpur", 101.6869, 3.1390),
    city("Asia/Jakarta", "Jakarta", 106.8456, -6.2088),
    city("Asia/Bangkok", "Bangkok", 100.5018, 13.7563),
    city("Asia/Kolkata", "Mumbai", 72.8777, 19.0760),
    city("Asia/Dubai", "Dubai", 55.2708, 25.2048),
    city("Asia/Tel_Aviv", "Tel Aviv", 34.7818, 32.0853),
    city("Asia/Tehran", "Tehran", 51.3890, 35.6892),
    // Europe
    city("Europe/London", "London", -0.1276, 51.5074),
    city("Europe/Paris", "Paris", 2.3522, 48.8566),
    city("Europe/Berlin", "Berlin", 13.4050, 52.5200),
    city("Europe/Moscow", "Moscow", 37.6173, 55.7558),
    city("Europe/Rome", "Rome", 12.4964, 41.9028),
    city("Europe/Madrid", "Madrid", -3.7038, 40.4168),
    city("Europe/Amsterdam", "Amsterdam", 4.9041, 52.3676),
    city("Europe/Istanbul", "Istanbul", 28.9784, 41.0082),
    city("Europe/Zurich", "Zurich", 8.5417, 47.3769),
    city("Europe/Stockholm", "Stockholm", 18.0686, 59.3293),
    city("Europe/Tallinn", "Tallinn", 24.7536, 59.4370),
    // North America
    city("America/New_York", "New York", -74.0060, 40.7128),
    city("America/Toronto", "Toronto", -79.3832, 43.6532),
    city("America/Vancouver", "Vancouver", -123.1207, 49.2827),
    city("America/Chicago", "Chicago", -87.6298, 41.8781),
    city("America/Denver", "Denver", -104.9903, 39.7392),
    city("America/Los_Angeles", "Los Angeles", -118.2437, 34.0522),
    city("America/Mexico_City", "Mexico City", -99.1332, 19.4326),
    city("America/Phoenix", "Phoenix", -112.0740, 33.4484),
    city("America/Anchorage", "Anchorage", -149.9003, 61.2181),
    city("Pacific/Honolulu", "Honolulu", -157.8583, 21.3069),
    // South America
    city("America/Sao_Paulo", "Sao Paulo", -46.6333, -23.5505),
    city("America/Argentina/Buenos_Aires", "Buenos Aires", -58.3816, -34.6037),
    // Africa
    city("Africa/Cairo", "Cairo", 31.2357, 30.0444),
    city("Africa/Johannesburg", "Johannesburg", 28.0473, -26.2041),
    city("Africa/Nairobi", "Nairobi", 36.8219, -1.2921),
    city("Africa/Lagos", "Lagos", 3.3792, 6.5244),
    city("Africa/Tripoli", "Tripoli", 13.1913, 32.8872),
    // Oceania
    city("Australia/Sydney", "Sydney", 151.2093, -33.8688),
    city("Australia/Melbourne", "Melbourne", 144.9631, -37.8136),
    city("Pacific/Auckland", "Auckland", 174.7633, -36.8485),
    city("Pacific/Fiji", "Fiji", 178.4419, -18.1416),
];

/// Zones shown in the popular city grid
pub const POPULAR_ZONES: &[&str] = &[
    "America/Los_Angeles",
    "Asia/Tokyo",
    "Europe/London",
    "America/New_York",
    "Europe/Tallinn",
    "Asia/Dubai",
    "Australia/Sydney",
    "America/Sao_Paulo",
    "Africa/Tripoli",
];

/// Resolved name and position of a zone on the map
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

pub fn lookup(zone_id: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.zone == zone_id)
}

/// Last path segment of the identifier with underscores as spaces
pub fn derived_name(zone_id: &str) -> String {
    zone_id
        .rsplit('/')
        .next()
        .unwrap_or(zone_id)
        .replace('_', " ")
}

pub fn display_name(zone_id: &str) -> String {
    match lookup(zone_id) {
        Some(city) => city.name.to_string(),
        None => derived_name(zone_id),
    }
}

pub fn geo_point(zone_id: &str) -> GeoPoint {
    match lookup(zone_id) {
        Some(city) => GeoPoint {
            name: city.name.to_string(),
            lon: city.lon,
            lat: city.lat,
        },
        None => GeoPoint {
            name: derived_name(zone_id),
            lon: 0.0,
            lat: 0.0,
        },
    }
}

/// Translate an exact display name into its zone identifier
pub fn resolve_display_name(text: &str) -> Option<&'static str> {
    CITIES.iter().find(|c| c.name == text).map(|c| c.zone)
}

pub fn popular_zones() -> Vec<Tz> {
    POPULAR_ZONES.iter().filter_map(|id| id.parse().ok()).collect()
}

/// Completion candidates for the add-zone field
///
/// Matching is a case-insensitive substring test. Display names from the
/// table come first, then identifiers from the whole database.
pub fn suggest(query: &str, limit: usize) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    let mut out: Vec<&'static str> = Vec::new();

    for city in CITIES {
        if out.len() >= limit {
            return out;
        }
        if city.name.to_lowercase().contains(&needle) || city.zone.to_lowercase().contains(&needle)
        {
            out.push(city.name);
        }
    }

    if needle.is_empty() {
        return out;
    }

    for tz in search_timezones(&needle) {
        if out.len() >= limit {
            break;
        }
        let name = tz.name();
        if lookup(name).is_none() {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_zones_are_valid() {
        for city in CITIES {
            assert!(
                shared::parse_timezone(city.zone).is_ok(),
                "{} is not a known zone",
                city.zone
            );
        }
        assert_eq!(popular_zones().len(), POPULAR_ZONES.len());
    }

    #[test]
    fn test_table_is_unique() {
        let zones: HashSet<_> = CITIES.iter().map(|c| c.zone).collect();
        let names: HashSet<_> = CITIES.iter().map(|c| c.name).collect();
        assert_eq!(zones.len(), CITIES.len());
        assert_eq!(names.len(), CITIES.len());

        let popular: HashSet<_> = POPULAR_ZONES.iter().collect();
        assert_eq!(popular.len(), POPULAR_ZONES.len());
    }

    #[test]
    fn test_geo_point_fallback() {
        let tokyo = geo_point("Asia/Tokyo");
        assert_eq!(tokyo.name, "Tokyo");
        assert_eq!((tokyo.lon, tokyo.lat), (139.6917, 35.6895));

        let unknown = geo_point("America/Port_of_Spain");
        assert_eq!(unknown.name, "Port of Spain");
        assert_eq!((unknown.lon, unknown.lat), (0.0, 0.0));

        assert_eq!(display_name("America/Argentina/Buenos_Aires"), "Buenos Aires");
        assert_eq!(display_name("UTC"), "UTC");
    }

    #[test]
    fn test_resolve_display_name() {
        assert_eq!(resolve_display_name("Mumbai"), Some("Asia/Kolkata"));
        assert_eq!(resolve_display_name("New York"), Some("America/New_York"));
        assert_eq!(resolve_display_name("new york"), None);
        assert_eq!(resolve_display_name("Asia/Tokyo"), None);
    }

    #[test]
    fn test_suggest() {
        let hits = suggest("york", 10);
        assert_eq!(hits.first(), Some(&"New York"));
        assert!(!hits.contains(&"America/New_York"));

        let hits = suggest("port_of", 10);
        assert!(hits.contains(&"America/Port_of_Spain"));

        assert_eq!(suggest("", 5).len(), 5);
        assert!(suggest("zzzz-nothing", 10).is_empty());
    }
}
