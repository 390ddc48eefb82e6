//! Physical store directory for the store locator.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Mean Earth radius in kilometres used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub lat: f64,
    pub lng: f64,
    pub hours: String,
}

impl Store {
    /// Great-circle distance from this store to `(lat, lng)` in kilometres.
    #[must_use]
    pub fn distance_km(&self, lat: f64, lng: f64) -> f64 {
        haversine_km(self.lat, self.lng, lat, lng)
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Deserialize)]
struct StoresFile {
    stores: Vec<Store>,
}

/// Validated, ordered list of stores.
#[derive(Debug, Clone, Default)]
pub struct StoreDirectory {
    stores: Vec<Store>,
}

impl StoreDirectory {
    /// Builds a directory after validating every entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on empty or duplicate ids, empty
    /// names, or out-of-range coordinates.
    pub fn new(stores: Vec<Store>) -> Result<Self, ConfigError> {
        validate_stores(&stores)?;
        Ok(Self { stores })
    }

    #[must_use]
    pub fn all(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    /// Case-insensitive substring search over name, address, and city.
    /// A blank query returns every store.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Store> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.stores.iter().collect();
        }
        self.stores.iter().filter(|s| s.matches(&needle)).collect()
    }

    /// The closest store to `(lat, lng)` and its distance in kilometres.
    #[must_use]
    pub fn nearest(&self, lat: f64, lng: f64) -> Option<(&Store, f64)> {
        self.stores
            .iter()
            .map(|s| (s, s.distance_km(lat, lng)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Every store paired with its distance, closest first.
    #[must_use]
    pub fn sorted_by_distance(&self, lat: f64, lng: f64) -> Vec<(&Store, f64)> {
        let mut ranked: Vec<(&Store, f64)> = self
            .stores
            .iter()
            .map(|s| (s, s.distance_km(lat, lng)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }
}

/// Load and validate the store list from a YAML file of the form
/// `stores: [ { id, name, address, city, phone, lat, lng, hours }, ... ]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoreDirectory, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_stores(&content)
}

fn parse_stores(content: &str) -> Result<StoreDirectory, ConfigError> {
    let file: StoresFile = serde_yaml::from_str(content).map_err(ConfigError::StoresFileParse)?;
    StoreDirectory::new(file.stores)
}

fn validate_stores(stores: &[Store]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for store in stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty id",
                store.name
            )));
        }

        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty name",
                store.id
            )));
        }

        if !(-90.0..=90.0).contains(&store.lat) || !(-180.0..=180.0).contains(&store.lng) {
            return Err(ConfigError::Validation(format!(
                "store '{}' has out-of-range coordinates ({}, {})",
                store.id, store.lat, store.lng
            )));
        }

        if !seen_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
    }

    Ok(())
}

fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORES_YAML: &str = r#"
stores:
  - id: lagos-ikeja
    name: "Richview Flagship - Ikeja"
    address: "12 Allen Ave, Ikeja, Lagos"
    city: Lagos
    phone: "+234 800 000 1001"
    lat: 6.6018
    lng: 3.3515
    hours: "Mon-Sat 9:00-19:00"
  - id: abuja-central
    name: "Richview - Abuja Central"
    address: "Plot 45, Wuse, Abuja"
    city: Abuja
    phone: "+234 800 000 2001"
    lat: 9.0765
    lng: 7.3986
    hours: "Mon-Sat 9:00-18:00"
  - id: kano-mall
    name: "Richview - Kano Mall"
    address: "Mall Road, Kano"
    city: Kano
    phone: "+234 800 000 4001"
    lat: 11.9964
    lng: 8.5167
    hours: "Tue-Sun 10:00-19:00"
"#;

    fn directory() -> StoreDirectory {
        parse_stores(STORES_YAML).expect("fixture parses")
    }

    fn store(id: &str, lat: f64, lng: f64) -> Store {
        Store {
            id: id.to_string(),
            name: format!("Store {id}"),
            address: String::new(),
            city: String::new(),
            phone: String::new(),
            lat,
            lng,
            hours: String::new(),
        }
    }

    #[test]
    fn parses_fixture() {
        let dir = directory();
        assert_eq!(dir.all().len(), 3);
        assert_eq!(dir.get("kano-mall").map(|s| s.city.as_str()), Some("Kano"));
    }

    #[test]
    fn search_blank_returns_all() {
        assert_eq!(directory().search("   ").len(), 3);
    }

    #[test]
    fn search_matches_city_case_insensitively() {
        let dir = directory();
        let hits = dir.search("ABUJA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "abuja-central");
    }

    #[test]
    fn search_matches_address() {
        let dir = directory();
        let hits = dir.search("allen ave");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "lagos-ikeja");
    }

    #[test]
    fn nearest_picks_closest_store() {
        let dir = directory();
        // Central Kano.
        let (nearest, km) = dir.nearest(12.0, 8.52).expect("non-empty directory");
        assert_eq!(nearest.id, "kano-mall");
        assert!(km < 5.0, "expected a short distance, got {km}");
    }

    #[test]
    fn nearest_on_empty_directory_is_none() {
        assert!(StoreDirectory::default().nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn sorted_by_distance_orders_closest_first() {
        let dir = directory();
        let ranked = dir.sorted_by_distance(6.5, 3.35);
        let ids: Vec<&str> = ranked.iter().map(|(s, _)| s.id.as_str()).collect();
        assert_eq!(ids, vec!["lagos-ikeja", "abuja-central", "kano-mall"]);
    }

    #[test]
    fn haversine_known_distance() {
        // Lagos (Ikeja) to Abuja is roughly 530 km as the crow flies.
        let km = haversine_km(6.6018, 3.3515, 9.0765, 7.3986);
        assert!((500.0..560.0).contains(&km), "got {km}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert!(haversine_km(6.5, 3.3, 6.5, 3.3).abs() < 1e-9);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = StoreDirectory::new(vec![store("a", 0.0, 0.0), store("a", 1.0, 1.0)])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = StoreDirectory::new(vec![store("a", 91.0, 0.0)]).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("out-of-range")));
    }

    #[test]
    fn rejects_empty_id() {
        let err = StoreDirectory::new(vec![store(" ", 0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let err = parse_stores("stores: [ {id: 1").unwrap_err();
        assert!(matches!(err, ConfigError::StoresFileParse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_stores(Path::new("/nonexistent/richview/stores.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::StoresFileIo { .. }));
    }
}
