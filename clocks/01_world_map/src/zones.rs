//! Zone list - the ordered, de-duplicated set of tracked zones
//!
//! The list is persisted as a JSON array of identifiers under a single key
//! of the local key/value store and rewritten after every change.

use chrono_tz::Tz;
use shared::{parse_timezone, KeyValueStore, StorageError};
use tracing::{debug, info, warn};

use crate::cities::resolve_display_name;

/// Storage key holding the persisted list
pub const STORAGE_KEY: &str = "tz-zones";
/// Zone tracked when nothing usable is persisted
pub const DEFAULT_ZONE: Tz = Tz::Asia__Shanghai;

/// Why a zone typed by the user was not added
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddZoneError {
    /// Input was blank after trimming
    Empty,
    /// Zone is already in the list
    Duplicate(Tz),
    /// Input is neither a known display name nor a valid identifier
    Invalid(String),
}

impl std::fmt::Display for AddZoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddZoneError::Empty => write!(f, "Please enter a time zone"),
            AddZoneError::Duplicate(tz) => write!(f, "Zone already added: {}", tz.name()),
            AddZoneError::Invalid(input) => write!(f, "Invalid time zone: {}", input),
        }
    }
}

impl std::error::Error for AddZoneError {}

pub fn default_zones() -> Vec<Tz> {
    vec![DEFAULT_ZONE]
}

/// `list` with `zone` appended, unless already present
pub fn add(list: &[Tz], zone: Tz) -> Vec<Tz> {
    let mut out = list.to_vec();
    if !out.contains(&zone) {
        out.push(zone);
    }
    out
}

/// `list` without `zone`
pub fn remove(list: &[Tz], zone: Tz) -> Vec<Tz> {
    list.iter().copied().filter(|&z| z != zone).collect()
}

/// Move the element at `from` so it ends up at index `to`
///
/// `to` indexes the list after the element was taken out. Out-of-range
/// indices leave the list unchanged.
pub fn reorder(list: &[Tz], from: usize, to: usize) -> Vec<Tz> {
    let mut out = list.to_vec();
    if from >= out.len() || to >= out.len() {
        return out;
    }
    let moved = out.remove(from);
    out.insert(to, moved);
    out
}

/// Decode a persisted list, `None` when it is unusable
fn decode(raw: &str) -> Option<Vec<Tz>> {
    let ids: Vec<String> = match serde_json::from_str(raw) {
        Ok(ids) => ids,
        Err(e) => {
            debug!(error = %e, "persisted zone list is not a string array");
            return None;
        }
    };

    let mut zones = Vec::with_capacity(ids.len());
    for id in &ids {
        match parse_timezone(id) {
            Ok(tz) if !zones.contains(&tz) => zones.push(tz),
            Ok(_) => debug!(zone = %id, "dropping duplicate persisted zone"),
            Err(e) => debug!(error = %e, "dropping persisted zone"),
        }
    }

    if zones.is_empty() && !ids.is_empty() {
        return None;
    }
    Some(zones)
}

/// Read the persisted list, falling back to the default on any problem
pub fn load_zone_list<S: KeyValueStore + ?Sized>(storage: &S) -> Vec<Tz> {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default_zones(),
        Err(e) => {
            warn!(error = %e, "could not read zone list, using default");
            return default_zones();
        }
    };
    decode(&raw).unwrap_or_else(default_zones)
}

/// Write the list under [`STORAGE_KEY`]
pub fn persist_zone_list<S: KeyValueStore + ?Sized>(
    storage: &mut S,
    zones: &[Tz],
) -> Result<(), StorageError> {
    let ids: Vec<&str> = zones.iter().map(|tz| tz.name()).collect();
    let raw = serde_json::to_string(&ids).map_err(|e| StorageError::Io(e.into()))?;
    storage.set(STORAGE_KEY, &raw)
}

/// Resolve user input to a zone: display names first, then identifiers
pub fn resolve_input(input: &str) -> Result<Tz, AddZoneError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(AddZoneError::Empty);
    }
    let id = resolve_display_name(text).unwrap_or(text);
    parse_timezone(id).map_err(|_| AddZoneError::Invalid(text.to_string()))
}

/// Owner of the tracked zones and the highlighted zone
pub struct ZoneListStore<S: KeyValueStore> {
    zones: Vec<Tz>,
    selected: Option<Tz>,
    storage: S,
}

impl<S: KeyValueStore> ZoneListStore<S> {
    /// Rehydrate from storage
    pub fn load(storage: S) -> Self {
        let zones = load_zone_list(&storage);
        debug!(count = zones.len(), "loaded zone list");
        Self {
            zones,
            selected: None,
            storage,
        }
    }

    pub fn zones(&self) -> &[Tz] {
        &self.zones
    }

    pub fn selected(&self) -> Option<Tz> {
        self.selected
    }

    pub fn contains(&self, zone: Tz) -> bool {
        self.zones.contains(&zone)
    }

    #[allow(dead_code)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a zone typed by the user
    pub fn add_from_input(&mut self, input: &str) -> Result<Tz, AddZoneError> {
        let result = resolve_input(input).and_then(|tz| {
            if self.contains(tz) {
                Err(AddZoneError::Duplicate(tz))
            } else {
                Ok(tz)
            }
        });

        match result {
            Ok(tz) => {
                self.apply(add(&self.zones, tz));
                Ok(tz)
            }
            Err(e) => {
                info!(input = input.trim(), reason = %e, "rejected zone");
                Err(e)
            }
        }
    }

    /// Add an already valid zone; returns whether the list changed
    pub fn add_zone(&mut self, zone: Tz) -> bool {
        self.apply(add(&self.zones, zone))
    }

    pub fn remove_zone(&mut self, zone: Tz) -> bool {
        self.apply(remove(&self.zones, zone))
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.apply(reorder(&self.zones, from, to))
    }

    /// Highlight a zone without touching the list
    pub fn select(&mut self, zone: Tz) {
        self.selected = Some(zone);
    }

    /// Highlight a zone and track it if it is new
    pub fn activate(&mut self, zone: Tz) -> bool {
        self.select(zone);
        self.add_zone(zone)
    }

    /// Drop every zone and go back to the default list
    pub fn reset(&mut self) {
        self.selected = None;
        self.zones = default_zones();
        self.persist();
    }

    /// Write the current list even if it did not change
    pub fn flush(&mut self) {
        self.persist();
    }

    fn apply(&mut self, next: Vec<Tz>) -> bool {
        if next == self.zones {
            return false;
        }
        self.zones = next;
        self.persist();
        true
    }

    fn persist(&mut self) {
        if let Err(e) = persist_zone_list(&mut self.storage, &self.zones) {
            warn!(error = %e, "failed to persist zone list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FileStore, MemoryStore};

    fn tz(id: &str) -> Tz {
        id.parse().unwrap()
    }

    fn zones(ids: &[&str]) -> Vec<Tz> {
        ids.iter().map(|id| tz(id)).collect()
    }

    fn stored(raw: &str) -> MemoryStore {
        let mut storage = MemoryStore::new();
        storage.set(STORAGE_KEY, raw).unwrap();
        storage
    }

    /// Store whose writes always fail
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_add_is_unique_and_idempotent() {
        let mut list = Vec::new();
        for id in ["Asia/Tokyo", "Europe/London", "Asia/Tokyo", "Europe/London", "UTC"] {
            list = add(&list, tz(id));
        }
        assert_eq!(list, zones(&["Asia/Tokyo", "Europe/London", "UTC"]));

        let once = add(&list, tz("Pacific/Fiji"));
        assert_eq!(add(&once, tz("Pacific/Fiji")), once);
    }

    #[test]
    fn test_remove() {
        let list = zones(&["Asia/Tokyo", "Europe/London", "UTC"]);
        assert_eq!(remove(&list, tz("Europe/London")), zones(&["Asia/Tokyo", "UTC"]));
        assert_eq!(remove(&list, tz("Pacific/Fiji")), list);
        assert!(!remove(&add(&list, tz("Asia/Dubai")), tz("Asia/Dubai")).contains(&tz("Asia/Dubai")));
    }

    #[test]
    fn test_reorder() {
        let list = zones(&["Asia/Tokyo", "Europe/London"]);
        assert_eq!(reorder(&list, 0, 1), zones(&["Europe/London", "Asia/Tokyo"]));

        let list = zones(&["Asia/Tokyo", "Europe/London", "UTC", "Africa/Cairo"]);
        // Move the last to the front; the rest keep their order
        assert_eq!(
            reorder(&list, 3, 0),
            zones(&["Africa/Cairo", "Asia/Tokyo", "Europe/London", "UTC"])
        );
        assert_eq!(
            reorder(&list, 0, 2),
            zones(&["Europe/London", "UTC", "Asia/Tokyo", "Africa/Cairo"])
        );
        assert_eq!(reorder(&list, 1, 1), list);
        assert_eq!(reorder(&list, 4, 0), list);
        assert_eq!(reorder(&list, 0, 4), list);
        assert_eq!(reorder(&[], 0, 0), Vec::<Tz>::new());
    }

    #[test]
    fn test_default_zone() {
        assert_eq!(parse_timezone(DEFAULT_ZONE.name()), Ok(DEFAULT_ZONE));
        assert_eq!(default_zones(), vec![DEFAULT_ZONE]);
        assert_eq!(DEFAULT_ZONE.name(), "Asia/Shanghai");
    }

    #[test]
    fn test_load_defaults() {
        let default = zones(&["Asia/Shanghai"]);
        assert_eq!(load_zone_list(&MemoryStore::new()), default);
        assert_eq!(load_zone_list(&stored("not json")), default);
        assert_eq!(load_zone_list(&stored(r#"{"zones": []}"#)), default);
        assert_eq!(load_zone_list(&stored(r#""Asia/Tokyo""#)), default);
        assert_eq!(load_zone_list(&stored(r#"[1, 2]"#)), default);
        assert_eq!(load_zone_list(&stored(r#"["Not/AZone"]"#)), default);
    }

    #[test]
    fn test_load_cleans_entries() {
        assert_eq!(load_zone_list(&stored("[]")), Vec::<Tz>::new());
        assert_eq!(
            load_zone_list(&stored(r#"["Asia/Tokyo", "Bogus/Zone", "Asia/Tokyo", "UTC"]"#)),
            zones(&["Asia/Tokyo", "UTC"])
        );
    }

    #[test]
    fn test_persistence_round_trip() {
        let list = zones(&["Europe/London", "Asia/Tokyo", "America/Argentina/Buenos_Aires"]);
        let mut storage = MemoryStore::new();
        persist_zone_list(&mut storage, &list).unwrap();
        assert_eq!(
            storage.get(STORAGE_KEY).unwrap().as_deref(),
            Some(r#"["Europe/London","Asia/Tokyo","America/Argentina/Buenos_Aires"]"#)
        );
        assert_eq!(load_zone_list(&storage), list);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ZoneListStore::load(FileStore::new(dir.path()));
        store.add_from_input("Asia/Tokyo").unwrap();
        store.add_from_input("London").unwrap();

        let reloaded = ZoneListStore::load(FileStore::new(dir.path()));
        assert_eq!(
            reloaded.zones(),
            zones(&["Asia/Shanghai", "Asia/Tokyo", "Europe/London"]).as_slice()
        );
    }

    #[test]
    fn test_scenario() {
        let mut store = ZoneListStore::load(MemoryStore::new());
        assert_eq!(store.zones(), zones(&["Asia/Shanghai"]).as_slice());

        assert_eq!(store.add_from_input("Asia/Tokyo"), Ok(tz("Asia/Tokyo")));
        assert_eq!(store.zones(), zones(&["Asia/Shanghai", "Asia/Tokyo"]).as_slice());
        assert_eq!(load_zone_list(store.storage()), store.zones());

        assert_eq!(
            store.add_from_input("Asia/Tokyo"),
            Err(AddZoneError::Duplicate(tz("Asia/Tokyo")))
        );
        assert_eq!(
            store.add_from_input("Not/AZone"),
            Err(AddZoneError::Invalid("Not/AZone".to_string()))
        );
        assert_eq!(store.zones(), zones(&["Asia/Shanghai", "Asia/Tokyo"]).as_slice());

        assert!(store.remove_zone(tz("Asia/Shanghai")));
        assert_eq!(store.zones(), zones(&["Asia/Tokyo"]).as_slice());

        store.add_from_input("Europe/London").unwrap();
        assert!(store.reorder(0, 1));
        assert_eq!(store.zones(), zones(&["Europe/London", "Asia/Tokyo"]).as_slice());
        assert_eq!(load_zone_list(store.storage()), store.zones());
    }

    #[test]
    fn test_add_from_input_rules() {
        let mut store = ZoneListStore::load(MemoryStore::new());
        assert_eq!(store.add_from_input("   "), Err(AddZoneError::Empty));
        assert_eq!(store.add_from_input("  Mumbai "), Ok(tz("Asia/Kolkata")));
        assert_eq!(
            store.add_from_input("asia/tokyo"),
            Err(AddZoneError::Invalid("asia/tokyo".to_string()))
        );
        assert_eq!(
            store.add_from_input("Shanghai"),
            Err(AddZoneError::Duplicate(tz("Asia/Shanghai")))
        );
        assert_eq!(AddZoneError::Empty.to_string(), "Please enter a time zone");
    }

    #[test]
    fn test_select_and_activate() {
        let mut store = ZoneListStore::load(MemoryStore::new());
        store.select(tz("Europe/Paris"));
        assert_eq!(store.selected(), Some(tz("Europe/Paris")));
        assert!(!store.contains(tz("Europe/Paris")));

        assert!(store.activate(tz("Asia/Dubai")));
        assert!(!store.activate(tz("Asia/Dubai")));
        assert_eq!(store.selected(), Some(tz("Asia/Dubai")));
        assert_eq!(store.zones(), zones(&["Asia/Shanghai", "Asia/Dubai"]).as_slice());
    }

    #[test]
    fn test_reset() {
        let mut store = ZoneListStore::load(stored(r#"["UTC", "Asia/Tokyo"]"#));
        store.select(tz("UTC"));
        store.reset();
        assert_eq!(store.zones(), zones(&["Asia/Shanghai"]).as_slice());
        assert_eq!(store.selected(), None);
        assert_eq!(
            store.storage().get(STORAGE_KEY).unwrap().as_deref(),
            Some(r#"["Asia/Shanghai"]"#)
        );
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = ZoneListStore::load(ReadOnlyStore::default());
        assert!(store.add_zone(tz("Asia/Tokyo")));
        assert_eq!(store.zones(), zones(&["Asia/Shanghai", "Asia/Tokyo"]).as_slice());
        assert_eq!(store.storage().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_unchanged_list_is_not_rewritten() {
        let mut store = ZoneListStore::load(MemoryStore::new());
        assert!(!store.remove_zone(tz("Europe/Paris")));
        assert!(!store.reorder(0, 5));
        assert_eq!(store.storage().get(STORAGE_KEY).unwrap(), None);
    }
}
