//! End-to-end flows across store, filter, map sync, views and persistence.

use chrono::{Local, TimeZone};
use tempfile::tempdir;

use super::filter::{AlertFilter, Period};
use super::map_sync::{MapSurface, MapSyncEngine, Marker};
use super::model::{AlertKind, NewAlert, Severity};
use super::persist::AlertStorage;
use super::store::AlertStore;
use super::view;

#[derive(Default)]
struct FakeMap {
    markers: Vec<Marker>,
}

impl MapSurface for FakeMap {
    fn remove_all_markers(&mut self) {
        self.markers.clear();
    }

    fn place_marker(&mut self, marker: &Marker) {
        self.markers.push(marker.clone());
    }
}

fn submission(kind: AlertKind, severity: Severity) -> NewAlert {
    NewAlert {
        kind,
        severity,
        address: "Rua Principal, 1".to_string(),
        latitude: -22.90,
        longitude: -42.80,
        description: "Água subindo rápido".to_string(),
        photo: None,
    }
}

#[test]
fn test_submit_flood_alert_updates_everything() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
    let mut store = AlertStore::new();
    let mut engine = MapSyncEngine::new();
    let mut map = FakeMap::default();

    store.append(submission(AlertKind::Enchente, Severity::Alta), now);

    let filter = AlertFilter::default();
    let visible = filter.apply(store.all(), now);
    engine.sync(visible.iter().copied(), &mut map);

    assert_eq!(store.len(), 1);
    assert_eq!(map.markers.len(), 1);
    assert_eq!(map.markers[0].color, "#dc3545");
    assert!((map.markers[0].latitude - -22.90).abs() < f64::EPSILON);

    let stats = view::stats(store.all(), now);
    assert_eq!(stats.high, 1);
    assert_eq!(stats.today, 1);
}

#[test]
fn test_clear_empties_store_map_and_disk() {
    let dir = tempdir().unwrap();
    let storage = AlertStorage::new(dir.path().to_path_buf());
    let now = Local::now();

    let mut store = AlertStore::new();
    store.append(submission(AlertKind::Granizo, Severity::Baixa), now);
    store.append(submission(AlertKind::Outro, Severity::Media), now);
    storage.save(store.all()).unwrap();

    let mut engine = MapSyncEngine::new();
    let mut map = FakeMap::default();
    engine.sync(store.all().iter(), &mut map);
    assert_eq!(map.markers.len(), 2);

    store.clear();
    storage.save(store.all()).unwrap();
    engine.sync(store.all().iter(), &mut map);

    assert!(store.is_empty());
    assert!(map.markers.is_empty());
    assert!(storage.load().is_empty());

    let entries = view::list_entries(store.all().iter());
    assert!(entries.is_empty());
}

#[test]
fn test_filter_narrows_map_but_not_stats() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
    let mut store = AlertStore::new();
    store.append(submission(AlertKind::Enchente, Severity::Alta), now);
    store.append(submission(AlertKind::Vendaval, Severity::Baixa), now);
    store.append(submission(AlertKind::Enchente, Severity::Baixa), now);

    let filter = AlertFilter {
        kind: Some(AlertKind::Enchente),
        severity: Some(Severity::Baixa),
        period: Period::Hoje,
    };
    let visible = filter.apply(store.all(), now);

    let mut engine = MapSyncEngine::new();
    let mut map = FakeMap::default();
    engine.sync(visible.iter().copied(), &mut map);

    assert_eq!(map.markers.len(), 1);
    assert_eq!(map.markers[0].color, "#28a745");

    // Counters stay on the unfiltered store.
    let stats = view::stats(store.all(), now);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.high, 1);
}

#[test]
fn test_restart_restores_store_and_markers() {
    let dir = tempdir().unwrap();
    let now = Local::now();

    {
        let storage = AlertStorage::new(dir.path().to_path_buf());
        let mut store = AlertStore::new();
        store.append(submission(AlertKind::Deslizamento, Severity::Media), now);
        let mut with_photo = submission(AlertKind::Incendio, Severity::Alta);
        with_photo.photo = Some("data:image/png;base64,AAAA".to_string());
        store.append(with_photo, now);
        storage.save(store.all()).unwrap();
    }

    // Fresh process: load from disk, rebuild the map.
    let storage = AlertStorage::new(dir.path().to_path_buf());
    let store = AlertStore::from_saved(storage.load());
    assert_eq!(store.len(), 2);
    assert_eq!(store.all()[1].photo.as_deref(), Some("data:image/png;base64,AAAA"));

    let mut engine = MapSyncEngine::new();
    let mut map = FakeMap::default();
    engine.sync(store.all().iter(), &mut map);
    assert_eq!(map.markers.len(), 2);
    assert!(map.markers[1].popup_html.contains("data:image/png;base64,AAAA"));
}
