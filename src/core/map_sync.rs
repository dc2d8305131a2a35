//! Keeps the map's marker set consistent with one view of the alert store.
//!
//! Full replacement on every sync: all placed markers are removed before the
//! new view is drawn. This is deliberately not incremental diffing — stale or
//! duplicate markers after a filter change are impossible by construction.

use serde::Serialize;

use super::model::Alert;

/// Map-visible representation of one alert. Derived and disposable; never
/// persisted, rebuilt on every view change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub alert_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub color: &'static str,
    pub popup_html: String,
}

impl Marker {
    pub fn for_alert(alert: &Alert) -> Self {
        Self {
            alert_id: alert.id,
            latitude: alert.latitude,
            longitude: alert.longitude,
            color: alert.severity.marker_color(),
            popup_html: popup_html(alert),
        }
    }
}

/// The seam to the map-rendering library. The production implementation
/// forwards to the Leaflet map in the webview; tests use a recording fake.
pub trait MapSurface {
    fn remove_all_markers(&mut self);
    fn place_marker(&mut self, marker: &Marker);
}

pub struct MapSyncEngine {
    markers: Vec<Marker>,
}

impl MapSyncEngine {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Replace the surface's marker set with one marker per alert in `view`.
    ///
    /// Alerts reaching this point always have finite coordinates; submissions
    /// are validated before the store accepts them.
    pub fn sync<'a>(
        &mut self,
        view: impl IntoIterator<Item = &'a Alert>,
        surface: &mut dyn MapSurface,
    ) {
        surface.remove_all_markers();
        self.markers.clear();
        for alert in view {
            let marker = Marker::for_alert(alert);
            surface.place_marker(&marker);
            self.markers.push(marker);
        }
    }

    /// Markers placed by the last sync.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl Default for MapSyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn popup_html(alert: &Alert) -> String {
    let photo = alert
        .photo
        .as_deref()
        .map(|uri| {
            format!(
                "<img src=\"{uri}\" style=\"max-width: 150px; margin-top: 5px; border-radius: 5px;\"><br>"
            )
        })
        .unwrap_or_default();

    format!(
        "<strong>{}</strong><br>\
         <em>Severidade: {}</em><br>\
         Endereço: {}<br>\
         Descrição: {}<br>\
         {photo}<small>Registrado em: {}</small>",
        alert.kind.label(),
        alert.severity.label().to_uppercase(),
        escape(&alert.address),
        escape(&alert.description),
        alert.created_at_display,
    )
}
