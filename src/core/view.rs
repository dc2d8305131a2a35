//! List and summary-counter view models for the webview.
//!
//! The list renders the (already filtered) view newest-first. The counters
//! are always computed over the unfiltered store; filters never affect them.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::filter::local_midnight;
use super::model::{Alert, Severity};

/// Shown in place of the list when the current view is empty.
pub const EMPTY_LIST_PLACEHOLDER: &str = "Nenhuma ocorrência encontrada.";

/// One row of the occurrence list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertListEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Lowercase tag, used as a CSS class suffix.
    pub severity: &'static str,
    pub severity_display: String,
    pub severity_color: &'static str,
    pub address: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub created_at_display: String,
}

impl From<&Alert> for AlertListEntry {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id,
            kind: alert.kind.label(),
            severity: alert.severity.label(),
            severity_display: alert.severity.label().to_uppercase(),
            severity_color: alert.severity.marker_color(),
            address: alert.address.clone(),
            description: alert.description.clone(),
            photo: alert.photo.clone(),
            created_at_display: alert.created_at_display.clone(),
        }
    }
}

/// Reverse-chronological list entries for a filtered view.
pub fn list_entries<'a>(view: impl IntoIterator<Item = &'a Alert>) -> Vec<AlertListEntry> {
    let mut entries: Vec<AlertListEntry> = view.into_iter().map(AlertListEntry::from).collect();
    entries.reverse();
    entries
}

/// Summary counters over the full, unfiltered store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    #[serde(rename = "totalAlertas")]
    pub total: usize,
    #[serde(rename = "alertasHoje")]
    pub today: usize,
    #[serde(rename = "alertasAlta")]
    pub high: usize,
}

pub fn stats(alerts: &[Alert], now: DateTime<Local>) -> Stats {
    let midnight_ms = local_midnight(now).timestamp_millis();
    Stats {
        total: alerts.len(),
        today: alerts
            .iter()
            .filter(|a| a.created_at_epoch.is_some_and(|ms| ms >= midnight_ms))
            .count(),
        high: alerts
            .iter()
            .filter(|a| a.severity == Severity::Alta)
            .count(),
    }
}
