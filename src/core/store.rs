//! Canonical in-memory alert collection.
//!
//! Single source of truth for the application. Insertion order is
//! chronological (oldest first); display views reverse it without touching
//! the stored order.

use chrono::{DateTime, Local};

use super::model::{format_display, Alert, NewAlert};

pub struct AlertStore {
    alerts: Vec<Alert>,
    /// Next id to assign. Ids are monotonic and never reused, even across
    /// restarts (seeded from loaded data).
    next_id: u64,
}

impl AlertStore {
    pub fn new() -> Self {
        Self {
            alerts: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a store from persisted records, seeding the id counter past
    /// the highest stored id.
    pub fn from_saved(alerts: Vec<Alert>) -> Self {
        let next_id = alerts.iter().map(|a| a.id).max().map_or(1, |id| id + 1);
        Self { alerts, next_id }
    }

    /// Append a new report, assigning its id and creation timestamps.
    ///
    /// Input validation (required fields, finite coordinates) happens at the
    /// command boundary; by the time a record reaches the store it is valid.
    pub fn append(&mut self, input: NewAlert, now: DateTime<Local>) -> &Alert {
        let alert = Alert {
            id: self.next_id,
            kind: input.kind,
            severity: input.severity,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            description: input.description,
            photo: input.photo,
            created_at_display: format_display(now),
            created_at_epoch: Some(now.timestamp_millis()),
        };
        self.next_id += 1;
        self.alerts.push(alert);
        self.alerts.last().unwrap()
    }

    /// Remove every stored alert. The id counter is not reset.
    pub fn clear(&mut self) {
        self.alerts.clear();
    }

    /// Full collection in insertion order.
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}
