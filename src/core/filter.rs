//! Derives a filtered view of the alert store.
//!
//! Three independent criteria combined with AND: category, severity and a
//! relative date window. The output keeps the store's insertion order; callers
//! reverse it for display.

use chrono::{DateTime, Duration, Local, NaiveTime};
use serde::{Deserialize, Serialize};

use super::model::{Alert, AlertKind, Severity};

/// Start of the current local day.
pub fn local_midnight(now: DateTime<Local>) -> DateTime<Local> {
    // Ambiguous midnights (DST transitions) fall back to the earliest mapping.
    now.with_time(NaiveTime::MIN)
        .earliest()
        .unwrap_or(now)
}

/// Relative date-range predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// All-time, no window.
    #[default]
    Todos,
    /// Since the current local midnight.
    Hoje,
    /// Last 7 days, counted from the current local midnight.
    Semana,
    /// Last 30 days, counted from the current local midnight.
    Mes,
}

impl Period {
    /// Inclusive lower bound of the window, or `None` for all-time.
    pub fn window_start(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let midnight = local_midnight(now);
        match self {
            Self::Todos => None,
            Self::Hoje => Some(midnight),
            Self::Semana => Some(midnight - Duration::days(7)),
            Self::Mes => Some(midnight - Duration::days(30)),
        }
    }
}

/// User-selected filter criteria. `None` means "any".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AlertFilter {
    #[serde(rename = "type", default)]
    pub kind: Option<AlertKind>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub period: Period,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert, now: DateTime<Local>) -> bool {
        if self.kind.is_some_and(|kind| alert.kind != kind) {
            return false;
        }
        if self.severity.is_some_and(|sev| alert.severity != sev) {
            return false;
        }
        match self.period.window_start(now) {
            None => true,
            Some(start) => match alert.created_at_epoch {
                // Records without a timestamp never match a bounded window.
                None => false,
                Some(ms) => {
                    ms >= start.timestamp_millis() && ms <= now.timestamp_millis()
                }
            },
        }
    }

    /// Filtered view in insertion order. Never fails; an all-excluding filter
    /// just yields an empty view.
    pub fn apply<'a>(&self, alerts: &'a [Alert], now: DateTime<Local>) -> Vec<&'a Alert> {
        alerts.iter().filter(|a| self.matches(a, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert_at(id: u64, kind: AlertKind, severity: Severity, epoch: Option<i64>) -> Alert {
        Alert {
            id,
            kind,
            severity,
            address: "Rua B, 20".to_string(),
            latitude: -22.9,
            longitude: -42.8,
            description: String::new(),
            photo: None,
            created_at_display: String::new(),
            created_at_epoch: epoch,
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let now = fixed_now();
        let alerts = vec![
            alert_at(1, AlertKind::Enchente, Severity::Baixa, None),
            alert_at(2, AlertKind::Outro, Severity::Alta, Some(0)),
        ];
        let view = AlertFilter::default().apply(&alerts, now);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_midnight_boundary_inclusive() {
        let now = fixed_now();
        let midnight_ms = local_midnight(now).timestamp_millis();

        let at_midnight = alert_at(1, AlertKind::Enchente, Severity::Media, Some(midnight_ms));
        let just_before = alert_at(2, AlertKind::Enchente, Severity::Media, Some(midnight_ms - 1));

        let filter = AlertFilter {
            period: Period::Hoje,
            ..AlertFilter::default()
        };
        assert!(filter.matches(&at_midnight, now));
        assert!(!filter.matches(&just_before, now));
    }

    #[test]
    fn test_week_and_month_windows() {
        let now = fixed_now();
        let midnight = local_midnight(now);
        let eight_days_ago = (midnight - Duration::days(8)).timestamp_millis();
        let six_days_ago = (midnight - Duration::days(6)).timestamp_millis();

        let old = alert_at(1, AlertKind::Granizo, Severity::Baixa, Some(eight_days_ago));
        let recent = alert_at(2, AlertKind::Granizo, Severity::Baixa, Some(six_days_ago));

        let week = AlertFilter {
            period: Period::Semana,
            ..AlertFilter::default()
        };
        assert!(!week.matches(&old, now));
        assert!(week.matches(&recent, now));

        let month = AlertFilter {
            period: Period::Mes,
            ..AlertFilter::default()
        };
        assert!(month.matches(&old, now));
    }

    #[test]
    fn test_missing_epoch_only_matches_all_time() {
        let now = fixed_now();
        let dateless = alert_at(1, AlertKind::Vendaval, Severity::Alta, None);

        for period in [Period::Hoje, Period::Semana, Period::Mes] {
            let filter = AlertFilter {
                period,
                ..AlertFilter::default()
            };
            assert!(!filter.matches(&dateless, now), "{period:?}");
        }
        let all_time = AlertFilter::default();
        assert!(all_time.matches(&dateless, now));
    }

    #[test]
    fn test_conjunction_equals_intersection() {
        let now = fixed_now();
        let today_ms = local_midnight(now).timestamp_millis() + 1000;
        let last_week_ms = (local_midnight(now) - Duration::days(5)).timestamp_millis();

        let alerts = vec![
            alert_at(1, AlertKind::Enchente, Severity::Alta, Some(today_ms)),
            alert_at(2, AlertKind::Enchente, Severity::Baixa, Some(today_ms)),
            alert_at(3, AlertKind::Outro, Severity::Alta, Some(today_ms)),
            alert_at(4, AlertKind::Enchente, Severity::Alta, Some(last_week_ms)),
        ];

        let by_kind = AlertFilter {
            kind: Some(AlertKind::Enchente),
            ..AlertFilter::default()
        };
        let by_severity = AlertFilter {
            severity: Some(Severity::Alta),
            ..AlertFilter::default()
        };
        let by_period = AlertFilter {
            period: Period::Hoje,
            ..AlertFilter::default()
        };
        let combined = AlertFilter {
            kind: Some(AlertKind::Enchente),
            severity: Some(Severity::Alta),
            period: Period::Hoje,
        };

        let intersection: Vec<u64> = alerts
            .iter()
            .filter(|a| {
                by_kind.matches(a, now) && by_severity.matches(a, now) && by_period.matches(a, now)
            })
            .map(|a| a.id)
            .collect();
        let combined_ids: Vec<u64> = combined.apply(&alerts, now).iter().map(|a| a.id).collect();

        assert_eq!(combined_ids, intersection);
        assert_eq!(combined_ids, vec![1]);
    }

    #[test]
    fn test_output_preserves_insertion_order() {
        let now = fixed_now();
        let today_ms = local_midnight(now).timestamp_millis() + 1;
        let alerts: Vec<Alert> = (1..=4)
            .map(|id| alert_at(id, AlertKind::Outro, Severity::Media, Some(today_ms)))
            .collect();
        let view = AlertFilter::default().apply(&alerts, now);
        let ids: Vec<u64> = view.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
