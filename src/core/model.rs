// Alert model types shared with the webview.
//
// NOTE: serialized shapes are consumed by ui/script.js.
// Keep both sides in sync when modifying data structures.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Marker color for records whose severity tag is not recognized.
pub const DEFAULT_MARKER_COLOR: &str = "#667eea";

/// Incident category, fixed set matching the report form's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    Enchente,
    Deslizamento,
    #[serde(rename = "Incêndio")]
    Incendio,
    Vendaval,
    Granizo,
    Outro,
}

impl AlertKind {
    /// Get the display name for this category
    pub fn label(&self) -> &'static str {
        match self {
            Self::Enchente => "Enchente",
            Self::Deslizamento => "Deslizamento",
            Self::Incendio => "Incêndio",
            Self::Vendaval => "Vendaval",
            Self::Granizo => "Granizo",
            Self::Outro => "Outro",
        }
    }

    /// Get all available categories
    pub fn all() -> &'static [AlertKind] {
        &[
            Self::Enchente,
            Self::Deslizamento,
            Self::Incendio,
            Self::Vendaval,
            Self::Granizo,
            Self::Outro,
        ]
    }
}

/// Severity tag, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Baixa,
    Media,
    Alta,
    /// Stored records with an unrecognized severity tag.
    #[serde(other)]
    Desconhecida,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baixa => "baixa",
            Self::Media => "media",
            Self::Alta => "alta",
            Self::Desconhecida => "desconhecida",
        }
    }

    /// Marker color for this severity (hex, webview-side).
    pub fn marker_color(&self) -> &'static str {
        match self {
            Self::Baixa => "#28a745",
            Self::Media => "#ffc107",
            Self::Alta => "#dc3545",
            Self::Desconhecida => DEFAULT_MARKER_COLOR,
        }
    }

    /// Same palette as RGB components, for the PDF report text.
    pub fn report_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Alta => (220, 53, 69),
            Self::Media => (255, 193, 7),
            _ => (40, 167, 69),
        }
    }
}

/// One submitted incident report.
///
/// Immutable after creation; only removed via a full-store clear.
/// Serialized field names are the on-disk format, do not rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    /// Inline data-URI image, if one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Localized timestamp for display.
    #[serde(rename = "createdAtDisplay")]
    pub created_at_display: String,
    /// Epoch milliseconds; ordering and period filtering. Records imported
    /// from very old saves may lack it.
    #[serde(rename = "createdAtEpoch", default)]
    pub created_at_epoch: Option<i64>,
}

/// Form payload for a new report, before the store assigns id and timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Localized display timestamp, pt-BR style.
pub fn format_display(ts: DateTime<Local>) -> String {
    ts.format("%d/%m/%Y, %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_have_labels() {
        for kind in AlertKind::all() {
            assert!(!kind.label().is_empty());
        }
    }

    #[test]
    fn test_severity_palette() {
        assert_eq!(Severity::Baixa.marker_color(), "#28a745");
        assert_eq!(Severity::Media.marker_color(), "#ffc107");
        assert_eq!(Severity::Alta.marker_color(), "#dc3545");
        assert_eq!(Severity::Desconhecida.marker_color(), DEFAULT_MARKER_COLOR);
    }

    #[test]
    fn test_severity_tags_round_trip() {
        assert_eq!(serde_json::to_string(&Severity::Alta).unwrap(), "\"alta\"");
        let parsed: Severity = serde_json::from_str("\"media\"").unwrap();
        assert_eq!(parsed, Severity::Media);
        // Unknown tags degrade instead of failing the whole load.
        let parsed: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, Severity::Desconhecida);
    }

    #[test]
    fn test_alert_serialized_field_names() {
        let alert = Alert {
            id: 7,
            kind: AlertKind::Enchente,
            severity: Severity::Alta,
            address: "Rua A, 10".to_string(),
            latitude: -22.90,
            longitude: -42.80,
            description: "Rua alagada".to_string(),
            photo: None,
            created_at_display: "01/02/2026, 10:00:00".to_string(),
            created_at_epoch: Some(1_700_000_000_000),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "Enchente");
        assert_eq!(json["severity"], "alta");
        assert_eq!(json["createdAtEpoch"], 1_700_000_000_000_i64);
        assert!(json.get("photo").is_none());
        assert!(json["createdAtDisplay"].is_string());
    }
}
