use serde::{Deserialize, Serialize};

// --- Geo Types ---

/// GeoJSON geometry as published upstream. Coordinates are kept verbatim
/// (longitude-latitude pairs, nested per polygon/multipolygon ring).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

// --- Alerts ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    #[default]
    Unknown,
}

impl Severity {
    /// Map the upstream CAP severity string. Anything unrecognised is `Unknown`.
    pub fn from_upstream(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "extreme" => Severity::Extreme,
            "severe" => Severity::Severe,
            "moderate" => Severity::Moderate,
            "minor" => Severity::Minor,
            _ => Severity::Unknown,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Extreme => write!(f, "Extreme"),
            Severity::Severe => write!(f, "Severe"),
            Severity::Moderate => write!(f, "Moderate"),
            Severity::Minor => write!(f, "Minor"),
            Severity::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An active warning/watch retained from the alerts feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub event: String,
    pub description: String,
    pub area: String,
    pub severity: Severity,
    /// Issued (`sent`) timestamp, RFC 3339 as received.
    pub time: String,
    /// Expiry timestamp, RFC 3339 as received. Empty when upstream sent none.
    pub expires_time: String,
    pub geometry: Option<Geometry>,
    /// Always present, possibly empty.
    pub ugc: Vec<String>,
    /// Always present, possibly empty.
    pub same: Vec<String>,
}

// --- Mesoscale Discussions ---

/// Fields pulled out of a discussion's text body. Every field is empty when
/// the label wasn't found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionDetails {
    pub areas_affected: String,
    pub concerning: String,
    pub valid: String,
    pub summary: String,
    pub discussion: String,
    pub probability: String,
}

impl DiscussionDetails {
    pub fn is_empty(&self) -> bool {
        self == &DiscussionDetails::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MesoscaleDiscussion {
    /// `MCD <number>`.
    pub id: String,
    pub name: String,
    pub full_text: String,
    pub popup_info: String,
    /// Upstream file date, epoch milliseconds.
    #[serde(rename = "idp_filedate")]
    pub file_date: i64,
    pub geometry: Option<Geometry>,
    pub details: DiscussionDetails,
}

impl MesoscaleDiscussion {
    /// Discussion number portion of the id.
    pub fn number(&self) -> &str {
        self.id.strip_prefix("MCD ").unwrap_or(&self.id)
    }
}

/// Strip everything but ASCII digits from an upstream discussion name
/// ("MD 0091" -> "0091"). `None` when no digits remain.
pub fn discussion_number(name: &str) -> Option<String> {
    let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
    (!digits.is_empty()).then_some(digits)
}

// --- Snapshot ---

/// Everything published in one poll cycle. Replaced wholesale every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub warnings: Vec<Alert>,
    pub mesoscale_discussions: Vec<MesoscaleDiscussion>,
    pub last_updated: String,
    /// Number of alerts in `warnings`.
    pub counter: usize,
    #[serde(rename = "updatedAtUTC")]
    pub updated_at_utc: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_maps_upstream_strings() {
        let tests = vec![
            ("Extreme", Severity::Extreme),
            ("severe", Severity::Severe),
            ("Moderate", Severity::Moderate),
            (" Minor ", Severity::Minor),
            ("Unknown", Severity::Unknown),
            ("", Severity::Unknown),
            ("Catastrophic", Severity::Unknown),
        ];

        for (input, expected) in tests {
            assert_eq!(Severity::from_upstream(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn discussion_number_keeps_only_digits() {
        assert_eq!(discussion_number("MD 0091").as_deref(), Some("0091"));
        assert_eq!(discussion_number("md1234").as_deref(), Some("1234"));
        assert_eq!(discussion_number("MD"), None);
        assert_eq!(discussion_number(""), None);
    }

    #[test]
    fn alert_serializes_with_dashboard_field_names() {
        let alert = Alert {
            id: "urn:oid:1".into(),
            event: "Tornado Warning".into(),
            description: "desc".into(),
            area: "Story, IA".into(),
            severity: Severity::Extreme,
            time: "2026-04-01T20:00:00-05:00".into(),
            expires_time: String::new(),
            geometry: None,
            ugc: vec![],
            same: vec!["019169".into()],
        };

        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["type"], "Tornado Warning");
        assert_eq!(value["severity"], "Extreme");
        assert_eq!(value["expiresTime"], "");
        assert!(value["geometry"].is_null());
        assert_eq!(value["ugc"], serde_json::json!([]));
        assert_eq!(value["same"], serde_json::json!(["019169"]));
    }

    #[test]
    fn snapshot_uses_published_keys() {
        let snapshot = Snapshot {
            warnings: vec![],
            mesoscale_discussions: vec![],
            last_updated: "Apr 1, 2026 at 20:00:00 UTC".into(),
            counter: 0,
            updated_at_utc: 1_775_073_600,
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        let object = value.as_object().unwrap();
        for key in ["warnings", "mesoscaleDiscussions", "lastUpdated", "counter", "updatedAtUTC"] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(value["mesoscaleDiscussions"], serde_json::json!([]));
    }

    #[test]
    fn discussion_serializes_file_date_key() {
        let mcd = MesoscaleDiscussion {
            id: "MCD 0091".into(),
            name: "MD 0091".into(),
            full_text: String::new(),
            popup_info: String::new(),
            file_date: 1_739_563_200_000,
            geometry: None,
            details: DiscussionDetails::default(),
        };

        let value = serde_json::to_value(&mcd).unwrap();
        assert_eq!(value["idp_filedate"], 1_739_563_200_000_i64);
        assert_eq!(value["fullText"], "");
        assert_eq!(value["popupInfo"], "");
        assert_eq!(mcd.number(), "0091");
    }
}
