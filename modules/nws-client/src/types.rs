use chrono::{DateTime, Utc};
use serde::Deserialize;
use stormfeed_common::{Alert, Geometry, Severity};

/// One page of `GET /alerts/active` (GeoJSON FeatureCollection).
#[derive(Debug, Deserialize)]
pub struct AlertCollection {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
    pub pagination: Option<Pagination>,
}

impl AlertCollection {
    /// Absolute URL of the next page, if upstream advertised a non-empty one.
    pub fn next_page(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertFeature {
    pub geometry: Option<Geometry>,
    pub properties: AlertProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertProperties {
    pub id: Option<String>,
    pub event: Option<String>,
    pub description: Option<String>,
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub sent: Option<String>,
    pub expires: Option<String>,
    pub geocode: Option<Geocode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Geocode {
    #[serde(rename = "UGC")]
    pub ugc: Option<Vec<String>>,
    #[serde(rename = "SAME")]
    pub same: Option<Vec<String>>,
}

impl AlertFeature {
    /// Keep the feature only if it is an actual (not test/exercise) alert that
    /// hasn't expired as of `now`. An expiry that doesn't parse is kept.
    pub fn into_alert(self, now: DateTime<Utc>) -> Option<Alert> {
        let p = self.properties;

        if p.status.as_deref() != Some("Actual") {
            return None;
        }

        let expires = p.expires.unwrap_or_default();
        if let Ok(expiry) = DateTime::parse_from_rfc3339(&expires) {
            if expiry < now {
                return None;
            }
        }

        let geocode = p.geocode.unwrap_or_default();

        Some(Alert {
            id: p.id.unwrap_or_default(),
            event: p.event.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            area: p.area_desc.unwrap_or_default(),
            severity: Severity::from_upstream(p.severity.as_deref().unwrap_or_default()),
            time: p.sent.unwrap_or_default(),
            expires_time: expires,
            geometry: self.geometry,
            ugc: geocode.ugc.unwrap_or_default(),
            same: geocode.same.unwrap_or_default(),
        })
    }
}
