use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use stormfeed_common::{discussion_number, DiscussionDetails, Geometry, MesoscaleDiscussion};

/// MapServer `query?f=geojson` response for the mesoscale discussion layer.
#[derive(Debug, Deserialize)]
pub struct DiscussionCollection {
    #[serde(default)]
    pub features: Vec<DiscussionFeature>,
    /// ArcGIS reports query failures in-band with a 200 status.
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscussionFeature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: DiscussionProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscussionProperties {
    pub name: Option<String>,
    pub folderpath: Option<String>,
    pub popupinfo: Option<String>,
    pub idp_filedate: Option<i64>,
}

/// A feature whose name resolved to a discussion number, waiting on its text page.
#[derive(Debug, Clone)]
pub struct PendingDiscussion {
    pub number: String,
    pub name: String,
    pub popup_info: String,
    pub file_date: i64,
    pub geometry: Option<Geometry>,
}

impl PendingDiscussion {
    /// `None` when the feature's name carries no digits.
    pub fn from_feature(feature: DiscussionFeature) -> Option<Self> {
        let name = feature.properties.name.unwrap_or_default();
        let number = discussion_number(&name)?;

        Some(Self {
            number,
            name,
            popup_info: feature.properties.popupinfo.unwrap_or_default(),
            file_date: feature.properties.idp_filedate.unwrap_or_default(),
            geometry: feature.geometry,
        })
    }

    /// Year of the SPC text archive the discussion lives in. Uses the file
    /// date when upstream sent one so late-December discussions still resolve
    /// after the new year starts.
    pub fn year(&self, now: DateTime<Utc>) -> i32 {
        DateTime::<Utc>::from_timestamp_millis(self.file_date)
            .filter(|_| self.file_date > 0)
            .map(|d| d.year())
            .unwrap_or_else(|| now.year())
    }

    pub fn into_discussion(self, full_text: String, details: DiscussionDetails) -> MesoscaleDiscussion {
        MesoscaleDiscussion {
            id: format!("MCD {}", self.number),
            name: self.name,
            full_text,
            popup_info: self.popup_info,
            file_date: self.file_date,
            geometry: self.geometry,
            details,
        }
    }
}

/// Output of one discussion fetch.
#[derive(Debug, Clone, Default)]
pub struct DiscussionBatch {
    pub discussions: Vec<MesoscaleDiscussion>,
    /// Discussions whose text page couldn't be fetched; they are still in `discussions`.
    pub text_failures: usize,
}
