pub mod error;
pub mod html;
pub mod text_extract;
pub mod types;

pub use error::{Result, SpcError};
pub use text_extract::{extract, ExtractedText};
pub use types::{DiscussionBatch, DiscussionCollection, PendingDiscussion};

use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use stormfeed_common::MesoscaleDiscussion;
use tracing::{debug, info, warn};

/// Fields requested from the MapServer layer.
const OUT_FIELDS: &str = "name,folderpath,popupinfo,idp_filedate";

/// Characters of raw text logged when a discussion has no recognisable sections.
const EXCERPT_CHARS: usize = 120;

pub struct SpcClient {
    /// Discussion polygon query. Slow upstream, long timeout.
    list_client: reqwest::Client,
    /// Per-discussion text pages.
    text_client: reqwest::Client,
    query_url: String,
    base_url: String,
    user_agent: String,
}

impl SpcClient {
    /// `query_url` is the MapServer layer's `/query` endpoint; `base_url` is the
    /// SPC site root the `/products/md/...` text pages hang off.
    pub fn new(
        query_url: &str,
        base_url: &str,
        user_agent: &str,
        list_timeout: Duration,
        text_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            list_client: reqwest::Client::builder().timeout(list_timeout).build()?,
            text_client: reqwest::Client::builder().timeout(text_timeout).build()?,
            query_url: query_url.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    /// Fetch every active discussion with its scraped text, in upstream feature
    /// order. Only the polygon query can fail this call; a text page that fails
    /// leaves that discussion with empty text and is counted in `text_failures`.
    pub async fn fetch_discussions(&self) -> Result<DiscussionBatch> {
        let collection = self.fetch_collection().await?;
        let total = collection.features.len();

        let pending: Vec<PendingDiscussion> = collection
            .features
            .into_iter()
            .filter_map(PendingDiscussion::from_feature)
            .collect();

        if pending.len() < total {
            debug!(dropped = total - pending.len(), "Skipped discussion features without a number");
        }

        // One in-flight request per discussion; completion order is arbitrary.
        let width = pending.len().max(1);
        let mut resolved: Vec<(usize, MesoscaleDiscussion, bool)> = stream::iter(pending.into_iter().enumerate())
            .map(|(idx, p)| async move {
                let (discussion, ok) = self.resolve(p).await;
                (idx, discussion, ok)
            })
            .buffer_unordered(width)
            .collect()
            .await;

        resolved.sort_by_key(|(idx, _, _)| *idx);

        let text_failures = resolved.iter().filter(|(_, _, ok)| !ok).count();
        let discussions: Vec<MesoscaleDiscussion> = resolved.into_iter().map(|(_, d, _)| d).collect();

        info!(discussions = discussions.len(), text_failures, "Fetched mesoscale discussions");
        Ok(DiscussionBatch {
            discussions,
            text_failures,
        })
    }

    async fn fetch_collection(&self) -> Result<DiscussionCollection> {
        let resp = self
            .list_client
            .get(&self.query_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("where", "1=1"), ("outFields", OUT_FIELDS), ("f", "geojson")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SpcError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = resp.text().await?;
        let collection: DiscussionCollection = serde_json::from_str(&body)?;

        if let Some(err) = &collection.error {
            return Err(SpcError::Api {
                status: u16::try_from(err.code).unwrap_or(status.as_u16()),
                message: err.message.clone(),
            });
        }

        Ok(collection)
    }

    /// Text page plus parsed sections. Never fails: errors are logged and the
    /// discussion comes back with empty text. The flag is false on failure.
    async fn resolve(&self, pending: PendingDiscussion) -> (MesoscaleDiscussion, bool) {
        let year = pending.year(Utc::now());
        let (text, ok) = match self.fetch_text(year, &pending.number).await {
            Ok(text) => (text, true),
            Err(e) => {
                warn!(mcd = pending.number.as_str(), year, error = %e, "Failed to fetch discussion text");
                (String::new(), false)
            }
        };

        let parsed = text_extract::extract(&text);
        if ok && !text.is_empty() && parsed.details.is_empty() {
            debug!(
                mcd = pending.number.as_str(),
                excerpt = %parsed.excerpt(EXCERPT_CHARS),
                "No labelled sections in discussion text"
            );
        }

        (pending.into_discussion(text, parsed.details), ok)
    }

    /// Plain text of one discussion page. A page without a `<pre>` block is
    /// empty text, not an error.
    pub async fn fetch_text(&self, year: i32, number: &str) -> Result<String> {
        let url = self.text_url(year, number);
        let resp = self
            .text_client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SpcError::TextPage {
                url,
                status: status.as_u16(),
            });
        }

        let html = resp.text().await?;
        Ok(html::extract_preformatted(&html).unwrap_or_default())
    }

    fn text_url(&self, year: i32, number: &str) -> String {
        format!("{}/products/md/{}/md{}.html", self.base_url, year, number)
    }
}
