pub mod error;
pub mod types;

pub use error::{NwsError, Result};
pub use types::{AlertCollection, AlertFeature};

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use stormfeed_common::Alert;
use tracing::{debug, info, warn};

/// Longest slice of an error body carried into `NwsError::Api`.
const ERROR_BODY_SNIPPET: usize = 200;

/// Upper bound on pages followed in one fetch. Active alerts rarely span
/// more than a handful.
const MAX_PAGES: usize = 50;

pub struct NwsClient {
    client: reqwest::Client,
    alerts_url: String,
    events: Vec<String>,
    user_agent: String,
}

impl NwsClient {
    /// `alerts_url` is the full `/alerts/active` endpoint. `events` restricts the
    /// query to those event names; empty means every event type.
    pub fn new(
        alerts_url: &str,
        events: Vec<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            alerts_url: alerts_url.to_string(),
            events,
            user_agent: user_agent.to_string(),
        })
    }

    /// Fetch every page of active alerts, keeping actual, unexpired ones in
    /// upstream order. Any failed page fails the whole fetch, as does a
    /// `next` link that was already visited or a walk past `MAX_PAGES`.
    pub async fn fetch_active_alerts(&self) -> Result<Vec<Alert>> {
        let now = Utc::now();
        let mut alerts = Vec::new();
        let mut pages = 0usize;
        let mut visited: HashSet<String> = HashSet::new();

        let mut page = self.fetch_page(&self.alerts_url, true).await?;
        loop {
            pages += 1;
            let total = page.features.len();
            let before = alerts.len();
            let next = page.next_page().map(str::to_string);

            alerts.extend(page.features.into_iter().filter_map(|f| f.into_alert(now)));
            debug!(page = pages, features = total, kept = alerts.len() - before, "Alerts page processed");

            let Some(next) = next else { break };
            if pages >= MAX_PAGES {
                warn!(pages, "NWS alerts pagination exceeded page limit");
                return Err(NwsError::Pagination(format!("more than {MAX_PAGES} pages")));
            }
            if !visited.insert(next.clone()) {
                warn!(url = next.as_str(), "NWS alerts pagination revisited a page");
                return Err(NwsError::Pagination(format!("next link repeats {next}")));
            }
            page = self.fetch_page(&next, false).await?;
        }

        info!(pages, alerts = alerts.len(), "Fetched active alerts");
        Ok(alerts)
    }

    async fn fetch_page(&self, url: &str, first: bool) -> Result<AlertCollection> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/geo+json");

        // Pagination links already carry the full query.
        if first {
            request = request.query(&self.query());
        }

        let resp = request.send().await?;
        let status = resp.status();
        debug!(url, status = %status, "Alerts page response");

        let body = resp.text().await?;
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "NWS alerts request rejected");
            return Err(NwsError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("status", "actual".to_string())];
        if !self.events.is_empty() {
            query.push(("event", self.events.join(",")));
        }
        query
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(ERROR_BODY_SNIPPET).collect()
}
