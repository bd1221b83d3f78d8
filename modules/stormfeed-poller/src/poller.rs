use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use nws_client::NwsClient;
use spc_client::{DiscussionBatch, SpcClient};
use stormfeed_common::Config;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{PollerError, Result};
use crate::payload::build_snapshot;
use crate::publish::SnapshotWriter;
use crate::traits::{AlertSource, DiscussionSource};

/// Where the current cycle is. Observable through [`Poller::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Fetching,
    Merging,
    Writing,
}

/// Outcome of one published cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub alerts: usize,
    pub discussions: usize,
    pub text_failures: usize,
    pub elapsed: Duration,
}

pub struct Poller {
    alerts: Arc<dyn AlertSource>,
    discussions: Arc<dyn DiscussionSource>,
    writer: SnapshotWriter,
    interval: Duration,
    phase: watch::Sender<CyclePhase>,
}

impl Poller {
    pub fn new(
        alerts: Arc<dyn AlertSource>,
        discussions: Arc<dyn DiscussionSource>,
        writer: SnapshotWriter,
        interval: Duration,
    ) -> Self {
        let (phase, _) = watch::channel(CyclePhase::Idle);
        Self {
            alerts,
            discussions,
            writer,
            interval,
            phase,
        }
    }

    /// Wire up the NWS and SPC clients described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let nws = NwsClient::new(
            &config.alerts_url,
            config.alert_events.clone(),
            &config.user_agent,
            config.alerts_timeout,
        )
        .map_err(|e| PollerError::Setup(format!("alerts client: {e}")))?;

        let spc = SpcClient::new(
            &config.mcd_query_url,
            &config.spc_base_url,
            &config.user_agent,
            config.mcd_list_timeout,
            config.mcd_text_timeout,
        )
        .map_err(|e| PollerError::Setup(format!("discussion client: {e}")))?;

        Ok(Self::new(
            Arc::new(nws),
            Arc::new(spc),
            SnapshotWriter::new(&config.output_path),
            config.poll_interval,
        ))
    }

    pub fn subscribe(&self) -> watch::Receiver<CyclePhase> {
        self.phase.subscribe()
    }

    /// One fetch-merge-publish pass. An alert failure skips the publish and
    /// leaves the previous file in place; a discussion failure publishes with
    /// no discussions. The phase is back to `Idle` on return either way.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let result = self.cycle().await;
        self.phase.send_replace(CyclePhase::Idle);
        result
    }

    async fn cycle(&self) -> Result<CycleReport> {
        let started = Instant::now();
        self.phase.send_replace(CyclePhase::Fetching);
        debug!("Poll cycle starting");

        let (alerts, discussions) = tokio::join!(self.alerts.active_alerts(), self.discussions.discussions());

        let alerts = alerts?;
        let batch = discussions.unwrap_or_else(|e| {
            warn!(error = %e, "Discussion fetch failed, publishing without discussions");
            DiscussionBatch::default()
        });

        self.phase.send_replace(CyclePhase::Merging);
        let text_failures = batch.text_failures;
        if !batch.discussions.is_empty() {
            let numbers: Vec<&str> = batch.discussions.iter().map(|d| d.number()).collect();
            debug!(mcds = %numbers.join(","), "Merging mesoscale discussions");
        }
        let snapshot = build_snapshot(alerts, batch.discussions, Utc::now());

        self.phase.send_replace(CyclePhase::Writing);
        self.writer.publish(&snapshot).await?;

        Ok(CycleReport {
            alerts: snapshot.warnings.len(),
            discussions: snapshot.mesoscale_discussions.len(),
            text_failures,
            elapsed: started.elapsed(),
        })
    }

    /// Run cycles forever. Each sleep starts after the previous cycle ends, so
    /// the effective period is the interval plus cycle time. A failed cycle is
    /// logged and the loop carries on.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            output = %self.writer.target().display(),
            "Poller started"
        );

        loop {
            match self.run_cycle().await {
                Ok(report) => info!(
                    alerts = report.alerts,
                    discussions = report.discussions,
                    text_failures = report.text_failures,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Snapshot published"
                ),
                Err(e) => error!(error = %e, "Poll cycle failed, previous snapshot kept"),
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
